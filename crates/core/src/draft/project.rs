//! Project authoring draft (admin form).

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::CoreError;
use crate::project::{Category, Project, ProjectImage, Technologies, WorkflowStep};
use crate::types::Amount;

use super::{optional, DraftError, SlotList};

/// Technology group addressed by the indexed list operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TechCategory {
    Frontend,
    Backend,
    Database,
    Other,
}

/// Draft technology lists, one [`SlotList`] per group.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TechnologiesDraft {
    pub frontend: SlotList,
    pub backend: SlotList,
    pub database: SlotList,
    pub other: SlotList,
}

impl TechnologiesDraft {
    pub fn list_mut(&mut self, category: TechCategory) -> &mut SlotList {
        match category {
            TechCategory::Frontend => &mut self.frontend,
            TechCategory::Backend => &mut self.backend,
            TechCategory::Database => &mut self.database,
            TechCategory::Other => &mut self.other,
        }
    }

    fn from_technologies(tech: &Technologies) -> Self {
        Self {
            frontend: SlotList::from_values(tech.frontend.clone()),
            backend: SlotList::from_values(tech.backend.clone()),
            database: SlotList::from_values(tech.database.clone()),
            other: SlotList::from_values(tech.other.clone()),
        }
    }

    fn cleaned(&self) -> Technologies {
        Technologies {
            frontend: self.frontend.cleaned(),
            backend: self.backend.cleaned(),
            database: self.database.cleaned(),
            other: self.other.cleaned(),
        }
    }
}

/// One editable workflow row.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkflowStepDraft {
    #[serde(default)]
    pub step: String,
    #[serde(default)]
    pub description: String,
}

/// Ordered workflow rows; like [`SlotList`], never fewer than one row.
/// A row survives cleaning only when both its title and description are
/// non-blank.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "Vec<WorkflowStepDraft>", into = "Vec<WorkflowStepDraft>")]
pub struct WorkflowDraft {
    rows: Vec<WorkflowStepDraft>,
}

impl WorkflowDraft {
    pub fn new() -> Self {
        Self {
            rows: vec![WorkflowStepDraft::default()],
        }
    }

    fn from_steps(steps: &[WorkflowStep]) -> Self {
        if steps.is_empty() {
            return Self::new();
        }
        Self {
            rows: steps
                .iter()
                .map(|s| WorkflowStepDraft {
                    step: s.step.clone(),
                    description: s.description.clone(),
                })
                .collect(),
        }
    }

    pub fn add_row(&mut self) {
        self.rows.push(WorkflowStepDraft::default());
    }

    pub fn set_step(&mut self, index: usize, step: impl Into<String>) -> Result<(), CoreError> {
        self.row_mut(index)?.step = step.into();
        Ok(())
    }

    pub fn set_description(
        &mut self,
        index: usize,
        description: impl Into<String>,
    ) -> Result<(), CoreError> {
        self.row_mut(index)?.description = description.into();
        Ok(())
    }

    pub fn remove(&mut self, index: usize) -> Result<(), CoreError> {
        let len = self.rows.len();
        if index >= len {
            return Err(CoreError::IndexOutOfBounds {
                field: "workflow",
                index,
                len,
            });
        }
        if len == 1 {
            self.rows[0] = WorkflowStepDraft::default();
        } else {
            self.rows.remove(index);
        }
        Ok(())
    }

    pub fn rows(&self) -> &[WorkflowStepDraft] {
        &self.rows
    }

    fn row_mut(&mut self, index: usize) -> Result<&mut WorkflowStepDraft, CoreError> {
        let len = self.rows.len();
        self.rows.get_mut(index).ok_or(CoreError::IndexOutOfBounds {
            field: "workflow",
            index,
            len,
        })
    }

    fn cleaned(&self) -> Vec<WorkflowStep> {
        self.rows
            .iter()
            .filter(|r| !r.step.trim().is_empty() && !r.description.trim().is_empty())
            .map(|r| WorkflowStep {
                step: r.step.trim().to_string(),
                description: r.description.trim().to_string(),
            })
            .collect()
    }
}

impl Default for WorkflowDraft {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Vec<WorkflowStepDraft>> for WorkflowDraft {
    fn from(rows: Vec<WorkflowStepDraft>) -> Self {
        if rows.is_empty() {
            Self::new()
        } else {
            Self { rows }
        }
    }
}

impl From<WorkflowDraft> for Vec<WorkflowStepDraft> {
    fn from(draft: WorkflowDraft) -> Self {
        draft.rows
    }
}

/// Validated body for `POST /projects` and `PUT /projects/:id`.
#[derive(Debug, Clone, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProjectPayload {
    pub name: String,
    pub description: String,
    pub detailed_description: String,
    pub category: Category,
    pub duration: String,
    pub price: Amount,
    #[validate(url(message = "must be a valid URL"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub demo_url: Option<String>,
    #[validate(url(message = "must be a valid URL"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github_url: Option<String>,
    pub technologies: Technologies,
    pub features: Vec<String>,
    pub workflow: Vec<WorkflowStep>,
    pub images: Vec<ProjectImage>,
}

/// Admin project-authoring draft. Field names and shapes mirror
/// [`Project`]; `price` stays free text until [`build`] coerces it.
///
/// [`build`]: ProjectDraft::build
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectDraft {
    pub name: String,
    pub description: String,
    pub detailed_description: String,
    pub category: Category,
    pub duration: String,
    pub price: String,
    pub demo_url: String,
    pub github_url: String,
    pub technologies: TechnologiesDraft,
    pub features: SlotList,
    pub workflow: WorkflowDraft,
    pub images: Vec<ProjectImage>,
}

impl ProjectDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an edit draft from an existing catalog project.
    pub fn from_project(project: &Project) -> Self {
        Self {
            name: project.name.clone(),
            description: project.description.clone(),
            detailed_description: project.detailed_description.clone().unwrap_or_default(),
            category: project.category,
            duration: project.duration.clone(),
            price: project.price.to_string(),
            demo_url: project.demo_url.clone().unwrap_or_default(),
            github_url: project.github_url.clone().unwrap_or_default(),
            technologies: TechnologiesDraft::from_technologies(&project.technologies),
            features: SlotList::from_values(project.features.clone()),
            workflow: WorkflowDraft::from_steps(&project.workflow),
            images: project.images.clone(),
        }
    }

    /// Append descriptors returned by the side-channel image upload.
    /// Incoming primary flags are dropped when the draft already has a
    /// primary image, keeping the at-most-one invariant.
    pub fn add_images(&mut self, descriptors: Vec<ProjectImage>) {
        let mut has_primary = self.images.iter().any(|img| img.is_primary);
        for mut descriptor in descriptors {
            if descriptor.is_primary && has_primary {
                descriptor.is_primary = false;
            }
            has_primary = has_primary || descriptor.is_primary;
            self.images.push(descriptor);
        }
    }

    /// Flag the image at `index` as primary, clearing the flag on every
    /// other image in the draft.
    pub fn set_primary_image(&mut self, index: usize) -> Result<(), CoreError> {
        let len = self.images.len();
        if index >= len {
            return Err(CoreError::IndexOutOfBounds {
                field: "images",
                index,
                len,
            });
        }
        for (i, image) in self.images.iter_mut().enumerate() {
            image.is_primary = i == index;
        }
        Ok(())
    }

    pub fn remove_image(&mut self, index: usize) -> Result<(), CoreError> {
        let len = self.images.len();
        if index >= len {
            return Err(CoreError::IndexOutOfBounds {
                field: "images",
                index,
                len,
            });
        }
        self.images.remove(index);
        Ok(())
    }

    /// Validate the draft and produce the submission payload: required
    /// fields present, price coerced to a number, URLs well-formed,
    /// blank list entries filtered.
    pub fn build(&self) -> Result<ProjectPayload, DraftError> {
        let mut errors = DraftError::default();

        for (field, value) in [
            ("name", &self.name),
            ("description", &self.description),
            ("detailedDescription", &self.detailed_description),
            ("duration", &self.duration),
        ] {
            if value.trim().is_empty() {
                errors.push(field, format!("{field} is required"));
            }
        }

        let price = match self.price.trim() {
            "" => {
                errors.push("price", "price is required");
                0
            }
            text => match text.parse::<Amount>() {
                Ok(price) if price > 0 => price,
                Ok(_) => {
                    errors.push("price", "must be greater than zero");
                    0
                }
                Err(_) => {
                    errors.push("price", "must be a number");
                    0
                }
            },
        };

        let payload = ProjectPayload {
            name: self.name.trim().to_string(),
            description: self.description.trim().to_string(),
            detailed_description: self.detailed_description.trim().to_string(),
            category: self.category,
            duration: self.duration.trim().to_string(),
            price,
            demo_url: optional(&self.demo_url),
            github_url: optional(&self.github_url),
            technologies: self.technologies.cleaned(),
            features: self.features.cleaned(),
            workflow: self.workflow.cleaned(),
            images: self.images.clone(),
        };

        if let Err(shape_errors) = payload.validate() {
            let shape: DraftError = shape_errors.into();
            errors.fields.extend(shape.fields);
        }

        errors.into_result(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_draft() -> ProjectDraft {
        let mut draft = ProjectDraft::new();
        draft.name = "E-commerce Website".into();
        draft.description = "Full storefront".into();
        draft.detailed_description = "Catalog, cart, checkout".into();
        draft.duration = "2-3 weeks".into();
        draft.price = "15000".into();
        draft
    }

    fn image(url: &str, primary: bool) -> ProjectImage {
        ProjectImage {
            url: url.to_string(),
            alt: None,
            is_primary: primary,
        }
    }

    #[test]
    fn test_build_requires_core_fields() {
        let err = ProjectDraft::new().build().unwrap_err();
        for field in ["name", "description", "detailedDescription", "duration", "price"] {
            assert!(err.contains_field(field), "missing error for {field}");
        }
    }

    #[test]
    fn test_build_coerces_price() {
        let mut draft = filled_draft();
        draft.price = "  15000 ".into();
        assert_eq!(draft.build().unwrap().price, 15000);

        draft.price = "lots".into();
        assert!(draft.build().unwrap_err().contains_field("price"));

        draft.price = "0".into();
        assert!(draft.build().unwrap_err().contains_field("price"));
    }

    #[test]
    fn test_build_checks_url_shape() {
        let mut draft = filled_draft();
        draft.demo_url = "not a url".into();
        let err = draft.build().unwrap_err();
        assert!(err.contains_field("demo_url"));

        draft.demo_url = "https://demo.example.com".into();
        let payload = draft.build().unwrap();
        assert_eq!(payload.demo_url.as_deref(), Some("https://demo.example.com"));
    }

    #[test]
    fn test_blank_urls_are_omitted() {
        let payload = filled_draft().build().unwrap();
        assert!(payload.demo_url.is_none());
        assert!(payload.github_url.is_none());
    }

    #[test]
    fn test_build_filters_blank_list_entries() {
        let mut draft = filled_draft();
        draft.technologies.frontend.set(0, "React").unwrap();
        draft.technologies.frontend.add_slot();
        draft.features.set(0, "  ").unwrap();
        draft.workflow.set_step(0, "Design").unwrap();
        // Description left blank: the row must not survive cleaning.

        let payload = draft.build().unwrap();
        assert_eq!(payload.technologies.frontend, vec!["React"]);
        assert!(payload.technologies.backend.is_empty());
        assert!(payload.features.is_empty());
        assert!(payload.workflow.is_empty());
    }

    #[test]
    fn test_workflow_rows_need_both_fields() {
        let mut draft = filled_draft();
        draft.workflow.set_step(0, "Design").unwrap();
        draft.workflow.set_description(0, "Wireframes and mockups").unwrap();
        draft.workflow.add_row();
        draft.workflow.set_step(1, "Orphan step").unwrap();

        let payload = draft.build().unwrap();
        assert_eq!(payload.workflow.len(), 1);
        assert_eq!(payload.workflow[0].step, "Design");
    }

    #[test]
    fn test_set_primary_clears_all_others() {
        let mut draft = filled_draft();
        draft.add_images(vec![
            image("/a.png", true),
            image("/b.png", false),
            image("/c.png", false),
        ]);

        draft.set_primary_image(2).unwrap();
        assert!(!draft.images[0].is_primary);
        assert!(!draft.images[1].is_primary);
        assert!(draft.images[2].is_primary);
    }

    #[test]
    fn test_add_images_keeps_single_primary() {
        let mut draft = filled_draft();
        draft.add_images(vec![image("/a.png", true)]);
        draft.add_images(vec![image("/b.png", true)]);
        let primaries = draft.images.iter().filter(|i| i.is_primary).count();
        assert_eq!(primaries, 1);
        assert!(draft.images[0].is_primary);
    }

    #[test]
    fn test_remove_image_out_of_bounds() {
        let mut draft = filled_draft();
        assert!(draft.remove_image(0).is_err());
    }

    #[test]
    fn test_from_project_round_trips_lists() {
        let project: Project = serde_json::from_value(serde_json::json!({
            "_id": "p1",
            "name": "Shop",
            "description": "Storefront",
            "detailedDescription": "Detail",
            "category": "web",
            "duration": "2 weeks",
            "price": 9000,
            "technologies": { "frontend": ["React"], "backend": ["Axum"] },
            "features": ["Cart"],
            "workflow": [{ "step": "Design", "description": "Mockups" }],
        }))
        .unwrap();

        let draft = ProjectDraft::from_project(&project);
        assert_eq!(draft.price, "9000");
        assert_eq!(draft.technologies.frontend.slots(), &["React".to_string()]);
        // Empty groups still get an editable slot.
        assert_eq!(draft.technologies.database.len(), 1);

        let payload = draft.build().unwrap();
        assert_eq!(payload.price, 9000);
        assert_eq!(payload.workflow.len(), 1);
    }
}
