//! Catalog project model.
//!
//! Projects are admin-authored and referenced (not owned) by requests.
//! The editable counterpart of these types lives in [`crate::draft`].

use serde::{Deserialize, Serialize};

use crate::types::{Amount, EntityId};

/// Project category shown as a filterable badge in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Web,
    Mobile,
    Desktop,
    AiMl,
    Other,
}

impl Default for Category {
    fn default() -> Self {
        Category::Web
    }
}

/// Technology lists grouped by layer. Any group may be empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Technologies {
    #[serde(default)]
    pub frontend: Vec<String>,
    #[serde(default)]
    pub backend: Vec<String>,
    #[serde(default)]
    pub database: Vec<String>,
    #[serde(default)]
    pub other: Vec<String>,
}

impl Technologies {
    pub fn is_empty(&self) -> bool {
        self.frontend.is_empty()
            && self.backend.is_empty()
            && self.database.is_empty()
            && self.other.is_empty()
    }
}

/// One ordered step of the delivery workflow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowStep {
    pub step: String,
    pub description: String,
}

/// Uploaded image descriptor. At most one image per project carries
/// `is_primary` (enforced by the draft operations).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectImage {
    pub url: String,
    #[serde(default)]
    pub alt: Option<String>,
    #[serde(default)]
    pub is_primary: bool,
}

/// A catalog project as served by `GET /projects`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(rename = "_id")]
    pub id: EntityId,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub detailed_description: Option<String>,
    pub category: Category,
    pub duration: String,
    pub price: Amount,
    #[serde(default)]
    pub demo_url: Option<String>,
    #[serde(default)]
    pub github_url: Option<String>,
    #[serde(default)]
    pub technologies: Technologies,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub workflow: Vec<WorkflowStep>,
    #[serde(default)]
    pub images: Vec<ProjectImage>,
}

impl Project {
    /// The image to show in cards and lists: the one flagged primary,
    /// falling back to the first upload.
    pub fn primary_image(&self) -> Option<&ProjectImage> {
        self.images
            .iter()
            .find(|img| img.is_primary)
            .or_else(|| self.images.first())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(url: &str, primary: bool) -> ProjectImage {
        ProjectImage {
            url: url.to_string(),
            alt: None,
            is_primary: primary,
        }
    }

    #[test]
    fn test_category_wire_format_is_kebab_case() {
        assert_eq!(serde_json::to_string(&Category::AiMl).unwrap(), "\"ai-ml\"");
        let parsed: Category = serde_json::from_str("\"ai-ml\"").unwrap();
        assert_eq!(parsed, Category::AiMl);
    }

    #[test]
    fn test_primary_image_prefers_flagged() {
        let project: Project = serde_json::from_value(serde_json::json!({
            "_id": "p1",
            "name": "Shop",
            "description": "Storefront",
            "category": "web",
            "duration": "2-3 weeks",
            "price": 15000,
        }))
        .expect("minimal project JSON should parse");
        assert!(project.primary_image().is_none());

        let mut with_images = project.clone();
        with_images.images = vec![image("/a.png", false), image("/b.png", true)];
        assert_eq!(with_images.primary_image().unwrap().url, "/b.png");

        with_images.images[1].is_primary = false;
        assert_eq!(with_images.primary_image().unwrap().url, "/a.png");
    }
}
