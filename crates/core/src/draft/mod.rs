//! In-memory form drafts.
//!
//! Each draft mirrors the shape of the entity it will submit. Array-valued
//! fields are backed by [`SlotList`] (ordered, indexable, always at least
//! one editable slot); building a draft filters blank entries and runs
//! field-level validation, collecting every problem into a [`DraftError`]
//! before any network call is issued.

mod project;
mod request;

pub use project::{
    ProjectDraft, ProjectPayload, TechCategory, TechnologiesDraft, WorkflowDraft,
    WorkflowStepDraft,
};
pub use request::{CustomProjectDraft, CustomProjectPayload, GuestContact, NewRequest};

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Validation failures collected across a draft. Surfaced inline per
/// field by the view layer; nothing is submitted while this is non-empty.
#[derive(Debug, Clone, Default)]
pub struct DraftError {
    pub fields: Vec<FieldError>,
}

impl DraftError {
    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.fields.push(FieldError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// `Ok(value)` when no field failed, else `Err(self)`.
    pub fn into_result<T>(self, value: T) -> Result<T, DraftError> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }

    pub fn contains_field(&self, field: &str) -> bool {
        self.fields.iter().any(|f| f.field == field)
    }
}

impl std::fmt::Display for DraftError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for err in &self.fields {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", err.field, err.message)?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for DraftError {}

impl From<validator::ValidationErrors> for DraftError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut draft = DraftError::default();
        for (field, errs) in errors.field_errors() {
            for err in errs.iter() {
                let message = err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("failed {} check", err.code));
                draft.push(field.to_string(), message);
            }
        }
        draft
    }
}

/// Ordered list of editable text slots backing a dynamic form field.
///
/// The list never drops below one slot: removing the last remaining slot
/// clears it instead. Blank slots are filtered out by [`cleaned`].
///
/// [`cleaned`]: SlotList::cleaned
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct SlotList {
    slots: Vec<String>,
}

impl SlotList {
    /// A list with a single empty slot.
    pub fn new() -> Self {
        Self {
            slots: vec![String::new()],
        }
    }

    /// Seed the list from existing values, keeping one empty slot when
    /// there is nothing to edit yet.
    pub fn from_values(values: Vec<String>) -> Self {
        if values.is_empty() {
            Self::new()
        } else {
            Self { slots: values }
        }
    }

    /// Append a fresh empty slot.
    pub fn add_slot(&mut self) {
        self.slots.push(String::new());
    }

    /// Replace the value at `index`.
    pub fn set(&mut self, index: usize, value: impl Into<String>) -> Result<(), CoreError> {
        let len = self.slots.len();
        let slot = self
            .slots
            .get_mut(index)
            .ok_or(CoreError::IndexOutOfBounds {
                field: "list",
                index,
                len,
            })?;
        *slot = value.into();
        Ok(())
    }

    /// Remove the slot at `index`. Removing the only slot clears it so
    /// the form always keeps one editable entry.
    pub fn remove(&mut self, index: usize) -> Result<(), CoreError> {
        let len = self.slots.len();
        if index >= len {
            return Err(CoreError::IndexOutOfBounds {
                field: "list",
                index,
                len,
            });
        }
        if len == 1 {
            self.slots[0].clear();
        } else {
            self.slots.remove(index);
        }
        Ok(())
    }

    pub fn slots(&self) -> &[String] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Trimmed, non-blank values in order - what actually gets submitted.
    pub fn cleaned(&self) -> Vec<String> {
        self.slots
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }
}

impl Default for SlotList {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Vec<String>> for SlotList {
    fn from(values: Vec<String>) -> Self {
        Self::from_values(values)
    }
}

impl From<SlotList> for Vec<String> {
    fn from(list: SlotList) -> Self {
        list.slots
    }
}

/// Trim a free-text field to `None` when blank.
pub(crate) fn optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_new_list_has_one_empty_slot() {
        let list = SlotList::new();
        assert_eq!(list.slots(), &[String::new()]);
        assert!(list.cleaned().is_empty());
    }

    #[test]
    fn test_set_and_add_preserve_order() {
        let mut list = SlotList::new();
        list.set(0, "React").unwrap();
        list.add_slot();
        list.set(1, "Vite").unwrap();
        assert_eq!(list.cleaned(), vec!["React", "Vite"]);
    }

    #[test]
    fn test_remove_keeps_at_least_one_slot() {
        let mut list = SlotList::from_values(vec!["only".into()]);
        list.remove(0).unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list.slots()[0], "");
    }

    #[test]
    fn test_remove_at_index() {
        let mut list = SlotList::from_values(vec!["a".into(), "b".into(), "c".into()]);
        list.remove(1).unwrap();
        assert_eq!(list.cleaned(), vec!["a", "c"]);
    }

    #[test]
    fn test_out_of_bounds_operations_fail() {
        let mut list = SlotList::new();
        assert_matches!(list.set(5, "x"), Err(CoreError::IndexOutOfBounds { .. }));
        assert_matches!(list.remove(5), Err(CoreError::IndexOutOfBounds { .. }));
    }

    #[test]
    fn test_cleaned_filters_blank_and_whitespace() {
        let list = SlotList::from_values(vec!["  React ".into(), "   ".into(), "".into()]);
        assert_eq!(list.cleaned(), vec!["React"]);
    }

    #[test]
    fn test_draft_error_display_joins_fields() {
        let mut err = DraftError::default();
        err.push("name", "name is required");
        err.push("price", "must be a number");
        assert_eq!(err.to_string(), "name: name is required; price: must be a number");
    }
}
