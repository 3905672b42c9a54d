//! Request submission drafts: catalog requests, custom-project requests,
//! and the guest contact block shared by both.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::payment::PaymentOption;
use crate::project::Category;
use crate::request::ClientType;
use crate::types::{Amount, EntityId};

use super::{optional, DraftError};

/// Contact details a guest must supply with a request. Name and email
/// are mandatory and validated before any network call.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct GuestContact {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_number: Option<String>,
}

/// Custom-project request form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomProjectDraft {
    pub name: String,
    pub description: String,
    pub requirements: String,
    pub category: Category,
    /// Free text; coerced to a number on build, zero when blank.
    pub estimated_budget: String,
    pub timeline: String,
}

/// Validated custom-project body embedded in `POST /requests`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomProjectPayload {
    pub name: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requirements: Option<String>,
    pub category: Category,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_budget: Option<Amount>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeline: Option<String>,
    pub estimated_price: Amount,
}

impl CustomProjectDraft {
    /// Validate the form and produce the embedded payload. The budget is
    /// optional; when present it doubles as the initial estimated price.
    pub fn build(&self) -> Result<CustomProjectPayload, DraftError> {
        let mut errors = DraftError::default();

        if self.name.trim().is_empty() {
            errors.push("name", "name is required");
        }
        if self.description.trim().is_empty() {
            errors.push("description", "description is required");
        }

        let estimated_budget = match self.estimated_budget.trim() {
            "" => None,
            text => match text.parse::<Amount>() {
                Ok(budget) if budget >= 0 => Some(budget),
                _ => {
                    errors.push("estimatedBudget", "must be a number");
                    None
                }
            },
        };

        let payload = CustomProjectPayload {
            name: self.name.trim().to_string(),
            description: self.description.trim().to_string(),
            requirements: optional(&self.requirements),
            category: self.category,
            estimated_budget,
            timeline: optional(&self.timeline),
            estimated_price: estimated_budget.unwrap_or(0),
        };

        errors.into_result(payload)
    }
}

/// Body for `POST /requests`: exactly one of a catalog reference or an
/// embedded custom project, plus the requester identity.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<EntityId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_project: Option<CustomProjectPayload>,
    pub client_type: ClientType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guest_info: Option<GuestContact>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_option: Option<PaymentOption>,
}

impl NewRequest {
    /// Request a catalog project as a registered user.
    pub fn catalog(project_id: EntityId) -> Self {
        Self {
            project_id: Some(project_id),
            custom_project: None,
            client_type: ClientType::Registered,
            guest_info: None,
            payment_option: None,
        }
    }

    /// Request a custom project as a registered user. Custom requests
    /// default to the advance payment option.
    pub fn custom(payload: CustomProjectPayload) -> Self {
        Self {
            project_id: None,
            custom_project: Some(payload),
            client_type: ClientType::Registered,
            guest_info: None,
            payment_option: Some(PaymentOption::Advance),
        }
    }

    /// Mark the request as coming from a guest with the given contact
    /// details.
    pub fn as_guest(mut self, contact: GuestContact) -> Self {
        self.client_type = ClientType::Guest;
        self.guest_info = Some(contact);
        self
    }

    /// Client-side validation run before submission.
    pub fn validate(&self) -> Result<(), DraftError> {
        let mut errors = DraftError::default();

        match (&self.project_id, &self.custom_project) {
            (None, None) => errors.push("request", "a project or a custom project is required"),
            (Some(_), Some(_)) => {
                errors.push("request", "choose either a catalog or a custom project")
            }
            _ => {}
        }

        match self.client_type {
            ClientType::Guest => match &self.guest_info {
                None => errors.push("guestInfo", "guest details are required"),
                Some(contact) => {
                    if let Err(shape_errors) = contact.validate() {
                        let shape: DraftError = shape_errors.into();
                        errors.fields.extend(shape.fields);
                    }
                }
            },
            ClientType::Registered => {}
        }

        errors.into_result(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn custom_payload() -> CustomProjectPayload {
        CustomProjectDraft {
            name: "Inventory tracker".into(),
            description: "Stock levels across warehouses".into(),
            ..Default::default()
        }
        .build()
        .unwrap()
    }

    #[test]
    fn test_custom_draft_requires_name_and_description() {
        let err = CustomProjectDraft::default().build().unwrap_err();
        assert!(err.contains_field("name"));
        assert!(err.contains_field("description"));
    }

    #[test]
    fn test_blank_budget_coerces_to_zero_price() {
        let payload = custom_payload();
        assert!(payload.estimated_budget.is_none());
        assert_eq!(payload.estimated_price, 0);
    }

    #[test]
    fn test_budget_sets_estimated_price() {
        let payload = CustomProjectDraft {
            name: "Tracker".into(),
            description: "Desc".into(),
            estimated_budget: "50000".into(),
            ..Default::default()
        }
        .build()
        .unwrap();
        assert_eq!(payload.estimated_budget, Some(50000));
        assert_eq!(payload.estimated_price, 50000);
    }

    #[test]
    fn test_non_numeric_budget_rejected() {
        let err = CustomProjectDraft {
            name: "Tracker".into(),
            description: "Desc".into(),
            estimated_budget: "a lot".into(),
            ..Default::default()
        }
        .build()
        .unwrap_err();
        assert!(err.contains_field("estimatedBudget"));
    }

    #[test]
    fn test_guest_request_requires_email() {
        let request = NewRequest::catalog("p1".into()).as_guest(GuestContact {
            name: "Asha".into(),
            email: String::new(),
            contact_number: None,
        });
        let err = request.validate().unwrap_err();
        assert!(err.contains_field("email"));
    }

    #[test]
    fn test_guest_request_rejects_malformed_email() {
        let request = NewRequest::catalog("p1".into()).as_guest(GuestContact {
            name: "Asha".into(),
            email: "not-an-email".into(),
            contact_number: None,
        });
        assert!(request.validate().unwrap_err().contains_field("email"));
    }

    #[test]
    fn test_valid_guest_request_passes() {
        let request = NewRequest::catalog("p1".into()).as_guest(GuestContact {
            name: "Asha".into(),
            email: "asha@example.com".into(),
            contact_number: Some("9876543210".into()),
        });
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_registered_request_needs_no_guest_info() {
        assert!(NewRequest::catalog("p1".into()).validate().is_ok());
    }

    #[test]
    fn test_request_needs_exactly_one_target() {
        let mut request = NewRequest::catalog("p1".into());
        request.custom_project = Some(custom_payload());
        assert!(request.validate().is_err());

        request.project_id = None;
        request.custom_project = None;
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_custom_request_defaults_to_advance_option() {
        let request = NewRequest::custom(custom_payload());
        assert_eq!(request.payment_option, Some(PaymentOption::Advance));
    }

    #[test]
    fn test_wire_shape_skips_absent_fields() {
        let request = NewRequest::catalog("p1".into());
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["projectId"], "p1");
        assert_eq!(value["clientType"], "registered");
        assert!(value.get("customProject").is_none());
        assert!(value.get("guestInfo").is_none());
    }
}
