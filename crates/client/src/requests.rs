//! Request endpoints: listing, creation, and admin edits.
//!
//! Creation validates the draft client-side before any network call;
//! admin edits are checked against the status machine when the caller
//! holds the current request.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use devmart_core::draft::NewRequest;
use devmart_core::payment::PaymentOption;
use devmart_core::request::{validate_transition, Request, RequestStatus};
use devmart_core::types::{Amount, EntityId};

use crate::error::ClientResult;
use crate::gateway::ApiGateway;

#[derive(Debug, Deserialize)]
struct RequestsEnvelope {
    requests: Vec<Request>,
}

#[derive(Debug, Deserialize)]
struct RequestEnvelope {
    request: Request,
}

/// Admin patch for `PUT /requests/:id`. Absent fields are left
/// untouched server-side.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<RequestStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_module: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual_price: Option<Amount>,
}

/// Request endpoint wrappers.
pub struct RequestsApi {
    gateway: Arc<ApiGateway>,
}

impl RequestsApi {
    pub fn new(gateway: Arc<ApiGateway>) -> Self {
        Self { gateway }
    }

    /// `GET /requests` - every request (admin view).
    pub async fn list_all(&self) -> ClientResult<Vec<Request>> {
        let envelope: RequestsEnvelope = self.gateway.get_json("/requests").await?;
        Ok(envelope.requests)
    }

    /// `GET /requests/my` - the authenticated user's requests.
    pub async fn list_mine(&self) -> ClientResult<Vec<Request>> {
        let envelope: RequestsEnvelope = self.gateway.get_json("/requests/my").await?;
        Ok(envelope.requests)
    }

    /// `POST /requests`. The draft is validated locally first; a guest
    /// request without name or email never reaches the network.
    pub async fn create(&self, new_request: &NewRequest) -> ClientResult<Request> {
        new_request.validate()?;
        let envelope: RequestEnvelope = self.gateway.post_json("/requests", new_request).await?;
        Ok(envelope.request)
    }

    /// `PUT /requests/:id` (admin). When the caller holds the current
    /// request, a status change is validated against the lifecycle
    /// before the call is issued; the server re-validates regardless.
    pub async fn update(
        &self,
        current: Option<&Request>,
        id: &EntityId,
        patch: &RequestPatch,
    ) -> ClientResult<Request> {
        if let (Some(current), Some(to)) = (current, patch.status) {
            validate_transition(current.status, to)
                .map_err(|err| devmart_core::draft::DraftError {
                    fields: vec![devmart_core::draft::FieldError {
                        field: "status".into(),
                        message: err.to_string(),
                    }],
                })?;
        }

        let envelope: RequestEnvelope = self
            .gateway
            .put_json(&format!("/requests/{id}"), patch)
            .await?;
        Ok(envelope.request)
    }

    /// `PUT /requests/:id/payment-option` - record the payment option
    /// chosen once the request is approved.
    pub async fn set_payment_option(
        &self,
        id: &EntityId,
        option: PaymentOption,
    ) -> ClientResult<Request> {
        let body = serde_json::json!({ "paymentOption": option });
        let envelope: RequestEnvelope = self
            .gateway
            .put_json(&format!("/requests/{id}/payment-option"), &body)
            .await?;
        Ok(envelope.request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patch_skips_absent_fields() {
        let patch = RequestPatch {
            status: Some(RequestStatus::Approved),
            actual_price: Some(12000),
            ..Default::default()
        };
        let value = serde_json::to_value(&patch).unwrap();
        assert_eq!(value["status"], "approved");
        assert_eq!(value["actualPrice"], 12000);
        assert!(value.get("adminNotes").is_none());
        assert!(value.get("githubLink").is_none());
    }
}
