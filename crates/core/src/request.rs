//! Request lifecycle: the status machine and the request entity.
//!
//! A request moves `pending -> approved -> in-progress -> completed`,
//! with `pending -> rejected` and `approved -> rejected` as the only
//! diverting edges. Forward skips are permitted (an admin may move an
//! approved request straight to completed); nothing leaves `completed`
//! or `rejected`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::payment::{self, Payment, PaymentOption, PaymentStatus};
use crate::project::{Category, Project};
use crate::types::{Amount, EntityId};

/// Where a request came from: an authenticated account or a guest
/// identified only by submitted contact details.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClientType {
    Registered,
    Guest,
}

/// Delivery status of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RequestStatus {
    Pending,
    Approved,
    InProgress,
    Completed,
    Rejected,
}

impl RequestStatus {
    /// Position on the forward path. `Rejected` is off-path.
    fn rank(self) -> Option<u8> {
        match self {
            RequestStatus::Pending => Some(0),
            RequestStatus::Approved => Some(1),
            RequestStatus::InProgress => Some(2),
            RequestStatus::Completed => Some(3),
            RequestStatus::Rejected => None,
        }
    }

    /// Terminal states admit no further transitions.
    pub fn is_terminal(self) -> bool {
        matches!(self, RequestStatus::Completed | RequestStatus::Rejected)
    }

    /// Whether the lifecycle permits moving from `self` to `to`.
    pub fn can_transition(self, to: RequestStatus) -> bool {
        if self.is_terminal() {
            return false;
        }
        match to {
            // Rejection is only reachable before work starts.
            RequestStatus::Rejected => {
                matches!(self, RequestStatus::Pending | RequestStatus::Approved)
            }
            _ => match (self.rank(), to.rank()) {
                (Some(from), Some(to)) => to > from,
                _ => false,
            },
        }
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Approved => "approved",
            RequestStatus::InProgress => "in-progress",
            RequestStatus::Completed => "completed",
            RequestStatus::Rejected => "rejected",
        };
        f.write_str(label)
    }
}

/// Validate a status change, returning the domain error used across the
/// client when an admin edit would break the lifecycle.
pub fn validate_transition(from: RequestStatus, to: RequestStatus) -> Result<(), CoreError> {
    if from.can_transition(to) {
        Ok(())
    } else {
        Err(CoreError::InvalidTransition { from, to })
    }
}

/// One entry of the append-only status history.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusEntry {
    pub status: RequestStatus,
    #[serde(default)]
    pub notes: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// Free-form specification embedded in a request that references no
/// catalog project.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomProject {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub requirements: Option<String>,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub estimated_budget: Option<Amount>,
    #[serde(default)]
    pub timeline: Option<String>,
}

/// Contact details identifying a guest requester.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestInfo {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub contact_number: Option<String>,
}

/// A client's engagement with a catalog or custom project.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    #[serde(rename = "_id")]
    pub id: EntityId,
    pub client_type: ClientType,
    /// Populated catalog reference; absent for custom requests.
    #[serde(default)]
    pub project: Option<Project>,
    #[serde(default)]
    pub custom_project: Option<CustomProject>,
    #[serde(default)]
    pub guest_info: Option<GuestInfo>,
    pub status: RequestStatus,
    #[serde(default)]
    pub payment_option: Option<PaymentOption>,
    pub payment_status: PaymentStatus,
    #[serde(default)]
    pub estimated_price: Option<Amount>,
    /// Authoritative price once set by an admin.
    #[serde(default)]
    pub actual_price: Option<Amount>,
    #[serde(default)]
    pub payments: Vec<Payment>,
    #[serde(default)]
    pub status_history: Vec<StatusEntry>,
    #[serde(default)]
    pub admin_notes: Option<String>,
    #[serde(default)]
    pub current_module: Option<String>,
    #[serde(default)]
    pub github_link: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Request {
    /// Display title: catalog project name, else custom project name.
    pub fn title(&self) -> &str {
        self.project
            .as_ref()
            .map(|p| p.name.as_str())
            .or_else(|| self.custom_project.as_ref().map(|c| c.name.as_str()))
            .unwrap_or("(untitled request)")
    }

    /// The amount everything is computed against: the admin-set actual
    /// price once present, else the estimate, else zero.
    pub fn total_amount(&self) -> Amount {
        self.actual_price.or(self.estimated_price).unwrap_or(0)
    }

    /// Sum of completed ledger entries.
    pub fn total_paid(&self) -> Amount {
        payment::total_paid(&self.payments)
    }

    /// Amount owed for a payment of the given type right now.
    pub fn payable_amount(&self, payment_type: crate::payment::PaymentType) -> Amount {
        payment::compute_amount(payment_type, self.total_amount(), &self.payments)
    }

    /// Recompute `payment_status` from the ledger. Called after every
    /// payment-affecting operation; the server value wins again on the
    /// next full refetch.
    pub fn recompute_payment_status(&mut self) {
        self.payment_status = payment::derive_status(self.total_amount(), &self.payments);
    }

    /// Optimistically record a completed payment and re-derive the
    /// payment status without waiting for a refetch.
    pub fn apply_completed_payment(&mut self, payment: Payment) {
        self.payments.push(payment);
        self.recompute_payment_status();
    }

    /// Apply an admin status change, validating the lifecycle and
    /// appending to the history log.
    pub fn apply_transition(
        &mut self,
        to: RequestStatus,
        notes: Option<String>,
    ) -> Result<(), CoreError> {
        validate_transition(self.status, to)?;
        self.status = to;
        self.status_history.push(StatusEntry {
            status: to,
            notes,
            timestamp: Utc::now(),
        });
        Ok(())
    }
}

/// Case-insensitive title filter backing the dashboard search box.
pub fn filter_by_title<'a>(requests: &'a [Request], query: &str) -> Vec<&'a Request> {
    let needle = query.to_lowercase();
    requests
        .iter()
        .filter(|r| r.title().to_lowercase().contains(&needle))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payment::{PaymentState, PaymentType};
    use assert_matches::assert_matches;

    fn request(status: RequestStatus) -> Request {
        serde_json::from_value(serde_json::json!({
            "_id": "r1",
            "clientType": "registered",
            "customProject": {
                "name": "Inventory tracker",
                "description": "Stock levels across warehouses",
            },
            "status": status,
            "paymentStatus": "pending",
            "estimatedPrice": 10000,
        }))
        .expect("request JSON should parse")
    }

    #[test]
    fn test_forward_transitions_accepted() {
        use RequestStatus::*;
        assert!(Pending.can_transition(Approved));
        assert!(Approved.can_transition(InProgress));
        assert!(InProgress.can_transition(Completed));
        // Forward skips are monotonic and allowed.
        assert!(Pending.can_transition(InProgress));
        assert!(Approved.can_transition(Completed));
    }

    #[test]
    fn test_rejection_edges() {
        use RequestStatus::*;
        assert!(Pending.can_transition(Rejected));
        assert!(Approved.can_transition(Rejected));
        assert!(!InProgress.can_transition(Rejected));
    }

    #[test]
    fn test_no_transition_out_of_terminal_states() {
        use RequestStatus::*;
        for to in [Pending, Approved, InProgress, Completed, Rejected] {
            assert!(!Completed.can_transition(to), "completed -> {to} must fail");
            assert!(!Rejected.can_transition(to), "rejected -> {to} must fail");
        }
    }

    #[test]
    fn test_backward_and_same_state_rejected() {
        use RequestStatus::*;
        assert!(!Approved.can_transition(Pending));
        assert!(!InProgress.can_transition(Approved));
        assert!(!Pending.can_transition(Pending));
    }

    #[test]
    fn test_apply_transition_appends_history() {
        let mut req = request(RequestStatus::Pending);
        req.apply_transition(RequestStatus::Approved, Some("looks good".into()))
            .expect("pending -> approved should succeed");
        assert_eq!(req.status, RequestStatus::Approved);
        assert_eq!(req.status_history.len(), 1);
        assert_eq!(req.status_history[0].notes.as_deref(), Some("looks good"));

        let err = req
            .apply_transition(RequestStatus::Pending, None)
            .unwrap_err();
        assert_matches!(err, CoreError::InvalidTransition { .. });
        // Failed transitions leave the entity untouched.
        assert_eq!(req.status, RequestStatus::Approved);
        assert_eq!(req.status_history.len(), 1);
    }

    #[test]
    fn test_total_amount_prefers_actual_price() {
        let mut req = request(RequestStatus::Approved);
        assert_eq!(req.total_amount(), 10000);
        req.actual_price = Some(12000);
        assert_eq!(req.total_amount(), 12000);
    }

    #[test]
    fn test_apply_completed_payment_rederives_status() {
        let mut req = request(RequestStatus::Approved);
        req.apply_completed_payment(Payment {
            payment_type: PaymentType::Advance,
            amount: 7000,
            status: PaymentState::Completed,
            paid_at: Some(Utc::now()),
            order_id: Some("order_1".into()),
            payment_id: Some("pay_1".into()),
        });
        assert_eq!(req.payment_status, PaymentStatus::Partial);

        req.apply_completed_payment(Payment {
            payment_type: PaymentType::Remaining,
            amount: 3000,
            status: PaymentState::Completed,
            paid_at: Some(Utc::now()),
            order_id: Some("order_2".into()),
            payment_id: Some("pay_2".into()),
        });
        assert_eq!(req.payment_status, PaymentStatus::Completed);
    }

    #[test]
    fn test_payable_amounts_match_ledger() {
        let mut req = request(RequestStatus::Approved);
        assert_eq!(req.payable_amount(PaymentType::Advance), 7000);
        assert_eq!(req.payable_amount(PaymentType::Full), 10000);

        req.apply_completed_payment(Payment {
            payment_type: PaymentType::Advance,
            amount: 7000,
            status: PaymentState::Completed,
            paid_at: Some(Utc::now()),
            order_id: None,
            payment_id: None,
        });
        assert_eq!(req.payable_amount(PaymentType::Remaining), 3000);
    }

    #[test]
    fn test_filter_by_title_is_case_insensitive() {
        let requests = vec![request(RequestStatus::Pending)];
        assert_eq!(filter_by_title(&requests, "INVENTORY").len(), 1);
        assert_eq!(filter_by_title(&requests, "tracker").len(), 1);
        assert!(filter_by_title(&requests, "payroll").is_empty());
    }

    #[test]
    fn test_status_wire_format_is_kebab_case() {
        assert_eq!(
            serde_json::to_string(&RequestStatus::InProgress).unwrap(),
            "\"in-progress\""
        );
    }
}
