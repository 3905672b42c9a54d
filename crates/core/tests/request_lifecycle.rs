//! Integration tests for the request lifecycle: wire-format parsing,
//! admin transitions, and ledger-derived payment status working
//! together on one request.

use devmart_core::payment::{Payment, PaymentState, PaymentStatus, PaymentType};
use devmart_core::request::{Request, RequestStatus};

// ---------------------------------------------------------------------------
// Fixture: a populated catalog request as the API would serve it
// ---------------------------------------------------------------------------

fn catalog_request() -> Request {
    serde_json::from_value(serde_json::json!({
        "_id": "req_1",
        "clientType": "registered",
        "project": {
            "_id": "proj_1",
            "name": "E-commerce Website",
            "description": "Full storefront with checkout",
            "category": "web",
            "duration": "2-3 weeks",
            "price": 15000,
            "technologies": {
                "frontend": ["React", "Tailwind"],
                "backend": ["Node", "Express"],
                "database": ["MongoDB"],
            },
            "images": [
                { "url": "/uploads/a.png", "isPrimary": false },
                { "url": "/uploads/b.png", "isPrimary": true },
            ],
        },
        "status": "pending",
        "paymentStatus": "pending",
        "estimatedPrice": 15000,
        "statusHistory": [],
    }))
    .expect("request fixture should parse")
}

fn completed_payment(payment_type: PaymentType, amount: i64) -> Payment {
    Payment {
        payment_type,
        amount,
        status: PaymentState::Completed,
        paid_at: Some(chrono::Utc::now()),
        order_id: Some("order_fixture".into()),
        payment_id: Some("pay_fixture".into()),
    }
}

// ---------------------------------------------------------------------------
// Test: delivery lifecycle driven by admin edits
// ---------------------------------------------------------------------------

/// A request walks the full forward path, accumulating history, and the
/// terminal state refuses any further edit.
#[test]
fn full_delivery_lifecycle() {
    let mut request = catalog_request();

    request
        .apply_transition(RequestStatus::Approved, Some("scoped and priced".into()))
        .expect("pending -> approved");
    request
        .apply_transition(RequestStatus::InProgress, None)
        .expect("approved -> in-progress");
    request
        .apply_transition(RequestStatus::Completed, Some("delivered".into()))
        .expect("in-progress -> completed");

    assert_eq!(request.status, RequestStatus::Completed);
    assert_eq!(request.status_history.len(), 3);

    for to in [
        RequestStatus::Pending,
        RequestStatus::Approved,
        RequestStatus::InProgress,
        RequestStatus::Rejected,
    ] {
        assert!(
            request.apply_transition(to, None).is_err(),
            "completed -> {to} must be rejected"
        );
    }
}

/// Rejection diverts only from pending or approved.
#[test]
fn rejection_is_terminal_and_early_only() {
    let mut request = catalog_request();
    request
        .apply_transition(RequestStatus::Rejected, Some("out of scope".into()))
        .expect("pending -> rejected");
    assert!(request
        .apply_transition(RequestStatus::Approved, None)
        .is_err());

    let mut in_progress = catalog_request();
    in_progress
        .apply_transition(RequestStatus::InProgress, None)
        .expect("forward skip");
    assert!(in_progress
        .apply_transition(RequestStatus::Rejected, None)
        .is_err());
}

// ---------------------------------------------------------------------------
// Test: payment ledger drives the request-level payment status
// ---------------------------------------------------------------------------

/// Advance then remaining payment take the ledger from pending through
/// partial to completed, with amounts matching the 70% split.
#[test]
fn ledger_walks_pending_partial_completed() {
    let mut request = catalog_request();
    assert_eq!(request.payment_status, PaymentStatus::Pending);
    assert_eq!(request.total_amount(), 15000);

    let advance = request.payable_amount(PaymentType::Advance);
    assert_eq!(advance, 10500);
    request.apply_completed_payment(completed_payment(PaymentType::Advance, advance));
    assert_eq!(request.payment_status, PaymentStatus::Partial);

    let remaining = request.payable_amount(PaymentType::Remaining);
    assert_eq!(remaining, 4500);
    request.apply_completed_payment(completed_payment(PaymentType::Remaining, remaining));
    assert_eq!(request.payment_status, PaymentStatus::Completed);
    assert_eq!(request.total_paid(), request.total_amount());
}

/// The admin-set actual price supersedes the estimate for every derived
/// amount, including a remaining payment after a partial ledger.
#[test]
fn actual_price_rebases_amounts() {
    let mut request = catalog_request();
    request.apply_completed_payment(completed_payment(PaymentType::Advance, 10500));

    request.actual_price = Some(20000);
    request.recompute_payment_status();

    assert_eq!(request.total_amount(), 20000);
    assert_eq!(request.payment_status, PaymentStatus::Partial);
    assert_eq!(request.payable_amount(PaymentType::Remaining), 9500);
}

/// The server view wins on refetch: replacing the local entity drops any
/// optimistic bookkeeping.
#[test]
fn refetch_is_authoritative() {
    let mut local = catalog_request();
    local.apply_completed_payment(completed_payment(PaymentType::Full, 15000));
    assert_eq!(local.payment_status, PaymentStatus::Completed);

    // Server never saw the payment (e.g. verification raced the poll).
    let server_view = catalog_request();
    local = server_view;
    assert_eq!(local.payment_status, PaymentStatus::Pending);
    assert!(local.payments.is_empty());
}

// ---------------------------------------------------------------------------
// Test: fixture parsing details
// ---------------------------------------------------------------------------

/// The populated catalog reference keeps its primary image flag and the
/// request title resolves through it.
#[test]
fn fixture_wire_shape() {
    let request = catalog_request();
    assert_eq!(request.title(), "E-commerce Website");

    let project = request.project.as_ref().expect("catalog reference");
    let primary = project.primary_image().expect("primary image");
    assert_eq!(primary.url, "/uploads/b.png");
}
