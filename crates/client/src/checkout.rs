//! External checkout seam.
//!
//! The real checkout is a third-party widget loaded outside this
//! process; [`CheckoutGateway`] is the trait boundary the payment flow
//! hands off to. An implementation resolves to exactly one
//! [`CheckoutOutcome`]; dismissing the checkout without a gateway
//! decision is its own outcome, distinct from failure.

use async_trait::async_trait;
use serde::Serialize;

use crate::payments::{GatewayConfirmation, OrderDetails};

/// Accent used by the hosted checkout.
pub const CHECKOUT_THEME_COLOR: &str = "#0ea5e9";

/// Payment methods enabled in the checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckoutMethod {
    Card,
    Netbanking,
    Upi,
    Wallet,
}

/// All supported methods, in display order.
pub const CHECKOUT_METHODS: &[CheckoutMethod] = &[
    CheckoutMethod::Card,
    CheckoutMethod::Netbanking,
    CheckoutMethod::Upi,
    CheckoutMethod::Wallet,
];

/// Payer details prefilled into the checkout.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CheckoutPrefill {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
}

/// Everything the external checkout is invoked with.
#[derive(Debug, Clone, Serialize)]
pub struct CheckoutRequest {
    pub key: String,
    /// Amount in minor units (paise).
    pub amount: i64,
    pub currency: String,
    pub order_id: String,
    /// Display name (the project being paid for).
    pub name: String,
    pub prefill: CheckoutPrefill,
    pub theme_color: String,
    pub methods: Vec<CheckoutMethod>,
}

impl CheckoutRequest {
    /// Assemble the checkout invocation from a created order.
    pub fn from_order(order: &OrderDetails, prefill: CheckoutPrefill) -> Self {
        Self {
            key: order.key.clone(),
            amount: order.amount,
            currency: order.currency.clone(),
            order_id: order.order_id.clone(),
            name: order.project_name.clone(),
            prefill,
            theme_color: CHECKOUT_THEME_COLOR.to_string(),
            methods: CHECKOUT_METHODS.to_vec(),
        }
    }
}

/// How a checkout invocation resolved.
#[derive(Debug, Clone)]
pub enum CheckoutOutcome {
    /// The gateway reported success and issued identifiers to verify.
    Completed(GatewayConfirmation),
    /// The gateway reported a failure with a description.
    Failed(String),
    /// The checkout was closed without a gateway decision.
    Dismissed,
}

/// The external checkout boundary.
#[async_trait]
pub trait CheckoutGateway: Send + Sync {
    /// Open the checkout for the given order and resolve its outcome.
    async fn open(&self, request: &CheckoutRequest) -> CheckoutOutcome;
}
