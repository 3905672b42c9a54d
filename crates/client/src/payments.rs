//! Payment endpoints: order creation, signature verification, and the
//! status reconciliation probe.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use devmart_core::payment::{Payment, PaymentState, PaymentType};
use devmart_core::types::Amount;

use crate::error::ClientResult;
use crate::gateway::ApiGateway;

/// Response of `POST /payments/create-order`: everything the external
/// checkout needs, plus display metadata.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetails {
    pub order_id: String,
    /// Public gateway key for the checkout widget.
    pub key: String,
    /// Amount in minor units (paise), exactly as the gateway expects.
    pub amount: i64,
    pub currency: String,
    pub project_name: String,
    pub user_name: String,
}

/// Identifiers and signature issued by the gateway on checkout success.
/// Field names match the gateway wire format verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfirmation {
    pub razorpay_order_id: String,
    pub razorpay_payment_id: String,
    pub razorpay_signature: String,
}

#[derive(Debug, Deserialize)]
struct VerifyEnvelope {
    message: Option<String>,
    #[serde(default)]
    payment: Option<Payment>,
}

/// Server-side verification result.
#[derive(Debug)]
pub struct VerifyOutcome {
    pub message: String,
    /// The recorded ledger entry, when the server echoes it back.
    pub payment: Option<Payment>,
}

/// Response of `GET /payments/status/:paymentId`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentStatusSnapshot {
    pub status: PaymentState,
    #[serde(default)]
    pub amount: Option<Amount>,
    #[serde(default)]
    pub paid_at: Option<DateTime<Utc>>,
}

/// Payment endpoint wrappers.
pub struct PaymentsApi {
    gateway: Arc<ApiGateway>,
}

impl PaymentsApi {
    pub fn new(gateway: Arc<ApiGateway>) -> Self {
        Self { gateway }
    }

    /// `POST /payments/create-order`.
    pub async fn create_order(
        &self,
        request_id: &str,
        payment_type: PaymentType,
    ) -> ClientResult<OrderDetails> {
        let body = serde_json::json!({
            "requestId": request_id,
            "paymentType": payment_type,
        });
        let order: OrderDetails = self
            .gateway
            .post_json("/payments/create-order", &body)
            .await?;
        Ok(order)
    }

    /// `POST /payments/verify`. The server must confirm the gateway
    /// signature before a payment may be treated as completed.
    pub async fn verify(&self, confirmation: &GatewayConfirmation) -> ClientResult<VerifyOutcome> {
        let envelope: VerifyEnvelope = self
            .gateway
            .post_json("/payments/verify", confirmation)
            .await?;
        Ok(VerifyOutcome {
            message: envelope
                .message
                .unwrap_or_else(|| "Payment verified".to_string()),
            payment: envelope.payment,
        })
    }

    /// `GET /payments/status/:paymentId` - best-effort reconciliation
    /// probe used by the bounded status poll.
    pub async fn status(&self, payment_id: &str) -> ClientResult<PaymentStatusSnapshot> {
        let snapshot: PaymentStatusSnapshot = self
            .gateway
            .get_json(&format!("/payments/status/{payment_id}"))
            .await?;
        Ok(snapshot)
    }
}
