//! Payment flow controller.
//!
//! An explicit state machine (`select -> processing -> success |
//! failed`) sequences amount display, server-side order creation, the
//! external checkout hand-off, and signature verification. After a
//! verified payment the controller spawns a bounded best-effort status
//! poll that reconciles against the server without ever outliving its
//! owner.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use devmart_core::payment::{Payment, PaymentState, PaymentType};
use devmart_core::request::Request;

use crate::checkout::{CheckoutGateway, CheckoutOutcome, CheckoutPrefill, CheckoutRequest};
use crate::error::{ClientError, ClientResult};
use crate::payments::PaymentsApi;

/// Fixed period of the payment-status poll.
pub const STATUS_POLL_INTERVAL: Duration = Duration::from_secs(3);

/// Total duration after which the poll is torn down regardless of
/// outcome.
pub const STATUS_POLL_WINDOW: Duration = Duration::from_secs(30);

/// Named states of one payment attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowState {
    /// Choosing a payment type; nothing external has been touched.
    Select,
    /// An order exists and the checkout is (about to be) open.
    Processing,
    /// The server confirmed the gateway signature. Terminal for this
    /// attempt.
    Success,
    /// The attempt failed; an explicit retry returns to `Select`.
    Failed { message: String },
}

/// Events that drive [`PaymentFlow`].
#[derive(Debug, Clone)]
pub enum FlowEvent {
    OrderCreated,
    OrderFailed,
    CheckoutFailed(String),
    CheckoutDismissed,
    VerifySucceeded,
    VerifyFailed(String),
    Retry,
}

/// The pure state machine. IO-free so every edge is directly testable;
/// [`PaymentFlowController`] maps call results onto events.
#[derive(Debug)]
pub struct PaymentFlow {
    state: FlowState,
}

impl PaymentFlow {
    pub fn new() -> Self {
        Self {
            state: FlowState::Select,
        }
    }

    pub fn state(&self) -> &FlowState {
        &self.state
    }

    /// Apply an event. Combinations the UI cannot produce are logged
    /// and leave the state unchanged.
    pub fn apply(&mut self, event: FlowEvent) -> &FlowState {
        use FlowEvent::*;
        use FlowState::*;

        let next = match (&self.state, &event) {
            (Select, OrderCreated) => Some(Processing),
            // A failed order creation aborts before the checkout opens.
            (Select, OrderFailed) => Some(Select),
            (Processing, CheckoutDismissed) => Some(Select),
            (Processing, CheckoutFailed(message)) => Some(Failed {
                message: message.clone(),
            }),
            (Processing, VerifySucceeded) => Some(Success),
            (Processing, VerifyFailed(message)) => Some(Failed {
                message: message.clone(),
            }),
            (Failed { .. }, Retry) => Some(Select),
            _ => None,
        };

        match next {
            Some(state) => self.state = state,
            None => {
                tracing::warn!(state = ?self.state, event = ?event, "Ignoring payment flow event");
            }
        }
        &self.state
    }
}

impl Default for PaymentFlow {
    fn default() -> Self {
        Self::new()
    }
}

/// What a finished attempt left behind.
#[derive(Debug)]
pub struct AttemptOutcome {
    pub state: FlowState,
    /// Completed ledger entry for optimistic local bookkeeping, present
    /// only when the attempt reached [`FlowState::Success`].
    pub payment: Option<Payment>,
}

/// Drives one payment attempt end to end against the payments API and
/// an injected checkout gateway.
pub struct PaymentFlowController {
    payments: Arc<PaymentsApi>,
    checkout: Arc<dyn CheckoutGateway>,
    flow: PaymentFlow,
}

impl PaymentFlowController {
    pub fn new(payments: Arc<PaymentsApi>, checkout: Arc<dyn CheckoutGateway>) -> Self {
        Self {
            payments,
            checkout,
            flow: PaymentFlow::new(),
        }
    }

    pub fn state(&self) -> &FlowState {
        self.flow.state()
    }

    /// Explicit retry after a failed attempt.
    pub fn retry(&mut self) {
        self.flow.apply(FlowEvent::Retry);
    }

    /// Run one attempt: create the order, hand off to the checkout,
    /// verify the confirmation. Transport failure during order creation
    /// is returned as an error with the flow still in `Select` (the
    /// checkout is never opened); checkout and verification failures
    /// resolve into the `Failed` state rather than an `Err`.
    pub async fn execute(
        &mut self,
        request: &Request,
        payment_type: PaymentType,
        prefill: CheckoutPrefill,
    ) -> ClientResult<AttemptOutcome> {
        if self.flow.state() != &FlowState::Select {
            tracing::warn!(state = ?self.flow.state(), "Payment attempt ignored outside select");
            return Ok(self.outcome(None));
        }

        let attempt = uuid::Uuid::new_v4();
        tracing::debug!(
            attempt = %attempt,
            request_id = %request.id,
            ?payment_type,
            amount = request.payable_amount(payment_type),
            "Starting payment attempt"
        );

        let order = match self.payments.create_order(&request.id, payment_type).await {
            Ok(order) => {
                self.flow.apply(FlowEvent::OrderCreated);
                order
            }
            Err(err) => {
                self.flow.apply(FlowEvent::OrderFailed);
                return Err(err);
            }
        };

        let checkout_request = CheckoutRequest::from_order(&order, prefill);
        let confirmation = match self.checkout.open(&checkout_request).await {
            CheckoutOutcome::Completed(confirmation) => confirmation,
            CheckoutOutcome::Dismissed => {
                tracing::debug!(attempt = %attempt, "Checkout dismissed without a decision");
                self.flow.apply(FlowEvent::CheckoutDismissed);
                return Ok(self.outcome(None));
            }
            CheckoutOutcome::Failed(message) => {
                self.flow.apply(FlowEvent::CheckoutFailed(message));
                return Ok(self.outcome(None));
            }
        };

        match self.payments.verify(&confirmation).await {
            Ok(verified) => {
                tracing::info!(attempt = %attempt, "Payment verified");
                self.flow.apply(FlowEvent::VerifySucceeded);
                let payment = verified.payment.unwrap_or_else(|| Payment {
                    payment_type,
                    amount: request.payable_amount(payment_type),
                    status: PaymentState::Completed,
                    paid_at: Some(chrono::Utc::now()),
                    order_id: Some(order.order_id),
                    payment_id: Some(confirmation.razorpay_payment_id),
                });
                Ok(self.outcome(Some(payment)))
            }
            Err(ClientError::Api(err)) => {
                self.flow.apply(FlowEvent::VerifyFailed(err.to_string()));
                Ok(self.outcome(None))
            }
            Err(err) => {
                self.flow.apply(FlowEvent::VerifyFailed(err.to_string()));
                Err(err)
            }
        }
    }

    /// Spawn the post-success reconciliation poll for a payment. Hold
    /// the returned handle for as long as the owning view is open;
    /// dropping it cancels the poll.
    pub fn spawn_status_poll(&self, payment_id: String) -> StatusPoll {
        StatusPoll::spawn(self.payments.clone(), payment_id)
    }

    fn outcome(&self, payment: Option<Payment>) -> AttemptOutcome {
        AttemptOutcome {
            state: self.flow.state().clone(),
            payment,
        }
    }
}

/// Handle on the background status poll. Cancelled on drop so the poll
/// can never outlive the view that spawned it.
pub struct StatusPoll {
    cancel: CancellationToken,
    handle: Option<tokio::task::JoinHandle<()>>,
}

impl StatusPoll {
    fn spawn(payments: Arc<PaymentsApi>, payment_id: String) -> Self {
        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let handle = tokio::spawn(async move {
            run_status_poll(
                move || {
                    let payments = payments.clone();
                    let payment_id = payment_id.clone();
                    async move { payments.status(&payment_id).await.map(|s| s.status) }
                },
                token,
            )
            .await;
        });
        Self {
            cancel,
            handle: Some(handle),
        }
    }

    /// Stop polling early (owning view closed).
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Wait for the poll to finish (bound reached, payment confirmed,
    /// or cancelled).
    pub async fn join(mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for StatusPoll {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Poll loop: one probe every [`STATUS_POLL_INTERVAL`], torn down at
/// [`STATUS_POLL_WINDOW`] no matter what the server says. Probe errors
/// are logged and swallowed; this is a best-effort reconciliation
/// signal, never a source of user-facing failures.
async fn run_status_poll<F, Fut>(mut probe: F, cancel: CancellationToken)
where
    F: FnMut() -> Fut,
    Fut: Future<Output = ClientResult<PaymentState>>,
{
    let started = tokio::time::Instant::now();
    let mut ticker = tokio::time::interval_at(started + STATUS_POLL_INTERVAL, STATUS_POLL_INTERVAL);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::debug!("Payment status poll cancelled");
                break;
            }
            _ = ticker.tick() => {
                if started.elapsed() >= STATUS_POLL_WINDOW {
                    tracing::debug!("Payment status poll window elapsed");
                    break;
                }
                match probe().await {
                    Ok(PaymentState::Completed) => {
                        tracing::debug!("Payment confirmed by status endpoint");
                        break;
                    }
                    Ok(state) => {
                        tracing::debug!(?state, "Payment status poll");
                    }
                    Err(err) => {
                        tracing::debug!(error = %err, "Payment status poll failed (ignored)");
                    }
                }
            }
        }
    }
}
