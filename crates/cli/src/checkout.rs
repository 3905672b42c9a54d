//! Terminal stand-in for the hosted checkout widget.
//!
//! Prints the order summary and reads the gateway's decision from the
//! terminal: the payment id and signature on success, `fail <reason>`
//! on a gateway failure, or an empty line to close the checkout without
//! a decision (which the flow treats as cancellation, not failure).

use async_trait::async_trait;

use devmart_client::checkout::{CheckoutGateway, CheckoutOutcome, CheckoutRequest};
use devmart_client::payments::GatewayConfirmation;

pub struct PromptCheckout;

#[async_trait]
impl CheckoutGateway for PromptCheckout {
    async fn open(&self, request: &CheckoutRequest) -> CheckoutOutcome {
        println!();
        println!("--- Checkout: {} ---", request.name);
        println!("Order:    {}", request.order_id);
        println!(
            "Amount:   ₹{} {}",
            request.amount / 100,
            request.currency
        );
        if !request.prefill.name.is_empty() {
            println!("Payer:    {}", request.prefill.name);
        }
        println!("Complete the payment in the gateway, then enter:");
        println!("  <payment-id> <signature>   on success");
        println!("  fail [reason]              on gateway failure");
        println!("  (empty line)               to close the checkout");
        print_prompt();

        let line = match read_line().await {
            Some(line) => line,
            None => return CheckoutOutcome::Dismissed,
        };
        parse_outcome(&request.order_id, &line)
    }
}

fn print_prompt() {
    use std::io::Write;
    print!("> ");
    let _ = std::io::stdout().flush();
}

/// Read one line from stdin without blocking the runtime.
async fn read_line() -> Option<String> {
    tokio::task::spawn_blocking(|| {
        let mut line = String::new();
        match std::io::stdin().read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => Some(line),
            Err(_) => None,
        }
    })
    .await
    .ok()
    .flatten()
}

fn parse_outcome(order_id: &str, line: &str) -> CheckoutOutcome {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return CheckoutOutcome::Dismissed;
    }

    if let Some(reason) = trimmed.strip_prefix("fail") {
        let reason = reason.trim();
        let message = if reason.is_empty() {
            "Payment failed at the gateway".to_string()
        } else {
            reason.to_string()
        };
        return CheckoutOutcome::Failed(message);
    }

    let mut parts = trimmed.split_whitespace();
    match (parts.next(), parts.next()) {
        (Some(payment_id), Some(signature)) => {
            CheckoutOutcome::Completed(GatewayConfirmation {
                razorpay_order_id: order_id.to_string(),
                razorpay_payment_id: payment_id.to_string(),
                razorpay_signature: signature.to_string(),
            })
        }
        _ => CheckoutOutcome::Failed("Incomplete gateway response".to_string()),
    }
}
