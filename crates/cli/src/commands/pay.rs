//! The payment command: runs one flow attempt end to end and reconciles
//! the local view afterwards.

use std::sync::Arc;

use anyhow::{bail, Result};

use devmart_client::checkout::CheckoutPrefill;
use devmart_client::flow::{FlowState, PaymentFlowController};
use devmart_client::session::Screen;
use devmart_core::payment::PaymentType;
use devmart_core::request::RequestStatus;

use crate::app::App;
use crate::checkout::PromptCheckout;
use crate::commands::requests::find_request;
use crate::render;

pub async fn pay(app: &App, request_id: &str, payment_type: PaymentType) -> Result<()> {
    app.session.set_screen(Screen::Dashboard);

    let requests = app.requests.list_mine().await?;
    let mut request = find_request(&requests, request_id)?.clone();

    if matches!(
        request.status,
        RequestStatus::Pending | RequestStatus::Rejected
    ) {
        bail!("request {} is not approved for payment yet", request.id);
    }

    let amount = request.payable_amount(payment_type);
    if amount == 0 {
        bail!("nothing to pay: the {payment_type:?} amount is ₹0");
    }
    println!(
        "Paying ₹{amount} ({payment_type:?}) for {}",
        request.title()
    );

    let prefill = match app.session.current_user() {
        Some(user) => CheckoutPrefill {
            name: user.username,
            email: Some(user.email),
            contact: None,
        },
        None => request
            .guest_info
            .as_ref()
            .map(|guest| CheckoutPrefill {
                name: guest.name.clone(),
                email: Some(guest.email.clone()),
                contact: guest.contact_number.clone(),
            })
            .unwrap_or_default(),
    };

    let mut controller =
        PaymentFlowController::new(app.payments.clone(), Arc::new(PromptCheckout));
    let outcome = controller.execute(&request, payment_type, prefill).await?;

    match outcome.state {
        FlowState::Success => {
            let payment = outcome.payment.expect("successful attempt carries a payment");
            let payment_id = payment.payment_id.clone();

            // Mirror the payment locally right away; the refetch below
            // reconciles against the server's authoritative view.
            request.apply_completed_payment(payment);
            println!("Payment verified.");
            render::print_request_detail(&request);

            if let Some(payment_id) = payment_id {
                println!("Reconciling payment status (up to 30s)...");
                controller.spawn_status_poll(payment_id).join().await;
            }

            let refreshed = app.requests.list_mine().await?;
            if let Ok(server_view) = find_request(&refreshed, request_id) {
                println!();
                render::print_request_detail(server_view);
            }
            Ok(())
        }
        FlowState::Failed { message } => {
            bail!("payment failed: {message} - run the command again to retry")
        }
        FlowState::Select => {
            println!("Checkout closed; no payment was made.");
            Ok(())
        }
        FlowState::Processing => unreachable!("attempt cannot finish in processing"),
    }
}
