//! Request commands: dashboard, catalog/custom submission, and the
//! payment-option choice.

use anyhow::{bail, Result};

use devmart_core::draft::{CustomProjectDraft, GuestContact, NewRequest};
use devmart_core::payment::{PaymentOption, PaymentType};
use devmart_core::project::Category;
use devmart_core::request::{filter_by_title, Request, RequestStatus};
use devmart_client::session::Screen;

use crate::app::App;
use crate::render;

/// Guest flags shared by the request commands. Present flags force the
/// guest path even for an authenticated session.
#[derive(Debug, Default, Clone)]
pub struct GuestArgs {
    pub name: Option<String>,
    pub email: Option<String>,
    pub contact: Option<String>,
}

impl GuestArgs {
    fn is_present(&self) -> bool {
        self.name.is_some() || self.email.is_some() || self.contact.is_some()
    }

    fn contact_info(&self) -> GuestContact {
        GuestContact {
            name: self.name.clone().unwrap_or_default(),
            email: self.email.clone().unwrap_or_default(),
            contact_number: self.contact.clone(),
        }
    }
}

pub async fn dashboard(app: &App, query: Option<String>) -> Result<()> {
    app.session.set_screen(Screen::Dashboard);
    let requests = app.requests.list_mine().await?;
    print_requests(&requests, query.as_deref());
    Ok(())
}

pub async fn submit_catalog(app: &App, project_id: String, guest: GuestArgs) -> Result<()> {
    app.session.set_screen(Screen::Projects);

    let mut new_request = NewRequest::catalog(project_id);
    if guest.is_present() || !app.session.is_authenticated() {
        new_request = new_request.as_guest(guest.contact_info());
    }

    let request = app.requests.create(&new_request).await?;
    println!(
        "Request submitted for {} - we'll review it within 24 hours.",
        request.title()
    );
    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub async fn submit_custom(
    app: &App,
    name: String,
    description: String,
    requirements: Option<String>,
    category: Category,
    budget: Option<String>,
    timeline: Option<String>,
    guest: GuestArgs,
) -> Result<()> {
    app.session.set_screen(Screen::Dashboard);

    let draft = CustomProjectDraft {
        name,
        description,
        requirements: requirements.unwrap_or_default(),
        category,
        estimated_budget: budget.unwrap_or_default(),
        timeline: timeline.unwrap_or_default(),
    };
    let payload = draft.build()?;

    let mut new_request = NewRequest::custom(payload);
    if guest.is_present() || !app.session.is_authenticated() {
        new_request = new_request.as_guest(guest.contact_info());
    }

    let request = app.requests.create(&new_request).await?;
    println!(
        "Custom project request submitted for {} - we'll review your requirements within 24 hours.",
        request.title()
    );
    Ok(())
}

pub async fn choose_payment(app: &App, request_id: &str, option: PaymentOption) -> Result<()> {
    app.session.set_screen(Screen::Dashboard);

    let requests = app.requests.list_mine().await?;
    let request = find_request(&requests, request_id)?;
    if request.status != RequestStatus::Approved {
        bail!(
            "payment option can only be chosen for an approved request (status: {})",
            request.status
        );
    }

    let total = request.total_amount();
    let advance = request.payable_amount(PaymentType::Advance);
    println!("Payment options for {}:", request.title());
    println!("  advance: pay ₹{advance} now, ₹{} on completion", total - advance);
    println!("  full:    pay ₹{total} once");

    let updated = app.requests.set_payment_option(&request.id, option).await?;
    println!(
        "Payment option selected: {:?}. Proceed with `devmart pay {}`.",
        option, updated.id
    );
    Ok(())
}

pub(crate) fn find_request<'a>(requests: &'a [Request], id: &str) -> Result<&'a Request> {
    requests
        .iter()
        .find(|r| r.id == id)
        .ok_or_else(|| anyhow::anyhow!("no request with id {id} in your dashboard"))
}

pub(crate) fn print_requests(requests: &[Request], query: Option<&str>) {
    let filtered = match query {
        Some(query) => filter_by_title(requests, query),
        None => requests.iter().collect(),
    };
    if filtered.is_empty() {
        println!("No requests found");
        return;
    }
    for request in &filtered {
        render::print_request_row(request);
    }
    println!("Showing {} of {} request(s)", filtered.len(), requests.len());
}
