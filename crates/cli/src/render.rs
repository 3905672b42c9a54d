//! Plain-text rendering of catalog projects and requests.

use devmart_core::payment::PaymentStatus;
use devmart_core::project::Project;
use devmart_core::request::Request;

pub fn print_project_row(project: &Project) {
    println!(
        "{}  {:<30} {:<10} ₹{:<8} {}",
        project.id,
        truncate(&project.name, 30),
        format!("{:?}", project.category).to_lowercase(),
        project.price,
        project.duration,
    );
}

pub fn print_project_detail(project: &Project) {
    println!("{}", project.name);
    println!("{}", "-".repeat(project.name.len()));
    println!("{}", project.description);
    if let Some(detail) = &project.detailed_description {
        println!();
        println!("{detail}");
    }
    println!();
    println!("Price:    ₹{}", project.price);
    println!("Duration: {}", project.duration);
    if let Some(url) = &project.demo_url {
        println!("Demo:     {url}");
    }
    if let Some(url) = &project.github_url {
        println!("GitHub:   {url}");
    }

    let tech = &project.technologies;
    for (label, list) in [
        ("Frontend", &tech.frontend),
        ("Backend", &tech.backend),
        ("Database", &tech.database),
        ("Other", &tech.other),
    ] {
        if !list.is_empty() {
            println!("{label}: {}", list.join(", "));
        }
    }

    if !project.features.is_empty() {
        println!();
        println!("Features:");
        for feature in &project.features {
            println!("  - {feature}");
        }
    }

    if !project.workflow.is_empty() {
        println!();
        println!("Workflow:");
        for (i, step) in project.workflow.iter().enumerate() {
            println!("  {}. {} - {}", i + 1, step.step, step.description);
        }
    }

    if !project.images.is_empty() {
        println!();
        println!("Images:");
        for image in &project.images {
            let marker = if image.is_primary { " (primary)" } else { "" };
            println!("  {}{marker}", image.url);
        }
    }
}

pub fn print_request_row(request: &Request) {
    println!(
        "{}  {:<30} {:<12} {}",
        request.id,
        truncate(request.title(), 30),
        request.status.to_string(),
        payment_label(request),
    );
}

pub fn print_request_detail(request: &Request) {
    println!("{}", request.title());
    println!("Status:         {}", request.status);
    if let Some(module) = &request.current_module {
        println!("Current module: {module}");
    }
    println!("Payment:        {}", payment_label(request));
    println!("Total amount:   ₹{}", request.total_amount());
    let paid = request.total_paid();
    if paid > 0 {
        println!("Paid:           ₹{paid}");
        let remaining = request.total_amount() - paid;
        if remaining > 0 {
            println!("Remaining:      ₹{remaining} (on completion)");
        }
    }
    if let Some(notes) = &request.admin_notes {
        println!("Latest update:  {notes}");
    }
    if let Some(link) = &request.github_link {
        println!("GitHub:         {link}");
    }

    let completed: Vec<_> = request
        .payments
        .iter()
        .filter(|p| p.status == devmart_core::payment::PaymentState::Completed)
        .collect();
    if !completed.is_empty() {
        println!("Payment history:");
        for payment in completed {
            let when = payment
                .paid_at
                .map(|t| t.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| "-".into());
            println!("  {:?} ₹{} on {when}", payment.payment_type, payment.amount);
        }
    }

    if !request.status_history.is_empty() {
        println!("History:");
        for entry in &request.status_history {
            let notes = entry.notes.as_deref().unwrap_or("");
            println!(
                "  {} {} {notes}",
                entry.timestamp.format("%Y-%m-%d"),
                entry.status,
            );
        }
    }
}

fn payment_label(request: &Request) -> &'static str {
    match request.payment_status {
        PaymentStatus::Completed => "fully paid",
        PaymentStatus::Partial => "partially paid",
        PaymentStatus::Pending => "payment pending",
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max.saturating_sub(1)).collect();
        format!("{cut}…")
    }
}
