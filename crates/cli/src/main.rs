//! devmart - project marketplace client.
//!
//! CLI for browsing the catalog, submitting project requests (registered
//! or guest), paying via the hosted checkout, and administering projects
//! and request lifecycles.

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use devmart_client::ClientConfig;
use devmart_core::payment::{PaymentOption, PaymentType};
use devmart_core::project::Category;
use devmart_core::request::RequestStatus;

mod app;
mod checkout;
mod commands;
mod notify;
mod render;

use app::App;
use commands::requests::GuestArgs;

/// devmart - project marketplace client
#[derive(Parser, Debug)]
#[command(name = "devmart")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    // === Account ===
    /// Log in with email and password
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },

    /// Clear the stored session
    Logout,

    /// Create an account (a verification email follows)
    Signup {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        contact: Option<String>,
    },

    /// Confirm an email address with the emailed token
    VerifyEmail { token: String },

    /// Request a password reset email
    ForgotPassword {
        #[arg(long)]
        email: String,
    },

    /// Set a new password using a reset token
    ResetPassword {
        token: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        confirm: String,
    },

    /// Change the current account password
    UpdatePassword {
        #[arg(long)]
        current: String,
        #[arg(long)]
        new: String,
        #[arg(long)]
        confirm: String,
    },

    /// Show the logged-in user
    Whoami,

    // === Catalog ===
    /// Browse the project catalog
    Projects {
        #[command(subcommand)]
        command: ProjectCommands,
    },

    /// My requests with progress and payment state
    Dashboard {
        /// Filter by project name
        #[arg(long)]
        query: Option<String>,
    },

    // === Requests ===
    /// Request a catalog project
    Request {
        project_id: String,
        #[arg(long)]
        guest_name: Option<String>,
        #[arg(long)]
        guest_email: Option<String>,
        #[arg(long)]
        guest_contact: Option<String>,
    },

    /// Request a custom project
    RequestCustom {
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: String,
        #[arg(long)]
        requirements: Option<String>,
        #[arg(long, value_enum, default_value = "web")]
        category: CategoryArg,
        /// Estimated budget in rupees
        #[arg(long)]
        budget: Option<String>,
        /// Expected timeline, e.g. "2-3 months"
        #[arg(long)]
        timeline: Option<String>,
        #[arg(long)]
        guest_name: Option<String>,
        #[arg(long)]
        guest_email: Option<String>,
        #[arg(long)]
        guest_contact: Option<String>,
    },

    /// Choose the payment option for an approved request
    ChoosePayment {
        request_id: String,
        #[arg(long, value_enum)]
        option: PaymentOptionArg,
    },

    /// Pay against an approved request
    Pay {
        request_id: String,
        #[arg(long = "type", value_enum)]
        payment_type: PaymentTypeArg,
    },

    // === Administration ===
    /// Manage projects and request lifecycles
    Admin {
        #[command(subcommand)]
        command: AdminCommands,
    },
}

#[derive(Subcommand, Debug)]
enum ProjectCommands {
    /// List catalog projects
    List,
    /// Show one project in full
    Show { id: String },
}

#[derive(Subcommand, Debug)]
enum AdminCommands {
    /// List every request
    Requests {
        #[arg(long)]
        query: Option<String>,
    },

    /// Edit a request: status, notes, progress, links, price
    UpdateRequest {
        id: String,
        #[arg(long, value_enum)]
        status: Option<StatusArg>,
        #[arg(long)]
        notes: Option<String>,
        /// Current module progress marker
        #[arg(long)]
        module: Option<String>,
        #[arg(long)]
        github: Option<String>,
        /// Actual price in rupees (becomes the authoritative total)
        #[arg(long)]
        price: Option<i64>,
    },

    /// Create a catalog project from a draft file
    CreateProject {
        /// JSON draft file
        #[arg(long)]
        file: String,
        /// Image file to upload and attach (repeatable)
        #[arg(long = "image")]
        images: Vec<String>,
        /// Index of the image to flag as primary
        #[arg(long)]
        primary: Option<usize>,
    },

    /// Update a catalog project from a draft file
    UpdateProject {
        id: String,
        #[arg(long)]
        file: String,
        #[arg(long = "image")]
        images: Vec<String>,
        #[arg(long)]
        primary: Option<usize>,
    },

    /// Delete a catalog project
    DeleteProject { id: String },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PaymentOptionArg {
    Advance,
    Full,
}

impl From<PaymentOptionArg> for PaymentOption {
    fn from(arg: PaymentOptionArg) -> Self {
        match arg {
            PaymentOptionArg::Advance => PaymentOption::Advance,
            PaymentOptionArg::Full => PaymentOption::Full,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PaymentTypeArg {
    Advance,
    Full,
    Remaining,
}

impl From<PaymentTypeArg> for PaymentType {
    fn from(arg: PaymentTypeArg) -> Self {
        match arg {
            PaymentTypeArg::Advance => PaymentType::Advance,
            PaymentTypeArg::Full => PaymentType::Full,
            PaymentTypeArg::Remaining => PaymentType::Remaining,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum StatusArg {
    Pending,
    Approved,
    InProgress,
    Completed,
    Rejected,
}

impl From<StatusArg> for RequestStatus {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::Pending => RequestStatus::Pending,
            StatusArg::Approved => RequestStatus::Approved,
            StatusArg::InProgress => RequestStatus::InProgress,
            StatusArg::Completed => RequestStatus::Completed,
            StatusArg::Rejected => RequestStatus::Rejected,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CategoryArg {
    Web,
    Mobile,
    Desktop,
    AiMl,
    Other,
}

impl From<CategoryArg> for Category {
    fn from(arg: CategoryArg) -> Self {
        match arg {
            CategoryArg::Web => Category::Web,
            CategoryArg::Mobile => Category::Mobile,
            CategoryArg::Desktop => Category::Desktop,
            CategoryArg::AiMl => Category::AiMl,
            CategoryArg::Other => Category::Other,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&cli.log_level)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = ClientConfig::from_env();
    let app = App::bootstrap(&config)?;

    match cli.command {
        Commands::Login { email, password } => commands::auth::login(&app, &email, &password).await,
        Commands::Logout => {
            commands::auth::logout(&app);
            Ok(())
        }
        Commands::Signup {
            username,
            email,
            password,
            contact,
        } => commands::auth::signup(&app, username, email, password, contact).await,
        Commands::VerifyEmail { token } => commands::auth::verify_email(&app, &token).await,
        Commands::ForgotPassword { email } => commands::auth::forgot_password(&app, &email).await,
        Commands::ResetPassword {
            token,
            password,
            confirm,
        } => commands::auth::reset_password(&app, &token, &password, &confirm).await,
        Commands::UpdatePassword {
            current,
            new,
            confirm,
        } => commands::auth::update_password(&app, &current, &new, &confirm).await,
        Commands::Whoami => {
            commands::auth::whoami(&app);
            Ok(())
        }

        Commands::Projects { command } => match command {
            ProjectCommands::List => commands::projects::list(&app).await,
            ProjectCommands::Show { id } => commands::projects::show(&app, &id).await,
        },
        Commands::Dashboard { query } => commands::requests::dashboard(&app, query).await,

        Commands::Request {
            project_id,
            guest_name,
            guest_email,
            guest_contact,
        } => {
            let guest = GuestArgs {
                name: guest_name,
                email: guest_email,
                contact: guest_contact,
            };
            commands::requests::submit_catalog(&app, project_id, guest).await
        }
        Commands::RequestCustom {
            name,
            description,
            requirements,
            category,
            budget,
            timeline,
            guest_name,
            guest_email,
            guest_contact,
        } => {
            let guest = GuestArgs {
                name: guest_name,
                email: guest_email,
                contact: guest_contact,
            };
            commands::requests::submit_custom(
                &app,
                name,
                description,
                requirements,
                category.into(),
                budget,
                timeline,
                guest,
            )
            .await
        }
        Commands::ChoosePayment { request_id, option } => {
            commands::requests::choose_payment(&app, &request_id, option.into()).await
        }
        Commands::Pay {
            request_id,
            payment_type,
        } => commands::pay::pay(&app, &request_id, payment_type.into()).await,

        Commands::Admin { command } => match command {
            AdminCommands::Requests { query } => commands::admin::list_requests(&app, query).await,
            AdminCommands::UpdateRequest {
                id,
                status,
                notes,
                module,
                github,
                price,
            } => {
                commands::admin::update_request(
                    &app,
                    &id,
                    status.map(Into::into),
                    notes,
                    module,
                    github,
                    price,
                )
                .await
            }
            AdminCommands::CreateProject {
                file,
                images,
                primary,
            } => commands::admin::create_project(&app, &file, images, primary).await,
            AdminCommands::UpdateProject {
                id,
                file,
                images,
                primary,
            } => commands::admin::update_project(&app, &id, &file, images, primary).await,
            AdminCommands::DeleteProject { id } => commands::admin::delete_project(&app, &id).await,
        },
    }
}
