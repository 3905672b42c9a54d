//! Shared wiring: session, gateway, endpoint wrappers, notifier.

use std::sync::Arc;

use devmart_client::auth::AuthApi;
use devmart_client::notify::Notifier;
use devmart_client::payments::PaymentsApi;
use devmart_client::projects::ProjectsApi;
use devmart_client::requests::RequestsApi;
use devmart_client::{ApiGateway, ClientConfig, SessionStore};

use crate::notify::ConsoleNotifier;

pub struct App {
    pub session: Arc<SessionStore>,
    pub notifier: Arc<dyn Notifier>,
    pub auth: AuthApi,
    pub projects: ProjectsApi,
    pub requests: RequestsApi,
    pub payments: Arc<PaymentsApi>,
}

impl App {
    /// Initialize the session from disk once and wire every API wrapper
    /// to the single gateway.
    pub fn bootstrap(config: &ClientConfig) -> anyhow::Result<Self> {
        let session = Arc::new(SessionStore::initialize(&config.session_file));
        session.on_expire(|| {
            eprintln!("✗ Session expired. Please login again.");
        });

        let notifier: Arc<dyn Notifier> = Arc::new(ConsoleNotifier::new());
        let gateway = Arc::new(ApiGateway::new(config, session.clone())?);

        Ok(Self {
            auth: AuthApi::new(gateway.clone(), session.clone(), notifier.clone()),
            projects: ProjectsApi::new(gateway.clone()),
            requests: RequestsApi::new(gateway.clone()),
            payments: Arc::new(PaymentsApi::new(gateway)),
            session,
            notifier,
        })
    }
}
