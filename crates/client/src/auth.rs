//! Auth flows: login, signup, email verification, password management.
//!
//! Login and signup mutate the injected [`SessionStore`]; everything
//! else is a thin call over the gateway with local validation applied
//! before the network is touched.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use devmart_core::draft::DraftError;
use devmart_core::user::User;

use crate::error::ClientResult;
use crate::gateway::{ApiError, ApiGateway};
use crate::notify::{NoticeLevel, Notifier};
use crate::session::SessionStore;

/// Minimum accepted password length.
const MIN_PASSWORD_LEN: usize = 6;

/// Body for `POST /auth/signup`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupPayload {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_number: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LoginEnvelope {
    token: String,
    user: User,
}

#[derive(Debug, Deserialize)]
struct MessageEnvelope {
    message: Option<String>,
}

/// Result of a login attempt. A credentials failure is an expected
/// outcome with a user-facing message, not an error.
#[derive(Debug)]
pub enum LoginOutcome {
    Success(User),
    Failed(String),
}

/// Auth endpoint wrappers bound to the shared session and notifier.
pub struct AuthApi {
    gateway: Arc<ApiGateway>,
    session: Arc<SessionStore>,
    notifier: Arc<dyn Notifier>,
}

impl AuthApi {
    pub fn new(
        gateway: Arc<ApiGateway>,
        session: Arc<SessionStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            gateway,
            session,
            notifier,
        }
    }

    /// `POST /auth/login`. On success the token and user are persisted
    /// and the gateway's auth header is armed for subsequent calls. A
    /// rejected attempt returns [`LoginOutcome::Failed`] without
    /// touching stored state. Any notification from a prior attempt is
    /// dismissed before the call so messages do not stack.
    pub async fn login(&self, email: &str, password: &str) -> ClientResult<LoginOutcome> {
        self.notifier.dismiss();

        let body = serde_json::json!({ "email": email, "password": password });
        match self
            .gateway
            .post_json::<_, LoginEnvelope>("/auth/login", &body)
            .await
        {
            Ok(envelope) => {
                self.session
                    .store(envelope.token, envelope.user.clone())?;
                self.notifier.notify(
                    NoticeLevel::Success,
                    &format!("Welcome back, {}!", envelope.user.username),
                );
                Ok(LoginOutcome::Success(envelope.user))
            }
            Err(ApiError::Unauthorized(message)) | Err(ApiError::Api { message, .. }) => {
                self.notifier.notify(NoticeLevel::Error, &message);
                Ok(LoginOutcome::Failed(message))
            }
            Err(err) => Err(err.into()),
        }
    }

    /// `POST /auth/signup`. Success means a verification email was
    /// dispatched server-side; the session stays unauthenticated.
    pub async fn signup(&self, payload: &SignupPayload) -> ClientResult<String> {
        self.notifier.dismiss();

        let envelope: MessageEnvelope = self.gateway.post_json("/auth/signup", payload).await?;
        let message = envelope
            .message
            .unwrap_or_else(|| "Check your email for a verification link".to_string());
        self.notifier.notify(NoticeLevel::Success, &message);
        Ok(message)
    }

    /// Clear the session locally. Never touches the network; the caller
    /// is responsible for navigating to the login entry point.
    pub fn logout(&self) {
        self.session.clear();
        self.notifier
            .notify(NoticeLevel::Success, "Logged out successfully");
    }

    /// `GET /auth/verify-email/:token`.
    pub async fn verify_email(&self, token: &str) -> ClientResult<String> {
        let envelope: MessageEnvelope = self
            .gateway
            .get_json(&format!("/auth/verify-email/{token}"))
            .await?;
        Ok(envelope
            .message
            .unwrap_or_else(|| "Email verified".to_string()))
    }

    /// `POST /auth/forgot-password`.
    pub async fn forgot_password(&self, email: &str) -> ClientResult<String> {
        let body = serde_json::json!({ "email": email });
        let envelope: MessageEnvelope =
            self.gateway.post_json("/auth/forgot-password", &body).await?;
        Ok(envelope
            .message
            .unwrap_or_else(|| "Password reset email sent".to_string()))
    }

    /// `PUT /auth/reset-password/:token`. The password pair is checked
    /// locally before the call.
    pub async fn reset_password(
        &self,
        token: &str,
        password: &str,
        confirm: &str,
    ) -> ClientResult<String> {
        validate_new_password(password, confirm)?;

        let body = serde_json::json!({ "password": password });
        let envelope: MessageEnvelope = self
            .gateway
            .put_json(&format!("/auth/reset-password/{token}"), &body)
            .await?;
        Ok(envelope
            .message
            .unwrap_or_else(|| "Password reset successfully".to_string()))
    }

    /// `PUT /auth/update-password`. Current password must be supplied
    /// and the new pair must validate locally first.
    pub async fn update_password(
        &self,
        current: &str,
        new: &str,
        confirm: &str,
    ) -> ClientResult<String> {
        let mut errors = DraftError::default();
        if current.is_empty() {
            errors.push("currentPassword", "current password is required");
        }
        if !errors.is_empty() {
            return Err(errors.into());
        }
        validate_new_password(new, confirm)?;

        let body = serde_json::json!({
            "currentPassword": current,
            "newPassword": new,
        });
        let envelope: MessageEnvelope =
            self.gateway.put_json("/auth/update-password", &body).await?;
        Ok(envelope
            .message
            .unwrap_or_else(|| "Password updated".to_string()))
    }
}

/// Shared checks for a new password and its confirmation.
fn validate_new_password(password: &str, confirm: &str) -> Result<(), DraftError> {
    let mut errors = DraftError::default();
    if password.len() < MIN_PASSWORD_LEN {
        errors.push(
            "password",
            format!("password must be at least {MIN_PASSWORD_LEN} characters"),
        );
    }
    if password != confirm {
        errors.push("confirmPassword", "passwords do not match");
    }
    errors.into_result(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_password_rejected() {
        let err = validate_new_password("abc", "abc").unwrap_err();
        assert!(err.contains_field("password"));
    }

    #[test]
    fn test_mismatched_confirmation_rejected() {
        let err = validate_new_password("hunter22", "hunter23").unwrap_err();
        assert!(err.contains_field("confirmPassword"));
    }

    #[test]
    fn test_valid_pair_accepted() {
        assert!(validate_new_password("hunter22", "hunter22").is_ok());
    }

    #[test]
    fn test_signup_payload_wire_shape() {
        let payload = SignupPayload {
            username: "asha".into(),
            email: "asha@example.com".into(),
            password: "hunter22".into(),
            contact_number: None,
        };
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["username"], "asha");
        assert!(value.get("contactNumber").is_none());
    }
}
