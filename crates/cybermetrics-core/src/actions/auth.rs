// Authentication actions: login, signup, logout and token verification.

use tracing::{info, warn};

use super::{ActionError, ActionResult};
use crate::api::AuthApi;
use crate::models::{LoginRequest, LoginResponse, SignupRequest, SignupResponse};
use crate::session::{CurrentUser, Session, SessionContext};

pub const MIN_PASSWORD_LEN: usize = 6;

const LOGIN_FAILED: &str = "Login failed";
const SIGNUP_FAILED: &str = "Signup failed";

fn require(value: &str, message: &str) -> ActionResult<()> {
    if value.trim().is_empty() {
        Err(ActionError::new(message))
    } else {
        Ok(())
    }
}

/// Log in and write the token, user id and email into the session.
pub async fn login<A: AuthApi + ?Sized>(
    api: &A,
    session: &SessionContext,
    email: &str,
    password: &str,
) -> ActionResult<LoginResponse> {
    require(email, "Email is required")?;
    require(password, "Password is required")?;

    let request = LoginRequest {
        email: email.trim().to_string(),
        password: password.to_string(),
    };
    let response = api
        .login(&request)
        .await
        .map_err(|e| ActionError::from_api(&e, LOGIN_FAILED))?;

    let persisted = session.establish(Session {
        token: response.token.clone(),
        user_id: response.user_id.clone(),
        email: response.email.clone(),
    });
    if let Err(e) = persisted {
        warn!("Logged in but failed to persist session: {}", e);
    }
    info!("Logged in as {}", response.user_id);
    Ok(response)
}

/// Create an account. Does not log in.
pub async fn signup<A: AuthApi + ?Sized>(
    api: &A,
    email: &str,
    password: &str,
    display_name: Option<&str>,
) -> ActionResult<SignupResponse> {
    require(email, "Email is required")?;
    require(password, "Password is required")?;
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ActionError::new(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }

    let request = SignupRequest {
        email: email.trim().to_string(),
        password: password.to_string(),
        display_name: display_name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string),
    };
    api.signup(&request)
        .await
        .map_err(|e| ActionError::from_api(&e, SIGNUP_FAILED))
}

/// Drop the session. Always succeeds from the caller's point of view; a
/// store that refuses the removal is only logged.
pub fn logout(session: &SessionContext) -> ActionResult<()> {
    if let Err(e) = session.clear() {
        warn!("Failed to clear persisted session: {}", e);
    }
    info!("Logged out");
    Ok(())
}

pub fn is_authenticated(session: &SessionContext) -> bool {
    session.is_authenticated()
}

pub fn current_user(session: &SessionContext) -> CurrentUser {
    session.current_user()
}

/// Check the stored token against the server. Without a token this returns
/// `false` immediately; any failed verification clears the session.
pub async fn verify_auth<A: AuthApi + ?Sized>(api: &A, session: &SessionContext) -> bool {
    if session.token().is_none() {
        return false;
    }
    match api.verify().await {
        Ok(_) => true,
        Err(e) if e.is_unauthorized() => {
            info!("Session expired or revoked, clearing session");
            let _ = logout(session);
            false
        }
        Err(e) => {
            warn!("Token verification failed, clearing session: {}", e);
            let _ = logout(session);
            false
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
