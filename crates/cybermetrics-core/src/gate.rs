// Routes and the per-screen authentication gate.

use tracing::debug;

use crate::actions::auth;
use crate::api::AuthApi;
use crate::session::SessionContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Landing,
    Login,
    Signup,
    Dashboard,
    TeamBuilder,
    TeamAnalysis,
    Recommendations,
    MlbTeams,
}

impl Route {
    /// Pages listed in the sidebar, in order.
    pub const NAV: [Route; 5] = [
        Route::Dashboard,
        Route::TeamBuilder,
        Route::TeamAnalysis,
        Route::Recommendations,
        Route::MlbTeams,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Route::Landing => "Home",
            Route::Login => "Login",
            Route::Signup => "Sign Up",
            Route::Dashboard => "Dashboard",
            Route::TeamBuilder => "Team Builder",
            Route::TeamAnalysis => "Team Analysis",
            Route::Recommendations => "Recommendations",
            Route::MlbTeams => "MLB Teams",
        }
    }

    pub fn path(self) -> &'static str {
        match self {
            Route::Landing => "/",
            Route::Login => "/login",
            Route::Signup => "/signup",
            Route::Dashboard => "/dashboard",
            Route::TeamBuilder => "/teambuilder",
            Route::TeamAnalysis => "/teamanalysis",
            Route::Recommendations => "/recommendations",
            Route::MlbTeams => "/mlbteams",
        }
    }

    /// `Some(true)` for app pages, `Some(false)` for pages only a logged-out
    /// user may see, `None` for the ungated landing page.
    pub fn auth_requirement(self) -> Option<bool> {
        match self {
            Route::Landing => None,
            Route::Login | Route::Signup => Some(false),
            _ => Some(true),
        }
    }

    pub fn requires_auth(self) -> bool {
        self.auth_requirement() == Some(true)
    }

    /// Dashboard and Team Builder carry a search box.
    pub fn has_search(self) -> bool {
        matches!(self, Route::Dashboard | Route::TeamBuilder)
    }

    /// The gate guarding this route, if any.
    pub fn gate(self) -> Option<AuthGate> {
        self.auth_requirement()
            .map(|required| AuthGate::new(required, None))
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// AuthGate
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    Checking,
    Authorized,
    Redirecting(Route),
}

/// Decides once per screen mount whether the screen may render.
#[derive(Debug, Clone)]
pub struct AuthGate {
    require_auth: bool,
    redirect_to: Option<Route>,
    state: GateState,
}

impl AuthGate {
    pub fn new(require_auth: bool, redirect_to: Option<Route>) -> Self {
        Self {
            require_auth,
            redirect_to,
            state: GateState::Checking,
        }
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    /// Settle the gate. Only the first call has an effect; the settled state
    /// is returned either way.
    pub fn resolve(&mut self, is_authenticated: bool) -> GateState {
        if self.state != GateState::Checking {
            return self.state;
        }
        self.state = match (self.require_auth, is_authenticated) {
            (true, false) => GateState::Redirecting(self.redirect_to.unwrap_or(Route::Login)),
            (false, true) => GateState::Redirecting(self.redirect_to.unwrap_or(Route::Dashboard)),
            _ => GateState::Authorized,
        };
        debug!(
            "Gate (require_auth={}) resolved to {:?}",
            self.require_auth, self.state
        );
        self.state
    }

    /// Verify the session against the server and settle the gate. A gate
    /// that has already settled makes no call.
    pub async fn check<A: AuthApi + ?Sized>(
        &mut self,
        api: &A,
        session: &SessionContext,
    ) -> GateState {
        if self.state != GateState::Checking {
            return self.state;
        }
        let ok = auth::verify_auth(api, session).await;
        self.resolve(ok)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
