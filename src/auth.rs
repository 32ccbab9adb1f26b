//! Session authorization as seen by the admin screens.
//!
//! The query pipeline never looks at auth state; only
//! [`crate::screen::ScreenKind::build`] consults it before an admin screen
//! produces a view.

/// Environment variable holding the admin session token.
pub const ADMIN_TOKEN_ENV: &str = "CATALOG_LENS_ADMIN_TOKEN";

/// Who is looking at the data.
pub trait AuthContext {
    /// Bearer token of the session, if any.
    fn token(&self) -> Option<&str>;

    /// Whether the session may open admin-only screens.
    fn is_admin(&self) -> bool;
}

/// Session built from command-line or environment configuration.
///
/// Any non-blank token grants admin rights; validating it against a
/// backend happens before the token reaches this process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionAuth {
    token: Option<String>,
}

impl SessionAuth {
    /// Anonymous session: public screens only.
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        let token = token.into();
        let token = token.trim();
        SessionAuth {
            token: (!token.is_empty()).then(|| token.to_string()),
        }
    }

    /// `Some(token)` from the CLI, or an anonymous session.
    pub fn from_config(token: Option<&str>) -> Self {
        token.map_or_else(Self::anonymous, Self::with_token)
    }

    pub fn sign_out(&mut self) {
        if self.token.take().is_some() {
            log::info!("Admin session closed");
        }
    }
}

impl AuthContext for SessionAuth {
    fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    fn is_admin(&self) -> bool {
        self.token.is_some()
    }
}
