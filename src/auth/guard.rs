//! Declarative role-based authorization.
//!
//! An operation declares the roles it accepts once, at definition time, as a
//! [`RoleRequirement`]. The guard runs before the operation and either lets
//! it execute or rejects the request without invoking it at all.
//!
//! ```rust,ignore
//! use warden::auth::guard::roles::{ADMIN, USER};
//! use warden::require_roles;
//!
//! Router::new()
//!     .route("/user/me", get(my_name).route_layer(require_roles!(USER, ADMIN)))
//!     .route("/user/all", get(list_users).route_layer(require_roles!(ADMIN)));
//! ```

use crate::auth::middleware::RequestIdentity;
use crate::types::{AuthError, Identity, Result};
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::future::Future;
use tracing::{debug, warn};

/// Role names granted by the user store.
pub mod roles {
    pub const USER: &str = "USER";
    pub const ADMIN: &str = "ADMIN";
}

/// Set of roles an operation accepts. Holding any one of them is enough.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleRequirement {
    roles: &'static [&'static str],
}

/// Any signed-in user.
pub const USER_OR_ADMIN: RoleRequirement = RoleRequirement::any_of(&[roles::USER, roles::ADMIN]);

/// Administrators only.
pub const ADMIN_ONLY: RoleRequirement = RoleRequirement::any_of(&[roles::ADMIN]);

impl RoleRequirement {
    pub const fn any_of(roles: &'static [&'static str]) -> Self {
        Self { roles }
    }

    /// Decides whether `identity` may run an operation guarded by `self`.
    ///
    /// # Errors
    /// `NotAuthenticated` when no identity is bound, `Forbidden` when the
    /// caller holds none of the required roles.
    pub fn check<'a>(&self, identity: &'a RequestIdentity) -> Result<&'a Identity> {
        let Some(identity) = identity.identity() else {
            debug!(required = ?self.roles, "Guard rejected anonymous caller");
            return Err(AuthError::NotAuthenticated.into());
        };

        if !identity.has_any_role(self.roles) {
            warn!(
                principal = %identity.principal,
                required = ?self.roles,
                "Guard rejected caller without a required role"
            );
            return Err(AuthError::Forbidden.into());
        }

        Ok(identity)
    }

    /// Runs `operation` only if [`RoleRequirement::check`] passes.
    ///
    /// The operation is not constructed, let alone polled, on rejection.
    pub async fn guard<F, Fut, T>(&self, identity: &RequestIdentity, operation: F) -> Result<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        self.check(identity)?;
        Ok(operation().await)
    }
}

/// Route middleware enforcing the requirement held in its state.
///
/// Usually attached through [`require_roles!`](crate::require_roles).
pub async fn enforce_roles(
    State(requirement): State<RoleRequirement>,
    req: Request,
    next: Next,
) -> Response {
    let identity = req
        .extensions()
        .get::<RequestIdentity>()
        .cloned()
        .unwrap_or_default();

    match requirement.guard(&identity, move || next.run(req)).await {
        Ok(response) => response,
        Err(e) => e.into_response(),
    }
}

/// Builds a route layer that admits callers holding any of the given roles.
///
/// The role list must be constant; it is fixed for the life of the process.
#[macro_export]
macro_rules! require_roles {
    ($($role:expr),+ $(,)?) => {{
        const REQUIREMENT: $crate::auth::guard::RoleRequirement =
            $crate::auth::guard::RoleRequirement::any_of(&[$($role),+]);
        ::axum::middleware::from_fn_with_state(REQUIREMENT, $crate::auth::guard::enforce_roles)
    }};
}
