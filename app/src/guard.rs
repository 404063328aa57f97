//! Session-aware navigation guards.

use crate::router::RouteDescriptor;
use recipe_client_api::ApiClient;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// What a guard decided about a navigation attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GuardDecision {
    /// Navigation may proceed to the requested route
    Allow,
    /// Navigation must be redirected to the given path
    Redirect(String),
}

/// Asynchronous check applied to protected routes before they render.
///
/// Dyn-compatible so routers can hold heterogeneous guards; implementations
/// return boxed futures rather than using `async fn`.
pub trait NavigationGuard: Send + Sync {
    /// Decide whether navigation to `route` may proceed.
    fn check<'a>(
        &'a self,
        route: &'a RouteDescriptor,
    ) -> Pin<Box<dyn Future<Output = GuardDecision> + Send + 'a>>;
}

/// Guard that asks the backend whether the current session is authenticated.
///
/// An unauthenticated session redirects to the login path. A failed status
/// check is treated the same way: the user is never let through on a network
/// error, only sent to login.
pub struct SessionGuard {
    api: Arc<ApiClient>,
    login_path: String,
}

impl SessionGuard {
    /// Guard redirecting to `/login`.
    #[must_use]
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self {
            api,
            login_path: "/login".to_owned(),
        }
    }

    /// Override the redirect target for unauthenticated sessions.
    #[must_use]
    pub fn with_login_path(mut self, path: impl Into<String>) -> Self {
        self.login_path = path.into();
        self
    }
}

impl NavigationGuard for SessionGuard {
    fn check<'a>(
        &'a self,
        route: &'a RouteDescriptor,
    ) -> Pin<Box<dyn Future<Output = GuardDecision> + Send + 'a>> {
        Box::pin(async move {
            match self.api.auth_status().await {
                Ok(true) => GuardDecision::Allow,
                Ok(false) => {
                    tracing::debug!(path = %route.path, "Unauthenticated, redirecting to login");
                    GuardDecision::Redirect(self.login_path.clone())
                }
                Err(e) => {
                    tracing::warn!(path = %route.path, error = %e, "Session check failed");
                    GuardDecision::Redirect(self.login_path.clone())
                }
            }
        })
    }
}
