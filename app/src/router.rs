//! Route table and navigation decisions.

use crate::guard::{GuardDecision, NavigationGuard};
use std::sync::Arc;

/// A single entry in the route table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RouteDescriptor {
    /// Exact path this route matches
    pub path: String,
    /// Whether the session guard runs before this route renders
    pub requires_auth: bool,
    /// If set, navigation to this route immediately redirects
    pub redirect: Option<String>,
}

impl RouteDescriptor {
    /// Public route at `path`.
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            requires_auth: false,
            redirect: None,
        }
    }

    /// Mark this route as protected by the navigation guard.
    #[must_use]
    pub const fn protected(mut self) -> Self {
        self.requires_auth = true;
        self
    }

    /// Make this route redirect to `target` instead of rendering.
    #[must_use]
    pub fn redirect_to(mut self, target: impl Into<String>) -> Self {
        self.redirect = Some(target.into());
        self
    }
}

/// Outcome of a navigation attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Navigation {
    /// The route may render
    Proceed {
        /// Path of the resolved route
        path: String,
    },
    /// Navigation was diverted, either by a redirect route or a guard
    Redirect {
        /// The requested path
        from: String,
        /// Where to navigate instead
        to: String,
    },
    /// No route matches the requested path
    NotFound {
        /// The requested path
        path: String,
    },
}

/// Table of routes plus the guard applied to protected entries.
///
/// The guard only runs for routes marked `requires_auth`; public routes
/// resolve without any backend traffic.
pub struct Router {
    routes: Vec<RouteDescriptor>,
    guard: Arc<dyn NavigationGuard>,
}

impl Router {
    /// Empty router using `guard` for protected routes.
    #[must_use]
    pub fn new(guard: Arc<dyn NavigationGuard>) -> Self {
        Self {
            routes: Vec::new(),
            guard,
        }
    }

    /// Router with the application's standard table: a public `/login`, a
    /// protected `/home`, and `/` redirecting to `/login`.
    #[must_use]
    pub fn with_default_routes(guard: Arc<dyn NavigationGuard>) -> Self {
        Self::new(guard)
            .route(RouteDescriptor::new("/login"))
            .route(RouteDescriptor::new("/home").protected())
            .route(RouteDescriptor::new("/").redirect_to("/login"))
    }

    /// Add a route to the table.
    #[must_use]
    pub fn route(mut self, descriptor: RouteDescriptor) -> Self {
        self.routes.push(descriptor);
        self
    }

    /// Resolve a navigation attempt to `path`.
    ///
    /// Redirect routes answer without consulting the guard; callers follow
    /// the redirect with another `navigate` call.
    pub async fn navigate(&self, path: &str) -> Navigation {
        let Some(route) = self.routes.iter().find(|r| r.path == path) else {
            tracing::debug!(path, "No route matches");
            return Navigation::NotFound {
                path: path.to_owned(),
            };
        };

        if let Some(target) = &route.redirect {
            return Navigation::Redirect {
                from: path.to_owned(),
                to: target.clone(),
            };
        }

        if route.requires_auth {
            match self.guard.check(route).await {
                GuardDecision::Allow => {}
                GuardDecision::Redirect(to) => {
                    return Navigation::Redirect {
                        from: path.to_owned(),
                        to,
                    };
                }
            }
        }

        Navigation::Proceed {
            path: path.to_owned(),
        }
    }
}
