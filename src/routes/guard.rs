//! Access control for protected routes.
//!
//! A pure decision over the route's access tier and the current session.
//! The ordering is load-bearing: while the session is unresolved the
//! answer is Loading, never a redirect, so a signed-in admin is not
//! bounced to the login page by a slow restore.

use crate::routes::Route;
use crate::session::Session;

/// Access tier of a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteAccess {
    /// Anyone, signed in or not.
    Public,
    /// Admin accounts only.
    AdminOnly,
}

impl RouteAccess {
    pub fn of(route: &Route) -> RouteAccess {
        match route {
            Route::Admin | Route::AdminSection(_) => RouteAccess::AdminOnly,
            _ => RouteAccess::Public,
        }
    }
}

/// What to do with a navigation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    /// Session restore still in flight; show a waiting view.
    Loading,
    /// Not signed in; send to the login page.
    RedirectToLogin,
    /// Signed in without the required rights.
    AccessDenied,
    /// Render the page.
    Grant,
}

pub fn decide(route: &Route, session: &Session) -> GuardDecision {
    match RouteAccess::of(route) {
        RouteAccess::Public => GuardDecision::Grant,
        RouteAccess::AdminOnly => {
            if session.is_loading {
                GuardDecision::Loading
            } else if !session.is_authenticated() {
                GuardDecision::RedirectToLogin
            } else if !session.is_admin() {
                GuardDecision::AccessDenied
            } else {
                GuardDecision::Grant
            }
        }
    }
}
