//! Route authorization guard.
//!
//! [`decide`] runs before every navigation. It only reads the target route
//! and the session, so deciding the same navigation twice gives the same
//! answer.

use serde::Serialize;

use super::{ResolvedRoute, Screen};
use crate::models::Session;

/// Outcome of a navigation check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", content = "screen", rename_all = "snake_case")]
pub enum Decision {
    /// Enter the requested route.
    Proceed,
    /// Send the user to the sign-in screen.
    RedirectToLogin,
    /// Send the user to a landing screen.
    RedirectToRoleHome(Screen),
}

/// Decide whether `session` may enter `target`.
///
/// Rules are checked in order and the first match wins:
///
/// 1. Admin-only route, session not admin: the non-admin landing screen.
///    A signed-in cashier is bounced to their own home, never to login.
/// 2. Route needs sign-in, session signed out: login.
/// 3. Login or public landing, session signed in: the session's landing
///    screen.
/// 4. Otherwise proceed.
#[must_use]
pub fn decide(target: &ResolvedRoute, session: &Session) -> Decision {
    if target.requires_admin && !session.is_admin() {
        tracing::warn!(
            path = %target.path,
            email = ?session.user_email(),
            "Admin route denied to non-admin session"
        );
        return Decision::RedirectToRoleHome(Screen::Pos);
    }

    if target.requires_auth && !session.is_authenticated() {
        return Decision::RedirectToLogin;
    }

    if matches!(target.screen, Some(Screen::Login | Screen::Home)) && session.is_authenticated() {
        return Decision::RedirectToRoleHome(Screen::home_for(session));
    }

    Decision::Proceed
}
