//! Sign-in commands.
//!
//! # Usage
//!
//! ```bash
//! # Sign in (password from POS_PASSWORD, or the first line of stdin)
//! echo 'Abc123' | pos-cli login -e cajero@tienda.ec
//!
//! # Show the persisted session
//! pos-cli whoami
//!
//! # Sign out
//! pos-cli logout
//! ```
//!
//! # Environment Variables
//!
//! - `POS_API_BASE_URL` - Base URL of the back-office API
//! - `POS_SESSION_FILE` - Where the session is persisted
//! - `POS_PASSWORD` - Password for `login`, instead of reading stdin

use std::io::{self, BufRead};

use secrecy::SecretString;
use thiserror::Error;

use pos_console::{AuthError, ConsoleState, Credentials, Screen};
use pos_console_core::EmailError;

/// Variable holding the password for non-interactive sign-in.
pub const PASSWORD_ENV: &str = "POS_PASSWORD";

/// Errors that can occur during session commands.
#[derive(Debug, Error)]
pub enum SessionCommandError {
    /// The email is malformed.
    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// No password was supplied.
    #[error("No password given (set POS_PASSWORD or pipe it on stdin)")]
    MissingPassword,

    /// Reading the password failed.
    #[error("Could not read password: {0}")]
    Io(#[from] io::Error),

    /// The server refused the sign-in.
    #[error("Sign-in failed: {0}")]
    Auth(#[from] AuthError),
}

/// Sign in as `email`.
pub async fn login(state: &ConsoleState, email: &str) -> Result<(), SessionCommandError> {
    let password = match std::env::var(PASSWORD_ENV) {
        Ok(password) => password,
        Err(_) => read_password(io::stdin().lock())?,
    };
    if password.is_empty() {
        return Err(SessionCommandError::MissingPassword);
    }

    let credentials = Credentials::new(email, SecretString::from(password))?;
    let session = state.sessions().login(&credentials).await?;

    let home = Screen::home_for(&session);
    tracing::info!(
        "Signed in as {} (roles: {}), landing on {}",
        session.user_email().unwrap_or_default(),
        session.roles(),
        state.routes().path_of(home).unwrap_or_else(|| home.default_path())
    );
    Ok(())
}

/// Sign out.
pub fn logout(state: &ConsoleState) {
    if !state.sessions().is_authenticated() {
        tracing::info!("No session was active");
    }
    state.sessions().logout();
}

/// Show the persisted session.
pub fn whoami(state: &ConsoleState) {
    let session = state.sessions().session();
    if !session.is_authenticated() {
        tracing::info!("Not signed in");
        return;
    }

    tracing::info!(
        "Signed in as {} (roles: {}, admin: {})",
        session.user_email().unwrap_or_default(),
        session.roles(),
        session.is_admin()
    );
}

/// Read the first line of `input`, without its line ending.
fn read_password(mut input: impl BufRead) -> Result<String, io::Error> {
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_owned())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::path::Path;
    use std::sync::Arc;
    use std::time::Duration;

    use parking_lot::Mutex;
    use pos_console::ConsoleConfig;
    use tracing_subscriber::fmt::MakeWriter;
    use url::Url;

    use super::*;

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for CapturedLogs {
        type Writer = Self;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    fn state_with_session_file(path: &Path) -> ConsoleState {
        ConsoleState::new(ConsoleConfig {
            api_base_url: Url::parse("http://127.0.0.1:9/").unwrap(),
            session_file: path.to_path_buf(),
            routes_file: None,
            role_claim: "role".to_owned(),
            http_timeout: Duration::from_secs(1),
        })
        .unwrap()
    }

    fn logout_logged(state: &ConsoleState) -> String {
        let logs = CapturedLogs::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(logs.clone())
            .with_ansi(false)
            .finish();
        tracing::subscriber::with_default(subscriber, || logout(state));
        let bytes = logs.0.lock().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_logout_reports_sign_out_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(
            &path,
            r#"{"token":"tok","userEmail":"a@b.co","userRoles":"[\"Usuario\"]"}"#,
        )
        .unwrap();

        let state = state_with_session_file(&path);
        assert!(state.sessions().is_authenticated());

        let logs = logout_logged(&state);
        assert_eq!(logs.matches("Signed out").count(), 1);
        assert!(!logs.contains("No session was active"));
        assert!(!state.sessions().is_authenticated());
        assert!(!path.exists());
    }

    #[test]
    fn test_logout_without_session() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_with_session_file(&dir.path().join("session.json"));

        let logs = logout_logged(&state);
        assert!(logs.contains("No session was active"));
    }

    #[test]
    fn test_read_password_strips_line_ending() {
        assert_eq!(read_password(&b"Abc123\r\nrest"[..]).unwrap(), "Abc123");
        assert_eq!(read_password(&b" spaced \n"[..]).unwrap(), " spaced ");
        assert_eq!(read_password(&b""[..]).unwrap(), "");
    }
}
