use crate::session::Session;
use crate::shell::{Nav, Route};

/// Email/password sign-in form.
#[derive(Debug, Default)]
pub struct LoginScreen {
    pub email: String,
    pub password: String,
    pub error: Option<String>,
    pub busy: bool,
}

impl LoginScreen {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attempt sign-in; on success the shell switches flows via the
    /// session channel, so no navigation is returned.
    pub async fn submit(&mut self, session: &Session) {
        if self.email.trim().is_empty() || self.password.is_empty() {
            self.error = Some("Please fill in all fields".into());
            return;
        }

        self.busy = true;
        let result = session.login(self.email.trim(), &self.password).await;
        self.busy = false;

        match result {
            Ok(()) => self.error = None,
            Err(e) => self.error = Some(e.to_string()),
        }
    }

    pub fn go_register(&self) -> Nav {
        Nav::Push(Route::Register)
    }

    pub fn render(&self) -> String {
        let mut out = String::from("Sign in to Glimpse\n");
        if self.busy {
            out.push_str("Signing in...\n");
        }
        if let Some(error) = &self.error {
            out.push_str(&format!("Error: {error}\n"));
        }
        out.push_str("Commands: login <email> <password> | register | quit\n");
        out
    }
}
