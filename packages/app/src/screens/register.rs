use crate::session::Session;
use crate::shell::Nav;

/// Account creation form.
#[derive(Debug, Default)]
pub struct RegisterScreen {
    pub email: String,
    pub password: String,
    pub username: String,
    pub error: Option<String>,
    pub busy: bool,
}

impl RegisterScreen {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attempt registration; the session channel drives the flow switch.
    pub async fn submit(&mut self, session: &Session) {
        if self.email.trim().is_empty() || self.password.is_empty() || self.username.trim().is_empty()
        {
            self.error = Some("Please fill in all fields".into());
            return;
        }

        self.busy = true;
        let result = session
            .register(self.email.trim(), &self.password, self.username.trim())
            .await;
        self.busy = false;

        match result {
            Ok(()) => self.error = None,
            Err(e) => self.error = Some(e.to_string()),
        }
    }

    pub fn go_login(&self) -> Nav {
        Nav::Back
    }

    pub fn render(&self) -> String {
        let mut out = String::from("Create your Glimpse account\n");
        if self.busy {
            out.push_str("Creating account...\n");
        }
        if let Some(error) = &self.error {
            out.push_str(&format!("Error: {error}\n"));
        }
        out.push_str("Commands: signup <email> <password> <username> | login | quit\n");
        out
    }
}
