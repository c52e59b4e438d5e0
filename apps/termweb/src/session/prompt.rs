/// Who the prompt claims to be. Purely cosmetic; the server has no notion
/// of users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user: String,
    pub host: String,
}

impl Identity {
    pub fn new(user: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            host: host.into(),
        }
    }

    /// `user@host:cwd$`
    pub fn prompt(&self, cwd: &str) -> String {
        format!("{}@{}:{}$", self.user, self.host, cwd)
    }
}

impl Default for Identity {
    fn default() -> Self {
        Self::new("guest", "termweb")
    }
}
