use std::env;
use std::fmt;

/// Identity of the signed-in player, passed explicitly to calls that need it.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct AuthSession {
    user_id: Option<String>,
    token: String,
}

impl AuthSession {
    #[must_use]
    pub fn new(user_id: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
            token: token.into(),
        }
    }

    /// A session with no signed-in user. Requests go out with an empty bearer.
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Reads `TRIVIA_USER_ID` and `TRIVIA_TOKEN`; missing values yield an
    /// anonymous session.
    #[must_use]
    pub fn from_env() -> Self {
        let token = env::var("TRIVIA_TOKEN").unwrap_or_default();
        let user_id = env::var("TRIVIA_USER_ID")
            .ok()
            .filter(|id| !id.trim().is_empty());
        Self {
            user_id,
            token: token.trim().to_owned(),
        }
    }

    #[must_use]
    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }

    #[must_use]
    pub fn is_anonymous(&self) -> bool {
        self.token.is_empty()
    }
}

impl fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthSession")
            .field("user_id", &self.user_id)
            .field("token", &if self.token.is_empty() { "<none>" } else { "<redacted>" })
            .finish()
    }
}
