/// Marker for an authenticated user. Its presence is what makes a session
/// logged in.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Identity {
    pub email: String,
    pub user_id: String,
}

impl Identity {
    pub fn new(email: &str, user_id: &str) -> Identity {
        return Identity {
            email: email.to_string(),
            user_id: user_id.to_string(),
        };
    }
}

impl std::fmt::Display for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        return write!(f, "{}", self.email);
    }
}

#[derive(Clone, Default)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        return f
            .debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish();
    }
}
