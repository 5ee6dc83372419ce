use std::fmt;

/// Basic-auth credentials for the upstream ERP service.
///
/// Held only for the duration of one outbound call. `Debug` redacts the password
/// so the value can travel through `tracing` fields without leaking it.
#[derive(Clone, PartialEq, Eq)]
pub struct UpstreamCredentials {
    pub username: String,
    pub password: String,
}

impl UpstreamCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for UpstreamCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpstreamCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_password() {
        let creds = UpstreamCredentials::new("svc_reporting", "hunter2");
        let rendered = format!("{:?}", creds);
        assert!(rendered.contains("svc_reporting"));
        assert!(!rendered.contains("hunter2"));
    }
}
