//! Upstream credential sources
//!
//! Credentials are looked up at call time, never cached, and an empty value counts
//! as absent.

use mirror_api::UpstreamCredentials;

pub const DEFAULT_USERNAME_VAR: &str = "ERP_USERNAME";
pub const DEFAULT_PASSWORD_VAR: &str = "ERP_PASSWORD";

pub trait CredentialSource: Send + Sync {
    /// `None` when either value is missing or empty
    fn credentials(&self) -> Option<UpstreamCredentials>;
}

/// Reads the username and password from two named environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvCredentials {
    username_var: String,
    password_var: String,
}

impl EnvCredentials {
    pub fn new(username_var: impl Into<String>, password_var: impl Into<String>) -> Self {
        Self {
            username_var: username_var.into(),
            password_var: password_var.into(),
        }
    }

    pub fn username_var(&self) -> &str {
        &self.username_var
    }

    pub fn password_var(&self) -> &str {
        &self.password_var
    }

    fn read(name: &str) -> Option<String> {
        std::env::var(name).ok().filter(|value| !value.is_empty())
    }
}

impl Default for EnvCredentials {
    fn default() -> Self {
        Self::new(DEFAULT_USERNAME_VAR, DEFAULT_PASSWORD_VAR)
    }
}

impl CredentialSource for EnvCredentials {
    fn credentials(&self) -> Option<UpstreamCredentials> {
        let username = Self::read(&self.username_var)?;
        let password = Self::read(&self.password_var)?;
        Some(UpstreamCredentials::new(username, password))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Each test uses its own variable names so parallel tests don't race.

    #[test]
    fn test_env_credentials_present() {
        std::env::set_var("MIRROR_TEST_PRESENT_USER", "svc");
        std::env::set_var("MIRROR_TEST_PRESENT_PASS", "secret");
        let source = EnvCredentials::new("MIRROR_TEST_PRESENT_USER", "MIRROR_TEST_PRESENT_PASS");
        assert_eq!(
            source.credentials(),
            Some(UpstreamCredentials::new("svc", "secret"))
        );
    }

    #[test]
    fn test_env_credentials_missing_password() {
        std::env::set_var("MIRROR_TEST_NOPASS_USER", "svc");
        std::env::remove_var("MIRROR_TEST_NOPASS_PASS");
        let source = EnvCredentials::new("MIRROR_TEST_NOPASS_USER", "MIRROR_TEST_NOPASS_PASS");
        assert_eq!(source.credentials(), None);
    }

    #[test]
    fn test_env_credentials_empty_counts_as_absent() {
        std::env::set_var("MIRROR_TEST_EMPTY_USER", "");
        std::env::set_var("MIRROR_TEST_EMPTY_PASS", "secret");
        let source = EnvCredentials::new("MIRROR_TEST_EMPTY_USER", "MIRROR_TEST_EMPTY_PASS");
        assert_eq!(source.credentials(), None);
    }

    #[test]
    fn test_env_credentials_read_at_call_time() {
        std::env::remove_var("MIRROR_TEST_LATE_USER");
        std::env::remove_var("MIRROR_TEST_LATE_PASS");
        let source = EnvCredentials::new("MIRROR_TEST_LATE_USER", "MIRROR_TEST_LATE_PASS");
        assert_eq!(source.credentials(), None);

        std::env::set_var("MIRROR_TEST_LATE_USER", "svc");
        std::env::set_var("MIRROR_TEST_LATE_PASS", "secret");
        assert!(source.credentials().is_some());
    }
}
