//! Provider credential, loaded once per process.

use std::fmt;

/// Placeholder values shipped in sample configuration. Treated as absent.
const PLACEHOLDER_KEYS: &[&str] = &["your_api_key_here"];

/// Opaque provider API key. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

impl fmt::Display for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("***")
    }
}

/// Read-only holder for the provider credential.
///
/// Either present-and-fixed or absent-and-fixed for its whole lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialStore {
    credential: Option<Credential>,
}

impl CredentialStore {
    /// Build from a raw value. Empty, whitespace-only and placeholder values
    /// are absent.
    pub fn new(raw: Option<String>) -> Self {
        let credential = raw
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .filter(|s| !PLACEHOLDER_KEYS.iter().any(|p| s.eq_ignore_ascii_case(p)))
            .map(Credential);
        Self { credential }
    }

    /// Read the credential from an environment variable.
    pub fn from_env(var: &str) -> Self {
        Self::new(std::env::var(var).ok())
    }

    pub fn absent() -> Self {
        Self { credential: None }
    }

    pub fn get(&self) -> Option<&Credential> {
        self.credential.as_ref()
    }

    pub fn is_present(&self) -> bool {
        self.credential.is_some()
    }
}
