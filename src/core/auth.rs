//! Operator authentication.
//!
//! The ledger only needs an identity to stamp on `recorded_by`. Accounts come from the
//! `[[operators]]` table of `config.toml`; passwords are stored as SHA-256 hex digests.

use crate::{
    config::settings::OperatorAccount,
    errors::{Error, Result},
};
use sha2::{Digest, Sha256};
use tracing::{info, warn};

/// The authenticated person operating the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operator {
    identity: String,
}

impl Operator {
    /// Creates an operator with the given identity string.
    #[must_use]
    pub fn new(identity: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
        }
    }

    /// Identity recorded on every entry this operator writes.
    #[must_use]
    pub fn identity(&self) -> &str {
        &self.identity
    }
}

/// Anything that can turn a username/password pair into an [`Operator`].
pub trait Authenticator {
    /// Checks the credentials.
    ///
    /// # Errors
    /// Returns [`Error::AuthFailure`] when the pair is not accepted.
    fn authenticate(&self, username: &str, password: &str) -> Result<Operator>;
}

/// Hex SHA-256 digest of `password`, the form stored in `password_sha256`.
#[must_use]
pub fn hash_password(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Authenticates against the operator accounts listed in the configuration.
///
/// Passwords are checked as unsalted SHA-256 digests. That keeps plaintext out of the
/// settings file but is not a password hash; swap in a salted KDF before exposing the
/// ledger to untrusted users.
#[derive(Debug, Clone)]
pub struct ConfiguredAuthenticator {
    accounts: Vec<OperatorAccount>,
}

impl ConfiguredAuthenticator {
    /// Accounts as read from the settings file.
    #[must_use]
    pub const fn new(accounts: Vec<OperatorAccount>) -> Self {
        Self { accounts }
    }
}

impl Authenticator for ConfiguredAuthenticator {
    fn authenticate(&self, username: &str, password: &str) -> Result<Operator> {
        let failure = || Error::AuthFailure {
            username: username.to_string(),
        };

        let Some(account) = self
            .accounts
            .iter()
            .find(|account| account.username == username)
        else {
            warn!("Login attempt for unknown operator '{}'", username);
            return Err(failure());
        };

        if !account
            .password_sha256
            .eq_ignore_ascii_case(&hash_password(password))
        {
            warn!("Wrong password for operator '{}'", username);
            return Err(failure());
        }

        info!("Operator '{}' authenticated", username);
        Ok(Operator::new(
            account
                .display_name
                .clone()
                .unwrap_or_else(|| account.username.clone()),
        ))
    }
}
