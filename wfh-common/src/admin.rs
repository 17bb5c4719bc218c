//! Admin reset
//!
//! Clearing the store is destructive and irreversible: every historical
//! selection is discarded with no backup. Authorization goes through
//! [`AdminAuthenticator`] so the shared-secret check can be swapped for a
//! stronger scheme without touching the reset itself.

use crate::store::{RecordStore, Table};
use crate::{Error, Result};
use std::fmt;
use tracing::warn;

/// Capability check guarding admin operations
pub trait AdminAuthenticator: Send + Sync {
    /// Ok if `credential` grants admin rights, `Error::Auth` otherwise
    fn authorize(&self, credential: &str) -> Result<()>;
}

/// Exact-match comparison against one static secret
pub fn verify_secret(provided: &str, expected: &str) -> Result<()> {
    if provided == expected {
        Ok(())
    } else {
        Err(Error::Auth)
    }
}

/// Static shared secret from configuration
#[derive(Clone)]
pub struct SharedSecret(String);

impl SharedSecret {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }
}

impl fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SharedSecret(<redacted>)")
    }
}

impl AdminAuthenticator for SharedSecret {
    fn authorize(&self, credential: &str) -> Result<()> {
        verify_secret(credential, &self.0)
    }
}

/// Replace the store with an empty table once `credential` is authorized
///
/// The existing table is never read, so a corrupt store can still be cleared.
pub fn reset(
    store: &dyn RecordStore,
    authenticator: &dyn AdminAuthenticator,
    credential: &str,
) -> Result<()> {
    if let Err(e) = authenticator.authorize(credential) {
        warn!("Rejected admin reset: {}", e);
        return Err(e);
    }
    store.save(&Table::empty())
}
