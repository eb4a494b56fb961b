//! Trust store selection for the HTTP client.
//!
//! Requests start out trusting the system roots. The first certificate
//! failure flips the shared `TrustStore` to a bundled PEM file; the flip is
//! one-way and happens at most once per store no matter how many callers
//! race on it.

use crate::error::{Error, Result};
use once_cell::sync::OnceCell;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Environment variable naming the fallback PEM bundle
pub const CA_BUNDLE_ENV: &str = "DATO_CA_BUNDLE";

/// Bundle used when neither configuration nor environment names one
pub const DEFAULT_CA_BUNDLE: &str = "/etc/ssl/certs/ca-certificates.crt";

/// Process-wide store shared by clients that do not bring their own.
static GLOBAL_TRUST_STORE: OnceCell<Arc<TrustStore>> = OnceCell::new();

/// Which roots a request is verified against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrustMode {
    /// Built-in roots shipped with the TLS stack
    System,
    /// Roots loaded from the bundled PEM file
    Bundled,
}

/// One-shot switch between the system roots and a PEM bundle
#[derive(Debug)]
pub struct TrustStore {
    bundle_path: PathBuf,
    bundled: AtomicBool,
}

impl TrustStore {
    /// Create a store that falls back to the PEM bundle at `bundle_path`
    pub fn new(bundle_path: impl Into<PathBuf>) -> Self {
        Self {
            bundle_path: bundle_path.into(),
            bundled: AtomicBool::new(false),
        }
    }

    /// The process-wide store
    ///
    /// Its bundle path comes from `DATO_CA_BUNDLE`, else the system default,
    /// and is fixed by whichever caller initializes it first.
    pub fn global() -> Arc<TrustStore> {
        GLOBAL_TRUST_STORE
            .get_or_init(|| {
                let path = std::env::var(CA_BUNDLE_ENV)
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| PathBuf::from(DEFAULT_CA_BUNDLE));
                Arc::new(TrustStore::new(path))
            })
            .clone()
    }

    /// Path of the fallback bundle
    pub fn bundle_path(&self) -> &Path {
        &self.bundle_path
    }

    /// Current trust mode
    pub fn mode(&self) -> TrustMode {
        if self.bundled.load(Ordering::Acquire) {
            TrustMode::Bundled
        } else {
            TrustMode::System
        }
    }

    /// Switch to the bundle; returns true only for the call that flipped it
    pub fn switch_to_bundle(&self) -> bool {
        let switched = self
            .bundled
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok();
        if switched {
            tracing::warn!(
                bundle = %self.bundle_path.display(),
                "TLS verification failed, switching to bundled CA certificates"
            );
        }
        switched
    }

    /// Read and parse every certificate in the bundle
    pub async fn load_bundle(&self) -> Result<Vec<reqwest::Certificate>> {
        let pem = tokio::fs::read(&self.bundle_path).await.map_err(|e| {
            Error::config(format!(
                "failed to read CA bundle {}: {e}",
                self.bundle_path.display()
            ))
        })?;

        let certs = reqwest::Certificate::from_pem_bundle(&pem).map_err(|e| {
            Error::config(format!(
                "invalid CA bundle {}: {e}",
                self.bundle_path.display()
            ))
        })?;

        if certs.is_empty() {
            return Err(Error::config(format!(
                "CA bundle {} contains no certificates",
                self.bundle_path.display()
            )));
        }

        tracing::debug!(count = certs.len(), "loaded bundled CA certificates");
        Ok(certs)
    }
}
