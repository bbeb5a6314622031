//! Signature-algorithm providers
//!
//! An [`AlgorithmProvider`] supplies the signature check for one algorithm
//! name, decoupling the verifier from any single key-storage or crypto
//! mechanism. Two providers ship built in, both over
//! `ring::signature::UnparsedPublicKey`:
//!
//! - `EdDSA` - Ed25519 ([`Ed25519Provider`])
//! - `RS256` - RSA PKCS#1 v1.5 with SHA-256 ([`RsaSha256Provider`])
//!
//! Hosts add further algorithms through the plugin index; a provider whose
//! constructor fails is excluded with a warning, like any other plugin.

use super::keys::ResolvedKey;
use super::VerifyError;
use crate::discovery::PluginIndex;
use ring::signature::{UnparsedPublicKey, ED25519, RSA_PKCS1_2048_8192_SHA256};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

/// Verifies signatures for one algorithm name
pub trait AlgorithmProvider: Send + Sync {
    /// Algorithm name as it appears in the token header (e.g. "EdDSA")
    fn name(&self) -> &'static str;

    /// Check `signature` over `message` against the resolved public key
    ///
    /// # Errors
    ///
    /// [`VerifyError::BadSignature`] on any mismatch, including key
    /// material the algorithm cannot parse - the distinction is not
    /// attacker-observable.
    fn verify(
        &self,
        key: &ResolvedKey,
        message: &[u8],
        signature: &[u8],
    ) -> Result<(), VerifyError>;
}

/// Ed25519 verification (`EdDSA`)
pub struct Ed25519Provider;

impl AlgorithmProvider for Ed25519Provider {
    fn name(&self) -> &'static str {
        "EdDSA"
    }

    fn verify(
        &self,
        key: &ResolvedKey,
        message: &[u8],
        signature: &[u8],
    ) -> Result<(), VerifyError> {
        UnparsedPublicKey::new(&ED25519, key.material())
            .verify(message, signature)
            .map_err(|_| VerifyError::BadSignature)
    }
}

/// RSA PKCS#1 v1.5 / SHA-256 verification (`RS256`)
pub struct RsaSha256Provider;

impl AlgorithmProvider for RsaSha256Provider {
    fn name(&self) -> &'static str {
        "RS256"
    }

    fn verify(
        &self,
        key: &ResolvedKey,
        message: &[u8],
        signature: &[u8],
    ) -> Result<(), VerifyError> {
        UnparsedPublicKey::new(&RSA_PKCS1_2048_8192_SHA256, key.material())
            .verify(message, signature)
            .map_err(|_| VerifyError::BadSignature)
    }
}

/// Maps algorithm names to providers
///
/// Built once at startup; lookup during verification is read-only.
#[derive(Default)]
pub struct AlgorithmRegistry {
    providers: HashMap<&'static str, Arc<dyn AlgorithmProvider>>,
}

impl AlgorithmRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the built-in providers
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(Ed25519Provider));
        registry.register(Arc::new(RsaSha256Provider));
        registry
    }

    /// Register a provider; a later provider replaces an earlier one with
    /// the same algorithm name
    pub fn register(&mut self, provider: Arc<dyn AlgorithmProvider>) {
        info!(algorithm = provider.name(), "Registered algorithm provider");
        self.providers.insert(provider.name(), provider);
    }

    /// Fold in every provider the plugin index supplies
    ///
    /// Entries are applied in name order so repeated startups register
    /// identically; a failing constructor is excluded with a warning.
    pub fn discover(&mut self, index: &dyn PluginIndex) {
        let mut entries = index.algorithm_entries();
        entries.sort_by(|a, b| a.name.cmp(&b.name));

        for entry in entries {
            match (entry.build)() {
                Ok(provider) => self.register(provider),
                Err(e) => {
                    warn!(entry = %entry.name, error = %e, "Excluding algorithm provider");
                }
            }
        }
    }

    /// Look up a provider by algorithm name
    pub fn get(&self, algorithm: &str) -> Option<&Arc<dyn AlgorithmProvider>> {
        self.providers.get(algorithm)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::discovery::{AlgorithmEntry, StaticPluginIndex};
    use kirjuri_core::SupplyError;
    use ring::rand::SystemRandom;
    use ring::signature::{Ed25519KeyPair, KeyPair};

    fn ed25519_pair() -> (Ed25519KeyPair, ResolvedKey) {
        let pkcs8 = Ed25519KeyPair::generate_pkcs8(&SystemRandom::new()).unwrap();
        let pair = Ed25519KeyPair::from_pkcs8(pkcs8.as_ref()).unwrap();
        let key = ResolvedKey::new("test", pair.public_key().as_ref().to_vec());
        (pair, key)
    }

    #[test]
    fn test_ed25519_round_trip() {
        let (pair, key) = ed25519_pair();
        let message = b"header.claims";
        let signature = pair.sign(message);

        assert!(Ed25519Provider
            .verify(&key, message, signature.as_ref())
            .is_ok());
    }

    #[test]
    fn test_ed25519_rejects_tampered_message() {
        let (pair, key) = ed25519_pair();
        let signature = pair.sign(b"header.claims");

        let err = Ed25519Provider
            .verify(&key, b"header.other", signature.as_ref())
            .unwrap_err();
        assert_eq!(err, VerifyError::BadSignature);
    }

    #[test]
    fn test_ed25519_rejects_garbage_key_material() {
        let (pair, _) = ed25519_pair();
        let bogus = ResolvedKey::new("bogus", vec![0u8; 5]);
        let signature = pair.sign(b"m");

        assert_eq!(
            Ed25519Provider.verify(&bogus, b"m", signature.as_ref()),
            Err(VerifyError::BadSignature)
        );
    }

    #[test]
    fn test_registry_defaults_cover_both_algorithms() {
        let registry = AlgorithmRegistry::with_defaults();
        assert!(registry.get("EdDSA").is_some());
        assert!(registry.get("RS256").is_some());
        assert!(registry.get("none").is_none());
    }

    #[test]
    fn test_discover_isolates_failing_provider() {
        let index = StaticPluginIndex::new()
            .algorithm(AlgorithmEntry::new("broken", || {
                Err(SupplyError::Init("no hsm".to_string()))
            }))
            .algorithm(AlgorithmEntry::new("ed", || Ok(Arc::new(Ed25519Provider))));

        let mut registry = AlgorithmRegistry::new();
        registry.discover(&index);
        assert!(registry.get("EdDSA").is_some());
    }
}
