//! Override-token verification
//!
//! An override token is a compact three-part credential, each part
//! base64url (no padding):
//!
//! ```text
//! base64url(header) . base64url(claims) . base64url(signature)
//!
//! header: {"alg": "EdDSA", "kid": "ops-2024"}
//! claims: {"level": "DEBUG", "loggers": "com.acme.billing", "sub": "alice"}
//! ```
//!
//! The signature covers the first two parts verbatim (`header.claims`).
//! Verification is fail-closed and ordered so nothing attacker-controlled
//! is trusted early: structure first, then algorithm, then key, then
//! signature, and only then the claims. Every failure mode is a distinct
//! [`VerifyError`]; callers collapse all of them to "no override" and the
//! request proceeds at default verbosity.
//!
//! Verification is a pure computation - verifying the same token twice
//! yields identical claims.

mod algorithm;
mod keys;

pub use algorithm::{AlgorithmProvider, AlgorithmRegistry, Ed25519Provider, RsaSha256Provider};
pub use keys::{KeyRing, ResolvedKey};

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use kirjuri_core::{LevelOverride, LoggerPrefixes, Severity};
use serde::Deserialize;
use std::sync::Arc;
use thiserror::Error;

/// Why a token was rejected
///
/// Logged at debug level only - a rejected token is diagnostic, not a
/// user-facing error, and the request continues normally.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VerifyError {
    /// Token structure could not be parsed
    #[error("malformed token: {0}")]
    Malformed(String),

    /// Header names an algorithm no provider handles
    #[error("unknown algorithm: {0}")]
    UnknownAlgorithm(String),

    /// Header names a key id the ring does not hold
    #[error("unknown key id: {0}")]
    UnknownKey(String),

    /// Signature does not match
    #[error("signature mismatch")]
    BadSignature,

    /// Signature is valid but the claims are not usable
    #[error("invalid claims: {0}")]
    BadClaims(String),
}

/// Verified override claims
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverrideClaims {
    /// Minimum severity the override accepts
    pub level: Severity,
    /// Logger-name prefixes; empty means all loggers
    pub prefixes: LoggerPrefixes,
    /// Who the token was issued to, if stated
    pub subject: Option<String>,
}

impl OverrideClaims {
    /// Convert into the request-scoped override the filter consumes
    pub fn to_override(&self) -> LevelOverride {
        LevelOverride::new(self.level, self.prefixes.iter().cloned())
    }
}

/// A token that passed signature verification
///
/// Existence implies a valid signature: the verifier only constructs this
/// type after the signature check succeeds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedToken {
    /// The verified claims
    pub claims: OverrideClaims,
    /// Which key verified the signature
    pub key_id: String,
}

/// Token header naming the algorithm and key
#[derive(Debug, Deserialize)]
struct Header {
    alg: String,
    kid: String,
}

/// Claims as they appear on the wire
#[derive(Debug, Deserialize)]
struct RawClaims {
    level: String,
    #[serde(default)]
    loggers: String,
    #[serde(default)]
    sub: Option<String>,
}

/// Validates override tokens against the key ring
pub struct TokenVerifier {
    algorithms: AlgorithmRegistry,
    keys: Arc<KeyRing>,
}

impl TokenVerifier {
    /// Create a verifier over an algorithm registry and a key ring
    pub fn new(algorithms: AlgorithmRegistry, keys: Arc<KeyRing>) -> Self {
        Self { algorithms, keys }
    }

    /// The key ring this verifier resolves `kid` headers against
    pub fn keys(&self) -> &Arc<KeyRing> {
        &self.keys
    }

    /// Verify a token, resolving the key by the header's `kid`
    pub fn verify(&self, token: &str) -> Result<VerifiedToken, VerifyError> {
        let parts = TokenParts::split(token)?;
        let header = parts.header()?;
        let key = self
            .keys
            .get(&header.kid)
            .ok_or_else(|| VerifyError::UnknownKey(header.kid.clone()))?;
        self.check(&parts, &header, &key)
    }

    /// Verify a token against an explicitly supplied key
    ///
    /// The token's `kid` must still match the key's id.
    pub fn verify_with_key(
        &self,
        token: &str,
        key: &ResolvedKey,
    ) -> Result<VerifiedToken, VerifyError> {
        let parts = TokenParts::split(token)?;
        let header = parts.header()?;
        if header.kid != key.key_id() {
            return Err(VerifyError::UnknownKey(header.kid));
        }
        self.check(&parts, &header, key)
    }

    fn check(
        &self,
        parts: &TokenParts<'_>,
        header: &Header,
        key: &ResolvedKey,
    ) -> Result<VerifiedToken, VerifyError> {
        let provider = self
            .algorithms
            .get(&header.alg)
            .ok_or_else(|| VerifyError::UnknownAlgorithm(header.alg.clone()))?;

        let signature = parts.signature()?;
        provider.verify(key, parts.signed_message(), &signature)?;

        // Claims are parsed only after the signature checks out
        let claims = parts.claims()?;
        Ok(VerifiedToken {
            claims,
            key_id: key.key_id().to_string(),
        })
    }
}

/// The three wire parts of one token, unparsed
struct TokenParts<'a> {
    header_b64: &'a str,
    claims_b64: &'a str,
    signature_b64: &'a str,
    signed_len: usize,
    token: &'a str,
}

impl<'a> TokenParts<'a> {
    fn split(token: &'a str) -> Result<Self, VerifyError> {
        let mut parts = token.split('.');
        let (header_b64, claims_b64, signature_b64) =
            match (parts.next(), parts.next(), parts.next(), parts.next()) {
                (Some(h), Some(c), Some(s), None) if !h.is_empty() && !c.is_empty() => (h, c, s),
                _ => {
                    return Err(VerifyError::Malformed(
                        "expected three dot-separated parts".to_string(),
                    ))
                }
            };
        Ok(Self {
            header_b64,
            claims_b64,
            signature_b64,
            signed_len: header_b64.len() + 1 + claims_b64.len(),
            token,
        })
    }

    /// The bytes the signature covers: `header_b64.claims_b64`
    fn signed_message(&self) -> &[u8] {
        &self.token.as_bytes()[..self.signed_len]
    }

    fn header(&self) -> Result<Header, VerifyError> {
        let bytes = decode_part(self.header_b64, "header")?;
        serde_json::from_slice(&bytes)
            .map_err(|e| VerifyError::Malformed(format!("header: {}", e)))
    }

    fn signature(&self) -> Result<Vec<u8>, VerifyError> {
        decode_part(self.signature_b64, "signature")
    }

    fn claims(&self) -> Result<OverrideClaims, VerifyError> {
        let bytes = decode_part(self.claims_b64, "claims")
            .map_err(|e| VerifyError::BadClaims(e.to_string()))?;
        let raw: RawClaims = serde_json::from_slice(&bytes)
            .map_err(|e| VerifyError::BadClaims(e.to_string()))?;

        let level: Severity = raw
            .level
            .parse()
            .map_err(|e: kirjuri_core::ParseSeverityError| VerifyError::BadClaims(e.to_string()))?;

        Ok(OverrideClaims {
            level,
            prefixes: parse_prefixes(&raw.loggers),
            subject: raw.sub,
        })
    }
}

fn decode_part(part: &str, what: &str) -> Result<Vec<u8>, VerifyError> {
    URL_SAFE_NO_PAD
        .decode(part)
        .map_err(|e| VerifyError::Malformed(format!("{}: {}", what, e)))
}

/// Parse the comma-separated logger-prefix claim; whitespace-insensitive,
/// empty entries dropped, empty result means all loggers
fn parse_prefixes(loggers: &str) -> LoggerPrefixes {
    loggers
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}
