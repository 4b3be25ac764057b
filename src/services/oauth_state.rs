// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Signed OAuth `state` parameter.
//!
//! Format before encoding: `timestamp_hex|nonce_hex|signature_hex`, where the
//! signature is HMAC-SHA256 over `timestamp_hex|nonce_hex`. The whole string
//! is URL-safe base64 without padding.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use hmac::{Hmac, Mac};
use ring::rand::{SecureRandom, SystemRandom};
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// How long an issued state stays valid.
const STATE_MAX_AGE_MS: i64 = 10 * 60 * 1000;
const NONCE_LEN: usize = 16;

/// Issues and verifies OAuth state values with a process-wide key.
#[derive(Clone)]
pub struct OAuthStateSigner {
    key: Vec<u8>,
    rng: SystemRandom,
}

impl OAuthStateSigner {
    pub fn new(key: Vec<u8>) -> Self {
        Self {
            key,
            rng: SystemRandom::new(),
        }
    }

    /// Create a fresh state value for an authorize redirect.
    pub fn issue(&self) -> anyhow::Result<String> {
        self.issue_at(chrono::Utc::now().timestamp_millis())
    }

    fn issue_at(&self, now_ms: i64) -> anyhow::Result<String> {
        let mut nonce = [0u8; NONCE_LEN];
        self.rng
            .fill(&mut nonce)
            .map_err(|_| anyhow::anyhow!("Failed to generate OAuth state nonce"))?;

        let payload = format!("{:x}|{}", now_ms, hex::encode(nonce));
        let signature = hex::encode(self.sign(&payload)?);
        Ok(URL_SAFE_NO_PAD.encode(format!("{}|{}", payload, signature)))
    }

    /// Check signature and age of a state value returned by the provider.
    pub fn verify(&self, state: &str) -> bool {
        self.verify_at(state, chrono::Utc::now().timestamp_millis())
    }

    fn verify_at(&self, state: &str, now_ms: i64) -> bool {
        let Some((payload, signature_hex, issued_ms)) = split_state(state) else {
            return false;
        };

        let Ok(expected) = self.sign(&payload) else {
            return false;
        };
        let Ok(signature) = hex::decode(signature_hex) else {
            return false;
        };
        if !bool::from(expected.as_slice().ct_eq(&signature)) {
            tracing::warn!("OAuth state signature mismatch");
            return false;
        }

        let age = now_ms - issued_ms;
        if !(0..=STATE_MAX_AGE_MS).contains(&age) {
            tracing::warn!(age_ms = age, "OAuth state expired");
            return false;
        }
        true
    }

    fn sign(&self, payload: &str) -> anyhow::Result<Vec<u8>> {
        let mut mac = HmacSha256::new_from_slice(&self.key)
            .map_err(|e| anyhow::anyhow!("HMAC init failed: {}", e))?;
        mac.update(payload.as_bytes());
        Ok(mac.finalize().into_bytes().to_vec())
    }
}

/// Decode into (signed payload, signature hex, issue time).
fn split_state(state: &str) -> Option<(String, String, i64)> {
    let bytes = URL_SAFE_NO_PAD.decode(state).ok()?;
    let decoded = String::from_utf8(bytes).ok()?;

    let parts: Vec<&str> = decoded.splitn(3, '|').collect();
    if parts.len() != 3 {
        return None;
    }

    let issued_ms = i64::from_str_radix(parts[0], 16).ok()?;
    Some((
        format!("{}|{}", parts[0], parts[1]),
        parts[2].to_string(),
        issued_ms,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_767_225_600_000;

    fn signer() -> OAuthStateSigner {
        OAuthStateSigner::new(b"secret_key_for_tests".to_vec())
    }

    #[test]
    fn test_issued_state_verifies() {
        let signer = signer();
        let state = signer.issue_at(NOW).unwrap();
        assert!(signer.verify_at(&state, NOW + 1_000));
    }

    #[test]
    fn test_states_are_unique() {
        let signer = signer();
        assert_ne!(signer.issue_at(NOW).unwrap(), signer.issue_at(NOW).unwrap());
    }

    #[test]
    fn test_state_is_url_safe() {
        let state = signer().issue_at(NOW).unwrap();
        assert!(!state.contains('+'));
        assert!(!state.contains('/'));
        assert!(!state.contains('='));
    }

    #[test]
    fn test_wrong_key_rejected() {
        let state = signer().issue_at(NOW).unwrap();
        let other = OAuthStateSigner::new(b"a_different_key!!".to_vec());
        assert!(!other.verify_at(&state, NOW));
    }

    #[test]
    fn test_tampered_timestamp_rejected() {
        let signer = signer();
        let state = signer.issue_at(NOW).unwrap();
        let decoded = String::from_utf8(URL_SAFE_NO_PAD.decode(&state).unwrap()).unwrap();
        let tampered = decoded.replacen(&format!("{:x}", NOW), &format!("{:x}", NOW + 1), 1);
        let encoded = URL_SAFE_NO_PAD.encode(tampered);
        assert!(!signer.verify_at(&encoded, NOW));
    }

    #[test]
    fn test_expired_state_rejected() {
        let signer = signer();
        let state = signer.issue_at(NOW).unwrap();
        assert!(!signer.verify_at(&state, NOW + STATE_MAX_AGE_MS + 1));
    }

    #[test]
    fn test_malformed_state_rejected() {
        let signer = signer();
        assert!(!signer.verify_at("not-valid-base64!!!", NOW));
        assert!(!signer.verify_at(&URL_SAFE_NO_PAD.encode("only|two"), NOW));
        assert!(!signer.verify_at("", NOW));
    }
}
