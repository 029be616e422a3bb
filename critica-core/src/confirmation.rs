//! Single-use confirmation codes.
//!
//! A code is derived from the identity, a per-issue nonce and the signing
//! secret, then handed to the notification collaborator in plaintext. Only
//! the SHA-256 digest of the code is persisted; storing the digest of a
//! fresh code supersedes the previous one, so superseded codes stop
//! verifying.

use rand::RngCore;
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Length of the code handed to the user, in hex characters.
pub const CODE_LEN: usize = 24;

/// A freshly issued code and the digest to persist for it.
#[derive(Debug, Clone)]
pub struct IssuedCode {
    pub code: String,
    pub digest: String,
}

/// Issue a confirmation code for an identity.
pub fn issue(user_id: Uuid, username: &str, secret: &str) -> IssuedCode {
    let mut nonce = [0u8; 16];
    rand::rng().fill_bytes(&mut nonce);

    let mut hasher = Sha256::new();
    hasher.update(user_id.as_bytes());
    hasher.update(username.as_bytes());
    hasher.update(nonce);
    hasher.update(secret.as_bytes());
    let mut code = hex(&hasher.finalize());
    code.truncate(CODE_LEN);

    let digest = digest_of(&code);
    IssuedCode { code, digest }
}

/// Check a presented code against the stored digest of the last-issued one.
pub fn verify(code: &str, stored_digest: Option<&str>) -> bool {
    let Some(stored) = stored_digest else {
        return false;
    };
    // Compare digests without short-circuiting on length
    let presented = digest_of(code);
    presented.len() == stored.len()
        && presented
            .bytes()
            .zip(stored.bytes())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
}

pub fn digest_of(code: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(code.as_bytes());
    hex(&hasher.finalize())
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_code_verifies_against_its_digest() {
        let issued = issue(Uuid::now_v7(), "alice", "secret");
        assert_eq!(issued.code.len(), CODE_LEN);
        assert!(verify(&issued.code, Some(&issued.digest)));
    }

    #[test]
    fn reissue_supersedes_the_previous_code() {
        let id = Uuid::now_v7();
        let first = issue(id, "alice", "secret");
        let second = issue(id, "alice", "secret");

        // Only the most recently stored digest verifies
        assert!(!verify(&first.code, Some(&second.digest)));
        assert!(verify(&second.code, Some(&second.digest)));
    }

    #[test]
    fn unconfirmed_identity_never_verifies() {
        assert!(!verify("anything", None));
    }

    #[test]
    fn wrong_code_fails() {
        let issued = issue(Uuid::now_v7(), "alice", "secret");
        assert!(!verify("deadbeefdeadbeefdeadbeef", Some(&issued.digest)));
        assert!(!verify("", Some(&issued.digest)));
    }
}
