use sha2::{Digest, Sha256};

pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Credential digest stored by the identity store, salted with the username.
pub fn credential_digest(username: &str, password: &str) -> String {
    let mut buf = String::with_capacity(username.len() + password.len() + 1);
    buf.push_str(username);
    buf.push('|');
    buf.push_str(password);
    sha256_hex(buf.as_bytes())
}

/// Constant-time comparison for hex digests.
pub fn digest_eq(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.bytes()
        .zip(b.bytes())
        .fold(0u8, |acc, (x, y)| acc | (x ^ y))
        == 0
}
