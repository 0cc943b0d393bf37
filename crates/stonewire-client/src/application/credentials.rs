//! Nonce challenge response.
//!
//! The server authenticates a player by sending a one-time nonce; the client
//! answers with HMAC-SHA256 of that nonce keyed by its local secret, as lower
//! case hex.  The construction is fully specified, so a separately built
//! server can recompute the reply and compare it.

use std::fmt::Write;

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Computes the `nonce-reply` payload for `nonce` under `credential`.
///
/// The result is always 64 lower-case hex digits.
pub fn nonce_reply(credential: &str, nonce: &str) -> String {
    // HMAC pads or hashes the key, so every key length is valid.
    let mut mac = HmacSha256::new_from_slice(credential.as_bytes())
        .expect("HMAC accepts keys of any length");
    mac.update(nonce.as_bytes());
    let digest = mac.finalize().into_bytes();

    let mut reply = String::with_capacity(digest.len() * 2);
    for byte in digest {
        // Writing to a String cannot fail.
        let _ = write!(reply, "{byte:02x}");
    }
    reply
}

// ── Tests ─────────────────────────────────────────────────────────────────────
