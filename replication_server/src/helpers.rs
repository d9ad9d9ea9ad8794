use hmac::{Hmac, Mac};
use sha2::Sha256;

/// Base64-encoded HMAC-SHA256 over the raw request body.
///
/// The digest must be computed over the exact bytes as received. Re-serializing the JSON (whitespace, key order)
/// changes the digest and breaks verification.
pub fn calculate_hmac(secret: &str, body: &[u8]) -> String {
    let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes()).expect("HMAC accepts keys of any size");
    mac.update(body);
    base64::encode(mac.finalize().into_bytes())
}
