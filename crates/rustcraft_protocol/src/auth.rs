//! Session hash (C12): the `serverId` string a client/server pair exchange
//! during the online-mode login handshake, before either side contacts the
//! session server.

use sha1::{Digest, Sha1};

/// `SHA1(serverID ∥ sharedSecret ∥ publicKey)`, interpreted as a signed
/// big-endian integer and hex-formatted the way `BigInteger#toString(16)`
/// would in the reference client/server.
pub fn server_hash(server_id: &str, shared_secret: &[u8], public_key: &[u8]) -> String {
    let mut hasher = Sha1::new();
    hasher.update(server_id.as_bytes());
    hasher.update(shared_secret);
    hasher.update(public_key);
    let digest: [u8; 20] = hasher.finalize().into();
    format_signed_hex(digest)
}

/// Treats `digest` as a 160-bit two's-complement signed integer and renders
/// it the way Java's `BigInteger(digest).toString(16)` does: negative values
/// are negated first and prefixed with `-`, and neither branch has leading
/// zeros.
fn format_signed_hex(digest: [u8; 20]) -> String {
    let negative = digest[0] & 0x80 != 0;
    let magnitude = if negative { negate(digest) } else { digest };
    let hex = hex_no_leading_zeros(&magnitude);
    if negative { format!("-{hex}") } else { hex }
}

fn negate(bytes: [u8; 20]) -> [u8; 20] {
    let mut out = [0u8; 20];
    let mut carry = 1u16;
    for i in (0..20).rev() {
        let inverted = !bytes[i] as u16;
        let sum = inverted + carry;
        out[i] = sum as u8;
        carry = sum >> 8;
    }
    out
}

fn hex_no_leading_zeros(bytes: &[u8]) -> String {
    let hex = bytes.iter().map(|b| format!("{b:02x}")).collect::<String>();
    let trimmed = hex.trim_start_matches('0');
    if trimmed.is_empty() { "0".to_string() } else { trimmed.to_string() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cat_cat_cat_matches_known_vector() {
        assert_eq!(
            server_hash("cat", b"cat", b"cat"),
            "-af59e5b1d5d92e5c2c2776ed0e65e90be181f2a"
        );
    }

    #[test]
    fn positive_vector_has_no_leading_zeros() {
        // Notch's own well-known test vector.
        assert_eq!(
            server_hash("Notch", b"", b""),
            "4ed1f46bbe04bc756bcb17c0c7ce3e4632f06a48"
        );
    }

    #[test]
    fn jeb_vector_matches_known_hash() {
        assert_eq!(
            server_hash("jeb_", b"", b""),
            "-7c9d5b0044c130109a5d7b5fb5c317c02b4e28c1"
        );
    }
}
