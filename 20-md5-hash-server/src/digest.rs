use md5::{Digest, Md5};

/// Width of a digest on the wire: two hex characters per MD5 output byte.
pub const DIGEST_HEX_LEN: usize = 32;

/// Lowercase hex MD5 of exactly `chunk`.
pub fn hex_digest(chunk: &[u8]) -> String {
    hex::encode(Md5::digest(chunk))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_known_vectors() {
        assert_eq!(hex_digest(b""), "d41d8cd98f00b204e9800998ecf8427e");
        assert_eq!(hex_digest(b"abc"), "900150983cd24fb0d6963f7d28e17f72");
        assert_eq!(
            hex_digest(b"First message: Hello, server!"),
            "f0b6e50fb303c601c34acb8e0a53113b"
        );
    }

    #[test]
    fn output_is_fixed_width_lowercase() {
        for input in [&b"x"[..], &[0xff; 1024][..], &b"Tenth message: Goodbye!"[..]] {
            let digest = hex_digest(input);
            assert_eq!(digest.len(), DIGEST_HEX_LEN);
            assert!(digest
                .chars()
                .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
        }
    }

    #[test]
    fn concatenation_hashes_differently_from_parts() {
        let whole = hex_digest(b"hello world");
        assert_ne!(whole, hex_digest(b"hello "));
        assert_ne!(whole, hex_digest(b"world"));
        assert_eq!(whole, "5eb63bbbe01eeed093cb22bb8f5acdc3");
    }
}
