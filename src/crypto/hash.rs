use md5::{Digest, Md5};

/// Computes the MD5 digest of raw bytes
pub fn md5(data: &[u8]) -> Vec<u8> {
    let mut hasher = Md5::new();
    hasher.update(data);
    hasher.finalize().to_vec()
}

/// Computes the MD5 digest and returns it as lowercase hex (no prefix)
pub fn md5_hex(data: &[u8]) -> String {
    hex::encode(md5(data))
}

/// Helper for hashing a string directly
pub fn hash_string(s: &str) -> String {
    md5_hex(s.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn md5_hex_matches_empty_string_vector() {
        let digest = md5_hex(b"");
        assert_eq!(digest, "d41d8cd98f00b204e9800998ecf8427e");
        assert_eq!(digest.len(), 32);
    }

    #[test]
    fn hash_string_matches_rfc_vector() {
        assert_eq!(hash_string("abc"), "900150983cd24fb0d6963f7d28e17f72");
        assert_eq!(hash_string("abc"), md5_hex("abc".as_bytes()));
    }
}
