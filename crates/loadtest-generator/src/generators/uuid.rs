//! UUID and hash-shaped token generators.

use crate::document::GeneratedValue;
use rand::Rng;
use uuid::Uuid;

const HEX: &[u8] = b"0123456789abcdef";

/// Length of a `sha` value, matching a hex-encoded SHA-1 digest.
pub const SHA_HEX_LEN: usize = 40;

/// Generate a random UUID v4 using the provided RNG.
pub fn random_uuid_v4<R: Rng>(rng: &mut R) -> Uuid {
    let mut bytes = [0u8; 16];
    rng.fill(&mut bytes);

    bytes[6] = (bytes[6] & 0x0f) | 0x40; // Version 4
    bytes[8] = (bytes[8] & 0x3f) | 0x80; // Variant RFC 4122

    Uuid::from_bytes(bytes)
}

/// `uuid`: hyphenated v4 UUID text.
pub fn generate_uuid_v4<R: Rng>(rng: &mut R) -> GeneratedValue {
    GeneratedValue::String(random_uuid_v4(rng).to_string())
}

/// `sha`: 40 lowercase hex characters.
pub fn generate_sha<R: Rng>(rng: &mut R) -> GeneratedValue {
    let digest: String = (0..SHA_HEX_LEN)
        .map(|_| HEX[rng.gen_range(0..HEX.len())] as char)
        .collect();
    GeneratedValue::String(digest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_generate_uuid_v4() {
        let mut rng = StdRng::seed_from_u64(42);
        let value = generate_uuid_v4(&mut rng);
        let parsed = Uuid::parse_str(value.as_str().unwrap()).unwrap();
        assert_eq!(parsed.get_version_num(), 4);

        let value2 = generate_uuid_v4(&mut rng);
        assert_ne!(value, value2);
    }

    #[test]
    fn test_uuid_deterministic() {
        let mut rng1 = StdRng::seed_from_u64(42);
        let mut rng2 = StdRng::seed_from_u64(42);

        assert_eq!(random_uuid_v4(&mut rng1), random_uuid_v4(&mut rng2));
    }

    #[test]
    fn test_generate_sha() {
        let mut rng = StdRng::seed_from_u64(42);
        let value = generate_sha(&mut rng);
        let s = value.as_str().unwrap();
        assert_eq!(s.len(), 40);
        assert!(s.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }
}
