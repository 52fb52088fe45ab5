//! RSVP code generation.

use rand::{rngs::OsRng, Rng};

/// Length of an RSVP code.
pub const RSVP_CODE_LEN: usize = 8;

/// Alphabet used for RSVP codes (lowercase base36).
const RSVP_CODE_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Generates a random RSVP code.
///
/// Characters are drawn uniformly from `[a-z0-9]` using the operating
/// system's CSPRNG, giving 36^8 (about 2^41.4) possible codes.
pub fn generate_rsvp_code() -> String {
    let mut rng = OsRng;
    (0..RSVP_CODE_LEN)
        .map(|_| {
            let idx = rng.gen_range(0..RSVP_CODE_ALPHABET.len());
            RSVP_CODE_ALPHABET[idx] as char
        })
        .collect()
}

/// Returns true if the input has the shape of an RSVP code.
pub fn is_rsvp_code_format(code: &str) -> bool {
    code.len() == RSVP_CODE_LEN
        && code
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generate_rsvp_code_format() {
        let code = generate_rsvp_code();
        assert_eq!(code.len(), RSVP_CODE_LEN);
        assert!(is_rsvp_code_format(&code), "unexpected code: {}", code);
    }

    #[test]
    fn test_generate_rsvp_code_is_random() {
        let codes: HashSet<String> = (0..1000).map(|_| generate_rsvp_code()).collect();
        // 1000 draws from 36^8 should practically never collide
        assert_eq!(codes.len(), 1000);
    }

    #[test]
    fn test_is_rsvp_code_format() {
        assert!(is_rsvp_code_format("abc12345"));
        assert!(is_rsvp_code_format("zzzzzzzz"));
        assert!(!is_rsvp_code_format("ABC12345"));
        assert!(!is_rsvp_code_format("abc1234"));
        assert!(!is_rsvp_code_format("abc123456"));
        assert!(!is_rsvp_code_format("abc-1234"));
        assert!(!is_rsvp_code_format(""));
    }
}
