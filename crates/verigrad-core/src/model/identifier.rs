//! Base-58 text identifier checks.
//!
//! Addresses are 32-byte keys and signatures 64-byte values, both rendered in
//! the Bitcoin base-58 alphabet. Length ranges follow from the encoding: a
//! 32-byte value encodes to 32..=44 characters, a 64-byte value to 64..=88.

const ADDRESS_CHARS: std::ops::RangeInclusive<usize> = 32..=44;
const SIGNATURE_CHARS: std::ops::RangeInclusive<usize> = 64..=88;

fn decodes_to(s: &str, chars: &std::ops::RangeInclusive<usize>, bytes: usize) -> bool {
    if !chars.contains(&s.len()) {
        return false;
    }
    matches!(bs58::decode(s).into_vec(), Ok(v) if v.len() == bytes)
}

/// True if `s` is a base-58 encoded 32-byte address.
pub fn is_address(s: &str) -> bool {
    decodes_to(s, &ADDRESS_CHARS, 32)
}

/// True if `s` is a base-58 encoded 64-byte signature.
pub fn is_signature(s: &str) -> bool {
    decodes_to(s, &SIGNATURE_CHARS, 64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn known_addresses() {
        assert!(is_address("metaqbxxUerdq28cj1RbAWkYQm3ybzjb6a8bt518x1s"));
        assert!(is_address("11111111111111111111111111111111"));
        assert!(!is_address("0x742d35Cc6634C0532925a3b844Bc454e4438f44e"));
        assert!(!is_address(""));
    }

    #[test]
    fn rejects_ambiguous_alphabet() {
        // '0', 'O', 'I' and 'l' are not part of the alphabet.
        assert!(!is_address("0etaqbxxUerdq28cj1RbAWkYQm3ybzjb6a8bt518x1s"));
    }

    proptest! {
        #[test]
        fn any_32_bytes_is_an_address(bytes in proptest::array::uniform32(any::<u8>())) {
            let s = bs58::encode(bytes).into_string();
            prop_assert!(is_address(&s));
            prop_assert!(!is_signature(&s));
        }

        #[test]
        fn any_64_bytes_is_a_signature(
            a in proptest::array::uniform32(any::<u8>()),
            b in proptest::array::uniform32(any::<u8>()),
        ) {
            let mut bytes = a.to_vec();
            bytes.extend_from_slice(&b);
            let s = bs58::encode(bytes).into_string();
            prop_assert!(is_signature(&s));
        }
    }
}
