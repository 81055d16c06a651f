use rand::Rng;

/// Builds a `length`-character hexadecimal identification from random 32-bit
/// words, concatenated and truncated.
pub fn generate_identification<R: Rng + ?Sized>(length: usize, rng: &mut R) -> String {
    let mut builder = String::with_capacity(length + 8);

    while builder.len() < length {
        builder.push_str(&format!("{:08x}", rng.gen::<u32>()));
    }

    builder.truncate(length);
    builder
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_same_seed_same_identification() {
        let first = generate_identification(40, &mut StdRng::seed_from_u64(42));
        let second = generate_identification(40, &mut StdRng::seed_from_u64(42));
        assert_eq!(first, second);
    }

    #[test]
    fn test_zero_length() {
        assert_eq!(generate_identification(0, &mut StdRng::seed_from_u64(1)), "");
    }

    proptest! {
        #[test]
        fn always_exact_length_hex(length in 0usize..128, seed in any::<u64>()) {
            let id = generate_identification(length, &mut StdRng::seed_from_u64(seed));
            prop_assert_eq!(id.len(), length);
            prop_assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
        }
    }
}
