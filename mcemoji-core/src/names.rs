//! Fallback names for records whose requested name is already taken

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Length of generated fallback names
const FALLBACK_NAME_LEN: usize = 10;

/// Produces candidate names when an added record collides with a live one
///
/// The store keeps asking until it gets a name no live record holds, so a
/// generator does not need to track what it has handed out.
pub trait NameGenerator {
    fn generate_fallback_name(&mut self) -> String;
}

impl<F> NameGenerator for F
where
    F: FnMut() -> String,
{
    fn generate_fallback_name(&mut self) -> String {
        self()
    }
}

/// Generates random lowercase names that satisfy the name pattern
#[derive(Debug, Clone)]
pub struct RandomNameGenerator {
    rng: StdRng,
}

impl RandomNameGenerator {
    /// Creates a generator seeded from the operating system
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Creates a reproducible generator
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomNameGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl NameGenerator for RandomNameGenerator {
    fn generate_fallback_name(&mut self) -> String {
        (0..FALLBACK_NAME_LEN)
            .map(|_| self.rng.random_range(b'a'..=b'z') as char)
            .collect()
    }
}

/// Spells `n` in bijective base 26 (`a`, ..., `z`, `aa`, ...)
pub fn letters(mut n: usize) -> String {
    let mut out = Vec::new();
    loop {
        out.push((b'a' + (n % 26) as u8) as char);
        n /= 26;
        if n == 0 {
            break;
        }
        n -= 1;
    }
    out.into_iter().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::is_valid_name;

    #[test]
    fn test_random_names_are_valid() {
        let mut generator = RandomNameGenerator::new();
        for _ in 0..100 {
            let name = generator.generate_fallback_name();
            assert!(is_valid_name(&name), "{name}");
        }
    }

    #[test]
    fn test_seeded_generator_is_reproducible() {
        let mut a = RandomNameGenerator::seeded(42);
        let mut b = RandomNameGenerator::seeded(42);
        assert_eq!(a.generate_fallback_name(), b.generate_fallback_name());
    }

    #[test]
    fn test_closure_generator() {
        let mut count = 0;
        let mut generator = || {
            count += 1;
            format!("fallback_{}", "x".repeat(count))
        };
        assert_eq!(generator.generate_fallback_name(), "fallback_x");
        assert_eq!(generator.generate_fallback_name(), "fallback_xx");
    }

    #[test]
    fn test_letters() {
        assert_eq!(letters(0), "a");
        assert_eq!(letters(25), "z");
        assert_eq!(letters(26), "aa");
        assert_eq!(letters(27), "ab");
        assert_eq!(letters(26 + 26 * 26), "aaa");
        assert!(is_valid_name(&letters(usize::MAX)));
    }
}
