/// Deterministic pseudo-random source for the synthetic soiling model.
///
/// Two pieces:
///  * `hash_string`: 32-bit string hash (the classic `h*31 + c` loop,
///    written as `(h << 5) - h` with wrapping arithmetic) so a configuration
///    hash string always maps to the same seed, on every platform.
///  * `SeededRandom`: a small linear congruential generator
///    (`seed = (seed * 9301 + 49297) mod 233280`). The seed lives in a `u64`
///    because the first step multiplies a full 32-bit hash by 9301, which
///    must not lose precision.
///
/// Same seed, same infinite sequence. Each generation run owns its own
/// instance; there is no global generator.

pub struct SeededRandom {
    seed: u64,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Seed from a string by hashing it first.
    pub fn from_str_seed(s: &str) -> Self {
        Self::new(hash_string(s) as u64)
    }

    /// Next value in `[0, 1)`.
    pub fn next(&mut self) -> f64 {
        self.seed = (self.seed.wrapping_mul(9301).wrapping_add(49297)) % 233280;
        self.seed as f64 / 233280.0
    }

    /// Random integer between `min` and `max`, both inclusive.
    pub fn next_int(&mut self, min: i64, max: i64) -> i64 {
        (self.next() * (max - min + 1) as f64).floor() as i64 + min
    }

    /// Random float in `[min, max)`.
    pub fn next_float(&mut self, min: f64, max: f64) -> f64 {
        min + self.next() * (max - min)
    }
}

/// Deterministic, order-sensitive string hash.
///
/// Iterates UTF-16 code units with 32-bit signed wrapping semantics:
/// `h = (h << 5) - h + code`. Result is the absolute value, so non-empty
/// strings hash to a non-negative integer.
pub fn hash_string(s: &str) -> u32 {
    let mut hash: i32 = 0;
    for code in s.encode_utf16() {
        hash = hash
            .wrapping_shl(5)
            .wrapping_sub(hash)
            .wrapping_add(code as i32);
    }
    hash.unsigned_abs()
}
