//! Deterministic RNG based on splitmix64. Every random choice in the crate
//! flows through an explicitly passed `Rng`, never a global generator.

pub const SALT_GENERATE: u64 = 0x4D41_5A45_0000_0001;
pub const SALT_SOLVE: u64 = 0x4D41_5A45_0000_0002;

#[inline]
pub fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E3779B97F4A7C15);
    let mut z = x;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
    z ^ (z >> 31)
}

/// Simple sequential RNG.
#[derive(Clone, Debug)]
pub struct Rng {
    state: u64,
}

impl Rng {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Independent stream for one phase of a run.
    pub fn salted(seed: u64, salt: u64) -> Self {
        Self::new(splitmix64(seed ^ salt))
    }

    pub fn next_u64(&mut self) -> u64 {
        self.state = splitmix64(self.state);
        self.state
    }

    /// Uniform in `0..max`. Rejects the biased tail instead of taking a plain modulo.
    pub fn range_usize(&mut self, max: usize) -> usize {
        assert!(max > 0, "range_usize called with empty range");
        let max = max as u64;
        let zone = u64::MAX - (u64::MAX % max);
        loop {
            let v = self.next_u64();
            if v < zone {
                return (v % max) as usize;
            }
        }
    }

    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        Some(&items[self.range_usize(items.len())])
    }
}
