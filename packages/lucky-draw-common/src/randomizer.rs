use sha2::{Digest, Sha256};

/// Source of uniform choices for the draw.
///
/// Implementors only provide `pick`; `shuffle` is the Fisher–Yates walk built
/// on top of it and should not be overridden.
pub trait Randomizer {
    /// Uniform index in `[0, bound)`. Callers never pass `bound == 0`.
    fn pick(&mut self, bound: usize) -> usize;

    /// Returns a uniformly random permutation of `items`, leaving `items` as is.
    fn shuffle<T: Clone>(&mut self, items: &[T]) -> Vec<T>
    where
        Self: Sized,
    {
        let mut out = items.to_vec();
        for i in (1..out.len()).rev() {
            let j = self.pick(i + 1);
            out.swap(i, j);
        }
        out
    }
}

/// Deterministic randomizer: a SHA-256 counter-mode stream over a 32-byte seed.
///
/// `block_n = sha256( seed || n_u64_be )`, consumed 8 bytes at a time as
/// big-endian u64 words. Indices are taken by rejection sampling so every
/// index in `[0, bound)` is equally likely.
#[derive(Clone, Debug)]
pub struct SeededRandomizer {
    seed: [u8; 32],
    counter: u64,
    block: [u8; 32],
    offset: usize,
}

impl SeededRandomizer {
    pub fn new(seed: [u8; 32]) -> Self {
        Self {
            seed,
            counter: 0,
            block: [0u8; 32],
            offset: 32,
        }
    }

    /// Seed = sha256 of the concatenated entropy parts.
    pub fn from_entropy(parts: &[&[u8]]) -> Self {
        let mut hasher = Sha256::new();
        for part in parts {
            hasher.update(part);
        }
        Self::new(hasher.finalize().into())
    }

    pub fn seed_hex(&self) -> String {
        hex::encode(self.seed)
    }

    fn next_u64(&mut self) -> u64 {
        if self.offset + 8 > self.block.len() {
            self.refill();
        }
        let mut word = [0u8; 8];
        word.copy_from_slice(&self.block[self.offset..self.offset + 8]);
        self.offset += 8;
        u64::from_be_bytes(word)
    }

    fn refill(&mut self) {
        let mut hasher = Sha256::new();
        hasher.update(self.seed);
        hasher.update(self.counter.to_be_bytes());
        self.block = hasher.finalize().into();
        self.counter += 1;
        self.offset = 0;
    }
}

impl Randomizer for SeededRandomizer {
    fn pick(&mut self, bound: usize) -> usize {
        let bound = bound as u64;
        // Largest multiple of `bound` representable; anything at or above it is redrawn.
        let zone = u64::MAX - (u64::MAX % bound);
        loop {
            let value = self.next_u64();
            if value < zone {
                return (value % bound) as usize;
            }
        }
    }
}
