use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64Mcg;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

// Round randomness goes through an injectable source so tests can script draws. Production uses a
// PCG stream whose seed is expanded through SHA-256, so a logged seed replays a round exactly.

const LOG_TARGET: &str = "impostor::rng";

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub enum RandomEventKind {
    ShuffleRoster,
    PickImpostor,
    PickWord,
}

pub trait RandomSource {
    /// Uniform value in `0..bound`. A zero bound yields 0.
    fn generate(&mut self, bound: u64, kind: RandomEventKind) -> u64;

    fn pick_index(&mut self, len: usize, kind: RandomEventKind) -> usize {
        self.generate(len as u64, kind) as usize
    }

    /// Fisher–Yates, walking from the back.
    fn shuffle<T>(&mut self, items: &mut [T], kind: RandomEventKind)
    where
        Self: Sized,
    {
        if items.len() <= 1 {
            return;
        }
        for i in (1..items.len()).rev() {
            let idx = self.generate((i + 1) as u64, kind) as usize;
            items.swap(i, idx);
        }
    }
}

#[derive(Clone, Debug)]
pub struct PcgSource {
    seed: u64,
    draws: u64,
    rng: Pcg64Mcg,
}

impl PcgSource {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            seed,
            draws: 0,
            rng: pcg_from_seed(derive_seed(seed, "impostor-round")),
        }
    }

    pub fn from_entropy() -> Self {
        Self::from_seed(rand::thread_rng().gen::<u64>())
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn draws(&self) -> u64 {
        self.draws
    }
}

impl RandomSource for PcgSource {
    fn generate(&mut self, bound: u64, kind: RandomEventKind) -> u64 {
        if bound == 0 {
            return 0;
        }
        let result = self.rng.gen_range(0..bound);
        self.draws += 1;
        tracing::trace!(target: LOG_TARGET, ?kind, bound, result, draw = self.draws, "random draw");
        result
    }
}

pub fn derive_seed(base: u64, label: &str) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(base.to_le_bytes());
    hasher.update(label.as_bytes());
    let hash = hasher.finalize();
    let mut seed_bytes = [0u8; 8];
    seed_bytes.copy_from_slice(&hash[..8]);
    u64::from_le_bytes(seed_bytes)
}

pub fn pcg_from_seed(seed: u64) -> Pcg64Mcg {
    // Expand the u64 into 16 bytes to seed the PCG generator deterministically.
    let mut hasher = Sha256::new();
    hasher.update(seed.to_le_bytes());
    let digest = hasher.finalize();
    let mut seed_bytes = [0u8; 16];
    seed_bytes.copy_from_slice(&digest[..16]);
    Pcg64Mcg::from_seed(seed_bytes)
}

/// Replays a fixed list of raw values, each reduced modulo the requested bound.
#[cfg(test)]
#[derive(Clone, Debug, Default)]
pub(crate) struct ScriptedSource {
    values: std::collections::VecDeque<u64>,
}

#[cfg(test)]
impl ScriptedSource {
    pub(crate) fn new(values: impl IntoIterator<Item = u64>) -> Self {
        Self {
            values: values.into_iter().collect(),
        }
    }
}

#[cfg(test)]
impl RandomSource for ScriptedSource {
    fn generate(&mut self, bound: u64, _kind: RandomEventKind) -> u64 {
        if bound == 0 {
            return 0;
        }
        self.values.pop_front().unwrap_or(0) % bound
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_replays_same_draws() {
        let mut a = PcgSource::from_seed(7);
        let mut b = PcgSource::from_seed(7);
        let xs: Vec<u64> = (0..32).map(|_| a.generate(1000, RandomEventKind::PickWord)).collect();
        let ys: Vec<u64> = (0..32).map(|_| b.generate(1000, RandomEventKind::PickWord)).collect();
        assert_eq!(xs, ys);
        assert_eq!(a.draws(), 32);
    }

    #[test]
    fn zero_bound_does_not_draw() {
        let mut src = PcgSource::from_seed(1);
        assert_eq!(src.generate(0, RandomEventKind::PickImpostor), 0);
        assert_eq!(src.draws(), 0);
    }

    #[test]
    fn shuffle_is_a_permutation() {
        let mut src = PcgSource::from_seed(99);
        let mut items: Vec<u32> = (0..20).collect();
        src.shuffle(&mut items, RandomEventKind::ShuffleRoster);
        let mut sorted = items.clone();
        sorted.sort();
        assert_eq!(sorted, (0..20).collect::<Vec<_>>());
        assert_eq!(src.draws(), 19);
    }

    #[test]
    fn scripted_shuffle_follows_fisher_yates() {
        // i=2 swaps with 0, i=1 swaps with 1.
        let mut src = ScriptedSource::new([0, 1]);
        let mut items = vec!['a', 'b', 'c'];
        src.shuffle(&mut items, RandomEventKind::ShuffleRoster);
        assert_eq!(items, vec!['c', 'b', 'a']);
    }

    #[test]
    fn picks_are_roughly_uniform() {
        let mut src = PcgSource::from_seed(2024);
        let mut counts = [0u32; 3];
        for _ in 0..3000 {
            counts[src.pick_index(3, RandomEventKind::PickImpostor)] += 1;
        }
        for c in counts {
            assert!((800..1200).contains(&c), "skewed bucket: {:?}", counts);
        }
    }
}
