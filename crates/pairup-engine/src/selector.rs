// SPDX-FileCopyrightText: 2026 Pairup Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Candidate pair selection.

use std::sync::Mutex;

use pairup_config::model::SelectionStrategy;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub(crate) enum Selector {
    /// Head of the pool against the `1 + attempt`-th candidate, wrapping.
    Fifo,
    Random(Mutex<StdRng>),
}

impl Selector {
    pub(crate) fn new(strategy: SelectionStrategy, seed: Option<u64>) -> Self {
        match strategy {
            SelectionStrategy::Fifo => Self::Fifo,
            SelectionStrategy::Random => {
                let rng = seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
                Self::Random(Mutex::new(rng))
            }
        }
    }

    /// Picks two distinct indexes into a pool of `len >= 2` members.
    ///
    /// `attempt` is the number of collisions seen so far, so FIFO moves on to
    /// the next candidate after each one.
    pub(crate) fn pick(&self, len: usize, attempt: u32) -> (usize, usize) {
        debug_assert!(len >= 2);
        match self {
            Self::Fifo => (0, 1 + attempt as usize % (len - 1)),
            Self::Random(rng) => {
                let mut rng = rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
                let first = rng.gen_range(0..len);
                let mut second = rng.gen_range(0..len - 1);
                if second >= first {
                    second += 1;
                }
                (first, second)
            }
        }
    }
}
