// SPDX-FileCopyrightText: 2026 Pairup Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Run-locks for the cycle hooks.
//!
//! Each hook has its own lock: a second trigger of a running hook is
//! rejected right away. All hooks also share one engine lock, so different
//! hooks queue up instead of touching the same participants at once.

use std::collections::HashMap;
use std::sync::Arc;

use pairup_core::PairupError;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::hook::HookKind;

/// Held for the duration of one hook run.
pub struct RunGuard {
    _hook: Option<OwnedMutexGuard<()>>,
    _engine: OwnedMutexGuard<()>,
}

pub struct RunLocks {
    hooks: HashMap<HookKind, Arc<Mutex<()>>>,
    engine: Arc<Mutex<()>>,
}

impl RunLocks {
    pub fn new() -> Self {
        Self {
            hooks: HookKind::ALL
                .into_iter()
                .map(|kind| (kind, Arc::new(Mutex::new(()))))
                .collect(),
            engine: Arc::new(Mutex::new(())),
        }
    }

    /// Takes the hook's run-lock, then waits for the engine lock.
    pub async fn acquire(&self, hook: HookKind) -> Result<RunGuard, PairupError> {
        let hook_guard = match self.hooks.get(&hook) {
            Some(lock) => Some(lock.clone().try_lock_owned().map_err(|_| {
                PairupError::CycleInProgress {
                    hook: hook.to_string(),
                }
            })?),
            None => None,
        };
        let engine = self.engine.clone().lock_owned().await;
        Ok(RunGuard {
            _hook: hook_guard,
            _engine: engine,
        })
    }

    /// Waits for the engine lock alone, for single-participant updates.
    pub async fn engine(&self) -> RunGuard {
        RunGuard {
            _hook: None,
            _engine: self.engine.clone().lock_owned().await,
        }
    }
}

impl Default for RunLocks {
    fn default() -> Self {
        Self::new()
    }
}
