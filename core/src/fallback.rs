//! Per-operation choice between the remote service and the demo store.
//!
//! | Mode | Remote outcome                    | Result                         |
//! |------|-----------------------------------|--------------------------------|
//! | Demo | not attempted                     | demo store                     |
//! | Live | success                           | server result                  |
//! | Live | `Timeout` / `NetworkUnreachable`  | same operation on demo store   |
//! | Live | any other error                   | error surfaces to the caller   |
//!
//! The mode is fixed when the policy is built. The store sits behind a
//! mutex so concurrent callers on different threads see a single writer;
//! the lock is never held across a network call.

use parking_lot::Mutex;
use tracing::warn;

use crate::config::Mode;
use crate::demo::DemoStore;
use crate::error::ApiError;

/// `true` when `err` should be answered from the demo store.
pub fn should_fall_back(err: &ApiError) -> bool {
    err.kind().is_connectivity()
}

#[derive(Debug)]
pub struct FallbackPolicy {
    mode: Mode,
    store: Mutex<DemoStore>,
}

impl FallbackPolicy {
    pub fn new(mode: Mode, store: DemoStore) -> Self {
        Self {
            mode,
            store: Mutex::new(store),
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Run `remote` (Live mode) or `local` against the store.
    pub fn run<R, F, L>(&self, operation: &'static str, remote: F, local: L) -> Result<R, ApiError>
    where
        F: FnOnce() -> Result<R, ApiError>,
        L: FnOnce(&mut DemoStore) -> Result<R, ApiError>,
    {
        if self.mode == Mode::Demo {
            return local(&mut *self.store.lock());
        }
        match remote() {
            Ok(value) => Ok(value),
            Err(err) if should_fall_back(&err) => {
                warn!(operation, error = %err, "remote call failed, serving demo data");
                local(&mut *self.store.lock())
            }
            Err(err) => Err(err),
        }
    }

    /// A copy of the current demo dataset.
    pub fn snapshot(&self) -> DemoStore {
        self.store.lock().clone()
    }
}
