//! Process environment overrides shared by integration tests.

use std::env;
use std::ffi::OsString;
use std::sync::{Mutex, MutexGuard, OnceLock};

static ENV_MUTEX: OnceLock<Mutex<()>> = OnceLock::new();

/// Variable name paired with its new value; `None` removes the variable.
pub type EnvChange = (OsString, Option<OsString>);

/// Holds the environment lock and restores overridden variables on drop.
pub struct EnvVarGuard {
    saved: Vec<EnvChange>,
    _lock: MutexGuard<'static, ()>,
}

impl EnvVarGuard {
    /// Applies `changes` until the guard is dropped.
    pub fn set_many(changes: &[EnvChange]) -> Self {
        let lock = ENV_MUTEX
            .get_or_init(|| Mutex::new(()))
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let saved = changes
            .iter()
            .map(|(key, value)| {
                let previous = env::var_os(key);
                write_var(key, value.as_ref());
                (key.clone(), previous)
            })
            .collect();
        Self { saved, _lock: lock }
    }
}

impl Drop for EnvVarGuard {
    fn drop(&mut self) {
        for (key, value) in self.saved.drain(..).rev() {
            write_var(&key, value.as_ref());
        }
    }
}

fn write_var(key: &OsString, value: Option<&OsString>) {
    unsafe {
        // SAFETY: ENV_MUTEX serialises every environment write made by the tests.
        match value {
            Some(new_value) => env::set_var(key, new_value),
            None => env::remove_var(key),
        }
    }
}
