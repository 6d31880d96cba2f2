//! Helpers for tests that touch process-wide state.

use std::ffi::{OsStr, OsString};

use crate::environment;

/// Set an environment variable for testing.
///
/// Goes through [`environment`] so the write is serialised with the
/// configuration loader.
pub fn set_var<K: AsRef<OsStr>, V: AsRef<OsStr>>(key: K, value: V) {
    environment::set_var(key, value);
}

/// Remove an environment variable set during testing.
pub fn remove_var<K: AsRef<OsStr>>(key: K) {
    environment::remove_var(key);
}

/// Removes `keys` for its lifetime and restores the previous values on drop.
///
/// Callers still need `#[serial]`: the guard protects individual reads and
/// writes, not the whole test.
pub struct EnvGuard {
    entries: Vec<(OsString, Option<OsString>)>,
}

impl EnvGuard {
    #[must_use]
    pub fn new(keys: &[&str]) -> Self {
        let entries = keys
            .iter()
            .map(|key| {
                let key = OsString::from(key);
                let previous = environment::var_os(&key);
                remove_var(&key);
                (key, previous)
            })
            .collect();
        Self { entries }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (key, value) in &mut self.entries {
            match value.take() {
                Some(val) => set_var(&*key, val),
                None => remove_var(&*key),
            }
        }
    }
}
