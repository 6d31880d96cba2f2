//! Serialised access to the process environment.
//!
//! Configuration reads `OVH_CONFIG_PATH` and the `OVH_*` settings while
//! tests rewrite the same variables through [`crate::test_utils::EnvGuard`].
//! All of it goes through one mutex; a panicking holder does not poison
//! later readers.

use std::env;
use std::ffi::{OsStr, OsString};
use std::sync::{Mutex, MutexGuard, OnceLock, PoisonError};

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn lock() -> MutexGuard<'static, ()> {
    ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
}

pub fn set_var<K: AsRef<OsStr>, V: AsRef<OsStr>>(key: K, value: V) {
    let _guard = lock();
    // SAFETY: every env access in this crate holds `ENV_LOCK`.
    unsafe { env::set_var(key, value) };
}

pub fn remove_var<K: AsRef<OsStr>>(key: K) {
    let _guard = lock();
    // SAFETY: every env access in this crate holds `ENV_LOCK`.
    unsafe { env::remove_var(key) };
}

/// Raw value of `key`, used to restore variables after a test.
#[must_use]
pub fn var_os<K: AsRef<OsStr>>(key: K) -> Option<OsString> {
    let _guard = lock();
    env::var_os(key)
}

/// Value of `key` when set to non-blank Unicode.
///
/// `OVH_CONFIG_PATH=` in a shell profile means "no explicit file", not a
/// file named after the empty string.
#[must_use]
pub fn non_empty_var<K: AsRef<OsStr>>(key: K) -> Option<String> {
    let _guard = lock();
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Run `op` with the lock held, so a figment `Env` provider merged inside
/// sees every `OVH_*` variable from the same moment.
pub fn with_lock<T, F>(op: F) -> T
where
    F: FnOnce() -> T,
{
    let _guard = lock();
    op()
}
