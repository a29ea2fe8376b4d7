use std::sync::Mutex;

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Runs `f` with environment variables temporarily set or removed.
///
/// Process environment is global state, so the lock keeps parallel tests from
/// interleaving their changes, and the guard restores every variable on exit,
/// panics included.
///
/// `changes` is a list of `(key, value)` pairs:
/// - `Some(v)` sets the variable to `v`
/// - `None` removes the variable
pub fn with_scoped_env<F, R>(changes: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_LOCK
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    let _restore = EnvSnapshot::apply(changes);
    f()
}

struct EnvSnapshot {
    previous: Vec<(String, Option<String>)>,
}

impl EnvSnapshot {
    fn apply(changes: &[(&str, Option<&str>)]) -> Self {
        let mut previous: Vec<(String, Option<String>)> = Vec::with_capacity(changes.len());
        for (key, value) in changes {
            // Snapshot each key once, at its value before any change.
            if !previous.iter().any(|(seen, _)| seen.as_str() == *key) {
                previous.push((key.to_string(), std::env::var(key).ok()));
            }
            match value {
                Some(v) => std::env::set_var(key, v),
                None => std::env::remove_var(key),
            }
        }
        Self { previous }
    }
}

impl Drop for EnvSnapshot {
    fn drop(&mut self) {
        while let Some((key, value)) = self.previous.pop() {
            match value {
                Some(v) => std::env::set_var(&key, v),
                None => std::env::remove_var(&key),
            }
        }
    }
}
