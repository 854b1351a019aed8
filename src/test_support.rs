use std::sync::{Mutex, MutexGuard};

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Serializes tests that touch `MAILCARDS_*` variables. Every variable set or
/// unset through the guard gets its previous value back on drop.
pub struct ScopedEnv {
    saved: Vec<(&'static str, Option<String>)>,
    _lock: MutexGuard<'static, ()>,
}

impl ScopedEnv {
    pub fn lock() -> Self {
        let lock = ENV_LOCK
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Self {
            saved: Vec::new(),
            _lock: lock,
        }
    }

    pub fn set(&mut self, key: &'static str, value: &str) -> &mut Self {
        self.remember(key);
        std::env::set_var(key, value);
        self
    }

    pub fn unset(&mut self, key: &'static str) -> &mut Self {
        self.remember(key);
        std::env::remove_var(key);
        self
    }

    fn remember(&mut self, key: &'static str) {
        if !self.saved.iter().any(|(saved, _)| *saved == key) {
            self.saved.push((key, std::env::var(key).ok()));
        }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (key, previous) in self.saved.drain(..).rev() {
            match previous {
                Some(value) => std::env::set_var(key, value),
                None => std::env::remove_var(key),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_previous_values_come_back_on_drop() {
        const KEY: &str = "MAILCARDS_SCOPED_ENV_CHECK";
        {
            let mut env = ScopedEnv::lock();
            env.unset(KEY);
        }
        {
            let mut env = ScopedEnv::lock();
            env.set(KEY, "first").set(KEY, "second");
            assert_eq!(std::env::var(KEY).as_deref(), Ok("second"));
        }
        assert!(std::env::var(KEY).is_err());
    }
}
