//! Navigation and login-prompt hooks injected into the session controller

use std::sync::Mutex;

/// Changes the active route
pub trait Navigator: Send + Sync {
    fn push(&self, path: &str);
}

impl<F> Navigator for F
where
    F: Fn(&str) + Send + Sync,
{
    fn push(&self, path: &str) {
        self(path)
    }
}

/// Asks the user to authenticate again
pub trait LoginPrompt: Send + Sync {
    fn show_login_modal(&self);
}

impl<F> LoginPrompt for F
where
    F: Fn() + Send + Sync,
{
    fn show_login_modal(&self) {
        self()
    }
}

/// Navigator that records route history in memory
#[derive(Debug)]
pub struct MemoryNavigator {
    history: Mutex<Vec<String>>,
}

impl MemoryNavigator {
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            history: Mutex::new(vec![initial.into()]),
        }
    }

    /// The most recently pushed route
    pub fn current(&self) -> String {
        self.history
            .lock()
            .map(|h| h.last().cloned().unwrap_or_default())
            .unwrap_or_default()
    }

    /// Every route visited, oldest first, including the initial one
    pub fn history(&self) -> Vec<String> {
        self.history.lock().map(|h| h.clone()).unwrap_or_default()
    }
}

impl Default for MemoryNavigator {
    fn default() -> Self {
        Self::new("/")
    }
}

impl Navigator for MemoryNavigator {
    fn push(&self, path: &str) {
        tracing::debug!(path, "Navigating");
        if let Ok(mut history) = self.history.lock() {
            history.push(path.to_string());
        }
    }
}
