//! Color theme preference.
//!
//! The theme flag is the only piece of local state the dashboard persists;
//! everything else lives in the remote store. The [`ThemeStore`] seam exists
//! so the shell can back it with whatever local storage it has.

use std::sync::Mutex;

/// Dashboard color theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// The other theme.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

/// Persists the theme flag across sessions.
pub trait ThemeStore: Send + Sync {
    /// The stored theme, or the default if none was stored yet.
    fn load(&self) -> Theme;

    /// Persist a theme choice.
    fn store(&self, theme: Theme);
}

/// Process-local theme store for tests and headless use.
#[derive(Debug, Default)]
pub struct MemoryThemeStore {
    current: Mutex<Theme>,
}

impl MemoryThemeStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl ThemeStore for MemoryThemeStore {
    fn load(&self) -> Theme {
        *self.current.lock().expect("theme lock poisoned")
    }

    fn store(&self, theme: Theme) {
        *self.current.lock().expect("theme lock poisoned") = theme;
    }
}

/// Flip the stored theme and return the new value.
pub fn toggle(store: &dyn ThemeStore) -> Theme {
    let next = store.load().toggled();
    store.store(next);
    tracing::debug!(theme = ?next, "theme toggled");
    next
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_theme_is_light() {
        let store = MemoryThemeStore::new();
        assert_eq!(store.load(), Theme::Light);
    }

    #[test]
    fn test_toggle_persists() {
        let store = MemoryThemeStore::new();
        assert_eq!(toggle(&store), Theme::Dark);
        assert_eq!(store.load(), Theme::Dark);
        assert_eq!(toggle(&store), Theme::Light);
    }
}
