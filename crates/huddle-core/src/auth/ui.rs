//! UI visibility store.
//!
//! Independent boolean flags for the app's modal surfaces. Flags are toggled
//! by user interaction; the auth controller additionally forces
//! `AuthOverlay` open when a remote auth call fails.

use enum_map::{Enum, EnumMap};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Enum)]
pub enum UiFlag {
    /// The login/registration overlay.
    AuthOverlay,
    /// The profile settings modal.
    ProfileSettings,
}

#[derive(Debug, Default, Clone)]
pub struct UiStore {
    flags: EnumMap<UiFlag, bool>,
}

impl UiStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self, flag: UiFlag) -> bool {
        self.flags[flag]
    }

    pub fn set(&mut self, flag: UiFlag, value: bool) {
        self.flags[flag] = value;
    }

    /// Flips the flag and returns its new value.
    pub fn toggle(&mut self, flag: UiFlag) -> bool {
        let value = !self.flags[flag];
        self.flags[flag] = value;
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_start_closed() {
        let store = UiStore::new();
        assert!(!store.is_open(UiFlag::AuthOverlay));
        assert!(!store.is_open(UiFlag::ProfileSettings));
    }

    #[test]
    fn test_toggle_is_independent_per_flag() {
        let mut store = UiStore::new();
        assert!(store.toggle(UiFlag::ProfileSettings));
        assert!(!store.is_open(UiFlag::AuthOverlay));

        store.set(UiFlag::AuthOverlay, true);
        assert!(!store.toggle(UiFlag::ProfileSettings));
        assert!(store.is_open(UiFlag::AuthOverlay));
    }
}
