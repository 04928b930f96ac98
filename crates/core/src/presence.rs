//! Explicit key presence for partially supplied JSON objects.
//!
//! `Option` alone cannot tell "key missing" from "key set to null", so
//! nullable fields are carried as `Presence<Option<T>>`.

/// Whether a key was supplied in the input, and with what value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Presence<T> {
    /// The key did not appear in the input.
    Absent,
    /// The key appeared with this value (which may itself be `None`).
    Present(T),
}

impl<T> Default for Presence<T> {
    fn default() -> Self {
        Presence::Absent
    }
}

impl<T> Presence<T> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Presence::Absent)
    }

    pub fn is_present(&self) -> bool {
        !self.is_absent()
    }

    /// Return the supplied value, or keep `current` when the key was absent.
    pub fn or_keep(self, current: T) -> T {
        match self {
            Presence::Absent => current,
            Presence::Present(value) => value,
        }
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Presence::Absent => None,
            Presence::Present(value) => Some(value),
        }
    }
}

impl<T> Presence<Option<T>> {
    /// Collapse to the stored value: absent and explicit null both become `None`.
    pub fn flatten(self) -> Option<T> {
        self.into_option().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_keeps_current_value() {
        let patch: Presence<Option<String>> = Presence::Absent;
        assert_eq!(patch.or_keep(Some("rust".into())), Some("rust".to_string()));
    }

    #[test]
    fn explicit_null_overwrites_current_value() {
        let patch: Presence<Option<String>> = Presence::Present(None);
        assert_eq!(patch.or_keep(Some("rust".into())), None);
    }

    #[test]
    fn flatten_treats_absent_and_null_alike() {
        assert_eq!(Presence::<Option<u8>>::Absent.flatten(), None);
        assert_eq!(Presence::Present(None::<u8>).flatten(), None);
        assert_eq!(Presence::Present(Some(3u8)).flatten(), Some(3));
    }

    #[test]
    fn default_is_absent() {
        assert!(Presence::<bool>::default().is_absent());
        assert!(Presence::Present(false).is_present());
    }
}
