use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Stable identity of a workspace record.
///
/// Handles are process-unique and never reused: removing a record retires
/// its handle for good. Pointer fields store handles as plain copyable
/// values, so records reference each other without owning each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Handle(Uuid);

impl Handle {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for Handle {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for Handle {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for Handle {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_handles_are_unique() {
        let mut seen: HashSet<Handle> = HashSet::new();
        for _ in 0..1000 {
            assert!(seen.insert(Handle::new()));
        }
    }

    #[test]
    fn test_handle_is_copy() {
        let h = Handle::new();
        let copy = h;
        assert_eq!(h, copy);
    }

    #[test]
    fn test_handle_display_matches_uuid() {
        let h = Handle::new();
        assert_eq!(h.to_string(), h.as_uuid().to_string());
    }
}
