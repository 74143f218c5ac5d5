use std::fmt;
use uuid::Uuid;

/// Client-side identity for entities the backend only addresses by name or position.
///
/// Keys are generated when a category or dish is first seen and are never sent
/// over the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityKey(Uuid);

impl EntityKey {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Short form used in listings and shell commands.
    pub fn short(&self) -> String {
        self.0.simple().to_string()[..8].to_string()
    }

    pub fn matches_prefix(&self, prefix: &str) -> bool {
        !prefix.is_empty() && self.0.simple().to_string().starts_with(&prefix.to_lowercase())
    }
}

impl Default for EntityKey {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_are_unique() {
        assert_ne!(EntityKey::new(), EntityKey::new());
    }

    #[test]
    fn test_short_prefix_matches() {
        let key = EntityKey::new();
        let short = key.short();
        assert_eq!(short.len(), 8);
        assert!(key.matches_prefix(&short));
        assert!(key.matches_prefix(&short.to_uppercase()));
        assert!(!key.matches_prefix(""));
    }
}
