use std::collections::HashMap;

use crate::error::LevelError;

/// Append-only mapping from level source id to level index.
///
/// Indices are handed out in registration order and never reused.
#[derive(Debug, Default, Clone)]
pub struct LevelRegistry {
    index: HashMap<String, usize>,
    order: Vec<String>,
}

impl LevelRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign the next index to `id`.
    pub fn register(&mut self, id: impl Into<String>) -> Result<usize, LevelError> {
        let id = id.into();
        if self.index.contains_key(&id) {
            return Err(LevelError::DuplicateLevel { id });
        }
        let idx = self.order.len();
        self.index.insert(id.clone(), idx);
        self.order.push(id);
        Ok(idx)
    }

    /// Index registered for `id`.
    #[inline]
    pub fn get(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Id registered at `idx`.
    pub fn id_of(&self, idx: usize) -> Option<&str> {
        self.order.get(idx).map(String::as_str)
    }

    /// Number of registered levels.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// `(id, index)` pairs in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.order.iter().enumerate().map(|(i, id)| (id.as_str(), i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assigns_indices_in_order() {
        let mut reg = LevelRegistry::new();
        assert_eq!(reg.register("a").unwrap(), 0);
        assert_eq!(reg.register("b").unwrap(), 1);
        assert_eq!(reg.get("b"), Some(1));
        assert_eq!(reg.id_of(0), Some("a"));
        assert_eq!(reg.get("c"), None);
    }

    #[test]
    fn rejects_duplicates_without_changing_state() {
        let mut reg = LevelRegistry::new();
        reg.register("a").unwrap();
        let err = reg.register("a").unwrap_err();
        assert!(matches!(err, LevelError::DuplicateLevel { id } if id == "a"));
        assert_eq!(reg.len(), 1);
    }
}
