//! The archive: ordered, persisted collection of saved recipes.
//!
//! Newest first; insertion order is the recency order. Uniqueness is a
//! contains-check before insertion, so a duplicate insert is a no-op rather
//! than an error.

use serde::{Deserialize, Serialize};

use crate::recipe::Recipe;

/// Storage key the serialized archive lives under.
pub const STORAGE_KEY: &str = "cream_crafter_collection";

/// Ordered collection of saved recipes, serialized as a bare JSON array.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Archive {
    recipes: Vec<Recipe>,
}

impl Archive {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    /// Linear scan by id.
    pub fn contains(&self, id: &str) -> bool {
        self.recipes.iter().any(|r| r.id == id)
    }

    pub fn get(&self, id: &str) -> Option<&Recipe> {
        self.recipes.iter().find(|r| r.id == id)
    }

    /// Entry at a display position (0 = most recent).
    pub fn nth(&self, index: usize) -> Option<&Recipe> {
        self.recipes.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Recipe> {
        self.recipes.iter()
    }

    /// Prepend a recipe unless its id is already present. Returns whether
    /// the archive changed.
    pub fn insert(&mut self, recipe: Recipe) -> bool {
        if self.contains(&recipe.id) {
            return false;
        }
        self.recipes.insert(0, recipe);
        true
    }

    /// Remove the entry with the given id. Returns whether the archive
    /// changed.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.recipes.len();
        self.recipes.retain(|r| r.id != id);
        self.recipes.len() != before
    }
}
