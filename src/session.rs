//! Session controller: current view, displayed recipe, and archive
//! bookkeeping.
//!
//! All mutations of the session state go through named methods on
//! [`Session`]; there is no ambient global state. The session is the single
//! writer of the persisted archive (single-user, single-process assumption,
//! last write wins).

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error, info, warn};

use crate::archive::{Archive, STORAGE_KEY};
use crate::error::Result;
use crate::generator::RecipeGenerator;
use crate::recipe::{Recipe, UserPreferences};
use crate::store::KvStore;
use crate::walkthrough::Walkthrough;

/// Confirmation message shown before removing a recipe.
pub const REMOVE_CONFIRM_MESSAGE: &str = "Delete this recipe? It cannot be recovered.";

/// Which surface the session is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Authoring form, or the freshly displayed recipe.
    Create,
    /// The saved-recipe listing.
    Archives,
}

/// Outcome of a save request. Saving an already-archived recipe is not an
/// error, just "already there".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved,
    AlreadySaved,
}

/// Outcome of a removal request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed {
        /// Whether the removed recipe was the one on display.
        cleared_display: bool,
    },
    /// User declined the confirmation; nothing changed.
    Declined,
    /// No such id in the archive; nothing changed.
    NotFound,
}

/// Seam for the destructive-action confirmation. Removal side effects only
/// run after an affirmative answer.
#[async_trait]
pub trait ConfirmPrompt: Send + Sync {
    async fn confirm(&self, message: &str) -> bool;
}

/// Holds the current view, at most one displayed recipe, and the archive.
pub struct Session {
    view: View,
    current: Option<Recipe>,
    archive: Archive,
    store: Arc<dyn KvStore>,
    generator: RecipeGenerator,
}

impl Session {
    /// Load the persisted archive and start on the authoring view.
    ///
    /// A corrupt or unreadable archive document is logged and treated as
    /// empty; startup never fails on it.
    pub async fn load(store: Arc<dyn KvStore>, generator: RecipeGenerator) -> Self {
        let archive = match store.get(STORAGE_KEY).await {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(archive) => archive,
                Err(e) => {
                    warn!(error = %e, "Corrupt archive document, starting empty");
                    Archive::new()
                }
            },
            Ok(None) => Archive::new(),
            Err(e) => {
                warn!(error = %e, "Failed to read archive, starting empty");
                Archive::new()
            }
        };
        info!(saved = archive.len(), "Archive loaded");
        Self {
            view: View::Create,
            current: None,
            archive,
            store,
            generator,
        }
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn current(&self) -> Option<&Recipe> {
        self.current.as_ref()
    }

    pub fn archive(&self) -> &Archive {
        &self.archive
    }

    /// Whether the displayed recipe is already archived.
    pub fn is_current_saved(&self) -> bool {
        self.current
            .as_ref()
            .is_some_and(|r| self.archive.contains(&r.id))
    }

    /// The authoring flow: validate, generate, then display.
    ///
    /// Validation fails before any network call. The displayed recipe is
    /// only replaced after generation fully succeeds; on failure the prior
    /// display state is preserved and the error surfaces once.
    pub async fn submit(&mut self, prefs: &UserPreferences) -> Result<&Recipe> {
        prefs.validate()?;
        let recipe = self.generator.generate(prefs).await?;
        self.view = View::Create;
        Ok(self.current.insert(recipe))
    }

    /// Archive a recipe unless its id is already present, then persist.
    pub async fn save(&mut self, recipe: Recipe) -> SaveOutcome {
        let id = recipe.id.clone();
        if self.archive.insert(recipe) {
            self.persist().await;
            info!(recipe_id = %id, total = self.archive.len(), "Recipe saved to archive");
            SaveOutcome::Saved
        } else {
            debug!(recipe_id = %id, "Recipe already archived");
            SaveOutcome::AlreadySaved
        }
    }

    /// Remove a recipe after confirmation. Clears the displayed recipe when
    /// it is the one being removed, so the view falls back to the authoring
    /// form instead of a dangling entry.
    pub async fn remove(&mut self, id: &str, prompt: &dyn ConfirmPrompt) -> RemoveOutcome {
        if !self.archive.contains(id) {
            return RemoveOutcome::NotFound;
        }
        if !prompt.confirm(REMOVE_CONFIRM_MESSAGE).await {
            info!(recipe_id = %id, "Removal declined");
            return RemoveOutcome::Declined;
        }

        self.archive.remove(id);
        self.persist().await;

        let cleared_display = self.current.as_ref().is_some_and(|r| r.id == id);
        if cleared_display {
            self.current = None;
        }
        info!(recipe_id = %id, cleared_display, "Recipe removed from archive");
        RemoveOutcome::Removed { cleared_display }
    }

    /// Display an archived recipe and switch to the create/detail view.
    pub fn select(&mut self, recipe: Recipe) {
        self.current = Some(recipe);
        self.view = View::Create;
    }

    /// Drop the displayed recipe, back to the authoring form.
    pub fn clear_displayed(&mut self) {
        self.current = None;
    }

    /// Switch to the archive listing.
    pub fn show_archives(&mut self) {
        self.view = View::Archives;
    }

    /// Switch back to the authoring/detail view.
    pub fn show_create(&mut self) {
        self.view = View::Create;
    }

    /// Start a guided walkthrough of the displayed recipe, if any.
    pub fn begin_walkthrough(&self) -> Option<Walkthrough> {
        self.current.clone().map(Walkthrough::new)
    }

    /// Rewrite the persisted archive document in full. Persistence failures
    /// are logged and never surfaced to the user.
    async fn persist(&self) {
        let json = match serde_json::to_string(&self.archive) {
            Ok(json) => json,
            Err(e) => {
                error!(error = %e, "Failed to serialize archive");
                return;
            }
        };
        if let Err(e) = self.store.put(STORAGE_KEY, &json).await {
            error!(error = %e, "Failed to persist archive");
        }
    }
}
