//! Recipe request service: renders the prompt, calls the generation
//! endpoint, and assembles the returned payload into a [`Recipe`].

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::GenerationError;
use crate::llm::{GenerationRequest, TextGenerator};
use crate::recipe::{FlavorProfile, IngredientEntry, Recipe, UserPreferences};

/// Substituted for the texture field when the user leaves it blank.
pub const DEFAULT_TEXTURE: &str = "smooth and fine";

const SYSTEM_INSTRUCTION: &str = "You are a minimalist baking assistant. Your job is to reduce \
     cream making to simple steps that can be read on a phone in seconds. Avoid all professional \
     jargon and use the plainest words possible. However complex the preferences are, your recipe \
     must stay minimal and doable.";

/// Generates recipes from user preferences via a text-generation backend.
pub struct RecipeGenerator {
    backend: Arc<dyn TextGenerator>,
}

impl RecipeGenerator {
    pub fn new(backend: Arc<dyn TextGenerator>) -> Self {
        Self { backend }
    }

    /// One round trip: prompt → endpoint → parsed [`Recipe`].
    ///
    /// A single failed attempt surfaces immediately; there is no retry or
    /// fallback endpoint at this layer, and no local state is mutated.
    pub async fn generate(&self, prefs: &UserPreferences) -> Result<Recipe, GenerationError> {
        let request = GenerationRequest::new(render_prompt(prefs))
            .with_system_instruction(SYSTEM_INSTRUCTION)
            .with_response_schema(response_schema());

        info!(model = self.backend.model_name(), "Requesting recipe");

        let text = self.backend.generate(&request).await?;
        if text.trim().is_empty() {
            return Err(GenerationError::EmptyResponse);
        }

        let cleaned = extract_json_object(&text);
        let draft: RecipeDraft = serde_json::from_str(cleaned).map_err(|e| {
            warn!(error = %e, response = %text, "Failed to parse generated recipe");
            GenerationError::MalformedResponse {
                reason: e.to_string(),
            }
        })?;

        let recipe = draft.into_recipe();
        info!(
            recipe_id = %recipe.id,
            name = %recipe.recipe_name,
            steps = recipe.steps.len(),
            "Recipe generated"
        );
        Ok(recipe)
    }
}

/// Render the natural-language instruction block for one submission.
pub fn render_prompt(prefs: &UserPreferences) -> String {
    let texture = if prefs.texture.trim().is_empty() {
        DEFAULT_TEXTURE
    } else {
        prefs.texture.trim()
    };

    format!(
        "You are a baking blogger who designs recipes for absolute beginners. Design an \
         extremely simple, creative cream recipe from these minimal requirements:\n\n\
         Core ingredients provided by the user: {ingredients}\n\
         Flavor intensity targets: {flavors}\n\
         Desired texture: {texture}\n\n\
         Strict output requirements:\n\
         1. Respond in English.\n\
         2. Use between 3 and 5 steps.\n\
         3. Keep every step short and direct, at most 30 words, readable full-screen on a phone.\n\
         4. Methods must be zero-difficulty home cooking: only simple whisking, mixing, chilling \
         or gentle heating. No special equipment.\n\
         5. List ingredient amounts in concrete household units (grams, spoons, milliliters).\n\
         6. Stay faithful to the preferences: a high innovation target deserves a surprising \
         combination; a high creaminess target should emphasize straining or whipping technique.",
        ingredients = prefs.ingredients.trim(),
        flavors = render_flavor_levels(prefs),
        texture = texture,
    )
}

/// Render every axis with nonzero intensity as `"<axis>: <percent>%"`.
fn render_flavor_levels(prefs: &UserPreferences) -> String {
    prefs
        .flavor_levels
        .iter()
        .filter(|(_, level)| **level > 0)
        .map(|(axis, level)| format!("{axis}: {level}%"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// JSON schema hint sent along with the request.
fn response_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "OBJECT",
        "properties": {
            "recipeName": { "type": "STRING" },
            "summary": { "type": "STRING" },
            "ingredients": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "item": { "type": "STRING" },
                        "amount": { "type": "STRING" }
                    },
                    "required": ["item", "amount"]
                }
            },
            "steps": { "type": "ARRAY", "items": { "type": "STRING" } },
            "textureTips": { "type": "STRING" },
            "pairingSuggestions": { "type": "STRING" },
            "flavorProfile": {
                "type": "OBJECT",
                "properties": {
                    "sweetness": { "type": "NUMBER" },
                    "acidity": { "type": "NUMBER" },
                    "complexity": { "type": "NUMBER" },
                    "creaminess": { "type": "NUMBER" },
                    "innovation": { "type": "NUMBER" }
                },
                "required": ["sweetness", "acidity", "complexity", "creaminess", "innovation"]
            }
        },
        "required": ["recipeName", "summary", "ingredients", "steps", "textureTips",
                     "pairingSuggestions", "flavorProfile"]
    })
}

/// Extract a JSON object from endpoint output that might be fenced or carry
/// surrounding prose, even though the schema constraint asks it not to.
fn extract_json_object(text: &str) -> &str {
    let trimmed = text.trim();

    if trimmed.starts_with('{') {
        return trimmed;
    }

    // Wrapped in a markdown code fence
    if let Some(start) = trimmed.find("```json") {
        let after = &trimmed[start + 7..];
        if let Some(end) = after.find("```") {
            return after[..end].trim();
        }
    }

    if let Some(start) = trimmed.find("```") {
        let after = &trimmed[start + 3..];
        if let Some(end) = after.find("```") {
            let inner = after[..end].trim();
            if inner.starts_with('{') {
                return inner;
            }
        }
    }

    // Last resort: object bounds within surrounding text
    if let Some(start) = trimmed.find('{') {
        if let Some(end) = trimmed.rfind('}') {
            if end > start {
                return &trimmed[start..=end];
            }
        }
    }

    trimmed
}

/// Wire shape of a generated recipe, before id/timestamp attachment. The
/// upstream is asked for every field, but missing optionals degrade to
/// empty values rather than a hard failure.
#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecipeDraft {
    recipe_name: String,
    #[serde(default)]
    summary: String,
    #[serde(default)]
    ingredients: Vec<IngredientEntry>,
    #[serde(default)]
    steps: Vec<String>,
    #[serde(default)]
    texture_tips: String,
    #[serde(default)]
    pairing_suggestions: String,
    #[serde(default)]
    flavor_profile: FlavorProfile,
}

impl RecipeDraft {
    /// Attach a fresh id and creation timestamp; the image reference stays
    /// empty so the UI falls back to its placeholder glyph.
    fn into_recipe(self) -> Recipe {
        Recipe {
            id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            recipe_name: self.recipe_name,
            summary: self.summary,
            ingredients: self.ingredients,
            steps: self.steps,
            texture_tips: self.texture_tips,
            pairing_suggestions: self.pairing_suggestions,
            image_url: String::new(),
            flavor_profile: self.flavor_profile,
        }
    }
}
