//! Recipe data model: flavor axes, user preferences, and generated recipes.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// One named dimension of taste/texture preference.
///
/// The authoring form only surfaces six of these; `Spicy` exists for recipe
/// variants that ask for heat and defaults to zero intensity, so it never
/// renders into a prompt unless the caller sets it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FlavorAxis {
    Sweet,
    Sour,
    Bitter,
    Spicy,
    Salty,
    Creamy,
    Innovation,
}

impl FlavorAxis {
    /// All axes, in form order.
    pub const ALL: [FlavorAxis; 7] = [
        Self::Sweet,
        Self::Sour,
        Self::Bitter,
        Self::Spicy,
        Self::Salty,
        Self::Creamy,
        Self::Innovation,
    ];

    /// Prompt-facing label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Sweet => "sweetness",
            Self::Sour => "sourness",
            Self::Bitter => "bitterness",
            Self::Spicy => "spiciness",
            Self::Salty => "saltiness",
            Self::Creamy => "creaminess",
            Self::Innovation => "innovation",
        }
    }
}

impl std::fmt::Display for FlavorAxis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// What the user asked for. Built fresh per submission, never persisted.
#[derive(Debug, Clone)]
pub struct UserPreferences {
    /// Free-text description of the ingredients on hand.
    pub ingredients: String,
    /// Intensity per flavor axis, 0..=100.
    pub flavor_levels: BTreeMap<FlavorAxis, u8>,
    /// Free-text desired texture. Blank means "use the house default".
    pub texture: String,
}

impl Default for UserPreferences {
    fn default() -> Self {
        let mut flavor_levels = BTreeMap::new();
        for axis in FlavorAxis::ALL {
            flavor_levels.insert(axis, 0);
        }
        flavor_levels.insert(FlavorAxis::Sweet, 30);
        flavor_levels.insert(FlavorAxis::Creamy, 50);
        flavor_levels.insert(FlavorAxis::Innovation, 20);
        Self {
            ingredients: String::new(),
            flavor_levels,
            texture: String::new(),
        }
    }
}

impl UserPreferences {
    /// Check required input. Called before any network round trip.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.ingredients.trim().is_empty() {
            return Err(ValidationError::MissingIngredients);
        }
        Ok(())
    }

    /// Set an axis intensity, clamped to 0..=100.
    pub fn set_level(&mut self, axis: FlavorAxis, level: u8) {
        self.flavor_levels.insert(axis, level.min(100));
    }

    /// Intensity for an axis (0 if never set).
    pub fn level(&self, axis: FlavorAxis) -> u8 {
        self.flavor_levels.get(&axis).copied().unwrap_or(0)
    }
}

/// Short human label for a slider intensity.
pub fn intensity_label(level: u8) -> &'static str {
    match level {
        0 => "none",
        1..=29 => "subtle",
        30..=69 => "medium",
        _ => "intense",
    }
}

/// Scores describing the realized recipe's character, generator-supplied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlavorProfile {
    pub sweetness: f32,
    pub acidity: f32,
    pub complexity: f32,
    pub creaminess: f32,
    pub innovation: f32,
}

/// One ingredient line: name plus a human-readable amount ("200 ml").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientEntry {
    pub item: String,
    pub amount: String,
}

/// A generated recipe. Field names on the wire are camelCase to match the
/// generation endpoint's payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    /// Opaque identifier, unique within the archive, immutable once assigned.
    pub id: String,
    /// Creation time, epoch milliseconds on the wire. Never mutated.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
    pub recipe_name: String,
    /// One-sentence pitch.
    pub summary: String,
    pub ingredients: Vec<IngredientEntry>,
    /// Short imperative instructions, in order.
    pub steps: Vec<String>,
    pub texture_tips: String,
    pub pairing_suggestions: String,
    /// Always empty in the current design; the UI shows a placeholder glyph.
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub flavor_profile: FlavorProfile,
}

impl Recipe {
    /// Plain-text export of the recipe card, suitable for sharing.
    pub fn share_text(&self) -> String {
        let ingredients = self
            .ingredients
            .iter()
            .map(|i| format!("- {}: {}", i.item, i.amount))
            .collect::<Vec<_>>()
            .join("\n");
        let steps = self
            .steps
            .iter()
            .enumerate()
            .map(|(idx, s)| format!("{}. {}", idx + 1, s))
            .collect::<Vec<_>>()
            .join("\n");
        format!(
            "[{name}]\n\n--- Ingredients ---\n{ingredients}\n\n--- Steps ---\n{steps}\n\n\
             Tip: {tips}\nPairing: {pairing}\n\n(from CreamCrafter)",
            name = self.recipe_name,
            ingredients = ingredients,
            steps = steps,
            tips = self.texture_tips,
            pairing = self.pairing_suggestions,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_recipe() -> Recipe {
        Recipe {
            id: "abc".into(),
            timestamp: Utc::now(),
            recipe_name: "Strawberry Cloud".into(),
            summary: "A light strawberry cream.".into(),
            ingredients: vec![
                IngredientEntry {
                    item: "heavy cream".into(),
                    amount: "200 ml".into(),
                },
                IngredientEntry {
                    item: "strawberries".into(),
                    amount: "150 g".into(),
                },
            ],
            steps: vec!["Whip the cream.".into(), "Fold in the berries.".into()],
            texture_tips: "Chill the bowl first.".into(),
            pairing_suggestions: "Scones or waffles.".into(),
            image_url: String::new(),
            flavor_profile: FlavorProfile::default(),
        }
    }

    #[test]
    fn default_preferences_match_form() {
        let prefs = UserPreferences::default();
        assert_eq!(prefs.level(FlavorAxis::Sweet), 30);
        assert_eq!(prefs.level(FlavorAxis::Creamy), 50);
        assert_eq!(prefs.level(FlavorAxis::Innovation), 20);
        assert_eq!(prefs.level(FlavorAxis::Sour), 0);
        assert_eq!(prefs.level(FlavorAxis::Spicy), 0);
        assert!(prefs.texture.is_empty());
    }

    #[test]
    fn validate_requires_ingredients() {
        let mut prefs = UserPreferences::default();
        assert!(prefs.validate().is_err());
        prefs.ingredients = "   ".into();
        assert!(prefs.validate().is_err());
        prefs.ingredients = "milk, sugar".into();
        assert!(prefs.validate().is_ok());
    }

    #[test]
    fn set_level_clamps() {
        let mut prefs = UserPreferences::default();
        prefs.set_level(FlavorAxis::Sour, 250);
        assert_eq!(prefs.level(FlavorAxis::Sour), 100);
    }

    #[test]
    fn intensity_labels() {
        assert_eq!(intensity_label(0), "none");
        assert_eq!(intensity_label(10), "subtle");
        assert_eq!(intensity_label(30), "medium");
        assert_eq!(intensity_label(69), "medium");
        assert_eq!(intensity_label(70), "intense");
        assert_eq!(intensity_label(100), "intense");
    }

    #[test]
    fn recipe_wire_names_are_camel_case() {
        let json = serde_json::to_string(&sample_recipe()).unwrap();
        assert!(json.contains("\"recipeName\""));
        assert!(json.contains("\"textureTips\""));
        assert!(json.contains("\"pairingSuggestions\""));
        assert!(json.contains("\"flavorProfile\""));
        assert!(json.contains("\"imageUrl\""));
    }

    #[test]
    fn timestamp_round_trips_as_epoch_millis() {
        let recipe = sample_recipe();
        let json = serde_json::to_value(&recipe).unwrap();
        assert!(json["timestamp"].is_i64());
        let parsed: Recipe = serde_json::from_value(json).unwrap();
        assert_eq!(
            parsed.timestamp.timestamp_millis(),
            recipe.timestamp.timestamp_millis()
        );
    }

    #[test]
    fn recipe_tolerates_missing_optional_fields() {
        let json = r#"{
            "id": "r1",
            "timestamp": 1700000000000,
            "recipeName": "X",
            "summary": "s",
            "ingredients": [],
            "steps": ["only step"],
            "textureTips": "t",
            "pairingSuggestions": "p"
        }"#;
        let recipe: Recipe = serde_json::from_str(json).unwrap();
        assert!(recipe.image_url.is_empty());
        assert_eq!(recipe.flavor_profile, FlavorProfile::default());
    }

    #[test]
    fn share_text_lists_ingredients_and_steps() {
        let text = sample_recipe().share_text();
        assert!(text.starts_with("[Strawberry Cloud]"));
        assert!(text.contains("- heavy cream: 200 ml"));
        assert!(text.contains("1. Whip the cream."));
        assert!(text.contains("2. Fold in the berries."));
        assert!(text.contains("Tip: Chill the bowl first."));
        assert!(text.contains("Pairing: Scones or waffles."));
    }
}
