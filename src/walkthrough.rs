//! Guided walkthrough: a clamped linear walk over a recipe's steps.
//!
//! Position `p` ranges from `-1` (preparation) through `N` (completion),
//! where `N` is the step count of the active recipe. Every transition is
//! clamped arithmetic; there is no invalid input to reject.

use crate::recipe::{IngredientEntry, Recipe};

/// A walkthrough over one recipe, starting at preparation.
#[derive(Debug, Clone)]
pub struct Walkthrough {
    recipe: Recipe,
    position: isize,
}

/// What the current position displays.
#[derive(Debug, PartialEq)]
pub enum WalkView<'a> {
    /// The full ingredient list, before the first step.
    Preparation { ingredients: &'a [IngredientEntry] },
    /// Exactly one step. The last interior step also surfaces the texture tip.
    Step {
        /// 1-based step number.
        number: usize,
        total: usize,
        text: &'a str,
        texture_tip: Option<&'a str>,
    },
    /// The finish screen, with pairing suggestions.
    Completion { pairing_suggestions: &'a str },
}

impl Walkthrough {
    /// Start a walkthrough at the preparation state.
    pub fn new(recipe: Recipe) -> Self {
        Self {
            recipe,
            position: -1,
        }
    }

    fn step_count(&self) -> isize {
        self.recipe.steps.len() as isize
    }

    /// Move one position forward. No effect at completion; the exit action
    /// takes over there instead of the button being disabled.
    pub fn advance(&mut self) {
        if self.position < self.step_count() {
            self.position += 1;
        }
    }

    /// Move one position back. No effect at preparation.
    pub fn retreat(&mut self) {
        if self.position > -1 {
            self.position -= 1;
        }
    }

    pub fn is_preparation(&self) -> bool {
        self.position == -1
    }

    pub fn is_completion(&self) -> bool {
        self.position == self.step_count()
    }

    /// Fraction of the walk completed, in `[0, 1]`.
    pub fn progress(&self) -> f32 {
        (self.position + 1) as f32 / (self.step_count() + 1) as f32
    }

    /// What to display at the current position.
    pub fn view(&self) -> WalkView<'_> {
        if self.is_preparation() {
            WalkView::Preparation {
                ingredients: &self.recipe.ingredients,
            }
        } else if self.is_completion() {
            WalkView::Completion {
                pairing_suggestions: &self.recipe.pairing_suggestions,
            }
        } else {
            let index = self.position as usize;
            let total = self.recipe.steps.len();
            WalkView::Step {
                number: index + 1,
                total,
                text: &self.recipe.steps[index],
                texture_tip: (index + 1 == total).then_some(self.recipe.texture_tips.as_str()),
            }
        }
    }

    pub fn recipe(&self) -> &Recipe {
        &self.recipe
    }

    /// Exit the walkthrough, handing the recipe back to the caller.
    pub fn into_recipe(self) -> Recipe {
        self.recipe
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipe::FlavorProfile;
    use chrono::Utc;

    fn recipe_with_steps(steps: &[&str]) -> Recipe {
        Recipe {
            id: "walk-test".into(),
            timestamp: Utc::now(),
            recipe_name: "Test Cream".into(),
            summary: "s".into(),
            ingredients: vec![IngredientEntry {
                item: "cream".into(),
                amount: "200 ml".into(),
            }],
            steps: steps.iter().map(|s| s.to_string()).collect(),
            texture_tips: "chill the bowl".into(),
            pairing_suggestions: "waffles".into(),
            image_url: String::new(),
            flavor_profile: FlavorProfile::default(),
        }
    }

    #[test]
    fn starts_at_preparation_with_ingredients() {
        let walk = Walkthrough::new(recipe_with_steps(&["a", "b"]));
        assert!(walk.is_preparation());
        match walk.view() {
            WalkView::Preparation { ingredients } => assert_eq!(ingredients.len(), 1),
            other => panic!("Expected preparation, got {other:?}"),
        }
    }

    #[test]
    fn reaches_completion_in_exactly_n_plus_one_advances() {
        for n in 0..5 {
            let steps: Vec<String> = (0..n).map(|i| format!("step {i}")).collect();
            let step_refs: Vec<&str> = steps.iter().map(String::as_str).collect();
            let mut walk = Walkthrough::new(recipe_with_steps(&step_refs));
            for _ in 0..n {
                walk.advance();
                assert!(!walk.is_completion());
            }
            walk.advance();
            assert!(walk.is_completion(), "N = {n}");
            // Further advances are no-ops
            walk.advance();
            walk.advance();
            assert!(walk.is_completion());
            assert_eq!(walk.progress(), 1.0);
        }
    }

    #[test]
    fn retreat_is_clamped_at_preparation() {
        let mut walk = Walkthrough::new(recipe_with_steps(&["a"]));
        walk.retreat();
        walk.retreat();
        assert!(walk.is_preparation());
        assert_eq!(walk.progress(), 0.0);
    }

    #[test]
    fn advance_then_retreat_restores_position_away_from_boundaries() {
        let mut walk = Walkthrough::new(recipe_with_steps(&["a", "b", "c"]));
        walk.advance(); // step 1
        let before = walk.progress();
        walk.advance();
        walk.retreat();
        assert_eq!(walk.progress(), before);
    }

    #[test]
    fn completion_is_not_sticky() {
        let mut walk = Walkthrough::new(recipe_with_steps(&["a", "b"]));
        walk.advance();
        walk.advance();
        walk.advance();
        assert!(walk.is_completion());
        walk.retreat();
        match walk.view() {
            WalkView::Step { number, .. } => assert_eq!(number, 2),
            other => panic!("Expected last step, got {other:?}"),
        }
    }

    #[test]
    fn progress_is_monotone_and_bounded() {
        let mut walk = Walkthrough::new(recipe_with_steps(&["a", "b", "c"]));
        let mut last = walk.progress();
        for _ in 0..6 {
            walk.advance();
            let p = walk.progress();
            assert!(p >= last);
            assert!((0.0..=1.0).contains(&p));
            last = p;
        }
        for _ in 0..6 {
            walk.retreat();
            let p = walk.progress();
            assert!(p <= last);
            assert!((0.0..=1.0).contains(&p));
            last = p;
        }
    }

    #[test]
    fn last_step_surfaces_texture_tip() {
        let mut walk = Walkthrough::new(recipe_with_steps(&["first", "last"]));
        walk.advance();
        match walk.view() {
            WalkView::Step {
                number,
                texture_tip,
                ..
            } => {
                assert_eq!(number, 1);
                assert!(texture_tip.is_none());
            }
            other => panic!("Expected step, got {other:?}"),
        }
        walk.advance();
        match walk.view() {
            WalkView::Step {
                number,
                total,
                text,
                texture_tip,
            } => {
                assert_eq!(number, 2);
                assert_eq!(total, 2);
                assert_eq!(text, "last");
                assert_eq!(texture_tip, Some("chill the bowl"));
            }
            other => panic!("Expected step, got {other:?}"),
        }
    }

    #[test]
    fn completion_shows_pairing_suggestions() {
        let mut walk = Walkthrough::new(recipe_with_steps(&["only"]));
        walk.advance();
        walk.advance();
        assert_eq!(
            walk.view(),
            WalkView::Completion {
                pairing_suggestions: "waffles"
            }
        );
    }

    #[test]
    fn empty_steps_put_completion_next_to_preparation() {
        let mut walk = Walkthrough::new(recipe_with_steps(&[]));
        assert!(walk.is_preparation());
        assert_eq!(walk.progress(), 0.0);
        walk.advance();
        assert!(walk.is_completion());
        assert_eq!(walk.progress(), 1.0);
        walk.retreat();
        assert!(walk.is_preparation());
    }
}
