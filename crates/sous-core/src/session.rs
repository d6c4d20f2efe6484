use crate::error::{Result, SousError};
use crate::timer::TimerInstance;
use crate::types::{Phase, StepOutcome};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// CookingSession
// ---------------------------------------------------------------------------

/// The persisted state of one guided cooking walkthrough for one recipe.
///
/// `recipe` never changes after creation; a different recipe always gets a
/// freshly created session under its own key. `checked_ingredients` carries
/// set semantics in memory and is stored as an ordered sequence on the wire;
/// duplicates are collapsed on load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CookingSession {
    pub recipe: String,
    pub phase: Phase,
    #[serde(default)]
    pub checked_ingredients: Vec<String>,
    #[serde(default)]
    pub current_step: usize,
    #[serde(default)]
    pub timers: Vec<TimerInstance>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CookingSession {
    /// Fresh session: mise en place, nothing checked, cursor at zero,
    /// no timers. Not persisted until the first mutation-triggered save.
    pub fn new(recipe: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            recipe: recipe.into(),
            phase: Phase::Prep,
            checked_ingredients: Vec::new(),
            current_step: 0,
            timers: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Restore invariants after deserialization: collapse duplicate
    /// checked-ingredient lines (first occurrence wins) and repair timer
    /// state — `remaining` is clamped to `total`, and a timer at zero is
    /// stopped so it can never sit in the running set without ever
    /// completing.
    pub fn normalize(&mut self) {
        let mut seen = std::collections::HashSet::new();
        self.checked_ingredients.retain(|i| seen.insert(i.clone()));
        for timer in &mut self.timers {
            if timer.remaining_seconds > timer.total_seconds {
                timer.remaining_seconds = timer.total_seconds;
            }
            if timer.remaining_seconds == 0 {
                timer.running = false;
            }
        }
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    // ---------------------------------------------------------------------------
    // Ingredient checklist
    // ---------------------------------------------------------------------------

    /// Toggle an ingredient line by exact string match. Idempotent per name:
    /// toggling twice restores the original state. Duplicate recipe lines
    /// collapse to one entry sharing one checked state.
    pub fn toggle_ingredient(&mut self, name: &str) {
        if self.checked_ingredients.iter().any(|i| i == name) {
            self.checked_ingredients.retain(|i| i != name);
        } else {
            self.checked_ingredients.push(name.to_string());
        }
        self.touch();
    }

    pub fn is_checked(&self, name: &str) -> bool {
        self.checked_ingredients.iter().any(|i| i == name)
    }

    // ---------------------------------------------------------------------------
    // Phase transitions
    // ---------------------------------------------------------------------------

    /// Prep → Cooking ("ready to cook"). Always allowed from prep — a full
    /// checklist is advisory, not a gate. Resets the step cursor.
    ///
    /// A recipe with zero steps cannot enter the cooking phase; the cursor
    /// would have no valid position.
    pub fn begin_cooking(&mut self, total_steps: usize) -> Result<()> {
        match self.phase {
            Phase::Prep => {
                if total_steps == 0 {
                    return Err(SousError::NoSteps(self.recipe.clone()));
                }
                self.phase = Phase::Cooking;
                self.current_step = 0;
                self.touch();
                Ok(())
            }
            Phase::Cooking | Phase::Done => Err(SousError::InvalidTransition {
                from: self.phase.to_string(),
                to: Phase::Cooking.to_string(),
                reason: "cooking can only begin from prep".to_string(),
            }),
        }
    }

    /// Advance the step cursor. On the final step this transitions the
    /// session to Done and leaves the cursor in place — it never reaches
    /// `total_steps`.
    pub fn next_step(&mut self, total_steps: usize) -> Result<StepOutcome> {
        match self.phase {
            Phase::Cooking => {
                if self.current_step + 1 >= total_steps {
                    self.phase = Phase::Done;
                    self.touch();
                    Ok(StepOutcome::Finished)
                } else {
                    self.current_step += 1;
                    self.touch();
                    Ok(StepOutcome::Moved(self.current_step))
                }
            }
            Phase::Prep | Phase::Done => Err(SousError::InvalidTransition {
                from: self.phase.to_string(),
                to: Phase::Cooking.to_string(),
                reason: "step navigation requires the cooking phase".to_string(),
            }),
        }
    }

    /// Move the step cursor back one, clamped at the first step.
    pub fn prev_step(&mut self) -> Result<StepOutcome> {
        match self.phase {
            Phase::Cooking => {
                if self.current_step == 0 {
                    Ok(StepOutcome::AtBoundary)
                } else {
                    self.current_step -= 1;
                    self.touch();
                    Ok(StepOutcome::Moved(self.current_step))
                }
            }
            Phase::Prep | Phase::Done => Err(SousError::InvalidTransition {
                from: self.phase.to_string(),
                to: Phase::Cooking.to_string(),
                reason: "step navigation requires the cooking phase".to_string(),
            }),
        }
    }

    /// Done → fresh Prep ("cook again"). Returns a brand-new session for the
    /// same recipe; the caller clears the stored one and adopts this.
    pub fn cook_again(&self) -> Result<CookingSession> {
        match self.phase {
            Phase::Done => Ok(CookingSession::new(self.recipe.clone())),
            Phase::Prep | Phase::Cooking => Err(SousError::InvalidTransition {
                from: self.phase.to_string(),
                to: Phase::Prep.to_string(),
                reason: "cook again is only available once done".to_string(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer;

    #[test]
    fn fresh_session_shape() {
        let s = CookingSession::new("shakshuka");
        assert_eq!(s.recipe, "shakshuka");
        assert_eq!(s.phase, Phase::Prep);
        assert!(s.checked_ingredients.is_empty());
        assert_eq!(s.current_step, 0);
        assert!(s.timers.is_empty());
    }

    #[test]
    fn toggle_is_idempotent() {
        let mut s = CookingSession::new("pho");
        s.toggle_ingredient("salt");
        assert!(s.is_checked("salt"));
        s.toggle_ingredient("salt");
        assert!(!s.is_checked("salt"));
        assert!(s.checked_ingredients.is_empty());
    }

    #[test]
    fn toggle_matches_exact_string() {
        let mut s = CookingSession::new("pho");
        s.toggle_ingredient("salt");
        s.toggle_ingredient("Salt");
        assert!(s.is_checked("salt"));
        assert!(s.is_checked("Salt"));
        assert_eq!(s.checked_ingredients.len(), 2);
    }

    #[test]
    fn begin_cooking_ignores_checklist() {
        // The full-checklist gate is advisory, never blocking
        let mut s = CookingSession::new("pho");
        s.begin_cooking(4).unwrap();
        assert_eq!(s.phase, Phase::Cooking);
        assert_eq!(s.current_step, 0);
    }

    #[test]
    fn begin_cooking_rejects_zero_steps() {
        let mut s = CookingSession::new("pho");
        assert!(matches!(s.begin_cooking(0), Err(SousError::NoSteps(_))));
        assert_eq!(s.phase, Phase::Prep);
    }

    #[test]
    fn begin_cooking_only_from_prep() {
        let mut s = CookingSession::new("pho");
        s.begin_cooking(2).unwrap();
        assert!(s.begin_cooking(2).is_err());
    }

    #[test]
    fn step_cursor_stays_in_bounds() {
        let mut s = CookingSession::new("pho");
        s.begin_cooking(3).unwrap();

        assert_eq!(s.next_step(3).unwrap(), StepOutcome::Moved(1));
        assert_eq!(s.next_step(3).unwrap(), StepOutcome::Moved(2));

        // "Next" on the last step finishes instead of going out of bounds
        assert_eq!(s.next_step(3).unwrap(), StepOutcome::Finished);
        assert_eq!(s.phase, Phase::Done);
        assert_eq!(s.current_step, 2);
    }

    #[test]
    fn prev_step_clamps_at_zero() {
        let mut s = CookingSession::new("pho");
        s.begin_cooking(3).unwrap();

        assert_eq!(s.prev_step().unwrap(), StepOutcome::AtBoundary);
        assert_eq!(s.current_step, 0);

        s.next_step(3).unwrap();
        assert_eq!(s.prev_step().unwrap(), StepOutcome::Moved(0));
    }

    #[test]
    fn single_step_recipe_finishes_immediately() {
        let mut s = CookingSession::new("toast");
        s.begin_cooking(1).unwrap();
        assert_eq!(s.next_step(1).unwrap(), StepOutcome::Finished);
        assert_eq!(s.current_step, 0);
    }

    #[test]
    fn navigation_requires_cooking_phase() {
        let mut s = CookingSession::new("pho");
        assert!(s.next_step(3).is_err());
        assert!(s.prev_step().is_err());
    }

    #[test]
    fn cook_again_resets_everything() {
        let mut s = CookingSession::new("pho");
        s.toggle_ingredient("salt");
        timer::add(&mut s.timers, 300, "simmer");
        s.begin_cooking(2).unwrap();
        s.next_step(2).unwrap();
        s.next_step(2).unwrap();
        assert_eq!(s.phase, Phase::Done);

        let fresh = s.cook_again().unwrap();
        assert_eq!(fresh.recipe, "pho");
        assert_eq!(fresh.phase, Phase::Prep);
        assert!(fresh.checked_ingredients.is_empty());
        assert_eq!(fresh.current_step, 0);
        assert!(fresh.timers.is_empty());
    }

    #[test]
    fn cook_again_only_when_done() {
        let s = CookingSession::new("pho");
        assert!(s.cook_again().is_err());
    }

    #[test]
    fn normalize_dedupes_checked_ingredients() {
        let mut s = CookingSession::new("pho");
        s.checked_ingredients = vec![
            "salt".to_string(),
            "eggs".to_string(),
            "salt".to_string(),
        ];
        s.normalize();
        assert_eq!(s.checked_ingredients, vec!["salt", "eggs"]);
    }

    #[test]
    fn normalize_stops_timers_at_zero() {
        // A stored session may claim a running timer with nothing left on
        // the clock; it can never complete, so load must stop it
        let mut s = CookingSession::new("pho");
        timer::add(&mut s.timers, 300, "simmer");
        s.timers[0].remaining_seconds = 0;
        s.timers[0].running = true;

        s.normalize();
        assert!(!s.timers[0].running);
        assert!(s.timers[0].is_finished());
    }

    #[test]
    fn normalize_clamps_remaining_to_total() {
        let mut s = CookingSession::new("pho");
        timer::add(&mut s.timers, 60, "rest");
        s.timers[0].remaining_seconds = 900;

        s.normalize();
        assert_eq!(s.timers[0].remaining_seconds, 60);
        assert!(s.timers[0].running);
    }

    #[test]
    fn session_yaml_roundtrip() {
        let mut s = CookingSession::new("pho");
        s.toggle_ingredient("salt");
        s.toggle_ingredient("star anise");
        timer::add(&mut s.timers, 600, "broth");
        timer::add(&mut s.timers, 120, "noodles");
        s.begin_cooking(4).unwrap();
        s.next_step(4).unwrap();

        let yaml = serde_yaml::to_string(&s).unwrap();
        let parsed: CookingSession = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed.recipe, s.recipe);
        assert_eq!(parsed.phase, s.phase);
        assert_eq!(parsed.checked_ingredients, s.checked_ingredients);
        assert_eq!(parsed.current_step, 1);
        assert_eq!(parsed.timers.len(), 2);
        assert_eq!(parsed.timers[0].label, "broth");
        assert_eq!(parsed.timers[1].label, "noodles");
        assert_eq!(parsed.timers[0].id, s.timers[0].id);
    }
}
