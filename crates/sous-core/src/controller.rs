//! The single owner of a live cooking session.
//!
//! Every mutation — ingredient toggle, phase transition, step change, timer
//! operation, tick — goes through [`SessionGuide`], which is the only code
//! that calls the store's `save`/`clear`. A failed save is logged and
//! swallowed: the session lives on in memory for the rest of the process,
//! it just won't survive a restart.

use crate::chime::Chime;
use crate::error::{Result, SousError};
use crate::recipe::{Recipe, RecipeStep};
use crate::session::CookingSession;
use crate::store::{SessionKey, SessionStore};
use crate::timer::{self, TimerInstance};
use crate::types::{Phase, StepOutcome};
use uuid::Uuid;

pub struct SessionGuide {
    recipe: Recipe,
    session: CookingSession,
    store: Box<dyn SessionStore>,
    chime: Box<dyn Chime>,
}

impl SessionGuide {
    /// Resume the stored session for this recipe, or start a fresh one.
    ///
    /// A fresh session is held in memory only; it reaches storage on the
    /// first mutation-triggered save.
    pub fn open(recipe: Recipe, store: Box<dyn SessionStore>, chime: Box<dyn Chime>) -> Self {
        let key = SessionKey::new(recipe.slug.clone());
        let session = store
            .load(&key)
            .filter(|s| s.recipe == recipe.slug)
            .unwrap_or_else(|| CookingSession::new(recipe.slug.clone()));
        Self {
            recipe,
            session,
            store,
            chime,
        }
    }

    pub fn recipe(&self) -> &Recipe {
        &self.recipe
    }

    pub fn session(&self) -> &CookingSession {
        &self.session
    }

    fn key(&self) -> SessionKey {
        SessionKey::new(self.session.recipe.clone())
    }

    fn persist(&self) {
        if let Err(e) = self.store.save(&self.session) {
            tracing::warn!("session save failed for '{}': {e}", self.session.recipe);
        }
    }

    // ---------------------------------------------------------------------------
    // Checklist
    // ---------------------------------------------------------------------------

    pub fn toggle_ingredient(&mut self, name: &str) {
        self.session.toggle_ingredient(name);
        self.persist();
    }

    /// Recipe ingredient lines paired with their checked state, in recipe
    /// order. Duplicate lines share one checked state.
    pub fn checklist(&self) -> Vec<(&str, bool)> {
        self.recipe
            .ingredients
            .iter()
            .map(|line| (line.as_str(), self.session.is_checked(line)))
            .collect()
    }

    // ---------------------------------------------------------------------------
    // Phase transitions
    // ---------------------------------------------------------------------------

    pub fn begin_cooking(&mut self) -> Result<()> {
        self.session.begin_cooking(self.recipe.total_steps())?;
        self.persist();
        Ok(())
    }

    pub fn next_step(&mut self) -> Result<StepOutcome> {
        let outcome = self.session.next_step(self.recipe.total_steps())?;
        self.persist();
        Ok(outcome)
    }

    pub fn prev_step(&mut self) -> Result<StepOutcome> {
        let outcome = self.session.prev_step()?;
        if outcome != StepOutcome::AtBoundary {
            self.persist();
        }
        Ok(outcome)
    }

    /// The step under the cursor, when cooking.
    pub fn current_step(&self) -> Option<&RecipeStep> {
        match self.session.phase {
            Phase::Cooking => self.recipe.step(self.session.current_step),
            Phase::Prep | Phase::Done => None,
        }
    }

    /// Done → fresh Prep for the same recipe. The stored session is cleared;
    /// the fresh one reaches storage on its first mutation.
    pub fn cook_again(&mut self) -> Result<()> {
        let fresh = self.session.cook_again()?;
        if let Err(e) = self.store.clear(&self.key()) {
            tracing::warn!("session clear failed for '{}': {e}", self.session.recipe);
        }
        self.session = fresh;
        Ok(())
    }

    /// Abandon the session from any phase. No "save for later" — the stored
    /// session is removed unconditionally.
    pub fn abandon(self) {
        if let Err(e) = self.store.clear(&self.key()) {
            tracing::warn!("session clear failed for '{}': {e}", self.session.recipe);
        }
    }

    // ---------------------------------------------------------------------------
    // Timers
    // ---------------------------------------------------------------------------

    pub fn timers(&self) -> &[TimerInstance] {
        &self.session.timers
    }

    pub fn running_timers(&self) -> usize {
        timer::running_count(&self.session.timers)
    }

    pub fn add_timer(&mut self, total_seconds: u32, label: impl Into<String>) -> Uuid {
        let id = timer::add(&mut self.session.timers, total_seconds, label);
        self.persist();
        id
    }

    pub fn toggle_timer(&mut self, id: Uuid) -> Result<()> {
        if !timer::toggle(&mut self.session.timers, id) {
            return Err(SousError::TimerNotFound(id.to_string()));
        }
        self.persist();
        Ok(())
    }

    pub fn reset_timer(&mut self, id: Uuid) -> Result<()> {
        if !timer::reset(&mut self.session.timers, id) {
            return Err(SousError::TimerNotFound(id.to_string()));
        }
        self.persist();
        Ok(())
    }

    pub fn remove_timer(&mut self, id: Uuid) -> Result<()> {
        if !timer::remove(&mut self.session.timers, id) {
            return Err(SousError::TimerNotFound(id.to_string()));
        }
        self.persist();
        Ok(())
    }

    /// Resolve a timer by id prefix (hyphenated or simple form), so `sous
    /// timer toggle pho 3f2a` works without pasting the whole uuid.
    pub fn resolve_timer(&self, prefix: &str) -> Result<Uuid> {
        let matches: Vec<&TimerInstance> = self
            .session
            .timers
            .iter()
            .filter(|t| {
                t.id.to_string().starts_with(prefix) || t.id.simple().to_string().starts_with(prefix)
            })
            .collect();
        match matches.as_slice() {
            [only] => Ok(only.id),
            [] => Err(SousError::TimerNotFound(prefix.to_string())),
            _ => Err(SousError::TimerNotFound(format!("{prefix} (ambiguous)"))),
        }
    }

    /// Advance all running timers by one second. Rings the chime once per
    /// timer that crossed zero on this tick, then persists the new state.
    pub fn tick(&mut self) -> Vec<Uuid> {
        let had_running = self.running_timers() > 0;
        let completed = timer::tick(&mut self.session.timers);
        for _ in &completed {
            self.chime.ring();
        }
        if had_running {
            self.persist();
        }
        completed
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
