use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Phase
// ---------------------------------------------------------------------------

/// The three phases of a guided cooking session.
///
/// `Prep` is mise en place (gathering ingredients and equipment), `Cooking`
/// is the step-by-step walkthrough, `Done` is the completion screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Prep,
    Cooking,
    Done,
}

impl Phase {
    pub fn all() -> &'static [Phase] {
        &[Phase::Prep, Phase::Cooking, Phase::Done]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Prep => "prep",
            Phase::Cooking => "cooking",
            Phase::Done => "done",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Phase {
    type Err = crate::error::SousError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "prep" => Ok(Phase::Prep),
            "cooking" => Ok(Phase::Cooking),
            "done" => Ok(Phase::Done),
            _ => Err(crate::error::SousError::InvalidPhase(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// StepOutcome
// ---------------------------------------------------------------------------

/// Result of a step-navigation action while cooking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Cursor moved to the given step index.
    Moved(usize),
    /// Cursor was already at a boundary; nothing changed.
    AtBoundary,
    /// "Next" on the final step — the session is now done.
    Finished,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_ordering() {
        assert!(Phase::Prep < Phase::Cooking);
        assert!(Phase::Cooking < Phase::Done);
    }

    #[test]
    fn phase_roundtrip() {
        use std::str::FromStr;
        for phase in Phase::all() {
            let s = phase.as_str();
            let parsed = Phase::from_str(s).unwrap();
            assert_eq!(*phase, parsed);
        }
    }

    #[test]
    fn phase_rejects_unknown() {
        use std::str::FromStr;
        assert!(Phase::from_str("plating").is_err());
        assert!(Phase::from_str("").is_err());
    }
}
