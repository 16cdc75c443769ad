//! Revision loop outcome types.

use serde::{Deserialize, Serialize};

/// How a revision loop reached `Done`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoopOutcome {
    /// The critic accepted the current draft
    StyleMatched,
    /// The attempt ceiling was passed; the last draft is returned as-is
    AttemptLimitReached,
}

impl LoopOutcome {
    pub fn is_style_matched(&self) -> bool {
        matches!(self, LoopOutcome::StyleMatched)
    }
}

impl std::fmt::Display for LoopOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoopOutcome::StyleMatched => write!(f, "style matched"),
            LoopOutcome::AttemptLimitReached => write!(f, "attempt limit reached"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loop_outcome_variants() {
        assert_eq!(LoopOutcome::StyleMatched, LoopOutcome::StyleMatched);
        assert_ne!(LoopOutcome::StyleMatched, LoopOutcome::AttemptLimitReached);
        assert!(LoopOutcome::StyleMatched.is_style_matched());
        assert!(!LoopOutcome::AttemptLimitReached.is_style_matched());
    }

    #[test]
    fn test_loop_outcome_display() {
        assert_eq!(LoopOutcome::StyleMatched.to_string(), "style matched");
        assert_eq!(LoopOutcome::AttemptLimitReached.to_string(), "attempt limit reached");
    }

    #[test]
    fn test_loop_outcome_serialization() {
        let json = serde_json::to_string(&LoopOutcome::AttemptLimitReached).unwrap();
        assert_eq!(json, "\"attempt_limit_reached\"");
    }
}
