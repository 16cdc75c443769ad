//! Drafts, critiques and fact sets.

use serde::{Deserialize, Serialize};

/// Facts extracted from content, or the model's explicit refusal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "facts", rename_all = "snake_case")]
pub enum FactSet {
    Facts(Vec<String>),
    InsufficientInformation,
}

impl FactSet {
    /// The facts, if any were produced.
    pub fn facts(&self) -> Option<&[String]> {
        match self {
            FactSet::Facts(facts) => Some(facts),
            FactSet::InsufficientInformation => None,
        }
    }

    /// True for `InsufficientInformation` and for a fact list with no usable entries.
    pub fn is_empty(&self) -> bool {
        match self {
            FactSet::Facts(facts) => facts.iter().all(|f| f.trim().is_empty()),
            FactSet::InsufficientInformation => true,
        }
    }
}

/// One attempt at the tweet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Draft {
    pub text: String,
    /// 1 for the composed draft, +1 for every revision.
    pub attempt: u32,
}

impl Draft {
    /// The composer's draft.
    pub fn first(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            attempt: 1,
        }
    }

    /// A revision of this draft with new text and the next attempt number.
    pub fn revised(&self, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            attempt: self.attempt + 1,
        }
    }
}

/// Verdict from the style critic. `feedback` is only present on a miss.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Critique {
    pub matches_style: bool,
    feedback: Option<String>,
}

impl Critique {
    pub fn matches() -> Self {
        Self {
            matches_style: true,
            feedback: None,
        }
    }

    pub fn needs_revision(feedback: impl Into<String>) -> Self {
        Self {
            matches_style: false,
            feedback: Some(feedback.into()),
        }
    }

    /// Revision guidance. Always `None` when the draft matched.
    pub fn feedback(&self) -> Option<&str> {
        if self.matches_style {
            None
        } else {
            self.feedback.as_deref()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draft_first_starts_at_one() {
        let draft = Draft::first("hello");
        assert_eq!(draft.attempt, 1);
        assert_eq!(draft.text, "hello");
    }

    #[test]
    fn test_draft_revised_increments() {
        let first = Draft::first("a");
        let second = first.revised("b");
        let third = second.revised("c");
        assert_eq!(second.attempt, 2);
        assert_eq!(third.attempt, 3);
        assert_eq!(third.text, "c");
        // original untouched
        assert_eq!(first.text, "a");
    }

    #[test]
    fn test_critique_matches_has_no_feedback() {
        let critique = Critique::matches();
        assert!(critique.matches_style);
        assert_eq!(critique.feedback(), None);
    }

    #[test]
    fn test_critique_needs_revision() {
        let critique = Critique::needs_revision("add an emoji");
        assert!(!critique.matches_style);
        assert_eq!(critique.feedback(), Some("add an emoji"));
    }

    #[test]
    fn test_fact_set_empty() {
        assert!(FactSet::InsufficientInformation.is_empty());
        assert!(FactSet::Facts(vec![]).is_empty());
        assert!(FactSet::Facts(vec!["  ".into()]).is_empty());
        assert!(!FactSet::Facts(vec!["LangGraph 1.0 adds persistence API".into()]).is_empty());
    }

    #[test]
    fn test_fact_set_serialization() {
        let json = serde_json::to_value(FactSet::Facts(vec!["a".into()])).unwrap();
        assert_eq!(json["kind"], "facts");
        assert_eq!(json["facts"][0], "a");

        let json = serde_json::to_value(FactSet::InsufficientInformation).unwrap();
        assert_eq!(json["kind"], "insufficient_information");
    }
}
