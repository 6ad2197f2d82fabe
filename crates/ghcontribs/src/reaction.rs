//! GitHub reaction kinds and their REST wire tokens.
//!
//! GitHub reports reactions on issues and pull requests as an object keyed by
//! shortcut (`"+1"`, `"heart"`, ...) alongside `url` and `total_count`.
//! [`parse_reaction_counts`] turns that object into typed counts, rejecting
//! unknown shortcuts instead of dropping them.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde_json::{Map, Value};
use thiserror::Error;

/// Keys of a reactions object that are not reaction shortcuts.
const NON_REACTION_KEYS: [&str; 2] = ["url", "total_count"];

/// Input that does not map onto a known value.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("unknown reaction shortcut: {0:?}")]
    UnknownReaction(String),

    #[error("reaction {shortcut:?} has a non-integer count: {value}")]
    InvalidCount { shortcut: String, value: String },
}

/// A GitHub reaction kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Reaction {
    ThumbsDown,
    ThumbsUp,
    Laugh,
    Hooray,
    Confused,
    Heart,
    Rocket,
    Eyes,
}

impl Reaction {
    /// All reactions, in display order.
    pub const ALL: [Reaction; 8] = [
        Reaction::ThumbsDown,
        Reaction::ThumbsUp,
        Reaction::Laugh,
        Reaction::Hooray,
        Reaction::Confused,
        Reaction::Heart,
        Reaction::Rocket,
        Reaction::Eyes,
    ];

    /// The token GitHub uses for this reaction.
    pub fn shortcut(self) -> &'static str {
        match self {
            Reaction::ThumbsDown => "-1",
            Reaction::ThumbsUp => "+1",
            Reaction::Laugh => "laugh",
            Reaction::Hooray => "hooray",
            Reaction::Confused => "confused",
            Reaction::Heart => "heart",
            Reaction::Rocket => "rocket",
            Reaction::Eyes => "eyes",
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            Reaction::ThumbsDown => "👎",
            Reaction::ThumbsUp => "👍",
            Reaction::Laugh => "😄",
            Reaction::Hooray => "🎉",
            Reaction::Confused => "😕",
            Reaction::Heart => "❤️",
            Reaction::Rocket => "🚀",
            Reaction::Eyes => "👀",
        }
    }

    pub fn from_shortcut(shortcut: &str) -> Result<Self, ValidationError> {
        Self::ALL
            .into_iter()
            .find(|r| r.shortcut() == shortcut)
            .ok_or_else(|| ValidationError::UnknownReaction(shortcut.to_string()))
    }
}

impl FromStr for Reaction {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_shortcut(s)
    }
}

impl fmt::Display for Reaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.emoji())
    }
}

/// Parse a GitHub `reactions` object into per-kind counts.
pub fn parse_reaction_counts(
    reactions: &Map<String, Value>,
) -> Result<BTreeMap<Reaction, u64>, ValidationError> {
    reactions
        .iter()
        .filter(|(key, _)| !NON_REACTION_KEYS.contains(&key.as_str()))
        .map(|(key, value)| -> Result<(Reaction, u64), ValidationError> {
            let reaction = Reaction::from_shortcut(key)?;
            let count = value.as_u64().ok_or_else(|| ValidationError::InvalidCount {
                shortcut: key.clone(),
                value: value.to_string(),
            })?;
            Ok((reaction, count))
        })
        .collect()
}

/// Render non-zero counts as `"👍 3 🎉 1"`, in [`Reaction::ALL`] order.
pub fn reaction_summary(counts: &BTreeMap<Reaction, u64>) -> String {
    Reaction::ALL
        .into_iter()
        .filter_map(|r| match counts.get(&r) {
            Some(&qty) if qty > 0 => Some(format!("{r} {qty}")),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn shortcuts_round_trip_for_every_kind() {
        for r in Reaction::ALL {
            assert_eq!(Reaction::from_shortcut(r.shortcut()), Ok(r));
        }
        assert_eq!("+1".parse::<Reaction>(), Ok(Reaction::ThumbsUp));
    }

    #[test]
    fn unknown_shortcut_rejected() {
        assert_eq!(
            Reaction::from_shortcut("thumbsup"),
            Err(ValidationError::UnknownReaction("thumbsup".into()))
        );
    }

    #[test]
    fn parse_skips_metadata_keys() {
        let obj = json!({
            "url": "https://api.github.com/repos/o/r/issues/1/reactions",
            "total_count": 4,
            "+1": 3,
            "-1": 0,
            "hooray": 1,
        });
        let counts = parse_reaction_counts(obj.as_object().unwrap()).unwrap();
        assert_eq!(counts.len(), 3);
        assert_eq!(counts[&Reaction::ThumbsUp], 3);
        assert_eq!(counts[&Reaction::ThumbsDown], 0);
        assert_eq!(reaction_summary(&counts), "👍 3 🎉 1");
    }

    #[test]
    fn parse_rejects_unknown_token() {
        let obj = json!({"+1": 1, "party": 2});
        let err = parse_reaction_counts(obj.as_object().unwrap()).unwrap_err();
        assert_eq!(err, ValidationError::UnknownReaction("party".into()));
    }

    #[test]
    fn parse_rejects_bad_count() {
        let obj = json!({"heart": "lots"});
        let err = parse_reaction_counts(obj.as_object().unwrap()).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidCount { .. }));
    }

    #[test]
    fn summary_of_nothing_is_empty() {
        assert_eq!(reaction_summary(&BTreeMap::new()), "");
    }
}
