//! Moderation / visibility lifecycle shared by crackmes, solutions and
//! comments.
//!
//! ```text
//!   create ──> Pending ──approve──> Visible
//!                 │                    │
//!                 ├──reject──┐         │
//!                 └──delete──┴──> Deleted <──delete──┘
//! ```
//!
//! Comments skip `Pending` and are created `Visible`. `Deleted` is terminal.
//! The store keeps two independent flags (`visible`, `deleted`); `deleted`
//! always wins when the flags are folded into a [`Visibility`].

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Kind of moderated content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    Crackme,
    Solution,
    Comment,
}

impl ContentKind {
    /// Parse from the path segment / collection name.
    pub fn from_name(name: &str) -> Result<Self, CoreError> {
        match name {
            "crackme" => Ok(Self::Crackme),
            "solution" => Ok(Self::Solution),
            "comment" => Ok(Self::Comment),
            other => Err(CoreError::Validation(format!(
                "Unknown content kind '{other}'. Must be one of: crackme, solution, comment"
            ))),
        }
    }

    /// Collection name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Crackme => "crackme",
            Self::Solution => "solution",
            Self::Comment => "comment",
        }
    }

    /// Entity label used in not-found errors.
    pub fn entity(self) -> &'static str {
        match self {
            Self::Crackme => "Crackme",
            Self::Solution => "Solution",
            Self::Comment => "Comment",
        }
    }

    /// State a freshly created record starts in.
    pub fn initial_state(self) -> Visibility {
        match self {
            Self::Crackme | Self::Solution => Visibility::Pending,
            Self::Comment => Visibility::Visible,
        }
    }

    /// Whether this kind goes through an explicit approval step.
    pub fn is_moderated(self) -> bool {
        !matches!(self, Self::Comment)
    }
}

/// Folded lifecycle state of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    Pending,
    Visible,
    Deleted,
}

impl Visibility {
    /// Fold the stored flags into a state. `deleted` wins over `visible`.
    pub fn from_flags(visible: bool, deleted: bool) -> Self {
        match (visible, deleted) {
            (_, true) => Self::Deleted,
            (true, false) => Self::Visible,
            (false, false) => Self::Pending,
        }
    }

    /// Only `Visible` records are listed, rendered and counted.
    pub fn is_public(self) -> bool {
        self == Self::Visible
    }
}

/// A moderation or ownership action applied to an existing record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// `Pending -> Visible`, decided by the external moderation source.
    Approve,
    /// `Pending -> Deleted` with author notification and artifact removal.
    Reject,
    /// `Pending | Visible -> Deleted`.
    Delete,
}

impl Transition {
    pub fn name(self) -> &'static str {
        match self {
            Self::Approve => "approve",
            Self::Reject => "reject",
            Self::Delete => "delete",
        }
    }
}

/// Apply `transition` to a record of `kind` currently in `from`.
///
/// Returns the resulting state or a validation error naming the illegal
/// move. Nothing leaves `Deleted`.
pub fn apply(
    kind: ContentKind,
    from: Visibility,
    transition: Transition,
) -> Result<Visibility, CoreError> {
    use Transition::*;
    use Visibility::*;

    let to = match (from, transition) {
        (Deleted, _) => None,
        (Pending, Approve) if kind.is_moderated() => Some(Visible),
        (Pending, Reject) if kind.is_moderated() => Some(Deleted),
        (Pending | Visible, Delete) => Some(Deleted),
        _ => None,
    };

    to.ok_or_else(|| {
        CoreError::Validation(format!(
            "Cannot {} {} in state {:?}",
            transition.name(),
            kind.name(),
            from
        ))
    })
}

/// Denormalized crackme counter touched by a lifecycle step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterEffect {
    Solutions,
    Comments,
}

/// Counter incremented when a record of `kind` is created.
///
/// Only comments count on creation because they start `Visible`.
pub fn creation_counter_effect(kind: ContentKind) -> Option<CounterEffect> {
    match kind {
        ContentKind::Comment => Some(CounterEffect::Comments),
        ContentKind::Crackme | ContentKind::Solution => None,
    }
}

/// Counter incremented when `transition` succeeds on a record of `kind`.
///
/// Deletions never decrement inline; drift is corrected by the
/// reconciliation task.
pub fn transition_counter_effect(
    kind: ContentKind,
    transition: Transition,
) -> Option<CounterEffect> {
    match (kind, transition) {
        (ContentKind::Solution, Transition::Approve) => Some(CounterEffect::Solutions),
        _ => None,
    }
}
