//! Content lifecycle events and their notification recipients.

use crackmes_db::models::notification::CreateNotification;

// ---------------------------------------------------------------------------
// ContentEvent
// ---------------------------------------------------------------------------

/// Something that happened to a piece of content that users are told about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentEvent {
    /// A comment was posted on a crackme.
    CommentCreated {
        crackme_name: String,
        crackme_author: String,
        commenter: String,
    },
    /// A solution was uploaded and awaits moderation.
    SolutionSubmitted {
        crackme_name: String,
        submitter: String,
    },
    /// A crackme was uploaded and awaits moderation.
    CrackmeSubmitted { crackme_name: String, author: String },
    SolutionApproved {
        crackme_name: String,
        submitter: String,
    },
    CrackmeApproved { crackme_name: String, author: String },
    SolutionRejected {
        crackme_name: String,
        submitter: String,
        reason: Option<String>,
    },
    CrackmeRejected {
        crackme_name: String,
        author: String,
        reason: Option<String>,
    },
}

impl ContentEvent {
    /// Dot-separated event name used in logs, e.g. `"comment.created"`.
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::CommentCreated { .. } => "comment.created",
            Self::SolutionSubmitted { .. } => "solution.submitted",
            Self::CrackmeSubmitted { .. } => "crackme.submitted",
            Self::SolutionApproved { .. } => "solution.approved",
            Self::CrackmeApproved { .. } => "crackme.approved",
            Self::SolutionRejected { .. } => "solution.rejected",
            Self::CrackmeRejected { .. } => "crackme.rejected",
        }
    }

    /// Notifications this event produces.
    ///
    /// Nobody is notified about their own comment.
    pub fn notifications(&self) -> Vec<CreateNotification> {
        match self {
            Self::CommentCreated {
                crackme_name,
                crackme_author,
                commenter,
            } => {
                if commenter == crackme_author {
                    return Vec::new();
                }
                vec![notify(
                    crackme_author,
                    format!("New comment on your crackme '{crackme_name}' by: {commenter}"),
                )]
            }
            Self::SolutionSubmitted {
                crackme_name,
                submitter,
            } => vec![notify(
                submitter,
                format!("Your solution for '{crackme_name}' is waiting approval!"),
            )],
            Self::CrackmeSubmitted {
                crackme_name,
                author,
            } => vec![notify(
                author,
                format!("Your crackme '{crackme_name}' is waiting approval!"),
            )],
            Self::SolutionApproved {
                crackme_name,
                submitter,
            } => vec![notify(
                submitter,
                format!("Your solution for '{crackme_name}' has been accepted!"),
            )],
            Self::CrackmeApproved {
                crackme_name,
                author,
            } => vec![notify(
                author,
                format!("Your crackme '{crackme_name}' has been accepted!"),
            )],
            Self::SolutionRejected {
                crackme_name,
                submitter,
                reason,
            } => vec![notify(
                submitter,
                with_reason(
                    format!("Your solution for '{crackme_name}' has been rejected!"),
                    reason.as_deref(),
                ),
            )],
            Self::CrackmeRejected {
                crackme_name,
                author,
                reason,
            } => vec![notify(
                author,
                with_reason(
                    format!("Your crackme '{crackme_name}' has been rejected!"),
                    reason.as_deref(),
                ),
            )],
        }
    }
}

fn notify(recipient: &str, message: String) -> CreateNotification {
    CreateNotification {
        recipient: recipient.to_string(),
        message,
    }
}

fn with_reason(mut message: String, reason: Option<&str>) -> String {
    if let Some(reason) = reason.map(str::trim).filter(|r| !r.is_empty()) {
        message.push_str(" Reason: ");
        message.push_str(reason);
    }
    message
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
