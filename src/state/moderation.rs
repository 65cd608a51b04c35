use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Visibility state of a review.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ModerationStatus {
    /// Publicly visible and counted in ratings.
    #[default]
    Approved,
    /// Hidden while a moderator looks at it.
    Pending,
    /// Hidden; only a moderator can bring it back.
    Rejected,
}

/// Actions that move a review between moderation states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ModerationEvent {
    /// Someone reported the review; it waits for a moderator.
    Flag,
    /// A moderator accepts the review.
    Approve,
    /// A moderator hides the review.
    Reject,
}

/// Attempted event is not allowed from the current status.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot {event} a review that is {from}")]
pub struct InvalidTransition {
    /// Status the review was in.
    pub from: ModerationStatus,
    /// Event that was refused.
    pub event: ModerationEvent,
}

impl ModerationStatus {
    /// Status reached by applying `event`, or the reason it is refused.
    pub fn apply(self, event: ModerationEvent) -> Result<ModerationStatus, InvalidTransition> {
        use ModerationEvent::*;
        use ModerationStatus::*;

        match (self, event) {
            (Approved, Flag) => Ok(Pending),
            (Approved, Reject) | (Pending, Reject) => Ok(Rejected),
            (Pending, Approve) | (Rejected, Approve) => Ok(Approved),
            (from, event) => Err(InvalidTransition { from, event }),
        }
    }

    /// Only approved reviews are public and count toward ratings.
    pub fn is_visible(self) -> bool {
        matches!(self, ModerationStatus::Approved)
    }
}

impl fmt::Display for ModerationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ModerationStatus::Approved => "approved",
            ModerationStatus::Pending => "pending",
            ModerationStatus::Rejected => "rejected",
        })
    }
}

impl fmt::Display for ModerationEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ModerationEvent::Flag => "flag",
            ModerationEvent::Approve => "approve",
            ModerationEvent::Reject => "reject",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ModerationEvent::*;
    use ModerationStatus::*;

    #[test]
    fn new_reviews_start_approved() {
        assert_eq!(ModerationStatus::default(), Approved);
    }

    #[test]
    fn flag_then_moderate() {
        let flagged = Approved.apply(Flag).unwrap();
        assert_eq!(flagged, Pending);
        assert_eq!(flagged.apply(Approve).unwrap(), Approved);
        assert_eq!(flagged.apply(Reject).unwrap(), Rejected);
    }

    #[test]
    fn rejected_can_be_reinstated() {
        assert_eq!(Approved.apply(Reject).unwrap(), Rejected);
        assert_eq!(Rejected.apply(Approve).unwrap(), Approved);
    }

    #[test]
    fn invalid_transitions_are_refused() {
        for (from, event) in [
            (Approved, Approve),
            (Pending, Flag),
            (Rejected, Flag),
            (Rejected, Reject),
        ] {
            let err = from.apply(event).unwrap_err();
            assert_eq!(err, InvalidTransition { from, event });
        }
        assert_eq!(
            Rejected.apply(Flag).unwrap_err().to_string(),
            "cannot flag a review that is rejected"
        );
    }

    #[test]
    fn only_approved_is_visible() {
        assert!(Approved.is_visible());
        assert!(!Pending.is_visible());
        assert!(!Rejected.is_visible());
    }
}
