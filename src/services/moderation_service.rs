use tracing::info;
use uuid::Uuid;

use crate::{
    dao::{
        entities::{
            ModerationAction, ModerationLogData, ModerationTarget, ReviewData, UserRole,
        },
        repository::{Record, Repository},
    },
    dto::{
        moderation::{
            AnalyzeResponse, ModerationDashboard, ModerationLogResponse, ModerationOutcome,
            StatusCounts,
        },
        review::ReviewResponse,
    },
    error::ServiceError,
    services::{
        content_analysis::{Sentiment, SpamAssessment, analyze_sentiment, assess_spam},
        review_service::{review_text, reviews},
        user_service,
    },
    state::{
        Session, SharedState,
        moderation::{ModerationEvent, ModerationStatus},
    },
};

/// Logs shown on the dashboard.
const RECENT_LOG_LIMIT: usize = 20;

fn logs(state: &SharedState) -> Repository<ModerationLogData> {
    Repository::new(state.store().clone())
}

/// Run the content heuristics on arbitrary text.
pub fn analyze(text: &str) -> AnalyzeResponse {
    AnalyzeResponse {
        sentiment: analyze_sentiment(text),
        spam: assess_spam(text),
    }
}

/// Audit entry for a review the heuristics held back.
pub async fn record_auto_flag(
    state: &SharedState,
    review: &Record<ReviewData>,
    sentiment: &Sentiment,
    spam: &SpamAssessment,
) -> Result<Record<ModerationLogData>, ServiceError> {
    let entry = ModerationLogData {
        action: ModerationAction::AutoFlag,
        target_type: ModerationTarget::Review,
        target_id: review.id,
        moderator_id: None,
        reason: Some("content matched spam heuristics".into()),
        sentiment: Some(sentiment.sentiment),
        confidence: Some(sentiment.confidence),
        spam_score: Some(spam.score),
        previous_status: None,
        new_status: Some(review.data.moderation_status),
    };
    let record = logs(state).create(&entry).await?;
    info!(review_id = %review.id, spam_score = spam.score, "review auto-flagged");
    Ok(record)
}

/// Apply `event` to a review and append the matching log entry.
///
/// Any signed-in user may flag; approving and rejecting need a moderator or admin.
pub async fn moderate_review(
    state: &SharedState,
    session: &Session,
    review_id: Uuid,
    event: ModerationEvent,
    reason: Option<String>,
) -> Result<ModerationOutcome, ServiceError> {
    if event != ModerationEvent::Flag {
        ensure_moderator(state, session).await?;
    }

    let repository = reviews(state);
    let review = repository.get(review_id).await?;
    let previous = review.data.moderation_status;
    let next = previous.apply(event)?;

    let updated = repository
        .update(
            review_id,
            &serde_json::json!({ "moderationStatus": next }),
        )
        .await?;

    let text = review_text(
        updated.data.title.as_deref(),
        updated.data.content.as_deref(),
    );
    let sentiment = analyze_sentiment(&text);
    let spam = assess_spam(&text);

    let entry = ModerationLogData {
        action: action_for(event),
        target_type: ModerationTarget::Review,
        target_id: review_id,
        moderator_id: Some(session.user_id),
        reason: reason.filter(|reason| !reason.trim().is_empty()),
        sentiment: Some(sentiment.sentiment),
        confidence: Some(sentiment.confidence),
        spam_score: Some(spam.score),
        previous_status: Some(previous),
        new_status: Some(next),
    };
    let log = logs(state).create(&entry).await?;
    info!(%review_id, moderator = %session.user_id, %event, from = %previous, to = %next, "review moderated");

    Ok(ModerationOutcome {
        review: updated.into(),
        log: log.into(),
    })
}

fn action_for(event: ModerationEvent) -> ModerationAction {
    match event {
        ModerationEvent::Flag => ModerationAction::Flag,
        ModerationEvent::Approve => ModerationAction::Approve,
        ModerationEvent::Reject => ModerationAction::Reject,
    }
}

async fn ensure_moderator(state: &SharedState, session: &Session) -> Result<(), ServiceError> {
    match user_service::session_role(state, session).await? {
        UserRole::Moderator | UserRole::Admin => Ok(()),
        UserRole::Member => Err(ServiceError::Unauthorized(
            "moderator role required".into(),
        )),
    }
}

/// Status counts, the pending queue and the latest audit entries. Moderators and admins only.
pub async fn dashboard(
    state: &SharedState,
    session: &Session,
) -> Result<ModerationDashboard, ServiceError> {
    ensure_moderator(state, session).await?;
    let all_reviews = reviews(state).list().await?;

    let mut counts = StatusCounts::default();
    for review in &all_reviews {
        match review.data.moderation_status {
            ModerationStatus::Approved => counts.approved += 1,
            ModerationStatus::Pending => counts.pending += 1,
            ModerationStatus::Rejected => counts.rejected += 1,
        }
    }

    let mut pending: Vec<_> = all_reviews
        .into_iter()
        .filter(|review| review.data.moderation_status == ModerationStatus::Pending)
        .collect();
    pending.sort_by(|a, b| a.created_at.cmp(&b.created_at));

    let mut recent = logs(state).list().await?;
    recent.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    recent.truncate(RECENT_LOG_LIMIT);

    Ok(ModerationDashboard {
        counts,
        pending_reviews: pending.into_iter().map(ReviewResponse::from).collect(),
        recent_logs: recent
            .into_iter()
            .map(ModerationLogResponse::from)
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::content_analysis::SentimentLabel;

    #[test]
    fn events_map_to_log_actions() {
        assert_eq!(action_for(ModerationEvent::Flag), ModerationAction::Flag);
        assert_eq!(action_for(ModerationEvent::Approve), ModerationAction::Approve);
        assert_eq!(action_for(ModerationEvent::Reject), ModerationAction::Reject);
    }

    #[test]
    fn analyze_combines_both_heuristics() {
        let result = analyze("Terrible, boring, a waste!!!!! visit www.cheapkeys.com");
        assert_eq!(result.sentiment.sentiment, SentimentLabel::Negative);
        assert!(result.spam.is_spam);
    }
}
