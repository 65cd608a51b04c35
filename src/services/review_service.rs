use std::collections::HashMap;

use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::{
    dao::{
        entities::{GameData, ReviewData, UserData},
        repository::{Record, Repository},
    },
    dto::{
        game::RatingSummary,
        review::{CreateReviewRequest, ReviewResponse, ReviewWriteResponse, UpdateReviewRequest},
    },
    error::ServiceError,
    services::{
        content_analysis::{SentimentLabel, analyze_sentiment, assess_spam},
        moderation_service,
    },
    state::{Session, SharedState, moderation::ModerationStatus},
};

const MIN_RATING: u8 = 1;
const MAX_RATING: u8 = 5;

pub(crate) fn reviews(state: &SharedState) -> Repository<ReviewData> {
    Repository::new(state.store().clone())
}

fn ensure_rating(rating: u8) -> Result<(), ServiceError> {
    if (MIN_RATING..=MAX_RATING).contains(&rating) {
        Ok(())
    } else {
        Err(ServiceError::InvalidInput(format!(
            "rating must be between {MIN_RATING} and {MAX_RATING} (got {rating})"
        )))
    }
}

/// Title and body joined, as fed to the content heuristics.
pub(crate) fn review_text(title: Option<&str>, content: Option<&str>) -> String {
    [title, content]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join("\n")
}

/// Average and count over the approved reviews of `game_id`.
pub fn summarize<'a, I>(game_id: Uuid, reviews: I) -> RatingSummary
where
    I: IntoIterator<Item = &'a ReviewData>,
{
    let (sum, count) = reviews
        .into_iter()
        .filter(|review| review.game_id == game_id && review.moderation_status.is_visible())
        .fold((0u32, 0usize), |(sum, count), review| {
            (sum + u32::from(review.rating), count + 1)
        });

    let average_rating = if count == 0 {
        0.0
    } else {
        (f64::from(sum) / count as f64 * 10.0).round() / 10.0
    };

    RatingSummary {
        game_id,
        average_rating,
        review_count: count,
    }
}

/// Rating summaries of every game that has at least one approved review.
pub fn summarize_all(reviews: &[Record<ReviewData>]) -> HashMap<Uuid, RatingSummary> {
    let mut by_game: HashMap<Uuid, Vec<&ReviewData>> = HashMap::new();
    for review in reviews {
        by_game
            .entry(review.data.game_id)
            .or_default()
            .push(&review.data);
    }
    by_game
        .into_iter()
        .map(|(game_id, reviews)| (game_id, summarize(game_id, reviews)))
        .filter(|(_, summary)| summary.review_count > 0)
        .collect()
}

/// Current rating of a game, computed from its approved reviews.
pub async fn rating_summary(
    state: &SharedState,
    game_id: Uuid,
) -> Result<RatingSummary, ServiceError> {
    Repository::<GameData>::new(state.store().clone())
        .get(game_id)
        .await?;
    refreshed_summary(state, game_id).await
}

async fn refreshed_summary(
    state: &SharedState,
    game_id: Uuid,
) -> Result<RatingSummary, ServiceError> {
    let records = reviews(state)
        .filter(|review| review.game_id == game_id)
        .await?;
    Ok(summarize(game_id, records.iter().map(|record| &record.data)))
}

/// Publicly visible reviews of a game, newest first.
pub async fn list_for_game(
    state: &SharedState,
    game_id: Uuid,
) -> Result<Vec<ReviewResponse>, ServiceError> {
    Repository::<GameData>::new(state.store().clone())
        .get(game_id)
        .await?;
    let mut records = reviews(state)
        .filter(|review| review.game_id == game_id && review.moderation_status.is_visible())
        .await?;
    records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(records.into_iter().map(ReviewResponse::from).collect())
}

/// Post a review as the session's user. Spam is held as `pending` and logged.
pub async fn create_review(
    state: &SharedState,
    session: &Session,
    request: CreateReviewRequest,
) -> Result<ReviewWriteResponse, ServiceError> {
    ensure_rating(request.rating)?;

    Repository::<GameData>::new(state.store().clone())
        .get(request.game_id)
        .await?;
    Repository::<UserData>::new(state.store().clone())
        .get(session.user_id)
        .await?;

    let repository = reviews(state);
    let duplicate = repository
        .filter(|review| review.game_id == request.game_id && review.user_id == session.user_id)
        .await?;
    if !duplicate.is_empty() {
        return Err(ServiceError::Conflict(
            "you have already reviewed this game".into(),
        ));
    }

    let text = review_text(request.title.as_deref(), request.content.as_deref());
    let sentiment = analyze_sentiment(&text);
    let spam = assess_spam(&text);
    let moderation_status = if spam.is_spam {
        ModerationStatus::Pending
    } else {
        ModerationStatus::Approved
    };

    let data = ReviewData {
        game_id: request.game_id,
        user_id: session.user_id,
        rating: request.rating,
        title: request.title,
        content: request.content,
        moderation_status,
        helpful_count: 0,
        sentiment: Some(sentiment.sentiment),
    };
    let record = repository.create(&data).await?;
    info!(review_id = %record.id, game_id = %data.game_id, status = %moderation_status, "review created");

    if spam.is_spam {
        moderation_service::record_auto_flag(state, &record, &sentiment, &spam).await?;
    }

    let rating = refreshed_summary(state, data.game_id).await?;
    Ok(ReviewWriteResponse {
        review: Some(record.into()),
        rating,
    })
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ReviewPatch<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    rating: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sentiment: Option<SentimentLabel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    moderation_status: Option<ModerationStatus>,
}

/// Edit a review; only its author may. Changed text is re-screened.
pub async fn update_review(
    state: &SharedState,
    session: &Session,
    id: Uuid,
    request: UpdateReviewRequest,
) -> Result<ReviewWriteResponse, ServiceError> {
    if let Some(rating) = request.rating {
        ensure_rating(rating)?;
    }

    let repository = reviews(state);
    let current = repository.get(id).await?;
    ensure_author(session, &current)?;

    let mut patch = ReviewPatch {
        rating: request.rating,
        title: request.title.as_deref(),
        content: request.content.as_deref(),
        sentiment: None,
        moderation_status: None,
    };

    let text_changed = request.title.is_some() || request.content.is_some();
    let mut screening = None;
    if text_changed {
        let text = review_text(
            patch.title.or(current.data.title.as_deref()),
            patch.content.or(current.data.content.as_deref()),
        );
        let sentiment = analyze_sentiment(&text);
        let spam = assess_spam(&text);
        patch.sentiment = Some(sentiment.sentiment);
        if spam.is_spam && current.data.moderation_status == ModerationStatus::Approved {
            patch.moderation_status = Some(ModerationStatus::Pending);
            screening = Some((sentiment, spam));
        }
    }

    let record = repository.update(id, &patch).await?;
    if let Some((sentiment, spam)) = screening {
        moderation_service::record_auto_flag(state, &record, &sentiment, &spam).await?;
    }

    let rating = refreshed_summary(state, record.data.game_id).await?;
    Ok(ReviewWriteResponse {
        review: Some(record.into()),
        rating,
    })
}

/// Delete a review; only its author may.
pub async fn delete_review(
    state: &SharedState,
    session: &Session,
    id: Uuid,
) -> Result<ReviewWriteResponse, ServiceError> {
    let repository = reviews(state);
    let current = repository.get(id).await?;
    ensure_author(session, &current)?;

    repository.delete(id).await?;
    info!(review_id = %id, "review deleted");
    let rating = refreshed_summary(state, current.data.game_id).await?;
    Ok(ReviewWriteResponse {
        review: None,
        rating,
    })
}

fn ensure_author(session: &Session, review: &Record<ReviewData>) -> Result<(), ServiceError> {
    if review.data.user_id == session.user_id {
        Ok(())
    } else {
        Err(ServiceError::Unauthorized(
            "only the author may change this review".into(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn review(game_id: Uuid, rating: u8, status: ModerationStatus) -> ReviewData {
        ReviewData {
            game_id,
            user_id: Uuid::new_v4(),
            rating,
            title: None,
            content: None,
            moderation_status: status,
            helpful_count: 0,
            sentiment: None,
        }
    }

    #[test]
    fn no_reviews_means_zero() {
        let summary = summarize(Uuid::new_v4(), &[] as &[ReviewData]);
        assert_eq!(summary.average_rating, 0.0);
        assert_eq!(summary.review_count, 0);
    }

    #[test]
    fn average_is_rounded_to_one_decimal() {
        let game = Uuid::new_v4();
        let reviews = [
            review(game, 5, ModerationStatus::Approved),
            review(game, 4, ModerationStatus::Approved),
            review(game, 4, ModerationStatus::Approved),
        ];
        let summary = summarize(game, &reviews);
        assert_eq!(summary.average_rating, 4.3);
        assert_eq!(summary.review_count, 3);
    }

    #[test]
    fn hidden_and_foreign_reviews_are_ignored() {
        let game = Uuid::new_v4();
        let reviews = [
            review(game, 2, ModerationStatus::Approved),
            review(game, 5, ModerationStatus::Pending),
            review(game, 5, ModerationStatus::Rejected),
            review(Uuid::new_v4(), 5, ModerationStatus::Approved),
        ];
        let summary = summarize(game, &reviews);
        assert_eq!(summary.average_rating, 2.0);
        assert_eq!(summary.review_count, 1);
    }

    #[test]
    fn rating_bounds() {
        assert!(ensure_rating(1).is_ok());
        assert!(ensure_rating(5).is_ok());
        assert!(matches!(ensure_rating(0), Err(ServiceError::InvalidInput(_))));
        assert!(matches!(ensure_rating(6), Err(ServiceError::InvalidInput(_))));
    }

    #[test]
    fn text_joins_present_parts() {
        assert_eq!(review_text(Some("Great"), Some("Loved it")), "Great\nLoved it");
        assert_eq!(review_text(None, Some("Loved it")), "Loved it");
        assert_eq!(review_text(None, None), "");
    }
}
