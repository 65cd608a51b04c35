//! Content-based scoring of the catalog for one user.

use std::collections::{HashMap, HashSet};

use tracing::info;
use uuid::Uuid;

use crate::{
    dao::{
        entities::{GameData, RecommendationData, ReviewData, ScoredGame, UserData},
        models::Timestamp,
        repository::{Record, Repository},
    },
    dto::{game::RatingSummary, recommendation::RecommendationResponse},
    error::ServiceError,
    services::review_service::{reviews, summarize_all},
    state::{Session, SharedState},
};

/// Entries kept in a stored recommendation.
pub const TOP_N: usize = 10;
/// Rating from which a reviewed game counts as liked.
const LIKED_RATING: u8 = 4;
const FAVORITE_GENRE_WEIGHT: f64 = 3.0;
const SAME_DEVELOPER_BONUS: f64 = 2.0;
const REVIEW_COUNT_CAP: usize = 5;
const REVIEW_COUNT_WEIGHT: f64 = 0.5;

fn lowercase_set(values: &[String]) -> HashSet<String> {
    values.iter().map(|value| value.to_lowercase()).collect()
}

fn same_developer(a: Option<&str>, b: Option<&str>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => !a.trim().is_empty() && a.trim().eq_ignore_ascii_case(b.trim()),
        _ => false,
    }
}

/// Score every game `user` has not reviewed, best first (ties keep catalog order).
pub fn score_games(
    user: &UserData,
    user_reviews: &[&ReviewData],
    catalog: &[Record<GameData>],
    ratings: &HashMap<Uuid, RatingSummary>,
) -> Vec<ScoredGame> {
    let favorites = lowercase_set(&user.favorite_genres);
    let reviewed: HashSet<Uuid> = user_reviews.iter().map(|review| review.game_id).collect();
    let liked_ids: HashSet<Uuid> = user_reviews
        .iter()
        .filter(|review| review.rating >= LIKED_RATING)
        .map(|review| review.game_id)
        .collect();
    let liked: Vec<(HashSet<String>, Option<&str>)> = catalog
        .iter()
        .filter(|game| liked_ids.contains(&game.id))
        .map(|game| {
            (
                lowercase_set(&game.data.genre),
                game.data.developer.as_deref(),
            )
        })
        .collect();

    let mut scored: Vec<ScoredGame> = catalog
        .iter()
        .filter(|game| !reviewed.contains(&game.id))
        .map(|game| {
            let genres = lowercase_set(&game.data.genre);

            let favorite_matches = genres.intersection(&favorites).count() as f64;
            let mut score = FAVORITE_GENRE_WEIGHT * favorite_matches;

            for (liked_genres, liked_developer) in &liked {
                score += genres.intersection(liked_genres).count() as f64;
                if same_developer(game.data.developer.as_deref(), *liked_developer) {
                    score += SAME_DEVELOPER_BONUS;
                }
            }

            if let Some(summary) = ratings.get(&game.id) {
                score += summary.average_rating;
                score += summary.review_count.min(REVIEW_COUNT_CAP) as f64 * REVIEW_COUNT_WEIGHT;
            }

            ScoredGame {
                game_id: game.id,
                title: game.data.title.clone(),
                score,
            }
        })
        .collect();

    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    scored
}

/// Score the catalog for the session's user and store the top entries.
pub async fn generate(
    state: &SharedState,
    session: &Session,
) -> Result<RecommendationResponse, ServiceError> {
    let store = state.store().clone();
    let user = Repository::<UserData>::new(store.clone())
        .get(session.user_id)
        .await?;
    let mut catalog = Repository::<GameData>::new(store.clone()).list().await?;
    // Backends return documents unordered; fix an order so ties are reproducible.
    catalog.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
    let all_reviews = reviews(state).list().await?;

    let ratings = summarize_all(&all_reviews);
    let user_reviews: Vec<&ReviewData> = all_reviews
        .iter()
        .map(|record| &record.data)
        .filter(|review| review.user_id == user.id)
        .collect();

    let mut games = score_games(&user.data, &user_reviews, &catalog, &ratings);
    games.truncate(TOP_N);

    let data = RecommendationData {
        user_id: user.id,
        games,
        generated_on: Some(Timestamp::now().date_string()),
    };
    let record = Repository::<RecommendationData>::new(store)
        .create(&data)
        .await?;
    info!(user_id = %user.id, count = record.data.games.len(), "recommendations generated");
    Ok(record.into())
}

/// Most recently stored recommendation of the session's user.
pub async fn latest_for_user(
    state: &SharedState,
    session: &Session,
) -> Result<RecommendationResponse, ServiceError> {
    let records = Repository::<RecommendationData>::new(state.store().clone())
        .filter(|recommendation| recommendation.user_id == session.user_id)
        .await?;
    records
        .into_iter()
        .max_by(|a, b| a.created_at.cmp(&b.created_at))
        .map(RecommendationResponse::from)
        .ok_or_else(|| {
            ServiceError::NotFound(format!("recommendations for user `{}`", session.user_id))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{dao::entities::UserRole, state::moderation::ModerationStatus};

    fn user(favorites: &[&str]) -> UserData {
        UserData {
            username: "ana".into(),
            email: "ana@example.com".into(),
            display_name: None,
            bio: None,
            avatar: None,
            favorite_genres: favorites.iter().map(|g| g.to_string()).collect(),
            role: UserRole::Member,
        }
    }

    fn game(title: &str, genres: &[&str], developer: Option<&str>) -> Record<GameData> {
        Record {
            id: Uuid::new_v4(),
            created_at: Timestamp::now(),
            updated_at: Timestamp::now(),
            data: GameData {
                title: title.into(),
                developer: developer.map(Into::into),
                genre: genres.iter().map(|g| g.to_string()).collect(),
                ..Default::default()
            },
        }
    }

    fn review(game_id: Uuid, rating: u8) -> ReviewData {
        ReviewData {
            game_id,
            user_id: Uuid::new_v4(),
            rating,
            title: None,
            content: None,
            moderation_status: ModerationStatus::Approved,
            helpful_count: 0,
            sentiment: None,
        }
    }

    #[test]
    fn favorite_genres_rank_first() {
        let catalog = vec![
            game("Racer", &["Racing"], None),
            game("Quest", &["rpg", "Adventure"], None),
            game("Puzzler", &["Puzzle"], None),
        ];
        let scored = score_games(&user(&["RPG"]), &[], &catalog, &HashMap::new());
        assert_eq!(scored[0].title, "Quest");
        assert_eq!(scored[0].score, 3.0);
        // ties keep catalog order
        assert_eq!(scored[1].title, "Racer");
        assert_eq!(scored[2].title, "Puzzler");
    }

    #[test]
    fn liked_games_and_ratings_contribute() {
        let liked = game("Hades", &["Roguelike", "Action"], Some("Supergiant Games"));
        let sibling = game("Pyre", &["Action"], Some("supergiant games"));
        let stranger = game("Dead Cells", &["Roguelike", "Action"], Some("Motion Twin"));
        let catalog = vec![liked.clone(), sibling.clone(), stranger.clone()];

        let own = review(liked.id, 5);
        let mut ratings = HashMap::new();
        ratings.insert(
            stranger.id,
            RatingSummary {
                game_id: stranger.id,
                average_rating: 4.5,
                review_count: 8,
            },
        );

        let scored = score_games(&user(&[]), &[&own], &catalog, &ratings);
        assert_eq!(scored.len(), 2, "reviewed games are excluded");
        // 2 shared genres + 4.5 average + min(8, 5) * 0.5
        assert_eq!(scored[0].title, "Dead Cells");
        assert_eq!(scored[0].score, 9.0);
        // 1 shared genre + same developer
        assert_eq!(scored[1].title, "Pyre");
        assert_eq!(scored[1].score, 3.0);
    }

    #[test]
    fn low_ratings_are_not_liked() {
        let disliked = game("Slog", &["RPG"], Some("Studio"));
        let other = game("Other RPG", &["RPG"], Some("Studio"));
        let catalog = vec![disliked.clone(), other];
        let own = review(disliked.id, 3);

        let scored = score_games(&user(&[]), &[&own], &catalog, &HashMap::new());
        assert_eq!(scored.len(), 1);
        assert_eq!(scored[0].score, 0.0);
    }
}
