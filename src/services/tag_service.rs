use serde_json::json;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    dao::{
        entities::{GameData, TagData},
        repository::{Record, Repository},
    },
    dto::tag::{CreateTagRequest, TagRefreshResponse, TagResponse},
    error::ServiceError,
    state::SharedState,
};

fn tags(state: &SharedState) -> Repository<TagData> {
    Repository::new(state.store().clone())
}

/// Create a tag; names are unique regardless of case. Its `gameCount` is computed immediately.
pub async fn create_tag(
    state: &SharedState,
    request: CreateTagRequest,
) -> Result<TagResponse, ServiceError> {
    let mut data = TagData::from(request);
    if data.name.is_empty() {
        return Err(ServiceError::InvalidInput("tag name must not be empty".into()));
    }

    let repository = tags(state);
    let taken = repository
        .list()
        .await?
        .into_iter()
        .any(|record| record.data.name.eq_ignore_ascii_case(&data.name));
    if taken {
        return Err(ServiceError::Conflict(format!(
            "tag `{}` already exists",
            data.name
        )));
    }

    let games = Repository::<GameData>::new(state.store().clone()).list().await?;
    data.game_count = count_games(&games, &data.name);

    let record = repository.create(&data).await?;
    info!(tag_id = %record.id, name = %record.data.name, "tag created");
    Ok(record.into())
}

/// Every tag, by name.
pub async fn list_tags(state: &SharedState) -> Result<Vec<TagResponse>, ServiceError> {
    let mut records = tags(state).list().await?;
    records.sort_by_cached_key(|record| record.data.name.to_lowercase());
    Ok(records.into_iter().map(TagResponse::from).collect())
}

/// Delete a tag. Games keep the name in their `tags` array.
pub async fn delete_tag(state: &SharedState, id: Uuid) -> Result<(), ServiceError> {
    tags(state).delete(id).await?;
    Ok(())
}

/// Number of games carrying `tag`, compared case-insensitively.
pub fn count_games(games: &[Record<GameData>], tag: &str) -> u32 {
    let count = games
        .iter()
        .filter(|game| game.data.tags.iter().any(|t| t.eq_ignore_ascii_case(tag)))
        .count();
    u32::try_from(count).unwrap_or(u32::MAX)
}

/// Recompute every tag's `gameCount` from a scan of the catalog.
///
/// Best-effort: failures are logged and counted, never returned.
pub async fn refresh_game_counts(state: &SharedState) -> TagRefreshResponse {
    let mut outcome = TagRefreshResponse::default();

    let games = match Repository::<GameData>::new(state.store().clone()).list().await {
        Ok(games) => games,
        Err(err) => {
            warn!(error = %err, "tag refresh skipped: failed to list games");
            return outcome;
        }
    };
    let repository = tags(state);
    let tag_records = match repository.list().await {
        Ok(tags) => tags,
        Err(err) => {
            warn!(error = %err, "tag refresh skipped: failed to list tags");
            return outcome;
        }
    };

    for tag in tag_records {
        let count = count_games(&games, &tag.data.name);
        if count == tag.data.game_count {
            continue;
        }
        match repository.update(tag.id, &json!({ "gameCount": count })).await {
            Ok(_) => outcome.updated += 1,
            Err(err) => {
                warn!(tag_id = %tag.id, name = %tag.data.name, error = %err, "failed to refresh tag count");
                outcome.failed += 1;
            }
        }
    }

    debug!(updated = outcome.updated, failed = outcome.failed, "tag counts refreshed");
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dao::models::Timestamp;

    fn game(tags: &[&str]) -> Record<GameData> {
        Record {
            id: Uuid::new_v4(),
            created_at: Timestamp::now(),
            updated_at: Timestamp::now(),
            data: GameData {
                title: "Game".into(),
                tags: tags.iter().map(|tag| tag.to_string()).collect(),
                ..Default::default()
            },
        }
    }

    #[test]
    fn counts_tag_names_case_insensitively() {
        let games = vec![
            game(&["Indie", "Roguelike"]),
            game(&["indie"]),
            game(&["Strategy"]),
            game(&[]),
        ];
        assert_eq!(count_games(&games, "INDIE"), 2);
        assert_eq!(count_games(&games, "roguelike"), 1);
        assert_eq!(count_games(&games, "Puzzle"), 0);
    }
}
