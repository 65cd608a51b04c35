use tracing::info;
use uuid::Uuid;

use crate::{
    dao::{
        deals::{DealRecord, DealsQuery},
        entities::GameData,
        repository::Repository,
    },
    dto::game::{CreateGameRequest, DealsParams, GameResponse, UpdateGameRequest},
    error::ServiceError,
    services::tag_service,
    state::SharedState,
};

/// Fields covered by `GET /games?search=`.
const SEARCH_FIELDS: &[&str] = &["title", "developer", "publisher", "genre", "tags"];

fn games(state: &SharedState) -> Repository<GameData> {
    Repository::new(state.store().clone())
}

/// Add a game to the catalog; titles are unique regardless of case.
pub async fn create_game(
    state: &SharedState,
    request: CreateGameRequest,
) -> Result<GameResponse, ServiceError> {
    let data = GameData::from(request);
    if data.title.is_empty() {
        return Err(ServiceError::InvalidInput("title must not be empty".into()));
    }
    insert_game(state, data).await
}

/// Hydrate a catalog entry from the deals API.
pub async fn import_from_deals(
    state: &SharedState,
    external_id: &str,
) -> Result<GameResponse, ServiceError> {
    let deal = state.deals().find_game(external_id).await?;
    let game = insert_game(state, GameData::from_deal(&deal)).await?;
    info!(game_id = %game.id, external_id, "game imported from deals API");
    Ok(game)
}

async fn insert_game(state: &SharedState, data: GameData) -> Result<GameResponse, ServiceError> {
    let repository = games(state);
    ensure_unique_title(&repository, None, &data.title).await?;

    let record = repository.create(&data).await?;
    info!(game_id = %record.id, title = %record.data.title, "game created");
    tag_service::refresh_game_counts(state).await;
    Ok(record.into())
}

/// One catalog entry.
pub async fn get_game(state: &SharedState, id: Uuid) -> Result<GameResponse, ServiceError> {
    Ok(games(state).get(id).await?.into())
}

/// Catalog sorted by title, optionally narrowed by a search term.
pub async fn list_games(
    state: &SharedState,
    search: Option<&str>,
) -> Result<Vec<GameResponse>, ServiceError> {
    let repository = games(state);
    let mut records = match search {
        Some(term) => repository.search(term, SEARCH_FIELDS).await?,
        None => repository.list().await?,
    };
    records.sort_by_cached_key(|record| record.data.title.to_lowercase());
    Ok(records.into_iter().map(GameResponse::from).collect())
}

/// Merge a partial update, keeping titles unique.
pub async fn update_game(
    state: &SharedState,
    id: Uuid,
    mut request: UpdateGameRequest,
) -> Result<GameResponse, ServiceError> {
    let repository = games(state);
    let current = repository.get(id).await?;

    if let Some(title) = request.title.as_mut() {
        *title = title.trim().to_owned();
        if !title.eq_ignore_ascii_case(&current.data.title) {
            ensure_unique_title(&repository, Some(id), title).await?;
        }
    }

    let record = repository.update(id, &request).await?;
    tag_service::refresh_game_counts(state).await;
    Ok(record.into())
}

/// Hard delete. Reviews of the game are left in place.
pub async fn delete_game(state: &SharedState, id: Uuid) -> Result<(), ServiceError> {
    games(state).delete(id).await?;
    info!(game_id = %id, "game deleted");
    tag_service::refresh_game_counts(state).await;
    Ok(())
}

/// Pass-through listing of current deals.
pub async fn list_deals(
    state: &SharedState,
    params: DealsParams,
) -> Result<Vec<DealRecord>, ServiceError> {
    let query = DealsQuery {
        title: params.title.filter(|title| !title.trim().is_empty()),
        upper_price: params.upper_price,
        page_size: params.page_size,
    };
    Ok(state.deals().list_deals(&query).await?)
}

/// Not atomic with the write that follows.
async fn ensure_unique_title(
    repository: &Repository<GameData>,
    exclude: Option<Uuid>,
    title: &str,
) -> Result<(), ServiceError> {
    let taken = repository
        .list()
        .await?
        .into_iter()
        .any(|record| Some(record.id) != exclude && record.data.title.eq_ignore_ascii_case(title));
    if taken {
        return Err(ServiceError::Conflict(format!(
            "a game titled `{title}` already exists"
        )));
    }
    Ok(())
}
