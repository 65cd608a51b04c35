use std::sync::Arc;

use gamehub_local::{
    config::AppConfig,
    dao::{
        deals::DealsClient, document_store::memory::MemoryBackend, entities::ModerationAction,
        entities::UserRole, store::DocumentStore,
    },
    dto::{
        game::{CreateGameRequest, GameResponse},
        review::{CreateReviewRequest, UpdateReviewRequest},
        tag::CreateTagRequest,
        user::{CreateUserRequest, RoleRequest, UpdateUserRequest},
    },
    error::ServiceError,
    services::{
        collection_service,
        content_analysis::{SentimentLabel, analyze_sentiment, assess_spam},
        game_service, moderation_service, recommendation_service,
        review_service, tag_service, user_service,
    },
    state::{AppState, Session, SharedState, moderation::ModerationEvent, moderation::ModerationStatus},
};

fn state() -> SharedState {
    let store = DocumentStore::with_backend(Arc::new(MemoryBackend::new()));
    let deals = DealsClient::new("http://deals.invalid").unwrap();
    AppState::new(AppConfig::default(), store, deals)
}

fn user_request(username: &str, email: &str, favorites: &[&str]) -> CreateUserRequest {
    CreateUserRequest {
        username: username.into(),
        email: email.into(),
        display_name: None,
        bio: None,
        avatar: None,
        favorite_genres: favorites.iter().map(|g| g.to_string()).collect(),
    }
}

fn game_request(title: &str, developer: &str, genre: &[&str], tags: &[&str]) -> CreateGameRequest {
    CreateGameRequest {
        title: title.into(),
        developer: Some(developer.into()),
        publisher: None,
        genre: genre.iter().map(|g| g.to_string()).collect(),
        platform: vec!["PC".into()],
        release_date: None,
        description: None,
        image: None,
        status: None,
        tags: tags.iter().map(|t| t.to_string()).collect(),
    }
}

async fn signed_in(state: &SharedState, username: &str, role: UserRole, favorites: &[&str]) -> Session {
    let email = format!("{username}@example.com");
    let user = user_service::create_user(state, user_request(username, &email, favorites))
        .await
        .unwrap();
    if role != UserRole::Member {
        user_service::assign_role(state, user.id, RoleRequest { role })
            .await
            .unwrap();
    }
    let opened = user_service::login(state, username).await.unwrap();
    state.session(&opened.token).unwrap()
}

async fn add_game(state: &SharedState, title: &str, developer: &str, genre: &[&str]) -> GameResponse {
    game_service::create_game(state, game_request(title, developer, genre, &[]))
        .await
        .unwrap()
}

fn review(game: &GameResponse, rating: u8, content: &str) -> CreateReviewRequest {
    CreateReviewRequest {
        game_id: game.id,
        rating,
        title: None,
        content: Some(content.into()),
    }
}

const SPAM: &str = "Terrible, boring, a waste!!!!! visit www.cheapkeys.com";

#[tokio::test]
async fn usernames_and_emails_must_be_unique() {
    let state = state();
    user_service::create_user(&state, user_request("ana", "ana@example.com", &[]))
        .await
        .unwrap();

    let same_name = user_service::create_user(
        &state,
        user_request("ana", "other@example.com", &[]),
    )
    .await;
    assert!(matches!(same_name, Err(ServiceError::Conflict(_))));

    let same_email = user_service::create_user(
        &state,
        user_request("bo", "ANA@Example.com", &[]),
    )
    .await;
    assert!(matches!(same_email, Err(ServiceError::Conflict(_))));

    assert_eq!(user_service::list_users(&state).await.unwrap().len(), 1);
}

#[tokio::test]
async fn renaming_onto_a_taken_username_conflicts() {
    let state = state();
    signed_in(&state, "ana", UserRole::Member, &[]).await;
    let bo = signed_in(&state, "bo", UserRole::Member, &[]).await;

    let rename = UpdateUserRequest {
        username: Some("ana".into()),
        ..Default::default()
    };
    let result = user_service::update_user(&state, &bo, bo.user_id, rename).await;
    assert!(matches!(result, Err(ServiceError::Conflict(_))));

    let bio = UpdateUserRequest {
        bio: Some("Speedrunner".into()),
        ..Default::default()
    };
    let updated = user_service::update_user(&state, &bo, bo.user_id, bio)
        .await
        .unwrap();
    assert_eq!(updated.username, "bo");
    assert_eq!(updated.bio.as_deref(), Some("Speedrunner"));
}

#[tokio::test]
async fn first_review_sets_the_game_rating() {
    let state = state();
    let ana = signed_in(&state, "ana", UserRole::Member, &[]).await;
    let hades = add_game(&state, "Hades", "Supergiant Games", &["Roguelike", "Action"]).await;

    let written = review_service::create_review(
        &state,
        &ana,
        review(&hades, 5, "Amazing combat and a fantastic soundtrack."),
    )
    .await
    .unwrap();

    assert_eq!(written.rating.average_rating, 5.0);
    assert_eq!(written.rating.review_count, 1);
    let stored = written.review.unwrap();
    assert_eq!(stored.moderation_status, ModerationStatus::Approved);

    let summary = review_service::rating_summary(&state, hades.id).await.unwrap();
    assert_eq!(summary.review_count, 1);
    assert_eq!(review_service::list_for_game(&state, hades.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn one_review_per_user_and_game() {
    let state = state();
    let ana = signed_in(&state, "ana", UserRole::Member, &[]).await;
    let hades = add_game(&state, "Hades", "Supergiant Games", &["Roguelike"]).await;

    review_service::create_review(&state, &ana, review(&hades, 4, "Great runs."))
        .await
        .unwrap();
    let again = review_service::create_review(&state, &ana, review(&hades, 2, "Changed my mind."))
        .await;
    assert!(matches!(again, Err(ServiceError::Conflict(_))));

    let out_of_range = review_service::create_review(&state, &ana, review(&hades, 6, "Too good."))
        .await;
    assert!(matches!(out_of_range, Err(ServiceError::InvalidInput(_))));
}

#[tokio::test]
async fn only_the_author_edits_a_review() {
    let state = state();
    let ana = signed_in(&state, "ana", UserRole::Member, &[]).await;
    let bo = signed_in(&state, "bo", UserRole::Member, &[]).await;
    let pyre = add_game(&state, "Pyre", "Supergiant Games", &["RPG"]).await;

    let written = review_service::create_review(&state, &ana, review(&pyre, 3, "Decent story."))
        .await
        .unwrap();
    let review_id = written.review.unwrap().id;

    let patch = UpdateReviewRequest {
        rating: Some(1),
        ..Default::default()
    };
    let foreign = review_service::update_review(&state, &bo, review_id, patch).await;
    assert!(matches!(foreign, Err(ServiceError::Unauthorized(_))));
    let foreign_delete = review_service::delete_review(&state, &bo, review_id).await;
    assert!(matches!(foreign_delete, Err(ServiceError::Unauthorized(_))));

    let patch = UpdateReviewRequest {
        rating: Some(5),
        ..Default::default()
    };
    let updated = review_service::update_review(&state, &ana, review_id, patch)
        .await
        .unwrap();
    assert_eq!(updated.rating.average_rating, 5.0);

    let deleted = review_service::delete_review(&state, &ana, review_id).await.unwrap();
    assert!(deleted.review.is_none());
    assert_eq!(deleted.rating.review_count, 0);
    assert_eq!(deleted.rating.average_rating, 0.0);
}

#[tokio::test]
async fn spam_reviews_wait_for_a_moderator() {
    let state = state();
    let ana = signed_in(&state, "ana", UserRole::Member, &[]).await;
    let mod_session = signed_in(&state, "mod", UserRole::Moderator, &[]).await;
    let game = add_game(&state, "Celeste", "Maddy Makes Games", &["Platformer"]).await;

    let written = review_service::create_review(&state, &ana, review(&game, 1, SPAM))
        .await
        .unwrap();
    let pending = written.review.unwrap();
    assert_eq!(pending.moderation_status, ModerationStatus::Pending);
    assert_eq!(written.rating.review_count, 0);
    assert!(review_service::list_for_game(&state, game.id).await.unwrap().is_empty());

    let dashboard = moderation_service::dashboard(&state, &mod_session).await.unwrap();
    assert_eq!(dashboard.counts.pending, 1);
    assert_eq!(dashboard.pending_reviews[0].id, pending.id);
    assert!(
        dashboard
            .recent_logs
            .iter()
            .any(|log| log.action == ModerationAction::AutoFlag && log.target_id == pending.id)
    );

    let member_attempt =
        moderation_service::moderate_review(&state, &ana, pending.id, ModerationEvent::Approve, None)
            .await;
    assert!(matches!(member_attempt, Err(ServiceError::Unauthorized(_))));

    let outcome = moderation_service::moderate_review(
        &state,
        &mod_session,
        pending.id,
        ModerationEvent::Approve,
        Some("false positive".into()),
    )
    .await
    .unwrap();
    assert_eq!(outcome.review.moderation_status, ModerationStatus::Approved);
    assert_eq!(outcome.log.action, ModerationAction::Approve);
    assert_eq!(outcome.log.previous_status, Some(ModerationStatus::Pending));
    assert_eq!(outcome.log.new_status, Some(ModerationStatus::Approved));
    assert_eq!(outcome.log.moderator_id, Some(mod_session.user_id));

    let summary = review_service::rating_summary(&state, game.id).await.unwrap();
    assert_eq!(summary.review_count, 1);
    assert_eq!(summary.average_rating, 1.0);
}

#[tokio::test]
async fn moderation_follows_the_status_machine() {
    let state = state();
    let ana = signed_in(&state, "ana", UserRole::Member, &[]).await;
    let bo = signed_in(&state, "bo", UserRole::Member, &[]).await;
    let admin = signed_in(&state, "root", UserRole::Admin, &[]).await;
    let game = add_game(&state, "Hollow Knight", "Team Cherry", &["Metroidvania"]).await;

    let written = review_service::create_review(&state, &ana, review(&game, 5, "Beautiful world."))
        .await
        .unwrap();
    let id = written.review.unwrap().id;

    let flagged = moderation_service::moderate_review(&state, &bo, id, ModerationEvent::Flag, None)
        .await
        .unwrap();
    assert_eq!(flagged.review.moderation_status, ModerationStatus::Pending);
    assert_eq!(flagged.log.action, ModerationAction::Flag);

    let rejected =
        moderation_service::moderate_review(&state, &admin, id, ModerationEvent::Reject, None)
            .await
            .unwrap();
    assert_eq!(rejected.review.moderation_status, ModerationStatus::Rejected);

    let flag_rejected =
        moderation_service::moderate_review(&state, &bo, id, ModerationEvent::Flag, None).await;
    assert!(matches!(flag_rejected, Err(ServiceError::InvalidState(_))));

    let dashboard = moderation_service::dashboard(&state, &admin).await.unwrap();
    assert_eq!(dashboard.counts.rejected, 1);
    assert_eq!(dashboard.counts.approved, 0);
}

#[tokio::test]
async fn favorite_genre_ranks_first() {
    let state = state();
    let ana = signed_in(&state, "ana", UserRole::Member, &["RPG"]).await;
    add_game(&state, "Stardew Valley", "ConcernedApe", &["Simulation"]).await;
    let hades = add_game(&state, "Hades", "Supergiant Games", &["Roguelike", "Action"]).await;
    add_game(&state, "Dead Cells", "Motion Twin", &["Roguelike", "Action"]).await;
    add_game(&state, "The Witcher 3", "CD Projekt Red", &["RPG", "Open World"]).await;

    review_service::create_review(&state, &ana, review(&hades, 5, "Loved every run."))
        .await
        .unwrap();

    let generated = recommendation_service::generate(&state, &ana).await.unwrap();
    let titles: Vec<&str> = generated.games.iter().map(|g| g.title.as_str()).collect();
    assert_eq!(titles, vec!["The Witcher 3", "Dead Cells", "Stardew Valley"]);
    assert!(generated.generated_on.is_some());

    let latest = recommendation_service::latest_for_user(&state, &ana).await.unwrap();
    assert_eq!(latest.id, generated.id);
}

#[tokio::test]
async fn latest_recommendation_requires_one_generated() {
    let state = state();
    let ana = signed_in(&state, "ana", UserRole::Member, &[]).await;
    let missing = recommendation_service::latest_for_user(&state, &ana).await;
    assert!(matches!(missing, Err(ServiceError::NotFound(_))));
}

#[tokio::test]
async fn tag_counts_follow_the_catalog() {
    let state = state();
    tag_service::create_tag(
        &state,
        CreateTagRequest {
            name: "Roguelike".into(),
            description: None,
            color: Some("#ff5500".into()),
        },
    )
    .await
    .unwrap();

    let game = game_service::create_game(
        &state,
        game_request("Hades", "Supergiant Games", &["Action"], &["roguelike"]),
    )
    .await
    .unwrap();
    let tags = tag_service::list_tags(&state).await.unwrap();
    assert_eq!(tags[0].game_count, 1);

    game_service::delete_game(&state, game.id).await.unwrap();
    let tags = tag_service::list_tags(&state).await.unwrap();
    assert_eq!(tags[0].game_count, 0);

    let duplicate = tag_service::create_tag(
        &state,
        CreateTagRequest {
            name: "ROGUELIKE".into(),
            description: None,
            color: None,
        },
    )
    .await;
    assert!(matches!(duplicate, Err(ServiceError::Conflict(_))));
}

#[tokio::test]
async fn game_titles_are_unique_and_searchable() {
    let state = state();
    add_game(&state, "The Witcher 3", "CD Projekt Red", &["RPG"]).await;
    add_game(&state, "Hades", "Supergiant Games", &["Roguelike"]).await;

    let duplicate = game_service::create_game(
        &state,
        game_request("the witcher 3", "Someone", &[], &[]),
    )
    .await;
    assert!(matches!(duplicate, Err(ServiceError::Conflict(_))));

    let found = game_service::list_games(&state, Some("SUPERGIANT")).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].title, "Hades");

    let all = game_service::list_games(&state, None).await.unwrap();
    let titles: Vec<&str> = all.iter().map(|g| g.title.as_str()).collect();
    assert_eq!(titles, vec!["Hades", "The Witcher 3"]);
}

#[tokio::test]
async fn generic_search_and_purge() {
    let state = state();
    let ana = signed_in(&state, "ana", UserRole::Member, &[]).await;
    add_game(&state, "The Witcher 3", "CD Projekt Red", &["RPG"]).await;
    add_game(&state, "Hades", "Supergiant Games", &["Roguelike"]).await;

    let hits = collection_service::search(&state, "games", "witcher", &[]).await.unwrap();
    assert_eq!(hits.len(), 1);
    let by_genre = collection_service::search(&state, "games", "rogue", &["genre"])
        .await
        .unwrap();
    assert_eq!(by_genre.len(), 1);

    let bad_field = collection_service::search(&state, "games", "x", &["nope"]).await;
    assert!(matches!(bad_field, Err(ServiceError::InvalidInput(_))));
    let bad_collection = collection_service::search(&state, "achievements", "x", &[]).await;
    assert!(matches!(bad_collection, Err(ServiceError::NotFound(_))));

    let purged = collection_service::purge(&state, Some("games")).await.unwrap();
    assert_eq!(purged.removed, 2);
    assert!(game_service::list_games(&state, None).await.unwrap().is_empty());

    collection_service::purge(&state, None).await.unwrap();
    assert!(state.session(&ana.token).is_none());
    assert!(user_service::list_users(&state).await.unwrap().is_empty());
}

#[tokio::test]
async fn deleting_a_user_ends_their_session() {
    let state = state();
    let ana = signed_in(&state, "ana", UserRole::Member, &[]).await;
    let me = user_service::current_user(&state, &ana).await.unwrap();
    assert_eq!(me.username, "ana");

    user_service::delete_user(&state, &ana, ana.user_id).await.unwrap();
    assert!(state.session(&ana.token).is_none());
    let gone = user_service::get_user(&state, ana.user_id).await;
    assert!(matches!(gone, Err(ServiceError::NotFound(_))));
}

#[tokio::test]
async fn members_cannot_touch_other_accounts() {
    let state = state();
    let ana = signed_in(&state, "ana", UserRole::Member, &[]).await;
    let mallory = signed_in(&state, "mallory", UserRole::Member, &[]).await;

    let rename = UpdateUserRequest {
        username: Some("ana-was-here".into()),
        ..Default::default()
    };
    let edit = user_service::update_user(&state, &mallory, ana.user_id, rename).await;
    assert!(matches!(edit, Err(ServiceError::Unauthorized(_))));

    let delete = user_service::delete_user(&state, &mallory, ana.user_id).await;
    assert!(matches!(delete, Err(ServiceError::Unauthorized(_))));
    assert!(state.session(&ana.token).is_some());
    assert_eq!(
        user_service::get_user(&state, ana.user_id).await.unwrap().username,
        "ana"
    );
}

#[tokio::test]
async fn admins_manage_any_account() {
    let state = state();
    let ana = signed_in(&state, "ana", UserRole::Member, &[]).await;
    let admin = signed_in(&state, "root", UserRole::Admin, &[]).await;

    let bio = UpdateUserRequest {
        bio: Some("Reset by staff".into()),
        ..Default::default()
    };
    let updated = user_service::update_user(&state, &admin, ana.user_id, bio)
        .await
        .unwrap();
    assert_eq!(updated.bio.as_deref(), Some("Reset by staff"));

    user_service::delete_user(&state, &admin, ana.user_id).await.unwrap();
    assert!(state.session(&ana.token).is_none());
}

#[tokio::test]
async fn profile_edits_cannot_grant_moderation_rights() {
    let state = state();
    let ana = signed_in(&state, "ana", UserRole::Member, &[]).await;
    let mallory = signed_in(&state, "mallory", UserRole::Member, &[]).await;
    let game = add_game(&state, "Hades", "Supergiant Games", &["Roguelike"]).await;
    let written = review_service::create_review(&state, &ana, review(&game, 5, "Great runs."))
        .await
        .unwrap();
    let review_id = written.review.unwrap().id;

    let patch: UpdateUserRequest =
        serde_json::from_value(serde_json::json!({ "role": "moderator", "bio": "mod now" }))
            .unwrap();
    let updated = user_service::update_user(&state, &mallory, mallory.user_id, patch)
        .await
        .unwrap();
    assert_eq!(updated.role, UserRole::Member);

    let reject = moderation_service::moderate_review(
        &state,
        &mallory,
        review_id,
        ModerationEvent::Reject,
        None,
    )
    .await;
    assert!(matches!(reject, Err(ServiceError::Unauthorized(_))));
    let summary = review_service::rating_summary(&state, game.id).await.unwrap();
    assert_eq!(summary.review_count, 1);
}

#[tokio::test]
async fn dashboard_is_for_moderators() {
    let state = state();
    let ana = signed_in(&state, "ana", UserRole::Member, &[]).await;
    let moderator = signed_in(&state, "mod", UserRole::Moderator, &[]).await;

    let denied = moderation_service::dashboard(&state, &ana).await;
    assert!(matches!(denied, Err(ServiceError::Unauthorized(_))));
    let dashboard = moderation_service::dashboard(&state, &moderator).await.unwrap();
    assert_eq!(dashboard.counts.pending, 0);
}

#[tokio::test]
async fn assigning_a_role_to_an_unknown_user_fails() {
    let state = state();
    let missing = user_service::assign_role(
        &state,
        uuid::Uuid::new_v4(),
        RoleRequest {
            role: UserRole::Admin,
        },
    )
    .await;
    assert!(matches!(missing, Err(ServiceError::NotFound(_))));
}

#[tokio::test]
async fn moderation_log_scores_title_and_body_together() {
    let state = state();
    let ana = signed_in(&state, "ana", UserRole::Member, &[]).await;
    let moderator = signed_in(&state, "mod", UserRole::Moderator, &[]).await;
    let game = add_game(&state, "Hades", "Supergiant", &["Roguelike"]).await;

    let mut request = review(&game, 4, "a bit bad");
    request.title = Some("Amazing wonderful great".into());
    let written = review_service::create_review(&state, &ana, request)
        .await
        .unwrap()
        .review
        .unwrap();
    assert_eq!(written.sentiment, Some(SentimentLabel::Positive));

    let outcome =
        moderation_service::moderate_review(&state, &moderator, written.id, ModerationEvent::Flag, None)
            .await
            .unwrap();
    let text = "Amazing wonderful great\na bit bad";
    assert_eq!(outcome.log.sentiment, written.sentiment);
    assert_eq!(outcome.log.confidence, Some(analyze_sentiment(text).confidence));
    assert_eq!(outcome.log.spam_score, Some(assess_spam(text).score));
}
