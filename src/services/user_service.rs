use tracing::info;
use uuid::Uuid;

use crate::{
    dao::{
        entities::{UserData, UserRole},
        repository::{Record, Repository},
    },
    dto::user::{CreateUserRequest, RoleRequest, SessionResponse, UpdateUserRequest, UserResponse},
    error::ServiceError,
    state::{Session, SharedState},
};

fn users(state: &SharedState) -> Repository<UserData> {
    Repository::new(state.store().clone())
}

/// Register an account; username (exact) and email (case-insensitive) must be unused.
pub async fn create_user(
    state: &SharedState,
    request: CreateUserRequest,
) -> Result<UserResponse, ServiceError> {
    let data = UserData::from(request);
    if data.username.is_empty() {
        return Err(ServiceError::InvalidInput(
            "username must not be empty".into(),
        ));
    }

    let repository = users(state);
    ensure_unique(&repository, None, Some(&data.username), Some(&data.email)).await?;

    let record = repository.create(&data).await?;
    info!(user_id = %record.id, username = %record.data.username, "user registered");
    Ok(record.into())
}

/// One account by id.
pub async fn get_user(state: &SharedState, id: Uuid) -> Result<UserResponse, ServiceError> {
    Ok(users(state).get(id).await?.into())
}

/// Every account, by username.
pub async fn list_users(state: &SharedState) -> Result<Vec<UserResponse>, ServiceError> {
    let mut records = users(state).list().await?;
    records.sort_by(|a, b| a.data.username.cmp(&b.data.username));
    Ok(records.into_iter().map(UserResponse::from).collect())
}

/// Apply a profile patch, re-checking uniqueness when username or email change.
///
/// Only the account owner or an admin may edit a profile.
pub async fn update_user(
    state: &SharedState,
    session: &Session,
    id: Uuid,
    mut request: UpdateUserRequest,
) -> Result<UserResponse, ServiceError> {
    ensure_self_or_admin(state, session, id).await?;
    let repository = users(state);
    let current = repository.get(id).await?;

    if let Some(username) = request.username.as_mut() {
        *username = username.trim().to_owned();
    }
    if let Some(email) = request.email.as_mut() {
        *email = email.trim().to_owned();
    }

    let username = request
        .username
        .as_deref()
        .filter(|username| *username != current.data.username);
    let email = request
        .email
        .as_deref()
        .filter(|email| !email.eq_ignore_ascii_case(&current.data.email));
    ensure_unique(&repository, Some(id), username, email).await?;

    Ok(repository.update(id, &request).await?.into())
}

/// Remove the account and close its sessions. Reviews it wrote stay in place.
///
/// Only the account owner or an admin may delete an account.
pub async fn delete_user(
    state: &SharedState,
    session: &Session,
    id: Uuid,
) -> Result<(), ServiceError> {
    ensure_self_or_admin(state, session, id).await?;
    users(state).delete(id).await?;
    state.close_sessions_of(id);
    info!(user_id = %id, "user deleted");
    Ok(())
}

/// Open a session for the user named `username`.
pub async fn login(state: &SharedState, username: &str) -> Result<SessionResponse, ServiceError> {
    let username = username.trim();
    let record = find_by_username(state, username)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("user `{username}`")))?;

    let session = state.open_session(record.id, record.data.username.clone());
    info!(user_id = %record.id, "session opened");
    Ok(SessionResponse {
        token: session.token,
        user: record.into(),
    })
}

/// Close `session`; its token stops working immediately.
pub fn logout(state: &SharedState, session: &Session) {
    state.close_session(&session.token);
    info!(user_id = %session.user_id, "session closed");
}

/// Profile of the user behind `session`.
pub async fn current_user(
    state: &SharedState,
    session: &Session,
) -> Result<UserResponse, ServiceError> {
    match users(state).find(session.user_id).await? {
        Some(record) => Ok(record.into()),
        None => {
            state.close_session(&session.token);
            Err(ServiceError::Unauthorized(
                "session user no longer exists".into(),
            ))
        }
    }
}

/// Grant `role` to an account. Reached only through the admin-token guarded routes.
pub async fn assign_role(
    state: &SharedState,
    id: Uuid,
    request: RoleRequest,
) -> Result<UserResponse, ServiceError> {
    let record = users(state).update(id, &request).await?;
    info!(user_id = %id, role = ?request.role, "role assigned");
    Ok(record.into())
}

/// Role of the user behind `session`; a session whose user is gone is rejected.
pub(crate) async fn session_role(
    state: &SharedState,
    session: &Session,
) -> Result<UserRole, ServiceError> {
    users(state)
        .find(session.user_id)
        .await?
        .map(|record| record.data.role)
        .ok_or_else(|| ServiceError::Unauthorized("session user no longer exists".into()))
}

async fn ensure_self_or_admin(
    state: &SharedState,
    session: &Session,
    id: Uuid,
) -> Result<(), ServiceError> {
    if session.user_id == id {
        return Ok(());
    }
    match session_role(state, session).await? {
        UserRole::Admin => Ok(()),
        UserRole::Member | UserRole::Moderator => Err(ServiceError::Unauthorized(
            "only the account owner or an admin may change this account".into(),
        )),
    }
}

async fn find_by_username(
    state: &SharedState,
    username: &str,
) -> Result<Option<Record<UserData>>, ServiceError> {
    let mut matches = users(state)
        .filter(|user| user.username == username)
        .await?;
    Ok(matches.pop())
}

/// Scan for another account holding `username` or `email`. Not atomic with the write that follows.
async fn ensure_unique(
    repository: &Repository<UserData>,
    exclude: Option<Uuid>,
    username: Option<&str>,
    email: Option<&str>,
) -> Result<(), ServiceError> {
    if username.is_none() && email.is_none() {
        return Ok(());
    }

    for record in repository.list().await? {
        if Some(record.id) == exclude {
            continue;
        }
        if username.is_some_and(|username| record.data.username == username) {
            return Err(ServiceError::Conflict(format!(
                "username `{}` is already taken",
                record.data.username
            )));
        }
        if email.is_some_and(|email| record.data.email.eq_ignore_ascii_case(email)) {
            return Err(ServiceError::Conflict("email is already registered".into()));
        }
    }
    Ok(())
}
