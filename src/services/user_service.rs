use crate::{
    database::{StoreError, UserStore},
    models::{name_collator, UserRecord},
    utils::AppError,
};
use serde_json::Value;

pub const MSG_READ_FAILED: &str = "Impossibile leggere il file utenti.";
pub const MSG_PARSE_FAILED: &str = "Errore nel parsing del file utenti.";
pub const MSG_NOT_FOUND: &str = "Utente non trovato.";
pub const MSG_FIELDS_REQUIRED: &str = "Bad Request: name and age are required.";
pub const MSG_DUPLICATE: &str = "Conflict: User with this name already exists.";
pub const MSG_CREATE_WRITE_FAILED: &str = "Impossibile salvare il nuovo utente.";
pub const MSG_DELETE_WRITE_FAILED: &str = "Impossibile eliminare l'utente.";
pub const MSG_UPDATE_WRITE_FAILED: &str = "Impossibile aggiornare l'utente.";

#[derive(Debug)]
pub struct CreatedUser {
    pub location: String,
    pub user: Value,
}

fn read_error(e: StoreError) -> AppError {
    log::error!("❌ {}", e);
    match e {
        StoreError::Parse(_) => AppError::StorageError(MSG_PARSE_FAILED.to_string()),
        _ => AppError::StorageError(MSG_READ_FAILED.to_string()),
    }
}

fn write_error(e: StoreError, message: &str) -> AppError {
    log::error!("❌ {}", e);
    AppError::StorageError(message.to_string())
}

/// All users ordered by name, each reduced to its `name` and `age`.
///
/// A lone record is never compared, so only collections of two or more
/// need a string name on every entry.
pub async fn list_users(store: &UserStore) -> Result<Vec<Value>, AppError> {
    let users = store.load().await.map_err(read_error)?;

    if users.len() < 2 {
        return Ok(users.iter().map(UserRecord::summary).collect());
    }

    let mut named = Vec::with_capacity(users.len());
    for user in &users {
        match user.name() {
            Some(Value::String(name)) => named.push((name.as_str(), user)),
            _ => {
                log::error!("❌ Users file holds a record without a string name");
                return Err(AppError::StorageError(MSG_PARSE_FAILED.to_string()));
            }
        }
    }

    let collator = name_collator().map_err(|e| {
        log::error!("❌ Name collator unavailable: {}", e);
        AppError::StorageError(MSG_PARSE_FAILED.to_string())
    })?;
    named.sort_by(|(a, _), (b, _)| collator.compare(a, b));

    Ok(named.into_iter().map(|(_, user)| user.summary()).collect())
}

pub async fn get_user(store: &UserStore, name: &str) -> Result<Value, AppError> {
    let users = store.load().await.map_err(read_error)?;

    users
        .into_iter()
        .find(|u| u.has_name(name))
        .map(UserRecord::into_inner)
        .ok_or_else(|| AppError::NotFound(MSG_NOT_FOUND.to_string()))
}

/// Append `body` verbatim. A file that cannot be read counts as empty.
pub async fn create_user(store: &UserStore, body: Value) -> Result<CreatedUser, AppError> {
    let user = UserRecord::new(body);
    if !user.has_required_fields() {
        return Err(AppError::InvalidRequest(MSG_FIELDS_REQUIRED.to_string()));
    }

    let _guard = store.write_guard().await;

    let mut users = match store.load().await {
        Ok(users) => users,
        Err(StoreError::Read(e)) => {
            log::warn!("⚠️  Users file unreadable, starting from an empty collection: {}", e);
            Vec::new()
        }
        Err(e) => return Err(read_error(e)),
    };

    if users.iter().any(|u| u.same_name_as(&user)) {
        return Err(AppError::Conflict(MSG_DUPLICATE.to_string()));
    }

    let location = format!("/api/users/{}", urlencoding::encode(&user.name_for_path()));
    users.push(user.clone());
    store
        .save(&users)
        .await
        .map_err(|e| write_error(e, MSG_CREATE_WRITE_FAILED))?;

    Ok(CreatedUser {
        location,
        user: user.into_inner(),
    })
}

/// Remove every record named `name`; returns how many were removed.
pub async fn delete_user(store: &UserStore, name: &str) -> Result<usize, AppError> {
    let _guard = store.write_guard().await;

    let users = store.load().await.map_err(read_error)?;
    let before = users.len();
    let remaining: Vec<UserRecord> = users.into_iter().filter(|u| !u.has_name(name)).collect();
    let removed = before - remaining.len();

    if removed == 0 {
        return Err(AppError::NotFound(MSG_NOT_FOUND.to_string()));
    }

    store
        .save(&remaining)
        .await
        .map_err(|e| write_error(e, MSG_DELETE_WRITE_FAILED))?;

    Ok(removed)
}

/// Replace the first record named `name` with `body`, no merge.
///
/// The shape check runs against the record already stored, not against
/// `body`: a stored record missing `name` or `age` is rejected with 400
/// while any body is accepted as the replacement.
pub async fn update_user(store: &UserStore, name: &str, body: Value) -> Result<Value, AppError> {
    let _guard = store.write_guard().await;

    let mut users = store.load().await.map_err(read_error)?;
    let idx = users
        .iter()
        .position(|u| u.has_name(name))
        .ok_or_else(|| AppError::NotFound(MSG_NOT_FOUND.to_string()))?;

    if !users[idx].has_required_fields() {
        return Err(AppError::InvalidRequest(MSG_FIELDS_REQUIRED.to_string()));
    }

    users[idx] = UserRecord::new(body.clone());
    store
        .save(&users)
        .await
        .map_err(|e| write_error(e, MSG_UPDATE_WRITE_FAILED))?;

    Ok(body)
}
