use sea_orm::{ActiveModelTrait, QueryFilter, SqlErr, TransactionTrait, prelude::*};

use crate::{
    EngineError, ResultEngine, User, users,
    util::normalize_username,
};

use super::{Engine, with_tx};

impl Engine {
    /// Register a new user.
    ///
    /// Usernames are trimmed and NFC-normalized before the uniqueness check.
    pub async fn register(&self, username: &str, password: &str) -> ResultEngine<User> {
        let username = normalize_username(username)?;
        if password.is_empty() {
            return Err(EngineError::InvalidPassword(
                "password must not be empty".to_string(),
            ));
        }

        with_tx!(self, |db_tx| {
            let exists = users::Entity::find()
                .filter(users::Column::Username.eq(username.clone()))
                .one(&db_tx)
                .await?
                .is_some();
            if exists {
                return Err(already_registered());
            }

            let model = users::Model::new(username, password)?;
            users::ActiveModel::from(&model)
                .insert(&db_tx)
                .await
                .map_err(|err| match err.sql_err() {
                    Some(SqlErr::UniqueConstraintViolation(_)) => already_registered(),
                    _ => EngineError::Database(err),
                })?;

            User::try_from(model)
        })
    }

    /// Look a user up by username.
    pub async fn user_by_username(&self, username: &str) -> ResultEngine<User> {
        let username = normalize_username(username)?;
        let model = users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("User".to_string()))?;
        User::try_from(model)
    }

    /// Check a username/password pair.
    ///
    /// Returns [`EngineError::KeyNotFound`] for an unknown user and
    /// [`EngineError::Unauthorized`] for a wrong password.
    pub async fn authenticate(&self, username: &str, password: &str) -> ResultEngine<User> {
        let username = normalize_username(username)?;
        let model = users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("User".to_string()))?;

        users::verify_password(password, &model.password_hash)?;
        User::try_from(model)
    }
}

fn already_registered() -> EngineError {
    EngineError::ExistingKey("Username already registered".to_string())
}
