//! Users table.
//!
//! Goals and transactions reference a user by its `id`. Passwords are stored
//! as argon2id PHC strings, each with its own random salt.

use argon2::{
    Argon2,
    password_hash::{
        Error as PasswordHashError, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
        rand_core::OsRng,
    },
};
use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, util::parse_uuid};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub created_date: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(unique)]
    pub username: String,
    pub password_hash: String,
    pub created_date: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub(crate) fn new(username: String, password: &str) -> ResultEngine<Self> {
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            username,
            password_hash: hash_password(password)?,
            created_date: Utc::now(),
        })
    }
}

impl From<&Model> for ActiveModel {
    fn from(model: &Model) -> Self {
        Self {
            id: ActiveValue::Set(model.id.clone()),
            username: ActiveValue::Set(model.username.clone()),
            password_hash: ActiveValue::Set(model.password_hash.clone()),
            created_date: ActiveValue::Set(model.created_date),
        }
    }
}

impl TryFrom<Model> for User {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "user")?,
            username: model.username,
            created_date: model.created_date,
        })
    }
}

pub(crate) fn hash_password(password: &str) -> ResultEngine<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| EngineError::PasswordHash(err.to_string()))
}

pub(crate) fn verify_password(password: &str, password_hash: &str) -> ResultEngine<()> {
    let parsed =
        PasswordHash::new(password_hash).map_err(|err| EngineError::PasswordHash(err.to_string()))?;
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .map_err(|err| match err {
            PasswordHashError::Password => {
                EngineError::Unauthorized("wrong password".to_string())
            }
            other => EngineError::PasswordHash(other.to_string()),
        })
}
