use axum::{Json, http::StatusCode, response::IntoResponse};
use engine::EngineError;

use serde::Serialize;
pub use server::{Owner, ServerState, router, run_with_listener};

mod goals;
mod server;
mod transactions;
mod user;

pub mod types {
    pub mod goal {
        pub use api_types::goal::{Goal, GoalNew, GoalProgress};
    }

    pub mod transaction {
        pub use api_types::transaction::{Transaction, TransactionNew};
    }

    pub mod user {
        pub use api_types::user::{Credentials, UserSession};
    }

    pub use api_types::Message;
}

pub enum ServerError {
    Engine(EngineError),
}

/// JSON error body: `{"detail": "..."}`.
#[derive(Serialize)]
struct Error {
    detail: String,
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::KeyNotFound(_) => StatusCode::NOT_FOUND,
        EngineError::ExistingKey(_) => StatusCode::BAD_REQUEST,
        EngineError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        EngineError::InvalidAmount(_)
        | EngineError::InvalidName(_)
        | EngineError::InvalidPassword(_) => StatusCode::UNPROCESSABLE_ENTITY,
        EngineError::InvalidId(_) | EngineError::PasswordHash(_) | EngineError::Database(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn message_for_engine_error(err: EngineError) -> String {
    match err {
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            "internal server error".to_string()
        }
        EngineError::InvalidId(msg) | EngineError::PasswordHash(msg) => {
            tracing::error!("corrupted record: {msg}");
            "internal server error".to_string()
        }
        other => other.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let ServerError::Engine(err) = self;
        let (status, detail) = (status_for_engine_error(&err), message_for_engine_error(err));

        (status, Json(Error { detail })).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}
