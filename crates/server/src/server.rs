use axum::{
    Json, Router,
    extract::{Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Basic},
};
use tower_http::cors::CorsLayer;

use std::sync::Arc;

use crate::{goals, transactions, types::Message, user};
use engine::{Engine, EngineError};

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    /// Reject goal/transaction requests without credentials.
    pub require_auth: bool,
}

impl ServerState {
    pub fn new(engine: Engine, require_auth: bool) -> Self {
        Self {
            engine: Arc::new(engine),
            require_auth,
        }
    }
}

/// Scope of the current request, inserted by the auth middleware.
///
/// `None` is the anonymous scope: only goals without an owner are visible.
#[derive(Clone, Debug, Default)]
pub struct Owner(pub Option<String>);

impl Owner {
    pub fn id(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

/// Resolve the request scope from the optional Basic credentials.
async fn auth(
    State(state): State<ServerState>,
    auth_header: Option<TypedHeader<Authorization<Basic>>>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let owner = match auth_header {
        Some(TypedHeader(credentials)) => {
            if credentials.username().is_empty() || credentials.password().is_empty() {
                return Err(StatusCode::UNAUTHORIZED);
            }

            match state
                .engine
                .authenticate(credentials.username(), credentials.password())
                .await
            {
                Ok(user) => Some(user.id.to_string()),
                Err(EngineError::Database(err)) => {
                    tracing::error!("database error during authentication: {err}");
                    return Err(StatusCode::INTERNAL_SERVER_ERROR);
                }
                Err(_) => return Err(StatusCode::UNAUTHORIZED),
            }
        }
        None if state.require_auth => return Err(StatusCode::UNAUTHORIZED),
        None => None,
    };

    request.extensions_mut().insert(Owner(owner));
    Ok(next.run(request).await)
}

async fn root() -> Json<Message> {
    Json(Message::new("Financial Goal Tracker API"))
}

pub fn router(state: ServerState) -> Router {
    Router::new()
        .route("/api/goals", post(goals::goal_new).get(goals::list))
        .route(
            "/api/goals/{goal_id}",
            get(goals::get).delete(goals::delete),
        )
        .route("/api/goals/{goal_id}/progress", get(goals::progress))
        .route("/api/transactions", post(transactions::transaction_new))
        .route("/api/transactions/{goal_id}", get(transactions::list))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth))
        .route("/api/", get(root))
        .route("/api/register", post(user::register))
        .route("/api/login", post(user::login))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn run_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
    require_auth: bool,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    let state = ServerState::new(engine, require_auth);

    axum::serve(listener, router(state)).await
}
