//! Wire types of the goal tracker REST API.
//!
//! Field names are part of the public contract. Timestamps are UTC and
//! serialized as RFC 3339 strings.

use serde::{Deserialize, Serialize};

/// Generic `{"message": ...}` response body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub message: String,
}

impl Message {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

pub mod goal {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Serialize};
    use uuid::Uuid;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct GoalNew {
        pub name: String,
        pub target_amount: f64,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct Goal {
        pub id: Uuid,
        /// Present only for goals created by an authenticated user.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub owner_id: Option<String>,
        pub name: String,
        pub target_amount: f64,
        pub current_amount: f64,
        pub created_date: DateTime<Utc>,
        pub completed: bool,
        pub completion_date: Option<DateTime<Utc>>,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct GoalProgress {
        pub goal: Goal,
        pub progress_percentage: f64,
        pub remaining_amount: f64,
        pub estimated_days_to_completion: Option<f64>,
        pub estimated_completion_date: Option<DateTime<Utc>>,
        pub average_daily_savings: Option<f64>,
    }
}

pub mod transaction {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Serialize};
    use uuid::Uuid;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionNew {
        /// Goal id. Kept as a plain string so an unknown or malformed id is
        /// reported as a missing goal.
        pub goal_id: String,
        pub amount: f64,
        #[serde(default)]
        pub description: Option<String>,
        /// Back-dates the deposit. Defaults to the time of the request.
        #[serde(default)]
        pub transaction_date: Option<DateTime<Utc>>,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct Transaction {
        pub id: Uuid,
        pub goal_id: Uuid,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub owner_id: Option<String>,
        pub amount: f64,
        pub transaction_date: DateTime<Utc>,
        pub description: Option<String>,
    }
}

pub mod user {
    use serde::{Deserialize, Serialize};
    use uuid::Uuid;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Credentials {
        pub username: String,
        pub password: String,
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct UserSession {
        pub message: String,
        pub user_id: Uuid,
        pub username: String,
    }
}
