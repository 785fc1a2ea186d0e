use crate::types::auth::UserView;
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq)]
pub struct DbUser {
    pub id: i64,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl From<DbUser> for UserView {
    fn from(u: DbUser) -> Self {
        UserView {
            id: u.id.to_string(),
            email: u.email,
            created_at: u.created_at,
        }
    }
}
