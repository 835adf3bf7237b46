use chrono::{DateTime, Utc};
use model::AuthSession;
use sqlx::FromRow;

#[derive(FromRow)]
pub struct AuthSessionRow {
    pub token: String,
    pub user_id: i64,
    pub expires_at: DateTime<Utc>,
}

impl AuthSessionRow {
    pub fn to_model(self) -> AuthSession {
        AuthSession {
            token: self.token,
            user_id: self.user_id,
            expires_at: self.expires_at,
        }
    }
}
