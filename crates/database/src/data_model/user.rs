use model::{ApiError, AuthMethod, User};
use sqlx::FromRow;

#[derive(FromRow)]
pub struct UserRow {
    pub id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub password_hash: Option<String>,
    pub google_id: Option<String>,
    pub picture_url: Option<String>,
    pub auth_method: String,
    pub verified: bool,
}

impl UserRow {
    pub fn to_model(self) -> Result<User, ApiError> {
        let auth_method = self
            .auth_method
            .parse::<AuthMethod>()
            .map_err(|_| ApiError::internal("invalid users.auth_method in database"))?;
        Ok(User {
            id: self.id,
            email: self.email,
            first_name: self.first_name,
            last_name: self.last_name,
            phone: self.phone,
            password_hash: self.password_hash,
            google_id: self.google_id,
            picture_url: self.picture_url,
            auth_method,
            verified: self.verified,
        })
    }
}
