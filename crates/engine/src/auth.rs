//! Authentication & Sessions, §4.8.

use base64::Engine as _;
use chrono::{DateTime, Duration, Utc};
use database::queries;
use hmac::Hmac;
use model::{ApiError, User};
use pbkdf2::pbkdf2;
use rand::RngCore;
use sha2::Sha256;
use sqlx::PgPool;
use std::env;

const PBKDF2_ITERATIONS: u32 = 120_000;
const SALT_LEN: usize = 16;
const HASH_LEN: usize = 32;
const SESSION_TTL_DAYS: i64 = 7;
const LEGACY_PREFIX: &str = "hash_";

/// `pbkdf2$<iterations>$<base64 salt>$<base64 hash>`, SHA-256, 120 000
/// iterations, 16-byte salt, 256-bit output (§4.8).
pub fn hash_password(password: &str) -> String {
    let mut salt = [0u8; SALT_LEN];
    rand::thread_rng().fill_bytes(&mut salt);
    let hash = derive(password, &salt);
    format!(
        "pbkdf2${PBKDF2_ITERATIONS}${}${}",
        base64::engine::general_purpose::STANDARD.encode(salt),
        base64::engine::general_purpose::STANDARD.encode(hash),
    )
}

/// Accepts the current `pbkdf2$...` format and the legacy
/// `"hash_" + base64(password)` format, for backward compatibility.
pub fn verify_password(password: &str, stored: &str) -> bool {
    if let Some(legacy) = stored.strip_prefix(LEGACY_PREFIX) {
        let expected = base64::engine::general_purpose::STANDARD.encode(password);
        return legacy == expected;
    }

    let mut parts = stored.split('$');
    let (Some("pbkdf2"), Some(iterations), Some(salt_b64), Some(hash_b64)) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return false;
    };
    let Ok(iterations) = iterations.parse::<u32>() else {
        return false;
    };
    let Ok(salt) = base64::engine::general_purpose::STANDARD.decode(salt_b64) else {
        return false;
    };
    let Ok(expected_hash) = base64::engine::general_purpose::STANDARD.decode(hash_b64) else {
        return false;
    };

    let mut computed = vec![0u8; expected_hash.len()];
    let _ = pbkdf2::<Hmac<Sha256>>(password.as_bytes(), &salt, iterations, &mut computed);
    constant_time_eq::constant_time_eq(&computed, &expected_hash)
}

fn derive(password: &str, salt: &[u8]) -> [u8; HASH_LEN] {
    let mut out = [0u8; HASH_LEN];
    let _ = pbkdf2::<Hmac<Sha256>>(password.as_bytes(), salt, PBKDF2_ITERATIONS, &mut out);
    out
}

/// An opaque token embedding the user id, issuance timestamp, and 24 bytes
/// of randomness, base64-encoded with URL-unsafe characters stripped.
fn generate_token(user_id: i64) -> String {
    let mut random = [0u8; 24];
    rand::thread_rng().fill_bytes(&mut random);
    let raw = format!(
        "{user_id}.{}.{}",
        Utc::now().timestamp(),
        base64::engine::general_purpose::STANDARD.encode(random)
    );
    raw.chars().filter(|c| *c != '+' && *c != '/' && *c != '=').collect()
}

pub async fn issue_session(pool: &PgPool, user_id: i64) -> Result<(String, DateTime<Utc>), ApiError> {
    let token = generate_token(user_id);
    let expires_at = Utc::now() + Duration::days(SESSION_TTL_DAYS);
    queries::auth_session::insert(pool, &token, user_id, expires_at).await?;
    Ok((token, expires_at))
}

pub async fn authenticate(pool: &PgPool, token: &str) -> Result<User, ApiError> {
    queries::auth_session::get_valid_user(pool, token)
        .await?
        .ok_or(ApiError::AuthRequired)
}

pub struct SeedPassenger {
    pub phone: String,
    pub nok_name: Option<String>,
    pub nok_phone: Option<String>,
}

/// `POST /api/auth/signup`: creates the account and a seed passenger row
/// sharing its email (§4.8), then issues a session.
pub async fn sign_up_email(
    pool: &PgPool,
    email: &str,
    password: &str,
    first_name: &str,
    last_name: &str,
    seed: SeedPassenger,
) -> Result<(User, String, DateTime<Utc>), ApiError> {
    if queries::user::get_by_email(pool, email).await?.is_some() {
        return Err(ApiError::input_invalid("email is already registered"));
    }

    let password_hash = hash_password(password);
    let user = queries::user::insert_email_user(pool, email, first_name, last_name, &seed.phone, &password_hash).await?;
    queries::passenger::insert(
        pool,
        first_name,
        last_name,
        email,
        &seed.phone,
        seed.nok_name.as_deref(),
        seed.nok_phone.as_deref(),
    )
    .await?;

    let (token, expires_at) = issue_session(pool, user.id).await?;
    Ok((user, token, expires_at))
}

/// `POST /api/auth/signin`: plain email/password login.
pub async fn sign_in_email(
    pool: &PgPool,
    email: &str,
    password: &str,
) -> Result<(User, String, DateTime<Utc>), ApiError> {
    let user = queries::user::get_by_email(pool, email).await?.ok_or(ApiError::AuthRequired)?;
    let matches = user
        .password_hash
        .as_deref()
        .is_some_and(|hash| verify_password(password, hash));
    if !matches {
        return Err(ApiError::AuthRequired);
    }

    let (token, expires_at) = issue_session(pool, user.id).await?;
    Ok((user, token, expires_at))
}

pub enum GoogleMode {
    SignIn,
    SignUp,
}

pub struct GoogleProfile<'a> {
    pub subject: &'a str,
    pub email: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub picture_url: Option<&'a str>,
}

/// `POST /api/auth/google`: resolves a client-decoded federated identity
/// token to a local account (§4.8, §9 open question on server-side
/// verification of the provider signature).
pub async fn google_auth(
    pool: &PgPool,
    profile: GoogleProfile<'_>,
    mode: GoogleMode,
    seed: Option<SeedPassenger>,
) -> Result<(User, String, DateTime<Utc>), ApiError> {
    let mut user = queries::user::get_by_google_id(pool, profile.subject).await?;

    if user.is_none() {
        if let Some(existing) = queries::user::get_by_email(pool, profile.email).await? {
            user = Some(queries::user::attach_google_id(pool, existing.id, profile.subject, profile.picture_url).await?);
        }
    }

    let user = match user {
        Some(user) => user,
        None => match mode {
            GoogleMode::SignIn => return Err(ApiError::NotFound),
            GoogleMode::SignUp => {
                let seed = seed
                    .filter(|seed| !seed.phone.is_empty())
                    .ok_or_else(|| ApiError::input_invalid("phone is required to sign up"))?;
                let user = queries::user::insert_google_user(
                    pool,
                    profile.email,
                    profile.first_name,
                    profile.last_name,
                    &seed.phone,
                    profile.subject,
                    profile.picture_url,
                )
                .await?;
                queries::passenger::insert(
                    pool,
                    profile.first_name,
                    profile.last_name,
                    profile.email,
                    &seed.phone,
                    seed.nok_name.as_deref(),
                    seed.nok_phone.as_deref(),
                )
                .await?;
                user
            }
        },
    };

    let (token, expires_at) = issue_session(pool, user.id).await?;
    Ok((user, token, expires_at))
}

/// `isAdmin(email)`: true iff `email` (case-insensitive) appears in the
/// comma-separated `ADMIN_EMAILS` allow-list. No database-side role.
pub fn is_admin(email: &str) -> bool {
    let Ok(allow_list) = env::var("ADMIN_EMAILS") else {
        return false;
    };
    allow_list
        .split(',')
        .any(|candidate| candidate.trim().eq_ignore_ascii_case(email))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_current_format() {
        let hash = hash_password("correct horse battery staple");
        assert!(verify_password("correct horse battery staple", &hash));
        assert!(!verify_password("wrong password", &hash));
    }

    #[test]
    fn accepts_legacy_format() {
        let legacy = format!(
            "hash_{}",
            base64::engine::general_purpose::STANDARD.encode("my-password")
        );
        assert!(verify_password("my-password", &legacy));
        assert!(!verify_password("not-my-password", &legacy));
    }

    #[test]
    fn admin_allow_list_is_case_insensitive() {
        std::env::set_var("ADMIN_EMAILS", "Admin@Example.com, second@example.com");
        assert!(is_admin("admin@example.com"));
        assert!(is_admin("SECOND@EXAMPLE.COM"));
        assert!(!is_admin("nobody@example.com"));
    }
}
