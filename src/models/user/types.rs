use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Internal user row, including the stored password.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub user_code: String,
    pub user_fname: String,
    pub user_lname: String,
    pub user_login: String,
    pub user_password: String,
    pub user_createdate: NaiveDateTime,
    pub user_updatedate: NaiveDateTime,
}

/// Safe version for responses, no password.
#[derive(Debug, Clone, Serialize)]
pub struct UserOut {
    pub user_code: String,
    pub user_fname: String,
    pub user_lname: String,
    pub user_login: String,
    pub user_createdate: NaiveDateTime,
    pub user_updatedate: NaiveDateTime,
}

impl From<User> for UserOut {
    fn from(u: User) -> Self {
        UserOut {
            user_code: u.user_code,
            user_fname: u.user_fname,
            user_lname: u.user_lname,
            user_login: u.user_login,
            user_createdate: u.user_createdate,
            user_updatedate: u.user_updatedate,
        }
    }
}

/// Registration body. A code is generated when none is given.
#[derive(Debug, Clone, Deserialize)]
pub struct UserCreate {
    pub user_code: Option<String>,
    pub user_fname: String,
    pub user_lname: String,
    pub user_login: String,
    pub user_password: String,
}

/// Update body; the password is only changed when present and non-empty.
#[derive(Debug, Clone, Deserialize)]
pub struct UserUpdate {
    pub user_fname: String,
    pub user_lname: String,
    pub user_login: String,
    pub user_password: Option<String>,
}

/// Validated row ready for insert, password already prepared for storage.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub user_code: String,
    pub user_fname: String,
    pub user_lname: String,
    pub user_login: String,
    pub user_password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub user_login: String,
    pub user_password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user_code: String,
    pub user_fname: String,
    pub user_lname: String,
    pub user_login: String,
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct GeneratedCode {
    pub user_code: String,
}
