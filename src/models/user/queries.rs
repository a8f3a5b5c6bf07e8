use sqlx::PgPool;

use crate::errors::AppError;
use super::types::*;

const SELECT_USER: &str = "\
    SELECT user_code, user_fname, user_lname, user_login, user_password, \
           user_createdate, user_updatedate \
    FROM idea_users";

pub const CODE_PREFIX: &str = "USR";

/// `USR0001`, `USR0002`, ... widening past four digits when needed.
pub fn format_user_code(n: i64) -> String {
    format!("{CODE_PREFIX}{n:04}")
}

pub async fn find_all(pool: &PgPool) -> Result<Vec<User>, AppError> {
    let sql = format!("{SELECT_USER} ORDER BY user_code");
    let rows = sqlx::query_as::<_, User>(&sql).fetch_all(pool).await?;
    Ok(rows)
}

pub async fn find_by_code(pool: &PgPool, user_code: &str) -> Result<Option<User>, AppError> {
    let sql = format!("{SELECT_USER} WHERE user_code = $1");
    let row = sqlx::query_as::<_, User>(&sql)
        .bind(user_code)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Find user by login for authentication. Returns the stored password too.
pub async fn find_by_login(pool: &PgPool, user_login: &str) -> Result<Option<User>, AppError> {
    let sql = format!("{SELECT_USER} WHERE user_login = $1");
    let row = sqlx::query_as::<_, User>(&sql)
        .bind(user_login)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn code_exists(pool: &PgPool, user_code: &str) -> Result<bool, AppError> {
    let exists: bool =
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM idea_users WHERE user_code = $1)")
            .bind(user_code)
            .fetch_one(pool)
            .await?;
    Ok(exists)
}

/// Whether `user_login` is taken by anyone other than `except_code`.
pub async fn login_taken(
    pool: &PgPool,
    user_login: &str,
    except_code: Option<&str>,
) -> Result<bool, AppError> {
    let taken: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM idea_users \
                       WHERE user_login = $1 AND ($2::TEXT IS NULL OR user_code <> $2))",
    )
    .bind(user_login)
    .bind(except_code)
    .fetch_one(pool)
    .await?;
    Ok(taken)
}

pub async fn create(pool: &PgPool, new: &NewUser) -> Result<User, AppError> {
    let user = sqlx::query_as::<_, User>(
        "INSERT INTO idea_users (user_code, user_fname, user_lname, user_login, user_password) \
         VALUES ($1, $2, $3, $4, $5) \
         RETURNING user_code, user_fname, user_lname, user_login, user_password, \
                   user_createdate, user_updatedate",
    )
    .bind(&new.user_code)
    .bind(&new.user_fname)
    .bind(&new.user_lname)
    .bind(&new.user_login)
    .bind(&new.user_password)
    .fetch_one(pool)
    .await?;
    Ok(user)
}

/// Update names and login, and the password when `password` is given.
pub async fn update(
    pool: &PgPool,
    user_code: &str,
    fname: &str,
    lname: &str,
    login: &str,
    password: Option<&str>,
) -> Result<Option<User>, AppError> {
    let user = sqlx::query_as::<_, User>(
        "UPDATE idea_users \
         SET user_fname = $1, user_lname = $2, user_login = $3, \
             user_password = COALESCE($4, user_password), \
             user_updatedate = CURRENT_TIMESTAMP \
         WHERE user_code = $5 \
         RETURNING user_code, user_fname, user_lname, user_login, user_password, \
                   user_createdate, user_updatedate",
    )
    .bind(fname)
    .bind(lname)
    .bind(login)
    .bind(password)
    .bind(user_code)
    .fetch_optional(pool)
    .await?;
    Ok(user)
}

pub async fn delete(pool: &PgPool, user_code: &str) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM idea_users WHERE user_code = $1")
        .bind(user_code)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Next free `USR` code after the highest numeric one in use.
pub async fn next_code(pool: &PgPool) -> Result<String, AppError> {
    let max: i64 = sqlx::query_scalar(
        "SELECT COALESCE(MAX(CAST(substring(user_code FROM 4) AS BIGINT)), 0) \
         FROM idea_users WHERE user_code ~ '^USR[0-9]{1,12}$'",
    )
    .fetch_one(pool)
    .await?;
    Ok(format_user_code(max + 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_zero_padded() {
        assert_eq!(format_user_code(1), "USR0001");
        assert_eq!(format_user_code(12345), "USR12345");
    }
}
