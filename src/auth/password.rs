use std::{fmt, str::FromStr};

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

/// How new passwords are written to `idea_users.user_password`.
///
/// `Plain` keeps the stored value equal to what the user typed; this is the
/// historical behaviour of the user table and a known security weakness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PasswordScheme {
    #[default]
    Plain,
    Argon2,
}

impl FromStr for PasswordScheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "plain" => Ok(PasswordScheme::Plain),
            "argon2" => Ok(PasswordScheme::Argon2),
            other => Err(format!("unknown password scheme '{other}'")),
        }
    }
}

impl fmt::Display for PasswordScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PasswordScheme::Plain => write!(f, "plain"),
            PasswordScheme::Argon2 => write!(f, "argon2"),
        }
    }
}

pub fn hash_password(password: &str) -> Result<String, String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| e.to_string())?;
    Ok(hash.to_string())
}

/// Produce the value to store for a new or changed password.
pub fn prepare_password(password: &str, scheme: PasswordScheme) -> Result<String, String> {
    if password.trim().is_empty() {
        return Err("Password cannot be empty".to_string());
    }
    match scheme {
        PasswordScheme::Plain => Ok(password.to_string()),
        PasswordScheme::Argon2 => hash_password(password),
    }
}

/// Check a login attempt against the stored value.
///
/// Argon2 PHC strings are verified cryptographically; anything else is
/// compared by direct equality. Empty inputs never match.
pub fn verify_password(password: &str, stored: &str) -> bool {
    if password.is_empty() || stored.is_empty() {
        return false;
    }
    if stored.starts_with("$argon2") {
        return match PasswordHash::new(stored) {
            Ok(parsed) => Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok(),
            Err(e) => {
                log::warn!("Stored password hash could not be parsed: {e}");
                false
            }
        };
    }
    password == stored
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_passwords_compare_directly() {
        let stored = prepare_password("secret1", PasswordScheme::Plain).unwrap();
        assert_eq!(stored, "secret1");
        assert!(verify_password("secret1", &stored));
        assert!(!verify_password("secret2", &stored));
    }

    #[test]
    fn argon2_passwords_verify_by_hash() {
        let stored = prepare_password("secret1", PasswordScheme::Argon2).unwrap();
        assert!(stored.starts_with("$argon2"));
        assert!(verify_password("secret1", &stored));
        assert!(!verify_password("wrong", &stored));
    }

    #[test]
    fn argon2_hashes_are_salted() {
        let first = hash_password("secret1").unwrap();
        let second = hash_password("secret1").unwrap();
        assert_ne!(first, second);
        assert!(verify_password("secret1", &second));
    }

    #[test]
    fn empty_passwords_never_match() {
        assert!(!verify_password("", ""));
        assert!(!verify_password("", "x"));
        assert!(prepare_password("   ", PasswordScheme::Plain).is_err());
    }
}
