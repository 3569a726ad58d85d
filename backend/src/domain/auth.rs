//! Account primitives: registration input, login credentials, token claims.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port or service.

use std::fmt;

use chrono::{DateTime, Utc};
use email_address::EmailAddress;
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use super::Error;

/// Minimum username length, in characters.
pub const MIN_USERNAME_LEN: usize = 3;
/// Minimum password length, in characters.
pub const MIN_PASSWORD_LEN: usize = 8;
/// Symbols, at least one of which a password must contain.
pub const PASSWORD_SYMBOLS: &str = "!@#$%^&*()_+={[]}:;<>,.?~";

/// Domain error returned when login values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    /// Username was missing or blank once trimmed.
    EmptyUsername,
    /// Password was blank.
    EmptyPassword,
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyUsername => write!(f, "username must not be empty"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for LoginValidationError {}

/// Validated login credentials.
///
/// ## Invariants
/// - `username` is trimmed and non-empty.
/// - `password` is non-empty and kept verbatim.
///
/// # Examples
/// ```
/// use food_places::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" ada ", "Secr3t!pass").expect("valid");
/// assert_eq!(creds.username(), "ada");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    username: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw username/password inputs.
    ///
    /// # Errors
    /// Returns [`LoginValidationError`] when either part is blank.
    pub fn try_from_parts(username: &str, password: &str) -> Result<Self, LoginValidationError> {
        let normalized = username.trim();
        if normalized.is_empty() {
            return Err(LoginValidationError::EmptyUsername);
        }
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }
        Ok(Self {
            username: normalized.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Username used for the account lookup.
    #[must_use]
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Password supplied by the caller.
    #[must_use]
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Explain why `password` is too weak, if it is.
///
/// # Examples
/// ```
/// use food_places::domain::password_weakness;
///
/// assert_eq!(password_weakness("Str0ng!pass"), None);
/// assert!(password_weakness("weakpass").is_some());
/// ```
#[must_use]
pub fn password_weakness(password: &str) -> Option<String> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Some(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters long"
        ));
    }
    if !password.chars().any(char::is_uppercase) {
        return Some("password must contain at least one uppercase letter".to_owned());
    }
    if !password.chars().any(char::is_lowercase) {
        return Some("password must contain at least one lowercase letter".to_owned());
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Some("password must contain at least one number".to_owned());
    }
    if !password.chars().any(|c| PASSWORD_SYMBOLS.contains(c)) {
        return Some(format!(
            "password must contain at least one special character: {PASSWORD_SYMBOLS}"
        ));
    }
    None
}

/// Validated registration request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    username: String,
    password: Zeroizing<String>,
    email: String,
    name: String,
    admin: bool,
}

/// Raw registration fields as received.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegistrationInput<'a> {
    /// Requested username.
    pub username: Option<&'a str>,
    /// Plain-text password.
    pub password: Option<&'a str>,
    /// Contact email.
    pub email: Option<&'a str>,
    /// Display name.
    pub name: Option<&'a str>,
    /// Requested admin rights.
    pub admin: bool,
}

impl Registration {
    /// Validate a registration request.
    ///
    /// # Errors
    /// `missing_field` for absent fields; `invalid_parameter` for a short
    /// username, a malformed email or a weak password.
    pub fn parse(input: RegistrationInput<'_>) -> Result<Self, Error> {
        let username = input
            .username
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or_else(|| Error::missing_field("username"))?;
        let password = input
            .password
            .filter(|value| !value.is_empty())
            .ok_or_else(|| Error::missing_field("password"))?;
        let email = input
            .email
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or_else(|| Error::missing_field("email"))?;
        let name = input
            .name
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or_else(|| Error::missing_field("name"))?;

        if username.chars().count() < MIN_USERNAME_LEN {
            return Err(Error::invalid_parameter(
                "username",
                username,
                format!("username must be at least {MIN_USERNAME_LEN} characters long"),
            ));
        }
        if let Some(reason) = password_weakness(password) {
            return Err(Error::invalid_parameter("password", "<redacted>", reason));
        }
        if !EmailAddress::is_valid(email) {
            return Err(Error::invalid_parameter(
                "email",
                email,
                "email address is not valid",
            ));
        }

        Ok(Self {
            username: username.to_owned(),
            password: Zeroizing::new(password.to_owned()),
            email: email.to_owned(),
            name: name.to_owned(),
            admin: input.admin,
        })
    }

    /// Requested username.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Plain-text password, to be hashed before storage.
    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }

    /// Contact email.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether admin rights were requested.
    #[must_use]
    pub const fn wants_admin(&self) -> bool {
        self.admin
    }
}

/// A stored account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    /// Unique login name.
    pub username: String,
    /// Unique contact email.
    pub email: String,
    /// Display name.
    pub name: String,
    /// PHC-formatted password hash.
    pub password_hash: String,
    /// Admin rights.
    pub is_admin: bool,
    /// Registration time.
    pub created_at: DateTime<Utc>,
}

/// Bearer token claims.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Username of the token holder.
    pub user: String,
    /// Admin rights.
    pub admin: bool,
    /// Expiry as seconds since the Unix epoch.
    pub exp: i64,
}

/// Identity attached to an authenticated request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    /// Username of the caller.
    pub username: String,
    /// Admin rights.
    pub is_admin: bool,
    /// Raw bearer token, retained so logout can revoke it.
    pub token: String,
    /// When the token stops being accepted anyway.
    pub expires_at: DateTime<Utc>,
}

/// A freshly issued token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    /// Encoded bearer token.
    pub token: String,
    /// Account the token belongs to.
    pub username: String,
    /// Contact email.
    pub email: String,
    /// Display name.
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn input<'a>(username: &'a str, password: &'a str, email: &'a str) -> RegistrationInput<'a> {
        RegistrationInput {
            username: Some(username),
            password: Some(password),
            email: Some(email),
            name: Some("Ada Lovelace"),
            admin: false,
        }
    }

    #[rstest]
    #[case("", "pw", LoginValidationError::EmptyUsername)]
    #[case("   ", "pw", LoginValidationError::EmptyUsername)]
    #[case("user", "", LoginValidationError::EmptyPassword)]
    fn invalid_credentials(
        #[case] username: &str,
        #[case] password: &str,
        #[case] expected: LoginValidationError,
    ) {
        let err = LoginCredentials::try_from_parts(username, password)
            .expect_err("invalid inputs must fail");
        assert_eq!(err, expected);
    }

    #[rstest]
    #[case("short1!", "at least 8")]
    #[case("lowercase1!", "uppercase")]
    #[case("UPPERCASE1!", "lowercase")]
    #[case("NoDigits!!", "number")]
    #[case("NoSymbol12", "special character")]
    fn weak_passwords_are_explained(#[case] password: &str, #[case] reason: &str) {
        let message = password_weakness(password).expect("weak password");
        assert!(message.contains(reason), "{message} should mention {reason}");
    }

    #[rstest]
    fn valid_registration_is_accepted() {
        let registration =
            Registration::parse(input("ada", "Analyt1cal!", "ada@example.com")).expect("valid");
        assert_eq!(registration.username(), "ada");
        assert!(!registration.wants_admin());
    }

    #[rstest]
    #[case(input("ad", "Analyt1cal!", "ada@example.com"), "username")]
    #[case(input("ada", "analytical", "ada@example.com"), "password")]
    #[case(input("ada", "Analyt1cal!", "not-an-email"), "email")]
    fn invalid_registrations_name_the_field(#[case] raw: RegistrationInput<'_>, #[case] field: &str) {
        let err = Registration::parse(raw).expect_err("invalid registration");
        assert_eq!(err.detail_code(), Some("invalid_parameter"));
        assert_eq!(err.details().expect("details")["field"], field);
    }

    #[rstest]
    fn missing_fields_are_reported() {
        let raw = RegistrationInput {
            email: None,
            ..input("ada", "Analyt1cal!", "")
        };
        let err = Registration::parse(raw).expect_err("missing email");
        assert_eq!(err.detail_code(), Some("missing_field"));
    }
}
