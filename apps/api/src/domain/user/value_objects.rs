use serde::{Deserialize, Serialize};
use std::fmt;

/// Email value object representing a valid email address
///
/// # Invariants
/// - Exactly one '@' with a non-empty local part
/// - Domain has at least one '.' and no empty labels
/// - No whitespace
/// - Stored trimmed and lower-cased, so uniqueness is case-insensitive
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    /// Creates a new Email value object
    ///
    /// # Example
    /// ```
    /// use devconnect_api::domain::user::value_objects::Email;
    ///
    /// let email = Email::new(" Test@Example.com ").expect("valid email");
    /// assert_eq!(email.as_str(), "test@example.com");
    /// ```
    pub fn new(email: impl AsRef<str>) -> Result<Self, String> {
        let email = email.as_ref().trim().to_lowercase();
        if Self::is_valid(&email) {
            Ok(Email(email))
        } else {
            Err(format!("Invalid email: {}", email))
        }
    }

    /// Validates an email string (already trimmed)
    pub fn is_valid(email: &str) -> bool {
        if email.chars().any(char::is_whitespace) {
            return false;
        }

        let Some((local, domain)) = email.split_once('@') else {
            return false;
        };

        !local.is_empty()
            && !domain.contains('@')
            && domain.contains('.')
            && domain.split('.').all(|label| !label.is_empty())
    }

    /// Returns the email as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Gravatar URL for an email: 200px, PG rating, "mystery man" fallback
///
/// # Example
/// ```
/// use devconnect_api::domain::user::value_objects::{gravatar_url, Email};
///
/// let email = Email::new("a@x.com").unwrap();
/// assert!(gravatar_url(&email).starts_with("//www.gravatar.com/avatar/"));
/// ```
pub fn gravatar_url(email: &Email) -> String {
    let digest = md5::compute(email.as_str().as_bytes());
    format!("//www.gravatar.com/avatar/{:x}?s=200&r=pg&d=mm", digest)
}
