// Password hashing utilities
// bcrypt with a fresh random salt on every call

use bcrypt::{hash, verify, BcryptError, DEFAULT_COST};

/// Hashes a password using bcrypt
///
/// # Arguments
/// * `password` - The plaintext password to hash
///
/// # Returns
/// * `Ok(String)` - The bcrypt hash (salt embedded)
/// * `Err(BcryptError)` - If hashing fails
///
/// # Example
/// ```
/// use devconnect_api::auth::password::hash_password;
///
/// let hash = hash_password("my_password").expect("valid hash");
/// assert_ne!(hash, "my_password");
/// ```
pub fn hash_password(password: &str) -> Result<String, BcryptError> {
    hash(password, DEFAULT_COST)
}

/// Verifies a password against a bcrypt hash
///
/// Comparison timing is whatever the bcrypt primitive guarantees.
///
/// # Example
/// ```
/// use devconnect_api::auth::password::{hash_password, verify_password};
///
/// let hash = hash_password("my_password").unwrap();
/// assert!(verify_password("my_password", &hash).unwrap());
/// ```
pub fn verify_password(password: &str, hash: &str) -> Result<bool, BcryptError> {
    verify(password, hash)
}
