/// Hash a password for storage.
pub fn hash_password(password: &str, cost: u32) -> Result<String, bcrypt::BcryptError> {
    bcrypt::hash(password, cost)
}

/// Check `password` against a stored digest - constant-time via bcrypt.
/// A digest that is not valid bcrypt never verifies.
pub fn verify_password(digest: &str, password: &str) -> bool {
    bcrypt::verify(password, digest).unwrap_or(false)
}
