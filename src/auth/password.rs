use crate::error::AppError;

/// Hash a plaintext password with bcrypt at the default cost factor.
///
/// The cost factor makes each verification deliberately slow, which is
/// the point: offline brute force against leaked hashes stays expensive.
pub fn hash_password(plaintext: &str) -> Result<String, AppError> {
    bcrypt::hash(plaintext, bcrypt::DEFAULT_COST)
        .map_err(|e| AppError::InternalError(format!("password hashing failed: {}", e)))
}

/// Check a plaintext password against a stored bcrypt hash.
///
/// Returns false on mismatch and also on an unparseable stored hash, so a
/// corrupt row behaves like a wrong password rather than an error the
/// caller could tell apart.
pub fn verify_password(plaintext: &str, hash: &str) -> bool {
    bcrypt::verify(plaintext, hash).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify_round_trip() {
        let hash = hash_password("correct horse").unwrap();
        assert_ne!(hash, "correct horse");
        assert!(verify_password("correct horse", &hash));
    }

    #[test]
    fn test_wrong_password_rejected() {
        let hash = hash_password("correct horse").unwrap();
        assert!(!verify_password("battery staple", &hash));
    }

    #[test]
    fn test_malformed_hash_rejected_not_panicking() {
        assert!(!verify_password("anything", "not-a-bcrypt-hash"));
        assert!(!verify_password("anything", ""));
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_password("same password").unwrap();
        let b = hash_password("same password").unwrap();
        assert_ne!(a, b);
        assert!(verify_password("same password", &a));
        assert!(verify_password("same password", &b));
    }
}
