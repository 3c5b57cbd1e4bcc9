/// Compares a candidate password against the stored one.
///
/// Stored passwords are plaintext. This is the only place the comparison happens, so a
/// salted digest scheme only has to change this function.
pub fn verify_password(candidate: &str, stored: &str) -> bool {
    candidate == stored
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_verification() {
        assert!(verify_password("Abcdef1!", "Abcdef1!"));
        assert!(!verify_password("abcdef1!", "Abcdef1!"));
        assert!(!verify_password("Abcdef1! ", "Abcdef1!"));
        assert!(!verify_password("", "Abcdef1!"));
    }
}
