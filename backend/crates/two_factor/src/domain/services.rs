//! Domain Services

use platform::crypto::random_in_range;

use crate::domain::value_objects::VerificationCode;
use crate::error::TwoFactorResult;

/// Smallest issued code
pub const CODE_MIN: u32 = 100_000;
/// Largest issued code
pub const CODE_MAX: u32 = 999_999;

/// Uniformly random six-digit code from the OS RNG
pub fn generate_code() -> TwoFactorResult<VerificationCode> {
    VerificationCode::from_number(random_in_range(CODE_MIN, CODE_MAX))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_code_shape() {
        for _ in 0..1000 {
            let code = generate_code().unwrap();
            assert_eq!(code.as_str().len(), 6);
            assert!(code.as_str().chars().all(|c| c.is_ascii_digit()));

            let n: u32 = code.as_str().parse().unwrap();
            assert!((CODE_MIN..=CODE_MAX).contains(&n));
        }
    }

    #[test]
    fn test_generate_code_varies() {
        let codes: std::collections::HashSet<String> = (0..50)
            .map(|_| generate_code().unwrap().as_str().to_string())
            .collect();
        assert!(codes.len() > 1);
    }
}
