// crates/core/src/plate.rs
//! License plate normalization.
//!
//! Users type plates with separators (`59C-136.47`); the backend wants the
//! bare uppercase form (`59C13647`).

use crate::error::PlateError;

const MIN_LEN: usize = 6;
const MAX_LEN: usize = 10;

/// Strip separators, uppercase and validate a user-supplied plate.
pub fn normalize_plate(raw: &str) -> Result<String, PlateError> {
    let plate: String = raw
        .trim()
        .chars()
        .filter(|c| !matches!(c, '-' | '.' | ' '))
        .map(|c| c.to_ascii_uppercase())
        .collect();

    if plate.is_empty() {
        return Err(PlateError::Empty);
    }

    let well_formed = plate.chars().all(|c| c.is_ascii_alphanumeric())
        && (MIN_LEN..=MAX_LEN).contains(&plate.len())
        && plate.chars().take(2).all(|c| c.is_ascii_digit());

    if !well_formed {
        return Err(PlateError::Invalid(raw.trim().to_string()));
    }

    Ok(plate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_separators_removed() {
        assert_eq!(normalize_plate("59C-136.47").unwrap(), "59C13647");
        assert_eq!(normalize_plate(" 59c1 360 47 ").unwrap(), "59C136047");
        assert_eq!(normalize_plate("30A12345").unwrap(), "30A12345");
    }

    #[test]
    fn test_empty_rejected() {
        assert_eq!(normalize_plate(""), Err(PlateError::Empty));
        assert_eq!(normalize_plate(" - . "), Err(PlateError::Empty));
    }

    #[test]
    fn test_malformed_rejected() {
        assert!(matches!(normalize_plate("C59136047"), Err(PlateError::Invalid(_))));
        assert!(matches!(normalize_plate("59C1"), Err(PlateError::Invalid(_))));
        assert!(matches!(normalize_plate("59C13604712345"), Err(PlateError::Invalid(_))));
        assert!(matches!(normalize_plate("59C_136047"), Err(PlateError::Invalid(_))));
        assert!(matches!(normalize_plate("59Đ136047"), Err(PlateError::Invalid(_))));
    }
}
