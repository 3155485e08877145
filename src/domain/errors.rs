use super::models::RowId;

#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    RowNotFound(RowId),
    InvalidAmount(String),
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DomainError::RowNotFound(id) => {
                write!(f, "Row {} does not exist", id)
            }
            DomainError::InvalidAmount(text) => {
                write!(f, "Invalid amount: {}", text)
            }
        }
    }
}

impl std::error::Error for DomainError {}

pub type DomainResult<T> = Result<T, DomainError>;

/// Parses a bill amount typed or pasted by the user.
///
/// Dots, commas, spaces and underscores are treated as digit grouping
/// (`1.000.000` and `1,000,000` both read as one million). Anything else
/// that is not a digit, including a leading minus sign, is rejected.
pub fn parse_amount(text: &str) -> DomainResult<f64> {
    let trimmed = text.trim();
    let digits: String = trimmed
        .chars()
        .filter(|c| !matches!(c, '.' | ',' | ' ' | '_'))
        .collect();

    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(DomainError::InvalidAmount(trimmed.to_string()));
    }

    digits
        .parse::<f64>()
        .map_err(|_| DomainError::InvalidAmount(trimmed.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_digits() {
        assert_eq!(parse_amount("1500000"), Ok(1_500_000.0));
        assert_eq!(parse_amount("  42 "), Ok(42.0));
    }

    #[test]
    fn test_parse_grouped_digits() {
        assert_eq!(parse_amount("1.000.000"), Ok(1_000_000.0));
        assert_eq!(parse_amount("2,500"), Ok(2_500.0));
        assert_eq!(parse_amount("3 000"), Ok(3_000.0));
    }

    #[test]
    fn test_parse_rejects_negative_and_text() {
        assert!(matches!(parse_amount("-5"), Err(DomainError::InvalidAmount(_))));
        assert!(matches!(parse_amount("abc"), Err(DomainError::InvalidAmount(_))));
        assert!(matches!(parse_amount(""), Err(DomainError::InvalidAmount(_))));
    }

    #[test]
    fn test_error_display() {
        assert_eq!(DomainError::RowNotFound(7).to_string(), "Row 7 does not exist");
        assert_eq!(
            DomainError::InvalidAmount("x".to_string()).to_string(),
            "Invalid amount: x"
        );
    }
}
