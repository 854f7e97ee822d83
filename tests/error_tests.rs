//! Tests for error kinds, messages and classification

use chrono::NaiveDate;
use rusty_chartbot::error::ChartError;

#[cfg(test)]
mod core_error_tests {
    use super::*;

    // ========== Input errors ==========

    #[test]
    fn test_division_by_zero() {
        let err = ChartError::DivisionByZero {
            date: NaiveDate::from_ymd_opt(2024, 5, 17).unwrap(),
        };

        let msg = err.to_string();
        assert!(msg.contains("Division by zero"));
        assert!(msg.contains("2024-05-17"));
        assert!(err.is_input_error());
    }

    #[test]
    fn test_insufficient_data() {
        let err = ChartError::InsufficientData {
            indicator: "adrp",
            required: 20,
            available: 7,
        };

        let msg = err.to_string();
        assert!(msg.contains("Insufficient data for adrp"));
        assert!(msg.contains("20"));
        assert!(msg.contains("7"));
        assert!(err.is_input_error());
    }

    #[test]
    fn test_empty_window() {
        let err = ChartError::EmptyWindow;
        assert!(err.to_string().contains("Empty window"));
        assert!(err.is_input_error());
    }

    // ========== Collaborator errors ==========

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.json");
        let err: ChartError = io.into();
        assert!(matches!(err, ChartError::IoError(_)));
        assert!(err.to_string().contains("missing.json"));
        assert!(!err.is_input_error());
    }

    #[test]
    fn test_serde_error_conversion() {
        let parse = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: ChartError = parse.into();
        assert!(matches!(err, ChartError::SerdeError(_)));
        assert!(!err.is_input_error());
    }

    #[test]
    fn test_http_and_config_messages() {
        assert_eq!(
            ChartError::Http("FMP returned 429".to_string()).to_string(),
            "HTTP error: FMP returned 429"
        );
        assert_eq!(
            ChartError::ConfigError("FMP_API_KEY is not set".to_string()).to_string(),
            "Configuration error: FMP_API_KEY is not set"
        );
    }
}
