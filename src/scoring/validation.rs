use super::config::PriorityConfig;

/// Validate priority tier thresholds at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_priority(config: &PriorityConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if let Some(high) = config.high {
        if high < 0 {
            errors.push("priority.high: must be non-negative".to_string());
        }
    }

    if let Some(medium) = config.medium {
        if medium < 0 {
            errors.push("priority.medium: must be non-negative".to_string());
        }
    }

    let (high, medium) = (config.high_threshold(), config.medium_threshold());
    if high < medium {
        errors.push(format!(
            "priority: high ({}) must be greater than or equal to medium ({})",
            high, medium
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_config() {
        assert!(validate_priority(&PriorityConfig::default()).is_ok());
    }

    #[test]
    fn test_empty_config() {
        let config = PriorityConfig {
            high: None,
            medium: None,
        };
        assert!(validate_priority(&config).is_ok());
    }

    #[test]
    fn test_negative_threshold() {
        let config = PriorityConfig {
            high: Some(40),
            medium: Some(-1),
        };
        let errors = validate_priority(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("priority.medium"));
    }

    #[test]
    fn test_inverted_thresholds() {
        let config = PriorityConfig {
            high: Some(20),
            medium: None,
        };
        let errors = validate_priority(&config).unwrap_err();
        assert!(errors[0].contains("high (20)"));
        assert!(errors[0].contains("medium (25)"));
    }

    #[test]
    fn test_collects_all_errors() {
        let config = PriorityConfig {
            high: Some(-5),
            medium: Some(10),
        };
        let errors = validate_priority(&config).unwrap_err();
        // negative high, and high below medium
        assert_eq!(errors.len(), 2);
    }
}
