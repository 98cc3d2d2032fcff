use std::fmt;

/// Error produced when a pattern cannot be compiled into a matcher.
#[derive(Debug)]
pub struct FilterError {
    pattern: String,
    source: regex::Error,
}

impl FilterError {
    /// Creates a new [`FilterError`] for the given pattern and source error.
    pub(crate) fn new(pattern: String, source: regex::Error) -> Self {
        Self { pattern, source }
    }

    /// Returns the offending glob pattern as supplied by the user.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }
}

impl fmt::Display for FilterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "failed to compile exclusion pattern '{}': {}",
            self.pattern, self.source
        )
    }
}

impl std::error::Error for FilterError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

#[cfg(test)]
mod tests {
    use super::FilterError;
    use std::error::Error as _;

    #[test]
    fn filter_error_preserves_pattern_and_source() {
        let regex_err = regex::Regex::new("(").unwrap_err();
        let error = FilterError::new("(".into(), regex_err.clone());

        assert_eq!(error.pattern(), "(");
        assert!(error.to_string().contains("failed to compile"));
        assert_eq!(error.source().unwrap().to_string(), regex_err.to_string());
    }
}
