//! Error types for run-configuration validation and merging.

/// An invalid run-configuration value or netlist configuration attribute.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A netlist attribute carries a value outside its vocabulary.
    #[error("attribute {attr}={value:?} is invalid: must be one of {expected}")]
    InvalidAttribute {
        /// The attribute name.
        attr: String,
        /// The value found.
        value: String,
        /// The accepted vocabulary.
        expected: String,
    },

    /// A run-configuration field is out of range.
    #[error("invalid {field}: {detail}")]
    InvalidValue {
        /// The offending field.
        field: String,
        /// Why it was rejected.
        detail: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display() {
        let err = ConfigError::InvalidAttribute {
            attr: "UNUSED_PULL".into(),
            value: "SIDEWAYS".into(),
            expected: "UP, DOWN, NONE, FLOAT".into(),
        };
        let text = format!("{err}");
        assert!(text.contains("UNUSED_PULL"));
        assert!(text.contains("SIDEWAYS"));

        let err = ConfigError::InvalidValue {
            field: "boot-retry count".into(),
            detail: "must be between 1 and 3".into(),
        };
        assert!(format!("{err}").contains("boot-retry"));
    }
}
