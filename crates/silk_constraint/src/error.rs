//! Constraint parsing and resolution errors.

/// An unsatisfiable or malformed constraint. Fatal; no output is produced.
#[derive(Debug, thiserror::Error)]
pub enum ConstraintError {
    /// A line does not match the constraint grammar.
    #[error("constraint syntax error on line {line}: {text:?}")]
    Syntax {
        /// 1-based line number.
        line: usize,
        /// The offending line text.
        text: String,
    },

    /// A location string names no resource instance on the target part.
    #[error("line {line}: unknown location {location:?} on this part")]
    UnknownLocation {
        /// 1-based line number.
        line: usize,
        /// The offending location text.
        location: String,
    },

    /// A syntactically valid location that does not exist on the target part
    /// (e.g. a pin the package does not bond out).
    #[error("location {location} does not exist on the target part")]
    LocationMissing {
        /// The missing location name.
        location: String,
    },

    /// A constrained name matches no netlist cell or port.
    #[error("constraint names unknown netlist object {name:?}")]
    UnknownName {
        /// The name that did not resolve.
        name: String,
    },

    /// A constrained name matches more than one netlist object
    /// (e.g. a multi-bit port constrained without a bit index).
    #[error("constraint name {name:?} is ambiguous: matches {count} netlist objects")]
    AmbiguousName {
        /// The ambiguous name.
        name: String,
        /// How many objects it matches.
        count: usize,
    },

    /// Two constraints bind the same cell.
    #[error("cell {name:?} is constrained more than once")]
    DuplicateCell {
        /// The doubly-constrained cell.
        name: String,
    },

    /// Two constraints claim the same resource instance.
    #[error("constraints for {first:?} and {second:?} both claim {location}")]
    DoubleClaim {
        /// The first claimant.
        first: String,
        /// The second claimant.
        second: String,
        /// The contested location name.
        location: String,
    },

    /// The named location cannot host the cell's primitive kind.
    #[error("cell {name:?} ({kind}) cannot be placed on {location}")]
    Incompatible {
        /// The constrained cell.
        name: String,
        /// The cell's kind.
        kind: String,
        /// The incompatible location name.
        location: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display() {
        let err = ConstraintError::DoubleClaim {
            first: "a".into(),
            second: "b".into(),
            location: "IOB3".into(),
        };
        assert_eq!(
            format!("{err}"),
            "constraints for \"a\" and \"b\" both claim IOB3"
        );

        let err = ConstraintError::Syntax {
            line: 4,
            text: "what is this".into(),
        };
        assert!(format!("{err}").contains("line 4"));
    }
}
