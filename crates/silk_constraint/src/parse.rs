//! The line-oriented constraint grammar.
//!
//! ```text
//! loc  <name> <location>    locked binding
//! hint <name> <location>    starting position, movable
//! ```
//!
//! `<location>` is `P<n>` for a package pin or `<KIND><index>` for a fabric
//! instance (`LUT2_0`, `LUT4_1`, `DFF3`, `COUNT2`, `INV0`, `IOB7`, `ACMP1`).
//! `#` starts a comment; blank lines are skipped.

use crate::error::ConstraintError;
use silk_device::ResourceKind;

/// A resource location named in a constraint file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    /// A package pin, resolved to the IOB bonded to it.
    Pin(u8),
    /// A fabric instance by kind and per-kind index.
    Instance(ResourceKind, u8),
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Location::Pin(n) => write!(f, "P{n}"),
            Location::Instance(kind, index) => write!(f, "{}{index}", kind.location_prefix()),
        }
    }
}

/// One parsed constraint entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constraint {
    /// The netlist cell or port name being bound.
    pub name: String,
    /// Where it is bound to.
    pub location: Location,
    /// `loc` entries are locked; `hint` entries are movable starting points.
    pub locked: bool,
}

/// Parses a constraint file. Unknown syntax is an error, not a skip.
pub fn parse_constraints(text: &str) -> Result<Vec<Constraint>, ConstraintError> {
    let mut constraints = Vec::new();

    for (i, raw_line) in text.lines().enumerate() {
        let line_no = i + 1;
        let line = match raw_line.find('#') {
            Some(pos) => &raw_line[..pos],
            None => raw_line,
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let mut fields = line.split_whitespace();
        let keyword = fields.next().unwrap_or_default();
        let locked = match keyword {
            "loc" => true,
            "hint" => false,
            _ => {
                return Err(ConstraintError::Syntax {
                    line: line_no,
                    text: raw_line.trim().to_string(),
                })
            }
        };
        let (Some(name), Some(location), None) = (fields.next(), fields.next(), fields.next())
        else {
            return Err(ConstraintError::Syntax {
                line: line_no,
                text: raw_line.trim().to_string(),
            });
        };

        let location = parse_location(location).ok_or_else(|| ConstraintError::UnknownLocation {
            line: line_no,
            location: location.to_string(),
        })?;

        constraints.push(Constraint {
            name: name.to_string(),
            location,
            locked,
        });
    }

    Ok(constraints)
}

fn parse_location(text: &str) -> Option<Location> {
    if let Some(digits) = text.strip_prefix('P') {
        if let Ok(pin) = digits.parse::<u8>() {
            return Some(Location::Pin(pin));
        }
    }
    for kind in ResourceKind::ALL {
        if let Some(digits) = text.strip_prefix(kind.location_prefix()) {
            if let Ok(index) = digits.parse::<u8>() {
                return Some(Location::Instance(kind, index));
            }
        }
    }
    None
}
