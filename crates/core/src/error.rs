use std::fmt;

/// One non-qualifying classifier in a schema mismatch: which classifier,
/// and a column it required but did not find in the supplied set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaCandidate {
    pub index: usize,
    pub missing: String,
}

#[derive(Debug)]
pub enum FrameError {
    /// Palette construction from a table of the wrong shape.
    InvalidPalette(String),
    /// No classifier's mineral set is satisfied by the supplied columns.
    SchemaMismatch {
        supplied: Vec<String>,
        candidates: Vec<SchemaCandidate>,
    },
    /// A required field is missing from an accumulator, or a must-be-uniform
    /// field holds more than one distinct value.
    ConsistencyViolation {
        field: &'static str,
        /// `None` = field missing; `Some(values)` = conflicting values found.
        conflicting: Option<Vec<String>>,
    },
    /// Translation table has the wrong column arity.
    InvalidTranslation { columns: usize },
    /// Result requested while no accumulator holds data.
    NoActiveAccumulator,
    /// Result requested while more than one accumulator holds data.
    MultipleActiveAccumulators { active: usize },
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPalette(msg) => write!(f, "invalid palette: {msg}"),
            Self::SchemaMismatch { supplied, candidates } => {
                write!(f, "no classifier matches columns [{}]", supplied.join(", "))?;
                for c in candidates {
                    write!(f, "; classifier {} is missing '{}'", c.index, c.missing)?;
                }
                Ok(())
            }
            Self::ConsistencyViolation { field, conflicting } => match conflicting {
                None => write!(f, "required field '{field}' is missing"),
                Some(values) => write!(
                    f,
                    "field '{field}' must be uniform, found [{}]",
                    values.join(", ")
                ),
            },
            Self::InvalidTranslation { columns } => {
                write!(f, "translation table must have 2 columns, got {columns}")
            }
            Self::NoActiveAccumulator => write!(f, "no accumulator holds any data"),
            Self::MultipleActiveAccumulators { active } => {
                write!(f, "{active} accumulators hold data; apply a translation first")
            }
        }
    }
}

impl std::error::Error for FrameError {}
