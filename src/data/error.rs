use thiserror::Error;

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("invalid dataset JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("dataset must be a JSON array of records")]
    NotAnArray,

    #[error("record {index} is not a JSON object")]
    NotAnObject { index: usize },

    #[error("record {index} has no `name`")]
    MissingName { index: usize },

    #[error("record {index} has a blank `name`")]
    BlankName { index: usize },

    #[error("record {index} (`{name}`) has no `change`")]
    MissingMagnitude { index: usize, name: String },

    #[error("record {index} (`{name}`) has a non-numeric `change`: {found}")]
    NonNumericMagnitude {
        index: usize,
        name: String,
        found: String,
    },

    #[error("record {index} (`{name}`) has a non-finite `change`")]
    NonFiniteMagnitude { index: usize, name: String },

    #[error("record {index} (`{name}`) has a `change` too large to draw: {change}")]
    MagnitudeOutOfRange {
        index: usize,
        name: String,
        change: f64,
    },
}
