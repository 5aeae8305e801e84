mod dataset;
mod error;
mod load;
mod parse;

pub use dataset::{ColorClass, Dataset, Datum};
pub use error::DatasetError;
pub use load::{load_dataset, sample_dataset};
pub use parse::parse_dataset;
