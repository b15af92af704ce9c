//! Input data: the untyped table handed over by the reader and the validated
//! dataset built from it.

pub mod dataset;
pub mod table;

pub use dataset::{DataError, Dataset, CLOSE_COLUMN};
pub use table::RawTable;
