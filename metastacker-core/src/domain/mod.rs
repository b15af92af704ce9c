//! Domain types for the signal batch job.

pub mod row;
pub mod signal;

pub use row::Row;
pub use signal::Signal;
