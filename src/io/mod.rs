//! Plain-text problem and schedule formats.

mod reader;
mod writer;

pub use reader::{LoadError, read_problem};
pub use writer::{write_problem, write_schedule};
