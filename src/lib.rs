//! Run R analysis scripts over whitespace-delimited data columns.
//!
//! Text is parsed into positional fields ([`fields`]), a script's entry
//! function is introspected for its parameters ([`introspect`]), bound fields
//! are marshalled into R vectors ([`marshal`]), the function is called in a
//! fresh R session ([`execution`]) and its named results are cleaned up for
//! display ([`normalize`]). [`analysis::AnalysisContainer`] ties these together.

pub mod analysis;
pub mod catalog;
pub mod config;
pub mod error;
pub mod execution;
pub mod fields;
pub mod introspect;
pub mod marshal;
pub mod normalize;
pub mod process;
pub mod state;
pub mod utils;

pub use analysis::{AnalysisContainer, Inputs};
pub use catalog::Catalog;
pub use error::{AnalysisError, AnalysisResult, RuntimeFailure};
pub use execution::{RawResult, Rscript, Runtime};
pub use fields::{FieldTable, Scalar, Series};
pub use normalize::{normalize, ResultTable};
