//! Execution engine: the runtime seam and the raw results it hands back.

use std::path::Path;

use serde::Serialize;

use crate::error::RuntimeFailure;
use crate::marshal::RVector;

pub mod driver;
pub mod protocol;
pub mod rscript;

pub use rscript::Rscript;

/// One named element of the entry function's result, as R printed it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RawResult {
    pub name: String,
    pub value: String,
}

impl RawResult {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Something that can load a script and call its entry function.
///
/// Every call must see a fresh environment: nothing a script defines at top
/// level may leak into the next invocation.
#[allow(async_fn_in_trait)]
pub trait Runtime {
    async fn invoke(
        &self,
        script: &Path,
        entry: &str,
        args: &[RVector],
    ) -> Result<Vec<RawResult>, RuntimeFailure>;
}
