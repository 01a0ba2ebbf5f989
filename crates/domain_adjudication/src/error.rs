//! Adjudication domain errors

use core_kernel::PortError;
use thiserror::Error;

/// Internal failures the pipeline absorbs into a code-99 response
///
/// Business rejections are not errors; they travel as response codes on the
/// `ClaimResponse`. This type only covers collaborator failures in steps
/// with no fail-closed mapping.
#[derive(Debug, Error)]
pub enum AdjudicationError {
    #[error("{step} lookup failed: {source}")]
    Lookup {
        step: &'static str,
        #[source]
        source: PortError,
    },
}

impl AdjudicationError {
    pub fn lookup(step: &'static str, source: PortError) -> Self {
        AdjudicationError::Lookup { step, source }
    }
}
