//! The four-kind error taxonomy (spec §7). `SceneEmpty` is deliberately not
//! a variant here — the spec treats an empty scene as legal, so it is only
//! ever logged (`log::info!`), never returned as an `Err`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("invalid render configuration: {0}")]
    InvalidConfiguration(String),

    #[error("no camera set on the path tracer")]
    NoCamera,

    /// Surfaced only as a post-render summary (see `RenderStats`); a single
    /// bad sample never aborts the render, per §4.6/§7 — it is clamped or
    /// discarded inline and counted.
    #[error("{0} numeric hazards were discarded during rendering")]
    NumericHazard(u64),
}
