//! Library side of the `anthro-curate` binary.

pub mod commands;
pub mod logging;
pub mod types;
