#![forbid(unsafe_code)]
//! qvdraw-core library.
//!
//! Domain values consumed by the graph construction layer: integer quiver
//! matrices, the equivalence capability, seeds, Dynkin-type matrices and the
//! move table.
//!
//! # Conventions
//!
//! - **Errors**: typed `thiserror` enums for parsing and validation, each
//!   mapped to an [`error::ErrorCode`]; `anyhow::Result` for file loading.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

pub mod config;
pub mod dynkin;
pub mod equivalence;
pub mod error;
pub mod matrix;
pub mod moves;
pub mod seed;

pub use equivalence::{ClassIndex, Equivalence};
pub use matrix::IntegerMatrix;
pub use seed::Seed;
