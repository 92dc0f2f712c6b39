//! # grillage_core - Bridge Deck Girder Spacing Engine
//!
//! `grillage_core` lays out the girders of a twin-structure bridge deck (a
//! road bridge beside a shared-use path bridge). Given clear widths, barrier
//! offset, cross-falls, girder gap and girder counts it returns the flange
//! width and centre-to-centre spacing of the girders on each structure.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: Pure functions that take input and return results
//! - **JSON-First**: All inputs, results and errors implement Serialize/Deserialize
//! - **Fail Fast**: Inconsistent geometry is a `ConfigurationError`, never a NaN
//!
//! ## Quick Start
//!
//! ```rust
//! use grillage_core::calculations::girder_spacing::{calculate, GirderSpacingInput};
//!
//! let mut input = GirderSpacingInput::default();
//! input.path.girder_count = 3;
//!
//! let result = calculate(&input).unwrap();
//! let json = serde_json::to_string_pretty(&result).unwrap();
//! ```
//!
//! ## Modules
//!
//! - [`calculations`] - Girder spacing calculation and the item wrapper
//! - [`units`] - Metre and millimetre newtypes
//! - [`errors`] - Structured error types
//! - [`project`] - Project container for several deck layouts
//! - [`file_io`] - Project files with atomic saves and locking, input files

pub mod calculations;
pub mod errors;
#[cfg(not(target_arch = "wasm32"))]
pub mod file_io;
pub mod project;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use calculations::{CalculationItem, CalculationOutput, GirderSpacingInput, GirderSpacingResult};
pub use errors::{CalcError, CalcResult};
#[cfg(not(target_arch = "wasm32"))]
pub use file_io::{load_input, load_project, save_project, ProjectLock};
pub use project::Project;
