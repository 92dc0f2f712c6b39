//! # Deck Calculations
//!
//! Each calculation follows the pattern:
//!
//! - `*Input` - Input parameters (JSON-serializable)
//! - `*Result` - Calculation results (JSON-serializable)
//! - `calculate(input) -> Result<*Result, CalcError>` - Pure calculation function
//!
//! ## Available Calculations
//!
//! - [`girder_spacing`] - Flange width and girder spacing for a twin road/path deck

pub mod girder_spacing;

use serde::{Deserialize, Serialize};

use crate::errors::CalcResult;

// Re-export commonly used types
pub use girder_spacing::{GirderSpacingInput, GirderSpacingResult, SubStructureInput, SubStructureResult};

/// Enum wrapper for all calculation types.
///
/// This allows storing heterogeneous calculations in a single project
/// while maintaining type safety and clean serialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CalculationItem {
    /// Twin-structure girder spacing
    GirderSpacing(GirderSpacingInput),
}

/// Result of running a [`CalculationItem`], tagged the same way.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CalculationOutput {
    GirderSpacing(GirderSpacingResult),
}

impl CalculationItem {
    /// Get the user-provided label for this calculation
    pub fn label(&self) -> &str {
        match self {
            CalculationItem::GirderSpacing(g) => &g.label,
        }
    }

    /// Get the calculation type as a string
    pub fn calc_type(&self) -> &'static str {
        match self {
            CalculationItem::GirderSpacing(_) => "GirderSpacing",
        }
    }

    /// Run the wrapped calculation
    pub fn run(&self) -> CalcResult<CalculationOutput> {
        match self {
            CalculationItem::GirderSpacing(input) => {
                girder_spacing::calculate(input).map(CalculationOutput::GirderSpacing)
            }
        }
    }
}
