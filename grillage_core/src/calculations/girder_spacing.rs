//! # Girder Spacing Calculation
//!
//! Sets out the girders of a twin-structure bridge deck: a road bridge and a
//! shared-use path bridge built side by side, each carrying a fixed number of
//! girders laid edge to edge with a constant gap between flanges.
//!
//! ## Method
//!
//! 1. Each sub-structure's width is its clear width plus the barrier offset,
//!    measured along the cross-fall: `(clear + offset) / cos(atan(cross_fall))`.
//! 2. The two adjusted widths sum to the total deck width.
//! 3. Each sub-structure reserves one gap per internal bay plus half a gap at
//!    the edge it shares with its twin, so
//!    `flange = (width_mm - (n - 0.5) * gap) / n`.
//! 4. Girder spacing is `flange + gap`.
//!
//! ## Example
//!
//! ```rust
//! use grillage_core::calculations::girder_spacing::{calculate, GirderSpacingInput};
//!
//! let input = GirderSpacingInput::default();
//! let result = calculate(&input).unwrap();
//!
//! println!("Road spacing: {:.1}", result.spacing_road());
//! println!("Path spacing: {:.1}", result.spacing_path());
//! assert!((result.spacing_path().0 - 2208.1873926116814).abs() < 1e-9);
//! ```

use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

use crate::errors::{CalcError, CalcResult};
use crate::units::{Metres, Millimetres};

/// Cross-falls at or beyond this ratio make the slope angle degenerate.
pub const MAX_CROSS_FALL: f64 = 1.0;

/// One of the two bridges making up the deck.
///
/// ## JSON Example
///
/// ```json
/// { "clear_width_m": 4.0, "cross_fall": 0.025, "girder_count": 2 }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SubStructureInput {
    /// Clear carriageway or path width between barriers (m)
    pub clear_width_m: f64,

    /// Cross-fall as rise over run (e.g. 0.025 for 2.5%)
    pub cross_fall: f64,

    /// Number of girders carrying this sub-structure
    pub girder_count: u32,
}

impl SubStructureInput {
    /// Road carriageway defaults: 6 m clear, 3% cross-fall, 3 girders
    pub fn road() -> Self {
        SubStructureInput {
            clear_width_m: 6.0,
            cross_fall: 0.03,
            girder_count: 3,
        }
    }

    /// Shared-use path defaults: 4 m clear, 2.5% cross-fall, 2 girders
    pub fn shared_path() -> Self {
        SubStructureInput {
            clear_width_m: 4.0,
            cross_fall: 0.025,
            girder_count: 2,
        }
    }

    /// Validate this sub-structure. `name` prefixes the field in errors
    /// (e.g. `"road"` gives `road.girder_count`).
    pub fn validate(&self, name: &str) -> CalcResult<()> {
        if !self.clear_width_m.is_finite() || self.clear_width_m <= 0.0 {
            return Err(CalcError::configuration(
                format!("{}.clear_width_m", name),
                self.clear_width_m.to_string(),
                "Clear width must be a positive, finite length",
            ));
        }
        validate_cross_fall(&format!("{}.cross_fall", name), self.cross_fall)?;
        if self.girder_count == 0 {
            return Err(CalcError::configuration(
                format!("{}.girder_count", name),
                "0",
                "Girder count must be at least 1",
            ));
        }
        Ok(())
    }
}

/// A sub-structure as written in an input file: any field may be left out.
#[derive(Deserialize)]
struct PartialSubStructure {
    clear_width_m: Option<f64>,
    cross_fall: Option<f64>,
    girder_count: Option<u32>,
}

impl PartialSubStructure {
    fn or(self, base: SubStructureInput) -> SubStructureInput {
        SubStructureInput {
            clear_width_m: self.clear_width_m.unwrap_or(base.clear_width_m),
            cross_fall: self.cross_fall.unwrap_or(base.cross_fall),
            girder_count: self.girder_count.unwrap_or(base.girder_count),
        }
    }
}

fn road_or_default<'de, D: Deserializer<'de>>(deserializer: D) -> Result<SubStructureInput, D::Error> {
    PartialSubStructure::deserialize(deserializer).map(|p| p.or(SubStructureInput::road()))
}

fn path_or_default<'de, D: Deserializer<'de>>(deserializer: D) -> Result<SubStructureInput, D::Error> {
    PartialSubStructure::deserialize(deserializer).map(|p| p.or(SubStructureInput::shared_path()))
}

/// Input parameters for a twin-structure deck.
///
/// Missing JSON fields fall back to the documented defaults at every level,
/// so `{"girder_gap_mm": 40}` or `{"path": {"girder_count": 3}}` is a
/// complete input.
///
/// ## JSON Example
///
/// ```json
/// {
///   "label": "Option A",
///   "road": { "clear_width_m": 6.0, "cross_fall": 0.03, "girder_count": 3 },
///   "path": { "clear_width_m": 4.0, "cross_fall": 0.025, "girder_count": 2 },
///   "barrier_offset_m": 0.4,
///   "girder_gap_mm": 30.0
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GirderSpacingInput {
    /// User label for this layout (e.g., "Option A")
    pub label: String,

    /// Road bridge
    #[serde(deserialize_with = "road_or_default")]
    pub road: SubStructureInput,

    /// Shared-use path bridge
    #[serde(deserialize_with = "path_or_default")]
    pub path: SubStructureInput,

    /// Barrier face to deck edge, applied to both sub-structures (m)
    pub barrier_offset_m: f64,

    /// Clear gap between adjacent girder flanges (mm)
    pub girder_gap_mm: f64,
}

impl Default for GirderSpacingInput {
    fn default() -> Self {
        GirderSpacingInput {
            label: "Deck".to_string(),
            road: SubStructureInput::road(),
            path: SubStructureInput::shared_path(),
            barrier_offset_m: 0.4,
            girder_gap_mm: 30.0,
        }
    }
}

impl GirderSpacingInput {
    /// Validate every precondition up front.
    pub fn validate(&self) -> CalcResult<()> {
        if !self.barrier_offset_m.is_finite() || self.barrier_offset_m < 0.0 {
            return Err(CalcError::configuration(
                "barrier_offset_m",
                self.barrier_offset_m.to_string(),
                "Barrier offset must be a finite, non-negative length",
            ));
        }
        if !self.girder_gap_mm.is_finite() || self.girder_gap_mm <= 0.0 {
            return Err(CalcError::configuration(
                "girder_gap_mm",
                self.girder_gap_mm.to_string(),
                "Girder gap must be a positive, finite length",
            ));
        }
        self.road.validate("road")?;
        self.path.validate("path")?;
        Ok(())
    }
}

/// Derived layout of one sub-structure.
///
/// ## JSON Example
///
/// ```json
/// {
///   "slope_factor": 1.0003124512,
///   "adjusted_width_m": 4.4013747852,
///   "flange_width_mm": 2178.1873926,
///   "spacing_mm": 2208.1873926
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SubStructureResult {
    /// Secant of the cross-fall angle
    pub slope_factor: f64,

    /// (clear width + barrier offset) measured along the cross-fall (m)
    pub adjusted_width_m: Metres,

    /// Top flange width of each girder (mm)
    pub flange_width_mm: Millimetres,

    /// Centre-to-centre girder spacing (mm)
    pub spacing_mm: Millimetres,
}

/// Results for the whole deck.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GirderSpacingResult {
    /// Road bridge layout
    pub road: SubStructureResult,

    /// Shared-use path bridge layout
    pub path: SubStructureResult,

    /// Sum of both adjusted widths (m). Diagnostic only.
    pub total_deck_width_m: Metres,
}

impl GirderSpacingResult {
    pub fn flange_width_road(&self) -> Millimetres {
        self.road.flange_width_mm
    }

    pub fn flange_width_path(&self) -> Millimetres {
        self.path.flange_width_mm
    }

    pub fn spacing_road(&self) -> Millimetres {
        self.road.spacing_mm
    }

    pub fn spacing_path(&self) -> Millimetres {
        self.path.spacing_mm
    }
}

fn validate_cross_fall(field: &str, cross_fall: f64) -> CalcResult<()> {
    if !cross_fall.is_finite() || !(0.0..MAX_CROSS_FALL).contains(&cross_fall) {
        return Err(CalcError::configuration(
            field,
            cross_fall.to_string(),
            "Cross-fall must be a ratio in [0, 1)",
        ));
    }
    Ok(())
}

/// Slope-correction factor `1 / cos(atan(cross_fall))`.
///
/// Exactly 1.0 on a level deck.
pub fn slope_correction_factor(cross_fall: f64) -> CalcResult<f64> {
    validate_cross_fall("cross_fall", cross_fall)?;
    Ok(1.0 / cross_fall.atan().cos())
}

/// Clear width plus barrier offset, measured along the cross-fall.
pub fn adjusted_width(clear_width: Metres, barrier_offset: Metres, cross_fall: f64) -> CalcResult<Metres> {
    let factor = slope_correction_factor(cross_fall)?;
    Ok((clear_width + barrier_offset) * factor)
}

/// Flange width per girder for a sub-structure of the given adjusted width.
///
/// Half a gap is reserved at the boundary shared with the twin structure.
///
/// # Returns
///
/// * `Ok(Millimetres)` - Flange width, never negative
/// * `Err(CalcError::ConfigurationError)` - Zero girders, a width or gap
///   that overflows, or a width that cannot hold the girders and their gaps
pub fn flange_width(adjusted_width: Metres, girder_count: u32, girder_gap: Millimetres) -> CalcResult<Millimetres> {
    if girder_count == 0 {
        return Err(CalcError::configuration(
            "girder_count",
            "0",
            "Girder count must be at least 1",
        ));
    }
    let n = f64::from(girder_count);
    let width_mm: Millimetres = adjusted_width.into();
    if !width_mm.0.is_finite() {
        return Err(CalcError::configuration(
            "clear_width_m",
            adjusted_width.0.to_string(),
            "Adjusted width is too large to express in millimetres",
        ));
    }
    let flange = (width_mm - girder_gap * (n - 0.5)) / n;
    if !flange.0.is_finite() {
        return Err(CalcError::configuration(
            "girder_gap_mm",
            girder_gap.0.to_string(),
            "Girder gap is too large to lay out",
        ));
    }
    if flange.0 < 0.0 {
        return Err(CalcError::insufficient_width("girder_count", flange.0));
    }
    Ok(flange)
}

/// Lay out one sub-structure. Road and path both go through here.
pub fn layout_sub_structure(
    sub: &SubStructureInput,
    barrier_offset: Metres,
    girder_gap: Millimetres,
) -> CalcResult<SubStructureResult> {
    let slope_factor = slope_correction_factor(sub.cross_fall)?;
    let adjusted_width_m = adjusted_width(Metres(sub.clear_width_m), barrier_offset, sub.cross_fall)?;
    let flange_width_mm = flange_width(adjusted_width_m, sub.girder_count, girder_gap)?;

    Ok(SubStructureResult {
        slope_factor,
        adjusted_width_m,
        flange_width_mm,
        spacing_mm: flange_width_mm + girder_gap,
    })
}

/// Calculate girder spacing for both sub-structures.
///
/// # Arguments
///
/// * `input` - Deck geometry and girder arrangement
///
/// # Returns
///
/// * `Ok(GirderSpacingResult)` - All derived widths and spacings
/// * `Err(CalcError::ConfigurationError)` - If any precondition fails
pub fn calculate(input: &GirderSpacingInput) -> CalcResult<GirderSpacingResult> {
    input.validate()?;

    let barrier_offset = Metres(input.barrier_offset_m);
    let gap = Millimetres(input.girder_gap_mm);

    let road = layout_sub_structure(&input.road, barrier_offset, gap)
        .map_err(|e| prefix_field(e, "road"))?;
    let path = layout_sub_structure(&input.path, barrier_offset, gap)
        .map_err(|e| prefix_field(e, "path"))?;
    let total_deck_width_m = road.adjusted_width_m + path.adjusted_width_m;

    debug!(
        label = %input.label,
        total_deck_width_m = total_deck_width_m.0,
        spacing_road_mm = road.spacing_mm.0,
        spacing_path_mm = path.spacing_mm.0,
        "girder spacing calculated"
    );

    Ok(GirderSpacingResult {
        road,
        path,
        total_deck_width_m,
    })
}

fn prefix_field(error: CalcError, name: &str) -> CalcError {
    match error {
        CalcError::ConfigurationError { field, value, reason } => CalcError::ConfigurationError {
            field: format!("{}.{}", name, field),
            value,
            reason,
        },
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::INSUFFICIENT_WIDTH;

    const TOL: f64 = 1e-9;

    fn assert_config_error(result: CalcResult<GirderSpacingResult>, expected_field: &str) -> String {
        match result {
            Err(CalcError::ConfigurationError { field, reason, .. }) => {
                assert_eq!(field, expected_field);
                reason
            }
            other => panic!("expected ConfigurationError on {}, got {:?}", expected_field, other),
        }
    }

    #[test]
    fn test_default_path_spacing() {
        let result = calculate(&GirderSpacingInput::default()).unwrap();

        // ((4 + 0.4) / cos(atan(0.025)) * 1000 - 1.5 * 30) / 2
        assert!((result.flange_width_path().0 - 2178.1873926116814).abs() < TOL);
        assert!((result.spacing_path().0 - 2208.1873926116814).abs() < TOL);
        assert!((result.path.adjusted_width_m.0 - 4.4013747852233625).abs() < TOL);
    }

    #[test]
    fn test_default_road_spacing() {
        let result = calculate(&GirderSpacingInput::default()).unwrap();

        // ((6 + 0.4) / cos(atan(0.03)) * 1000 - 2.5 * 30) / 3
        assert!((result.flange_width_road().0 - 2109.293117430479).abs() < TOL);
        assert!((result.spacing_road().0 - 2139.293117430479).abs() < TOL);
        assert!((result.total_deck_width_m.0 - 10.8042541375148).abs() < TOL);
    }

    #[test]
    fn test_level_deck_has_unit_slope_factor() {
        assert_eq!(slope_correction_factor(0.0).unwrap(), 1.0);

        let width = adjusted_width(Metres(6.0), Metres(0.4), 0.0).unwrap();
        assert_eq!(width, Metres(6.0) + Metres(0.4));
    }

    #[test]
    fn test_slope_factor_is_secant() {
        let factor = slope_correction_factor(0.03).unwrap();
        assert!((factor - (1.0_f64 + 0.03 * 0.03).sqrt()).abs() < 1e-12);
        assert!(factor > 1.0);
    }

    #[test]
    fn test_more_girders_narrower_flanges() {
        let mut input = GirderSpacingInput::default();
        let mut previous = calculate(&input).unwrap().path;

        for count in 3..=10 {
            input.path.girder_count = count;
            let current = calculate(&input).unwrap().path;
            assert!(current.flange_width_mm < previous.flange_width_mm);
            assert!(current.spacing_mm < previous.spacing_mm);
            previous = current;
        }
    }

    #[test]
    fn test_path_inputs_in_road_slot_match_bitwise() {
        let input = GirderSpacingInput::default();
        let result = calculate(&input).unwrap();

        let swapped = GirderSpacingInput {
            road: input.path,
            path: input.road,
            ..input.clone()
        };
        let swapped_result = calculate(&swapped).unwrap();

        assert_eq!(swapped_result.road.spacing_mm.0.to_bits(), result.path.spacing_mm.0.to_bits());
        assert_eq!(swapped_result.road.flange_width_mm.0.to_bits(), result.path.flange_width_mm.0.to_bits());
        assert_eq!(swapped_result.path, result.road);
    }

    #[test]
    fn test_zero_girders_rejected() {
        let mut input = GirderSpacingInput::default();
        input.path.girder_count = 0;
        assert_config_error(calculate(&input), "path.girder_count");

        assert!(flange_width(Metres(4.4), 0, Millimetres(30.0)).is_err());
    }

    #[test]
    fn test_negative_flange_rejected() {
        let mut input = GirderSpacingInput::default();
        // 200 girders on a 4.4 m path leaves about -7.9 mm of flange each
        input.path.girder_count = 200;
        let reason = assert_config_error(calculate(&input), "path.girder_count");
        assert_eq!(reason, INSUFFICIENT_WIDTH);
    }

    #[test]
    fn test_cross_fall_out_of_range() {
        let mut input = GirderSpacingInput::default();
        input.road.cross_fall = 1.0;
        assert_config_error(calculate(&input), "road.cross_fall");

        input.road.cross_fall = -0.02;
        assert_config_error(calculate(&input), "road.cross_fall");

        input.road.cross_fall = f64::NAN;
        assert_config_error(calculate(&input), "road.cross_fall");
    }

    #[test]
    fn test_invalid_lengths() {
        let mut input = GirderSpacingInput::default();
        input.girder_gap_mm = 0.0;
        assert_config_error(calculate(&input), "girder_gap_mm");

        let mut input = GirderSpacingInput::default();
        input.barrier_offset_m = -0.1;
        assert_config_error(calculate(&input), "barrier_offset_m");

        let mut input = GirderSpacingInput::default();
        input.path.clear_width_m = f64::INFINITY;
        assert_config_error(calculate(&input), "path.clear_width_m");
    }

    #[test]
    fn test_single_girder_uses_half_gap() {
        let flange = flange_width(Metres(2.0), 1, Millimetres(30.0)).unwrap();
        assert!((flange.0 - 1985.0).abs() < TOL);
    }

    #[test]
    fn test_partial_json_takes_defaults() {
        let input: GirderSpacingInput = serde_json::from_str(r#"{"girder_gap_mm": 40.0}"#).unwrap();
        assert_eq!(input.girder_gap_mm, 40.0);
        assert_eq!(input.road, SubStructureInput::road());
        assert_eq!(input.path, SubStructureInput::shared_path());
        assert_eq!(input.barrier_offset_m, 0.4);
    }

    #[test]
    fn test_partial_sub_structure_takes_its_own_defaults() {
        let input: GirderSpacingInput = serde_json::from_str(r#"{"path": {"girder_count": 3}}"#).unwrap();
        assert_eq!(input.path.girder_count, 3);
        assert_eq!(input.path.clear_width_m, 4.0);
        assert_eq!(input.path.cross_fall, 0.025);
        assert_eq!(input.road, SubStructureInput::road());

        let input: GirderSpacingInput = serde_json::from_str(r#"{"road": {"cross_fall": 0.02}}"#).unwrap();
        assert_eq!(input.road.cross_fall, 0.02);
        assert_eq!(input.road.clear_width_m, 6.0);
        assert_eq!(input.road.girder_count, 3);
    }

    #[test]
    fn test_full_input_roundtrips() {
        let mut input = GirderSpacingInput::default();
        input.path.girder_count = 4;
        let json = serde_json::to_string(&input).unwrap();
        let back: GirderSpacingInput = serde_json::from_str(&json).unwrap();
        assert_eq!(back, input);
    }

    #[test]
    fn test_overflowing_width_rejected() {
        let mut input = GirderSpacingInput::default();
        input.path.clear_width_m = 1e306;
        assert_config_error(calculate(&input), "path.clear_width_m");

        let err = flange_width(Metres(1e306), 2, Millimetres(30.0)).unwrap_err();
        assert_eq!(err.error_code(), "CONFIGURATION_ERROR");
    }

    #[test]
    fn test_result_serialization() {
        let result = calculate(&GirderSpacingInput::default()).unwrap();
        let json = serde_json::to_string_pretty(&result).unwrap();
        assert!(json.contains("total_deck_width_m"));
        assert!(json.contains("spacing_mm"));
    }
}
