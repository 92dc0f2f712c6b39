//! Output formatting

use clap::ValueEnum;
use grillage_core::calculations::{GirderSpacingInput, GirderSpacingResult, SubStructureInput, SubStructureResult};
use grillage_core::CalcError;
use serde::Serialize;

/// Output format for results
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Shared-path girder spacing only, in millimetres
    #[default]
    Number,
    /// Full report
    Table,
    /// Pretty JSON
    Json,
}

/// Calculation input and its outcome, as emitted in JSON output.
#[derive(Serialize)]
pub struct Report<'a> {
    pub label: &'a str,
    pub input: &'a GirderSpacingInput,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<&'a GirderSpacingResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'a CalcError>,
}

pub fn render_number(result: &GirderSpacingResult) -> String {
    result.spacing_path().0.to_string()
}

pub fn render_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

pub fn render_table(input: &GirderSpacingInput, result: &GirderSpacingResult) -> String {
    let mut out = String::new();
    out.push_str("═══════════════════════════════════════\n");
    out.push_str(&format!("  GIRDER SPACING: {}\n", input.label));
    out.push_str("═══════════════════════════════════════\n\n");
    out.push_str("Input:\n");
    out.push_str(&format!("  Barrier offset: {:.3} m\n", input.barrier_offset_m));
    out.push_str(&format!("  Girder gap:     {:.1} mm\n\n", input.girder_gap_mm));
    out.push_str(&sub_structure_block("Road", &input.road, &result.road));
    out.push('\n');
    out.push_str(&sub_structure_block("Shared path", &input.path, &result.path));
    out.push('\n');
    out.push_str(&format!("Total deck width: {:.4}\n", result.total_deck_width_m));
    out.push_str("═══════════════════════════════════════\n");
    out
}

fn sub_structure_block(name: &str, input: &SubStructureInput, result: &SubStructureResult) -> String {
    format!(
        "{name}:\n  Clear width:    {:.3} m\n  Cross-fall:     {:.2}%\n  Girders:        {}\n  Slope factor:   {:.6}\n  Adjusted width: {:.4}\n  Flange width:   {:.1}\n  Spacing:        {:.1}\n",
        input.clear_width_m,
        input.cross_fall * 100.0,
        input.girder_count,
        result.slope_factor,
        result.adjusted_width_m,
        result.flange_width_mm,
        result.spacing_mm,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use grillage_core::calculations::girder_spacing::calculate;

    #[test]
    fn test_number_is_path_spacing() {
        let result = calculate(&GirderSpacingInput::default()).unwrap();
        let printed: f64 = render_number(&result).parse().unwrap();
        assert_eq!(printed, result.spacing_path().0);
    }

    #[test]
    fn test_table_lists_both_structures() {
        let input = GirderSpacingInput::default();
        let result = calculate(&input).unwrap();
        let table = render_table(&input, &result);

        assert!(table.contains("Road:"));
        assert!(table.contains("Shared path:"));
        assert!(table.contains("Spacing:        2208.2 mm"));
        assert!(table.contains("Spacing:        2139.3 mm"));
        assert!(table.contains("Total deck width: 10.8043 m"));
    }

    #[test]
    fn test_json_report_skips_missing_error() {
        let input = GirderSpacingInput::default();
        let result = calculate(&input).unwrap();
        let report = Report {
            label: &input.label,
            input: &input,
            result: Some(&result),
            error: None,
        };
        let json = render_json(&report).unwrap();
        assert!(json.contains("\"result\""));
        assert!(!json.contains("\"error\""));
    }
}
