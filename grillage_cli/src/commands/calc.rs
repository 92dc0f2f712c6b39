//! Single deck calculation.
//!
//! Inputs are layered: built-in defaults, then `--input` JSON, then flags.

use anyhow::{Context, Result};
use clap::Args;
use grillage_core::calculations::girder_spacing::{calculate, GirderSpacingInput};
use grillage_core::file_io::load_input;
use std::path::PathBuf;
use tracing::{debug, info};

use crate::output::{render_json, render_number, render_table, OutputFormat, Report};

/// Deck geometry overrides shared by `calc` and `add`
#[derive(Args, Debug, Default, Clone)]
pub struct DeckArgs {
    /// Road clear width [m]
    #[arg(long)]
    pub clear_width_road: Option<f64>,

    /// Shared path clear width [m]
    #[arg(long)]
    pub clear_width_path: Option<f64>,

    /// Barrier face to deck edge [m]
    #[arg(long)]
    pub barrier_offset: Option<f64>,

    /// Road cross-fall (ratio, e.g. 0.03)
    #[arg(long)]
    pub cross_fall_road: Option<f64>,

    /// Shared path cross-fall (ratio)
    #[arg(long)]
    pub cross_fall_path: Option<f64>,

    /// Gap between girder flanges [mm]
    #[arg(long)]
    pub girder_gap: Option<f64>,

    /// Number of road girders
    #[arg(long)]
    pub girders_road: Option<u32>,

    /// Number of shared path girders
    #[arg(long)]
    pub girders_path: Option<u32>,
}

impl DeckArgs {
    /// Overwrite the fields given on the command line.
    pub fn apply(&self, input: &mut GirderSpacingInput) {
        if let Some(v) = self.clear_width_road {
            input.road.clear_width_m = v;
        }
        if let Some(v) = self.clear_width_path {
            input.path.clear_width_m = v;
        }
        if let Some(v) = self.barrier_offset {
            input.barrier_offset_m = v;
        }
        if let Some(v) = self.cross_fall_road {
            input.road.cross_fall = v;
        }
        if let Some(v) = self.cross_fall_path {
            input.path.cross_fall = v;
        }
        if let Some(v) = self.girder_gap {
            input.girder_gap_mm = v;
        }
        if let Some(v) = self.girders_road {
            input.road.girder_count = v;
        }
        if let Some(v) = self.girders_path {
            input.path.girder_count = v;
        }
    }

    /// Defaults, then the optional input file, then these overrides.
    pub fn resolve(&self, input_file: Option<&PathBuf>) -> Result<GirderSpacingInput> {
        let mut input = match input_file {
            Some(path) => {
                debug!(path = %path.display(), "loading calculation input");
                load_input(path).with_context(|| format!("cannot load input {}", path.display()))?
            }
            None => GirderSpacingInput::default(),
        };
        self.apply(&mut input);
        Ok(input)
    }
}

/// Calculation arguments
#[derive(Args, Debug)]
pub struct CalcArgs {
    /// JSON input file; absent fields take the defaults
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    #[command(flatten)]
    pub deck: DeckArgs,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Number)]
    pub format: OutputFormat,
}

/// Run the calculation and print the result
pub fn execute(args: CalcArgs) -> Result<()> {
    let input = args.deck.resolve(args.input.as_ref())?;
    info!(label = %input.label, "calculating girder spacing");

    let result = calculate(&input)?;

    match args.format {
        OutputFormat::Number => println!("{}", render_number(&result)),
        OutputFormat::Table => print!("{}", render_table(&input, &result)),
        OutputFormat::Json => {
            let report = Report {
                label: &input.label,
                input: &input,
                result: Some(&result),
                error: None,
            };
            println!("{}", render_json(&report)?);
        }
    }
    Ok(())
}
