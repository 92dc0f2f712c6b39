//! # Deck Projects
//!
//! A project is the set of deck layouts being compared on one job, e.g. a
//! three-girder and a four-girder road bridge beside the same path. Layouts
//! keep the order they were added in and are addressed by their label,
//! which must be unique within the project.
//!
//! ```text
//! Project
//! ├── meta: ProjectMetadata (schema version, engineer, job, client, timestamps)
//! └── layouts: [Layout { id, item }, ...]
//! ```
//!
//! ## Example
//!
//! ```rust
//! use grillage_core::calculations::{CalculationItem, GirderSpacingInput};
//! use grillage_core::project::Project;
//!
//! let mut project = Project::new("Jane Engineer", "26-042", "Shire Council");
//! project.add_layout(CalculationItem::GirderSpacing(GirderSpacingInput::default())).unwrap();
//!
//! for outcome in project.run_all() {
//!     println!("{}: {}", outcome.layout.item.label(), outcome.result.is_ok());
//! }
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calculations::{CalculationItem, CalculationOutput};
use crate::errors::{CalcError, CalcResult};

/// Schema version written into every project file
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Job-level container of deck layouts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub meta: ProjectMetadata,

    /// Layouts in the order they were added
    #[serde(default)]
    pub layouts: Vec<Layout>,
}

/// Who the project is for and when it last changed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectMetadata {
    /// Schema version, checked on load
    pub version: String,
    pub engineer: String,
    pub job_id: String,
    pub client: String,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

/// One stored deck option.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    /// Stable id, kept when the project is reordered or relabelled
    pub id: Uuid,
    pub item: CalculationItem,
}

/// A layout together with the result of calculating it.
#[derive(Debug)]
pub struct LayoutOutcome<'a> {
    pub layout: &'a Layout,
    pub result: CalcResult<CalculationOutput>,
}

impl Project {
    pub fn new(engineer: impl Into<String>, job_id: impl Into<String>, client: impl Into<String>) -> Self {
        let now = Utc::now();
        Project {
            meta: ProjectMetadata {
                version: SCHEMA_VERSION.to_string(),
                engineer: engineer.into(),
                job_id: job_id.into(),
                client: client.into(),
                created: now,
                modified: now,
            },
            layouts: Vec::new(),
        }
    }

    /// Append a layout and return its id.
    ///
    /// Labels are how the CLI and reports refer to layouts, so a second
    /// layout with an existing label is a `ConfigurationError`.
    pub fn add_layout(&mut self, item: CalculationItem) -> CalcResult<Uuid> {
        if self.layout(item.label()).is_some() {
            return Err(CalcError::configuration(
                "label",
                item.label(),
                "A layout with this label already exists in the project",
            ));
        }
        let id = Uuid::new_v4();
        self.layouts.push(Layout { id, item });
        self.meta.modified = Utc::now();
        Ok(id)
    }

    /// Find a layout by label.
    pub fn layout(&self, label: &str) -> Option<&Layout> {
        self.layouts.iter().find(|l| l.item.label() == label)
    }

    /// Calculate every layout, in file order. One failing layout does not
    /// stop the others.
    pub fn run_all(&self) -> Vec<LayoutOutcome<'_>> {
        self.layouts
            .iter()
            .map(|layout| LayoutOutcome {
                layout,
                result: layout.item.run(),
            })
            .collect()
    }

    /// Calculate only the layout with this label.
    pub fn run_one(&self, label: &str) -> CalcResult<LayoutOutcome<'_>> {
        let layout = self.layout(label).ok_or_else(|| CalcError::layout_not_found(label))?;
        Ok(LayoutOutcome {
            layout,
            result: layout.item.run(),
        })
    }
}
