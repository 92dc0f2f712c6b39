//! # Project and Input Files
//!
//! - `deck.gsp` holds a [`Project`] as pretty JSON. It is replaced
//!   atomically: written to `deck.gsp.tmp`, synced, renamed over.
//! - `deck.gsp.lock` sits next to it while someone is editing. The OS lock
//!   on that file is what excludes other editors; the JSON inside only says
//!   who holds it. The file is left behind on release and is harmless once
//!   unlocked.
//! - Standalone calculation inputs are plain [`GirderSpacingInput`] JSON.
//!
//! ## Example
//!
//! ```rust,no_run
//! use grillage_core::calculations::{CalculationItem, GirderSpacingInput};
//! use grillage_core::file_io::{load_project, save_project, ProjectLock};
//! use std::path::Path;
//!
//! let path = Path::new("deck.gsp");
//! let _lock = ProjectLock::acquire(path, "jane")?;
//! let mut project = load_project(path)?;
//! project.add_layout(CalculationItem::GirderSpacing(GirderSpacingInput::default()))?;
//! save_project(&project, path)?;
//! # Ok::<(), grillage_core::errors::CalcError>(())
//! ```

use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use fs2::FileExt;
use semver::Version;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calculations::GirderSpacingInput;
use crate::errors::{CalcError, CalcResult};
use crate::project::{Project, SCHEMA_VERSION};

/// `deck.gsp` + `lock` -> `deck.gsp.lock`
fn sidecar(path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".");
    name.push(suffix);
    PathBuf::from(name)
}

/// Who is editing a project, as recorded in its lock file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LockHolder {
    pub user: String,
    pub pid: u32,
    pub since: DateTime<Utc>,
}

/// Exclusive edit lock on a project; released on drop.
#[derive(Debug)]
pub struct ProjectLock {
    file: File,
    pub holder: LockHolder,
}

impl ProjectLock {
    /// Take the edit lock without waiting.
    ///
    /// The lock file is only rewritten once the OS lock is held, so a
    /// failed attempt leaves the current holder's details intact.
    pub fn acquire(project_path: &Path, user: impl Into<String>) -> CalcResult<Self> {
        let lock_path = sidecar(project_path, "lock");
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(|e| CalcError::file_error("open lock", &lock_path, e))?;

        if FileExt::try_lock_exclusive(&file).is_err() {
            return Err(match read_holder(&mut file) {
                Some(h) => CalcError::file_locked(project_path, format!("{} (pid {})", h.user, h.pid), h.since.to_rfc3339()),
                None => CalcError::file_locked(project_path, "another process", "unknown"),
            });
        }

        let holder = LockHolder {
            user: user.into(),
            pid: std::process::id(),
            since: Utc::now(),
        };
        let json = serde_json::to_vec_pretty(&holder).map_err(CalcError::serialization)?;
        replace_contents(&mut file, &json).map_err(|e| CalcError::file_error("write lock", &lock_path, e))?;

        debug!(path = %project_path.display(), user = %holder.user, "project lock taken");
        Ok(ProjectLock { file, holder })
    }

    /// Report who holds the lock, if anyone, without taking it.
    pub fn holder_of(project_path: &Path) -> Option<LockHolder> {
        let mut file = File::open(sidecar(project_path, "lock")).ok()?;
        if FileExt::try_lock_shared(&file).is_ok() {
            let _ = FileExt::unlock(&file);
            return None;
        }
        read_holder(&mut file)
    }
}

impl Drop for ProjectLock {
    fn drop(&mut self) {
        let _ = self.file.set_len(0);
        let _ = FileExt::unlock(&self.file);
    }
}

fn read_holder(file: &mut File) -> Option<LockHolder> {
    let mut contents = String::new();
    file.seek(SeekFrom::Start(0)).ok()?;
    file.read_to_string(&mut contents).ok()?;
    serde_json::from_str(&contents).ok()
}

fn replace_contents(file: &mut File, bytes: &[u8]) -> io::Result<()> {
    file.set_len(0)?;
    file.seek(SeekFrom::Start(0))?;
    file.write_all(bytes)?;
    file.sync_all()
}

/// Write `project` to `path` so readers see either the old file or the new
/// one, never a partial write.
pub fn save_project(project: &Project, path: &Path) -> CalcResult<()> {
    let json = serde_json::to_vec_pretty(project).map_err(CalcError::serialization)?;
    let tmp_path = sidecar(path, "tmp");

    let written = File::create(&tmp_path).and_then(|mut tmp| {
        tmp.write_all(&json)?;
        tmp.sync_all()
    });
    if let Err(e) = written.and_then(|()| fs::rename(&tmp_path, path)) {
        let _ = fs::remove_file(&tmp_path);
        return Err(CalcError::file_error("save", path, e));
    }

    debug!(path = %path.display(), layouts = project.layouts.len(), "project saved");
    Ok(())
}

/// Read a project and check it was written by a compatible schema.
pub fn load_project(path: &Path) -> CalcResult<Project> {
    let contents = fs::read_to_string(path).map_err(|e| CalcError::file_error("read", path, e))?;
    let project: Project = serde_json::from_str(&contents)
        .map_err(|e| CalcError::serialization(format!("{} is not a deck project: {}", path.display(), e)))?;
    check_schema(&project.meta.version)?;

    debug!(path = %path.display(), layouts = project.layouts.len(), "project loaded");
    Ok(project)
}

/// Read a standalone calculation input. Absent fields take their defaults.
pub fn load_input(path: &Path) -> CalcResult<GirderSpacingInput> {
    let contents = fs::read_to_string(path).map_err(|e| CalcError::file_error("read input", path, e))?;
    serde_json::from_str(&contents)
        .map_err(|e| CalcError::serialization(format!("{} is not a deck input: {}", path.display(), e)))
}

/// Same major; while the schema is 0.x, a newer minor is refused too.
fn check_schema(file_version: &str) -> CalcResult<()> {
    let current = Version::parse(SCHEMA_VERSION).map_err(|e| CalcError::Internal {
        message: format!("SCHEMA_VERSION {}: {}", SCHEMA_VERSION, e),
    })?;
    let compatible = Version::parse(file_version)
        .map(|v| v.major == current.major && !(current.major == 0 && v.minor > current.minor))
        .unwrap_or(false);

    if compatible {
        Ok(())
    } else {
        Err(CalcError::VersionMismatch {
            file_version: file_version.to_string(),
            expected_version: SCHEMA_VERSION.to_string(),
        })
    }
}
