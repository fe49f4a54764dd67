//! Export filenames and the local file sink.

use super::types::{ExportArtifact, ExportError, ExportKind, Subject};
use crate::util::filename_component;
use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};

/// Builds `<subject>_<form>_<YYYY-MM-DD>.<ext>`.
///
/// # Arguments
/// * `subject` - Whose form this is (only the name is used)
/// * `form_name` - Catalog name of the form
/// * `date` - Export date
/// * `kind` - Decides the extension
pub fn export_filename(
    subject: &Subject,
    form_name: &str,
    date: NaiveDate,
    kind: ExportKind,
) -> String {
    format!(
        "{}_{}_{}.{}",
        filename_component(&subject.name),
        filename_component(form_name),
        date.format("%Y-%m-%d"),
        kind.extension()
    )
}

/// Ensure the export directory exists, creating it if necessary.
///
/// # Returns
/// The canonicalized path to the directory
pub fn ensure_directory_exists(directory: &Path) -> Result<PathBuf, ExportError> {
    if !directory.exists() {
        log::info!("Creating export directory: {}", directory.display());
        fs::create_dir_all(directory)?;
    }

    let canonical = directory
        .canonicalize()
        .unwrap_or_else(|_| directory.to_path_buf());

    Ok(canonical)
}

/// Writes an export payload into `directory` under its suggested filename.
///
/// # Returns
/// Path to the saved file
pub fn save_export(artifact: &ExportArtifact, directory: &Path) -> Result<PathBuf, ExportError> {
    let directory = ensure_directory_exists(directory)?;
    let file_path = directory.join(&artifact.filename);

    log::info!(
        "Saving {} to: {} ({} bytes)",
        artifact.kind.mime_type(),
        file_path.display(),
        artifact.bytes.len()
    );

    fs::write(&file_path, &artifact.bytes)?;

    // Forms carry patient data: user read/write only.
    #[cfg(unix)]
    {
        use std::fs::Permissions;
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&file_path, Permissions::from_mode(0o600))?;
    }

    Ok(file_path)
}

/// Expand tilde (~) in path strings.
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(stripped);
    }
    PathBuf::from(path)
}
