//! Form template catalog and background image loading.
//!
//! The catalog is an ordered list of `{name, url}` entries taken from the
//! config file; the first entry is the default form. Backgrounds are decoded
//! through a [`BackgroundSource`] so sessions can be driven from memory in
//! tests and from disk in the CLI.

use crate::config::CatalogConfig;
use crate::draw::{Surface, SurfaceError};
use crate::export::file::expand_tilde;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Identity of one form template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormRef {
    pub name: String,
    pub url: String,
}

impl FormRef {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

/// Ordered form templates.
#[derive(Debug, Clone, Default)]
pub struct FormCatalog {
    forms: Vec<FormRef>,
}

impl FormCatalog {
    pub fn new(forms: Vec<FormRef>) -> Self {
        Self { forms }
    }

    pub fn from_config(config: &CatalogConfig) -> Self {
        Self::new(
            config
                .forms
                .iter()
                .map(|entry| FormRef::new(entry.name.clone(), entry.url.clone()))
                .collect(),
        )
    }

    pub fn forms(&self) -> &[FormRef] {
        &self.forms
    }

    pub fn len(&self) -> usize {
        self.forms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forms.is_empty()
    }

    /// The form activated when a session starts.
    pub fn default_form(&self) -> Option<&FormRef> {
        self.forms.first()
    }

    /// Looks a form up by exact name.
    pub fn find(&self, name: &str) -> Option<&FormRef> {
        self.forms.iter().find(|form| form.name == name)
    }
}

/// Errors raised while loading a form background.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("unsupported image location '{0}' (only file paths and file:// URLs are supported)")]
    UnsupportedScheme(String),

    #[error("invalid file URL '{0}'")]
    InvalidUrl(String),

    #[error("form image not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to decode {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("{0}")]
    Surface(#[from] SurfaceError),
}

/// Abstraction over how form backgrounds are fetched and decoded.
pub trait BackgroundSource {
    /// Decodes the form's image at its natural resolution.
    fn load(&self, form: &FormRef) -> Result<Surface, LoadError>;
}

/// Loads backgrounds from the local filesystem.
///
/// Relative URLs resolve against `base_dir`.
#[derive(Debug, Clone)]
pub struct FileBackgroundSource {
    base_dir: PathBuf,
}

impl FileBackgroundSource {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn from_config(config: &CatalogConfig) -> Self {
        Self::new(expand_tilde(&config.directory))
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Resolves a catalog URL to a file on disk.
    pub fn resolve(&self, location: &str) -> Result<PathBuf, LoadError> {
        match url::Url::parse(location) {
            Ok(parsed) if parsed.scheme() == "file" => parsed
                .to_file_path()
                .map_err(|_| LoadError::InvalidUrl(location.to_string())),
            // Single-letter schemes are Windows drive prefixes, not URLs.
            Ok(parsed) if parsed.scheme().len() > 1 => {
                Err(LoadError::UnsupportedScheme(location.to_string()))
            }
            _ => {
                let path = expand_tilde(location);
                if path.is_absolute() {
                    Ok(path)
                } else {
                    Ok(self.base_dir.join(path))
                }
            }
        }
    }
}

impl BackgroundSource for FileBackgroundSource {
    fn load(&self, form: &FormRef) -> Result<Surface, LoadError> {
        let path = self.resolve(&form.url)?;
        if !path.exists() {
            return Err(LoadError::NotFound(path));
        }

        log::debug!("Decoding form '{}' from {}", form.name, path.display());
        let decoded = image::open(&path).map_err(|source| LoadError::Decode {
            path: path.clone(),
            source,
        })?;
        let rgba = decoded.to_rgba8();
        let (width, height) = rgba.dimensions();

        Ok(Surface::from_rgba(width, height, rgba.as_raw())?)
    }
}
