//! Parameter file storage.

use std::path::Path;

use pluvio_model::Parameters;
use tracing::debug;

use crate::error::IoError;

/// On-disk parameter document format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterFormat {
    /// TOML document (`.toml`).
    Toml,
    /// JSON document (`.json`).
    Json,
}

impl ParameterFormat {
    /// Picks the format from the file extension (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns [`IoError::UnsupportedFormat`] for any other extension.
    pub fn from_path(path: &Path) -> Result<Self, IoError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("toml") => Ok(Self::Toml),
            Some("json") => Ok(Self::Json),
            _ => Err(IoError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }
}

/// Writes `params` to `path` as TOML or JSON according to its extension.
///
/// # Errors
///
/// Returns [`IoError::UnsupportedFormat`] for an unknown extension and
/// [`IoError::File`] if the file cannot be written.
pub fn save_parameters(path: &Path, params: &Parameters) -> Result<(), IoError> {
    let text = match ParameterFormat::from_path(path)? {
        ParameterFormat::Toml => params.to_toml()?,
        ParameterFormat::Json => params.to_json()?,
    };
    std::fs::write(path, text).map_err(|e| IoError::File {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    debug!(path = %path.display(), %params, "parameters saved");
    Ok(())
}

/// Reads parameters from a TOML or JSON file chosen by extension.
///
/// # Errors
///
/// Returns [`IoError::FileNotFound`] for a missing file,
/// [`IoError::UnsupportedFormat`] for an unknown extension, and
/// [`IoError::Model`] for a malformed document or invalid values.
pub fn load_parameters(path: &Path) -> Result<Parameters, IoError> {
    let format = ParameterFormat::from_path(path)?;
    if !path.exists() {
        return Err(IoError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let text = std::fs::read_to_string(path).map_err(|e| IoError::File {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let params = match format {
        ParameterFormat::Toml => Parameters::from_toml(&text)?,
        ParameterFormat::Json => Parameters::from_json(&text)?,
    };
    debug!(path = %path.display(), %params, "parameters loaded");
    Ok(params)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_from_extension() {
        assert_eq!(
            ParameterFormat::from_path(Path::new("fit.toml")).unwrap(),
            ParameterFormat::Toml
        );
        assert_eq!(
            ParameterFormat::from_path(Path::new("/a/b/fit.JSON")).unwrap(),
            ParameterFormat::Json
        );
    }

    #[test]
    fn format_rejects_unknown_extension() {
        for name in ["fit.yaml", "fit", "fit.toml.bak"] {
            assert!(
                matches!(
                    ParameterFormat::from_path(Path::new(name)),
                    Err(IoError::UnsupportedFormat { .. })
                ),
                "{name} should be rejected"
            );
        }
    }

    #[test]
    fn load_missing_file() {
        let err = load_parameters(Path::new("/nonexistent/params.toml")).unwrap_err();
        assert!(matches!(err, IoError::FileNotFound { .. }));
    }
}
