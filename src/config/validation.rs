use crate::config::types::ExportConfig;
use crate::url::canonicalize_url;
use crate::ConfigError;
use std::fs;
use std::path::Path;
use url::Url;

/// Validates the entire configuration
///
/// Called once before crawling; any error here aborts the run with a
/// non-zero exit, per the error taxonomy.
pub fn validate(config: &ExportConfig) -> Result<(), ConfigError> {
    validate_root_url(config.root_url.as_str())?;
    validate_output_dir(&config.output_dir)?;
    Ok(())
}

/// Parses and canonicalizes the root URL, rejecting non-HTTP(S) schemes
pub fn validate_root_url(url_str: &str) -> Result<Url, ConfigError> {
    canonicalize_url(url_str).map_err(|e| ConfigError::InvalidUrl(e.to_string()))
}

/// Ensures the output directory exists and is writable
///
/// The directory is created if missing; writability is probed with a
/// throwaway file so unwritable targets fail before any crawling.
pub fn validate_output_dir(path: &Path) -> Result<(), ConfigError> {
    fs::create_dir_all(path).map_err(|e| {
        ConfigError::OutputDir(format!("Cannot create {}: {}", path.display(), e))
    })?;

    let probe = path.join(".wikiscribe-write-probe");
    fs::write(&probe, b"")
        .map_err(|e| ConfigError::OutputDir(format!("Cannot write to {}: {}", path.display(), e)))?;
    let _ = fs::remove_file(&probe);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_root_url_canonicalized() {
        let url = validate_root_url("https://Site.Example/space/").unwrap();
        assert_eq!(url.as_str(), "https://site.example/space");
    }

    #[test]
    fn test_invalid_scheme_rejected() {
        assert!(validate_root_url("ftp://site.example/space").is_err());
    }

    #[test]
    fn test_malformed_url_rejected() {
        assert!(validate_root_url("not a url").is_err());
    }

    #[test]
    fn test_output_dir_created() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a/b");
        validate_output_dir(&nested).unwrap();
        assert!(nested.is_dir());
    }

    #[test]
    fn test_probe_file_removed() {
        let dir = tempfile::tempdir().unwrap();
        validate_output_dir(dir.path()).unwrap();
        assert!(!dir.path().join(".wikiscribe-write-probe").exists());
    }

    #[test]
    fn test_output_path_occupied_by_file_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("occupied");
        fs::write(&target, b"not a directory").unwrap();

        assert!(validate_output_dir(&target).is_err());
    }
}
