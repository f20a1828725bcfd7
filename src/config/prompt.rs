//! Interactive configuration assembly
//!
//! Flags the user provided are taken as-is; a missing `--url` or `--out`
//! switches the run into interactive mode, where the remaining optional
//! settings are prompted for as well. Prompt answers go through the same
//! validation as flag values.

use crate::config::types::ExportConfig;
use crate::config::validation::validate_root_url;
use crate::{ConfigError, ConfigResult};
use inquire::{Confirm, Text};
use std::path::PathBuf;
use std::time::Duration;

/// Raw values collected from the command line
#[derive(Debug, Clone, Default)]
pub struct CliOptions {
    pub url: Option<String>,
    pub out: Option<PathBuf>,
    pub max_pages: Option<usize>,
    pub delay: Option<f64>,
    pub no_assets: bool,
}

/// Builds the validated export configuration, prompting for gaps
pub fn assemble_config(options: CliOptions) -> ConfigResult<ExportConfig> {
    let interactive = options.url.is_none() || options.out.is_none();

    let url_input = match options.url {
        Some(url) => url,
        None => prompt_url()?,
    };
    let root_url = validate_root_url(&url_input)?;

    let output_dir = match options.out {
        Some(dir) => dir,
        None => prompt_output_dir()?,
    };

    let max_pages = match options.max_pages {
        Some(n) => Some(n),
        None if interactive => parse_optional_usize(&prompt_text(
            "Max pages (empty for no limit):",
        )?),
        None => None,
    };

    let delay_secs = match options.delay {
        Some(d) => d,
        None if interactive => parse_delay(&prompt_text(
            "Polite delay seconds between requests [0]:",
        )?),
        None => 0.0,
    };
    if !delay_secs.is_finite() || delay_secs < 0.0 {
        return Err(ConfigError::Validation(format!(
            "delay must be a non-negative number of seconds, got {}",
            delay_secs
        )));
    }

    let download_assets = if options.no_assets {
        false
    } else if interactive {
        Confirm::new("Download assets (images)?")
            .with_default(true)
            .prompt()
            .map_err(|e| ConfigError::Prompt(e.to_string()))?
    } else {
        true
    };

    Ok(ExportConfig {
        root_url,
        output_dir,
        max_pages,
        delay: Duration::from_secs_f64(delay_secs),
        download_assets,
    })
}

fn prompt_url() -> ConfigResult<String> {
    loop {
        let answer = Text::new("Wiki space URL:")
            .with_help_message("e.g. https://wiki.example.com/spaces/project")
            .prompt()
            .map_err(|e| ConfigError::Prompt(e.to_string()))?;
        if !answer.trim().is_empty() {
            return Ok(answer.trim().to_string());
        }
    }
}

fn prompt_output_dir() -> ConfigResult<PathBuf> {
    let default = std::env::current_dir()
        .map(|d| d.display().to_string())
        .unwrap_or_else(|_| ".".to_string());

    let answer = Text::new("Output directory:")
        .with_default(&default)
        .prompt()
        .map_err(|e| ConfigError::Prompt(e.to_string()))?;

    Ok(PathBuf::from(answer.trim()))
}

fn prompt_text(message: &str) -> ConfigResult<String> {
    Text::new(message)
        .prompt()
        .map_err(|e| ConfigError::Prompt(e.to_string()))
}

/// Parses an optional positive integer; empty or invalid input means None
fn parse_optional_usize(input: &str) -> Option<usize> {
    input.trim().parse().ok()
}

/// Parses a delay in seconds; empty or invalid input means no delay
fn parse_delay(input: &str) -> f64 {
    input.trim().parse().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_optional_usize() {
        assert_eq!(parse_optional_usize("25"), Some(25));
        assert_eq!(parse_optional_usize("  7 "), Some(7));
        assert_eq!(parse_optional_usize(""), None);
        assert_eq!(parse_optional_usize("many"), None);
    }

    #[test]
    fn test_parse_delay() {
        assert_eq!(parse_delay("0.25"), 0.25);
        assert_eq!(parse_delay("2"), 2.0);
        assert_eq!(parse_delay(""), 0.0);
        assert_eq!(parse_delay("soon"), 0.0);
    }

    #[test]
    fn test_flags_only_skip_prompts() {
        let config = assemble_config(CliOptions {
            url: Some("https://site.example/space/".to_string()),
            out: Some(PathBuf::from("/tmp/export")),
            max_pages: Some(10),
            delay: Some(0.5),
            no_assets: true,
        })
        .unwrap();

        assert_eq!(config.root_url.as_str(), "https://site.example/space");
        assert_eq!(config.output_dir, PathBuf::from("/tmp/export"));
        assert_eq!(config.max_pages, Some(10));
        assert_eq!(config.delay, Duration::from_millis(500));
        assert!(!config.download_assets);
    }

    #[test]
    fn test_defaults_with_flags_given() {
        let config = assemble_config(CliOptions {
            url: Some("https://site.example/space".to_string()),
            out: Some(PathBuf::from("/tmp/export")),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(config.max_pages, None);
        assert_eq!(config.delay, Duration::ZERO);
        assert!(config.download_assets);
    }

    #[test]
    fn test_negative_delay_rejected() {
        let result = assemble_config(CliOptions {
            url: Some("https://site.example/space".to_string()),
            out: Some(PathBuf::from("/tmp/export")),
            delay: Some(-1.0),
            ..Default::default()
        });
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_bad_url_flag_rejected() {
        let result = assemble_config(CliOptions {
            url: Some("ftp://site.example/space".to_string()),
            out: Some(PathBuf::from("/tmp/export")),
            ..Default::default()
        });
        assert!(matches!(result, Err(ConfigError::InvalidUrl(_))));
    }
}
