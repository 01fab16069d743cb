use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use replies_core::ScrapeSettings;
use scrape_logging::scrape_info;

/// Defaults, overridden field by field by the RON file at `path` if given.
pub fn load_settings(path: Option<&Path>) -> Result<ScrapeSettings> {
    let settings = match path {
        None => ScrapeSettings::default(),
        Some(path) => {
            let content = fs::read_to_string(path)
                .with_context(|| format!("failed to read settings from {path:?}"))?;
            let settings = parse_settings(&content)
                .with_context(|| format!("failed to parse settings in {path:?}"))?;
            scrape_info!("Loaded settings from {:?}", path);
            settings
        }
    };
    settings.validate()?;
    Ok(settings)
}

fn parse_settings(content: &str) -> Result<ScrapeSettings> {
    Ok(ron::from_str(content)?)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use pretty_assertions::assert_eq;
    use replies_core::ScrapeSettings;
    use tempfile::TempDir;

    use super::{load_settings, parse_settings};

    #[test]
    fn partial_file_keeps_other_defaults() {
        let settings = parse_settings("(check_interval_ms: 250, include_date: false)").unwrap();
        assert_eq!(
            settings,
            ScrapeSettings {
                check_interval_ms: 250,
                include_date: false,
                ..ScrapeSettings::default()
            }
        );
    }

    #[test]
    fn missing_path_means_defaults() {
        assert_eq!(load_settings(None).unwrap(), ScrapeSettings::default());
    }

    #[test]
    fn invalid_values_are_rejected() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("settings.ron");
        fs::write(&path, "(scroll_factor: -1.0)").unwrap();
        assert!(load_settings(Some(&path)).is_err());
    }
}
