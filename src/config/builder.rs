//! Default configuration file creation.
//!
//! Uses a small builder that aligns inline comments across all setting
//! lines, so the generated file stays tidy when defaults in constants.rs
//! change length.

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

use crate::constants::*;

/// Create a default config file at the given path.
///
/// Parent directories are created as needed. The generated file carries
/// every setting with its default value plus commented examples for the
/// optional timezone and per-prayer sounds.
pub fn create_default_config(path: &PathBuf) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("Failed to create config directory")?;
    }

    let content = ConfigBuilder::new()
        .add_section("Location")
        .add_setting(
            "latitude",
            &format!("{DEFAULT_LATITUDE}"),
            &format!("Geographic latitude ({MINIMUM_LATITUDE} to {MAXIMUM_LATITUDE})"),
        )
        .add_setting(
            "longitude",
            &format!("{DEFAULT_LONGITUDE}"),
            &format!("Geographic longitude ({MINIMUM_LONGITUDE} to {MAXIMUM_LONGITUDE})"),
        )
        .add_setting(
            "altitude",
            &format!("{DEFAULT_ALTITUDE:.1}"),
            "Altitude above sea level in meters",
        )
        .add_section("Calculation")
        .add_setting(
            "madhab",
            &format!("\"{DEFAULT_MADHAB}\""),
            "Juristic method: \"hanafi\" or \"shafi\"",
        )
        .add_setting(
            "hijri_adjustment",
            &DEFAULT_HIJRI_ADJUSTMENT.to_string(),
            &format!(
                "Hijri date offset in days ({MINIMUM_HIJRI_ADJUSTMENT} to {MAXIMUM_HIJRI_ADJUSTMENT})"
            ),
        )
        .add_commented_setting(
            "timezone",
            "\"Asia/Riyadh\"",
            "IANA zone; defaults to system local time",
        )
        .add_section("Notifications")
        .add_setting(
            "notifications",
            &DEFAULT_NOTIFICATIONS_ENABLED.to_string(),
            "Enable desktop notifications",
        )
        .add_setting(
            "default_sound",
            &format!("\"{DEFAULT_ALERT_SOUND}\""),
            "Freedesktop sound name for prayer alerts",
        )
        .add_table("sounds")
        .add_commented_setting("fajr", "{ enabled = true, sound = \"bell\" }", "Per-prayer override")
        .add_commented_setting("isha", "{ enabled = false }", "Silence one prayer's alert")
        .build();

    fs::write(path, content).context("Failed to write default config file")?;
    Ok(())
}

/// Builder for creating dynamically-aligned configuration files.
///
/// Comment alignment is computed from the widest setting line, so the
/// output stays aligned whatever the default values are.
struct ConfigBuilder {
    entries: Vec<ConfigEntry>,
}

#[derive(Clone)]
enum ConfigEntry {
    /// `#[Title]` comment header.
    Section(String),
    /// Real TOML table header, `[name]`.
    Table(String),
    Setting { line: String, comment: String },
}

impl ConfigBuilder {
    fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    fn add_section(mut self, title: &str) -> Self {
        self.entries.push(ConfigEntry::Section(format!("#[{title}]")));
        self
    }

    fn add_table(mut self, name: &str) -> Self {
        self.entries.push(ConfigEntry::Table(format!("[{name}]")));
        self
    }

    fn add_setting(mut self, key: &str, value: &str, comment: &str) -> Self {
        self.entries.push(ConfigEntry::Setting {
            line: format!("{key} = {value}"),
            comment: format!("# {comment}"),
        });
        self
    }

    /// A setting written commented-out, as documentation of an optional key.
    fn add_commented_setting(mut self, key: &str, value: &str, comment: &str) -> Self {
        self.entries.push(ConfigEntry::Setting {
            line: format!("# {key} = {value}"),
            comment: format!("# {comment}"),
        });
        self
    }

    fn build(self) -> String {
        let max_width = self
            .entries
            .iter()
            .filter_map(|entry| match entry {
                ConfigEntry::Setting { line, .. } => Some(line.len()),
                _ => None,
            })
            .max()
            .unwrap_or(0)
            + 1;

        let mut result = Vec::new();
        let mut first_header = true;

        for entry in self.entries {
            match entry {
                ConfigEntry::Section(header) | ConfigEntry::Table(header) => {
                    if !first_header {
                        result.push(String::new());
                    }
                    result.push(header);
                    first_header = false;
                }
                ConfigEntry::Setting { line, comment } => {
                    let padding = " ".repeat(max_width - line.len());
                    result.push(format!("{line}{padding}{comment}"));
                }
            }
        }

        result.push(String::new());
        result.join("\n")
    }
}
