use crate::globe::{autorotate, drag, land};
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub globe: GlobeSettings,
    #[serde(default)]
    pub data: DataSettings,
    #[serde(default)]
    pub log: LogSettings,
    /// Why the config file was ignored, reported once logging is up
    #[serde(skip)]
    pub load_error: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct GlobeSettings {
    pub sensitivity: f64,        // Pointer pixels per degree of drag rotation
    pub rotate_step: f64,        // Degrees of longitude per frame
    pub tilt: f64,               // Latitude held while auto-rotating
    pub frame_time: f32,         // Seconds per frame
    pub land_file: Option<PathBuf>,  // Local TopoJSON with a "land" object
    pub land_url: Option<String>,
    pub offline: bool,           // Skip the land fetch
}

impl Default for GlobeSettings {
    fn default() -> Self {
        Self {
            sensitivity: drag::DEFAULT_SENSITIVITY,
            rotate_step: autorotate::DEFAULT_STEP,
            tilt: autorotate::DEFAULT_TILT,
            frame_time: 0.016,
            land_file: None,
            land_url: Some(land::DEFAULT_LAND_URL.to_string()),
            offline: false,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DataSettings {
    pub dir: PathBuf,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self { dir: PathBuf::from("data") }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    pub level: String,
    pub file: Option<PathBuf>,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self { level: "warn".to_string(), file: None }
    }
}

impl Settings {
    pub fn load() -> Self {
        let path = Self::config_path();
        if !path.exists() {
            return Self::default();
        }

        match fs::read_to_string(&path) {
            Ok(content) => Self::parse(&content).unwrap_or_else(|e| Self {
                load_error: Some(format!("ignoring malformed {}: {}", path.display(), e)),
                ..Self::default()
            }),
            Err(e) => Self {
                load_error: Some(format!("cannot read {}: {}", path.display(), e)),
                ..Self::default()
            },
        }
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("wildglobe")
            .join("config.toml")
    }

    /// Default log file location for the interactive view
    pub fn log_path(&self) -> PathBuf {
        self.log.file.clone().unwrap_or_else(|| {
            dirs::cache_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join("wildglobe")
                .join("wildglobe.log")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let settings = Settings::parse("").unwrap();
        assert_eq!(settings.globe.sensitivity, 75.0);
        assert_eq!(settings.globe.rotate_step, 0.2);
        assert_eq!(settings.globe.tilt, -15.0);
        assert_eq!(settings.data.dir, PathBuf::from("data"));
        assert_eq!(settings.log.level, "warn");
        assert!(settings.globe.land_url.is_some());
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let settings = Settings::parse(
            r#"
            [globe]
            sensitivity = 20.0
            offline = true

            [data]
            dir = "/srv/species"
            "#,
        )
        .unwrap();
        assert_eq!(settings.globe.sensitivity, 20.0);
        assert!(settings.globe.offline);
        assert_eq!(settings.globe.tilt, -15.0);
        assert_eq!(settings.data.dir, PathBuf::from("/srv/species"));
    }

    #[test]
    fn wrong_types_are_rejected() {
        assert!(Settings::parse("[globe]\nsensitivity = \"fast\"").is_err());
    }

    #[test]
    fn explicit_log_file_wins() {
        let settings = Settings::parse("[log]\nfile = \"/tmp/g.log\"").unwrap();
        assert_eq!(settings.log_path(), PathBuf::from("/tmp/g.log"));
    }
}
