use crate::settings::Settings;
use std::path::PathBuf;

/// Runtime configuration for the interactive globe
#[derive(Clone, Debug)]
pub struct GlobeConfig {
    pub frame_time: f32,
    pub sensitivity: f64,
    pub rotate_step: f64,
    pub tilt: f64,
    pub data_dir: PathBuf,
    pub land_file: Option<PathBuf>,
    pub land_url: Option<String>,
}

/// Command line values that override the settings file
#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub offline: bool,
    pub frame_time: Option<f32>,
    pub data_dir: Option<PathBuf>,
}

impl GlobeConfig {
    pub fn resolve(settings: &Settings, overrides: Overrides) -> Self {
        let globe = &settings.globe;
        let offline = overrides.offline || globe.offline;
        Self {
            frame_time: overrides.frame_time.unwrap_or(globe.frame_time).clamp(0.005, 1.0),
            sensitivity: globe.sensitivity,
            rotate_step: globe.rotate_step,
            tilt: globe.tilt.clamp(-90.0, 90.0),
            data_dir: overrides.data_dir.unwrap_or_else(|| settings.data.dir.clone()),
            land_file: globe.land_file.clone(),
            land_url: if offline { None } else { globe.land_url.clone() },
        }
    }
}
