//! env_logger setup: a file for the full-screen view, stderr otherwise

use crate::settings::Settings;
use env_logger::{Builder, Env, Target};
use std::fs::{self, OpenOptions};
use std::io;

fn builder(settings: &Settings) -> Builder {
    let env = Env::default().default_filter_or(settings.log.level.as_str());
    let mut builder = Builder::from_env(env);
    builder.format_timestamp_millis();
    builder
}

/// Log to stderr. Used by the print-mode commands.
pub fn init_stderr(settings: &Settings) {
    let _ = builder(settings).target(Target::Stderr).try_init();
}

/// Log to the configured file so records don't tear the alternate screen.
pub fn init_file(settings: &Settings) -> io::Result<()> {
    let path = settings.log_path();
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(&path)?;
    let _ = builder(settings).target(Target::Pipe(Box::new(file))).try_init();
    Ok(())
}
