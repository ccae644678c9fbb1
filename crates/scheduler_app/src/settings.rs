use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use scheduler_engine::SchedulerConfig;
use scheduler_logging::sched_info;

/// Flag values that override the config file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub step_delay_ms: Option<u64>,
    pub resume_delay_ms: Option<u64>,
    pub utc_offset_minutes: Option<i32>,
    pub no_delay: bool,
}

/// Reads `path` when given, otherwise starts from defaults, then applies
/// `overrides`.
pub fn load_config(path: Option<&Path>, overrides: &Overrides) -> Result<SchedulerConfig> {
    let mut config = match path {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            let config: SchedulerConfig = ron::from_str(&text)
                .with_context(|| format!("failed to parse config {}", path.display()))?;
            sched_info!("loaded config from {}", path.display());
            config
        }
        None => SchedulerConfig::default(),
    };

    if let Some(ms) = overrides.step_delay_ms {
        config.step_delay_ms = ms;
    }
    if let Some(ms) = overrides.resume_delay_ms {
        config.resume_delay_ms = ms;
    }
    if let Some(minutes) = overrides.utc_offset_minutes {
        config.utc_offset_minutes = minutes;
    }
    if overrides.no_delay {
        config.step_delay_ms = 0;
        config.resume_delay_ms = 0;
    }
    Ok(config)
}
