use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use w4tt_core::SchedulerConfig;

use crate::state::ensure_w4tt_home;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub scheduler: SchedulerConfig,
    pub output: OutputSection,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSection {
    /// Pretty-print JSON written to stdout.
    pub pretty: bool,
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_w4tt_home()?.join("config.toml"))
}

pub fn load_config() -> Result<Config> {
    load_config_from(&config_path()?)
}

/// Missing file means defaults.
pub fn load_config_from(p: &Path) -> Result<Config> {
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(p).with_context(|| format!("read {}", p.display()))?;
    parse_config(&s).with_context(|| format!("parse {}", p.display()))
}

pub fn parse_config(s: &str) -> Result<Config> {
    let cfg: Config = toml::from_str(s).context("parse config.toml")?;
    cfg.scheduler
        .validate()
        .context("invalid [scheduler] section")?;
    Ok(cfg)
}

pub fn save_config(cfg: &Config) -> Result<()> {
    let p = config_path()?;
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config(&Config::default())?;
    println!("Wrote {}", p.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_is_all_defaults() {
        assert_eq!(parse_config("").unwrap(), Config::default());
    }

    #[test]
    fn test_partial_sections_keep_remaining_defaults() {
        let cfg = parse_config(
            r#"
            [scheduler]
            timezone = "Europe/Lisbon"
            business_end_hour = 18
            max_tasks_per_day = 3

            [scheduler.bonus]
            urgent = 45

            [output]
            pretty = true
            "#,
        )
        .unwrap();

        assert_eq!(cfg.scheduler.timezone, chrono_tz::Europe::Lisbon);
        assert_eq!(cfg.scheduler.business_start_hour, 9);
        assert_eq!(cfg.scheduler.business_end_hour, 18);
        assert_eq!(cfg.scheduler.max_tasks_per_day, 3);
        assert_eq!(cfg.scheduler.bonus.urgent, 45);
        assert_eq!(cfg.scheduler.bonus.important, 15);
        assert!(cfg.output.pretty);
    }

    #[test]
    fn test_defaults_survive_a_toml_round_trip() {
        let s = toml::to_string_pretty(&Config::default()).unwrap();
        assert!(s.contains("timezone = \"Europe/Madrid\""));
        assert_eq!(parse_config(&s).unwrap(), Config::default());
    }

    #[test]
    fn test_invalid_scheduler_section_is_rejected() {
        let err = parse_config("[scheduler]\nbusiness_start_hour = 17\n").unwrap_err();
        assert!(format!("{err:#}").contains("invalid [scheduler] section"));

        assert!(parse_config("[scheduler]\ntimezone = \"Mars/Olympus\"\n").is_err());
    }

    #[test]
    fn test_missing_file_means_defaults() {
        let p = std::env::temp_dir().join("w4tt-config-does-not-exist.toml");
        assert_eq!(load_config_from(&p).unwrap(), Config::default());
    }
}
