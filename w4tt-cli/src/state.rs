use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

pub fn w4tt_home() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".w4tt"))
}

pub fn ensure_w4tt_home() -> Result<PathBuf> {
    let dir = w4tt_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}
