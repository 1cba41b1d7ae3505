//! Reading the `{tasks, slots}` body from a file or stdin.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use std::path::Path;
use tokio::io::AsyncReadExt;
use w4tt_core::{AssignRequest, parse_timestamp};

pub async fn read_body(source: &Path) -> Result<String> {
    if source == Path::new("-") {
        let mut body = String::new();
        tokio::io::stdin()
            .read_to_string(&mut body)
            .await
            .context("read request from stdin")?;
        return Ok(body);
    }

    tokio::fs::read_to_string(source)
        .await
        .with_context(|| format!("read {}", source.display()))
}

pub async fn load_request(source: &Path) -> Result<AssignRequest> {
    let body = read_body(source).await?;
    let req = AssignRequest::from_json(&body)
        .with_context(|| format!("invalid request body in {}", source.display()))?;
    tracing::debug!(
        source = %source.display(),
        tasks = req.tasks.len(),
        slots = req.slots.len(),
        "loaded request"
    );
    Ok(req)
}

/// `--now` override, or the wall clock.
pub fn resolve_now(raw: Option<&str>) -> Result<DateTime<Utc>> {
    match raw {
        Some(raw) => parse_timestamp(raw, Tz::UTC).with_context(|| format!("parse --now {raw:?}")),
        None => Ok(Utc::now()),
    }
}
