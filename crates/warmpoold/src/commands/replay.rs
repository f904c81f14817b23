//! `warmpoold replay` — replay a recorded trace under a manual clock.

use std::path::Path;
use std::sync::Arc;

use anyhow::bail;
use chrono::{DateTime, Utc};
use warmpool_core::trace::{read_trace, replay};
use warmpool_core::{ManualClock, PoolSnapshot, WarmPoolConfig, WarmPoolManager};
use warmpool_metrics::{ScopedSnapshot, render_prometheus};

pub fn run(
    config: &WarmPoolConfig,
    trace: &Path,
    initial_in_use: u64,
    at: Option<DateTime<Utc>>,
    format: &str,
    scope: &str,
) -> anyhow::Result<()> {
    if !matches!(format, "text" | "json" | "prometheus") {
        bail!("unknown format {format:?}; expected text, json, or prometheus");
    }

    let events = read_trace(trace)?;
    let Some(first) = events.first() else {
        bail!("trace {} contains no events", trace.display());
    };

    let clock = ManualClock::new(first.at);
    let mut manager = WarmPoolManager::with_clock(initial_in_use, Arc::new(clock.clone()))
        .with_policy(config.policy());
    replay(&events, &mut manager, &clock);
    if let Some(at) = at {
        clock.set(at);
    }

    tracing::info!(events = events.len(), "trace replayed");
    let snapshot = manager.snapshot();

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&snapshot)?),
        "prometheus" => print!(
            "{}",
            render_prometheus(&[ScopedSnapshot { scope, snapshot: &snapshot }])
        ),
        _ => print_text(&snapshot),
    }
    Ok(())
}

fn print_text(s: &PoolSnapshot) {
    println!("taken at:    {}", s.taken_at.to_rfc3339());
    println!("in use:      {}", s.in_use);
    println!("history:     {} events", s.history_len);
    println!("average:     {}", s.average);
    println!("std dev:     {}", s.std_dev);
    println!("p75:         {}", s.p75);
    println!("burst (1h):  {}", s.burst);
    println!("peak (30m):  {}", s.peak_30m);
    println!("warm target: {}", s.target);
    println!();
    println!("HOURS AGO  NET");
    for (hours_ago, net) in s.net_change.iter().enumerate() {
        println!("{hours_ago:>9}  {net:>3}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trace_file(contents: &str) -> tempfile::NamedTempFile {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), contents).unwrap();
        file
    }

    #[test]
    fn replays_each_format() {
        let file = trace_file(
            "{\"at\": \"2026-10-17T09:00:00Z\", \"op\": \"allocate\"}\n\
             {\"at\": \"2026-10-17T09:05:00Z\", \"op\": \"release\"}\n",
        );
        let config = WarmPoolConfig::default();
        for format in ["text", "json", "prometheus"] {
            run(&config, file.path(), 2, None, format, "node-a").unwrap();
        }
    }

    #[test]
    fn rejects_unknown_format() {
        let file = trace_file("{\"at\": \"2026-10-17T09:00:00Z\", \"op\": \"allocate\"}\n");
        let err = run(&WarmPoolConfig::default(), file.path(), 0, None, "xml", "a").unwrap_err();
        assert!(err.to_string().contains("unknown format"));
    }

    #[test]
    fn rejects_empty_trace() {
        let file = trace_file("# nothing yet\n");
        let err = run(&WarmPoolConfig::default(), file.path(), 0, None, "text", "a").unwrap_err();
        assert!(err.to_string().contains("no events"));
    }
}
