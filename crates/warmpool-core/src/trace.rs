//! JSON-lines event traces.
//!
//! One event per line, e.g.
//!
//! ```text
//! {"at": "2026-10-17T09:12:00Z", "op": "allocate"}
//! {"at": "2026-10-17T09:12:04Z", "op": "release"}
//! ```
//!
//! Blank lines and lines starting with `#` are skipped.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::clock::ManualClock;
use crate::error::{WarmPoolError, WarmPoolResult};
use crate::history::Op;
use crate::manager::WarmPoolManager;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceEvent {
    pub at: DateTime<Utc>,
    pub op: Op,
}

pub fn parse_trace(input: &str) -> WarmPoolResult<Vec<TraceEvent>> {
    input
        .lines()
        .enumerate()
        .filter(|(_, line)| {
            let line = line.trim();
            !line.is_empty() && !line.starts_with('#')
        })
        .map(|(idx, line)| {
            serde_json::from_str(line).map_err(|e| WarmPoolError::TraceParse {
                line: idx + 1,
                message: e.to_string(),
            })
        })
        .collect()
}

pub fn read_trace(path: &Path) -> WarmPoolResult<Vec<TraceEvent>> {
    let content = std::fs::read_to_string(path).map_err(|source| WarmPoolError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_trace(&content)
}

/// Feed a trace into `manager`, moving `clock` forward to each event.
///
/// The clock never moves backwards, so back-dated events are recorded at
/// their own timestamp against the latest time seen so far.
pub fn replay(events: &[TraceEvent], manager: &mut WarmPoolManager, clock: &ManualClock) {
    for event in events {
        if event.at > manager.now() {
            clock.set(event.at);
        }
        match event.op {
            Op::Allocate => manager.record_allocation(Some(event.at)),
            Op::Release => manager.record_deallocation(Some(event.at)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeDelta, TimeZone};
    use std::sync::Arc;

    #[test]
    fn parse_skips_comments_and_blanks() {
        let input = r#"
# warm pool trace
{"at": "2026-10-17T09:12:00Z", "op": "allocate"}

{"at": "2026-10-17T09:12:04Z", "op": "release"}
"#;
        let events = parse_trace(input).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].op, Op::Allocate);
        assert_eq!(events[1].at, Utc.with_ymd_and_hms(2026, 10, 17, 9, 12, 4).unwrap());
    }

    #[test]
    fn parse_reports_line_number() {
        let input = "{\"at\": \"2026-10-17T09:12:00Z\", \"op\": \"allocate\"}\n{\"op\": \"grow\"}\n";
        let err = parse_trace(input).unwrap_err();
        assert!(matches!(err, WarmPoolError::TraceParse { line: 2, .. }));
    }

    #[test]
    fn replay_advances_clock_monotonically() {
        let t0 = Utc.with_ymd_and_hms(2026, 10, 17, 9, 0, 0).unwrap();
        let clock = ManualClock::new(t0);
        let mut manager = WarmPoolManager::with_clock(0, Arc::new(clock.clone()));

        let events = [
            TraceEvent { at: t0 + TimeDelta::minutes(10), op: Op::Allocate },
            TraceEvent { at: t0 + TimeDelta::minutes(5), op: Op::Allocate },
            TraceEvent { at: t0 + TimeDelta::minutes(20), op: Op::Release },
        ];
        replay(&events, &mut manager, &clock);

        assert_eq!(manager.now(), t0 + TimeDelta::minutes(20));
        assert_eq!(manager.in_use(), 1);
        assert_eq!(manager.history().len(), 3);
    }

    #[test]
    fn read_trace_from_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(
            file.path(),
            "{\"at\": \"2026-10-17T09:00:00Z\", \"op\": \"release\"}\n",
        )
        .unwrap();
        let events = read_trace(file.path()).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].op, Op::Release);
    }
}
