//! Prometheus text exposition format.
//!
//! Renders warm pool snapshots as gauges for scraping by a Prometheus
//! server or compatible agent.

use warmpool_core::PoolSnapshot;

/// A snapshot together with the scope (node or pool name) it belongs to.
#[derive(Debug, Clone, Copy)]
pub struct ScopedSnapshot<'a> {
    pub scope: &'a str,
    pub snapshot: &'a PoolSnapshot,
}

/// Render scoped snapshots into Prometheus text format.
///
/// Every metric is a GAUGE labelled with `scope`; the hourly histogram
/// adds an `hours_ago` label.
pub fn render_prometheus(snapshots: &[ScopedSnapshot<'_>]) -> String {
    let mut out = String::new();

    push_gauge(&mut out, "warmpool_target", "Recommended warm pool size.", snapshots, |s| {
        s.target.to_string()
    });
    push_gauge(&mut out, "warmpool_in_use", "Resources currently in use.", snapshots, |s| {
        s.in_use.to_string()
    });
    push_gauge(
        &mut out,
        "warmpool_history_events",
        "Events retained in the 24h history.",
        snapshots,
        |s| s.history_len.to_string(),
    );
    push_gauge(&mut out, "warmpool_burst", "Net change over the last hour.", snapshots, |s| {
        s.burst.to_string()
    });
    push_gauge(
        &mut out,
        "warmpool_peak_30m",
        "Peak running net change over the last 30 minutes.",
        snapshots,
        |s| s.peak_30m.to_string(),
    );
    push_gauge(
        &mut out,
        "warmpool_net_change_stddev",
        "Rounded sample standard deviation of hourly net change.",
        snapshots,
        |s| s.std_dev.to_string(),
    );
    push_gauge(
        &mut out,
        "warmpool_net_change_average",
        "Rounded mean of hourly net change.",
        snapshots,
        |s| s.average.to_string(),
    );

    out.push_str("# HELP warmpool_net_change Net change per hour, by hours ago.\n");
    out.push_str("# TYPE warmpool_net_change gauge\n");
    for s in snapshots {
        for (hours_ago, net) in s.snapshot.net_change.iter().enumerate() {
            out.push_str(&format!(
                "warmpool_net_change{{scope=\"{}\",hours_ago=\"{}\"}} {}\n",
                escape_label(s.scope),
                hours_ago,
                net
            ));
        }
    }

    out
}

fn push_gauge(
    out: &mut String,
    name: &str,
    help: &str,
    snapshots: &[ScopedSnapshot<'_>],
    value: impl Fn(&PoolSnapshot) -> String,
) {
    out.push_str(&format!("# HELP {name} {help}\n"));
    out.push_str(&format!("# TYPE {name} gauge\n"));
    for s in snapshots {
        out.push_str(&format!(
            "{name}{{scope=\"{}\"}} {}\n",
            escape_label(s.scope),
            value(s.snapshot)
        ));
    }
}

fn escape_label(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn test_snapshot() -> PoolSnapshot {
        let mut net_change = vec![0; 24];
        net_change[0] = 7;
        net_change[3] = -2;
        PoolSnapshot {
            taken_at: Utc.with_ymd_and_hms(2026, 10, 17, 12, 0, 0).unwrap(),
            in_use: 31,
            history_len: 57,
            net_change,
            average: 0,
            std_dev: 2,
            p75: 0,
            burst: 7,
            peak_30m: 9,
            target: 7,
        }
    }

    #[test]
    fn render_empty() {
        let output = render_prometheus(&[]);
        // Should still have type declarations.
        assert!(output.contains("# HELP warmpool_target"));
        assert!(output.contains("# TYPE warmpool_target gauge"));
        assert!(output.contains("# TYPE warmpool_net_change gauge"));
    }

    #[test]
    fn render_single_scope() {
        let snap = test_snapshot();
        let output = render_prometheus(&[ScopedSnapshot { scope: "node-a", snapshot: &snap }]);

        assert!(output.contains("warmpool_target{scope=\"node-a\"} 7"));
        assert!(output.contains("warmpool_in_use{scope=\"node-a\"} 31"));
        assert!(output.contains("warmpool_history_events{scope=\"node-a\"} 57"));
        assert!(output.contains("warmpool_burst{scope=\"node-a\"} 7"));
        assert!(output.contains("warmpool_peak_30m{scope=\"node-a\"} 9"));
        assert!(output.contains("warmpool_net_change_stddev{scope=\"node-a\"} 2"));
        assert!(output.contains("warmpool_net_change{scope=\"node-a\",hours_ago=\"0\"} 7"));
        assert!(output.contains("warmpool_net_change{scope=\"node-a\",hours_ago=\"3\"} -2"));
        assert!(output.contains("warmpool_net_change{scope=\"node-a\",hours_ago=\"23\"} 0"));
    }

    #[test]
    fn render_multiple_scopes() {
        let snap = test_snapshot();
        let output = render_prometheus(&[
            ScopedSnapshot { scope: "node-a", snapshot: &snap },
            ScopedSnapshot { scope: "node-b", snapshot: &snap },
        ]);

        assert!(output.contains("scope=\"node-a\""));
        assert!(output.contains("scope=\"node-b\""));
        assert_eq!(output.matches("warmpool_net_change{").count(), 48);
    }

    #[test]
    fn label_values_are_escaped() {
        let snap = test_snapshot();
        let output = render_prometheus(&[ScopedSnapshot { scope: "a\"b", snapshot: &snap }]);
        assert!(output.contains("warmpool_target{scope=\"a\\\"b\"} 7"));
    }

    #[test]
    fn render_format_is_prometheus_compatible() {
        let snap = test_snapshot();
        let output = render_prometheus(&[ScopedSnapshot { scope: "test", snapshot: &snap }]);

        // Every non-empty, non-comment line should match: metric_name{labels} value
        for line in output.lines() {
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            assert!(
                line.contains('{') && line.contains('}'),
                "line should have labels: {line}"
            );
        }
    }
}
