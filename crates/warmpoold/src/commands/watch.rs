//! `warmpoold watch` — live reconcile loop fed from stdin.
//!
//! Each stdin line is one of `alloc`, `release`, `target`, or `metrics`.
//! Resize decisions are printed as the reconciler makes them.

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;
use tracing::{info, warn};

use warmpool_autoscale::{BoxFuture, Reconciler, ResizeCallback};
use warmpool_core::{SharedWarmPoolManager, WarmPoolConfig, WarmPoolManager};
use warmpool_metrics::{ScopedSnapshot, render_prometheus};

pub async fn run(config: &WarmPoolConfig, initial_in_use: u64, scope: &str) -> anyhow::Result<()> {
    let settings = config.reconcile()?;
    let manager: SharedWarmPoolManager = WarmPoolManager::new(initial_in_use)
        .with_policy(config.policy())
        .into();

    let resize: ResizeCallback = Box::new(|size| -> BoxFuture {
        Box::pin(async move {
            println!("resize warm pool to {size}");
            Ok(())
        })
    });
    let mut reconciler = Reconciler::new(manager.clone(), &settings).with_resize_fn(resize);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let reconcile_task = tokio::spawn(async move {
        reconciler.run(settings.interval, shutdown_rx).await;
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    info!("stdin closed");
                    break;
                };
                handle_line(&manager, line.trim(), scope);
            }
            _ = tokio::signal::ctrl_c() => {
                info!("interrupted");
                break;
            }
        }
    }

    let _ = shutdown_tx.send(true);
    reconcile_task.await?;
    Ok(())
}

fn handle_line(manager: &SharedWarmPoolManager, line: &str, scope: &str) {
    match line {
        "" => {}
        "alloc" | "allocate" => manager.record_allocation(None),
        "release" | "dealloc" => manager.record_deallocation(None),
        "target" => println!("warm target: {}", manager.get_warm_target(None)),
        "metrics" => {
            let snapshot = manager.snapshot();
            print!(
                "{}",
                render_prometheus(&[ScopedSnapshot { scope, snapshot: &snapshot }])
            );
        }
        other => warn!(line = other, "unrecognized command"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lines_drive_the_manager() {
        let manager: SharedWarmPoolManager = WarmPoolManager::new(1).into();
        for line in ["alloc", "allocate", "", "release", "bogus", "dealloc", "dealloc"] {
            handle_line(&manager, line, "test");
        }
        assert_eq!(manager.in_use(), 0);
        assert_eq!(manager.history_len(), 5);
    }
}
