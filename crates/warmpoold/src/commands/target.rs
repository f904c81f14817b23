//! `warmpoold target` — evaluate an explicit histogram.

use warmpool_core::{WarmPoolConfig, WarmPoolManager};

pub fn run(config: &WarmPoolConfig, net: &[i64]) -> anyhow::Result<()> {
    let mut manager = WarmPoolManager::new(0).with_policy(config.policy());
    let decision = manager.evaluate(Some(net));

    println!("target:  {}", decision.target);
    println!("std_dev: {}", decision.std_dev);
    println!("average: {}", decision.average);
    println!("p75:     {}", decision.p75);
    println!("burst:   {}", decision.burst);
    Ok(())
}
