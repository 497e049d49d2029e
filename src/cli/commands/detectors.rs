//! List detectors command.

use anyhow::Result;
use sigscan_detectors::DetectorRegistry;

pub async fn run() -> Result<()> {
    let registry = DetectorRegistry::new();

    println!("Available Detectors");
    println!("═══════════════════════════════════════════════════════════");
    println!();

    for info in registry.list() {
        println!("  {} ", info.kind);
        println!("  ───────────────────────────────────────────────────────");
        println!("  {}", info.description);
        println!("  Minimum bars: {}", info.min_bars);
        println!();
    }

    println!("Use --strategy <name> to select a detector.");

    Ok(())
}
