//! Example demonstrating concurrent slot downloads with shared progress
//!
//! Three download slots fetch images at the same time while a single
//! console progress line tracks the combined percentage across all of them.
//!
//! Run this example with:
//! ```
//! cargo run --example grid_download
//! ```

use imgfetch::{ConsoleProgressSink, DownloadConfig, DownloadManager};
use std::sync::Arc;
use tokio::time::{Duration, Instant};

#[tokio::main]
async fn main() -> imgfetch::Result<()> {
    // Add this line to enable tracing logs
    tracing_subscriber::fmt::init();

    println!("🚀 Starting grid download example");

    let config = DownloadConfig {
        slot_count: 3,
        user_agent: "grid-download-example/1.0".to_string(),
        timeout: Some(Duration::from_secs(60)),
        ..DownloadConfig::default()
    };
    let manager = DownloadManager::new(config, Arc::new(ConsoleProgressSink::new()));

    // Each slot keeps its own source address, like one cell of an image grid
    let addresses = [
        "https://httpbin.org/bytes/102400",
        "https://httpbin.org/bytes/204800",
        "https://httpbin.org/bytes/51200",
    ];
    for (index, address) in addresses.iter().enumerate() {
        manager.slot(index).set_source_link(*address);
    }

    println!("📦 Downloading {} images concurrently", manager.slot_count());

    let start = Instant::now();
    let results = manager.start_all().await;
    let elapsed = start.elapsed();

    // The progress line redraws in place, move past it
    println!();
    println!("🎯 All slots settled in {:.2?}", elapsed);

    println!("\n📊 Results Summary:");
    println!("{}", "─".repeat(60));
    for (index, result) in results.iter().enumerate() {
        match result {
            Ok(Some(body)) => {
                println!("✅ Slot {}: {} bytes", index, body.len());
            }
            Ok(None) => {
                println!("⏭️  Slot {}: skipped (busy or cancelled)", index);
            }
            Err(error) => {
                println!("❌ Slot {}: {} ({})", index, error, error.category());
            }
        }
    }
    println!("{}", "─".repeat(60));

    let metrics = manager.metrics().snapshot();
    println!("📈 Statistics:");
    println!("   • Started: {}", metrics.started);
    println!("   • Completed: {}", metrics.completed);
    println!("   • Failed: {}", metrics.failed);
    println!(
        "   • Bytes fetched: {} ({:.2} KB)",
        metrics.bytes_fetched,
        metrics.bytes_fetched as f64 / 1024.0
    );
    println!("   • Success rate: {:.0}%", metrics.success_rate() * 100.0);

    println!("✨ Grid download example completed!");

    Ok(())
}
