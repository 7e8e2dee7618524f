//! Example demonstrating cooperative cancellation of an active download
//!
//! A slow streaming download is started in one slot, a watch channel renders
//! the aggregate percentage as it moves, and the download is cancelled
//! mid-body. Cancellation is not an error: the slot resolves to `Ok(None)`
//! and the shared progress resets.
//!
//! Run this example with:
//! ```
//! cargo run --example cancel_download
//! ```

use imgfetch::{DownloadConfig, DownloadManager, WatchProgressSink};
use std::sync::Arc;
use tokio::time::{sleep, Duration};

#[tokio::main]
async fn main() -> imgfetch::Result<()> {
    // Add this line to enable tracing logs
    tracing_subscriber::fmt::init();

    println!("🚀 Starting cancellation example");

    // Render aggregate progress off the download task via a watch channel
    let sink = Arc::new(WatchProgressSink::new());
    let mut progress = sink.subscribe();
    tokio::spawn(async move {
        while progress.changed().await.is_ok() {
            println!(
                "   📊 aggregate progress: {:.1}%",
                *progress.borrow_and_update()
            );
        }
    });

    let config = DownloadConfig {
        user_agent: "cancel-download-example/1.0".to_string(),
        ..DownloadConfig::default()
    };
    let manager = Arc::new(DownloadManager::new(config, sink));

    // httpbin drips the body out over five seconds, plenty of time to cancel
    let address = "https://httpbin.org/drip?duration=5&numbytes=20480";
    println!("📥 Slot 0 downloading: {}", address);

    let download_manager = Arc::clone(&manager);
    let download = tokio::spawn(async move { download_manager.start(0, address).await });

    sleep(Duration::from_millis(1500)).await;
    println!("🛑 Cancelling slot 0 mid-stream");
    manager.cancel(0);

    match download.await.unwrap() {
        Ok(Some(body)) => {
            println!(
                "🎉 Download finished before the cancel landed: {} bytes",
                body.len()
            );
        }
        Ok(None) => println!("✅ Download cancelled cleanly, no error raised"),
        Err(error) => println!("❌ Download failed: {}", error),
    }

    let snapshot = manager.aggregator().snapshot();
    println!(
        "📉 Aggregate after cancel: {:.1}% ({} active)",
        snapshot.percent(),
        snapshot.active_count
    );

    let metrics = manager.metrics().snapshot();
    println!("📈 Cancelled downloads recorded: {}", metrics.cancelled);

    println!("✨ Cancellation example completed!");

    Ok(())
}
