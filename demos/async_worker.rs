//! # Example: async_worker
//!
//! Bridges a synchronous publisher into async code.
//!
//! Shows how to:
//! - Implement [`Receive`] and run it with [`PublisherExt::spawn_worker_with`].
//! - Bound the in-flight window with [`Config::worker_capacity`].
//! - Consume a publisher as a `Stream` with [`PublisherExt::values`].
//!
//! ## Flow
//! ```text
//! Sequence ──► WorkerGate ──[queue: 8]──► worker task ──► Slow::receive().await
//!                  ▲                           │
//!                  └──── request(1) per item ◄─┘
//! ```
//!
//! ## Run
//! ```bash
//! RUST_LOG=info cargo run --example async_worker
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use demandflow::{Completion, Config, Never, PublisherExt, Receive, Sequence};
use futures::StreamExt;
use tracing::info;
use tracing_subscriber::EnvFilter;

struct Slow {
    total: AtomicU64,
}

#[async_trait]
impl Receive<u64, Never> for Slow {
    async fn receive(&self, value: u64) {
        tokio::time::sleep(Duration::from_millis(2)).await;
        self.total.fetch_add(value, Ordering::Relaxed);
    }

    async fn receive_completion(&self, completion: Completion<Never>) {
        info!(completion = completion.as_label(), "worker finished");
    }

    fn name(&self) -> &'static str {
        "slow"
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = Config {
        worker_capacity: 8,
        ..Config::default()
    };
    let slow = Arc::new(Slow {
        total: AtomicU64::new(0),
    });
    let handle = Sequence::new(1..=100u64).spawn_worker_with(Arc::clone(&slow), &config);
    handle.join().await;
    println!("[worker] sum = {}", slow.total.load(Ordering::Relaxed));

    let squares: Vec<u64> = Sequence::new(1..=5u64)
        .map(|v| v * v)
        .values()
        .filter_map(|item| async move { item.ok() })
        .collect()
        .await;
    println!("[values] squares = {squares:?}");
}
