//! # Example: count_and_stop
//!
//! Counts the values of a stream that is cut short by a second publisher.
//!
//! Shows how to:
//! - Chain [`PublisherExt::prefix_until_output`] and [`PublisherExt::count`].
//! - Feed values by hand through [`PassthroughSubject`].
//! - Watch every signal with the `log` operator (run with `RUST_LOG=debug`).
//!
//! ## Flow
//! ```text
//! numbers ──► prefix_until_output(stop) ──► log("prefix") ──► count() ──► sink
//!                       ▲
//! stop.send(()) ────────┘   (main is cancelled, Finished flows down, count is emitted)
//! ```
//!
//! ## Run
//! ```bash
//! RUST_LOG=debug cargo run --example count_and_stop
//! ```

use demandflow::{Completion, Never, PassthroughSubject, PublisherExt, Subject};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let numbers = PassthroughSubject::<u32, Never>::new();
    let stop = PassthroughSubject::<(), Never>::new();

    let _handle = numbers
        .clone()
        .prefix_until_output(stop.clone())
        .log("prefix")
        .count()
        .sink(
            |completion: Completion<Never>| println!("[count] completion={}", completion.as_label()),
            |n| println!("[count] values before stop: {n}"),
        );

    for v in 0..10 {
        numbers.send(v);
    }
    stop.send(());

    // Never observed: the main stream was cancelled by the trigger.
    for v in 10..20 {
        numbers.send(v);
    }
    println!("[main] subscribers left on numbers: {}", numbers.subscriber_count());
}
