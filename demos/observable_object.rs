//! # Example: observable_object
//!
//! An owner object whose fields announce changes through one publisher.
//!
//! Shows how to:
//! - Wire [`Published`] fields to an [`ObservableObjectPublisher`] at construction.
//! - Implement [`ObservableObject`].
//! - Observe a single field through [`Published::publisher`].
//!
//! ## Flow
//! ```text
//! profile.name.set("..") ──► changes.send() ──► "will change" subscribers
//!                       └──► name subject   ──► name subscribers (new value)
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example observable_object
//! ```

use demandflow::{ObservableObject, ObservableObjectPublisher, Published, PublisherExt};

struct Profile {
    changes: ObservableObjectPublisher,
    name: Published<String>,
    age: Published<u32>,
}

impl Profile {
    fn new(name: &str, age: u32) -> Self {
        let changes = ObservableObjectPublisher::new();
        Self {
            name: Published::wired(name.to_string(), &changes),
            age: Published::wired(age, &changes),
            changes,
        }
    }
}

impl ObservableObject for Profile {
    fn object_will_change(&self) -> ObservableObjectPublisher {
        self.changes.clone()
    }
}

fn main() {
    // Nobody listens yet: this notification is not kept.
    let profile = Profile::new("ada", 36);
    profile.object_will_change().send();

    let mut bag = Vec::new();
    profile
        .object_will_change()
        .sink(|_| {}, |()| println!("[profile] will change"))
        .store(&mut bag);
    profile
        .name
        .publisher()
        .sink(|_| {}, |name| println!("[name] {name}"))
        .store(&mut bag);

    profile.name.set("grace".into());
    profile.age.update(|age| age + 1);
    println!("[profile] name={} age={}", profile.name.get(), profile.age.get());

    drop(bag);
    profile.name.set("unobserved".into());
}
