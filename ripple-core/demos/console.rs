//! Console demo
//!
//! Renders two components to the console. Each component owns a profile
//! store and reads a shared count signal; an effect per component prints the
//! rendered line whenever something it read changes. A simulated click on the
//! first component swaps its profile, then the count changes.
//!
//! Run with: `cargo run --example console`
//! Set `RUST_LOG=ripple_core=trace` to watch subscriptions and notifications,
//! and `RIPPLE_CONFIG='{"max_notify_depth": 32}'` to override configuration.

use std::rc::Rc;

use ripple_core::{create_effect, create_signal, create_store, ReadSignal, RippleConfig, Store};
use serde::Serialize;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Debug, Clone, Serialize)]
struct Profile {
    id: String,
}

impl Profile {
    fn new(id: &str) -> Self {
        Self { id: id.to_string() }
    }
}

struct Component {
    profiles: Store<&'static str, Profile>,
    render: Rc<dyn Fn() -> String>,
}

impl Component {
    fn new(count: ReadSignal<i32>) -> Self {
        let profiles = create_store([("one", Profile::new("one")), ("two", Profile::new("two"))]);

        let render = {
            let profiles = profiles.clone();
            Rc::new(move || {
                let profile = profiles
                    .with("one", |profile| profile.map(|p| p.id.clone()))
                    .unwrap_or_default();
                format!("The current count is {} and profile {}", count.get(), profile)
            })
        };

        Self { profiles, render }
    }

    fn handle_click(&self) {
        self.profiles.set("one", Profile::new("three"));
    }
}

fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> ripple_core::Result<()> {
    init_logging();

    if let Ok(json) = std::env::var("RIPPLE_CONFIG") {
        RippleConfig::from_json(&json)?.install()?;
    }

    let (count, set_count) = create_signal(3);

    let first = Component::new(count.clone());
    let second = Component::new(count);

    for component in [&first, &second] {
        let render = component.render.clone();
        create_effect(move || println!("{}", render()));
    }

    // User interaction
    first.handle_click();
    set_count.set(5);

    println!(
        "final profiles: {}",
        serde_json::to_string(&first.profiles)?
    );
    Ok(())
}
