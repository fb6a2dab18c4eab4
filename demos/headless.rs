//! Headless session demo: builds a small tree against the null boundary,
//! forwards some input and lets the frame loop run for a moment.
//!
//! Run with `RUST_LOG=debug` to watch the wire traffic decisions.

use std::time::Duration;

use trellis_bridge::boundary::NullBoundary;
use trellis_bridge::events::{Modifiers, RawPointerEvent};
use trellis_bridge::node::PropValue;
use trellis_bridge::style::Rule;
use trellis_bridge::{BridgeConfig, BridgeSession};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let session = BridgeSession::start(
        BridgeConfig::default(),
        Box::new(NullBoundary::new()),
        None,
    )?;
    session.mount_default()?;

    session.ingest_stylesheet(&[
        Rule::new("div", &[("flex-direction", "column"), ("padding-top", "8px")]),
        Rule::new(
            ".banner",
            &[("background-color", "#336699"), ("color", "white"), ("height", "40px")],
        ),
    ]);

    let banner = session.create_element("div")?;
    banner.receive_props([
        ("className", PropValue::text("banner")),
        ("onClick", PropValue::listener(|| println!("banner clicked"))),
    ]);

    let label = session.create_text("hello from the bridge");
    banner.append_child(&label.into());
    banner.append_to_container();

    session.forward_click(&RawPointerEvent {
        button: 0,
        page_x: 120.0,
        page_y: 80.0,
        modifiers: Modifiers::empty(),
    });

    // A few frame ticks.
    tokio::time::sleep(Duration::from_millis(100)).await;

    let collected = session.collect_garbage().await?;
    println!("engine collected {collected} orphaned resources");

    session.shutdown();
    Ok(())
}
