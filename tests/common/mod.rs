use std::collections::HashSet;
use std::sync::Once;

use surframp::ramp::{RampDirection, RampParams, Style, Surf};
use surframp::vmf::Document;
use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// Routes `log` records and tracing spans to the test output, filtered by
/// `RUST_LOG`
pub fn init_logging() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
        // already installed when the fmt subscriber bridges log itself
        let _ = tracing_log::LogTracer::init();
    });
}

pub const MATERIAL: &str = "dev/dev_measuregeneric01";

/// The classic 90 degree right turn of a wedge ramp surfable on both sides
pub fn right_turn() -> RampParams {
    RampParams {
        style: Style::Wedge,
        surf: Surf::Both,
        direction: RampDirection::Right,
        width: 256.0,
        height: 320.0,
        smoothness: 16,
        angle: 90.0,
        size: 1024.0,
        uv_scale: 0.25,
        material: MATERIAL.to_string(),
        ..Default::default()
    }
}

pub fn assert_unique_ids(document: &Document) {
    let ids = document.ids();
    let unique: HashSet<u32> = ids.iter().copied().collect();
    assert_eq!(unique.len(), ids.len(), "duplicate IDs in {ids:?}");
    assert!(ids.iter().all(|id| *id >= 2), "IDs below 2 in {ids:?}");
}
