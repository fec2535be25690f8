// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Loader lifecycle and pointer routing.
//!
//! This example plays the host's part: it "fetches" an image for a loader,
//! reports progress and completion, then feeds pointer input to the stage.
//!
//! Run:
//! - `RUST_LOG=debug cargo run -p understory_examples --example display_loader_pointer`

use kurbo::{Point, Rect};
use tracing_subscriber::EnvFilter;
use understory_display::{BitmapData, LoadStatus, RecordingSurface, Stage, StageConfig};
use understory_event::{EventPayload, EventType, Outcome};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut stage = Stage::new(StageConfig::default(), RecordingSurface::new(550, 400));
    let root = stage.root();

    let loader = stage.create_loader();
    stage.set_x(loader, 40.0).expect("loader is not the stage");
    stage.set_y(loader, 30.0).expect("loader is not the stage");
    stage.add_child(root, loader).expect("stage accepts loaders");

    for kind in [EventType::OPEN, EventType::PROGRESS, EventType::COMPLETE] {
        stage
            .add_event_listener(loader, kind, |stage, e| {
                let info = stage.loader_info(e.target).ok();
                println!(
                    "{:<9} status={:?} payload={:?}",
                    e.kind.as_str(),
                    info.map(|i| i.status()),
                    e.payload
                );
                Outcome::Continue
            })
            .expect("loader is alive");
    }

    // The host's network layer would do this asynchronously.
    stage.load(loader, "assets/tile.png").expect("node is a loader");
    stage.loader_open(loader).expect("node is a loader");
    for loaded in [256, 512, 1024] {
        stage
            .loader_progress(loader, loaded, 1024)
            .expect("node is a loader");
    }
    let mut image = BitmapData::new(64, 48, false, 0x2266AA);
    image.fill_rect(Rect::new(8.0, 8.0, 56.0, 40.0), 0xFFFFFFFF);
    stage
        .loader_complete(loader, image)
        .expect("node is a loader");

    let info = stage.loader_info(loader).expect("node is a loader");
    assert_eq!(info.status(), LoadStatus::Complete);
    println!(
        "loaded {}x{} from {:?}, bounds on stage {:?}",
        info.width(),
        info.height(),
        info.url(),
        stage.get_bounds(loader, root)
    );

    // Pointer feedback on the loaded image.
    for kind in [EventType::MOUSE_OVER, EventType::MOUSE_OUT, EventType::CLICK] {
        stage
            .add_event_listener(loader, kind, |_, e| {
                if let EventPayload::Pointer {
                    local_x, local_y, ..
                } = e.payload
                {
                    println!("{:<9} at local ({local_x}, {local_y})", e.kind.as_str());
                }
                Outcome::Continue
            })
            .expect("loader is alive");
    }
    for p in [(10.0, 10.0), (50.0, 40.0), (60.0, 50.0), (200.0, 200.0)] {
        stage.pointer_move(Point::from(p));
    }
    let hits = stage.pointer_click(Point::new(70.0, 60.0));
    println!("click hit {hits} targets");

    stage.invalidate();
}
