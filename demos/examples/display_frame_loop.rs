// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frame-driven animation on a recording surface.
//!
//! This example shows how to:
//! - build a small display tree with vector content,
//! - animate it from `enterFrame` listeners,
//! - drive frames from host timestamps with `Stage::advance`,
//! - inspect what each frame painted through `RecordingSurface`.
//!
//! Run:
//! - `RUST_LOG=understory_display=trace cargo run -p understory_examples --example display_frame_loop`

use std::time::{Duration, Instant};

use kurbo::Rect;
use tracing::info;
use tracing_subscriber::EnvFilter;
use understory_display::{RecordingSurface, Stage, StageConfig, SurfaceOp};
use understory_event::{EventType, Outcome};
use understory_graphics::{GradientType, Paint, gradient_box};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = StageConfig {
        width: 320,
        height: 240,
        frame_rate: 30.0,
    };
    let mut stage = Stage::new(config, RecordingSurface::new(config.width, config.height));
    let root = stage.root();

    // A framed panel that scrolls its content.
    let panel = stage.create_sprite();
    {
        let g = stage.graphics_mut(panel).expect("sprites have graphics");
        g.line_style(2.0, 0x333333, 1.0);
        g.draw_round_rect(0.0, 0.0, 200.0, 120.0, 16.0, None);
    }
    stage.set_x(panel, 60.0).expect("panel is not the stage");
    stage.set_y(panel, 60.0).expect("panel is not the stage");
    stage
        .set_scroll_rect(panel, Some(Rect::new(0.0, 0.0, 200.0, 120.0)))
        .expect("panel is not the stage");
    stage.add_child(root, panel).expect("stage accepts sprites");

    // A ball that bounces horizontally inside the panel.
    let ball = stage.create_shape();
    {
        let g = stage.graphics_mut(ball).expect("shapes have graphics");
        g.begin_gradient_fill(
            GradientType::from_name("radial"),
            &[0xFFCC00, 0xCC3300],
            &[1.0, 1.0],
            &[0.0, 255.0],
            gradient_box(24.0, 24.0, 0.0, -12.0, -12.0),
            -0.4,
        );
        g.draw_circle(0.0, 0.0, 12.0);
        g.end_fill();
    }
    stage.set_y(ball, 60.0).expect("ball is not the stage");
    stage.set_cache_as_bitmap(ball, true).expect("ball is alive");
    stage.add_child(panel, ball).expect("panel is a container");

    stage
        .add_event_listener(ball, EventType::ENTER_FRAME, |stage, e| {
            let x = stage.x(e.target).unwrap_or_default();
            let next = if x >= 200.0 { 0.0 } else { x + 25.0 };
            stage.set_x(e.target, next).ok();
            Outcome::Continue
        })
        .expect("ball is alive");

    stage
        .add_event_listener(root, EventType::RENDER, |stage, _| {
            let Some(surface) = stage.surface_as::<RecordingSurface>() else {
                return Outcome::Continue;
            };
            let gradients = surface
                .fills()
                .filter(|f| matches!(f.paint, Paint::Gradient(_)))
                .count();
            let blits = surface
                .ops()
                .iter()
                .filter(|op| matches!(op, SurfaceOp::DrawSurface { .. }))
                .count();
            info!(
                frame = stage.frame_count(),
                ops = surface.ops().len(),
                strokes = surface.strokes().count(),
                gradients,
                blits,
                "frame painted"
            );
            Outcome::Continue
        })
        .expect("root is alive");

    // Simulated host loop: one timestamp every 10ms for half a second.
    let start = Instant::now();
    for step in 0..50 {
        let now = start + Duration::from_millis(step * 10);
        if stage.advance(now) {
            let x = stage.x(ball).unwrap_or_default();
            println!("frame {:>2} at {:>3}ms: ball x = {x}", stage.frame_count(), step * 10);
        }
    }

    // Halve the rate; the pending deadline is dropped and re-armed.
    let applied = stage.set_frame_rate(15.0);
    println!(
        "frame rate now {applied} fps (interval {:?}, rescheduled {} times)",
        stage.clock().interval(),
        stage.clock().reschedules()
    );
}
