// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fitting a wrapped paragraph into a resizable box.
//!
//! This example drives `understory_fit_text` against a toy layout engine:
//! - words wrap greedily at the box width using fixed per-character advances,
//! - the box is resized once the first fit settles,
//! - the text is then replaced, which re-fits on the next layout commit.
//!
//! Run:
//! - `RUST_LOG=debug cargo run -p understory_demos --example fit_text_simulation`

use std::hash::{DefaultHasher, Hash, Hasher};

use kurbo::Size;
use understory_fit_text::{
    Diagnostic, FitText, FitTextListener, FitTextOptions, FrameScheduler, FrameToken,
    Measurement, MeasurementProvider, Progress,
};

/// Pixel size of `100%`.
const BASE_FONT_PX: f64 = 16.0;
/// Advance of one character, in ems.
const ADVANCE_EM: f64 = 0.5;
const LINE_HEIGHT_EM: f64 = 1.25;

/// A paragraph laid out in a fixed box.
#[derive(Debug)]
struct Paragraph {
    text: String,
    bounds: Size,
    /// Font size of the last committed layout, in percent.
    rendered: f64,
}

impl Paragraph {
    /// Lays the text out at the rendered size and returns its extent.
    fn layout(&self) -> Size {
        let em = BASE_FONT_PX * self.rendered / 100.0;
        let advance = em * ADVANCE_EM;
        let mut lines = 0_u32;
        let mut line = 0.0_f64;
        let mut widest = 0.0_f64;
        for word in self.text.split_whitespace() {
            let width = word.chars().count() as f64 * advance;
            let with_space = if line > 0.0 { line + advance + width } else { width };
            if line > 0.0 && with_space > self.bounds.width {
                widest = widest.max(line);
                lines += 1;
                line = width;
            } else {
                line = with_space;
            }
        }
        if line > 0.0 {
            widest = widest.max(line);
            lines += 1;
        }
        Size::new(widest, f64::from(lines) * em * LINE_HEIGHT_EM)
    }
}

impl MeasurementProvider for Paragraph {
    type Handle = &'static str;

    fn measure(&self, _: &&'static str) -> Option<Measurement> {
        Some(Measurement::new(self.layout(), self.bounds))
    }

    fn content_fingerprint(&self, _: &&'static str) -> Option<u64> {
        let mut hasher = DefaultHasher::new();
        self.text.hash(&mut hasher);
        Some(hasher.finish())
    }

    fn observe(&mut self, handle: &&'static str) {
        log::info!("observing {handle}");
    }

    fn unobserve(&mut self, handle: &&'static str) {
        log::info!("no longer observing {handle}");
    }
}

/// A frame queue that fires everything still pending on `tick`.
#[derive(Debug, Default)]
struct FrameQueue {
    next: u64,
    pending: Vec<FrameToken>,
}

impl FrameQueue {
    fn tick(&mut self) -> Vec<FrameToken> {
        std::mem::take(&mut self.pending)
    }
}

impl FrameScheduler for FrameQueue {
    fn request_frame(&mut self) -> FrameToken {
        self.next += 1;
        let token = FrameToken(self.next);
        self.pending.push(token);
        token
    }

    fn cancel_frame(&mut self, token: FrameToken) {
        self.pending.retain(|t| *t != token);
    }
}

#[derive(Debug)]
struct Report;

impl FitTextListener for Report {
    fn on_start(&mut self) {
        println!("  fitting...");
    }

    fn on_finish(&mut self, size: f64) {
        println!("  settled at {size}%");
    }

    fn on_diagnostic(&mut self, diagnostic: &Diagnostic) {
        println!("  gave up: {diagnostic}");
    }
}

/// Commits layouts at the requested size until the controller is done.
fn settle(fit: &mut FitText<&'static str, Report>, paragraph: &mut Paragraph, mut progress: Progress) {
    while progress.needs_layout() {
        paragraph.rendered = fit.size().get();
        let extent = paragraph.layout();
        println!(
            "  layout at {:>7}: {:.1} x {:.1} in {:.0} x {:.0}",
            fit.size().to_string(),
            extent.width,
            extent.height,
            paragraph.bounds.width,
            paragraph.bounds.height
        );
        progress = fit.after_layout(paragraph);
    }
}

fn run_frames(fit: &mut FitText<&'static str, Report>, paragraph: &mut Paragraph, frames: &mut FrameQueue) {
    for token in frames.tick() {
        let progress = fit.on_frame(token);
        settle(fit, paragraph, progress);
    }
}

fn main() {
    env_logger::init();

    let mut paragraph = Paragraph {
        text: "The quick brown fox jumps over the lazy dog".into(),
        bounds: Size::new(320.0, 120.0),
        rendered: 0.0,
    };
    let mut frames = FrameQueue::default();
    let options = FitTextOptions::default()
        .with_min_font_size(50.0)
        .with_max_font_size(400.0)
        .with_resolution(2.0);
    let mut fit = FitText::new("headline", options, Report);

    println!("mount into {:?}", paragraph.bounds);
    fit.attach(&mut paragraph);
    // The observer reports the initial geometry.
    fit.on_geometry_change(&mut frames);
    run_frames(&mut fit, &mut paragraph, &mut frames);

    println!("resize to 480 x 90");
    paragraph.bounds = Size::new(480.0, 90.0);
    // A resize arrives as a burst of notifications; only the last frame fires.
    for _ in 0..3 {
        fit.on_geometry_change(&mut frames);
    }
    run_frames(&mut fit, &mut paragraph, &mut frames);

    println!("replace text");
    paragraph.text = "Pack my box with five dozen liquor jugs, then pack another".into();
    let progress = fit.after_layout(&paragraph);
    settle(&mut fit, &mut paragraph, progress);

    println!("shrink to 60 x 20");
    paragraph.bounds = Size::new(60.0, 20.0);
    fit.on_geometry_change(&mut frames);
    run_frames(&mut fit, &mut paragraph, &mut frames);

    fit.detach(&mut paragraph, &mut frames);
    println!("final size {}", fit.size());
}
