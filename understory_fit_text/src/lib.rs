// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_fit_text --heading-base-level=0

//! Understory Fit Text: measurement-driven font size fitting.
//!
//! This crate finds the largest font size, within configured bounds, at which
//! the text of a fixed-size container does not overflow it. It does not look
//! at glyph metrics. Instead it renders a candidate size, asks the host's
//! layout whether the content overflows, and narrows its search from there.
//!
//! The core concepts are:
//!
//! - [`SearchState`]: an immutable snapshot of one search session, advanced by
//!   [`SearchState::step`] with an [`OverflowVerdict`] per layout pass.
//! - [`evaluate`]: turns a [`Measurement`] (content size vs. container box)
//!   into a verdict, reporting which [`Overflow`] axes are exceeded.
//! - [`Recalc`]: the re-arm triggers (debounced geometry changes, content
//!   changes) and the [`Status`] guard that keeps sessions from overlapping.
//! - [`FitText`]: the per-container controller that owns all of the above
//!   for the container's attached lifetime.
//!
//! This crate deliberately does **not** perform layout, observe geometry, or
//! schedule frames. Host frameworks are responsible for:
//!
//! - Implementing [`MeasurementProvider`] over their layout tree and resize
//!   observer, and [`FrameScheduler`] over their frame queue.
//! - Rendering the container's text at [`FitText::size`] and calling
//!   [`FitText::after_layout`] once that layout is committed.
//! - Forwarding geometry notifications and fired frames.
//!
//! Conditions that keep a session from converging (invalid options, or content
//! that cannot fit even at the minimum) are reported as [`Diagnostic`]s through
//! the `log` facade and [`FitTextListener::on_diagnostic`]. They never surface
//! as errors.
//!
//! ## Minimal example
//!
//! A label whose text grows two units wide per percent of font size, inside
//! a box 118 units wide:
//!
//! ```rust
//! use kurbo::Size;
//! use understory_fit_text::{
//!     FitText, FitTextOptions, FrameScheduler, FrameToken, Measurement, MeasurementProvider,
//!     Progress,
//! };
//!
//! struct Label {
//!     rendered_size: f64,
//! }
//!
//! impl MeasurementProvider for Label {
//!     type Handle = u32;
//!
//!     fn measure(&self, _: &u32) -> Option<Measurement> {
//!         let content = Size::new(self.rendered_size * 2.0, 20.0);
//!         Some(Measurement::new(content, Size::new(118.0, 40.0)))
//!     }
//!
//!     fn content_fingerprint(&self, _: &u32) -> Option<u64> {
//!         Some(1)
//!     }
//!
//!     fn observe(&mut self, _: &u32) {}
//!     fn unobserve(&mut self, _: &u32) {}
//! }
//!
//! struct Frames(u64);
//!
//! impl FrameScheduler for Frames {
//!     fn request_frame(&mut self) -> FrameToken {
//!         self.0 += 1;
//!         FrameToken(self.0)
//!     }
//!     fn cancel_frame(&mut self, _: FrameToken) {}
//! }
//!
//! let mut label = Label { rendered_size: 0.0 };
//! let mut frames = Frames(0);
//! let mut fit = FitText::new(7_u32, FitTextOptions::default(), ());
//!
//! fit.attach(&mut label);
//! // Observers report once right after observation begins; that arms the first session.
//! fit.on_geometry_change(&mut frames);
//! let mut progress = fit.on_frame(FrameToken(1));
//!
//! while progress.needs_layout() {
//!     label.rendered_size = fit.size().get();
//!     progress = fit.after_layout(&label);
//! }
//!
//! assert_eq!(progress, Progress::Finished(55.0));
//! assert_eq!(fit.size().to_string(), "55%");
//! ```
//!
//! ## Features
//!
//! - `std` (default): enables `std` support for `kurbo`.
//! - `libm`: enables `no_std` builds that rely on `libm` through `kurbo`.
//!
//! This crate is `no_std`.

#![no_std]

#[cfg(test)]
extern crate alloc;

mod diagnostic;
mod fit_text;
mod host;
mod options;
mod overflow;
mod recalc;
mod search;

pub use diagnostic::Diagnostic;
pub use fit_text::{FitText, FontSize, Progress};
pub use host::{FitTextListener, FrameScheduler, FrameToken, MeasurementProvider};
pub use options::{FitTextOptions, OptionsError};
pub use overflow::{Measurement, Overflow, OverflowVerdict, evaluate};
pub use recalc::{ArmError, Recalc, Status};
pub use search::{Generation, SearchBounds, SearchState, StepOutcome};
