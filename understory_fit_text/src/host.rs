// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Seams to the host: layout measurement, frame scheduling, and notifications.
//!
//! None of these are implemented here. A host UI stack provides them, for
//! example by wrapping its layout tree, its resize observer, and its
//! animation-frame queue.

use crate::diagnostic::Diagnostic;
use crate::overflow::Measurement;

/// Source of rendered geometry and change notifications for containers.
pub trait MeasurementProvider {
    /// Opaque handle identifying a container in the host's element tree.
    type Handle;

    /// Measures the container after the most recent layout commit.
    ///
    /// Returns `None` while the container is not attached to a live layout.
    fn measure(&self, handle: &Self::Handle) -> Option<Measurement>;

    /// Fingerprint of the container's rendered content.
    ///
    /// Hosts typically hash the serialized subtree being measured. Two calls
    /// must return the same value exactly when the content is unchanged.
    /// Returns `None` while the container is not attached.
    fn content_fingerprint(&self, handle: &Self::Handle) -> Option<u64>;

    /// Starts reporting geometry changes of `handle`.
    ///
    /// The host forwards each reported change to
    /// [`FitText::on_geometry_change`](crate::FitText::on_geometry_change).
    /// Observers conventionally report once right after observation begins.
    fn observe(&mut self, handle: &Self::Handle);

    /// Stops reporting geometry changes of `handle`.
    fn unobserve(&mut self, handle: &Self::Handle);
}

/// Identifier of a frame callback requested from a [`FrameScheduler`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct FrameToken(pub u64);

/// Animation-frame style scheduling used to debounce geometry changes.
pub trait FrameScheduler {
    /// Requests a callback on the next frame.
    ///
    /// When it fires, the host calls [`FitText::on_frame`](crate::FitText::on_frame)
    /// with the returned token.
    fn request_frame(&mut self) -> FrameToken;

    /// Cancels a previously requested frame. Unknown tokens are ignored.
    fn cancel_frame(&mut self, token: FrameToken);
}

/// Receives session notifications from a [`FitText`](crate::FitText).
///
/// All methods default to doing nothing.
pub trait FitTextListener {
    /// A new search session is about to start.
    fn on_start(&mut self) {}

    /// The session converged on `size`.
    fn on_finish(&mut self, size: f64) {
        let _ = size;
    }

    /// Something prevented the session from converging normally.
    fn on_diagnostic(&mut self, diagnostic: &Diagnostic) {
        let _ = diagnostic;
    }
}

impl FitTextListener for () {}
