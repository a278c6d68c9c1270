// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recalculation triggers and the re-entrancy guard.
//!
//! Two independent change classes re-arm a search from its initial bounds:
//!
//! - **Geometry changes** are debounced through a single pending frame slot.
//!   A new notification cancels and replaces the pending frame rather than
//!   queueing another one. The guard is consulted when the frame fires, so a
//!   change that lands mid-search either re-arms after the session ends or is
//!   dropped if its frame fires while the session is still running.
//! - **Content changes** are detected by comparing the content fingerprint of
//!   an idle layout pass against the one captured when the previous evaluation
//!   cycle ended.
//!
//! At most one session is active at a time. [`Recalc::arm`] rejects a re-arm
//! while [`Status::Searching`] instead of interleaving two sessions.

use crate::host::{FrameScheduler, FrameToken};
use crate::search::Generation;

/// Whether a search session is in flight.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    /// No session is running. Changes may re-arm.
    Idle,
    /// The given session is running. Re-arm attempts are rejected.
    Searching(Generation),
}

/// Returned when a re-arm is attempted while a session is running.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ArmError {
    /// The session with this generation has not finished yet.
    #[error("session {} is still searching", .0.get())]
    Busy(Generation),
}

/// Trigger state for one fitted container.
#[derive(Clone, Debug)]
pub struct Recalc {
    status: Status,
    generation: Generation,
    pending_frame: Option<FrameToken>,
    content: Option<u64>,
    primed: bool,
}

impl Default for Recalc {
    fn default() -> Self {
        Self::new()
    }
}

impl Recalc {
    /// Creates an idle trigger at [`Generation::INITIAL`].
    #[must_use]
    pub const fn new() -> Self {
        Self {
            status: Status::Idle,
            generation: Generation::INITIAL,
            pending_frame: None,
            content: None,
            primed: false,
        }
    }

    /// Current guard status.
    #[must_use]
    pub const fn status(&self) -> Status {
        self.status
    }

    /// Returns `true` while a session is running.
    #[must_use]
    pub const fn is_searching(&self) -> bool {
        matches!(self.status, Status::Searching(_))
    }

    /// The most recently armed generation.
    #[must_use]
    pub const fn generation(&self) -> Generation {
        self.generation
    }

    /// The frame currently scheduled to re-arm, if any.
    #[must_use]
    pub const fn pending_frame(&self) -> Option<FrameToken> {
        self.pending_frame
    }

    /// Returns `true` once a session has been armed since the last [`Recalc::reset`].
    ///
    /// Content changes are only tracked after that point.
    #[must_use]
    pub const fn is_primed(&self) -> bool {
        self.primed
    }

    /// Records a geometry change and schedules the debounced re-arm.
    ///
    /// Any frame still pending from an earlier notification is cancelled, so
    /// a burst of notifications collapses into one re-arm.
    pub fn geometry_changed(&mut self, scheduler: &mut impl FrameScheduler) -> FrameToken {
        if let Some(stale) = self.pending_frame.take() {
            scheduler.cancel_frame(stale);
        }
        let token = scheduler.request_frame();
        self.pending_frame = Some(token);
        token
    }

    /// Consumes a fired frame. Returns `true` if the caller should re-arm.
    pub fn frame_fired(&mut self, token: FrameToken) -> bool {
        if self.pending_frame != Some(token) {
            log::trace!("ignoring stale frame {token:?}");
            return false;
        }
        self.pending_frame = None;
        if let Status::Searching(generation) = self.status {
            log::trace!(
                "dropping geometry change: session {} in progress",
                generation.get()
            );
            return false;
        }
        true
    }

    /// Compares an idle layout pass's content against the captured fingerprint.
    ///
    /// Returns `true` if the content changed and the caller should re-arm.
    /// The new fingerprint is captured either way. Nothing is compared before
    /// the first session has been armed, or while a session is running.
    pub fn content_changed(&mut self, fingerprint: Option<u64>) -> bool {
        if !self.primed || self.is_searching() {
            return false;
        }
        let changed = fingerprint != self.content;
        self.content = fingerprint;
        changed
    }

    /// Moves from [`Status::Idle`] to [`Status::Searching`] with a new generation.
    pub fn arm(&mut self) -> Result<Generation, ArmError> {
        if let Status::Searching(generation) = self.status {
            return Err(ArmError::Busy(generation));
        }
        Ok(self.begin())
    }

    /// Abandons any running session and arms a new one.
    pub fn restart(&mut self) -> Generation {
        if let Status::Searching(generation) = self.status {
            log::debug!("abandoning session {}", generation.get());
        }
        self.begin()
    }

    fn begin(&mut self) -> Generation {
        self.generation = self.generation.next();
        self.status = Status::Searching(self.generation);
        self.primed = true;
        self.generation
    }

    /// Ends any running session without arming a new one.
    ///
    /// Used when a session cannot start at all.
    pub fn hold(&mut self) {
        if let Status::Searching(generation) = self.status {
            log::debug!("abandoning session {}", generation.get());
        }
        self.status = Status::Idle;
    }

    /// Ends the running session and captures the content it was fitted to.
    pub fn finish(&mut self, fingerprint: Option<u64>) {
        self.status = Status::Idle;
        self.content = fingerprint;
    }

    /// Cancels the pending frame and abandons any running session.
    pub fn cancel(&mut self, scheduler: &mut impl FrameScheduler) {
        if let Some(token) = self.pending_frame.take() {
            scheduler.cancel_frame(token);
        }
        self.status = Status::Idle;
    }

    /// Returns to the freshly-attached state.
    ///
    /// Generations keep increasing across detach/attach cycles. Once any
    /// session has been armed, a reset also moves past the last generation, so
    /// the snapshot seeded on re-attach never compares equal to an earlier one.
    pub fn reset(&mut self) {
        if !self.generation.is_initial() {
            self.generation = self.generation.next();
        }
        self.status = Status::Idle;
        self.pending_frame = None;
        self.content = None;
        self.primed = false;
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::{ArmError, Recalc, Status};
    use crate::host::{FrameScheduler, FrameToken};
    use crate::search::Generation;

    #[derive(Default)]
    struct Frames {
        next: u64,
        live: Vec<FrameToken>,
        cancelled: Vec<FrameToken>,
    }

    impl FrameScheduler for Frames {
        fn request_frame(&mut self) -> FrameToken {
            self.next += 1;
            let token = FrameToken(self.next);
            self.live.push(token);
            token
        }

        fn cancel_frame(&mut self, token: FrameToken) {
            self.live.retain(|t| *t != token);
            self.cancelled.push(token);
        }
    }

    #[test]
    fn geometry_bursts_collapse_into_one_pending_frame() {
        let mut frames = Frames::default();
        let mut recalc = Recalc::new();

        let first = recalc.geometry_changed(&mut frames);
        let second = recalc.geometry_changed(&mut frames);
        let third = recalc.geometry_changed(&mut frames);

        assert_eq!(frames.live, [third]);
        assert_eq!(frames.cancelled, [first, second]);
        assert_eq!(recalc.pending_frame(), Some(third));

        // Frames that were replaced never re-arm.
        assert!(!recalc.frame_fired(first));
        assert!(recalc.frame_fired(third));
        assert_eq!(recalc.pending_frame(), None);
        // A slot fires at most once.
        assert!(!recalc.frame_fired(third));
    }

    #[test]
    fn frame_firing_mid_search_is_dropped() {
        let mut frames = Frames::default();
        let mut recalc = Recalc::new();
        let generation = recalc.arm().unwrap();

        let token = recalc.geometry_changed(&mut frames);
        assert!(!recalc.frame_fired(token));
        assert_eq!(recalc.status(), Status::Searching(generation));
        assert_eq!(recalc.pending_frame(), None);
    }

    #[test]
    fn arming_twice_is_rejected() {
        let mut recalc = Recalc::new();
        let g1 = recalc.arm().unwrap();
        assert_eq!(g1, Generation::INITIAL.next());
        assert_eq!(recalc.arm(), Err(ArmError::Busy(g1)));

        recalc.finish(None);
        let g2 = recalc.arm().unwrap();
        assert!(g2 > g1);
    }

    #[test]
    fn restart_abandons_and_advances() {
        let mut recalc = Recalc::new();
        let g1 = recalc.arm().unwrap();
        let g2 = recalc.restart();
        assert!(g2 > g1);
        assert_eq!(recalc.status(), Status::Searching(g2));
    }

    #[test]
    fn content_is_ignored_until_primed_and_while_searching() {
        let mut recalc = Recalc::new();
        assert!(!recalc.content_changed(Some(1)));

        recalc.arm().unwrap();
        assert!(recalc.is_primed());
        assert!(!recalc.content_changed(Some(2)));

        recalc.finish(Some(2));
        assert!(!recalc.content_changed(Some(2)));
        assert!(recalc.content_changed(Some(3)));
        // The new fingerprint was captured.
        assert!(!recalc.content_changed(Some(3)));
    }

    #[test]
    fn hold_ends_the_session_without_arming() {
        let mut recalc = Recalc::new();
        recalc.hold();
        assert_eq!(recalc.status(), Status::Idle);
        assert_eq!(recalc.generation(), Generation::INITIAL);
        assert!(!recalc.content_changed(Some(7)));

        let generation = recalc.arm().unwrap();
        recalc.hold();
        assert!(!recalc.is_searching());
        assert_eq!(recalc.generation(), generation);
    }

    #[test]
    fn cancel_clears_pending_frame_and_guard() {
        let mut frames = Frames::default();
        let mut recalc = Recalc::new();
        recalc.arm().unwrap();
        let token = recalc.geometry_changed(&mut frames);

        recalc.cancel(&mut frames);
        assert_eq!(recalc.status(), Status::Idle);
        assert_eq!(recalc.pending_frame(), None);
        assert_eq!(frames.cancelled, [token]);
        assert!(frames.live.is_empty());
    }

    #[test]
    fn reset_keeps_generations_increasing() {
        let mut recalc = Recalc::new();
        recalc.reset();
        assert_eq!(recalc.generation(), Generation::INITIAL);

        let g1 = recalc.arm().unwrap();
        recalc.reset();
        assert!(!recalc.is_primed());
        assert_eq!(recalc.status(), Status::Idle);
        let seeded = recalc.generation();
        assert!(seeded > g1);
        assert!(recalc.arm().unwrap() > seeded);
    }
}
