// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The per-container controller tying the search to a host.

use core::fmt;

use crate::diagnostic::Diagnostic;
use crate::host::{FitTextListener, FrameScheduler, FrameToken, MeasurementProvider};
use crate::options::FitTextOptions;
use crate::overflow::evaluate;
use crate::recalc::{Recalc, Status};
use crate::search::{Generation, SearchState, StepOutcome};

/// Font size as a percentage of the host's baseline font size.
///
/// Displays as `"<n>%"`, ready to be used as a relative CSS-like size.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub struct FontSize(pub f64);

impl FontSize {
    /// The percentage value.
    #[must_use]
    pub const fn get(self) -> f64 {
        self.0
    }
}

impl fmt::Display for FontSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// What the host should do after handing an event to a [`FitText`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Progress {
    /// Nothing changed.
    Idle,
    /// A session is running but the container cannot be measured yet.
    /// State is held until a later layout pass can measure it.
    Waiting,
    /// A new candidate size must be rendered. Call
    /// [`FitText::after_layout`] once that layout has been committed.
    Relayout,
    /// The session converged on this size.
    Finished(f64),
    /// The session ended without converging and holds at this size.
    /// A [`Diagnostic`] has been reported.
    Stalled(f64),
}

impl Progress {
    /// Returns `true` if the host has to render [`FitText::size`] again.
    ///
    /// This includes [`Progress::Stalled`]: the held size may differ from the
    /// one last rendered, so the host renders it once more and reports that
    /// layout through [`FitText::after_layout`], which then returns
    /// [`Progress::Idle`].
    #[must_use]
    pub const fn needs_layout(&self) -> bool {
        matches!(self, Self::Relayout | Self::Stalled(_))
    }
}

/// Fits the text of one container by searching for the largest font size
/// that does not overflow it.
///
/// The controller owns the search state for the container's attached
/// lifetime. The host drives it:
///
/// - [`attach`](Self::attach) when the container is mounted and
///   [`detach`](Self::detach) when it goes away,
/// - [`on_geometry_change`](Self::on_geometry_change) for every size-change
///   notification and [`on_frame`](Self::on_frame) when a requested frame fires,
/// - [`after_layout`](Self::after_layout) after every layout commit,
///   rendering the container's text at [`size`](Self::size).
///
/// Only one search session runs at a time. Geometry or content changes that
/// arrive while one is running do not interleave with it.
#[derive(Debug)]
pub struct FitText<H, L = ()> {
    handle: H,
    options: FitTextOptions,
    listener: L,
    state: SearchState,
    recalc: Recalc,
    attached: bool,
    armed: bool,
}

impl<H, L: FitTextListener> FitText<H, L> {
    /// Creates a detached controller for the container identified by `handle`.
    #[must_use]
    pub fn new(handle: H, options: FitTextOptions, listener: L) -> Self {
        Self {
            handle,
            options,
            listener,
            state: SearchState::initial(options.bounds(), Generation::INITIAL),
            recalc: Recalc::new(),
            attached: false,
            armed: false,
        }
    }

    /// The container handle to attach to the element being fitted.
    #[must_use]
    pub const fn handle(&self) -> &H {
        &self.handle
    }

    /// The active options.
    #[must_use]
    pub const fn options(&self) -> &FitTextOptions {
        &self.options
    }

    /// Shared access to the listener.
    #[must_use]
    pub const fn listener(&self) -> &L {
        &self.listener
    }

    /// Mutable access to the listener.
    pub fn listener_mut(&mut self) -> &mut L {
        &mut self.listener
    }

    /// The current search snapshot.
    ///
    /// Snapshots compare unequal across sessions even when their sizes match,
    /// so hosts can memoize on them.
    #[must_use]
    pub const fn state(&self) -> SearchState {
        self.state
    }

    /// Generation of the current snapshot.
    #[must_use]
    pub const fn generation(&self) -> Generation {
        self.state.generation
    }

    /// Whether a session is in flight.
    #[must_use]
    pub const fn status(&self) -> Status {
        self.recalc.status()
    }

    /// Returns `true` between [`attach`](Self::attach) and [`detach`](Self::detach).
    #[must_use]
    pub const fn is_attached(&self) -> bool {
        self.attached
    }

    /// The size the container's text should currently be rendered at.
    #[must_use]
    pub const fn size(&self) -> FontSize {
        FontSize(self.state.current)
    }

    /// Starts observing the container.
    ///
    /// Nothing is measured until the observer's initial notification arms
    /// the first session.
    pub fn attach<P>(&mut self, provider: &mut P)
    where
        P: MeasurementProvider<Handle = H>,
    {
        if self.attached {
            return;
        }
        self.recalc.reset();
        self.state = SearchState::initial(self.options.bounds(), self.recalc.generation());
        self.armed = false;
        provider.observe(&self.handle);
        self.attached = true;
    }

    /// Stops observing the container, cancelling any scheduled re-arm and
    /// abandoning any running session.
    pub fn detach<P, S>(&mut self, provider: &mut P, scheduler: &mut S)
    where
        P: MeasurementProvider<Handle = H>,
        S: FrameScheduler,
    {
        if !self.attached {
            return;
        }
        self.recalc.cancel(scheduler);
        provider.unobserve(&self.handle);
        self.attached = false;
    }

    /// Replaces the options.
    ///
    /// If they differ and a session has been started since attaching, a fresh
    /// session starts immediately with the new bounds, abandoning any running
    /// one.
    pub fn set_options(&mut self, options: FitTextOptions) -> Progress {
        if options == self.options {
            return Progress::Idle;
        }
        self.options = options;
        if self.attached && self.armed {
            return self.start(true);
        }
        self.state = SearchState::initial(options.bounds(), self.state.generation);
        Progress::Idle
    }

    /// Forwards a geometry-change notification for the container.
    ///
    /// The re-arm is debounced onto the next frame.
    pub fn on_geometry_change<S: FrameScheduler>(&mut self, scheduler: &mut S) {
        if !self.attached {
            return;
        }
        self.recalc.geometry_changed(scheduler);
    }

    /// Forwards a fired frame previously requested by this controller.
    pub fn on_frame(&mut self, token: FrameToken) -> Progress {
        if !self.attached || !self.recalc.frame_fired(token) {
            return Progress::Idle;
        }
        self.start(false)
    }

    /// Evaluates the layout the host just committed.
    ///
    /// While a session runs this measures the container and advances the
    /// search by one step. Otherwise it checks whether the content changed
    /// since the last evaluation and re-arms if so.
    pub fn after_layout<P>(&mut self, provider: &P) -> Progress
    where
        P: MeasurementProvider<Handle = H>,
    {
        if !self.attached {
            return Progress::Idle;
        }
        match self.recalc.status() {
            Status::Idle => {
                let fingerprint = provider.content_fingerprint(&self.handle);
                if self.recalc.content_changed(fingerprint) {
                    log::debug!("content changed, re-fitting");
                    self.start(false)
                } else {
                    Progress::Idle
                }
            }
            Status::Searching(_) => self.advance(provider),
        }
    }

    fn start(&mut self, restart: bool) -> Progress {
        if !restart && self.recalc.is_searching() {
            return Progress::Idle;
        }
        self.armed = true;
        if let Err(err) = self.options.validate() {
            self.recalc.hold();
            let size = self.options.min_font_size;
            self.state = SearchState {
                current: size,
                ..SearchState::initial(self.options.bounds(), self.state.generation)
            };
            self.report(Diagnostic::InvalidOptions(err));
            return Progress::Stalled(size);
        }
        let generation = if restart {
            self.recalc.restart()
        } else {
            match self.recalc.arm() {
                Ok(generation) => generation,
                Err(err) => {
                    log::trace!("{err}");
                    return Progress::Idle;
                }
            }
        };
        self.listener.on_start();
        self.state = SearchState::initial(self.options.bounds(), generation);
        log::debug!(
            "session {} armed over [{}, {}]",
            generation.get(),
            self.options.min_font_size,
            self.options.max_font_size
        );
        Progress::Relayout
    }

    fn advance<P>(&mut self, provider: &P) -> Progress
    where
        P: MeasurementProvider<Handle = H>,
    {
        let Some(verdict) = evaluate(provider.measure(&self.handle)) else {
            log::trace!("container not measurable, holding at {}", self.state.current);
            return Progress::Waiting;
        };
        let resolution = self.options.resolution;
        let generation = self.state.generation;
        log::trace!(
            "session {} measured {} -> {:?}",
            generation.get(),
            self.state.current,
            verdict.axes
        );
        match self.state.step(verdict, resolution) {
            StepOutcome::Narrowed(next) | StepOutcome::Corrected(next) => {
                self.state = next;
                Progress::Relayout
            }
            StepOutcome::Converged(size) => {
                self.end_session(provider);
                log::debug!("session {} converged at {size}%", generation.get());
                self.listener.on_finish(size);
                Progress::Finished(size)
            }
            StepOutcome::Stuck(size) => {
                self.state = SearchState {
                    current: size,
                    ..self.state
                };
                self.end_session(provider);
                self.report(Diagnostic::Overflowing { size, generation });
                Progress::Stalled(size)
            }
        }
    }

    fn end_session<P>(&mut self, provider: &P)
    where
        P: MeasurementProvider<Handle = H>,
    {
        self.recalc.finish(provider.content_fingerprint(&self.handle));
    }

    fn report(&mut self, diagnostic: Diagnostic) {
        log::warn!("{diagnostic}");
        self.listener.on_diagnostic(&diagnostic);
    }
}
