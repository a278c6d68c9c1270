// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The font size search: an immutable state snapshot plus a pure step function.
//!
//! The search does not bisect `[active_min, active_max]` directly. It bisects
//! the distance between the size that was just rendered and either the size
//! rendered before it or the relevant bound, using the overflow verdict and
//! the direction of travel to decide which reference point is authoritative.
//! The active interval only ever shrinks, and each step halves the offending
//! distance, so the search settles once two consecutive candidates are within
//! the configured resolution.
//!
//! ```rust
//! use understory_fit_text::{Generation, OverflowVerdict, Overflow, SearchBounds, SearchState, StepOutcome};
//!
//! let bounds = SearchBounds { min: 20.0, max: 100.0 };
//! let state = SearchState::initial(bounds, Generation::INITIAL.next());
//!
//! // The maximum overflows, so the next candidate lies halfway back towards the minimum.
//! let StepOutcome::Narrowed(next) = state.step(OverflowVerdict::overflowing(Overflow::WIDTH), 5.0) else {
//!     unreachable!()
//! };
//! assert_eq!(next.current, 60.0);
//! assert_eq!(next.active_max, 100.0);
//! ```

use crate::overflow::OverflowVerdict;

/// Monotonic identifier of a search session.
///
/// Every re-arm produces a new generation, even when the initial sizes are
/// numerically identical to the previous session's. Hosts that memoize on the
/// state snapshot therefore still see a change and re-run the evaluation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

impl Generation {
    /// The generation a controller starts with. It is never evaluated.
    pub const INITIAL: Self = Self(0);

    /// Returns the raw counter value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Returns the generation following this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }

    /// Returns `true` for [`Generation::INITIAL`].
    #[must_use]
    pub const fn is_initial(self) -> bool {
        self.0 == 0
    }
}

/// The caller-configured `[min, max]` interval of a search.
///
/// `min <= max` is expected; [`FitTextOptions::validate`](crate::FitTextOptions::validate)
/// rejects configurations where it does not hold before a session is armed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SearchBounds {
    /// Smallest candidate size.
    pub min: f64,
    /// Largest candidate size.
    pub max: f64,
}

impl SearchBounds {
    /// Upper bound on the number of narrowing steps a session over these
    /// bounds needs at the given resolution.
    ///
    /// This is the number of halvings that bring `max - min` within
    /// `resolution`, plus two. Each narrowing step at least halves the gap
    /// between consecutive candidates relative to the active interval, so no
    /// sequence of verdicts, monotonic or not, needs more.
    #[must_use]
    pub fn step_budget(&self, resolution: f64) -> u32 {
        let mut span = self.max - self.min;
        if !(resolution > 0.0 && span.is_finite()) {
            return 2;
        }
        let mut halvings = 0_u32;
        while span > resolution {
            span /= 2.0;
            halvings = halvings.saturating_add(1);
        }
        halvings.saturating_add(2)
    }
}

/// One immutable snapshot of a search session.
///
/// Every transition produces a new snapshot; nothing is updated in place.
/// Within a session `active_min <= current <= active_max` holds for every
/// snapshot produced by [`SearchState::step`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SearchState {
    /// Size currently rendered and about to be measured.
    pub current: f64,
    /// Size rendered in the prior evaluation.
    pub previous: f64,
    /// Lower end of the narrowing interval.
    pub active_min: f64,
    /// Upper end of the narrowing interval.
    pub active_max: f64,
    /// Session this snapshot belongs to.
    pub generation: Generation,
}

/// Result of applying one overflow verdict to a [`SearchState`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum StepOutcome {
    /// A regular binary step: render the new snapshot's `current` next.
    Narrowed(SearchState),
    /// The search settled on a size that still overflows and backed off once.
    /// Bounds and `previous` are unchanged.
    Corrected(SearchState),
    /// The search settled on a size that fits.
    Converged(f64),
    /// The search settled on a size that overflows and cannot back off any
    /// further. The payload is the size to hold at (`active_min`).
    Stuck(f64),
}

impl SearchState {
    /// Seeds a session at the top of `bounds`.
    #[must_use]
    pub const fn initial(bounds: SearchBounds, generation: Generation) -> Self {
        Self {
            current: bounds.max,
            previous: bounds.min,
            active_min: bounds.min,
            active_max: bounds.max,
            generation,
        }
    }

    /// Returns `true` if the last two candidates differ by at most `resolution`.
    #[must_use]
    pub fn is_within_resolution(&self, resolution: f64) -> bool {
        distance(self.current, self.previous) <= resolution
    }

    /// Returns `true` if the search is moving towards larger sizes.
    #[must_use]
    pub fn is_ascending(&self) -> bool {
        self.current > self.previous
    }

    /// Width of the active interval.
    #[must_use]
    pub fn active_span(&self) -> f64 {
        self.active_max - self.active_min
    }

    /// Applies the verdict measured for `current` and returns what to do next.
    #[must_use]
    pub fn step(&self, verdict: OverflowVerdict, resolution: f64) -> StepOutcome {
        let overflowing = verdict.is_overflowing();

        if self.is_within_resolution(resolution) {
            if !overflowing {
                return StepOutcome::Converged(self.current);
            }
            // Settling narrows towards midpoints, so the settled size can
            // still overflow. Back off by one step, never below `active_min`.
            let mut corrected = if self.previous < self.current {
                self.previous
            } else {
                self.current - (self.previous - self.current)
            }
            .max(self.active_min);
            // Stepping back from a descent lands on `active_min` up to the
            // rounding of the subtraction above.
            let residue = 4.0 * f64::EPSILON * self.previous.abs().max(1.0);
            if corrected - self.active_min <= residue {
                corrected = self.active_min;
            }
            if corrected >= self.current {
                return StepOutcome::Stuck(self.active_min);
            }
            return StepOutcome::Corrected(Self {
                current: corrected,
                ..*self
            });
        }

        let ascending = self.is_ascending();
        let mut active_min = self.active_min;
        let mut active_max = self.active_max;
        let delta = if overflowing {
            active_max = active_max.min(self.current);
            if ascending {
                self.previous - self.current
            } else {
                self.active_min - self.current
            }
        } else {
            active_min = active_min.max(self.current);
            if ascending {
                self.active_max - self.current
            } else {
                self.previous - self.current
            }
        };

        StepOutcome::Narrowed(Self {
            current: self.current + delta / 2.0,
            previous: self.current,
            active_min,
            active_max,
            generation: self.generation,
        })
    }
}

fn distance(a: f64, b: f64) -> f64 {
    if a > b { a - b } else { b - a }
}
