// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Overflow evaluation over measured geometry.

use kurbo::Size;

bitflags::bitflags! {
    /// Axes on which rendered content exceeds its container.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Overflow: u8 {
        /// Natural content height exceeds the container's box height.
        const HEIGHT = 0b0000_0001;
        /// Natural content width exceeds the container's box width.
        const WIDTH  = 0b0000_0010;
    }
}

/// Geometry reported by a [`MeasurementProvider`](crate::MeasurementProvider)
/// after a layout commit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Measurement {
    /// Natural size of the rendered content (scroll size).
    pub content: Size,
    /// Size of the container's box (offset size).
    pub container: Size,
}

impl Measurement {
    /// Creates a measurement from a content size and a container size.
    #[must_use]
    pub const fn new(content: Size, container: Size) -> Self {
        Self { content, container }
    }

    /// Returns `true` if the container has a usable box.
    ///
    /// A container that collapsed to zero width or height is treated the same
    /// as one that is not attached to a live layout.
    #[must_use]
    pub fn is_measurable(&self) -> bool {
        self.container.width > 0.0 && self.container.height > 0.0
    }
}

/// Verdict produced by [`evaluate`] for a single layout pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OverflowVerdict {
    /// Axes that overflow. Empty when the content fits.
    pub axes: Overflow,
}

impl OverflowVerdict {
    /// A verdict reporting that content fits on both axes.
    pub const FITS: Self = Self {
        axes: Overflow::empty(),
    };

    /// A verdict reporting overflow on the given axes.
    #[must_use]
    pub const fn overflowing(axes: Overflow) -> Self {
        Self { axes }
    }

    /// Returns `true` if the content overflows on any axis.
    #[must_use]
    pub const fn is_overflowing(&self) -> bool {
        !self.axes.is_empty()
    }
}

/// Maps a measurement to an overflow verdict.
///
/// Returns `None` when there is nothing meaningful to measure (no measurement
/// at all, or a zero-sized container). Callers hold their search state until a
/// verdict becomes available.
#[must_use]
pub fn evaluate(measurement: Option<Measurement>) -> Option<OverflowVerdict> {
    let m = measurement.filter(Measurement::is_measurable)?;
    let mut axes = Overflow::empty();
    if m.content.height > m.container.height {
        axes |= Overflow::HEIGHT;
    }
    if m.content.width > m.container.width {
        axes |= Overflow::WIDTH;
    }
    Some(OverflowVerdict { axes })
}
