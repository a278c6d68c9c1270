// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-instance fitting configuration.

use crate::search::SearchBounds;

/// Configuration for a [`FitText`](crate::FitText) instance.
///
/// Sizes are percentages of a host-defined baseline font size, so `100.0`
/// means "the baseline" and `20.0` means "a fifth of it".
///
/// Options are fixed for the lifetime of a search session. Replacing them via
/// [`FitText::set_options`](crate::FitText::set_options) starts a fresh session
/// with the new bounds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FitTextOptions {
    /// Largest font size the search may choose.
    pub max_font_size: f64,
    /// Smallest font size the search may choose.
    pub min_font_size: f64,
    /// Convergence tolerance: the search stops narrowing once two consecutive
    /// candidates differ by at most this much.
    pub resolution: f64,
}

impl Default for FitTextOptions {
    fn default() -> Self {
        Self {
            max_font_size: 100.0,
            min_font_size: 20.0,
            resolution: 5.0,
        }
    }
}

impl FitTextOptions {
    /// Returns these options with `max_font_size` replaced.
    #[must_use]
    pub const fn with_max_font_size(mut self, max_font_size: f64) -> Self {
        self.max_font_size = max_font_size;
        self
    }

    /// Returns these options with `min_font_size` replaced.
    #[must_use]
    pub const fn with_min_font_size(mut self, min_font_size: f64) -> Self {
        self.min_font_size = min_font_size;
        self
    }

    /// Returns these options with `resolution` replaced.
    #[must_use]
    pub const fn with_resolution(mut self, resolution: f64) -> Self {
        self.resolution = resolution;
        self
    }

    /// The caller-configured `[min_font_size, max_font_size]` interval.
    #[must_use]
    pub const fn bounds(&self) -> SearchBounds {
        SearchBounds {
            min: self.min_font_size,
            max: self.max_font_size,
        }
    }

    /// Checks that a search over these options can make progress.
    ///
    /// The search needs a non-empty interval and a positive resolution; with
    /// anything else consecutive candidates never settle meaningfully.
    pub fn validate(&self) -> Result<(), OptionsError> {
        for (field, value) in [
            ("max_font_size", self.max_font_size),
            ("min_font_size", self.min_font_size),
            ("resolution", self.resolution),
        ] {
            if !value.is_finite() {
                return Err(OptionsError::NonFinite { field, value });
            }
        }
        if self.min_font_size >= self.max_font_size {
            return Err(OptionsError::EmptyRange {
                min: self.min_font_size,
                max: self.max_font_size,
            });
        }
        if self.resolution <= 0.0 {
            return Err(OptionsError::NonPositiveResolution {
                resolution: self.resolution,
            });
        }
        Ok(())
    }
}

/// Reasons a [`FitTextOptions`] value cannot drive a converging search.
#[derive(Clone, Copy, Debug, PartialEq, thiserror::Error)]
pub enum OptionsError {
    /// One of the options is NaN or infinite.
    #[error("`{field}` must be finite, got {value}")]
    NonFinite {
        /// Name of the offending option.
        field: &'static str,
        /// The rejected value.
        value: f64,
    },
    /// `min_font_size` is not strictly below `max_font_size`.
    #[error("min font size {min} must be below max font size {max}")]
    EmptyRange {
        /// Configured minimum.
        min: f64,
        /// Configured maximum.
        max: f64,
    },
    /// `resolution` is zero or negative.
    #[error("resolution must be positive, got {resolution}")]
    NonPositiveResolution {
        /// The rejected resolution.
        resolution: f64,
    },
}

#[cfg(test)]
mod tests {
    use super::{FitTextOptions, OptionsError};

    #[test]
    fn defaults_match_documented_values() {
        let options = FitTextOptions::default();
        assert_eq!(options.max_font_size, 100.0);
        assert_eq!(options.min_font_size, 20.0);
        assert_eq!(options.resolution, 5.0);
        assert_eq!(options.validate(), Ok(()));
    }

    #[test]
    fn builders_replace_single_fields() {
        let options = FitTextOptions::default()
            .with_max_font_size(500.0)
            .with_resolution(1.0);
        assert_eq!(options.max_font_size, 500.0);
        assert_eq!(options.min_font_size, 20.0);
        assert_eq!(options.resolution, 1.0);

        let bounds = options.bounds();
        assert_eq!(bounds.min, 20.0);
        assert_eq!(bounds.max, 500.0);
    }

    #[test]
    fn inverted_or_empty_range_is_rejected() {
        let inverted = FitTextOptions::default()
            .with_min_font_size(120.0)
            .with_max_font_size(80.0);
        assert_eq!(
            inverted.validate(),
            Err(OptionsError::EmptyRange {
                min: 120.0,
                max: 80.0
            })
        );

        let empty = FitTextOptions::default()
            .with_min_font_size(50.0)
            .with_max_font_size(50.0);
        assert!(matches!(
            empty.validate(),
            Err(OptionsError::EmptyRange { .. })
        ));
    }

    #[test]
    fn non_positive_resolution_is_rejected() {
        for resolution in [0.0, -1.0] {
            let options = FitTextOptions::default().with_resolution(resolution);
            assert_eq!(
                options.validate(),
                Err(OptionsError::NonPositiveResolution { resolution })
            );
        }
    }

    #[test]
    fn non_finite_values_are_rejected() {
        let options = FitTextOptions::default().with_max_font_size(f64::INFINITY);
        assert!(matches!(
            options.validate(),
            Err(OptionsError::NonFinite {
                field: "max_font_size",
                ..
            })
        ));

        let options = FitTextOptions::default().with_resolution(f64::NAN);
        assert!(matches!(
            options.validate(),
            Err(OptionsError::NonFinite {
                field: "resolution",
                ..
            })
        ));
    }
}
