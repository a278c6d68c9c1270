// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Non-fatal conditions reported while fitting.

use core::fmt;

use crate::options::OptionsError;
use crate::search::Generation;

/// A condition that kept a session from converging normally.
///
/// Diagnostics never abort anything: the controller logs them, hands them to
/// [`FitTextListener::on_diagnostic`](crate::FitTextListener::on_diagnostic),
/// and holds at the best size it has.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Diagnostic {
    /// The options cannot drive a converging search. No session was started
    /// and the size is held at the configured minimum.
    InvalidOptions(OptionsError),
    /// The content overflows even at the smallest reachable size.
    Overflowing {
        /// Size held at.
        size: f64,
        /// Session that gave up.
        generation: Generation,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidOptions(err) => write!(f, "invalid fit options: {err}"),
            Self::Overflowing { size, generation } => write!(
                f,
                "content overflows at the smallest size {size}% (session {})",
                generation.get()
            ),
        }
    }
}
