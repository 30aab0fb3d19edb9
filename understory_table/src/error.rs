// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;

/// Errors raised while configuring a table or its cells.
///
/// Both variants are programming errors: they are reported at the call that
/// violates the precondition and nothing is changed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LayoutError {
    /// A widget-derived [`Value`](crate::Value) was used where no cell is available,
    /// for example as table padding.
    CellValueWithoutCell,
    /// A spacing setter received a negative amount.
    NegativeSpacing(f64),
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CellValueWithoutCell => {
                write!(f, "this value can only be used for a cell property")
            }
            Self::NegativeSpacing(amount) => write!(f, "spacing cannot be negative: {amount}"),
        }
    }
}

impl core::error::Error for LayoutError {}
