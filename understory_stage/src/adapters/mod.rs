// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Adapters to integrate with other Understory crates.
//!
//! Each adapter is gated behind a feature flag so the stage itself stays small.
//!
//! ## Available Adapters
//!
//! - [`table`] (`table_adapter` feature): lays out a group's children with
//!   [`understory_table`], measuring actors by their size hints.

#[cfg(feature = "table_adapter")]
pub mod table;
