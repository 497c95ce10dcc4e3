// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Payload handling
//!
//! Percent-encoding rounds for injected payloads and loaders for the
//! newline-delimited payload corpus and target list.

mod encoder;
mod loader;

pub use encoder::{decode, encode};
pub use loader::{load_lines, load_payloads, load_targets};
