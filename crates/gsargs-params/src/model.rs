// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// The capability shared by every parameter model.

use gsargs_core::error::Result;
use gsargs_core::types::HostDisplay;

use crate::base::BaseParams;

/// A typed description of one engine run that can be turned into tokens.
///
/// Models are built, mutated and serialized on one thread; only the finished
/// token list is handed to an engine.
pub trait EngineParams {
    /// The engine-wide switches every model carries.
    fn base(&self) -> &BaseParams;

    fn base_mut(&mut self) -> &mut BaseParams;

    /// Restore every field, in every tier, to its default.
    fn clear(&mut self);

    /// Append this model's tokens to `out`, base tier first.
    ///
    /// On error `out` may hold a partial list, which must be discarded.
    fn write_args(&self, host: &HostDisplay, out: &mut Vec<String>) -> Result<()>;

    /// Serialize into a fresh list; nothing is returned if validation fails.
    fn to_args(&self, host: &HostDisplay) -> Result<Vec<String>> {
        let mut out = Vec::new();
        self.write_args(host, &mut out)?;
        Ok(out)
    }
}
