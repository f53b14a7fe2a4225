// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Diagnostic switches layered on the base model.

use bitflags::bitflags;
use gsargs_core::error::Result;
use gsargs_core::types::HostDisplay;

use crate::base::BaseParams;
use crate::model::EngineParams;

bitflags! {
    /// Engine debug switches, one bit each.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    pub struct DebugFlags: u32 {
        /// Compiled fonts
        const CCFONT = 1 << 0;
        /// CFF fonts
        const CFF = 1 << 1;
        /// CMap handling
        const CMAP = 1 << 2;
        /// CIE color
        const CIE = 1 << 3;
        /// EPS handling
        const EPS = 1 << 4;
        /// Font API
        const FAPI = 1 << 5;
        /// Interpreter initialization
        const INIT = 1 << 6;
        /// PDF interpreter
        const PDF = 1 << 7;
        /// PDF writer
        const PDF_WRITER = 1 << 8;
        /// setpagedevice
        const SET_PAGE_DEVICE = 1 << 9;
        /// save/restore
        const SAVE_RESTORE = 1 << 10;
        /// TrueType fonts
        const TTF = 1 << 11;
        /// GIF viewer
        const VIEW_GIF = 1 << 12;
        /// JPEG viewer
        const VIEW_JPEG = 1 << 13;
    }
}

/// Engine switch for each flag, in emission order.
pub const DEBUG_SWITCHES: [(DebugFlags, &str); 14] = [
    (DebugFlags::CCFONT, "CCFONTDEBUG"),
    (DebugFlags::CFF, "CFFDEBUG"),
    (DebugFlags::CMAP, "CMAPDEBUG"),
    (DebugFlags::CIE, "DOCIEDEBUG"),
    (DebugFlags::EPS, "EPSDEBUG"),
    (DebugFlags::FAPI, "FAPIDEBUG"),
    (DebugFlags::INIT, "INITDEBUG"),
    (DebugFlags::PDF, "PDFDEBUG"),
    (DebugFlags::PDF_WRITER, "PDFWRDEBUG"),
    (DebugFlags::SET_PAGE_DEVICE, "SETPDDEBUG"),
    (DebugFlags::SAVE_RESTORE, "STRESTDEBUG"),
    (DebugFlags::TTF, "TTFDEBUG"),
    (DebugFlags::VIEW_GIF, "VGIFDEBUG"),
    (DebugFlags::VIEW_JPEG, "VJPGDEBUG"),
];

impl DebugFlags {
    /// Look a flag up by its engine switch name, e.g. `"PDFDEBUG"`.
    pub fn from_switch(name: &str) -> Option<Self> {
        DEBUG_SWITCHES
            .iter()
            .find(|(_, switch)| switch.eq_ignore_ascii_case(name))
            .map(|(flag, _)| *flag)
    }
}

/// Base model plus debug switches. The bitset is the only stored state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DebugParams {
    base: BaseParams,
    flags: DebugFlags,
}

impl DebugParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn flags(&self) -> DebugFlags {
        self.flags
    }

    pub fn set_flags(&mut self, flags: DebugFlags) {
        self.flags = flags;
    }

    /// Replace the bitset from a raw value; undefined bits are dropped.
    pub fn set_bits(&mut self, bits: u32) {
        self.flags = DebugFlags::from_bits_truncate(bits);
    }

    pub fn contains(&self, flag: DebugFlags) -> bool {
        self.flags.contains(flag)
    }

    pub fn set(&mut self, flag: DebugFlags, enabled: bool) {
        self.flags.set(flag, enabled);
    }

    /// Names of the enabled switches in emission order.
    pub fn enabled_switches(&self) -> impl Iterator<Item = &'static str> + '_ {
        DEBUG_SWITCHES
            .iter()
            .filter(|(flag, _)| self.flags.contains(*flag))
            .map(|(_, name)| *name)
    }
}

impl EngineParams for DebugParams {
    fn base(&self) -> &BaseParams {
        &self.base
    }

    fn base_mut(&mut self) -> &mut BaseParams {
        &mut self.base
    }

    fn clear(&mut self) {
        *self = Self::default();
    }

    fn write_args(&self, host: &HostDisplay, out: &mut Vec<String>) -> Result<()> {
        self.base.write_base_args(host, self.base.source_paths(), out);
        out.extend(self.enabled_switches().map(|name| format!("-d{name}")));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_emit_nothing() {
        let params = DebugParams::new();
        assert!(params.flags().is_empty());
        assert!(params.to_args(&HostDisplay::default()).unwrap().is_empty());
    }

    #[test]
    fn switches_follow_base_tier_in_declaration_order() {
        let mut params = DebugParams::new();
        params.base_mut().set_device("nullpage");
        params.set(DebugFlags::VIEW_JPEG, true);
        params.set(DebugFlags::PDF, true);
        params.set(DebugFlags::CCFONT, true);

        assert_eq!(
            params.to_args(&HostDisplay::default()).unwrap(),
            ["-sDEVICE=nullpage", "-dCCFONTDEBUG", "-dPDFDEBUG", "-dVJPGDEBUG"]
        );
    }

    #[test]
    fn boolean_views_track_the_bitset() {
        let mut params = DebugParams::new();
        params.set_bits((DebugFlags::TTF | DebugFlags::INIT).bits());
        assert!(params.contains(DebugFlags::TTF));
        assert!(params.contains(DebugFlags::INIT));
        assert!(!params.contains(DebugFlags::EPS));

        params.set(DebugFlags::TTF, false);
        assert_eq!(params.flags(), DebugFlags::INIT);
        assert_eq!(params.enabled_switches().collect::<Vec<_>>(), ["INITDEBUG"]);
    }

    #[test]
    fn unknown_bits_are_dropped() {
        let mut params = DebugParams::new();
        params.set_bits(u32::MAX);
        assert_eq!(params.flags(), DebugFlags::all());
        assert_eq!(params.enabled_switches().count(), 14);
    }

    #[test]
    fn every_flag_has_a_switch() {
        let covered = DEBUG_SWITCHES
            .iter()
            .fold(DebugFlags::empty(), |acc, (flag, _)| acc | *flag);
        assert_eq!(covered, DebugFlags::all());
        assert_eq!(DebugFlags::from_switch("setpddebug"), Some(DebugFlags::SET_PAGE_DEVICE));
        assert_eq!(DebugFlags::from_switch("NOPE"), None);
    }

    #[test]
    fn clear_resets_both_tiers() {
        let mut params = DebugParams::new();
        params.set(DebugFlags::CMAP, true);
        params.base_mut().set_no_pause(true);
        params.clear();
        assert_eq!(params, DebugParams::default());
    }
}
