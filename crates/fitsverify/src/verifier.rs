//! The per-verification state object.
//!
//! Every counter, buffer, and piece of context that the C-era tools kept in
//! file-scope globals lives here, passed explicitly through every check.
//! Distinct [`Verifier`] instances share nothing and may be driven from
//! parallel threads.

use serde::Serialize;

use crate::diagnostic::Sink;
use crate::file::HduRecord;
use crate::options::{OptionKey, Options};
use crate::reader::HduKind;

/// Hard cap on errors reported per file; crossing it aborts the run.
pub(crate) const MAX_ERRORS: u32 = 200;

/// Per-file verification outcome.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FileResult {
    /// Errors found in this file.
    pub num_errors: i64,
    /// Warnings found in this file.
    pub num_warnings: i64,
    /// HDUs processed.
    pub num_hdus: usize,
    /// True if verification was aborted (error cap exceeded).
    pub aborted: bool,
}

/// Hint context written by validator call sites and consumed by the hint
/// generator on the next dispatch.
#[derive(Debug, Default)]
pub(crate) struct HintContext {
    pub keyword: String,
    pub colnum: usize,
    pub fix_override: Option<String>,
    pub explain_override: Option<String>,
}

impl HintContext {
    pub(crate) fn clear(&mut self) {
        self.keyword.clear();
        self.colnum = 0;
        self.fix_override = None;
        self.explain_override = None;
    }
}

/// A reentrant FITS verification session.
///
/// Holds the option snapshot, all counters, the HDU directory, the hint
/// context, and the output sink. One verification is strictly sequential;
/// for parallelism use one `Verifier` (and one reader) per file. The bundled
/// [`crate::reader::MemReader`] keeps no process-global state, so no
/// cross-instance serialization is needed; a custom
/// [`crate::reader::FitsReader`] with global state must be serialized by the
/// caller.
pub struct Verifier {
    pub(crate) opts: Options,
    pub(crate) sink: Sink,

    // Session accumulators, across files.
    pub(crate) total_errors: i64,
    pub(crate) total_warnings: i64,

    // Per-file state.
    pub(crate) totalhdu: usize,
    pub(crate) hdu_dir: Vec<HduRecord>,
    pub(crate) file_err_count: u32,
    pub(crate) file_total_err: i64,
    pub(crate) file_total_warn: i64,
    pub(crate) aborted: bool,

    // Per-HDU counters, snapshotted into the directory at HDU boundaries.
    pub(crate) nerrs: u32,
    pub(crate) nwrns: u32,
    pub(crate) curhdu: usize,
    pub(crate) curtype: HduKind,

    pub(crate) hint: HintContext,
}

impl Verifier {
    /// Create a verifier with the given options.
    pub fn new(opts: Options) -> Self {
        Verifier {
            opts,
            sink: Sink::default(),
            total_errors: 0,
            total_warnings: 0,
            totalhdu: 0,
            hdu_dir: Vec::new(),
            file_err_count: 0,
            file_total_err: 0,
            file_total_warn: 0,
            aborted: false,
            nerrs: 0,
            nwrns: 0,
            curhdu: 0,
            curtype: HduKind::Primary,
            hint: HintContext::default(),
        }
    }

    /// The current option set.
    pub fn options(&self) -> &Options {
        &self.opts
    }

    /// Set a single option. Takes effect on the next `verify_*` call;
    /// options never change mid-verification.
    pub fn set_option(&mut self, key: OptionKey, value: i32) {
        self.opts.set(key, value);
    }

    /// Read a single option.
    pub fn get_option(&self, key: OptionKey) -> i32 {
        self.opts.get(key)
    }

    /// Accumulated (errors, warnings) across every file verified by this
    /// session.
    pub fn totals(&self) -> (i64, i64) {
        (self.total_errors, self.total_warnings)
    }

    /// Reset per-file state at the start of a verification.
    pub(crate) fn reset_file_state(&mut self) {
        self.totalhdu = 0;
        self.hdu_dir.clear();
        self.file_err_count = 0;
        self.file_total_err = 0;
        self.file_total_warn = 0;
        self.aborted = false;
        self.nerrs = 0;
        self.nwrns = 0;
        self.curhdu = 0;
        self.curtype = HduKind::Primary;
        self.hint.clear();
    }

    /// Current per-HDU (errors, warnings).
    pub(crate) fn num_err_wrn(&self) -> (u32, u32) {
        (self.nerrs, self.nwrns)
    }

    /// Reset the per-HDU counters.
    pub(crate) fn reset_err_wrn(&mut self) {
        self.nerrs = 0;
        self.nwrns = 0;
    }

    // ---- hint context for call sites ----

    pub(crate) fn hint_keyword(&mut self, name: &str) {
        self.hint.keyword.clear();
        self.hint.keyword.push_str(name);
    }

    pub(crate) fn hint_colnum(&mut self, col: usize) {
        self.hint.colnum = col;
    }

    pub(crate) fn hint_fix(&mut self, text: String) {
        self.hint.fix_override = Some(text);
    }

    pub(crate) fn hint_explain(&mut self, text: String) {
        self.hint.explain_override = Some(text);
    }
}

impl Default for Verifier {
    fn default() -> Self {
        Verifier::new(Options::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_verifier_has_clean_counters() {
        let v = Verifier::default();
        assert_eq!(v.totals(), (0, 0));
        assert_eq!(v.num_err_wrn(), (0, 0));
        assert!(!v.aborted);
    }

    #[test]
    fn reset_file_state_clears_everything() {
        let mut v = Verifier::default();
        v.nerrs = 3;
        v.nwrns = 2;
        v.file_err_count = 5;
        v.aborted = true;
        v.curhdu = 7;
        v.hint_keyword("BITPIX");
        v.reset_file_state();
        assert_eq!(v.num_err_wrn(), (0, 0));
        assert_eq!(v.file_err_count, 0);
        assert!(!v.aborted);
        assert_eq!(v.curhdu, 0);
        assert!(v.hint.keyword.is_empty());
    }

    #[test]
    fn option_round_trip_via_verifier() {
        let mut v = Verifier::default();
        v.set_option(OptionKey::FixHints, 1);
        assert_eq!(v.get_option(OptionKey::FixHints), 1);
        v.set_option(OptionKey::ErrorReport, 2);
        assert_eq!(v.get_option(OptionKey::ErrorReport), 2);
    }

    #[test]
    fn verifier_is_send() {
        fn assert_send<T: Send>() {}
        assert_send::<Verifier>();
    }
}
