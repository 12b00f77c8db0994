//! The diagnostic pipeline.
//!
//! Every finding flows through one dispatch path: severity filtering, the
//! per-file error cap, hint enrichment, and delivery to either a byte stream
//! (with 80-column wrapping) or a user callback. The abort flag is passive:
//! once set, further emissions become no-ops and control returns normally.

use std::io::{self, Write};

use serde::Serialize;

use crate::codes::{ErrorCode, Severity};
use crate::error::Error;
use crate::hints;
use crate::reader::FitsReader;
use crate::verifier::{Verifier, MAX_ERRORS};

/// Prefix width of `*** Error:   ` / `*** Warning: `; continuation lines of
/// wrapped diagnostics are indented this far.
const DIAG_MARGIN: usize = 13;

/// Maximum left margin for wrapped continuation lines.
const MAX_MARGIN: usize = 70;

/// Output line width.
const LINE_WIDTH: usize = 80;

/// One structured diagnostic, delivered to the output callback.
///
/// The borrowed strings are valid only for the duration of the callback
/// invocation; copy them if they must be retained.
#[derive(Debug, Clone, Serialize)]
pub struct Diagnostic<'a> {
    /// Severity class.
    pub severity: Severity,
    /// Stable numeric condition code ([`ErrorCode::Ok`] for informational
    /// output).
    pub code: ErrorCode,
    /// 1-based HDU index; 0 for file-level diagnostics.
    pub hdu: usize,
    /// Formatted message text.
    pub text: &'a str,
    /// Actionable fix suggestion, present when the `fix_hints` option is on.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fix_hint: Option<&'a str>,
    /// Detailed explanation, present when the `explain` option is on.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explain: Option<&'a str>,
}

/// Where diagnostics go.
pub(crate) enum Sink {
    /// Drop all output (counters still update).
    Quiet,
    /// Write a formatted text report to a stream.
    Stream(Box<dyn Write + Send>),
    /// Deliver structured diagnostics to a callback.
    Callback(Box<dyn FnMut(&Diagnostic<'_>) + Send>),
}

impl Default for Sink {
    fn default() -> Self {
        Sink::Stream(Box::new(io::stdout()))
    }
}

impl Verifier {
    /// Route the report to a byte stream (the default is stdout).
    pub fn set_output_stream(&mut self, out: Box<dyn Write + Send>) {
        self.sink = Sink::Stream(out);
    }

    /// Deliver structured diagnostics to `callback` instead of writing text.
    pub fn set_output_callback<F>(&mut self, callback: F)
    where
        F: FnMut(&Diagnostic<'_>) + Send + 'static,
    {
        self.sink = Sink::Callback(Box::new(callback));
    }

    /// Suppress all report output. Counters and results still update.
    pub fn set_quiet(&mut self) {
        self.sink = Sink::Quiet;
    }

    // ---- emission operations ----

    /// Informational output. Never counted, never filtered by
    /// `error_report`, never carries a hint.
    pub(crate) fn info(&mut self, text: &str) {
        self.dispatch(Severity::Info, ErrorCode::Ok, text);
    }

    /// A centered separator line, e.g. `+++++ Error Summary +++++`.
    pub(crate) fn separator(&mut self, fill: char, title: &str, width: usize) {
        let width = width.max(title.len());
        let lead = (width - title.len()) / 2;
        let mut line = String::with_capacity(width);
        for _ in 0..lead {
            line.push(fill);
        }
        line.push_str(title);
        while line.len() < width {
            line.push(fill);
        }
        self.info(&line);
    }

    /// Report a warning. Suppressed wholesale when `error_report >= 1`, and
    /// additionally when it is HEASARC-convention-only and HEASARC checking
    /// is disabled.
    pub(crate) fn warn(&mut self, code: ErrorCode, text: &str, heasarc: bool) {
        if self.aborted || self.opts.error_report >= 1 {
            self.hint.clear();
            return;
        }
        if heasarc && !self.opts.heasarc_conventions {
            self.hint.clear();
            return;
        }
        self.nwrns += 1;
        let mut line = String::with_capacity(text.len() + 36);
        line.push_str("*** Warning: ");
        line.push_str(text);
        if heasarc {
            line.push_str(" (HEASARC Convention)");
        }
        self.dispatch(Severity::Warning, code, &line);
    }

    /// Report an error at the given severity rank (1 = error, 2 = severe).
    /// Ranks below the `error_report` floor are suppressed. Crossing the
    /// per-file cap emits one terminal diagnostic and sets the abort flag.
    pub(crate) fn err(&mut self, code: ErrorCode, text: &str, severity: u8) {
        if self.aborted {
            self.hint.clear();
            return;
        }
        if severity < self.opts.error_report {
            self.hint.clear();
            return;
        }
        self.nerrs += 1;
        self.file_err_count += 1;
        let sev = if severity >= 2 { Severity::Severe } else { Severity::Error };
        let mut line = String::with_capacity(text.len() + 16);
        line.push_str("*** Error:   ");
        line.push_str(text);
        self.dispatch(sev, code, &line);
        if self.file_err_count > MAX_ERRORS && !self.aborted {
            self.dispatch(
                Severity::Severe,
                ErrorCode::TooManyErrors,
                "??? Too many Errors! I give up...",
            );
            self.aborted = true;
        }
    }

    /// Report a reader failure, appending the reader's own message.
    pub(crate) fn reader_err(&mut self, code: ErrorCode, text: &str, cause: &Error, severity: u8) {
        let mut line = String::with_capacity(text.len() + 64);
        line.push_str(text);
        line.push_str(&cause.to_string());
        self.err(code, &line, severity);
    }

    /// Report a reader failure and drain the reader's error stack into
    /// follow-up informational lines.
    pub(crate) fn reader_err_with_stack(
        &mut self,
        code: ErrorCode,
        text: &str,
        reader: &mut dyn FitsReader,
        cause: &Error,
        severity: u8,
    ) {
        let stack = reader.take_error_stack();
        let mut line = String::with_capacity(text.len() + 64);
        line.push_str(text);
        line.push_str(&cause.to_string());
        if !stack.is_empty() {
            line.push_str(" (from reader error stack:)");
        }
        self.err(code, &line, severity);
        for entry in stack {
            let indented = format!("             {entry}");
            self.info(&indented);
        }
    }

    // ---- the single dispatch path ----

    fn dispatch(&mut self, severity: Severity, code: ErrorCode, text: &str) {
        let (fix, explain) = if (self.opts.fix_hints || self.opts.explain)
            && code != ErrorCode::Ok
            && severity != Severity::Info
        {
            let hint = hints::generate(self, code);
            (
                if self.opts.fix_hints { hint.0 } else { None },
                if self.opts.explain { hint.1 } else { None },
            )
        } else {
            (None, None)
        };

        match &mut self.sink {
            Sink::Quiet => {}
            Sink::Callback(cb) => {
                let msg = Diagnostic {
                    severity,
                    code,
                    hdu: self.curhdu,
                    text,
                    fix_hint: fix.as_deref(),
                    explain: explain.as_deref(),
                };
                cb(&msg);
            }
            Sink::Stream(out) => {
                if severity == Severity::Info {
                    let _ = writeln!(out, "{text}");
                } else {
                    for line in wrap_lines(text, DIAG_MARGIN) {
                        let _ = writeln!(out, "{line}");
                    }
                }
                if let Some(f) = &fix {
                    let _ = writeln!(out, "    Fix: {f}");
                }
                if let Some(e) = &explain {
                    let _ = writeln!(out, "    Explanation: {e}");
                }
                let _ = out.flush();
            }
        }
        self.hint.clear();
    }
}

/// Wrap `text` to [`LINE_WIDTH`] columns. The first line is full width;
/// continuation lines carry a left margin of `margin` spaces (capped at
/// [`MAX_MARGIN`]) so the diagnostic prefix is never clipped. Breaks prefer
/// the last space inside the line.
pub(crate) fn wrap_lines(text: &str, margin: usize) -> Vec<String> {
    let margin = margin.min(MAX_MARGIN);
    if text.len() <= LINE_WIDTH {
        return vec![text.to_string()];
    }

    let mut lines = Vec::new();
    let mut rest = text;
    let mut width = LINE_WIDTH;
    let mut prefix = String::new();

    while !rest.is_empty() {
        if rest.len() <= width {
            lines.push(format!("{prefix}{rest}"));
            break;
        }
        let mut cut = width;
        while cut > 0 && !rest.is_char_boundary(cut) {
            cut -= 1;
        }
        let slice = &rest[..cut];
        let brk = if rest.as_bytes().get(cut) == Some(&b' ') {
            cut
        } else {
            match slice.rfind(' ') {
                Some(i) if i > 0 => i,
                _ => cut,
            }
        };
        lines.push(format!("{prefix}{}", &rest[..brk]));
        rest = rest[brk..].trim_start_matches(' ');
        if prefix.is_empty() {
            prefix = " ".repeat(margin);
            width = LINE_WIDTH - margin;
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::Options;
    use std::sync::{Arc, Mutex};

    fn collecting_verifier(opts: Options) -> (Verifier, Arc<Mutex<Vec<(Severity, ErrorCode, String)>>>) {
        let mut v = Verifier::new(opts);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        v.set_output_callback(move |d| {
            sink.lock().unwrap().push((d.severity, d.code, d.text.to_string()));
        });
        (v, seen)
    }

    #[test]
    fn warn_counts_and_prefixes() {
        let (mut v, seen) = collecting_verifier(Options::default());
        v.warn(ErrorCode::Deprecated, "EPOCH is deprecated.", false);
        assert_eq!(v.nwrns, 1);
        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert!(seen[0].2.starts_with("*** Warning: "));
    }

    #[test]
    fn heasarc_warn_tagged_and_gated() {
        let (mut v, seen) = collecting_verifier(Options::default());
        v.warn(ErrorCode::NoColumnName, "Column #1 has no name.", true);
        assert!(seen.lock().unwrap()[0].2.ends_with("(HEASARC Convention)"));

        let mut opts = Options::default();
        opts.heasarc_conventions = false;
        let (mut v, seen) = collecting_verifier(opts);
        v.warn(ErrorCode::NoColumnName, "Column #1 has no name.", true);
        assert!(seen.lock().unwrap().is_empty());
        assert_eq!(v.nwrns, 0);
    }

    #[test]
    fn error_report_floor_suppresses() {
        let mut opts = Options::default();
        opts.error_report = 2;
        let (mut v, seen) = collecting_verifier(opts);
        v.warn(ErrorCode::Deprecated, "warn", false);
        v.err(ErrorCode::MissingKeyword, "plain error", 1);
        v.err(ErrorCode::MissingEnd, "severe error", 2);
        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].1, ErrorCode::MissingEnd);
        assert_eq!(v.nerrs, 1);
        assert_eq!(v.nwrns, 0);
    }

    #[test]
    fn cap_emits_terminal_and_aborts() {
        let (mut v, seen) = collecting_verifier(Options::default());
        for i in 0..=MAX_ERRORS {
            v.err(ErrorCode::BadTdisp, &format!("error #{i}"), 1);
        }
        assert!(v.aborted);
        let seen = seen.lock().unwrap();
        let last = seen.last().unwrap();
        assert_eq!(last.1, ErrorCode::TooManyErrors);
        assert_eq!(last.0, Severity::Severe);
        // MAX_ERRORS + 1 errors plus the terminal diagnostic.
        assert_eq!(seen.len() as u32, MAX_ERRORS + 2);
    }

    #[test]
    fn emissions_after_abort_are_noops() {
        let (mut v, seen) = collecting_verifier(Options::default());
        for i in 0..=MAX_ERRORS {
            v.err(ErrorCode::BadTdisp, &format!("error #{i}"), 1);
        }
        let count_at_abort = seen.lock().unwrap().len();
        let errs_at_abort = v.nerrs;
        v.err(ErrorCode::BadTdisp, "after abort", 1);
        v.warn(ErrorCode::Deprecated, "after abort", false);
        assert_eq!(seen.lock().unwrap().len(), count_at_abort);
        assert_eq!(v.nerrs, errs_at_abort);
    }

    #[test]
    fn info_never_carries_hint() {
        let mut opts = Options::default();
        opts.fix_hints = true;
        opts.explain = true;
        let mut v = Verifier::new(opts);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        v.set_output_callback(move |d| {
            sink.lock().unwrap().push((d.fix_hint.is_some(), d.explain.is_some()));
        });
        v.info("just a note");
        let seen = seen.lock().unwrap();
        assert_eq!(*seen, vec![(false, false)]);
    }

    #[test]
    fn hints_attach_when_enabled() {
        let mut opts = Options::default();
        opts.fix_hints = true;
        let mut v = Verifier::new(opts);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        v.set_output_callback(move |d| {
            sink.lock()
                .unwrap()
                .push((d.fix_hint.map(String::from), d.explain.map(String::from)));
        });
        v.err(ErrorCode::MissingEnd, "no END card", 2);
        let seen = seen.lock().unwrap();
        assert!(seen[0].0.is_some());
        // explain option is off, so no explanation even though one exists.
        assert!(seen[0].1.is_none());
    }

    // ---- wrapping ----

    #[test]
    fn wrap_short_line_unchanged() {
        let lines = wrap_lines("short", 13);
        assert_eq!(lines, vec!["short".to_string()]);
    }

    #[test]
    fn wrap_exactly_80_unchanged() {
        let text = "x".repeat(80);
        assert_eq!(wrap_lines(&text, 13), vec![text]);
    }

    #[test]
    fn wrap_long_line_margins() {
        let text = format!("*** Error:   {}", "word ".repeat(40));
        let lines = wrap_lines(text.trim_end(), 13);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(line.len() <= 80, "line too long: {line:?}");
        }
        for cont in &lines[1..] {
            assert!(cont.starts_with("             "), "missing margin: {cont:?}");
        }
        // Prefix survives on the first line.
        assert!(lines[0].starts_with("*** Error:   "));
    }

    #[test]
    fn wrap_unbreakable_run_is_cut() {
        let text = "y".repeat(200);
        let lines = wrap_lines(&text, 13);
        assert!(lines.len() >= 3);
        for line in &lines {
            assert!(line.len() <= 80);
        }
        let total: usize = lines
            .iter()
            .map(|l| l.trim_start_matches(' ').len())
            .sum();
        assert_eq!(total, 200);
    }

    #[test]
    fn wrap_margin_capped_at_70() {
        let text = "z ".repeat(100);
        let lines = wrap_lines(text.trim_end(), 99);
        for cont in &lines[1..] {
            let indent = cont.len() - cont.trim_start_matches(' ').len();
            assert!(indent <= 70);
        }
    }

    #[test]
    fn separator_centers_title() {
        let mut v = Verifier::default();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        v.set_output_callback(move |d| sink.lock().unwrap().push(d.text.to_string()));
        v.separator('+', " Error Summary ", 60);
        let seen = seen.lock().unwrap();
        assert_eq!(seen[0].len(), 60);
        assert!(seen[0].contains(" Error Summary "));
        assert!(seen[0].starts_with('+'));
        assert!(seen[0].ends_with('+'));
    }
}
