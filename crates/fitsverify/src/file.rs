//! Cross-HDU file-level checks and the HDU directory.
//!
//! The directory records one entry per HDU (type, name, version, counters);
//! it is created when a file is opened, updated at every HDU boundary, and
//! torn down when the report closes. All paths, including an abort, release
//! it on the normal return path.

use crate::codes::ErrorCode;
use crate::error::Error;
use crate::reader::{FitsReader, HduKind};
use crate::verifier::Verifier;

/// One entry of the per-file HDU directory.
#[derive(Debug, Clone)]
pub struct HduRecord {
    /// HDU type.
    pub kind: HduKind,
    /// 1-based HDU index.
    pub hdunum: usize,
    /// Stored EXTNAME (empty when absent).
    pub extname: String,
    /// Stored EXTVER (0 when absent).
    pub extver: i64,
    /// Errors counted against this HDU.
    pub errnum: u32,
    /// Warnings counted against this HDU.
    pub wrnno: u32,
}

impl Verifier {
    /// Allocate the directory for `totalhdu` entries.
    pub(crate) fn init_hdu_directory(&mut self, totalhdu: usize) {
        self.totalhdu = totalhdu;
        self.hdu_dir = (1..=totalhdu)
            .map(|hdunum| HduRecord {
                kind: HduKind::Unknown,
                hdunum,
                extname: String::new(),
                extver: 0,
                errnum: 0,
                wrnno: 0,
            })
            .collect();
    }

    /// Record the type, name, and version of an HDU.
    pub(crate) fn set_hduname(&mut self, hdunum: usize, kind: HduKind, extname: &str, extver: i64) {
        if let Some(rec) = self.hdu_dir.get_mut(hdunum - 1) {
            rec.kind = kind;
            rec.extname.clear();
            rec.extname.push_str(extname);
            rec.extver = extver;
        }
    }

    /// Snapshot the per-HDU counters into the directory entry and reset
    /// them for the next HDU.
    pub(crate) fn set_hduerr(&mut self, hdunum: usize) {
        let (errs, wrns) = self.num_err_wrn();
        if let Some(rec) = self.hdu_dir.get_mut(hdunum - 1) {
            rec.errnum = errs;
            rec.wrnno = wrns;
        }
        self.reset_err_wrn();
    }

    /// Sum directory and residual (file-level) counters.
    pub(crate) fn total_errors(&self) -> (i64, i64) {
        if self.totalhdu == 0 {
            // The file could not be opened at all.
            return (1, 0);
        }
        let mut errs: i64 = self.hdu_dir.iter().map(|r| r.errnum as i64).sum();
        let mut wrns: i64 = self.hdu_dir.iter().map(|r| r.wrnno as i64).sum();
        let (e, w) = self.num_err_wrn();
        errs += e as i64;
        wrns += w as i64;
        (errs, wrns)
    }
}

/// Detect duplicate `(EXTNAME, type, EXTVER)` triples across the directory.
/// O(N^2) over the HDU count, which is small in practice.
pub(crate) fn test_duplicate_names(v: &mut Verifier) {
    let n = v.hdu_dir.len();
    for i in 0..n {
        for j in (i + 1)..n {
            let a = &v.hdu_dir[i];
            let b = &v.hdu_dir[j];
            if a.extname.is_empty() || b.extname.is_empty() {
                continue;
            }
            if a.extname == b.extname && a.kind == b.kind && a.extver == b.extver {
                let text = format!(
                    "HDU {} and HDU {} have identical EXTNAME \"{}\", EXTVER, and XTENSION values.",
                    a.hdunum, b.hdunum, b.extname
                );
                // Attribute the finding to the later of the pair.
                let saved = v.curhdu;
                v.curhdu = j + 1;
                v.warn(ErrorCode::DuplicateExtname, &text, false);
                v.curhdu = saved;
            }
        }
    }
}

/// Check for content past the last HDU: first extra whole HDUs, then loose
/// trailing bytes after the final 2880-byte block.
pub(crate) fn test_end(v: &mut Verifier, reader: &mut dyn FitsReader) {
    match reader.move_relative_hdu(1) {
        Ok(_) => {
            v.info("< End-of-File >");
            v.err(
                ErrorCode::ExtraHdus,
                "There are extraneous HDU(s) beyond the end of last HDU.",
                2,
            );
            v.info(" ");
            return;
        }
        Err(Error::EndOfFile) => {}
        Err(e) => {
            v.reader_err_with_stack(ErrorCode::BadHdu, "Bad HDU? ", reader, &e, 2);
            return;
        }
    }

    let (_, _, data_end) = match reader.hdu_byte_range() {
        Ok(range) => range,
        Err(e) => {
            v.reader_err(ErrorCode::Reader, "", &e, 1);
            return;
        }
    };

    // The last byte of the final HDU must exist...
    match reader.position_at_byte(data_end.saturating_sub(1)) {
        Ok(true) => {}
        Ok(false) => {
            let text = format!(
                "Error trying to read last byte of the file at byte {data_end}."
            );
            v.err(ErrorCode::ReadFail, &text, 2);
            v.info("< End-of-File >");
            v.info(" ");
            return;
        }
        Err(e) => {
            v.reader_err(ErrorCode::Reader, "", &e, 1);
            return;
        }
    }

    // ...and the byte after it must not.
    if let Ok(true) = reader.position_at_byte(data_end) {
        v.info("< End-of-File >");
        let text = format!("File has extra byte(s) after last HDU at byte {data_end}.");
        v.err(ErrorCode::ExtraBytes, &text, 2);
        v.info(" ");
    }
}

/// Print the per-HDU error summary table.
pub(crate) fn hdus_summary(v: &mut Verifier) {
    v.separator('+', " Error Summary  ", 60);
    v.info(" ");
    v.info(" HDU#  Name (version)       Type             Warnings  Errors");

    let mut rows: Vec<String> = Vec::with_capacity(v.hdu_dir.len());
    for rec in &v.hdu_dir {
        let mut name = rec.extname.clone();
        if rec.extver != 0 {
            name.push_str(&format!(" ({})", rec.extver));
        }
        rows.push(format!(
            " {:<5} {:<20} {:<16} {:<9} {:<6}",
            rec.hdunum, name, rec.kind, rec.wrnno, rec.errnum
        ));
    }
    for row in rows {
        v.info(&row);
    }

    let (e, w) = v.num_err_wrn();
    if e != 0 || w != 0 {
        let row = format!(" End-of-file {:<30} {:<9} {:<6}", "", w, e);
        v.info(&row);
    }
    v.info(" ");
}

/// Close the per-file report: summary, totals, session accumulation, and
/// directory teardown.
pub(crate) fn close_report(v: &mut Verifier) {
    if v.opts.print_summary {
        hdus_summary(v);
    }
    let (errs, wrns) = v.total_errors();
    v.file_total_err = errs;
    v.file_total_warn = wrns;

    let line = format!(
        "**** Verification found {wrns} warning(s) and {errs} error(s). ****"
    );
    v.info(&line);

    v.total_errors += errs;
    v.total_warnings += wrns;
    v.hdu_dir.clear();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codes::Severity;
    use crate::options::Options;
    use std::sync::{Arc, Mutex};

    fn collector() -> (Verifier, Arc<Mutex<Vec<(Severity, ErrorCode, usize, String)>>>) {
        let mut v = Verifier::new(Options::default());
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        v.set_output_callback(move |d| {
            sink.lock()
                .unwrap()
                .push((d.severity, d.code, d.hdu, d.text.to_string()));
        });
        (v, seen)
    }

    #[test]
    fn directory_round_trip() {
        let (mut v, _) = collector();
        v.init_hdu_directory(3);
        v.set_hduname(2, HduKind::BinaryTable, "EVENTS", 1);
        assert_eq!(v.hdu_dir[1].extname, "EVENTS");
        assert_eq!(v.hdu_dir[1].extver, 1);
        assert_eq!(v.hdu_dir[0].extname, "");
    }

    #[test]
    fn set_hduerr_snapshots_and_resets() {
        let (mut v, _) = collector();
        v.init_hdu_directory(1);
        v.err(ErrorCode::MissingKeyword, "missing NAXIS", 1);
        v.warn(ErrorCode::Deprecated, "EPOCH", false);
        v.set_hduerr(1);
        assert_eq!(v.hdu_dir[0].errnum, 1);
        assert_eq!(v.hdu_dir[0].wrnno, 1);
        assert_eq!(v.num_err_wrn(), (0, 0));
    }

    #[test]
    fn totals_include_residual_counts() {
        let (mut v, _) = collector();
        v.init_hdu_directory(2);
        v.err(ErrorCode::MissingKeyword, "e1", 1);
        v.set_hduerr(1);
        v.err(ErrorCode::MissingKeyword, "e2", 1);
        v.err(ErrorCode::MissingKeyword, "e3", 1);
        v.set_hduerr(2);
        // File-level residual.
        v.err(ErrorCode::ExtraBytes, "trailing", 2);
        assert_eq!(v.total_errors(), (4, 0));
    }

    #[test]
    fn totals_when_unopened() {
        let (v, _) = collector();
        assert_eq!(v.total_errors(), (1, 0));
    }

    #[test]
    fn duplicate_names_detected_and_attributed() {
        let (mut v, seen) = collector();
        v.init_hdu_directory(3);
        v.set_hduname(1, HduKind::Primary, "", 0);
        v.set_hduname(2, HduKind::BinaryTable, "DUPLICATE", 1);
        v.set_hduname(3, HduKind::BinaryTable, "DUPLICATE", 1);
        test_duplicate_names(&mut v);
        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].1, ErrorCode::DuplicateExtname);
        assert_eq!(seen[0].2, 3);
        assert!(seen[0].3.contains("HDU 2"));
        assert!(seen[0].3.contains("HDU 3"));
    }

    #[test]
    fn duplicate_names_require_same_type_and_version() {
        let (mut v, seen) = collector();
        v.init_hdu_directory(3);
        v.set_hduname(2, HduKind::BinaryTable, "SCI", 1);
        v.set_hduname(3, HduKind::Image, "SCI", 1);
        test_duplicate_names(&mut v);
        assert!(seen.lock().unwrap().is_empty());

        v.set_hduname(3, HduKind::BinaryTable, "SCI", 2);
        test_duplicate_names(&mut v);
        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn empty_extnames_never_collide() {
        let (mut v, seen) = collector();
        v.init_hdu_directory(2);
        v.set_hduname(1, HduKind::Primary, "", 0);
        v.set_hduname(2, HduKind::Image, "", 0);
        test_duplicate_names(&mut v);
        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn close_report_accumulates_session_totals() {
        let (mut v, _) = collector();
        v.init_hdu_directory(1);
        v.err(ErrorCode::MissingKeyword, "e", 1);
        v.set_hduerr(1);
        close_report(&mut v);
        assert_eq!(v.totals(), (1, 0));
        assert!(v.hdu_dir.is_empty());
        // Second file.
        v.reset_file_state();
        v.init_hdu_directory(1);
        v.warn(ErrorCode::Deprecated, "w", false);
        v.set_hduerr(1);
        close_report(&mut v);
        assert_eq!(v.totals(), (1, 1));
    }
}
