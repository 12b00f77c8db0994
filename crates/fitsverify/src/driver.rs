//! Verification drivers: open a stream, walk its HDUs, run the file-level
//! checks, close the report.
//!
//! The HDU loop checks the abort flag at every boundary; an abort never
//! unwinds, it simply stops further validation while the normal cleanup and
//! report-closing path still runs.

use std::path::Path;

use tracing::debug;

use crate::codes::ErrorCode;
use crate::data::verify_data;
use crate::error::Result;
use crate::file::{close_report, test_duplicate_names, test_end};
use crate::header::{init_hdu, verify_header};
use crate::reader::{FitsReader, MemReader};
use crate::verifier::{FileResult, Verifier};

impl Verifier {
    /// Verify a FITS file on disk.
    ///
    /// Returns `Err` only when the reader could not open the stream at all;
    /// a verification that merely found problems still returns `Ok` with
    /// the counts in the [`FileResult`].
    pub fn verify_file(&mut self, path: impl AsRef<Path>) -> Result<FileResult> {
        let path = path.as_ref();
        self.reset_file_state();
        self.info(" ");
        let line = format!("File: {}", path.display());
        self.info(&line);

        match MemReader::open_file(path) {
            Ok(mut reader) => self.run(&mut reader),
            Err(e) => {
                self.reader_err(ErrorCode::Reader, "Failed to open the file: ", &e, 2);
                self.info("**** Abort Verification: Fatal Error. ****");
                Err(e)
            }
        }
    }

    /// Verify a FITS stream held in memory. `label` is used in the report
    /// in place of a file name.
    pub fn verify_bytes(&mut self, data: &[u8], label: Option<&str>) -> Result<FileResult> {
        let label = label.unwrap_or("<memory>");
        self.reset_file_state();
        self.info(" ");
        let line = format!("File: {label}");
        self.info(&line);

        match MemReader::open_bytes(data.to_vec(), label) {
            Ok(mut reader) => self.run(&mut reader),
            Err(e) => {
                self.reader_err(ErrorCode::Reader, "Failed to open the stream: ", &e, 2);
                self.info("**** Abort Verification: Fatal Error. ****");
                Err(e)
            }
        }
    }

    /// Verify through a caller-supplied [`FitsReader`]. The reader must be
    /// positioned at a freshly opened stream; the verifier owns it for the
    /// duration of the call.
    pub fn verify_with_reader(&mut self, reader: &mut dyn FitsReader) -> Result<FileResult> {
        self.reset_file_state();
        self.info(" ");
        let line = format!("File: {}", reader.label());
        self.info(&line);
        self.run(reader)
    }

    fn run(&mut self, reader: &mut dyn FitsReader) -> Result<FileResult> {
        let totalhdu = match reader.hdu_count() {
            Ok(n) => n,
            Err(e) => {
                self.reader_err_with_stack(ErrorCode::Reader, "", reader, &e, 2);
                self.info("**** Abort Verification: Fatal Error. ****");
                return Err(e);
            }
        };
        debug!(label = %reader.label(), totalhdu, "verifying");

        self.totalhdu = totalhdu;
        let line = format!("{totalhdu} Header-Data Units in this file.");
        self.info(&line);
        self.info(" ");
        self.init_hdu_directory(totalhdu);
        self.reset_err_wrn();

        for hdunum in 1..=totalhdu {
            if self.aborted {
                break;
            }
            self.curhdu = hdunum;
            match reader.move_to_hdu(hdunum) {
                Ok(kind) => {
                    self.curtype = kind;
                    match init_hdu(self, reader, hdunum, kind) {
                        Ok(view) => {
                            verify_header(self, reader, &view);
                            verify_data(self, reader, &view);
                            self.set_hduname(hdunum, kind, &view.extname, view.extver);
                        }
                        Err(e) => {
                            self.reader_err_with_stack(
                                ErrorCode::BadHdu,
                                "Cannot read the header: ",
                                reader,
                                &e,
                                2,
                            );
                        }
                    }
                }
                Err(e) => {
                    self.reader_err_with_stack(
                        ErrorCode::BadHdu,
                        "Cannot move to the HDU: ",
                        reader,
                        &e,
                        2,
                    );
                }
            }
            self.set_hduerr(hdunum);
        }

        // File-level checks run with HDU index 0.
        self.curhdu = 0;
        if !self.aborted {
            test_end(self, reader);
        }
        test_duplicate_names(self);
        close_report(self);

        let result = FileResult {
            num_errors: self.file_total_err,
            num_warnings: self.file_total_warn,
            num_hdus: totalhdu,
            aborted: self.aborted,
        };
        debug!(
            errors = result.num_errors,
            warnings = result.num_warnings,
            aborted = result.aborted,
            "verification finished"
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::{BLOCK_SIZE, CARD_SIZE};
    use crate::options::Options;

    fn make_card(s: &str) -> [u8; CARD_SIZE] {
        let mut buf = [b' '; CARD_SIZE];
        buf[..s.len()].copy_from_slice(s.as_bytes());
        buf
    }

    fn minimal_image() -> Vec<u8> {
        let cards = [
            "SIMPLE  =                    T",
            "BITPIX  =                   16",
            "NAXIS   =                    2",
            "NAXIS1  =                   10",
            "NAXIS2  =                   10",
        ];
        let mut data = vec![b' '; BLOCK_SIZE];
        for (i, c) in cards.iter().enumerate() {
            data[i * CARD_SIZE..(i + 1) * CARD_SIZE].copy_from_slice(&make_card(c));
        }
        data[5 * CARD_SIZE..6 * CARD_SIZE].copy_from_slice(&make_card("END"));
        data.resize(2 * BLOCK_SIZE, 0);
        data
    }

    fn quiet_verifier() -> Verifier {
        let mut v = Verifier::new(Options::default());
        v.set_quiet();
        v
    }

    #[test]
    fn verify_clean_bytes() {
        let mut v = quiet_verifier();
        let result = v.verify_bytes(&minimal_image(), Some("clean")).unwrap();
        assert_eq!(result.num_errors, 0);
        assert_eq!(result.num_warnings, 0);
        assert_eq!(result.num_hdus, 1);
        assert!(!result.aborted);
    }

    #[test]
    fn per_file_counters_match_result() {
        let mut v = quiet_verifier();
        let mut data = minimal_image();
        // Corrupt BITPIX into an illegal value.
        data[CARD_SIZE..2 * CARD_SIZE].copy_from_slice(&make_card("BITPIX  =                   99"));
        let result = v.verify_bytes(&data, None).unwrap();
        assert!(result.num_errors >= 1);
        assert_eq!(result.num_errors, v.file_total_err);
        assert_eq!(result.num_warnings, v.file_total_warn);
    }

    #[test]
    fn session_totals_accumulate_across_files() {
        let mut v = quiet_verifier();
        let mut bad = minimal_image();
        bad[CARD_SIZE..2 * CARD_SIZE].copy_from_slice(&make_card("BITPIX  =                   99"));
        let r1 = v.verify_bytes(&bad, None).unwrap();
        let r2 = v.verify_bytes(&bad, None).unwrap();
        let (errs, warns) = v.totals();
        assert_eq!(errs, r1.num_errors + r2.num_errors);
        assert_eq!(warns, r1.num_warnings + r2.num_warnings);
    }

    #[test]
    fn open_failure_returns_err() {
        let mut v = quiet_verifier();
        assert!(v.verify_bytes(b"not a fits file at all", None).is_err());
        assert!(v.verify_file("/definitely/not/here.fits").is_err());
    }

    #[test]
    fn trailing_bytes_detected() {
        let mut v = quiet_verifier();
        let mut data = minimal_image();
        data.push(0x42);
        let result = v.verify_bytes(&data, None).unwrap();
        assert!(result.num_errors >= 1);

        // Exactly data-end: no trailing-byte error.
        let mut v = quiet_verifier();
        let result = v.verify_bytes(&minimal_image(), None).unwrap();
        assert_eq!(result.num_errors, 0);
    }

    #[test]
    fn verify_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clean.fits");
        std::fs::write(&path, minimal_image()).unwrap();
        let mut v = quiet_verifier();
        let result = v.verify_file(&path).unwrap();
        assert_eq!(result.num_errors, 0);
        assert_eq!(result.num_hdus, 1);
    }
}
