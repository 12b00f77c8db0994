//! Verification options.

/// Identifies a single option for [`Options::set`] / [`Options::get`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKey {
    /// List every header keyword in the report.
    PrintHeader,
    /// Print the per-HDU error summary table at the end of each file.
    PrintSummary,
    /// Read and test table data values.
    TestData,
    /// Verify CHECKSUM / DATASUM keywords.
    TestChecksum,
    /// Test header and data fill areas.
    TestFill,
    /// Check HEASARC convention keywords.
    HeasarcConventions,
    /// Check ESO HIERARCH keywords.
    TestHierarch,
    /// Report floor: 0 = all, 1 = errors only, 2 = severe only.
    ErrorReport,
    /// Attach fix hints to diagnostics.
    FixHints,
    /// Attach explanations to diagnostics.
    Explain,
}

/// Per-verification option set.
///
/// An `Options` value is captured by the verifier at construction and never
/// mutates during a verification run.
#[derive(Debug, Clone)]
pub struct Options {
    /// List every header keyword in the report.
    pub print_header: bool,
    /// Print the per-HDU error summary table at the end of each file.
    pub print_summary: bool,
    /// Read and test table data values.
    pub test_data: bool,
    /// Verify CHECKSUM / DATASUM keywords.
    pub test_checksum: bool,
    /// Test header and data fill areas.
    pub test_fill: bool,
    /// Check HEASARC convention keywords.
    pub heasarc_conventions: bool,
    /// Check ESO HIERARCH keywords.
    pub test_hierarch: bool,
    /// Report floor: 0 = all, 1 = errors only, 2 = severe only.
    pub error_report: u8,
    /// Attach fix hints to diagnostics.
    pub fix_hints: bool,
    /// Attach explanations to diagnostics.
    pub explain: bool,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            print_header: false,
            print_summary: true,
            test_data: true,
            test_checksum: true,
            test_fill: true,
            heasarc_conventions: true,
            test_hierarch: false,
            error_report: 0,
            fix_hints: false,
            explain: false,
        }
    }
}

impl Options {
    /// Set a single option by key. Boolean options treat any non-zero
    /// value as true; `ErrorReport` is clamped to 0..=2.
    pub fn set(&mut self, key: OptionKey, value: i32) {
        let flag = value != 0;
        match key {
            OptionKey::PrintHeader => self.print_header = flag,
            OptionKey::PrintSummary => self.print_summary = flag,
            OptionKey::TestData => self.test_data = flag,
            OptionKey::TestChecksum => self.test_checksum = flag,
            OptionKey::TestFill => self.test_fill = flag,
            OptionKey::HeasarcConventions => self.heasarc_conventions = flag,
            OptionKey::TestHierarch => self.test_hierarch = flag,
            OptionKey::ErrorReport => self.error_report = value.clamp(0, 2) as u8,
            OptionKey::FixHints => self.fix_hints = flag,
            OptionKey::Explain => self.explain = flag,
        }
    }

    /// Read a single option by key.
    pub fn get(&self, key: OptionKey) -> i32 {
        match key {
            OptionKey::PrintHeader => self.print_header as i32,
            OptionKey::PrintSummary => self.print_summary as i32,
            OptionKey::TestData => self.test_data as i32,
            OptionKey::TestChecksum => self.test_checksum as i32,
            OptionKey::TestFill => self.test_fill as i32,
            OptionKey::HeasarcConventions => self.heasarc_conventions as i32,
            OptionKey::TestHierarch => self.test_hierarch as i32,
            OptionKey::ErrorReport => self.error_report as i32,
            OptionKey::FixHints => self.fix_hints as i32,
            OptionKey::Explain => self.explain as i32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_KEYS: [OptionKey; 10] = [
        OptionKey::PrintHeader,
        OptionKey::PrintSummary,
        OptionKey::TestData,
        OptionKey::TestChecksum,
        OptionKey::TestFill,
        OptionKey::HeasarcConventions,
        OptionKey::TestHierarch,
        OptionKey::ErrorReport,
        OptionKey::FixHints,
        OptionKey::Explain,
    ];

    #[test]
    fn defaults_match_original_tool() {
        let o = Options::default();
        assert!(!o.print_header);
        assert!(o.print_summary);
        assert!(o.test_data);
        assert!(o.test_checksum);
        assert!(o.test_fill);
        assert!(o.heasarc_conventions);
        assert!(!o.test_hierarch);
        assert_eq!(o.error_report, 0);
        assert!(!o.fix_hints);
        assert!(!o.explain);
    }

    #[test]
    fn set_then_get_round_trips() {
        for key in ALL_KEYS {
            let range: &[i32] = if key == OptionKey::ErrorReport {
                &[0, 1, 2]
            } else {
                &[0, 1]
            };
            for &v in range {
                let mut o = Options::default();
                o.set(key, v);
                assert_eq!(o.get(key), v, "round trip failed for {key:?} = {v}");
            }
        }
    }

    #[test]
    fn error_report_clamps() {
        let mut o = Options::default();
        o.set(OptionKey::ErrorReport, 9);
        assert_eq!(o.get(OptionKey::ErrorReport), 2);
        o.set(OptionKey::ErrorReport, -3);
        assert_eq!(o.get(OptionKey::ErrorReport), 0);
    }
}
