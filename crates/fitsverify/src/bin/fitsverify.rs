//! fitsverify — command-line shell around the verification core.
//!
//! Verifies one or more FITS files against the FITS Standard and reports
//! the findings as a text report, a one-line-per-file summary (`-q`), or a
//! JSON document (`--json`). Exits with `min(total_errors + total_warnings,
//! 255)`.

use std::fs;
use std::io::Read;
use std::process;
use std::sync::{Arc, Mutex};

use clap::Parser;
use serde::Serialize;

use fitsverify::{Diagnostic, ErrorCode, OptionKey, Options, Severity, Verifier};

#[derive(Parser, Debug)]
#[command(
    name = "fitsverify",
    version,
    about = "Verify that the input files conform to the FITS Standard.",
    after_help = "Each FILE may be a filename (wildcards are expanded by the shell) or \
                  @listfile.txt, an ASCII file naming one FITS file per line.\n\n\
                  fitsverify exits with a status equal to the number of errors plus \
                  warnings, capped at 255."
)]
struct Cli {
    /// FITS files to verify, or @listfile.txt.
    #[arg(required = true, value_name = "FILE")]
    files: Vec<String>,

    /// List all header keywords.
    #[arg(short = 'l')]
    list_keywords: bool,

    /// Test ESO HIERARCH keywords.
    #[arg(short = 'H')]
    hierarch: bool,

    /// Quiet; print one-line pass/fail summary per file.
    #[arg(short = 'q')]
    quiet: bool,

    /// Only test for error conditions (ignore warnings).
    #[arg(short = 'e', conflicts_with = "severe_only")]
    errors_only: bool,

    /// Only test for the most severe error conditions.
    #[arg(short = 's')]
    severe_only: bool,

    /// Output results as JSON.
    #[arg(long)]
    json: bool,

    /// Show actionable fix suggestions for each error and warning.
    #[arg(long = "fix-hints")]
    fix_hints: bool,

    /// Show detailed explanations for each error and warning.
    #[arg(long)]
    explain: bool,
}

/// Owned copy of one diagnostic for the JSON report. The callback borrows
/// are only valid during dispatch, so the collector copies the strings.
#[derive(Debug, Clone, Serialize)]
struct JsonMessage {
    severity: Severity,
    code: ErrorCode,
    hdu: usize,
    text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    fix_hint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    explain: Option<String>,
}

impl JsonMessage {
    fn from_diagnostic(d: &Diagnostic<'_>) -> Self {
        JsonMessage {
            severity: d.severity,
            code: d.code,
            hdu: d.hdu,
            text: d.text.to_string(),
            fix_hint: d.fix_hint.map(String::from),
            explain: d.explain.map(String::from),
        }
    }
}

fn build_options(cli: &Cli) -> Options {
    let mut opts = Options::default();
    // The standalone tool leaves HEASARC convention checking off; the
    // library default is on.
    opts.set(OptionKey::HeasarcConventions, 0);
    opts.set(OptionKey::PrintHeader, cli.list_keywords as i32);
    opts.set(OptionKey::TestHierarch, cli.hierarch as i32);
    if cli.quiet {
        opts.set(OptionKey::PrintSummary, 0);
    }
    if cli.errors_only {
        opts.set(OptionKey::ErrorReport, 1);
    }
    if cli.severe_only {
        opts.set(OptionKey::ErrorReport, 2);
    }
    opts.set(OptionKey::FixHints, cli.fix_hints as i32);
    opts.set(OptionKey::Explain, cli.explain as i32);
    opts
}

/// Expand `@listfile` arguments into the file list, skipping blank lines.
fn expand_file_args(args: &[String]) -> Result<Vec<String>, String> {
    let mut files = Vec::with_capacity(args.len());
    for arg in args {
        match arg.strip_prefix('@') {
            None => files.push(arg.clone()),
            Some(listpath) => {
                let mut text = String::new();
                fs::File::open(listpath)
                    .and_then(|mut f| f.read_to_string(&mut text))
                    .map_err(|e| format!("Cannot open the list file {listpath}: {e}"))?;
                files.extend(
                    text.lines()
                        .map(str::trim)
                        .filter(|l| !l.is_empty())
                        .map(String::from),
                );
            }
        }
    }
    Ok(files)
}

fn print_banner(verifier: &Verifier) {
    println!(" ");
    let banner = format!("fitsverify {} (pure-Rust FITS reader)", fitsverify::VERSION);
    let pad = 60usize.saturating_sub(banner.len()) / 2;
    println!("{:pad$}{banner}", "");
    println!("{:pad$}{}", "", "-".repeat(banner.len()));
    println!(" ");
    println!(" ");

    if verifier.get_option(OptionKey::ErrorReport) == 2 {
        println!("Caution: Only checking for the most severe FITS format errors.");
    }
    if verifier.get_option(OptionKey::HeasarcConventions) != 0 {
        println!("HEASARC conventions are being checked.");
    }
    if verifier.get_option(OptionKey::TestHierarch) != 0 {
        println!("ESO HIERARCH keywords are being checked.");
    }
}

fn quiet_line(verifier: &Verifier, filename: &str, nerrs: i64, nwarns: i64) {
    if nerrs + nwarns > 0 {
        if verifier.get_option(OptionKey::ErrorReport) != 0 {
            println!("verification FAILED: {filename:<20}, {nerrs} errors");
        } else {
            println!(
                "verification FAILED: {filename:<20}, {nwarns} warnings and {nerrs} errors"
            );
        }
    } else {
        println!("verification OK: {filename:<20}");
    }
}

fn run(cli: Cli) -> i32 {
    let files = match expand_file_args(&cli.files) {
        Ok(files) => files,
        Err(msg) => {
            eprintln!("{msg}");
            return 1;
        }
    };

    let mut verifier = Verifier::new(build_options(&cli));

    if cli.json {
        return run_json(&cli, &mut verifier, &files);
    }

    if cli.quiet {
        verifier.set_quiet();
    } else {
        print_banner(&verifier);
    }

    for filename in &files {
        match verifier.verify_file(filename) {
            Ok(result) => {
                if cli.quiet {
                    quiet_line(&verifier, filename, result.num_errors, result.num_warnings);
                }
            }
            Err(e) => {
                eprintln!("fitsverify: {filename}: {e}");
                return 1;
            }
        }
    }

    let (toterr, totwrn) = verifier.totals();
    (toterr + totwrn).clamp(0, 255) as i32
}

fn run_json(cli: &Cli, verifier: &mut Verifier, files: &[String]) -> i32 {
    let messages: Arc<Mutex<Vec<JsonMessage>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&messages);
    verifier.set_output_callback(move |d| {
        sink.lock().unwrap().push(JsonMessage::from_diagnostic(d));
    });

    let mut file_reports = Vec::with_capacity(files.len());
    let mut fatal = false;

    for filename in files {
        messages.lock().unwrap().clear();
        let outcome = verifier.verify_file(filename);
        let msgs: Vec<JsonMessage> = messages.lock().unwrap().drain(..).collect();
        let report = match &outcome {
            Ok(result) => serde_json::json!({
                "file": filename,
                "messages": msgs,
                "num_errors": result.num_errors,
                "num_warnings": result.num_warnings,
                "num_hdus": result.num_hdus,
                "aborted": result.aborted,
            }),
            Err(_) => serde_json::json!({
                "file": filename,
                "messages": msgs,
                "num_errors": 1,
                "num_warnings": 0,
                "num_hdus": 0,
                "aborted": true,
            }),
        };
        file_reports.push(report);
        if outcome.is_err() {
            fatal = true;
            break;
        }
    }

    let (toterr, totwrn) = verifier.totals();
    let document = serde_json::json!({
        "fitsverify_version": fitsverify::VERSION,
        "cfitsio_version": fitsverify::READER_VERSION,
        "files": file_reports,
        "total_errors": toterr,
        "total_warnings": totwrn,
    });
    match serde_json::to_string_pretty(&document) {
        Ok(text) => println!("{text}"),
        Err(e) => {
            eprintln!("fitsverify: cannot serialize the JSON report: {e}");
            return 1;
        }
    }

    if fatal {
        return 1;
    }
    (toterr + totwrn).clamp(0, 255) as i32
}

fn main() {
    let cli = Cli::parse();
    process::exit(run(cli));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn flags_map_to_options() {
        let cli = parse(&["fitsverify", "-l", "-H", "-e", "--fix-hints", "a.fits"]);
        let opts = build_options(&cli);
        assert_eq!(opts.get(OptionKey::PrintHeader), 1);
        assert_eq!(opts.get(OptionKey::TestHierarch), 1);
        assert_eq!(opts.get(OptionKey::ErrorReport), 1);
        assert_eq!(opts.get(OptionKey::FixHints), 1);
        assert_eq!(opts.get(OptionKey::Explain), 0);
        // CLI default: HEASARC conventions off.
        assert_eq!(opts.get(OptionKey::HeasarcConventions), 0);
    }

    #[test]
    fn severe_flag_sets_report_floor() {
        let cli = parse(&["fitsverify", "-s", "a.fits"]);
        assert_eq!(build_options(&cli).get(OptionKey::ErrorReport), 2);
    }

    #[test]
    fn e_and_s_conflict() {
        assert!(Cli::try_parse_from(["fitsverify", "-e", "-s", "a.fits"]).is_err());
    }

    #[test]
    fn files_are_required() {
        assert!(Cli::try_parse_from(["fitsverify"]).is_err());
    }

    #[test]
    fn quiet_disables_summary() {
        let cli = parse(&["fitsverify", "-q", "a.fits"]);
        assert_eq!(build_options(&cli).get(OptionKey::PrintSummary), 0);
    }

    #[test]
    fn expand_plain_files() {
        let args = vec!["a.fits".to_string(), "b.fits".to_string()];
        assert_eq!(expand_file_args(&args).unwrap(), args);
    }

    #[test]
    fn expand_listfile() {
        let dir = tempfile::tempdir().unwrap();
        let list = dir.path().join("files.txt");
        std::fs::write(&list, "one.fits\n\n  two.fits  \n").unwrap();
        let args = vec![format!("@{}", list.display())];
        assert_eq!(
            expand_file_args(&args).unwrap(),
            vec!["one.fits".to_string(), "two.fits".to_string()]
        );
    }

    #[test]
    fn expand_missing_listfile_errors() {
        let args = vec!["@/no/such/list.txt".to_string()];
        assert!(expand_file_args(&args).is_err());
    }

    #[test]
    fn json_message_serialization_skips_absent_hints() {
        let msg = JsonMessage {
            severity: Severity::Error,
            code: ErrorCode::MissingKeyword,
            hdu: 1,
            text: "missing".into(),
            fix_hint: None,
            explain: None,
        };
        let json = serde_json::to_string(&msg).unwrap();
        assert!(!json.contains("fix_hint"));
        assert!(json.contains("\"code\":150"));
    }
}
