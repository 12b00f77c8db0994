//! Pure Rust FITS standards-compliance verifier.
//!
//! Walk a FITS byte stream HDU by HDU and check it against the FITS
//! Standard: mandatory keyword sequences, keyword formats and placement,
//! indexed column keywords, WCS keywords, table data values, fill areas,
//! and checksums. Every finding flows through a structured diagnostic
//! pipeline carrying a severity, a stable numeric error code, the HDU
//! index, and optional fix-hint/explanation text.
//!
//! ```no_run
//! use fitsverify::{Options, Verifier};
//!
//! let mut verifier = Verifier::new(Options::default());
//! let result = verifier.verify_file("m101.fits")?;
//! println!("{} errors, {} warnings", result.num_errors, result.num_warnings);
//! # Ok::<(), fitsverify::Error>(())
//! ```
//!
//! The validation core is parameterized over the [`reader::FitsReader`]
//! capability; the bundled [`reader::MemReader`] reads from memory or a
//! file and keeps no global state, so independent [`Verifier`] instances
//! may run on parallel threads. No public entry point panics; verification
//! problems are reported, never thrown.
#![warn(missing_docs)]

/// FITS 2880-byte block constants and helpers.
pub mod block;
/// Header card parsing and keyword type checking.
pub mod card;
/// HDU checksum verification (CHECKSUM/DATASUM).
pub mod checksum;
/// Error-code catalog and diagnostic severities.
pub mod codes;
/// The diagnostic pipeline and output sinks.
pub mod diagnostic;
/// Reader and driver error types.
pub mod error;
/// Verification options.
pub mod options;
/// The reader capability and the in-memory implementation.
pub mod reader;
/// TFORM column-format parsing.
pub mod tform;
/// The per-verification state object.
pub mod verifier;

mod data;
mod driver;
mod file;
mod header;
mod hints;

pub use codes::{ErrorCode, Severity};
pub use diagnostic::Diagnostic;
pub use error::{Error, Result};
pub use options::{OptionKey, Options};
pub use reader::{FitsReader, HduKind, MemReader};
pub use verifier::{FileResult, Verifier};

/// Crate version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Version of the bundled pure-Rust FITS reader. Reported in the JSON
/// schema slot historically occupied by the CFITSIO version.
pub const READER_VERSION: &str = env!("CARGO_PKG_VERSION");
