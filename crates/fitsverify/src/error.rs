use std::io;

/// All errors the reader and driver can report.
///
/// Standards violations found in a file are never surfaced through this type;
/// they flow through the diagnostic pipeline. `Error` covers only conditions
/// that prevent the verifier from reading the stream at all, plus the
/// internal failures a [`crate::reader::FitsReader`] implementation may hit
/// while servicing a capability call.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The file could not be opened or read from disk.
    #[error("cannot open {path}: {source}")]
    Open {
        /// Path as given by the caller.
        path: String,
        /// Underlying I/O failure.
        source: io::Error,
    },
    /// The stream is too short or does not begin with a FITS header.
    #[error("not a FITS file: {0}")]
    NotFits(&'static str),
    /// A header ran past the end of the stream without an END card.
    #[error("END keyword not found before end of stream")]
    MissingEnd,
    /// A read touched bytes past the end of the stream.
    #[error("unexpected end of file")]
    UnexpectedEof,
    /// Relative HDU movement ran past the last HDU.
    #[error("end of file: no further HDUs")]
    EndOfFile,
    /// An HDU index outside `1..=hdu_count` was requested.
    #[error("no HDU number {0} in this file")]
    NoSuchHdu(usize),
    /// A column index outside `1..=TFIELDS` was requested.
    #[error("no column number {0} in this table")]
    NoSuchColumn(usize),
    /// A card index outside the current header was requested.
    #[error("no card number {0} in this header")]
    NoSuchCard(usize),
    /// A TFORMn value could not be parsed as a column format.
    #[error("cannot parse TFORM value {0:?}")]
    InvalidTform(String),
    /// A required structural keyword is absent from the current header.
    #[error("missing required keyword: {0}")]
    MissingKeyword(&'static str),
    /// The requested operation does not apply to the current HDU type.
    #[error("operation not valid for this HDU type")]
    WrongHduType,
    /// Arithmetic on header-declared sizes overflowed.
    #[error("header-declared size overflows: {0}")]
    SizeOverflow(&'static str),
    /// An I/O error from the standard library.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_missing_end() {
        let e = Error::MissingEnd;
        assert_eq!(e.to_string(), "END keyword not found before end of stream");
    }

    #[test]
    fn display_no_such_hdu() {
        let e = Error::NoSuchHdu(4);
        assert_eq!(e.to_string(), "no HDU number 4 in this file");
    }

    #[test]
    fn display_invalid_tform() {
        let e = Error::InvalidTform("3Z".into());
        assert_eq!(e.to_string(), "cannot parse TFORM value \"3Z\"");
    }

    #[test]
    fn io_error_from_conversion() {
        let io_err = io::Error::other("oops");
        let e: Error = io_err.into();
        assert!(matches!(e, Error::Io(_)));
    }

    #[test]
    fn open_error_keeps_path() {
        let e = Error::Open {
            path: "missing.fits".into(),
            source: io::Error::new(io::ErrorKind::NotFound, "no such file"),
        };
        let text = e.to_string();
        assert!(text.contains("missing.fits"));
        assert!(text.contains("no such file"));
    }
}
