//! The closed error-code catalog and diagnostic severities.
//!
//! Numeric values are part of the public API: they appear in JSON reports and
//! in callback diagnostics, and once assigned they are never reused. The
//! catalog is partitioned into ranges with gaps left for extension.

use serde::{Serialize, Serializer};

/// Severity attached to every diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Surface-only chatter; never counted.
    Info,
    /// Counted as a warning.
    Warning,
    /// Counted as an error.
    Error,
    /// Counted as an error; reported even in severe-only mode.
    Severe,
}

/// Stable numeric code identifying each diagnostic condition.
///
/// Ranges: 100-149 file/HDU structure, 150-199 mandatory keywords,
/// 200-249 keyword format, 250-299 HDU-type keyword placement,
/// 300-349 table structure, 350-399 data validation, 400-419 WCS,
/// 450-479 reader, 480-499 internal, 500-599 warnings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum ErrorCode {
    /// No condition; used by informational output.
    Ok = 0,

    // ---- File / HDU structure (100-149) ----
    /// Extraneous HDU(s) beyond the end of the last expected HDU.
    ExtraHdus = 101,
    /// Extra bytes after the final 2880-byte block of the last HDU.
    ExtraBytes = 102,
    /// The HDU structure itself could not be parsed.
    BadHdu = 103,
    /// A read from the underlying stream failed.
    ReadFail = 104,

    // ---- Mandatory keywords (150-199) ----
    /// A mandatory keyword is absent.
    MissingKeyword = 150,
    /// A mandatory keyword is present but out of sequence.
    KeywordOrder = 151,
    /// A mandatory keyword appears more than once.
    KeywordDuplicate = 152,
    /// A mandatory keyword has an illegal value.
    KeywordValue = 153,
    /// A mandatory keyword has the wrong datatype.
    KeywordType = 154,
    /// The END card is missing.
    MissingEnd = 155,
    /// Columns 9-80 of the END card are not blank.
    EndNotBlank = 156,
    /// A mandatory keyword is not in fixed format.
    NotFixedFormat = 157,

    // ---- Keyword format / value (200-249) ----
    /// Header contains bytes outside printable ASCII.
    NonAsciiHeader = 200,
    /// Keyword name contains an illegal character.
    IllegalNameChar = 201,
    /// Keyword name is not left justified in columns 1-8.
    NameNotJustified = 202,
    /// Value field does not follow FITS value syntax.
    BadValueFormat = 203,
    /// Value and comment are not separated by a slash.
    NoValueSeparator = 204,
    /// String value contains non-text characters.
    BadString = 205,
    /// String value is missing its closing quote.
    MissingQuote = 206,
    /// Logical value is not T or F.
    BadLogical = 207,
    /// Numeric value is malformed.
    BadNumber = 208,
    /// Floating-point exponent uses lowercase d or e.
    LowercaseExponent = 209,
    /// Complex value is malformed.
    ComplexFormat = 210,
    /// Comment contains non-text characters.
    BadComment = 211,
    /// Value does not match any recognized FITS type.
    UnknownType = 212,
    /// Keyword value has the wrong type for this keyword.
    WrongType = 213,
    /// Keyword has no value where one is required.
    NullValue = 214,
    /// Card is longer than 80 characters.
    CardTooLong = 215,
    /// Commentary text contains non-text characters.
    NontextChars = 216,
    /// Quoted value begins with leading space(s).
    LeadingSpace = 217,
    /// Reserved keyword carries an illegal value.
    ReservedValue = 218,

    // ---- HDU-type keyword placement (250-299) ----
    /// XTENSION keyword found in the primary HDU.
    XtensionInPrimary = 250,
    /// Image-only keyword found in a table HDU.
    ImageKeyInTable = 251,
    /// Table-only keyword found in an image HDU.
    TableKeyInImage = 252,
    /// SIMPLE/EXTEND/BLOCKED found in an extension.
    PrimaryKeyInExt = 253,
    /// Table-form WCS keyword found in an image HDU.
    TableWcsInImage = 254,
    /// Keyword not permitted in this HDU type.
    KeywordNotAllowed = 255,

    // ---- Table structure (300-349) ----
    /// TFIELDS disagrees with the TFORMn keywords present.
    BadTfields = 300,
    /// NAXIS1 disagrees with the sum of the column widths.
    Naxis1Mismatch = 301,
    /// TFORMn is not a valid column format.
    BadTform = 302,
    /// TDISPn is invalid or inconsistent with the column type.
    BadTdisp = 303,
    /// Indexed column keyword has index > TFIELDS.
    IndexExceedsTfields = 304,
    /// TSCALn/TZEROn on a string, logical, or bit column.
    TscalWrongType = 305,
    /// TNULLn on a floating-point column.
    TnullWrongType = 306,
    /// BLANK on a floating-point image.
    BlankWrongType = 307,
    /// THEAP present while PCOUNT = 0.
    TheapNoPcount = 308,
    /// TDIMn in an ASCII table.
    TdimInAscii = 309,
    /// TBCOLn in a binary table.
    TbcolInBinary = 310,
    /// Malformed variable-length array format descriptor.
    VarFormat = 311,
    /// TBCOLn positions are inconsistent with NAXIS1.
    TbcolMismatch = 312,

    // ---- Data validation (350-399) ----
    /// Variable-length array longer than the TFORMn maximum.
    VarExceedsMaxlen = 350,
    /// Variable-length array extends beyond the heap.
    VarExceedsHeap = 351,
    /// Bit column fill bits are not zero.
    BitNotJustified = 352,
    /// Logical column byte is not 'T', 'F', or 0.
    BadLogicalData = 353,
    /// String column contains non-ASCII text.
    NonAsciiData = 354,
    /// ASCII table floating-point field has no decimal point.
    NoDecimal = 355,
    /// ASCII table numeric field has an embedded space.
    EmbeddedSpace = 356,
    /// ASCII table contains non-ASCII characters.
    NonAsciiTable = 357,
    /// Data fill area has the wrong fill byte.
    DataFill = 358,
    /// Header fill area after END is not all blanks.
    HeaderFill = 359,
    /// Gap between ASCII table columns contains non-printable bytes.
    AsciiGap = 360,

    // ---- WCS (400-419) ----
    /// WCSAXES appears after other WCS keywords.
    WcsaxesOrder = 400,
    /// WCS keyword axis index exceeds WCSAXES.
    WcsIndex = 401,

    // ---- Reader (450-479) ----
    /// The reader reported a failure.
    Reader = 450,
    /// The reader reported a failure with an error stack.
    ReaderStack = 451,

    // ---- Internal / abort (480-499) ----
    /// The per-file error cap was exceeded; verification aborted.
    TooManyErrors = 480,
    /// An internal invariant was violated.
    Internal = 481,

    // ---- Warnings (500-599) ----
    /// SIMPLE = F.
    SimpleFalse = 500,
    /// Deprecated keyword (EPOCH, BLOCKED) present.
    Deprecated = 501,
    /// Two HDUs share EXTNAME, EXTVER, and type.
    DuplicateExtname = 502,
    /// BSCALE or TSCALn is zero.
    ZeroScale = 503,
    /// BLANK or TNULLn outside the datatype range.
    TnullRange = 504,
    /// TFORMn 'rAw' repeat is not a multiple of the width.
    RawNotMultiple = 505,
    /// DATE uses the two-digit-year form with year < 10.
    Y2kDate = 506,
    /// WCS keyword index exceeds NAXIS with no WCSAXES present.
    WcsIndexWarn = 507,
    /// Non-commentary keyword duplicated.
    DuplicateKeyword = 508,
    /// Column name contains unusual characters.
    BadColumnName = 509,
    /// Column has no TTYPEn name.
    NoColumnName = 510,
    /// Two columns share the same name.
    DuplicateColumn = 511,
    /// CHECKSUM or DATASUM does not verify.
    BadChecksum = 512,
    /// Long strings used without the LONGSTRN keyword.
    MissingLongstrn = 513,
    /// Variable-length descriptor value exceeds 32-bit range in 'P' format.
    VarExceeds32bit = 514,
    /// Duplicated HIERARCH keyword.
    HierarchDuplicate = 515,
    /// PCOUNT > 0 but no variable-length columns exist.
    PcountNoVla = 516,
    /// Column name contains the continuation character '&'.
    ContinueChar = 517,
    /// Deprecated Random Groups structure present.
    RandomGroups = 518,
    /// Legacy XTENSION value (A3DTABLE, IUEIMAGE, FOREIGN, DUMP).
    LegacyXtension = 519,
    /// TIMESYS value is not a recognized time scale.
    TimesysValue = 520,
    /// INHERIT present in a primary HDU that has data.
    InheritPrimary = 521,
}

impl ErrorCode {
    /// The stable numeric value of this code.
    pub fn value(self) -> u16 {
        self as u16
    }
}

impl Serialize for ErrorCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u16(self.value())
    }
}
