//! Fix hints and explanations.
//!
//! Two layers: a static table mapping every error code to a canonical short
//! fix hint and an explanation citing the FITS Standard, and a contextual
//! overlay that rewrites those strings with the actual keyword name, column
//! number, HDU index, and HDU type from the verifier's hint context. A
//! validator call site may pre-fill either string (e.g. the computed
//! replacement TFORM for an oversized variable-length array); the overlay
//! never overwrites a call-site value.

use crate::codes::ErrorCode;
use crate::reader::HduKind;
use crate::verifier::Verifier;

/// Canonical (fix, explain) text for an error code.
fn static_hint(code: ErrorCode) -> Option<(&'static str, &'static str)> {
    use ErrorCode::*;
    let pair = match code {
        ExtraHdus => (
            "Remove extraneous data after the last valid HDU.",
            "The file contains additional HDU-like structures beyond what is expected. \
             This usually indicates file corruption or an incomplete write.",
        ),
        ExtraBytes => (
            "Truncate the file at the end of the last HDU's 2880-byte block.",
            "FITS files must end exactly at a 2880-byte block boundary after the last \
             HDU. Extra bytes beyond this boundary violate the standard and may \
             indicate file corruption or concatenation errors.",
        ),
        BadHdu => (
            "Check the HDU structure; the header or data section may be malformed.",
            "The HDU could not be parsed correctly. This may indicate a corrupted \
             header, incorrect NAXIS/NAXISn values, or a data section that does not \
             match the header description.",
        ),
        ReadFail => (
            "Check that the file is accessible and not truncated.",
            "An error occurred while reading the file data. The file may be truncated, \
             the disk may have errors, or the file may not be a valid FITS file.",
        ),
        MissingKeyword => (
            "Add the missing mandatory keyword to the header.",
            "Certain keywords are required by the FITS Standard in every HDU. For the \
             primary HDU: SIMPLE, BITPIX, NAXIS, and NAXISn. For extensions: \
             XTENSION, BITPIX, NAXIS, NAXISn, PCOUNT, GCOUNT.",
        ),
        KeywordOrder => (
            "Reorder mandatory keywords to follow the FITS Standard sequence.",
            "Mandatory keywords must appear in a specific order at the beginning of \
             the header. For example, SIMPLE must be first in the primary HDU, \
             followed by BITPIX, NAXIS, and NAXISn in sequence.",
        ),
        KeywordDuplicate => (
            "Remove the duplicate mandatory keyword; it must appear exactly once.",
            "Mandatory keywords must appear only once in a header. Having duplicates \
             creates ambiguity about which value should be used.",
        ),
        KeywordValue => (
            "Correct the keyword value to a legal value per the FITS Standard.",
            "The mandatory keyword has a value that is not permitted by the standard. \
             For example, BITPIX must be one of 8, 16, 32, 64, -32, or -64.",
        ),
        KeywordType => (
            "Change the keyword value to the required datatype (integer, string, etc.).",
            "FITS requires mandatory keywords to have specific datatypes. For example, \
             BITPIX and NAXIS must be integers, not floating-point or string values.",
        ),
        MissingEnd => (
            "Add an END keyword and pad the header to a 2880-byte boundary.",
            "Every FITS header must terminate with an END keyword in columns 1-3, \
             followed by blank-filled records to complete the 2880-byte block.",
        ),
        EndNotBlank => (
            "Fill columns 9-80 of the END keyword record with blank spaces.",
            "The END keyword card must have blanks (ASCII 32) in columns 9 through 80. \
             No other characters are permitted after 'END' on this card.",
        ),
        NotFixedFormat => (
            "Write the mandatory keyword value in fixed format (value in columns 11-30).",
            "Mandatory keywords must use fixed-format notation: the value indicator \
             '= ' in columns 9-10, and the value right-justified in columns 11-30.",
        ),
        NonAsciiHeader => (
            "Replace non-ASCII characters with printable ASCII (codes 32-126).",
            "FITS headers are restricted to the printable ASCII character set (codes \
             32 through 126). Characters outside this range are not permitted.",
        ),
        IllegalNameChar => (
            "Rename the keyword using only uppercase A-Z, digits 0-9, hyphen, and \
             underscore.",
            "FITS keyword names may only contain uppercase Latin letters, digits, \
             hyphens, and underscores. Lowercase letters and other characters are not \
             allowed. The name must be left-justified in columns 1-8.",
        ),
        NameNotJustified => (
            "Left-justify the keyword name in columns 1-8.",
            "Keyword names must start in column 1 with no leading spaces.",
        ),
        BadValueFormat => (
            "Fix the keyword value to conform to FITS value-field syntax.",
            "The value field (columns 11-80) must follow FITS formatting rules: \
             strings in single quotes, integers without decimal points, \
             floating-point with decimal point, logical as T or F in column 30.",
        ),
        NoValueSeparator => (
            "Add a '/' separator between the value and comment fields.",
            "When both a value and comment are present, they must be separated by a \
             slash character '/'. The slash should follow the value.",
        ),
        BadString => (
            "Ensure string values contain only printable ASCII characters.",
            "String keyword values (enclosed in single quotes) must contain only \
             printable ASCII characters (codes 32-126). Control characters and \
             non-ASCII bytes are not permitted.",
        ),
        MissingQuote => (
            "Add the missing closing single quote to the string value.",
            "String values must be enclosed in single quotes. A string that starts \
             with a quote in column 11 must have a matching closing quote within \
             columns 11-80 (or use the CONTINUE long-string convention).",
        ),
        BadLogical => (
            "Set the logical value to T or F in column 30.",
            "Logical (boolean) keyword values must be the character T (true) or \
             F (false) in column 30, with spaces in columns 11-29.",
        ),
        BadNumber => (
            "Fix the numeric value to use valid FITS integer or floating-point format.",
            "Numeric values must follow Fortran-style formatting: integers with \
             optional sign, floating-point with a decimal point, and optional \
             exponent using 'E' or 'D'.",
        ),
        LowercaseExponent => (
            "Change the lowercase exponent letter (d/e) to uppercase (D/E).",
            "The FITS Standard requires that exponent indicators in floating-point \
             values use uppercase 'E' or 'D', not lowercase.",
        ),
        ComplexFormat => (
            "Format the complex value as (real, imaginary) with proper parentheses \
             and comma.",
            "Complex keyword values must be written as two numbers enclosed in \
             parentheses and separated by a comma, e.g. (1.0, 2.0).",
        ),
        BadComment => (
            "Remove non-printable characters from the comment field.",
            "Comments (after the '/' separator) may only contain printable ASCII \
             characters.",
        ),
        UnknownType => (
            "Check that the keyword value conforms to one of the FITS value types.",
            "The keyword value does not match any recognized FITS type (string, \
             integer, floating-point, complex, or logical). Verify the formatting.",
        ),
        WrongType => (
            "Change the keyword value to the expected datatype.",
            "This keyword is expected to have a specific datatype (e.g., string, \
             integer) but the value found is of a different type.",
        ),
        NullValue => (
            "Provide a value for the keyword, or remove it if not needed.",
            "The keyword has no value (the value field is blank). If the keyword is \
             intended to carry information, it needs a valid value.",
        ),
        CardTooLong => (
            "Ensure the header card does not exceed 80 characters.",
            "Each FITS header record is exactly 80 characters. Cards longer than 80 \
             characters violate the standard.",
        ),
        NontextChars => (
            "Remove non-text characters from the string value.",
            "String values should contain only text characters. Control characters or \
             other non-printable bytes are not permitted.",
        ),
        LeadingSpace => (
            "Remove leading spaces from the keyword value.",
            "Certain keyword values (XTENSION, TFORMn, TDISPn, TDIMn) must not have \
             leading spaces within the quoted string.",
        ),
        ReservedValue => (
            "Correct the reserved keyword to its required value.",
            "Reserved keywords (like EXTEND, BLOCKED) have specific allowed values \
             defined by the FITS Standard.",
        ),
        XtensionInPrimary => (
            "Remove the XTENSION keyword from the primary HDU.",
            "XTENSION is used to identify extension HDUs. It must not appear in the \
             primary HDU, which uses the SIMPLE keyword instead.",
        ),
        ImageKeyInTable => (
            "Remove image-specific keywords (BSCALE, BZERO, BUNIT, BLANK, DATAMAX, \
             DATAMIN) from the table HDU.",
            "Keywords like BSCALE, BZERO, BUNIT, BLANK, DATAMAX, and DATAMIN are only \
             valid in image HDUs. In table HDUs, use the column-specific equivalents \
             (TSCALn, TZEROn, TUNITn, TNULLn).",
        ),
        TableKeyInImage => (
            "Remove table-specific keywords (TFIELDS, TTYPEn, TFORMn, etc.) from the \
             image HDU.",
            "Column-related keywords like TFIELDS, TTYPEn, TFORMn, TBCOLn are only \
             valid in table extensions (TABLE or BINTABLE), not in images.",
        ),
        PrimaryKeyInExt => (
            "Remove SIMPLE, EXTEND, or BLOCKED from this extension HDU.",
            "The keywords SIMPLE, EXTEND, and BLOCKED are only valid in the primary \
             HDU. They must not appear in any extension.",
        ),
        TableWcsInImage => (
            "Remove table WCS keywords (TCTYPn, TCRPXn, TCRVLn, etc.) from the image \
             HDU.",
            "Table-specific WCS keywords (those with column index 'n') are only valid \
             in table extensions. Image HDUs use CTYPEn, CRPIXn, CRVALn without the \
             'T' prefix.",
        ),
        KeywordNotAllowed => (
            "Remove the keyword that is not permitted in this HDU type.",
            "This keyword is not valid in the current HDU type. Check the FITS \
             Standard for which keywords are allowed in each HDU type.",
        ),
        BadTfields => (
            "Set TFIELDS to the correct number of columns in the table.",
            "TFIELDS specifies how many columns the table contains. It must match the \
             actual number of TFORMn keywords present.",
        ),
        Naxis1Mismatch => (
            "Adjust NAXIS1 to equal the sum of all column widths.",
            "In a table HDU, NAXIS1 is the number of bytes per row. It must equal the \
             sum of the widths of all columns as specified by TFORMn (and TBCOLn for \
             ASCII tables).",
        ),
        BadTform => (
            "Correct the TFORMn value to a valid FITS column format.",
            "TFORMn specifies the data format for column n. Valid formats include \
             integer widths for ASCII tables (e.g., I10, F12.5) and type codes for \
             binary tables (e.g., 1J, 20A, 1E).",
        ),
        BadTdisp => (
            "Fix TDISPn to be consistent with the column datatype.",
            "TDISPn specifies the display format for column n. It must be compatible \
             with the column's data format (e.g., an integer column should not have a \
             floating-point TDISPn).",
        ),
        IndexExceedsTfields => (
            "Ensure column keyword index n does not exceed the TFIELDS value.",
            "A column-indexed keyword (TTYPEn, TFORMn, etc.) has an index greater than \
             TFIELDS. Either increase TFIELDS or remove the excess keyword.",
        ),
        TscalWrongType => (
            "Remove TSCALn/TZEROn from ASCII, logical, or bit columns.",
            "TSCALn and TZEROn are scaling keywords valid only for numeric binary \
             table columns (integer or floating-point). They are not applicable to \
             ASCII, logical, or bit-type columns.",
        ),
        TnullWrongType => (
            "Remove TNULLn from this floating-point column; use NaN instead.",
            "TNULLn defines a null value for integer columns only. For floating-point \
             columns, IEEE NaN is the standard null representation.",
        ),
        BlankWrongType => (
            "Remove BLANK from this floating-point image; use NaN instead.",
            "The BLANK keyword defines null pixels for integer images only. For \
             floating-point images (BITPIX = -32 or -64), IEEE NaN represents null.",
        ),
        TheapNoPcount => (
            "Remove THEAP or set PCOUNT > 0 to allocate a variable-length data heap.",
            "THEAP specifies the heap offset for variable-length arrays. It is \
             meaningless when PCOUNT = 0 (no heap exists).",
        ),
        TdimInAscii => (
            "Remove TDIMn from the ASCII table; it is only valid for binary tables.",
            "TDIMn defines multi-dimensional array structure for binary table \
             columns. ASCII tables do not support this feature.",
        ),
        TbcolInBinary => (
            "Remove TBCOLn from the binary table; it is only valid for ASCII tables.",
            "TBCOLn specifies the starting column position in ASCII tables. Binary \
             tables use sequential packing based on TFORMn and do not use TBCOLn.",
        ),
        VarFormat => (
            "Fix the variable-length array format descriptor in TFORMn.",
            "Variable-length array columns use the format 'nPt(max)' or 'nQt(max)' \
             where t is the data type code. Check that the format string is valid.",
        ),
        TbcolMismatch => (
            "Correct TBCOLn values so columns are properly positioned within the row.",
            "TBCOLn values must correctly specify the starting byte position of each \
             column, forming a consistent layout that does not exceed NAXIS1.",
        ),
        VarExceedsMaxlen => (
            "Reduce the variable-length array size or increase the maximum in TFORMn.",
            "A variable-length array entry exceeds the maximum length declared in the \
             TFORMn descriptor (the value in parentheses). Either the data is corrupt \
             or the declared maximum is too small.",
        ),
        VarExceedsHeap => (
            "Fix the variable-length array descriptor; its address extends beyond the \
             heap.",
            "The descriptor for a variable-length array column points to an address \
             outside the allocated heap area (beyond PCOUNT bytes after the fixed \
             table). This usually indicates data corruption.",
        ),
        BitNotJustified => (
            "Left-justify the bit values and zero-fill unused trailing bits.",
            "Bit columns (TFORMn = 'nX') must be left-justified, with any unused bits \
             in the last byte set to zero.",
        ),
        BadLogicalData => (
            "Set logical column values to 'T' (true), 'F' (false), or 0 (null).",
            "Logical columns in binary tables may only contain the byte values \
             'T' (0x54), 'F' (0x46), or 0 (null/undefined).",
        ),
        NonAsciiData => (
            "Replace non-ASCII characters in the string column with printable ASCII.",
            "String columns in binary tables must contain only printable ASCII \
             characters or null bytes for padding.",
        ),
        NoDecimal => (
            "Add a decimal point to the floating-point value in the ASCII table.",
            "Floating-point values in ASCII table columns (TFORMn = En.d, Fn.d, Dn.d) \
             must contain a decimal point.",
        ),
        EmbeddedSpace => (
            "Remove embedded spaces from the numeric value in the ASCII table.",
            "Numeric values in ASCII table columns must not contain embedded spaces. \
             Leading spaces are allowed, but spaces within the number are not.",
        ),
        NonAsciiTable => (
            "Replace non-ASCII characters in the ASCII table with valid ASCII.",
            "ASCII tables must contain only ASCII characters (codes 0-127). \
             Characters with values above 127 violate the standard.",
        ),
        DataFill => (
            "Fix data fill bytes: use blanks (0x20) for ASCII tables, zeros (0x00) \
             for others.",
            "Fill bytes after the last row of data must be ASCII blanks (space, 0x20) \
             for ASCII tables, or binary zeros (0x00) for all other HDU types, out to \
             the next 2880-byte boundary.",
        ),
        HeaderFill => (
            "Fill unused header bytes after END with blank spaces (ASCII 32).",
            "All bytes in the header block after the END keyword must be filled with \
             ASCII blank characters (space, code 32) up to the 2880-byte boundary.",
        ),
        AsciiGap => (
            "Replace non-printable characters in ASCII table column gaps.",
            "Gaps between defined columns in ASCII tables (bytes not covered by any \
             TBCOLn/TFORMn range) must contain only printable characters.",
        ),
        WcsaxesOrder => (
            "Move WCSAXES before all other WCS keywords in the header.",
            "When present, the WCSAXES keyword must appear before any other WCS \
             keywords (CRPIXn, CRVALn, CTYPEn, CDELTn, etc.) so that the WCS \
             dimensionality is known before the per-axis keywords are read.",
        ),
        WcsIndex => (
            "Reduce the WCS keyword index to not exceed the WCSAXES value.",
            "WCS keywords with axis indices (CRPIXn, CRVALn, etc.) must have index \
             n <= WCSAXES. Indices beyond this range are invalid.",
        ),
        Reader => (
            "Check the reader error message for details on the I/O or parsing failure.",
            "The FITS reader reported an error while processing the file. This may \
             indicate file corruption, an unsupported feature, or a system I/O \
             problem.",
        ),
        ReaderStack => (
            "Review the reader error stack messages for the root cause.",
            "The FITS reader reported one or more errors. The error stack shows the \
             sequence of operations that led to the failure.",
        ),
        TooManyErrors => (
            "Fix the most critical errors first; the file has too many problems to \
             list completely.",
            "Verification was aborted because the error count exceeded the maximum \
             threshold (200). The file likely has a fundamental structural problem \
             that causes cascading errors.",
        ),
        Internal => (
            "Report this as a verifier defect.",
            "An internal invariant of the verifier was violated. The report may be \
             incomplete.",
        ),
        SimpleFalse => (
            "Set SIMPLE = T unless the file intentionally uses non-standard features.",
            "SIMPLE = F indicates the file may not conform to the FITS Standard. Most \
             FITS readers expect SIMPLE = T.",
        ),
        Deprecated => (
            "Replace deprecated keywords: EPOCH -> EQUINOX, BLOCKED -> (remove).",
            "The EPOCH keyword is deprecated in favor of EQUINOX. The BLOCKED keyword \
             is deprecated and should be removed; it was related to tape blocking \
             which is no longer relevant.",
        ),
        DuplicateExtname => (
            "Give each HDU a unique combination of EXTNAME, EXTVER, and EXTLEVEL.",
            "Multiple HDUs share the same EXTNAME, EXTVER, and EXTLEVEL values. While \
             not strictly forbidden, this makes it impossible to uniquely identify \
             HDUs by name, which breaks many FITS tools.",
        ),
        ZeroScale => (
            "Set BSCALE/TSCALn to a non-zero value.",
            "A scale factor of zero would map all raw values to the same physical \
             value (the offset), which is almost certainly unintended. The standard \
             formula is: physical = raw * BSCALE + BZERO.",
        ),
        TnullRange => (
            "Set BLANK/TNULLn to a value within the valid range for the datatype.",
            "The null value indicator must be representable in the column's or \
             image's datatype. For example, TNULLn for a 16-bit integer column must \
             be between -32768 and 32767.",
        ),
        RawNotMultiple => (
            "Adjust the TFORMn 'rAw' format so r is a multiple of w.",
            "For character columns in binary tables with format rAw, the repeat count \
             r should be a multiple of the character width w. Otherwise the last \
             sub-string is truncated.",
        ),
        Y2kDate => (
            "Use the DATE format 'YYYY-MM-DD' instead of 'DD/MM/YY'.",
            "The old DATE format 'DD/MM/YY' is ambiguous for years near 2000. The \
             FITS Standard requires the ISO 8601 format 'YYYY-MM-DD' (or \
             'YYYY-MM-DDThh:mm:ss').",
        ),
        WcsIndexWarn => (
            "Add a WCSAXES keyword, or ensure WCS indices do not exceed NAXIS.",
            "A WCS keyword has an axis index exceeding NAXIS. If the WCS has more \
             axes than the data (e.g., for celestial + spectral), add WCSAXES to \
             declare the WCS dimensionality.",
        ),
        DuplicateKeyword => (
            "Remove the duplicate keyword or rename one of the copies.",
            "The same keyword appears more than once in the header. Only COMMENT, \
             HISTORY, blank, and CONTINUE keywords may be duplicated.",
        ),
        BadColumnName => (
            "Rename the column using only letters, digits, and underscores.",
            "Column names (TTYPEn) should contain only letters (A-Z, a-z), digits \
             (0-9), and underscores. Other characters may cause problems with FITS \
             processing software.",
        ),
        NoColumnName => (
            "Add a TTYPEn keyword to give the column a descriptive name.",
            "Every table column should have a TTYPEn keyword with a descriptive name. \
             While technically optional, unnamed columns are difficult to work with \
             in most FITS tools.",
        ),
        DuplicateColumn => (
            "Rename one of the duplicate columns to have a unique TTYPEn value.",
            "Multiple columns share the same name. While not forbidden by the \
             standard, duplicate column names cause ambiguity when accessing columns \
             by name.",
        ),
        BadChecksum => (
            "Recompute CHECKSUM and DATASUM using a FITS checksum utility.",
            "The stored CHECKSUM or DATASUM does not match the computed value, \
             indicating the file has been modified since the checksums were written. \
             Recompute them if the current data is correct, or investigate if the \
             file may be corrupt.",
        ),
        MissingLongstrn => (
            "Add 'LONGSTRN = OGIP 1.0' to the header when using CONTINUE long strings.",
            "The header uses CONTINUE keywords for long string values but lacks the \
             LONGSTRN convention keyword that declares this usage.",
        ),
        VarExceeds32bit => (
            "Use 'Q' format (64-bit descriptor) instead of 'P' for large \
             variable-length arrays.",
            "A variable-length array descriptor value exceeds the 32-bit range. The \
             'P' format uses 32-bit descriptors (max ~2 GB). For larger data, use the \
             'Q' format with 64-bit descriptors.",
        ),
        HierarchDuplicate => (
            "Remove or rename the duplicate HIERARCH keyword.",
            "The same HIERARCH keyword appears more than once. Each HIERARCH keyword \
             should be unique within the header.",
        ),
        PcountNoVla => (
            "Set PCOUNT = 0 or add variable-length array columns.",
            "PCOUNT is non-zero (indicating a variable-length data heap exists) but \
             no columns use variable-length array format (P or Q descriptors). The \
             heap space appears unused.",
        ),
        ContinueChar => (
            "Remove the trailing '&' from the column name unless CONTINUE convention \
             is intended.",
            "A column name (TTYPEn) contains an ampersand '&', which is the \
             continuation character used in the CONTINUE long-string convention. This \
             is unusual for a column name and may indicate a formatting error.",
        ),
        RandomGroups => (
            "Convert Random Groups data to a binary table extension.",
            "The Random Groups convention has been deprecated since FITS Standard \
             Version 1. Binary table extensions provide equivalent functionality with \
             better tool support. See FITS Standard Section 7.",
        ),
        LegacyXtension => (
            "Use a standard XTENSION value: IMAGE, TABLE, or BINTABLE.",
            "The FITS Standard defines only three XTENSION values: IMAGE, TABLE, and \
             BINTABLE. Other values (A3DTABLE, IUEIMAGE, FOREIGN, DUMP) are legacy or \
             non-standard and may not be supported by FITS readers.",
        ),
        TimesysValue => (
            "Set TIMESYS to a recognized time scale (e.g., UTC, TAI, TDB, TT).",
            "TIMESYS specifies the time scale for time-related keywords. Allowed \
             values: UTC, TAI, TDB, TT, ET, UT1, UT, TCG, TCB, TDT, IAT, GPS, LOCAL. \
             See FITS Standard Section 4.4.2.6.",
        ),
        InheritPrimary => (
            "Remove INHERIT or ensure the primary HDU has NAXIS = 0.",
            "INHERIT = T allows extensions to inherit primary header keywords, but is \
             only meaningful when the primary HDU has no data (NAXIS = 0). See FITS \
             Standard Section 4.4.2.4.",
        ),
        Ok => return None,
    };
    Some(pair)
}

// ---- Keyword dictionary used by the contextual overlay ----

fn keyword_purpose(kw: &str) -> Option<&'static str> {
    Some(match kw {
        "SIMPLE" => "'SIMPLE' indicates whether the file conforms to the FITS Standard (T = conforming).",
        "BITPIX" => "'BITPIX' specifies the number of bits per data element (e.g., 8 for bytes, 16 for short integers, -32 for single-precision floats).",
        "NAXIS" => "'NAXIS' specifies the number of axes (dimensions) in the data array.",
        "XTENSION" => "'XTENSION' identifies the type of extension (e.g., 'IMAGE', 'TABLE', 'BINTABLE').",
        "PCOUNT" => "'PCOUNT' is the number of bytes of supplemental data following the main data table (the heap for variable-length arrays).",
        "GCOUNT" => "'GCOUNT' is the number of groups (always 1 for standard extensions).",
        "TFIELDS" => "'TFIELDS' specifies the number of columns in a table.",
        "EXTEND" => "'EXTEND' indicates whether the file may contain extensions after the primary HDU.",
        "END" => "'END' marks the end of the header; all remaining bytes to the 2880-byte boundary must be blank (ASCII 32).",
        "BSCALE" => "'BSCALE' is the linear scaling factor for image pixels: physical = raw * BSCALE + BZERO.",
        "BZERO" => "'BZERO' is the offset applied after scaling for image pixels.",
        "BUNIT" => "'BUNIT' specifies the physical units of the image pixel values.",
        "BLANK" => "'BLANK' defines the integer value used to represent undefined pixels in integer images.",
        "DATAMAX" => "'DATAMAX' records the maximum data value in the image.",
        "DATAMIN" => "'DATAMIN' records the minimum data value in the image.",
        "BLOCKED" => "'BLOCKED' is a deprecated keyword formerly used for tape blocking.",
        "EPOCH" => "'EPOCH' is deprecated; use 'EQUINOX' instead to specify the equinox of celestial coordinates.",
        "THEAP" => "'THEAP' specifies the byte offset of the heap area in a binary table with variable-length arrays.",
        "WCSAXES" => "'WCSAXES' declares the number of WCS axes, which may differ from NAXIS.",
        "TIMESYS" => "'TIMESYS' specifies the time scale used for time-related keywords (e.g., UTC, TAI, TDB).",
        "MJDREF" => "'MJDREF' specifies the reference Modified Julian Date for time coordinates.",
        "DATEREF" => "'DATEREF' specifies the reference date/time for time coordinates in ISO 8601 format.",
        "TIMEUNIT" => "'TIMEUNIT' specifies the units of time-related keywords (e.g., 's' for seconds, 'd' for days).",
        _ => {
            return Some(match () {
                _ if kw.starts_with("NAXIS") => "NAXISn specifies the size of axis n in the data array.",
                _ if kw.starts_with("TFORM") => "TFORMn specifies the data format for column n (e.g., '1J' for 32-bit integer, '20A' for 20-character string).",
                _ if kw.starts_with("TTYPE") => "TTYPEn gives column n a descriptive name for identification.",
                _ if kw.starts_with("TUNIT") => "TUNITn specifies the physical units of the data in column n.",
                _ if kw.starts_with("TBCOL") => "TBCOLn specifies the starting byte position of column n within each row of an ASCII table.",
                _ if kw.starts_with("TSCAL") => "TSCALn is the linear scaling factor for column n: physical = raw * TSCALn + TZEROn.",
                _ if kw.starts_with("TZERO") => "TZEROn is the offset applied after scaling for column n: physical = raw * TSCALn + TZEROn.",
                _ if kw.starts_with("TNULL") => "TNULLn defines the value used to represent undefined (null) entries in integer column n.",
                _ if kw.starts_with("TDISP") => "TDISPn specifies the display format for column n (e.g., 'I10', 'F12.5').",
                _ if kw.starts_with("TDIM") => "TDIMn describes the multi-dimensional shape of column n's array data (e.g., '(100,200)').",
                _ => return None,
            });
        }
    })
}

fn keyword_section(kw: &str) -> Option<&'static str> {
    Some(match kw {
        "SIMPLE" | "BITPIX" | "NAXIS" => "Section 4.4.1.1",
        "XTENSION" | "PCOUNT" | "GCOUNT" => "Section 7.1",
        "TFIELDS" => "Section 7.2.1",
        "EXTEND" => "Section 4.4.2.1",
        "END" => "Section 4.3.1",
        "BSCALE" | "BZERO" | "BUNIT" | "BLANK" => "Section 4.4.2.1",
        "THEAP" => "Section 7.3.1",
        "WCSAXES" => "Section 8.2",
        "TIMESYS" | "MJDREF" | "DATEREF" | "TIMEUNIT" => "Section 8.4 (WCS Paper IV)",
        _ => {
            return Some(match () {
                _ if kw.starts_with("NAXIS") => "Section 4.4.1.1",
                _ if kw.starts_with("TFORM") => "Section 7.2.1 (ASCII), Section 7.3.1 (binary)",
                _ if kw.starts_with("TTYPE") || kw.starts_with("TBCOL") => "Section 7.2.1",
                _ if kw.starts_with("TSCAL")
                    || kw.starts_with("TZERO")
                    || kw.starts_with("TNULL")
                    || kw.starts_with("TDIM") => "Section 7.3.2",
                _ if kw.starts_with("TDISP") => "Section 7.3.3",
                _ => return None,
            });
        }
    })
}

fn hdu_type_name(kind: HduKind, hdunum: usize) -> &'static str {
    if hdunum == 1 {
        return "a primary array";
    }
    match kind {
        HduKind::Image => "an image extension",
        HduKind::AsciiTable => "an ASCII table",
        HduKind::BinaryTable => "a binary table",
        _ => "an HDU",
    }
}

fn mandatory_list(kind: HduKind, hdunum: usize) -> &'static str {
    if hdunum == 1 {
        return "SIMPLE, BITPIX, NAXIS, NAXISn, END";
    }
    match kind {
        HduKind::Image => "XTENSION, BITPIX, NAXIS, NAXISn, PCOUNT, GCOUNT, END",
        HduKind::AsciiTable => {
            "XTENSION, BITPIX, NAXIS, NAXIS1, NAXIS2, PCOUNT, GCOUNT, TFIELDS, TBCOLn, TFORMn, END"
        }
        HduKind::BinaryTable => {
            "XTENSION, BITPIX, NAXIS, NAXIS1, NAXIS2, PCOUNT, GCOUNT, TFIELDS, TFORMn, END"
        }
        _ => "XTENSION, BITPIX, NAXIS, NAXISn, PCOUNT, GCOUNT, END",
    }
}

/// Expected-type phrasing for [`ErrorCode::WrongType`] keyed off the keyword
/// family. Most wrong-type findings in the wild are numeric keywords entered
/// as quoted strings.
fn expected_type(kw: &str) -> Option<&'static str> {
    const FLOAT_PREFIXES: [&str; 14] = [
        "CRPIX", "CRVAL", "CDELT", "CROTA", "CRDER", "CSYER", "TCRVL", "TCDLT", "TCRPX",
        "TCROT", "TLMIN", "TLMAX", "TDMIN", "TDMAX",
    ];
    const FLOAT_EXACT: [&str; 13] = [
        "EQUINOX", "MJD-OBS", "MJD-AVG", "LONPOLE", "LATPOLE", "RESTFRQ", "RESTWAV",
        "MJDREF", "JDREF", "TSTART", "TSTOP", "BSCALE", "BZERO",
    ];
    // PCi_j / CDi_j / PVi_m matrix keywords carry a digit after the prefix,
    // which keeps PCOUNT out of the floating-point family.
    let matrix = ["PC", "CD", "PV"].iter().any(|p| {
        kw.strip_prefix(p)
            .and_then(|rest| rest.chars().next())
            .is_some_and(|c| c.is_ascii_digit())
    });
    if FLOAT_PREFIXES.iter().any(|p| kw.starts_with(p))
        || FLOAT_EXACT.contains(&kw)
        || kw == "DATAMAX"
        || kw == "DATAMIN"
        || kw == "EPOCH"
        || kw.starts_with("TSCAL")
        || kw.starts_with("TZERO")
        || matrix
    {
        return Some("floating-point number (without quotes)");
    }
    if kw == "BITPIX"
        || kw.starts_with("NAXIS")
        || kw == "PCOUNT"
        || kw == "GCOUNT"
        || kw == "TFIELDS"
        || kw == "EXTVER"
        || kw == "EXTLEVEL"
        || kw.starts_with("TNULL")
        || kw == "BLANK"
        || kw.starts_with("TBCOL")
        || kw == "WCSAXES"
    {
        return Some("integer (without quotes)");
    }
    if matches!(kw, "SIMPLE" | "EXTEND" | "GROUPS" | "INHERIT") {
        return Some("logical value (T or F, without quotes)");
    }
    None
}

/// Generate the (fix, explain) pair for `code` from the verifier's hint
/// context. Call-site overrides are consumed, never overwritten. Returns
/// `(None, None)` when no hint exists for the code.
pub(crate) fn generate(v: &mut Verifier, code: ErrorCode) -> (Option<String>, Option<String>) {
    use ErrorCode::*;

    let fix_over = v.hint.fix_override.take();
    let explain_over = v.hint.explain_override.take();
    let has_kw = !v.hint.keyword.is_empty();
    let has_col = v.hint.colnum > 0;
    let fallback = static_hint(code);

    if !has_kw && !has_col && fix_over.is_none() && explain_over.is_none() {
        return match fallback {
            Some((f, e)) => (Some(f.to_string()), Some(e.to_string())),
            None => (None, None),
        };
    }

    let kw = v.hint.keyword.clone();
    let col = v.hint.colnum;
    let hdu = v.curhdu;
    let kind = v.curtype;
    let hdu_name = hdu_type_name(kind, hdu);
    let purpose = keyword_purpose(&kw);
    let section = keyword_section(&kw).unwrap_or("(see relevant section)");
    let mand = mandatory_list(kind, hdu);

    let mut fix = fix_over
        .clone()
        .or_else(|| fallback.map(|(f, _)| f.to_string()));
    let mut explain = explain_over
        .clone()
        .or_else(|| fallback.map(|(_, e)| e.to_string()));
    let callsite_fix = fix_over.is_some();
    let callsite_explain = explain_over.is_some();

    match code {
        MissingKeyword if has_kw => {
            fix = Some(format!(
                "Add the keyword '{kw}' to the header of HDU {hdu}. The mandatory \
                 keywords for {hdu_name} in order are: {mand}."
            ));
            if let Some(p) = purpose {
                explain = Some(format!(
                    "{p} Without it, FITS readers cannot interpret the {hdu_name}. See \
                     FITS Standard {section}."
                ));
            }
        }
        KeywordOrder if has_kw => {
            fix = Some(format!(
                "Move keyword '{kw}' to its required position in HDU {hdu}. The \
                 mandatory order for {hdu_name} is: {mand}."
            ));
            explain = Some(format!(
                "FITS requires mandatory keywords in a fixed order at the start of \
                 each header. '{kw}' must appear in its designated position. See FITS \
                 Standard Section 4.4.1."
            ));
        }
        KeywordDuplicate if has_kw => {
            fix = Some(format!(
                "Remove the duplicate '{kw}' keyword in HDU {hdu}; it must appear \
                 exactly once."
            ));
            explain = Some(format!(
                "Mandatory keywords must appear only once. Having two '{kw}' keywords \
                 creates ambiguity about which value should be used. See FITS Standard \
                 Section 4.4.1."
            ));
        }
        KeywordValue if has_kw => {
            fix = Some(format!(
                "Correct the value of '{kw}' in HDU {hdu} to a legal value per the \
                 FITS Standard."
            ));
            if let Some(p) = purpose {
                explain = Some(format!(
                    "{p} The current value is not permitted. See FITS Standard {section}."
                ));
            }
        }
        KeywordType if has_kw => {
            fix = Some(format!(
                "Change the value of '{kw}' in HDU {hdu} to the required datatype."
            ));
            if let Some(p) = purpose {
                explain = Some(format!(
                    "{p} The value must use the correct datatype (e.g., BITPIX must be \
                     an integer). See FITS Standard {section}."
                ));
            }
        }
        NotFixedFormat if has_kw => {
            fix = Some(format!(
                "Write '{kw}' in HDU {hdu} using fixed format (value indicator '= ' \
                 in columns 9-10, value right-justified in columns 11-30)."
            ));
            explain = Some(format!(
                "Mandatory keywords must use fixed-format notation so that any reader \
                 can parse them without interpreting free-format values. '{kw}' must \
                 have its value in columns 11-30. See FITS Standard Section 4.2.1."
            ));
        }
        IllegalNameChar | NameNotJustified if has_kw => {
            fix = Some(format!(
                "Fix keyword '{kw}' in HDU {hdu}: names must use only uppercase A-Z, \
                 digits 0-9, hyphen, and underscore, left-justified in columns 1-8."
            ));
        }
        BadString | MissingQuote | BadLogical | BadNumber | LowercaseExponent
        | ComplexFormat | BadComment | NoValueSeparator | UnknownType | NontextChars
            if has_kw =>
        {
            if let Some((f, e)) = fallback {
                fix = Some(format!("Keyword '{kw}' in HDU {hdu}: {f}"));
                explain = Some(format!(
                    "Keyword '{kw}': {e} See FITS Standard Section 4.2."
                ));
            }
        }
        WrongType => {
            if callsite_fix || callsite_explain {
                if !callsite_explain {
                    if let Some(p) = purpose {
                        explain = Some(format!(
                            "{p} The value must match the expected type. See FITS \
                             Standard {section}."
                        ));
                    }
                }
            } else if has_kw {
                fix = Some(match expected_type(&kw) {
                    Some(exp) => format!(
                        "Change '{kw}' in HDU {hdu} to a {exp}. If the value is \
                         currently a quoted string, remove the quotes."
                    ),
                    None => format!(
                        "Change the value of '{kw}' in HDU {hdu} to the expected \
                         datatype."
                    ),
                });
                explain = Some(match purpose {
                    Some(p) => format!(
                        "{p} The value must match the expected type. See FITS Standard \
                         {section}."
                    ),
                    None => format!(
                        "Keyword '{kw}' has a value of the wrong datatype. Check the \
                         FITS Standard for the required type."
                    ),
                });
            }
        }
        NullValue if has_kw => {
            fix = Some(format!(
                "Provide a value for '{kw}' in HDU {hdu}, or remove it if not needed."
            ));
            if let Some(p) = purpose {
                explain = Some(format!(
                    "{p} The keyword currently has no value (blank value field)."
                ));
            }
        }
        LeadingSpace if has_kw => {
            fix = Some(format!(
                "Remove leading spaces from the value of '{kw}' in HDU {hdu}."
            ));
            explain = Some(format!(
                "Keyword '{kw}': certain keyword values (XTENSION, TFORMn, TDISPn, \
                 TDIMn) must not have leading spaces within the quoted string. See \
                 FITS Standard Section 4.2.1."
            ));
        }
        ReservedValue if has_kw => {
            fix = Some(format!(
                "Correct the value of reserved keyword '{kw}' in HDU {hdu}."
            ));
            if let Some(p) = purpose {
                explain = Some(format!(
                    "{p} The current value violates the FITS Standard. See FITS \
                     Standard {section}."
                ));
            }
        }
        KeywordNotAllowed if has_kw => {
            fix = Some(format!(
                "Remove keyword '{kw}' from HDU {hdu}; it is not permitted in \
                 {hdu_name}."
            ));
            explain = Some(format!(
                "Keyword '{kw}' is not valid in {hdu_name}. Check the FITS Standard \
                 for which keywords are allowed in each HDU type."
            ));
        }
        PrimaryKeyInExt if has_kw => {
            fix = Some(format!(
                "Remove '{kw}' from HDU {hdu}; it is only valid in the primary HDU."
            ));
            explain = Some(format!(
                "The keyword '{kw}' is only valid in the primary HDU (HDU 1). It must \
                 not appear in any extension. See FITS Standard Section 4.4.2."
            ));
        }
        ImageKeyInTable if has_kw => {
            fix = Some(format!(
                "Remove '{kw}' from HDU {hdu} ({hdu_name}); it is only valid in image \
                 HDUs."
            ));
            explain = Some(format!(
                "Keywords like BSCALE, BZERO, BUNIT, BLANK, DATAMAX, and DATAMIN are \
                 only valid in image HDUs. In tables, use the column-specific \
                 equivalents (TSCALn, TZEROn, TUNITn, TNULLn). '{kw}' was found in \
                 {hdu_name}. See FITS Standard Section 7."
            ));
        }
        TableKeyInImage if has_kw => {
            fix = Some(format!(
                "Remove table keyword '{kw}' from HDU {hdu} ({hdu_name})."
            ));
            explain = Some(format!(
                "Column-related keywords like TFIELDS, TTYPEn, TFORMn are only valid \
                 in table extensions. '{kw}' was found in {hdu_name}. See FITS \
                 Standard Section 7."
            ));
        }
        IndexExceedsTfields if has_kw => {
            fix = Some(format!(
                "Keyword '{kw}' in HDU {hdu} has a column index exceeding TFIELDS. \
                 Either increase TFIELDS or remove the excess keyword."
            ));
            explain = Some(format!(
                "Column-indexed keywords (TTYPEn, TFORMn, etc.) must have index \
                 n <= TFIELDS. '{kw}' exceeds this limit. See FITS Standard Section \
                 7.2.1."
            ));
        }
        BadTform if has_kw => {
            fix = Some(format!(
                "Correct '{kw}' in HDU {hdu} to a valid FITS column format."
            ));
            explain = Some(format!(
                "'{kw}' specifies the data format for a column. Valid formats include \
                 integer widths for ASCII tables (e.g., I10, F12.5) and type codes \
                 for binary tables (e.g., 1J, 20A, 1E). See FITS Standard {section}."
            ));
        }
        BadTdisp => {
            if callsite_fix || callsite_explain {
                if !callsite_explain {
                    explain = Some(
                        "TDISPn controls the display format for column n. The display \
                         format must be compatible with the column's TFORMn data type. \
                         See FITS Standard Section 7.3.3."
                            .to_string(),
                    );
                }
            } else if has_kw {
                fix = Some(format!(
                    "Correct the display format in '{kw}' in HDU {hdu}. Valid formats: \
                     Aw (character), Lw (logical), Iw/Bw/Ow/Zw (integer), \
                     Fw.d/Ew.d/Dw.d/Gw.d (numeric)."
                ));
                explain = Some(
                    "TDISPn controls the display format for column n. The format must \
                     be a valid Fortran-style format code with correct width and \
                     precision. See FITS Standard Section 7.3.3."
                        .to_string(),
                );
            }
        }
        BlankWrongType if has_kw => {
            fix = Some(format!(
                "Remove '{kw}' from HDU {hdu}; it must not be used with floating-point \
                 data. Use NaN instead."
            ));
        }
        TscalWrongType if has_kw => {
            fix = Some(format!(
                "Remove '{kw}' from HDU {hdu}; scaling keywords are only valid for \
                 numeric (integer/float) binary table columns."
            ));
        }
        TnullWrongType if has_kw => {
            fix = Some(format!(
                "Remove '{kw}' from this floating-point column in HDU {hdu}; use IEEE \
                 NaN for null values instead."
            ));
        }
        Deprecated if has_kw => {
            fix = Some(format!(
                "Remove or replace deprecated keyword '{kw}' in HDU {hdu}."
            ));
            if kw == "EPOCH" {
                explain = Some(
                    "'EPOCH' is deprecated in favor of 'EQUINOX'. See FITS Standard \
                     Section 8.3."
                        .to_string(),
                );
            } else if kw == "BLOCKED" {
                explain = Some(
                    "'BLOCKED' is deprecated and should be removed; it was related to \
                     tape blocking which is no longer relevant."
                        .to_string(),
                );
            }
        }
        ZeroScale if has_kw => {
            fix = Some(format!("Set '{kw}' in HDU {hdu} to a non-zero value."));
            explain = Some(format!(
                "A scale factor of zero for '{kw}' would map all raw values to the \
                 same physical value (the offset). The formula is: physical = raw * \
                 {kw} + offset. See FITS Standard {section}."
            ));
        }
        DuplicateKeyword if has_kw => {
            fix = Some(format!(
                "Remove the duplicate '{kw}' keyword in HDU {hdu}, or rename one of \
                 the copies."
            ));
            explain = Some(format!(
                "'{kw}' appears more than once in the header of HDU {hdu}. Only \
                 COMMENT, HISTORY, blank, and CONTINUE keywords may be duplicated. See \
                 FITS Standard Section 4.4.1."
            ));
        }
        NonAsciiData | BadLogicalData | BitNotJustified | NoDecimal | EmbeddedSpace
            if has_col =>
        {
            if let Some((f, e)) = fallback {
                fix = Some(format!("Column {col} in HDU {hdu}: {f}"));
                explain = Some(format!("Column {col}: {e}"));
            }
        }
        VarExceedsMaxlen | VarExceedsHeap => {
            if !callsite_fix && has_col {
                if let Some((f, _)) = fallback {
                    fix = Some(format!("Column {col} in HDU {hdu}: {f}"));
                }
            }
        }
        VarExceeds32bit if has_col => {
            fix = Some(format!(
                "Column {col} in HDU {hdu}: use 'Q' format (64-bit descriptor) \
                 instead of 'P' for large variable-length arrays."
            ));
        }
        WcsaxesOrder if has_kw => {
            fix = Some(format!("Move WCSAXES before keyword '{kw}' in HDU {hdu}."));
        }
        WcsIndex if has_kw => {
            fix = Some(format!(
                "Keyword '{kw}' in HDU {hdu}: reduce the axis index to not exceed the \
                 WCSAXES value."
            ));
        }
        WcsIndexWarn if has_kw => {
            fix = Some(format!(
                "Keyword '{kw}' in HDU {hdu}: add a WCSAXES keyword, or ensure WCS \
                 indices do not exceed NAXIS."
            ));
        }
        _ => {
            if !callsite_fix && !callsite_explain {
                if let Some((f, _)) = fallback {
                    if has_kw {
                        fix = Some(format!("Keyword '{kw}' in HDU {hdu}: {f}"));
                    } else if has_col {
                        fix = Some(format!("Column {col} in HDU {hdu}: {f}"));
                    }
                }
            }
        }
    }

    (fix.filter(|s| !s.is_empty()), explain.filter(|s| !s.is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::Options;

    fn verifier_at(hdu: usize, kind: HduKind) -> Verifier {
        let mut v = Verifier::new(Options::default());
        v.curhdu = hdu;
        v.curtype = kind;
        v
    }

    #[test]
    fn static_fallback_without_context() {
        let mut v = verifier_at(1, HduKind::Primary);
        let (fix, explain) = generate(&mut v, ErrorCode::MissingEnd);
        assert!(fix.unwrap().contains("END"));
        assert!(explain.unwrap().contains("2880"));
    }

    #[test]
    fn no_hint_for_ok() {
        let mut v = verifier_at(1, HduKind::Primary);
        assert_eq!(generate(&mut v, ErrorCode::Ok), (None, None));
    }

    #[test]
    fn missing_keyword_names_keyword_and_hdu() {
        let mut v = verifier_at(1, HduKind::Primary);
        v.hint_keyword("BITPIX");
        let (fix, explain) = generate(&mut v, ErrorCode::MissingKeyword);
        let fix = fix.unwrap();
        assert!(fix.contains("'BITPIX'"));
        assert!(fix.contains("HDU 1"));
        assert!(fix.contains("SIMPLE, BITPIX, NAXIS"));
        assert!(explain.unwrap().contains("FITS Standard"));
    }

    #[test]
    fn wrong_type_infers_expected_type() {
        let mut v = verifier_at(2, HduKind::BinaryTable);
        v.hint_keyword("TFIELDS");
        let (fix, _) = generate(&mut v, ErrorCode::WrongType);
        assert!(fix.unwrap().contains("integer (without quotes)"));
    }

    #[test]
    fn callsite_fix_survives() {
        let mut v = verifier_at(3, HduKind::BinaryTable);
        v.hint_colnum(1);
        v.hint_fix("Change TFORM1 to '1PE(12)'.".to_string());
        let (fix, _) = generate(&mut v, ErrorCode::VarExceedsMaxlen);
        assert_eq!(fix.unwrap(), "Change TFORM1 to '1PE(12)'.");
    }

    #[test]
    fn column_context_prepended() {
        let mut v = verifier_at(2, HduKind::BinaryTable);
        v.hint_colnum(4);
        let (fix, explain) = generate(&mut v, ErrorCode::BadLogicalData);
        assert!(fix.unwrap().starts_with("Column 4 in HDU 2:"));
        assert!(explain.unwrap().starts_with("Column 4:"));
    }

    #[test]
    fn deprecated_epoch_specific_text() {
        let mut v = verifier_at(1, HduKind::Primary);
        v.hint_keyword("EPOCH");
        let (_, explain) = generate(&mut v, ErrorCode::Deprecated);
        assert!(explain.unwrap().contains("EQUINOX"));
    }

    #[test]
    fn every_code_has_a_static_hint() {
        use ErrorCode::*;
        let all = [
            ExtraHdus, ExtraBytes, BadHdu, ReadFail, MissingKeyword, KeywordOrder,
            KeywordDuplicate, KeywordValue, KeywordType, MissingEnd, EndNotBlank,
            NotFixedFormat, NonAsciiHeader, IllegalNameChar, NameNotJustified,
            BadValueFormat, NoValueSeparator, BadString, MissingQuote, BadLogical,
            BadNumber, LowercaseExponent, ComplexFormat, BadComment, UnknownType,
            WrongType, NullValue, CardTooLong, NontextChars, LeadingSpace,
            ReservedValue, XtensionInPrimary, ImageKeyInTable, TableKeyInImage,
            PrimaryKeyInExt, TableWcsInImage, KeywordNotAllowed, BadTfields,
            Naxis1Mismatch, BadTform, BadTdisp, IndexExceedsTfields, TscalWrongType,
            TnullWrongType, BlankWrongType, TheapNoPcount, TdimInAscii, TbcolInBinary,
            VarFormat, TbcolMismatch, VarExceedsMaxlen, VarExceedsHeap,
            BitNotJustified, BadLogicalData, NonAsciiData, NoDecimal, EmbeddedSpace,
            NonAsciiTable, DataFill, HeaderFill, AsciiGap, WcsaxesOrder, WcsIndex,
            Reader, ReaderStack, TooManyErrors, Internal, SimpleFalse, Deprecated,
            DuplicateExtname, ZeroScale, TnullRange, RawNotMultiple, Y2kDate,
            WcsIndexWarn, DuplicateKeyword, BadColumnName, NoColumnName,
            DuplicateColumn, BadChecksum, MissingLongstrn, VarExceeds32bit,
            HierarchDuplicate, PcountNoVla, ContinueChar, RandomGroups,
            LegacyXtension, TimesysValue, InheritPrimary,
        ];
        for code in all {
            assert!(static_hint(code).is_some(), "no static hint for {code:?}");
        }
        assert!(static_hint(Ok).is_none());
    }
}
