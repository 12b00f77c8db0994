//! Table data validation.
//!
//! Checks the value constraints that can actually be violated on disk: bit
//! column fill bits, logical bytes, ASCII-ness of string data, decimal and
//! space rules of ASCII table numeric fields, variable-length array
//! descriptors against their declared maximum and the heap bounds, the fill
//! areas, and the declared checksums. Numeric binary columns (B, I, J, K, E,
//! D, C, M) have no invalid bit patterns and are never read; image pixels
//! likewise.

use crate::codes::ErrorCode;
use crate::reader::{ChecksumState, ColumnSpec, FitsReader, HduKind};
use crate::tform::{AsciiKind, ColType, TformKind};
use crate::verifier::Verifier;

use crate::header::HduView;

const MAX_I32: u64 = 2_147_483_647;

pub(crate) fn verify_data(v: &mut Verifier, reader: &mut dyn FitsReader, hdu: &HduView) {
    if v.opts.test_checksum {
        test_checksum(v, reader);
    }
    if v.opts.test_fill {
        test_agap(v, reader, hdu);
        match reader.check_data_fill() {
            Ok(true) => {}
            Ok(false) => {
                let text = if hdu.kind == HduKind::AsciiTable {
                    "Data fill area contains characters other than blanks."
                } else {
                    "Data fill area contains bytes other than zero."
                };
                v.err(ErrorCode::DataFill, text, 1);
            }
            Err(e) => v.reader_err(ErrorCode::Reader, "checking data fill: ", &e, 1),
        }
    }

    if !v.opts.test_data || !hdu.is_table() || hdu.tfields == 0 {
        return;
    }

    let naxis2 = hdu.naxes.get(1).copied().flatten().unwrap_or(0);
    if naxis2 < 0 {
        return;
    }
    let nrows = naxis2 as u64;
    if nrows > MAX_I32 {
        v.info("Cannot test data in tables with more than 2**31 (2147483647) rows.");
        return;
    }

    // Column layout. A single unparsable TFORM is reported once through the
    // reader channel and data checks are skipped; the header validator has
    // already diagnosed the bad value itself.
    let mut cols: Vec<ColumnSpec> = Vec::with_capacity(hdu.tfields);
    for n in 1..=hdu.tfields {
        match reader.parse_tform(n) {
            Ok(spec) => cols.push(spec),
            Err(e) => {
                let text = format!("Column #{n}: ");
                v.reader_err(ErrorCode::Reader, &text, &e, 2);
                return;
            }
        }
    }

    if hdu.kind == HduKind::BinaryTable {
        test_binary_columns(v, reader, &cols, nrows);
        test_var_columns(v, reader, hdu, &cols, nrows);
    } else {
        test_ascii_values(v, reader, &cols, nrows);
    }
}

// ---------------------------------------------------------------------------
// Binary table fixed columns
// ---------------------------------------------------------------------------

fn test_binary_columns(
    v: &mut Verifier,
    reader: &mut dyn FitsReader,
    cols: &[ColumnSpec],
    nrows: u64,
) {
    let batch = reader.row_batch_hint().max(1);

    for (idx, spec) in cols.iter().enumerate() {
        if v.aborted {
            return;
        }
        if spec.kind != TformKind::Fixed || spec.width == 0 {
            continue;
        }
        let colnum = idx + 1;
        match spec.col_type {
            ColType::Bit if spec.repeat % 8 != 0 => {
                check_bit_column(v, reader, spec, colnum, nrows, batch);
            }
            ColType::Logical => {
                check_logical_column(v, reader, spec, colnum, nrows, batch);
            }
            ColType::Ascii => {
                check_ascii_column(v, reader, spec, colnum, nrows, batch);
            }
            _ => {}
        }
    }
}

/// Fill bits beyond `repeat mod 8` in the final byte of each cell must be
/// zero.
fn check_bit_column(
    v: &mut Verifier,
    reader: &mut dyn FitsReader,
    spec: &ColumnSpec,
    colnum: usize,
    nrows: u64,
    batch: u64,
) {
    let mask: u8 = 0xFF >> (spec.repeat % 8);
    let cell = spec.width as usize;
    let mut row = 1u64;
    while row <= nrows {
        if v.aborted {
            return;
        }
        let todo = batch.min(nrows - row + 1);
        let bytes = match reader.read_column_raw(colnum, row, todo) {
            Ok(b) => b,
            Err(e) => {
                let text = format!("Column #{colnum}: ");
                v.reader_err(ErrorCode::Reader, &text, &e, 2);
                return;
            }
        };
        for (i, chunk) in bytes.chunks_exact(cell).enumerate() {
            let last = chunk[cell - 1];
            if last & mask != 0 {
                v.hint_colnum(colnum);
                let mut text = format!(
                    "Row #{}, and Column #{colnum}: X vector ",
                    row + i as u64
                );
                for b in chunk {
                    text.push_str(&format!("0x{b:02x} "));
                }
                text.push_str("is not left justified.");
                v.err(ErrorCode::BitNotJustified, &text, 2);
                v.info("             (Other rows may have errors).");
                return;
            }
        }
        row += todo;
    }
}

/// Logical cells may only hold 'T' (0x54), 'F' (0x46), or 0.
fn check_logical_column(
    v: &mut Verifier,
    reader: &mut dyn FitsReader,
    spec: &ColumnSpec,
    colnum: usize,
    nrows: u64,
    batch: u64,
) {
    let cell = spec.width as usize;
    let mut row = 1u64;
    while row <= nrows {
        if v.aborted {
            return;
        }
        let todo = batch.min(nrows - row + 1);
        let bytes = match reader.read_column_raw(colnum, row, todo) {
            Ok(b) => b,
            Err(e) => {
                let text = format!("Column #{colnum}: ");
                v.reader_err(ErrorCode::Reader, &text, &e, 2);
                return;
            }
        };
        if let Some(bad) = find_bad_logical(&bytes) {
            v.hint_colnum(colnum);
            let text = format!(
                "Logical value in row #{}, column #{colnum} not equal to 'T', 'F', or 0",
                row + (bad / cell.max(1)) as u64
            );
            v.err(ErrorCode::BadLogicalData, &text, 1);
            v.info("             (This error is reported only once; other rows may have errors).");
            return;
        }
        row += todo;
    }
}

fn find_bad_logical(bytes: &[u8]) -> Option<usize> {
    bytes.iter().position(|&b| b != b'T' && b != b'F' && b != 0)
}

/// Character cells must hold printable ASCII or null padding.
fn check_ascii_column(
    v: &mut Verifier,
    reader: &mut dyn FitsReader,
    spec: &ColumnSpec,
    colnum: usize,
    nrows: u64,
    batch: u64,
) {
    let cell = spec.width as usize;
    let mut row = 1u64;
    while row <= nrows {
        if v.aborted {
            return;
        }
        let todo = batch.min(nrows - row + 1);
        let bytes = match reader.read_column_raw(colnum, row, todo) {
            Ok(b) => b,
            Err(e) => {
                let text = format!("Column #{colnum}: ");
                v.reader_err(ErrorCode::Reader, &text, &e, 2);
                return;
            }
        };
        if let Some(bad) = find_nonascii_text(&bytes) {
            v.hint_colnum(colnum);
            let text = format!(
                "String in row #{}, column #{colnum} contains non-ASCII text.",
                row + (bad / cell.max(1)) as u64
            );
            v.err(ErrorCode::NonAsciiData, &text, 1);
            v.info("             (This error is reported only once; other rows may have errors).");
            return;
        }
        row += todo;
    }
}

fn find_nonascii_text(bytes: &[u8]) -> Option<usize> {
    bytes
        .iter()
        .position(|&b| b != 0 && !(32..=126).contains(&b))
}

// ---------------------------------------------------------------------------
// Variable-length columns
// ---------------------------------------------------------------------------

fn test_var_columns(
    v: &mut Verifier,
    reader: &mut dyn FitsReader,
    hdu: &HduView,
    cols: &[ColumnSpec],
    nrows: u64,
) {
    let desc: Vec<usize> = cols
        .iter()
        .enumerate()
        .filter(|(_, s)| s.kind != TformKind::Fixed)
        .map(|(i, _)| i + 1)
        .collect();
    if desc.is_empty() {
        return;
    }

    let pcount = hdu.pcount.unwrap_or(0).max(0) as u64;
    let mut warned_large_length = false;
    let mut warned_large_offset = false;
    let mut inner_reported = vec![false; cols.len()];

    for row in 1..=nrows {
        if v.aborted {
            return;
        }
        for &colnum in &desc {
            let spec = &cols[colnum - 1];
            v.hint_colnum(colnum);

            let (length, offset) = match reader.read_descriptor(colnum, row) {
                Ok(d) => d,
                Err(e) => {
                    let text = format!("Row #{row} Col.#{colnum}: ");
                    v.reader_err(ErrorCode::Reader, &text, &e, 2);
                    continue;
                }
            };

            if spec.kind == TformKind::VarP {
                if !warned_large_length && length > MAX_I32 {
                    v.hint_colnum(colnum);
                    let text = format!(
                        "Var row length exceeds maximum 32-bit signed int. First \
                         detected for Row #{row} Column #{colnum}"
                    );
                    v.warn(ErrorCode::VarExceeds32bit, &text, false);
                    warned_large_length = true;
                }
                if !warned_large_offset && offset > MAX_I32 {
                    v.hint_colnum(colnum);
                    let text = format!(
                        "Heap offset for var length row exceeds maximum 32-bit signed \
                         int. First detected for Row #{row} Column #{colnum}"
                    );
                    v.warn(ErrorCode::VarExceeds32bit, &text, false);
                    warned_large_offset = true;
                }
            }

            if let Some(maxlen) = spec.max_var_len {
                if length > maxlen {
                    report_maxlen_overflow(v, spec, colnum, row, length, maxlen);
                }
            }

            let byte_length = if spec.col_type == ColType::Bit {
                length / 8
            } else {
                length * spec.elem_size
            };
            if offset + byte_length > pcount {
                v.hint_colnum(colnum);
                let per = if spec.col_type == ColType::Bit {
                    "/8".to_string()
                } else {
                    format!("*{}", spec.elem_size)
                };
                let text = format!(
                    "Descriptor of Column #{colnum} at Row {row}: offset of first \
                     element({offset}) + nelem({length}){per} > total heap area = {pcount}."
                );
                v.err(ErrorCode::VarExceedsHeap, &text, 2);
                continue;
            }

            if length == 0 || inner_reported[colnum - 1] {
                continue;
            }

            // Bit arrays are skipped here: their trailing fill bits live in
            // the heap and a per-row mask check adds little for the rare
            // variable-length bit column.
            match spec.col_type {
                ColType::Logical => {
                    match reader.read_heap(offset, length) {
                        Ok(bytes) => {
                            if find_bad_logical(&bytes).is_some() {
                                v.hint_colnum(colnum);
                                let text = format!(
                                    "Logical value in row #{row}, column #{colnum} not \
                                     equal to 'T', 'F', or 0"
                                );
                                v.err(ErrorCode::BadLogicalData, &text, 1);
                                v.info("             (This error is reported only once; other rows may have errors).");
                                inner_reported[colnum - 1] = true;
                            }
                        }
                        Err(e) => {
                            let text = format!("Row #{row} Col.#{colnum}: ");
                            v.reader_err(ErrorCode::Reader, &text, &e, 2);
                        }
                    }
                }
                ColType::Ascii => {
                    match reader.read_heap(offset, length) {
                        Ok(bytes) => {
                            if find_nonascii_text(&bytes).is_some() {
                                v.hint_colnum(colnum);
                                let text = format!(
                                    "String in row #{row}, and column #{colnum} contains \
                                     non-ASCII text."
                                );
                                v.err(ErrorCode::NonAsciiData, &text, 1);
                                v.info("             (This error is reported only once; other rows may have errors).");
                                inner_reported[colnum - 1] = true;
                            }
                        }
                        Err(e) => {
                            let text = format!("Row #{row} Col.#{colnum}: ");
                            v.reader_err(ErrorCode::Reader, &text, &e, 2);
                        }
                    }
                }
                _ => {}
            }
        }
    }
}

/// An oversized variable-length entry, with a call-site hint proposing the
/// exact replacement TFORM.
fn report_maxlen_overflow(
    v: &mut Verifier,
    spec: &ColumnSpec,
    colnum: usize,
    row: u64,
    length: u64,
    maxlen: u64,
) {
    let desc_char = if spec.kind == TformKind::VarQ { 'Q' } else { 'P' };
    let type_char = spec
        .raw_tform
        .chars()
        .skip_while(|&c| c != 'P' && c != 'Q')
        .nth(1)
        .unwrap_or('?');

    v.hint_colnum(colnum);
    match &spec.name {
        Some(name) => v.hint_fix(format!(
            "Column '{name}' (col {colnum}) has TFORM{colnum} = '{}' declaring max \
             {maxlen} elements, but row {row} contains {length}. Change TFORM{colnum} \
             to '1{desc_char}{type_char}({length})'.",
            spec.raw_tform
        )),
        None => v.hint_fix(format!(
            "Column {colnum} has TFORM{colnum} = '{}' declaring max {maxlen} elements, \
             but row {row} contains {length}. Change TFORM{colnum} to \
             '1{desc_char}{type_char}({length})'.",
            spec.raw_tform
        )),
    }
    v.hint_explain(format!(
        "Variable-length array columns use TFORM = '1P<type>(<max>)' where <max> \
         declares the maximum array size. The data in row {row} has {length} elements \
         which exceeds the declared maximum of {maxlen}. Either increase <max> in \
         TFORM{colnum} or the data is corrupt. See FITS Standard Section 7.3.5."
    ));

    let text = format!(
        "Descriptor of Column #{colnum} at Row {row}: nelem({length}) > \
         maxlen({maxlen}) given by TFORM{colnum}."
    );
    v.err(ErrorCode::VarExceedsMaxlen, &text, 1);
}

// ---------------------------------------------------------------------------
// ASCII table value checks
// ---------------------------------------------------------------------------

fn test_ascii_values(
    v: &mut Verifier,
    reader: &mut dyn FitsReader,
    cols: &[ColumnSpec],
    nrows: u64,
) {
    let batch = reader.row_batch_hint().max(1);

    for (idx, spec) in cols.iter().enumerate() {
        if v.aborted {
            return;
        }
        let is_float = spec
            .ascii
            .map(|f| f.kind == AsciiKind::Float)
            .unwrap_or(false);
        if !is_float || spec.width == 0 {
            continue;
        }
        let colnum = idx + 1;
        let cell = spec.width as usize;
        let mut found_baddot = false;
        let mut found_badspace = false;

        let mut row = 1u64;
        'batches: while row <= nrows {
            if v.aborted {
                return;
            }
            let todo = batch.min(nrows - row + 1);
            let bytes = match reader.read_column_raw(colnum, row, todo) {
                Ok(b) => b,
                Err(e) => {
                    let text = format!("Column #{colnum}: ");
                    v.reader_err(ErrorCode::Reader, &text, &e, 2);
                    break 'batches;
                }
            };
            for (i, chunk) in bytes.chunks_exact(cell.max(1)).enumerate() {
                let field: String = chunk.iter().map(|&b| b as char).collect();
                let trimmed = field.trim();
                if trimmed.is_empty() {
                    continue;
                }
                if !found_baddot && !trimmed.contains('.') {
                    v.hint_colnum(colnum);
                    let text = format!(
                        "Number in row #{}, column #{colnum} has no decimal point:",
                        row + i as u64
                    );
                    v.err(ErrorCode::NoDecimal, &text, 1);
                    let note =
                        format!("             {trimmed}  (Other rows may have similar errors).");
                    v.info(&note);
                    found_baddot = true;
                }
                if !found_badspace && trimmed.contains(' ') {
                    v.hint_colnum(colnum);
                    let text = format!(
                        "Number in row #{}, column #{colnum} has embedded space:",
                        row + i as u64
                    );
                    v.err(ErrorCode::EmbeddedSpace, &text, 1);
                    let note =
                        format!("             {trimmed}  (Other rows may have similar errors).");
                    v.info(&note);
                    found_badspace = true;
                }
                if found_baddot && found_badspace {
                    break 'batches;
                }
            }
            row += todo;
        }
    }
}

/// Check the bytes of an ASCII table row by row: anything above ASCII 127 is
/// an error anywhere, and gaps between the declared columns must also be
/// printable.
fn test_agap(v: &mut Verifier, reader: &mut dyn FitsReader, hdu: &HduView) {
    if hdu.kind != HduKind::AsciiTable || hdu.tfields == 0 {
        return;
    }
    let naxis1 = hdu.naxes.first().copied().flatten().unwrap_or(0);
    let naxis2 = hdu.naxes.get(1).copied().flatten().unwrap_or(0);
    if naxis1 <= 0 || naxis2 <= 0 {
        return;
    }
    let rowlen = naxis1 as usize;
    let nrows = naxis2 as u64;

    // Coverage template: true where a declared column occupies the byte.
    let mut in_column = vec![false; rowlen];
    for n in 1..=hdu.tfields {
        let Ok(spec) = reader.parse_tform(n) else {
            return;
        };
        let start = spec.offset as usize;
        let end = (spec.offset + spec.width) as usize;
        for slot in in_column.iter_mut().take(end.min(rowlen)).skip(start.min(rowlen)) {
            *slot = true;
        }
    }

    let batch = reader.row_batch_hint().max(1);
    let mut nerr: u64 = 0;
    let mut gap_reported = false;

    let mut row = 1u64;
    while row <= nrows {
        if v.aborted {
            return;
        }
        let todo = batch.min(nrows - row + 1);
        let bytes = match reader.read_rows_raw(row, todo) {
            Ok(b) => b,
            Err(e) => {
                v.reader_err(ErrorCode::Reader, "", &e, 1);
                return;
            }
        };
        for (j, &b) in bytes.iter().enumerate() {
            if b > 127 {
                if nerr == 0 {
                    let text = format!(
                        "row {} contains non-ASCII characters.",
                        row + (j / rowlen) as u64
                    );
                    v.err(ErrorCode::NonAsciiTable, &text, 1);
                }
                nerr += 1;
            } else if !in_column[j % rowlen] && !(32..=126).contains(&b) {
                if !gap_reported {
                    let text = format!(
                        "row {}: gap between columns contains non-printable characters.",
                        row + (j / rowlen) as u64
                    );
                    v.err(ErrorCode::AsciiGap, &text, 1);
                    gap_reported = true;
                }
                nerr += 1;
            }
        }
        row += todo;
    }

    if nerr > 1 {
        let text = format!("This ASCII table contains {nerr} non-ASCII-text characters");
        v.err(ErrorCode::NonAsciiTable, &text, 1);
    }
}

// ---------------------------------------------------------------------------
// Checksums
// ---------------------------------------------------------------------------

fn test_checksum(v: &mut Verifier, reader: &mut dyn FitsReader) {
    let (data_state, hdu_state) = match reader.verify_checksum() {
        Ok(states) => states,
        Err(e) => {
            v.reader_err(ErrorCode::Reader, "verifying checksums: ", &e, 2);
            return;
        }
    };

    if data_state == ChecksumState::Invalid {
        v.warn(
            ErrorCode::BadChecksum,
            "Data checksum is not consistent with the DATASUM keyword",
            false,
        );
    }
    if hdu_state == ChecksumState::Invalid {
        if data_state == ChecksumState::Valid {
            v.warn(
                ErrorCode::BadChecksum,
                "Invalid CHECKSUM means header has been modified. (DATASUM is OK)",
                false,
            );
        } else {
            v.warn(
                ErrorCode::BadChecksum,
                "HDU checksum is not in agreement with CHECKSUM.",
                false,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::{padded_byte_len, BLOCK_SIZE, CARD_SIZE};
    use crate::codes::Severity;
    use crate::header::init_hdu;
    use crate::options::Options;
    use crate::reader::MemReader;
    use std::sync::{Arc, Mutex};

    type Seen = Arc<Mutex<Vec<(Severity, ErrorCode, String)>>>;

    fn collector() -> (Verifier, Seen) {
        let mut v = Verifier::new(Options::default());
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        v.set_output_callback(move |d| {
            sink.lock().unwrap().push((d.severity, d.code, d.text.to_string()));
        });
        (v, seen)
    }

    fn make_card(s: &str) -> [u8; CARD_SIZE] {
        let mut buf = [b' '; CARD_SIZE];
        buf[..s.len()].copy_from_slice(s.as_bytes());
        buf
    }

    fn header_bytes(cards: &[String]) -> Vec<u8> {
        let blocks = (cards.len() + 1).div_ceil(36);
        let mut header = vec![b' '; blocks * BLOCK_SIZE];
        for (i, c) in cards.iter().enumerate() {
            header[i * CARD_SIZE..(i + 1) * CARD_SIZE].copy_from_slice(&make_card(c));
        }
        let end = cards.len() * CARD_SIZE;
        header[end..end + CARD_SIZE].copy_from_slice(&make_card("END"));
        header
    }

    fn empty_primary() -> Vec<u8> {
        header_bytes(&[
            "SIMPLE  =                    T".to_string(),
            "BITPIX  =                    8".to_string(),
            "NAXIS   =                    0".to_string(),
        ])
    }

    fn bintable(
        tforms: &[&str],
        naxis1: usize,
        nrows: usize,
        pcount: usize,
        rows: &[u8],
        heap: &[u8],
    ) -> Vec<u8> {
        let mut cards = vec![
            "XTENSION= 'BINTABLE'".to_string(),
            "BITPIX  =                    8".to_string(),
            "NAXIS   =                    2".to_string(),
            format!("NAXIS1  = {naxis1:>20}"),
            format!("NAXIS2  = {nrows:>20}"),
            format!("PCOUNT  = {pcount:>20}"),
            "GCOUNT  =                    1".to_string(),
            format!("TFIELDS = {:>20}", tforms.len()),
        ];
        for (i, t) in tforms.iter().enumerate() {
            cards.push(format!("TFORM{:<3}= '{t:<8}'", i + 1));
        }
        let mut data = empty_primary();
        data.extend_from_slice(&header_bytes(&cards));
        let payload_len = naxis1 * nrows + pcount;
        let mut payload = Vec::with_capacity(payload_len);
        payload.extend_from_slice(rows);
        payload.resize(naxis1 * nrows, 0);
        payload.extend_from_slice(heap);
        payload.resize(payload_len, 0);
        data.extend_from_slice(&payload);
        let padded = padded_byte_len(payload_len as u64) as usize - payload_len;
        data.resize(data.len() + padded, 0);
        data
    }

    fn run_data(v: &mut Verifier, bytes: Vec<u8>) {
        let mut reader = MemReader::open_bytes(bytes, "mem").unwrap();
        let kind = reader.move_to_hdu(2).unwrap();
        v.curhdu = 2;
        v.curtype = kind;
        let view = init_hdu(v, &mut reader, 2, kind).unwrap();
        verify_data(v, &mut reader, &view);
    }

    fn codes(seen: &Seen) -> Vec<ErrorCode> {
        seen.lock().unwrap().iter().map(|e| e.1).collect()
    }

    #[test]
    fn clean_logical_column() {
        let (mut v, seen) = collector();
        let rows = [b'T', b'F', 0u8];
        run_data(&mut v, bintable(&["1L"], 1, 3, 0, &rows, &[]));
        assert_eq!(v.nerrs, 0, "{:?}", codes(&seen));
    }

    #[test]
    fn bad_logical_reported_once() {
        let (mut v, seen) = collector();
        let rows = [b'T', 7u8, 9u8];
        run_data(&mut v, bintable(&["1L"], 1, 3, 0, &rows, &[]));
        let found = codes(&seen);
        assert_eq!(
            found.iter().filter(|&&c| c == ErrorCode::BadLogicalData).count(),
            1
        );
        let seen = seen.lock().unwrap();
        let hit = seen.iter().find(|e| e.1 == ErrorCode::BadLogicalData).unwrap();
        assert!(hit.2.contains("row #2"));
    }

    #[test]
    fn bit_column_fill_bits() {
        let (mut v, seen) = collector();
        // 13X occupies 2 bytes; the low 3 bits of byte 2 must be zero.
        let rows = [0xFFu8, 0xF8, 0xFF, 0xFD];
        run_data(&mut v, bintable(&["13X"], 2, 2, 0, &rows, &[]));
        let found = codes(&seen);
        assert!(found.contains(&ErrorCode::BitNotJustified));
        let seen = seen.lock().unwrap();
        let hit = seen.iter().find(|e| e.1 == ErrorCode::BitNotJustified).unwrap();
        assert_eq!(hit.0, Severity::Severe);
        assert!(hit.2.contains("Row #2"));
    }

    #[test]
    fn nonascii_string_column() {
        let (mut v, seen) = collector();
        let rows = [b'o', b'k', 0xC3, 0xA9];
        run_data(&mut v, bintable(&["2A"], 2, 2, 0, &rows, &[]));
        assert!(codes(&seen).contains(&ErrorCode::NonAsciiData));
    }

    #[test]
    fn var_length_exceeds_maxlen_with_hint() {
        let mut opts = Options::default();
        opts.fix_hints = true;
        let mut v = Verifier::new(opts);
        let seen: Arc<Mutex<Vec<(ErrorCode, String, Option<String>)>>> =
            Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        v.set_output_callback(move |d| {
            sink.lock()
                .unwrap()
                .push((d.code, d.text.to_string(), d.fix_hint.map(String::from)));
        });

        // 8 rows of 1PE(5); row 7 declares 12 elements.
        let mut rows = vec![0u8; 8 * 8];
        rows[6 * 8..6 * 8 + 4].copy_from_slice(&12u32.to_be_bytes());
        let heap = vec![0u8; 64];
        let bytes = bintable(&["1PE(5)"], 8, 8, 64, &rows, &heap);
        run_data(&mut v, bytes);

        let seen = seen.lock().unwrap();
        let hit = seen
            .iter()
            .find(|e| e.0 == ErrorCode::VarExceedsMaxlen)
            .expect("maxlen overflow expected");
        assert!(hit.1.contains("Row 7"));
        let fix = hit.2.as_deref().unwrap();
        assert!(fix.contains("1PE(12)"), "fix hint: {fix}");
    }

    #[test]
    fn var_length_exceeds_heap() {
        let (mut v, seen) = collector();
        // Descriptor points past the 8-byte heap: length 4 floats = 16 bytes.
        let mut rows = vec![0u8; 8];
        rows[0..4].copy_from_slice(&4u32.to_be_bytes());
        let bytes = bintable(&["1PE"], 8, 1, 8, &rows, &[0u8; 8]);
        run_data(&mut v, bytes);
        let found = codes(&seen);
        assert!(found.contains(&ErrorCode::VarExceedsHeap));
    }

    #[test]
    fn var_logical_heap_values_checked() {
        let (mut v, seen) = collector();
        let mut rows = vec![0u8; 8];
        rows[0..4].copy_from_slice(&3u32.to_be_bytes());
        let heap = [b'T', b'Q', 0u8];
        let bytes = bintable(&["1PL"], 8, 1, 16, &rows, &heap);
        run_data(&mut v, bytes);
        assert!(codes(&seen).contains(&ErrorCode::BadLogicalData));
    }

    fn ascii_table(tforms: &[(&str, usize)], naxis1: usize, rows: &[&str]) -> Vec<u8> {
        let mut cards = vec![
            "XTENSION= 'TABLE   '".to_string(),
            "BITPIX  =                    8".to_string(),
            "NAXIS   =                    2".to_string(),
            format!("NAXIS1  = {naxis1:>20}"),
            format!("NAXIS2  = {:>20}", rows.len()),
            "PCOUNT  =                    0".to_string(),
            "GCOUNT  =                    1".to_string(),
            format!("TFIELDS = {:>20}", tforms.len()),
        ];
        for (i, (form, tbcol)) in tforms.iter().enumerate() {
            cards.push(format!("TFORM{:<3}= '{form:<8}'", i + 1));
            cards.push(format!("TBCOL{:<3}= {tbcol:>20}", i + 1));
        }
        let mut data = empty_primary();
        data.extend_from_slice(&header_bytes(&cards));
        let payload_len = naxis1 * rows.len();
        let mut payload = Vec::with_capacity(payload_len);
        for r in rows {
            let mut row = r.as_bytes().to_vec();
            row.resize(naxis1, b' ');
            payload.extend_from_slice(&row);
        }
        data.extend_from_slice(&payload);
        let padded = padded_byte_len(payload_len as u64) as usize - payload_len;
        data.resize(data.len() + padded, b' ');
        data
    }

    #[test]
    fn ascii_float_without_decimal() {
        let (mut v, seen) = collector();
        let bytes = ascii_table(&[("F8.2", 1)], 8, &["   12.50", "     125"]);
        run_data(&mut v, bytes);
        assert!(codes(&seen).contains(&ErrorCode::NoDecimal));
    }

    #[test]
    fn ascii_float_with_embedded_space() {
        let (mut v, seen) = collector();
        let bytes = ascii_table(&[("F8.2", 1)], 8, &["   12.50", " 1 2.500"]);
        run_data(&mut v, bytes);
        assert!(codes(&seen).contains(&ErrorCode::EmbeddedSpace));
    }

    #[test]
    fn ascii_gap_nonprintable() {
        let (mut v, seen) = collector();
        // Column covers bytes 1-4; bytes 5-8 are a gap.
        let mut bytes = ascii_table(&[("I4", 1)], 8, &["  12", "  34"]);
        // Poke a control byte into the gap of row 1.
        let data_start = 2 * BLOCK_SIZE;
        bytes[data_start + 6] = 0x07;
        run_data(&mut v, bytes);
        assert!(codes(&seen).contains(&ErrorCode::AsciiGap));
    }

    #[test]
    fn ascii_high_bytes_flagged() {
        let (mut v, seen) = collector();
        let mut bytes = ascii_table(&[("I4", 1)], 8, &["  12", "  34"]);
        let data_start = 2 * BLOCK_SIZE;
        bytes[data_start + 1] = 0xEE;
        run_data(&mut v, bytes);
        assert!(codes(&seen).contains(&ErrorCode::NonAsciiTable));
    }

    #[test]
    fn data_fill_error() {
        let (mut v, seen) = collector();
        let mut bytes = bintable(&["1J"], 4, 1, 0, &[0, 0, 0, 5], &[]);
        // Corrupt the zero fill after the 4 data bytes.
        let data_start = 2 * BLOCK_SIZE;
        bytes[data_start + 100] = 1;
        run_data(&mut v, bytes);
        assert!(codes(&seen).contains(&ErrorCode::DataFill));
    }

    #[test]
    fn checksum_mismatch_warns() {
        let (mut v, seen) = collector();
        let mut cards = vec![
            "XTENSION= 'BINTABLE'".to_string(),
            "BITPIX  =                    8".to_string(),
            "NAXIS   =                    2".to_string(),
            "NAXIS1  =                    4".to_string(),
            "NAXIS2  =                    1".to_string(),
            "PCOUNT  =                    0".to_string(),
            "GCOUNT  =                    1".to_string(),
            "TFIELDS =                    1".to_string(),
            "TFORM1  = '1J      '".to_string(),
        ];
        cards.push("DATASUM = '12345   '".to_string());
        let mut data = empty_primary();
        data.extend_from_slice(&header_bytes(&cards));
        data.resize(data.len() + BLOCK_SIZE, 0);
        run_data(&mut v, data);
        assert!(codes(&seen).contains(&ErrorCode::BadChecksum));
        assert_eq!(v.nwrns, 1);
        assert_eq!(v.nerrs, 0);
    }

    #[test]
    fn row_count_guard_skips_data() {
        let opts = Options {
            test_checksum: false,
            test_fill: false,
            ..Options::default()
        };
        let mut v = Verifier::new(opts);
        let seen: Seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        v.set_output_callback(move |d| {
            sink.lock().unwrap().push((d.severity, d.code, d.text.to_string()));
        });

        let cards = vec![
            "XTENSION= 'BINTABLE'".to_string(),
            "BITPIX  =                    8".to_string(),
            "NAXIS   =                    2".to_string(),
            "NAXIS1  =                    0".to_string(),
            "NAXIS2  =           4000000000".to_string(),
            "PCOUNT  =                    0".to_string(),
            "GCOUNT  =                    1".to_string(),
            "TFIELDS =                    1".to_string(),
            "TFORM1  = '1L      '".to_string(),
        ];
        let mut data = empty_primary();
        data.extend_from_slice(&header_bytes(&cards));
        run_data(&mut v, data);
        let seen = seen.lock().unwrap();
        assert!(seen
            .iter()
            .any(|e| e.0 == Severity::Info && e.2.contains("2147483647")));
    }
}
