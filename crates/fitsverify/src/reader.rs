//! The byte-reader capability the validation core is parameterized over.
//!
//! [`FitsReader`] is a narrow contract: HDU navigation, raw card access,
//! typed keyword reads, byte ranges, column layout, descriptor and raw
//! data reads, and checksum verification. The
//! bundled [`MemReader`] implements it over an in-memory buffer and keeps no
//! process-global state, so independent verifications are safely concurrent.
//! A reader implementation that does keep global state (e.g. a shared error
//! stack) must be serialized externally by the caller.

use std::fmt;
use std::path::Path;

use tracing::{debug, trace};

use crate::block::{padded_byte_len, ASCII_FILL_BYTE, BLOCK_SIZE, CARD_SIZE, DATA_FILL_BYTE, HEADER_FILL_BYTE};
use crate::card::{parse_card, CardKind, ParsedCard};
use crate::checksum::{datasum_matches, hdu_sum_ok};
use crate::error::{Error, Result};
use crate::tform::{parse_tform_ascii, parse_tform_binary, AsciiFormat, ColType, TformKind};

/// The type of an HDU.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HduKind {
    /// The first HDU (announced by SIMPLE).
    Primary,
    /// XTENSION = 'IMAGE'.
    Image,
    /// XTENSION = 'TABLE'.
    AsciiTable,
    /// XTENSION = 'BINTABLE' (or the legacy A3DTABLE).
    BinaryTable,
    /// Unrecognized XTENSION value.
    Unknown,
}

impl fmt::Display for HduKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HduKind::Primary => "Primary Array",
            HduKind::Image => "Image Array",
            HduKind::AsciiTable => "ASCII Table",
            HduKind::BinaryTable => "Binary Table",
            HduKind::Unknown => "Unknown HDU",
        };
        f.write_str(name)
    }
}

/// Outcome of a single checksum comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChecksumState {
    /// The keyword is absent; nothing to verify.
    NotPresent,
    /// The stored and computed values agree.
    Valid,
    /// The stored and computed values disagree.
    Invalid,
}

/// Layout and type of one table column, as declared by TFORMn (and TBCOLn
/// for ASCII tables).
#[derive(Debug, Clone)]
pub struct ColumnSpec {
    /// Element type code.
    pub col_type: ColType,
    /// Repeat count (always 1 for ASCII table columns).
    pub repeat: u64,
    /// Bytes per element.
    pub elem_size: u64,
    /// Declared maximum element count for variable-length columns.
    pub max_var_len: Option<u64>,
    /// Fixed column or P/Q descriptor.
    pub kind: TformKind,
    /// Total bytes occupied in the fixed part of each row.
    pub width: u64,
    /// Byte offset of the column within each row.
    pub offset: u64,
    /// ASCII-table field format, when the HDU is an ASCII table.
    pub ascii: Option<AsciiFormat>,
    /// The raw TFORMn text.
    pub raw_tform: String,
    /// Column name from TTYPEn, if present.
    pub name: Option<String>,
}

/// The reader capability consumed by the validation core.
///
/// All failures are reported through [`Error`]; the core surfaces them only
/// via its `reader_err` diagnostics. HDU and card indices are 1-based; row
/// indices are 1-based.
pub trait FitsReader {
    /// Display label for the stream (path or caller-supplied name).
    fn label(&self) -> &str;

    /// Number of HDUs in the stream.
    fn hdu_count(&mut self) -> Result<usize>;

    /// Position at HDU `hdunum` (1-based) and report its type.
    fn move_to_hdu(&mut self, hdunum: usize) -> Result<HduKind>;

    /// Move `delta` HDUs relative to the current one.
    fn move_relative_hdu(&mut self, delta: i64) -> Result<HduKind>;

    /// Number of cards in the current header, excluding END.
    fn num_cards(&mut self) -> Result<usize>;

    /// Raw 80 bytes of card `index` (1-based) of the current header.
    fn read_card(&mut self, index: usize) -> Result<[u8; CARD_SIZE]>;

    /// Integer value of the named keyword in the current header, or `None`
    /// when absent or not an integer.
    fn read_key_int(&mut self, name: &str) -> Result<Option<i64>>;

    /// Floating-point value of the named keyword.
    fn read_key_flt(&mut self, name: &str) -> Result<Option<f64>>;

    /// String value of the named keyword.
    fn read_key_str(&mut self, name: &str) -> Result<Option<String>>;

    /// `(header_start, data_start, data_end)` byte offsets of the current
    /// HDU. `data_end` includes the fill to the 2880-byte boundary.
    fn hdu_byte_range(&mut self) -> Result<(u64, u64, u64)>;

    /// True when `offset` addresses at least one byte of the stream.
    fn position_at_byte(&mut self, offset: u64) -> Result<bool>;

    /// Column layout of column `col` (1-based) of the current table HDU.
    fn parse_tform(&mut self, col: usize) -> Result<ColumnSpec>;

    /// `(length, heap_offset)` descriptor of a variable-length cell.
    fn read_descriptor(&mut self, col: usize, row: u64) -> Result<(u64, u64)>;

    /// Raw bytes of column `col` cells for rows `first_row ..
    /// first_row + nrows`, concatenated row by row.
    fn read_column_raw(&mut self, col: usize, first_row: u64, nrows: u64) -> Result<Vec<u8>>;

    /// Raw bytes of whole rows `first_row .. first_row + nrows`.
    fn read_rows_raw(&mut self, first_row: u64, nrows: u64) -> Result<Vec<u8>>;

    /// `len` heap bytes starting `offset` bytes into the heap of the
    /// current binary table.
    fn read_heap(&mut self, offset: u64, len: u64) -> Result<Vec<u8>>;

    /// Verify DATASUM and CHECKSUM of the current HDU, in that order.
    fn verify_checksum(&mut self) -> Result<(ChecksumState, ChecksumState)>;

    /// True when the header fill after END is all blanks.
    fn check_header_fill(&mut self) -> Result<bool>;

    /// True when the data fill to the block boundary carries the correct
    /// fill byte for the HDU type.
    fn check_data_fill(&mut self) -> Result<bool>;

    /// Reader-chosen row batch size for streaming data checks.
    fn row_batch_hint(&mut self) -> u64 {
        1024
    }

    /// Drain any queued reader error-stack lines. The bundled reader keeps
    /// none; readers wrapping libraries with global error stacks override
    /// this.
    fn take_error_stack(&mut self) -> Vec<String> {
        Vec::new()
    }
}

// ---------------------------------------------------------------------------
// MemReader
// ---------------------------------------------------------------------------

/// One scanned HDU.
#[derive(Debug, Clone)]
struct RawHdu {
    kind: HduKind,
    header_start: u64,
    data_start: u64,
    /// Unpadded data length in bytes.
    data_len: u64,
    /// `data_start` plus the padded data length.
    data_end: u64,
    ncards: usize,
    bitpix: i64,
    naxes: Vec<i64>,
    pcount: i64,
    truncated: bool,
}

/// A [`FitsReader`] over an in-memory byte buffer.
pub struct MemReader {
    data: Vec<u8>,
    label: String,
    hdus: Vec<RawHdu>,
    cur: usize,
    cols: Option<(usize, Vec<ColumnSpec>)>,
}

impl MemReader {
    /// Open a FITS stream held in memory. `label` is used in reports.
    pub fn open_bytes(data: Vec<u8>, label: impl Into<String>) -> Result<Self> {
        let label = label.into();
        let hdus = scan(&data)?;
        debug!(label = %label, bytes = data.len(), hdus = hdus.len(), "opened FITS stream");
        Ok(MemReader {
            data,
            label,
            hdus,
            cur: 0,
            cols: None,
        })
    }

    /// Read a file from disk and open it.
    pub fn open_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path).map_err(|source| Error::Open {
            path: path.display().to_string(),
            source,
        })?;
        Self::open_bytes(data, path.display().to_string())
    }

    fn hdu(&self) -> &RawHdu {
        &self.hdus[self.cur]
    }

    fn find_card(&self, name: &str) -> Option<ParsedCard> {
        let h = self.hdu();
        let mut padded = [b' '; 8];
        let bytes = name.as_bytes();
        if bytes.len() > 8 {
            return None;
        }
        padded[..bytes.len()].copy_from_slice(bytes);
        for i in 0..h.ncards {
            let start = h.header_start as usize + i * CARD_SIZE;
            if self.data[start..start + 8] == padded {
                return Some(parse_card(i + 1, &self.data[start..start + CARD_SIZE]));
            }
        }
        None
    }

    fn table_dims(&self) -> Result<(u64, u64)> {
        let h = self.hdu();
        if !matches!(h.kind, HduKind::AsciiTable | HduKind::BinaryTable) {
            return Err(Error::WrongHduType);
        }
        let naxis1 = *h.naxes.first().unwrap_or(&0);
        let naxis2 = *h.naxes.get(1).unwrap_or(&0);
        if naxis1 < 0 || naxis2 < 0 {
            return Err(Error::SizeOverflow("negative NAXISn"));
        }
        Ok((naxis1 as u64, naxis2 as u64))
    }

    /// Ensure the column cache describes the current HDU.
    fn build_columns(&mut self) -> Result<()> {
        if matches!(&self.cols, Some((hdu, _)) if *hdu == self.cur) {
            return Ok(());
        }
        let kind = self.hdu().kind;
        let tfields = match self.find_card("TFIELDS").and_then(|c| c.value.parse::<i64>().ok()) {
            Some(n) if n >= 0 => n as usize,
            _ => return Err(Error::MissingKeyword("TFIELDS")),
        };
        let mut cols = Vec::with_capacity(tfields);
        let mut offset = 0u64;
        for i in 1..=tfields {
            let tform_card = self
                .find_card(&format!("TFORM{i}"))
                .ok_or(Error::MissingKeyword("TFORMn"))?;
            let raw = tform_card.value.clone();
            let name = self
                .find_card(&format!("TTYPE{i}"))
                .filter(|c| c.kind == CardKind::Str)
                .map(|c| c.value);
            let spec = if kind == HduKind::AsciiTable {
                let fmt = parse_tform_ascii(&raw)?;
                let tbcol = self
                    .find_card(&format!("TBCOL{i}"))
                    .and_then(|c| c.value.parse::<i64>().ok())
                    .ok_or(Error::MissingKeyword("TBCOLn"))?;
                if tbcol < 1 {
                    return Err(Error::InvalidTform(raw));
                }
                ColumnSpec {
                    col_type: ColType::Ascii,
                    repeat: 1,
                    elem_size: 1,
                    max_var_len: None,
                    kind: TformKind::Fixed,
                    width: fmt.width,
                    offset: (tbcol - 1) as u64,
                    ascii: Some(fmt),
                    raw_tform: raw,
                    name,
                }
            } else {
                let t = parse_tform_binary(&raw)?;
                let width = t.byte_width();
                let spec = ColumnSpec {
                    col_type: t.col_type,
                    repeat: t.repeat,
                    elem_size: t.col_type.byte_size(),
                    max_var_len: t.max_len,
                    kind: t.kind,
                    width,
                    offset,
                    ascii: None,
                    raw_tform: raw,
                    name,
                };
                offset += width;
                spec
            };
            cols.push(spec);
        }
        self.cols = Some((self.cur, cols));
        Ok(())
    }

    fn heap_start(&self) -> Result<u64> {
        let h = self.hdu();
        let (naxis1, naxis2) = self.table_dims()?;
        let theap = self
            .find_card("THEAP")
            .and_then(|c| c.value.parse::<i64>().ok())
            .filter(|&t| t >= 0)
            .map(|t| t as u64)
            .unwrap_or(naxis1 * naxis2);
        Ok(h.data_start + theap)
    }

    fn slice(&self, start: u64, len: u64) -> Result<&[u8]> {
        let end = start
            .checked_add(len)
            .ok_or(Error::SizeOverflow("byte range"))?;
        if end > self.data.len() as u64 {
            return Err(Error::UnexpectedEof);
        }
        Ok(&self.data[start as usize..end as usize])
    }
}

impl FitsReader for MemReader {
    fn label(&self) -> &str {
        &self.label
    }

    fn hdu_count(&mut self) -> Result<usize> {
        Ok(self.hdus.len())
    }

    fn move_to_hdu(&mut self, hdunum: usize) -> Result<HduKind> {
        if hdunum == 0 || hdunum > self.hdus.len() {
            return Err(Error::NoSuchHdu(hdunum));
        }
        self.cur = hdunum - 1;
        trace!(hdunum, kind = %self.hdu().kind, "moved to HDU");
        Ok(self.hdu().kind)
    }

    fn move_relative_hdu(&mut self, delta: i64) -> Result<HduKind> {
        let target = self.cur as i64 + delta;
        if target < 0 {
            return Err(Error::NoSuchHdu(0));
        }
        if target as usize >= self.hdus.len() {
            return Err(Error::EndOfFile);
        }
        self.cur = target as usize;
        Ok(self.hdu().kind)
    }

    fn num_cards(&mut self) -> Result<usize> {
        Ok(self.hdu().ncards)
    }

    fn read_card(&mut self, index: usize) -> Result<[u8; CARD_SIZE]> {
        let h = self.hdu();
        if index == 0 || index > h.ncards {
            return Err(Error::NoSuchCard(index));
        }
        let start = h.header_start as usize + (index - 1) * CARD_SIZE;
        let mut card = [0u8; CARD_SIZE];
        card.copy_from_slice(&self.data[start..start + CARD_SIZE]);
        Ok(card)
    }

    fn read_key_int(&mut self, name: &str) -> Result<Option<i64>> {
        Ok(self
            .find_card(name)
            .filter(|c| c.kind == CardKind::Int)
            .and_then(|c| c.value.parse().ok()))
    }

    fn read_key_flt(&mut self, name: &str) -> Result<Option<f64>> {
        Ok(self
            .find_card(name)
            .filter(|c| matches!(c.kind, CardKind::Int | CardKind::Float))
            .and_then(|c| c.value.replace(['D', 'd'], "E").parse().ok()))
    }

    fn read_key_str(&mut self, name: &str) -> Result<Option<String>> {
        Ok(self
            .find_card(name)
            .filter(|c| c.kind == CardKind::Str)
            .map(|c| c.value))
    }

    fn hdu_byte_range(&mut self) -> Result<(u64, u64, u64)> {
        let h = self.hdu();
        Ok((h.header_start, h.data_start, h.data_end))
    }

    fn position_at_byte(&mut self, offset: u64) -> Result<bool> {
        Ok(offset < self.data.len() as u64)
    }

    fn parse_tform(&mut self, col: usize) -> Result<ColumnSpec> {
        self.build_columns()?;
        let Some((_, cols)) = &self.cols else {
            return Err(Error::NoSuchColumn(col));
        };
        if col == 0 || col > cols.len() {
            return Err(Error::NoSuchColumn(col));
        }
        Ok(cols[col - 1].clone())
    }

    fn read_descriptor(&mut self, col: usize, row: u64) -> Result<(u64, u64)> {
        let (naxis1, naxis2) = self.table_dims()?;
        if row == 0 || row > naxis2 {
            return Err(Error::UnexpectedEof);
        }
        let spec = self.parse_tform(col)?;
        let h = self.hdu();
        let base = h.data_start + (row - 1) * naxis1 + spec.offset;
        match spec.kind {
            TformKind::VarP => {
                let bytes = self.slice(base, 8)?;
                let len = u32::from_be_bytes(bytes[0..4].try_into().unwrap()) as u64;
                let off = u32::from_be_bytes(bytes[4..8].try_into().unwrap()) as u64;
                Ok((len, off))
            }
            TformKind::VarQ => {
                let bytes = self.slice(base, 16)?;
                let len = u64::from_be_bytes(bytes[0..8].try_into().unwrap());
                let off = u64::from_be_bytes(bytes[8..16].try_into().unwrap());
                Ok((len, off))
            }
            TformKind::Fixed => Err(Error::WrongHduType),
        }
    }

    fn read_column_raw(&mut self, col: usize, first_row: u64, nrows: u64) -> Result<Vec<u8>> {
        if nrows == 0 {
            return Ok(Vec::new());
        }
        let (naxis1, naxis2) = self.table_dims()?;
        if first_row == 0 || first_row + nrows - 1 > naxis2 {
            return Err(Error::UnexpectedEof);
        }
        let spec = self.parse_tform(col)?;
        if spec.width == 0 {
            return Ok(Vec::new());
        }
        let h = self.hdu();
        let data_start = h.data_start;
        let mut out = Vec::with_capacity((spec.width * nrows) as usize);
        for row in first_row..first_row + nrows {
            let base = data_start + (row - 1) * naxis1 + spec.offset;
            out.extend_from_slice(self.slice(base, spec.width)?);
        }
        Ok(out)
    }

    fn read_rows_raw(&mut self, first_row: u64, nrows: u64) -> Result<Vec<u8>> {
        if nrows == 0 {
            return Ok(Vec::new());
        }
        let (naxis1, naxis2) = self.table_dims()?;
        if first_row == 0 || first_row + nrows - 1 > naxis2 {
            return Err(Error::UnexpectedEof);
        }
        let h = self.hdu();
        let base = h.data_start + (first_row - 1) * naxis1;
        Ok(self.slice(base, naxis1 * nrows)?.to_vec())
    }

    fn read_heap(&mut self, offset: u64, len: u64) -> Result<Vec<u8>> {
        let heap = self.heap_start()?;
        let h = self.hdu();
        let end = heap
            .checked_add(offset)
            .and_then(|s| s.checked_add(len))
            .ok_or(Error::SizeOverflow("heap range"))?;
        if end > h.data_start + h.data_len {
            return Err(Error::UnexpectedEof);
        }
        Ok(self.slice(heap + offset, len)?.to_vec())
    }

    fn verify_checksum(&mut self) -> Result<(ChecksumState, ChecksumState)> {
        let datasum = self.find_card("DATASUM").filter(|c| c.kind == CardKind::Str);
        let checksum = self.find_card("CHECKSUM").filter(|c| c.kind == CardKind::Str);
        let h = self.hdu();
        if h.data_end > self.data.len() as u64 {
            return Err(Error::UnexpectedEof);
        }
        let data_state = match datasum {
            None => ChecksumState::NotPresent,
            Some(card) => {
                let region = &self.data[h.data_start as usize..h.data_end as usize];
                if datasum_matches(&card.value, region) {
                    ChecksumState::Valid
                } else {
                    ChecksumState::Invalid
                }
            }
        };
        let hdu_state = match checksum {
            None => ChecksumState::NotPresent,
            Some(_) => {
                let region = &self.data[h.header_start as usize..h.data_end as usize];
                if hdu_sum_ok(region) {
                    ChecksumState::Valid
                } else {
                    ChecksumState::Invalid
                }
            }
        };
        Ok((data_state, hdu_state))
    }

    fn check_header_fill(&mut self) -> Result<bool> {
        let h = self.hdu();
        let fill_start = h.header_start as usize + (h.ncards + 1) * CARD_SIZE;
        let fill_end = h.data_start as usize;
        Ok(self.data[fill_start..fill_end]
            .iter()
            .all(|&b| b == HEADER_FILL_BYTE))
    }

    fn check_data_fill(&mut self) -> Result<bool> {
        let h = self.hdu();
        let fill = if h.kind == HduKind::AsciiTable {
            ASCII_FILL_BYTE
        } else {
            DATA_FILL_BYTE
        };
        let fill_start = (h.data_start + h.data_len) as usize;
        let fill_end = (h.data_end.min(self.data.len() as u64)) as usize;
        if fill_start >= fill_end {
            return Ok(true);
        }
        Ok(self.data[fill_start..fill_end].iter().all(|&b| b == fill))
    }

    fn row_batch_hint(&mut self) -> u64 {
        let naxis1 = self.hdu().naxes.first().copied().unwrap_or(1).max(1) as u64;
        (256 * 1024 / naxis1).clamp(1, 65536)
    }
}

// ---------------------------------------------------------------------------
// Stream scanning
// ---------------------------------------------------------------------------

fn card_name(bytes: &[u8]) -> &[u8] {
    let name = &bytes[..8.min(bytes.len())];
    let end = name.iter().rposition(|&b| b != b' ').map_or(0, |i| i + 1);
    &name[..end]
}

/// Walk the stream HDU by HDU, computing data sizes from the header
/// geometry keywords. Scanning stops at the first block that cannot be the
/// start of an extension; any remaining bytes are left for the end-of-file
/// checks to flag.
fn scan(data: &[u8]) -> Result<Vec<RawHdu>> {
    if data.len() < BLOCK_SIZE {
        return Err(Error::NotFits("stream is shorter than one 2880-byte block"));
    }
    {
        let first = card_name(data);
        if first != b"SIMPLE" && first != b"XTENSION" {
            return Err(Error::NotFits("first card is neither SIMPLE nor XTENSION"));
        }
    }

    let mut hdus: Vec<RawHdu> = Vec::new();
    let mut offset = 0usize;

    while offset + BLOCK_SIZE <= data.len() {
        if !hdus.is_empty() && card_name(&data[offset..]) != b"XTENSION" {
            break;
        }

        // Locate END.
        let mut ncards = None;
        let mut header_len = 0usize;
        'blocks: for block in 0.. {
            let bstart = offset + block * BLOCK_SIZE;
            if bstart + BLOCK_SIZE > data.len() {
                break;
            }
            for c in 0..BLOCK_SIZE / CARD_SIZE {
                let cstart = bstart + c * CARD_SIZE;
                if &data[cstart..cstart + 8] == b"END     " {
                    ncards = Some(block * (BLOCK_SIZE / CARD_SIZE) + c);
                    header_len = (block + 1) * BLOCK_SIZE;
                    break 'blocks;
                }
            }
        }
        let Some(ncards) = ncards else {
            if hdus.is_empty() {
                return Err(Error::MissingEnd);
            }
            break;
        };

        let header = &data[offset..offset + header_len];
        let mut hdu = match summarize_header(header, ncards, offset as u64, hdus.is_empty()) {
            Ok(h) => h,
            Err(e) if hdus.is_empty() => return Err(e),
            Err(_) => break,
        };
        hdu.truncated = hdu.data_start + hdu.data_len > data.len() as u64;
        let truncated = hdu.truncated;
        offset = hdu.data_end as usize;
        hdus.push(hdu);
        if truncated {
            break;
        }
    }

    Ok(hdus)
}

/// Extract the geometry keywords from one header and compute the data size.
fn summarize_header(header: &[u8], ncards: usize, start: u64, first: bool) -> Result<RawHdu> {
    let mut bitpix: i64 = 0;
    let mut naxis: i64 = 0;
    let mut pcount: i64 = 0;
    let mut gcount: i64 = 1;
    let mut groups = false;
    let mut xtension: Option<String> = None;

    for i in 0..ncards {
        let bytes = &header[i * CARD_SIZE..(i + 1) * CARD_SIZE];
        let name = card_name(bytes);
        match name {
            b"BITPIX" | b"NAXIS" | b"PCOUNT" | b"GCOUNT" => {
                let card = parse_card(i + 1, bytes);
                if let Ok(v) = card.value.parse::<i64>() {
                    match name {
                        b"BITPIX" => bitpix = v,
                        b"NAXIS" => naxis = v,
                        b"PCOUNT" => pcount = v,
                        _ => gcount = v,
                    }
                }
            }
            b"GROUPS" => {
                let card = parse_card(i + 1, bytes);
                groups = card.kind == CardKind::Logical && card.value == "T";
            }
            b"XTENSION" => {
                let card = parse_card(i + 1, bytes);
                if card.kind == CardKind::Str {
                    xtension = Some(card.value.trim().to_string());
                }
            }
            _ => {}
        }
    }

    let naxis = naxis.clamp(0, 999) as usize;
    let mut naxes = vec![0i64; naxis];
    for i in 0..ncards {
        let bytes = &header[i * CARD_SIZE..(i + 1) * CARD_SIZE];
        let name = card_name(bytes);
        if name.len() > 5 && &name[..5] == b"NAXIS" {
            let idx: usize = match std::str::from_utf8(&name[5..]).ok().and_then(|s| s.parse().ok())
            {
                Some(n) => n,
                None => continue,
            };
            if idx >= 1 && idx <= naxis {
                let card = parse_card(i + 1, bytes);
                if let Ok(v) = card.value.parse::<i64>() {
                    naxes[idx - 1] = v;
                }
            }
        }
    }

    let kind = if first {
        HduKind::Primary
    } else {
        match xtension.as_deref() {
            Some("IMAGE") => HduKind::Image,
            Some("TABLE") => HduKind::AsciiTable,
            Some("BINTABLE") | Some("A3DTABLE") => HduKind::BinaryTable,
            _ => HduKind::Unknown,
        }
    };

    // Element size in bytes. Unusual BITPIX values still yield a usable
    // estimate so the header validator can report them.
    let elem = (bitpix.unsigned_abs() / 8).max(if bitpix == 0 { 0 } else { 1 });

    let dims_product = |dims: &[i64]| -> Result<u64> {
        dims.iter().try_fold(1u64, |acc, &d| {
            let d = if d < 0 { 0 } else { d as u64 };
            acc.checked_mul(d).ok_or(Error::SizeOverflow("NAXISn product"))
        })
    };

    let data_len: u64 = if naxis == 0 {
        0
    } else if first && naxes[0] == 0 && groups {
        // Random groups: bytes = elem * GCOUNT * (PCOUNT + NAXIS2*...*NAXISm)
        let product = dims_product(&naxes[1..])?;
        let group = (pcount.max(0) as u64)
            .checked_add(product)
            .ok_or(Error::SizeOverflow("random groups size"))?;
        elem.checked_mul(gcount.max(0) as u64)
            .and_then(|v| v.checked_mul(group))
            .ok_or(Error::SizeOverflow("random groups size"))?
    } else {
        let pixels = dims_product(&naxes)?;
        let pcount = if first { 0 } else { pcount.max(0) as u64 };
        let gcount = if first { 1 } else { (gcount.max(1)) as u64 };
        pixels
            .checked_mul(elem)
            .and_then(|v| v.checked_add(pcount))
            .and_then(|v| v.checked_mul(gcount))
            .ok_or(Error::SizeOverflow("data size"))?
    };

    let data_start = start + header.len() as u64;
    let data_end = data_start + padded_byte_len(data_len);

    Ok(RawHdu {
        kind,
        header_start: start,
        data_start,
        data_len,
        data_end,
        ncards,
        bitpix,
        naxes,
        pcount,
        truncated: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_card(s: &str) -> [u8; CARD_SIZE] {
        let mut buf = [b' '; CARD_SIZE];
        buf[..s.len()].copy_from_slice(s.as_bytes());
        buf
    }

    fn header_block(cards: &[&str]) -> Vec<u8> {
        assert!(cards.len() < 36);
        let mut block = vec![b' '; BLOCK_SIZE];
        for (i, c) in cards.iter().enumerate() {
            block[i * CARD_SIZE..(i + 1) * CARD_SIZE].copy_from_slice(&make_card(c));
        }
        let end = cards.len() * CARD_SIZE;
        block[end..end + CARD_SIZE].copy_from_slice(&make_card("END"));
        block
    }

    fn minimal_image() -> Vec<u8> {
        let mut data = header_block(&[
            "SIMPLE  =                    T",
            "BITPIX  =                   16",
            "NAXIS   =                    2",
            "NAXIS1  =                   10",
            "NAXIS2  =                   10",
        ]);
        data.resize(data.len() + BLOCK_SIZE, 0);
        data
    }

    #[test]
    fn scan_minimal_image() {
        let mut r = MemReader::open_bytes(minimal_image(), "mem").unwrap();
        assert_eq!(r.hdu_count().unwrap(), 1);
        assert_eq!(r.move_to_hdu(1).unwrap(), HduKind::Primary);
        assert_eq!(r.num_cards().unwrap(), 5);
        let (hs, ds, de) = r.hdu_byte_range().unwrap();
        assert_eq!(hs, 0);
        assert_eq!(ds, BLOCK_SIZE as u64);
        assert_eq!(de, 2 * BLOCK_SIZE as u64);
    }

    #[test]
    fn scan_rejects_short_stream() {
        assert!(matches!(
            MemReader::open_bytes(vec![0u8; 100], "mem"),
            Err(Error::NotFits(_))
        ));
    }

    #[test]
    fn scan_rejects_non_fits() {
        let mut data = vec![b' '; BLOCK_SIZE];
        data[..5].copy_from_slice(b"HELLO");
        assert!(matches!(
            MemReader::open_bytes(data, "mem"),
            Err(Error::NotFits(_))
        ));
    }

    #[test]
    fn scan_reports_missing_end() {
        let mut data = minimal_image();
        // Blank out the END card.
        let end_pos = 5 * CARD_SIZE;
        data[end_pos..end_pos + CARD_SIZE].copy_from_slice(&[b' '; CARD_SIZE]);
        assert!(matches!(
            MemReader::open_bytes(data, "mem"),
            Err(Error::MissingEnd)
        ));
    }

    #[test]
    fn scan_two_hdus() {
        let mut data = header_block(&[
            "SIMPLE  =                    T",
            "BITPIX  =                    8",
            "NAXIS   =                    0",
        ]);
        data.extend_from_slice(&header_block(&[
            "XTENSION= 'IMAGE   '",
            "BITPIX  =                    8",
            "NAXIS   =                    1",
            "NAXIS1  =                   16",
            "PCOUNT  =                    0",
            "GCOUNT  =                    1",
        ]));
        data.resize(data.len() + BLOCK_SIZE, 0);
        let mut r = MemReader::open_bytes(data, "mem").unwrap();
        assert_eq!(r.hdu_count().unwrap(), 2);
        assert_eq!(r.move_to_hdu(2).unwrap(), HduKind::Image);
        assert!(matches!(r.move_relative_hdu(1), Err(Error::EndOfFile)));
    }

    #[test]
    fn key_reads() {
        let mut r = MemReader::open_bytes(minimal_image(), "mem").unwrap();
        r.move_to_hdu(1).unwrap();
        assert_eq!(r.read_key_int("BITPIX").unwrap(), Some(16));
        assert_eq!(r.read_key_int("NAXIS2").unwrap(), Some(10));
        assert_eq!(r.read_key_int("MISSING").unwrap(), None);
        assert_eq!(r.read_key_flt("BITPIX").unwrap(), Some(16.0));
        assert_eq!(r.read_key_str("BITPIX").unwrap(), None);
    }

    #[test]
    fn position_at_byte_bounds() {
        let mut r = MemReader::open_bytes(minimal_image(), "mem").unwrap();
        let len = 2 * BLOCK_SIZE as u64;
        assert!(r.position_at_byte(len - 1).unwrap());
        assert!(!r.position_at_byte(len).unwrap());
    }

    #[test]
    fn header_fill_detects_junk() {
        let mut data = minimal_image();
        // A byte after END inside the header block.
        data[7 * CARD_SIZE + 3] = b'x';
        let mut r = MemReader::open_bytes(data, "mem").unwrap();
        r.move_to_hdu(1).unwrap();
        assert!(!r.check_header_fill().unwrap());

        let mut r = MemReader::open_bytes(minimal_image(), "mem").unwrap();
        r.move_to_hdu(1).unwrap();
        assert!(r.check_header_fill().unwrap());
    }

    #[test]
    fn data_fill_checks_fill_byte() {
        let mut data = minimal_image();
        // Data is 200 bytes; corrupt a fill byte past it.
        let pos = BLOCK_SIZE + 250;
        data[pos] = 0xFF;
        let mut r = MemReader::open_bytes(data, "mem").unwrap();
        r.move_to_hdu(1).unwrap();
        assert!(!r.check_data_fill().unwrap());
    }

    fn bintable_file(rows: u64, tforms: &[&str], row_bytes: usize, pcount: usize) -> Vec<u8> {
        let mut cards = vec![
            "XTENSION= 'BINTABLE'".to_string(),
            "BITPIX  =                    8".to_string(),
            "NAXIS   =                    2".to_string(),
            format!("NAXIS1  = {:>20}", row_bytes),
            format!("NAXIS2  = {:>20}", rows),
            format!("PCOUNT  = {:>20}", pcount),
            "GCOUNT  =                    1".to_string(),
            format!("TFIELDS = {:>20}", tforms.len()),
        ];
        for (i, t) in tforms.iter().enumerate() {
            cards.push(format!("TFORM{:<3}= '{t:<8}'", i + 1));
        }
        let refs: Vec<&str> = cards.iter().map(|s| s.as_str()).collect();

        let mut data = header_block(&[
            "SIMPLE  =                    T",
            "BITPIX  =                    8",
            "NAXIS   =                    0",
        ]);
        data.extend_from_slice(&header_block(&refs));
        let payload = rows as usize * row_bytes + pcount;
        data.resize(data.len() + padded_byte_len(payload as u64) as usize, 0);
        data
    }

    #[test]
    fn binary_columns_layout() {
        let mut r = MemReader::open_bytes(bintable_file(3, &["1J", "2E", "4A"], 16, 0), "mem")
            .unwrap();
        r.move_to_hdu(2).unwrap();
        let c1 = r.parse_tform(1).unwrap();
        assert_eq!(c1.offset, 0);
        assert_eq!(c1.width, 4);
        let c2 = r.parse_tform(2).unwrap();
        assert_eq!(c2.offset, 4);
        assert_eq!(c2.width, 8);
        let c3 = r.parse_tform(3).unwrap();
        assert_eq!(c3.offset, 12);
        assert_eq!(c3.width, 4);
        assert!(r.parse_tform(4).is_err());
    }

    #[test]
    fn read_descriptor_p_format() {
        let mut bytes = bintable_file(2, &["1PE(5)"], 8, 64);
        // Row 2 descriptor: length 3, offset 20.
        let data_start = 2 * BLOCK_SIZE;
        let row2 = data_start + 8;
        bytes[row2..row2 + 4].copy_from_slice(&3u32.to_be_bytes());
        bytes[row2 + 4..row2 + 8].copy_from_slice(&20u32.to_be_bytes());
        let mut r = MemReader::open_bytes(bytes, "mem").unwrap();
        r.move_to_hdu(2).unwrap();
        assert_eq!(r.read_descriptor(1, 2).unwrap(), (3, 20));
        assert_eq!(r.read_descriptor(1, 1).unwrap(), (0, 0));
    }

    #[test]
    fn checksum_states() {
        let mut r = MemReader::open_bytes(minimal_image(), "mem").unwrap();
        r.move_to_hdu(1).unwrap();
        assert_eq!(
            r.verify_checksum().unwrap(),
            (ChecksumState::NotPresent, ChecksumState::NotPresent)
        );

        let data = header_block(&[
            "SIMPLE  =                    T",
            "BITPIX  =                    8",
            "NAXIS   =                    0",
            "DATASUM = '0       '",
        ]);
        let mut r = MemReader::open_bytes(data, "mem").unwrap();
        r.move_to_hdu(1).unwrap();
        let (d, h) = r.verify_checksum().unwrap();
        assert_eq!(d, ChecksumState::Valid);
        assert_eq!(h, ChecksumState::NotPresent);
    }

    #[test]
    fn read_rows_and_columns() {
        let mut bytes = bintable_file(2, &["2A"], 2, 0);
        let data_start = 2 * BLOCK_SIZE;
        bytes[data_start..data_start + 4].copy_from_slice(b"abcd");
        let mut r = MemReader::open_bytes(bytes, "mem").unwrap();
        r.move_to_hdu(2).unwrap();
        assert_eq!(r.read_rows_raw(1, 2).unwrap(), b"abcd");
        assert_eq!(r.read_column_raw(1, 2, 1).unwrap(), b"cd");
        assert!(r.read_rows_raw(2, 2).is_err());
    }
}
