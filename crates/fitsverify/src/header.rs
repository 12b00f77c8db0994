//! Per-HDU header validation.
//!
//! [`init_hdu`] ingests every card of the current header through the card
//! parser and assembles an [`HduView`]; [`verify_header`] then runs the
//! mandatory-sequence, placement, indexed-column, WCS, and convention checks
//! against it. The view lives for exactly one HDU and is dropped on every
//! path out of the driver loop.

use crate::block::CARD_SIZE;
use crate::card::{
    check_fixed_int, check_fixed_log, check_fixed_str, check_flt, check_int, check_log,
    check_str, parse_card, report_card_errors, CardKind, ParsedCard,
};
use crate::codes::ErrorCode;
use crate::error::Result;
use crate::reader::{FitsReader, HduKind};
use crate::tform::{parse_tform_ascii, parse_tform_binary, ColType, TformKind};
use crate::verifier::Verifier;

/// Everything the validators need from one header, assembled once.
pub(crate) struct HduView {
    pub hdunum: usize,
    pub kind: HduKind,
    pub cards: Vec<ParsedCard>,
    pub raw_cards: Vec<[u8; CARD_SIZE]>,
    /// Card indices (0-based) ordered by keyword name.
    pub sorted: Vec<usize>,
    pub bitpix: Option<i64>,
    pub naxis: Option<i64>,
    pub naxes: Vec<Option<i64>>,
    pub pcount: Option<i64>,
    pub gcount: Option<i64>,
    pub tfields: usize,
    pub ttype: Vec<Option<String>>,
    pub tform: Vec<Option<String>>,
    pub tunit: Vec<Option<String>>,
    pub is_random_groups: bool,
    pub is_tile_compressed: bool,
    pub use_longstring: bool,
    pub extname: String,
    pub extver: i64,
}

impl HduView {
    fn position(&self, name: &str) -> Option<usize> {
        self.cards.iter().position(|c| c.name == name).map(|i| i + 1)
    }

    fn get(&self, name: &str) -> Option<&ParsedCard> {
        self.cards.iter().find(|c| c.name == name)
    }

    fn count(&self, name: &str) -> usize {
        self.cards.iter().filter(|c| c.name == name).count()
    }

    fn card_at(&self, pos: usize) -> Option<&ParsedCard> {
        self.cards.get(pos - 1)
    }

    fn raw_at(&self, pos: usize) -> &[u8; CARD_SIZE] {
        &self.raw_cards[pos - 1]
    }

    fn int_value(&self, name: &str) -> Option<i64> {
        self.get(name)
            .filter(|c| c.kind == CardKind::Int)
            .and_then(|c| c.value.parse().ok())
    }

    pub(crate) fn is_table(&self) -> bool {
        matches!(self.kind, HduKind::AsciiTable | HduKind::BinaryTable)
    }

    /// Binary column element type for 1-based column `n`, when TFORMn parses.
    fn col_type(&self, n: usize) -> Option<ColType> {
        let raw = self.tform.get(n - 1)?.as_deref()?;
        parse_tform_binary(raw).ok().map(|t| t.col_type)
    }
}

/// Read and parse every card of the current header, reporting card-level
/// format violations along the way, and collect the geometry the later
/// checks need.
pub(crate) fn init_hdu(
    v: &mut Verifier,
    reader: &mut dyn FitsReader,
    hdunum: usize,
    kind: HduKind,
) -> Result<HduView> {
    let ncards = reader.num_cards()?;
    let mut cards = Vec::with_capacity(ncards);
    let mut raw_cards = Vec::with_capacity(ncards);
    for i in 1..=ncards {
        let raw = reader.read_card(i)?;
        let card = parse_card(i, &raw);
        report_card_errors(v, &card);
        cards.push(card);
        raw_cards.push(raw);
    }

    let mut sorted: Vec<usize> = (0..cards.len()).collect();
    sorted.sort_by(|&a, &b| cards[a].name.cmp(&cards[b].name).then(a.cmp(&b)));

    let mut view = HduView {
        hdunum,
        kind,
        cards,
        raw_cards,
        sorted,
        bitpix: None,
        naxis: None,
        naxes: Vec::new(),
        pcount: None,
        gcount: None,
        tfields: 0,
        ttype: Vec::new(),
        tform: Vec::new(),
        tunit: Vec::new(),
        is_random_groups: false,
        is_tile_compressed: false,
        use_longstring: false,
        extname: String::new(),
        extver: 0,
    };

    view.bitpix = view.int_value("BITPIX");
    view.naxis = view.int_value("NAXIS");
    let naxis = view.naxis.unwrap_or(0).clamp(0, 999) as usize;
    view.naxes = (1..=naxis)
        .map(|i| view.int_value(&format!("NAXIS{i}")))
        .collect();
    view.pcount = view.int_value("PCOUNT");
    view.gcount = view.int_value("GCOUNT");
    view.tfields = view.int_value("TFIELDS").unwrap_or(0).clamp(0, 999) as usize;

    let str_value = |view: &HduView, name: &str| {
        view.get(name)
            .filter(|c| c.kind == CardKind::Str)
            .map(|c| c.value.clone())
    };
    view.ttype = (1..=view.tfields)
        .map(|i| str_value(&view, &format!("TTYPE{i}")))
        .collect();
    view.tform = (1..=view.tfields)
        .map(|i| str_value(&view, &format!("TFORM{i}")))
        .collect();
    view.tunit = (1..=view.tfields)
        .map(|i| str_value(&view, &format!("TUNIT{i}")))
        .collect();

    let logical_true = |view: &HduView, name: &str| {
        view.get(name)
            .is_some_and(|c| c.kind == CardKind::Logical && c.value == "T")
    };
    view.is_random_groups = kind == HduKind::Primary
        && view.naxes.first().copied().flatten() == Some(0)
        && logical_true(&view, "GROUPS");
    view.is_tile_compressed = logical_true(&view, "ZIMAGE");
    view.use_longstring = view.cards.iter().any(|c| {
        c.name == "CONTINUE" || (c.kind == CardKind::Str && c.value.ends_with('&'))
    });
    view.extname = str_value(&view, "EXTNAME")
        .map(|s| s.trim().to_string())
        .unwrap_or_default();
    view.extver = view.int_value("EXTVER").unwrap_or(0);

    Ok(view)
}

/// Run every header check for one HDU.
pub(crate) fn verify_header(v: &mut Verifier, reader: &mut dyn FitsReader, hdu: &HduView) {
    print_title(v, hdu);
    if v.opts.print_header {
        print_header_listing(v, hdu);
    }

    match hdu.kind {
        HduKind::Primary => test_primary(v, hdu),
        HduKind::AsciiTable | HduKind::BinaryTable => {
            test_extension_prefix(v, hdu);
            test_table_structure(v, hdu);
        }
        HduKind::Image | HduKind::Unknown => test_extension_prefix(v, hdu),
    }

    test_placement(v, hdu);
    test_indexed_keywords(v, hdu);
    test_wcs(v, hdu);
    test_reserved_types(v, hdu);
    test_conventions(v, hdu);
    test_duplicates(v, hdu);
    if hdu.is_table() {
        test_column_names(v, hdu);
    }
    if v.opts.test_hierarch {
        test_hierarch(v, hdu);
    }

    if v.opts.test_fill {
        match reader.check_header_fill() {
            Ok(true) => {}
            Ok(false) => v.err(
                ErrorCode::HeaderFill,
                "Header fill area contains characters other than blanks.",
                1,
            ),
            Err(e) => v.reader_err(ErrorCode::Reader, "checking header fill: ", &e, 1),
        }
    }
}

fn print_title(v: &mut Verifier, hdu: &HduView) {
    v.info(" ");
    let title = format!(" HDU {}: {} ", hdu.hdunum, hdu.kind);
    v.separator('=', &title, 60);
    v.info(" ");
    let line = format!("{} header keywords", hdu.cards.len() + 1);
    v.info(&line);
    v.info(" ");
}

fn print_header_listing(v: &mut Verifier, hdu: &HduView) {
    let lines: Vec<String> = hdu
        .raw_cards
        .iter()
        .map(|raw| {
            let end = raw.iter().rposition(|&b| b != b' ').map_or(0, |i| i + 1);
            raw[..end].iter().map(|&b| b as char).collect()
        })
        .collect();
    for line in lines {
        v.info(&line);
    }
    v.info("END");
    v.info(" ");
}

// ---------------------------------------------------------------------------
// Mandatory keyword sequences
// ---------------------------------------------------------------------------

/// Track the running expected position while walking a mandatory sequence.
/// The first violation for each slot is reported; the tracker resyncs so one
/// misplaced card does not cascade into order errors for every later slot.
struct SlotWalk {
    next_pos: usize,
}

impl SlotWalk {
    fn new() -> Self {
        SlotWalk { next_pos: 1 }
    }

    /// Locate the card for `name`, reporting a missing-keyword or
    /// keyword-order violation. Returns the 1-based card position if the
    /// keyword exists anywhere.
    fn expect(&mut self, v: &mut Verifier, hdu: &HduView, name: &str) -> Option<usize> {
        match hdu.position(name) {
            Some(pos) if pos == self.next_pos => {
                self.next_pos += 1;
                Some(pos)
            }
            Some(pos) => {
                v.hint_keyword(name);
                let text = format!(
                    "Keyword #{pos}, {name}: mandatory keyword is out of order (expected \
                     at position #{}).",
                    self.next_pos
                );
                v.err(ErrorCode::KeywordOrder, &text, 1);
                self.next_pos = pos + 1;
                Some(pos)
            }
            None => {
                v.hint_keyword(name);
                let text = format!("Mandatory keyword {name} is not present.");
                v.err(ErrorCode::MissingKeyword, &text, 1);
                None
            }
        }
    }
}

fn check_mandatory_duplicate(v: &mut Verifier, hdu: &HduView, name: &str) {
    if hdu.count(name) > 1 {
        v.hint_keyword(name);
        let text = format!("Mandatory keyword {name} is duplicated in this header.");
        v.err(ErrorCode::KeywordDuplicate, &text, 1);
    }
}

const LEGAL_BITPIX: [i64; 6] = [8, 16, 32, 64, -32, -64];

fn check_bitpix_slot(v: &mut Verifier, hdu: &HduView, pos: usize) {
    let card = match hdu.card_at(pos) {
        Some(c) => c.clone(),
        None => return,
    };
    check_fixed_int(v, hdu.raw_at(pos));
    if !check_int(v, &card) {
        return;
    }
    let ok = card
        .value
        .parse::<i64>()
        .is_ok_and(|b| LEGAL_BITPIX.contains(&b));
    if !ok {
        v.hint_keyword("BITPIX");
        let text = format!(
            "Keyword #{pos}, BITPIX: value {} is not one of 8, 16, 32, 64, -32, or -64.",
            card.value
        );
        v.err(ErrorCode::KeywordValue, &text, 1);
    }
}

fn check_naxis_slot(v: &mut Verifier, hdu: &HduView, pos: usize) {
    let card = match hdu.card_at(pos) {
        Some(c) => c.clone(),
        None => return,
    };
    check_fixed_int(v, hdu.raw_at(pos));
    if !check_int(v, &card) {
        return;
    }
    let ok = card.value.parse::<i64>().is_ok_and(|n| (0..=999).contains(&n));
    if !ok {
        v.hint_keyword("NAXIS");
        let text = format!(
            "Keyword #{pos}, NAXIS: value {} is not in the range 0-999.",
            card.value
        );
        v.err(ErrorCode::KeywordValue, &text, 1);
    }
}

fn check_nonneg_int_slot(v: &mut Verifier, hdu: &HduView, pos: usize, name: &str) {
    let card = match hdu.card_at(pos) {
        Some(c) => c.clone(),
        None => return,
    };
    check_fixed_int(v, hdu.raw_at(pos));
    if !check_int(v, &card) {
        return;
    }
    if card.value.parse::<i64>().is_ok_and(|n| n < 0) {
        v.hint_keyword(name);
        let text = format!("Keyword #{pos}, {name}: value {} is negative.", card.value);
        v.err(ErrorCode::KeywordValue, &text, 1);
    }
}

fn test_primary(v: &mut Verifier, hdu: &HduView) {
    let mut walk = SlotWalk::new();

    if let Some(pos) = walk.expect(v, hdu, "SIMPLE") {
        check_mandatory_duplicate(v, hdu, "SIMPLE");
        let card = hdu.card_at(pos).cloned();
        if let Some(card) = card {
            check_fixed_log(v, hdu.raw_at(pos));
            if check_log(v, &card) && card.value == "F" {
                v.warn(
                    ErrorCode::SimpleFalse,
                    "SIMPLE = F: file does not conform to the FITS standard.",
                    false,
                );
            }
        }
    }

    if let Some(pos) = walk.expect(v, hdu, "BITPIX") {
        check_mandatory_duplicate(v, hdu, "BITPIX");
        check_bitpix_slot(v, hdu, pos);
    }

    if let Some(pos) = walk.expect(v, hdu, "NAXIS") {
        check_mandatory_duplicate(v, hdu, "NAXIS");
        check_naxis_slot(v, hdu, pos);
    }

    for i in 1..=hdu.naxes.len() {
        let name = format!("NAXIS{i}");
        if let Some(pos) = walk.expect(v, hdu, &name) {
            check_mandatory_duplicate(v, hdu, &name);
            check_nonneg_int_slot(v, hdu, pos, &name);
        }
    }

    if hdu.is_random_groups {
        for name in ["PCOUNT", "GCOUNT"] {
            if let Some(card) = hdu.get(name) {
                let card = card.clone();
                check_int(v, &card);
            } else {
                v.hint_keyword(name);
                let text = format!("Mandatory keyword {name} is not present in the random groups HDU.");
                v.err(ErrorCode::MissingKeyword, &text, 1);
            }
        }
    }
}

/// The shared XTENSION/BITPIX/NAXIS/NAXISn/PCOUNT/GCOUNT prefix of every
/// extension type.
fn test_extension_prefix(v: &mut Verifier, hdu: &HduView) {
    let mut walk = SlotWalk::new();

    if let Some(pos) = walk.expect(v, hdu, "XTENSION") {
        check_mandatory_duplicate(v, hdu, "XTENSION");
        let card = hdu.card_at(pos).cloned();
        if let Some(card) = card {
            check_fixed_str(v, hdu.raw_at(pos));
            if check_str(v, &card) {
                check_xtension_value(v, &card);
            }
        }
    }

    if let Some(pos) = walk.expect(v, hdu, "BITPIX") {
        check_mandatory_duplicate(v, hdu, "BITPIX");
        check_bitpix_slot(v, hdu, pos);
        if hdu.is_table() && hdu.bitpix.is_some_and(|b| b != 8) {
            v.hint_keyword("BITPIX");
            let text = format!(
                "Keyword #{pos}, BITPIX: must be 8 in a table extension, not {}.",
                hdu.bitpix.unwrap_or(0)
            );
            v.err(ErrorCode::KeywordValue, &text, 1);
        }
    }

    if let Some(pos) = walk.expect(v, hdu, "NAXIS") {
        check_mandatory_duplicate(v, hdu, "NAXIS");
        check_naxis_slot(v, hdu, pos);
        if hdu.is_table() && hdu.naxis.is_some_and(|n| n != 2) {
            v.hint_keyword("NAXIS");
            let text = format!(
                "Keyword #{pos}, NAXIS: must be 2 in a table extension, not {}.",
                hdu.naxis.unwrap_or(0)
            );
            v.err(ErrorCode::KeywordValue, &text, 1);
        }
    }

    for i in 1..=hdu.naxes.len() {
        let name = format!("NAXIS{i}");
        if let Some(pos) = walk.expect(v, hdu, &name) {
            check_mandatory_duplicate(v, hdu, &name);
            check_nonneg_int_slot(v, hdu, pos, &name);
        }
    }

    if let Some(pos) = walk.expect(v, hdu, "PCOUNT") {
        check_mandatory_duplicate(v, hdu, "PCOUNT");
        check_nonneg_int_slot(v, hdu, pos, "PCOUNT");
        let must_be_zero =
            matches!(hdu.kind, HduKind::Image | HduKind::AsciiTable) && hdu.pcount.is_some_and(|p| p != 0);
        if must_be_zero {
            v.hint_keyword("PCOUNT");
            let text = format!(
                "Keyword #{pos}, PCOUNT: must be 0 in this extension type, not {}.",
                hdu.pcount.unwrap_or(0)
            );
            v.err(ErrorCode::KeywordValue, &text, 1);
        }
    }

    if let Some(pos) = walk.expect(v, hdu, "GCOUNT") {
        check_mandatory_duplicate(v, hdu, "GCOUNT");
        check_nonneg_int_slot(v, hdu, pos, "GCOUNT");
        if hdu.gcount.is_some_and(|g| g != 1) {
            v.hint_keyword("GCOUNT");
            let text = format!(
                "Keyword #{pos}, GCOUNT: must be 1 in an extension, not {}.",
                hdu.gcount.unwrap_or(0)
            );
            v.err(ErrorCode::KeywordValue, &text, 1);
        }
    }

    if hdu.is_table() {
        if let Some(pos) = walk.expect(v, hdu, "TFIELDS") {
            check_mandatory_duplicate(v, hdu, "TFIELDS");
            check_nonneg_int_slot(v, hdu, pos, "TFIELDS");
            if hdu.int_value("TFIELDS").is_some_and(|t| t > 999) {
                v.hint_keyword("TFIELDS");
                let text =
                    format!("Keyword #{pos}, TFIELDS: value exceeds the maximum of 999 columns.");
                v.err(ErrorCode::KeywordValue, &text, 1);
            }
        }
    }
}

const LEGACY_XTENSIONS: [&str; 4] = ["A3DTABLE", "IUEIMAGE", "FOREIGN", "DUMP"];

fn check_xtension_value(v: &mut Verifier, card: &ParsedCard) {
    let value = card.value.as_str();
    if value.starts_with(' ') {
        v.hint_keyword("XTENSION");
        let text = format!(
            "Keyword #{}, XTENSION: value '{value}' has leading space(s).",
            card.index
        );
        v.err(ErrorCode::LeadingSpace, &text, 1);
    }
    let trimmed = value.trim();
    if matches!(trimmed, "IMAGE" | "TABLE" | "BINTABLE") {
        return;
    }
    if LEGACY_XTENSIONS.contains(&trimmed) {
        let text = format!("XTENSION = '{trimmed}' is a legacy extension type.");
        v.hint_keyword("XTENSION");
        v.warn(ErrorCode::LegacyXtension, &text, false);
    } else {
        v.hint_keyword("XTENSION");
        let text = format!(
            "Keyword #{}, XTENSION: value '{trimmed}' is not a registered extension type.",
            card.index
        );
        v.err(ErrorCode::KeywordValue, &text, 1);
    }
}

// ---------------------------------------------------------------------------
// Table structure
// ---------------------------------------------------------------------------

fn test_table_structure(v: &mut Verifier, hdu: &HduView) {
    let tfields = hdu.tfields;

    // Every column needs a TFORMn (and TBCOLn in ASCII tables).
    let mut width_sum: Option<u64> = Some(0);
    for n in 1..=tfields {
        let tform_name = format!("TFORM{n}");
        match hdu.get(&tform_name) {
            None => {
                v.hint_keyword(&tform_name);
                let text = format!("Mandatory keyword {tform_name} is not present.");
                v.err(ErrorCode::MissingKeyword, &text, 1);
                width_sum = None;
            }
            Some(card) => {
                let card = card.clone();
                let pos = hdu.position(&tform_name).unwrap_or(0);
                check_mandatory_duplicate(v, hdu, &tform_name);
                if !check_str(v, &card) {
                    width_sum = None;
                    continue;
                }
                check_fixed_str(v, hdu.raw_at(pos));
                if card.value.starts_with(' ') {
                    v.hint_keyword(&tform_name);
                    let text = format!(
                        "Keyword #{}, {tform_name}: value '{}' has leading space(s).",
                        card.index, card.value
                    );
                    v.err(ErrorCode::LeadingSpace, &text, 1);
                }
                match check_tform_value(v, hdu, &card, &tform_name) {
                    Some(width) => width_sum = width_sum.map(|s| s + width),
                    None => width_sum = None,
                }
            }
        }

        if hdu.kind == HduKind::AsciiTable {
            let tbcol_name = format!("TBCOL{n}");
            match hdu.get(&tbcol_name) {
                None => {
                    v.hint_keyword(&tbcol_name);
                    let text = format!("Mandatory keyword {tbcol_name} is not present.");
                    v.err(ErrorCode::MissingKeyword, &text, 1);
                }
                Some(card) => {
                    let card = card.clone();
                    check_mandatory_duplicate(v, hdu, &tbcol_name);
                    if check_int(v, &card) {
                        check_tbcol_value(v, hdu, &card, n);
                    }
                }
            }
        }
    }

    // TFIELDS must agree with the TFORMn keywords actually present.
    let actual_tforms = hdu
        .cards
        .iter()
        .filter(|c| split_indexed(&c.name).is_some_and(|(root, n)| root == "TFORM" && n >= 1))
        .count();
    if actual_tforms != tfields {
        v.hint_keyword("TFIELDS");
        let text = format!(
            "TFIELDS = {tfields} but {actual_tforms} TFORMn keyword(s) are present."
        );
        v.err(ErrorCode::BadTfields, &text, 1);
    }

    // Binary rows pack the columns back to back; NAXIS1 must match.
    if hdu.kind == HduKind::BinaryTable {
        if let (Some(sum), Some(naxis1)) = (width_sum, hdu.naxes.first().copied().flatten()) {
            if naxis1 >= 0 && sum != naxis1 as u64 {
                v.hint_keyword("NAXIS1");
                let text = format!(
                    "NAXIS1 = {naxis1}, but the sum of the column widths is {sum}."
                );
                v.err(ErrorCode::Naxis1Mismatch, &text, 1);
            }
        }
    }
}

/// Validate one TFORMn value; returns the column's fixed-row byte width
/// when it parses.
fn check_tform_value(
    v: &mut Verifier,
    hdu: &HduView,
    card: &ParsedCard,
    name: &str,
) -> Option<u64> {
    let value = card.value.trim();
    if hdu.kind == HduKind::AsciiTable {
        match parse_tform_ascii(value) {
            Ok(fmt) => Some(fmt.width),
            Err(_) => {
                v.hint_keyword(name);
                let text = format!(
                    "Keyword #{}, {name}: value '{value}' is not a valid ASCII table \
                     column format.",
                    card.index
                );
                v.err(ErrorCode::BadTform, &text, 1);
                None
            }
        }
    } else {
        match parse_tform_binary(value) {
            Ok(t) => {
                if let Some(w) = t.substring_width {
                    if w > 0 && t.repeat % w != 0 {
                        v.hint_keyword(name);
                        let text = format!(
                            "{name} = '{value}': repeat count {} is not a multiple of \
                             the substring width {w}.",
                            t.repeat
                        );
                        v.warn(ErrorCode::RawNotMultiple, &text, true);
                    }
                }
                if t.kind != TformKind::Fixed && t.repeat != 1 {
                    v.hint_keyword(name);
                    let text = format!(
                        "Keyword #{}, {name}: variable-length descriptor repeat count \
                         must be 1.",
                        card.index
                    );
                    v.err(ErrorCode::VarFormat, &text, 1);
                }
                Some(t.byte_width())
            }
            Err(_) => {
                v.hint_keyword(name);
                let text = format!(
                    "Keyword #{}, {name}: value '{value}' is not a valid binary table \
                     column format.",
                    card.index
                );
                v.err(ErrorCode::BadTform, &text, 1);
                None
            }
        }
    }
}

fn check_tbcol_value(v: &mut Verifier, hdu: &HduView, card: &ParsedCard, n: usize) {
    let tbcol: i64 = match card.value.parse() {
        Ok(t) => t,
        Err(_) => return,
    };
    let naxis1 = hdu.naxes.first().copied().flatten().unwrap_or(0);
    let width = hdu
        .tform
        .get(n - 1)
        .and_then(|t| t.as_deref())
        .and_then(|t| parse_tform_ascii(t).ok())
        .map(|f| f.width as i64)
        .unwrap_or(0);
    if tbcol < 1 || (naxis1 > 0 && tbcol + width - 1 > naxis1) {
        v.hint_keyword(&card.name);
        let text = format!(
            "Keyword #{}, TBCOL{n}: column starting at byte {tbcol} with width {width} \
             does not fit in NAXIS1 = {naxis1}.",
            card.index
        );
        v.err(ErrorCode::TbcolMismatch, &text, 1);
    }
}

// ---------------------------------------------------------------------------
// Placement rules
// ---------------------------------------------------------------------------

const IMAGE_ONLY: [&str; 6] = ["BSCALE", "BZERO", "BUNIT", "BLANK", "DATAMAX", "DATAMIN"];
const PRIMARY_ONLY: [&str; 3] = ["SIMPLE", "EXTEND", "BLOCKED"];
const TABLE_ROOTS: [&str; 3] = ["TTYPE", "TFORM", "TBCOL"];
const TABLE_WCS_ROOTS: [&str; 6] = ["TCTYP", "TCUNI", "TCRPX", "TCRVL", "TCDLT", "TCROT"];

/// Split `NAME123` into `("NAME", 123)`. Returns `None` without trailing
/// digits.
fn split_indexed(name: &str) -> Option<(&str, usize)> {
    let digits = name.len() - name.bytes().rev().take_while(|b| b.is_ascii_digit()).count();
    if digits == name.len() || digits == 0 {
        return None;
    }
    let n: usize = name[digits..].parse().ok()?;
    Some((&name[..digits], n))
}

fn test_placement(v: &mut Verifier, hdu: &HduView) {
    let primary = hdu.kind == HduKind::Primary;
    let table = hdu.is_table();
    let image = matches!(hdu.kind, HduKind::Image) || (primary && !hdu.is_random_groups);

    for card in &hdu.cards {
        let name = card.name.as_str();
        let pos = card.index;
        if primary && name == "XTENSION" {
            v.hint_keyword(name);
            let text = format!("Keyword #{pos}, XTENSION is not allowed in the primary HDU.");
            v.err(ErrorCode::XtensionInPrimary, &text, 1);
        }
        if !primary && PRIMARY_ONLY.contains(&name) {
            v.hint_keyword(name);
            let text = format!("Keyword #{pos}, {name} is only allowed in the primary HDU.");
            v.err(ErrorCode::PrimaryKeyInExt, &text, 1);
        }
        if table && IMAGE_ONLY.contains(&name) {
            v.hint_keyword(name);
            let text = format!("Keyword #{pos}, {name} is not allowed in a table HDU.");
            v.err(ErrorCode::ImageKeyInTable, &text, 1);
        }
        if !table {
            if name == "TFIELDS" {
                v.hint_keyword(name);
                let text = format!("Keyword #{pos}, TFIELDS is only allowed in table HDUs.");
                v.err(ErrorCode::TableKeyInImage, &text, 1);
            }
            if let Some((root, _)) = split_indexed(name) {
                if TABLE_ROOTS.contains(&root) {
                    v.hint_keyword(name);
                    let text =
                        format!("Keyword #{pos}, {name} is only allowed in table HDUs.");
                    v.err(ErrorCode::TableKeyInImage, &text, 1);
                }
                if image && TABLE_WCS_ROOTS.contains(&root) {
                    v.hint_keyword(name);
                    let text = format!(
                        "Keyword #{pos}, {name}: table WCS keywords are not allowed in an \
                         image HDU."
                    );
                    v.err(ErrorCode::TableWcsInImage, &text, 1);
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Indexed column keywords
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, PartialEq)]
enum KeyType {
    Str,
    Int,
    Flt,
}

const COLUMN_ROOTS: [(&str, KeyType); 13] = [
    ("TTYPE", KeyType::Str),
    ("TFORM", KeyType::Str),
    ("TUNIT", KeyType::Str),
    ("TSCAL", KeyType::Flt),
    ("TZERO", KeyType::Flt),
    ("TNULL", KeyType::Int),
    ("TDISP", KeyType::Str),
    ("TDIM", KeyType::Str),
    ("TBCOL", KeyType::Int),
    ("TLMIN", KeyType::Flt),
    ("TLMAX", KeyType::Flt),
    ("TDMIN", KeyType::Flt),
    ("TDMAX", KeyType::Flt),
];

fn test_indexed_keywords(v: &mut Verifier, hdu: &HduView) {
    if !hdu.is_table() {
        return;
    }
    let ascii = hdu.kind == HduKind::AsciiTable;

    for card in &hdu.cards {
        let Some((root, n)) = split_indexed(&card.name) else {
            continue;
        };
        let Some(&(_, expected)) = COLUMN_ROOTS.iter().find(|(r, _)| *r == root) else {
            continue;
        };
        let card = card.clone();
        let name = card.name.clone();

        if n == 0 || n > hdu.tfields {
            v.hint_keyword(&name);
            let text = format!(
                "Keyword #{}, {name}: column index {n} is greater than TFIELDS = {}.",
                card.index, hdu.tfields
            );
            v.err(ErrorCode::IndexExceedsTfields, &text, 1);
            continue;
        }

        // ASCII tables store their null indicator as a string.
        let expected = if root == "TNULL" && ascii { KeyType::Str } else { expected };
        let type_ok = match expected {
            KeyType::Str => check_str(v, &card),
            KeyType::Int => check_int(v, &card),
            KeyType::Flt => check_flt(v, &card),
        };
        if !type_ok {
            continue;
        }

        match root {
            "TSCAL" | "TZERO" => {
                if !ascii {
                    if let Some(ct) = hdu.col_type(n) {
                        if matches!(ct, ColType::Ascii | ColType::Logical | ColType::Bit) {
                            v.hint_keyword(&name);
                            let text = format!(
                                "Keyword #{}, {name}: scaling is not allowed for a \
                                 '{}'-type column.",
                                card.index,
                                ct.code()
                            );
                            v.err(ErrorCode::TscalWrongType, &text, 1);
                        }
                    }
                }
                if root == "TSCAL" && parsed_float(&card.value) == Some(0.0) {
                    v.hint_keyword(&name);
                    let text = format!("{name} = 0 makes all scaled values identical.");
                    v.warn(ErrorCode::ZeroScale, &text, false);
                }
            }
            "TNULL" if !ascii => {
                if let Some(ct) = hdu.col_type(n) {
                    match ct {
                        ColType::Float
                        | ColType::Double
                        | ColType::ComplexFloat
                        | ColType::ComplexDouble => {
                            v.hint_keyword(&name);
                            let text = format!(
                                "Keyword #{}, {name}: a null value is not allowed for a \
                                 floating-point column.",
                                card.index
                            );
                            v.err(ErrorCode::TnullWrongType, &text, 1);
                        }
                        _ => check_tnull_range(v, &card, ct),
                    }
                }
            }
            "TDISP" => check_tdisp_value(v, hdu, &card, n),
            "TDIM" if ascii => {
                v.hint_keyword(&name);
                let text = format!(
                    "Keyword #{}, {name} is not allowed in an ASCII table.",
                    card.index
                );
                v.err(ErrorCode::TdimInAscii, &text, 1);
            }
            "TBCOL" if !ascii => {
                v.hint_keyword(&name);
                let text = format!(
                    "Keyword #{}, {name} is not allowed in a binary table.",
                    card.index
                );
                v.err(ErrorCode::TbcolInBinary, &text, 1);
            }
            _ => {}
        }
    }

    // THEAP is only meaningful with a heap.
    if let Some(card) = hdu.get("THEAP") {
        let card = card.clone();
        if check_int(v, &card) && hdu.pcount == Some(0) {
            v.hint_keyword("THEAP");
            let text = format!(
                "Keyword #{}, THEAP is present but PCOUNT = 0 (no heap exists).",
                card.index
            );
            v.err(ErrorCode::TheapNoPcount, &text, 1);
        }
    }
}

fn parsed_float(value: &str) -> Option<f64> {
    value.replace(['D', 'd'], "E").parse().ok()
}

fn check_tnull_range(v: &mut Verifier, card: &ParsedCard, ct: ColType) {
    let Ok(value) = card.value.parse::<i64>() else {
        return;
    };
    let in_range = match ct {
        ColType::Byte => (0..=255).contains(&value),
        ColType::Short => i16::try_from(value).is_ok(),
        ColType::Int => i32::try_from(value).is_ok(),
        _ => true,
    };
    if !in_range {
        v.hint_keyword(&card.name);
        let text = format!(
            "{} = {value} is outside the range of the '{}'-type column.",
            card.name,
            ct.code()
        );
        v.warn(ErrorCode::TnullRange, &text, false);
    }
}

/// Validate a TDISPn display format against the column datatype.
fn check_tdisp_value(v: &mut Verifier, hdu: &HduView, card: &ParsedCard, n: usize) {
    let value = card.value.trim();
    let name = card.name.clone();

    let mut chars = value.chars();
    let code = chars.next().unwrap_or(' ');
    let rest: String = chars.collect();
    // EN / ES variants carry a second letter.
    let rest = match (code, rest.chars().next()) {
        ('E', Some('N')) | ('E', Some('S')) => rest[1..].to_string(),
        _ => rest,
    };
    let shape_ok = match code {
        'A' | 'L' | 'I' | 'B' | 'O' | 'Z' => {
            !rest.is_empty() && rest.split('.').all(|p| !p.is_empty() && p.bytes().all(|b| b.is_ascii_digit()))
        }
        'F' | 'E' | 'D' | 'G' => {
            let mut parts = rest.split('.');
            let w = parts.next().unwrap_or("");
            let d = parts.next();
            parts.next().is_none()
                && !w.is_empty()
                && w.bytes().all(|b| b.is_ascii_digit())
                && d.is_some_and(|d| !d.is_empty() && d.bytes().all(|b| b.is_ascii_digit()))
        }
        _ => false,
    };
    if !shape_ok {
        v.hint_keyword(&name);
        v.hint_fix(format!(
            "Change {name} in HDU {} to a valid display format such as 'I8', 'F10.4', \
             or 'A20'.",
            v.curhdu
        ));
        let text = format!(
            "Keyword #{}, {name}: value '{value}' is not a valid display format.",
            card.index
        );
        v.err(ErrorCode::BadTdisp, &text, 1);
        return;
    }

    // Light compatibility with the column datatype.
    if hdu.kind == HduKind::BinaryTable {
        if let Some(ct) = hdu.col_type(n) {
            let mismatch = match code {
                'A' => ct != ColType::Ascii,
                'L' => ct != ColType::Logical,
                'I' | 'B' | 'O' | 'Z' => {
                    matches!(ct, ColType::Float | ColType::Double | ColType::ComplexFloat | ColType::ComplexDouble | ColType::Ascii | ColType::Logical)
                }
                _ => false,
            };
            if mismatch {
                v.hint_keyword(&name);
                v.hint_fix(format!(
                    "Change {name} in HDU {} to a display format compatible with the \
                     '{}'-type column.",
                    v.curhdu,
                    ct.code()
                ));
                let text = format!(
                    "Keyword #{}, {name}: display format '{value}' is inconsistent with \
                     the '{}'-type column.",
                    card.index,
                    ct.code()
                );
                v.err(ErrorCode::BadTdisp, &text, 1);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// WCS keywords
// ---------------------------------------------------------------------------

const WCS_FLT_ROOTS: [&str; 6] = ["CRPIX", "CRVAL", "CDELT", "CROTA", "CRDER", "CSYER"];
const WCS_STR_ROOTS: [&str; 2] = ["CTYPE", "CUNIT"];

fn test_wcs(v: &mut Verifier, hdu: &HduView) {
    let wcsaxes_pos = hdu.position("WCSAXES");
    let wcsaxes_val = hdu.int_value("WCSAXES");
    if let Some(card) = hdu.get("WCSAXES") {
        let card = card.clone();
        check_int(v, &card);
    }
    let naxis = hdu.naxis.unwrap_or(0).max(0);
    let bound = wcsaxes_val.unwrap_or(naxis).max(0);

    let mut order_reported = false;
    for card in &hdu.cards {
        let Some((root, n)) = split_indexed(&card.name) else {
            continue;
        };
        let is_flt = WCS_FLT_ROOTS.contains(&root);
        let is_str = WCS_STR_ROOTS.contains(&root);
        if !is_flt && !is_str {
            continue;
        }
        let card = card.clone();

        if let Some(wpos) = wcsaxes_pos {
            if !order_reported && card.index < wpos {
                v.hint_keyword(&card.name);
                let text = format!(
                    "Keyword #{}, {}: WCS keywords appear before WCSAXES (keyword #{wpos}).",
                    card.index, card.name
                );
                v.err(ErrorCode::WcsaxesOrder, &text, 1);
                order_reported = true;
            }
        }

        if is_flt {
            check_flt(v, &card);
        } else {
            check_str(v, &card);
        }

        if n as i64 > bound {
            v.hint_keyword(&card.name);
            if wcsaxes_val.is_some() {
                let text = format!(
                    "Keyword #{}, {}: axis index {n} is greater than WCSAXES = {bound}.",
                    card.index, card.name
                );
                v.err(ErrorCode::WcsIndex, &text, 1);
            } else {
                let text = format!(
                    "Keyword #{}, {}: axis index {n} is greater than NAXIS = {naxis}.",
                    card.index, card.name
                );
                v.warn(ErrorCode::WcsIndexWarn, &text, false);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Reserved keyword types and convention warnings
// ---------------------------------------------------------------------------

const RESERVED_STR: [&str; 10] = [
    "EXTNAME", "OBJECT", "TELESCOP", "INSTRUME", "OBSERVER", "AUTHOR", "ORIGIN", "DATE",
    "DATE-OBS", "REFERENC",
];
const RESERVED_INT: [&str; 2] = ["EXTVER", "EXTLEVEL"];
const RESERVED_FLT: [&str; 2] = ["EQUINOX", "EPOCH"];
const RESERVED_LOG: [&str; 4] = ["EXTEND", "BLOCKED", "GROUPS", "INHERIT"];

fn test_reserved_types(v: &mut Verifier, hdu: &HduView) {
    for card in &hdu.cards {
        let name = card.name.as_str();
        let card = card.clone();
        if RESERVED_STR.contains(&name) {
            check_str(v, &card);
        } else if RESERVED_INT.contains(&name) {
            check_int(v, &card);
        } else if RESERVED_FLT.contains(&name) {
            check_flt(v, &card);
        } else if RESERVED_LOG.contains(&name) {
            check_log(v, &card);
        }
    }
}

const TIMESYS_VALUES: [&str; 13] = [
    "UTC", "TAI", "TDB", "TT", "ET", "UT1", "UT", "TCG", "TCB", "TDT", "IAT", "GPS", "LOCAL",
];

fn test_conventions(v: &mut Verifier, hdu: &HduView) {
    for name in ["EPOCH", "BLOCKED"] {
        if let Some(card) = hdu.get(name) {
            let pos = card.index;
            v.hint_keyword(name);
            let text = format!("Keyword #{pos}, {name} is deprecated.");
            v.warn(ErrorCode::Deprecated, &text, false);
        }
    }

    if let Some(card) = hdu.get("BSCALE") {
        let card = card.clone();
        if check_flt(v, &card) && parsed_float(&card.value) == Some(0.0) {
            v.hint_keyword("BSCALE");
            v.warn(ErrorCode::ZeroScale, "BSCALE = 0 makes all scaled pixels identical.", false);
        }
    }

    if let Some(card) = hdu.get("BLANK") {
        let card = card.clone();
        if check_int(v, &card) {
            let bitpix = hdu.bitpix.unwrap_or(0);
            if bitpix < 0 {
                v.hint_keyword("BLANK");
                let text = format!(
                    "Keyword #{}, BLANK is not allowed in a floating-point image \
                     (BITPIX = {bitpix}).",
                    card.index
                );
                v.err(ErrorCode::BlankWrongType, &text, 1);
            } else if let Ok(value) = card.value.parse::<i64>() {
                let in_range = match bitpix {
                    8 => (0..=255).contains(&value),
                    16 => i16::try_from(value).is_ok(),
                    32 => i32::try_from(value).is_ok(),
                    _ => true,
                };
                if !in_range {
                    v.hint_keyword("BLANK");
                    let text = format!(
                        "BLANK = {value} is outside the range of a BITPIX = {bitpix} image."
                    );
                    v.warn(ErrorCode::TnullRange, &text, false);
                }
            }
        }
    }

    if let Some(card) = hdu.get("DATE") {
        if card.kind == CardKind::Str {
            let value = card.value.clone();
            let b = value.as_bytes();
            let old_form = b.len() == 8 && b[2] == b'/' && b[5] == b'/';
            if old_form {
                let yy: Option<u32> = value[6..8].parse().ok();
                if yy.is_some_and(|y| y < 10) {
                    v.hint_keyword("DATE");
                    let text = format!(
                        "DATE = '{value}' uses the ambiguous two-digit year form (year < 10)."
                    );
                    v.warn(ErrorCode::Y2kDate, &text, false);
                }
            }
        }
    }

    if let Some(card) = hdu.get("TIMESYS") {
        let card = card.clone();
        if check_str(v, &card) {
            let value = card.value.trim().to_string();
            if !TIMESYS_VALUES.contains(&value.as_str()) {
                v.hint_keyword("TIMESYS");
                let text = format!("TIMESYS value '{value}' is not a recognized time scale.");
                v.warn(ErrorCode::TimesysValue, &text, false);
            }
        }
    }

    if hdu.kind == HduKind::Primary {
        if hdu.get("INHERIT").is_some() && hdu.naxis.unwrap_or(0) > 0 {
            v.hint_keyword("INHERIT");
            v.warn(
                ErrorCode::InheritPrimary,
                "INHERIT is present in a primary HDU that contains data.",
                false,
            );
        }
        if hdu.is_random_groups {
            v.warn(
                ErrorCode::RandomGroups,
                "This file uses the deprecated random groups structure.",
                false,
            );
        }
    }

    if hdu.use_longstring && hdu.get("LONGSTRN").is_none() {
        v.hint_keyword("LONGSTRN");
        v.warn(
            ErrorCode::MissingLongstrn,
            "Long string keyword values are used without the LONGSTRN keyword.",
            false,
        );
    }

    if hdu.kind == HduKind::BinaryTable {
        let has_vla = hdu.tform.iter().flatten().any(|t| {
            parse_tform_binary(t)
                .map(|p| p.kind != TformKind::Fixed)
                .unwrap_or(false)
        });
        if hdu.pcount.unwrap_or(0) > 0 && !has_vla && !hdu.is_tile_compressed {
            v.hint_keyword("PCOUNT");
            let text = format!(
                "PCOUNT = {} but no variable-length array columns are present.",
                hdu.pcount.unwrap_or(0)
            );
            v.warn(ErrorCode::PcountNoVla, &text, true);
        }
    }
}

/// Mandatory keywords already reported by the sequence checks; the generic
/// duplicate warning skips them.
fn is_sequence_keyword(name: &str) -> bool {
    matches!(
        name,
        "SIMPLE" | "BITPIX" | "NAXIS" | "XTENSION" | "PCOUNT" | "GCOUNT" | "TFIELDS" | "END"
    ) || split_indexed(name)
        .is_some_and(|(root, _)| matches!(root, "NAXIS" | "TFORM" | "TBCOL"))
}

fn test_duplicates(v: &mut Verifier, hdu: &HduView) {
    let mut pairs: Vec<(String, usize)> = Vec::new();
    for win in hdu.sorted.windows(2) {
        let a = &hdu.cards[win[0]];
        let b = &hdu.cards[win[1]];
        if a.name.is_empty() || a.name != b.name {
            continue;
        }
        if a.kind == CardKind::Commentary || is_sequence_keyword(&a.name) {
            continue;
        }
        if pairs.iter().any(|(n, _)| *n == a.name) {
            continue;
        }
        pairs.push((a.name.clone(), b.index));
    }
    for (name, pos) in pairs {
        v.hint_keyword(&name);
        let text = format!("Keyword #{pos}, {name} is duplicated.");
        v.warn(ErrorCode::DuplicateKeyword, &text, false);
    }
}

fn test_column_names(v: &mut Verifier, hdu: &HduView) {
    for n in 1..=hdu.tfields {
        match hdu.ttype.get(n - 1).and_then(|t| t.as_deref()) {
            None => {
                v.hint_keyword(&format!("TTYPE{n}"));
                let text = format!("Column #{n} has no name (no TTYPE{n} keyword).");
                v.warn(ErrorCode::NoColumnName, &text, true);
            }
            Some(name) => {
                if name.contains('&') {
                    v.hint_keyword(&format!("TTYPE{n}"));
                    let text = format!(
                        "Column #{n} name '{name}' contains the continuation character '&'."
                    );
                    v.warn(ErrorCode::ContinueChar, &text, true);
                } else if let Some(bad) = name
                    .chars()
                    .find(|c| !c.is_ascii_alphanumeric() && *c != '_')
                {
                    v.hint_keyword(&format!("TTYPE{n}"));
                    let text = format!(
                        "Column #{n} name '{name}' contains character '{bad}' other than \
                         letters, digits, and \"_\"."
                    );
                    v.warn(ErrorCode::BadColumnName, &text, true);
                }
            }
        }
    }

    for i in 1..=hdu.tfields {
        for j in (i + 1)..=hdu.tfields {
            let a = hdu.ttype.get(i - 1).and_then(|t| t.as_deref());
            let b = hdu.ttype.get(j - 1).and_then(|t| t.as_deref());
            if let (Some(a), Some(b)) = (a, b) {
                if !a.is_empty() && a.eq_ignore_ascii_case(b) {
                    v.hint_keyword(&format!("TTYPE{j}"));
                    let text = format!("Columns #{i} and #{j} have identical names '{a}'.");
                    v.warn(ErrorCode::DuplicateColumn, &text, true);
                }
            }
        }
    }
}

/// ESO HIERARCH convention: the long keyword is the token run between
/// `HIERARCH` and `=`. Duplicates are reported when the option is on.
fn test_hierarch(v: &mut Verifier, hdu: &HduView) {
    let mut seen: Vec<(String, usize)> = Vec::new();
    for card in &hdu.cards {
        if card.name != "HIERARCH" {
            continue;
        }
        let Some(eq) = card.comment.find('=') else {
            continue;
        };
        let long_name = card.comment[..eq].trim().to_string();
        if long_name.is_empty() {
            continue;
        }
        if let Some((_, _first)) = seen.iter().find(|(n, _)| *n == long_name) {
            let text = format!(
                "Keyword #{}, HIERARCH {long_name} is duplicated.",
                card.index
            );
            v.hint_keyword("HIERARCH");
            v.warn(ErrorCode::HierarchDuplicate, &text, false);
        } else {
            seen.push((long_name, card.index));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codes::Severity;
    use crate::options::Options;
    use crate::reader::MemReader;
    use std::sync::{Arc, Mutex};

    type Seen = Arc<Mutex<Vec<(Severity, ErrorCode, String)>>>;

    fn collector(opts: Options) -> (Verifier, Seen) {
        let mut v = Verifier::new(opts);
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

    fn build_file(card_blocks: &[&[&str]], payloads: &[usize]) -> Vec<u8> {
        use crate::block::BLOCK_SIZE;
        let mut data = Vec::new();
        for (cards, payload) in card_blocks.iter().zip(payloads) {
            let ncards = cards.len() + 1;
            let blocks = ncards.div_ceil(36);
            let mut header = vec![b' '; blocks * BLOCK_SIZE];
            for (i, c) in cards.iter().enumerate() {
                header[i * CARD_SIZE..(i + 1) * CARD_SIZE].copy_from_slice(&make_card(c));
            }
            let end = cards.len() * CARD_SIZE;
            header[end..end + CARD_SIZE].copy_from_slice(&make_card("END"));
            data.extend_from_slice(&header);
            let padded = crate::block::padded_byte_len(*payload as u64) as usize;
            data.resize(data.len() + padded, 0);
        }
        data
    }

    fn run_header(v: &mut Verifier, data: Vec<u8>, hdunum: usize) {
        let mut reader = MemReader::open_bytes(data, "mem").unwrap();
        let kind = reader.move_to_hdu(hdunum).unwrap();
        v.curhdu = hdunum;
        v.curtype = kind;
        let view = init_hdu(v, &mut reader, hdunum, kind).unwrap();
        verify_header(v, &mut reader, &view);
    }

    fn codes(seen: &Seen) -> Vec<ErrorCode> {
        seen.lock().unwrap().iter().map(|e| e.1).collect()
    }

    #[test]
    fn clean_primary_header() {
        let (mut v, seen) = collector(Options::default());
        let data = build_file(
            &[&[
                "SIMPLE  =                    T",
                "BITPIX  =                   16",
                "NAXIS   =                    2",
                "NAXIS1  =                   10",
                "NAXIS2  =                   10",
            ]],
            &[200],
        );
        run_header(&mut v, data, 1);
        assert_eq!(v.nerrs, 0, "codes: {:?}", codes(&seen));
        assert_eq!(v.nwrns, 0);
    }

    #[test]
    fn bitpix_bad_value() {
        let (mut v, seen) = collector(Options::default());
        let data = build_file(
            &[&[
                "SIMPLE  =                    T",
                "BITPIX  =                   99",
                "NAXIS   =                    2",
                "NAXIS1  =                   10",
                "NAXIS2  =                   10",
            ]],
            &[1200],
        );
        run_header(&mut v, data, 1);
        let seen = seen.lock().unwrap();
        let hit = seen
            .iter()
            .find(|e| e.1 == ErrorCode::KeywordValue)
            .expect("keyword-value error expected");
        assert!(hit.2.contains("BITPIX"));
    }

    #[test]
    fn missing_naxis_reported() {
        let (mut v, seen) = collector(Options::default());
        let data = build_file(
            &[&[
                "SIMPLE  =                    T",
                "BITPIX  =                    8",
            ]],
            &[0],
        );
        run_header(&mut v, data, 1);
        assert!(codes(&seen).contains(&ErrorCode::MissingKeyword));
    }

    #[test]
    fn out_of_order_mandatory() {
        let (mut v, seen) = collector(Options::default());
        let data = build_file(
            &[&[
                "SIMPLE  =                    T",
                "NAXIS   =                    0",
                "BITPIX  =                    8",
            ]],
            &[0],
        );
        run_header(&mut v, data, 1);
        assert!(codes(&seen).contains(&ErrorCode::KeywordOrder));
    }

    #[test]
    fn simple_false_warns() {
        let (mut v, seen) = collector(Options::default());
        let data = build_file(
            &[&[
                "SIMPLE  =                    F",
                "BITPIX  =                    8",
                "NAXIS   =                    0",
            ]],
            &[0],
        );
        run_header(&mut v, data, 1);
        assert!(codes(&seen).contains(&ErrorCode::SimpleFalse));
        assert_eq!(v.nerrs, 0);
    }

    #[test]
    fn xtension_in_primary_flagged() {
        let (mut v, seen) = collector(Options::default());
        let data = build_file(
            &[&[
                "SIMPLE  =                    T",
                "BITPIX  =                    8",
                "NAXIS   =                    0",
                "XTENSION= 'IMAGE   '",
            ]],
            &[0],
        );
        run_header(&mut v, data, 1);
        assert!(codes(&seen).contains(&ErrorCode::XtensionInPrimary));
    }

    #[test]
    fn primary_key_in_extension_flagged() {
        let (mut v, seen) = collector(Options::default());
        let data = build_file(
            &[
                &[
                    "SIMPLE  =                    T",
                    "BITPIX  =                    8",
                    "NAXIS   =                    0",
                ],
                &[
                    "XTENSION= 'IMAGE   '",
                    "BITPIX  =                    8",
                    "NAXIS   =                    0",
                    "PCOUNT  =                    0",
                    "GCOUNT  =                    1",
                    "EXTEND  =                    T",
                ],
            ],
            &[0, 0],
        );
        run_header(&mut v, data, 2);
        assert!(codes(&seen).contains(&ErrorCode::PrimaryKeyInExt));
    }

    #[test]
    fn image_keys_in_table_flagged() {
        let (mut v, seen) = collector(Options::default());
        let data = build_file(
            &[
                &[
                    "SIMPLE  =                    T",
                    "BITPIX  =                    8",
                    "NAXIS   =                    0",
                ],
                &[
                    "XTENSION= 'BINTABLE'",
                    "BITPIX  =                    8",
                    "NAXIS   =                    2",
                    "NAXIS1  =                    4",
                    "NAXIS2  =                    1",
                    "PCOUNT  =                    0",
                    "GCOUNT  =                    1",
                    "TFIELDS =                    1",
                    "TFORM1  = '1J      '",
                    "TTYPE1  = 'COUNTS  '",
                    "BSCALE  =                  2.0",
                ],
            ],
            &[0, 4],
        );
        run_header(&mut v, data, 2);
        assert!(codes(&seen).contains(&ErrorCode::ImageKeyInTable));
    }

    #[test]
    fn table_keys_in_image_flagged() {
        let (mut v, seen) = collector(Options::default());
        let data = build_file(
            &[&[
                "SIMPLE  =                    T",
                "BITPIX  =                    8",
                "NAXIS   =                    0",
                "TTYPE1  = 'COUNTS  '",
            ]],
            &[0],
        );
        run_header(&mut v, data, 1);
        assert!(codes(&seen).contains(&ErrorCode::TableKeyInImage));
    }

    #[test]
    fn index_exceeds_tfields() {
        let (mut v, seen) = collector(Options::default());
        let data = build_file(
            &[
                &[
                    "SIMPLE  =                    T",
                    "BITPIX  =                    8",
                    "NAXIS   =                    0",
                ],
                &[
                    "XTENSION= 'BINTABLE'",
                    "BITPIX  =                    8",
                    "NAXIS   =                    2",
                    "NAXIS1  =                    4",
                    "NAXIS2  =                    1",
                    "PCOUNT  =                    0",
                    "GCOUNT  =                    1",
                    "TFIELDS =                    1",
                    "TFORM1  = '1J      '",
                    "TTYPE1  = 'COUNTS  '",
                    "TUNIT9  = 'adu     '",
                ],
            ],
            &[0, 4],
        );
        run_header(&mut v, data, 2);
        assert!(codes(&seen).contains(&ErrorCode::IndexExceedsTfields));
    }

    #[test]
    fn tnull_on_float_column() {
        let (mut v, seen) = collector(Options::default());
        let data = build_file(
            &[
                &[
                    "SIMPLE  =                    T",
                    "BITPIX  =                    8",
                    "NAXIS   =                    0",
                ],
                &[
                    "XTENSION= 'BINTABLE'",
                    "BITPIX  =                    8",
                    "NAXIS   =                    2",
                    "NAXIS1  =                    4",
                    "NAXIS2  =                    1",
                    "PCOUNT  =                    0",
                    "GCOUNT  =                    1",
                    "TFIELDS =                    1",
                    "TFORM1  = '1E      '",
                    "TTYPE1  = 'FLUX    '",
                    "TNULL1  =                  -99",
                ],
            ],
            &[0, 4],
        );
        run_header(&mut v, data, 2);
        assert!(codes(&seen).contains(&ErrorCode::TnullWrongType));
    }

    #[test]
    fn tnull_out_of_range_warns() {
        let (mut v, seen) = collector(Options::default());
        let data = build_file(
            &[
                &[
                    "SIMPLE  =                    T",
                    "BITPIX  =                    8",
                    "NAXIS   =                    0",
                ],
                &[
                    "XTENSION= 'BINTABLE'",
                    "BITPIX  =                    8",
                    "NAXIS   =                    2",
                    "NAXIS1  =                    2",
                    "NAXIS2  =                    1",
                    "PCOUNT  =                    0",
                    "GCOUNT  =                    1",
                    "TFIELDS =                    1",
                    "TFORM1  = '1I      '",
                    "TTYPE1  = 'COUNTS  '",
                    "TNULL1  =                99999",
                ],
            ],
            &[0, 2],
        );
        run_header(&mut v, data, 2);
        assert!(codes(&seen).contains(&ErrorCode::TnullRange));
    }

    #[test]
    fn bad_tdisp_flagged() {
        let (mut v, seen) = collector(Options::default());
        let data = build_file(
            &[
                &[
                    "SIMPLE  =                    T",
                    "BITPIX  =                    8",
                    "NAXIS   =                    0",
                ],
                &[
                    "XTENSION= 'BINTABLE'",
                    "BITPIX  =                    8",
                    "NAXIS   =                    2",
                    "NAXIS1  =                    4",
                    "NAXIS2  =                    1",
                    "PCOUNT  =                    0",
                    "GCOUNT  =                    1",
                    "TFIELDS =                    1",
                    "TFORM1  = '1J      '",
                    "TTYPE1  = 'COUNTS  '",
                    "TDISP1  = 'Q4      '",
                ],
            ],
            &[0, 4],
        );
        run_header(&mut v, data, 2);
        assert!(codes(&seen).contains(&ErrorCode::BadTdisp));
    }

    #[test]
    fn naxis1_mismatch_detected() {
        let (mut v, seen) = collector(Options::default());
        let data = build_file(
            &[
                &[
                    "SIMPLE  =                    T",
                    "BITPIX  =                    8",
                    "NAXIS   =                    0",
                ],
                &[
                    "XTENSION= 'BINTABLE'",
                    "BITPIX  =                    8",
                    "NAXIS   =                    2",
                    "NAXIS1  =                    7",
                    "NAXIS2  =                    1",
                    "PCOUNT  =                    0",
                    "GCOUNT  =                    1",
                    "TFIELDS =                    1",
                    "TFORM1  = '1J      '",
                    "TTYPE1  = 'COUNTS  '",
                ],
            ],
            &[0, 7],
        );
        run_header(&mut v, data, 2);
        assert!(codes(&seen).contains(&ErrorCode::Naxis1Mismatch));
    }

    #[test]
    fn wcs_index_warning_without_wcsaxes() {
        let (mut v, seen) = collector(Options::default());
        let data = build_file(
            &[&[
                "SIMPLE  =                    T",
                "BITPIX  =                    8",
                "NAXIS   =                    2",
                "NAXIS1  =                    4",
                "NAXIS2  =                    4",
                "CRPIX3  =                  1.0",
            ]],
            &[16],
        );
        run_header(&mut v, data, 1);
        assert!(codes(&seen).contains(&ErrorCode::WcsIndexWarn));
    }

    #[test]
    fn wcsaxes_after_wcs_keywords() {
        let (mut v, seen) = collector(Options::default());
        let data = build_file(
            &[&[
                "SIMPLE  =                    T",
                "BITPIX  =                    8",
                "NAXIS   =                    2",
                "NAXIS1  =                    4",
                "NAXIS2  =                    4",
                "CRPIX1  =                  1.0",
                "WCSAXES =                    2",
            ]],
            &[16],
        );
        run_header(&mut v, data, 1);
        assert!(codes(&seen).contains(&ErrorCode::WcsaxesOrder));
    }

    #[test]
    fn deprecated_keywords_warn() {
        let (mut v, seen) = collector(Options::default());
        let data = build_file(
            &[&[
                "SIMPLE  =                    T",
                "BITPIX  =                    8",
                "NAXIS   =                    0",
                "EPOCH   =               2000.0",
            ]],
            &[0],
        );
        run_header(&mut v, data, 1);
        assert!(codes(&seen).contains(&ErrorCode::Deprecated));
    }

    #[test]
    fn duplicate_keyword_warns() {
        let (mut v, seen) = collector(Options::default());
        let data = build_file(
            &[&[
                "SIMPLE  =                    T",
                "BITPIX  =                    8",
                "NAXIS   =                    0",
                "OBJECT  = 'M31     '",
                "OBJECT  = 'M32     '",
            ]],
            &[0],
        );
        run_header(&mut v, data, 1);
        assert!(codes(&seen).contains(&ErrorCode::DuplicateKeyword));
    }

    #[test]
    fn column_name_warnings_are_heasarc_gated() {
        let headers: &[&[&str]] = &[
            &[
                "SIMPLE  =                    T",
                "BITPIX  =                    8",
                "NAXIS   =                    0",
            ],
            &[
                "XTENSION= 'BINTABLE'",
                "BITPIX  =                    8",
                "NAXIS   =                    2",
                "NAXIS1  =                    8",
                "NAXIS2  =                    1",
                "PCOUNT  =                    0",
                "GCOUNT  =                    1",
                "TFIELDS =                    2",
                "TFORM1  = '1J      '",
                "TFORM2  = '1J      '",
                "TTYPE2  = 'BAD NAME'",
            ],
        ];
        let (mut v, seen) = collector(Options::default());
        run_header(&mut v, build_file(headers, &[0, 8]), 2);
        let found = codes(&seen);
        assert!(found.contains(&ErrorCode::NoColumnName));
        assert!(found.contains(&ErrorCode::BadColumnName));

        let mut opts = Options::default();
        opts.heasarc_conventions = false;
        let (mut v, seen) = collector(opts);
        run_header(&mut v, build_file(headers, &[0, 8]), 2);
        let found = codes(&seen);
        assert!(!found.contains(&ErrorCode::NoColumnName));
        assert!(!found.contains(&ErrorCode::BadColumnName));
    }

    #[test]
    fn timesys_value_checked() {
        let (mut v, seen) = collector(Options::default());
        let data = build_file(
            &[&[
                "SIMPLE  =                    T",
                "BITPIX  =                    8",
                "NAXIS   =                    0",
                "TIMESYS = 'MARTIAN '",
            ]],
            &[0],
        );
        run_header(&mut v, data, 1);
        assert!(codes(&seen).contains(&ErrorCode::TimesysValue));
    }

    #[test]
    fn split_indexed_parses() {
        assert_eq!(split_indexed("TTYPE12"), Some(("TTYPE", 12)));
        assert_eq!(split_indexed("NAXIS1"), Some(("NAXIS", 1)));
        assert_eq!(split_indexed("TTYPE"), None);
        assert_eq!(split_indexed("123"), None);
    }

    #[test]
    fn hierarch_duplicates_when_enabled() {
        let mut opts = Options::default();
        opts.test_hierarch = true;
        let (mut v, seen) = collector(opts);
        let data = build_file(
            &[&[
                "SIMPLE  =                    T",
                "BITPIX  =                    8",
                "NAXIS   =                    0",
                "HIERARCH ESO TEL AIRM = 1.20",
                "HIERARCH ESO TEL AIRM = 1.30",
            ]],
            &[0],
        );
        run_header(&mut v, data, 1);
        assert!(codes(&seen).contains(&ErrorCode::HierarchDuplicate));
    }
}
