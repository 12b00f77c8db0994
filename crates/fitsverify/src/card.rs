//! Header card parsing and keyword type checking.
//!
//! [`parse_card`] decodes one 80-byte record into a [`ParsedCard`] carrying
//! the raw textual value and a bitset of format violations; it never emits
//! diagnostics itself. [`report_card_errors`] translates the bitset into
//! structured diagnostics, and the `check_*` functions assert that a parsed
//! card has a required typed form.

use crate::block::CARD_SIZE;
use crate::codes::ErrorCode;
use crate::verifier::Verifier;

/// The value type of a parsed card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardKind {
    /// Quoted character string.
    Str,
    /// Logical T / F.
    Logical,
    /// Integer number.
    Int,
    /// Floating-point number.
    Float,
    /// Complex value with integer parts.
    ComplexInt,
    /// Complex value with floating-point parts.
    ComplexFloat,
    /// COMMENT, HISTORY, HIERARCH, CONTINUE, blank, or END.
    Commentary,
    /// Unrecognized value form (including the null value).
    Unknown,
}

/// Parse-error bits accumulated while decoding a card.
pub(crate) mod flags {
    pub const BAD_STR: u32 = 0x0001;
    pub const NO_TRAIL_QUOTE: u32 = 0x0002;
    pub const BAD_NUM: u32 = 0x0004;
    pub const LOWCASE_EXPO: u32 = 0x0008;
    pub const NO_TRAIL_PAREN: u32 = 0x0010;
    pub const NO_COMMA: u32 = 0x0020;
    pub const TOO_MANY_COMMA: u32 = 0x0040;
    pub const BAD_REAL: u32 = 0x0080;
    pub const BAD_IMG: u32 = 0x0100;
    pub const BAD_LOGICAL: u32 = 0x0200;
    pub const NO_START_SLASH: u32 = 0x0400;
    pub const BAD_COMMENT: u32 = 0x0800;
    pub const UNKNOWN_TYPE: u32 = 0x1000;
    pub const CARD_TOO_LONG: u32 = 0x2000;
    pub const NAME_NOT_JUSTIFIED: u32 = 0x4000;
    pub const ILLEGAL_NAME_CHAR: u32 = 0x8000;
    pub const NONTEXT_CHARS: u32 = 0x1_0000;
    pub const END_NOT_BLANK: u32 = 0x2_0000;
}

/// One decoded 80-byte header card.
#[derive(Debug, Clone)]
pub struct ParsedCard {
    /// 1-based position of the card in its header.
    pub index: usize,
    /// Keyword name, right-trimmed (empty for blank cards).
    pub name: String,
    /// Value type.
    pub kind: CardKind,
    /// Raw textual value, whitespace-stripped per kind. Empty for
    /// commentary cards and null values.
    pub value: String,
    /// Comment text (after the `/` separator), or the full body for
    /// commentary cards.
    pub comment: String,
    /// Accumulated [`flags`] bits.
    pub flags: u32,
    /// First illegal character found in the keyword name, if any.
    pub bad_name_char: Option<char>,
}

impl ParsedCard {
    /// True when the card has no value at all (blank value field).
    pub fn is_null_value(&self) -> bool {
        self.kind == CardKind::Unknown && self.value.is_empty()
    }
}

fn is_text(b: u8) -> bool {
    (32..=126).contains(&b)
}

/// Decode a single header card. `pos` is the 1-based keyword position used
/// in diagnostics. Cards longer than [`CARD_SIZE`] are flagged and
/// truncated; everything after the flag is left unparsed, matching the
/// behavior callers rely on for the card-too-long diagnostic.
pub fn parse_card(pos: usize, card: &[u8]) -> ParsedCard {
    let mut out = ParsedCard {
        index: pos,
        name: String::new(),
        kind: CardKind::Unknown,
        value: String::new(),
        comment: String::new(),
        flags: 0,
        bad_name_char: None,
    };

    if card.len() > CARD_SIZE {
        out.flags |= flags::CARD_TOO_LONG;
        return out;
    }
    let mut buf = [b' '; CARD_SIZE];
    buf[..card.len()].copy_from_slice(card);
    let card = &buf;

    // Name: columns 1-8, right-trimmed.
    let raw_name: &[u8] = &card[..8];
    let name_end = raw_name.iter().rposition(|&b| b != b' ').map_or(0, |i| i + 1);
    let name_bytes = &raw_name[..name_end];
    out.name = name_bytes.iter().map(|&b| b as char).collect();

    // Left justification.
    let lead = name_bytes.iter().take_while(|&&b| b == b' ').count();
    if lead > 0 && lead < 8 {
        out.flags |= flags::NAME_NOT_JUSTIFIED;
    }

    // Character set.
    for &b in &name_bytes[lead..] {
        match b {
            b'A'..=b'Z' | b'0'..=b'9' | b'-' | b'_' => {}
            _ => {
                out.flags |= flags::ILLEGAL_NAME_CHAR;
                out.bad_name_char = Some(b as char);
                break;
            }
        }
    }

    // Commentary keywords: free-form text in columns 9-80.
    if matches!(out.name.as_str(), "COMMENT" | "HISTORY" | "HIERARCH" | "CONTINUE" | "") {
        out.kind = CardKind::Commentary;
        let body = trim_trailing(&card[8..]);
        out.comment = bytes_to_string(body);
        if body.iter().any(|&b| !is_text(b)) {
            out.flags |= flags::NONTEXT_CHARS;
        }
        return out;
    }

    // END: columns 9-80 must be blank.
    if out.name == "END" {
        out.kind = CardKind::Commentary;
        if card[8..].iter().any(|&b| b != b' ') {
            out.flags |= flags::END_NOT_BLANK;
        }
        return out;
    }

    // Value indicator "= " in columns 9-10; without it the card is
    // commentary.
    if card[8] != b'=' || card[9] != b' ' {
        out.kind = CardKind::Commentary;
        let body = trim_trailing(&card[8..]);
        out.comment = bytes_to_string(body);
        if body.iter().any(|&b| !is_text(b)) {
            out.flags |= flags::NONTEXT_CHARS;
        }
        return out;
    }

    // Value field: column 11 onward, first non-space dispatches the type.
    let field = &card[10..];
    let mut i = 0;
    while i < field.len() && field[i] == b' ' {
        i += 1;
    }
    if i == field.len() {
        // Null value, no comment.
        return out;
    }

    match field[i] {
        b'\'' => {
            out.kind = CardKind::Str;
            i = get_str(field, i, &mut out);
        }
        b'T' | b'F' => {
            out.kind = CardKind::Logical;
            i = get_log(field, i, &mut out);
        }
        b'+' | b'-' | b'.' | b'0'..=b'9' => {
            i = get_num(field, i, &mut out);
        }
        b'(' => {
            i = get_cmp(field, i, &mut out);
        }
        b'/' => {
            // Comment-only card: the value is null.
            out.kind = CardKind::Unknown;
        }
        _ => {
            i = get_unknown(field, i, &mut out);
        }
    }

    if out.kind != CardKind::Str {
        let trimmed = out.value.trim_end().len();
        out.value.truncate(trimmed);
    }

    if i < field.len() {
        get_comm(field, i, &mut out);
    }
    out
}

fn trim_trailing(bytes: &[u8]) -> &[u8] {
    let end = bytes.iter().rposition(|&b| b != b' ').map_or(0, |i| i + 1);
    &bytes[..end]
}

fn bytes_to_string(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

/// Quoted string value: doubled quotes escape a literal quote; the closing
/// quote is required; trailing spaces inside the quotes are not significant.
fn get_str(field: &[u8], start: usize, out: &mut ParsedCard) -> usize {
    let mut i = start + 1;
    let mut closed = false;
    while i < field.len() {
        let b = field[i];
        if b == b'\'' {
            if field.get(i + 1) == Some(&b'\'') {
                out.value.push('\'');
                i += 2;
                continue;
            }
            closed = true;
            i += 1;
            break;
        }
        if !is_text(b) {
            out.flags |= flags::BAD_STR;
        }
        out.value.push(b as char);
        i += 1;
    }
    if !closed {
        out.flags |= flags::NO_TRAIL_QUOTE;
    }
    let trimmed = out.value.trim_end().len();
    out.value.truncate(trimmed);
    skip_spaces(field, i)
}

/// Logical value: a single T or F, then only spaces before the comment.
fn get_log(field: &[u8], start: usize, out: &mut ParsedCard) -> usize {
    out.value.push(field[start] as char);
    let i = skip_spaces(field, start + 1);
    if i < field.len() && field[i] != b'/' {
        out.flags |= flags::BAD_LOGICAL;
    }
    i
}

/// Numeric value: integer unless a decimal point or exponent appears.
/// Lowercase exponents are legal nowhere in the standard and are flagged.
fn get_num(field: &[u8], start: usize, out: &mut ParsedCard) -> usize {
    out.kind = CardKind::Int;
    let mut i = start;
    let mut seen_decimal = false;
    let mut seen_exponent = false;

    if field[i] == b'.' {
        out.kind = CardKind::Float;
        seen_decimal = true;
    }
    out.value.push(field[i] as char);
    i += 1;

    while i < field.len() && field[i] != b' ' && field[i] != b'/' {
        let b = field[i];
        if b == b'.' && !seen_decimal {
            seen_decimal = true;
            out.kind = CardKind::Float;
        } else if (b == b'd' || b == b'e') && !seen_exponent {
            seen_exponent = true;
            out.kind = CardKind::Float;
            out.flags |= flags::LOWCASE_EXPO;
            out.value.push(b as char);
            i += 1;
            if i < field.len() && (field[i] == b'+' || field[i] == b'-') {
                out.value.push(field[i] as char);
                i += 1;
            }
            continue;
        } else if (b == b'D' || b == b'E') && !seen_exponent {
            seen_exponent = true;
            out.kind = CardKind::Float;
            out.value.push(b as char);
            i += 1;
            if i < field.len() && (field[i] == b'+' || field[i] == b'-') {
                out.value.push(field[i] as char);
                i += 1;
            }
            continue;
        } else if !b.is_ascii_digit() {
            out.flags |= flags::BAD_NUM;
        }
        out.value.push(b as char);
        i += 1;
    }
    skip_spaces(field, i)
}

/// Complex value: `(real, imaginary)`. Both parts are parsed as numbers;
/// the kind degrades to float complex when either part is a float.
fn get_cmp(field: &[u8], start: usize, out: &mut ParsedCard) -> usize {
    out.kind = CardKind::ComplexInt;
    let mut i = start + 1;
    let mut comma: Option<usize> = None;
    let mut close: Option<usize> = None;

    while i < field.len() && field[i] != b'/' {
        let b = field[i];
        if b == b')' {
            close = Some(i);
            i += 1;
            break;
        }
        if b == b',' {
            if comma.is_none() {
                comma = Some(i);
            } else {
                out.flags |= flags::TOO_MANY_COMMA;
            }
        }
        i += 1;
    }
    if comma.is_none() {
        out.flags |= flags::NO_COMMA;
    }
    let value_end = match close {
        Some(c) => c + 1,
        None => {
            out.flags |= flags::NO_TRAIL_PAREN;
            let mut e = i;
            while e > start && field[e - 1] == b' ' {
                e -= 1;
            }
            e
        }
    };
    out.value = bytes_to_string(&field[start..value_end]);

    // Analyze the two parts.
    let inner_end = close.unwrap_or(value_end);
    let real_rng = (start + 1, comma.unwrap_or(inner_end));
    let imag_rng = (comma.map_or(inner_end, |c| c + 1), inner_end);
    for (part_bit, (lo, hi)) in [(flags::BAD_REAL, real_rng), (flags::BAD_IMG, imag_rng)] {
        let part = trim_trailing(field.get(lo..hi).unwrap_or(&[]));
        let part: &[u8] = {
            let lead = part.iter().take_while(|&&b| b == b' ').count();
            &part[lead..]
        };
        match part_kind(part) {
            Some(CardKind::Float) => out.kind = CardKind::ComplexFloat,
            Some(CardKind::Int) => {}
            _ => out.flags |= part_bit,
        }
    }
    skip_spaces(field, i)
}

/// Classify a complex-value component as integer or float.
fn part_kind(part: &[u8]) -> Option<CardKind> {
    if part.is_empty() {
        return None;
    }
    let mut probe = ParsedCard {
        index: 0,
        name: String::new(),
        kind: CardKind::Unknown,
        value: String::new(),
        comment: String::new(),
        flags: 0,
        bad_name_char: None,
    };
    match part[0] {
        b'+' | b'-' | b'.' | b'0'..=b'9' => {}
        _ => return None,
    }
    get_num(part, 0, &mut probe);
    if probe.flags & flags::BAD_NUM != 0 {
        return None;
    }
    Some(probe.kind)
}

/// Unrecognized value: consume through the comment separator.
fn get_unknown(field: &[u8], start: usize, out: &mut ParsedCard) -> usize {
    let mut i = start;
    while i < field.len() && field[i] != b'/' {
        out.value.push(field[i] as char);
        i += 1;
    }
    out.kind = CardKind::Unknown;
    out.flags |= flags::UNKNOWN_TYPE;
    i
}

/// Comment: must begin with `/`; non-text bytes are flagged.
fn get_comm(field: &[u8], start: usize, out: &mut ParsedCard) {
    let mut i = start;
    if field[i] != b'/' {
        out.flags |= flags::NO_START_SLASH;
    } else {
        i += 1;
    }
    let body = trim_trailing(&field[i..]);
    if body.iter().any(|&b| !is_text(b)) {
        out.flags |= flags::BAD_COMMENT;
    }
    out.comment = bytes_to_string(body).trim_start().to_string();
}

fn skip_spaces(field: &[u8], mut i: usize) -> usize {
    while i < field.len() && field[i] == b' ' {
        i += 1;
    }
    i
}

// ---- Diagnostics for accumulated parse errors ----

/// Translate the parse-error bitset of `card` into diagnostics. Returns
/// true when the card was clean.
pub(crate) fn report_card_errors(v: &mut Verifier, card: &ParsedCard) -> bool {
    let f = card.flags;
    if f == 0 {
        return true;
    }
    let pos = card.index;
    let name = &card.name;
    v.hint_keyword(name);

    if f & flags::CARD_TOO_LONG != 0 {
        v.err(
            ErrorCode::CardTooLong,
            &format!("Card #{pos} is longer than 80 characters."),
            1,
        );
        return false;
    }
    if f & flags::NAME_NOT_JUSTIFIED != 0 {
        v.hint_keyword(name);
        v.err(
            ErrorCode::NameNotJustified,
            &format!("Keyword #{pos}: Name {name} is not left justified."),
            1,
        );
    }
    if f & flags::ILLEGAL_NAME_CHAR != 0 {
        let c = card.bad_name_char.unwrap_or('?');
        v.hint_keyword(name);
        v.err(
            ErrorCode::IllegalNameChar,
            &format!(
                "Keyword #{pos}: Name \"{name}\" contains char \"{c}\" which is not \
                 upper case letter, digit, \"-\", or \"_\"."
            ),
            1,
        );
    }
    if f & flags::NONTEXT_CHARS != 0 {
        v.hint_keyword(name);
        v.err(
            ErrorCode::NontextChars,
            &format!("Keyword #{pos}, {name}: String contains non-text characters."),
            1,
        );
    }
    if f & flags::END_NOT_BLANK != 0 {
        v.hint_keyword(name);
        v.err(
            ErrorCode::EndNotBlank,
            "END keyword contains non-blank characters.",
            1,
        );
    }

    let kval = &card.value;
    let value_bits = [
        (flags::BAD_STR, ErrorCode::BadString, format!(
            "Keyword #{pos}, {name}: String \"{kval}\" contains non-text characters."
        )),
        (flags::NO_TRAIL_QUOTE, ErrorCode::MissingQuote, format!(
            "Keyword #{pos}, {name}: The closing \"'\" is missing in the string."
        )),
        (flags::BAD_LOGICAL, ErrorCode::BadLogical, format!(
            "Keyword #{pos}, {name}: Bad logical value \"{kval}\"."
        )),
        (flags::BAD_NUM, ErrorCode::BadNumber, format!(
            "Keyword #{pos}, {name}: Bad numerical value \"{kval}\"."
        )),
        (flags::LOWCASE_EXPO, ErrorCode::LowercaseExponent, format!(
            "Keyword #{pos}, {name}: lower-case exponent d or e is illegal in value {kval}."
        )),
        (flags::NO_TRAIL_PAREN, ErrorCode::ComplexFormat, format!(
            "Keyword #{pos}, {name}: Complex value \"{kval}\" misses closing \")\"."
        )),
        (flags::NO_COMMA, ErrorCode::ComplexFormat, format!(
            "Keyword #{pos}, {name}: Complex value \"{kval}\" misses \",\"."
        )),
        (flags::TOO_MANY_COMMA, ErrorCode::ComplexFormat, format!(
            "Keyword #{pos}, {name}: Too many \",\" are in the complex value \"{kval}\"."
        )),
        (flags::BAD_REAL, ErrorCode::ComplexFormat, format!(
            "Keyword #{pos}, {name}: Real part of complex value \"{kval}\" is bad."
        )),
        (flags::BAD_IMG, ErrorCode::ComplexFormat, format!(
            "Keyword #{pos}, {name}: Imaginary part of complex value \"{kval}\" is bad."
        )),
        (flags::NO_START_SLASH, ErrorCode::NoValueSeparator, format!(
            "Keyword #{pos}, {name}: Value and Comment not separated by a \"/\"."
        )),
        (flags::BAD_COMMENT, ErrorCode::BadComment, format!(
            "Keyword #{pos}, {name}: Comment contains non-text characters."
        )),
    ];
    for (bit, code, text) in value_bits {
        if f & bit != 0 {
            v.hint_keyword(name);
            v.err(code, &text, 1);
        }
    }
    // A null value is not an error by itself.
    if f & flags::UNKNOWN_TYPE != 0 && !kval.is_empty() {
        v.hint_keyword(name);
        v.err(
            ErrorCode::UnknownType,
            &format!("Keyword #{pos}, {name}: Type of value \"{kval}\" is unknown."),
            1,
        );
    }
    false
}

// ---- Keyword type checker ----

fn null_value_err(v: &mut Verifier, key: &ParsedCard, expected: &str) {
    v.hint_keyword(&key.name);
    v.err(
        ErrorCode::NullValue,
        &format!(
            "Keyword #{}, {} has a null value; expected {expected}.",
            key.index, key.name
        ),
        1,
    );
}

/// Require a string value.
pub(crate) fn check_str(v: &mut Verifier, key: &ParsedCard) -> bool {
    v.hint_keyword(&key.name);
    if key.is_null_value() {
        null_value_err(v, key, "a string");
        return false;
    }
    if key.kind != CardKind::Str {
        let text = format!(
            "Keyword #{}, {}: \"{}\" is not a string.",
            key.index, key.name, key.value
        );
        match key.kind {
            CardKind::Int | CardKind::Float => {
                v.hint_fix(format!(
                    "Add quotes around the value of '{}' in HDU {}. The current value \
                     {} should be a quoted string.",
                    key.name, v.curhdu, key.value
                ));
            }
            _ => {
                v.hint_fix(format!(
                    "Set '{}' in HDU {} to a properly quoted string value. The current \
                     value '{}' is not recognized as a string.",
                    key.name, v.curhdu, key.value
                ));
            }
        }
        v.hint_explain(format!(
            "'{}' is expected to be a string keyword in the FITS Standard. String \
             values must be enclosed in single quotes in columns 11-80 of the header \
             card.",
            key.name
        ));
        v.err(ErrorCode::WrongType, &text, 1);
        return false;
    }
    true
}

/// Require an integer value.
pub(crate) fn check_int(v: &mut Verifier, key: &ParsedCard) -> bool {
    v.hint_keyword(&key.name);
    if key.is_null_value() {
        null_value_err(v, key, "an integer");
        return false;
    }
    if key.kind != CardKind::Int {
        let mut text = format!(
            "Keyword #{}, {}: value = {} is not an integer.",
            key.index, key.name, key.value
        );
        if key.kind == CardKind::Str {
            text.push_str(" The value is entered as a string.");
            v.hint_fix(format!(
                "Remove the quotes from '{}' in HDU {}. The value must be an integer, \
                 not a string.",
                key.name, v.curhdu
            ));
            v.hint_explain(format!(
                "'{}' currently has the quoted string '{}'. Remove the quotes so it is \
                 parsed as an integer.",
                key.name, key.value
            ));
        }
        v.err(ErrorCode::WrongType, &text, 1);
        return false;
    }
    true
}

/// Require a floating-point value (integers are acceptable).
pub(crate) fn check_flt(v: &mut Verifier, key: &ParsedCard) -> bool {
    v.hint_keyword(&key.name);
    if key.is_null_value() {
        null_value_err(v, key, "a float");
        return false;
    }
    if key.kind != CardKind::Int && key.kind != CardKind::Float {
        let mut text = format!(
            "Keyword #{}, {}: value = {} is not a floating point number.",
            key.index, key.name, key.value
        );
        if key.kind == CardKind::Str {
            text.push_str(" The value is entered as a string.");
            v.hint_fix(format!(
                "Remove the quotes from '{}' in HDU {}. The value must be a number, \
                 not a string.",
                key.name, v.curhdu
            ));
            v.hint_explain(format!(
                "'{}' currently has the quoted string '{}'. This keyword requires a \
                 numeric value. Remove the quotes and provide the actual number.",
                key.name, key.value
            ));
        }
        v.err(ErrorCode::WrongType, &text, 1);
        return false;
    }
    true
}

/// Require a logical value.
pub(crate) fn check_log(v: &mut Verifier, key: &ParsedCard) -> bool {
    v.hint_keyword(&key.name);
    if key.kind != CardKind::Logical {
        let mut text = format!(
            "Keyword #{}, {}: value = {} is not a logical constant.",
            key.index, key.name, key.value
        );
        if key.kind == CardKind::Str {
            text.push_str(" The value is entered as a string.");
            v.hint_fix(format!(
                "Remove the quotes from '{}' in HDU {}. The value must be a logical \
                 (T or F), not a string.",
                key.name, v.curhdu
            ));
            v.hint_explain(format!(
                "'{}' currently has the quoted string '{}'. Logical keywords must have \
                 T or F (without quotes) in column 30 of the header card.",
                key.name, key.value
            ));
        }
        v.err(ErrorCode::WrongType, &text, 1);
        return false;
    }
    true
}

/// Require an integer complex value.
pub(crate) fn check_cmi(v: &mut Verifier, key: &ParsedCard) -> bool {
    v.hint_keyword(&key.name);
    if key.kind != CardKind::ComplexInt {
        v.err(
            ErrorCode::WrongType,
            &format!(
                "Keyword #{}, {}: value = {} is not an integer complex number.",
                key.index, key.name, key.value
            ),
            1,
        );
        return false;
    }
    true
}

/// Require a floating-point complex value (integer complex is acceptable).
pub(crate) fn check_cmf(v: &mut Verifier, key: &ParsedCard) -> bool {
    v.hint_keyword(&key.name);
    if key.kind != CardKind::ComplexInt && key.kind != CardKind::ComplexFloat {
        v.err(
            ErrorCode::WrongType,
            &format!(
                "Keyword #{}, {}: value = {} is not a floating point complex number.",
                key.index, key.name, key.value
            ),
            1,
        );
        return false;
    }
    true
}

// ---- Fixed-format checks ----

fn card_keyword(card: &[u8]) -> String {
    let end = card[..8.min(card.len())]
        .iter()
        .rposition(|&b| b != b' ')
        .map_or(0, |i| i + 1);
    card[..end].iter().map(|&b| b as char).collect()
}

fn card_text(card: &[u8]) -> String {
    let end = card.iter().rposition(|&b| b != b' ').map_or(0, |i| i + 1);
    card[..end.min(CARD_SIZE)].iter().map(|&b| b as char).collect()
}

/// Fixed-format integer: right-justified with its final digit in column 30.
pub(crate) fn check_fixed_int(v: &mut Verifier, card: &[u8; CARD_SIZE]) -> bool {
    let kw = card_keyword(card);
    v.hint_keyword(&kw);

    let mut i = 10;
    while i < CARD_SIZE && card[i] == b' ' {
        i += 1;
    }
    if i < CARD_SIZE && (card[i] == b'-' || card[i] == b'+') {
        i += 1;
    }
    while i < CARD_SIZE && card[i].is_ascii_digit() {
        i += 1;
    }
    if i != 30 {
        v.err(
            ErrorCode::NotFixedFormat,
            &format!("{kw} mandatory keyword is not in integer fixed format:"),
            1,
        );
        let text = card_text(card);
        v.info(&text);
        v.info("          -------------------^");
        return false;
    }
    true
}

/// Fixed-format logical: T or F in column 30.
pub(crate) fn check_fixed_log(v: &mut Verifier, card: &[u8; CARD_SIZE]) -> bool {
    let kw = card_keyword(card);
    v.hint_keyword(&kw);

    let mut i = 10;
    while i < CARD_SIZE && card[i] == b' ' {
        i += 1;
    }
    if i >= CARD_SIZE || (card[i] != b'T' && card[i] != b'F') {
        v.err(
            ErrorCode::BadLogical,
            &format!("{kw} mandatory keyword does not have T or F logical value."),
            1,
        );
        return false;
    }
    if i != 29 {
        v.err(
            ErrorCode::NotFixedFormat,
            &format!("{kw} mandatory keyword is not in logical fixed format:"),
            1,
        );
        let text = card_text(card);
        v.info(&text);
        v.info("          -------------------^");
        return false;
    }
    true
}

/// Fixed-format string: opening quote in column 11, closing quote at or
/// after column 20. Applies to XTENSION and TFORMn.
pub(crate) fn check_fixed_str(v: &mut Verifier, card: &[u8; CARD_SIZE]) -> bool {
    let kw = card_keyword(card);
    v.hint_keyword(&kw);

    if card[10] != b'\'' {
        v.err(
            ErrorCode::NotFixedFormat,
            &format!("{kw} mandatory string keyword does not start in col 11."),
            1,
        );
        let text = card_text(card);
        v.info(&text);
        v.info("          ^--------^");
        return false;
    }
    let mut i = 11;
    while i < CARD_SIZE && card[i] != b'\'' {
        i += 1;
    }
    if i >= CARD_SIZE {
        v.err(
            ErrorCode::NotFixedFormat,
            &format!("{kw} mandatory string keyword missing closing quote character:"),
            1,
        );
        let text = card_text(card);
        v.info(&text);
        return false;
    }
    if i < 19 {
        v.err(
            ErrorCode::NotFixedFormat,
            &format!("{kw} mandatory string keyword ends before column 20."),
            1,
        );
        let text = card_text(card);
        v.info(&text);
        v.info("          ^--------^");
        return false;
    }
    true
}
