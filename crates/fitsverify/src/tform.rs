//! TFORMn column-format parsing for binary and ASCII tables.

use crate::error::{Error, Result};

/// The data type of a column in a FITS binary table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColType {
    /// L -- logical, stored as a single byte (T/F/0).
    Logical,
    /// X -- bit array.
    Bit,
    /// B -- unsigned byte.
    Byte,
    /// I -- 16-bit signed integer.
    Short,
    /// J -- 32-bit signed integer.
    Int,
    /// K -- 64-bit signed integer.
    Long,
    /// E -- 32-bit IEEE float.
    Float,
    /// D -- 64-bit IEEE float.
    Double,
    /// C -- complex: pair of 32-bit IEEE floats.
    ComplexFloat,
    /// M -- complex: pair of 64-bit IEEE floats.
    ComplexDouble,
    /// A -- ASCII character.
    Ascii,
}

impl ColType {
    /// Bytes per single element. `Bit` reports 0; bit columns occupy
    /// `ceil(repeat / 8)` bytes per row.
    pub fn byte_size(self) -> u64 {
        match self {
            ColType::Logical | ColType::Byte | ColType::Ascii => 1,
            ColType::Bit => 0,
            ColType::Short => 2,
            ColType::Int | ColType::Float => 4,
            ColType::Long | ColType::Double | ColType::ComplexFloat => 8,
            ColType::ComplexDouble => 16,
        }
    }

    /// The single-letter FITS type code.
    pub fn code(self) -> char {
        match self {
            ColType::Logical => 'L',
            ColType::Bit => 'X',
            ColType::Byte => 'B',
            ColType::Short => 'I',
            ColType::Int => 'J',
            ColType::Long => 'K',
            ColType::Float => 'E',
            ColType::Double => 'D',
            ColType::ComplexFloat => 'C',
            ColType::ComplexDouble => 'M',
            ColType::Ascii => 'A',
        }
    }

    fn from_code(c: u8) -> Option<ColType> {
        Some(match c {
            b'L' => ColType::Logical,
            b'X' => ColType::Bit,
            b'B' => ColType::Byte,
            b'I' => ColType::Short,
            b'J' => ColType::Int,
            b'K' => ColType::Long,
            b'E' => ColType::Float,
            b'D' => ColType::Double,
            b'C' => ColType::ComplexFloat,
            b'M' => ColType::ComplexDouble,
            b'A' => ColType::Ascii,
            _ => return None,
        })
    }
}

/// Whether a binary column is fixed-width or a variable-length descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TformKind {
    /// Ordinary fixed-width column.
    Fixed,
    /// 'P' descriptor: 32-bit (length, heap offset) pair.
    VarP,
    /// 'Q' descriptor: 64-bit (length, heap offset) pair.
    VarQ,
}

/// A parsed binary-table TFORMn value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tform {
    /// Repeat count (defaults to 1 when omitted).
    pub repeat: u64,
    /// Element type.
    pub col_type: ColType,
    /// Fixed column or P/Q variable-length descriptor.
    pub kind: TformKind,
    /// Declared maximum element count for variable-length columns,
    /// from the parenthesized suffix. `None` when no suffix was given.
    pub max_len: Option<u64>,
    /// Substring width `w` from the HEASARC `rAw` convention, if present.
    pub substring_width: Option<u64>,
}

impl Tform {
    /// Total bytes this column occupies in the fixed part of each row.
    pub fn byte_width(&self) -> u64 {
        match self.kind {
            TformKind::VarP => 8 * self.repeat,
            TformKind::VarQ => 16 * self.repeat,
            TformKind::Fixed => match self.col_type {
                ColType::Bit => self.repeat.div_ceil(8),
                t => self.repeat * t.byte_size(),
            },
        }
    }
}

/// Parse a binary-table TFORMn value like "1J", "10E", "20A", "1024X",
/// "1PB(200)", or "1QJ".
pub fn parse_tform_binary(s: &str) -> Result<Tform> {
    let raw = s;
    let s = s.trim();
    if s.is_empty() {
        return Err(Error::InvalidTform(raw.into()));
    }

    // Split off the optional (maxlen) suffix.
    let (s, max_len) = match s.find('(') {
        Some(paren) => {
            let inner = s[paren..]
                .strip_prefix('(')
                .and_then(|t| t.strip_suffix(')'))
                .ok_or_else(|| Error::InvalidTform(raw.into()))?;
            let n = inner
                .trim()
                .parse::<u64>()
                .map_err(|_| Error::InvalidTform(raw.into()))?;
            (&s[..paren], Some(n))
        }
        None => (s, None),
    };

    let bytes = s.as_bytes();
    if bytes.is_empty() {
        return Err(Error::InvalidTform(raw.into()));
    }

    // rPt / rQt variable-length descriptors.
    if bytes.len() >= 2 {
        let desc = bytes[bytes.len() - 2];
        if desc == b'P' || desc == b'Q' {
            let col_type = ColType::from_code(bytes[bytes.len() - 1])
                .ok_or_else(|| Error::InvalidTform(raw.into()))?;
            let repeat = parse_repeat(&s[..s.len() - 2], raw)?;
            return Ok(Tform {
                repeat,
                col_type,
                kind: if desc == b'P' { TformKind::VarP } else { TformKind::VarQ },
                max_len,
                substring_width: None,
            });
        }
    }

    // rAw substring convention: digits after the 'A'.
    if let Some(apos) = s.find('A') {
        let tail = &s[apos + 1..];
        if !tail.is_empty() && tail.bytes().all(|b| b.is_ascii_digit()) {
            let repeat = parse_repeat(&s[..apos], raw)?;
            let width = tail.parse::<u64>().map_err(|_| Error::InvalidTform(raw.into()))?;
            return Ok(Tform {
                repeat,
                col_type: ColType::Ascii,
                kind: TformKind::Fixed,
                max_len,
                substring_width: Some(width),
            });
        }
    }

    let col_type = ColType::from_code(bytes[bytes.len() - 1])
        .ok_or_else(|| Error::InvalidTform(raw.into()))?;
    let repeat = parse_repeat(&s[..s.len() - 1], raw)?;
    Ok(Tform {
        repeat,
        col_type,
        kind: TformKind::Fixed,
        max_len,
        substring_width: None,
    })
}

fn parse_repeat(digits: &str, raw: &str) -> Result<u64> {
    if digits.is_empty() {
        return Ok(1);
    }
    digits
        .parse::<u64>()
        .map_err(|_| Error::InvalidTform(raw.into()))
}

/// The field type of an ASCII table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AsciiKind {
    /// Aw -- character field.
    Char,
    /// Iw -- integer field.
    Int,
    /// Fw.d / Ew.d / Dw.d -- floating-point field.
    Float,
}

/// A parsed ASCII-table TFORMn value (`Aw`, `Iw`, `Fw.d`, `Ew.d`, `Dw.d`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AsciiFormat {
    /// Field type.
    pub kind: AsciiKind,
    /// Field width in characters.
    pub width: u64,
    /// Digits after the decimal point, for floating-point fields.
    pub decimals: Option<u64>,
}

/// Parse an ASCII-table TFORMn value.
pub fn parse_tform_ascii(s: &str) -> Result<AsciiFormat> {
    let raw = s;
    let s = s.trim();
    let bytes = s.as_bytes();
    if bytes.len() < 2 {
        return Err(Error::InvalidTform(raw.into()));
    }
    let kind = match bytes[0] {
        b'A' => AsciiKind::Char,
        b'I' => AsciiKind::Int,
        b'F' | b'E' | b'D' => AsciiKind::Float,
        _ => return Err(Error::InvalidTform(raw.into())),
    };
    let rest = &s[1..];
    let (width_str, decimals) = match rest.find('.') {
        Some(dot) => {
            if kind != AsciiKind::Float {
                return Err(Error::InvalidTform(raw.into()));
            }
            let d = rest[dot + 1..]
                .parse::<u64>()
                .map_err(|_| Error::InvalidTform(raw.into()))?;
            (&rest[..dot], Some(d))
        }
        None => (rest, None),
    };
    let width = width_str
        .parse::<u64>()
        .map_err(|_| Error::InvalidTform(raw.into()))?;
    if width == 0 {
        return Err(Error::InvalidTform(raw.into()));
    }
    Ok(AsciiFormat { kind, width, decimals })
}
