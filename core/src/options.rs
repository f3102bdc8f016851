/*!
The [`Format`] type.

A [`Format`] is an open bitmask selecting which fields of a [`crate::metadata::Metadata`] are written by [`crate::formatter::format`], and how. Any combination of bits is legal. Bits without a named constant are carried along but ignored by the formatter.
*/

use core::{
    fmt,
    ops::{BitAnd, BitOr, BitOrAssign},
    str::FromStr,
};

/**
A set of options for formatting metadata.
*/
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Format(u32);

impl Format {
    /**
    Emit the packed version/length header byte.
    */
    pub const HEADER: Self = Format(0x01);
    /**
    Emit the task id.
    */
    pub const TASK: Self = Format(0x02);
    /**
    Emit the op id.
    */
    pub const OP: Self = Format(0x04);
    /**
    Emit the full flags byte as hex.

    This takes precedence over [`Format::SAMPLE`].
    */
    pub const FLAGS: Self = Format(0x08);
    /**
    Emit only the sampled bit of the flags byte as a single `0` or `1`.
    */
    pub const SAMPLE: Self = Format(0x10);
    /**
    Insert a `-` between emitted fields.
    */
    pub const SEPARATORS: Self = Format(0x20);
    /**
    Use lowercase hex digits.
    */
    pub const LOWERCASE: Self = Format(0x40);

    /**
    The canonical machine form: every field, uppercase, no separators.
    */
    pub const RAW: Self = Format(Self::HEADER.0 | Self::TASK.0 | Self::OP.0 | Self::FLAGS.0);

    /**
    The legacy human-readable form: every field, lowercase, separated by `-`.

    This is what style `1` selects in [`Format::from_style`].
    */
    pub const LEGACY: Self = Format(Self::RAW.0 | Self::SEPARATORS.0 | Self::LOWERCASE.0);

    pub const fn empty() -> Self {
        Format(0)
    }

    pub const fn from_bits(bits: u32) -> Self {
        Format(bits)
    }

    /**
    Interpret a numeric style selector.

    The style is narrowed to 32 bits first. Style `1` is then the [`Format::LEGACY`] preset, since [`Format::HEADER`] on its own is rarely useful. Any other value is used directly as the bitmask.
    */
    pub const fn from_style(style: i64) -> Self {
        let style = style as i32;

        if style == 1 {
            Format::LEGACY
        } else {
            Format(style as u32)
        }
    }

    pub const fn bits(&self) -> u32 {
        self.0
    }

    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /**
    Whether every bit in `other` is set in `self`.
    */
    pub const fn contains(&self, other: Format) -> bool {
        self.0 & other.0 == other.0
    }

    /**
    Whether any bit in `other` is set in `self`.
    */
    pub const fn intersects(&self, other: Format) -> bool {
        self.0 & other.0 != 0
    }

    pub const fn union(self, other: Format) -> Self {
        Format(self.0 | other.0)
    }
}

impl BitOr for Format {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

impl BitOrAssign for Format {
    fn bitor_assign(&mut self, rhs: Self) {
        *self = self.union(rhs);
    }
}

impl BitAnd for Format {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Format(self.0 & rhs.0)
    }
}

impl From<u32> for Format {
    fn from(bits: u32) -> Self {
        Format::from_bits(bits)
    }
}

const NAMES: [(&str, Format); 7] = [
    ("header", Format::HEADER),
    ("task", Format::TASK),
    ("op", Format::OP),
    ("flags", Format::FLAGS),
    ("sample", Format::SAMPLE),
    ("separators", Format::SEPARATORS),
    ("lowercase", Format::LOWERCASE),
];

const KNOWN: u32 = 0x7f;

impl fmt::Debug for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Format({})", self)
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("empty");
        }

        let mut first = true;

        for (name, flag) in NAMES {
            if self.contains(flag) {
                if !first {
                    f.write_str("|")?;
                }
                first = false;

                f.write_str(name)?;
            }
        }

        let unknown = self.0 & !KNOWN;
        if unknown != 0 {
            if !first {
                f.write_str("|")?;
            }

            write!(f, "{:#x}", unknown)?;
        }

        Ok(())
    }
}

impl FromStr for Format {
    type Err = ParseFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        if s.is_empty() {
            return Ok(Format::empty());
        }

        if let Some(bits) = parse_bits(s) {
            return Ok(Format(bits));
        }

        let mut format = Format::empty();
        for part in s.split(|c| matches!(c, '|' | ',' | '+')) {
            format |= parse_part(part.trim())?;
        }

        Ok(format)
    }
}

fn parse_bits(s: &str) -> Option<u32> {
    match s.get(..2) {
        Some("0x") | Some("0X") => u32::from_str_radix(&s[2..], 16).ok(),
        _ => s.parse().ok(),
    }
}

fn parse_part(part: &str) -> Result<Format, ParseFormatError> {
    if let Some(bits) = parse_bits(part) {
        return Ok(Format(bits));
    }

    for (name, flag) in NAMES {
        if part.eq_ignore_ascii_case(name) {
            return Ok(flag);
        }
    }

    // Short aliases and presets
    let alias = [
        ("sep", Format::SEPARATORS),
        ("lower", Format::LOWERCASE),
        ("raw", Format::RAW),
        ("legacy", Format::LEGACY),
        ("empty", Format::empty()),
    ];

    alias
        .into_iter()
        .find(|(name, _)| part.eq_ignore_ascii_case(name))
        .map(|(_, flag)| flag)
        .ok_or(ParseFormatError {})
}

/**
An error attempting to parse a [`Format`] from text.
*/
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseFormatError {}

impl fmt::Display for ParseFormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("the input was not a valid format")
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ParseFormatError {}

#[cfg(feature = "sval")]
impl sval::Value for Format {
    fn stream<'sval, S: sval::Stream<'sval> + ?Sized>(&'sval self, stream: &mut S) -> sval::Result {
        stream.u32(self.0)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Format {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(self.0)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Format {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct Visitor;

        impl<'de> serde::de::Visitor<'de> for Visitor {
            type Value = Format;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a format bitmask or a list of format flag names")
            }

            fn visit_u64<E: serde::de::Error>(self, v: u64) -> Result<Format, E> {
                u32::try_from(v)
                    .map(Format)
                    .map_err(|_| E::invalid_value(serde::de::Unexpected::Unsigned(v), &self))
            }

            fn visit_i64<E: serde::de::Error>(self, v: i64) -> Result<Format, E> {
                u32::try_from(v)
                    .map(Format)
                    .map_err(|_| E::invalid_value(serde::de::Unexpected::Signed(v), &self))
            }

            fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<Format, E> {
                v.parse().map_err(E::custom)
            }
        }

        deserializer.deserialize_any(Visitor)
    }
}
