/*!
The [`FmtBuf`] type.
*/

use core::{fmt, str};

use crate::{
    formatter::{self, InsufficientBuffer},
    metadata::Metadata,
    options::Format,
};

/**
The size of a [`FmtBuf`].

This fits the longest possible output: a header, a 20 byte task id, an 8 byte op id, flags, three separators and a terminator.
*/
pub const FMT_BUFFER_SIZE: usize = 128;

/**
A stack buffer holding one piece of formatted [`Metadata`].
*/
#[derive(Clone, Copy)]
pub struct FmtBuf {
    buf: [u8; FMT_BUFFER_SIZE],
    // Includes the terminator
    written: usize,
}

impl FmtBuf {
    pub fn format(md: &Metadata, options: Format) -> Result<Self, InsufficientBuffer> {
        let mut buf = [0; FMT_BUFFER_SIZE];
        let written = formatter::format(md, &mut buf, options)?;

        Ok(FmtBuf { buf, written })
    }

    /**
    The formatted text, without its terminator.
    */
    pub fn as_str(&self) -> &str {
        // The formatter only writes ASCII
        str::from_utf8(self.as_bytes()).unwrap_or_default()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len()]
    }

    /**
    The formatted text, including its NUL terminator.
    */
    pub fn as_bytes_with_nul(&self) -> &[u8] {
        &self.buf[..self.written]
    }

    pub fn len(&self) -> usize {
        self.written.saturating_sub(1)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl AsRef<str> for FmtBuf {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl PartialEq<str> for FmtBuf {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl<'a> PartialEq<&'a str> for FmtBuf {
    fn eq(&self, other: &&'a str) -> bool {
        self.as_str() == *other
    }
}

impl fmt::Debug for FmtBuf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_str(), f)
    }
}

impl fmt::Display for FmtBuf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.as_str(), f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::metadata::{MAX_OP_ID_LEN, MAX_TASK_ID_LEN};

    #[test]
    fn fits_widest_output() {
        let md = Metadata::new(1, &[0xff; MAX_TASK_ID_LEN], &[0xff; MAX_OP_ID_LEN], 0xff).unwrap();

        let buf = md.to_buf(Format::from_bits(u32::MAX)).unwrap();

        assert_eq!(
            formatter::encoded_len(&md, Format::from_bits(u32::MAX)),
            buf.as_bytes_with_nul().len()
        );
        assert!(buf.len() < FMT_BUFFER_SIZE);
    }

    #[test]
    fn text_excludes_terminator() {
        let md = Metadata::new(2, &[0x01, 0x02, 0x03, 0x04], &[0x05, 0x06, 0x07, 0x08], 0x00)
            .unwrap();

        let buf = md.to_buf(Format::HEADER | Format::SAMPLE).unwrap();

        assert_eq!(buf, "2B0");
        assert_eq!(3, buf.len());
        assert_eq!(b"2B0\0", buf.as_bytes_with_nul());
    }

    #[test]
    fn empty() {
        let md = Metadata::new(1, &[0; 4], &[0; 4], 0).unwrap();

        let buf = md.to_buf(Format::empty()).unwrap();

        assert!(buf.is_empty());
        assert_eq!("", buf.as_str());
        assert_eq!(b"\0", buf.as_bytes_with_nul());
    }
}
