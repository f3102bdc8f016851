/*!
The [`Metadata`] type.

[`Metadata`] is the trace context carried between services: a protocol version, a task id identifying the whole trace, an op id identifying one operation within it, and a flags byte.

Ids are opaque byte sequences. Their lengths are always a multiple of 4 and within the fixed capacities [`MAX_TASK_ID_LEN`] and [`MAX_OP_ID_LEN`]; [`Metadata::new`] is the only way to build a value so the formatter can rely on that.
*/

use core::fmt;

use crate::{buf::FmtBuf, formatter::InsufficientBuffer, options::Format};

/**
The maximum number of bytes in a task id.
*/
pub const MAX_TASK_ID_LEN: usize = 20;

/**
The maximum number of bytes in an op id.
*/
pub const MAX_OP_ID_LEN: usize = 8;

/**
The bit in [`Metadata::flags`] that marks the trace as sampled.
*/
pub const FLAG_SAMPLED: u8 = 0x01;

/**
A trace context record.
*/
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Metadata {
    version: u8,
    task_id: [u8; MAX_TASK_ID_LEN],
    task_len: u8,
    op_id: [u8; MAX_OP_ID_LEN],
    op_len: u8,
    flags: u8,
}

impl Metadata {
    /**
    Create a new metadata record, copying the given ids.

    Each id must be non-empty, a multiple of 4 bytes long, and fit within its capacity.
    */
    pub fn new(
        version: u8,
        task_id: &[u8],
        op_id: &[u8],
        flags: u8,
    ) -> Result<Self, InvalidMetadata> {
        check_len(IdKind::Task, task_id.len(), MAX_TASK_ID_LEN)?;
        check_len(IdKind::Op, op_id.len(), MAX_OP_ID_LEN)?;

        let mut md = Metadata {
            version,
            task_id: [0; MAX_TASK_ID_LEN],
            task_len: task_id.len() as u8,
            op_id: [0; MAX_OP_ID_LEN],
            op_len: op_id.len() as u8,
            flags,
        };

        md.task_id[..task_id.len()].copy_from_slice(task_id);
        md.op_id[..op_id.len()].copy_from_slice(op_id);

        Ok(md)
    }

    pub fn version(&self) -> u8 {
        self.version
    }

    /**
    The significant bytes of the task id, in storage order.
    */
    pub fn task_id(&self) -> &[u8] {
        &self.task_id[..usize::from(self.task_len)]
    }

    /**
    The significant bytes of the op id, in storage order.
    */
    pub fn op_id(&self) -> &[u8] {
        &self.op_id[..usize::from(self.op_len)]
    }

    pub fn flags(&self) -> u8 {
        self.flags
    }

    pub fn is_sampled(&self) -> bool {
        self.flags & FLAG_SAMPLED != 0
    }

    pub fn with_flags(mut self, flags: u8) -> Self {
        self.flags = flags;
        self
    }

    pub fn with_sampled(mut self, sampled: bool) -> Self {
        if sampled {
            self.flags |= FLAG_SAMPLED;
        } else {
            self.flags &= !FLAG_SAMPLED;
        }
        self
    }

    /**
    Format this record into a fixed buffer.

    [`crate::buf::FMT_BUFFER_SIZE`] is large enough for any record under any [`Format`], so this only fails if that invariant is broken.
    */
    pub fn to_buf(&self, format: Format) -> Result<FmtBuf, InsufficientBuffer> {
        FmtBuf::format(self, format)
    }
}

fn check_len(id: IdKind, len: usize, max: usize) -> Result<(), InvalidMetadata> {
    if len == 0 || len % 4 != 0 || len > max {
        Err(InvalidMetadata { id, len })
    } else {
        Ok(())
    }
}

impl fmt::Debug for Metadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        struct Hex<'a>(&'a [u8]);

        impl<'a> fmt::Debug for Hex<'a> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                for b in self.0 {
                    write!(f, "{:02x}", b)?;
                }

                Ok(())
            }
        }

        f.debug_struct("Metadata")
            .field("version", &self.version)
            .field("task_id", &Hex(self.task_id()))
            .field("op_id", &Hex(self.op_id()))
            .field("flags", &format_args!("{:#04x}", self.flags))
            .finish()
    }
}

/**
Writes the raw form.

The alternate flag (`{:#}`) writes the legacy human-readable form instead.
*/
impl fmt::Display for Metadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let format = if f.alternate() {
            Format::LEGACY
        } else {
            Format::RAW
        };

        let buf = self.to_buf(format).map_err(|_| fmt::Error)?;

        f.write_str(buf.as_str())
    }
}

#[cfg(feature = "sval")]
impl sval::Value for Metadata {
    fn stream<'sval, S: sval::Stream<'sval> + ?Sized>(&'sval self, stream: &mut S) -> sval::Result {
        let buf = self.to_buf(Format::RAW).map_err(|_| sval::Error::new())?;

        stream.value_computed(buf.as_str())
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Metadata {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::Error as _;

        let buf = self
            .to_buf(Format::RAW)
            .map_err(|err| S::Error::custom(err))?;

        serializer.serialize_str(buf.as_str())
    }
}

#[cfg(feature = "alloc")]
mod alloc_support {
    use alloc::string::{String, ToString};

    use super::*;

    impl Metadata {
        /**
        Format this record into an owned string using the given options.
        */
        pub fn to_string_with(&self, format: Format) -> Result<String, InsufficientBuffer> {
            self.to_buf(format).map(|buf| buf.as_str().to_string())
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum IdKind {
    Task,
    Op,
}

/**
An error attempting to build [`Metadata`] from ids with unsupported lengths.
*/
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidMetadata {
    id: IdKind,
    len: usize,
}

impl InvalidMetadata {
    /**
    The length of the rejected id.
    */
    pub fn id_len(&self) -> usize {
        self.len
    }
}

impl fmt::Display for InvalidMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (name, max) = match self.id {
            IdKind::Task => ("task", MAX_TASK_ID_LEN),
            IdKind::Op => ("op", MAX_OP_ID_LEN),
        };

        write!(
            f,
            "{} id length {} is invalid; expected a non-zero multiple of 4 up to {}",
            name, self.len, max
        )
    }
}

#[cfg(feature = "std")]
impl std::error::Error for InvalidMetadata {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_copies_ids() {
        let md = Metadata::new(1, &[1, 2, 3, 4, 5, 6, 7, 8], &[9, 10, 11, 12], 0x03).unwrap();

        assert_eq!(1, md.version());
        assert_eq!(&[1, 2, 3, 4, 5, 6, 7, 8], md.task_id());
        assert_eq!(&[9, 10, 11, 12], md.op_id());
        assert_eq!(0x03, md.flags());
        assert!(md.is_sampled());
    }

    #[test]
    fn new_rejects_invalid_lengths() {
        for (task, op) in [
            (&[0u8; 0][..], &[0u8; 4][..]),
            (&[0; 6][..], &[0; 4][..]),
            (&[0; 24][..], &[0; 4][..]),
            (&[0; 4][..], &[0; 0][..]),
            (&[0; 4][..], &[0; 3][..]),
            (&[0; 4][..], &[0; 12][..]),
        ] {
            assert!(
                Metadata::new(1, task, op, 0).is_err(),
                "{} {}",
                task.len(),
                op.len()
            );
        }

        let err = Metadata::new(1, &[0; 4], &[0; 12], 0).unwrap_err();
        assert_eq!(12, err.id_len());
        assert_eq!(
            "op id length 12 is invalid; expected a non-zero multiple of 4 up to 8",
            err.to_string()
        );
    }

    #[test]
    fn new_accepts_capacity() {
        let md = Metadata::new(1, &[0xff; MAX_TASK_ID_LEN], &[0xee; MAX_OP_ID_LEN], 0).unwrap();

        assert_eq!(MAX_TASK_ID_LEN, md.task_id().len());
        assert_eq!(MAX_OP_ID_LEN, md.op_id().len());
    }

    #[test]
    fn sampled() {
        let md = Metadata::new(1, &[0; 4], &[0; 4], 0x02).unwrap();

        assert!(!md.is_sampled());
        assert_eq!(0x03, md.with_sampled(true).flags());
        assert_eq!(0x02, md.with_sampled(true).with_sampled(false).flags());
        assert_eq!(0xff, md.with_flags(0xff).flags());
    }

    #[test]
    fn display() {
        let md = Metadata::new(1, &[0xab, 0xcd, 0xef, 0x01], &[0x23, 0x45, 0x67, 0x89], 0x01)
            .unwrap();

        assert_eq!("10ABCDEF012345678901", md.to_string());
        assert_eq!("10-abcdef01-23456789-01", format!("{:#}", md));
    }

    #[test]
    #[cfg(feature = "alloc")]
    fn to_string_with() {
        let md = Metadata::new(1, &[0xab, 0xcd, 0xef, 0x01], &[0x23, 0x45, 0x67, 0x89], 0x00)
            .unwrap();

        assert_eq!(
            "abcdef01-0",
            md.to_string_with(Format::TASK | Format::SAMPLE | Format::SEPARATORS | Format::LOWERCASE)
                .unwrap()
        );
        assert_eq!("", md.to_string_with(Format::empty()).unwrap());
    }

    #[test]
    fn debug() {
        let md = Metadata::new(2, &[0xab, 0xcd, 0xef, 0x01], &[0x23, 0x45, 0x67, 0x89], 0x01)
            .unwrap();

        assert_eq!(
            "Metadata { version: 2, task_id: abcdef01, op_id: 23456789, flags: 0x01 }",
            format!("{:?}", md)
        );
    }

    #[test]
    #[cfg(feature = "sval")]
    fn stream_sval() {
        let md = Metadata::new(1, &[0xab, 0xcd, 0xef, 0x01], &[0x23, 0x45, 0x67, 0x89], 0x01)
            .unwrap();

        assert_eq!(
            "\"10ABCDEF012345678901\"",
            sval_json::stream_to_string(md).unwrap()
        );
    }

    #[test]
    #[cfg(feature = "serde")]
    fn serialize_serde() {
        let md = Metadata::new(1, &[0xab, 0xcd, 0xef, 0x01], &[0x23, 0x45, 0x67, 0x89], 0x01)
            .unwrap();

        assert_eq!(
            "\"10ABCDEF012345678901\"",
            serde_json::to_string(&md).unwrap()
        );
    }
}
