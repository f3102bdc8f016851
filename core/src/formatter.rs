/*!
Formatting [`Metadata`] as hex text.

[`format`] writes into a caller-supplied buffer and never allocates. Before writing anything it checks the buffer is large enough, so a failed call leaves the buffer untouched.

The output is made of up to four field groups, in this order:

1. The header byte, as two hex digits.
2. The task id, as two hex digits per byte.
3. The op id, as two hex digits per byte.
4. The flags byte as two hex digits, or just the sampled bit as `0` or `1`.

A NUL terminator always follows.
*/

use core::{cmp, fmt};

use crate::{metadata::Metadata, options::Format};

const SEPARATOR: u8 = b'-';

const TERMINATOR: u8 = b'\0';

/**
The header byte written for version 2 metadata.

Version 2 doesn't pack id lengths into the header.
*/
pub const V2_HEADER: u8 = 0x2b;

/**
Write `md` into `buf` as hex text, using `options` to pick the fields.

On success, returns the number of bytes written including the NUL terminator. The text itself is the first `n - 1` bytes.

If the buffer is too small nothing is written and [`InsufficientBuffer`] is returned.
*/
pub fn format(
    md: &Metadata,
    buf: &mut [u8],
    options: Format,
) -> Result<usize, InsufficientBuffer> {
    let capacity = buf.len();

    let legacy = required_capacity(md);
    let exact = encoded_len(md, options);

    if legacy > capacity || exact > capacity {
        return Err(InsufficientBuffer {
            required: cmp::max(legacy, exact),
            capacity,
        });
    }

    let separators = options.contains(Format::SEPARATORS);

    let mut w = Writer::new(buf, options.contains(Format::LOWERCASE));

    if options.contains(Format::HEADER) {
        w.put_hex(header(md));

        // Only separate if more fields follow
        if separators
            && options.intersects(Format::TASK | Format::OP | Format::FLAGS | Format::SAMPLE)
        {
            w.put(SEPARATOR);
        }
    }

    if options.contains(Format::TASK) {
        w.put_hex_all(md.task_id());

        if separators && options.intersects(Format::OP | Format::FLAGS | Format::SAMPLE) {
            w.put(SEPARATOR);
        }
    }

    if options.contains(Format::OP) {
        w.put_hex_all(md.op_id());

        if separators && options.intersects(Format::FLAGS | Format::SAMPLE) {
            w.put(SEPARATOR);
        }
    }

    if options.contains(Format::FLAGS) {
        w.put_hex(md.flags());
    } else if options.contains(Format::SAMPLE) {
        w.put(b'0' + (md.flags() & 1));
    }

    w.put(TERMINATOR);

    Ok(w.written())
}

/**
The buffer size [`format`] requires before it will write anything for `md`.

This is the header, task id, op id, flags, three separators and a terminator, with each id byte counted once. It's checked alongside the exact [`encoded_len`] so buffers that were accepted or rejected before stay that way.
*/
pub fn required_capacity(md: &Metadata) -> usize {
    2 + md.task_id().len() + md.op_id().len() + 2 + 4
}

/**
The exact number of bytes [`format`] writes for `md` under `options`, including the terminator.
*/
pub fn encoded_len(md: &Metadata, options: Format) -> usize {
    let separators = options.contains(Format::SEPARATORS);
    let sep = |more: Format| usize::from(separators && options.intersects(more));

    let mut len = 0;

    if options.contains(Format::HEADER) {
        len += 2 + sep(Format::TASK | Format::OP | Format::FLAGS | Format::SAMPLE);
    }

    if options.contains(Format::TASK) {
        len += md.task_id().len() * 2 + sep(Format::OP | Format::FLAGS | Format::SAMPLE);
    }

    if options.contains(Format::OP) {
        len += md.op_id().len() * 2 + sep(Format::FLAGS | Format::SAMPLE);
    }

    if options.contains(Format::FLAGS) {
        len += 2;
    } else if options.contains(Format::SAMPLE) {
        len += 1;
    }

    len + 1
}

/**
The packed header byte for `md`.

Versions other than 2 pack the version and id lengths into a single byte:

```text
 7   4   3   2   0
+-----+----+-------+
| ver | op | task  |
+-----+----+-------+
```

where `op` is `op_len / 4 - 1` (one bit) and `task` is `task_len / 4 - 1` (two bits). A task code of 4 (a 20 byte task id) doesn't fit in two bits and is written as 3, the same as a 16 byte task id. That ambiguity is part of the wire format and readers can't resolve it from the header alone.
*/
pub fn header(md: &Metadata) -> u8 {
    if md.version() == 2 {
        return V2_HEADER;
    }

    let task_code = match (md.task_id().len() >> 2).wrapping_sub(1) {
        4 => 3,
        code => code,
    } as u8;

    let op_code = ((md.op_id().len() >> 2).wrapping_sub(1) & 1) as u8;

    (md.version() << 4) | (op_code << 3) | task_code
}

struct Writer<'a> {
    buf: &'a mut [u8],
    pos: usize,
    alpha: u8,
}

impl<'a> Writer<'a> {
    fn new(buf: &'a mut [u8], lowercase: bool) -> Self {
        Writer {
            buf,
            pos: 0,
            alpha: if lowercase { b'a' } else { b'A' },
        }
    }

    fn put(&mut self, b: u8) {
        self.buf[self.pos] = b;
        self.pos += 1;
    }

    fn put_hex(&mut self, b: u8) {
        self.put(self.digit(b >> 4));
        self.put(self.digit(b & 0x0f));
    }

    fn put_hex_all(&mut self, bytes: &[u8]) {
        for b in bytes {
            self.put_hex(*b);
        }
    }

    fn digit(&self, nibble: u8) -> u8 {
        if nibble <= 9 {
            b'0' + nibble
        } else {
            self.alpha + (nibble - 10)
        }
    }

    fn written(&self) -> usize {
        self.pos
    }
}

/**
An error formatting [`Metadata`] into a buffer that's too small.
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsufficientBuffer {
    required: usize,
    capacity: usize,
}

impl InsufficientBuffer {
    /**
    The buffer size that would have been accepted.
    */
    pub fn required(&self) -> usize {
        self.required
    }

    /**
    The size of the buffer that was given.
    */
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl fmt::Display for InsufficientBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "a buffer of {} bytes is too small to format metadata; {} bytes are required",
            self.capacity, self.required
        )
    }
}

#[cfg(feature = "std")]
impl std::error::Error for InsufficientBuffer {}
