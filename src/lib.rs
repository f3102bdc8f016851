/*!
Render trace context metadata as hex text.

`xtrace` hands trace context across process boundaries as a compact hex string. A [`Metadata`] record holds a version, a task id for the whole trace, an op id for one operation in it, and a flags byte.

The canonical form is produced by [`to_string`]:

```
let md = xtrace::Metadata::new(1, &[0xde, 0xad, 0xbe, 0xef], &[0x01, 0x23, 0xab, 0xcd], 0x01)?;

assert_eq!("10DEADBEEF0123ABCD01", xtrace::to_string(&md));
# Ok::<(), xtrace::InvalidMetadata>(())
```

Other shapes are picked with a [`Format`], or a numeric style through [`to_string_styled`]:

```
# let md = xtrace::Metadata::new(1, &[0xde, 0xad, 0xbe, 0xef], &[0x01, 0x23, 0xab, 0xcd], 0x01)?;
use xtrace::Format;

assert_eq!("10-deadbeef-0123abcd-01", xtrace::to_string_styled(&md, 1));
assert_eq!("DEADBEEF-1", xtrace::to_string_with(&md, Format::TASK | Format::SAMPLE | Format::SEPARATORS));
# Ok::<(), xtrace::InvalidMetadata>(())
```

These functions never fail. If the metadata can't be formatted the result is an empty string and the failure is reported through `emit`'s internal runtime.

For allocation-free formatting into your own buffer, see [`format`].
*/

#[doc(inline)]
pub use xtrace_core::{
    buf::{FmtBuf, FMT_BUFFER_SIZE},
    formatter::{encoded_len, format, header, required_capacity, InsufficientBuffer},
    metadata::{InvalidMetadata, Metadata, FLAG_SAMPLED, MAX_OP_ID_LEN, MAX_TASK_ID_LEN},
    options::{Format, ParseFormatError},
};

/**
Format metadata in its raw form: header, task id, op id and flags as uppercase hex with no separators.
*/
pub fn to_string(md: &Metadata) -> String {
    to_string_with(md, Format::RAW)
}

/**
Format metadata using a numeric style.

Style `1` is the legacy human-readable form, [`Format::LEGACY`]. Any other style is used directly as [`Format`] bits.
*/
pub fn to_string_styled(md: &Metadata, style: i64) -> String {
    to_string_with(md, Format::from_style(style))
}

/**
Format metadata with the given options.

If formatting fails the result is empty.
*/
pub fn to_string_with(md: &Metadata, options: Format) -> String {
    format_to_string(md, options, &mut [0; FMT_BUFFER_SIZE])
}

fn format_to_string(md: &Metadata, options: Format, buf: &mut [u8]) -> String {
    match format(md, buf, options) {
        Ok(written) => String::from_utf8_lossy(&buf[..written - 1]).into_owned(),
        Err(err) => {
            emit::debug!(
                rt: emit::runtime::internal(),
                "failed to format {metadata} as {options}: {err}",
                #[emit::as_debug]
                metadata: md,
                #[emit::as_display]
                options,
                err,
            );

            String::new()
        }
    }
}
