/*!
Core formatting for `xtrace` trace context metadata.

This crate turns a [`metadata::Metadata`] record into compact hex text, writing into a caller-supplied buffer without allocating. See [`formatter::format`] for the encoding and [`options::Format`] for the ways it can be shaped.

The crate is `no_std`. The `std` feature adds [`std::error::Error`] impls, `sval` and `serde` add serialization support.
*/

#![cfg_attr(not(any(test, feature = "std")), no_std)]

#[cfg(feature = "alloc")]
extern crate alloc;

extern crate core;

pub mod buf;
pub mod formatter;
pub mod metadata;
pub mod options;
