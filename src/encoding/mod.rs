//! Value and level codecs.
//!
//! `plain` holds the PLAIN encoders/decoders per physical type; `rle` holds
//! the RLE/bit-packed hybrid codec used for repetition levels, definition
//! levels, and boolean values in V2 data pages.

pub mod plain;
pub mod rle;
