//! Serialization seam for the metadata codec.
//!
//! Metadata records implement [`TSerializable`] over generic Thrift
//! protocols instead of trait objects. Decoding goes through a byte-counting
//! reader so callers learn how many bytes a record consumed; page headers
//! are decoded from streams whose length is not known upfront.

use std::io::Read;

use thrift::protocol::{TCompactInputProtocol, TCompactOutputProtocol, TInputProtocol, TOutputProtocol};

use crate::error::Result;

/// Reads and writes a metadata record to Thrift protocols.
///
/// Unlike [`thrift::protocol::TSerializable`] this uses generics instead of
/// trait objects.
pub trait TSerializable: Sized {
    fn read_from_in_protocol<T: TInputProtocol>(i_prot: &mut T) -> thrift::Result<Self>;
    fn write_to_out_protocol<T: TOutputProtocol>(&self, o_prot: &mut T) -> thrift::Result<()>;
}

/// Slice reader that tracks how many bytes have been consumed.
pub struct TrackedReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> TrackedReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }
}

impl Read for TrackedReader<'_> {
    fn read(&mut self, out: &mut [u8]) -> std::io::Result<usize> {
        let remaining = &self.buf[self.pos..];
        let n = remaining.len().min(out.len());
        out[..n].copy_from_slice(&remaining[..n]);
        self.pos += n;
        Ok(n)
    }
}

/// Encode a metadata record with the compact protocol.
pub fn encode_to_vec<S: TSerializable>(value: &S) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    {
        let mut protocol = TCompactOutputProtocol::new(&mut buf);
        value.write_to_out_protocol(&mut protocol)?;
    }
    Ok(buf)
}

/// Decode a metadata record from the head of `buf`, reporting how many
/// bytes were consumed.
pub fn decode_from_slice<S: TSerializable>(buf: &[u8]) -> Result<(S, usize)> {
    let mut reader = TrackedReader::new(buf);
    let value = {
        let mut protocol = TCompactInputProtocol::new(&mut reader);
        S::read_from_in_protocol(&mut protocol)?
    };
    Ok((value, reader.position()))
}
