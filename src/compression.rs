//! Compression codec capability.
//!
//! Page bodies pass through [`Compression::compress`] on write and
//! [`Compression::decompress`] on read. `Uncompressed` is the identity and
//! avoids copying where the caller allows it.

use std::io::{Read, Write};

use crate::basic::Compression;
use crate::error::{ParquetError, Result};

impl Compression {
    /// True when compress/decompress are the identity.
    pub fn is_uncompressed(&self) -> bool {
        matches!(self, Compression::Uncompressed)
    }

    pub fn compress(&self, data: &[u8]) -> Result<Vec<u8>> {
        match self {
            Compression::Uncompressed => Ok(data.to_vec()),
            Compression::Snappy => snap::raw::Encoder::new()
                .compress_vec(data)
                .map_err(|e| ParquetError::codec(format!("snappy compression failed: {}", e))),
            Compression::Gzip => {
                let mut encoder =
                    flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
                encoder
                    .write_all(data)
                    .and_then(|_| encoder.finish())
                    .map_err(|e| ParquetError::codec(format!("gzip compression failed: {}", e)))
            }
            Compression::Zstd => zstd::bulk::compress(data, 0)
                .map_err(|e| ParquetError::codec(format!("zstd compression failed: {}", e))),
        }
    }

    pub fn decompress(&self, data: &[u8], uncompressed_size: usize) -> Result<Vec<u8>> {
        match self {
            Compression::Uncompressed => Ok(data.to_vec()),
            Compression::Snappy => snap::raw::Decoder::new()
                .decompress_vec(data)
                .map_err(|e| ParquetError::codec(format!("snappy decompression failed: {}", e))),
            Compression::Gzip => {
                let mut out = Vec::with_capacity(uncompressed_size);
                flate2::read::GzDecoder::new(data)
                    .read_to_end(&mut out)
                    .map_err(|e| {
                        ParquetError::codec(format!("gzip decompression failed: {}", e))
                    })?;
                Ok(out)
            }
            Compression::Zstd => zstd::bulk::decompress(data, uncompressed_size)
                .map_err(|e| ParquetError::codec(format!("zstd decompression failed: {}", e))),
        }
    }
}
