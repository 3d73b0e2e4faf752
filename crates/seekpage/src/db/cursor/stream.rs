//! Token serializer stages.
//!
//! Every stage implements [`TokenStreamer`]. The binary stage is the base;
//! compression and hashing wrap an inner stage and transform its bytes.
//! Assembly order is binary, then compression, then hashing, so the digest
//! always covers the bytes actually carried on the wire.

use crate::{
    HASH_DIGEST_LEN,
    db::cursor::{ContinuationToken, TokenError, TokenSchema},
    value::{ByteReader, ValueCodec},
};
use flate2::{Compression, read::DeflateDecoder, write::DeflateEncoder};
use std::{
    io::{Read, Write},
    sync::Arc,
};

/// Smallest hashed token: digest plus one payload byte.
pub const MIN_HASHED_LEN: usize = HASH_DIGEST_LEN + 1;

///
/// TokenStreamer
///
/// Shared "stream a token to / from bytes" capability.
///

pub trait TokenStreamer: Send + Sync {
    fn write_token(&self, token: &ContinuationToken) -> Result<Vec<u8>, TokenError>;

    fn read_token(&self, bytes: &[u8]) -> Result<ContinuationToken, TokenError>;
}

///
/// BinaryStreamer
///
/// Column-ordered sequence of codec-encoded values.
///

pub struct BinaryStreamer {
    schema: TokenSchema,
    codec: Arc<dyn ValueCodec>,
}

impl BinaryStreamer {
    #[must_use]
    pub fn new(schema: TokenSchema, codec: Arc<dyn ValueCodec>) -> Self {
        Self { schema, codec }
    }
}

impl TokenStreamer for BinaryStreamer {
    fn write_token(&self, token: &ContinuationToken) -> Result<Vec<u8>, TokenError> {
        let ContinuationToken::Boundary(values) = token else {
            return Err(TokenError::encode("the none token has no binary form"));
        };
        self.schema.validate(values)?;

        let mut out = Vec::new();
        for value in values {
            self.codec.encode_value(value, &mut out);
        }

        Ok(out)
    }

    // One value per configured column. A stream that ends cleanly on a value
    // boundary before the last column is a narrower schema; bytes left after
    // the last column are malformed.
    fn read_token(&self, bytes: &[u8]) -> Result<ContinuationToken, TokenError> {
        if bytes.is_empty() {
            return Err(TokenError::malformed("empty payload"));
        }

        let mut reader = ByteReader::new(bytes);
        let mut values = Vec::with_capacity(self.schema.len());
        for _ in 0..self.schema.len() {
            if reader.is_exhausted() {
                break;
            }
            values.push(self.codec.decode_value(&mut reader)?);
        }
        if !reader.is_exhausted() {
            return Err(TokenError::malformed(format!(
                "{} trailing bytes after {} columns",
                reader.remaining(),
                self.schema.len()
            )));
        }
        self.schema.validate(&values)?;

        Ok(ContinuationToken::Boundary(values))
    }
}

///
/// CompressingStreamer
///
/// Raw deflate over the entire inner payload. Decompressed output is
/// bounded so a small token cannot inflate without limit, and the deflate
/// stream must end exactly at the end of the input.
///

pub struct CompressingStreamer {
    inner: Box<dyn TokenStreamer>,
    max_output: usize,
}

impl CompressingStreamer {
    #[must_use]
    pub fn new(inner: Box<dyn TokenStreamer>, max_output: usize) -> Self {
        Self { inner, max_output }
    }

    fn compress(data: &[u8]) -> Result<Vec<u8>, TokenError> {
        let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
        encoder
            .write_all(data)
            .map_err(|err| TokenError::encode(format!("deflate failed: {err}")))?;

        encoder
            .finish()
            .map_err(|err| TokenError::encode(format!("deflate failed: {err}")))
    }

    fn decompress(&self, data: &[u8]) -> Result<Vec<u8>, TokenError> {
        let mut decoder = DeflateDecoder::new(data);
        let mut decompressed = Vec::new();
        let mut buffer = [0u8; 1024];

        loop {
            let bytes_read = decoder
                .read(&mut buffer)
                .map_err(|err| TokenError::malformed(format!("inflate failed: {err}")))?;

            if bytes_read == 0 {
                break;
            }

            if decompressed.len().saturating_add(bytes_read) > self.max_output {
                return Err(TokenError::malformed(format!(
                    "decompressed payload exceeds {} bytes",
                    self.max_output
                )));
            }

            decompressed.extend_from_slice(&buffer[..bytes_read]);
        }

        let consumed = usize::try_from(decoder.total_in()).unwrap_or(usize::MAX);
        if consumed != data.len() {
            return Err(TokenError::malformed(format!(
                "{} trailing bytes after deflate stream",
                data.len().saturating_sub(consumed)
            )));
        }

        Ok(decompressed)
    }
}

impl TokenStreamer for CompressingStreamer {
    fn write_token(&self, token: &ContinuationToken) -> Result<Vec<u8>, TokenError> {
        let raw = self.inner.write_token(token)?;

        Self::compress(&raw)
    }

    fn read_token(&self, bytes: &[u8]) -> Result<ContinuationToken, TokenError> {
        let raw = self.decompress(bytes)?;

        self.inner.read_token(&raw)
    }
}

///
/// HashingStreamer
///
/// `[16-byte md5 digest][payload]`. The digest detects corruption and casual
/// tampering; it is not a keyed MAC.
///

pub struct HashingStreamer {
    inner: Box<dyn TokenStreamer>,
}

impl HashingStreamer {
    #[must_use]
    pub fn new(inner: Box<dyn TokenStreamer>) -> Self {
        Self { inner }
    }
}

impl TokenStreamer for HashingStreamer {
    fn write_token(&self, token: &ContinuationToken) -> Result<Vec<u8>, TokenError> {
        let payload = self.inner.write_token(token)?;
        let digest = md5::compute(&payload);

        let mut out = Vec::with_capacity(HASH_DIGEST_LEN + payload.len());
        out.extend_from_slice(&digest.0);
        out.extend_from_slice(&payload);

        Ok(out)
    }

    fn read_token(&self, bytes: &[u8]) -> Result<ContinuationToken, TokenError> {
        if bytes.len() < MIN_HASHED_LEN {
            return Err(TokenError::InsufficientLength {
                len: bytes.len(),
                min: MIN_HASHED_LEN,
            });
        }

        let (expected, payload) = bytes.split_at(HASH_DIGEST_LEN);
        if md5::compute(payload).0.as_slice() != expected {
            return Err(TokenError::HashMismatch);
        }

        self.inner.read_token(payload)
    }
}
