//! Chunk descriptors and the linear chunk scan.

use crate::error::{Error, Result};
use crate::{ChunkReaderConfig, FourCc};

/// Tag plus size field.
pub const CHUNK_HEADER_SIZE: usize = 8;

/// A chunk located inside a shared buffer.
///
/// Descriptors never copy payload bytes; they are only meaningful together
/// with the buffer they were read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk {
    /// Chunk identifier
    pub tag: FourCc,
    /// Payload length in bytes (pad byte not included)
    pub size: u32,
    /// Absolute offset of the first payload byte
    pub offset: usize,
}

impl Chunk {
    /// Absolute offset one past the last payload byte.
    pub fn end(&self) -> usize {
        self.offset + self.size as usize
    }

    /// Payload bytes of this chunk within `data`.
    pub fn payload<'a>(&self, data: &'a [u8]) -> &'a [u8] {
        data.get(self.offset..self.end()).unwrap_or(&[])
    }

    /// Whether this chunk carries the given tag.
    pub fn is(&self, tag: FourCc) -> bool {
        self.tag == tag
    }

    /// Form type of a `RIFF`/`LIST` chunk (first four payload bytes).
    pub fn form_type(&self, data: &[u8]) -> Result<FourCc> {
        FourCc::from_slice(self.payload(data)).ok_or(Error::MissingFormType {
            tag: self.tag,
            size: self.size,
        })
    }

    /// Window `(start, length)` holding the nested chunks of a `RIFF`/`LIST` chunk.
    pub fn list_body(&self) -> Result<(usize, usize)> {
        if self.size < 4 {
            return Err(Error::MissingFormType {
                tag: self.tag,
                size: self.size,
            });
        }
        Ok((self.offset + 4, self.size as usize - 4))
    }

    /// Scan the nested chunks following the form type.
    pub fn children(&self, data: &[u8], config: ChunkReaderConfig) -> Result<Vec<Chunk>> {
        let (start, length) = self.list_body()?;
        parse(data, start, length, config)
    }
}

/// Scan `length` bytes of `data` starting at `start` into an ordered chunk list.
pub fn parse(
    data: &[u8],
    start: usize,
    length: usize,
    config: ChunkReaderConfig,
) -> Result<Vec<Chunk>> {
    ChunkReader::new(data, start, length, config)?.collect()
}

/// Iterator over the chunks of one byte window.
///
/// A chunk whose payload runs past the *window* but stays inside the buffer is
/// accepted, and the scan simply ends after it; reading past the *buffer* is
/// a [`Error::TruncatedChunk`]. The iterator yields at most one error and then
/// stops.
pub struct ChunkReader<'a> {
    data: &'a [u8],
    start: usize,
    end: usize,
    pos: usize,
    config: ChunkReaderConfig,
}

impl<'a> ChunkReader<'a> {
    /// Create a reader over `data[start..start + length]`.
    pub fn new(
        data: &'a [u8],
        start: usize,
        length: usize,
        config: ChunkReaderConfig,
    ) -> Result<Self> {
        let end = start
            .checked_add(length)
            .filter(|&end| end <= data.len())
            .ok_or(Error::RangeOutOfBounds {
                start,
                length,
                buffer_len: data.len(),
            })?;

        Ok(Self {
            data,
            start,
            end,
            pos: start,
            config,
        })
    }

    /// Reader over the whole buffer with the default config.
    pub fn whole(data: &'a [u8]) -> Self {
        Self {
            data,
            start: 0,
            end: data.len(),
            pos: 0,
            config: ChunkReaderConfig::default(),
        }
    }

    /// Current cursor position (absolute).
    pub fn position(&self) -> usize {
        self.pos
    }

    fn read_chunk(&mut self) -> Result<Chunk> {
        let remaining = self.end - self.pos;
        if remaining < CHUNK_HEADER_SIZE {
            return Err(Error::UnexpectedEof {
                offset: self.pos,
                needed: CHUNK_HEADER_SIZE,
                remaining,
            });
        }

        let header = &self.data[self.pos..self.pos + CHUNK_HEADER_SIZE];
        let tag = FourCc([header[0], header[1], header[2], header[3]]);
        let size = self
            .config
            .endian
            .read_u32([header[4], header[5], header[6], header[7]]);
        let offset = self.pos + CHUNK_HEADER_SIZE;

        let available = self.data.len() - offset;
        if size as usize > available {
            return Err(Error::TruncatedChunk {
                tag,
                offset,
                size,
                available,
            });
        }

        let mut next = offset + size as usize;
        if self.config.padding && (next - self.start) & 1 == 1 {
            next += 1;
        }
        self.pos = next;

        Ok(Chunk { tag, size, offset })
    }
}

impl Iterator for ChunkReader<'_> {
    type Item = Result<Chunk>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.end {
            return None;
        }
        let chunk = self.read_chunk();
        if chunk.is_err() {
            self.pos = self.end;
        }
        Some(chunk)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Endian;
    use proptest::prelude::*;

    fn push_chunk(out: &mut Vec<u8>, tag: &[u8; 4], payload: &[u8]) {
        out.extend_from_slice(tag);
        out.extend_from_slice(&(payload.len() as u32).to_le_bytes());
        out.extend_from_slice(payload);
        if payload.len() % 2 == 1 {
            out.push(0);
        }
    }

    #[test]
    fn test_parse_two_chunks() {
        let mut data = Vec::new();
        push_chunk(&mut data, b"abcd", &[1, 2, 3, 4]);
        push_chunk(&mut data, b"efgh", &[5, 6]);

        let chunks = parse(&data, 0, data.len(), ChunkReaderConfig::default()).unwrap();
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].tag, b"abcd");
        assert_eq!(chunks[0].size, 4);
        assert_eq!(chunks[0].offset, 8);
        assert_eq!(chunks[1].payload(&data), &[5, 6]);
    }

    #[test]
    fn test_odd_chunk_consumes_pad_byte() {
        let mut data = Vec::new();
        push_chunk(&mut data, b"odd ", &[9, 9, 9]);
        push_chunk(&mut data, b"next", &[7]);

        let chunks = parse(&data, 0, data.len(), ChunkReaderConfig::default()).unwrap();
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].size, 3);
        // 8 header + 3 payload + 1 pad
        assert_eq!(chunks[1].offset, 12 + 8);
        assert_eq!(chunks[1].payload(&data), &[7]);
    }

    #[test]
    fn test_no_padding_config() {
        let mut data = Vec::new();
        data.extend_from_slice(b"odd ");
        data.extend_from_slice(&1u32.to_le_bytes());
        data.push(42);
        data.extend_from_slice(b"tail");
        data.extend_from_slice(&0u32.to_le_bytes());

        let config = ChunkReaderConfig::default().with_padding(false);
        let chunks = parse(&data, 0, data.len(), config).unwrap();
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[1].tag, b"tail");
    }

    #[test]
    fn test_padding_counts_from_scan_start() {
        // Window starts at an odd absolute offset; parity is relative to it.
        let mut data = vec![0xee];
        push_chunk(&mut data, b"odd ", &[1]);
        push_chunk(&mut data, b"two ", &[2, 2]);

        let chunks = parse(&data, 1, data.len() - 1, ChunkReaderConfig::default()).unwrap();
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[1].offset, 1 + 8 + 1 + 1 + 8);
    }

    #[test]
    fn test_big_endian_size() {
        let mut data = Vec::new();
        data.extend_from_slice(b"RIFX");
        data.extend_from_slice(&2u32.to_be_bytes());
        data.extend_from_slice(&[1, 2]);

        let chunks = parse(&data, 0, data.len(), ChunkReaderConfig::big_endian()).unwrap();
        assert_eq!(chunks[0].size, 2);

        let little = ChunkReaderConfig {
            endian: Endian::Little,
            padding: true,
        };
        assert!(matches!(
            parse(&data, 0, data.len(), little),
            Err(Error::TruncatedChunk { .. })
        ));
    }

    #[test]
    fn test_short_header_is_eof() {
        let mut data = Vec::new();
        push_chunk(&mut data, b"full", &[]);
        data.extend_from_slice(b"abc");

        let err = parse(&data, 0, data.len(), ChunkReaderConfig::default()).unwrap_err();
        assert_eq!(
            err,
            Error::UnexpectedEof {
                offset: 8,
                needed: 8,
                remaining: 3
            }
        );
    }

    #[test]
    fn test_truncated_payload() {
        let mut data = Vec::new();
        data.extend_from_slice(b"big ");
        data.extend_from_slice(&100u32.to_le_bytes());
        data.extend_from_slice(&[0; 10]);

        let err = parse(&data, 0, data.len(), ChunkReaderConfig::default()).unwrap_err();
        assert_eq!(
            err,
            Error::TruncatedChunk {
                tag: FourCc(*b"big "),
                offset: 8,
                size: 100,
                available: 10
            }
        );
    }

    #[test]
    fn test_window_outside_buffer() {
        let data = [0u8; 4];
        let err = parse(&data, 2, 10, ChunkReaderConfig::default()).unwrap_err();
        assert!(matches!(err, Error::RangeOutOfBounds { .. }));
    }

    #[test]
    fn test_form_type_and_children() {
        let mut inner = Vec::new();
        inner.extend_from_slice(b"INFO");
        push_chunk(&mut inner, b"INAM", b"Bank\0\0");
        let mut data = Vec::new();
        push_chunk(&mut data, b"LIST", &inner);

        let chunks = parse(&data, 0, data.len(), ChunkReaderConfig::default()).unwrap();
        let list = chunks[0];
        assert_eq!(list.form_type(&data).unwrap(), b"INFO");

        let children = list.children(&data, ChunkReaderConfig::default()).unwrap();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].tag, b"INAM");
        assert_eq!(children[0].payload(&data), b"Bank\0\0");
    }

    #[test]
    fn test_form_type_missing() {
        let mut data = Vec::new();
        push_chunk(&mut data, b"LIST", &[1, 2]);
        let chunk = ChunkReader::whole(&data).next().unwrap().unwrap();
        assert!(matches!(
            chunk.form_type(&data),
            Err(Error::MissingFormType { size: 2, .. })
        ));
        assert!(chunk.list_body().is_err());
    }

    #[test]
    fn test_reader_stops_after_error() {
        let data = [b'a', b'b'];
        let mut reader = ChunkReader::whole(&data);
        assert!(reader.next().unwrap().is_err());
        assert!(reader.next().is_none());
    }

    proptest! {
        #[test]
        fn prop_chunk_bounds_cover_window(sizes in proptest::collection::vec(0usize..40, 0..12)) {
            let mut data = Vec::new();
            for (i, size) in sizes.iter().enumerate() {
                let payload = vec![i as u8; *size];
                push_chunk(&mut data, b"data", &payload);
            }

            let chunks = parse(&data, 0, data.len(), ChunkReaderConfig::default()).unwrap();
            prop_assert_eq!(chunks.len(), sizes.len());

            let consumed: usize = chunks
                .iter()
                .map(|c| CHUNK_HEADER_SIZE + c.size as usize + (c.size as usize & 1))
                .sum();
            prop_assert_eq!(consumed, data.len());

            for (chunk, size) in chunks.iter().zip(&sizes) {
                prop_assert_eq!(chunk.size as usize, *size);
            }
        }
    }
}
