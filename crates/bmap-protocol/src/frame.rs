//! Frame encoding and the transport boundary.
//!
//! Every message on the command channel, in both directions, is one frame:
//!
//! ```text
//! +----------------+----------+----------+-----+-------------------+
//! | function_block | function | operator | len | payload[0..len]   |
//! +----------------+----------+----------+-----+-------------------+
//! ```
//!
//! `len` is a single byte, so a payload holds at most 255 bytes. There is no
//! request id; a connection carries one outstanding request at a time.

use std::io::{ErrorKind, Read, Write};

use bytes::BufMut;

use crate::constants::{HEADER_LEN, MAX_PAYLOAD_LEN};
use crate::error::{BmapError, Result};
use crate::types::{FunctionBlock, Operator};

/// The fixed four-byte frame header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    /// Function block.
    pub block: FunctionBlock,
    /// Function id within the block.
    pub function: u8,
    /// Operator (request) or status (response).
    pub operator: Operator,
    /// Payload length in bytes.
    pub len: u8,
}

impl FrameHeader {
    /// Parse a header from its four wire bytes.
    pub fn from_bytes(bytes: [u8; HEADER_LEN]) -> Self {
        FrameHeader {
            block: FunctionBlock::from(bytes[0]),
            function: bytes[1],
            operator: Operator::from(bytes[2]),
            len: bytes[3],
        }
    }

    /// The four wire bytes.
    pub fn to_bytes(&self) -> [u8; HEADER_LEN] {
        [
            self.block.value(),
            self.function,
            self.operator.value(),
            self.len,
        ]
    }
}

/// A complete frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Function block.
    pub block: FunctionBlock,
    /// Function id within the block.
    pub function: u8,
    /// Operator (request) or status (response).
    pub operator: Operator,
    /// Payload, at most 255 bytes.
    pub payload: Vec<u8>,
}

impl Frame {
    /// Build a frame, rejecting payloads that do not fit the length byte.
    pub fn new(
        block: FunctionBlock,
        function: u8,
        operator: Operator,
        payload: impl Into<Vec<u8>>,
    ) -> Result<Self> {
        let payload = payload.into();
        if payload.len() > MAX_PAYLOAD_LEN {
            return Err(BmapError::PayloadTooLong {
                max: MAX_PAYLOAD_LEN,
                actual: payload.len(),
            });
        }
        Ok(Frame {
            block,
            function,
            operator,
            payload,
        })
    }

    /// A request frame with an empty payload.
    pub fn request(block: FunctionBlock, function: u8, operator: Operator) -> Self {
        Frame {
            block,
            function,
            operator,
            payload: Vec::new(),
        }
    }

    /// The header for this frame. Fails if the payload does not fit the
    /// length byte, which can happen when `payload` was grown after `new`.
    pub fn header(&self) -> Result<FrameHeader> {
        let len = u8::try_from(self.payload.len()).map_err(|_| BmapError::PayloadTooLong {
            max: MAX_PAYLOAD_LEN,
            actual: self.payload.len(),
        })?;
        Ok(FrameHeader {
            block: self.block,
            function: self.function,
            operator: self.operator,
            len,
        })
    }

    /// Encode to wire bytes.
    pub fn encode(&self) -> Result<Vec<u8>> {
        let header = self.header()?;
        let mut buf = Vec::with_capacity(HEADER_LEN + self.payload.len());
        buf.put_slice(&header.to_bytes());
        buf.put_slice(&self.payload);
        Ok(buf)
    }

    /// Decode one frame from the start of `data`.
    ///
    /// Returns the frame and the number of bytes consumed.
    pub fn decode(data: &[u8]) -> Result<(Self, usize)> {
        if data.len() < HEADER_LEN {
            return Err(BmapError::ShortRead {
                expected: HEADER_LEN,
                actual: data.len(),
            });
        }
        let header = FrameHeader::from_bytes([data[0], data[1], data[2], data[3]]);
        let end = HEADER_LEN + usize::from(header.len);
        if data.len() < end {
            return Err(BmapError::ShortRead {
                expected: usize::from(header.len),
                actual: data.len() - HEADER_LEN,
            });
        }
        let frame = Frame {
            block: header.block,
            function: header.function,
            operator: header.operator,
            payload: data[HEADER_LEN..end].to_vec(),
        };
        Ok((frame, end))
    }
}

/// Encode a frame directly from its parts.
pub fn encode_frame(
    block: FunctionBlock,
    function: u8,
    operator: Operator,
    payload: &[u8],
) -> Result<Vec<u8>> {
    Frame::new(block, function, operator, payload)?.encode()
}

/// An ordered, reliable, connected byte stream.
///
/// The codec reads exactly the byte counts frame fields declare and never
/// retries a failed read; timeouts and reconnection belong to the
/// implementation.
pub trait Transport {
    /// Write all of `data`.
    fn send(&mut self, data: &[u8]) -> Result<()>;

    /// Fill `buf` completely or fail.
    fn recv_exact(&mut self, buf: &mut [u8]) -> Result<()>;
}

impl<T: Read + Write> Transport for T {
    fn send(&mut self, data: &[u8]) -> Result<()> {
        self.write_all(data)?;
        self.flush()?;
        Ok(())
    }

    fn recv_exact(&mut self, buf: &mut [u8]) -> Result<()> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.read(&mut buf[filled..]) {
                Ok(0) => {
                    return Err(BmapError::ShortRead {
                        expected: buf.len(),
                        actual: filled,
                    })
                }
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }
}
