//! The container ties one encoded block into a self-describing artifact.
//!
//! Layout, all multi-byte fields big-endian:
//!
//! | Offset | Size | Field |
//! |---|---|---|
//! | 0 | 4 | magic `BWZ1` |
//! | 4 | 4 | original size |
//! | 8 | 1 | flags |
//! | 9 | 4 | CRC-32 of the payload |
//! | 13 | .. | payload |
use log::{debug, error};

use crate::error::CodecError;
use crate::tools::crc::do_crc;

/// Magic bytes at the start of every container.
pub const MAGIC: [u8; 4] = *b"BWZ1";

/// Fixed header size: magic[4] + original_size:u32 + flags:u8 + checksum:u32.
pub const HEADER_SIZE: usize = 13;

// Flag bits

/// Payload is a primary index followed by the entropy coded transform output.
pub const FLAG_TRANSFORM: u8 = 1 << 0;
/// Payload is the entropy coded single byte that fills the whole block.
pub const FLAG_DEGENERATE: u8 = 1 << 1;
/// Payload is the original block, untouched.
pub const FLAG_RAW: u8 = 1 << 2;

const KNOWN_FLAGS: u8 = FLAG_TRANSFORM | FLAG_DEGENERATE | FLAG_RAW;

/// How a payload must be reversed. Raw outranks every other flag, and degenerate outranks
/// the transform flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Raw,
    Degenerate,
    Transform,
    Direct,
}

impl Encoding {
    pub fn from_flags(flags: u8) -> Self {
        if flags & FLAG_RAW != 0 {
            Encoding::Raw
        } else if flags & FLAG_DEGENERATE != 0 {
            Encoding::Degenerate
        } else if flags & FLAG_TRANSFORM != 0 {
            Encoding::Transform
        } else {
            Encoding::Direct
        }
    }

    pub fn flags(self) -> u8 {
        match self {
            Encoding::Raw => FLAG_RAW,
            Encoding::Degenerate => FLAG_DEGENERATE,
            Encoding::Transform => FLAG_TRANSFORM,
            Encoding::Direct => 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub original_size: u32,
    pub flags: u8,
    pub checksum: u32,
}

impl Header {
    /// Serialize to exactly `HEADER_SIZE` bytes.
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut buf = [0_u8; HEADER_SIZE];
        buf[0..4].copy_from_slice(&MAGIC);
        buf[4..8].copy_from_slice(&self.original_size.to_be_bytes());
        buf[8] = self.flags;
        buf[9..13].copy_from_slice(&self.checksum.to_be_bytes());
        buf
    }

    /// Deserialize from the front of buf, checking length, magic and flags.
    pub fn from_bytes(buf: &[u8]) -> Result<Self, CodecError> {
        if buf.len() < HEADER_SIZE {
            return Err(CodecError::InvalidFormat(format!(
                "truncated header: {} of {} bytes",
                buf.len(),
                HEADER_SIZE
            )));
        }
        if buf[0..4] != MAGIC {
            return Err(CodecError::InvalidFormat("bad magic bytes".into()));
        }
        let flags = buf[8];
        if flags & !KNOWN_FLAGS != 0 {
            return Err(CodecError::InvalidFormat(format!(
                "unknown flag bits {:#04x}",
                flags & !KNOWN_FLAGS
            )));
        }
        Ok(Self {
            original_size: u32::from_be_bytes([buf[4], buf[5], buf[6], buf[7]]),
            flags,
            checksum: u32::from_be_bytes([buf[9], buf[10], buf[11], buf[12]]),
        })
    }

    pub fn encoding(&self) -> Encoding {
        Encoding::from_flags(self.flags)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container {
    pub header: Header,
    pub payload: Vec<u8>,
}

impl Container {
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(HEADER_SIZE + self.payload.len());
        out.extend_from_slice(&self.header.to_bytes());
        out.extend_from_slice(&self.payload);
        out
    }

    /// Total serialized size.
    pub fn serialized_len(&self) -> usize {
        HEADER_SIZE + self.payload.len()
    }
}

/// Wrap a payload, computing its checksum.
pub fn frame(payload: Vec<u8>, original_size: u32, flags: u8) -> Container {
    let checksum = do_crc(0, &payload);
    debug!(
        "Framed {} payload bytes, original size {}, flags {:#04x}, crc {:#010x}.",
        payload.len(),
        original_size,
        flags,
        checksum
    );
    Container {
        header: Header {
            original_size,
            flags,
            checksum,
        },
        payload,
    }
}

/// Parse and verify a container. The payload checksum must match before anything is returned.
pub fn unframe(bytes: &[u8]) -> Result<Container, CodecError> {
    let header = Header::from_bytes(bytes)?;
    let payload = &bytes[HEADER_SIZE..];
    let computed = do_crc(0, payload);
    if computed != header.checksum {
        error!(
            "Payload CRC failed! Found {:#010x} looking for {:#010x}.",
            computed, header.checksum
        );
        return Err(CodecError::Integrity {
            stored: header.checksum,
            computed,
        });
    }
    Ok(Container {
        header,
        payload: payload.to_vec(),
    })
}
