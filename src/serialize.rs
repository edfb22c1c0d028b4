//! Minimal binary reader/writer used by the shard and share base64 codecs
//! (self-describing record, version byte first, unknown versions
//! fail fast).

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SerializeError {
    UnexpectedEof,
    UnknownVersion(u8),
    InvalidBase64,
    TrailingBytes,
}

impl std::fmt::Display for SerializeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SerializeError::UnexpectedEof => write!(f, "record ended before expected field"),
            SerializeError::UnknownVersion(v) => write!(f, "unknown format version {v}"),
            SerializeError::InvalidBase64 => write!(f, "invalid base64 encoding"),
            SerializeError::TrailingBytes => write!(f, "record has unexpected trailing bytes"),
        }
    }
}

impl std::error::Error for SerializeError {}

#[derive(Default)]
pub struct ByteWriter(Vec<u8>);

impl ByteWriter {
    pub fn new() -> Self {
        ByteWriter(Vec::new())
    }

    pub fn u8(&mut self, v: u8) -> &mut Self {
        self.0.push(v);
        self
    }

    pub fn u16(&mut self, v: u16) -> &mut Self {
        self.0.extend_from_slice(&v.to_le_bytes());
        self
    }

    pub fn u32(&mut self, v: u32) -> &mut Self {
        self.0.extend_from_slice(&v.to_le_bytes());
        self
    }

    pub fn u64(&mut self, v: u64) -> &mut Self {
        self.0.extend_from_slice(&v.to_le_bytes());
        self
    }

    pub fn bytes(&mut self, v: &[u8]) -> &mut Self {
        self.0.extend_from_slice(v);
        self
    }

    pub fn to_base64(&self) -> String {
        use base64::Engine;
        base64::engine::general_purpose::STANDARD.encode(&self.0)
    }
}

pub struct ByteReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    pub fn from_base64(encoded: &'a str, owned: &'a mut Vec<u8>) -> Result<ByteReader<'a>, SerializeError> {
        use base64::Engine;
        *owned = base64::engine::general_purpose::STANDARD
            .decode(encoded)
            .map_err(|_| SerializeError::InvalidBase64)?;
        Ok(ByteReader { buf: owned, pos: 0 })
    }

    pub fn u8(&mut self) -> Result<u8, SerializeError> {
        let v = *self.buf.get(self.pos).ok_or(SerializeError::UnexpectedEof)?;
        self.pos += 1;
        Ok(v)
    }

    pub fn u16(&mut self) -> Result<u16, SerializeError> {
        let bytes = self.take(2)?;
        Ok(u16::from_le_bytes(bytes.try_into().unwrap()))
    }

    pub fn u32(&mut self) -> Result<u32, SerializeError> {
        let bytes = self.take(4)?;
        Ok(u32::from_le_bytes(bytes.try_into().unwrap()))
    }

    pub fn u64(&mut self) -> Result<u64, SerializeError> {
        let bytes = self.take(8)?;
        Ok(u64::from_le_bytes(bytes.try_into().unwrap()))
    }

    pub fn bytes(&mut self, n: usize) -> Result<Vec<u8>, SerializeError> {
        Ok(self.take(n)?.to_vec())
    }

    pub fn remaining(&self) -> &[u8] {
        &self.buf[self.pos..]
    }

    pub fn finish(self) -> Result<(), SerializeError> {
        if self.pos == self.buf.len() {
            Ok(())
        } else {
            Err(SerializeError::TrailingBytes)
        }
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], SerializeError> {
        let end = self.pos.checked_add(n).ok_or(SerializeError::UnexpectedEof)?;
        let slice = self.buf.get(self.pos..end).ok_or(SerializeError::UnexpectedEof)?;
        self.pos = end;
        Ok(slice)
    }
}
