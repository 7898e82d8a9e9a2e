//! OSC 1.0 message codec.
//!
//! Only messages are supported. Bundles are recognised and rejected with
//! [`CodecError::Bundle`] so callers can skip them.

use std::fmt;

use bytes::{Buf, BufMut, Bytes, BytesMut};

const BUNDLE_TAG: &[u8] = b"#bundle";

/// A single positional OSC argument.
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    /// 32-bit signed integer (`i`).
    Int(i32),
    /// 32-bit float (`f`).
    Float(f32),
    /// NUL-terminated string (`s`).
    String(String),
    /// Length-prefixed blob (`b`).
    Blob(Vec<u8>),
    /// 64-bit signed integer (`h`).
    Long(i64),
    /// 64-bit float (`d`).
    Double(f64),
    /// Boolean true (`T`), no payload.
    True,
    /// Boolean false (`F`), no payload.
    False,
    /// Nil (`N`), no payload.
    Nil,
}

impl Arg {
    /// OSC type tag for this argument.
    #[must_use]
    pub const fn tag(&self) -> char {
        match self {
            Self::Int(_) => 'i',
            Self::Float(_) => 'f',
            Self::String(_) => 's',
            Self::Blob(_) => 'b',
            Self::Long(_) => 'h',
            Self::Double(_) => 'd',
            Self::True => 'T',
            Self::False => 'F',
            Self::Nil => 'N',
        }
    }
}

impl From<i32> for Arg {
    fn from(v: i32) -> Self {
        Self::Int(v)
    }
}

impl From<f32> for Arg {
    fn from(v: f32) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for Arg {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<String> for Arg {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<bool> for Arg {
    fn from(v: bool) -> Self {
        if v { Self::True } else { Self::False }
    }
}

/// Error reading a positional argument.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ArgError {
    #[error("argument {index} missing, message has {len}")]
    Missing { index: usize, len: usize },
    #[error("argument {index}: expected type tag '{expected}', got '{got}'")]
    WrongType {
        index: usize,
        expected: char,
        got: char,
    },
}

/// Error decoding a packet.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    #[error("packet truncated")]
    Truncated,
    #[error("string is not NUL terminated")]
    Unterminated,
    #[error("string is not valid UTF-8")]
    Utf8,
    #[error("address must start with '/', got {0:?}")]
    BadAddress(String),
    #[error("type tag string must start with ','")]
    BadTypeTags,
    #[error("unsupported type tag '{0}'")]
    UnknownTag(char),
    #[error("bundles are not supported")]
    Bundle,
}

/// An OSC message: an address and positional arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub address: String,
    pub args: Vec<Arg>,
}

impl Message {
    /// Create a message with no arguments.
    #[must_use]
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            args: Vec::new(),
        }
    }

    /// Create a message with the given arguments.
    #[must_use]
    pub fn with_args(address: impl Into<String>, args: Vec<Arg>) -> Self {
        Self {
            address: address.into(),
            args,
        }
    }

    /// Append an argument.
    #[must_use]
    pub fn arg(mut self, arg: impl Into<Arg>) -> Self {
        self.args.push(arg.into());
        self
    }

    fn get(&self, index: usize) -> Result<&Arg, ArgError> {
        self.args.get(index).ok_or(ArgError::Missing {
            index,
            len: self.args.len(),
        })
    }

    /// Read a string argument.
    ///
    /// # Errors
    /// Returns error if the argument is missing or not a string.
    pub fn string(&self, index: usize) -> Result<&str, ArgError> {
        match self.get(index)? {
            Arg::String(s) => Ok(s),
            other => Err(ArgError::WrongType {
                index,
                expected: 's',
                got: other.tag(),
            }),
        }
    }

    /// Read an int32 argument.
    ///
    /// # Errors
    /// Returns error if the argument is missing or not an int32.
    pub fn int(&self, index: usize) -> Result<i32, ArgError> {
        match self.get(index)? {
            Arg::Int(v) => Ok(*v),
            other => Err(ArgError::WrongType {
                index,
                expected: 'i',
                got: other.tag(),
            }),
        }
    }

    /// Read a float32 argument.
    ///
    /// # Errors
    /// Returns error if the argument is missing or not a float32.
    pub fn float(&self, index: usize) -> Result<f32, ArgError> {
        match self.get(index)? {
            Arg::Float(v) => Ok(*v),
            other => Err(ArgError::WrongType {
                index,
                expected: 'f',
                got: other.tag(),
            }),
        }
    }

    /// Type tag string without the leading comma.
    #[must_use]
    pub fn type_tags(&self) -> String {
        self.args.iter().map(Arg::tag).collect()
    }

    /// Encode into an OSC packet.
    #[must_use]
    pub fn encode(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(64);
        put_padded_str(&mut buf, &self.address);
        put_padded_str(&mut buf, &format!(",{}", self.type_tags()));

        for arg in &self.args {
            match arg {
                Arg::Int(v) => buf.put_i32(*v),
                Arg::Float(v) => buf.put_f32(*v),
                Arg::String(s) => put_padded_str(&mut buf, s),
                Arg::Blob(data) => {
                    // Blob sizes beyond i32 cannot be expressed on the wire.
                    buf.put_i32(i32::try_from(data.len()).unwrap_or(i32::MAX));
                    buf.put_slice(data);
                    buf.put_bytes(0, (4 - data.len() % 4) % 4);
                }
                Arg::Long(v) => buf.put_i64(*v),
                Arg::Double(v) => buf.put_f64(*v),
                Arg::True | Arg::False | Arg::Nil => {}
            }
        }
        buf.freeze()
    }

    /// Decode an OSC packet.
    ///
    /// # Errors
    /// Returns error if the packet is malformed or is a bundle.
    pub fn decode(packet: &[u8]) -> Result<Self, CodecError> {
        if packet.starts_with(BUNDLE_TAG) {
            return Err(CodecError::Bundle);
        }
        let mut buf = packet;
        let address = get_padded_str(&mut buf)?;
        if !address.starts_with('/') {
            return Err(CodecError::BadAddress(address));
        }

        // Type tags are optional in very old senders; treat as no arguments.
        if !buf.has_remaining() {
            return Ok(Self::new(address));
        }
        let tags = get_padded_str(&mut buf)?;
        let Some(tags) = tags.strip_prefix(',') else {
            return Err(CodecError::BadTypeTags);
        };

        let mut args = Vec::with_capacity(tags.len());
        for tag in tags.chars() {
            let arg = match tag {
                'i' => Arg::Int(need(&buf, 4).map(|()| buf.get_i32())?),
                'f' => Arg::Float(need(&buf, 4).map(|()| buf.get_f32())?),
                'h' => Arg::Long(need(&buf, 8).map(|()| buf.get_i64())?),
                'd' => Arg::Double(need(&buf, 8).map(|()| buf.get_f64())?),
                's' => Arg::String(get_padded_str(&mut buf)?),
                'b' => Arg::Blob(get_blob(&mut buf)?),
                'T' => Arg::True,
                'F' => Arg::False,
                'N' => Arg::Nil,
                other => return Err(CodecError::UnknownTag(other)),
            };
            args.push(arg);
        }
        Ok(Self { address, args })
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.address)?;
        for arg in &self.args {
            match arg {
                Arg::Int(v) => write!(f, " {v}")?,
                Arg::Float(v) => write!(f, " {v}")?,
                Arg::String(s) => write!(f, " {s:?}")?,
                Arg::Blob(data) => write!(f, " <blob {} bytes>", data.len())?,
                Arg::Long(v) => write!(f, " {v}")?,
                Arg::Double(v) => write!(f, " {v}")?,
                Arg::True => write!(f, " true")?,
                Arg::False => write!(f, " false")?,
                Arg::Nil => write!(f, " nil")?,
            }
        }
        Ok(())
    }
}

/// Interior NULs are dropped: OSC strings end at the first NUL, so sending
/// one would truncate the string and misalign every later argument.
fn put_padded_str(buf: &mut BytesMut, s: &str) {
    let mut len = 0;
    for chunk in s.as_bytes().split(|b| *b == 0) {
        buf.put_slice(chunk);
        len += chunk.len();
    }
    // At least one NUL, then pad to a 4-byte boundary.
    buf.put_bytes(0, 4 - len % 4);
}

const fn need(buf: &&[u8], n: usize) -> Result<(), CodecError> {
    if buf.len() < n {
        Err(CodecError::Truncated)
    } else {
        Ok(())
    }
}

fn get_padded_str(buf: &mut &[u8]) -> Result<String, CodecError> {
    let nul = buf
        .iter()
        .position(|b| *b == 0)
        .ok_or(CodecError::Unterminated)?;
    let padded = (nul / 4 + 1) * 4;
    need(buf, padded)?;
    let s = std::str::from_utf8(&buf[..nul])
        .map_err(|_| CodecError::Utf8)?
        .to_string();
    buf.advance(padded);
    Ok(s)
}

fn get_blob(buf: &mut &[u8]) -> Result<Vec<u8>, CodecError> {
    need(buf, 4)?;
    let len = usize::try_from(buf.get_i32()).map_err(|_| CodecError::Truncated)?;
    let padded = len + (4 - len % 4) % 4;
    need(buf, padded)?;
    let data = buf[..len].to_vec();
    buf.advance(padded);
    Ok(data)
}
