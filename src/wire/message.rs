//! The Wayland wire message: an 8-byte header followed by a schema-driven
//! argument payload (spec.md §4.1).
//!
//! The codec is stateless: callers supply the argument schema for a given
//! (object, opcode) pair (looked up from `crate::protocol`) because the
//! wire format itself carries no type tags.

use std::collections::VecDeque;
use std::os::unix::io::RawFd;

use super::fixed::Fixed;

const HEADER_LEN: usize = 8;

/// The kind of a single argument slot, drawn from spec.md §4.1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgKind {
    Int,
    Uint,
    Fixed,
    String,
    Array,
    Object,
    NewId,
    Fd,
}

/// A decoded (or to-be-encoded) argument value.
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    Int(i32),
    Uint(u32),
    Fixed(Fixed),
    /// `None` is the wire encoding of an absent (zero-length) string.
    String(Option<String>),
    Array(Vec<u8>),
    Object(u32),
    NewId(u32),
    Fd(RawFd),
}

impl Arg {
    pub fn kind(&self) -> ArgKind {
        match self {
            Arg::Int(_) => ArgKind::Int,
            Arg::Uint(_) => ArgKind::Uint,
            Arg::Fixed(_) => ArgKind::Fixed,
            Arg::String(_) => ArgKind::String,
            Arg::Array(_) => ArgKind::Array,
            Arg::Object(_) => ArgKind::Object,
            Arg::NewId(_) => ArgKind::NewId,
            Arg::Fd(_) => ArgKind::Fd,
        }
    }

    pub fn as_uint(&self) -> Option<u32> {
        match self {
            Arg::Uint(v) => Some(*v),
            Arg::Object(v) => Some(*v),
            Arg::NewId(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i32> {
        match self {
            Arg::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Arg::String(Some(s)) => Some(s.as_str()),
            _ => None,
        }
    }
}

/// A fully decoded Wayland message (spec.md §3 `Message`).
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub object_id: u32,
    pub opcode: u16,
    pub args: Vec<Arg>,
}

impl Message {
    pub fn new(object_id: u32, opcode: u16, args: Vec<Arg>) -> Self {
        Self { object_id, opcode, args }
    }

    /// File descriptors carried by this message, in the order they appear
    /// among the arguments (spec.md §3 invariant on `attached_fds`).
    pub fn fds(&self) -> Vec<RawFd> {
        self.args
            .iter()
            .filter_map(|a| match a {
                Arg::Fd(fd) => Some(*fd),
                _ => None,
            })
            .collect()
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq, Clone)]
pub enum WireError {
    #[error("frame length {0} is not a multiple of 4")]
    Unaligned(usize),
    #[error("frame length {0} is shorter than the 8-byte header")]
    TooShort(usize),
    #[error("argument payload overran the frame while decoding opcode {opcode} on object {object_id}")]
    ArgumentOverrun { object_id: u32, opcode: u16 },
    #[error("string argument was not valid UTF-8")]
    InvalidUtf8,
    #[error("required file descriptor was not available in the ancillary queue")]
    MissingFd,
}

fn pad4(len: usize) -> usize {
    (len + 3) & !3
}

/// Encodes a message. Returns the wire bytes (header included) and the
/// ordered list of file descriptors that must accompany them.
pub fn encode(message: &Message) -> (Vec<u8>, Vec<RawFd>) {
    let mut body = Vec::new();
    let mut fds = Vec::new();

    for arg in &message.args {
        match arg {
            Arg::Int(v) => body.extend_from_slice(&v.to_ne_bytes()),
            Arg::Uint(v) => body.extend_from_slice(&v.to_ne_bytes()),
            Arg::Object(v) => body.extend_from_slice(&v.to_ne_bytes()),
            Arg::NewId(v) => body.extend_from_slice(&v.to_ne_bytes()),
            Arg::Fixed(f) => body.extend_from_slice(&f.to_bits().to_ne_bytes()),
            Arg::String(s) => encode_bytes_arg(&mut body, s.as_deref().map(|s| {
                let mut b = s.as_bytes().to_vec();
                b.push(0);
                b
            })),
            Arg::Array(a) => encode_bytes_arg(&mut body, Some(a.clone())),
            Arg::Fd(fd) => fds.push(*fd),
        }
    }

    let total_len = HEADER_LEN + body.len();
    let mut out = Vec::with_capacity(total_len);
    out.extend_from_slice(&message.object_id.to_ne_bytes());
    out.extend_from_slice(&message.opcode.to_ne_bytes());
    out.extend_from_slice(&(total_len as u16).to_ne_bytes());
    out.extend_from_slice(&body);

    (out, fds)
}

fn encode_bytes_arg(body: &mut Vec<u8>, payload: Option<Vec<u8>>) {
    match payload {
        None => body.extend_from_slice(&0u32.to_ne_bytes()),
        Some(bytes) => {
            body.extend_from_slice(&(bytes.len() as u32).to_ne_bytes());
            body.extend_from_slice(&bytes);
            let padded = pad4(bytes.len());
            body.resize(body.len() + (padded - bytes.len()), 0);
        }
    }
}

/// Outcome of a decode attempt against a byte buffer that may hold a
/// partial frame.
pub enum DecodeOutcome {
    Message { message: Message, consumed: usize },
    NeedMore,
}

/// Decodes a single message from the front of `buf` according to
/// `arg_kinds`, consuming file descriptors from `fd_queue` for each `Fd`
/// slot in order.
pub fn decode(
    buf: &[u8],
    arg_kinds: &[ArgKind],
    fd_queue: &mut VecDeque<RawFd>,
) -> Result<DecodeOutcome, WireError> {
    if buf.len() < HEADER_LEN {
        return Ok(DecodeOutcome::NeedMore);
    }

    let object_id = u32::from_ne_bytes(buf[0..4].try_into().unwrap());
    let opcode = u16::from_ne_bytes(buf[4..6].try_into().unwrap());
    let length = u16::from_ne_bytes(buf[6..8].try_into().unwrap()) as usize;

    if length % 4 != 0 {
        return Err(WireError::Unaligned(length));
    }
    if length < HEADER_LEN {
        return Err(WireError::TooShort(length));
    }
    if buf.len() < length {
        return Ok(DecodeOutcome::NeedMore);
    }

    let mut cursor = HEADER_LEN;
    let mut args = Vec::with_capacity(arg_kinds.len());

    for kind in arg_kinds {
        match kind {
            ArgKind::Int => {
                let v = read_u32(buf, length, object_id, opcode, &mut cursor)? as i32;
                args.push(Arg::Int(v));
            }
            ArgKind::Uint => {
                let v = read_u32(buf, length, object_id, opcode, &mut cursor)?;
                args.push(Arg::Uint(v));
            }
            ArgKind::Object => {
                let v = read_u32(buf, length, object_id, opcode, &mut cursor)?;
                args.push(Arg::Object(v));
            }
            ArgKind::NewId => {
                let v = read_u32(buf, length, object_id, opcode, &mut cursor)?;
                args.push(Arg::NewId(v));
            }
            ArgKind::Fixed => {
                let v = read_u32(buf, length, object_id, opcode, &mut cursor)? as i32;
                args.push(Arg::Fixed(Fixed::from_bits(v)));
            }
            ArgKind::String => {
                let bytes = read_bytes_arg(buf, length, object_id, opcode, &mut cursor)?;
                match bytes {
                    None => args.push(Arg::String(None)),
                    Some(b) => {
                        let without_nul = if b.last() == Some(&0) { &b[..b.len() - 1] } else { &b[..] };
                        let s = std::str::from_utf8(without_nul)
                            .map_err(|_| WireError::InvalidUtf8)?
                            .to_string();
                        args.push(Arg::String(Some(s)));
                    }
                }
            }
            ArgKind::Array => {
                let bytes = read_bytes_arg(buf, length, object_id, opcode, &mut cursor)?
                    .unwrap_or_default();
                args.push(Arg::Array(bytes));
            }
            ArgKind::Fd => {
                let fd = fd_queue.pop_front().ok_or(WireError::MissingFd)?;
                args.push(Arg::Fd(fd));
            }
        }
    }

    Ok(DecodeOutcome::Message {
        message: Message { object_id, opcode, args },
        consumed: length,
    })
}

fn read_u32(
    buf: &[u8],
    frame_len: usize,
    object_id: u32,
    opcode: u16,
    cursor: &mut usize,
) -> Result<u32, WireError> {
    if *cursor + 4 > frame_len {
        return Err(WireError::ArgumentOverrun { object_id, opcode });
    }
    let v = u32::from_ne_bytes(buf[*cursor..*cursor + 4].try_into().unwrap());
    *cursor += 4;
    Ok(v)
}

fn read_bytes_arg(
    buf: &[u8],
    frame_len: usize,
    object_id: u32,
    opcode: u16,
    cursor: &mut usize,
) -> Result<Option<Vec<u8>>, WireError> {
    let len = read_u32(buf, frame_len, object_id, opcode, cursor)? as usize;
    if len == 0 {
        return Ok(None);
    }
    let padded = pad4(len);
    if *cursor + padded > frame_len {
        return Err(WireError::ArgumentOverrun { object_id, opcode });
    }
    let bytes = buf[*cursor..*cursor + len].to_vec();
    *cursor += padded;
    Ok(Some(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scenario_a_attach_round_trip() {
        // wl_surface.attach(object=7, int=0, int=0) on object id 5, opcode 1.
        let message = Message::new(5, 1, vec![Arg::Object(7), Arg::Int(0), Arg::Int(0)]);
        let (bytes, fds) = encode(&message);
        assert_eq!(bytes.len(), 20);
        assert!(fds.is_empty());

        let mut fd_queue = VecDeque::new();
        let kinds = [ArgKind::Object, ArgKind::Int, ArgKind::Int];
        match decode(&bytes, &kinds, &mut fd_queue).unwrap() {
            DecodeOutcome::Message { message: decoded, consumed } => {
                assert_eq!(consumed, 20);
                assert_eq!(decoded, message);
            }
            DecodeOutcome::NeedMore => panic!("expected a complete message"),
        }
    }

    #[test]
    fn round_trip_string_and_array() {
        let message = Message::new(
            3,
            9,
            vec![
                Arg::String(Some("river".to_string())),
                Arg::Array(vec![1, 2, 3, 4, 5]),
                Arg::String(None),
            ],
        );
        let (bytes, _) = encode(&message);
        assert_eq!(bytes.len() % 4, 0);

        let mut fd_queue = VecDeque::new();
        let kinds = [ArgKind::String, ArgKind::Array, ArgKind::String];
        match decode(&bytes, &kinds, &mut fd_queue).unwrap() {
            DecodeOutcome::Message { message: decoded, .. } => assert_eq!(decoded, message),
            DecodeOutcome::NeedMore => panic!("expected a complete message"),
        }
    }

    #[test]
    fn round_trip_fd_order_preserved() {
        let message = Message::new(1, 0, vec![Arg::Fd(10), Arg::Uint(1), Arg::Fd(11)]);
        let (bytes, fds) = encode(&message);
        assert_eq!(fds, vec![10, 11]);

        let mut fd_queue: VecDeque<RawFd> = fds.into_iter().collect();
        let kinds = [ArgKind::Fd, ArgKind::Uint, ArgKind::Fd];
        match decode(&bytes, &kinds, &mut fd_queue).unwrap() {
            DecodeOutcome::Message { message: decoded, .. } => {
                assert_eq!(decoded.fds(), vec![10, 11]);
            }
            DecodeOutcome::NeedMore => panic!("expected a complete message"),
        }
    }

    #[test]
    fn needs_more_on_partial_header() {
        let mut fd_queue = VecDeque::new();
        let result = decode(&[0u8; 4], &[], &mut fd_queue).unwrap();
        assert!(matches!(result, DecodeOutcome::NeedMore));
    }

    #[test]
    fn needs_more_on_partial_body() {
        let message = Message::new(1, 0, vec![Arg::Int(42)]);
        let (bytes, _) = encode(&message);
        let mut fd_queue = VecDeque::new();
        let result = decode(&bytes[..bytes.len() - 2], &[ArgKind::Int], &mut fd_queue).unwrap();
        assert!(matches!(result, DecodeOutcome::NeedMore));
    }

    #[test]
    fn rejects_unaligned_length() {
        let mut bytes = vec![1, 0, 0, 0, 0, 0, 9, 0];
        bytes.extend_from_slice(&[0u8; 4]);
        let mut fd_queue = VecDeque::new();
        let err = decode(&bytes, &[], &mut fd_queue).unwrap_err();
        assert_eq!(err, WireError::Unaligned(9));
    }

    #[test]
    fn rejects_argument_overrun() {
        // Header claims length 8 (no body) but schema expects an int.
        let bytes = [1, 0, 0, 0, 0, 0, 8, 0];
        let mut fd_queue = VecDeque::new();
        let err = decode(&bytes, &[ArgKind::Int], &mut fd_queue).unwrap_err();
        assert_eq!(err, WireError::ArgumentOverrun { object_id: 1, opcode: 0 });
    }

    #[test]
    fn missing_fd_is_malformed() {
        let message = Message::new(1, 0, vec![]);
        let mut bytes = encode(&message).0;
        // Pretend the schema expects an fd even though none was attached.
        bytes[6] = 8;
        let mut fd_queue: VecDeque<RawFd> = VecDeque::new();
        let err = decode(&bytes, &[ArgKind::Fd], &mut fd_queue).unwrap_err();
        assert_eq!(err, WireError::MissingFd);
    }
}
