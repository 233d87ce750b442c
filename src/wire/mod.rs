//! Wire Codec (spec.md §4.1): stateless encode/decode of Wayland messages.

pub mod fixed;
pub mod message;

pub use fixed::Fixed;
pub use message::{decode, encode, Arg, ArgKind, DecodeOutcome, Message, WireError};
