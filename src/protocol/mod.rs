//! Protocol Module
//!
//! Defines the wire protocol between client and server.
//!
//! ## Protocol Format
//!
//! One request frame is answered by one response frame. There is no
//! handshake, version byte, or pipelining: a second request may only be
//! sent once the previous response has been read in full.
//!
//! ### Commands (canonical tags)
//! - 0: SET - key + value
//! - 1: GET - key
//! - 2: DEL - key
//!
//! ### Status Codes
//! - 200, 201, 202: followed by a length-prefixed body
//! - anything else: status byte only

mod codec;
mod command;
mod response;

pub use codec::{
    Codec, FrameLimits, DEFAULT_MAX_KEY_SIZE, DEFAULT_MAX_VALUE_SIZE, MAX_RESPONSE_SIZE,
    REQUEST_HEADER_SIZE,
};
pub use command::{Command, Request, TagScheme};
pub use response::{Response, ResponseFormat, Status};
