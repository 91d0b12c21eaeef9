//! BMAP command channel
//!
//! This crate implements the framed command/response protocol spoken by
//! BMAP headphones and speakers over a connected byte stream (usually an
//! RFCOMM socket).
//!
//! # Protocol Overview
//!
//! Every message is a frame of a four-byte header and up to 255 payload
//! bytes. The header names a function block (subsystem), a function within
//! it, and an operator:
//!
//! - **Requests** (host → device) use `SET`, `GET`, `SET_GET` or `START`
//! - **Responses** (device → host) use `STATUS`, `ERROR`, `START`, `FINAL` or `PROCESS`
//!
//! A response may span several frames: `PROCESS` frames are skipped, and a
//! `START` ... `FINAL` bracket carries a list whose elements are themselves
//! responses.
//!
//! # Example
//!
//! ```rust,ignore
//! use bmap_protocol::{BmapClient, FunctionBlock, Operator, settings};
//!
//! let stream = connect_rfcomm("60:ab:d2:b0:bd:47", 8)?;
//! let mut client = BmapClient::new(stream);
//!
//! let version = client.bmap_version()?;
//! let anr = client.request(FunctionBlock::Settings, settings::ANR, Operator::Get, &[])?;
//! let all = client.request_all(FunctionBlock::Settings, settings::ALL_SETTINGS)?;
//! ```

pub mod bitmask;
mod client;
mod commands;
mod config;
mod constants;
mod decoder;
mod error;
mod frame;
mod registry;
mod responses;
mod types;

pub use bitmask::{decode_bitmask, BitFlag, Bitmask};
pub use client::*;
pub use commands::*;
pub use config::*;
pub use constants::*;
pub use decoder::*;
pub use error::*;
pub use frame::*;
pub use registry::*;
pub use responses::*;
pub use types::*;
