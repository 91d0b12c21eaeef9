//! BMAP device discovery
//!
//! Turns BLE advertisements into [`ScannedDevice`] records. The
//! manufacturer-specific data field comes in three layouts, told apart by
//! its first byte:
//!
//! - **Legacy** (`0x00`, `0x10`): full version, catalog product id, full peer addresses
//! - **v1.0.4** (`0x01`): fixed version, vendor product code, partial peer addresses
//! - **v1.2.0** (`0x9E`): recognized, not decoded
//!
//! Anything else, or an advertisement without a usable name, is dropped.
//!
//! # Example
//!
//! ```rust
//! use bmap_advert::{AdvertParser, AdvertisementEvent, BmapAdvertParser};
//! use bmap_protocol::MacAddress;
//!
//! let event = AdvertisementEvent::new(MacAddress::new([0x60, 0xab, 0xd2, 0xb0, 0xbd, 0x47]))
//!     .with_local_name("LE-Bose QC35 II")
//!     .with_manufacturer_data(0x1000, vec![0x40, 0x20, 0x01, 0x80]);
//!
//! let device = BmapAdvertParser::new().parse(&event).unwrap();
//! assert_eq!(device.name, "Bose QC35 II");
//! assert!(device.is_in_pairing_mode());
//! ```

mod error;
mod event;
pub mod layouts;
mod name;
mod parser;
mod record;

pub use error::*;
pub use event::*;
pub use layouts::{decode_field, select_layout};
pub use name::*;
pub use parser::*;
pub use record::*;
