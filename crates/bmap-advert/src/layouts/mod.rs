//! Manufacturer-specific data layouts.
//!
//! Every decoder receives the combined buffer (company id bytes then data),
//! checks a minimum length, then checks the exact length implied by the
//! peer-address fields the header announces.
//!
//! | tag (byte 0)   | layout  |
//! |----------------|---------|
//! | `0x9E`         | v1.2.0  |
//! | `0x00`, `0x10` | Legacy  |
//! | `0x01`         | v1.0.4  |

mod legacy;
mod v104;
mod v120;

pub use legacy::decode_legacy;
pub use v104::decode_v104;
pub use v120::decode_v120;

use crate::error::{AdvertError, Result};
use crate::record::{AdvertLayout, LayoutFields};

/// Select the layout from the tag byte.
pub fn select_layout(tag: u8) -> Option<AdvertLayout> {
    match tag {
        0x9E => Some(AdvertLayout::V1_2_0),
        0x00 | 0x10 => Some(AdvertLayout::Legacy),
        0x01 => Some(AdvertLayout::V1_0_4),
        _ => None,
    }
}

impl AdvertLayout {
    /// Decode `data` with this layout.
    pub fn decode(self, data: &[u8]) -> Result<LayoutFields> {
        match self {
            AdvertLayout::Legacy => decode_legacy(data),
            AdvertLayout::V1_0_4 => decode_v104(data),
            AdvertLayout::V1_2_0 => decode_v120(data),
        }
    }
}

/// Select a layout from the tag byte and decode with it.
pub fn decode_field(data: &[u8]) -> Result<(AdvertLayout, LayoutFields)> {
    let tag = *data.first().ok_or(AdvertError::TooShort {
        layout: "any",
        expected: 1,
        actual: 0,
    })?;
    let layout = select_layout(tag).ok_or(AdvertError::UnknownTag(tag))?;
    Ok((layout, layout.decode(data)?))
}

#[inline]
pub(crate) fn bit(value: u8, pos: u8) -> bool {
    (value >> pos) & 1 != 0
}

/// Fixed header length plus one address per connected peer, checked against
/// the actual length.
pub(crate) fn check_length(
    layout: AdvertLayout,
    data: &[u8],
    header: usize,
    per_peer: usize,
    peers: [bool; 2],
) -> Result<()> {
    let connected = peers.iter().filter(|&&p| p).count();
    let expected = header + per_peer * connected;
    if data.len() != expected {
        return Err(AdvertError::LengthMismatch {
            layout: layout.name(),
            expected,
            actual: data.len(),
        });
    }
    Ok(())
}

/// The address bytes of each connected peer, in slot order, read from
/// `N`-byte fields after the fixed header.
pub(crate) fn peer_addresses<const N: usize>(
    layout: AdvertLayout,
    data: &[u8],
    header: usize,
    peers: [bool; 2],
) -> Result<[Option<[u8; N]>; 2]> {
    let mut fields = data.get(header..).unwrap_or_default().chunks_exact(N);
    let mut addresses = [None; 2];
    for (address, connected) in addresses.iter_mut().zip(peers) {
        if !connected {
            continue;
        }
        let Some(field) = fields.next() else {
            return Err(AdvertError::TooShort {
                layout: layout.name(),
                expected: header + N * peers.iter().filter(|&&p| p).count(),
                actual: data.len(),
            });
        };
        let mut bytes = [0u8; N];
        bytes.copy_from_slice(field);
        *address = Some(bytes);
    }
    Ok(addresses)
}

pub(crate) fn check_min_length(layout: AdvertLayout, data: &[u8], min: usize) -> Result<()> {
    if data.len() < min {
        return Err(AdvertError::TooShort {
            layout: layout.name(),
            expected: min,
            actual: data.len(),
        });
    }
    Ok(())
}
