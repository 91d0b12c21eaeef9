//! Discovered-device record.

use std::fmt;

use bmap_protocol::{MacAddress, ProductType};
use serde::{Serialize, Serializer};

/// Protocol version advertised by a device, independent of the version a
/// connected session reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BmapVersion {
    /// Major.
    pub major: u8,
    /// Minor.
    pub minor: u8,
    /// Patch.
    pub patch: u8,
}

impl BmapVersion {
    /// Create a version.
    pub const fn new(major: u8, minor: u8, patch: u8) -> Self {
        BmapVersion { major, minor, patch }
    }
}

impl fmt::Display for BmapVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl Serialize for BmapVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Product identifier as carried by the advertisement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ProductId {
    /// Catalog product id, same space as the command channel's PRODUCT_ID_VARIANT.
    Catalog(u16),
    /// One-byte vendor code with no known mapping to a catalog id.
    RawVendor(u8),
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProductId::Catalog(id) => write!(f, "0x{:04X}", id),
            ProductId::RawVendor(code) => write!(f, "raw:0x{:02X}", code),
        }
    }
}

/// One of the device's two source-connection slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct PeerConnection {
    /// Slot in use.
    pub connected: bool,
    /// Address of the connected source, when advertised. Partial addresses
    /// are zero-filled in the high bytes.
    pub address: Option<MacAddress>,
}

impl PeerConnection {
    /// A connected slot.
    pub fn connected(address: MacAddress) -> Self {
        PeerConnection {
            connected: true,
            address: Some(address),
        }
    }
}

/// Advertisement format version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AdvertLayout {
    /// Layout used before protocol 1.0.4.
    Legacy,
    /// Protocol 1.0.4 layout.
    V1_0_4,
    /// Protocol 1.2.0 layout.
    V1_2_0,
}

impl AdvertLayout {
    /// Short name for logging and metric labels.
    pub const fn name(self) -> &'static str {
        match self {
            AdvertLayout::Legacy => "legacy",
            AdvertLayout::V1_0_4 => "v1.0.4",
            AdvertLayout::V1_2_0 => "v1.2.0",
        }
    }
}

impl fmt::Display for AdvertLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Fields decoded from the manufacturer-specific data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayoutFields {
    /// Advertised protocol version.
    pub bmap_version: BmapVersion,
    /// The device is accepting new pairings.
    pub pairing_mode: bool,
    /// Source-connection slots.
    pub peers: [PeerConnection; 2],
    /// Product identifier.
    pub product_id: ProductId,
    /// Product variant.
    pub variant: u8,
    /// Headphones or speaker.
    pub product_type: ProductType,
    /// The device can share audio with another device.
    pub music_share_supported: bool,
    /// Audio sharing is active.
    pub music_share_active: bool,
}

/// A device discovered from one advertisement. Never modified after
/// construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScannedDevice {
    /// Display name; ends in `…` when the advertisement only carried a
    /// shortened name.
    pub name: String,
    /// Advertiser address.
    pub address: MacAddress,
    /// Layout the advertisement was decoded with.
    pub layout: AdvertLayout,
    /// Decoded fields.
    #[serde(flatten)]
    pub fields: LayoutFields,
}

impl ScannedDevice {
    /// Advertised protocol version as `major.minor.patch`.
    pub fn bmap_version(&self) -> String {
        self.fields.bmap_version.to_string()
    }

    /// The device is accepting new pairings.
    pub fn is_in_pairing_mode(&self) -> bool {
        self.fields.pairing_mode
    }

    /// Source-connection slots.
    pub fn peers(&self) -> &[PeerConnection; 2] {
        &self.fields.peers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_display() {
        assert_eq!(BmapVersion::new(1, 0, 4).to_string(), "1.0.4");
        assert_eq!(BmapVersion::new(2, 171, 15).to_string(), "2.171.15");
    }

    #[test]
    fn test_product_id_display() {
        assert_eq!(ProductId::Catalog(0x4024).to_string(), "0x4024");
        assert_eq!(ProductId::RawVendor(0x1b).to_string(), "raw:0x1B");
    }

    #[test]
    fn test_peer_connection_default() {
        let peer = PeerConnection::default();
        assert!(!peer.connected);
        assert!(peer.address.is_none());
    }
}
