//! Layout used before protocol 1.0.4.
//!
//! ```text
//! byte 0     major (high nibble), minor high nibble (low nibble)
//! byte 1     minor low nibble (high nibble), patch (low nibble)
//! byte 2..4  product id, big-endian
//! byte 4     variant
//! byte 5     bit 7 pairing mode, bit 5 headphones, bit 4 music share
//!            supported, bits 2/3 music share active, bits 0/1 peer connected
//! byte 6..   one 6-byte address per connected peer
//! ```

use bmap_protocol::{MacAddress, ProductType, MAC_ADDRESS_LEN};

use super::{bit, check_length, check_min_length, peer_addresses};
use crate::error::Result;
use crate::record::{AdvertLayout, BmapVersion, LayoutFields, PeerConnection, ProductId};

const LAYOUT: AdvertLayout = AdvertLayout::Legacy;
const HEADER_LEN: usize = 6;
const FLAGS: usize = 5;

/// Decode a Legacy layout buffer.
pub fn decode_legacy(data: &[u8]) -> Result<LayoutFields> {
    check_min_length(LAYOUT, data, HEADER_LEN)?;

    let flags = data[FLAGS];
    let connected = [bit(flags, 0), bit(flags, 1)];
    check_length(LAYOUT, data, HEADER_LEN, MAC_ADDRESS_LEN, connected)?;

    let addresses = peer_addresses::<MAC_ADDRESS_LEN>(LAYOUT, data, HEADER_LEN, connected)?;
    let peers = addresses.map(|address| match address {
        Some(bytes) => PeerConnection::connected(MacAddress::new(bytes)),
        None => PeerConnection::default(),
    });

    Ok(LayoutFields {
        bmap_version: BmapVersion::new(
            data[0] >> 4,
            // Minor is the packed byte (low nibble of byte 0, high nibble of
            // byte 1). Deviation: the literal grouping `lo << (4 + hi)`, which
            // shifts by the high nibble, is deliberately not reproduced.
            ((data[0] & 0x0F) << 4) | (data[1] >> 4),
            data[1] & 0x0F,
        ),
        pairing_mode: bit(flags, 7),
        peers,
        product_id: ProductId::Catalog(u16::from_be_bytes([data[2], data[3]])),
        variant: data[4],
        product_type: ProductType::from_headphones_bit(bit(flags, 5)),
        music_share_supported: bit(flags, 4),
        music_share_active: bit(flags, 2) || bit(flags, 3),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AdvertError;

    #[test]
    fn test_no_peers() {
        let fields = decode_legacy(&[0x10, 0x24, 0x40, 0x24, 0x01, 0b1011_0000]).unwrap();
        assert_eq!(fields.bmap_version.to_string(), "1.2.4");
        assert!(fields.pairing_mode);
        assert_eq!(fields.peers, [PeerConnection::default(); 2]);
        assert_eq!(fields.product_id, ProductId::Catalog(0x4024));
        assert_eq!(fields.variant, 1);
        assert_eq!(fields.product_type, ProductType::Headphones);
        assert!(fields.music_share_supported);
        assert!(!fields.music_share_active);
    }

    #[test]
    fn test_version_minor_spans_bytes() {
        let fields = decode_legacy(&[0x2A, 0xB3, 0, 0, 0, 0]).unwrap();
        assert_eq!(fields.bmap_version, BmapVersion::new(2, 0xAB, 3));
    }

    #[test]
    fn test_both_peers() {
        let mut data = vec![0x10, 0x00, 0x40, 0x24, 0x01, 0b0000_1011];
        data.extend_from_slice(&[1, 2, 3, 4, 5, 6]);
        data.extend_from_slice(&[7, 8, 9, 10, 11, 12]);
        assert_eq!(data.len(), 18);

        let fields = decode_legacy(&data).unwrap();
        assert_eq!(fields.peers[0], PeerConnection::connected(MacAddress::new([1, 2, 3, 4, 5, 6])));
        assert_eq!(fields.peers[1], PeerConnection::connected(MacAddress::new([7, 8, 9, 10, 11, 12])));
        assert_eq!(fields.product_type, ProductType::Speaker);
        assert!(fields.music_share_active);
        assert!(!fields.pairing_mode);
    }

    #[test]
    fn test_second_peer_only() {
        let mut data = vec![0x10, 0x00, 0x40, 0x24, 0x01, 0b0000_0010];
        data.extend_from_slice(&[7, 8, 9, 10, 11, 12]);
        let fields = decode_legacy(&data).unwrap();
        assert!(!fields.peers[0].connected);
        assert_eq!(fields.peers[1].address, Some(MacAddress::new([7, 8, 9, 10, 11, 12])));
    }

    #[test]
    fn test_length_must_match_peers() {
        // Both peers flagged but only one address: 12 bytes instead of 18.
        let mut data = vec![0x10, 0x00, 0x40, 0x24, 0x01, 0b0000_0011];
        data.extend_from_slice(&[1, 2, 3, 4, 5, 6]);
        assert_eq!(
            decode_legacy(&data),
            Err(AdvertError::LengthMismatch {
                layout: "legacy",
                expected: 18,
                actual: 12,
            })
        );

        // No peers flagged but trailing bytes present.
        assert!(decode_legacy(&[0x10, 0x00, 0x40, 0x24, 0x01, 0x00, 0xFF]).is_err());
    }

    #[test]
    fn test_too_short() {
        assert!(matches!(
            decode_legacy(&[0x10, 0x00, 0x40]),
            Err(AdvertError::TooShort { expected: 6, actual: 3, .. })
        ));
    }
}
