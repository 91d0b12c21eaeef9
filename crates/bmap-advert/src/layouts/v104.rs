//! Protocol 1.0.4 layout.
//!
//! ```text
//! byte 0     tag, 0 or 1
//! byte 1     vendor product code
//! byte 2     bit 7 pairing mode, bits 4/5 peer connected, low nibble variant
//! byte 3     bit 2 headphones, bit 1 music share supported, bit 0 music share active
//! byte 4..9  reserved
//! byte 9..   low three bytes of each connected peer's address
//! ```

use bmap_protocol::{MacAddress, ProductType};

use super::{bit, check_length, check_min_length, peer_addresses};
use crate::error::{AdvertError, Result};
use crate::record::{AdvertLayout, BmapVersion, LayoutFields, PeerConnection, ProductId};

const LAYOUT: AdvertLayout = AdvertLayout::V1_0_4;
const HEADER_LEN: usize = 9;
const PARTIAL_ADDRESS_LEN: usize = 3;

/// Decode a v1.0.4 layout buffer.
pub fn decode_v104(data: &[u8]) -> Result<LayoutFields> {
    check_min_length(LAYOUT, data, HEADER_LEN)?;
    if data[0] > 1 {
        return Err(AdvertError::InvalidTag {
            layout: LAYOUT.name(),
            tag: data[0],
        });
    }

    let status = data[2];
    let connected = [bit(status, 4), bit(status, 5)];
    check_length(LAYOUT, data, HEADER_LEN, PARTIAL_ADDRESS_LEN, connected)?;

    let tails = peer_addresses::<PARTIAL_ADDRESS_LEN>(LAYOUT, data, HEADER_LEN, connected)?;
    let peers = tails.map(|tail| match tail {
        Some(tail) => PeerConnection::connected(MacAddress::from_partial(tail)),
        None => PeerConnection::default(),
    });

    let features = data[3];
    Ok(LayoutFields {
        bmap_version: BmapVersion::new(1, 0, 4),
        pairing_mode: bit(status, 7),
        peers,
        product_id: ProductId::RawVendor(data[1]),
        variant: status & 0x0F,
        product_type: ProductType::from_headphones_bit(bit(features, 2)),
        music_share_supported: bit(features, 1),
        music_share_active: bit(features, 0),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_peer() {
        let data = [0x01, 0x42, 0b1001_0011, 0b0000_0110, 0, 0, 0, 0, 0, 0xAA, 0xBB, 0xCC];
        let fields = decode_v104(&data).unwrap();
        assert_eq!(fields.bmap_version.to_string(), "1.0.4");
        assert!(fields.pairing_mode);
        assert_eq!(fields.variant, 3);
        assert_eq!(fields.product_id, ProductId::RawVendor(0x42));
        assert_eq!(fields.product_type, ProductType::Headphones);
        assert!(fields.music_share_supported);
        assert!(!fields.music_share_active);
        assert_eq!(
            fields.peers[0].address,
            Some(MacAddress::new([0, 0, 0, 0xAA, 0xBB, 0xCC]))
        );
        assert!(!fields.peers[1].connected);
    }

    #[test]
    fn test_no_peers_speaker() {
        let fields = decode_v104(&[0x00, 0x10, 0x02, 0b0000_0001, 0, 0, 0, 0, 0]).unwrap();
        assert_eq!(fields.peers, [PeerConnection::default(); 2]);
        assert_eq!(fields.product_type, ProductType::Speaker);
        assert!(fields.music_share_active);
        assert!(!fields.pairing_mode);
    }

    #[test]
    fn test_both_peers_length() {
        let mut data = vec![0x01, 0x42, 0b0011_0000, 0, 0, 0, 0, 0, 0];
        data.extend_from_slice(&[1, 2, 3]);
        assert!(matches!(
            decode_v104(&data),
            Err(AdvertError::LengthMismatch { expected: 15, actual: 12, .. })
        ));
        data.extend_from_slice(&[4, 5, 6]);
        let fields = decode_v104(&data).unwrap();
        assert_eq!(fields.peers[1].address, Some(MacAddress::new([0, 0, 0, 4, 5, 6])));
    }

    #[test]
    fn test_invalid_tag() {
        assert_eq!(
            decode_v104(&[0x02, 0, 0, 0, 0, 0, 0, 0, 0]),
            Err(AdvertError::InvalidTag {
                layout: "v1.0.4",
                tag: 0x02,
            })
        );
    }

    #[test]
    fn test_too_short() {
        assert!(matches!(
            decode_v104(&[0x01, 0x42, 0x00]),
            Err(AdvertError::TooShort { expected: 9, .. })
        ));
    }
}
