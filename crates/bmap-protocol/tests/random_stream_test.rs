//! Codec behaviour on seeded random input.
//!
//! Every stream must either decode or fail with an error; the decoder must
//! never panic, read past the declared frame bytes, or exceed its bounds.
//! Every MAC address must survive a trip through its text form.

use std::io::Cursor;

use bmap_protocol::{
    DecodeMode, DecoderConfig, Frame, FunctionBlock, MacAddress, Operator, Response, ResponseDecoder,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const SEED: u64 = 0x424d_4150;

fn random_frame(rng: &mut ChaCha8Rng) -> Vec<u8> {
    let len: usize = rng.gen_range(0..8);
    let payload: Vec<u8> = (0..len).map(|_| rng.gen()).collect();
    // Bias towards legal response statuses so lists actually form.
    let status = Operator::from(rng.gen_range(2u8..9));
    Frame::new(FunctionBlock::from(rng.gen_range(0u8..3)), rng.gen::<u8>(), status, payload)
        .expect("payload fits")
        .encode()
        .expect("payload fits")
}

fn depth(response: &Response) -> usize {
    match response {
        Response::Status(_) => 0,
        Response::List(items) => 1 + items.iter().map(depth).max().unwrap_or(0),
    }
}

#[test]
fn test_random_frame_sequences_never_panic() {
    let mut rng = ChaCha8Rng::seed_from_u64(SEED);
    let config = DecoderConfig {
        max_list_len: 4,
        max_depth: 3,
        max_process_frames: 4,
    };
    let decoder = ResponseDecoder::new(config.clone());

    for _ in 0..2_000 {
        let frames: Vec<u8> = (0..rng.gen_range(1..12))
            .flat_map(|_| random_frame(&mut rng))
            .collect();
        let total = frames.len() as u64;
        let mode = if rng.gen_bool(0.5) { DecodeMode::List } else { DecodeMode::Auto };

        let mut stream = Cursor::new(frames);
        if let Ok(response) = decoder.decode(&mut stream, mode) {
            assert!(depth(&response) <= config.max_depth);
        }
        assert!(stream.position() <= total);
    }
}

#[test]
fn test_random_bytes_never_panic() {
    let mut rng = ChaCha8Rng::seed_from_u64(SEED + 1);
    let decoder = ResponseDecoder::default();

    for _ in 0..2_000 {
        let bytes: Vec<u8> = (0..rng.gen_range(0..64)).map(|_| rng.gen()).collect();
        let mut stream = Cursor::new(bytes);
        let _ = decoder.decode(&mut stream, DecodeMode::Auto);
    }
}

#[test]
fn test_random_mac_address_text_roundtrip() {
    let mut rng = ChaCha8Rng::seed_from_u64(SEED + 2);

    for _ in 0..5_000 {
        let mut bytes = [0u8; 6];
        rng.fill(&mut bytes);
        // At least one single-digit byte so the zero padding is exercised.
        bytes[rng.gen_range(0..6)] = rng.gen_range(0u8..0x10);

        let mac = MacAddress::new(bytes);
        let text = mac.to_string();
        assert_eq!(text.len(), 17, "{}", text);
        assert_eq!(text, text.to_lowercase());

        let parsed: MacAddress = text.parse().unwrap();
        assert_eq!(parsed.as_bytes(), &bytes);
    }
}
