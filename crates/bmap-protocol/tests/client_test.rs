//! Integration tests for the blocking client.
//!
//! A scripted in-memory transport stands in for the RFCOMM socket: it hands
//! out canned response bytes and records every byte written.

use std::collections::VecDeque;
use std::io::{self, Read, Write};
use std::thread;

use bmap_protocol::{
    control, device_management, product_info, settings, AnrLevel, BmapClient, BmapError,
    DecodeMode, DecoderConfig, Frame, FunctionBlock, FunctionValue, MacAddress, Operator,
    ProductType, FUNCTION_BLOCK_INFO,
};

/// In-memory transport with scripted responses.
#[derive(Debug, Default)]
struct MockTransport {
    incoming: VecDeque<u8>,
    written: Vec<u8>,
}

impl MockTransport {
    fn new() -> Self {
        Self::default()
    }

    /// Queue one response frame.
    fn respond(mut self, block: FunctionBlock, function: u8, status: Operator, payload: &[u8]) -> Self {
        let frame = Frame::new(block, function, status, payload.to_vec()).expect("payload fits");
        self.incoming.extend(frame.encode().expect("payload fits"));
        self
    }
}

impl Read for MockTransport {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = buf.len().min(self.incoming.len());
        for (slot, byte) in buf.iter_mut().zip(self.incoming.drain(..n)) {
            *slot = byte;
        }
        Ok(n)
    }
}

impl Write for MockTransport {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.written.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

const PI: FunctionBlock = FunctionBlock::ProductInfo;
const SETTINGS: FunctionBlock = FunctionBlock::Settings;

// ============================================================================
// Single Value Requests
// ============================================================================

#[test]
fn test_request_decodes_registered_payload() {
    let transport = MockTransport::new().respond(PI, product_info::FIRMWARE_VERSION, Operator::Status, b"4.8.1");
    let mut client = BmapClient::new(transport);

    let value = client
        .request(PI, product_info::FIRMWARE_VERSION, Operator::Get, &[])
        .expect("request should succeed");
    assert_eq!(value, FunctionValue::Text("4.8.1".to_string()));

    let transport = client.into_inner();
    assert_eq!(transport.written, vec![0x00, 0x05, 0x01, 0x00]);
    assert!(transport.incoming.is_empty());
}

#[test]
fn test_request_skips_process_frames() {
    let transport = MockTransport::new()
        .respond(SETTINGS, settings::ANR, Operator::Process, &[])
        .respond(SETTINGS, settings::ANR, Operator::Status, &[0x01, 0b0000_1111]);
    let mut client = BmapClient::new(transport);

    match client.request(SETTINGS, settings::ANR, Operator::SetGet, &[0x01]).unwrap() {
        FunctionValue::Anr(anr) => {
            assert_eq!(anr.level, AnrLevel::High);
            assert_eq!(anr.supported.len(), 4);
        }
        other => panic!("unexpected value: {:?}", other),
    }
    assert_eq!(client.transport().written, vec![0x01, 0x06, 0x02, 0x01, 0x01]);
}

#[test]
fn test_request_device_error() {
    let transport = MockTransport::new().respond(SETTINGS, settings::CNC, Operator::Error, &[0x07]);
    let mut client = BmapClient::new(transport);

    let err = client.request(SETTINGS, settings::CNC, Operator::Get, &[]).unwrap_err();
    assert!(err.is_device_error());
    assert_eq!(err.device_error_code(), Some(7));
}

#[test]
fn test_request_unregistered_function_sends_nothing() {
    let mut client = BmapClient::new(MockTransport::new());
    let err = client
        .request(FunctionBlock::HeartRate, 0x01, Operator::Get, &[])
        .unwrap_err();
    assert!(err.is_defect());
    assert!(client.transport().written.is_empty());
}

#[test]
fn test_request_connection_lost() {
    let mut bytes = Frame::new(PI, product_info::SERIAL_NUMBER, Operator::Status, b"ABC123".to_vec())
        .unwrap()
        .encode()
        .unwrap();
    bytes.truncate(7);
    let transport = MockTransport {
        incoming: bytes.into(),
        written: Vec::new(),
    };
    let mut client = BmapClient::new(transport);

    let err = client.request(PI, product_info::SERIAL_NUMBER, Operator::Get, &[]).unwrap_err();
    assert!(matches!(err, BmapError::ShortRead { expected: 6, actual: 3 }));
}

#[test]
fn test_send_rejects_payload_grown_after_new() {
    let mut client = BmapClient::new(MockTransport::new());
    let mut frame = Frame::request(SETTINGS, settings::DEVICE_NAME, Operator::SetGet);
    frame.payload.extend_from_slice(&[b'x'; 256]);

    let err = client.send(&frame).unwrap_err();
    assert!(matches!(err, BmapError::PayloadTooLong { max: 255, actual: 256 }));
    assert!(client.transport().written.is_empty());
}

#[test]
fn test_request_rejects_oversized_payload() {
    let mut client = BmapClient::new(MockTransport::new());
    let name = vec![b'x'; 300];
    let err = client
        .request(SETTINGS, settings::DEVICE_NAME, Operator::SetGet, &name)
        .unwrap_err();
    assert!(matches!(err, BmapError::PayloadTooLong { max: 255, actual: 300 }));
}

// ============================================================================
// Bulk Requests
// ============================================================================

#[test]
fn test_request_all_applies_per_element_decoders() {
    let transport = MockTransport::new()
        .respond(PI, product_info::ALL_FUNCTIONS, Operator::Start, &[])
        .respond(PI, product_info::FIRMWARE_VERSION, Operator::Status, b"4.8.1")
        .respond(PI, product_info::MAC_ADDRESS, Operator::Status, &[0x60, 0xAB, 0xD2, 0xB0, 0xBD, 0x47])
        .respond(PI, product_info::SERIAL_NUMBER, Operator::Status, b"SN1")
        .respond(PI, product_info::ALL_FUNCTIONS, Operator::Final, &[]);
    let mut client = BmapClient::new(transport);

    let values = client.request_all(PI, product_info::ALL_FUNCTIONS).unwrap();
    assert_eq!(
        values,
        vec![
            (product_info::FIRMWARE_VERSION, FunctionValue::Text("4.8.1".to_string())),
            (
                product_info::MAC_ADDRESS,
                FunctionValue::MacAddress("60:ab:d2:b0:bd:47".parse().unwrap())
            ),
            (product_info::SERIAL_NUMBER, FunctionValue::Text("SN1".to_string())),
        ]
    );
    assert_eq!(client.transport().written, vec![0x00, 0x04, 0x05, 0x00]);
}

#[test]
fn test_request_all_settings() {
    let transport = MockTransport::new()
        .respond(SETTINGS, settings::ALL_SETTINGS, Operator::Status, &[])
        .respond(SETTINGS, settings::DEVICE_NAME, Operator::Status, b"\x00My QC")
        .respond(SETTINGS, settings::STANDBY_TIMER, Operator::Status, &[20])
        .respond(SETTINGS, settings::IMU_VOLUME_CONTROL, Operator::Status, &[0x01])
        .respond(SETTINGS, settings::ALL_SETTINGS, Operator::Final, &[]);
    let mut client = BmapClient::new(transport);

    let values = client.request_all(SETTINGS, settings::ALL_SETTINGS).unwrap();
    assert_eq!(values[0].1, FunctionValue::Text("My QC".to_string()));
    assert_eq!(values[1].1, FunctionValue::StandbyTimer(20));
    assert_eq!(values[2].1, FunctionValue::ImuVolumeControl(true));
}

#[test]
fn test_request_all_unknown_element_is_defect() {
    let transport = MockTransport::new()
        .respond(FunctionBlock::Control, control::ALL_CONTROLS, Operator::Start, &[])
        .respond(FunctionBlock::Control, 0x40, Operator::Status, &[0x00])
        .respond(FunctionBlock::Control, control::ALL_CONTROLS, Operator::Final, &[]);
    let mut client = BmapClient::new(transport);

    let err = client.request_all(FunctionBlock::Control, control::ALL_CONTROLS).unwrap_err();
    assert!(err.is_defect());
}

#[test]
fn test_function_block_versions_forced_list() {
    let transport = MockTransport::new()
        .respond(PI, product_info::ALL_FUNCTION_BLOCKS, Operator::Status, &[])
        .respond(PI, FUNCTION_BLOCK_INFO, Operator::Status, b"1.0.0")
        .respond(SETTINGS, FUNCTION_BLOCK_INFO, Operator::Status, b"2.1.0")
        .respond(PI, product_info::ALL_FUNCTION_BLOCKS, Operator::Final, &[]);
    let mut client = BmapClient::new(transport);

    assert_eq!(
        client.function_block_versions().unwrap(),
        vec!["1.0.0".to_string(), "2.1.0".to_string()]
    );
}

#[test]
fn test_supported_function_blocks() {
    let transport =
        MockTransport::new().respond(PI, product_info::ALL_FUNCTION_BLOCKS, Operator::Status, &[0x00, 0x93]);
    let mut client = BmapClient::new(transport);

    assert_eq!(
        client.supported_function_blocks().unwrap(),
        vec![
            FunctionBlock::ProductInfo,
            FunctionBlock::Settings,
            FunctionBlock::DeviceManagement,
            FunctionBlock::Control,
        ]
    );
}

#[test]
fn test_text_getters() {
    let transport = MockTransport::new()
        .respond(PI, product_info::BMAP_VERSION, Operator::Status, b"1.2.3")
        .respond(SETTINGS, FUNCTION_BLOCK_INFO, Operator::Status, b"3.0.1");
    let mut client = BmapClient::new(transport);

    assert_eq!(client.bmap_version().unwrap(), "1.2.3");
    assert_eq!(client.function_block_info(SETTINGS).unwrap(), "3.0.1");
}

// ============================================================================
// Device Management
// ============================================================================

#[test]
fn test_paired_devices() {
    let phone = MacAddress::new([0x4c, 0x87, 0x5d, 0x09, 0x61, 0x16]);
    let mut list = vec![0b01];
    list.extend_from_slice(phone.as_bytes());

    let mut info = phone.as_bytes().to_vec();
    info.extend_from_slice(&[0b0000_0001, 0x00, 0x00]);
    info.extend_from_slice(b"Pixel 7");

    let dm = FunctionBlock::DeviceManagement;
    let transport = MockTransport::new()
        .respond(dm, device_management::LIST_DEVICES, Operator::Status, &list)
        .respond(dm, device_management::DEVICE_INFO, Operator::Status, &info);
    let mut client = BmapClient::new(transport);

    let devices = client.paired_devices().unwrap();
    assert_eq!(devices.len(), 1);
    assert_eq!(devices[0].address, phone);
    assert!(devices[0].connected);
    assert_eq!(devices[0].name, "Pixel 7");

    let written = &client.transport().written;
    assert_eq!(&written[..4], &[0x04, 0x04, 0x01, 0x00]);
    assert_eq!(&written[4..8], &[0x04, 0x05, 0x01, 0x06]);
    assert_eq!(&written[8..], phone.as_bytes());
}

#[test]
fn test_device_info_bmap_product() {
    let speaker = MacAddress::new([1, 2, 3, 4, 5, 6]);
    let mut info = speaker.as_bytes().to_vec();
    info.extend_from_slice(&[0b0000_0100, 0x40, 0x24, 0x02]);
    info.extend_from_slice(b"SoundLink");
    let transport = MockTransport::new().respond(
        FunctionBlock::DeviceManagement,
        device_management::DEVICE_INFO,
        Operator::Status,
        &info,
    );
    let mut client = BmapClient::new(transport);

    let device = client.device_info(speaker).unwrap();
    let product = device.product.expect("protocol product");
    assert_eq!(product.product_type, ProductType::Speaker);
    assert_eq!(product.product_id, 0x4024);
    assert_eq!(device.name, "SoundLink");
}

// ============================================================================
// Configuration and Sharing
// ============================================================================

#[test]
fn test_configured_list_bound() {
    let config = DecoderConfig::from_yaml_str("max_list_len: 1\n").unwrap();
    let transport = MockTransport::new()
        .respond(PI, product_info::ALL_FUNCTIONS, Operator::Start, &[])
        .respond(PI, product_info::FIRMWARE_VERSION, Operator::Status, b"a")
        .respond(PI, product_info::SERIAL_NUMBER, Operator::Status, b"b")
        .respond(PI, product_info::ALL_FUNCTIONS, Operator::Final, &[]);
    let mut client = BmapClient::with_config(transport, config);

    let err = client.request_all(PI, product_info::ALL_FUNCTIONS).unwrap_err();
    assert!(matches!(err, BmapError::ListTooLong { max: 1 }));
}

#[test]
fn test_raw_read_response() {
    let transport = MockTransport::new().respond(FunctionBlock::Control, control::CHIRP, Operator::Status, &[0x01]);
    let mut client = BmapClient::new(transport);
    client
        .send(&Frame::request(FunctionBlock::Control, control::CHIRP, Operator::Get))
        .unwrap();
    let fragment = client.read_response(DecodeMode::Auto).unwrap().into_fragment().unwrap();
    assert_eq!(fragment.function, control::CHIRP);
    assert_eq!(fragment.payload, vec![0x01]);
}

#[test]
fn test_shared_client_serializes_requests() {
    let mut transport = MockTransport::new();
    for _ in 0..8 {
        transport = transport.respond(SETTINGS, settings::STANDBY_TIMER, Operator::Status, &[30]);
    }
    let shared = BmapClient::new(transport).into_shared();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let client = shared.clone();
            thread::spawn(move || {
                client
                    .lock()
                    .request(SETTINGS, settings::STANDBY_TIMER, Operator::Get, &[])
                    .expect("request should succeed")
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), FunctionValue::StandbyTimer(30));
    }
    assert_eq!(shared.lock().transport().written.len(), 8 * 4);
}
