//! Blocking command/response client.
//!
//! The protocol has no request id, so a connection carries one outstanding
//! request at a time. [`BmapClient`] enforces that with `&mut self`;
//! [`SharedClient`] adds a lock for callers on several threads.

use std::sync::Arc;

use bmap_metrics::{metric_defs, MetricLabels};
use log::{debug, trace, warn};
use parking_lot::Mutex;

use crate::bitmask::decode_bitmask;
use crate::commands::Command;
use crate::config::DecoderConfig;
use crate::constants::{product_info, FUNCTION_BLOCK_INFO};
use crate::decoder::{DecodeMode, Response, ResponseDecoder};
use crate::error::Result;
use crate::frame::{Frame, Transport};
use crate::registry::FunctionRegistry;
use crate::responses::{decode_text, ConnectedDevices, FunctionValue, PairedDevice};
use crate::types::{FunctionBlock, MacAddress, Operator};

/// A client shared between threads. Lock it for the whole request.
pub type SharedClient<T> = Arc<Mutex<BmapClient<T>>>;

/// One connection to a device.
pub struct BmapClient<T> {
    transport: T,
    decoder: ResponseDecoder,
    labels: MetricLabels,
}

impl<T: Transport> BmapClient<T> {
    /// Create a client with default decoder limits.
    pub fn new(transport: T) -> Self {
        Self::with_config(transport, DecoderConfig::default())
    }

    /// Create a client with the given decoder limits.
    pub fn with_config(transport: T, config: DecoderConfig) -> Self {
        BmapClient {
            transport,
            decoder: ResponseDecoder::new(config),
            labels: MetricLabels::default(),
        }
    }

    /// Label this connection's metrics, usually with the device address.
    pub fn with_labels(mut self, labels: MetricLabels) -> Self {
        self.decoder = self.decoder.with_labels(labels.clone());
        self.labels = labels;
        self
    }

    /// Wrap for use from several threads.
    pub fn into_shared(self) -> SharedClient<T> {
        Arc::new(Mutex::new(self))
    }

    /// The underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// The underlying transport, mutably.
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Give back the transport.
    pub fn into_inner(self) -> T {
        self.transport
    }

    /// Write one frame.
    pub fn send(&mut self, frame: &Frame) -> Result<()> {
        let bytes = frame.encode()?;
        trace!("tx {}", hex::encode(&bytes));
        debug!(
            "tx {} function=0x{:02X} {} len={}",
            frame.block,
            frame.function,
            frame.operator,
            frame.payload.len()
        );
        self.transport.send(&bytes)?;

        let labels = self.labels.with(&[
            ("function_block", frame.block.name().to_string()),
            ("operator", frame.operator.name().to_string()),
        ]);
        metrics::counter!(metric_defs::FRAMES_TX.name, &labels).increment(1);
        Ok(())
    }

    /// Read one complete response.
    pub fn read_response(&mut self, mode: DecodeMode) -> Result<Response> {
        self.decoder.decode(&mut self.transport, mode)
    }

    /// Send a request and read its response.
    pub fn transact(&mut self, frame: &Frame, mode: DecodeMode) -> Result<Response> {
        self.send(frame)?;
        let response = self.read_response(mode)?;
        if let Response::Status(fragment) = &response {
            if fragment.block != frame.block {
                warn!(
                    "response from {} to a {} request",
                    fragment.block, frame.block
                );
            }
        }
        Ok(response)
    }

    /// Send a request and decode the STATUS payload with the registered decoder.
    pub fn request(
        &mut self,
        block: FunctionBlock,
        function: u8,
        operator: Operator,
        payload: &[u8],
    ) -> Result<FunctionValue> {
        // Fail before touching the wire if nothing can decode the answer.
        let entry = FunctionRegistry::global().lookup(block, function)?;
        let frame = Frame::new(block, function, operator, payload)?;
        let payload = self.transact(&frame, DecodeMode::Auto)?.into_payload()?;
        (entry.decode)(&payload)
    }

    /// START a bulk query and decode every element with its own registered
    /// decoder, keyed by function id, in the order the device sent them.
    pub fn request_all(&mut self, block: FunctionBlock, function: u8) -> Result<Vec<(u8, FunctionValue)>> {
        let frame = Frame::request(block, function, Operator::Start);
        let registry = FunctionRegistry::global();
        self.transact(&frame, DecodeMode::List)?
            .into_keyed()?
            .into_iter()
            .map(|(id, payload)| Ok((id, registry.decode(block, id, &payload)?)))
            .collect()
    }

    /// Run a structured command and return the raw response.
    pub fn execute(&mut self, command: &Command) -> Result<Response> {
        self.transact(&command.frame()?, DecodeMode::Auto)
    }

    /// Version string of a function block.
    pub fn function_block_info(&mut self, block: FunctionBlock) -> Result<String> {
        let frame = Frame::request(block, FUNCTION_BLOCK_INFO, Operator::Get);
        decode_text(&self.transact(&frame, DecodeMode::Auto)?.into_payload()?)
    }

    /// Protocol version spoken by the device.
    pub fn bmap_version(&mut self) -> Result<String> {
        let frame = Frame::request(FunctionBlock::ProductInfo, product_info::BMAP_VERSION, Operator::Get);
        decode_text(&self.transact(&frame, DecodeMode::Auto)?.into_payload()?)
    }

    /// Function blocks the device implements.
    pub fn supported_function_blocks(&mut self) -> Result<Vec<FunctionBlock>> {
        let frame = Frame::request(
            FunctionBlock::ProductInfo,
            product_info::ALL_FUNCTION_BLOCKS,
            Operator::Get,
        );
        let mask = self.transact(&frame, DecodeMode::Auto)?.into_payload()?;
        Ok(decode_bitmask(&mask))
    }

    /// Version strings of every implemented function block, in device order.
    pub fn function_block_versions(&mut self) -> Result<Vec<String>> {
        let frame = Frame::request(
            FunctionBlock::ProductInfo,
            product_info::ALL_FUNCTION_BLOCKS,
            Operator::Start,
        );
        self.transact(&frame, DecodeMode::List)?
            .into_payloads()?
            .iter()
            .map(|payload| decode_text(payload))
            .collect()
    }

    /// Connected source devices.
    pub fn list_devices(&mut self) -> Result<ConnectedDevices> {
        let response = self.execute(&Command::ListDevices)?;
        ConnectedDevices::decode(&response.into_payload()?)
    }

    /// Information about one paired device.
    pub fn device_info(&mut self, address: MacAddress) -> Result<PairedDevice> {
        let response = self.execute(&Command::DeviceInfo { address })?;
        PairedDevice::decode(&response.into_payload()?)
    }

    /// Paired devices, looked up one by one from the device list.
    pub fn paired_devices(&mut self) -> Result<Vec<PairedDevice>> {
        let devices = self.list_devices()?;
        devices
            .addresses
            .into_iter()
            .map(|address| self.device_info(address))
            .collect()
    }
}
