//! Response decoder.
//!
//! A response is a sequence of frames read until a terminal status:
//!
//! | status    | effect                                                  |
//! |-----------|---------------------------------------------------------|
//! | `STATUS`  | terminal value                                          |
//! | `ERROR`   | terminal failure carrying a one-byte error code         |
//! | `PROCESS` | skipped, the real status follows                        |
//! | `START`   | opens a list; each element is itself a full response    |
//! | `FINAL`   | closes the innermost open list                          |
//! | other     | illegal                                                 |
//!
//! Lists nest, so decoding keeps an explicit stack of open lists instead of
//! recursing. Every bound in [`DecoderConfig`] is checked as frames arrive.

use bmap_metrics::{metric_defs, MetricLabels};
use log::{debug, trace, warn};

use crate::config::DecoderConfig;
use crate::constants::HEADER_LEN;
use crate::error::{BmapError, Result};
use crate::frame::{Frame, FrameHeader, Transport};
use crate::types::{FunctionBlock, Operator};

/// How the caller expects the response to be shaped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecodeMode {
    /// Take whatever the device sends.
    #[default]
    Auto,
    /// Treat the first frame as a list opener even if its status is not
    /// START. Used for bulk queries where a fragment sequence is known to
    /// follow.
    List,
}

/// One STATUS frame's content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    /// Function block echoed by the device.
    pub block: FunctionBlock,
    /// Function id echoed by the device.
    pub function: u8,
    /// Payload bytes.
    pub payload: Vec<u8>,
}

/// A decoded response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// A single terminal value.
    Status(Fragment),
    /// An ordered START..FINAL list.
    List(Vec<Response>),
}

impl Response {
    /// Whether this is a list.
    pub fn is_list(&self) -> bool {
        matches!(self, Response::List(_))
    }

    /// The single fragment.
    pub fn into_fragment(self) -> Result<Fragment> {
        match self {
            Response::Status(fragment) => Ok(fragment),
            Response::List(_) => Err(BmapError::UnexpectedShape { expected: "status" }),
        }
    }

    /// The single payload.
    pub fn into_payload(self) -> Result<Vec<u8>> {
        Ok(self.into_fragment()?.payload)
    }

    /// The list elements.
    pub fn into_list(self) -> Result<Vec<Response>> {
        match self {
            Response::List(items) => Ok(items),
            Response::Status(_) => Err(BmapError::UnexpectedShape { expected: "list" }),
        }
    }

    /// Payloads of a flat list, in order.
    pub fn into_payloads(self) -> Result<Vec<Vec<u8>>> {
        self.into_list()?
            .into_iter()
            .map(Response::into_payload)
            .collect()
    }

    /// Elements of a flat list paired with their function ids, in order.
    pub fn into_keyed(self) -> Result<Vec<(u8, Vec<u8>)>> {
        self.into_list()?
            .into_iter()
            .map(|item| {
                let fragment = item.into_fragment()?;
                Ok((fragment.function, fragment.payload))
            })
            .collect()
    }
}

/// Reads frames from a transport and assembles them into a [`Response`].
///
/// Holds no state between calls.
#[derive(Debug, Clone, Default)]
pub struct ResponseDecoder {
    config: DecoderConfig,
    labels: MetricLabels,
}

impl ResponseDecoder {
    /// Create a decoder with the given limits.
    pub fn new(config: DecoderConfig) -> Self {
        ResponseDecoder {
            config,
            labels: MetricLabels::default(),
        }
    }

    /// Attach metric labels for the connection this decoder reads from.
    pub fn with_labels(mut self, labels: MetricLabels) -> Self {
        self.labels = labels;
        self
    }

    /// The active limits.
    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Read exactly one frame: the header, then as many payload bytes as it
    /// declares.
    pub fn read_frame<T: Transport + ?Sized>(&self, transport: &mut T) -> Result<Frame> {
        let mut header = [0u8; HEADER_LEN];
        transport.recv_exact(&mut header)?;
        let header = FrameHeader::from_bytes(header);

        let mut payload = vec![0u8; usize::from(header.len)];
        transport.recv_exact(&mut payload)?;

        trace!(
            "rx {} {}",
            hex::encode(header.to_bytes()),
            hex::encode(&payload)
        );
        debug!(
            "rx {} function=0x{:02X} {} len={}",
            header.block, header.function, header.operator, header.len
        );

        let labels = self.labels.with(&[
            ("function_block", header.block.name().to_string()),
            ("operator", header.operator.name().to_string()),
        ]);
        metrics::counter!(metric_defs::FRAMES_RX.name, &labels).increment(1);
        metrics::histogram!(metric_defs::FRAME_PAYLOAD_SIZE.name, &self.labels.to_labels())
            .record(f64::from(header.len));

        Ok(Frame {
            block: header.block,
            function: header.function,
            operator: header.operator,
            payload,
        })
    }

    /// Decode one complete response.
    pub fn decode<T: Transport + ?Sized>(
        &self,
        transport: &mut T,
        mode: DecodeMode,
    ) -> Result<Response> {
        let mut open: Vec<Vec<Response>> = Vec::new();
        let mut process_frames = 0usize;
        let mut force_list = mode == DecodeMode::List;

        loop {
            let frame = self.read_frame(transport)?;

            if frame.operator == Operator::Process {
                process_frames += 1;
                if process_frames > self.config.max_process_frames {
                    return Err(self.protocol_error(BmapError::TooManyProcessFrames {
                        max: self.config.max_process_frames,
                    }));
                }
                continue;
            }

            let forced = std::mem::take(&mut force_list);
            let completed = match frame.operator {
                Operator::Error => return Err(self.device_error(&frame)),
                Operator::Start => {
                    self.open_list(&mut open)?;
                    continue;
                }
                Operator::Status if forced => {
                    self.open_list(&mut open)?;
                    continue;
                }
                Operator::Final if forced => self.close_list(Vec::new()),
                Operator::Final => match open.pop() {
                    Some(items) => self.close_list(items),
                    None => return Err(self.protocol_error(BmapError::UnexpectedFinal)),
                },
                Operator::Status => Response::Status(Fragment {
                    block: frame.block,
                    function: frame.function,
                    payload: frame.payload,
                }),
                other => return Err(self.protocol_error(BmapError::IllegalStatus(other.value()))),
            };

            match open.last_mut() {
                Some(items) => {
                    if items.len() >= self.config.max_list_len {
                        return Err(self.protocol_error(BmapError::ListTooLong {
                            max: self.config.max_list_len,
                        }));
                    }
                    items.push(completed);
                }
                None => return Ok(completed),
            }
        }
    }

    fn open_list(&self, open: &mut Vec<Vec<Response>>) -> Result<()> {
        if open.len() >= self.config.max_depth {
            return Err(self.protocol_error(BmapError::NestingTooDeep {
                max: self.config.max_depth,
            }));
        }
        open.push(Vec::new());
        Ok(())
    }

    fn close_list(&self, items: Vec<Response>) -> Response {
        metrics::histogram!(metric_defs::LIST_LENGTH.name, &self.labels.to_labels())
            .record(items.len() as f64);
        Response::List(items)
    }

    fn device_error(&self, frame: &Frame) -> BmapError {
        let Some(&code) = frame.payload.first() else {
            return self.protocol_error(BmapError::PayloadTooShort {
                expected: 1,
                actual: 0,
            });
        };
        warn!(
            "device error {} from {} function=0x{:02X}",
            code, frame.block, frame.function
        );
        let labels = self.labels.with(&[("error_code", code.to_string())]);
        metrics::counter!(metric_defs::DEVICE_ERRORS.name, &labels).increment(1);
        BmapError::DeviceError { code }
    }

    fn protocol_error(&self, err: BmapError) -> BmapError {
        debug!("response rejected: {}", err);
        let labels = self.labels.with(&[("kind", err.error_code().to_string())]);
        metrics::counter!(metric_defs::PROTOCOL_ERRORS.name, &labels).increment(1);
        err
    }
}
