//! Camera session: owns one opened device handle and its frame buffer, and
//! runs the blocking acquire-convert-present loop.

use crate::convert;
use crate::device::{AcquisitionMode, CameraSdk, DeviceHandle};
use crate::display::{FrameSink, SinkEvent};
use crate::errors::CameraError;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Counters from one completed capture run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CaptureStats {
    /// Frames delivered and presented.
    pub frames: u64,
    /// Frame waits that timed out; the loop keeps going on these.
    pub timeouts: u64,
}

/// Cross-thread stop control for a running capture loop.
///
/// Raising the flag makes a blocking [`CameraSession::run`] return after its
/// current iteration, independent of any quit keypress in the sink.
#[derive(Clone)]
pub struct StopHandle {
    flag: Arc<AtomicBool>,
}

impl StopHandle {
    /// Ask the capture loop to stop.
    pub fn stop(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_stop_requested(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// One opened camera and its exclusively owned frame buffer.
///
/// Lifecycle: `initialize` -> `run` (blocking) -> stop via [`StopHandle`],
/// a quit event from the sink, or a fatal stream error. `run` may be called
/// again after it returns. Dropping the session releases the device handle
/// and the buffer.
pub struct CameraSession {
    handle: Box<dyn DeviceHandle>,
    width: u32,
    height: u32,
    buffer: Vec<u8>,
    capturing: Arc<AtomicBool>,
    stop_flag: Arc<AtomicBool>,
}

impl CameraSession {
    /// Upper bound on each frame wait inside the capture loop.
    pub const FRAME_TIMEOUT: Duration = Duration::from_millis(1000);

    /// Enumerate devices, open the one at `index`, force continuous
    /// acquisition, and allocate a frame buffer matching the device's
    /// current resolution.
    ///
    /// Fails if enumeration fails, no devices are attached, the index is
    /// out of range, the device cannot be opened, or trigger-mode
    /// configuration fails. No retries.
    pub fn initialize(sdk: &dyn CameraSdk, index: usize) -> Result<Self, CameraError> {
        let devices = sdk.enumerate()?;

        log::info!("Available devices:");
        for (i, device) in devices.iter().enumerate() {
            log::info!("  [{}] {} ({})", i, device.name, device.interface);
        }

        if devices.is_empty() {
            return Err(CameraError::InitializationError(
                "no cameras attached".to_string(),
            ));
        }
        if index >= devices.len() {
            return Err(CameraError::InitializationError(format!(
                "camera index {} out of range ({} devices)",
                index,
                devices.len()
            )));
        }

        let mut handle = sdk.open(index)?;
        let (width, height) = handle.resolution();
        handle.set_acquisition_mode(AcquisitionMode::Continuous)?;

        let buffer = vec![0u8; width as usize * height as usize * 3];
        log::info!(
            "Opened {} at {}x{} ({} byte frame buffer)",
            devices[index].name,
            width,
            height,
            buffer.len()
        );

        Ok(Self {
            handle,
            width,
            height,
            buffer,
            capturing: Arc::new(AtomicBool::new(false)),
            stop_flag: Arc::new(AtomicBool::new(false)),
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Size of the owned frame buffer in bytes (`width * height * 3`).
    pub fn buffer_len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_capturing(&self) -> bool {
        self.capturing.load(Ordering::Relaxed)
    }

    /// Stop control usable from other threads (or a signal handler) while
    /// `run` blocks this one.
    pub fn stop_handle(&self) -> StopHandle {
        StopHandle {
            flag: self.stop_flag.clone(),
        }
    }

    /// If a capture run is active, ask it to stop. No-op otherwise.
    pub fn stop(&self) {
        if self.is_capturing() {
            self.stop_flag.store(true, Ordering::Relaxed);
        }
    }

    /// Start streaming and block on the acquire-convert-present loop until
    /// the stop flag is raised, the sink reports a quit event, or a fatal
    /// error occurs.
    ///
    /// Each iteration waits up to [`Self::FRAME_TIMEOUT`] for a frame. A
    /// timed-out wait is counted and logged, then the loop continues; every
    /// other failure stops the stream and is returned. A delivered frame
    /// whose length does not match the owned buffer means the device
    /// resolution changed mid-stream and is treated as fatal.
    pub fn run(&mut self, sink: &mut dyn FrameSink) -> Result<CaptureStats, CameraError> {
        self.handle.start_grabbing()?;
        self.stop_flag.store(false, Ordering::Relaxed);
        self.capturing.store(true, Ordering::Relaxed);

        let mut stats = CaptureStats::default();
        let result = loop {
            if self.stop_flag.load(Ordering::Relaxed) {
                break Ok(());
            }

            match self.handle.grab_into(&mut self.buffer, Self::FRAME_TIMEOUT) {
                Ok(Some(len)) if len == self.buffer.len() => {
                    stats.frames += 1;
                    convert::rgb_to_bgr_in_place(&mut self.buffer);
                    match sink.present(self.width, self.height, &self.buffer) {
                        Ok(SinkEvent::Continue) => {}
                        Ok(SinkEvent::Quit) => break Ok(()),
                        Err(e) => break Err(e),
                    }
                }
                Ok(Some(len)) => {
                    break Err(CameraError::StreamError(format!(
                        "frame of {} bytes does not match the {}x{} buffer ({} bytes); \
                         device resolution changed mid-stream",
                        len,
                        self.width,
                        self.height,
                        self.buffer.len()
                    )));
                }
                Ok(None) => {
                    stats.timeouts += 1;
                    log::warn!(
                        "frame wait timed out after {:?} (timeout {})",
                        Self::FRAME_TIMEOUT,
                        stats.timeouts
                    );
                }
                Err(e) => break Err(e),
            }
        };

        if let Err(e) = self.handle.stop_grabbing() {
            log::warn!("failed to stop grabbing: {}", e);
        }
        self.capturing.store(false, Ordering::Relaxed);
        self.stop_flag.store(false, Ordering::Relaxed);

        result.map(|_| stats)
    }
}

impl Drop for CameraSession {
    fn drop(&mut self) {
        // A run on this thread cannot still be blocking here, but the
        // stream may be live if run panicked mid-loop.
        if self.is_capturing() {
            self.stop_flag.store(true, Ordering::Relaxed);
            if let Err(e) = self.handle.stop_grabbing() {
                log::warn!("failed to stop grabbing during drop: {}", e);
            }
            self.capturing.store(false, Ordering::Relaxed);
        }
    }
}
