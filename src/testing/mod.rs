//! Offline testing support: scripted fakes for the vendor seam and simple
//! frame sinks.
//!
//! All hardware and display interaction goes through the traits in
//! [`crate::device`] and [`crate::display`], so the session logic can be
//! tested without cameras attached.

use crate::device::{AcquisitionMode, CameraSdk, DeviceHandle, DeviceInfo, DeviceInterface};
use crate::display::{FrameSink, SinkEvent};
use crate::errors::CameraError;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Generate a synthetic packed-RGB gradient frame.
///
/// Content varies with `frame_number` so consecutive frames differ.
pub fn synthetic_rgb_frame(frame_number: u64, width: u32, height: u32) -> Vec<u8> {
    let mut data = vec![0u8; width as usize * height as usize * 3];
    let base = (frame_number % 256) as u8;
    for y in 0..height {
        for x in 0..width {
            let idx = ((y * width + x) * 3) as usize;
            data[idx] = base.wrapping_add((x % 256) as u8);
            data[idx + 1] = base.wrapping_add((y % 256) as u8);
            data[idx + 2] = base.wrapping_add(((x + y) % 256) as u8);
        }
    }
    data
}

/// Outcome of one scripted frame wait.
#[derive(Debug, Clone)]
pub enum ScriptedGrab {
    /// Deliver this frame.
    Frame(Vec<u8>),
    /// Report a frame-wait timeout.
    Timeout,
    /// Fail fatally with a capture error.
    Fatal(String),
}

/// Calls recorded by [`FakeSdk`] and its handles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SdkCall {
    Enumerate,
    Open(usize),
    SetAcquisitionMode(AcquisitionMode),
    StartGrabbing,
    StopGrabbing,
    Grab,
}

/// Scripted in-memory `CameraSdk`.
///
/// Devices and the opened handle's resolution are fixed up front; the grab
/// script plays out in order, then every further wait times out (with a
/// short sleep, so loops stay stoppable without spinning).
pub struct FakeSdk {
    devices: Vec<DeviceInfo>,
    resolution: (u32, u32),
    script: Mutex<VecDeque<ScriptedGrab>>,
    calls: Arc<Mutex<Vec<SdkCall>>>,
}

impl FakeSdk {
    pub fn new(device_count: usize, resolution: (u32, u32)) -> Self {
        let devices = (0..device_count)
            .map(|i| {
                DeviceInfo::new(
                    format!("fake-{}", i),
                    format!("Fake Camera {}", i),
                    DeviceInterface::Usb,
                )
            })
            .collect();
        Self {
            devices,
            resolution,
            script: Mutex::new(VecDeque::new()),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Append one scripted grab outcome.
    pub fn push_grab(&self, grab: ScriptedGrab) {
        self.script.lock().expect("lock poisoned").push_back(grab);
    }

    /// Script `count` gradient frames sized for the fake's resolution.
    pub fn push_frames(&self, count: u64) {
        let (width, height) = self.resolution;
        for n in 0..count {
            self.push_grab(ScriptedGrab::Frame(synthetic_rgb_frame(n, width, height)));
        }
    }

    /// Everything recorded so far, in call order.
    pub fn calls(&self) -> Vec<SdkCall> {
        self.calls.lock().expect("lock poisoned").clone()
    }
}

impl CameraSdk for FakeSdk {
    fn enumerate(&self) -> Result<Vec<DeviceInfo>, CameraError> {
        self.calls
            .lock()
            .expect("lock poisoned")
            .push(SdkCall::Enumerate);
        Ok(self.devices.clone())
    }

    fn open(&self, index: usize) -> Result<Box<dyn DeviceHandle>, CameraError> {
        self.calls
            .lock()
            .expect("lock poisoned")
            .push(SdkCall::Open(index));
        if index >= self.devices.len() {
            return Err(CameraError::InitializationError(format!(
                "no fake device at index {}",
                index
            )));
        }
        let script = std::mem::take(&mut *self.script.lock().expect("lock poisoned"));
        Ok(Box::new(FakeHandle {
            resolution: self.resolution,
            script,
            calls: self.calls.clone(),
        }))
    }
}

struct FakeHandle {
    resolution: (u32, u32),
    script: VecDeque<ScriptedGrab>,
    calls: Arc<Mutex<Vec<SdkCall>>>,
}

impl FakeHandle {
    fn record(&self, call: SdkCall) {
        self.calls.lock().expect("lock poisoned").push(call);
    }
}

impl DeviceHandle for FakeHandle {
    fn resolution(&self) -> (u32, u32) {
        self.resolution
    }

    fn set_acquisition_mode(&mut self, mode: AcquisitionMode) -> Result<(), CameraError> {
        self.record(SdkCall::SetAcquisitionMode(mode));
        Ok(())
    }

    fn start_grabbing(&mut self) -> Result<(), CameraError> {
        self.record(SdkCall::StartGrabbing);
        Ok(())
    }

    fn stop_grabbing(&mut self) -> Result<(), CameraError> {
        self.record(SdkCall::StopGrabbing);
        Ok(())
    }

    fn grab_into(
        &mut self,
        buffer: &mut [u8],
        timeout: Duration,
    ) -> Result<Option<usize>, CameraError> {
        self.record(SdkCall::Grab);
        match self.script.pop_front() {
            Some(ScriptedGrab::Frame(data)) => {
                if data.len() == buffer.len() {
                    buffer.copy_from_slice(&data);
                }
                Ok(Some(data.len()))
            }
            Some(ScriptedGrab::Timeout) => Ok(None),
            Some(ScriptedGrab::Fatal(msg)) => Err(CameraError::CaptureError(msg)),
            None => {
                // Exhausted script behaves as an idle camera.
                std::thread::sleep(timeout.min(Duration::from_millis(1)));
                Ok(None)
            }
        }
    }
}

/// Sink that accepts every frame and counts them.
#[derive(Debug, Default)]
pub struct CountingSink {
    pub presented: u64,
}

impl FrameSink for CountingSink {
    fn present(&mut self, _width: u32, _height: u32, _pixels: &[u8]) -> Result<SinkEvent, CameraError> {
        self.presented += 1;
        Ok(SinkEvent::Continue)
    }
}

/// Sink that requests quit after a fixed number of frames, like a user
/// pressing the quit key.
#[derive(Debug)]
pub struct QuitAfterSink {
    pub remaining: u64,
    pub presented: u64,
}

impl QuitAfterSink {
    pub fn new(frames: u64) -> Self {
        Self {
            remaining: frames,
            presented: 0,
        }
    }
}

impl FrameSink for QuitAfterSink {
    fn present(&mut self, _width: u32, _height: u32, _pixels: &[u8]) -> Result<SinkEvent, CameraError> {
        self.presented += 1;
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            Ok(SinkEvent::Quit)
        } else {
            Ok(SinkEvent::Continue)
        }
    }
}
