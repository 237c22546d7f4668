//! Vendor-SDK seam: device descriptions and the traits a camera backend
//! implements.
//!
//! Hardware access goes through `CameraSdk` and `DeviceHandle` so the
//! session logic can be exercised offline with the fakes in
//! [`crate::testing`].

use crate::errors::CameraError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Transport a camera is attached over.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeviceInterface {
    /// Network-attached (GigE Vision) camera with its current address.
    GigE { address: String },
    /// USB-attached camera.
    Usb,
}

impl fmt::Display for DeviceInterface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceInterface::GigE { address } => write!(f, "GigE ({})", address),
            DeviceInterface::Usb => write!(f, "USB"),
        }
    }
}

/// Description of an enumerated camera device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceInfo {
    pub id: String,
    pub name: String,
    pub interface: DeviceInterface,
    pub description: Option<String>,
}

impl DeviceInfo {
    pub fn new(id: String, name: String, interface: DeviceInterface) -> Self {
        Self {
            id,
            name,
            interface,
            description: None,
        }
    }

    pub fn with_description(mut self, description: String) -> Self {
        self.description = Some(description);
        self
    }
}

/// Frame delivery mode of the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AcquisitionMode {
    /// Frames are produced continuously (trigger off).
    Continuous,
    /// Frames are produced on an external trigger signal.
    Triggered,
}

/// Entry point into a vendor camera-control library.
pub trait CameraSdk {
    /// Enumerate attached cameras across the interfaces the backend knows.
    fn enumerate(&self) -> Result<Vec<DeviceInfo>, CameraError>;

    /// Create and open a handle for the device at `index` in enumeration
    /// order.
    fn open(&self, index: usize) -> Result<Box<dyn DeviceHandle>, CameraError>;
}

/// An opened camera device.
pub trait DeviceHandle: Send {
    /// Current sensor resolution as (width, height).
    fn resolution(&self) -> (u32, u32);

    fn set_acquisition_mode(&mut self, mode: AcquisitionMode) -> Result<(), CameraError>;

    fn start_grabbing(&mut self) -> Result<(), CameraError>;

    fn stop_grabbing(&mut self) -> Result<(), CameraError>;

    /// Wait up to `timeout` for the next frame and copy it into `buffer`.
    ///
    /// Returns `Ok(Some(len))` with the delivered frame length on success,
    /// `Ok(None)` when the wait timed out, and `Err` on fatal failure. A
    /// frame longer than `buffer` must be reported by length without being
    /// copied.
    fn grab_into(
        &mut self,
        buffer: &mut [u8],
        timeout: Duration,
    ) -> Result<Option<usize>, CameraError>;
}
