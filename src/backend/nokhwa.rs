//! Camera access through the nokhwa crate.
//!
//! Local webcams enumerate as USB-attached devices. nokhwa streams
//! continuously by nature, so `Continuous` acquisition is a no-op and
//! `Triggered` is rejected as unsupported.

use crate::device::{AcquisitionMode, CameraSdk, DeviceHandle, DeviceInfo, DeviceInterface};
use crate::errors::CameraError;
use nokhwa::{
    pixel_format::RgbFormat,
    query,
    utils::{ApiBackend, CameraIndex, RequestedFormat, RequestedFormatType},
    Camera,
};
use std::time::Duration;

/// `CameraSdk` implementation over nokhwa's native input backends.
pub struct NokhwaSdk {
    backend: ApiBackend,
}

impl NokhwaSdk {
    pub fn new() -> Self {
        Self {
            backend: ApiBackend::Auto,
        }
    }
}

impl Default for NokhwaSdk {
    fn default() -> Self {
        Self::new()
    }
}

impl CameraSdk for NokhwaSdk {
    fn enumerate(&self) -> Result<Vec<DeviceInfo>, CameraError> {
        let cameras = query(self.backend).map_err(|e| {
            CameraError::EnumerationError(format!("Failed to query cameras: {}", e))
        })?;

        let mut device_list = Vec::new();
        for camera_info in cameras {
            let device = DeviceInfo::new(
                camera_info.index().to_string(),
                camera_info.human_name(),
                DeviceInterface::Usb,
            )
            .with_description(camera_info.description().to_string());
            device_list.push(device);
        }

        Ok(device_list)
    }

    fn open(&self, index: usize) -> Result<Box<dyn DeviceHandle>, CameraError> {
        let requested = RequestedFormat::new::<RgbFormat>(RequestedFormatType::AbsoluteHighestResolution);

        let camera = Camera::new(CameraIndex::Index(index as u32), requested).map_err(|e| {
            CameraError::InitializationError(format!("Failed to open camera {}: {}", index, e))
        })?;

        let resolution = camera.resolution();
        Ok(Box::new(NokhwaHandle {
            camera,
            width: resolution.width_x,
            height: resolution.height_y,
        }))
    }
}

/// An opened nokhwa camera with its resolution read back at open time.
pub struct NokhwaHandle {
    camera: Camera,
    width: u32,
    height: u32,
}

impl DeviceHandle for NokhwaHandle {
    fn resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn set_acquisition_mode(&mut self, mode: AcquisitionMode) -> Result<(), CameraError> {
        match mode {
            AcquisitionMode::Continuous => Ok(()),
            AcquisitionMode::Triggered => Err(CameraError::ControlError(
                "triggered acquisition is not supported by this backend".to_string(),
            )),
        }
    }

    fn start_grabbing(&mut self) -> Result<(), CameraError> {
        self.camera
            .open_stream()
            .map_err(|e| CameraError::StreamError(format!("Failed to start stream: {}", e)))
    }

    fn stop_grabbing(&mut self) -> Result<(), CameraError> {
        self.camera
            .stop_stream()
            .map_err(|e| CameraError::StreamError(format!("Failed to stop stream: {}", e)))
    }

    fn grab_into(
        &mut self,
        buffer: &mut [u8],
        _timeout: Duration,
    ) -> Result<Option<usize>, CameraError> {
        // nokhwa's frame wait blocks in the driver and exposes no deadline,
        // so this backend never reports the timeout outcome.
        let frame = self
            .camera
            .frame()
            .map_err(|e| CameraError::CaptureError(format!("Failed to capture frame: {}", e)))?;

        let decoded = frame
            .decode_image::<RgbFormat>()
            .map_err(|e| CameraError::CaptureError(format!("Failed to decode frame: {}", e)))?;
        let data = decoded.into_raw();

        if data.len() == buffer.len() {
            buffer.copy_from_slice(&data);
        }
        Ok(Some(data.len()))
    }
}

impl Drop for NokhwaHandle {
    fn drop(&mut self) {
        if self.camera.is_stream_open() {
            let _ = self.camera.stop_stream();
        }
    }
}

// The underlying capture device is only ever driven from one thread at a
// time through &mut self.
unsafe impl Send for NokhwaHandle {}
