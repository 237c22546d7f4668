//! Preview output behind a seam, so capture logic can run without a window.

use crate::errors::CameraError;
use minifb::{Key, Window, WindowOptions};

/// What the sink wants the capture loop to do after a frame was shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkEvent {
    Continue,
    Quit,
}

/// Consumer of decoded frames.
pub trait FrameSink {
    /// Present one frame. `pixels` is packed 8-bit BGR, row-major, no
    /// padding, `width * height * 3` bytes long.
    fn present(&mut self, width: u32, height: u32, pixels: &[u8]) -> Result<SinkEvent, CameraError>;
}

/// Desktop preview window. Quits on `q`, `Escape`, or window close.
pub struct WindowSink {
    title: String,
    window: Option<Window>,
    shadow: Vec<u32>,
}

impl WindowSink {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            window: None,
            shadow: Vec::new(),
        }
    }

    fn ensure_window(&mut self, width: u32, height: u32) -> Result<&mut Window, CameraError> {
        if self.window.is_none() {
            let window = Window::new(
                &self.title,
                width as usize,
                height as usize,
                WindowOptions::default(),
            )
            .map_err(|e| CameraError::DisplayError(format!("Failed to open window: {}", e)))?;
            self.window = Some(window);
        }
        Ok(self.window.as_mut().expect("window just created"))
    }
}

impl FrameSink for WindowSink {
    fn present(&mut self, width: u32, height: u32, pixels: &[u8]) -> Result<SinkEvent, CameraError> {
        let expected = width as usize * height as usize * 3;
        if pixels.len() != expected {
            return Err(CameraError::DisplayError(format!(
                "Frame is {} bytes, expected {} for {}x{}",
                pixels.len(),
                expected,
                width,
                height
            )));
        }

        // minifb wants 0x00RRGGBB words; repack the BGR bytes.
        self.shadow.clear();
        self.shadow.reserve(width as usize * height as usize);
        for px in pixels.chunks_exact(3) {
            let (b, g, r) = (px[0] as u32, px[1] as u32, px[2] as u32);
            self.shadow.push((r << 16) | (g << 8) | b);
        }

        let shadow = std::mem::take(&mut self.shadow);
        let window = self.ensure_window(width, height)?;
        let update = window
            .update_with_buffer(&shadow, width as usize, height as usize)
            .map_err(|e| CameraError::DisplayError(format!("Failed to update window: {}", e)));
        self.shadow = shadow;
        update?;

        let window = self.window.as_ref().expect("window exists after update");
        if !window.is_open() || window.is_key_down(Key::Q) || window.is_key_down(Key::Escape) {
            return Ok(SinkEvent::Quit);
        }
        Ok(SinkEvent::Continue)
    }
}
