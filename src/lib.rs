//! frameview: minimal industrial camera capture and preview utility
//!
//! This crate enumerates attached cameras, opens one, pulls frames in a
//! blocking loop, converts RGB to BGR, and presents them in a preview
//! window until the user quits or an external stop is requested.
//!
//! # Features
//! - Device enumeration and open-by-index through a vendor-SDK seam
//! - Blocking acquire-convert-present loop with a bounded per-frame wait
//! - Explicit run/stop contract via [`session::StopHandle`]
//! - Distinguishable timeout vs fatal capture results per iteration
//! - Scripted fakes for hardware-free testing
//!
//! # Usage
//! ```rust,no_run
//! use frameview::backend::NokhwaSdk;
//! use frameview::display::WindowSink;
//! use frameview::session::CameraSession;
//!
//! fn main() -> Result<(), frameview::CameraError> {
//!     frameview::init_logging();
//!     let sdk = NokhwaSdk::new();
//!     let mut session = CameraSession::initialize(&sdk, 0)?;
//!     let mut sink = WindowSink::new("frameview");
//!     let stats = session.run(&mut sink)?;
//!     log::info!("captured {} frames", stats.frames);
//!     Ok(())
//! }
//! ```

pub mod backend;
pub mod convert;
pub mod device;
pub mod display;
pub mod errors;
pub mod session;
pub mod testing;

// Re-exports for convenience
pub use device::{AcquisitionMode, CameraSdk, DeviceHandle, DeviceInfo, DeviceInterface};
pub use display::{FrameSink, SinkEvent, WindowSink};
pub use errors::CameraError;
pub use session::{CameraSession, CaptureStats, StopHandle};

/// Initialize logging for the capture utility
pub fn init_logging() {
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "frameview=info");
    }
    let _ = env_logger::try_init();
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

#[cfg(test)]
mod lib_tests {
    #[test]
    fn test_crate_metadata() {
        assert_eq!(super::NAME, "frameview");
        assert!(!super::VERSION.is_empty());
        assert!(!super::DESCRIPTION.is_empty());
    }

    #[test]
    fn test_init_logging_idempotent() {
        super::init_logging();
        super::init_logging();
    }
}
