//! Tests for the camera session lifecycle, run with scripted fakes instead
//! of hardware.

use frameview::errors::CameraError;
use frameview::session::CameraSession;
use frameview::testing::{CountingSink, FakeSdk, QuitAfterSink, ScriptedGrab, SdkCall};
use frameview::AcquisitionMode;
use std::time::Duration;

#[test]
fn test_initialize_with_zero_devices_fails() {
    let sdk = FakeSdk::new(0, (640, 480));
    let result = CameraSession::initialize(&sdk, 0);
    assert!(matches!(result, Err(CameraError::InitializationError(_))));
}

#[test]
fn test_initialize_with_out_of_range_index_fails() {
    let sdk = FakeSdk::new(2, (640, 480));
    let result = CameraSession::initialize(&sdk, 2);
    assert!(matches!(result, Err(CameraError::InitializationError(_))));
    // The device was never opened, let alone streamed.
    assert_eq!(sdk.calls(), vec![SdkCall::Enumerate]);
}

#[test]
fn test_initialize_allocates_exact_buffer() {
    let sdk = FakeSdk::new(1, (1920, 1080));
    let session = CameraSession::initialize(&sdk, 0).unwrap();
    assert_eq!(session.width(), 1920);
    assert_eq!(session.height(), 1080);
    assert_eq!(session.buffer_len(), 1920 * 1080 * 3);
}

#[test]
fn test_initialize_forces_continuous_acquisition() {
    let sdk = FakeSdk::new(1, (640, 480));
    let _session = CameraSession::initialize(&sdk, 0).unwrap();
    assert!(sdk
        .calls()
        .contains(&SdkCall::SetAcquisitionMode(AcquisitionMode::Continuous)));
}

#[test]
fn test_stop_before_run_is_noop() {
    let sdk = FakeSdk::new(1, (64, 48));
    sdk.push_frames(1);
    let mut session = CameraSession::initialize(&sdk, 0).unwrap();

    session.stop();
    assert!(!session.is_capturing());

    // A later run is unaffected by the earlier no-op stop.
    let mut sink = QuitAfterSink::new(1);
    let stats = session.run(&mut sink).unwrap();
    assert_eq!(stats.frames, 1);
}

#[test]
fn test_drop_without_run_does_not_stop_stream() {
    let sdk = FakeSdk::new(1, (64, 48));
    let session = CameraSession::initialize(&sdk, 0).unwrap();
    drop(session);

    let calls = sdk.calls();
    assert!(!calls.contains(&SdkCall::StartGrabbing));
    assert!(!calls.contains(&SdkCall::StopGrabbing));
}

#[test]
fn test_run_presents_frames_and_stops_on_quit_event() {
    let sdk = FakeSdk::new(1, (32, 24));
    sdk.push_frames(3);
    let mut session = CameraSession::initialize(&sdk, 0).unwrap();

    let mut sink = QuitAfterSink::new(3);
    let stats = session.run(&mut sink).unwrap();

    assert_eq!(stats.frames, 3);
    assert_eq!(sink.presented, 3);
    assert!(!session.is_capturing());

    let calls = sdk.calls();
    assert!(calls.contains(&SdkCall::StartGrabbing));
    assert!(calls.contains(&SdkCall::StopGrabbing));
}

#[test]
fn test_run_counts_timeouts_and_continues() {
    let sdk = FakeSdk::new(1, (32, 24));
    sdk.push_grab(ScriptedGrab::Timeout);
    sdk.push_grab(ScriptedGrab::Timeout);
    sdk.push_frames(1);
    let mut session = CameraSession::initialize(&sdk, 0).unwrap();

    let mut sink = QuitAfterSink::new(1);
    let stats = session.run(&mut sink).unwrap();

    assert_eq!(stats.frames, 1);
    assert_eq!(stats.timeouts, 2);
}

#[test]
fn test_run_surfaces_fatal_grab_error() {
    let sdk = FakeSdk::new(1, (32, 24));
    sdk.push_grab(ScriptedGrab::Fatal("sensor unplugged".to_string()));
    let mut session = CameraSession::initialize(&sdk, 0).unwrap();

    let mut sink = CountingSink::default();
    let result = session.run(&mut sink);

    assert!(matches!(result, Err(CameraError::CaptureError(_))));
    assert_eq!(sink.presented, 0);
    // The stream is still shut down on the error path.
    assert!(sdk.calls().contains(&SdkCall::StopGrabbing));
    assert!(!session.is_capturing());
}

#[test]
fn test_run_rejects_mismatched_frame_length() {
    let sdk = FakeSdk::new(1, (32, 24));
    // A frame sized for a different resolution than the session buffer.
    sdk.push_grab(ScriptedGrab::Frame(vec![0u8; 64 * 48 * 3]));
    let mut session = CameraSession::initialize(&sdk, 0).unwrap();

    let mut sink = CountingSink::default();
    let result = session.run(&mut sink);

    assert!(matches!(result, Err(CameraError::StreamError(_))));
    assert_eq!(sink.presented, 0);
}

#[test]
fn test_stop_handle_unblocks_running_capture() {
    let sdk = FakeSdk::new(1, (32, 24));
    // Empty script: the fake camera idles, timing out every wait.
    let mut session = CameraSession::initialize(&sdk, 0).unwrap();
    let stop = session.stop_handle();

    let stopper = std::thread::spawn(move || {
        std::thread::sleep(Duration::from_millis(50));
        stop.stop();
    });

    let mut sink = CountingSink::default();
    let stats = session.run(&mut sink).unwrap();

    stopper.join().unwrap();
    assert_eq!(stats.frames, 0);
    assert!(!session.is_capturing());
}

#[test]
fn test_run_is_reentrant_after_quit() {
    let sdk = FakeSdk::new(1, (16, 16));
    sdk.push_frames(2);
    let mut session = CameraSession::initialize(&sdk, 0).unwrap();

    let stats = session.run(&mut QuitAfterSink::new(1)).unwrap();
    assert_eq!(stats.frames, 1);

    let stats = session.run(&mut QuitAfterSink::new(1)).unwrap();
    assert_eq!(stats.frames, 1);
}

#[test]
fn test_presented_pixels_are_bgr() {
    struct CapturePixels {
        first: Option<Vec<u8>>,
    }
    impl frameview::FrameSink for CapturePixels {
        fn present(
            &mut self,
            _width: u32,
            _height: u32,
            pixels: &[u8],
        ) -> Result<frameview::SinkEvent, CameraError> {
            self.first = Some(pixels.to_vec());
            Ok(frameview::SinkEvent::Quit)
        }
    }

    let sdk = FakeSdk::new(1, (2, 1));
    // One red-ish, one blue-ish pixel in RGB order.
    sdk.push_grab(ScriptedGrab::Frame(vec![200, 10, 20, 30, 40, 250]));
    let mut session = CameraSession::initialize(&sdk, 0).unwrap();

    let mut sink = CapturePixels { first: None };
    session.run(&mut sink).unwrap();

    assert_eq!(sink.first.unwrap(), vec![20, 10, 200, 250, 40, 30]);
}
