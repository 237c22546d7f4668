// Argumentless capture entry point: open camera 0 and preview it until the
// user presses q/Escape, closes the window, or sends Ctrl-C.

use frameview::backend::NokhwaSdk;
use frameview::display::WindowSink;
use frameview::session::CameraSession;

const CAMERA_INDEX: usize = 0;

fn main() {
    frameview::init_logging();

    let sdk = NokhwaSdk::new();
    let mut session = match CameraSession::initialize(&sdk, CAMERA_INDEX) {
        Ok(session) => session,
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    };

    let stop = session.stop_handle();
    if let Err(e) = ctrlc::set_handler(move || stop.stop()) {
        log::warn!("Failed to install Ctrl-C handler: {}", e);
    }

    let mut sink = WindowSink::new("frameview");
    match session.run(&mut sink) {
        Ok(stats) => {
            log::info!(
                "Capture finished: {} frames shown, {} frame waits timed out",
                stats.frames,
                stats.timeouts
            );
        }
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    }
}
