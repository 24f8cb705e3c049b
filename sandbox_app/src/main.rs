//! OpenGL sandbox demo
//!
//! Opens a window, loads a lit cube and hands control to the free-fly camera.
//! Settings are read from `sandbox.toml` in the working directory when present.

mod scene;

use std::path::Path;
use std::process::ExitCode;

use sandbox_engine::foundation::logging;
use sandbox_engine::prelude::*;

use crate::scene::DemoScene;

const CONFIG_PATH: &str = "sandbox.toml";

fn main() -> ExitCode {
    logging::init();
    log::info!("Starting OpenGL sandbox");

    match run() {
        Ok(outcome) if outcome.is_success() => {
            log::info!(
                "Sandbox closed after {} frames in {:.1}s",
                outcome.frames,
                outcome.elapsed
            );
            ExitCode::SUCCESS
        }
        Ok(outcome) => {
            log::error!("Sandbox stopped early: {:?}", outcome.exit);
            ExitCode::FAILURE
        }
        Err(e) => {
            log::error!("Sandbox failed: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<LoopOutcome, SandboxError> {
    let config = SandboxConfig::load_or_default(CONFIG_PATH)?;
    let resources = Path::new(env!("CARGO_MANIFEST_DIR")).join("resources");

    let mut window = Window::new(&config.window)?;
    let presenter = window.presenter();

    let mut scene = DemoScene::new(resources);
    let outcome = RenderLoop::new(&config).run(&mut scene, presenter, &mut window)?;

    if let Some(error) = scene.take_error() {
        return Err(error);
    }
    Ok(outcome)
}
