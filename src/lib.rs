#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Section Renderer
//!
//! The CPU side of a voxel renderer: it decides which sections of a bounded
//! voxel world can be seen, keeps their meshes up to date under a per-frame
//! time budget, and hands the GPU layer ordered draw lists and upload requests.
//!
//! ## Key Modules
//!
//! * `engine_state` - The world, its light, render caches and the frame traversal
//! * `config` - JSON engine configuration
//! * `error` - The crate error type
//!
//! ## Architecture
//!
//! The engine follows a modular architecture with clear separation between:
//! * Voxel data (sections, blocks, sky light)
//! * Visibility (per-section portals and the frustum-bounded traversal)
//! * Geometry (shape-driven meshing and the per-section caches)
//!
//! ## Usage
//!
//! ```no_run
//! // Native demo: generates terrain, flies a camera and edits blocks.
//! fn main() {
//!     section_renderer::run();
//! }
//! ```
//!
//! ## Performance Considerations
//!
//! * Dense section storage with O(1) block and section lookups
//! * Cached face connectivity limits the traversal to sections that can be seen
//! * Mesh regeneration is budgeted per frame, stale meshes keep drawing
//! * Scratch buffers are reused across frames

use cgmath::{Deg, Point3};
use log::info;

use config::EngineConfig;
use engine_state::{
    camera_state::{Camera, Projection},
    voxels::block::{ids, AIR},
    EngineState,
};

pub mod config;
pub mod engine_state;
pub mod error;

/// Number of frames the demo renders.
const DEMO_FRAMES: usize = 240;

/// Block edits the demo applies per frame.
const DEMO_EDITS_PER_FRAME: usize = 4;

/// Runs the native demo.
///
/// The first command line argument, if present, names a JSON configuration
/// file. Logging is configured through `RUST_LOG`.
pub fn run() {
    let mut log_builder = env_logger::Builder::new();
    log_builder
        .target(env_logger::Target::Stdout)
        .parse_env("RUST_LOG")
        .init();

    info!("Logger initialized");

    if let Err(error) = run_demo() {
        log::error!("Demo failed: {error}");
    }
}

fn run_demo() -> error::Result<()> {
    let config = match std::env::args().nth(1) {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };

    let mut state = EngineState::from_config(&config)?;
    let size = state.world().size();
    let center = Point3::new(size.x as f32 / 2.0, size.y as f32 * 0.75, size.z as f32 / 2.0);

    let mut camera = Camera::new(center, Deg(0.0), Deg(-15.0));
    let projection = Projection::new(1280, 720, Deg(70.0), 0.1, 1000.0);
    let mut rng = fastrand::Rng::with_seed(config.world.seed as u64);
    let palette = [AIR, ids::STONE, ids::GLASS, ids::WATER, ids::STONE_SLAB];

    let mut total_meshed = 0;
    for frame in 0..DEMO_FRAMES {
        for _ in 0..DEMO_EDITS_PER_FRAME {
            let position = Point3::new(
                rng.i32(0..size.x),
                rng.i32(0..size.y),
                rng.i32(0..size.z),
            );
            state.set_block(position, palette[rng.usize(0..palette.len())])?;
        }

        camera.rotate(Deg(1.5), Deg(0.0));
        camera.move_horizontal(0.25, 0.0);

        let list = state.render_frame(&camera, &projection)?;
        total_meshed += list.stats.meshed;

        if frame % 60 == 0 {
            info!(
                "Frame {}: {} opaque, {} translucent, {} uploads, {} deferred",
                frame,
                list.opaque.len(),
                list.translucent.len(),
                list.uploads.len(),
                list.stats.deferred
            );
        }
    }

    info!(
        "Rendered {} frames, meshed {} sections, {} still outdated",
        DEMO_FRAMES,
        total_meshed,
        state.render_data().outdated_sections().count()
    );

    Ok(())
}
