//! # Section Renderer Demo Entry Point
//!
//! This is the main entry point for the native demo. It simply calls into the
//! library's `run()` function.
//!
//! ## Usage
//!
//! ```bash
//! RUST_LOG=info cargo run --release -- [config.json]
//! ```

fn main() {
    section_renderer::run();
}
