//! fontpak - Localization font repack pipeline.
//!
//! This binary sequences the extract/stage/generate/verify/repack workflow
//! around the external archive and rasterizer tools, mapping each stage's
//! result to a stage-specific process exit code.

use std::process;

#[tokio::main]
async fn main() {
    // Diagnostics are printed progressively as stages execute.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let exit_code = match fontpak::cli::run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    };

    process::exit(exit_code);
}
