// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! vitrine: desktop glTF viewer (wgpu 27, winit 0.30). Main wires App into winit.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;
use winit::event_loop::EventLoop;

mod app;
mod cli;
mod gpu;
mod host;
mod input;
mod perf;
mod surface;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .without_time()
        .init();

    let args = cli::Args::parse();
    // Asset loads run here; the UI stays on the winit thread.
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .thread_name("vitrine-load")
        .enable_all()
        .build()?;

    let event_loop = EventLoop::new()?;
    let mut app = app::App::new(&args, runtime.handle().clone())?;
    event_loop.run_app(&mut app)?;
    Ok(())
}
