use std::path::Path;

use anyhow::Context;
use log::debug;
use ort::{
    execution_providers::CPUExecutionProvider,
    session::{Session, builder::GraphOptimizationLevel},
};

/// Threads per session; the G2P models are small.
const INTRA_THREADS: usize = 2;

pub fn create_onnx_cpu_session<P: AsRef<Path>>(path: P) -> anyhow::Result<Session> {
    let path = path.as_ref();
    debug!("creating onnx session for {}", path.display());
    Session::builder()?
        .with_execution_providers([CPUExecutionProvider::default()
            .with_arena_allocator(true)
            .build()])?
        .with_optimization_level(GraphOptimizationLevel::Level3)?
        .with_intra_threads(INTRA_THREADS)?
        .commit_from_file(path)
        .with_context(|| format!("load onnx model {}", path.display()))
}
