//! cube-steps
//!
//! A sequence of incremental winit + wgpu snapshots, numbered 01, 02, 04, 06,
//! 07 and 08, that build up from a blank window to a textured spinning cube.
//! Each snapshot is deliberately self-contained: it owns its render targets,
//! pipeline, buffers and per-frame callback, and only the window/device
//! plumbing is shared. The interesting reading is the delta from one snapshot
//! to the next.
//!
//! High-level modules
//! - `app`: the winit event loop driving a single snapshot
//! - `context`: window surface plus GPU device/queue/configuration
//! - `snapshot`: the lifecycle seam every snapshot implements
//! - `steps`: the snapshots themselves, one module each
//! - `pipeline`: the one shared render-pipeline constructor
//! - `transform`: the projection and model-view matrices the later steps share
//! - `texture`: depth targets and decoded image uploads
//! - `renumber`: the snapshot-directory renumbering tool

pub mod app;
pub mod context;
pub mod pipeline;
pub mod renumber;
pub mod snapshot;
pub mod steps;
pub mod texture;
pub mod transform;
