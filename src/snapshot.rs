//! The lifecycle seam every snapshot implements.
//!
//! A snapshot acquires all of its GPU resources when it is constructed,
//! uploads its fixed vertex data once, and then records one frame per
//! callback. There is intentionally nothing else here: no events, no
//! inter-snapshot state, no resource lifecycle beyond construct and drop.

use instant::Duration;

use crate::context::Gpu;

pub trait Snapshot {
    /// Called after the surface was reconfigured. Snapshots that own
    /// size-dependent targets (a depth texture) recreate them here.
    fn resize(&mut self, _gpu: &Gpu) {}

    /// Record one frame into `encoder`, targeting `view`.
    ///
    /// `dt` is the measured time since the previous frame. Snapshots that
    /// animate derive their rotation from it rather than assuming a refresh
    /// rate.
    fn frame(
        &mut self,
        gpu: &Gpu,
        view: &wgpu::TextureView,
        encoder: &mut wgpu::CommandEncoder,
        dt: Duration,
    );
}

/// Constructor for a boxed snapshot. Construction may fail (shader module or
/// asset loading), so the window is only shown once this returns.
pub type SnapshotConstructor = fn(&Gpu) -> anyhow::Result<Box<dyn Snapshot>>;
