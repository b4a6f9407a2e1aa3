//! The two transform matrices the later snapshots recompute every frame.
//!
//! The projection is an off-centre perspective frustum whose vertical extent
//! follows the surface aspect ratio; the model-view drifts the geometry
//! sideways on a sine wave while rotating it about the x axis. Both are
//! recomputed from scratch each callback, never cached.

use cgmath::{Matrix4, Rad, Vector3};

/// cgmath (like OpenGL) produces clip-space z in [-1, 1]; wgpu expects
/// [0, 1]. Multiplying by this remaps the range.
#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

/// Off-centre perspective projection for the current surface size.
///
/// The horizontal extent is fixed at [-2, 2] on the near plane and the
/// vertical extent scales with the aspect ratio, so resizing the window
/// stretches the view vertically rather than distorting the geometry.
/// Near and far planes sit at 4 and 10; everything the snapshots draw
/// lives around z = -7.
pub fn projection(width: u32, height: u32) -> Matrix4<f32> {
    let h = 4.0 * height as f32 / width as f32;
    OPENGL_TO_WGPU_MATRIX * cgmath::frustum(-2.0, 2.0, -h / 2.0, h / 2.0, 4.0, 10.0)
}

/// Model-view for the animated snapshots: rotate about x, then push the
/// geometry to z = -7 with a sideways drift.
pub fn model_view(drift: f32, angle: Rad<f32>) -> Matrix4<f32> {
    Matrix4::from_translation(Vector3::new(drift, 0.0, -7.0)) * Matrix4::from_angle_x(angle)
}
