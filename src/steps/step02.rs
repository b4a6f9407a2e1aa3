//! Snapshot 02: an animated clear colour.
//!
//! The only state in the whole snapshot is three colour channels advanced
//! once per frame. Red climbs in steps of 5/255; when a channel overflows it
//! resets and carries into the next one, so the background walks through the
//! colour cube one channel at a time.

use instant::Duration;

use crate::{context::Gpu, snapshot::Snapshot};

const INCREMENT: f32 = 5.0 / 255.0;

#[derive(Debug, Default, PartialEq)]
struct Channels {
    red: f32,
    green: f32,
    blue: f32,
}

impl Channels {
    /// Advance one frame, carrying overflow red into green into blue.
    fn advance(&mut self) {
        self.red += INCREMENT;

        if self.red > 1.0 {
            self.red = 0.0;
            self.green += INCREMENT;

            if self.green > 1.0 {
                self.green = 0.0;
                self.blue += INCREMENT;

                if self.blue > 1.0 {
                    self.red = 0.0;
                    self.green = 0.0;
                    self.blue = 0.0;
                }
            }
        }
    }

    fn as_colour(&self) -> wgpu::Color {
        wgpu::Color {
            r: self.red as f64,
            g: self.green as f64,
            b: self.blue as f64,
            a: 1.0,
        }
    }
}

pub struct ColourCycle {
    channels: Channels,
}

pub fn build(_gpu: &Gpu) -> anyhow::Result<Box<dyn Snapshot>> {
    Ok(Box::new(ColourCycle {
        channels: Channels::default(),
    }))
}

impl Snapshot for ColourCycle {
    fn frame(
        &mut self,
        _gpu: &Gpu,
        view: &wgpu::TextureView,
        encoder: &mut wgpu::CommandEncoder,
        _dt: Duration,
    ) {
        self.channels.advance();

        encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Clear Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(self.channels.as_colour()),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            occlusion_query_set: None,
            timestamp_writes: None,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channels_start_black() {
        assert_eq!(Channels::default(), Channels { red: 0.0, green: 0.0, blue: 0.0 });
    }

    #[test]
    fn red_climbs_first() {
        let mut c = Channels::default();
        c.advance();
        c.advance();
        assert!((c.red - 2.0 * INCREMENT).abs() < 1e-6);
        assert_eq!(c.green, 0.0);
        assert_eq!(c.blue, 0.0);
    }

    #[test]
    fn red_overflow_carries_into_green() {
        let mut c = Channels::default();
        let mut frames = 0;
        while c.green == 0.0 {
            c.advance();
            frames += 1;
            assert!(frames < 60, "red never carried into green");
        }
        // Red needs a hair over 1.0 before it wraps, which takes at least
        // 51 frames at 5/255 a step.
        assert!(frames >= 51, "red carried after only {frames} frames");
        assert_eq!(c.red, 0.0);
        assert!((c.green - INCREMENT).abs() < 1e-6);
        assert_eq!(c.blue, 0.0);
    }

    #[test]
    fn channels_stay_renderable() {
        let mut c = Channels::default();
        for _ in 0..10_000 {
            c.advance();
            for v in [c.red, c.green, c.blue] {
                assert!((0.0..=1.0 + INCREMENT).contains(&v));
            }
            let colour = c.as_colour();
            assert!(colour.r <= 1.0 + f64::from(INCREMENT));
            assert_eq!(colour.a, 1.0);
        }
    }

    #[test]
    fn full_cycle_returns_to_black() {
        let mut c = Channels::default();
        // Each channel wraps after 52 overflows of the one below it.
        let mut wrapped = false;
        for _ in 0..(60 * 60 * 60) {
            c.advance();
            if c == Channels::default() {
                wrapped = true;
                break;
            }
        }
        assert!(wrapped, "the cycle never returned to black");
    }
}
