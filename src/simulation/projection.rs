//! Mapping between the rendering surface and world coordinates
//!
//! Pixels have their origin in the top-left corner of the canvas; the world
//! is centred on the origin. `world = (pixel - extent / 2) * virtual_scale`.

use super::states::{NVec2, World};
use crate::error::SimError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub pixel_width: u32,
    pub pixel_height: u32,
    pub virtual_scale: u32, // world units per pixel
}

impl Projection {
    pub fn new(pixel_width: u32, pixel_height: u32, virtual_scale: u32) -> Result<Self, SimError> {
        if pixel_width == 0 || pixel_height == 0 {
            return Err(SimError::invalid(format!(
                "canvas size must be positive, got {pixel_width}x{pixel_height}"
            )));
        }
        if virtual_scale == 0 {
            return Err(SimError::invalid("virtual_scale must be at least 1"));
        }
        Ok(Self {
            pixel_width,
            pixel_height,
            virtual_scale,
        })
    }

    /// World covering the whole canvas
    pub fn world(&self) -> Result<World, SimError> {
        let width = self.pixel_width.checked_mul(self.virtual_scale);
        let height = self.pixel_height.checked_mul(self.virtual_scale);
        match (width, height) {
            (Some(w), Some(h)) => World::new(w, h),
            _ => Err(SimError::invalid(format!(
                "world size {}x{} * {} overflows",
                self.pixel_width, self.pixel_height, self.virtual_scale
            ))),
        }
    }

    pub fn scale(&self) -> f64 {
        self.virtual_scale as f64
    }

    /// Top-left pixel coordinates of a world position
    pub fn world_to_pixel(&self, p: &NVec2) -> (f64, f64) {
        (
            self.pixel_width as f64 / 2.0 + p.x / self.scale(),
            self.pixel_height as f64 / 2.0 + p.y / self.scale(),
        )
    }

    /// Rounded pixel, as used by raster sinks
    pub fn world_to_pixel_rounded(&self, p: &NVec2) -> (i64, i64) {
        let (x, y) = self.world_to_pixel(p);
        (x.round() as i64, y.round() as i64)
    }

    /// World position under a pixel, not yet wrapped
    pub fn pixel_to_world(&self, x: f64, y: f64) -> NVec2 {
        NVec2::new(
            (x - self.pixel_width as f64 / 2.0) * self.scale(),
            (y - self.pixel_height as f64 / 2.0) * self.scale(),
        )
    }
}
