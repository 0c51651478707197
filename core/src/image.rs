//! The thread-safe RGB radiance image (spec §3/§6).
//!
//! Grounded in the teacher's `film.rs` `AtomicFloat` (store an `f32`'s bit
//! pattern in an `AtomicU32`) — the one piece of that file this crate
//! needs, since the rest of `Film` (reconstruction filters, splatting,
//! crop windows) belongs to the image-file-I/O/tone-mapping layer the spec
//! puts outside the core.

use std::sync::atomic::{AtomicU32, Ordering};

use crate::spectrum::Spectrum;

#[derive(Default)]
struct AtomicFloat {
    bits: AtomicU32,
}

impl AtomicFloat {
    fn new(v: f32) -> AtomicFloat {
        AtomicFloat {
            bits: AtomicU32::new(v.to_bits()),
        }
    }

    fn load(&self) -> f32 {
        f32::from_bits(self.bits.load(Ordering::Relaxed))
    }

    fn store(&self, v: f32) {
        self.bits.store(v.to_bits(), Ordering::Relaxed);
    }

    /// Non-atomic read-add-write — correct only when the caller guarantees
    /// no other thread touches this slot concurrently. Spec §5 establishes
    /// exactly that: each pixel index is written by exactly one worker per
    /// accumulation stage invocation, so `increment` needs no CAS loop.
    fn add(&self, delta: f32) {
        self.store(self.load() + delta);
    }
}

/// A `w x h` grid of linear RGB32F radiance values.
pub struct Image {
    width: u32,
    height: u32,
    pixels: Vec<[AtomicFloat; 3]>,
}

impl Image {
    pub fn new(width: u32, height: u32) -> Image {
        let n = (width as usize) * (height as usize);
        let mut pixels = Vec::with_capacity(n);
        pixels.resize_with(n, || [AtomicFloat::new(0.0), AtomicFloat::new(0.0), AtomicFloat::new(0.0)]);
        Image { width, height, pixels }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    fn index(&self, px: (u32, u32)) -> usize {
        (px.1 as usize) * (self.width as usize) + (px.0 as usize)
    }

    pub fn get(&self, px: (u32, u32)) -> Spectrum {
        let i = self.index(px);
        Spectrum::rgb(self.pixels[i][0].load(), self.pixels[i][1].load(), self.pixels[i][2].load())
    }

    pub fn set(&self, px: (u32, u32), v: Spectrum) {
        let i = self.index(px);
        self.pixels[i][0].store(v.r);
        self.pixels[i][1].store(v.g);
        self.pixels[i][2].store(v.b);
    }

    /// Additive accumulation. Non-finite `v` is a logic error in a caller
    /// — accumulation-stage callers (§4.6) are responsible for discarding
    /// non-finite contributions before calling this (spec §3's image
    /// invariant: "producers guard").
    pub fn increment(&self, px: (u32, u32), v: Spectrum) {
        debug_assert!(v.is_finite());
        let i = self.index(px);
        self.pixels[i][0].add(v.r);
        self.pixels[i][1].add(v.g);
        self.pixels[i][2].add(v.b);
    }

    pub fn fill(&mut self, v: Spectrum) {
        for p in self.pixels.iter_mut() {
            p[0].store(v.r);
            p[1].store(v.g);
            p[2].store(v.b);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn increment_accumulates() {
        let img = Image::new(2, 2);
        img.increment((0, 0), Spectrum::grey(0.5));
        img.increment((0, 0), Spectrum::grey(0.25));
        assert_eq!(img.get((0, 0)), Spectrum::grey(0.75));
        assert_eq!(img.get((1, 1)), Spectrum::black());
    }

    #[test]
    fn fill_sets_every_pixel() {
        let mut img = Image::new(2, 2);
        img.fill(Spectrum::grey(0.5));
        for y in 0..2 {
            for x in 0..2 {
                assert_eq!(img.get((x, y)), Spectrum::grey(0.5));
            }
        }
    }
}
