//! Per-render diagnostics counters.
//!
//! The teacher's `stats.rs` accumulates thread-local counters into a single
//! process-wide `StatAccumulator` via a registry of reporter closures, which
//! fits its long-lived per-thread tile workers where exactly one render runs
//! at a time. This crate's `PathTracer::render` is a plain library call that
//! nothing stops a caller from invoking concurrently on two `PathTracer`s (or
//! in two test threads) — so counters live on a [`Counters`] instance owned
//! by one `render` call, not behind module-level statics, and are plain
//! `AtomicU64` fields only because the stages' rayon workers within *that*
//! one call still need to increment them from multiple threads.

use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct RenderStats {
    pub primary_rays_traced: u64,
    pub shadow_rays_traced: u64,
    pub zero_radiance_paths: u64,
    pub numeric_hazards_discarded: u64,
    pub elapsed_secs: f64,
}

/// Counters for one `render` call. Created fresh at the top of `render` and
/// threaded through the stages by reference; never shared across calls.
#[derive(Default)]
pub struct Counters {
    primary_rays: AtomicU64,
    shadow_rays: AtomicU64,
    zero_radiance_paths: AtomicU64,
    numeric_hazards: AtomicU64,
}

impl Counters {
    pub fn new() -> Counters {
        Counters::default()
    }

    pub fn record_primary_ray(&self) {
        self.primary_rays.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_shadow_ray(&self) {
        self.shadow_rays.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_zero_radiance_path(&self) {
        self.zero_radiance_paths.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_numeric_hazard(&self) {
        self.numeric_hazards.fetch_add(1, Ordering::Relaxed);
        log::warn!("discarded a non-finite radiance contribution");
    }

    pub fn snapshot(&self, elapsed_secs: f64) -> RenderStats {
        RenderStats {
            primary_rays_traced: self.primary_rays.load(Ordering::Relaxed),
            shadow_rays_traced: self.shadow_rays.load(Ordering::Relaxed),
            zero_radiance_paths: self.zero_radiance_paths.load(Ordering::Relaxed),
            numeric_hazards_discarded: self.numeric_hazards.load(Ordering::Relaxed),
            elapsed_secs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_accumulate_independently_per_instance() {
        let a = Counters::new();
        let b = Counters::new();
        a.record_primary_ray();
        a.record_primary_ray();
        b.record_shadow_ray();

        let snap_a = a.snapshot(0.0);
        let snap_b = b.snapshot(0.0);
        assert_eq!(snap_a.primary_rays_traced, 2);
        assert_eq!(snap_a.shadow_rays_traced, 0);
        assert_eq!(snap_b.primary_rays_traced, 0);
        assert_eq!(snap_b.shadow_rays_traced, 1);
    }

    #[test]
    fn numeric_hazard_is_logged_and_counted() {
        let c = Counters::new();
        c.record_numeric_hazard();
        assert_eq!(c.snapshot(0.0).numeric_hazards_discarded, 1);
    }
}
