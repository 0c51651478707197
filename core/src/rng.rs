//! PCG32, used both as the engine's general-purpose RNG type and, via
//! [`stage_seed`], as the counter-based seeding policy spec §9 requires:
//! "seeds must be a pure function of (engine seed, pixel index, sample
//! index, stage)". A counter-based generator reseeded per call site gives
//! that for free — no per-worker state to carry or synchronize, and the
//! same four integers always produce the same stream regardless of which
//! thread evaluates them.

use std::num::Wrapping;

/// Smallest representable `f32` strictly less than 1, used to keep
/// `uniform_f32` results inside `[0, 1)` even after rounding.
pub const ONE_MINUS_EPSILON: f32 = 0.99999994f32;

const PCG32_DEFAULT_STATE: Wrapping<u64> = Wrapping(0x853c49e6748fea9b);
const PCG32_DEFAULT_STREAM: Wrapping<u64> = Wrapping(0xda3e39cb94b95bdb);
const PCG32_MULT: Wrapping<u64> = Wrapping(0x5851f42d4c957f2d);

/// Stage tags used to decorrelate the several independent random draws made
/// per (pixel, sample): camera jitter, light selection, shadow-ray epsilon
/// jitter (future use), and hemisphere scattering. Each tag mixes into the
/// RNG stream selector so that, e.g., light-selection draws never alias
/// scattering draws even for the same pixel and sample index.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u64)]
pub enum Stage {
    PrimaryRay = 0,
    LightSelect = 1,
    Scatter = 2,
}

#[derive(Copy, Clone)]
pub struct Rng {
    state: Wrapping<u64>,
    inc: Wrapping<u64>,
}

impl Rng {
    pub fn new() -> Rng {
        Rng {
            state: PCG32_DEFAULT_STATE,
            inc: PCG32_DEFAULT_STREAM,
        }
    }

    /// Seeds a fresh generator for one (sequence, stream) pair, PCG's
    /// standard two-parameter seeding.
    pub fn from_seed(sequence: u64, stream: u64) -> Rng {
        let mut rng = Rng {
            state: Wrapping(0),
            inc: Wrapping((stream << 1) | 1),
        };
        let _ = rng.uniform_u32();
        rng.state += Wrapping(sequence);
        let _ = rng.uniform_u32();
        rng
    }

    pub fn uniform_u32(&mut self) -> u32 {
        let oldstate = self.state;
        self.state = oldstate * PCG32_MULT + self.inc;
        let xorshifted = Wrapping((((oldstate >> 18) ^ oldstate) >> 27).0 as u32);
        let rot = (oldstate >> 59).0 as u32;
        (xorshifted.0 >> rot) | (xorshifted.0 << ((!Wrapping(rot) + Wrapping(1)).0 & 31))
    }

    pub fn uniform_u32_bounded(&mut self, b: u32) -> u32 {
        let threshold = (!b + 1) & b;
        loop {
            let r = self.uniform_u32();
            if r >= threshold {
                return r % b;
            }
        }
    }

    pub fn uniform_f32(&mut self) -> f32 {
        (self.uniform_u32() as f32 * 2.3283064365386963e-10).min(ONE_MINUS_EPSILON)
    }

    pub fn uniform_point2(&mut self) -> (f32, f32) {
        (self.uniform_f32(), self.uniform_f32())
    }
}

impl Default for Rng {
    fn default() -> Rng {
        Rng::new()
    }
}

/// Builds a counter-based stream identity from `(engine_seed, pixel_index,
/// sample_index, bounce, stage)` and returns a freshly-seeded [`Rng`] for it —
/// the policy spec §9 asks an implementation to fix and document. Mixing the
/// five integers with distinct odd multipliers before folding them into
/// PCG's 64-bit sequence/stream pair keeps nearby pixels, samples or bounces
/// from sharing a stream, which plain concatenation would not guarantee once
/// any field exceeds 32 bits. `bounce` (the `k` in spec §4.1's loop) must be
/// included or every vertex of a path reseeds to the same stream, perfectly
/// correlating scatter and light-selection draws across depth.
pub fn stage_seed(engine_seed: u64, pixel_index: u64, sample_index: u64, bounce: u64, stage: Stage) -> Rng {
    let mixed = engine_seed
        .wrapping_mul(0x9E3779B97F4A7C15)
        ^ pixel_index.wrapping_mul(0xBF58476D1CE4E5B9)
        ^ sample_index.wrapping_mul(0x94D049BB133111EB)
        ^ bounce.wrapping_mul(0xC2B2AE3D27D4EB4F)
        ^ (stage as u64).wrapping_mul(0xD6E8FEB86659FD93);
    let sequence = splitmix64(mixed);
    let stream = splitmix64(mixed ^ 0xA5A5A5A5A5A5A5A5);
    Rng::from_seed(sequence, stream)
}

/// Avalanches a 64-bit integer so adjacent `mixed` values above produce
/// uncorrelated sequence/stream pairs.
fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E3779B97F4A7C15);
    let mut z = x;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
    z ^ (z >> 31)
}
