//! # Fractional-Sample Interpolation
//!
//! A vibrato never reads the delay line at a whole-sample position: the
//! LFO moves the read head continuously, so the position usually falls
//! between two stored samples. The interpolation kernel decides how the
//! value in between is reconstructed.
//!
//! | Kernel  | Taps | Character |
//! |---------|------|-----------|
//! | None    | 1    | Snaps to the nearest sample. Cheapest; audible grit. |
//! | Linear  | 2    | Straight line between neighbours. Slight treble loss. |
//! | Cubic   | 4    | Catmull-Rom spline. Smoothest, passes through every sample. |
//!
//! All kernels treat the slice as a ring: index `len` is index `0`, so
//! the output stays continuous when the read head crosses the seam of the
//! circular buffer.

use nih_plug::prelude::Enum;
use serde::{Deserialize, Serialize};

/// The read kernel. Exposed to the host as an `EnumParam`.
#[derive(Enum, Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Interpolation {
    #[id = "none"]
    #[name = "None"]
    NearestNeighbour,

    #[default]
    #[id = "linear"]
    Linear,

    #[id = "cubic"]
    Cubic,
}

impl Interpolation {
    pub const ALL: [Interpolation; 3] = [
        Interpolation::NearestNeighbour,
        Interpolation::Linear,
        Interpolation::Cubic,
    ];
}

/// Read `samples` at a fractional `position`, treating the slice as
/// circular.
///
/// `position` is an index into `samples`; the delay line already wraps
/// it into `[0, len)`, but any finite value is accepted and wrapped here
/// too. `samples` must not be empty.
#[inline]
pub fn interpolate(samples: &[f32], position: f32, kind: Interpolation) -> f32 {
    let len = samples.len();
    let position = position.rem_euclid(len as f32);

    match kind {
        Interpolation::NearestNeighbour => {
            // `+ 0.5` then floor rounds half up. The `% len` folds a
            // position just below `len` back onto index 0.
            let nearest = (position + 0.5).floor() as usize % len;
            samples[nearest]
        }
        Interpolation::Linear => {
            let (i0, frac) = split(position, len);
            let i1 = (i0 + 1) % len;

            samples[i0] * (1.0 - frac) + samples[i1] * frac
        }
        Interpolation::Cubic => {
            let (i0, frac) = split(position, len);
            let im1 = (i0 + len - 1) % len;
            let i1 = (i0 + 1) % len;
            let i2 = (i0 + 2) % len;

            catmull_rom(samples[im1], samples[i0], samples[i1], samples[i2], frac)
        }
    }
}

/// Split a wrapped position into its integer index and fractional part.
#[inline]
fn split(position: f32, len: usize) -> (usize, f32) {
    let floor = position.floor();
    ((floor as usize) % len, position - floor)
}

/// 4-point Catmull-Rom spline through `x0` (t = 0) and `x1` (t = 1).
///
/// The tangent at each of the two inner points is half the difference
/// of its neighbours, which gives a curve that passes exactly through the
/// stored samples:
///
/// ```text
/// c0 = x0
/// c1 = (x1 - xm1) / 2
/// c2 = xm1 - 5/2·x0 + 2·x1 - x2/2
/// c3 = (x2 - xm1) / 2 + 3/2·(x0 - x1)
/// y  = ((c3·t + c2)·t + c1)·t + c0
/// ```
#[inline]
fn catmull_rom(xm1: f32, x0: f32, x1: f32, x2: f32, t: f32) -> f32 {
    let c0 = x0;
    let c1 = 0.5 * (x1 - xm1);
    let c2 = xm1 - 2.5 * x0 + 2.0 * x1 - 0.5 * x2;
    let c3 = 0.5 * (x2 - xm1) + 1.5 * (x0 - x1);

    ((c3 * t + c2) * t + c1) * t + c0
}
