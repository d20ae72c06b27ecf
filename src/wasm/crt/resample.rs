//! Adaptive vertical resampler for non-progressive sources.
//!
//! Reconstructs a continuous vertical signal from discrete rows with a
//! Gaussian kernel biased into negative lobes (unsharp masking), then bounds
//! the overshoot against the local min/max envelope.

use super::config::CrtConfig;
use super::frame::SourceFrame;

// Below this the kernel is degenerate and the center row is used as-is.
const MIN_WEIGHT_SUM: f32 = 1e-4;

/// Per-configuration kernel state; invariant across pixels.
pub struct ResampleKernel {
    /// Window half-width in rows, derived from sigma.
    pub half: i32,
    /// Extent of the inner min/max envelope window.
    pub inner: f32,
    inv_two_sigma2: f32,
}

impl ResampleKernel {
    pub fn new(cfg: &CrtConfig) -> Self {
        let sigma = cfg.res_sigma.max(1e-3);
        let half = (sigma * 3.0).ceil().max(1.0) as i32;
        let extent = half as f32 + 1.0;

        Self {
            half,
            inner: extent * (2.0 / 3.0),
            inv_two_sigma2: 1.0 / (2.0 * sigma * sigma),
        }
    }
}

/// Resample the source column at `u` around fractional row position `row_f`.
///
/// Tap weights sum (signed) to the normalization divisor, so a constant
/// column reproduces itself with unit DC gain.
pub fn sample_column(
    frame: &SourceFrame,
    u: f32,
    row_f: f32,
    kernel: &ResampleKernel,
    cfg: &CrtConfig,
) -> [f32; 3] {
    let base = row_f.floor();
    let frac = row_f - base;
    let base = base as i32;
    let extent = kernel.half as f32 + 1.0;

    let mut acc = [0.0f32; 3];
    let mut weight_sum = 0.0f32;
    let mut lo = [f32::MAX; 3];
    let mut hi = [f32::MIN; 3];

    for i in -kernel.half..=kernel.half + 1 {
        let d = i as f32 - frac;
        let mut w = (-d * d * kernel.inv_two_sigma2).exp() - cfg.res_sharp;

        if w < 0.0 {
            // Negative lobes shrink toward the window edge to limit ringing.
            let edge = (1.0 - d.abs() / extent).clamp(0.0, 1.0).powf(cfg.res_shape);
            w = w.max(-cfg.res_sharp * edge);
        }

        let px = frame.sample_row(u, base + i);

        acc[0] += px[0] * w;
        acc[1] += px[1] * w;
        acc[2] += px[2] * w;
        weight_sum += w;

        if d.abs() <= kernel.inner {
            for c in 0..3 {
                lo[c] = lo[c].min(px[c]);
                hi[c] = hi[c].max(px[c]);
            }
        }
    }

    let mut out = if weight_sum.abs() > MIN_WEIGHT_SUM {
        let inv = 1.0 / weight_sum;
        [acc[0] * inv, acc[1] * inv, acc[2] * inv]
    } else {
        let px = frame.sample_row(u, if frac < 0.5 { base } else { base + 1 });
        [px[0], px[1], px[2]]
    };

    for c in 0..3 {
        let clamped = out[c].clamp(lo[c], hi[c]);
        out[c] = (out[c] + (clamped - out[c]) * cfg.res_ring).clamp(0.0, 1.0);
    }

    out
}
