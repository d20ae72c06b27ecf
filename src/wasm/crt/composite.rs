//! Beam deconvergence and gamma-correct compositing.

use super::config::CrtConfig;
use super::frame::FrameMeta;

const MASK_EPS: f32 = 1e-3;
const MIN_INV_GAMMA: f32 = 1e-3;

#[inline(always)]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Per-channel row weights simulating vertical beam misalignment. The
/// favored channel pair (red/blue for positive strength, green for
/// negative) is cross-blended toward the opposite row's weight. Per-channel
/// sums are preserved, so flat fields stay flat and the effect shows only
/// near row boundaries where the two weights differ.
pub fn deconvergence_masks(wf1: f32, wf2: f32, strength: f32) -> ([f32; 3], [f32; 3]) {
    if strength.abs() < MASK_EPS {
        return ([wf1; 3], [wf2; 3]);
    }

    let a = strength.abs();
    let c1 = wf1 + (wf2 - wf1) * a;
    let c2 = wf2 + (wf1 - wf2) * a;

    if strength > 0.0 {
        ([c1, wf1, c1], [c2, wf2, c2])
    } else {
        ([wf1, c1, wf1], [wf2, c2, wf2])
    }
}

/// Decode a source-gamma color into the linear working space.
#[inline]
pub fn decode_gamma(c: [f32; 3], inv_gamma: f32) -> [f32; 3] {
    let e = 1.0 / inv_gamma.max(MIN_INV_GAMMA);
    [c[0].powf(e), c[1].powf(e), c[2].powf(e)]
}

/// Re-encode a working-space color with the target gamma.
#[inline]
pub fn encode_gamma(c: [f32; 3], gamma_out: f32) -> [f32; 3] {
    let e = 1.0 / gamma_out;
    [c[0].powf(e), c[1].powf(e), c[2].powf(e)]
}

/// Resolve a resampled non-progressive color: decode once, apply the
/// brightness boost and corner fade, clamp. No recomposition and no
/// re-encode on this path; downstream bloom consumes the decoded result.
pub fn resolve_resampled(rgb: [f32; 3], fade: f32, cfg: &CrtConfig, meta: &FrameMeta) -> [f32; 3] {
    let mx = rgb[0].max(rgb[1]).max(rgb[2]);
    let gain = lerp(cfg.boost_dark, cfg.boost_bright, mx) * fade;

    let d = decode_gamma(rgb, meta.inv_gamma);
    [
        (d[0] * gain).clamp(0.0, 1.0),
        (d[1] * gain).clamp(0.0, 1.0),
        (d[2] * gain).clamp(0.0, 1.0),
    ]
}

/// Composite the two gamma-decoded rows with their per-channel weights,
/// apply the brightness boost and corner fade, clamp, and re-encode.
#[allow(clippy::too_many_arguments)]
pub fn composite(
    c1: &[f32; 4],
    c2: &[f32; 4],
    w1: [f32; 3],
    w2: [f32; 3],
    proxy: f32,
    fade: f32,
    cfg: &CrtConfig,
    meta: &FrameMeta,
) -> [f32; 3] {
    let d1 = decode_gamma([c1[0], c1[1], c1[2]], meta.inv_gamma);
    let d2 = decode_gamma([c2[0], c2[1], c2[2]], meta.inv_gamma);

    let gain = lerp(cfg.boost_dark, cfg.boost_bright, proxy) * fade;

    let mut out = [0.0f32; 3];
    for c in 0..3 {
        out[c] = ((d1[c] * w1[c] + d2[c] * w2[c]) * gain).clamp(0.0, 1.0);
    }

    encode_gamma(out, cfg.gamma_out)
}
