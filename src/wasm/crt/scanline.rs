//! Scanline beam profile engine.
//!
//! Computes the blend weights of the two source rows adjacent to an output
//! pixel from the simulated electron-beam intensity falloff. Beam width
//! adapts to local brightness: bright regions get wider, flatter beams,
//! dark regions narrower, peakier ones.

use super::config::{BeamShape, CrtConfig};
use super::exp2_lookup::Exp2Lookup;

const LUMA_EPS: f32 = 1e-6;

#[inline(always)]
pub fn max3(c: &[f32]) -> f32 {
    c[0].max(c[1]).max(c[2])
}

#[inline(always)]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Local brightness estimate from the two adjacent row samples. A steep
/// falloff blend keeps the estimate dominated by the nearer row; the
/// upstream intensity hint is mixed in by `hint_str`.
pub fn brightness_proxy(f: f32, s1: &[f32; 4], s2: &[f32; 4], cfg: &CrtConfig) -> f32 {
    let b1 = lerp(max3(s1), s1[3], cfg.hint_str);
    let b2 = lerp(max3(s2), s2[3], cfg.hint_str);

    let lut = Exp2Lookup::instance();
    let t1 = lut.eval(cfg.steep_str * f * f);
    let t2 = lut.eval(cfg.steep_str * (1.0 - f) * (1.0 - f));

    (b1 * t1 + b2 * t2) / (t1 + t2 + LUMA_EPS)
}

#[inline(always)]
fn falloff(ex: f32, strength: f32, cubic: bool) -> f32 {
    let e2 = ex * ex;
    let e = if cubic {
        // Blend toward a cubic exponent for a tighter core.
        e2 + (e2 * ex - e2) * 0.4
    } else {
        e2
    };
    Exp2Lookup::instance().eval(strength * e)
}

fn shape_weight(x: f32, proxy: f32, shape: BeamShape, strength: f32, cfg: &CrtConfig) -> f32 {
    match shape {
        BeamShape::SteepGaussian | BeamShape::Gaussian => {
            let wid = lerp(cfg.beam_min, cfg.beam_max, proxy);
            falloff(x * wid, strength, shape == BeamShape::SteepGaussian)
        }
        BeamShape::NarrowCenter => {
            let x = lerp(x, cfg.beam_min * x, (x - 0.4 * proxy).max(0.0));
            let wid = lerp(1.2 * cfg.beam_min, cfg.beam_max, proxy);
            falloff(x * wid, strength, false)
        }
        BeamShape::AdaptiveWidth => {
            let dark = (2.5 - 0.5 * proxy) * cfg.beam_min;
            let wid = lerp(cfg.beam_max, lerp(dark, cfg.beam_max, proxy), x.powf(proxy + 0.3));
            falloff(x * wid, strength, false)
        }
    }
}

/// Beam weights for the rows above (`wf1`) and below (`wf2`) the output
/// pixel at fractional offset `f`. Overlapping beams are renormalized to
/// sum to exactly 1; gaps are left as-is.
pub fn beam_weights(f: f32, proxy: f32, shape: BeamShape, cfg: &CrtConfig) -> (f32, f32) {
    let strength = lerp(cfg.scan_dark, cfg.scan_bright, proxy);

    let wf1 = shape_weight(f, proxy, shape, strength, cfg);
    let wf2 = shape_weight(1.0 - f, proxy, shape, strength, cfg);

    let sum = wf1 + wf2;
    if sum > 1.0 {
        let inv = 1.0 / sum;
        (wf1 * inv, wf2 * inv)
    } else {
        (wf1, wf2)
    }
}

/// Per-channel falloff multipliers preserving saturation at edges. Each
/// channel is weighed against its fourth-power-normalized chrominance
/// ratio; the max channel always keeps a multiplier of ~1, so peak
/// brightness survives while dimmer channels fall off faster.
pub fn saturation_scale(color: &[f32; 4], cfg: &CrtConfig) -> [f32; 3] {
    if cfg.scan_sat <= 0.0 {
        return [1.0; 3];
    }

    let inv_max = 1.0 / (max3(color) + LUMA_EPS);
    let mut out = [1.0f32; 3];
    for c in 0..3 {
        let r = color[c] * inv_max;
        let r4 = (r * r) * (r * r);
        out[c] = lerp(1.0, r4, cfg.scan_sat);
    }
    out
}
