//! Output-to-source coordinate mapping: integer-scale snapping, overscan
//! cropping, lens curvature warp, and the rounded-corner fade.

use super::config::{CrtConfig, IntScaleMode};
use super::frame::FrameMeta;

/// Result of mapping one output coordinate.
pub struct Mapped {
    /// Source coordinate in [0,1]² (may land outside after warp/snap).
    pub uv: [f32; 2],
    /// Scanline row above the coordinate.
    pub row: i32,
    /// Fractional offset below that row, in [0,1).
    pub frac: f32,
    /// Corner/bounds fade factor; 0 means the pixel is off-screen.
    pub fade: f32,
}

/// Scale a coordinate about the screen center.
#[inline(always)]
fn rescale(pos: [f32; 2], dx: f32, dy: f32) -> [f32; 2] {
    [
        (pos[0] * 2.0 - 1.0) * dx * 0.5 + 0.5,
        (pos[1] * 2.0 - 1.0) * dy * 0.5 + 0.5,
    ]
}

/// Shrink the output/source scale ratio to the nearest integer factor so the
/// simulated scanline pitch lands on whole output pixels (suppresses moiré).
pub fn integer_snap(pos: [f32; 2], mode: IntScaleMode, rows: f32, out_h: f32) -> [f32; 2] {
    let ratio = out_h / rows;
    let factor = if mode.rounds_up() {
        ratio.ceil()
    } else {
        ratio.floor()
    }
    .max(1.0);

    let d = ratio / factor;
    let snapped = rescale(pos, d, d);

    if mode.snaps_horizontal() {
        snapped
    } else {
        [pos[0], snapped[1]]
    }
}

/// Symmetric crop about the center. Positive percentages zoom into the
/// picture, hiding source-edge artifacts.
pub fn overscan_crop(pos: [f32; 2], x_pct: f32, y_pct: f32) -> [f32; 2] {
    rescale(pos, 1.0 - x_pct * 0.01, 1.0 - y_pct * 0.01)
}

#[inline(always)]
fn inv_sqrt(v: f32) -> f32 {
    1.0 / v.max(0.01).sqrt()
}

/// Radial lens warp. Each axis is remapped by an inverse-square-root of the
/// opposite axis, coupled through `shape` and blended in by the per-axis
/// curvature magnitudes. Zero magnitude on both axes is an exact identity
/// (callers skip the warp entirely in that case).
pub fn lens_warp(pos: [f32; 2], warp_x: f32, warp_y: f32, shape: f32) -> [f32; 2] {
    let x = pos[0] * 2.0 - 1.0;
    let y = pos[1] * 2.0 - 1.0;

    let cx = x * inv_sqrt(1.0 - shape * y * y);
    let cy = y * inv_sqrt(1.0 - shape * x * x);

    let x = x + (cx - x) * (warp_x / shape);
    let y = y + (cy - y) * (warp_y / shape);

    [x * 0.5 + 0.5, y * 0.5 + 0.5]
}

/// Rounded-corner fade for the warped coordinate. Exactly 0 outside [0,1]²,
/// exactly 1 inside when `size` is 0.
pub fn corner_fade(pos: [f32; 2], size: f32, smooth: f32) -> f32 {
    if pos[0] < 0.0 || pos[0] > 1.0 || pos[1] < 0.0 || pos[1] > 1.0 {
        return 0.0;
    }
    if size <= 0.0 {
        return 1.0;
    }

    // Rounded-rectangle distance in centered half-screen units.
    let px = (pos[0] * 2.0 - 1.0).abs();
    let py = (pos[1] * 2.0 - 1.0).abs();
    let qx = (px - (1.0 - size)).max(0.0);
    let qy = (py - (1.0 - size)).max(0.0);
    let d = (qx * qx + qy * qy).sqrt() - size;

    (1.0 - d * smooth).clamp(0.0, 1.0)
}

/// Map one output coordinate to its source coordinate, scanline row and
/// fractional offset.
pub fn map(
    uv: [f32; 2],
    meta: &FrameMeta,
    cfg: &CrtConfig,
    mode: IntScaleMode,
    out_h: f32,
) -> Mapped {
    let mut pos = uv;

    // Snapping only applies to progressive sources; the resampled path has
    // no fixed scanline pitch to align.
    if mode != IntScaleMode::Off && !meta.interlaced {
        pos = integer_snap(pos, mode, meta.rows(), out_h);
    }

    if cfg.overscan_x != 0.0 || cfg.overscan_y != 0.0 {
        pos = overscan_crop(pos, cfg.overscan_x, cfg.overscan_y);
    }

    if cfg.warp_x > 0.0 || cfg.warp_y > 0.0 {
        pos = lens_warp(pos, cfg.warp_x, cfg.warp_y, cfg.warp_shape);
    }

    let fade = corner_fade(pos, cfg.corner_size, cfg.corner_smooth);

    let row_f = pos[1] * meta.rows() - 0.5;
    let base = row_f.floor();

    Mapped {
        uv: pos,
        row: base as i32,
        frac: row_f - base,
        fade,
    }
}
