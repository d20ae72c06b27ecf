//! RetroBeam WASM Module
//!
//! High-performance CRT display emulation engine for WebAssembly.

use wasm_bindgen::prelude::*;

pub mod crt;

use crt::config::{CrtConfig, PARAM_SPECS};
use crt::frame::FrameMeta;

// Single shared output buffer reused across renders. This prevents memory
// fragmentation and keeps static overhead to one allocation.
static mut SHARED_BUFFER: Vec<u8> = Vec::new();

/// Result of a frame render
#[wasm_bindgen]
pub struct RenderResult {
    pub ptr: u32,
    pub len: u32,
    pub width: u32,
    pub height: u32,
}

/// Get WASM memory for reading output buffers
#[wasm_bindgen]
pub fn get_memory() -> JsValue {
    wasm_bindgen::memory()
}

// ============================================================================
// Internal Helpers
// ============================================================================

/// Updates the shared buffer with new data and returns the WASM pointer result.
/// This consolidates the unsafe static mut access into one location.
#[inline(always)]
fn update_buffer(output: Vec<u8>, width: u32, height: u32) -> RenderResult {
    unsafe {
        // This drops the previous Vec (freeing its memory) and takes ownership of the new one.
        SHARED_BUFFER = output;

        RenderResult {
            ptr: SHARED_BUFFER.as_ptr() as u32,
            len: SHARED_BUFFER.len() as u32,
            width,
            height,
        }
    }
}

// ============================================================================
// CRT Render Functions
// ============================================================================

/// CRT render with default config
#[wasm_bindgen]
pub fn crt_render(
    data: &[u8],
    width: u32,
    height: u32,
    out_width: u32,
    out_height: u32,
) -> RenderResult {
    crt_render_config(
        data, width, height, out_width, out_height,
        0.0, 0.0, 0.25,       // warp_x, warp_y, warp_shape
        0.0, 0.0,             // overscan_x, overscan_y
        0,                    // int_scale
        0.0, 400.0,           // corner_size, corner_smooth
        0.3, 0.12, 1.5, 0.6,  // res_sigma, res_sharp, res_shape, res_ring
        0,                    // beam_shape
        1.15, 0.85,           // beam_min, beam_max
        2.6, 1.4, 0.5,        // scan_dark, scan_bright, scan_sat
        1.0, 10.0,            // hint_str, steep_str
        0.0,                  // vert_mask
        1.0, 1.0,             // boost_dark, boost_bright
        2.4,                  // gamma_out
        2.4,                  // src_gamma
        1.0, 1.0,             // prescale_x, prescale_y
        false,                // interlaced
    )
}

/// CRT render with full config
#[wasm_bindgen]
#[allow(clippy::too_many_arguments)]
pub fn crt_render_config(
    data: &[u8],
    width: u32,
    height: u32,
    out_width: u32,
    out_height: u32,
    warp_x: f32,
    warp_y: f32,
    warp_shape: f32,
    overscan_x: f32,
    overscan_y: f32,
    int_scale: u32,
    corner_size: f32,
    corner_smooth: f32,
    res_sigma: f32,
    res_sharp: f32,
    res_shape: f32,
    res_ring: f32,
    beam_shape: i32,
    beam_min: f32,
    beam_max: f32,
    scan_dark: f32,
    scan_bright: f32,
    scan_sat: f32,
    hint_str: f32,
    steep_str: f32,
    vert_mask: f32,
    boost_dark: f32,
    boost_bright: f32,
    gamma_out: f32,
    src_gamma: f32,
    prescale_x: f32,
    prescale_y: f32,
    interlaced: bool,
) -> RenderResult {
    let config = CrtConfig {
        warp_x,
        warp_y,
        warp_shape,
        overscan_x,
        overscan_y,
        int_scale,
        corner_size,
        corner_smooth,
        res_sigma,
        res_sharp,
        res_shape,
        res_ring,
        beam_shape,
        beam_min,
        beam_max,
        scan_dark,
        scan_bright,
        scan_sat,
        hint_str,
        steep_str,
        vert_mask,
        boost_dark,
        boost_bright,
        gamma_out,
    };

    let mut meta = FrameMeta::new(width as usize, height as usize);
    meta.inv_gamma = 1.0 / src_gamma.max(0.1);
    meta.prescale = [prescale_x.max(1.0), prescale_y.max(1.0)];
    meta.interlaced = interlaced;

    let output = crt::render_frame(
        data,
        width as usize,
        height as usize,
        out_width as usize,
        out_height as usize,
        &meta,
        &config,
    );

    update_buffer(output, out_width, out_height)
}

// ============================================================================
// Parameter Metadata
// ============================================================================

/// Number of documented numeric parameters
#[wasm_bindgen]
pub fn param_count() -> u32 {
    PARAM_SPECS.len() as u32
}

/// Name of the parameter at `index`, empty when out of range
#[wasm_bindgen]
pub fn param_name(index: u32) -> String {
    PARAM_SPECS
        .get(index as usize)
        .map(|s| s.name.to_owned())
        .unwrap_or_default()
}

/// [default, min, max, step] of the parameter at `index`
#[wasm_bindgen]
pub fn param_range(index: u32) -> Vec<f32> {
    match PARAM_SPECS.get(index as usize) {
        Some(s) => vec![s.default, s.min, s.max, s.step],
        None => vec![],
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crt::config::{BeamShape, IntScaleMode};
    use crate::crt::frame::SourceFrame;
    use crate::crt::resample::ResampleKernel;
    use crate::crt::{composite, geometry, resample, scanline, CrtPipeline};

    fn create_test_image(w: usize, h: usize) -> Vec<u8> {
        let mut data = vec![0u8; w * h * 4];
        for y in 0..h {
            for x in 0..w {
                let i = (y * w + x) * 4;
                data[i] = (x * 255 / w) as u8;     // R
                data[i + 1] = (y * 255 / h) as u8; // G
                data[i + 2] = 128;                  // B
                data[i + 3] = 255;                  // A
            }
        }
        data
    }

    fn flat_frame(w: usize, h: usize, level: f32, hint: f32) -> SourceFrame {
        SourceFrame::from_pixels(w, h, vec![[level, level, level, hint]; w * h])
    }

    fn striped_frame(w: usize, h: usize, even: f32, odd: f32) -> SourceFrame {
        let mut data = Vec::with_capacity(w * h);
        for y in 0..h {
            let v = if y % 2 == 0 { even } else { odd };
            for _ in 0..w {
                data.push([v, v, v, v]);
            }
        }
        SourceFrame::from_pixels(w, h, data)
    }

    const ALL_SHAPES: [BeamShape; 4] = [
        BeamShape::SteepGaussian,
        BeamShape::Gaussian,
        BeamShape::NarrowCenter,
        BeamShape::AdaptiveWidth,
    ];

    #[test]
    fn test_render_dims() {
        let img = create_test_image(4, 4);
        let result = crt_render(&img, 4, 4, 16, 12);
        assert_eq!(result.width, 16);
        assert_eq!(result.height, 12);
        assert_eq!(result.len, 16 * 12 * 4);
    }

    #[test]
    fn test_geometry_identity() {
        let meta = FrameMeta::new(320, 240);
        let cfg = CrtConfig::default();

        for uv in [[0.13, 0.77], [0.5, 0.5], [0.02, 0.98]] {
            let m = geometry::map(uv, &meta, &cfg, IntScaleMode::Off, 480.0);
            assert_eq!(m.uv, uv);
            assert_eq!(m.fade, 1.0);
        }
    }

    #[test]
    fn test_integer_scale_off_ignores_ratio() {
        let meta = FrameMeta::new(320, 240);
        let cfg = CrtConfig::default();
        let uv = [0.31, 0.64];

        for out_h in [240.0, 480.0, 487.0, 1000.0] {
            let m = geometry::map(uv, &meta, &cfg, IntScaleMode::Off, out_h);
            assert_eq!(m.uv, uv);
        }
    }

    #[test]
    fn test_integer_snap_axes() {
        let pos = [0.3, 0.8];

        // Non-integer ratio: vertical-only mode keeps x, moves y.
        let snapped = geometry::integer_snap(pos, IntScaleMode::FloorVertical, 240.0, 700.0);
        assert_eq!(snapped[0], pos[0]);
        assert!((snapped[1] - pos[1]).abs() > 1e-3);

        // Both-axes mode moves x too.
        let both = geometry::integer_snap(pos, IntScaleMode::FloorBoth, 240.0, 700.0);
        assert!((both[0] - pos[0]).abs() > 1e-3);

        // An exact integer ratio needs no correction.
        let exact = geometry::integer_snap(pos, IntScaleMode::FloorBoth, 240.0, 480.0);
        assert!((exact[0] - pos[0]).abs() < 1e-6);
        assert!((exact[1] - pos[1]).abs() < 1e-6);
    }

    #[test]
    fn test_corner_fade() {
        assert_eq!(geometry::corner_fade([0.5, 0.5], 0.0, 400.0), 1.0);
        assert_eq!(geometry::corner_fade([-0.01, 0.5], 0.1, 400.0), 0.0);
        assert_eq!(geometry::corner_fade([0.5, 1.01], 0.1, 400.0), 0.0);
        assert_eq!(geometry::corner_fade([0.5, 0.5], 0.1, 400.0), 1.0);
        assert!(geometry::corner_fade([0.999, 0.999], 0.25, 400.0) < 1.0);
    }

    #[test]
    fn test_warp_center_invariant() {
        let warped = geometry::lens_warp([0.5, 0.5], 0.2, 0.15, 0.25);
        assert_eq!(warped, [0.5, 0.5]);
    }

    #[test]
    fn test_beam_weights_bounded() {
        let cfg = CrtConfig::default();

        for &shape in &ALL_SHAPES {
            for fi in 0..100 {
                let f = fi as f32 / 100.0;
                for &proxy in &[0.0, 0.25, 0.5, 0.75, 1.0] {
                    let (w1, w2) = scanline::beam_weights(f, proxy, shape, &cfg);
                    assert!(w1 >= 0.0 && w2 >= 0.0);
                    assert!(w1 + w2 <= 1.0 + 1e-4, "sum {} for {:?}", w1 + w2, shape);
                }
            }
        }
    }

    #[test]
    fn test_beam_weights_symmetric_midpoint() {
        let cfg = CrtConfig::default();

        for &shape in &ALL_SHAPES {
            for &proxy in &[0.0, 0.5, 1.0] {
                let (w1, w2) = scanline::beam_weights(0.5, proxy, shape, &cfg);
                assert!((w1 - w2).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn test_resample_dc_gain() {
        let frame = flat_frame(8, 16, 0.37, 1.0);
        let cfg = CrtConfig::default();
        let kernel = ResampleKernel::new(&cfg);

        for rf in [3.0, 3.25, 7.5, 10.9] {
            let out = resample::sample_column(&frame, 0.5, rf, &kernel, &cfg);
            for c in out {
                assert!((c - 0.37).abs() < 1e-5);
            }
        }
    }

    #[test]
    fn test_resample_ring_limiter_envelope() {
        let frame = striped_frame(8, 16, 0.2, 0.8);
        let cfg = CrtConfig {
            res_ring: 1.0,
            res_sharp: 0.25,
            ..CrtConfig::default()
        };
        let kernel = ResampleKernel::new(&cfg);

        for rf in [4.0, 4.5, 5.3, 7.9, 10.0] {
            let out = resample::sample_column(&frame, 0.5, rf, &kernel, &cfg);
            for c in out {
                assert!((0.2 - 1e-6..=0.8 + 1e-6).contains(&c));
            }
        }
    }

    #[test]
    fn test_gamma_white_roundtrip() {
        let cfg = CrtConfig::default();
        let meta = FrameMeta::new(8, 8);
        let white = [1.0, 1.0, 1.0, 1.0];

        let out = composite::composite(
            &white,
            &white,
            [0.5; 3],
            [0.5; 3],
            1.0,
            1.0,
            &cfg,
            &meta,
        );
        assert_eq!(out, [1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_deconvergence_preserves_channel_sums() {
        let (w1, w2) = (0.9f32, 0.2f32);

        for strength in [0.35, -0.35] {
            let (m1, m2) = composite::deconvergence_masks(w1, w2, strength);
            for c in 0..3 {
                assert!((m1[c] + m2[c] - (w1 + w2)).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn test_flat_gray_midpoint_all_shapes() {
        // 320x240 source at 854x480, exactly between two identical gray
        // rows: symmetric weighting must reproduce the input level.
        let frame = flat_frame(320, 240, 0.5, 0.5);
        let meta = FrameMeta::new(320, 240);

        for shape in [-1, 0, 1, 2] {
            let cfg = CrtConfig {
                beam_shape: shape,
                ..CrtConfig::default()
            };
            let pipeline = CrtPipeline::new(cfg);
            let px = pipeline.render_pixel([0.5, 0.5], &frame, &meta, 480.0);
            for c in 0..3 {
                assert!((px[c] - 0.5).abs() < 1e-3, "channel {} = {}", c, px[c]);
            }
        }
    }

    #[test]
    fn test_render_pixel_output_range() {
        let img = create_test_image(16, 16);
        let frame = SourceFrame::from_rgba8(&img, 16, 16);
        let meta = FrameMeta::new(16, 16);

        let cfg = CrtConfig {
            warp_x: 0.15,
            warp_y: 0.1,
            overscan_x: 3.0,
            overscan_y: -2.0,
            int_scale: 2,
            corner_size: 0.02,
            scan_sat: 1.0,
            hint_str: 0.3,
            vert_mask: 0.3,
            boost_dark: 1.3,
            boost_bright: 1.5,
            beam_shape: 2,
            gamma_out: 2.0,
            ..CrtConfig::default()
        };
        let pipeline = CrtPipeline::new(cfg);

        for yi in 0..24 {
            for xi in 0..24 {
                let uv = [(xi as f32 + 0.5) / 24.0, (yi as f32 + 0.5) / 24.0];
                let px = pipeline.render_pixel(uv, &frame, &meta, 24.0);
                for c in px {
                    assert!(c.is_finite());
                    assert!((0.0..=1.0).contains(&c));
                }
            }
        }
    }

    #[test]
    fn test_interlaced_path_decodes_once() {
        let frame = flat_frame(64, 64, 0.5, 1.0);
        let mut meta = FrameMeta::new(64, 64);
        meta.interlaced = true;

        let pipeline = CrtPipeline::new(CrtConfig::default());
        let px = pipeline.render_pixel([0.5, 0.5], &frame, &meta, 256.0);

        // Resampled flat input decodes to 0.5^2.4 with no re-encode.
        let expected = 0.5f32.powf(2.4);
        for c in 0..3 {
            assert!((px[c] - expected).abs() < 1e-3);
        }
        assert_eq!(px[3], px[0].max(px[1]).max(px[2]));
    }

    #[test]
    fn test_meta_from_probe() {
        let probe = SourceFrame::from_pixels(
            2,
            1,
            vec![[0.0, 0.0, 0.0, 0.45], [0.0, 0.0, 0.0, 0.2]],
        );
        let meta = FrameMeta::from_probe(&probe, 320, 240);
        assert!(meta.interlaced);
        assert!((meta.inv_gamma - 0.45).abs() < 1e-6);

        let probe = SourceFrame::from_pixels(
            2,
            1,
            vec![[0.0, 0.0, 0.0, 0.45], [0.0, 0.0, 0.0, 0.8]],
        );
        let meta = FrameMeta::from_probe(&probe, 320, 240);
        assert!(!meta.interlaced);
    }

    #[test]
    fn test_param_specs_consistent() {
        assert_eq!(PARAM_SPECS.len(), 24);
        for spec in PARAM_SPECS {
            assert!(!spec.name.is_empty());
            assert!(spec.min <= spec.default && spec.default <= spec.max);
            assert!(spec.step > 0.0);
        }
    }
}
