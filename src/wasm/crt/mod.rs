//! CRT Display Emulation Engine
//!
//! Stateless per-pixel pipeline: geometry mapping, adaptive vertical
//! resampling for non-progressive sources, scanline beam profiling, and
//! deconvergence with gamma-correct compositing.

pub mod composite;
pub mod config;
mod exp2_lookup;
pub mod frame;
pub mod geometry;
pub mod resample;
pub mod scanline;

use self::config::{BeamShape, CrtConfig, IntScaleMode};
use self::exp2_lookup::Exp2Lookup;
use self::frame::{FrameMeta, SourceFrame};
use self::resample::ResampleKernel;

/// Immutable per-configuration pipeline state. Everything derivable from
/// the configuration alone is computed once here, never per pixel.
pub struct CrtPipeline {
    cfg: CrtConfig,
    shape: BeamShape,
    int_scale: IntScaleMode,
    kernel: ResampleKernel,
}

impl CrtPipeline {
    pub fn new(cfg: CrtConfig) -> Self {
        Exp2Lookup::initialise();

        Self {
            shape: BeamShape::from_raw(cfg.beam_shape),
            int_scale: IntScaleMode::from_raw(cfg.int_scale),
            kernel: ResampleKernel::new(&cfg),
            cfg,
        }
    }

    #[inline]
    pub fn config(&self) -> &CrtConfig {
        &self.cfg
    }

    /// Map a simulated scanline row index to a stored texel row.
    #[inline(always)]
    fn row_texel(&self, row: i32, meta: &FrameMeta) -> i32 {
        ((row as f32 + 0.5) * meta.prescale[1]).floor() as i32
    }

    /// Compute one output pixel. `uv` is the output coordinate in [0,1]²,
    /// `out_h` the output grid height in pixels (used for integer-scale
    /// snapping). Returns RGB plus the max-channel auxiliary luma.
    pub fn render_pixel(
        &self,
        uv: [f32; 2],
        frame: &SourceFrame,
        meta: &FrameMeta,
        out_h: f32,
    ) -> [f32; 4] {
        let m = geometry::map(uv, meta, &self.cfg, self.int_scale, out_h);
        if m.fade <= 0.0 {
            return [0.0; 4];
        }

        if meta.interlaced {
            let row_f = m.uv[1] * meta.height - 0.5;
            let rgb = resample::sample_column(frame, m.uv[0], row_f, &self.kernel, &self.cfg);
            let rgb = composite::resolve_resampled(rgb, m.fade, &self.cfg, meta);
            return [rgb[0], rgb[1], rgb[2], scanline::max3(&rgb)];
        }

        let c1 = frame.sample_row(m.uv[0], self.row_texel(m.row, meta));
        let c2 = frame.sample_row(m.uv[0], self.row_texel(m.row + 1, meta));

        let proxy = scanline::brightness_proxy(m.frac, &c1, &c2, &self.cfg);
        let (wf1, wf2) = scanline::beam_weights(m.frac, proxy, self.shape, &self.cfg);

        let (mut w1, mut w2) = composite::deconvergence_masks(wf1, wf2, self.cfg.vert_mask);
        let s1 = scanline::saturation_scale(&c1, &self.cfg);
        let s2 = scanline::saturation_scale(&c2, &self.cfg);
        for c in 0..3 {
            w1[c] *= s1[c];
            w2[c] *= s2[c];
        }

        let rgb = composite::composite(&c1, &c2, w1, w2, proxy, m.fade, &self.cfg, meta);
        [rgb[0], rgb[1], rgb[2], scanline::max3(&rgb)]
    }
}

/// Render a whole output frame from an RGBA8 source buffer. The alpha
/// channel carries the intensity hint on input and the auxiliary luma on
/// output.
pub fn render_frame(
    input: &[u8],
    src_w: usize,
    src_h: usize,
    out_w: usize,
    out_h: usize,
    meta: &FrameMeta,
    cfg: &CrtConfig,
) -> Vec<u8> {
    let frame = SourceFrame::from_rgba8(input, src_w, src_h);
    let pipeline = CrtPipeline::new(*cfg);

    let mut output = vec![0u8; out_w * out_h * 4];
    let inv_w = 1.0 / out_w as f32;
    let inv_h = 1.0 / out_h as f32;
    let out_h_f = out_h as f32;

    for y in 0..out_h {
        let v = (y as f32 + 0.5) * inv_h;
        for x in 0..out_w {
            let u = (x as f32 + 0.5) * inv_w;
            let px = pipeline.render_pixel([u, v], &frame, meta, out_h_f);

            let idx = (y * out_w + x) * 4;
            output[idx] = (px[0] * 255.0 + 0.5) as u8;
            output[idx + 1] = (px[1] * 255.0 + 0.5) as u8;
            output[idx + 2] = (px[2] * 255.0 + 0.5) as u8;
            output[idx + 3] = (px[3] * 255.0 + 0.5) as u8;
        }
    }

    output
}
