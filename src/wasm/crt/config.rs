//! Engine configuration and parameter metadata.

/// Integer-scale snapping mode. Vertical-only modes keep the horizontal
/// coordinate untouched so non-square pixel aspect ratios survive snapping.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IntScaleMode {
    Off = 0,
    FloorVertical = 1,
    FloorBoth = 2,
    CeilVertical = 3,
    CeilBoth = 4,
}

impl IntScaleMode {
    pub fn from_raw(v: u32) -> Self {
        match v {
            1 => IntScaleMode::FloorVertical,
            2 => IntScaleMode::FloorBoth,
            3 => IntScaleMode::CeilVertical,
            4 => IntScaleMode::CeilBoth,
            _ => IntScaleMode::Off,
        }
    }

    #[inline]
    pub fn snaps_horizontal(self) -> bool {
        matches!(self, IntScaleMode::FloorBoth | IntScaleMode::CeilBoth)
    }

    #[inline]
    pub fn rounds_up(self) -> bool {
        matches!(self, IntScaleMode::CeilVertical | IntScaleMode::CeilBoth)
    }
}

/// Beam response curve selector.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BeamShape {
    /// Gaussian falloff with a partially cubic exponent (sharper core).
    SteepGaussian = -1,
    /// Plain squared-exponent falloff, width lerped by brightness.
    Gaussian = 0,
    /// Small offsets pre-biased toward a narrower beam before falloff.
    NarrowCenter = 1,
    /// Width interpolated between two brightness-dependent limits.
    AdaptiveWidth = 2,
}

impl BeamShape {
    pub fn from_raw(v: i32) -> Self {
        match v {
            i32::MIN..=-1 => BeamShape::SteepGaussian,
            1 => BeamShape::NarrowCenter,
            2.. => BeamShape::AdaptiveWidth,
            _ => BeamShape::Gaussian,
        }
    }
}

/// CRT engine configuration. All fields are fixed for the pipeline's
/// lifetime; range validation is the caller's responsibility (see
/// [`PARAM_SPECS`] for the documented ranges).
#[derive(Clone, Copy)]
pub struct CrtConfig {
    /// Horizontal lens curvature magnitude. 0 disables the warp exactly.
    pub warp_x: f32,
    /// Vertical lens curvature magnitude.
    pub warp_y: f32,
    /// Cross-axis coupling of the warp. Must be nonzero (validated upstream).
    pub warp_shape: f32,
    /// Symmetric horizontal crop, percent. Positive crops into the picture.
    pub overscan_x: f32,
    /// Symmetric vertical crop, percent.
    pub overscan_y: f32,
    /// Raw integer-scale mode, decoded via [`IntScaleMode::from_raw`].
    pub int_scale: u32,
    /// Rounded screen corner radius in centered half-screen units.
    pub corner_size: f32,
    /// Corner edge hardness; higher is sharper.
    pub corner_smooth: f32,
    /// Gaussian sigma of the vertical resampler, in source rows.
    pub res_sigma: f32,
    /// Sharpening bias subtracted from every resampler tap weight.
    pub res_sharp: f32,
    /// Exponent shaping the negative-lobe envelope toward the window edge.
    pub res_shape: f32,
    /// Ringing limiter: 0 = free overshoot, 1 = clamped to the local envelope.
    pub res_ring: f32,
    /// Raw beam shape selector, decoded via [`BeamShape::from_raw`].
    pub beam_shape: i32,
    /// Beam width multiplier for dark content (larger = narrower beam).
    pub beam_min: f32,
    /// Beam width multiplier for bright content.
    pub beam_max: f32,
    /// Falloff strength for dark content.
    pub scan_dark: f32,
    /// Falloff strength for bright content.
    pub scan_bright: f32,
    /// Saturation-preserving falloff reweight strength.
    pub scan_sat: f32,
    /// How much the upstream intensity hint drives beam adaptation vs the
    /// recomputed max channel.
    pub hint_str: f32,
    /// Steepness of the two-row blend that estimates local brightness.
    pub steep_str: f32,
    /// Signed vertical deconvergence strength. Positive favors red/blue.
    pub vert_mask: f32,
    /// Brightness boost applied to dark content.
    pub boost_dark: f32,
    /// Brightness boost applied to bright content.
    pub boost_bright: f32,
    /// Target gamma for output re-encoding.
    pub gamma_out: f32,
}

impl Default for CrtConfig {
    fn default() -> Self {
        Self {
            warp_x: 0.0,
            warp_y: 0.0,
            warp_shape: 0.25,
            overscan_x: 0.0,
            overscan_y: 0.0,
            int_scale: 0,
            corner_size: 0.0,
            corner_smooth: 400.0,
            res_sigma: 0.3,
            res_sharp: 0.12,
            res_shape: 1.5,
            res_ring: 0.6,
            beam_shape: 0,
            beam_min: 1.15,
            beam_max: 0.85,
            scan_dark: 2.6,
            scan_bright: 1.4,
            scan_sat: 0.5,
            hint_str: 1.0,
            steep_str: 10.0,
            vert_mask: 0.0,
            boost_dark: 1.0,
            boost_bright: 1.0,
            gamma_out: 2.4,
        }
    }
}

/// Valid range and UI step for one numeric parameter.
pub struct ParamSpec {
    pub name: &'static str,
    pub default: f32,
    pub min: f32,
    pub max: f32,
    pub step: f32,
}

/// Documented parameter table, in [`CrtConfig`] field order. Hosts expose
/// these as tweakable sliders; the engine itself never re-validates.
pub const PARAM_SPECS: &[ParamSpec] = &[
    ParamSpec { name: "warp_x", default: 0.0, min: 0.0, max: 0.25, step: 0.005 },
    ParamSpec { name: "warp_y", default: 0.0, min: 0.0, max: 0.25, step: 0.005 },
    ParamSpec { name: "warp_shape", default: 0.25, min: 0.05, max: 0.6, step: 0.05 },
    ParamSpec { name: "overscan_x", default: 0.0, min: -10.0, max: 10.0, step: 0.25 },
    ParamSpec { name: "overscan_y", default: 0.0, min: -10.0, max: 10.0, step: 0.25 },
    ParamSpec { name: "int_scale", default: 0.0, min: 0.0, max: 4.0, step: 1.0 },
    ParamSpec { name: "corner_size", default: 0.0, min: 0.0, max: 0.25, step: 0.005 },
    ParamSpec { name: "corner_smooth", default: 400.0, min: 100.0, max: 800.0, step: 25.0 },
    ParamSpec { name: "res_sigma", default: 0.3, min: 0.1, max: 0.8, step: 0.01 },
    ParamSpec { name: "res_sharp", default: 0.12, min: 0.0, max: 0.3, step: 0.01 },
    ParamSpec { name: "res_shape", default: 1.5, min: 0.5, max: 4.0, step: 0.05 },
    ParamSpec { name: "res_ring", default: 0.6, min: 0.0, max: 1.0, step: 0.05 },
    ParamSpec { name: "beam_shape", default: 0.0, min: -1.0, max: 2.0, step: 1.0 },
    ParamSpec { name: "beam_min", default: 1.15, min: 0.5, max: 3.0, step: 0.05 },
    ParamSpec { name: "beam_max", default: 0.85, min: 0.2, max: 2.5, step: 0.05 },
    ParamSpec { name: "scan_dark", default: 2.6, min: 0.5, max: 8.0, step: 0.05 },
    ParamSpec { name: "scan_bright", default: 1.4, min: 0.5, max: 8.0, step: 0.05 },
    ParamSpec { name: "scan_sat", default: 0.5, min: 0.0, max: 1.0, step: 0.05 },
    ParamSpec { name: "hint_str", default: 1.0, min: 0.0, max: 1.0, step: 0.05 },
    ParamSpec { name: "steep_str", default: 10.0, min: 2.0, max: 20.0, step: 0.5 },
    ParamSpec { name: "vert_mask", default: 0.0, min: -0.5, max: 0.5, step: 0.01 },
    ParamSpec { name: "boost_dark", default: 1.0, min: 1.0, max: 2.0, step: 0.01 },
    ParamSpec { name: "boost_bright", default: 1.0, min: 0.5, max: 2.0, step: 0.01 },
    ParamSpec { name: "gamma_out", default: 2.4, min: 1.0, max: 3.5, step: 0.05 },
];
