use parking_lot::Once;

/// Shared lookup table for `2^-x`, the falloff primitive evaluated several
/// times per output pixel by the beam profile and brightness proxy.
pub(crate) struct Exp2Lookup {
    table: Box<[f32]>,
}

const TABLE_SIZE: usize = 2048;

// Inputs beyond this point produce weights below f32 noise; treated as zero.
const RANGE: f32 = 24.0;
const SCALE: f32 = (TABLE_SIZE - 1) as f32 / RANGE;

// SAFETY: Only written to once by the closure in instance(), which is mediated by a parking_lot::Once.
static mut LOOKUP_INSTANCE: Option<Exp2Lookup> = None;
static LOOKUP_LOCK: Once = Once::new();

impl Exp2Lookup {
    #[inline]
    pub(crate) fn instance() -> &'static Self {
        Self::initialise();

        unsafe { Self::instance_unchecked() }
    }

    #[inline]
    pub(crate) fn initialise() {
        LOOKUP_LOCK.call_once(|| unsafe {
            LOOKUP_INSTANCE = Some(Self::new());
        });
    }

    #[inline]
    pub(crate) unsafe fn instance_unchecked() -> &'static Self {
        unsafe { LOOKUP_INSTANCE.as_ref().unwrap_unchecked() }
    }

    fn new() -> Self {
        let table: Vec<f32> = (0..TABLE_SIZE)
            .map(|i| 2.0_f32.powf(-(i as f32) / SCALE))
            .collect();

        Self {
            table: table.into_boxed_slice(),
        }
    }

    /// Linearly interpolated `2^-x` for `x >= 0`. Entry 0 is exactly 1.0, so
    /// a zero offset always yields full beam intensity.
    #[inline(always)]
    pub(crate) fn eval(&self, x: f32) -> f32 {
        let t = x.max(0.0) * SCALE;
        if t >= (TABLE_SIZE - 1) as f32 {
            return 0.0;
        }

        let i = t as usize;
        let f = t - i as f32;

        // SAFETY: t < TABLE_SIZE - 1 was checked above, so i + 1 is in bounds.
        unsafe {
            let a = *self.table.get_unchecked(i);
            let b = *self.table.get_unchecked(i + 1);
            a + (b - a) * f
        }
    }
}
