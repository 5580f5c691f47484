/// Compatibility toggles for behaviors historical interpreters disagree on.
///
/// The defaults are the canonical policy here: shifts operate on VX in place
/// and sprites clip at the display edges.
#[derive(Clone, Copy, Debug, Default)]
pub struct Quirks {
    /// 8XY6/8XYE shift VY into VX instead of shifting VX in place.
    pub shift_reads_vy: bool,
    /// Sprites wrap around the display edges instead of clipping.
    pub wrap_sprites: bool,
}
