//! Pure calculation functions for cover-fit geometry.
//!
//! All functions here are pure and testable without any I/O or images.

/// Centred crop of `source` that has the aspect ratio of `target`.
///
/// Cover-fit crops in source space first, so the later resize only ever
/// produces a `target`-sized buffer regardless of how extreme the source
/// aspect ratio is.
///
/// # Arguments
/// * `source` - Original image dimensions (width, height), both non-zero
/// * `target` - Target area dimensions (width, height), both non-zero
///
/// # Returns
/// * `(x, y, width, height)` - Crop rectangle inside `source`. One side spans
///   the full source; neither side is ever zero. Odd overflow puts the extra
///   pixel on the right/bottom edge.
///
/// # Examples
/// ```
/// # use pwa_shell::imaging::center_crop_rect;
/// // 300x100 landscape into a square: keep the middle 100x100
/// assert_eq!(center_crop_rect((300, 100), (512, 512)), (100, 0, 100, 100));
/// ```
pub fn center_crop_rect(source: (u32, u32), target: (u32, u32)) -> (u32, u32, u32, u32) {
    let (src_w, src_h) = source;
    let (tgt_w, tgt_h) = target;

    // Cross-multiplied aspect comparison, exact in u64
    let src_wide = src_w as u64 * tgt_h as u64;
    let tgt_wide = tgt_w as u64 * src_h as u64;

    if src_wide > tgt_wide {
        // Source is wider: keep full height, trim the sides
        let w = ((src_h as f64 * tgt_w as f64 / tgt_h as f64).round() as u32).clamp(1, src_w);
        ((src_w - w) / 2, 0, w, src_h)
    } else {
        // Source is taller (or exact): keep full width, trim top and bottom
        let h = ((src_w as f64 * tgt_h as f64 / tgt_w as f64).round() as u32).clamp(1, src_h);
        (0, (src_h - h) / 2, src_w, h)
    }
}
