//! Filled-region bounds
//!
//! Scan-converts a path's interior with the non-zero winding rule, one sample
//! per pixel center and no anti-aliasing, then reports the integer extent of
//! the covered pixels. Open contours are closed implicitly.

use tiny_skia::{FillRule, Mask, Transform};

use crate::geometry::{IntRect, Rect};
use crate::path::Path;

/// Largest area scanned; bigger outlines report their rounded-out extent
const MAX_REGION_PIXELS: u64 = 1 << 26;

/// Bounds of the pixels `path` covers when filled
///
/// `outline` must contain the path. Returns `IntRect::ZERO` when nothing is
/// covered.
pub(crate) fn fill_bounds(path: &Path, outline: Rect) -> IntRect {
    let frame = outline.round_out();
    if frame.is_empty() {
        return IntRect::ZERO;
    }
    let Some(skia_path) = path.to_tiny_skia() else {
        return IntRect::ZERO;
    };

    let (width, height) = (frame.width() as u32, frame.height() as u32);
    if u64::from(width) * u64::from(height) > MAX_REGION_PIXELS {
        return frame;
    }

    let Some(mut mask) = Mask::new(width, height) else {
        return IntRect::ZERO;
    };
    let shift = Transform::from_translate(-frame.left as f32, -frame.top as f32);
    let Some(local) = skia_path.transform(shift) else {
        return IntRect::ZERO;
    };
    mask.fill_path(&local, FillRule::Winding, false, Transform::identity());

    match covered(mask.data(), width as usize) {
        Some(r) => IntRect::from_ltrb(
            frame.left + r.left,
            frame.top + r.top,
            frame.left + r.right,
            frame.top + r.bottom,
        ),
        None => IntRect::ZERO,
    }
}

/// Extent of the non-zero cells of a row-major coverage buffer
fn covered(data: &[u8], width: usize) -> Option<IntRect> {
    let mut found: Option<IntRect> = None;

    for (y, row) in data.chunks_exact(width).enumerate() {
        let Some(first) = row.iter().position(|&a| a != 0) else {
            continue;
        };
        let last = row.iter().rposition(|&a| a != 0).unwrap_or(first);
        let (left, right, y) = (first as i32, last as i32 + 1, y as i32);

        found = Some(match found {
            Some(r) => IntRect::from_ltrb(r.left.min(left), r.top, r.right.max(right), y + 1),
            None => IntRect::from_ltrb(left, y, right, y + 1),
        });
    }

    found
}
