//! Composite rendering: stamp the hidden target onto the uploaded photo.
//!
//! The target is a procedural silhouette (an ellipse body with two ears)
//! alpha-blended into the image, dimmed enough that only a careful eye picks
//! it out. Sprite assets and mask-aware occlusion live upstream; this is the
//! self-contained rendition.

use image::{DynamicImage, Rgba, RgbaImage};

const TARGET_COLOR: [u8; 3] = [24, 20, 34];
const TARGET_ALPHA: f32 = 0.55;

/// Coverage of the silhouette at `(dx, dy)` in sprite-local unit coordinates
/// (0..1 on both axes). 1.0 = fully inside.
fn silhouette(dx: f32, dy: f32) -> f32 {
    // Body: ellipse centered slightly low.
    let ex = (dx - 0.5) / 0.42;
    let ey = (dy - 0.58) / 0.40;
    if ex * ex + ey * ey <= 1.0 {
        return 1.0;
    }
    // Ears: two narrow triangles on top.
    for ear_cx in [0.32f32, 0.68f32] {
        if dy < 0.30 {
            let half_width = 0.055 * (dy / 0.30 + 0.35);
            if (dx - ear_cx).abs() <= half_width {
                return 1.0;
            }
        }
    }
    0.0
}

/// Blend the target silhouette into `image`, centered at `(cx, cy)` in source
/// pixels with the given footprint. Out-of-bounds parts are clipped.
pub fn overlay_target(image: &DynamicImage, cx: f32, cy: f32, w: f32, h: f32) -> RgbaImage {
    let mut out = image.to_rgba8();
    let (img_w, img_h) = (out.width() as i64, out.height() as i64);

    let x0 = (cx - w * 0.5).floor() as i64;
    let y0 = (cy - h * 0.5).floor() as i64;
    let x1 = (cx + w * 0.5).ceil() as i64;
    let y1 = (cy + h * 0.5).ceil() as i64;

    for py in y0.max(0)..y1.min(img_h) {
        for px in x0.max(0)..x1.min(img_w) {
            let dx = (px as f32 - (cx - w * 0.5)) / w;
            let dy = (py as f32 - (cy - h * 0.5)) / h;
            let cov = silhouette(dx.clamp(0.0, 1.0), dy.clamp(0.0, 1.0));
            if cov <= 0.0 {
                continue;
            }
            let alpha = TARGET_ALPHA * cov;
            let p = out.get_pixel_mut(px as u32, py as u32);
            let blended = [
                (TARGET_COLOR[0] as f32 * alpha + p.0[0] as f32 * (1.0 - alpha)) as u8,
                (TARGET_COLOR[1] as f32 * alpha + p.0[1] as f32 * (1.0 - alpha)) as u8,
                (TARGET_COLOR[2] as f32 * alpha + p.0[2] as f32 * (1.0 - alpha)) as u8,
                p.0[3],
            ];
            *p = Rgba(blended);
        }
    }
    out
}
