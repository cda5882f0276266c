//! Solid-fill and blit primitives over [`RgbImage`] buffers.
//!
//! Every primitive clips silently against the destination: pixels that fall
//! outside the buffer are dropped, never reported. Coordinates are signed so
//! callers can pass footprints that hang off any edge of the canvas.

use image::{imageops, Rgb, RgbImage};
use rand::Rng;

/// Pure white, used for mask rendering.
pub const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

/// Pure black, the blank mask value.
pub const BLACK: Rgb<u8> = Rgb([0, 0, 0]);

/// Clamp the half-open span `[start, end)` to `[0, limit)`.
///
/// Returns `None` when nothing of the span overlaps.
fn clip_span(start: i64, end: i64, limit: u32) -> Option<(u32, u32)> {
    let lo = start.max(0);
    let hi = end.min(limit as i64);
    if lo >= hi {
        return None;
    }
    Some((lo as u32, hi as u32))
}

/// Fill a solid disk of `radius` centered on `center`.
///
/// A pixel is inside when its squared distance to the center is at most
/// `radius²`, so a radius of 0 paints the center pixel alone.
pub fn fill_circle(buf: &mut RgbImage, center: (i64, i64), radius: u32, color: Rgb<u8>) {
    let (cx, cy) = center;
    let r = radius as i64;
    let Some((x0, x1)) = clip_span(cx - r, cx + r + 1, buf.width()) else {
        return;
    };
    let Some((y0, y1)) = clip_span(cy - r, cy + r + 1, buf.height()) else {
        return;
    };
    let r_sq = r * r;
    for y in y0..y1 {
        let dy = y as i64 - cy;
        for x in x0..x1 {
            let dx = x as i64 - cx;
            if dx * dx + dy * dy <= r_sq {
                buf.put_pixel(x, y, color);
            }
        }
    }
}

/// Fill the inclusive rectangle spanned by two opposite corners.
///
/// The corners may be given in any order.
pub fn fill_rect(buf: &mut RgbImage, corner_a: (i64, i64), corner_b: (i64, i64), color: Rgb<u8>) {
    let (left, right) = (corner_a.0.min(corner_b.0), corner_a.0.max(corner_b.0));
    let (top, bottom) = (corner_a.1.min(corner_b.1), corner_a.1.max(corner_b.1));
    let Some((x0, x1)) = clip_span(left, right + 1, buf.width()) else {
        return;
    };
    let Some((y0, y1)) = clip_span(top, bottom + 1, buf.height()) else {
        return;
    };
    for y in y0..y1 {
        for x in x0..x1 {
            buf.put_pixel(x, y, color);
        }
    }
}

/// Composite `texture` onto `dest` with its top-left corner at `origin`.
///
/// Channel by channel, a nonzero texture value replaces the destination value
/// and a zero texture value leaves it untouched. The overlap with the
/// destination is truncated silently.
pub fn blit_nonzero(dest: &mut RgbImage, texture: &RgbImage, origin: (i64, i64)) {
    let (ox, oy) = origin;
    let Some((x0, x1)) = clip_span(ox, ox + texture.width() as i64, dest.width()) else {
        return;
    };
    let Some((y0, y1)) = clip_span(oy, oy + texture.height() as i64, dest.height()) else {
        return;
    };
    for y in y0..y1 {
        let ty = (y as i64 - oy) as u32;
        for x in x0..x1 {
            let tx = (x as i64 - ox) as u32;
            let src = texture.get_pixel(tx, ty);
            let dst = dest.get_pixel_mut(x, y);
            for (d, s) in dst.0.iter_mut().zip(src.0) {
                if s != 0 {
                    *d = s;
                }
            }
        }
    }
}

/// Copy the `width × height` region whose top-left corner is `top_left`.
pub fn crop(buf: &RgbImage, top_left: (u32, u32), width: u32, height: u32) -> RgbImage {
    imageops::crop_imm(buf, top_left.0, top_left.1, width, height).to_image()
}

/// A canvas of per-channel uniform noise in `[0, 255)`.
pub fn noise_canvas<R: Rng + ?Sized>(width: u32, height: u32, rng: &mut R) -> RgbImage {
    let mut canvas = RgbImage::new(width, height);
    for px in canvas.pixels_mut() {
        *px = Rgb([
            rng.gen_range(0..255),
            rng.gen_range(0..255),
            rng.gen_range(0..255),
        ]);
    }
    canvas
}

/// An independent uniformly random RGB triple.
pub fn random_color<R: Rng + ?Sized>(rng: &mut R) -> Rgb<u8> {
    Rgb([rng.gen(), rng.gen(), rng.gen()])
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
