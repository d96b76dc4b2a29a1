use image::{Rgba, RgbaImage};

/// Fills the whole surface with `color`.
pub fn clear(surface: &mut RgbaImage, color: [u8; 4]) {
    let px = Rgba(color);
    for p in surface.pixels_mut() {
        *p = px;
    }
}

/// One-pixel dilation against alpha bleeding.
///
/// Every fully transparent pixel that touches at least one non-transparent
/// pixel (8-neighbourhood) takes the average RGB of those neighbours. Alpha is
/// left untouched, so the visible image does not change; only the colour that
/// linear filtering blends in at sprite edges does.
pub fn dilate_edges(surface: &mut RgbaImage) {
    let (w, h) = surface.dimensions();
    if w == 0 || h == 0 {
        return;
    }
    let src = surface.clone();
    for y in 0..h {
        for x in 0..w {
            if src.get_pixel(x, y)[3] != 0 {
                continue;
            }
            let mut sum = [0u32; 3];
            let mut n = 0u32;
            for dy in -1i64..=1 {
                for dx in -1i64..=1 {
                    if dx == 0 && dy == 0 {
                        continue;
                    }
                    let nx = x as i64 + dx;
                    let ny = y as i64 + dy;
                    if nx < 0 || ny < 0 || nx >= w as i64 || ny >= h as i64 {
                        continue;
                    }
                    let p = src.get_pixel(nx as u32, ny as u32);
                    if p[3] == 0 {
                        continue;
                    }
                    sum[0] += p[0] as u32;
                    sum[1] += p[1] as u32;
                    sum[2] += p[2] as u32;
                    n += 1;
                }
            }
            if n > 0 {
                let a = src.get_pixel(x, y)[3];
                surface.put_pixel(
                    x,
                    y,
                    Rgba([
                        (sum[0] / n) as u8,
                        (sum[1] / n) as u8,
                        (sum[2] / n) as u8,
                        a,
                    ]),
                );
            }
        }
    }
}

/// Source-over blend of `color` into the pixel at `(x, y)` with extra `coverage` in 0..=1.
pub fn blend_pixel(surface: &mut RgbaImage, x: u32, y: u32, color: [u8; 4], coverage: f32) {
    if x >= surface.width() || y >= surface.height() {
        return;
    }
    let sa = (color[3] as f32 / 255.0) * coverage.clamp(0.0, 1.0);
    if sa <= 0.0 {
        return;
    }
    let dst = surface.get_pixel(x, y).0;
    let da = dst[3] as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    let mut out = [0u8; 4];
    for c in 0..3 {
        let s = color[c] as f32;
        let d = dst[c] as f32;
        let v = if out_a > 0.0 {
            (s * sa + d * da * (1.0 - sa)) / out_a
        } else {
            0.0
        };
        out[c] = v.round().clamp(0.0, 255.0) as u8;
    }
    out[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
    surface.put_pixel(x, y, Rgba(out));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dilate_copies_neighbour_colour_but_keeps_alpha() {
        let mut img = RgbaImage::new(3, 1);
        img.put_pixel(1, 0, Rgba([200, 100, 50, 255]));
        dilate_edges(&mut img);
        assert_eq!(img.get_pixel(0, 0).0, [200, 100, 50, 0]);
        assert_eq!(img.get_pixel(2, 0).0, [200, 100, 50, 0]);
        assert_eq!(img.get_pixel(1, 0).0, [200, 100, 50, 255]);
    }

    #[test]
    fn blend_full_coverage_replaces_transparent() {
        let mut img = RgbaImage::new(1, 1);
        blend_pixel(&mut img, 0, 0, [10, 20, 30, 255], 1.0);
        assert_eq!(img.get_pixel(0, 0).0, [10, 20, 30, 255]);
    }
}
