use crate::braille::BrailleCanvas;

/// Bresenham line between two dots
pub fn draw_line(canvas: &mut BrailleCanvas, (x0, y0): (i32, i32), (x1, y1): (i32, i32)) {
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    let (mut x, mut y) = (x0, y0);

    loop {
        canvas.set_pixel(x, y);
        if x == x1 && y == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}

/// Filled disc of the given radius in dots; a radius below one dot still
/// marks the center so tiny values stay visible.
pub fn draw_disc(canvas: &mut BrailleCanvas, (cx, cy): (i32, i32), radius: f64, weight: f32) {
    let r = radius.ceil() as i32;
    let r2 = radius * radius;
    canvas.shade_pixel(cx, cy, weight);
    for dy in -r..=r {
        for dx in -r..=r {
            if (dx * dx + dy * dy) as f64 <= r2 {
                canvas.shade_pixel(cx + dx, cy + dy, weight);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_horizontal_line() {
        let mut canvas = BrailleCanvas::new(5, 1);
        draw_line(&mut canvas, (0, 0), (9, 0));
        assert_eq!(canvas.to_string(), "⠉⠉⠉⠉⠉");
    }

    #[test]
    fn test_vertical_line() {
        let mut canvas = BrailleCanvas::new(1, 2);
        draw_line(&mut canvas, (0, 0), (0, 7));
        assert_eq!(canvas.to_string(), "⡇\n⡇");
    }

    #[test]
    fn test_disc_sizes() {
        let mut tiny = BrailleCanvas::new(4, 2);
        draw_disc(&mut tiny, (3, 3), 0.2, 0.5);
        assert_eq!(tiny.cells().count(), 1);

        let mut big = BrailleCanvas::new(8, 4);
        draw_disc(&mut big, (8, 8), 6.0, 0.5);
        assert!(big.cells().count() > 10);
        assert!(big.cells().all(|(_, _, _, shade)| shade == 0.5));
    }
}
