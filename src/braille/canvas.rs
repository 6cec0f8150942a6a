/// Braille canvas: each terminal cell holds a 2x4 dot grid (U+2800..U+28FF).
///
/// Every cell also carries a shade in [0, 1], the strongest weight of any dot
/// drawn into it, which the UI turns into a foreground brightness.
pub struct BrailleCanvas {
    width: usize,  // Characters
    height: usize, // Characters
    dots: Vec<u8>,
    shade: Vec<f32>,
}

impl BrailleCanvas {
    /// Canvas of `width` x `height` characters (`2*width` x `4*height` dots)
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            dots: vec![0; width * height],
            shade: vec![0.0; width * height],
        }
    }

    /// Dot bit inside a cell:
    /// ```text
    /// (0,0) (1,0)   0x01 0x08
    /// (0,1) (1,1)   0x02 0x10
    /// (0,2) (1,2)   0x04 0x20
    /// (0,3) (1,3)   0x40 0x80
    /// ```
    #[inline(always)]
    fn dot_bit(x: usize, y: usize) -> u8 {
        match (x % 2, y % 4) {
            (0, 0) => 0x01,
            (1, 0) => 0x08,
            (0, 1) => 0x02,
            (1, 1) => 0x10,
            (0, 2) => 0x04,
            (1, 2) => 0x20,
            (0, 3) => 0x40,
            _ => 0x80,
        }
    }

    /// Set a dot with full weight
    pub fn set_pixel(&mut self, x: i32, y: i32) {
        self.shade_pixel(x, y, 1.0);
    }

    /// Set a dot, raising the cell's shade to at least `weight`.
    /// Out-of-canvas coordinates are ignored.
    pub fn shade_pixel(&mut self, x: i32, y: i32, weight: f32) {
        if x < 0 || y < 0 {
            return;
        }
        let (x, y) = (x as usize, y as usize);
        let (cx, cy) = (x / 2, y / 4);
        if cx >= self.width || cy >= self.height {
            return;
        }

        let idx = cy * self.width + cx;
        self.dots[idx] |= Self::dot_bit(x, y);
        self.shade[idx] = self.shade[idx].max(weight);
    }

    /// Non-empty cells as (column, row, glyph, shade)
    pub fn cells(&self) -> impl Iterator<Item = (u16, u16, char, f32)> + '_ {
        self.dots.iter().enumerate().filter(|(_, b)| **b != 0).map(|(idx, &b)| {
            let ch = char::from_u32(0x2800 + b as u32).unwrap_or(' ');
            ((idx % self.width) as u16, (idx / self.width) as u16, ch, self.shade[idx])
        })
    }

    /// Whole canvas as text, one line per row
    #[cfg(test)]
    pub fn to_string(&self) -> String {
        self.dots
            .chunks(self.width.max(1))
            .map(|row| row.iter().map(|&b| char::from_u32(0x2800 + b as u32).unwrap_or(' ')).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_pixel() {
        let mut canvas = BrailleCanvas::new(1, 1);
        canvas.set_pixel(0, 0);
        assert_eq!(canvas.to_string(), "⠁");
    }

    #[test]
    fn test_all_dots() {
        let mut canvas = BrailleCanvas::new(1, 1);
        for x in 0..2 {
            for y in 0..4 {
                canvas.set_pixel(x, y);
            }
        }
        assert_eq!(canvas.to_string(), "⣿");
    }

    #[test]
    fn test_out_of_bounds_ignored() {
        let mut canvas = BrailleCanvas::new(1, 1);
        canvas.set_pixel(-1, 0);
        canvas.set_pixel(2, 0);
        canvas.set_pixel(0, 4);
        assert_eq!(canvas.cells().count(), 0);
    }

    #[test]
    fn test_shade_keeps_strongest() {
        let mut canvas = BrailleCanvas::new(2, 1);
        canvas.shade_pixel(0, 0, 0.3);
        canvas.shade_pixel(1, 1, 0.8);
        canvas.shade_pixel(1, 2, 0.5);
        canvas.shade_pixel(2, 0, 0.2);

        let cells: Vec<_> = canvas.cells().collect();
        assert_eq!(cells.len(), 2);
        assert_eq!((cells[0].0, cells[0].3), (0, 0.8));
        assert_eq!((cells[1].0, cells[1].3), (1, 0.2));
    }
}
