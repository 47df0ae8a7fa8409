//! Draw targets for scope traces

/// Anything a scope trace can be plotted onto
pub trait DrawTarget {
    /// Light the pixel at `(x, y)`; out-of-range coordinates are ignored
    fn set_pixel(&mut self, x: i32, y: i32);
}

/// Monochrome pixel buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelGrid {
    width: usize,
    height: usize,
    pixels: Vec<bool>,
}

impl PixelGrid {
    /// Blank grid
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![false; width * height],
        }
    }

    /// Grid width
    pub fn width(&self) -> usize {
        self.width
    }

    /// Grid height
    pub fn height(&self) -> usize {
        self.height
    }

    /// Whether `(x, y)` has been set
    pub fn is_set(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height && self.pixels[y * self.width + x]
    }

    /// Number of lit pixels
    pub fn count(&self) -> usize {
        self.pixels.iter().filter(|&&p| p).count()
    }

    /// Clear every pixel
    pub fn clear(&mut self) {
        self.pixels.iter_mut().for_each(|p| *p = false);
    }

    /// Downsample into text, one character per `cell_w × cell_h` block
    pub fn to_ascii(&self, cell_w: usize, cell_h: usize) -> String {
        let cell_w = cell_w.max(1);
        let cell_h = cell_h.max(1);
        let mut out = String::new();
        for cy in (0..self.height).step_by(cell_h) {
            for cx in (0..self.width).step_by(cell_w) {
                let lit = (cy..(cy + cell_h).min(self.height))
                    .any(|y| (cx..(cx + cell_w).min(self.width)).any(|x| self.is_set(x, y)));
                out.push(if lit { '*' } else { ' ' });
            }
            out.push('\n');
        }
        out
    }
}

impl DrawTarget for PixelGrid {
    fn set_pixel(&mut self, x: i32, y: i32) {
        if x < 0 || y < 0 {
            return;
        }
        let (x, y) = (x as usize, y as usize);
        if x < self.width && y < self.height {
            self.pixels[y * self.width + x] = true;
        }
    }
}
