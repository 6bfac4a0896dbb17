/// Half-block presenter: shows a packed ARGB pixel buffer in the terminal
use crossterm::{
    cursor,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    QueueableCommand,
};
use std::io::Write;
use sw3d_core::Rgb;

/// Upper half block: the foreground paints the top pixel, the background the bottom one
const HALF_BLOCK: char = '\u{2580}';

/// Terminal presenter stacking two pixel rows into every character cell
pub struct HalfBlockRenderer {
    origin_row: u16,
}

impl HalfBlockRenderer {
    pub fn new(origin_row: u16) -> Self {
        Self { origin_row }
    }

    /// Framebuffer size that exactly fills `cols × rows` cells below the origin row
    pub fn pixel_size(&self, cols: u16, rows: u16) -> (usize, usize) {
        let usable = rows.saturating_sub(self.origin_row).max(1);
        (cols.max(1) as usize, usable as usize * 2)
    }

    pub fn draw<W: Write>(&self, writer: &mut W, argb: &[u32], width: usize, height: usize) -> std::io::Result<()> {
        let mut current: Option<(Rgb, Rgb)> = None;

        for row in 0..height.div_ceil(2) {
            writer.queue(cursor::MoveTo(0, self.origin_row + row as u16))?;
            for col in 0..width {
                let colors = cell_colors(argb, width, height, col, row);
                if current != Some(colors) {
                    let (top, bottom) = colors;
                    writer.queue(SetForegroundColor(to_color(top)))?;
                    writer.queue(SetBackgroundColor(to_color(bottom)))?;
                    current = Some(colors);
                }
                writer.queue(Print(HALF_BLOCK))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

/// Top and bottom pixel colors for one cell; rows past the buffer read as black
pub fn cell_colors(argb: &[u32], width: usize, height: usize, col: usize, row: usize) -> (Rgb, Rgb) {
    let pixel = |y: usize| {
        if y < height {
            argb.get(y * width + col).map_or(Rgb::BLACK, |&p| Rgb::from_argb(p))
        } else {
            Rgb::BLACK
        }
    };
    (pixel(row * 2), pixel(row * 2 + 1))
}

fn to_color(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.r,
        g: rgb.g,
        b: rgb.b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_size_fills_terminal() {
        let renderer = HalfBlockRenderer::new(1);
        assert_eq!(renderer.pixel_size(80, 25), (80, 48));
        assert_eq!(renderer.pixel_size(0, 0), (1, 2));
    }

    #[test]
    fn test_cell_colors_pair_rows() {
        let red = Rgb::new(255, 0, 0).to_argb();
        let blue = Rgb::new(0, 0, 255).to_argb();
        // 2x3 buffer: rows red, blue, red
        let argb = [red, red, blue, blue, red, red];
        assert_eq!(cell_colors(&argb, 2, 3, 1, 0), (Rgb::new(255, 0, 0), Rgb::new(0, 0, 255)));
        assert_eq!(cell_colors(&argb, 2, 3, 0, 1), (Rgb::new(255, 0, 0), Rgb::BLACK));
    }

    #[test]
    fn test_draw_emits_one_glyph_per_cell() {
        let argb = vec![Rgb::new(1, 2, 3).to_argb(); 4 * 4];
        let mut out = Vec::new();
        HalfBlockRenderer::new(0).draw(&mut out, &argb, 4, 4).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.matches(HALF_BLOCK).count(), 8);
        // Uniform buffer: colors are set once
        assert_eq!(text.matches("38;2;1;2;3").count(), 1);
    }
}
