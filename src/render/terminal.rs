use super::canvas::PixelCanvas;
use crate::color::Color;
use std::io::{self, Write};

const LOWER_HALF_BLOCK: &str = "\u{2584}";
// Forces the first cell of each row to emit its colors.
const UNSET: Color = Color::rgb(255, 255, 254);

/// Writes a [`PixelCanvas`] as 24-bit ANSI half blocks: each terminal cell
/// shows two stacked device pixels (background = top, foreground = bottom).
pub struct TerminalPresenter {
    output_buf: Vec<u8>,
}

impl TerminalPresenter {
    pub fn new() -> Self {
        Self { output_buf: Vec::with_capacity(64 * 1024) }
    }

    /// Compose one frame into the internal buffer. `status` is printed on the
    /// row below the canvas when given.
    pub fn compose(&mut self, canvas: &PixelCanvas, status: Option<&str>) -> io::Result<&[u8]> {
        self.output_buf.clear();
        self.output_buf.extend_from_slice(b"\x1b[H");

        let (width, height) = canvas.device_size();
        let background = canvas.background();

        for y in (0..height).step_by(2) {
            let mut prev_top = UNSET;
            let mut prev_bot = UNSET;
            for x in 0..width {
                let top = canvas.pixel(x, y).unwrap_or(background);
                let bot = canvas.pixel(x, y + 1).unwrap_or(background);

                if top != prev_top {
                    write!(self.output_buf, "\x1b[48;2;{};{};{}m", top.r, top.g, top.b)?;
                    prev_top = top;
                }
                if bot != prev_bot {
                    write!(self.output_buf, "\x1b[38;2;{};{};{}m", bot.r, bot.g, bot.b)?;
                    prev_bot = bot;
                }
                self.output_buf.extend_from_slice(LOWER_HALF_BLOCK.as_bytes());
            }
            self.output_buf.extend_from_slice(b"\x1b[0m");
            if y + 2 < height {
                self.output_buf.extend_from_slice(b"\r\n");
            }
        }

        if let Some(status) = status {
            let line: String = status.chars().take(width).collect();
            write!(self.output_buf, "\r\n\x1b[2K\x1b[7m{line:<width$}\x1b[0m")?;
        }

        Ok(&self.output_buf)
    }

    pub fn present<W: Write>(&mut self, out: &mut W, canvas: &PixelCanvas, status: Option<&str>) -> io::Result<()> {
        let frame = self.compose(canvas, status)?;
        out.write_all(frame)?;
        out.flush()
    }
}

impl Default for TerminalPresenter {
    fn default() -> Self {
        Self::new()
    }
}
