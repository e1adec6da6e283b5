use std::io::{self, BufWriter, Stdout, Write};

use crossterm::{
    cursor, execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, ClearType},
};

use super::raster::FrameBuffer;

pub struct TerminalRenderer {
    stdout: BufWriter<Stdout>,
    width: u16,
    height: u16,
}

impl TerminalRenderer {
    pub fn new() -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        Ok(Self {
            stdout: BufWriter::new(io::stdout()),
            width,
            height,
        })
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.stdout,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            terminal::Clear(ClearType::All)
        )?;
        Ok(())
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(
            self.stdout,
            ResetColor,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    pub fn get_size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    pub fn manual_resize(&mut self, width: u16, height: u16) -> io::Result<()> {
        self.width = width;
        self.height = height;
        queue!(self.stdout, terminal::Clear(ClearType::All))?;
        Ok(())
    }

    pub fn clear(&mut self) -> io::Result<()> {
        queue!(self.stdout, ResetColor, terminal::Clear(ClearType::All))?;
        Ok(())
    }

    pub fn render_line_colored(&mut self, x: u16, y: u16, line: &str, color: Color) -> io::Result<()> {
        if x >= self.width || y >= self.height {
            return Ok(());
        }
        let room = (self.width - x) as usize;
        let clipped: String = line.chars().take(room).collect();
        queue!(
            self.stdout,
            cursor::MoveTo(x, y),
            SetForegroundColor(color),
            Print(clipped)
        )?;
        Ok(())
    }

    /// Blits a frame buffer, batching runs of identically coloured cells.
    pub fn present(&mut self, frame: &FrameBuffer) -> io::Result<()> {
        let rows = frame.height().min(self.height);
        let cols = frame.width().min(self.width) as usize;

        for y in 0..rows {
            queue!(self.stdout, cursor::MoveTo(0, y))?;
            let mut run = String::with_capacity(cols);
            let mut colors: Option<([u8; 3], [u8; 3])> = None;

            for cell in &frame.row(y)[..cols] {
                let key = (cell.fg, cell.bg);
                if colors != Some(key) {
                    self.flush_run(&mut run, colors)?;
                    colors = Some(key);
                }
                run.push(cell.ch);
            }
            self.flush_run(&mut run, colors)?;
        }
        queue!(self.stdout, ResetColor)?;
        Ok(())
    }

    fn flush_run(&mut self, run: &mut String, colors: Option<([u8; 3], [u8; 3])>) -> io::Result<()> {
        if run.is_empty() {
            return Ok(());
        }
        if let Some((fg, bg)) = colors {
            queue!(
                self.stdout,
                SetForegroundColor(rgb(fg)),
                SetBackgroundColor(rgb(bg))
            )?;
        }
        queue!(self.stdout, Print(run.as_str()))?;
        run.clear();
        Ok(())
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.stdout.flush()
    }
}

fn rgb([r, g, b]: [u8; 3]) -> Color {
    Color::Rgb { r, g, b }
}
