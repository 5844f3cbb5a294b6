//! Colored terminal surface
//!
//! Draws the display text in its 24-bit color and keeps the terminal window
//! title in sync with the display title. All terminal control goes through
//! crossterm commands, which always emit the full RGB foreground sequence.

use super::{badge, RenderSurface, SurfaceOptions};
use crate::{error::Result, models::DisplayState};
use crossterm::{
    cursor::MoveToColumn,
    queue,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor},
    terminal::{Clear, ClearType, SetTitle},
};
use std::io::Write;

/// ANSI terminal surface with window title support
pub struct ColoredSurface<W: Write + Send> {
    writer: W,
    skin: bool,
    in_place: bool,
    set_title: bool,
    last_title: Option<String>,
    dirty_line: bool,
}

impl<W: Write + Send> ColoredSurface<W> {
    pub fn new(writer: W, options: SurfaceOptions) -> Self {
        Self {
            writer,
            skin: options.skin,
            in_place: options.in_place,
            set_title: options.set_title,
            last_title: None,
            dirty_line: false,
        }
    }

    /// Consume the surface and return the writer
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn queue_title(&mut self, title: &str) -> Result<()> {
        if !self.set_title || self.last_title.as_deref() == Some(title) {
            return Ok(());
        }
        queue!(self.writer, SetTitle(title))?;
        self.last_title = Some(title.to_string());
        Ok(())
    }

    fn queue_text(&mut self, state: &DisplayState) -> Result<()> {
        let text = badge(&state.text, self.skin);
        let color = Color::Rgb {
            r: state.color.r,
            g: state.color.g,
            b: state.color.b,
        };
        queue!(
            self.writer,
            SetForegroundColor(color),
            SetAttribute(Attribute::Bold),
            Print(text),
            SetAttribute(Attribute::Reset),
            ResetColor
        )?;
        Ok(())
    }
}

impl<W: Write + Send> RenderSurface for ColoredSurface<W> {
    fn render(&mut self, state: &DisplayState) -> Result<()> {
        self.queue_title(&state.title)?;

        if self.in_place {
            queue!(self.writer, MoveToColumn(0), Clear(ClearType::CurrentLine))?;
            self.queue_text(state)?;
            self.dirty_line = true;
        } else {
            self.queue_text(state)?;
            queue!(self.writer, Print("\n"))?;
        }

        self.writer.flush()?;
        Ok(())
    }

    fn set_skin(&mut self, enabled: bool) {
        self.skin = enabled;
    }

    fn finish(&mut self) -> Result<()> {
        if self.dirty_line {
            queue!(self.writer, Print("\n"))?;
            self.dirty_line = false;
        }
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Rgb;

    fn success_state() -> DisplayState {
        DisplayState {
            text: "20".to_string(),
            title: "20ms".to_string(),
            color_enabled: true,
            color: Rgb::new(215, 215, 255),
        }
    }

    fn titled() -> SurfaceOptions {
        SurfaceOptions { set_title: true, ..Default::default() }
    }

    #[test]
    fn test_title_written_once_per_change() {
        let mut surface = ColoredSurface::new(Vec::new(), titled());
        surface.render(&success_state()).unwrap();
        surface.render(&success_state()).unwrap();
        surface.render(&DisplayState::not_available(true)).unwrap();

        let output = String::from_utf8(surface.into_inner()).unwrap();
        assert_eq!(output.matches("\x1b]0;20ms\x07").count(), 1);
        assert_eq!(output.matches("\x1b]0;NA\x07").count(), 1);
    }

    #[test]
    fn test_no_title_without_terminal() {
        let options = SurfaceOptions { set_title: false, ..Default::default() };
        let mut surface = ColoredSurface::new(Vec::new(), options);
        surface.render(&success_state()).unwrap();

        let output = String::from_utf8(surface.into_inner()).unwrap();
        assert!(!output.contains("\x1b]0;"));
        assert!(output.contains("38;2;215;215;255"));
    }

    #[test]
    fn test_every_latency_keeps_its_own_rgb() {
        let mut surface = ColoredSurface::new(Vec::new(), titled());
        for ms in [0u64, 10, 20, 30, 40, 50, 63, 64, 500] {
            let state = crate::presenter::present(crate::types::ProbeResult::success(ms), true);
            surface.render(&state).unwrap();
        }

        let output = String::from_utf8(surface.into_inner()).unwrap();
        for channel in [255u8, 235, 215, 195, 175, 155, 129, 128] {
            let sequence = format!("38;2;{};{};255m", channel, channel);
            assert!(output.contains(&sequence), "missing {}", sequence);
        }
    }

    #[test]
    fn test_in_place_redraw_and_finish() {
        let options = SurfaceOptions { in_place: true, skin: true, ..titled() };
        let mut surface = ColoredSurface::new(Vec::new(), options);
        surface.render(&success_state()).unwrap();
        surface.finish().unwrap();

        let output = String::from_utf8(surface.into_inner()).unwrap();
        assert!(output.contains("\x1b[1G"));
        assert!(output.contains("\x1b[2K"));
        assert!(output.contains("◆ 20 ◆"));
        assert!(output.ends_with('\n'));
    }
}
