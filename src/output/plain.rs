//! Plain text surface without colors or escape sequences

use super::{badge, RenderSurface, SurfaceOptions};
use crate::{error::Result, models::DisplayState};
use std::io::Write;

/// Prints one line per update: the display text, then the title
pub struct PlainSurface<W: Write + Send> {
    writer: W,
    skin: bool,
}

impl<W: Write + Send> PlainSurface<W> {
    pub fn new(writer: W, options: SurfaceOptions) -> Self {
        Self {
            writer,
            skin: options.skin,
        }
    }

    /// Consume the surface and return the writer
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn format_line(&self, state: &DisplayState) -> String {
        format!("{}\t{}", badge(&state.text, self.skin), state.title)
    }
}

impl<W: Write + Send> RenderSurface for PlainSurface<W> {
    fn render(&mut self, state: &DisplayState) -> Result<()> {
        let line = self.format_line(state);
        writeln!(self.writer, "{}", line)?;
        self.writer.flush()?;
        Ok(())
    }

    fn set_skin(&mut self, enabled: bool) {
        self.skin = enabled;
    }
}
