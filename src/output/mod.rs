//! Render surfaces for the latency widget
//!
//! A surface receives every `DisplayState` the presenter computes and shows
//! it. The colored surface draws the text in its 24-bit color and mirrors the
//! title into the terminal window title; the plain surface prints one line per
//! update for pipes and logs.

mod colored;
mod plain;

pub use self::colored::ColoredSurface;
pub use self::plain::PlainSurface;

use crate::{
    error::Result,
    models::{Config, DisplayState},
};
use std::io::IsTerminal;
use std::sync::{Arc, Mutex};

/// Something that can show the widget state
pub trait RenderSurface: Send {
    /// Show a new state
    fn render(&mut self, state: &DisplayState) -> Result<()>;

    /// Switch the badge frame on or off; the next render picks it up
    fn set_skin(&mut self, enabled: bool);

    /// Called once before the process exits
    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

impl<S: RenderSurface + ?Sized> RenderSurface for Box<S> {
    fn render(&mut self, state: &DisplayState) -> Result<()> {
        (**self).render(state)
    }

    fn set_skin(&mut self, enabled: bool) {
        (**self).set_skin(enabled)
    }

    fn finish(&mut self) -> Result<()> {
        (**self).finish()
    }
}

/// Options shared by all surfaces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceOptions {
    /// Emit ANSI colors and the terminal title
    pub enable_color: bool,
    /// Draw the badge frame
    pub skin: bool,
    /// Redraw a single line instead of appending one line per update
    pub in_place: bool,
    /// Mirror the display title into the terminal window title
    pub set_title: bool,
}

impl Default for SurfaceOptions {
    fn default() -> Self {
        Self {
            enable_color: true,
            skin: false,
            in_place: false,
            set_title: false,
        }
    }
}

impl SurfaceOptions {
    /// Options for drawing on stdout.
    ///
    /// Redrawing in place needs an interactive terminal and no log lines on
    /// stderr to tear it apart. The window title is only written to a
    /// terminal unless color was forced.
    pub fn for_stdout(config: &Config, line_mode: bool, force_color: bool, is_terminal: bool) -> Self {
        let logs_to_terminal = config.verbose || config.debug;
        Self {
            enable_color: config.enable_color,
            skin: config.skin,
            in_place: !line_mode && !logs_to_terminal && is_terminal,
            set_title: config.enable_color && (is_terminal || force_color),
        }
    }
}

/// Wrap text in the badge frame when the skin is on
pub fn badge(text: &str, skin: bool) -> String {
    if skin {
        format!("◆ {} ◆", text)
    } else {
        text.to_string()
    }
}

/// Surface factory for creating the appropriate surface for stdout
pub struct SurfaceFactory;

impl SurfaceFactory {
    /// Create a surface based on color support and preferences
    pub fn create_surface(options: SurfaceOptions) -> Box<dyn RenderSurface> {
        if options.enable_color {
            Box::new(ColoredSurface::new(std::io::stdout(), options))
        } else {
            Box::new(PlainSurface::new(std::io::stdout(), options))
        }
    }

    /// Create a surface for stdout, redrawing in place only on an interactive terminal
    pub fn create_stdout_surface(config: &Config, line_mode: bool, force_color: bool) -> Box<dyn RenderSurface> {
        let is_terminal = std::io::stdout().is_terminal();
        Self::create_surface(SurfaceOptions::for_stdout(config, line_mode, force_color, is_terminal))
    }
}

/// Surface that keeps every rendered state in memory
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    frames: Arc<Mutex<Vec<DisplayState>>>,
    skin: Arc<Mutex<bool>>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every state rendered so far
    pub fn frames(&self) -> Vec<DisplayState> {
        self.frames.lock().map(|frames| frames.clone()).unwrap_or_default()
    }

    /// Most recently rendered state
    pub fn last(&self) -> Option<DisplayState> {
        self.frames.lock().ok().and_then(|frames| frames.last().cloned())
    }

    pub fn skin(&self) -> bool {
        self.skin.lock().map(|skin| *skin).unwrap_or(false)
    }
}

impl RenderSurface for RecordingSurface {
    fn render(&mut self, state: &DisplayState) -> Result<()> {
        let mut frames = self.frames.lock()
            .map_err(|_| crate::AppError::internal("Recording surface lock poisoned"))?;
        frames.push(state.clone());
        Ok(())
    }

    fn set_skin(&mut self, enabled: bool) {
        if let Ok(mut skin) = self.skin.lock() {
            *skin = enabled;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_badge() {
        assert_eq!(badge("20", false), "20");
        assert_eq!(badge("20", true), "◆ 20 ◆");
    }

    #[test]
    fn test_stdout_options_on_terminal() {
        let config = Config { skin: true, ..Config::default() };
        let options = SurfaceOptions::for_stdout(&config, false, false, true);
        assert!(options.in_place);
        assert!(options.set_title);
        assert!(options.skin);

        let options = SurfaceOptions::for_stdout(&config, true, false, true);
        assert!(!options.in_place);
        assert!(options.set_title);
    }

    #[test]
    fn test_stdout_options_when_piped() {
        let config = Config { enable_color: true, ..Config::default() };
        let options = SurfaceOptions::for_stdout(&config, false, false, false);
        assert!(!options.in_place);
        assert!(!options.set_title);

        // --color keeps the title even through a pipe
        let options = SurfaceOptions::for_stdout(&config, false, true, false);
        assert!(options.set_title);

        let config = Config { enable_color: false, ..Config::default() };
        let options = SurfaceOptions::for_stdout(&config, false, true, true);
        assert!(!options.set_title);
    }

    #[test]
    fn test_verbose_logging_disables_redraw() {
        let config = Config { verbose: true, ..Config::default() };
        assert!(!SurfaceOptions::for_stdout(&config, false, false, true).in_place);

        let config = Config { debug: true, ..Config::default() };
        assert!(!SurfaceOptions::for_stdout(&config, false, false, true).in_place);
    }

    #[test]
    fn test_piped_colored_surface_has_no_title() {
        let config = Config { enable_color: true, ..Config::default() };
        let options = SurfaceOptions::for_stdout(&config, false, false, false);
        let mut surface = ColoredSurface::new(Vec::new(), options);
        surface
            .render(&crate::presenter::present(crate::types::ProbeResult::success(20), true))
            .unwrap();

        let output = String::from_utf8(surface.into_inner()).unwrap();
        assert!(!output.contains("\x1b]0;"));
        assert!(output.ends_with('\n'));
    }

    #[test]
    fn test_recording_surface_shares_frames() {
        let recorder = RecordingSurface::new();
        let mut surface: Box<dyn RenderSurface> = Box::new(recorder.clone());

        surface.render(&DisplayState::not_available(false)).unwrap();
        surface.set_skin(true);

        assert_eq!(recorder.frames().len(), 1);
        assert_eq!(recorder.last().unwrap().text, "NA");
        assert!(recorder.skin());
    }
}
