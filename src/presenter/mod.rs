//! Turns probe outcomes into presentation state
//!
//! `present` is the pure mapping from a probe outcome to display text, title
//! and color. `Presenter` is the single owner of the current `DisplayState`:
//! probe results arrive over an mpsc channel, settings over a watch channel,
//! and only the presenter task writes the state and drives the surface.

use crate::{
    error::Result,
    logging::ProbeLogger,
    models::{DisplaySettings, DisplayState, Rgb},
    output::RenderSurface,
    stats::SessionStats,
    types::ProbeResult,
};
use tokio::sync::{mpsc, watch};

/// Largest amount subtracted from the red and green channels
pub const MAX_COLOR_DECREASE: u64 = 127;

/// Color for a successful probe with the tint enabled.
///
/// Red and green fade from 255 by two per millisecond and stop at 128, so
/// every latency of 64ms or more renders as `Rgb(128, 128, 255)`.
pub fn latency_color(latency_ms: u64) -> Rgb {
    let decrease = latency_ms.saturating_mul(2).min(MAX_COLOR_DECREASE) as u8;
    let channel = 255 - decrease;
    Rgb::new(channel, channel, 255)
}

/// Compute the display state for one probe outcome
pub fn present(result: ProbeResult, color_enabled: bool) -> DisplayState {
    match result {
        ProbeResult::Success { latency_ms } => {
            let text = latency_ms.to_string();
            let title = format!("{}ms", text);
            let color = if color_enabled {
                latency_color(latency_ms)
            } else {
                Rgb::WHITE
            };
            DisplayState {
                text,
                title,
                color_enabled,
                color,
            }
        }
        ProbeResult::Failure(_) => DisplayState::not_available(color_enabled),
    }
}

/// Single writer of the widget's presentation state
pub struct Presenter {
    state: DisplayState,
    settings: DisplaySettings,
    surface: Box<dyn RenderSurface>,
    stats: SessionStats,
    logger: ProbeLogger,
}

impl Presenter {
    /// Create a presenter; the surface is told about the initial skin
    pub fn new(mut surface: Box<dyn RenderSurface>, settings: DisplaySettings, logger: ProbeLogger) -> Self {
        surface.set_skin(settings.skin);
        Self {
            state: DisplayState::placeholder(),
            settings,
            surface,
            stats: SessionStats::new(),
            logger,
        }
    }

    /// Current presentation state
    pub fn state(&self) -> &DisplayState {
        &self.state
    }

    /// Settings currently in effect
    pub fn settings(&self) -> DisplaySettings {
        self.settings
    }

    /// Statistics for every result applied so far
    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    /// Draw the current state
    pub fn render(&mut self) -> Result<()> {
        self.surface.render(&self.state)
    }

    /// Apply one probe outcome and render it
    pub async fn apply(&mut self, result: ProbeResult) -> Result<()> {
        self.stats.record(&result);
        self.state = present(result, self.settings.color_effect);

        if let ProbeResult::Success { latency_ms } = result {
            if self.settings.color_effect {
                self.logger.log_color(latency_ms, self.state.color).await;
            }
        }

        self.render()
    }

    /// Apply new toggles.
    ///
    /// Turning the tint off resets the color to white at once; turning it on
    /// waits for the next successful probe.
    pub fn apply_settings(&mut self, settings: DisplaySettings) -> Result<()> {
        let previous = self.settings;
        self.settings = settings;

        let mut redraw = false;

        if previous.color_effect != settings.color_effect {
            self.state.color_enabled = settings.color_effect;
            if !settings.color_effect && !self.state.color.is_white() {
                self.state.color = Rgb::WHITE;
                redraw = true;
            }
        }

        if previous.skin != settings.skin {
            self.surface.set_skin(settings.skin);
            redraw = true;
        }

        if redraw {
            self.render()?;
        }
        Ok(())
    }

    /// Consume results and settings until the result channel closes
    pub async fn run(
        &mut self,
        mut results: mpsc::Receiver<ProbeResult>,
        mut settings: watch::Receiver<DisplaySettings>,
    ) -> Result<()> {
        let mut settings_open = true;

        loop {
            tokio::select! {
                received = results.recv() => match received {
                    Some(result) => self.apply(result).await?,
                    None => break,
                },
                changed = settings.changed(), if settings_open => match changed {
                    Ok(()) => {
                        let next = *settings.borrow_and_update();
                        self.apply_settings(next)?;
                    }
                    Err(_) => settings_open = false,
                },
            }
        }

        Ok(())
    }

    /// Let the surface clean up before exit
    pub fn finish(&mut self) -> Result<()> {
        self.surface.finish()
    }
}
