//! Line-oriented runtime controls read from stdin

use crate::{
    error::{AppError, Result},
    log_info, log_warn,
    logging::Logger,
    models::DisplaySettings,
};
use std::io::BufRead;
use tokio::sync::{mpsc, watch};

/// A single control command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlCommand {
    ToggleColorEffect,
    ToggleSkin,
    Quit,
}

impl std::str::FromStr for ControlCommand {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "c" | "color" => Ok(Self::ToggleColorEffect),
            "s" | "skin" => Ok(Self::ToggleSkin),
            "q" | "quit" | "exit" => Ok(Self::Quit),
            other => Err(AppError::parse(format!("Unknown command: '{}'", other))),
        }
    }
}

/// How the control reader ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlsExit {
    /// The user asked to quit
    Quit,
    /// Input closed; the widget keeps running without controls
    InputClosed,
}

/// Publishes setting changes for the presenter
pub struct Controls {
    settings: watch::Sender<DisplaySettings>,
    logger: Logger,
}

impl Controls {
    pub fn new(settings: watch::Sender<DisplaySettings>, logger: Logger) -> Self {
        Self { settings, logger }
    }

    /// Apply one command; returns false when the widget should quit
    pub fn apply(&self, command: ControlCommand) -> bool {
        match command {
            ControlCommand::ToggleColorEffect => {
                self.settings.send_modify(|s| s.color_effect = !s.color_effect);
                true
            }
            ControlCommand::ToggleSkin => {
                self.settings.send_modify(|s| s.skin = !s.skin);
                true
            }
            ControlCommand::Quit => false,
        }
    }

    /// Current settings
    pub fn settings(&self) -> DisplaySettings {
        *self.settings.borrow()
    }

    /// Handle input lines until quit or until the line source closes
    pub async fn run(self, mut lines: mpsc::Receiver<String>) -> ControlsExit {
        while let Some(line) = lines.recv().await {
            if line.trim().is_empty() {
                continue;
            }

            match line.parse::<ControlCommand>() {
                Ok(command) => {
                    if !self.apply(command) {
                        return ControlsExit::Quit;
                    }
                    let settings = self.settings();
                    log_info!(
                        self.logger,
                        "Settings changed: color effect {}, skin {}",
                        if settings.color_effect { "on" } else { "off" },
                        if settings.skin { "on" } else { "off" }
                    );
                }
                Err(e) => {
                    log_warn!(self.logger, "{} (use c, s or q)", e);
                }
            }
        }

        ControlsExit::InputClosed
    }
}

/// Forward stdin lines from a dedicated thread.
///
/// A plain thread keeps the blocking read off the runtime, so a pending read
/// never holds up shutdown.
pub fn spawn_stdin_reader() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel(16);

    std::thread::Builder::new()
        .name("stdin-controls".to_string())
        .spawn(move || {
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                match line {
                    Ok(line) => {
                        if tx.blocking_send(line).is_err() {
                            break;
                        }
                    }
                    Err(_) => break,
                }
            }
        })
        .map(|_| ())
        .unwrap_or_else(|e| eprintln!("Failed to start control input thread: {}", e));

    rx
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controls() -> (Controls, watch::Receiver<DisplaySettings>) {
        let (tx, rx) = watch::channel(DisplaySettings::default());
        (Controls::new(tx, Logger::new("CTRL".to_string())), rx)
    }

    #[test]
    fn test_command_parsing() {
        assert_eq!("c".parse::<ControlCommand>().unwrap(), ControlCommand::ToggleColorEffect);
        assert_eq!(" Skin ".parse::<ControlCommand>().unwrap(), ControlCommand::ToggleSkin);
        assert_eq!("exit".parse::<ControlCommand>().unwrap(), ControlCommand::Quit);
        assert!("x".parse::<ControlCommand>().is_err());
    }

    #[test]
    fn test_apply_toggles() {
        let (controls, rx) = controls();

        assert!(controls.apply(ControlCommand::ToggleColorEffect));
        assert!(rx.borrow().color_effect);
        assert!(controls.apply(ControlCommand::ToggleColorEffect));
        assert!(!rx.borrow().color_effect);

        assert!(controls.apply(ControlCommand::ToggleSkin));
        assert!(rx.borrow().skin);

        assert!(!controls.apply(ControlCommand::Quit));
    }

    async fn feed(lines: &[&str]) -> mpsc::Receiver<String> {
        let (tx, rx) = mpsc::channel(lines.len().max(1));
        for line in lines {
            tx.send(line.to_string()).await.unwrap();
        }
        rx
    }

    #[tokio::test]
    async fn test_run_until_quit() {
        let (controls, rx) = controls();
        let input = feed(&["c", "", "bogus", "s", "q", "c"]).await;

        let exit = controls.run(input).await;

        assert_eq!(exit, ControlsExit::Quit);
        let settings = *rx.borrow();
        assert!(settings.color_effect);
        assert!(settings.skin);
    }

    #[tokio::test]
    async fn test_run_until_input_closed() {
        let (controls, rx) = controls();
        let input = feed(&["s"]).await;

        assert_eq!(controls.run(input).await, ControlsExit::InputClosed);
        assert!(rx.borrow().skin);
    }
}
