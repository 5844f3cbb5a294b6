//! Application wiring: prober task, presenter loop and runtime controls

use crate::{
    cli::{topic_help, Cli},
    config::{display_config_summary, load_config, validate_config, EnvManager},
    controls::{spawn_stdin_reader, Controls, ControlsExit},
    error::{AppError, Result},
    logging::LoggerFactory,
    models::{Config, DisplaySettings},
    output::{RenderSurface, SurfaceFactory},
    presenter::Presenter,
    prober::{EchoProbe, IcmpProbe, Prober},
    stats::SessionStats,
    log_debug, log_info,
};
use std::future::Future;
use tokio::sync::{mpsc, watch};

/// Probe results buffered between the prober and the presenter
const RESULT_CHANNEL_CAPACITY: usize = 8;

/// Main application struct that coordinates all components
pub struct App {
    cli: Cli,
}

impl App {
    /// Create a new application instance with CLI configuration
    pub fn new(cli: Cli) -> Result<Self> {
        cli.validate().map_err(AppError::validation)?;
        Ok(Self { cli })
    }

    /// Load configuration, open the ICMP socket and run until quit.
    ///
    /// Returns the statistics of the session.
    pub async fn run(self) -> Result<SessionStats> {
        if let Some(topic) = &self.cli.help_topic {
            println!("{}", topic_help(topic).map_err(AppError::validation)?);
            return Ok(SessionStats::new());
        }

        if let Some(path) = &self.cli.init_env {
            EnvManager::save_example_env_file(path)?;
            println!("Wrote example configuration to {}", path.display());
            return Ok(SessionStats::new());
        }

        let config = load_config(self.cli.clone())?;
        let warnings = validate_config(&config)?;

        if config.debug {
            eprintln!("{} v{}", crate::PKG_NAME, crate::VERSION);
            eprintln!(
                "Built {} from {} for {}",
                option_env!("BUILD_TIME").unwrap_or("unknown"),
                option_env!("GIT_COMMIT").unwrap_or("unknown"),
                option_env!("TARGET_TRIPLE").unwrap_or("unknown"),
            );
            eprintln!();
            eprint!("{}", self.cli.get_config_summary());
            eprintln!();
            eprintln!("Configuration Summary:");
            eprintln!("{}", display_config_summary(&config));
            eprintln!();
            for issue in EnvManager::validate_current_env() {
                eprintln!("Environment: {}", issue);
            }
        }

        for warning in &warnings {
            eprintln!("{}", warning.format(config.enable_color));
        }

        // Every colored call site follows the resolved setting, including --color on a pipe
        colored::control::set_override(config.enable_color);

        let factory = LoggerFactory::new(config.clone());
        let probe = IcmpProbe::new(config.target)?;
        let force_color = self.cli.color_override() == Some(true);
        let surface = SurfaceFactory::create_stdout_surface(&config, self.cli.lines, force_color);

        let stats = run_session(
            &config,
            &factory,
            probe,
            surface,
            spawn_stdin_reader(),
            shutdown_signal(),
        )
        .await?;

        if config.verbose {
            eprintln!("{}", stats.summary());
        }

        Ok(stats)
    }
}

/// Run one widget session.
///
/// The prober runs on its own task and feeds the presenter over an mpsc
/// channel. Control lines toggle settings through a watch channel. The
/// session ends when the prober stops, the user quits or `shutdown` resolves.
pub async fn run_session<P, F>(
    config: &Config,
    factory: &LoggerFactory,
    probe: P,
    surface: Box<dyn RenderSurface>,
    control_lines: mpsc::Receiver<String>,
    shutdown: F,
) -> Result<SessionStats>
where
    P: EchoProbe + 'static,
    F: Future<Output = ()>,
{
    let logger = factory.create_logger("APP").await;
    logger.add_context_field("target".to_string(), config.target.to_string()).await;

    let initial = DisplaySettings::new(config.color_effect, config.skin);
    let (settings_tx, settings_rx) = watch::channel(initial);
    let (results_tx, results_rx) = mpsc::channel(RESULT_CHANNEL_CAPACITY);

    let probe_logger = factory.create_probe_logger().await;
    let prober = Prober::new(probe, config, probe_logger.clone());
    let prober_handle = prober.spawn(results_tx);

    let mut presenter = Presenter::new(surface, initial, probe_logger);
    presenter.render()?;

    let controls = Controls::new(settings_tx, factory.create_logger("CTRL").await);
    let quit_requested = async move {
        if controls.run(control_lines).await == ControlsExit::Quit {
            return;
        }
        // Without input the widget keeps running
        std::future::pending::<()>().await
    };

    log_info!(
        logger,
        "Probing {} every {}ms (timeout {}ms)",
        config.target,
        config.interval_ms,
        config.timeout_ms
    );

    tokio::select! {
        result = presenter.run(results_rx, settings_rx) => {
            result?;
            log_debug!(logger, "Prober finished");
        }
        _ = quit_requested => {
            log_info!(logger, "Quit requested");
        }
        _ = shutdown => {
            log_info!(logger, "Interrupted");
        }
    }

    prober_handle.abort();
    presenter.finish()?;

    Ok(presenter.stats().clone())
}

/// Resolves on Ctrl-C
async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        // No signal handler available; rely on the other exits
        std::future::pending::<()>().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        output::RecordingSurface,
        prober::ScriptedProbe,
        types::{FailureReason, ProbeResult},
    };

    fn config(max_cycles: Option<u64>, color_effect: bool) -> Config {
        Config {
            interval_ms: 1,
            timeout_ms: 50,
            max_cycles,
            color_effect,
            ..Config::default()
        }
    }

    #[test]
    fn test_app_rejects_conflicting_color_flags() {
        let cli = Cli { color: true, no_color: true, ..Cli::default() };
        let err = App::new(cli).err().unwrap();
        assert_eq!(err.category(), "VALIDATION");
    }

    #[tokio::test]
    async fn test_session_runs_until_cycle_limit() {
        let config = config(Some(3), true);
        let factory = LoggerFactory::new(config.clone());
        let recorder = RecordingSurface::new();
        let probe = ScriptedProbe::new(vec![
            Ok(ProbeResult::success(20)),
            Ok(ProbeResult::failure(FailureReason::Timeout)),
            Ok(ProbeResult::success(100)),
        ]);
        let (_lines_tx, lines_rx) = mpsc::channel(1);

        let stats = run_session(
            &config,
            &factory,
            probe,
            Box::new(recorder.clone()),
            lines_rx,
            std::future::pending::<()>(),
        )
        .await
        .unwrap();

        assert_eq!(stats.total(), 3);
        assert_eq!(stats.successes, 2);
        assert_eq!(stats.timeouts, 1);

        let frames = recorder.frames();
        // Placeholder first, then one frame per probe
        assert_eq!(frames.len(), 4);
        assert_eq!(frames[0].text, "--");
        assert_eq!(frames[1].title, "20ms");
        assert_eq!(frames[2].text, "NA");
        assert_eq!(frames[3].color, crate::models::Rgb::new(128, 128, 255));
    }

    #[tokio::test]
    async fn test_session_quits_on_command() {
        let config = config(Some(1_000_000), false);
        let factory = LoggerFactory::new(config.clone());
        let recorder = RecordingSurface::new();
        let probe = ScriptedProbe::repeating(ProbeResult::success(5));
        let (lines_tx, lines_rx) = mpsc::channel(4);

        let session = run_session(
            &config,
            &factory,
            probe,
            Box::new(recorder.clone()),
            lines_rx,
            std::future::pending::<()>(),
        );
        let commands = async {
            lines_tx.send("s".to_string()).await.unwrap();
            while !recorder.skin() {
                tokio::time::sleep(std::time::Duration::from_millis(1)).await;
            }
            lines_tx.send("q".to_string()).await.unwrap();
        };

        let (stats, ()) = tokio::time::timeout(std::time::Duration::from_secs(5), async {
            tokio::join!(session, commands)
        })
        .await
        .expect("session should end on quit");
        let stats = stats.unwrap();

        // Skin applied before quitting, and the quit came long before the cycle limit
        assert!(recorder.skin());
        assert!(stats.total() < 1_000_000);
        assert!(recorder.frames().len() as u64 > stats.total());
    }

    #[tokio::test]
    async fn test_session_stops_on_shutdown() {
        let config = config(None, false);
        let factory = LoggerFactory::new(config.clone());
        let recorder = RecordingSurface::new();
        let probe = ScriptedProbe::repeating(ProbeResult::success(5));
        let (_lines_tx, lines_rx) = mpsc::channel(1);

        let shutdown = tokio::time::sleep(std::time::Duration::from_millis(30));
        let result = run_session(
            &config,
            &factory,
            probe,
            Box::new(recorder.clone()),
            lines_rx,
            shutdown,
        )
        .await;

        assert!(result.is_ok());
        assert!(!recorder.frames().is_empty());
    }
}
