//! CLI entrypoint for ensemble
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use ensemble_application::{
    ConversationLogger, NoConversationLogger, NoProgress, ProgressNotifier, RunContext,
    RunDebateInput, SelectFilesInput, SelectFilesUseCase,
};
use ensemble_domain::Transcript;
use ensemble_infrastructure::{
    ConfigLoader, FileConfig, JsonlConversationLogger, LocalFileSystem, ModelRegistry, RegistryError,
    new_run_id,
};
use ensemble_presentation::{
    Cli, Command, ConsoleFormatter, OutputFormatter, ProgressReporter, SimpleProgress,
};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // === Configuration ===
    let mut config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?
    };
    apply_overrides(&mut config, &cli.command);

    if matches!(cli.command, Command::Config) {
        ConfigLoader::print_config_sources();
        println!();
        println!("{}", toml::to_string_pretty(&config)?);
        return Ok(());
    }

    let issues = config.validate();
    if !issues.is_empty() {
        for issue in &issues {
            eprintln!("config error: {}", issue);
        }
        bail!("{} configuration error(s)", issues.len());
    }

    // === Logging ===
    let log_dir = cli.log_dir.clone().or_else(|| config.logging.resolved_dir());
    let _guard = init_tracing(cli.verbose, log_dir.as_deref())?;
    info!("Starting ensemble");

    // === Run context ===
    let run_id = new_run_id();
    let logger: Arc<dyn ConversationLogger> = match &log_dir {
        Some(dir) if config.logging.conversation_log => {
            match JsonlConversationLogger::for_run(dir, &run_id) {
                Some(logger) => {
                    info!("Conversation log: {}", logger.path().display());
                    Arc::new(logger)
                }
                None => Arc::new(NoConversationLogger),
            }
        }
        _ => Arc::new(NoConversationLogger),
    };
    let mut ctx = RunContext::new(run_id)
        .with_pricing(config.pricing.clone())
        .with_logger(logger);

    let registry = ModelRegistry::new(&config);
    match registry.tiers(&ctx) {
        Ok(tiers) => ctx = ctx.with_tiers(tiers),
        Err(e) => info!("Model tiers unavailable: {}", e),
    }

    let progress: Box<dyn ProgressNotifier> = if cli.quiet {
        Box::new(NoProgress)
    } else if std::io::stderr().is_terminal() {
        Box::new(ProgressReporter::new())
    } else {
        Box::new(SimpleProgress)
    };

    // === Dispatch ===
    let output = match &cli.command {
        Command::Debate {
            question, ensemble, ..
        } => {
            let engine = registry.debate_engine_for(ensemble.as_deref(), &ctx)?;
            let settings = registry.debate_settings()?;
            let input = RunDebateInput::new(question.as_str(), settings);
            let outcome = engine.execute_with_progress(input, progress.as_ref()).await?;
            ConsoleFormatter.render(&outcome, cli.output)
        }
        Command::BestOfN {
            question, model, ..
        } => {
            let engine = registry.best_of_n_engine_for(model.as_deref(), &ctx)?;
            let task = Transcript::from_prompt(question.as_str());
            let result = engine.execute_with_progress(&task, progress.as_ref()).await?;
            ConsoleFormatter.render(&result, cli.output)
        }
        Command::SelectFiles {
            requirements,
            root,
            model,
            query,
            ..
        } => {
            let model = match model.as_deref().or(config.file_selection.model.as_deref()) {
                Some(id) => registry.resolve(id, &ctx)?,
                None => ctx
                    .tier(config.file_selection.tier)
                    .ok_or(RegistryError::MissingTier(config.file_selection.tier))?,
            };
            if !model.is_configured() {
                warn!("{} has no API key configured", model.id());
            }

            let fs = Arc::new(LocalFileSystem::new(project_root(root)?));
            let use_case = SelectFilesUseCase::new(model, fs);
            let input = SelectFilesInput::new(requirements.as_str())
                .with_max_iterations(config.file_selection.max_iterations);

            if *query {
                let result = use_case.query(input, progress.as_ref()).await?;
                ConsoleFormatter.render(&result, cli.output)
            } else {
                let result = use_case
                    .execute_with_progress(input, progress.as_ref())
                    .await?;
                ConsoleFormatter.render(&result, cli.output)
            }
        }
        // Printed before the run context is built
        Command::Config => return Ok(()),
    };

    println!("{}", output);

    if cli.show_cost {
        eprintln!("{}", ConsoleFormatter::format_usage(&ctx.usage()));
    }

    Ok(())
}

/// Fold command-line flags into the loaded configuration so validation
/// sees the effective values.
fn apply_overrides(config: &mut FileConfig, command: &Command) {
    match command {
        Command::Debate {
            ensemble, rounds, ..
        } => {
            if ensemble.is_some() {
                config.debate.ensemble = ensemble.clone();
            }
            if rounds.is_some() {
                config.debate.rounds = *rounds;
            }
        }
        Command::BestOfN {
            candidates,
            rating,
            sequential,
            ..
        } => {
            if let Some(n) = candidates {
                config.best_of_n.bestofn_n = *n;
            }
            if let Some(rating) = rating {
                config.best_of_n.rating = (*rating).into();
            }
            if *sequential {
                config.best_of_n.parallel_candidates = false;
            }
        }
        Command::SelectFiles { max_iterations, .. } => {
            if let Some(max) = max_iterations {
                config.file_selection.max_iterations = *max;
            }
        }
        Command::Config => {}
    }
}

fn project_root(root: &Path) -> Result<PathBuf> {
    let root = root
        .canonicalize()
        .with_context(|| format!("Project root {} not found", root.display()))?;
    if !root.is_dir() {
        bail!("Project root {} is not a directory", root.display());
    }
    Ok(root)
}

/// Stderr logging at the `-v` level, plus a file log when a log directory
/// is set. The returned guard flushes the file writer on drop.
fn init_tracing(verbose: u8, log_dir: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let appender = RollingFileAppender::builder()
                .rotation(Rotation::DAILY)
                .filename_prefix("ensemble")
                .filename_suffix("log")
                .build(dir)
                .with_context(|| format!("Could not open log directory {}", dir.display()))?;
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_filter(EnvFilter::new("debug"));
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .with_filter(EnvFilter::new(level)),
        )
        .with(file_layer)
        .init();

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ensemble_domain::RatingMode;
    use ensemble_presentation::RatingArg;

    #[test]
    fn test_debate_overrides() {
        let mut config = FileConfig::default();
        apply_overrides(
            &mut config,
            &Command::Debate {
                question: "q".into(),
                ensemble: Some("a:x|a:y".into()),
                rounds: Some(3),
            },
        );
        assert_eq!(config.debate.ensemble.as_deref(), Some("a:x|a:y"));
        assert_eq!(config.debate.rounds, Some(3));
    }

    #[test]
    fn test_best_of_n_overrides() {
        let mut config = FileConfig::default();
        apply_overrides(
            &mut config,
            &Command::BestOfN {
                question: "q".into(),
                model: None,
                candidates: Some(0),
                rating: Some(RatingArg::Pairwise),
                sequential: true,
            },
        );
        assert_eq!(config.best_of_n.rating, RatingMode::Pairwise);
        assert!(!config.best_of_n.parallel_candidates);
        // Overridden values still go through validation
        assert!(!config.validate().is_empty());
    }

    #[test]
    fn test_missing_flags_keep_file_values() {
        let mut config = FileConfig::default();
        config.debate.rounds = Some(4);
        apply_overrides(
            &mut config,
            &Command::Debate {
                question: "q".into(),
                ensemble: None,
                rounds: None,
            },
        );
        assert_eq!(config.debate.rounds, Some(4));
    }
}
