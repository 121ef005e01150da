//! CLI command definitions

use clap::{Parser, Subcommand, ValueEnum};
use ensemble_domain::RatingMode;
use std::path::PathBuf;

/// Output format for results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output with intermediate steps
    #[default]
    Text,
    /// Only the final answer
    Answer,
    /// JSON output
    Json,
}

/// Rating mode as accepted on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RatingArg {
    Absolute,
    Pairwise,
}

impl From<RatingArg> for RatingMode {
    fn from(arg: RatingArg) -> Self {
        match arg {
            RatingArg::Absolute => RatingMode::Absolute,
            RatingArg::Pairwise => RatingMode::Pairwise,
        }
    }
}

/// CLI arguments for ensemble
#[derive(Parser, Debug)]
#[command(name = "ensemble")]
#[command(author, version, about = "Multi-model debate, best-of-N planning and staged file selection")]
#[command(long_about = r#"
ensemble coordinates several language-model calls into one better answer.

Commands:
  debate        Members answer, refine against their ring neighbours, a mediator merges
  best-of-n     Plan, execute, refine and finalize N times, then let a judge pick one
  select-files  Let a model pick the project files relevant to a set of requirements
  config        Show configuration sources and the resolved configuration

Model ids look like `provider:model` (`openai:gpt-4o`). Composite ids are
accepted wherever a model is: `moa:mediator|m1|m2`, `cepo:<id>`,
`fallback:a|b`, `mock:<text>`.

Configuration files are loaded from (in priority order):
1. ENSEMBLE_* environment variables (ENSEMBLE_DEBATE__ROUNDS=3)
2. --config <path>                     Explicit config file
3. ./ensemble.toml                     Project-level config
4. ~/.config/ensemble/config.toml      Global config

Example:
  ensemble debate --rounds 2 --ensemble "openai:gpt-4o|openai:gpt-4o|openai:gpt-4o-mini" "Why is the sky blue?"
  ensemble best-of-n --rating pairwise "Plan a database migration"
  ensemble select-files --root . --query "Which function parses the config file?"
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text", global = true)]
    pub output: OutputFormat,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Directory for the diagnostic log and conversation logs
    #[arg(long, value_name = "DIR", global = true)]
    pub log_dir: Option<PathBuf>,

    /// Print call count and cost after the run
    #[arg(long, global = true)]
    pub show_cost: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a multi-agent debate and print the mediated answer
    Debate {
        /// The question to debate
        question: String,

        /// Ensemble as `mediator|member1|member2...` (default: [debate] ensemble)
        #[arg(short, long, value_name = "SPEC")]
        ensemble: Option<String>,

        /// Total rounds including the initial answers (default: [debate] rounds)
        #[arg(short, long)]
        rounds: Option<usize>,
    },

    /// Run best-of-N planning and print the selected answer
    #[command(name = "best-of-n")]
    BestOfN {
        /// The task to solve
        question: String,

        /// Model id (default: [best_of_n] model, then the medium tier)
        #[arg(short, long, value_name = "MODEL")]
        model: Option<String>,

        /// Number of candidates (default: [best_of_n] bestofn_n)
        #[arg(short = 'n', long)]
        candidates: Option<usize>,

        /// How the judge compares candidates
        #[arg(long, value_enum)]
        rating: Option<RatingArg>,

        /// Run the candidate pipelines one after another
        #[arg(long)]
        sequential: bool,
    },

    /// Select the project files relevant to the requirements
    #[command(name = "select-files")]
    SelectFiles {
        /// What the files are needed for
        requirements: String,

        /// Project root
        #[arg(long, value_name = "DIR", default_value = ".")]
        root: PathBuf,

        /// Model id (default: [file_selection] model, then its tier)
        #[arg(short, long, value_name = "MODEL")]
        model: Option<String>,

        /// Maximum model turns (default: [file_selection] max_iterations)
        #[arg(long)]
        max_iterations: Option<usize>,

        /// Treat the requirements as a question and answer it from the selected files
        #[arg(long)]
        query: bool,
    },

    /// Show configuration file locations and the resolved configuration
    Config,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_debate() {
        let cli = Cli::parse_from([
            "ensemble",
            "-vv",
            "debate",
            "--rounds",
            "3",
            "--ensemble",
            "a:x|a:y",
            "why?",
        ]);
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Command::Debate {
                question,
                ensemble,
                rounds,
            } => {
                assert_eq!(question, "why?");
                assert_eq!(ensemble.as_deref(), Some("a:x|a:y"));
                assert_eq!(rounds, Some(3));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from([
            "ensemble",
            "best-of-n",
            "--rating",
            "pairwise",
            "task",
            "--output",
            "json",
            "--show-cost",
        ]);
        assert_eq!(cli.output, OutputFormat::Json);
        assert!(cli.show_cost);
        match cli.command {
            Command::BestOfN { rating, .. } => {
                assert_eq!(rating.map(RatingMode::from), Some(RatingMode::Pairwise));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_select_files_defaults() {
        let cli = Cli::parse_from(["ensemble", "select-files", "add logging"]);
        match cli.command {
            Command::SelectFiles {
                root,
                max_iterations,
                query,
                ..
            } => {
                assert_eq!(root, PathBuf::from("."));
                assert!(max_iterations.is_none());
                assert!(!query);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
