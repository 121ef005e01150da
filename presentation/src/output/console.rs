//! Console output formatter for run results

use crate::output::formatter::OutputFormatter;
use colored::Colorize;
use ensemble_application::{BestOfNOutput, QueryOutput, SelectFilesOutput, UsageTotals};
use ensemble_domain::{DebateOutcome, FileSelection, Rating};
use serde::Serialize;

/// Formats results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{}\n{}\n", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40).cyan())
    }

    fn json<T: Serialize>(value: &T) -> String {
        serde_json::to_string_pretty(value)
            .unwrap_or_else(|e| format!("{{\"error\": \"Failed to serialize: {}\"}}", e))
    }

    fn selection_lines(selection: &FileSelection) -> String {
        let mut output = String::new();
        for file in &selection.files {
            let marker = if file.readonly { " (readonly)" } else { "" };
            output.push_str(&format!("  {}{}", file.path.yellow(), marker));
            if !file.reason.is_empty() {
                output.push_str(&format!(" - {}", file.reason));
            }
            output.push('\n');
        }
        for extract in &selection.extracts {
            output.push_str(&format!(
                "  {} (extract)\n{}\n",
                extract.path.yellow(),
                extract.extract
            ));
        }
        output
    }

    /// Call and cost totals, for `--show-cost`
    pub fn format_usage(totals: &UsageTotals) -> String {
        let mut output = format!(
            "{} {} calls, {} chars in, {} chars out, cost {:.4}",
            "Usage:".cyan().bold(),
            totals.calls,
            totals.chars_in,
            totals.chars_out,
            totals.cost
        );
        if totals.failed_calls > 0 {
            output.push_str(&format!(" ({} failed)", totals.failed_calls).red().to_string());
        }
        output
    }
}

impl OutputFormatter<DebateOutcome> for ConsoleFormatter {
    fn format(&self, result: &DebateOutcome) -> String {
        let mut output = Self::header("Debate Results");

        for round in &result.rounds {
            let title = if round.round == 0 {
                "Initial Answers".to_string()
            } else {
                format!("Debate Round {}", round.round)
            };
            output.push_str(&Self::section_header(&title));
            for candidate in &round.candidates {
                output.push_str(&format!(
                    "\n{}\n{}\n",
                    format!("── member {} ({}) ──", candidate.member, candidate.model)
                        .yellow()
                        .bold(),
                    candidate.content
                ));
            }
        }

        output.push_str(&Self::section_header("Mediated Answer"));
        output.push_str(&format!(
            "\n{}\n\n{}\n",
            format!("Mediator: {}", result.mediator).yellow().bold(),
            result.answer
        ));
        output
    }

    fn format_json(&self, result: &DebateOutcome) -> String {
        Self::json(result)
    }

    fn format_answer_only(&self, result: &DebateOutcome) -> String {
        result.answer.clone()
    }
}

impl OutputFormatter<BestOfNOutput> for ConsoleFormatter {
    fn format(&self, result: &BestOfNOutput) -> String {
        let mut output = Self::header("Best-of-N Results");

        output.push_str(&Self::section_header(&format!(
            "Candidates (rated {})",
            result.rating.mode
        )));
        for (i, candidate) in result.candidates.iter().enumerate() {
            let rating = match result.rating.ratings.get(i) {
                Some(Rating::Score(s)) => format!("score {}", s),
                Some(Rating::Wins(w)) => format!("{} wins", w),
                None => "unrated".to_string(),
            };
            let title = format!("── candidate {} ({}) ──", i, rating);
            let title = if i == result.rating.selected {
                title.green().bold()
            } else {
                title.yellow().bold()
            };
            output.push_str(&format!("\n{}\n{}\n", title, candidate));
        }

        output.push_str(&Self::section_header("Selected Answer"));
        output.push_str(&format!("\n{}\n", result.answer));
        output
    }

    fn format_json(&self, result: &BestOfNOutput) -> String {
        Self::json(result)
    }

    fn format_answer_only(&self, result: &BestOfNOutput) -> String {
        result.answer.clone()
    }
}

impl OutputFormatter<SelectFilesOutput> for ConsoleFormatter {
    fn format(&self, result: &SelectFilesOutput) -> String {
        let mut output = Self::header("Selected Files");
        output.push_str(&Self::selection_lines(&result.selection));
        output.push_str(&format!("\n{} model turns\n", result.iterations));
        output
    }

    fn format_json(&self, result: &SelectFilesOutput) -> String {
        Self::json(result)
    }

    fn format_answer_only(&self, result: &SelectFilesOutput) -> String {
        result.selection.paths().join("\n")
    }
}

impl OutputFormatter<QueryOutput> for ConsoleFormatter {
    fn format(&self, result: &QueryOutput) -> String {
        let mut output = Self::header("Query Answer");
        output.push_str(&Self::section_header("Files"));
        output.push_str(&Self::selection_lines(&result.selection));
        output.push_str(&Self::section_header("Answer"));
        output.push_str(&format!("\n{}\n", result.answer));
        output
    }

    fn format_json(&self, result: &QueryOutput) -> String {
        Self::json(result)
    }

    fn format_answer_only(&self, result: &QueryOutput) -> String {
        result.answer.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands::OutputFormat;
    use ensemble_domain::{Candidate, DebateRound, RatingMode, RatingOutcome, SelectedFile};

    fn outcome() -> DebateOutcome {
        DebateOutcome {
            mediator: "openai:gpt-4o".into(),
            rounds: vec![
                DebateRound::new(0, vec![Candidate::new(0, "a:x", 0, "first draft")]),
                DebateRound::new(1, vec![Candidate::new(0, "a:x", 1, "second draft")]),
            ],
            answer: "merged answer".into(),
        }
    }

    #[test]
    fn test_debate_text_lists_rounds() {
        colored::control::set_override(false);
        let text = ConsoleFormatter.render(&outcome(), OutputFormat::Text);
        assert!(text.contains("Initial Answers"));
        assert!(text.contains("Debate Round 1"));
        assert!(text.contains("second draft"));
        assert!(text.contains("merged answer"));
    }

    #[test]
    fn test_debate_answer_only() {
        assert_eq!(
            ConsoleFormatter.render(&outcome(), OutputFormat::Answer),
            "merged answer"
        );
    }

    #[test]
    fn test_debate_json() {
        let json = ConsoleFormatter.render(&outcome(), OutputFormat::Json);
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["answer"], "merged answer");
        assert_eq!(value["rounds"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_best_of_n_marks_ratings() {
        colored::control::set_override(false);
        let output = BestOfNOutput {
            candidates: vec!["one".into(), "two".into()],
            rating: RatingOutcome {
                mode: RatingMode::Absolute,
                ratings: vec![Rating::Score(4), Rating::Score(8)],
                selected: 1,
            },
            answer: "two".into(),
        };
        let text = ConsoleFormatter.format(&output);
        assert!(text.contains("candidate 1 (score 8)"));
        assert!(text.contains("rated absolute"));
    }

    #[test]
    fn test_selection_answer_only_is_paths() {
        let output = SelectFilesOutput {
            selection: FileSelection {
                files: vec![
                    SelectedFile::new("src/a.rs", "parser"),
                    SelectedFile::new("src/b.rs", "").readonly(),
                ],
                extracts: vec![],
            },
            iterations: 3,
            transcript: Default::default(),
        };
        assert_eq!(
            ConsoleFormatter.render(&output, OutputFormat::Answer),
            "src/a.rs\nsrc/b.rs"
        );
        colored::control::set_override(false);
        let text = ConsoleFormatter.format(&output);
        assert!(text.contains("src/b.rs (readonly)"));
        assert!(text.contains("3 model turns"));
    }

    #[test]
    fn test_usage_line() {
        colored::control::set_override(false);
        let totals = UsageTotals {
            calls: 5,
            failed_calls: 1,
            chars_in: 1000,
            chars_out: 200,
            cost: 0.0123,
        };
        let line = ConsoleFormatter::format_usage(&totals);
        assert!(line.contains("5 calls"));
        assert!(line.contains("cost 0.0123"));
        assert!(line.contains("(1 failed)"));
    }
}
