//! Output formatter trait

use crate::cli::commands::OutputFormat;

/// Formats one kind of run result
pub trait OutputFormatter<T> {
    /// Full result with intermediate steps
    fn format(&self, result: &T) -> String;

    /// Format as JSON
    fn format_json(&self, result: &T) -> String;

    /// Only the final answer (concise output)
    fn format_answer_only(&self, result: &T) -> String;

    /// Dispatch on the requested output format
    fn render(&self, result: &T, format: OutputFormat) -> String {
        match format {
            OutputFormat::Text => self.format(result),
            OutputFormat::Answer => self.format_answer_only(result),
            OutputFormat::Json => self.format_json(result),
        }
    }
}
