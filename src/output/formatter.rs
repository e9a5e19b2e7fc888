use owo_colors::OwoColorize;
use std::io::IsTerminal;
use terminal_size::{terminal_size, Width};

use crate::checkout::ResultMetadata;
use crate::quiz::{questions, Question};
use crate::scoring::{Band, ScoreResult};

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate text to fit available width, accounting for Unicode
fn truncate_text(text: &str, max_width: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= max_width {
        text.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

/// Format the quiz as a numbered list, options indented under each question
/// Question line: "{n:>2}. [{category}] {text}", option line: "     {i}) {option}"
pub fn format_question_list(questions: &[Question], use_colors: bool) -> String {
    if questions.is_empty() {
        return "No questions found.".to_string();
    }

    let term_width = get_terminal_width();

    questions
        .iter()
        .enumerate()
        .map(|(idx, q)| {
            let index_str = format!("{:>2}.", idx + 1);
            let category = format!("[{}]", q.category.as_str());
            let fixed_width = index_str.len() + category.len() + 2;

            let text = match term_width {
                Some(width) if width > fixed_width + 10 => truncate_text(q.text, width - fixed_width),
                Some(_) => truncate_text(q.text, 20),
                None => q.text.to_string(),
            };

            let header = if use_colors {
                format!("{} {} {}", index_str.dimmed(), category.cyan(), text.bold())
            } else {
                format!("{} {} {}", index_str, category, text)
            };

            let options = q
                .options
                .iter()
                .enumerate()
                .map(|(i, option)| format!("     {}) {}", i, option))
                .collect::<Vec<_>>()
                .join("\n");

            format!("{}\n{}", header, options)
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn colored_band(band: Band, use_colors: bool) -> String {
    if !use_colors {
        return band.to_string();
    }
    match band {
        Band::BelowAverage => band.yellow().to_string(),
        Band::Average => band.to_string(),
        Band::AboveAverage | Band::Superior => band.green().to_string(),
        Band::VerySuperior => band.green().bold().to_string(),
    }
}

/// Format a scored answer set
pub fn format_score_result(result: &ScoreResult, use_colors: bool) -> String {
    let iq = if use_colors {
        result.iq_score.bold().to_string()
    } else {
        result.iq_score.to_string()
    };

    format!(
        "IQ: {}\n  Band: {}\n  Percentile: {}\n  Raw score: {}/{}\n\n{}",
        iq,
        colored_band(result.band, use_colors),
        result.percentile,
        result.raw_score,
        questions().len(),
        result.interpretation
    )
}

/// Format a paid result read back from checkout metadata
pub fn format_result_metadata(result: &ResultMetadata, use_colors: bool) -> String {
    let iq = if use_colors {
        result.iq_score.bold().to_string()
    } else {
        result.iq_score.to_string()
    };
    let email = result.email.as_deref().unwrap_or("-");
    let report = if result.bump { "yes" } else { "no" };

    format!(
        "IQ: {}\n  Band: {}\n  Percentile: {}\n  Email: {}\n  PDF report: {}\n\n{}",
        iq,
        colored_band(result.band, use_colors),
        result.percentile,
        email,
        report,
        result.interpretation
    )
}

/// Format answer-set problems, one per line
pub fn format_validation_errors(errors: &[String], use_colors: bool) -> String {
    let heading = "Invalid answers:";
    let heading = if use_colors {
        heading.red().bold().to_string()
    } else {
        heading.to_string()
    };

    std::iter::once(heading)
        .chain(errors.iter().map(|e| format!("  - {}", e)))
        .collect::<Vec<_>>()
        .join("\n")
}
