// ABOUTME: Line-oriented prompting with a bounded budget of invalid answers
// ABOUTME: Answer parsers for food choices, quantities, and yes/no questions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodlab Contributors

use foodlab_core::{AppError, AppResult, Food};
use std::io::{BufRead, Write};

/// Reads answers from `input` and writes prompts to `output`
pub struct Prompter<R, W> {
    input: R,
    output: W,
    max_attempts: u32,
    attempts_left: u32,
}

fn io_error(e: &std::io::Error) -> AppError {
    AppError::internal(format!("composer I/O failed: {e}"))
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    /// Prompter allowing `max_attempts` invalid answers per question
    pub fn new(input: R, output: W, max_attempts: u32) -> Self {
        let max_attempts = max_attempts.max(1);
        Self {
            input,
            output,
            max_attempts,
            attempts_left: max_attempts,
        }
    }

    /// Write a line of output
    ///
    /// # Errors
    ///
    /// Returns an internal error if the output cannot be written
    pub fn say(&mut self, text: &str) -> AppResult<()> {
        writeln!(self.output, "{text}").map_err(|e| io_error(&e))
    }

    /// Ask a question and read one trimmed line; `None` at end of input
    ///
    /// # Errors
    ///
    /// Returns an internal error on I/O failure
    pub fn ask(&mut self, question: &str) -> AppResult<Option<String>> {
        write!(self.output, "{question}").map_err(|e| io_error(&e))?;
        self.output.flush().map_err(|e| io_error(&e))?;

        let mut line = String::new();
        let read = self.input.read_line(&mut line).map_err(|e| io_error(&e))?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_owned()))
    }

    /// Report an invalid answer and use up one attempt
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` once the attempt budget is exhausted
    pub fn reject(&mut self, reason: &str) -> AppResult<()> {
        self.say(reason)?;
        self.attempts_left = self.attempts_left.saturating_sub(1);
        if self.attempts_left == 0 {
            return Err(AppError::invalid_input(format!(
                "too many invalid answers ({}); last problem: {reason}",
                self.max_attempts
            )));
        }
        Ok(())
    }

    /// Restore the full attempt budget after a valid answer
    pub fn accept(&mut self) {
        self.attempts_left = self.max_attempts;
    }
}

/// Parse a yes/no answer
///
/// # Errors
///
/// Returns a message when the answer is neither yes nor no
pub fn parse_yes_no(answer: &str) -> Result<bool, String> {
    match answer.to_ascii_lowercase().as_str() {
        "y" | "yes" => Ok(true),
        "n" | "no" => Ok(false),
        _ => Err("Please answer y or n".to_owned()),
    }
}

/// Parse a 1-based choice among `count` options into a 0-based index
///
/// # Errors
///
/// Returns a message when the answer is not a number in range
pub fn parse_choice(answer: &str, count: usize) -> Result<usize, String> {
    match answer.parse::<usize>() {
        Ok(choice) if (1..=count).contains(&choice) => Ok(choice - 1),
        _ => Err(format!("Please enter a number from 1 to {count}")),
    }
}

/// Parse `<number> [<unit>]` against the measurement units of `food`
///
/// The unit matches case-insensitively and the stored spelling is returned.
/// Without a unit the food's first measurement unit is used.
///
/// # Errors
///
/// Returns a message for a missing, non-positive, or non-finite number, or an
/// unit the food has no measurement for
pub fn parse_quantity(answer: &str, food: &Food) -> Result<(f64, String), String> {
    let mut parts = answer.split_whitespace();
    let value = parts
        .next()
        .and_then(|number| number.parse::<f64>().ok())
        .filter(|value| value.is_finite() && *value > 0.0)
        .ok_or_else(|| "Please enter a positive number, optionally followed by a unit".to_owned())?;

    let requested = parts.collect::<Vec<_>>().join(" ");
    let units: Vec<&str> = food.measurements.iter().map(|m| m.unit.as_str()).collect();
    if requested.is_empty() {
        return units
            .first()
            .map(|unit| (value, (*unit).to_owned()))
            .ok_or_else(|| format!("'{}' has no measurements", food.name));
    }
    units
        .iter()
        .find(|unit| unit.eq_ignore_ascii_case(&requested))
        .map(|unit| (value, (*unit).to_owned()))
        .ok_or_else(|| {
            format!(
                "'{}' is not measured in '{requested}'; use one of: {}",
                food.name,
                units.join(", ")
            )
        })
}
