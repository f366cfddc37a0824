//! Display functions for command results

use super::formatters::{activation_line, format_offset, guess_line, timeline};
use crate::commands::{PlayOutcome, PlayResult};
use crate::core::{Guess, PuzzleState, Symbol};
use crate::diagnostics::Diagnostic;
use crate::driver::{Action, KeyPlan};
use colored::{ColoredString, Colorize};

/// One letter as a colored tile
fn tile(letter: char, symbol: Symbol) -> ColoredString {
    let text = format!(" {} ", letter.to_ascii_uppercase());
    match symbol {
        Symbol::Correct => text.black().on_green().bold(),
        Symbol::Present => text.black().on_yellow().bold(),
        Symbol::Absent => text.white().on_bright_black(),
        Symbol::Unknown => text.white().on_magenta(),
    }
}

fn print_row(index: usize, guess: &Guess) {
    let tiles: String = guess
        .word
        .chars()
        .zip(guess.result_code.symbols())
        .map(|(letter, &symbol)| tile(letter, symbol).to_string())
        .collect();
    println!(
        "  {}  {tiles}  {}",
        format!("{}.", index + 1).bright_black(),
        guess.result_code.to_string().bright_black()
    );
}

/// Print an extracted board
pub fn print_board(state: &PuzzleState) {
    println!("\n{}", "─".repeat(40).cyan());
    println!(
        " {} {}",
        "BOARD".bright_cyan().bold(),
        format!("({} submitted)", state.attempts()).bright_black()
    );
    println!("{}", "─".repeat(40).cyan());

    if state.guesses.is_empty() {
        println!("  {}", "No guesses submitted yet".bright_black());
    }
    for (i, guess) in state.guesses.iter().enumerate() {
        print_row(i, guess);
    }

    if state.is_solved() {
        println!("\n{}", "✅ Solved".green().bold());
    }
    print_diagnostics(&state.diagnostics);
}

/// Print the board in the plain wire format, one row per line
pub fn print_board_plain(state: &PuzzleState) {
    for guess in &state.guesses {
        println!("{}", guess_line(guess));
    }
}

/// Print the activations a word would be typed with
pub fn print_plan(plan: &KeyPlan) {
    let total = plan.duration();
    println!(
        "\nTyping {} over {}:",
        plan.word().bright_yellow().bold(),
        format_offset(total)
    );
    for activation in plan.activations() {
        let line = activation_line(activation);
        let line = match activation.action {
            Action::Press(_) => line.normal(),
            Action::Submit(_) => line.green().bold(),
            Action::Observe => line.cyan(),
        };
        println!(
            "  {}  {line}",
            timeline(activation.offset, total, 20).bright_black()
        );
    }
}

/// Print the outcome of a simulated game
pub fn print_play_result(result: &PlayResult) {
    println!("\n{}", "─".repeat(40).cyan());
    println!(
        "Answer: {}",
        result.answer.to_uppercase().bright_yellow().bold()
    );
    println!("{}", "─".repeat(40).cyan());

    for (i, guess) in result.state.guesses.iter().enumerate() {
        print_row(i, guess);
    }

    println!();
    let attempts = result.state.attempts();
    match &result.outcome {
        PlayOutcome::Solved => println!(
            "{}",
            format!("✅ Solved in {attempts} guesses!").green().bold()
        ),
        PlayOutcome::NoGuess => println!(
            "{}",
            format!("⏹  Solver gave up after {attempts} guesses").yellow().bold()
        ),
        PlayOutcome::OutOfAttempts => println!(
            "{}",
            format!("❌ Failed to solve in {attempts} guesses").red().bold()
        ),
        PlayOutcome::Rejected(word) => println!(
            "{}",
            format!("❌ Board rejected {}", word.to_uppercase()).red().bold()
        ),
    }
    println!(
        "{}",
        format!("   Time taken: {:.2}s", result.duration.as_secs_f64()).bright_black()
    );
    print_diagnostics(&result.diagnostics);
}

/// Print non-fatal problems, if any
pub fn print_diagnostics(diagnostics: &[Diagnostic]) {
    if diagnostics.is_empty() {
        return;
    }
    println!("\n⚠️  {}", "Diagnostics:".yellow().bold());
    for diagnostic in diagnostics {
        println!("   {diagnostic}");
    }
}
