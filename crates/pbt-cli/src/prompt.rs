//! Interactive confirmation

use colored::*;
use std::io::{self, BufRead, Write};

/// Ask a yes/no question on stdin. Anything but `y`/`yes` is a no, as is a
/// closed or unreadable stdin.
pub fn confirm(question: &str) -> bool {
    print!("{} {} {} ", "?".bold().cyan(), question, "[y/n] ›".dimmed());
    let _ = io::stdout().flush();
    read_answer(&mut io::stdin().lock())
}

fn read_answer(input: &mut impl BufRead) -> bool {
    let mut response = String::new();
    match input.read_line(&mut response) {
        Ok(0) | Err(_) => false,
        Ok(_) => matches!(response.trim().to_lowercase().as_str(), "y" | "yes"),
    }
}
