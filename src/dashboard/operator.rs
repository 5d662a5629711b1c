use std::io::{self, BufRead, Write};
use tracing::warn;

/// Blocking dialogs shown to the person driving the dashboard
pub trait Operator: Send + Sync {
    /// Yes/no prompt; `false` means the action is abandoned
    fn confirm(&self, prompt: &str) -> bool;

    fn alert(&self, message: &str);
}

/// Terminal dialogs on stdin/stderr
pub struct ConsoleOperator {
    assume_yes: bool,
}

impl ConsoleOperator {
    pub fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }
}

impl Operator for ConsoleOperator {
    fn confirm(&self, prompt: &str) -> bool {
        if self.assume_yes {
            return true;
        }

        eprint!("{} [y/N] ", prompt);
        if io::stderr().flush().is_err() {
            return false;
        }

        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            Ok(_) => parse_answer(&answer),
            Err(e) => {
                warn!("Could not read confirmation: {}", e);
                false
            }
        }
    }

    fn alert(&self, message: &str) {
        eprintln!("⚠️  {}", message);
    }
}

fn parse_answer(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
