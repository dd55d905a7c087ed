use std::io::{self, BufRead, Write};
use std::sync::{Mutex, PoisonError};

/// The console is shared by every worker: progress lines, error lines and
/// interactive prompts all go through one lock so a prompt and the read of
/// its answer never interleave with another worker's output.
pub struct Console {
    io: Mutex<()>,
}

impl Console {
    pub fn new() -> Self {
        Self { io: Mutex::new(()) }
    }

    pub fn line(&self, message: &str) {
        let _guard = self.io.lock().unwrap_or_else(PoisonError::into_inner);
        println!("{}", message);
    }

    pub fn error(&self, message: &str) {
        let _guard = self.io.lock().unwrap_or_else(PoisonError::into_inner);
        eprintln!("{}", message);
    }

    /// Single free-form question; the answer is trimmed.
    pub fn ask(&self, question: &str) -> io::Result<String> {
        let _guard = self.io.lock().unwrap_or_else(PoisonError::into_inner);
        Self::prompt(question)
    }

    /// Asks until the answer matches one of `options` (case-insensitive).
    /// The whole retry loop holds the lock so no other worker can inject
    /// output between a rejected answer and the re-prompt.
    pub fn choose(&self, question: &str, options: &[&str]) -> io::Result<String> {
        let _guard = self.io.lock().unwrap_or_else(PoisonError::into_inner);

        loop {
            let answer = Self::prompt(&format!("{} [{}]", question, options.join("/")))?;
            let answer = answer.to_lowercase();

            if options.contains(&answer.as_str()) {
                return Ok(answer);
            }

            println!("Please answer one of: {}.", options.join(", "));
        }
    }

    fn prompt(question: &str) -> io::Result<String> {
        print!("{} ", question);
        io::stdout().flush()?;

        let mut answer = String::new();
        io::stdin().lock().read_line(&mut answer)?;

        Ok(answer.trim().to_string())
    }
}

impl Default for Console {
    fn default() -> Self {
        Self::new()
    }
}
