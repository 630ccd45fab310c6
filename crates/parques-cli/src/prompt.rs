//! Line-oriented prompts over any reader/writer pair.

use std::io::{self, BufRead, Write};
use std::ops::RangeInclusive;
use thiserror::Error;

const PROMPT_END: &str = "> ";

#[derive(Debug, Error)]
pub enum PromptError {
    #[error("input closed")]
    Eof,

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Asks questions on `output` and reads validated answers from `input`.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    #[cfg(test)]
    pub fn output(&self) -> &W {
        &self.output
    }

    /// Print a line of text
    pub fn say(&mut self, text: &str) -> Result<(), PromptError> {
        writeln!(self.output, "{}", text)?;
        Ok(())
    }

    fn ask(&mut self, message: &str) -> Result<String, PromptError> {
        write!(self.output, "{}\n{}", message, PROMPT_END)?;
        self.output.flush()?;
        self.read_line()
    }

    fn read_line(&mut self) -> Result<String, PromptError> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(PromptError::Eof);
        }
        Ok(line.trim().to_string())
    }

    /// Ask until the answer is a number inside `allowed`
    pub fn choose(
        &mut self,
        message: &str,
        allowed: RangeInclusive<usize>,
    ) -> Result<usize, PromptError> {
        loop {
            let answer = self.ask(message)?;
            match answer.parse::<usize>() {
                Ok(n) if allowed.contains(&n) => {
                    self.say("")?;
                    return Ok(n);
                }
                _ => self.say("\nInvalid option!")?,
            }
        }
    }

    /// Ask a yes/no question as a `0 - No` / `1 - Yes` menu
    pub fn confirm(&mut self, question: &str) -> Result<bool, PromptError> {
        let message = format!("{}\n0 - No\n1 - Yes", question);
        Ok(self.choose(&message, 0..=1)? == 1)
    }

    /// Ask until the answer's length falls inside `length`
    pub fn text(
        &mut self,
        message: &str,
        length: RangeInclusive<usize>,
    ) -> Result<String, PromptError> {
        loop {
            let answer = self.ask(message)?;
            if length.contains(&answer.chars().count()) {
                self.say("")?;
                return Ok(answer);
            }
            self.say("\nInvalid option!")?;
        }
    }

    /// Wait for the Enter key
    pub fn pause(&mut self) -> Result<(), PromptError> {
        writeln!(self.output, "Press Enter to continue")?;
        self.output.flush()?;
        self.read_line().map(|_| ())
    }
}
