// src/console.rs
use crate::error::{ConsoleError, ConsoleResult};
use crossterm::{
    cursor::MoveTo,
    execute,
    terminal::{Clear, ClearType},
};
use std::io::{self, BufRead, StdinLock, Stdout, Write};

/// Line-oriented terminal: every interactive flow talks to the user through this.
pub struct Console<R, W> {
    input: R,
    output: W,
    clear_screen: bool,
}

pub type StdConsole = Console<StdinLock<'static>, Stdout>;

/// Console bound to the process's stdin/stdout.
pub fn stdio(clear_screen: bool) -> StdConsole {
    Console::new(io::stdin().lock(), io::stdout(), clear_screen)
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W, clear_screen: bool) -> Self {
        Console {
            input,
            output,
            clear_screen,
        }
    }

    /// Writes `prompt` without a newline and reads one line back, minus the line ending.
    pub fn prompt(&mut self, prompt: &str) -> ConsoleResult<String> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            log::debug!("Input closed while waiting for {:?}", prompt);
            return Err(ConsoleError::Closed);
        }
        let trimmed_len = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed_len);
        Ok(line)
    }

    pub fn say(&mut self, text: &str) -> ConsoleResult<()> {
        writeln!(self.output, "{}", text)?;
        Ok(())
    }

    pub fn clear(&mut self) -> ConsoleResult<()> {
        if self.clear_screen {
            execute!(self.output, Clear(ClearType::All), MoveTo(0, 0))?;
        }
        Ok(())
    }

    #[cfg(test)]
    pub fn output(&self) -> &W {
        &self.output
    }
}
