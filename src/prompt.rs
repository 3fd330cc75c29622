use std::io::{self, BufRead, Write};

/// Line-oriented question/answer on a terminal or any reader/writer pair.
pub struct Prompt<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn output(&mut self) -> &mut W {
        &mut self.output
    }

    /// Asks `question` and returns the trimmed answer.
    pub fn ask(&mut self, question: &str) -> io::Result<String> {
        write!(self.output, "{}", question)?;
        self.output.flush()?;

        let mut answer = String::new();
        if self.input.read_line(&mut answer)? == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "input closed"));
        }

        Ok(answer.trim().to_owned())
    }

    /// Uses `prefilled` when given, otherwise asks.
    pub fn ask_unless(&mut self, question: &str, prefilled: Option<&str>) -> io::Result<String> {
        match prefilled {
            Some(answer) => Ok(answer.trim().to_owned()),
            None => self.ask(question),
        }
    }

    /// Only `yes` counts as consent.
    pub fn confirm(&mut self, question: &str) -> io::Result<bool> {
        Ok(self.ask(&format!("{} (yes/no): ", question))?.eq_ignore_ascii_case("yes"))
    }
}

pub fn ask_password(question: &str) -> io::Result<String> {
    rpassword::prompt_password(question)
}
