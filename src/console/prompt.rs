//! Line-oriented input for the console screens.
//!
//! End of input surfaces as `io::ErrorKind::UnexpectedEof` so the menu loop can exit
//! cleanly.

use std::io::{self, BufRead, Write};
use std::ops::RangeInclusive;

use crate::validation::Field;

use super::screens;

pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn output(&mut self) -> &mut W {
        &mut self.output
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Prints `prompt` and reads one line with spaces and tabs trimmed from both ends.
    pub fn line(&mut self, prompt: &str) -> io::Result<String> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;

        let mut buf = String::new();
        if self.input.read_line(&mut buf)? == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "input closed"));
        }
        Ok(buf.trim_matches(|c: char| matches!(c, ' ' | '\t' | '\r' | '\n')).to_string())
    }

    /// Reads a password exactly as typed, minus the line ending.
    pub fn secret(&mut self, prompt: &str) -> io::Result<String> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;

        let mut buf = String::new();
        if self.input.read_line(&mut buf)? == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "input closed"));
        }
        Ok(buf.trim_end_matches(['\r', '\n']).to_string())
    }

    /// Asks until the answer is a number inside `range`.
    pub fn menu_choice(&mut self, range: RangeInclusive<u32>) -> io::Result<u32> {
        loop {
            let raw = self.line("\nEnter your choice: ")?;
            match raw.parse::<u32>() {
                Ok(choice) if range.contains(&choice) => return Ok(choice),
                Ok(_) => screens::error(
                    &mut self.output,
                    &format!(
                        "Please enter a number between {} and {}.",
                        range.start(),
                        range.end()
                    ),
                )?,
                Err(_) => screens::error(&mut self.output, "Invalid input. Please enter a number.")?,
            }
        }
    }

    /// Asks until the value satisfies the rules for `field`.
    pub fn valid_field(&mut self, prompt: &str, field: Field) -> io::Result<String> {
        let mut value = self.read_field(prompt, field)?;
        while !field.is_valid(&value) {
            screens::error(&mut self.output, &format!("Invalid {}.", field.name()))?;
            writeln!(self.output, "Requirements: {}", field.requirements())?;
            value = self.read_field("Try again: ", field)?;
        }
        Ok(value)
    }

    fn read_field(&mut self, prompt: &str, field: Field) -> io::Result<String> {
        match field {
            Field::Password => self.secret(prompt),
            Field::Username | Field::Email => self.line(prompt),
        }
    }

    /// Yes/no question; anything but `y`/`Y` counts as no.
    pub fn confirm(&mut self, action: &str) -> io::Result<bool> {
        let answer = self.line(&format!(
            "\n[WARNING] Are you sure you want to {}? (y/n): ",
            action
        ))?;
        Ok(matches!(answer.as_str(), "y" | "Y"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn prompter(input: &str) -> Prompter<Cursor<Vec<u8>>, Vec<u8>> {
        Prompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    #[test]
    fn test_line_is_trimmed() {
        let mut p = prompter("  alice \t\r\n");
        assert_eq!(p.line("Username: ").unwrap(), "alice");
    }

    #[test]
    fn test_secret_keeps_inner_spaces() {
        let mut p = prompter(" Abc def1! \n");
        assert_eq!(p.secret("Password: ").unwrap(), " Abc def1! ");
    }

    #[test]
    fn test_end_of_input() {
        let mut p = prompter("");
        let err = p.line("Username: ").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn test_menu_choice_retries() {
        let mut p = prompter("abc\n9\n2\n");
        assert_eq!(p.menu_choice(1..=3).unwrap(), 2);

        let shown = String::from_utf8(p.into_output()).unwrap();
        assert!(shown.contains("Please enter a number."));
        assert!(shown.contains("between 1 and 3"));
    }

    #[test]
    fn test_valid_field_loops_until_valid() {
        let mut p = prompter("1bad\nab\ngood_name\n");
        assert_eq!(
            p.valid_field("Username: ", Field::Username).unwrap(),
            "good_name"
        );

        let shown = String::from_utf8(p.into_output()).unwrap();
        assert_eq!(shown.matches("Invalid username.").count(), 2);
        assert!(shown.contains(Field::Username.requirements()));
    }

    #[test]
    fn test_confirm() {
        assert!(prompter("y\n").confirm("delete your account").unwrap());
        assert!(prompter("Y\n").confirm("delete your account").unwrap());
        assert!(!prompter("yes\n").confirm("delete your account").unwrap());
        assert!(!prompter("\n").confirm("delete your account").unwrap());
    }
}
