use std::io::{self, BufRead, Write};

use crate::domain::environment::Environment;
use crate::error::{AppError, AppResult};

const MAX_ATTEMPTS: usize = 3;

/// Uses the environment given on the command line, otherwise asks on stdin.
pub fn resolve(choice: Option<Environment>) -> AppResult<Environment> {
    match choice {
        Some(environment) => Ok(environment),
        None => {
            let stdin = io::stdin();
            select_environment(&mut stdin.lock(), &mut io::stdout())
        }
    }
}

/// Numeric menu; gives up after three invalid answers.
pub fn select_environment<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
) -> AppResult<Environment> {
    for _ in 0..MAX_ATTEMPTS {
        for (index, environment) in Environment::ALL.iter().enumerate() {
            writeln!(output, "{}. {}", index + 1, environment)?;
        }
        write!(output, "Enter your choice (1-{}): ", Environment::ALL.len())?;
        output.flush()?;

        let mut answer = String::new();
        if input.read_line(&mut answer)? == 0 {
            return Err(AppError::Selection(
                "no environment selected before end of input".to_string(),
            ));
        }
        if let Some(environment) = Environment::from_menu_choice(&answer) {
            return Ok(environment);
        }
        writeln!(
            output,
            "Invalid input. Please enter a number between 1 and {}.",
            Environment::ALL.len()
        )?;
    }

    Err(AppError::Selection(
        "Maximum attempts reached. Exiting.".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn selects_by_number() {
        let mut input = Cursor::new("3\n");
        let mut output = Vec::new();
        let environment = select_environment(&mut input, &mut output).unwrap();

        assert_eq!(environment, Environment::Staging);
        let shown = String::from_utf8(output).unwrap();
        assert!(shown.starts_with("1. DEV\n2. QA\n3. STAGING\n4. PROD\n"));
    }

    #[test]
    fn retries_after_invalid_answers() {
        let mut input = Cursor::new("prod\n9\n4\n");
        let mut output = Vec::new();
        let environment = select_environment(&mut input, &mut output).unwrap();

        assert_eq!(environment, Environment::Prod);
        let shown = String::from_utf8(output).unwrap();
        assert_eq!(shown.matches("Invalid input").count(), 2);
    }

    #[test]
    fn gives_up_after_three_attempts() {
        let mut input = Cursor::new("a\nb\nc\n1\n");
        let mut output = Vec::new();
        let err = select_environment(&mut input, &mut output).unwrap_err();
        assert!(err.to_string().contains("Maximum attempts reached"));
    }

    #[test]
    fn end_of_input_aborts() {
        let mut input = Cursor::new("");
        let mut output = Vec::new();
        assert!(select_environment(&mut input, &mut output).is_err());
    }

    #[test]
    fn command_line_choice_skips_menu() {
        assert_eq!(resolve(Some(Environment::Qa)).unwrap(), Environment::Qa);
    }
}
