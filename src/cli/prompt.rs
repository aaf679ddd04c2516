use std::io::{self, BufRead, Write};

/// Asks a yes/no question. Only `y` (in any case) counts as yes, an empty or closed input is a
/// no.
pub fn confirm(prompt: &str, input: &mut impl BufRead, output: &mut impl Write) -> io::Result<bool> {
    write!(output, "{prompt}")?;
    output.flush()?;

    let mut answer = String::new();
    if input.read_line(&mut answer)? == 0 {
        return Ok(false);
    }
    Ok(answer.trim().eq_ignore_ascii_case("y"))
}

/// [confirm] on the terminal.
pub fn confirm_on_terminal(prompt: &str) -> io::Result<bool> {
    confirm(prompt, &mut io::stdin().lock(), &mut io::stdout())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::confirm;

    fn answer(input: &str) -> bool {
        let mut output = Vec::new();
        let result = confirm("Send? ", &mut Cursor::new(input), &mut output).unwrap();
        assert_eq!(output, b"Send? ");
        result
    }

    #[test]
    fn test_confirm() {
        assert!(answer("y\n"));
        assert!(answer(" Y \n"));
        assert!(!answer("n\n"));
        assert!(!answer("yes\n"));
        assert!(!answer("\n"));
        assert!(!answer(""));
    }
}
