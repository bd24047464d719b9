//! Parsed G-code lines

use crate::parser::lexer::{Token, TokenKind};

/// A parsed line of G-code
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedLine {
    Command(Command),
    /// Comment-only line
    Comment(String),
    Empty,
    /// Text that does not start with a command word
    Unrecognized(String),
}

/// A command word with its parameters, e.g. "G1 X10 F150"
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    /// Uppercase command word ("G1", "M3")
    pub name: String,
    pub parameters: Vec<Parameter>,
    /// Further command words on the same line ("G90 G1 ..." style)
    pub extra_commands: Vec<String>,
}

/// A parameter word like "X10" or "S255"
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub letter: char,
    /// Raw value text; see [`Parameter::number`]
    pub value: String,
}

impl Parameter {
    /// Numeric value, if the text is a valid number
    pub fn number(&self) -> Option<f64> {
        self.value.parse().ok()
    }
}

impl Command {
    pub fn parameter(&self, letter: char) -> Option<&Parameter> {
        self.parameters.iter().find(|p| p.letter == letter)
    }

    /// True for `G0`-`G3` style moves, including zero-padded forms like `G01`
    pub fn is_motion(&self) -> bool {
        self.words().any(|word| {
            matches!(
                command_number(word, 'G'),
                Some(0) | Some(1) | Some(2) | Some(3)
            )
        })
    }

    pub fn is_laser_on(&self) -> bool {
        self.words()
            .any(|word| matches!(command_number(word, 'M'), Some(3) | Some(4)))
    }

    pub fn is_laser_off(&self) -> bool {
        self.words().any(|word| command_number(word, 'M') == Some(5))
    }

    pub fn is_emergency_stop(&self) -> bool {
        self.words().any(|word| command_number(word, 'M') == Some(112))
    }

    fn words(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str()).chain(self.extra_commands.iter().map(String::as_str))
    }
}

fn command_number(word: &str, letter: char) -> Option<u32> {
    word.strip_prefix(letter)?.parse().ok()
}

/// Build a parsed line from tokens
pub fn tokens_to_parsed_line(tokens: Vec<Token>) -> ParsedLine {
    let mut commands = Vec::new();
    let mut parameters = Vec::new();
    let mut comment = None;
    let mut unknown = None;

    for token in tokens {
        match token.kind {
            TokenKind::Command => commands.push(token.text),
            TokenKind::Parameter => {
                if let Some(parameter) = parse_parameter_token(&token.text) {
                    parameters.push(parameter);
                }
            }
            TokenKind::Comment => {
                comment.get_or_insert(extract_comment_text(&token.text));
            }
            TokenKind::Unknown => {
                unknown.get_or_insert(token.text);
            }
        }
    }

    let mut commands = commands.into_iter();
    match commands.next() {
        Some(name) => ParsedLine::Command(Command {
            name,
            parameters,
            extra_commands: commands.collect(),
        }),
        None => match (parameters.first(), unknown, comment) {
            (Some(first), _, _) => {
                ParsedLine::Unrecognized(format!("{}{}", first.letter, first.value))
            }
            (None, Some(text), _) => ParsedLine::Unrecognized(text),
            (None, None, Some(text)) => ParsedLine::Comment(text),
            (None, None, None) => ParsedLine::Empty,
        },
    }
}

fn parse_parameter_token(text: &str) -> Option<Parameter> {
    let mut chars = text.chars();
    let letter = chars.next()?;
    Some(Parameter {
        letter,
        value: chars.collect(),
    })
}

fn extract_comment_text(text: &str) -> String {
    if let Some(stripped) = text.strip_prefix(';') {
        stripped.trim().to_string()
    } else {
        let inner = text.strip_prefix('(').unwrap_or(text);
        inner.strip_suffix(')').unwrap_or(inner).trim().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::lexer::tokenize_line;

    fn parse(line: &str) -> ParsedLine {
        tokens_to_parsed_line(tokenize_line(line))
    }

    #[test]
    fn test_parameter_number() {
        let ParsedLine::Command(cmd) = parse("G1 X10.5 Sabc") else {
            panic!("Expected command");
        };
        assert_eq!(cmd.parameter('X').and_then(Parameter::number), Some(10.5));
        assert_eq!(cmd.parameter('S').and_then(Parameter::number), None);
        assert!(cmd.parameter('Y').is_none());
    }

    #[test]
    fn test_command_classification() {
        let ParsedLine::Command(cmd) = parse("G01 X1") else {
            panic!("Expected command");
        };
        assert!(cmd.is_motion());

        let ParsedLine::Command(cmd) = parse("M3 S500") else {
            panic!("Expected command");
        };
        assert!(cmd.is_laser_on());
        assert!(!cmd.is_motion());

        let ParsedLine::Command(cmd) = parse("G90 M112") else {
            panic!("Expected command");
        };
        assert_eq!(cmd.extra_commands, vec!["M112"]);
        assert!(cmd.is_emergency_stop());
    }

    #[test]
    fn test_comment_text() {
        assert_eq!(parse("; hello "), ParsedLine::Comment("hello".to_string()));
        assert_eq!(parse("(setup)"), ParsedLine::Comment("setup".to_string()));
    }

    #[test]
    fn test_unrecognized_lines() {
        assert_eq!(parse("X10 Y10"), ParsedLine::Unrecognized("X10".to_string()));
        assert_eq!(parse("%"), ParsedLine::Unrecognized("%".to_string()));
        assert_eq!(parse(""), ParsedLine::Empty);
    }
}
