//! G-code Parser
//!
//! Tokenization and a small line-level AST, used to inspect G-code files
//! before they are streamed to the machine.

pub mod ast;
pub mod lexer;

pub use ast::{Command, Parameter, ParsedLine};
pub use lexer::{Token, TokenKind, tokenize_line};

/// Parse a single line of G-code
pub fn parse_line(line: &str) -> ParsedLine {
    ast::tokens_to_parsed_line(lexer::tokenize_line(line))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cut_line() {
        let result = parse_line("G1 X120 F150 S800");

        if let ParsedLine::Command(cmd) = result {
            assert_eq!(cmd.name, "G1");
            assert_eq!(cmd.parameters.len(), 3);
            assert_eq!(cmd.parameters[2].letter, 'S');
            assert_eq!(cmd.parameters[2].value, "800");
        } else {
            panic!("Expected command");
        }
    }

    #[test]
    fn test_parse_empty_line() {
        assert!(matches!(parse_line("   "), ParsedLine::Empty));
    }
}
