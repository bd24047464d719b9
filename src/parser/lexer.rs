//! G-code Lexer
//!
//! Splits one line of G-code into words and comments. No position tracking;
//! the sender only needs to know what a line contains.

/// Token types in a G-code line
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TokenKind {
    /// Command word like "G1", "M3"
    Command,
    /// Parameter word like "X10", "S500"
    Parameter,
    /// Comment, semicolon or parenthetical
    Comment,
    /// Anything that is not a letter-led word ("%", stray digits)
    Unknown,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
}

/// Tokenize a line of G-code
pub fn tokenize_line(line: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut chars = line.char_indices().peekable();

    while let Some((start_idx, ch)) = chars.next() {
        match ch {
            ' ' | '\t' | '\r' | '\n' => continue,

            // Rest of the line is a comment
            ';' => {
                tokens.push(Token {
                    kind: TokenKind::Comment,
                    text: line[start_idx..].to_string(),
                });
                break;
            }

            '(' => {
                let mut end_idx = line.len();
                for (idx, ch) in chars.by_ref() {
                    if ch == ')' {
                        end_idx = idx + 1;
                        break;
                    }
                }
                tokens.push(Token {
                    kind: TokenKind::Comment,
                    text: line[start_idx..end_idx].to_string(),
                });
            }

            c if c.is_ascii_alphabetic() => {
                let end_idx = consume_while(&mut chars, start_idx + 1, |c| {
                    c.is_ascii_digit() || matches!(c, '.' | '-' | '+')
                });
                let text = line[start_idx..end_idx].to_ascii_uppercase();
                let kind = if matches!(text.as_bytes()[0], b'G' | b'M' | b'T') {
                    TokenKind::Command
                } else {
                    TokenKind::Parameter
                };
                tokens.push(Token { kind, text });
            }

            _ => {
                let end_idx = consume_while(&mut chars, start_idx + ch.len_utf8(), |c| {
                    !c.is_whitespace() && !c.is_ascii_alphabetic() && c != ';' && c != '('
                });
                tokens.push(Token {
                    kind: TokenKind::Unknown,
                    text: line[start_idx..end_idx].to_string(),
                });
            }
        }
    }

    tokens
}

fn consume_while(
    chars: &mut std::iter::Peekable<std::str::CharIndices<'_>>,
    mut end_idx: usize,
    keep: impl Fn(char) -> bool,
) -> usize {
    while let Some(&(idx, next)) = chars.peek() {
        if !keep(next) {
            break;
        }
        end_idx = idx + next.len_utf8();
        chars.next();
    }
    end_idx
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_move() {
        let tokens = tokenize_line("G1 X10 Y-2.5 F150");

        assert_eq!(tokens.len(), 4);
        assert_eq!(tokens[0].kind, TokenKind::Command);
        assert_eq!(tokens[0].text, "G1");
        assert_eq!(tokens[2].kind, TokenKind::Parameter);
        assert_eq!(tokens[2].text, "Y-2.5");
    }

    #[test]
    fn test_tokenize_packed_words() {
        let tokens = tokenize_line("g1x10y20");

        let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["G1", "X10", "Y20"]);
    }

    #[test]
    fn test_tokenize_comments() {
        let tokens = tokenize_line("M3 (laser on) S500 ; start cut");

        assert_eq!(tokens.len(), 4);
        assert_eq!(tokens[1].kind, TokenKind::Comment);
        assert_eq!(tokens[1].text, "(laser on)");
        assert_eq!(tokens[3].text, "; start cut");
    }

    #[test]
    fn test_unterminated_paren_comment() {
        let tokens = tokenize_line("G28 (home");
        assert_eq!(tokens[1].text, "(home");
    }

    #[test]
    fn test_unknown_tokens() {
        let tokens = tokenize_line("%");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::Unknown);
    }
}
