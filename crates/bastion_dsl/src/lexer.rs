//! Line tokenizer for the capability DSL.
//!
//! Each source line is tokenized on its own. A token is one of the three
//! punctuation marks `(`, `)`, `,` or a *word*: a maximal run of
//! characters that are neither whitespace nor punctuation. Whitespace
//! only separates tokens and is otherwise insignificant.

use std::fmt;

/// Token payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `,`
    Comma,
    /// Anything else, verbatim
    Word(String),
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LParen => f.write_str("'('"),
            Self::RParen => f.write_str("')'"),
            Self::Comma => f.write_str("','"),
            Self::Word(w) => write!(f, "'{w}'"),
        }
    }
}

/// A token with its source position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Payload
    pub kind: TokenKind,
    /// 1-based line number
    pub line: usize,
    /// 1-based character column in the raw line
    pub column: usize,
}

impl Token {
    /// The word text, if this is a word
    #[must_use]
    pub fn word(&self) -> Option<&str> {
        match &self.kind {
            TokenKind::Word(w) => Some(w),
            _ => None,
        }
    }
}

fn is_punct(c: char) -> bool {
    matches!(c, '(' | ')' | ',')
}

/// Tokenize one raw source line.
///
/// Never fails: every character either belongs to a token or is
/// whitespace. Grammar errors are the parser's business.
#[must_use]
pub fn tokenize_line(line: usize, raw: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut chars = raw.chars().enumerate().peekable();

    while let Some((idx, c)) = chars.next() {
        let column = idx + 1;
        let kind = match c {
            c if c.is_whitespace() => continue,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            ',' => TokenKind::Comma,
            c => {
                let mut word = String::from(c);
                while let Some(&(_, next)) = chars.peek() {
                    if next.is_whitespace() || is_punct(next) {
                        break;
                    }
                    word.push(next);
                    chars.next();
                }
                TokenKind::Word(word)
            }
        };
        tokens.push(Token { kind, line, column });
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(raw: &str) -> Vec<TokenKind> {
        tokenize_line(1, raw).into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_tokenize_declaration() {
        assert_eq!(
            kinds("SUBJECT(USER, u1)"),
            vec![
                TokenKind::Word("SUBJECT".into()),
                TokenKind::LParen,
                TokenKind::Word("USER".into()),
                TokenKind::Comma,
                TokenKind::Word("u1".into()),
                TokenKind::RParen,
            ]
        );
    }

    #[test]
    fn test_columns_are_one_based_in_raw_line() {
        let tokens = tokenize_line(3, "  VERB( MUTATE ,move)");
        let cols: Vec<usize> = tokens.iter().map(|t| t.column).collect();
        assert_eq!(cols, vec![3, 7, 9, 16, 17, 21]);
        assert!(tokens.iter().all(|t| t.line == 3));
    }

    #[test]
    fn test_words_keep_odd_characters() {
        assert_eq!(
            kinds("scope@invalid /a.pdf"),
            vec![
                TokenKind::Word("scope@invalid".into()),
                TokenKind::Word("/a.pdf".into()),
            ]
        );
    }

    #[test]
    fn test_blank_line_has_no_tokens() {
        assert!(kinds(" \t ").is_empty());
    }

    #[test]
    fn test_multibyte_columns_count_characters() {
        let tokens = tokenize_line(1, "é(x)");
        assert_eq!(tokens[1].column, 2);
        assert_eq!(tokens[2].word(), Some("x"));
    }
}
