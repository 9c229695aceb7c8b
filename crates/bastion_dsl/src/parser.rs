//! Declaration parser.
//!
//! Grammar, one declaration per non-blank line:
//!
//! ```text
//! declaration := KEYWORD "(" arg { "," arg } ")"
//! KEYWORD     := "SUBJECT" | "VERB" | "OBJECT" | "META"
//! arg         := [ word ]
//! ```
//!
//! The parser checks the *shape* of every slot (arity, charset, boolean
//! literals). Whether an enum word names a known member is left to the
//! validator, so `SUBJECT(ROBOT, x)` parses and is then rejected with a
//! precise error code instead of a generic syntax error.

use crate::error::{ValidationError, ValidationOutcome};
use crate::lexer::{Token, TokenKind, tokenize_line};
use std::fmt;

/// The four declaration kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DeclarationKind {
    /// `SUBJECT(type, identifier)`
    Subject,
    /// `VERB(class, action)`
    Verb,
    /// `OBJECT(type, identifier)`
    Object,
    /// `META(scope, reversible, sensitivity, hrc_required)`
    Meta,
}

impl DeclarationKind {
    /// All kinds, in the order missing ones are reported
    pub const ALL: [Self; 4] = [Self::Subject, Self::Verb, Self::Object, Self::Meta];

    /// Keyword spelling
    #[must_use]
    pub const fn keyword(&self) -> &'static str {
        match self {
            Self::Subject => "SUBJECT",
            Self::Verb => "VERB",
            Self::Object => "OBJECT",
            Self::Meta => "META",
        }
    }

    /// Slots taken, by name
    #[must_use]
    pub const fn slots(&self) -> &'static [&'static str] {
        match self {
            Self::Subject => &["type", "identifier"],
            Self::Verb => &["class", "action"],
            Self::Object => &["type", "identifier"],
            Self::Meta => &["scope", "reversible", "sensitivity", "hrc_required"],
        }
    }

    /// Position in [`Self::ALL`]
    #[must_use]
    pub const fn index(&self) -> usize {
        match self {
            Self::Subject => 0,
            Self::Verb => 1,
            Self::Object => 2,
            Self::Meta => 3,
        }
    }

    fn from_keyword(word: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.keyword() == word)
    }
}

impl fmt::Display for DeclarationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// A slot value with its source position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    /// Verbatim text, empty for an empty scope
    pub text: String,
    /// 1-based line
    pub line: usize,
    /// 1-based column
    pub column: usize,
}

/// Parsed, shape-checked slot values of one declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeclarationBody {
    /// `SUBJECT(...)`
    Subject {
        /// Subject type word
        kind: Slot,
        /// Subject identifier
        identifier: Slot,
    },
    /// `VERB(...)`
    Verb {
        /// Verb class word
        class: Slot,
        /// Action, case preserved
        action: Slot,
    },
    /// `OBJECT(...)`
    Object {
        /// Object type word
        kind: Slot,
        /// Object identifier
        identifier: Slot,
    },
    /// `META(...)`
    Meta {
        /// Scope, syntactically unchecked
        scope: Slot,
        /// Reversible flag
        reversible: bool,
        /// Sensitivity word
        sensitivity: Slot,
        /// HRC flag
        hrc_required: bool,
    },
}

/// One declaration line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    /// 1-based line
    pub line: usize,
    /// Column of the keyword
    pub column: usize,
    /// Slot values
    pub body: DeclarationBody,
}

impl Declaration {
    /// Which declaration this is
    #[must_use]
    pub const fn kind(&self) -> DeclarationKind {
        match self.body {
            DeclarationBody::Subject { .. } => DeclarationKind::Subject,
            DeclarationBody::Verb { .. } => DeclarationKind::Verb,
            DeclarationBody::Object { .. } => DeclarationKind::Object,
            DeclarationBody::Meta { .. } => DeclarationKind::Meta,
        }
    }
}

/// `[A-Za-z0-9_-]+`
#[must_use]
pub fn is_word(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// `[A-Za-z0-9_-/.]+`
#[must_use]
pub fn is_identifier(s: &str) -> bool {
    !s.is_empty()
        && s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '/' | '.'))
}

/// Raw argument: the words between two delimiters
struct RawArg {
    words: Vec<Token>,
    /// Column of the delimiter that closed the argument
    end_column: usize,
}

/// Parse one non-blank source line
///
/// # Errors
///
/// Returns a `SYNTAX_ERROR` located at the first offending token
pub fn parse_line(line: usize, raw: &str) -> ValidationOutcome<Declaration> {
    let tokens = tokenize_line(line, raw);
    let mut iter = tokens.into_iter();

    let Some(head) = iter.next() else {
        return Err(ValidationError::syntax(format!("Invalid syntax at line {line}: empty line"), line, 1));
    };
    let kind = head
        .word()
        .and_then(DeclarationKind::from_keyword)
        .ok_or_else(|| {
            ValidationError::syntax(
                format!(
                    "Invalid syntax at line {line}: expected SUBJECT, VERB, OBJECT or META, found {}",
                    head.kind
                ),
                line,
                head.column,
            )
        })?;

    match iter.next() {
        Some(Token {
            kind: TokenKind::LParen,
            ..
        }) => {}
        Some(tok) => {
            return Err(ValidationError::syntax(
                format!("Invalid syntax at line {line}: expected '(' after {kind}, found {}", tok.kind),
                line,
                tok.column,
            ));
        }
        None => {
            return Err(ValidationError::syntax(
                format!("Invalid syntax at line {line}: expected '(' after {kind}"),
                line,
                head.column + kind.keyword().chars().count(),
            ));
        }
    }

    let mut args = Vec::new();
    let mut current = Vec::new();
    let mut closed = false;
    for tok in iter.by_ref() {
        match tok.kind {
            TokenKind::Word(_) => current.push(tok),
            TokenKind::Comma => args.push(RawArg {
                words: std::mem::take(&mut current),
                end_column: tok.column,
            }),
            TokenKind::RParen => {
                args.push(RawArg {
                    words: std::mem::take(&mut current),
                    end_column: tok.column,
                });
                closed = true;
                break;
            }
            TokenKind::LParen => {
                return Err(ValidationError::syntax(
                    format!("Invalid syntax at line {line}: unexpected '(' inside {kind}"),
                    line,
                    tok.column,
                ));
            }
        }
    }

    if !closed {
        return Err(ValidationError::syntax(
            format!("Invalid syntax at line {line}: unclosed {kind} declaration"),
            line,
            raw.trim_end().chars().count() + 1,
        ));
    }
    if let Some(tok) = iter.next() {
        return Err(ValidationError::syntax(
            format!("Invalid syntax at line {line}: unexpected {} after ')'", tok.kind),
            line,
            tok.column,
        ));
    }

    let slots = kind.slots();
    if args.len() != slots.len() {
        return Err(ValidationError::syntax(
            format!(
                "Invalid syntax at line {line}: {kind} takes {} arguments, found {}",
                slots.len(),
                args.len()
            ),
            line,
            head.column,
        ));
    }

    let mut args = args.into_iter();
    let mut next = |shape: Shape| -> ValidationOutcome<Slot> {
        // arity was checked above
        let arg = args.next().ok_or_else(|| {
            ValidationError::syntax(format!("Invalid syntax at line {line}: missing argument"), line, head.column)
        })?;
        shape.check(kind, line, arg)
    };

    let body = match kind {
        DeclarationKind::Subject => DeclarationBody::Subject {
            kind: next(Shape::Enum("type"))?,
            identifier: next(Shape::Identifier)?,
        },
        DeclarationKind::Verb => DeclarationBody::Verb {
            class: next(Shape::Enum("class"))?,
            action: next(Shape::Action)?,
        },
        DeclarationKind::Object => DeclarationBody::Object {
            kind: next(Shape::Enum("type"))?,
            identifier: next(Shape::Identifier)?,
        },
        DeclarationKind::Meta => DeclarationBody::Meta {
            scope: next(Shape::Scope)?,
            reversible: parse_bool(&next(Shape::Bool("reversible"))?),
            sensitivity: next(Shape::Enum("sensitivity"))?,
            hrc_required: parse_bool(&next(Shape::Bool("hrc_required"))?),
        },
    };

    Ok(Declaration {
        line,
        column: head.column,
        body,
    })
}

fn parse_bool(slot: &Slot) -> bool {
    slot.text == "true"
}

/// Lexical shape of a slot
#[derive(Debug, Clone, Copy)]
enum Shape {
    Enum(&'static str),
    Identifier,
    Action,
    Bool(&'static str),
    Scope,
}

impl Shape {
    fn name(&self) -> &'static str {
        match self {
            Self::Enum(name) | Self::Bool(name) => *name,
            Self::Identifier => "identifier",
            Self::Action => "action",
            Self::Scope => "scope",
        }
    }

    fn accepts(&self, text: &str) -> bool {
        match self {
            Self::Enum(_) | Self::Action => is_word(text),
            Self::Identifier => is_identifier(text),
            Self::Bool(_) => matches!(text, "true" | "false"),
            Self::Scope => true,
        }
    }

    fn check(self, kind: DeclarationKind, line: usize, arg: RawArg) -> ValidationOutcome<Slot> {
        let mut words = arg.words.into_iter();
        let Some(first) = words.next() else {
            if matches!(self, Self::Scope) {
                return Ok(Slot {
                    text: String::new(),
                    line,
                    column: arg.end_column,
                });
            }
            return Err(ValidationError::syntax(
                format!("Invalid syntax at line {line}: {kind} is missing its {}", self.name()),
                line,
                arg.end_column,
            ));
        };
        if let Some(extra) = words.next() {
            return Err(ValidationError::syntax(
                format!(
                    "Invalid syntax at line {line}: unexpected {} in {kind} {}",
                    extra.kind,
                    self.name()
                ),
                line,
                extra.column,
            ));
        }

        let column = first.column;
        let text = match first.kind {
            TokenKind::Word(w) => w,
            other => {
                return Err(ValidationError::syntax(
                    format!("Invalid syntax at line {line}: unexpected {other}"),
                    line,
                    column,
                ));
            }
        };
        if !self.accepts(&text) {
            return Err(ValidationError::syntax(
                format!("Invalid syntax at line {line}: malformed {kind} {}: {text}", self.name()),
                line,
                column,
            ));
        }
        Ok(Slot { text, line, column })
    }
}
