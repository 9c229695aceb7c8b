//! Structural and semantic validation of DSL text.

use crate::error::{Location, ValidationError, ValidationErrorCode, ValidationOutcome};
use crate::hard_no;
use crate::parser::{Declaration, DeclarationBody, DeclarationKind, Slot, is_identifier, parse_line};
use bastion_core::{
    Ast, MetadataNode, ObjectNode, ObjectType, Sensitivity, SubjectNode, SubjectType, VerbClass, VerbNode,
};
use serde::{Deserialize, Serialize};

/// Outcome of validating a request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidationResult {
    /// The text is a well-formed, permitted request
    Valid {
        /// The request
        ast: Ast,
    },
    /// The text was rejected
    Invalid {
        /// Why
        error: ValidationError,
    },
}

impl ValidationResult {
    /// Whether validation succeeded
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        matches!(self, Self::Valid { .. })
    }

    /// The AST, if valid
    #[must_use]
    pub const fn ast(&self) -> Option<&Ast> {
        match self {
            Self::Valid { ast } => Some(ast),
            Self::Invalid { .. } => None,
        }
    }

    /// The error, if invalid
    #[must_use]
    pub const fn error(&self) -> Option<&ValidationError> {
        match self {
            Self::Valid { .. } => None,
            Self::Invalid { error } => Some(error),
        }
    }

    /// Convert into a `Result`
    ///
    /// # Errors
    ///
    /// Returns the validation error if invalid
    pub fn into_result(self) -> ValidationOutcome<Ast> {
        match self {
            Self::Valid { ast } => Ok(ast),
            Self::Invalid { error } => Err(error),
        }
    }
}

impl From<ValidationOutcome<Ast>> for ValidationResult {
    fn from(outcome: ValidationOutcome<Ast>) -> Self {
        match outcome {
            Ok(ast) => Self::Valid { ast },
            Err(error) => Self::Invalid { error },
        }
    }
}

/// Validate DSL text
#[must_use]
pub fn validate(text: &str) -> ValidationResult {
    DslValidator::new().validate(text)
}

/// Validator for capability requests.
///
/// Stateless: one instance may serve any number of concurrent callers
/// and every call depends only on its input text.
#[derive(Debug, Clone, Copy, Default)]
pub struct DslValidator;

impl DslValidator {
    /// Create a validator
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Validate DSL text into a result envelope
    #[must_use]
    pub fn validate(&self, text: &str) -> ValidationResult {
        let outcome = self.check(text);
        match &outcome {
            Ok(ast) => tracing::debug!(
                verb_class = %ast.verb.class,
                object_type = %ast.object.kind,
                "request validated"
            ),
            Err(err) => tracing::debug!(
                error_code = %err.error_code,
                line = ?err.location.line,
                "request rejected"
            ),
        }
        outcome.into()
    }

    /// Validate DSL text
    ///
    /// # Errors
    ///
    /// Returns the first failed check, in the order: empty input,
    /// per-line syntax and duplicates, missing declarations, field
    /// values, scope, Hard-No rules
    pub fn check(&self, text: &str) -> ValidationOutcome<Ast> {
        if text.trim().is_empty() {
            return Err(ValidationError::new(
                ValidationErrorCode::SyntaxError,
                "Empty or whitespace-only input",
                Location::none(),
            ));
        }

        let decls = collect_declarations(text)?;
        let ast = build_ast(decls)?;

        if let Some(rule) = hard_no::first_violation(&ast) {
            return Err(ValidationError::new(
                ValidationErrorCode::HardNoViolation,
                rule.message(),
                Location::none(),
            ));
        }
        Ok(ast)
    }
}

/// Parse every non-blank line, one declaration of each kind at most.
///
/// At most one declaration per kind is admitted, so a fifth declaration
/// is always reported as a duplicate of the line that repeats a kind.
fn collect_declarations(text: &str) -> ValidationOutcome<[Option<Declaration>; 4]> {
    let mut slots: [Option<Declaration>; 4] = Default::default();

    for (idx, raw) in text.split('\n').enumerate() {
        let line = idx + 1;
        if raw.trim().is_empty() {
            continue;
        }
        let decl = parse_line(line, raw)?;
        let kind = decl.kind();
        tracing::trace!(line, kind = %kind, "declaration parsed");

        let slot = &mut slots[kind.index()];
        if slot.is_some() {
            return Err(ValidationError::syntax(
                format!("Duplicate {kind} declaration"),
                line,
                decl.column,
            ));
        }
        *slot = Some(decl);
    }

    Ok(slots)
}

fn build_ast(decls: [Option<Declaration>; 4]) -> ValidationOutcome<Ast> {
    for kind in DeclarationKind::ALL {
        if decls[kind.index()].is_none() {
            return Err(ValidationError::new(
                ValidationErrorCode::MissingRequiredField,
                format!("Missing required {kind} declaration"),
                Location::none(),
            ));
        }
    }

    let [subject, verb, object, meta] = decls.map(|d| d.map(|d| d.body));
    let (
        Some(DeclarationBody::Subject {
            kind: subject_kind,
            identifier: subject_id,
        }),
        Some(DeclarationBody::Verb { class, action }),
        Some(DeclarationBody::Object {
            kind: object_kind,
            identifier: object_id,
        }),
        Some(DeclarationBody::Meta {
            scope,
            reversible,
            sensitivity,
            hrc_required,
        }),
    ) = (subject, verb, object, meta)
    else {
        return Err(ValidationError::new(
            ValidationErrorCode::SyntaxError,
            "Declarations out of place",
            Location::none(),
        ));
    };

    let subject_type = member(&subject_kind, SubjectType::parse, ValidationErrorCode::UnknownSubjectType, "subject type")?;
    let verb_class = member(&class, VerbClass::parse, ValidationErrorCode::UnknownVerbClass, "verb class")?;
    let object_type = member(&object_kind, ObjectType::parse, ValidationErrorCode::UnknownObjectType, "object type")?;
    let sensitivity = member(
        &sensitivity,
        Sensitivity::parse,
        ValidationErrorCode::InvalidMetadataValue,
        "sensitivity value",
    )?;

    if !is_identifier(&scope.text) {
        return Err(ValidationError::new(
            ValidationErrorCode::AmbiguousScope,
            format!("Invalid or ambiguous scope: {}", scope.text),
            located(&scope),
        ));
    }

    Ok(Ast {
        subject: SubjectNode {
            kind: subject_type,
            identifier: subject_id.text,
        },
        verb: VerbNode {
            class: verb_class,
            action: action.text,
        },
        object: ObjectNode {
            kind: object_type,
            identifier: object_id.text,
        },
        metadata: MetadataNode {
            scope: scope.text,
            reversible,
            sensitivity,
            hrc_required,
        },
    })
}

fn member<T>(
    slot: &Slot,
    parse: fn(&str) -> Option<T>,
    code: ValidationErrorCode,
    what: &str,
) -> ValidationOutcome<T> {
    parse(&slot.text).ok_or_else(|| ValidationError::new(code, format!("Unknown {what}: {}", slot.text), located(slot)))
}

fn located(slot: &Slot) -> Location {
    Location::at(slot.line, slot.column)
}
