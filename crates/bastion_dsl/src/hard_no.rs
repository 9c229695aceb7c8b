//! Hard-No invariants.
//!
//! Structural rules that block a request outright, whatever the caller's
//! trust or confirmation. They look only at fields of the AST; no rule
//! infers intent from identifiers or other free text.

use bastion_core::{Ast, Sensitivity, VerbClass};

/// A rule that unconditionally rejects a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HardNoRule {
    /// `delete` with `reversible == false`
    IrreversibleDeletion,
    /// `MUTATE financial` at `HIGH` sensitivity with `hrc_required == false`
    FinancialWithoutHrc,
}

impl HardNoRule {
    /// Rules in evaluation order
    pub const ALL: [Self; 2] = [Self::IrreversibleDeletion, Self::FinancialWithoutHrc];

    /// Whether `ast` breaks this rule
    #[must_use]
    pub fn is_violated_by(&self, ast: &Ast) -> bool {
        let action = ast.verb.action.as_str();
        let meta = &ast.metadata;
        match self {
            Self::IrreversibleDeletion => action.eq_ignore_ascii_case("delete") && !meta.reversible,
            // exact action only, never a prefix or substring
            Self::FinancialWithoutHrc => {
                ast.verb.class == VerbClass::Mutate
                    && action.eq_ignore_ascii_case("financial")
                    && meta.sensitivity == Sensitivity::High
                    && !meta.hrc_required
            }
        }
    }

    /// Rejection message
    #[must_use]
    pub const fn message(&self) -> &'static str {
        match self {
            Self::IrreversibleDeletion => "Irreversible deletion is prohibited",
            Self::FinancialWithoutHrc => "High-sensitivity financial mutation requires HRC",
        }
    }
}

/// First rule `ast` violates, if any
#[must_use]
pub fn first_violation(ast: &Ast) -> Option<HardNoRule> {
    HardNoRule::ALL.into_iter().find(|rule| rule.is_violated_by(ast))
}
