//! Abstract syntax tree of a validated capability request.
//!
//! An [`Ast`] is only ever produced by the DSL validator and is treated
//! as immutable afterwards. Field names and enum spellings match the
//! wire contract exactly (`subject.type`, `verb.class`, ...).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Who is asking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubjectType {
    /// A human user
    User,
    /// An automated system principal
    System,
}

impl SubjectType {
    /// Every subject type, in declaration order
    pub const ALL: [Self; 2] = [Self::User, Self::System];

    /// Wire spelling
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::User => "USER",
            Self::System => "SYSTEM",
        }
    }

    /// Parse the exact wire spelling
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == s)
    }
}

/// Class of side effect a verb has
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VerbClass {
    /// Changes the object in place
    Mutate,
    /// Derives a new representation of the object
    Transform,
    /// Sends the object somewhere else
    Disseminate,
}

impl VerbClass {
    /// Every verb class, in declaration order
    pub const ALL: [Self; 3] = [Self::Mutate, Self::Transform, Self::Disseminate];

    /// Wire spelling
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Mutate => "MUTATE",
            Self::Transform => "TRANSFORM",
            Self::Disseminate => "DISSEMINATE",
        }
    }

    /// Parse the exact wire spelling
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == s)
    }
}

/// Kind of object acted upon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ObjectType {
    /// A single file
    File,
    /// A directory
    Folder,
    /// An email message
    Email,
    /// A structured dataset
    Dataset,
    /// A device endpoint
    Device,
}

impl ObjectType {
    /// Every object type, in declaration order
    pub const ALL: [Self; 5] = [
        Self::File,
        Self::Folder,
        Self::Email,
        Self::Dataset,
        Self::Device,
    ];

    /// Wire spelling
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::File => "FILE",
            Self::Folder => "FOLDER",
            Self::Email => "EMAIL",
            Self::Dataset => "DATASET",
            Self::Device => "DEVICE",
        }
    }

    /// Parse the exact wire spelling
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == s)
    }
}

/// Data sensitivity of a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Sensitivity {
    /// Low sensitivity
    Low,
    /// Medium sensitivity
    Medium,
    /// High sensitivity
    High,
}

impl Sensitivity {
    /// Every sensitivity level, lowest first
    pub const ALL: [Self; 3] = [Self::Low, Self::Medium, Self::High];

    /// Wire spelling
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
        }
    }

    /// Parse the exact wire spelling
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|l| l.as_str() == s)
    }
}

macro_rules! display_as_str {
    ($($ty:ty),*) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.as_str())
                }
            }
        )*
    };
}

display_as_str!(SubjectType, VerbClass, ObjectType, Sensitivity);

/// `SUBJECT(type, identifier)`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SubjectNode {
    /// Subject type
    #[serde(rename = "type")]
    pub kind: SubjectType,
    /// Subject identifier
    pub identifier: String,
}

/// `VERB(class, action)`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VerbNode {
    /// Verb class
    pub class: VerbClass,
    /// Action, case preserved exactly as written
    pub action: String,
}

/// `OBJECT(type, identifier)`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ObjectNode {
    /// Object type
    #[serde(rename = "type")]
    pub kind: ObjectType,
    /// Object identifier
    pub identifier: String,
}

/// `META(scope, reversible, sensitivity, hrc_required)`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MetadataNode {
    /// Scope label
    pub scope: String,
    /// Whether the effect can be undone
    pub reversible: bool,
    /// Sensitivity level
    pub sensitivity: Sensitivity,
    /// Whether hardware-rooted confirmation is required
    pub hrc_required: bool,
}

/// A validated capability request
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Ast {
    /// Who is asking
    pub subject: SubjectNode,
    /// What is to be done
    pub verb: VerbNode,
    /// What it is done to
    pub object: ObjectNode,
    /// Constraints on the request
    pub metadata: MetadataNode,
}
