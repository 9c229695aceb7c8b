//! The closed capability table.
//!
//! Every capability an executor may perform is a variant of
//! [`Capability`]. Each variant declares its own route
//! `(verb class, object type, action)` in [`Capability::route`], an
//! exhaustive match, so adding a capability without a route does not
//! compile. Resolution walks [`Capability::ALL`] and compares routes.

use crate::ast::{ObjectType, VerbClass};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A named action class an executor knows how to perform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Capability {
    /// Move a file
    FileMove,
    /// Delete a file
    FileDelete,
    /// Rename a file
    FileRename,
    /// Create a folder
    FolderCreate,
    /// Delete a folder
    FolderDelete,
    /// Compress a file
    FileCompress,
    /// Encrypt a file
    FileEncrypt,
    /// Extract content from an email
    EmailExtract,
    /// Filter a dataset
    DatasetFilter,
    /// Copy a file
    FileCopy,
    /// Share a file
    FileShare,
    /// Send an email
    EmailSend,
    /// Notify a device
    DeviceNotify,
}

impl Capability {
    /// The full table
    pub const ALL: [Self; 13] = [
        Self::FileMove,
        Self::FileDelete,
        Self::FileRename,
        Self::FolderCreate,
        Self::FolderDelete,
        Self::FileCompress,
        Self::FileEncrypt,
        Self::EmailExtract,
        Self::DatasetFilter,
        Self::FileCopy,
        Self::FileShare,
        Self::EmailSend,
        Self::DeviceNotify,
    ];

    /// The `(class, object, action)` triple that resolves to this capability.
    ///
    /// Actions are matched case-sensitively against the spelling used in
    /// the DSL.
    #[must_use]
    pub const fn route(&self) -> (VerbClass, ObjectType, &'static str) {
        use ObjectType as O;
        use VerbClass as V;
        match self {
            Self::FileMove => (V::Mutate, O::File, "move"),
            Self::FileDelete => (V::Mutate, O::File, "delete"),
            Self::FileRename => (V::Mutate, O::File, "rename"),
            Self::FolderCreate => (V::Mutate, O::Folder, "create"),
            Self::FolderDelete => (V::Mutate, O::Folder, "delete"),
            Self::FileCompress => (V::Transform, O::File, "compress"),
            Self::FileEncrypt => (V::Transform, O::File, "encrypt"),
            Self::EmailExtract => (V::Transform, O::Email, "extract"),
            Self::DatasetFilter => (V::Transform, O::Dataset, "filter"),
            Self::FileCopy => (V::Disseminate, O::File, "copy"),
            Self::FileShare => (V::Disseminate, O::File, "share"),
            Self::EmailSend => (V::Disseminate, O::Email, "send"),
            Self::DeviceNotify => (V::Disseminate, O::Device, "notify"),
        }
    }

    /// Look up the capability for a request, exact match only
    #[must_use]
    pub fn resolve(class: VerbClass, object: ObjectType, action: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|cap| {
            let (c, o, a) = cap.route();
            c == class && o == object && a == action
        })
    }

    /// Wire identifier, e.g. `FILE_MOVE`
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::FileMove => "FILE_MOVE",
            Self::FileDelete => "FILE_DELETE",
            Self::FileRename => "FILE_RENAME",
            Self::FolderCreate => "FOLDER_CREATE",
            Self::FolderDelete => "FOLDER_DELETE",
            Self::FileCompress => "FILE_COMPRESS",
            Self::FileEncrypt => "FILE_ENCRYPT",
            Self::EmailExtract => "EMAIL_EXTRACT",
            Self::DatasetFilter => "DATASET_FILTER",
            Self::FileCopy => "FILE_COPY",
            Self::FileShare => "FILE_SHARE",
            Self::EmailSend => "EMAIL_SEND",
            Self::DeviceNotify => "DEVICE_NOTIFY",
        }
    }

    /// Parse a wire identifier
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|cap| cap.as_str() == s)
    }

    /// Render the lookup key `"{class}:{object}:{action}"`
    #[must_use]
    pub fn lookup_key(class: VerbClass, object: ObjectType, action: &str) -> String {
        format!("{}:{}:{}", class.as_str(), object.as_str(), action)
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
