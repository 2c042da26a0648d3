/// One overlay field: its canonical name plus every accepted spelling.
///
/// Aliases are stored lowercase and include the canonical name itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
}

/// An ordered set of overlay fields.
///
/// Declaration order is presentation order: `format` always emits fields
/// in the order they appear here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSchema {
    fields: &'static [FieldSpec],
}

impl FieldSchema {
    pub const fn new(fields: &'static [FieldSpec]) -> Self {
        Self { fields }
    }

    /// Resolve a raw key to its canonical field name.
    ///
    /// Matching trims surrounding whitespace and ignores case.
    pub fn canonical(&self, key: &str) -> Option<&'static str> {
        let key = key.trim().to_lowercase();
        self.fields
            .iter()
            .find(|spec| spec.aliases.contains(&key.as_str()))
            .map(|spec| spec.name)
    }

    pub fn recognizes(&self, key: &str) -> bool {
        self.canonical(key).is_some()
    }

    pub fn specs(&self) -> &'static [FieldSpec] {
        self.fields
    }

    /// Canonical names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> {
        self.fields.iter().map(|spec| spec.name)
    }
}

/// Fields tracking which molecule is attached to a pinned record.
pub const ATTACHMENT: FieldSchema = FieldSchema::new(&[
    FieldSpec {
        name: "attached_molecule",
        aliases: &["attached_molecule", "attached-molecule", "attachedmolecule"],
    },
    FieldSpec {
        name: "attached_at",
        aliases: &["attached_at", "attached-at", "attachedat"],
    },
    FieldSpec {
        name: "attached_args",
        aliases: &["attached_args", "attached-args", "attachedargs"],
    },
]);

/// Fields describing a merge request.
pub const MERGE_REQUEST: FieldSchema = FieldSchema::new(&[
    FieldSpec {
        name: "branch",
        aliases: &["branch"],
    },
    FieldSpec {
        name: "target",
        aliases: &["target"],
    },
    FieldSpec {
        name: "source_issue",
        aliases: &["source_issue", "source-issue", "sourceissue"],
    },
    FieldSpec {
        name: "worker",
        aliases: &["worker"],
    },
    FieldSpec {
        name: "rig",
        aliases: &["rig"],
    },
    FieldSpec {
        name: "merge_commit",
        aliases: &["merge_commit", "merge-commit", "mergecommit"],
    },
    FieldSpec {
        name: "close_reason",
        aliases: &["close_reason", "close-reason", "closereason"],
    },
]);
