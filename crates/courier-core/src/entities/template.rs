//! Message template entity - reusable per-user message bodies

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Template category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TemplateKind {
    Estimate,
    Delivered,
    Cancel,
    Delay,
    Others,
}

impl TemplateKind {
    /// Stable string form used for storage and API payloads
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Estimate => "Estimate",
            Self::Delivered => "Delivered",
            Self::Cancel => "Cancel",
            Self::Delay => "Delay",
            Self::Others => "Others",
        }
    }

    /// Parse from the stored string form
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Estimate" => Some(Self::Estimate),
            "Delivered" => Some(Self::Delivered),
            "Cancel" => Some(Self::Cancel),
            "Delay" => Some(Self::Delay),
            "Others" => Some(Self::Others),
            _ => None,
        }
    }
}

impl std::fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A per-user message template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageTemplate {
    pub id: Uuid,
    pub user_id: Uuid,
    pub kind: TemplateKind,
    pub name: String,
    /// Free-form body; placeholder substitution happens outside this core
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MessageTemplate {
    /// Create a new template
    pub fn new(user_id: Uuid, kind: TemplateKind, name: String, content: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            kind,
            name,
            content,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace the editable fields, bumping `updated_at`
    pub fn edit(&mut self, kind: TemplateKind, name: String, content: String) {
        self.kind = kind;
        self.name = name;
        self.content = content;
        self.updated_at = Utc::now();
    }
}
