//! Doctor reference data offered for booking.

use serde::{Deserialize, Serialize};

/// A bookable doctor. Read-only reference data; the core never mutates it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Doctor {
    /// Identifier referenced by appointment drafts.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Medical specialty.
    pub specialty: String,
    /// Portrait URL.
    pub image: String,
}

impl Doctor {
    /// Build a doctor record.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        specialty: impl Into<String>,
        image: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            specialty: specialty.into(),
            image: image.into(),
        }
    }
}
