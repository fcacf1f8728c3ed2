// src/session/materials.rs
//! Per-job materials lifecycle: a clean copy from the service and an editable draft
//!
//! A job with no entry has no materials. `Generated` holds only the clean copy and
//! whether the panel is open; `Editing` exists once the open panel has been edited and
//! keeps the draft apart from the clean copy until `save_and_close`.

use serde::{Deserialize, Serialize};

use crate::types::GeneratedMaterials;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaterialsField {
    Inmail,
    CoverLetter,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum MaterialsEntry {
    Generated {
        clean: GeneratedMaterials,
        open: bool,
    },
    Editing {
        clean: GeneratedMaterials,
        draft: GeneratedMaterials,
    },
}

impl MaterialsEntry {
    /// Fresh materials open their panel
    pub fn fetched(materials: GeneratedMaterials) -> Self {
        MaterialsEntry::Generated {
            clean: materials,
            open: true,
        }
    }

    /// Copy used for saving and export
    pub fn clean(&self) -> &GeneratedMaterials {
        match self {
            MaterialsEntry::Generated { clean, .. } | MaterialsEntry::Editing { clean, .. } => {
                clean
            }
        }
    }

    /// Copy shown in the editor
    pub fn view(&self) -> &GeneratedMaterials {
        match self {
            MaterialsEntry::Generated { clean, .. } => clean,
            MaterialsEntry::Editing { draft, .. } => draft,
        }
    }

    pub fn is_open(&self) -> bool {
        match self {
            MaterialsEntry::Generated { open, .. } => *open,
            MaterialsEntry::Editing { .. } => true,
        }
    }

    pub fn is_editing(&self) -> bool {
        matches!(self, MaterialsEntry::Editing { .. })
    }

    /// A later fetch replaces both copies and reopens the panel
    pub fn refetched(&mut self, materials: GeneratedMaterials) {
        *self = MaterialsEntry::fetched(materials);
    }

    /// Write to the draft only. Returns false when the panel is closed.
    pub fn edit(&mut self, field: MaterialsField, text: &str) -> bool {
        match self {
            MaterialsEntry::Generated { open: false, .. } => false,
            MaterialsEntry::Generated { clean, open: true } => {
                let mut draft = clean.clone();
                set_field(&mut draft, field, text);
                *self = MaterialsEntry::Editing {
                    clean: clean.clone(),
                    draft,
                };
                true
            }
            MaterialsEntry::Editing { draft, .. } => {
                set_field(draft, field, text);
                true
            }
        }
    }

    /// Promote the draft to the clean copy and close the panel
    pub fn save_and_close(&mut self) {
        *self = match std::mem::replace(self, MaterialsEntry::fetched(GeneratedMaterials::default()))
        {
            MaterialsEntry::Generated { clean, .. } => MaterialsEntry::Generated { clean, open: false },
            MaterialsEntry::Editing { draft, .. } => MaterialsEntry::Generated {
                clean: draft,
                open: false,
            },
        };
    }

    pub fn reopen(&mut self) {
        if let MaterialsEntry::Generated { open, .. } = self {
            *open = true;
        }
    }
}

fn set_field(materials: &mut GeneratedMaterials, field: MaterialsField, text: &str) {
    match field {
        MaterialsField::Inmail => materials.inmail = text.to_string(),
        MaterialsField::CoverLetter => materials.cover_letter = text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::fake_service::materials;

    #[test]
    fn test_editing_never_touches_clean_copy() {
        let mut entry = MaterialsEntry::fetched(materials("hi", "dear"));

        assert!(entry.edit(MaterialsField::Inmail, "hello there"));
        assert!(entry.edit(MaterialsField::CoverLetter, "dear team"));

        assert!(entry.is_editing());
        assert_eq!(entry.clean(), &materials("hi", "dear"));
        assert_eq!(entry.view(), &materials("hello there", "dear team"));
    }

    #[test]
    fn test_save_and_close_promotes_draft() {
        let mut entry = MaterialsEntry::fetched(materials("hi", "dear"));
        entry.edit(MaterialsField::Inmail, "edited");
        entry.save_and_close();

        assert!(!entry.is_open());
        assert!(!entry.is_editing());
        assert_eq!(entry.clean(), &materials("edited", "dear"));
    }

    #[test]
    fn test_closed_panel_rejects_edits_until_reopened() {
        let mut entry = MaterialsEntry::fetched(materials("hi", "dear"));
        entry.save_and_close();

        assert!(!entry.edit(MaterialsField::Inmail, "ignored"));
        assert_eq!(entry.view(), &materials("hi", "dear"));

        entry.reopen();
        assert!(entry.is_open());
        assert!(entry.edit(MaterialsField::Inmail, "now"));
        assert_eq!(entry.clean(), &materials("hi", "dear"));
    }

    #[test]
    fn test_refetch_discards_open_draft() {
        let mut entry = MaterialsEntry::fetched(materials("hi", "dear"));
        entry.edit(MaterialsField::Inmail, "mine");
        entry.refetched(materials("v2", "v2 letter"));

        assert!(!entry.is_editing());
        assert_eq!(entry.view(), &materials("v2", "v2 letter"));

        entry.save_and_close();
        assert_eq!(entry.clean(), &materials("v2", "v2 letter"));
    }

    #[test]
    fn test_refetch_reopens_closed_panel() {
        let mut entry = MaterialsEntry::fetched(materials("hi", "dear"));
        entry.save_and_close();
        entry.refetched(materials("v2", "v2 letter"));

        assert!(entry.is_open());
        assert_eq!(entry.view(), &materials("v2", "v2 letter"));
    }
}
