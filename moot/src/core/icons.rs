//! Fixed icon table resolved at display time.

use serde::Serialize;

use crate::core::types::{ResourceType, SubmissionStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Icon {
    Gavel,
    Scale,
    BookOpen,
    Library,
    GraduationCap,
    FileText,
    Landmark,
    Shield,
    CheckCircle,
    Clock,
    AlertCircle,
}

/// Renderable form of an icon: a stable name for web clients and a glyph
/// for terminals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IconResource {
    pub name: &'static str,
    pub glyph: &'static str,
}

const ICON_TABLE: [(Icon, IconResource); 11] = [
    (Icon::Gavel, IconResource { name: "gavel", glyph: "§" }),
    (Icon::Scale, IconResource { name: "scale", glyph: "⚖" }),
    (Icon::BookOpen, IconResource { name: "book-open", glyph: "▤" }),
    (Icon::Library, IconResource { name: "library", glyph: "▥" }),
    (Icon::GraduationCap, IconResource { name: "graduation-cap", glyph: "◆" }),
    (Icon::FileText, IconResource { name: "file-text", glyph: "▧" }),
    (Icon::Landmark, IconResource { name: "landmark", glyph: "⌂" }),
    (Icon::Shield, IconResource { name: "shield", glyph: "◈" }),
    (Icon::CheckCircle, IconResource { name: "check-circle", glyph: "✓" }),
    (Icon::Clock, IconResource { name: "clock", glyph: "…" }),
    (Icon::AlertCircle, IconResource { name: "alert-circle", glyph: "!" }),
];

impl Icon {
    pub fn resource(self) -> IconResource {
        ICON_TABLE
            .iter()
            .find(|(icon, _)| *icon == self)
            .map(|(_, resource)| *resource)
            .unwrap_or(IconResource {
                name: "file-text",
                glyph: "▧",
            })
    }

    /// Icon for an exercise subject; unknown subjects get the gavel.
    pub fn for_subject(subject: &str) -> Self {
        match subject {
            "Contract Law" => Self::FileText,
            "Tort Law" => Self::Shield,
            "Criminal Law" => Self::Gavel,
            "Public Law" | "Constitutional Law" => Self::Landmark,
            "Land Law" | "Equity & Trusts" => Self::Scale,
            _ => Self::Gavel,
        }
    }

    pub fn for_resource_type(resource_type: ResourceType) -> Self {
        match resource_type {
            ResourceType::LegalDatabase => Self::Library,
            ResourceType::SubjectGuide => Self::BookOpen,
            ResourceType::Tutorial => Self::GraduationCap,
        }
    }

    pub fn for_status(status: SubmissionStatus) -> Self {
        match status {
            SubmissionStatus::Analyzed => Self::CheckCircle,
            SubmissionStatus::Processing => Self::Clock,
            SubmissionStatus::Failed => Self::AlertCircle,
        }
    }
}
