//! Person profile types for the edit workflow.
//!
//! [`PersonProfile`] is the snapshot handed to the edit session by its host;
//! [`ProfileDraft`] is the mutable working copy the session owns until the
//! user saves or cancels.

use serde::{Deserialize, Serialize};

use crate::taxonomy::CategoryId;

pub mod avatar;
pub mod draft;

pub use avatar::{AVATAR_UNCHANGED, AvatarDraft, StagedImage};
pub use draft::{ProfileDraft, ProfileUpdate, SkillInput, WebsiteInput};

/// One chosen skill: a top-level category, optionally narrowed to one of its
/// child expertise categories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skill {
    pub category: CategoryId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expertise: Option<CategoryId>,
}

/// One website row. `kind` is a positional index into the profile's
/// website-type labels, not a name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Website {
    pub website: String,
    #[serde(rename = "type")]
    pub kind: usize,
}

/// Profile snapshot as served by the platform.
///
/// `first_name` carries the full display name; the draft splits it into
/// first and last on initialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonProfile {
    pub first_name: String,
    pub bio: String,
    pub skills: Vec<Skill>,
    pub websites: Vec<Website>,
    pub website_types: Vec<String>,
    /// URL path of the current avatar, empty when the person has none.
    pub avatar: String,
}
