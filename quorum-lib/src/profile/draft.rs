//! The edit session's working copy of a profile.

use getset::{Getters, MutGetters};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::{
    profile::{
        PersonProfile, Skill, Website,
        avatar::{AVATAR_UNCHANGED, AvatarDraft},
    },
    taxonomy::{Category, CategoryId, Taxonomy},
};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("{0} is not a selectable top-level category")]
    UnknownCategory(CategoryId),
    #[error("the skill list already contains {0}")]
    DuplicateCategory(CategoryId),
    #[error("no skill at index {0}")]
    NoSuchSkill(usize),
    #[error("{expertise} is not an expertise under {category}")]
    ForeignExpertise {
        expertise: CategoryId,
        category: CategoryId,
    },
    #[error("no website at index {0}")]
    NoSuchWebsite(usize),
}

/// Draft of a person's profile, owned exclusively by the edit session.
///
/// The skill and website lists are only reachable through the operations
/// below, which uphold the selection invariants; the plain text fields are
/// free-form and bound directly to their inputs.
#[derive(Debug, Clone, Default, PartialEq, Getters, MutGetters)]
pub struct ProfileDraft {
    pub first_name: String,
    pub last_name: String,
    pub bio: String,
    #[getset(get = "pub")]
    skills: Vec<Skill>,
    #[getset(get = "pub")]
    websites: Vec<Website>,
    #[getset(get = "pub")]
    website_types: Vec<String>,
    #[getset(get = "pub", get_mut = "pub")]
    avatar: AvatarDraft,
}

impl ProfileDraft {
    /// Build a fresh draft from a profile snapshot.
    ///
    /// The snapshot's display name is split on whitespace into first and
    /// last name; a missing second token leaves the last name empty. The
    /// draft is rebuilt wholesale, never merged into field by field.
    pub fn from_profile(profile: &PersonProfile) -> Self {
        let mut names = profile.first_name.split_whitespace();

        Self {
            first_name: names.next().unwrap_or_default().to_owned(),
            last_name: names.next().unwrap_or_default().to_owned(),
            bio: profile.bio.clone(),
            skills: profile.skills.clone(),
            websites: profile.websites.clone(),
            website_types: profile.website_types.clone(),
            avatar: AvatarDraft::from_existing(&profile.avatar),
        }
    }

    // Skill cascade

    /// Append a new skill row for `category`.
    ///
    /// Only top-level categories of the loaded taxonomy qualify, and only
    /// while no other row has claimed the same category.
    pub fn choose_category(&mut self, taxonomy: &Taxonomy, category: CategoryId) -> Result<()> {
        let known = taxonomy
            .get(&category)
            .is_some_and(|c| c.parent_id.is_none());
        if !known {
            return Err(Error::UnknownCategory(category));
        }
        if self.skills.iter().any(|s| s.category == category) {
            return Err(Error::DuplicateCategory(category));
        }

        self.skills.push(Skill {
            category,
            expertise: None,
        });
        Ok(())
    }

    /// Set the expertise of the skill row at `index`.
    ///
    /// The expertise must be a child of that row's category; other rows are
    /// never touched.
    pub fn choose_expertise(
        &mut self,
        taxonomy: &Taxonomy,
        index: usize,
        expertise: CategoryId,
    ) -> Result<()> {
        let Some(skill) = self.skills.get_mut(index) else {
            return Err(Error::NoSuchSkill(index));
        };
        if !taxonomy.is_child_of(&expertise, &skill.category) {
            return Err(Error::ForeignExpertise {
                expertise,
                category: skill.category.clone(),
            });
        }

        skill.expertise = Some(expertise);
        Ok(())
    }

    /// Top-level categories still offered to the user: everything not
    /// already claimed by a skill row.
    pub fn category_candidates<'a>(&self, taxonomy: &'a Taxonomy) -> Vec<&'a Category> {
        taxonomy
            .skills()
            .filter(|c| !self.skills.iter().any(|s| s.category == c.id))
            .collect()
    }

    /// Expertise offered for the skill row at `index`: children of that
    /// row's category, minus expertise already claimed by other rows under
    /// the same category.
    ///
    /// Derived from current state on every call; nothing is cached, so
    /// sibling changes can never leave a stale option list behind.
    pub fn expertise_candidates<'a>(&self, taxonomy: &'a Taxonomy, index: usize) -> Vec<&'a Category> {
        let Some(skill) = self.skills.get(index) else {
            return Vec::new();
        };

        taxonomy
            .expertise_of(&skill.category)
            .filter(|candidate| {
                !self.skills.iter().enumerate().any(|(i, other)| {
                    i != index
                        && other.category == skill.category
                        && other.expertise.as_ref() == Some(&candidate.id)
                })
            })
            .collect()
    }

    // Websites

    /// Append an empty website row. Rows are never removed and the relative
    /// order of existing rows never changes.
    pub fn add_website(&mut self) {
        self.websites.push(Website {
            website: String::new(),
            kind: 0,
        });
    }

    /// Replace the URL of the website row at `index`.
    pub fn set_website_url(&mut self, index: usize, url: String) -> Result<()> {
        let Some(entry) = self.websites.get_mut(index) else {
            return Err(Error::NoSuchWebsite(index));
        };

        entry.website = url;
        Ok(())
    }

    /// Resolve `label` against the profile's website-type labels and store
    /// its position on the row at `index`. An unknown label is ignored.
    pub fn set_website_kind(&mut self, index: usize, label: &str) -> Result<()> {
        let kind = self.website_types.iter().position(|t| t == label);
        let Some(entry) = self.websites.get_mut(index) else {
            return Err(Error::NoSuchWebsite(index));
        };

        match kind {
            Some(kind) => entry.kind = kind,
            None => debug!(label, "ignoring unknown website type label"),
        }
        Ok(())
    }

    // Commit

    /// Reduce the draft to the normalized save payload.
    ///
    /// Only the persisted fields survive: skill rows keep category and
    /// expertise, website rows keep type index and URL, and the avatar is
    /// the confirmed id or [`AVATAR_UNCHANGED`].
    pub fn commit_payload(&self) -> ProfileUpdate {
        ProfileUpdate {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            bio: self.bio.clone(),
            skills: self
                .skills
                .iter()
                .map(|s| SkillInput {
                    category: s.category.clone(),
                    expertise: s.expertise.clone(),
                })
                .collect(),
            websites: self
                .websites
                .iter()
                .map(|w| WebsiteInput {
                    kind: w.kind,
                    website: w.website.clone(),
                })
                .collect(),
            avatar: self.avatar.confirmed_id().unwrap_or(AVATAR_UNCHANGED),
        }
    }
}

/// One skill row of the save payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillInput {
    pub category: CategoryId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expertise: Option<CategoryId>,
}

/// One website row of the save payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebsiteInput {
    #[serde(rename = "type")]
    pub kind: usize,
    pub website: String,
}

/// Normalized payload submitted to the platform's profile update operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub first_name: String,
    pub last_name: String,
    pub bio: String,
    pub skills: Vec<SkillInput>,
    pub websites: Vec<WebsiteInput>,
    pub avatar: i64,
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::taxonomy::Category;

    fn taxonomy() -> Taxonomy {
        let category = |id: &str, parent: Option<&str>| Category {
            id: id.into(),
            name: id.to_uppercase(),
            parent_id: parent.map(CategoryId::from),
        };

        Taxonomy::new(vec![
            category("design", None),
            category("engineering", None),
            category("ui", Some("design")),
            category("ux", Some("design")),
            category("backend", Some("engineering")),
        ])
    }

    fn profile() -> PersonProfile {
        PersonProfile {
            first_name: "Ada Lovelace".into(),
            bio: "First programmer".into(),
            website_types: vec!["Website".into(), "Portfolio".into(), "GitHub".into()],
            ..PersonProfile::default()
        }
    }

    #[test]
    fn test_name_splitting() {
        let draft = ProfileDraft::from_profile(&profile());

        assert_eq!(draft.first_name, "Ada");
        assert_eq!(draft.last_name, "Lovelace");
    }

    #[test]
    fn test_name_splitting_single_token() {
        let draft = ProfileDraft::from_profile(&PersonProfile {
            first_name: "Ada".into(),
            ..PersonProfile::default()
        });

        assert_eq!(draft.first_name, "Ada");
        assert_eq!(draft.last_name, "");
    }

    #[test]
    fn test_reinitialized_wholesale() {
        let mut draft = ProfileDraft::from_profile(&profile());
        draft.bio = "edited".into();
        draft.add_website();

        draft = ProfileDraft::from_profile(&PersonProfile {
            first_name: "Grace Hopper".into(),
            ..PersonProfile::default()
        });

        assert_eq!(draft.first_name, "Grace");
        assert_eq!(draft.bio, "");
        assert!(draft.websites().is_empty());
    }

    #[test]
    fn test_choose_category() {
        let taxonomy = taxonomy();
        let mut draft = ProfileDraft::from_profile(&profile());

        draft.choose_category(&taxonomy, "design".into()).unwrap();

        assert_eq!(
            draft.skills(),
            &[Skill {
                category: "design".into(),
                expertise: None,
            }]
        );
    }

    #[test]
    fn test_choose_category_rejects_duplicates() {
        let taxonomy = taxonomy();
        let mut draft = ProfileDraft::from_profile(&profile());
        draft.choose_category(&taxonomy, "design".into()).unwrap();

        assert_eq!(
            draft.choose_category(&taxonomy, "design".into()),
            Err(Error::DuplicateCategory("design".into()))
        );
        assert_eq!(draft.skills().len(), 1);
    }

    #[test]
    fn test_choose_category_rejects_expertise_ids() {
        let taxonomy = taxonomy();
        let mut draft = ProfileDraft::from_profile(&profile());

        // "ui" exists but is not top-level.
        assert_eq!(
            draft.choose_category(&taxonomy, "ui".into()),
            Err(Error::UnknownCategory("ui".into()))
        );
    }

    #[test]
    fn test_choose_expertise() {
        let taxonomy = taxonomy();
        let mut draft = ProfileDraft::from_profile(&profile());
        draft.choose_category(&taxonomy, "design".into()).unwrap();

        draft.choose_expertise(&taxonomy, 0, "ui".into()).unwrap();

        assert_eq!(
            draft.skills().first().and_then(|s| s.expertise.clone()),
            Some("ui".into())
        );
    }

    #[test]
    fn test_choose_expertise_rejects_foreign_parent() {
        let taxonomy = taxonomy();
        let mut draft = ProfileDraft::from_profile(&profile());
        draft.choose_category(&taxonomy, "design".into()).unwrap();

        // "backend" belongs to engineering, not design.
        assert_eq!(
            draft.choose_expertise(&taxonomy, 0, "backend".into()),
            Err(Error::ForeignExpertise {
                expertise: "backend".into(),
                category: "design".into(),
            })
        );
        assert_eq!(draft.skills().first().and_then(|s| s.expertise.clone()), None);
    }

    #[test]
    fn test_choose_expertise_rejects_missing_row() {
        let taxonomy = taxonomy();
        let mut draft = ProfileDraft::from_profile(&profile());

        assert_eq!(
            draft.choose_expertise(&taxonomy, 0, "ui".into()),
            Err(Error::NoSuchSkill(0))
        );
    }

    #[test]
    fn test_category_candidates_shrink() {
        let taxonomy = taxonomy();
        let mut draft = ProfileDraft::from_profile(&profile());

        assert_eq!(draft.category_candidates(&taxonomy).len(), 2);

        draft.choose_category(&taxonomy, "design".into()).unwrap();

        let names: Vec<&str> = draft
            .category_candidates(&taxonomy)
            .iter()
            .map(|c| c.id.as_str())
            .collect();
        assert_eq!(names, ["engineering"]);
    }

    #[test]
    fn test_expertise_candidates_follow_category() {
        let taxonomy = taxonomy();
        let mut draft = ProfileDraft::from_profile(&profile());
        draft.choose_category(&taxonomy, "design".into()).unwrap();

        let names: Vec<&str> = draft
            .expertise_candidates(&taxonomy, 0)
            .iter()
            .map(|c| c.id.as_str())
            .collect();
        assert_eq!(names, ["ui", "ux"]);
        assert!(draft.expertise_candidates(&taxonomy, 1).is_empty());
    }

    #[test]
    fn test_websites_append_preserves_existing_rows() {
        let mut draft = ProfileDraft::from_profile(&profile());
        draft.add_website();
        draft.set_website_url(0, "example.com".into()).unwrap();
        let before = draft.websites().clone();

        draft.add_website();

        assert_eq!(draft.websites().len(), 2);
        assert_eq!(draft.websites().get(..before.len()), Some(before.as_slice()));
    }

    #[test]
    fn test_websites_scenario() {
        let mut draft = ProfileDraft::from_profile(&profile());

        draft.add_website();
        draft.add_website();
        draft.set_website_url(0, "example.com".into()).unwrap();

        assert_eq!(
            draft.websites(),
            &[
                Website {
                    website: "example.com".into(),
                    kind: 0,
                },
                Website {
                    website: String::new(),
                    kind: 0,
                },
            ]
        );
    }

    #[test]
    fn test_set_website_kind() {
        let mut draft = ProfileDraft::from_profile(&profile());
        draft.add_website();

        draft.set_website_kind(0, "GitHub").unwrap();

        assert_eq!(draft.websites().first().map(|w| w.kind), Some(2));
    }

    #[test]
    fn test_set_website_kind_ignores_unknown_label() {
        let mut draft = ProfileDraft::from_profile(&profile());
        draft.add_website();
        draft.set_website_kind(0, "Portfolio").unwrap();
        let before = draft.websites().clone();

        draft.set_website_kind(0, "Carrier Pigeon").unwrap();

        assert_eq!(draft.websites(), &before);
    }

    #[test]
    fn test_set_website_url_rejects_missing_row() {
        let mut draft = ProfileDraft::from_profile(&profile());

        assert_eq!(
            draft.set_website_url(3, "example.com".into()),
            Err(Error::NoSuchWebsite(3))
        );
    }

    #[test]
    fn test_commit_payload() {
        let taxonomy = taxonomy();
        let mut draft = ProfileDraft::from_profile(&profile());
        draft.choose_category(&taxonomy, "design".into()).unwrap();
        draft.choose_expertise(&taxonomy, 0, "ui".into()).unwrap();
        draft.add_website();
        draft.set_website_url(0, "example.com".into()).unwrap();
        draft.set_website_kind(0, "GitHub").unwrap();

        let payload = draft.commit_payload();

        assert_eq!(payload.first_name, "Ada");
        assert_eq!(payload.last_name, "Lovelace");
        assert_eq!(
            payload.skills,
            vec![SkillInput {
                category: "design".into(),
                expertise: Some("ui".into()),
            }]
        );
        assert_eq!(
            payload.websites,
            vec![WebsiteInput {
                kind: 2,
                website: "example.com".into(),
            }]
        );
        assert_eq!(payload.avatar, AVATAR_UNCHANGED);
    }

    #[test]
    fn test_commit_payload_carries_confirmed_avatar() {
        let mut draft = ProfileDraft::from_profile(&profile());
        draft.avatar_mut().stage("thumb".into()).unwrap();
        draft.avatar_mut().begin_confirm().unwrap();
        draft
            .avatar_mut()
            .confirm_succeeded(42, "/media/avatars/42.png".into());

        assert_eq!(draft.commit_payload().avatar, 42);
    }

    #[test]
    fn test_commit_payload_is_a_fixed_point() {
        let taxonomy = taxonomy();
        let mut draft = ProfileDraft::from_profile(&profile());
        draft.choose_category(&taxonomy, "engineering".into()).unwrap();
        draft.add_website();
        draft.set_website_url(0, "example.com".into()).unwrap();

        let payload = draft.commit_payload();

        // Feed the payload back through a snapshot and renormalize.
        let snapshot = PersonProfile {
            first_name: format!("{} {}", payload.first_name, payload.last_name),
            bio: payload.bio.clone(),
            skills: payload
                .skills
                .iter()
                .map(|s| Skill {
                    category: s.category.clone(),
                    expertise: s.expertise.clone(),
                })
                .collect(),
            websites: payload
                .websites
                .iter()
                .map(|w| Website {
                    website: w.website.clone(),
                    kind: w.kind,
                })
                .collect(),
            website_types: profile().website_types,
            avatar: String::new(),
        };

        assert_eq!(ProfileDraft::from_profile(&snapshot).commit_payload(), payload);
    }
}
