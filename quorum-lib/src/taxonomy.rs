//! Category taxonomy backing the skill and expertise selectors.
//!
//! The platform serves the taxonomy as a JSON-encoded flat list of
//! categories. Top-level entries are skills, entries with a parent are the
//! expertise choices under that skill. The whole tree is fetched once per
//! session and shared read-only between selectors.

use std::{collections::HashSet, sync::Arc};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::services::{AnyPlatform, Platform};

/// Identifier of a [`Category`], as assigned by the platform.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    derive_more::Display,
    derive_more::From,
    Serialize,
    Deserialize,
)]
pub struct CategoryId(String);

impl CategoryId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CategoryId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

/// A single node of the two-level category tree. Displays as its name, so
/// selectors can offer categories directly.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[display("{name}")]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<CategoryId>,
}

/// The flattened category tree for one session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Taxonomy {
    categories: Vec<Category>,
}

impl Taxonomy {
    /// Build a taxonomy from a flat category list, dropping entries whose
    /// parent is absent from the list.
    pub fn new(categories: Vec<Category>) -> Self {
        let ids: HashSet<CategoryId> = categories.iter().map(|c| c.id.clone()).collect();
        let (kept, orphans): (Vec<Category>, Vec<Category>) = categories
            .into_iter()
            .partition(|c| c.parent_id.as_ref().is_none_or(|parent| ids.contains(parent)));

        for orphan in &orphans {
            warn!(id = %orphan.id, "dropping category with missing parent");
        }

        Self { categories: kept }
    }

    /// Decode the platform's encoded taxonomy payload.
    ///
    /// A missing or malformed payload degrades to an empty taxonomy so the
    /// selectors simply offer no choices.
    pub fn decode(payload: Option<&str>) -> Self {
        let Some(payload) = payload.filter(|p| !p.trim().is_empty()) else {
            debug!("no category taxonomy available yet");
            return Self::default();
        };

        match serde_json::from_str::<Vec<Category>>(payload) {
            Ok(categories) => Self::new(categories),
            Err(err) => {
                warn!(%err, "failed to decode category taxonomy");
                Self::default()
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn get(&self, id: &CategoryId) -> Option<&Category> {
        self.categories.iter().find(|c| &c.id == id)
    }

    /// Top-level categories, i.e. the skills a person can pick.
    pub fn skills(&self) -> impl Iterator<Item = &Category> {
        self.categories.iter().filter(|c| c.parent_id.is_none())
    }

    /// Children of `parent`, i.e. the expertise choices under one skill.
    pub fn expertise_of(&self, parent: &CategoryId) -> impl Iterator<Item = &Category> {
        let parent = parent.clone();
        self.categories
            .iter()
            .filter(move |c| c.parent_id.as_ref() == Some(&parent))
    }

    pub fn is_child_of(&self, child: &CategoryId, parent: &CategoryId) -> bool {
        self.get(child)
            .is_some_and(|c| c.parent_id.as_ref() == Some(parent))
    }
}

/// Session-wide taxonomy cache.
///
/// The tree is fetched on the first [`TaxonomyCache::load`] and every later
/// call returns the cached copy. Cloning the cache shares the underlying
/// storage, so all selectors observe the same load.
#[derive(Debug, Clone, Default)]
pub struct TaxonomyCache {
    inner: Arc<RwLock<Option<Taxonomy>>>,
}

impl TaxonomyCache {
    /// Return the cached taxonomy, fetching it from the platform on first use.
    ///
    /// Fetch failures degrade to an empty taxonomy; they are not retried
    /// within the session.
    pub async fn load(&self, api: &AnyPlatform) -> Taxonomy {
        if let Some(taxonomy) = self.inner.read().as_ref() {
            return taxonomy.clone();
        }

        let payload = match api.fetch_categories().await {
            Ok(payload) => payload,
            Err(err) => {
                warn!(%err, "category taxonomy fetch failed");
                None
            }
        };

        let taxonomy = Taxonomy::decode(payload.as_deref());
        *self.inner.write() = Some(taxonomy.clone());
        taxonomy
    }

    pub fn get(&self) -> Option<Taxonomy> {
        self.inner.read().clone()
    }
}
