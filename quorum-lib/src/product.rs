//! Product header data and the fixed section menu of the navigation panel.

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

/// Header data shown at the top of the product panel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductInfo {
    pub name: String,
    pub website: String,
}

/// The fixed set of product sections the panel links to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, strum::Display, strum::EnumIter)]
pub enum ProductSection {
    #[default]
    Summary,
    Initiatives,
    Tasks,
    Capabilities,
    People,
    #[strum(serialize = "Commercial Partners")]
    Partners,
}

impl ProductSection {
    /// Path fragment under the product route.
    pub fn path(self) -> &'static str {
        match self {
            Self::Summary => "/",
            Self::Initiatives => "/initiatives",
            Self::Tasks => "/tasks",
            Self::Capabilities => "/capabilities",
            Self::People => "/people",
            Self::Partners => "/partners",
        }
    }

    fn token(self) -> &'static str {
        match self {
            Self::Summary => "summary",
            Self::Initiatives => "initiatives",
            Self::Tasks => "tasks",
            Self::Capabilities => "capabilities",
            Self::People => "people",
            Self::Partners => "partners",
        }
    }

    /// Derive the selected section from the current route path. Unknown
    /// paths select the first section.
    pub fn from_path(path: &str) -> Self {
        Self::iter()
            .find(|section| path.contains(section.token()))
            .unwrap_or_default()
    }
}

/// Initials used for the product's placeholder avatar, taken from the first
/// two words of its name.
pub fn initials(name: &str) -> String {
    name.split_whitespace()
        .take(2)
        .filter_map(|word| word.chars().next())
        .flat_map(char::to_uppercase)
        .collect()
}
