//! Domain layer of the Quorum collaboration client.
//!
//! This crate owns the state and logic behind the profile edit screen and
//! the product navigation panel: the category taxonomy, the profile draft
//! with its skill/expertise cascade, the avatar staging state machine, and
//! the contracts of the remote operations they talk to. Rendering lives in
//! `quorum-gui`.

pub mod fs;
pub mod product;
pub mod profile;
pub mod services;
pub mod taxonomy;

pub use product::{ProductInfo, ProductSection};
pub use profile::{AvatarDraft, PersonProfile, ProfileDraft, ProfileUpdate, Skill, StagedImage, Website};
pub use services::{AnyPlatform, HttpPlatform, Platform};
pub use taxonomy::{Category, CategoryId, Taxonomy, TaxonomyCache};
