//! Avatar staging for the profile edit session.
//!
//! A newly picked image is only a local preview until the platform has
//! persisted it. The draft tracks that lifecycle as an explicit state
//! machine; the `Confirming` state doubles as the guard that keeps a burst
//! of duplicate confirm events from issuing more than one persist call.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use thiserror::Error;
use tracing::warn;

/// Sentinel submitted in the save payload when no new avatar was confirmed
/// during the session.
pub const AVATAR_UNCHANGED: i64 = -1;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("an avatar already exists and no replacement was requested")]
    StageNotAllowed,
    #[error("no image has been staged for upload")]
    NothingStaged,
    #[error("an avatar upload is already in flight")]
    ConfirmInFlight,
}

/// A locally picked image, before the platform has seen it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StagedImage {
    /// The upload widget already rendered a thumbnail we can reuse.
    Thumbnail(String),
    /// Raw image bytes that still need an inline preview.
    Raw { media_type: String, bytes: Vec<u8> },
}

impl StagedImage {
    /// Resolve the staged image to something renderable and submittable:
    /// an existing thumbnail reference, or a base64 data URL derived from
    /// the raw bytes.
    pub fn preview_source(&self) -> String {
        match self {
            Self::Thumbnail(url) => url.clone(),
            Self::Raw { media_type, bytes } => {
                format!("data:{media_type};base64,{}", STANDARD.encode(bytes))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum State {
    /// No new avatar this session; `url` is the pre-existing one, if any.
    Unstaged { url: Option<String> },
    /// A preview is staged locally and can be confirmed or replaced.
    Previewing { preview: String },
    /// A persist call is outstanding. Further confirms are ignored.
    Confirming { preview: String },
    /// The platform persisted a new avatar this session.
    Confirmed { id: i64, url: String },
}

/// Avatar portion of a [`ProfileDraft`](crate::profile::ProfileDraft).
///
/// Exactly one of "no avatar / previewing / confirming / confirmed" holds at
/// any time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvatarDraft {
    state: State,
    replace_requested: bool,
}

impl Default for AvatarDraft {
    fn default() -> Self {
        Self {
            state: State::Unstaged { url: None },
            replace_requested: false,
        }
    }
}

impl AvatarDraft {
    /// Start from the avatar recorded on the source profile, if any.
    pub fn from_existing(url: &str) -> Self {
        let url = (!url.is_empty()).then(|| url.to_owned());
        Self {
            state: State::Unstaged { url },
            replace_requested: false,
        }
    }

    /// Explicitly initiate replacing an existing avatar. Without this, a
    /// profile that already has an avatar refuses new previews.
    pub fn request_replacement(&mut self) {
        self.replace_requested = true;
    }

    pub fn can_stage(&self) -> bool {
        match &self.state {
            State::Unstaged { url: None } | State::Previewing { .. } => true,
            State::Unstaged { url: Some(_) } | State::Confirmed { .. } => self.replace_requested,
            State::Confirming { .. } => false,
        }
    }

    /// Stage a locally picked image as the pending preview.
    pub fn stage(&mut self, preview: String) -> Result<()> {
        if !self.can_stage() {
            return Err(Error::StageNotAllowed);
        }

        self.state = State::Previewing { preview };
        Ok(())
    }

    /// Move the staged preview into the confirming state and hand back the
    /// payload for the persist call.
    ///
    /// While a persist call is outstanding this returns
    /// [`Error::ConfirmInFlight`], which is what collapses a burst of
    /// duplicate confirm events into a single remote invocation.
    pub fn begin_confirm(&mut self) -> Result<String> {
        match &self.state {
            State::Previewing { preview } => {
                let preview = preview.clone();
                self.state = State::Confirming {
                    preview: preview.clone(),
                };
                Ok(preview)
            }
            State::Confirming { .. } => Err(Error::ConfirmInFlight),
            State::Unstaged { .. } | State::Confirmed { .. } => Err(Error::NothingStaged),
        }
    }

    /// Record a successful persist call.
    pub fn confirm_succeeded(&mut self, id: i64, url: String) {
        if !matches!(self.state, State::Confirming { .. }) {
            warn!("avatar persist completion arrived outside of a confirm");
        }

        self.state = State::Confirmed { id, url };
        self.replace_requested = false;
    }

    /// Record a failed persist call; the preview is kept so the user can
    /// retry.
    pub fn confirm_failed(&mut self) {
        if let State::Confirming { preview } = &self.state {
            self.state = State::Previewing {
                preview: preview.clone(),
            };
        }
    }

    /// Id to submit with the profile update: the confirmed avatar, or
    /// [`AVATAR_UNCHANGED`] when nothing was confirmed this session.
    pub fn confirmed_id(&self) -> Option<i64> {
        match &self.state {
            State::Confirmed { id, .. } => Some(*id),
            _ => None,
        }
    }

    /// URL of the persisted avatar, pre-existing or newly confirmed.
    pub fn url(&self) -> Option<&str> {
        match &self.state {
            State::Unstaged { url } => url.as_deref(),
            State::Confirmed { url, .. } => Some(url),
            State::Previewing { .. } | State::Confirming { .. } => None,
        }
    }

    /// The staged preview source, while one is pending.
    pub fn staged_preview(&self) -> Option<&str> {
        match &self.state {
            State::Previewing { preview } | State::Confirming { preview } => Some(preview),
            _ => None,
        }
    }

    pub fn is_confirming(&self) -> bool {
        matches!(self.state, State::Confirming { .. })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::services::{MockPlatform, Platform};

    #[test]
    fn test_stage_without_existing_avatar() {
        let mut avatar = AvatarDraft::default();

        avatar.stage("data:image/png;base64,AAAA".into()).unwrap();

        assert_eq!(avatar.staged_preview(), Some("data:image/png;base64,AAAA"));
    }

    #[test]
    fn test_stage_requires_replacement_request() {
        let mut avatar = AvatarDraft::from_existing("/media/avatars/7.png");

        assert_eq!(avatar.stage("thumb".into()), Err(Error::StageNotAllowed));

        avatar.request_replacement();
        avatar.stage("thumb".into()).unwrap();

        assert_eq!(avatar.staged_preview(), Some("thumb"));
    }

    #[test]
    fn test_confirm_without_preview() {
        let mut avatar = AvatarDraft::default();

        assert_eq!(avatar.begin_confirm(), Err(Error::NothingStaged));
    }

    #[test]
    fn test_confirm_failure_allows_retry() {
        let mut avatar = AvatarDraft::default();
        avatar.stage("thumb".into()).unwrap();

        avatar.begin_confirm().unwrap();
        avatar.confirm_failed();

        assert_eq!(avatar.staged_preview(), Some("thumb"));
        assert_eq!(avatar.confirmed_id(), None);
        assert!(avatar.begin_confirm().is_ok());
    }

    #[test]
    fn test_confirm_success() {
        let mut avatar = AvatarDraft::from_existing("/media/avatars/7.png");
        avatar.request_replacement();
        avatar.stage("thumb".into()).unwrap();

        avatar.begin_confirm().unwrap();
        avatar.confirm_succeeded(42, "/media/avatars/42.png".into());

        assert_eq!(avatar.confirmed_id(), Some(42));
        assert_eq!(avatar.url(), Some("/media/avatars/42.png"));
        // The next replacement has to be requested again.
        assert!(!avatar.can_stage());
    }

    #[tokio::test]
    async fn test_duplicate_confirm_persists_once() {
        let api = MockPlatform::default();
        let mut avatar = AvatarDraft::default();
        avatar.stage("thumb".into()).unwrap();

        // Two confirm events from the same burst: the second arrives while
        // the first persist call is still outstanding.
        for _ in 0..2 {
            if let Ok(preview) = avatar.begin_confirm() {
                api.save_avatar(&preview).await.unwrap();
            }
        }

        assert_eq!(api.persist_calls(), 1);
    }

    #[test]
    fn test_preview_source_prefers_thumbnail() {
        let staged = StagedImage::Thumbnail("blob:thumb".into());

        assert_eq!(staged.preview_source(), "blob:thumb");
    }

    #[test]
    fn test_preview_source_encodes_raw_bytes() {
        let staged = StagedImage::Raw {
            media_type: "image/png".into(),
            bytes: vec![1, 2, 3],
        };

        assert_eq!(staged.preview_source(), "data:image/png;base64,AQID");
    }
}
