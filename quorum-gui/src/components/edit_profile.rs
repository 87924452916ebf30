//! The profile edit screen.
//!
//! All state lives in the [`ProfileDraft`]; this component translates user
//! events into draft operations and remote calls, and turns their outcomes
//! back into state changes. A failed save of any kind leaves the draft
//! intact so the user can correct and retry.

use iced::{
    Element, Length, Task,
    widget::{Column, button, column, container, pick_list, row, rule, scrollable, space, text,
        text_input},
};
use quorum_lib::{
    profile::{PersonProfile, ProfileDraft, ProfileUpdate, StagedImage},
    services::{AnyPlatform, AvatarReply, Platform, UpdateReply},
    taxonomy::{Category, Taxonomy, TaxonomyCache},
};
use rfd::AsyncFileDialog;
use tracing::{debug, warn};

use crate::config::Cfg;

#[derive(Debug, Clone)]
pub enum Message {
    TaxonomyLoaded(Taxonomy),
    FirstNameInput(String),
    LastNameInput(String),
    BioInput(String),
    CategorySelected(Category),
    ExpertiseSelected(usize, Category),
    AddWebsitePressed,
    WebsiteUrlInput(usize, String),
    WebsiteTypeSelected(usize, String),
    ReplaceAvatarPressed,
    PickAvatarPressed,
    AvatarPicked(Option<StagedImage>),
    UploadAvatarPressed,
    AvatarSaved(Result<AvatarReply, String>),
    SavePressed,
    Saved(Result<UpdateReply, String>),
    CancelPressed,
}

/// Action used for communicating with the parent component
pub enum Action {
    None,
    Run(Task<Message>),
    /// The session is over; the host should navigate back.
    Close,
}

pub struct EditProfile {
    api: AnyPlatform,
    cfg: Cfg,
    taxonomy_cache: TaxonomyCache,
    taxonomy: Taxonomy,
    draft: ProfileDraft,
    error: Option<String>,
}

impl EditProfile {
    pub fn new(
        api: AnyPlatform,
        cfg: Cfg,
        taxonomy_cache: TaxonomyCache,
        profile: &PersonProfile,
    ) -> (Self, Task<Message>) {
        let task = load_taxonomy(api.clone(), taxonomy_cache.clone());

        (
            Self {
                api,
                cfg,
                taxonomy_cache,
                taxonomy: Taxonomy::default(),
                draft: ProfileDraft::from_profile(profile),
                error: None,
            },
            task,
        )
    }

    /// Load a new [`PersonProfile`] for editing, replacing the whole draft.
    pub fn load(&mut self, profile: &PersonProfile) {
        self.draft = ProfileDraft::from_profile(profile);
        self.error = None;
    }

    pub fn refresh(&self) -> Task<Message> {
        load_taxonomy(self.api.clone(), self.taxonomy_cache.clone())
    }

    pub fn update(&mut self, message: Message) -> Action {
        match message {
            Message::TaxonomyLoaded(taxonomy) => {
                self.taxonomy = taxonomy;
                Action::None
            }
            Message::FirstNameInput(content) => {
                self.draft.first_name = content;
                Action::None
            }
            Message::LastNameInput(content) => {
                self.draft.last_name = content;
                Action::None
            }
            Message::BioInput(content) => {
                self.draft.bio = content;
                Action::None
            }
            Message::CategorySelected(category) => {
                if let Err(e) = self.draft.choose_category(&self.taxonomy, category.id) {
                    warn!(%e, "skill selection rejected");
                }
                Action::None
            }
            Message::ExpertiseSelected(row, category) => {
                if let Err(e) = self.draft.choose_expertise(&self.taxonomy, row, category.id) {
                    warn!(%e, "expertise selection rejected");
                }
                Action::None
            }
            Message::AddWebsitePressed => {
                self.draft.add_website();
                Action::None
            }
            Message::WebsiteUrlInput(row, url) => {
                if let Err(e) = self.draft.set_website_url(row, url) {
                    warn!(%e, "website edit rejected");
                }
                Action::None
            }
            Message::WebsiteTypeSelected(row, label) => {
                if let Err(e) = self.draft.set_website_kind(row, &label) {
                    warn!(%e, "website type edit rejected");
                }
                Action::None
            }
            Message::ReplaceAvatarPressed => {
                self.draft.avatar_mut().request_replacement();
                Action::None
            }
            Message::PickAvatarPressed => Action::Run(pick_avatar()),
            Message::AvatarPicked(Some(image)) => {
                if let Err(e) = self.draft.avatar_mut().stage(image.preview_source()) {
                    warn!(%e, "staging rejected");
                }
                Action::None
            }
            // Dialog dismissed without a pick
            Message::AvatarPicked(None) => Action::None,
            Message::UploadAvatarPressed => match self.draft.avatar_mut().begin_confirm() {
                Ok(preview) => Action::Run(save_avatar(self.api.clone(), preview)),
                Err(e) => {
                    debug!(%e, "upload press ignored");
                    Action::None
                }
            },
            Message::AvatarSaved(Ok(reply)) => {
                if reply.status {
                    self.draft
                        .avatar_mut()
                        .confirm_succeeded(reply.avatar_id, reply.avatar_url);
                    self.error = None;
                } else {
                    self.draft.avatar_mut().confirm_failed();
                    self.error = Some(reply.message);
                }
                Action::None
            }
            Message::AvatarSaved(Err(message)) => {
                self.draft.avatar_mut().confirm_failed();
                self.error = Some(message);
                Action::None
            }
            Message::SavePressed => Action::Run(update_profile(
                self.api.clone(),
                self.draft.commit_payload(),
            )),
            Message::Saved(Ok(reply)) => {
                if reply.status {
                    Action::Close
                } else {
                    self.error = Some(reply.message);
                    Action::None
                }
            }
            Message::Saved(Err(message)) => {
                self.error = Some(message);
                Action::None
            }
            Message::CancelPressed => Action::Close,
        }
    }

    pub fn view(&self) -> Element<'_, Message> {
        let names = row![
            text_input("First name", &self.draft.first_name).on_input(Message::FirstNameInput),
            text_input("Last name", &self.draft.last_name).on_input(Message::LastNameInput),
        ]
        .spacing(8);

        let bio = text_input("Tell people about yourself", &self.draft.bio)
            .on_input(Message::BioInput);

        let mut content = column![
            names,
            bio,
            rule::horizontal(1),
            text("Skills"),
            self.skill_rows(),
            rule::horizontal(1),
            text("Websites"),
            self.website_rows(),
            button("Add website").on_press(Message::AddWebsitePressed),
            rule::horizontal(1),
            text("Avatar"),
            self.avatar_row(),
        ]
        .spacing(12);

        if let Some(error) = &self.error {
            content = content.push(text(error));
        }

        content = content.push(row![
            space::horizontal(),
            button("Cancel").on_press(Message::CancelPressed),
            button("Save").on_press(Message::SavePressed),
        ]
        .spacing(8));

        container(scrollable(content))
            .padding(20)
            .width(Length::FillPortion(3))
            .into()
    }

    fn skill_rows(&self) -> Element<'_, Message> {
        let mut rows = Column::new().spacing(8);

        for (i, skill) in self.draft.skills().iter().enumerate() {
            let name = self
                .taxonomy
                .get(&skill.category)
                .map_or_else(|| skill.category.to_string(), |c| c.name.clone());
            let candidates: Vec<Category> = self
                .draft
                .expertise_candidates(&self.taxonomy, i)
                .into_iter()
                .cloned()
                .collect();
            let selected = skill
                .expertise
                .as_ref()
                .and_then(|id| self.taxonomy.get(id))
                .cloned();

            rows = rows.push(row![
                text(name).width(Length::FillPortion(1)),
                pick_list(candidates, selected, move |category| {
                    Message::ExpertiseSelected(i, category)
                })
                .placeholder("Expertise")
                .width(Length::FillPortion(1)),
            ]
            .spacing(8));
        }

        let remaining: Vec<Category> = self
            .draft
            .category_candidates(&self.taxonomy)
            .into_iter()
            .cloned()
            .collect();
        if !remaining.is_empty() {
            rows = rows.push(
                pick_list(remaining, None::<Category>, Message::CategorySelected)
                    .placeholder("Add a skill"),
            );
        }

        rows.into()
    }

    fn website_rows(&self) -> Element<'_, Message> {
        let labels = self.draft.website_types().clone();

        Column::with_children(self.draft.websites().iter().enumerate().map(|(i, entry)| {
            let selected = labels.get(entry.kind).cloned();

            row![
                text_input("example.com", &entry.website)
                    .on_input(move |url| Message::WebsiteUrlInput(i, url)),
                pick_list(labels.clone(), selected, move |label| {
                    Message::WebsiteTypeSelected(i, label)
                }),
            ]
            .spacing(8)
            .into()
        }))
        .spacing(8)
        .into()
    }

    fn avatar_row(&self) -> Element<'_, Message> {
        let avatar = self.draft.avatar();

        let status = if avatar.is_confirming() {
            text("Uploading...")
        } else if avatar.staged_preview().is_some() {
            text("New image ready to upload")
        } else if let Some(url) = avatar.url() {
            text(format!("{}{url}", self.cfg.read().api_domain))
        } else {
            text("No avatar")
        };

        let mut buttons = row![].spacing(8);
        if avatar.staged_preview().is_some() {
            buttons = buttons.push(
                button("Upload").on_press_maybe(
                    (!avatar.is_confirming()).then_some(Message::UploadAvatarPressed),
                ),
            );
        }
        if avatar.can_stage() {
            buttons = buttons.push(button("Choose image...").on_press(Message::PickAvatarPressed));
        } else if !avatar.is_confirming() {
            buttons = buttons.push(button("Replace avatar").on_press(Message::ReplaceAvatarPressed));
        }

        row![status, space::horizontal(), buttons].spacing(8).into()
    }
}

fn load_taxonomy(api: AnyPlatform, cache: TaxonomyCache) -> Task<Message> {
    Task::perform(
        async move { cache.load(&api).await },
        Message::TaxonomyLoaded,
    )
}

fn pick_avatar() -> Task<Message> {
    Task::perform(
        async {
            let file = AsyncFileDialog::new()
                .add_filter("Images", &["png", "jpg", "jpeg", "gif", "webp"])
                .pick_file()
                .await?;

            let media_type = match file.path().extension().and_then(|ext| ext.to_str()) {
                Some("png") => "image/png",
                Some("jpg" | "jpeg") => "image/jpeg",
                Some("gif") => "image/gif",
                Some("webp") => "image/webp",
                _ => "application/octet-stream",
            };

            Some(StagedImage::Raw {
                media_type: media_type.into(),
                bytes: file.read().await,
            })
        },
        Message::AvatarPicked,
    )
}

fn save_avatar(api: AnyPlatform, preview: String) -> Task<Message> {
    Task::perform(
        async move { api.save_avatar(&preview).await.map_err(|err| err.to_string()) },
        Message::AvatarSaved,
    )
}

fn update_profile(api: AnyPlatform, payload: ProfileUpdate) -> Task<Message> {
    Task::perform(
        async move {
            api.update_profile(&payload)
                .await
                .map_err(|err| err.to_string())
        },
        Message::Saved,
    )
}
