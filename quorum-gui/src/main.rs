use std::sync::Arc;

use iced::{
    Element,
    Length::{self, Fill},
    Task, Theme, application,
    widget::{button, column, container, row, space, text},
};
use parking_lot::RwLock;
use quorum_lib::{
    product::ProductSection,
    profile::PersonProfile,
    services::{AnyPlatform, HttpPlatform},
    taxonomy::TaxonomyCache,
};
use tracing::Level;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::{
    components::{
        edit_profile::{self, EditProfile},
        left_panel::{self, LeftPanel},
    },
    config::{Cfg, GuiConfig},
};

pub mod components;
pub mod config;

fn main() -> iced::Result {
    application(App::new, App::update, App::view)
        .theme(App::theme)
        .title(App::title)
        .run()
}

#[derive(Debug, Clone)]
enum Message {
    EditProfilePressed,
    // Components
    LeftPanel(left_panel::Message),
    EditProfile(edit_profile::Message),
}

struct App {
    title: String,
    theme: Theme,
    cfg: Cfg,
    api: AnyPlatform,
    taxonomy_cache: TaxonomyCache,
    profile: PersonProfile,
    section: ProductSection,
    // Components
    left_panel: LeftPanel,
    editor: Option<EditProfile>,
}

impl App {
    pub fn new() -> (Self, Task<Message>) {
        // Human friendly panicking in release mode
        human_panic::setup_panic!();

        // Logging
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::TRACE)
            .with_env_filter(EnvFilter::from_default_env())
            .finish();
        tracing::subscriber::set_global_default(subscriber)
            .expect("setting default subscriber failed");

        let cfg = Arc::new(RwLock::new(GuiConfig::load()));
        let theme = cfg.read().theme();
        let api = AnyPlatform::Http(HttpPlatform::new(cfg.read().api_domain.clone()));

        // Placeholder person until sign-in provides the session's profile
        let profile = PersonProfile {
            first_name: "Ada Lovelace".into(),
            bio: "Working on the Analytical Engine.".into(),
            website_types: vec!["Website".into(), "Portfolio".into(), "GitHub".into()],
            ..PersonProfile::default()
        };

        let (left_panel, left_panel_task) =
            LeftPanel::new(api.clone(), "quorum", "/products/quorum");

        (
            Self {
                title: "Quorum".into(),
                theme,
                cfg,
                api,
                taxonomy_cache: TaxonomyCache::default(),
                profile,
                section: ProductSection::default(),
                left_panel,
                editor: None,
            },
            left_panel_task.map(Message::LeftPanel),
        )
    }

    // Update application state based on messages passed by view()
    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            // Redirect messages to relevant child components
            Message::LeftPanel(msg) => match self.left_panel.update(msg) {
                left_panel::Action::None => Task::none(),
                left_panel::Action::Navigate(section) => {
                    self.section = section;
                    self.editor = None;
                    Task::none()
                }
            },
            Message::EditProfile(msg) => {
                let Some(editor) = &mut self.editor else {
                    return Task::none();
                };

                match editor.update(msg) {
                    edit_profile::Action::None => Task::none(),
                    edit_profile::Action::Run(task) => task.map(Message::EditProfile),
                    edit_profile::Action::Close => {
                        self.editor = None;
                        Task::none()
                    }
                }
            }
            Message::EditProfilePressed => {
                let (editor, task) = EditProfile::new(
                    self.api.clone(),
                    self.cfg.clone(),
                    self.taxonomy_cache.clone(),
                    &self.profile,
                );
                self.editor = Some(editor);
                task.map(Message::EditProfile)
            }
        }
    }

    // Render the application and pass along messages from components to update()
    pub fn view(&self) -> Element<'_, Message> {
        let content: Element<'_, Message> = match &self.editor {
            Some(editor) => editor.view().map(Message::EditProfile),
            None => container(
                column![
                    row![
                        text(self.section.to_string()),
                        space::horizontal(),
                        button("Edit profile").on_press(Message::EditProfilePressed),
                    ],
                    text("Nothing here yet."),
                ]
                .spacing(12),
            )
            .padding(20)
            .width(Length::FillPortion(3))
            .into(),
        };

        row![self.left_panel.view().map(Message::LeftPanel), content]
            .height(Fill)
            .into()
    }

    pub fn title(&self) -> String {
        self.title.clone()
    }

    pub fn theme(&self) -> Theme {
        self.theme.clone()
    }
}
