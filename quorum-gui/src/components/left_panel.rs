use iced::{
    Element, Length, Task,
    widget::{Column, button, column, container, row, rule, text},
};
use quorum_lib::{
    product::{ProductInfo, ProductSection, initials},
    services::{AnyPlatform, Platform},
};
use strum::IntoEnumIterator;

#[derive(Debug, Clone)]
pub enum Message {
    Loaded(Result<ProductInfo, String>),
    SectionPressed(ProductSection),
}

/// Action used for communicating with the parent component
pub enum Action {
    None,
    Navigate(ProductSection),
}

#[derive(Debug, Clone)]
pub enum State {
    Loading,
    Error(String),
    Loaded { product: ProductInfo },
}

pub struct LeftPanel {
    api: AnyPlatform,
    slug: String,
    state: State,
    selected: ProductSection,
}

impl LeftPanel {
    pub fn new(api: AnyPlatform, slug: &str, current_path: &str) -> (Self, Task<Message>) {
        (
            Self {
                api: api.clone(),
                slug: slug.to_owned(),
                state: State::Loading,
                selected: ProductSection::from_path(current_path),
            },
            load_product(api, slug.to_owned()),
        )
    }

    pub fn refresh(&self) -> Task<Message> {
        load_product(self.api.clone(), self.slug.clone())
    }

    pub fn selected(&self) -> ProductSection {
        self.selected
    }

    pub fn update(&mut self, message: Message) -> Action {
        match message {
            Message::Loaded(Ok(product)) => {
                self.state = State::Loaded { product };
                Action::None
            }
            Message::Loaded(Err(e)) => {
                self.state = State::Error(e);
                Action::None
            }
            Message::SectionPressed(section) => {
                self.selected = section;
                Action::Navigate(section)
            }
        }
    }

    pub fn view(&self) -> Element<'_, Message> {
        match &self.state {
            State::Loading => text("Loading...").into(),
            State::Error(e) => text(e).into(),
            State::Loaded { product } => {
                let header = row![
                    container(text(initials(&product.name))).padding(12),
                    column![
                        text(product.name.clone()),
                        text(product.website.clone()),
                    ],
                ];

                let menu = Column::with_children(
                    ProductSection::iter().map(|section| section_row(section, self.selected)),
                );

                container(column![header, rule::horizontal(1), menu])
                    .padding(12)
                    .width(Length::FillPortion(1))
                    .into()
            }
        }
    }
}

fn section_row<'a>(section: ProductSection, selected: ProductSection) -> Element<'a, Message> {
    let style = if section == selected {
        button::primary
    } else {
        button::subtle
    };

    button(text(section.to_string()))
        .width(Length::Fill)
        .style(style)
        .on_press(Message::SectionPressed(section))
        .into()
}

fn load_product(api: AnyPlatform, slug: String) -> Task<Message> {
    Task::perform(
        async move { api.fetch_product(&slug).await.map_err(|err| err.to_string()) },
        Message::Loaded,
    )
}

#[cfg(test)]
mod test {
    use super::*;
    use quorum_lib::services::MockPlatform;

    fn panel() -> LeftPanel {
        let api = AnyPlatform::Mock(MockPlatform::default());
        LeftPanel::new(api, "acme", "/products/acme/tasks").0
    }

    #[test]
    fn test_selected_section_follows_path() {
        assert_eq!(panel().selected(), ProductSection::Tasks);
    }

    #[test]
    fn test_loaded_product_replaces_spinner() {
        let mut panel = panel();

        panel.update(Message::Loaded(Ok(ProductInfo {
            name: "Acme".into(),
            website: "https://acme.example".into(),
        })));

        assert!(matches!(panel.state, State::Loaded { .. }));
    }

    #[test]
    fn test_section_press_navigates() {
        let mut panel = panel();

        let action = panel.update(Message::SectionPressed(ProductSection::People));

        assert!(matches!(action, Action::Navigate(ProductSection::People)));
        assert_eq!(panel.selected(), ProductSection::People);
    }
}
