use super::messages::Message;
use super::state::App;
use iced::alignment::{Horizontal, Vertical};
use iced::font::Weight;
use iced::widget::image::Handle;
use iced::widget::text::{Rich, Span, Wrapping};
use iced::widget::{
    Column, Row, button, center, column, container, horizontal_space, image, mouse_area, opaque,
    row, scrollable, stack, text,
};
use iced::{Background, Color, Element, Font, Length, Padding};
use storybook_core::view::{
    ChoiceView, ImageOverlay, PracticeModal, StoryCard, StoryView, TextSpan,
};
use storybook_core::view::story_cards;
use storybook_core::{PageView, StoryId, page_view};

const PICTURE_HEIGHT: f32 = 360.0;
const OVERLAY_SIZE: f32 = 96.0;
const CHOICE_IMAGE_SIZE: f32 = 120.0;

impl App {
    pub fn view(&self) -> Element<'_, Message> {
        match page_view(&self.controller) {
            PageView::NoStory { requested, stories } => self.placeholder(requested, stories),
            PageView::Story(story) => self.story_page(story),
        }
    }

    fn placeholder(
        &self,
        requested: Option<StoryId>,
        stories: Vec<StoryCard>,
    ) -> Element<'_, Message> {
        let heading = match requested {
            Some(id) => format!("There is no story number {id}. Pick one below."),
            None => "Pick a story".to_string(),
        };
        let content = column![
            text(heading).size(self.config.font_size as f32),
            self.story_picker(stories, None),
        ]
        .spacing(24)
        .padding(32)
        .align_x(Horizontal::Center);
        center(content).into()
    }

    fn story_page(&self, story: StoryView) -> Element<'_, Message> {
        let status = if let Some(error) = &story.error {
            error.clone()
        } else if story.finished {
            "The end!".to_string()
        } else if story.narrating {
            "Listening...".to_string()
        } else {
            String::new()
        };

        let header = row![
            text(story.title.clone()).size(self.config.font_size as f32 * 1.3),
            horizontal_space(),
            text(status),
            button("Play").on_press(Message::PlayRequested),
        ]
        .spacing(12)
        .align_y(Vertical::Center)
        .width(Length::Fill);

        let story_text = container(self.story_text(&story.spans))
            .width(Length::Fill)
            .padding([12, 24]);

        let mut content: Column<'_, Message> = column![
            header,
            self.picture(&story),
            scrollable(story_text).height(Length::Fill),
        ]
        .padding(16)
        .spacing(12)
        .height(Length::Fill);

        if story.finished {
            let others = story_cards(&self.controller);
            content = content.push(self.story_picker(others, Some(story.id)));
        }

        match story.modal {
            Some(modal) => stack![content, self.practice_modal(modal)].into(),
            None => content.into(),
        }
    }

    fn picture(&self, story: &StoryView) -> Element<'_, Message> {
        let cover = image(Handle::from_path(self.image_path(&story.img)))
            .width(Length::Fill)
            .height(Length::Fixed(PICTURE_HEIGHT));

        let mut layers: Vec<Element<'_, Message>> = vec![cover.into()];
        layers.extend(story.overlays.iter().map(|overlay| self.overlay(overlay)));
        iced::widget::Stack::with_children(layers)
            .width(Length::Fill)
            .height(Length::Fixed(PICTURE_HEIGHT))
            .into()
    }

    fn overlay(&self, overlay: &ImageOverlay) -> Element<'_, Message> {
        let picture = image(Handle::from_path(self.image_path(&overlay.img)))
            .width(Length::Fixed(OVERLAY_SIZE))
            .height(Length::Fixed(OVERLAY_SIZE));
        container(picture)
            .padding(Padding {
                top: overlay.top,
                right: 0.0,
                bottom: 0.0,
                left: overlay.left,
            })
            .into()
    }

    fn story_text(&self, spans: &[TextSpan]) -> Element<'_, Message> {
        let size = self.config.font_size as f32;
        let highlight = self.highlight_color();
        let slot_color = if self.is_night() {
            Color::from_rgb(0.55, 0.75, 1.0)
        } else {
            Color::from_rgb(0.1, 0.3, 0.75)
        };
        let bold = Font {
            weight: Weight::Bold,
            ..Font::DEFAULT
        };

        let spans: Vec<Span<'_, Message>> = spans
            .iter()
            .flat_map(|span| {
                let styled: Span<'_, Message> = match span {
                    TextSpan::Text(body) => Span::new(body.clone()).size(size),
                    TextSpan::TimedWord { text, highlighted } => {
                        let word = Span::new(text.clone()).size(size);
                        if *highlighted {
                            word.background(Background::Color(highlight))
                                .padding(Padding::from(2u16))
                        } else {
                            word
                        }
                    }
                    TextSpan::Slot {
                        section,
                        label,
                        filled,
                        clickable,
                    } => {
                        let slot = Span::new(label.clone()).size(size).font(bold);
                        let slot = if *filled { slot.color(slot_color) } else { slot };
                        if *clickable {
                            slot.link(Message::SlotClicked(*section))
                        } else {
                            slot
                        }
                    }
                };
                [styled, Span::new(" ").size(size)]
            })
            .collect();

        let rich: Rich<'_, Message> = Rich::with_spans(spans);
        rich.width(Length::Fill)
            .wrapping(Wrapping::Word)
            .align_x(Horizontal::Left)
            .into()
    }

    fn practice_modal(&self, modal: PracticeModal) -> Element<'_, Message> {
        let choices: Row<'_, Message> = Row::with_children(
            modal
                .choices
                .iter()
                .map(|choice| self.choice_button(choice, modal.selected == Some(choice.id))),
        )
        .spacing(16);

        let confirm = if modal.can_confirm() {
            button("That's it!")
                .style(button::success)
                .on_press(Message::WordConfirmed)
        } else {
            button("That's it!").style(button::success)
        };
        let actions = row![
            button("Close")
                .style(button::secondary)
                .on_press(Message::ModalDismissed),
            horizontal_space(),
            confirm,
        ]
        .width(Length::Fill);

        let card = container(
            column![
                text("Which word fits?").size(self.config.font_size as f32),
                choices,
                actions,
            ]
            .spacing(20)
            .align_x(Horizontal::Center),
        )
        .padding(24)
        .max_width(720.0)
        .style(container::rounded_box);

        let backdrop = container(center(opaque(card)))
            .width(Length::Fill)
            .height(Length::Fill)
            .style(|_theme| container::Style {
                background: Some(Background::Color(Color {
                    a: 0.6,
                    ..Color::BLACK
                })),
                ..container::Style::default()
            });

        opaque(mouse_area(backdrop).on_press(Message::ModalDismissed))
    }

    fn choice_button(&self, choice: &ChoiceView, selected: bool) -> Element<'_, Message> {
        let mut body: Column<'_, Message> = Column::new().spacing(8).align_x(Horizontal::Center);
        if let Some(img) = &choice.img {
            body = body.push(
                image(Handle::from_path(self.image_path(img)))
                    .width(Length::Fixed(CHOICE_IMAGE_SIZE))
                    .height(Length::Fixed(CHOICE_IMAGE_SIZE)),
            );
        }
        let label = if choice.complete {
            format!("{} *", choice.text)
        } else {
            choice.text.clone()
        };
        body = body.push(text(label).size(self.config.font_size as f32));

        button(body)
            .style(if selected {
                button::primary
            } else {
                button::secondary
            })
            .on_press(Message::QuizWordPicked(choice.id))
            .into()
    }

    fn story_picker(
        &self,
        stories: Vec<StoryCard>,
        current: Option<StoryId>,
    ) -> Element<'_, Message> {
        let buttons = stories
            .into_iter()
            .filter(|card| Some(card.id) != current)
            .map(|card| {
                let label = if card.complete {
                    format!("{} (read)", card.title)
                } else {
                    card.title
                };
                button(text(label))
                    .on_press(Message::StoryPicked(card.id))
                    .into()
            });
        Row::with_children(buttons).spacing(12).into()
    }
}
