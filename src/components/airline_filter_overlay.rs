use crossterm::event::KeyCode;
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};
use tui_dispatch::EventKind;
use tui_dispatch_components::{
    BaseStyle, Modal, ModalBehavior, ModalProps, ModalStyle, Padding, ScrollbarStyle, SelectList,
    SelectListBehavior, SelectListProps, SelectListStyle, SelectionStyle, centered_rect,
};

use super::Component;
use crate::action::Action;
use crate::airline_filter::AirlineFilter;

pub struct AirlineFilterOverlayProps<'a> {
    pub filter: &'a AirlineFilter,
    pub cursor: usize,
    pub is_focused: bool,
}

/// Checkbox list over the airlines of the current results
pub struct AirlineFilterOverlay {
    list: SelectList,
    modal: Modal,
    was_open: bool,
}

impl Default for AirlineFilterOverlay {
    fn default() -> Self {
        Self {
            list: SelectList::new(),
            modal: Modal::new(),
            was_open: false,
        }
    }
}

impl AirlineFilterOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_open(&mut self, is_open: bool) {
        if is_open && !self.was_open {
            self.list = SelectList::new();
        }
        self.was_open = is_open;
    }

    fn items(filter: &AirlineFilter) -> Vec<Line<'static>> {
        filter
            .options
            .iter()
            .map(|option| {
                let checked = filter.is_selected(&option.code);
                let (mark, mark_style) = if checked {
                    ("[x] ", Style::default().fg(Color::Green))
                } else {
                    ("[ ] ", Style::default().fg(Color::DarkGray))
                };
                Line::from(vec![
                    Span::styled(mark, mark_style),
                    Span::raw(option.name.clone()),
                    Span::styled(
                        format!(" ({})", option.code),
                        Style::default().fg(Color::DarkGray),
                    ),
                ])
            })
            .collect()
    }

    fn list_style() -> SelectListStyle {
        SelectListStyle {
            base: BaseStyle {
                border: None,
                padding: Padding::xy(1, 0),
                bg: None,
                fg: None,
            },
            selection: SelectionStyle::default(),
            scrollbar: ScrollbarStyle::default(),
        }
    }
}

impl Component<Action> for AirlineFilterOverlay {
    type Props<'a> = AirlineFilterOverlayProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused {
            return Vec::new();
        }
        let EventKind::Key(key) = event else {
            return Vec::new();
        };

        match key.code {
            KeyCode::Esc | KeyCode::Char('f') | KeyCode::Char('q') => vec![Action::FilterClose],
            KeyCode::Char(' ') | KeyCode::Enter => vec![Action::FilterToggle],
            KeyCode::Char('a') => vec![Action::FilterSelectAll],
            KeyCode::Char('n') => vec![Action::FilterDeselectAll],
            _ => {
                let items = Self::items(props.filter);
                let list_props = SelectListProps {
                    items: &items,
                    count: items.len(),
                    selected: props.cursor,
                    is_focused: true,
                    style: Self::list_style(),
                    behavior: SelectListBehavior::default(),
                    on_select: Action::FilterCursor,
                    render_item: &|item| item.clone(),
                };
                self.list
                    .handle_event(event, list_props)
                    .into_iter()
                    .collect()
            }
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        if area.width < 20 || area.height < 8 {
            return;
        }

        let AirlineFilterOverlay { list, modal, .. } = self;
        let rows = props.filter.options.len() as u16 + 5;
        let modal_area = centered_rect(60, rows.min(area.height.saturating_sub(2)), area);
        let mut render_content = |frame: &mut Frame, content_area: Rect| {
            let chunks = Layout::vertical([
                Constraint::Length(2), // Title and summary
                Constraint::Min(1),    // Airlines
                Constraint::Length(1), // Keys
            ])
            .split(content_area);

            let header = Line::from(vec![
                Span::styled(
                    " Airlines ",
                    Style::default()
                        .fg(Color::Rgb(100, 180, 255))
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    props.filter.summary(),
                    Style::default().fg(Color::Gray),
                ),
            ]);
            frame.render_widget(Paragraph::new(header), chunks[0]);

            let items = Self::items(props.filter);
            let list_props = SelectListProps {
                items: &items,
                count: items.len(),
                selected: props.cursor,
                is_focused: props.is_focused,
                style: Self::list_style(),
                behavior: SelectListBehavior::default(),
                on_select: Action::FilterCursor,
                render_item: &|item| item.clone(),
            };
            list.render(frame, chunks[1], list_props);

            let keys = Line::from(Span::styled(
                " space toggle · a all · n none · esc close",
                Style::default().fg(Color::DarkGray),
            ));
            frame.render_widget(Paragraph::new(keys), chunks[2]);
        };

        modal.render(
            frame,
            area,
            ModalProps {
                is_open: true,
                is_focused: props.is_focused,
                area: modal_area,
                style: ModalStyle {
                    base: BaseStyle {
                        bg: Some(Color::Rgb(35, 35, 45)),
                        padding: Padding::all(1),
                        border: None,
                        fg: None,
                    },
                    ..Default::default()
                },
                behavior: ModalBehavior::default(),
                on_close: || Action::FilterClose,
                render_content: &mut render_content,
            },
        );
    }
}
