use ratatui::{
    layout::{Constraint, Layout},
    prelude::{Frame, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use tui_dispatch::DataResource;
use tui_dispatch_components::{
    StatusBar, StatusBarHint, StatusBarItem, StatusBarProps, StatusBarSection, StatusBarStyle,
};

use super::{Component, SearchFormPanel};
use crate::action::Action;
use crate::state::{AppState, FORM_PANEL_WIDTH, Focus};

/// Height of a collapsed pane in the stacked layout
const COLLAPSED_HEIGHT: u16 = 3;

/// Where each pane goes for the current terminal size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppLayout {
    pub form: Rect,
    pub results: Rect,
    pub status: Rect,
    /// Narrow terminals stack the panes and shrink the unfocused one
    pub stacked: bool,
}

impl AppLayout {
    pub fn new(area: Rect, state: &AppState) -> Self {
        let rows = Layout::vertical([
            Constraint::Min(1),    // Panes
            Constraint::Length(1), // Status bar
        ])
        .split(area);

        if !state.is_mobile() {
            let panes = Layout::horizontal([
                Constraint::Length(FORM_PANEL_WIDTH),
                Constraint::Min(1),
            ])
            .split(rows[0]);
            return Self {
                form: panes[0],
                results: panes[1],
                status: rows[1],
                stacked: false,
            };
        }

        let constraints = match state.focus {
            Focus::Form => [Constraint::Min(1), Constraint::Length(COLLAPSED_HEIGHT)],
            Focus::Results => [Constraint::Length(COLLAPSED_HEIGHT), Constraint::Min(1)],
        };
        let panes = Layout::vertical(constraints).split(rows[0]);
        Self {
            form: panes[0],
            results: panes[1],
            status: rows[1],
            stacked: true,
        }
    }

    pub fn form_collapsed(&self, state: &AppState) -> bool {
        self.stacked && state.focus != Focus::Form
    }

    pub fn results_collapsed(&self, state: &AppState) -> bool {
        self.stacked && state.focus != Focus::Results
    }
}

/// A shrunken pane: its title and a single summary line
pub fn render_collapsed(frame: &mut Frame, area: Rect, title: &str, line: Line<'_>) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(format!(" {title} "));
    let inner = block.inner(area);
    frame.render_widget(block, area);
    frame.render_widget(Paragraph::new(line), inner);
}

pub fn form_summary(state: &AppState) -> Line<'static> {
    SearchFormPanel::summary_line(&state.form)
}

pub fn results_summary(state: &AppState) -> Line<'static> {
    let text = match &state.results {
        DataResource::Empty => "No search yet".to_string(),
        DataResource::Loading => "Searching...".to_string(),
        DataResource::Failed(message) => message.clone(),
        DataResource::Loaded(results) => match results.lead_price() {
            Some(price) => format!(
                "{} flights from {}{}",
                state.visible_entries().len(),
                results.currency_symbol,
                price
            ),
            None => "No flights".to_string(),
        },
    };
    Line::from(Span::styled(text, Style::default().fg(Color::Gray)))
}

fn hints(state: &AppState) -> Vec<StatusBarHint<'static>> {
    if state.filter_open {
        return vec![
            StatusBarHint::new("space", "toggle"),
            StatusBarHint::new("a", "all"),
            StatusBarHint::new("n", "none"),
            StatusBarHint::new("esc", "close"),
        ];
    }
    match state.focus {
        Focus::Form => vec![
            StatusBarHint::new("↑↓", "field"),
            StatusBarHint::new("←→", "change"),
            StatusBarHint::new("enter", "search"),
            StatusBarHint::new("tab", "results"),
            StatusBarHint::new("esc", "quit"),
        ],
        Focus::Results => vec![
            StatusBarHint::new("↑↓", "move"),
            StatusBarHint::new("enter", "details"),
            StatusBarHint::new("f", "airlines"),
            StatusBarHint::new("s", "search"),
            StatusBarHint::new("tab", "form"),
            StatusBarHint::new("q", "quit"),
        ],
    }
}

pub fn render_status_bar(frame: &mut Frame, area: Rect, state: &AppState) {
    let notify_items = state.last_notify.as_ref().map(|filename| {
        [StatusBarItem::span(Span::styled(
            format!("page: {filename}"),
            Style::default().fg(Color::DarkGray),
        ))]
    });
    let right = match &notify_items {
        Some(items) => StatusBarSection::items(items),
        None => StatusBarSection::empty(),
    };
    let center_hints = hints(state);

    let mut status_bar = StatusBar::new();
    <StatusBar as Component<Action>>::render(
        &mut status_bar,
        frame,
        area,
        StatusBarProps {
            left: StatusBarSection::empty(),
            center: StatusBarSection::hints(&center_hints).with_separator("  "),
            right,
            style: StatusBarStyle::default(),
            is_focused: false,
        },
    );
}
