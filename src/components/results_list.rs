use artbox::{
    Alignment as ArtAlignment, Color as ArtColor, Fill, LinearGradient, Renderer, fonts,
    integrations::ratatui::ArtBox,
};
use crossterm::event::KeyCode;
use ratatui::{
    layout::{Constraint, Flex, Layout},
    prelude::{Frame, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use tui_dispatch::{DataResource, EventKind};

use super::Component;
use crate::action::Action;
use crate::dates::{format_long_date, format_time};
use crate::itinerary::{self, Itinerary, Segment};
use crate::logos::{LogoState, TILE_COLS};
use crate::results::{NO_FILTERED_FLIGHTS_MESSAGE, NO_FLIGHTS_MESSAGE, ResultEntry};
use crate::state::{AppState, RouteLeg};

const FOCUS_COLOR: Color = Color::Rgb(100, 180, 255);
const PRICE_COLOR: Color = Color::Rgb(255, 200, 90);
const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
/// Logos shown per direction row
const MAX_LOGOS: usize = 2;
const PRICE_WIDTH: usize = 11;

pub struct ResultsListProps<'a> {
    pub state: &'a AppState,
    pub is_focused: bool,
}

/// Rendered flights with lazy logos and expandable details
#[derive(Default)]
pub struct ResultsList;

impl Component<Action> for ResultsList {
    type Props<'a> = ResultsListProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused {
            return None;
        }
        let page = props.state.results_page() as i16;

        match event {
            EventKind::Key(key) => match key.code {
                KeyCode::Down | KeyCode::Char('j') => Some(Action::ResultsMove(1)),
                KeyCode::Up | KeyCode::Char('k') => Some(Action::ResultsMove(-1)),
                KeyCode::PageDown => Some(Action::ResultsMove(page)),
                KeyCode::PageUp => Some(Action::ResultsMove(-page)),
                KeyCode::Enter | KeyCode::Char(' ') => Some(Action::ResultsToggle),
                KeyCode::Char('f') => Some(Action::FilterOpen),
                KeyCode::Char('s') | KeyCode::Char('r') | KeyCode::F(5) => {
                    Some(Action::SearchSubmit)
                }
                KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
                _ => None,
            },
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let state = props.state;
        let border_style = if props.is_focused {
            Style::default().fg(FOCUS_COLOR)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(title(state));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        match &state.results {
            DataResource::Empty => render_banner(frame, inner),
            DataResource::Loading => {
                let frame_index = state.tick_count as usize % SPINNER.len();
                render_message(
                    frame,
                    inner,
                    Line::from(vec![
                        Span::styled(SPINNER[frame_index], Style::default().fg(FOCUS_COLOR)),
                        Span::styled(" Searching flights...", Style::default().fg(Color::Gray)),
                    ]),
                );
            }
            DataResource::Failed(message) => render_message(
                frame,
                inner,
                Line::from(Span::styled(
                    message.clone(),
                    Style::default().fg(Color::Rgb(200, 100, 100)),
                )),
            ),
            DataResource::Loaded(results) if results.is_empty() => render_message(
                frame,
                inner,
                Line::from(Span::styled(
                    NO_FLIGHTS_MESSAGE,
                    Style::default().fg(Color::Gray),
                )),
            ),
            DataResource::Loaded(results) => {
                let visible = state.visible_entries();
                if visible.is_empty() {
                    render_message(
                        frame,
                        inner,
                        Line::from(Span::styled(
                            NO_FILTERED_FLIGHTS_MESSAGE,
                            Style::default().fg(Color::Gray),
                        )),
                    );
                    return;
                }

                let height = usize::from(inner.height);
                let mut lines: Vec<Line> = Vec::with_capacity(height);
                for (position, index) in visible.iter().enumerate().skip(state.scroll_offset) {
                    if lines.len() >= height {
                        break;
                    }
                    let Some(entry) = results.entries.get(*index) else {
                        continue;
                    };
                    let selected = position == state.selected;
                    lines.extend(entry_lines(
                        entry,
                        &results.currency_symbol,
                        state,
                        selected && props.is_focused,
                        selected,
                    ));
                }
                lines.truncate(height);
                frame.render_widget(Paragraph::new(lines), inner);
            }
        }
    }
}

fn title(state: &AppState) -> String {
    match state.results.data() {
        Some(results) if !results.is_empty() => format!(
            " Flights · {} of {} · {} ",
            state.visible_entries().len(),
            results.entries.len(),
            state.filter.summary()
        ),
        _ => " Flights ".to_string(),
    }
}

fn render_banner(frame: &mut Frame, area: Rect) {
    let chunks = Layout::vertical([
        Constraint::Max(6),    // Banner
        Constraint::Length(1), // Spacer
        Constraint::Length(1), // Hint
    ])
    .flex(Flex::Center)
    .split(area);

    let renderer = Renderer::new(fonts::stack(&["terminus", "miniwi"]))
        .with_plain_fallback()
        .with_alignment(ArtAlignment::Center)
        .with_fill(Fill::Linear(LinearGradient::horizontal(
            ArtColor::rgb(100, 180, 255),
            ArtColor::rgb(150, 220, 200),
        )));
    frame.render_widget(ArtBox::new(&renderer, "flightlist"), chunks[0]);

    let hint = Line::from(vec![
        Span::styled("Fill in the form and press ", Style::default().fg(Color::DarkGray)),
        Span::styled("Enter", Style::default().fg(Color::Cyan).bold()),
        Span::styled(" to search", Style::default().fg(Color::DarkGray)),
    ])
    .centered();
    frame.render_widget(Paragraph::new(hint), chunks[2]);
}

fn render_message(frame: &mut Frame, area: Rect, line: Line<'_>) {
    let chunks = Layout::vertical([Constraint::Length(1)])
        .flex(Flex::Center)
        .split(area);
    frame.render_widget(Paragraph::new(line.centered()), chunks[0]);
}

/// Logo tile, or a text badge while it loads or when it failed
fn logo_spans(code: &str, state: &AppState) -> Vec<Span<'static>> {
    match state.logos.get(code) {
        Some(LogoState::Ready(tile)) => tile
            .half_block_row(0)
            .into_iter()
            .map(|(upper, lower)| {
                Span::styled(
                    "▀",
                    Style::default()
                        .fg(Color::Rgb(upper.0, upper.1, upper.2))
                        .bg(Color::Rgb(lower.0, lower.1, lower.2)),
                )
            })
            .collect(),
        _ => vec![Span::styled(
            format!("{:^width$}", code, width = TILE_COLS as usize),
            Style::default().fg(Color::White).bg(Color::DarkGray),
        )],
    }
}

fn direction_line(
    legs: &[&RouteLeg],
    lead: Span<'static>,
    state: &AppState,
    row_style: Style,
) -> Line<'static> {
    let (Some(first), Some(last)) = (legs.first(), legs.last()) else {
        return Line::from(lead);
    };
    let mut airlines: Vec<&str> = Vec::new();
    for leg in legs {
        if !airlines.contains(&leg.airline.as_str()) {
            airlines.push(&leg.airline);
        }
    }

    let mut spans = vec![lead];
    for (i, code) in airlines.iter().take(MAX_LOGOS).enumerate() {
        if i > 0 {
            spans.push(Span::raw(" "));
        }
        spans.extend(logo_spans(code, state));
    }
    let used = airlines.len().min(MAX_LOGOS);
    let logo_width = used * TILE_COLS as usize + used.saturating_sub(1);
    let pad = (MAX_LOGOS * TILE_COLS as usize + MAX_LOGOS - 1).saturating_sub(logo_width);
    spans.push(Span::raw(" ".repeat(pad + 2)));

    spans.push(Span::styled(
        format!(
            "{} - {}",
            format_time(first.local_departure),
            format_time(last.local_arrival)
        ),
        row_style.add_modifier(Modifier::BOLD),
    ));
    spans.push(Span::styled(
        format!("  {}", format_long_date(first.local_departure)),
        Style::default().fg(Color::DarkGray),
    ));
    spans.push(Span::styled(
        format!("  {}", itinerary::total_duration(legs)),
        row_style,
    ));
    spans.push(Span::styled(
        format!(
            "  {} ({}) → {} ({})",
            first.city_from, first.fly_from, last.city_to, last.fly_to
        ),
        Style::default().fg(Color::Gray),
    ));
    spans.push(Span::styled(
        format!("  {}", itinerary::stops_text(legs.len())),
        row_style,
    ));
    Line::from(spans)
}

fn detail_lines(entry: &ResultEntry, state: &AppState) -> Vec<Line<'static>> {
    let indent = " ".repeat(PRICE_WIDTH + 2);
    let dim = Style::default().fg(Color::Gray);
    let mut lines = Vec::new();
    for segment in itinerary::segments(&entry.flight.route) {
        let line = match segment {
            Segment::Leg(leg) => {
                let airline = state
                    .results
                    .data()
                    .map(|r| r.dictionary.name(&leg.airline).to_string())
                    .unwrap_or_else(|| leg.airline.clone());
                Line::from(vec![
                    Span::raw(indent.clone()),
                    Span::styled(format_long_date(leg.local_departure), dim),
                    Span::raw(format!("  {airline} ")),
                    Span::styled(
                        format!("· {} {}", leg.airline, leg.flight_no),
                        Style::default().fg(Color::DarkGray),
                    ),
                    Span::raw(format!(
                        "  Depart {} from {} ({})  Fly for {}  Arrive {} in {} ({})",
                        format_time(leg.local_departure),
                        leg.city_from,
                        leg.fly_from,
                        itinerary::leg_duration(leg),
                        format_time(leg.local_arrival),
                        leg.city_to,
                        leg.fly_to
                    )),
                ])
            }
            Segment::Layover { city, minutes } => Line::from(vec![
                Span::raw(indent.clone()),
                Span::styled(
                    format!(
                        "    Layover in {city} for {}",
                        itinerary::format_duration(minutes)
                    ),
                    Style::default().fg(Color::Yellow),
                ),
            ]),
            Segment::Stay { city, nights } => {
                lines.push(Line::from(vec![
                    Span::raw(indent.clone()),
                    Span::styled(
                        format!("    Stay in {city} for {}", itinerary::nights_label(nights)),
                        Style::default().fg(Color::Green),
                    ),
                ]));
                for link in itinerary::accommodation_links(city) {
                    lines.push(Line::from(vec![
                        Span::raw(indent.clone()),
                        Span::styled(format!("      {}: ", link.provider), dim),
                        Span::raw(link.url),
                    ]));
                }
                continue;
            }
        };
        lines.push(line);
    }
    lines.push(Line::from(vec![
        Span::raw(indent.clone()),
        Span::styled("Book: ", Style::default().fg(Color::Cyan).bold()),
        Span::raw(entry.flight.deep_link.clone()),
    ]));
    if let Some(link) = &entry.comparison_link {
        lines.push(Line::from(vec![
            Span::raw(indent),
            Span::styled("Compare: ", Style::default().fg(Color::Cyan).bold()),
            Span::raw(link.clone()),
        ]));
    }
    lines
}

fn entry_lines(
    entry: &ResultEntry,
    symbol: &str,
    state: &AppState,
    highlighted: bool,
    selected: bool,
) -> Vec<Line<'static>> {
    let trip = Itinerary::of(&entry.flight);
    let row_style = if highlighted {
        Style::default().fg(Color::White)
    } else {
        Style::default().fg(Color::Reset)
    };
    let marker = if selected { "▸" } else { " " };
    let price = format!(
        "{symbol}{}",
        itinerary::format_price(entry.flight.price)
    );
    let lead = Span::styled(
        format!("{marker}{price:>width$} ", width = PRICE_WIDTH),
        Style::default().fg(PRICE_COLOR).add_modifier(Modifier::BOLD),
    );
    let blank_lead = Span::raw(" ".repeat(PRICE_WIDTH + 2));

    let mut lines = vec![direction_line(&trip.outbound, lead, state, row_style)];
    if trip.is_round_trip() {
        lines.push(direction_line(
            &trip.inbound,
            blank_lead,
            state,
            row_style,
        ));
    }
    if entry.expanded {
        lines.extend(detail_lines(entry, state));
    }
    lines.push(Line::from(Span::styled(
        "┄".repeat(PRICE_WIDTH + 2),
        Style::default().fg(Color::DarkGray),
    )));

    if highlighted {
        lines
            .into_iter()
            .map(|line| line.style(Style::default().bg(Color::Rgb(30, 34, 44))))
            .collect()
    } else {
        lines
    }
}
