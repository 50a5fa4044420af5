use chrono::NaiveDate;
use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::{
    layout::{Constraint, Layout},
    prelude::{Frame, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use tui_dispatch::EventKind;

use super::Component;
use crate::action::Action;
use crate::currency::CurrencySymbols;
use crate::form::{Choice, FieldKind, FormField, SearchForm};

const LABEL_WIDTH: usize = 13;
const FOCUS_COLOR: Color = Color::Rgb(100, 180, 255);

pub struct SearchFormPanelProps<'a> {
    pub form: &'a SearchForm,
    pub cursor: usize,
    pub today: NaiveDate,
    pub is_focused: bool,
}

/// Every search input, one row per field
#[derive(Default)]
pub struct SearchFormPanel;

/// Inline help for the focused field
pub fn field_hint(field: FormField) -> &'static str {
    match field {
        FormField::From => "Airport, city or country code. Empty uses your country.",
        FormField::To => "Airport, city or country code. Empty searches everywhere.",
        FormField::FlightType => "Return trips get a second date range.",
        FormField::Departure => "←/→ steps through quick ranges.",
        FormField::Return => "When the return flight may leave.",
        FormField::Adults | FormField::Children | FormField::Infants => {
            "Bag limits follow the passenger count."
        }
        FormField::Cabin => "Cabin class to search.",
        FormField::CabinBags => "At most one cabin bag per adult or child.",
        FormField::CheckedBags => "At most two checked bags per adult or child.",
        FormField::Currency => "Changing currency clears the budget.",
        FormField::Budget => "Highest total price, in the selected currency.",
        FormField::Limit => "Number of results, 100 when empty.",
        FormField::Sort => "Order of the results.",
        FormField::Stops => "Stopovers allowed in each direction.",
        FormField::Duration => "Longest flight time in hours.",
        FormField::Layover => "Longest connection in hours, 48 when empty.",
        FormField::DepartTime => "Time of day for the first departure.",
        FormField::Connections => "Self-transfer routes can be cheaper but are unprotected.",
    }
}

fn or_placeholder(text: &str, placeholder: &str) -> (String, bool) {
    if text.is_empty() {
        (placeholder.to_string(), true)
    } else {
        (text.to_string(), false)
    }
}

/// Display value of a field, and whether it is a placeholder
fn field_value(form: &SearchForm, field: FormField, today: NaiveDate) -> (String, bool) {
    match field {
        FormField::From => or_placeholder(&form.from, "anywhere near you"),
        FormField::To => or_placeholder(&form.to, "anywhere"),
        FormField::FlightType => (form.flight_type.label().to_string(), false),
        FormField::Departure => (date_value(&form.departure, today), false),
        FormField::Return => (date_value(&form.return_dates, today), false),
        FormField::Adults => (form.adults.to_string(), false),
        FormField::Children => (form.children.to_string(), false),
        FormField::Infants => (form.infants.to_string(), false),
        FormField::Cabin => (form.cabin.label().to_string(), false),
        FormField::CabinBags => (
            format!("{} / {}", form.cabin_bags, form.bag_limits().max_cabin),
            false,
        ),
        FormField::CheckedBags => (
            format!("{} / {}", form.checked_bags, form.bag_limits().max_checked),
            false,
        ),
        FormField::Currency => (form.currency.clone(), false),
        FormField::Budget => {
            let symbols = CurrencySymbols::from_offered(&form.currencies);
            let (amount, placeholder) = or_placeholder(&form.budget, "no limit");
            (format!("{} {amount}", symbols.symbol(&form.currency)), placeholder)
        }
        FormField::Limit => or_placeholder(&form.limit, "100"),
        FormField::Sort => (form.sort.label().to_string(), false),
        FormField::Stops => (form.stops.label().to_string(), false),
        FormField::Duration => or_placeholder(&form.max_duration, "no limit"),
        FormField::Layover => or_placeholder(&form.layover, "48"),
        FormField::DepartTime => (form.depart_time.label().to_string(), false),
        FormField::Connections => (form.connections.label().to_string(), false),
    }
}

fn date_value(picker: &crate::dates::DatePicker, today: NaiveDate) -> String {
    match picker.preset_label(today) {
        Some(label) => format!("{} ({label})", picker.range.label()),
        None => picker.range.label(),
    }
}

fn field_line(
    form: &SearchForm,
    field: FormField,
    today: NaiveDate,
    selected: bool,
    is_focused: bool,
) -> Line<'static> {
    let (value, placeholder) = field_value(form, field, today);
    let marker = if selected { "▸ " } else { "  " };
    let label_style = if selected && is_focused {
        Style::default().fg(FOCUS_COLOR).bold()
    } else {
        Style::default().fg(Color::Gray)
    };
    let value_style = if placeholder {
        Style::default().fg(Color::DarkGray)
    } else if selected && is_focused {
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Reset)
    };

    let mut spans = vec![
        Span::styled(marker, label_style),
        Span::styled(format!("{:<LABEL_WIDTH$}", field.label()), label_style),
    ];
    match field.kind() {
        FieldKind::Select if selected => {
            spans.push(Span::styled("‹ ", Style::default().fg(Color::DarkGray)));
            spans.push(Span::styled(value, value_style));
            spans.push(Span::styled(" ›", Style::default().fg(Color::DarkGray)));
        }
        FieldKind::Text { .. } if selected && is_focused => {
            if placeholder {
                spans.push(Span::styled("▏", Style::default().fg(FOCUS_COLOR)));
                spans.push(Span::styled(value, value_style));
            } else {
                spans.push(Span::styled(value, value_style));
                spans.push(Span::styled("▏", Style::default().fg(FOCUS_COLOR)));
            }
        }
        _ => spans.push(Span::styled(value, value_style)),
    }
    Line::from(spans)
}

impl SearchFormPanel {
    /// One-line route summary for the collapsed narrow layout
    pub fn summary_line(form: &SearchForm) -> Line<'static> {
        let from = if form.from.is_empty() { "…" } else { form.from.as_str() };
        let to = if form.to.is_empty() { "anywhere" } else { form.to.as_str() };
        Line::from(vec![
            Span::styled(format!("{from} → {to}"), Style::default().bold()),
            Span::styled(
                format!(
                    "  {} · {} · {} adult(s)",
                    form.flight_type.label(),
                    form.departure.range.label(),
                    form.adults
                ),
                Style::default().fg(Color::Gray),
            ),
        ])
    }
}

impl Component<Action> for SearchFormPanel {
    type Props<'a> = SearchFormPanelProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused {
            return None;
        }
        let EventKind::Key(key) = event else {
            return None;
        };
        let Some(field) = props.form.visible_fields().get(props.cursor).copied() else {
            return None;
        };
        let is_text = field.is_text();

        match key.code {
            KeyCode::Enter => Some(Action::SearchSubmit),
            KeyCode::Down => Some(Action::FormFieldNext),
            KeyCode::Up | KeyCode::BackTab => Some(Action::FormFieldPrev),
            KeyCode::Left => (!is_text).then_some(Action::FormCycle(-1)),
            KeyCode::Right => (!is_text).then_some(Action::FormCycle(1)),
            KeyCode::Backspace => is_text.then_some(Action::FormBackspace),
            KeyCode::Esc => Some(Action::Quit),
            KeyCode::Char(c) if key.modifiers.contains(KeyModifiers::CONTROL) => {
                (c == 's').then_some(Action::SearchSubmit)
            }
            KeyCode::Char(c) if is_text => Some(Action::FormInput(c)),
            KeyCode::Char(' ') | KeyCode::Char('l') => Some(Action::FormCycle(1)),
            KeyCode::Char('h') => Some(Action::FormCycle(-1)),
            KeyCode::Char('j') => Some(Action::FormFieldNext),
            KeyCode::Char('k') => Some(Action::FormFieldPrev),
            KeyCode::Char('q') => Some(Action::Quit),
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let border_style = if props.is_focused {
            Style::default().fg(FOCUS_COLOR)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(" Search ");
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::vertical([
            Constraint::Min(1),    // Fields
            Constraint::Length(2), // Field help
        ])
        .split(inner);

        let fields = props.form.visible_fields();
        let rows = usize::from(chunks[0].height).max(1);
        // Keep the cursor on screen when the terminal is short
        let first = props.cursor.saturating_sub(rows - 1);
        let lines: Vec<Line> = fields
            .iter()
            .enumerate()
            .skip(first)
            .take(rows)
            .map(|(index, field)| {
                field_line(
                    props.form,
                    *field,
                    props.today,
                    index == props.cursor,
                    props.is_focused,
                )
            })
            .collect();
        frame.render_widget(Paragraph::new(lines), chunks[0]);

        if let Some(field) = fields.get(props.cursor) {
            let hint = Line::from(Span::styled(
                field_hint(*field),
                Style::default().fg(Color::DarkGray).italic(),
            ));
            frame.render_widget(Paragraph::new(hint).wrap(Wrap { trim: true }), chunks[1]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEvent;
    use tui_dispatch::testing::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    fn form() -> SearchForm {
        SearchForm::new(today(), "USD".into(), vec!["USD".into(), "EUR".into()])
    }

    fn events(form: &SearchForm, cursor: usize, event: EventKind) -> Vec<Action> {
        let mut panel = SearchFormPanel;
        panel
            .handle_event(
                &event,
                SearchFormPanelProps {
                    form,
                    cursor,
                    today: today(),
                    is_focused: true,
                },
            )
            .into_iter()
            .collect()
    }

    #[test]
    fn test_text_field_takes_characters() {
        let form = form();
        let actions = events(&form, 0, EventKind::Key(key("q")));
        actions.assert_first(Action::FormInput('q'));
    }

    #[test]
    fn test_select_field_cycles() {
        let form = form();
        let right = EventKind::Key(KeyEvent::new(KeyCode::Right, KeyModifiers::NONE));
        events(&form, 2, right).assert_first(Action::FormCycle(1));
        events(&form, 2, EventKind::Key(key("q"))).assert_first(Action::Quit);
    }

    #[test]
    fn test_enter_submits() {
        let form = form();
        let enter = EventKind::Key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));
        events(&form, 0, enter).assert_first(Action::SearchSubmit);
    }

    #[test]
    fn test_render_shows_fields_and_hint() {
        let mut render = RenderHarness::new(46, 26);
        let mut form = form();
        form.from = "LON".into();
        let output = render.render_to_string_plain(|frame| {
            SearchFormPanel.render(
                frame,
                frame.area(),
                SearchFormPanelProps {
                    form: &form,
                    cursor: 0,
                    today: today(),
                    is_focused: true,
                },
            );
        });

        assert!(output.contains("From"));
        assert!(output.contains("LON"));
        assert!(output.contains("Oct 19 - Nov 17, 2026"));
        assert!(output.contains("Economy"));
        assert!(output.contains("Airport, city or country code"));
    }

    #[test]
    fn test_budget_follows_currency_symbol() {
        let mut render = RenderHarness::new(46, 26);
        let mut form = form();
        form.budget = "250".into();
        let draw = |render: &mut RenderHarness, form: &SearchForm| {
            render.render_to_string_plain(|frame| {
                SearchFormPanel.render(
                    frame,
                    frame.area(),
                    SearchFormPanelProps {
                        form,
                        cursor: 0,
                        today: today(),
                        is_focused: true,
                    },
                );
            })
        };

        assert!(draw(&mut render, &form).contains("US$ 250"));

        assert!(form.cycle(FormField::Currency, 1, today()));
        assert_eq!(form.currency, "EUR");
        let output = draw(&mut render, &form);
        assert!(output.contains("€ no limit"));
        assert!(!output.contains("US$"));
    }
}
