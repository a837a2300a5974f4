//! Rendering. Pure functions of [`AppState`]; no state lives here.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Cell, List, ListItem, Paragraph, Row, Table},
    Frame,
};

use crate::app::AppState;
use crate::clock;
use crate::weather::glyph_for;

const PLACEHOLDER: &str = "Search for a city...";
const KEY_HINTS: &str = "enter search  ctrl-l my location  ctrl-r refresh  esc quit";

fn card(title: &str) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(
            format!(" {title} "),
            Style::default().fg(Color::Yellow),
        ))
        .title_alignment(Alignment::Left)
        .border_style(Style::default().fg(Color::Cyan))
        .border_type(BorderType::Rounded)
}

fn display_search(state: &AppState) -> Paragraph<'static> {
    let input = if state.search_query.is_empty() {
        Line::from(vec![
            Span::raw(" "),
            Span::styled(PLACEHOLDER, Style::default().fg(Color::DarkGray)),
        ])
    } else {
        let cursor = if state.is_loading { "" } else { "█" };
        Line::from(vec![
            Span::raw(" "),
            Span::styled(state.search_query.clone(), Style::default().fg(Color::White)),
            Span::styled(cursor, Style::default().fg(Color::Cyan)),
        ])
    };

    let hints = Line::from(vec![
        Span::raw(" "),
        Span::styled(KEY_HINTS, Style::default().fg(Color::DarkGray)),
    ]);

    // One status line: busy notice wins over a stale error.
    let status = if state.is_loading {
        Line::from(vec![
            Span::raw(" "),
            Span::styled("Searching...", Style::default().fg(Color::Yellow)),
        ])
    } else if !state.location_error.is_empty() {
        Line::from(vec![
            Span::raw(" "),
            Span::styled(state.location_error.clone(), Style::default().fg(Color::Red)),
        ])
    } else {
        Line::from("")
    };

    let title = if state.is_refreshing {
        "Weather Dashboard ~ refreshing"
    } else {
        "Weather Dashboard"
    };

    Paragraph::new(vec![input, hints, status]).block(card(title))
}

fn display_primary(state: &AppState) -> Paragraph<'static> {
    let weather = &state.selected;

    let lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::raw(" "),
            Span::styled(
                weather.location.clone(),
                Style::default()
                    .fg(Color::Blue)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![
            Span::raw(" "),
            Span::styled(weather.country.clone(), Style::default().fg(Color::Gray)),
        ]),
        Line::from(vec![
            Span::raw(" "),
            Span::styled(
                clock::format_calendar_date(&state.now),
                Style::default().fg(Color::Gray),
            ),
        ]),
        Line::from(vec![
            Span::raw(" "),
            Span::styled(
                clock::format_clock_time(&state.now),
                Style::default().fg(Color::Blue),
            ),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::raw(" "),
            Span::raw(format!("{} ", glyph_for(&weather.condition))),
            Span::styled(
                format!("{}°C", weather.temperature),
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::styled(weather.condition.clone(), Style::default().fg(Color::White)),
        ]),
        Line::from(vec![
            Span::raw(" "),
            Span::styled(weather.description.clone(), Style::default().fg(Color::Gray)),
        ]),
    ];

    Paragraph::new(lines).block(card("Current Conditions"))
}

fn display_metric(title: &str, value: String, unit: &str) -> Paragraph<'static> {
    Paragraph::new(vec![
        Line::from(vec![
            Span::raw(" "),
            Span::styled(
                value,
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![
            Span::raw(" "),
            Span::styled(unit.to_string(), Style::default().fg(Color::DarkGray)),
        ]),
    ])
    .block(card(title))
}

fn display_extras(state: &AppState) -> Table<'static> {
    let weather = &state.selected;
    let rows = vec![
        Row::new(vec![Cell::from("")]),
        Row::new(vec![
            Cell::from(" Visibility"),
            Cell::from(format!("{:.0} miles", weather.visibility))
                .style(Style::default().fg(Color::Green)),
        ]),
        Row::new(vec![
            Cell::from(" UV Index"),
            Cell::from(format!("{} High", weather.uv_index))
                .style(Style::default().fg(Color::Green)),
        ]),
    ];

    Table::new(rows, [Constraint::Length(12), Constraint::Length(15)])
        .block(card("Visibility & UV"))
}

fn display_forecast(state: &AppState) -> List<'static> {
    let items: Vec<ListItem> = state
        .selected
        .forecast
        .iter()
        .map(|day| {
            ListItem::new(Line::from(vec![
                Span::raw(format!(" {} ", glyph_for(&day.icon))),
                Span::styled(
                    format!("{:10}", day.day),
                    Style::default().fg(Color::White),
                ),
                Span::styled(
                    format!("{:>4}°", day.high),
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(format!("{:>4}°", day.low), Style::default().fg(Color::Gray)),
                Span::raw("  "),
                Span::styled(day.condition.clone(), Style::default().fg(Color::DarkGray)),
            ]))
        })
        .collect();

    List::new(items).block(card("5-Day Forecast"))
}

fn display_footer(state: &AppState) -> Paragraph<'static> {
    let note = if state.is_refreshing {
        "Refreshing...".to_string()
    } else {
        format!(
            "Weather data updates automatically • Last updated: {}",
            clock::format_clock_time(&state.now)
        )
    };
    Paragraph::new(Line::from(Span::styled(
        note,
        Style::default().fg(Color::DarkGray),
    )))
    .alignment(Alignment::Center)
}

fn render_metrics(frame: &mut Frame, area: Rect, state: &AppState) {
    let weather = &state.selected;
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Length(4)])
        .split(area);
    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[0]);
    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[1]);

    frame.render_widget(
        display_metric("Feels Like", format!("{}°C", weather.feels_like), ""),
        top[0],
    );
    frame.render_widget(
        display_metric("Humidity", format!("{}%", weather.humidity), ""),
        top[1],
    );
    frame.render_widget(
        display_metric(
            "Wind",
            format!("{:.0} km/h", weather.wind_speed),
            &weather.wind_direction,
        ),
        bottom[0],
    );
    frame.render_widget(
        display_metric("Pressure", format!("{:.2}", weather.pressure), "in Hg"),
        bottom[1],
    );
}

/// Draw the whole dashboard for one frame.
pub fn render(frame: &mut Frame, state: &AppState) {
    let vert_layout = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(5),
            Constraint::Min(10),
            Constraint::Length(1),
        ])
        .split(frame.area());

    frame.render_widget(display_search(state), vert_layout[0]);

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)].as_ref())
        .split(vert_layout[1]);

    let lchunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(10), Constraint::Length(8)].as_ref())
        .split(chunks[0]);

    frame.render_widget(display_primary(state), lchunks[0]);
    render_metrics(frame, lchunks[1], state);

    let rchunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(5), Constraint::Min(7)].as_ref())
        .split(chunks[1]);

    frame.render_widget(display_extras(state), rchunks[0]);
    frame.render_widget(display_forecast(state), rchunks[1]);

    frame.render_widget(display_footer(state), vert_layout[2]);
}
