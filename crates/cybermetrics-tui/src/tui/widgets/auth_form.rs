// Login and signup forms.
//
// Both share one card: title and subtitle, the input fields, an optional
// alert, and the submit button whose label changes while the request is in
// flight.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use cybermetrics_core::gate::Route;

use super::{banner_line, centered_rect};
use crate::tui::{AuthForm, FormField, ViewState};

const CARD_WIDTH: u16 = 56;
const CARD_HEIGHT: u16 = 20;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let route = state.snapshot.route;
    let card = centered_rect(CARD_WIDTH, CARD_HEIGHT, area);
    let (title, subtitle) = titles(route);

    let mut lines = vec![
        Line::from(Span::styled(
            subtitle,
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(""),
    ];

    for field in AuthForm::fields(route) {
        lines.extend(field_lines(&state.form, *field, route));
    }

    if let Some(notice) = &state.snapshot.notice {
        lines.push(banner_line(notice));
        lines.push(Line::from(""));
    }

    lines.push(Line::from(Span::styled(
        format!("[ {} ]", button_label(route, state.snapshot.auth_pending)),
        Style::default()
            .fg(Color::Black)
            .bg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Esc: back to home",
        Style::default().fg(Color::DarkGray),
    )));

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(Span::styled(
                format!(" {} ", title),
                Style::default().add_modifier(Modifier::BOLD),
            )),
    );
    frame.render_widget(paragraph, card);
}

/// Card title and subtitle for the form on `route`.
pub fn titles(route: Route) -> (&'static str, &'static str) {
    match route {
        Route::Signup => ("Sign Up", "Create your Cybermetrics account"),
        _ => ("Login", "Welcome back to Cybermetrics"),
    }
}

pub fn button_label(route: Route, pending: bool) -> &'static str {
    match (route, pending) {
        (Route::Signup, true) => "Creating account...",
        (Route::Signup, false) => "Sign Up",
        (_, true) => "Logging in...",
        (_, false) => "Login",
    }
}

/// Text shown inside an input: the value (masked for passwords) or the
/// placeholder when empty.
pub fn display_value(form: &AuthForm, field: FormField) -> (String, bool) {
    let value = form.value(field);
    if value.is_empty() {
        let placeholder = match field {
            FormField::DisplayName => "John Doe",
            FormField::Email => "you@example.com",
            FormField::Password => "••••••••",
        };
        return (placeholder.to_string(), true);
    }
    match field {
        FormField::Password => ("•".repeat(value.chars().count()), false),
        _ => (value.to_string(), false),
    }
}

fn field_lines(form: &AuthForm, field: FormField, route: Route) -> Vec<Line<'static>> {
    let active = form.active == field;
    let label_style = if active {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    };

    let (text, is_placeholder) = display_value(form, field);
    let value_style = if is_placeholder {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default().fg(Color::White)
    };
    let mut value_spans = vec![
        Span::styled(if active { "> " } else { "  " }, label_style),
        Span::styled(text, value_style),
    ];
    if active {
        value_spans.push(Span::styled(
            "_",
            Style::default().add_modifier(Modifier::SLOW_BLINK),
        ));
    }

    let mut lines = vec![
        Line::from(Span::styled(field.label(), label_style)),
        Line::from(value_spans),
    ];
    if route == Route::Signup && field == FormField::Password {
        lines.push(Line::from(Span::styled(
            "  Minimum 6 characters",
            Style::default().fg(Color::DarkGray),
        )));
    }
    lines.push(Line::from(""));
    lines
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
