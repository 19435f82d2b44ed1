pub mod feed;
pub mod pad;

use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::app::{App, ScreenLayout};
use crate::controls::ControlLayout;
use crate::host::{GameHost, HostPhase};

pub const START_PROMPT: &str = "Swipe here to start";
pub const LOST_MESSAGE: &str = "You lost. Try again!";

/// Draw the whole screen and record the geometry pointer input hits against.
pub fn render(frame: &mut Frame, app: &mut App) {
    let host = app.current();
    let controls = ControlLayout::for_controls(host.descriptor().controls);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Feed
            Constraint::Length(4), // Card
            Constraint::Min(6),    // Viewport
            Constraint::Length(pad::pad_height(&controls)),
            Constraint::Length(1), // Hints
        ])
        .split(frame.area());

    feed::render_feed(frame, app, chunks[0]);
    render_card(frame, host, chunks[1]);

    let game_area = render_viewport(frame, host, chunks[2]);
    let buttons = pad::render_pad(frame, chunks[3], &controls, host.last_control());
    render_hints(frame, host, chunks[4]);

    app.layout = ScreenLayout { game_area, buttons };
}

fn render_card(frame: &mut Frame, host: &GameHost, area: Rect) {
    let descriptor = host.descriptor();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Rgb(75, 85, 99)))
        .title(format!(" {} ", descriptor.title))
        .title_style(
            Style::default()
                .fg(Color::Rgb(80, 200, 255))
                .add_modifier(Modifier::BOLD),
        );

    let lines = vec![
        Line::from(Span::styled(
            descriptor.description,
            Style::default().fg(Color::Rgb(180, 180, 200)),
        )),
        Line::from(vec![
            Span::styled("Best: ", Style::default().fg(Color::Rgb(140, 140, 160))),
            Span::styled(
                host.best().unwrap_or(0).to_string(),
                Style::default()
                    .fg(Color::Rgb(255, 215, 0))
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(" | Last: ", Style::default().fg(Color::Rgb(140, 140, 160))),
            Span::styled(
                host.last_score().unwrap_or(0).to_string(),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            ),
        ]),
    ];
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Returns the area handed to the module, if one is mounted.
fn render_viewport(frame: &mut Frame, host: &GameHost, area: Rect) -> Option<Rect> {
    let Some(module) = host.module().filter(|_| host.phase() != HostPhase::Idle) else {
        let prompt = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                START_PROMPT,
                Style::default()
                    .fg(Color::Rgb(150, 150, 170))
                    .add_modifier(Modifier::ITALIC),
            )),
        ])
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(Color::Rgb(60, 60, 80))),
        );
        frame.render_widget(prompt, area);
        return None;
    };

    module.render(frame, area);

    if host.phase() == HostPhase::Over {
        let w = 30u16.min(area.width);
        let h = 4u16.min(area.height);
        let banner = Rect::new(
            area.x + (area.width - w) / 2,
            area.y + (area.height - h) / 2,
            w,
            h,
        );
        frame.render_widget(Clear, banner);
        let lost = Paragraph::new(vec![
            Line::from(Span::styled(
                LOST_MESSAGE,
                Style::default()
                    .fg(Color::Rgb(255, 90, 90))
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(vec![
                Span::styled("r", Style::default().fg(Color::Rgb(80, 200, 255))),
                Span::styled(" to restart", Style::default().fg(Color::Rgb(140, 140, 160))),
            ]),
        ])
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .border_style(Style::default().fg(Color::Rgb(255, 90, 90))),
        );
        frame.render_widget(lost, banner);
    }
    Some(area)
}

fn render_hints(frame: &mut Frame, host: &GameHost, area: Rect) {
    let key = |k: &'static str| {
        Span::styled(
            k,
            Style::default()
                .fg(Color::Rgb(80, 200, 255))
                .add_modifier(Modifier::BOLD),
        )
    };
    let text = |t: &'static str| Span::styled(t, Style::default().fg(Color::Rgb(100, 100, 130)));

    let mut spans = vec![key("n/p"), text(" swipe  "), key("r"), text(" restart  ")];
    if host.descriptor().controls.is_empty() {
        spans.extend([key("click/1-9"), text(" pick  ")]);
    } else {
        spans.extend([key("arrows/space"), text(" play  ")]);
    }
    spans.extend([key("q"), text(" quit")]);
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
