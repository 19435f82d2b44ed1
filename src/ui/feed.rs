use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::app::App;
use crate::host::{GameHost, HostPhase};

const CURRENT: Color = Color::Rgb(255, 220, 80);
const RUNNING: Color = Color::Rgb(150, 150, 170);
const UNSEEN: Color = Color::Rgb(70, 70, 90);
const LOST: Color = Color::Rgb(200, 90, 90);

/// One feed entry. Games not mounted yet are dimmed, lost ones are marked.
pub fn feed_entry(host: &GameHost, current: bool) -> Line<'static> {
    let title = host.descriptor().title;
    let (text, color) = match host.phase() {
        HostPhase::Idle => (title.to_string(), UNSEEN),
        HostPhase::Running => (title.to_string(), RUNNING),
        HostPhase::Over => (format!("✗ {title}"), LOST),
    };
    let style = if current {
        Style::default().fg(CURRENT).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(color)
    };
    Line::from(Span::styled(text, style))
}

/// Feed header: every game, the one on screen highlighted, position on the
/// right.
pub fn render_feed(frame: &mut Frame, app: &App, area: Rect) {
    let current = app.current_index();
    let entries: Vec<Line> = app
        .hosts()
        .iter()
        .enumerate()
        .map(|(i, host)| feed_entry(host, i == current))
        .collect();

    let header = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(Style::default().fg(Color::Rgb(60, 150, 200)))
        .title(Span::styled(
            "▲▼ swipecade ",
            Style::default()
                .fg(Color::Rgb(200, 120, 255))
                .add_modifier(Modifier::BOLD),
        ))
        .title(
            Line::from(Span::styled(
                format!(" {}/{} ", current + 1, app.hosts().len()),
                Style::default().fg(CURRENT),
            ))
            .right_aligned(),
        );

    let feed = Tabs::new(entries)
        .block(header)
        .select(current)
        .highlight_style(Style::default().add_modifier(Modifier::UNDERLINED))
        .divider(Span::styled(" · ", Style::default().fg(UNSEEN)));

    frame.render_widget(feed, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry;
    use crate::scores::{shared, BestScores, MemoryStore};

    fn host(id: &str) -> GameHost {
        let descriptor = registry::find(id).unwrap();
        GameHost::new(descriptor, BestScores::new(shared(MemoryStore::new())), 1, 250)
    }

    fn color(line: &Line) -> Option<Color> {
        line.spans[0].style.fg
    }

    #[test]
    fn unmounted_games_are_dimmed() {
        let idle = host("snake");
        assert_eq!(color(&feed_entry(&idle, false)), Some(UNSEEN));

        let mut running = host("snake");
        running.set_visible(true);
        assert_eq!(color(&feed_entry(&running, false)), Some(RUNNING));
        assert_eq!(color(&feed_entry(&running, true)), Some(CURRENT));
    }

    #[test]
    fn lost_games_are_marked() {
        let mut lost = host("reaction");
        lost.set_visible(true);
        lost.report_game_over(4);
        let line = feed_entry(&lost, false);
        assert_eq!(line.spans[0].content, "✗ Reaction Time");
        assert_eq!(color(&line), Some(LOST));
    }
}
