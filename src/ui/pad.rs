//! On-screen control pad derived from a game's declared controls.

use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::controls::{ControlId, ControlLayout};

const BUTTON_H: u16 = 3;

/// Rows needed to draw the pad.
pub fn pad_height(layout: &ControlLayout) -> u16 {
    match layout {
        ControlLayout::None => 0,
        ControlLayout::DPad(pad) if pad.up && (pad.left || pad.down || pad.right) => BUTTON_H * 2,
        _ => BUTTON_H,
    }
}

fn split_row(area: Rect, n: usize) -> Vec<Rect> {
    if n == 0 {
        return Vec::new();
    }
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![Constraint::Ratio(1, n as u32); n])
        .split(area)
        .to_vec()
}

/// Where each button goes inside `area`, in the layout's visual order.
pub fn button_rects(layout: &ControlLayout, area: Rect) -> Vec<(ControlId, Rect)> {
    let buttons = layout.buttons();
    match layout {
        ControlLayout::None => Vec::new(),
        ControlLayout::Single(control) => {
            let w = (area.width / 2).max(12).min(area.width);
            let x = area.x + (area.width - w) / 2;
            vec![(*control, Rect::new(x, area.y, w, BUTTON_H.min(area.height)))]
        }
        ControlLayout::DPad(pad) => {
            let col_w = (area.width / 3).max(1);
            let cell = |col: u16, row: u16| {
                Rect::new(
                    area.x + col * col_w,
                    area.y + row * BUTTON_H,
                    col_w,
                    BUTTON_H,
                )
                .intersection(area)
            };
            // Up sits above Down when both are present; otherwise one row.
            let bottom = u16::from(pad.up && (pad.left || pad.down || pad.right));
            buttons
                .into_iter()
                .map(|c| {
                    let rect = match c {
                        ControlId::Up => cell(1, 0),
                        ControlId::Left => cell(0, bottom),
                        ControlId::Down => cell(1, bottom),
                        _ => cell(2, bottom),
                    };
                    (c, rect)
                })
                .collect()
        }
        ControlLayout::LeftRight | ControlLayout::Fallback(_) => {
            let row = Rect {
                height: BUTTON_H.min(area.height),
                ..area
            };
            buttons.iter().copied().zip(split_row(row, buttons.len())).collect()
        }
    }
}

/// Draw the pad and return the button geometry for hit testing.
pub fn render_pad(
    frame: &mut Frame,
    area: Rect,
    layout: &ControlLayout,
    last_control: Option<ControlId>,
) -> Vec<(ControlId, Rect)> {
    let rects = button_rects(layout, area);
    for (control, rect) in &rects {
        let lit = last_control == Some(*control);
        let (fg, border) = if lit {
            (Color::Rgb(255, 220, 80), Color::Rgb(255, 220, 80))
        } else {
            (Color::Rgb(229, 231, 235), Color::Rgb(75, 85, 99))
        };
        let button = Paragraph::new(control.label(layout))
            .alignment(Alignment::Center)
            .style(Style::default().fg(fg).add_modifier(Modifier::BOLD))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(Style::default().fg(border)),
            );
        frame.render_widget(button, *rect);
    }
    rects
}

#[cfg(test)]
mod tests {
    use super::*;
    use ControlId::*;

    const AREA: Rect = Rect {
        x: 0,
        y: 20,
        width: 30,
        height: 6,
    };

    #[test]
    fn no_controls_no_pad() {
        let layout = ControlLayout::for_controls(&[]);
        assert_eq!(pad_height(&layout), 0);
        assert!(button_rects(&layout, AREA).is_empty());
    }

    #[test]
    fn left_right_split_the_row() {
        let layout = ControlLayout::for_controls(&[Left, Right]);
        let rects = button_rects(&layout, AREA);
        assert_eq!(rects.len(), 2);
        assert_eq!(rects[0].0, Left);
        assert_eq!(rects[0].1, Rect::new(0, 20, 15, 3));
        assert_eq!(rects[1].1, Rect::new(15, 20, 15, 3));
    }

    #[test]
    fn dpad_puts_up_above_down() {
        let layout = ControlLayout::for_controls(&[Up, Down, Left, Right]);
        assert_eq!(pad_height(&layout), 6);
        let rects = button_rects(&layout, AREA);
        let up = rects.iter().find(|(c, _)| *c == Up).unwrap().1;
        let down = rects.iter().find(|(c, _)| *c == Down).unwrap().1;
        assert_eq!(up.x, down.x);
        assert!(up.y < down.y);
    }

    #[test]
    fn buttons_never_overlap() {
        for controls in [
            vec![Tap],
            vec![Left, Right],
            vec![Up, Down, Left, Right],
            vec![Left, Down, Right],
            vec![Tap, Action, Up],
        ] {
            let layout = ControlLayout::for_controls(&controls);
            let rects = button_rects(&layout, AREA);
            for (i, (_, a)) in rects.iter().enumerate() {
                assert!(AREA.contains(a.as_position()));
                for (_, b) in &rects[i + 1..] {
                    assert!(!a.intersects(*b), "{controls:?}");
                }
            }
        }
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn every_declared_button_is_placed_inside_the_pad(
                mask in 1u8..64,
                width in 12u16..120,
            ) {
                let controls: Vec<ControlId> = ControlId::ALL
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| mask & (1 << i) != 0)
                    .map(|(_, c)| *c)
                    .collect();
                let layout = ControlLayout::for_controls(&controls);
                let area = Rect::new(2, 10, width, pad_height(&layout));
                let rects = button_rects(&layout, area);

                prop_assert_eq!(rects.len(), controls.len());
                for (i, (control, a)) in rects.iter().enumerate() {
                    prop_assert!(controls.contains(control));
                    prop_assert_eq!(a.intersection(area), *a);
                    for (_, b) in &rects[i + 1..] {
                        prop_assert!(!a.intersects(*b));
                    }
                }
            }
        }
    }
}
