use crate::{
    background::{Scene, WAVE_LAYERS},
    command::HELP_LINES,
    message::{MessageKind, StatusMessage},
    styles,
};
use anyhow::Result;
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Margin, Position, Rect},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        Block, Borders, Clear, Paragraph, Tabs, Wrap,
        canvas::{Canvas, Circle, Line as CanvasLine, Points},
    },
};
use std::{io::Stdout, rc::Rc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Html,
    Css,
    Js,
    Resources,
    Preview,
}

impl Tab {
    pub const ALL: [Tab; 5] = [Tab::Html, Tab::Css, Tab::Js, Tab::Resources, Tab::Preview];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn title(self) -> &'static str {
        match self {
            Tab::Html => "HTML",
            Tab::Css => "CSS",
            Tab::Js => "JavaScript",
            Tab::Resources => "Resources",
            Tab::Preview => "Preview",
        }
    }

    pub fn next(self) -> Tab {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Tab {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    /// F1..F5.
    pub fn from_function_key(n: u8) -> Option<Tab> {
        (1..=Self::ALL.len() as u8)
            .contains(&n)
            .then(|| Self::ALL[n as usize - 1])
    }
}

/// Everything one frame needs, captured before drawing.
pub struct ViewSnap<'a> {
    pub input: &'a str,
    pub input_cursor: usize,
    pub input_invalid: bool,
    pub busy: bool,
    pub spinner: &'static str,
    pub tab: Tab,
    /// Revealed text of the active panel; `None` while there is no result.
    pub panel: Option<&'a str>,
    pub scroll: u16,
    pub target: Option<&'a str>,
    pub message: Option<&'a StatusMessage>,
    pub show_help: bool,
    pub scene: &'a Scene,
}

/// Draw a frame and return the body area, which is also the background's
/// viewport.
pub fn draw(term: &mut Terminal<CrosstermBackend<Stdout>>, snap: &ViewSnap<'_>) -> Result<Rect> {
    let mut body_inner = Rect::default();
    term.draw(|frame| {
        body_inner = render(frame, snap);
    })?;
    Ok(body_inner)
}

fn split(area: Rect) -> Rc<[Rect]> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(area)
}

/// Inner body area for a terminal of size `area`, before anything is drawn.
pub fn body_area(area: Rect) -> Rect {
    split(area)[4].inner(Margin::new(1, 1))
}

fn render(frame: &mut Frame<'_>, snap: &ViewSnap<'_>) -> Rect {
    let layout = split(frame.area());

    let header = Paragraph::new(Line::from(vec![
        Span::styled(" Clonify ", styles::title()),
        Span::styled("clone any website's HTML, CSS and JavaScript", styles::dim()),
    ]));
    frame.render_widget(header, layout[0]);

    // Input
    let border = if snap.input_invalid {
        styles::border_invalid()
    } else {
        styles::border()
    };
    let input_title = if snap.busy {
        format!(" Website URL  {} Cloning… ", snap.spinner)
    } else {
        " Website URL ".to_string()
    };
    let (offset, caret) = input_window(
        layout[1].width.saturating_sub(2),
        visual_caret_col(snap.input, snap.input_cursor),
    );
    let input_box = Paragraph::new(snap.input)
        .scroll((0, offset))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border)
                .title(input_title),
        );
    frame.render_widget(Clear, layout[1]);
    frame.render_widget(input_box, layout[1]);
    frame.set_cursor_position(Position {
        x: layout[1].x.saturating_add(1).saturating_add(caret),
        y: layout[1].y.saturating_add(1),
    });

    if let Some(msg) = snap.message {
        let style = match msg.kind {
            MessageKind::Error => styles::error(),
            MessageKind::Success => styles::success(),
            MessageKind::Info => styles::info(),
        };
        let mark = match msg.kind {
            MessageKind::Error => "× ",
            MessageKind::Success => "✓ ",
            MessageKind::Info => "• ",
        };
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(format!(" {mark}{}", msg.text), style))),
            layout[2],
        );
    }

    let titles = Tab::ALL
        .iter()
        .enumerate()
        .map(|(i, t)| Line::from(format!(" F{} {} ", i + 1, t.title())));
    let tabs = Tabs::new(titles)
        .select(snap.tab.index())
        .style(styles::tab_inactive())
        .highlight_style(styles::tab_active())
        .divider(Span::styled("│", styles::dim()));
    frame.render_widget(tabs, layout[3]);

    // Body
    let body_block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border())
        .title(match snap.panel {
            Some(_) => format!(" {} ", snap.tab.title()),
            None => " Enter a URL and press Enter ".to_string(),
        });
    let body_inner = body_block.inner(layout[4]);
    match snap.panel {
        Some(text) => {
            let panel = Paragraph::new(text)
                .style(styles::code())
                .block(body_block)
                .wrap(Wrap { trim: false })
                .scroll((snap.scroll, 0));
            frame.render_widget(panel, layout[4]);
        }
        None => {
            frame.render_widget(body_block, layout[4]);
            draw_scene(frame, body_inner, snap.scene);
        }
    }

    let status = Line::from(vec![
        Span::raw(" "),
        if snap.busy {
            Span::styled(format!("{} Cloning…", snap.spinner), styles::busy())
        } else {
            Span::styled("Ready", styles::idle())
        },
        Span::styled(
            snap.target.map(|t| format!(" • {t}")).unwrap_or_default(),
            styles::dim(),
        ),
        Span::styled(
            " • Tab/F1-F5 panels • Ctrl+D download • /help",
            styles::dim(),
        ),
    ]);
    frame.render_widget(Paragraph::new(status), layout[5]);

    if snap.show_help {
        draw_help(frame, layout[4]);
    }

    body_inner
}

fn draw_scene(frame: &mut Frame<'_>, area: Rect, scene: &Scene) {
    let (w, h) = scene.size();
    // Scene y grows downwards, canvas y upwards.
    let flip = |y: f64| h - y;
    let canvas = Canvas::default()
        .marker(Marker::Braille)
        .x_bounds([0.0, w])
        .y_bounds([0.0, h])
        .paint(|ctx| {
            for layer in 0..WAVE_LAYERS {
                let pts = scene.wave(layer);
                for seg in pts.windows(2) {
                    ctx.draw(&CanvasLine::new(
                        seg[0].0,
                        flip(seg[0].1),
                        seg[1].0,
                        flip(seg[1].1),
                        styles::palette(0, 0.1),
                    ));
                }
            }
            ctx.layer();

            for shape in scene.shapes() {
                let color = styles::palette(shape.color, shape.opacity);
                let vertices = shape.vertices();
                if vertices.is_empty() {
                    ctx.draw(&Circle {
                        x: shape.x,
                        y: flip(shape.y),
                        radius: shape.size,
                        color,
                    });
                    continue;
                }
                for (i, a) in vertices.iter().enumerate() {
                    let b = vertices[(i + 1) % vertices.len()];
                    ctx.draw(&CanvasLine::new(a.0, flip(a.1), b.0, flip(b.1), color));
                }
            }
            ctx.layer();

            for c in scene.connections() {
                ctx.draw(&CanvasLine::new(
                    c.from.0,
                    flip(c.from.1),
                    c.to.0,
                    flip(c.to.1),
                    styles::palette(0, c.opacity),
                ));
            }
            for p in scene.particles() {
                ctx.draw(&Circle {
                    x: p.x,
                    y: flip(p.y),
                    radius: p.current_size.max(0.5),
                    color: styles::palette(p.color, p.opacity),
                });
            }
            ctx.layer();

            if scene.pointer().is_some() {
                for t in scene.trail() {
                    ctx.draw(&Points {
                        coords: &[(t.x, flip(t.y))],
                        color: styles::palette(2, t.opacity),
                    });
                }
            }
        });
    frame.render_widget(canvas, area);
}

fn draw_help(frame: &mut Frame<'_>, over: Rect) {
    let width = over.width.min(64);
    let height = (HELP_LINES.len() as u16 + 2).min(over.height);
    let area = Rect {
        x: over.x + (over.width - width) / 2,
        y: over.y + (over.height - height) / 2,
        width,
        height,
    };
    let lines: Vec<Line> = HELP_LINES
        .iter()
        .map(|(keys, what)| {
            Line::from(vec![
                Span::styled(format!(" {keys:<24}"), styles::title()),
                Span::raw(*what),
            ])
        })
        .collect();
    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(styles::border())
                .title(" Help "),
        ),
        area,
    );
}

fn visual_caret_col(input: &str, cursor: usize) -> usize {
    use unicode_width::UnicodeWidthStr;
    UnicodeWidthStr::width(&input[..cursor])
}

/// Horizontal scroll of the input line and the caret column inside a box
/// `inner` cells wide, keeping the caret on screen.
fn input_window(inner: u16, caret_col: usize) -> (u16, u16) {
    let last = inner.saturating_sub(1) as usize;
    let offset = caret_col.saturating_sub(last);
    let offset = u16::try_from(offset).unwrap_or(u16::MAX);
    let caret = u16::try_from(caret_col.min(last)).unwrap_or(u16::MAX);
    (offset, caret)
}

/// Rows `text` takes in a panel `width` cells wide once wrapped.
pub fn wrapped_rows(text: &str, width: u16) -> usize {
    Paragraph::new(text)
        .wrap(Wrap { trim: false })
        .line_count(width.max(1))
}

/// Map a terminal cell inside `area` to the centre of its braille block.
pub fn cell_to_dots(area: Rect, col: u16, row: u16) -> Option<(f64, f64)> {
    if !area.contains(Position { x: col, y: row }) {
        return None;
    }
    let x = (col - area.x) as f64 * 2.0 + 1.0;
    let y = (row - area.y) as f64 * 4.0 + 2.0;
    Some((x, y))
}

/// Viewport of the background for a body area, in dots.
pub fn dots_for(area: Rect) -> (f64, f64) {
    (area.width as f64 * 2.0, area.height as f64 * 4.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tabs_cycle_both_ways() {
        assert_eq!(Tab::Html.next(), Tab::Css);
        assert_eq!(Tab::Preview.next(), Tab::Html);
        assert_eq!(Tab::Html.prev(), Tab::Preview);
        assert_eq!(Tab::Resources.prev(), Tab::Js);
    }

    #[test]
    fn function_keys_select_tabs() {
        assert_eq!(Tab::from_function_key(1), Some(Tab::Html));
        assert_eq!(Tab::from_function_key(5), Some(Tab::Preview));
        assert_eq!(Tab::from_function_key(0), None);
        assert_eq!(Tab::from_function_key(6), None);
    }

    #[test]
    fn cells_map_to_braille_centres() {
        let area = Rect::new(2, 5, 10, 4);
        assert_eq!(cell_to_dots(area, 2, 5), Some((1.0, 2.0)));
        assert_eq!(cell_to_dots(area, 11, 8), Some((19.0, 14.0)));
        assert_eq!(cell_to_dots(area, 12, 5), None);
        assert_eq!(cell_to_dots(area, 1, 5), None);
        assert_eq!(dots_for(area), (20.0, 16.0));
    }

    #[test]
    fn body_area_matches_layout() {
        let body = body_area(Rect::new(0, 0, 80, 24));
        // header 1 + input 3 + message 1 + tabs 1, then the body border.
        assert_eq!(body, Rect::new(1, 7, 78, 15));
    }

    #[test]
    fn caret_counts_display_width() {
        assert_eq!(visual_caret_col("aé界b", "aé界".len()), 4);
    }

    #[test]
    fn long_input_scrolls_to_keep_the_caret_inside() {
        assert_eq!(input_window(20, 5), (0, 5));
        assert_eq!(input_window(20, 19), (0, 19));
        assert_eq!(input_window(20, 25), (6, 19));
        let huge = "x".repeat(100_000);
        let (offset, caret) = input_window(20, visual_caret_col(&huge, huge.len()));
        assert_eq!(caret, 19);
        assert_eq!(offset, u16::MAX);
        assert_eq!(input_window(0, 3), (3, 0));
    }

    #[test]
    fn wrapped_rows_count_long_lines() {
        assert_eq!(wrapped_rows("a\nb\nc", 10), 3);
        assert!(wrapped_rows(&"word ".repeat(100), 10) > 30);
    }
}
