use crate::app::{App, FOOTER_HEIGHT, PANEL_WIDTH};
use crate::braille::BrailleCanvas;
use crate::engine::{BadgedLabel, Normalization};
use crate::map::MapLayers;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
    Frame,
};

const ACCENT: Color = Color::Rgb(148, 0, 211);

/// Render the UI
pub fn render(frame: &mut Frame, app: &App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(FOOTER_HEIGHT - 1), Constraint::Length(1)])
        .split(frame.area());

    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(10), Constraint::Length(PANEL_WIDTH)])
        .split(rows[0]);

    render_map(frame, app, top[0]);
    render_panel(frame, app, top[1]);
    render_slider(frame, app, rows[1]);
    render_status_bar(frame, app, rows[2]);
}

fn render_map(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            " Coronavirus outbreak in the world ",
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        ));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    // Braille gives 2x4 resolution per character
    let mut viewport = app.viewport.clone();
    viewport.width = inner.width as usize * 2;
    viewport.height = inner.height as usize * 4;

    let layers = app
        .map_renderer
        .render(inner.width as usize, inner.height as usize, &viewport, &app.params);

    frame.render_widget(
        MapWidget {
            layers,
            color: app.params.color.rgb,
        },
        inner,
    );
}

/// Braille basemap with shaded markers on top
struct MapWidget {
    layers: MapLayers,
    color: (u8, u8, u8),
}

impl MapWidget {
    /// Foreground for a marker cell: the metric color dimmed by opacity
    fn shaded(&self, shade: f32) -> Color {
        let factor = 0.3 + 0.7 * shade.clamp(0.0, 1.0);
        let (r, g, b) = self.color;
        let dim = |c: u8| (c as f32 * factor).round() as u8;
        Color::Rgb(dim(r), dim(g), dim(b))
    }

    fn draw(canvas: &BrailleCanvas, area: Rect, buf: &mut Buffer, fg: impl Fn(f32) -> Color) {
        for (col, row, ch, shade) in canvas.cells() {
            if col >= area.width || row >= area.height {
                continue;
            }
            buf[(area.x + col, area.y + row)].set_char(ch).set_fg(fg(shade));
        }
    }
}

impl Widget for MapWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Self::draw(&self.layers.coastlines, area, buf, |_| Color::DarkGray);
        Self::draw(&self.layers.markers, area, buf, |shade| self.shaded(shade));
    }
}

fn badged_line(label: &BadgedLabel, width: usize) -> Line<'static> {
    let gap = width.saturating_sub(label.text.chars().count() + label.badge.chars().count() + 1);
    Line::from(vec![
        Span::styled(label.text.clone(), Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD)),
        Span::raw(" ".repeat(gap.max(1))),
        Span::styled(label.badge.clone(), Style::default().fg(Color::White).bg(ACCENT)),
    ])
}

fn toggle_line(key: &str, label: &str, on: bool) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("[{key}] "), Style::default().fg(Color::DarkGray)),
        Span::styled(
            if on { "● " } else { "○ " },
            Style::default().fg(if on { Color::Green } else { Color::DarkGray }),
        ),
        Span::raw(label.to_string()),
    ])
}

fn render_panel(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner_width = block.inner(area).width as usize;

    let params = &app.params;
    let labels = &params.labels;
    let muted = Style::default().fg(Color::Gray);
    let (r, g, b) = params.color.rgb;

    let mut lines = vec![
        Line::from(Span::styled(
            labels.date.clone(),
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        )),
        Line::default(),
        badged_line(&labels.cases, inner_width),
        Line::from(Span::styled(labels.per_capita.clone(), muted)),
        badged_line(&labels.deaths, inner_width),
        Line::from(Span::styled(labels.death_rate.clone(), muted)),
        Line::from(Span::styled(BadgedLabel::BADGE_TOOLTIP, Style::default().fg(Color::DarkGray))),
        Line::default(),
        Line::from(vec![
            Span::styled("[m] ", Style::default().fg(Color::DarkGray)),
            Span::styled("■ ", Style::default().fg(Color::Rgb(r, g, b))),
            Span::styled(
                app.selection.metric.label(),
                Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
            ),
        ]),
        toggle_line(
            "c",
            app.selection.metric.rate_toggle_label(),
            app.selection.normalization == Normalization::Rate,
        ),
        toggle_line("p", "Exclude Population < 300K", app.selection.population_filter),
        Line::default(),
    ];

    if params.degenerate_scale() {
        lines.push(Line::from(Span::styled(
            "No values to scale markers against",
            Style::default().fg(Color::Yellow),
        )));
    }

    match app.hovered_marker() {
        Some(marker) => {
            for (i, text) in params.hover_lines(marker).into_iter().enumerate() {
                let style = if i == 0 {
                    Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
                } else {
                    muted
                };
                lines.push(Line::from(Span::styled(text, style)));
            }
        }
        None => lines.push(Line::from(Span::styled(
            format!("{} countries shown", params.markers.len()),
            Style::default().fg(Color::DarkGray),
        ))),
    }

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Day slider: a track with month marks and the selected day as a knob
fn render_slider(frame: &mut Frame, app: &App, area: Rect) {
    let width = area.width.saturating_sub(2) as usize;
    if width == 0 || area.height == 0 {
        return;
    }
    let total = app.total_days().max(1) as usize;
    let position = |offset: u32| offset as usize * (width - 1) / total;

    let mut track: Vec<char> = vec!['─'; width];
    let mut marks: Vec<char> = vec![' '; width];
    for (offset, label) in &app.slider_marks {
        let x = position(*offset);
        track[x] = '┼';
        for (i, ch) in label.chars().enumerate() {
            if let Some(slot) = marks.get_mut(x + i) {
                *slot = ch;
            }
        }
    }
    let knob = position(app.selection.day_offset);

    let before: String = track[..knob].iter().collect();
    let after: String = track[knob + 1..].iter().collect();
    let lines = vec![
        Line::from(vec![
            Span::raw(" "),
            Span::styled(before, Style::default().fg(ACCENT)),
            Span::styled("●", Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)),
            Span::styled(after, Style::default().fg(Color::DarkGray)),
        ]),
        Line::from(Span::styled(
            format!(" {}", marks.iter().collect::<String>()),
            Style::default().fg(Color::DarkGray),
        )),
    ];
    frame.render_widget(Paragraph::new(lines), area);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let status = Line::from(vec![
        Span::styled(" Zoom: ", Style::default().fg(Color::DarkGray)),
        Span::styled(app.zoom_level(), Style::default().fg(Color::Yellow)),
        Span::styled(" | ", Style::default().fg(Color::DarkGray)),
        Span::styled(app.center_coords(), Style::default().fg(Color::Cyan)),
        Span::styled(
            " | m:metric c:rate p:pop ←/→:day hjkl:pan +/-:zoom q:quit",
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    frame.render_widget(Paragraph::new(status), area);
}
