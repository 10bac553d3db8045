//! Panels of the dashboard

use geo::{CoordsIter, MultiPolygon, Rect as GeoRect, Simplify};
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::text::{Line, Span};
use ratatui::widgets::canvas::{Canvas, Line as CanvasLine};
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph, Row, Table};
use ratatui::Frame;

use super::state::{Focus, Selectors};
use super::Phase;
use crate::geometry::combined_bounds;
use crate::report::{VALUE_LABEL, NO_DATA_MESSAGE};
use crate::scale::{ColorScale, Palette};
use crate::view::JoinedRecord;

const BORDER: Color = Color::Blue;

/// Status panel showing current phase and info
pub struct StatusPanel {
    phase: Phase,
    info: String,
    error: Option<String>,
}

impl StatusPanel {
    pub fn new() -> Self {
        Self {
            phase: Phase::Fetching,
            info: String::new(),
            error: None,
        }
    }

    pub fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
    }

    pub fn set_info(&mut self, info: impl Into<String>) {
        self.info = info.into();
    }

    pub fn set_error(&mut self, error: Option<String>) {
        self.error = error;
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let phase_style = match self.phase {
            Phase::Ready => Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
            _ => Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        };

        let phase_indicator = match self.phase {
            Phase::Fetching => "↓",
            Phase::LoadingRegions => "◐",
            Phase::Ready => "✓",
        };

        let detail = match &self.error {
            Some(error) => Span::styled(
                error.as_str(),
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
            None => Span::styled(self.info.as_str(), Style::default().fg(Color::Gray)),
        };

        let line = Line::from(vec![
            Span::styled(format!(" {} ", phase_indicator), phase_style),
            Span::styled(self.phase.to_string(), phase_style),
            Span::raw("   "),
            detail,
        ]);

        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Loomulik iive Eesti maakondades ")
            .border_style(Style::default().fg(BORDER));

        frame.render_widget(Paragraph::new(line).block(block), area);
    }
}

/// One line with the four selectors; the focused one is highlighted
pub fn render_selectors(selectors: &Selectors, frame: &mut Frame, area: Rect) {
    let entry = |focus: Focus, label: &str, value: String| {
        let style = if selectors.focus() == focus {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        vec![
            Span::styled(format!(" {}: ", label), Style::default().fg(Color::Gray)),
            Span::styled(format!("◂ {} ▸", value), style),
            Span::raw("  "),
        ]
    };

    let year = selectors
        .year()
        .map(|y| y.to_string())
        .unwrap_or_else(|| "-".to_string());

    let mut spans = Vec::new();
    spans.extend(entry(Focus::Year, "Vali aasta", year));
    spans.extend(entry(Focus::Gender, "Sugu", selectors.gender().to_string()));
    spans.extend(entry(
        Focus::Region,
        "Vali maakond",
        selectors.region_label().to_string(),
    ));
    spans.extend(entry(Focus::Palette, "Värvid", selectors.palette().to_string()));

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Tab: vali  ←/→: muuda  q: välju ")
        .border_style(Style::default().fg(BORDER));

    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

/// Data table sorted by county name
pub fn render_table(records: &[JoinedRecord<'_>], frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Andmetabel valitud aasta kohta ")
        .border_style(Style::default().fg(BORDER));

    if records.is_empty() {
        let warning = Paragraph::new(NO_DATA_MESSAGE)
            .style(Style::default().fg(Color::Yellow))
            .block(block);
        frame.render_widget(warning, area);
        return;
    }

    let rows: Vec<Row> = records
        .iter()
        .enumerate()
        .map(|(i, r)| {
            Row::new(vec![
                (i + 1).to_string(),
                r.region_name.clone(),
                r.natural_increase_total.to_string(),
            ])
        })
        .collect();

    let header = Row::new(vec!["", "Maakond", VALUE_LABEL])
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));

    let table = Table::new(
        rows,
        [
            Constraint::Length(3),
            Constraint::Min(12),
            Constraint::Length(14),
        ],
    )
    .header(header)
    .block(block);

    frame.render_widget(table, area);
}

/// Polygon outlines of the view coloured by value
pub struct MapPanel<'a> {
    pub title: String,
    pub records: &'a [JoinedRecord<'a>],
    pub scale: Option<ColorScale>,
    pub palette: Palette,
}

impl MapPanel<'_> {
    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} ", self.title))
            .border_style(Style::default().fg(BORDER));

        let (Some(scale), Some(bounds)) = (
            self.scale,
            combined_bounds(self.records.iter().map(|r| r.geometry)),
        ) else {
            frame.render_widget(Paragraph::new("").block(block), area);
            return;
        };

        let inner = block.inner(area);
        let (x_bounds, y_bounds) = fit_bounds(bounds, inner.width, inner.height);
        let epsilon = (x_bounds[1] - x_bounds[0]) / (inner.width.max(1) as f64 * 4.0);

        let segments: Vec<CanvasLine> = self
            .records
            .iter()
            .flat_map(|record| {
                let (r, g, b) = self
                    .palette
                    .color_at(scale.normalize(record.natural_increase_total));
                outline_segments(record.geometry, epsilon, Color::Rgb(r, g, b))
            })
            .collect();

        let canvas = Canvas::default()
            .block(block)
            .marker(Marker::Braille)
            .x_bounds(x_bounds)
            .y_bounds(y_bounds)
            .paint(|ctx| {
                for segment in &segments {
                    ctx.draw(segment);
                }
            });

        frame.render_widget(canvas, area);
    }
}

fn outline_segments(geometry: &MultiPolygon<f64>, epsilon: f64, color: Color) -> Vec<CanvasLine> {
    let simplified = geometry.simplify(&epsilon);
    let mut segments = Vec::with_capacity(simplified.coords_count());
    for polygon in &simplified {
        for ring in std::iter::once(polygon.exterior()).chain(polygon.interiors()) {
            for line in ring.lines() {
                segments.push(CanvasLine::new(
                    line.start.x,
                    line.start.y,
                    line.end.x,
                    line.end.y,
                    color,
                ));
            }
        }
    }
    segments
}

/// Widen one axis of `bounds` so map units are square on a braille canvas
/// of `width` x `height` cells (2 x 4 dots per cell).
pub fn fit_bounds(bounds: GeoRect<f64>, width: u16, height: u16) -> ([f64; 2], [f64; 2]) {
    let (min, max) = (bounds.min(), bounds.max());
    let mut x = [min.x, max.x];
    let mut y = [min.y, max.y];

    let dots_w = (width.max(1) as f64) * 2.0;
    let dots_h = (height.max(1) as f64) * 4.0;
    let span_x = (max.x - min.x).max(f64::EPSILON);
    let span_y = (max.y - min.y).max(f64::EPSILON);

    if span_x / span_y < dots_w / dots_h {
        let wanted = span_y * dots_w / dots_h;
        let pad = (wanted - span_x) / 2.0;
        x = [min.x - pad, max.x + pad];
    } else {
        let wanted = span_x * dots_h / dots_w;
        let pad = (wanted - span_y) / 2.0;
        y = [min.y - pad, max.y + pad];
    }
    (x, y)
}

/// Colour bar from the scale minimum to its maximum
pub fn render_legend(scale: Option<ColorScale>, palette: Palette, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", VALUE_LABEL))
        .border_style(Style::default().fg(BORDER));

    let Some(scale) = scale else {
        frame.render_widget(Paragraph::new("").block(block), area);
        return;
    };

    let min_label = format!(" {} ", scale.min);
    let max_label = format!(" {} ", scale.max);
    let steps = (area.width as usize)
        .saturating_sub(2 + min_label.len() + max_label.len())
        .max(1);

    let mut spans = vec![Span::raw(min_label)];
    for i in 0..steps {
        let t = if steps == 1 { 0.5 } else { i as f64 / (steps - 1) as f64 };
        let (r, g, b) = palette.color_at(t);
        spans.push(Span::styled("█", Style::default().fg(Color::Rgb(r, g, b))));
    }
    spans.push(Span::raw(max_label));

    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

/// Log panel showing scrollable history
pub struct LogPanel {
    entries: Vec<String>,
    max_entries: usize,
}

impl LogPanel {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            max_entries: 100,
        }
    }

    pub fn add(&mut self, message: impl Into<String>) {
        self.entries.push(message.into());
        if self.entries.len() > self.max_entries {
            self.entries.remove(0);
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Tegevused ")
            .border_style(Style::default().fg(BORDER));

        let visible_height = area.height.saturating_sub(2) as usize; // -2 for borders
        let start = self.entries.len().saturating_sub(visible_height);

        let items: Vec<ListItem> = self.entries[start..]
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                let style = if i == self.entries.len() - start - 1 {
                    Style::default().fg(Color::White)
                } else {
                    Style::default().fg(Color::DarkGray)
                };
                ListItem::new(Span::styled(format!(" {}", entry), style))
            })
            .collect();

        frame.render_widget(List::new(items).block(block), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{coord, polygon};

    #[test]
    fn test_fit_bounds_widens_x() {
        let bounds = GeoRect::new(coord! { x: 0.0, y: 0.0 }, coord! { x: 10.0, y: 10.0 });
        // 40x10 cells = 80x40 dots, twice as wide as tall
        let (x, y) = fit_bounds(bounds, 40, 10);
        assert_eq!(y, [0.0, 10.0]);
        assert_eq!(x, [-5.0, 15.0]);
    }

    #[test]
    fn test_fit_bounds_widens_y() {
        let bounds = GeoRect::new(coord! { x: 0.0, y: 0.0 }, coord! { x: 20.0, y: 5.0 });
        let (x, y) = fit_bounds(bounds, 10, 10);
        assert_eq!(x, [0.0, 20.0]);
        // 20x40 dots needs a span of 40 on y
        assert_eq!(y, [-17.5, 22.5]);
    }

    #[test]
    fn test_outline_segments_closed_ring() {
        let square = MultiPolygon::new(vec![polygon![
            (x: 0.0, y: 0.0),
            (x: 1.0, y: 0.0),
            (x: 1.0, y: 1.0),
            (x: 0.0, y: 1.0),
        ]]);
        let segments = outline_segments(&square, 0.0, Color::Red);
        assert_eq!(segments.len(), 4);
        assert_eq!(segments[0].color, Color::Red);
        assert_eq!((segments[3].x2, segments[3].y2), (0.0, 0.0));
    }

    #[test]
    fn test_log_panel_caps_entries() {
        let mut log = LogPanel::new();
        for i in 0..150 {
            log.add(format!("entry {}", i));
        }
        assert_eq!(log.entries.len(), 100);
        assert_eq!(log.entries[0], "entry 50");
    }
}
