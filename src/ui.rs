pub mod preview;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Gauge, Paragraph, Widget},
};
use unicode_width::UnicodeWidthStr;

use crate::session::Phase;
use crate::setup::{Field, SetupForm};
use crate::{App, AppState, SessionView};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 2;

/// Width of the centered setup form column
const FORM_WIDTH: u16 = 46;
/// Label column inside the form; values start right after it
const LABEL_WIDTH: usize = 30;

/// Glyph grid of the oversized countdown digits
const DIGIT_ROWS: usize = 5;

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match &self.state {
            AppState::Setup(form) => render_setup(form, area, buf),
            AppState::Session(view) => render_session(view, area, buf),
            AppState::Summary => render_summary(area, buf),
        }
    }
}

fn render_setup(form: &SetupForm, area: Rect, buf: &mut Buffer) {
    // styles
    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let focus_style = Style::default().patch(bold_style).fg(Color::Yellow);
    let green_bold_style = Style::default().patch(bold_style).fg(Color::Green);
    let dim_style = Style::default().add_modifier(Modifier::DIM);
    let red_style = Style::default().fg(Color::Red);
    let italic_style = Style::default().add_modifier(Modifier::ITALIC);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Min(1),    // form
            Constraint::Length(1), // padding
            Constraint::Length(1), // legend
        ])
        .split(area);

    let mut lines = vec![
        Line::from(Span::styled("Sketch Anything", green_bold_style)).alignment(Alignment::Center),
        Line::from(""),
        match &form.error {
            Some(error) => {
                Line::from(Span::styled(error.as_str(), red_style)).alignment(Alignment::Center)
            }
            None => Line::from(""),
        },
        Line::from(""),
    ];

    let fields = [
        (Field::Category, "Category"),
        (Field::Duration, "Duration (seconds per image)"),
        (Field::Count, "Number of Images"),
    ];

    for (field, label) in fields {
        let focused = form.focus == field;
        let value = match field {
            Field::Category => match form.selected_category() {
                Some(name) if focused => Span::styled(format!("< {} >", name), focus_style),
                Some(name) => Span::raw(name),
                None if focused => Span::styled("(none)", focus_style),
                None => Span::styled("(none)", dim_style),
            },
            Field::Duration | Field::Count => {
                let input = match field {
                    Field::Duration => &form.duration_input,
                    _ => &form.count_input,
                };
                if focused {
                    Span::styled(format!("{}_", input), focus_style)
                } else {
                    Span::raw(input.as_str())
                }
            }
        };

        lines.push(Line::from(vec![
            Span::styled(format!("{:<width$}", label, width = LABEL_WIDTH), dim_style),
            value,
        ]));
    }

    lines.push(Line::from(""));
    let submit = if form.submitting {
        Span::styled("Starting...", bold_style)
    } else if form.can_submit() {
        Span::styled("[ Start Sketching ]", bold_style)
    } else {
        Span::styled("[ Start Sketching ]", dim_style)
    };
    lines.push(Line::from(submit).alignment(Alignment::Center));

    let form_area = centered_rect(chunks[0], FORM_WIDTH, lines.len() as u16);
    Paragraph::new(lines).render(form_area, buf);

    let legend = Paragraph::new(Span::styled(
        String::from(if form.categories.is_empty() {
            "(tab) next field / (r)eload / (enter) start / (esc)ape"
        } else {
            "(tab) next field / (enter) start / (esc)ape"
        }),
        italic_style,
    ));
    legend.render(chunks[2], buf);
}

fn render_session(view: &SessionView, area: Rect, buf: &mut Buffer) {
    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let red_bold_style = Style::default().patch(bold_style).fg(Color::Red);
    let dim_style = Style::default().add_modifier(Modifier::DIM);
    let italic_style = Style::default().add_modifier(Modifier::ITALIC);

    let session = view.clock.session();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // progress bar
            Constraint::Length(1), // status line
            Constraint::Min(1),    // reference image
            Constraint::Length(1), // legend
        ])
        .split(area);

    if session.phase() == Phase::Drawing {
        let gauge = Gauge::default()
            .gauge_style(Style::default().fg(Color::Blue).bg(Color::DarkGray))
            .ratio(session.progress_ratio())
            .label("");
        gauge.render(chunks[0], buf);
    }

    let status_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(7)])
        .split(chunks[1]);

    let phase_name = match session.phase() {
        Phase::Preparation => "Get Ready",
        Phase::Drawing => "Draw!",
    };
    let status = Paragraph::new(Span::styled(
        format!(
            "Image {} / {} | {}",
            session.current_index() + 1,
            session.image_count(),
            phase_name
        ),
        bold_style,
    ));
    status.render(status_chunks[0], buf);

    if session.is_paused() {
        let paused = Paragraph::new(Span::styled("PAUSED", red_bold_style))
            .alignment(Alignment::Right);
        paused.render(status_chunks[1], buf);
    }

    match &view.preview {
        Some(preview) => preview.render(chunks[2], buf, session.phase() == Phase::Preparation),
        None => {
            let rows = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(chunks[2].height / 2),
                    Constraint::Length(1),
                    Constraint::Min(0),
                ])
                .split(chunks[2]);
            let placeholder = Paragraph::new(Span::styled("image unavailable", dim_style))
                .alignment(Alignment::Center);
            placeholder.render(rows[1], buf);
        }
    }

    if let Some(seconds) = session.countdown() {
        let (style, corner) = match session.phase() {
            Phase::Preparation => (Style::default().patch(bold_style).fg(Color::White), false),
            Phase::Drawing => (red_bold_style, true),
        };
        render_big_number(seconds, chunks[2], buf, style, corner);
    }

    let legend = Paragraph::new(Span::styled(
        String::from(if session.is_paused() {
            "(space) resume / (right) skip / (esc)ape"
        } else {
            "(space) pause / (right) skip / (esc)ape"
        }),
        italic_style,
    ));
    legend.render(chunks[3], buf);
}

fn render_summary(area: Rect, buf: &mut Buffer) {
    let green_bold_style = Style::default()
        .add_modifier(Modifier::BOLD)
        .fg(Color::Green);
    let italic_style = Style::default().add_modifier(Modifier::ITALIC);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Min(1),    // message
            Constraint::Length(1), // padding
            Constraint::Length(1), // legend
        ])
        .split(area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(chunks[0].height.saturating_sub(3) / 2),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .split(chunks[0]);

    let message = Paragraph::new(vec![
        Line::from(Span::styled("Session Complete!", green_bold_style)),
        Line::from(""),
        Line::from("Great job practicing."),
    ])
    .alignment(Alignment::Center);
    message.render(rows[1], buf);

    let legend = Paragraph::new(Span::styled("(n)ew session / (esc)ape", italic_style));
    legend.render(chunks[2], buf);
}

/// Center a fixed-size box inside `area`, clamping to its bounds
fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(area.height.saturating_sub(height) / 2),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(area.width.saturating_sub(width) / 2),
            Constraint::Length(width),
            Constraint::Min(0),
        ])
        .split(vertical[1]);

    horizontal[1]
}

/// Paint a number in oversized block digits, either centered in `area` or
/// tucked into its top-right corner. Falls back to plain text when the area
/// is too small for the glyphs.
fn render_big_number(n: u32, area: Rect, buf: &mut Buffer, style: Style, corner: bool) {
    if area.width == 0 || area.height == 0 {
        return;
    }

    let rows = big_number_rows(n);
    let glyph_width = rows[0].width() as u16;

    if area.height < DIGIT_ROWS as u16 || area.width < glyph_width + 2 {
        let (alignment, line) = if corner {
            (Alignment::Right, Rect { height: 1, ..area })
        } else {
            let y = area.y + area.height.saturating_sub(1) / 2;
            (Alignment::Center, Rect::new(area.x, y, area.width, 1))
        };
        Paragraph::new(Span::styled(n.to_string(), style))
            .alignment(alignment)
            .render(line, buf);
        return;
    }

    let x = if corner {
        area.x + area.width - glyph_width - 1
    } else {
        area.x + (area.width - glyph_width) / 2
    };
    let y = if corner {
        area.y
    } else {
        area.y + (area.height - DIGIT_ROWS as u16) / 2
    };

    for (dy, row) in rows.iter().enumerate() {
        for (dx, symbol) in row.chars().enumerate() {
            if symbol == ' ' {
                continue;
            }
            if let Some(cell) = buf.cell_mut((x + dx as u16, y + dy as u16)) {
                cell.set_symbol("█");
                cell.set_style(style);
            }
        }
    }
}

/// Expand a number into rows of block glyphs, one string per glyph row.
/// Each glyph column is doubled so digits keep their proportions in the
/// taller-than-wide terminal cell grid.
fn big_number_rows(n: u32) -> [String; DIGIT_ROWS] {
    let digits: Vec<u32> = n
        .to_string()
        .chars()
        .filter_map(|c| c.to_digit(10))
        .collect();

    let mut rows: [String; DIGIT_ROWS] = Default::default();
    for (i, row) in rows.iter_mut().enumerate() {
        for (j, digit) in digits.iter().enumerate() {
            if j > 0 {
                row.push_str("  ");
            }
            for c in digit_rows(*digit)[i].chars() {
                row.push_str(if c == '#' { "██" } else { "  " });
            }
        }
    }
    rows
}

fn digit_rows(digit: u32) -> [&'static str; DIGIT_ROWS] {
    match digit {
        0 => ["###", "# #", "# #", "# #", "###"],
        1 => ["  #", "  #", "  #", "  #", "  #"],
        2 => ["###", "  #", "###", "#  ", "###"],
        3 => ["###", "  #", "###", "  #", "###"],
        4 => ["# #", "# #", "###", "  #", "  #"],
        5 => ["###", "#  ", "###", "  #", "###"],
        6 => ["###", "#  ", "###", "# #", "###"],
        7 => ["###", "  #", "  #", "  #", "  #"],
        8 => ["###", "# #", "###", "# #", "###"],
        9 => ["###", "# #", "###", "  #", "###"],
        _ => ["   ", "   ", "   ", "   ", "   "],
    }
}
