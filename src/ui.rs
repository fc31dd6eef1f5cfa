use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use monkeywords::{
    page::PageEntry,
    session::{Phase, Session},
    word::GrammaticalTag,
};

use crate::App;

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 2;
/// display form, pronunciation, tag bar, hint
const CARD_HEIGHT: u16 = 4;
const CARD_GAP: u16 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WordState {
    Past,
    Current,
    Upcoming,
}

fn bold() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}

fn dim() -> Style {
    Style::default().add_modifier(Modifier::DIM)
}

/// Pronunciation of one word, colored against what was typed for it.
///
/// `typed` is the converted input, of which the characters from
/// `pending_from` on are still unresolved.
fn word_spans(
    target: &str,
    typed: &str,
    pending_from: usize,
    state: WordState,
) -> Vec<Span<'static>> {
    let correct = if state == WordState::Past {
        Style::default().fg(Color::Green).add_modifier(Modifier::DIM)
    } else {
        bold().fg(Color::Green)
    };
    let incorrect = bold().fg(Color::Red);
    let pending = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::UNDERLINED);
    let caret = dim().add_modifier(Modifier::UNDERLINED | Modifier::BOLD);

    let target: Vec<char> = target.chars().collect();
    let typed: Vec<char> = typed.chars().collect();
    let len = target.len().max(typed.len());

    let mut spans: Vec<Span<'static>> = (0..len)
        .map(|i| match (target.get(i), typed.get(i)) {
            (_, Some(&c)) if i >= pending_from && state == WordState::Current => {
                Span::styled(c.to_string(), pending)
            }
            (Some(&t), Some(&c)) if t == c => Span::styled(t.to_string(), correct),
            (_, Some(&c)) => Span::styled(c.to_string(), incorrect),
            (Some(&t), None) if state == WordState::Past => Span::styled(t.to_string(), incorrect),
            (Some(&t), None) if state == WordState::Current && i == typed.len() => {
                Span::styled(t.to_string(), caret)
            }
            (Some(&t), None) => Span::styled(t.to_string(), dim()),
            (None, None) => Span::raw(""),
        })
        .collect();

    if state == WordState::Current && typed.len() >= target.len() {
        spans.push(Span::styled(" ", caret));
    }
    spans
}

fn tag_color(tag: GrammaticalTag) -> Option<Color> {
    match tag {
        GrammaticalTag::None => None,
        GrammaticalTag::ClassA => Some(Color::Red),
        GrammaticalTag::ClassB => Some(Color::Blue),
        GrammaticalTag::ClassC => Some(Color::Yellow),
    }
}

struct Card<'a> {
    entry: &'a PageEntry,
    state: WordState,
    spans: Vec<Span<'static>>,
    width: u16,
}

fn build_cards(session: &Session) -> Vec<Card<'_>> {
    let normalized = session.normalized();
    let converted = normalized.converted();
    let confirmed_len = normalized.confirmed.chars().count();
    let current = session.current_index();

    session
        .page()
        .entries()
        .iter()
        .enumerate()
        .map(|(idx, entry)| {
            let (state, typed, pending_from) = if idx < current {
                let typed = session
                    .input_history()
                    .get(idx)
                    .map(String::as_str)
                    .unwrap_or("");
                (WordState::Past, typed, usize::MAX)
            } else if idx == current {
                (WordState::Current, converted.as_str(), confirmed_len)
            } else {
                (WordState::Upcoming, "", usize::MAX)
            };

            let spans = word_spans(&entry.word.target_pron, typed, pending_from, state);
            let pron_width: usize = spans.iter().map(|s| s.content.width()).sum();
            let width = [
                entry.word.display_form.width(),
                pron_width,
                entry.word.transliteration_hint.width(),
            ]
            .into_iter()
            .max()
            .unwrap_or(0) as u16;

            Card {
                entry,
                state,
                spans,
                width,
            }
        })
        .collect()
}

fn render_card(card: &Card<'_>, x: u16, y: u16, buf: &mut Buffer) {
    let center = |w: usize| x + card.width.saturating_sub(w as u16) / 2;
    let word = &card.entry.word;

    let top_style = if card.state == WordState::Current {
        bold()
    } else {
        dim()
    };
    buf.set_string(
        center(word.display_form.width()),
        y,
        &word.display_form,
        top_style,
    );

    let line = Line::from(card.spans.clone());
    buf.set_line(center(line.width()), y + 1, &line, card.width);

    if let Some(color) = tag_color(word.grammatical_tag) {
        buf.set_string(
            x,
            y + 2,
            "▔".repeat(card.width as usize),
            Style::default().fg(color),
        );
    }

    if card.state == WordState::Current && !word.transliteration_hint.is_empty() {
        buf.set_string(
            center(word.transliteration_hint.width()),
            y + 3,
            &word.transliteration_hint,
            dim().add_modifier(Modifier::ITALIC),
        );
    }
}

/// Flow the cards into centered rows, dropping those that don't fit
fn render_page(session: &Session, area: Rect, buf: &mut Buffer) {
    let cards = build_cards(session);

    let mut rows: Vec<Vec<&Card<'_>>> = vec![Vec::new()];
    let mut row_width = 0u16;
    for card in &cards {
        let needed = card.width + if row_width == 0 { 0 } else { CARD_GAP };
        if row_width > 0 && row_width + needed > area.width {
            rows.push(Vec::new());
            row_width = 0;
        }
        row_width += if row_width == 0 { card.width } else { needed };
        if let Some(row) = rows.last_mut() {
            row.push(card);
        }
    }

    let total_height = (rows.len() as u16) * (CARD_HEIGHT + 1);
    let mut y = area.y + area.height.saturating_sub(total_height) / 2;

    for row in rows {
        if y + CARD_HEIGHT > area.bottom() {
            break;
        }
        let width: u16 = row.iter().map(|c| c.width).sum::<u16>()
            + CARD_GAP * (row.len().saturating_sub(1) as u16);
        let mut x = area.x + area.width.saturating_sub(width) / 2;
        for card in row {
            if x + card.width <= area.right() {
                render_card(card, x, y, buf);
            }
            x += card.width + CARD_GAP;
        }
        y += CARD_HEIGHT + 1;
    }
}

fn header_line(session: &Session) -> Line<'static> {
    let mut spans = vec![
        Span::styled("monkeywords", bold().fg(Color::Magenta)),
        Span::raw("   "),
        Span::styled(
            format!("{} · level {}", session.language(), session.level()),
            bold(),
        ),
    ];

    if session.is_loading() {
        let (language, level) = session.selection();
        spans.push(Span::styled(
            format!("   loading {language} · level {level}…"),
            dim().add_modifier(Modifier::ITALIC),
        ));
    }

    if session.phase() == Phase::Running {
        let secs = session.elapsed().map(|d| d.as_secs()).unwrap_or(0);
        spans.push(Span::raw("   "));
        spans.push(Span::styled(format!("{secs}s"), dim()));
        spans.push(Span::raw("   "));
        spans.push(Span::styled(
            format!("{}% acc", session.accuracy()),
            bold().fg(Color::Cyan),
        ));
    }

    Line::from(spans)
}

fn footer_line(session: &Session) -> Line<'static> {
    let help = match session.phase() {
        Phase::Finished => "(esc) try again / (tab) language / (ctrl+l) level / (ctrl+c) quit",
        _ => "space = skip word | esc = restart | enter = finish | tab = language | ctrl+l = level | ctrl+c = quit",
    };
    Line::from(vec![
        Span::styled(session.language().input_hint(), bold()),
        Span::raw(" | "),
        Span::styled(help, Style::default().add_modifier(Modifier::ITALIC)),
    ])
}

fn render_results(session: &Session, area: Rect, buf: &mut Buffer) {
    let Some(stats) = session.stats() else {
        return;
    };
    let big = bold().fg(Color::Magenta);

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    for (chunk, label, value) in [
        (chunks[0], "WPM", stats.wpm.to_string()),
        (chunks[1], "Accuracy", format!("{}%", stats.accuracy)),
    ] {
        let lines = vec![
            Line::from(Span::styled(label, dim())),
            Line::from(Span::styled(value, big)),
        ];
        let height = chunk.height.min(2);
        let inner = Rect {
            y: chunk.y + chunk.height.saturating_sub(height) / 2,
            height,
            ..chunk
        };
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .render(inner, buf);
    }
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let session = &self.session;

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints([
                Constraint::Length(1), // header
                Constraint::Length(1), // notice
                Constraint::Min(1),    // page or results
                Constraint::Length(1), // footer
            ])
            .split(area);

        Paragraph::new(header_line(session))
            .alignment(Alignment::Center)
            .render(chunks[0], buf);

        if let Some(notice) = &self.notice {
            Paragraph::new(Span::styled(notice.as_str(), Style::default().fg(Color::Red)))
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true })
                .render(chunks[1], buf);
        }

        match session.phase() {
            Phase::Finished => render_results(session, chunks[2], buf),
            Phase::Empty => {
                let message = if session.is_loading() {
                    "loading words…"
                } else {
                    "no words"
                };
                Paragraph::new(Span::styled(message, dim().add_modifier(Modifier::ITALIC)))
                    .alignment(Alignment::Center)
                    .render(chunks[2], buf);
            }
            Phase::Loaded | Phase::Running => render_page(session, chunks[2], buf),
        }

        Paragraph::new(footer_line(session))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(chunks[3], buf);
    }
}
