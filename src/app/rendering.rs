// Rendering - draw() method and UI layout helpers

use std::time::Instant;

use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use super::{ActiveScreen, App, RequestEntry};
use crate::config::Theme;
use crate::error::{ReelError, Result};
use crate::input::{FocusTarget, ScreenLocalFocus, TopBarItem};
use crate::modal::arbiter::ModalMachine;
use crate::modal::linear_form::LinearForm;
use crate::modal::list_actions::ListActions;
use crate::modal::{ModalId, ModalLocalFocus};
use crate::screens::{BrowseScreen, PersonScreen};

/// Grid cell height in terminal rows, border included.
const CELL_HEIGHT: u16 = 3;

const TOP_BAR_TABS: [(TopBarItem, &str); 4] = [
    (TopBarItem::Search, "Search"),
    (TopBarItem::Movies, "Movies"),
    (TopBarItem::Series, "Series"),
    (TopBarItem::Settings, "Settings"),
];

impl App {
    pub(super) fn draw(&mut self) -> Result<()> {
        // Snapshot state before the draw closure borrows the terminal.
        let theme = self.config_manager.theme().clone();
        let focus = self.registry.get().clone();
        let active_tab = self.active_tab;
        let now = Instant::now();

        // Rows the grid can show this frame: full height minus the top bar,
        // the browse controls row, and the hint line.
        let term_size = self
            .terminal
            .size()
            .map_err(|e| ReelError::Terminal(e.to_string()))?;
        let grid_height = term_size.height.saturating_sub(7);
        self.grid_viewport_rows = ((grid_height / CELL_HEIGHT) as usize).max(1);

        let screen = &self.screen;
        let arbiter = &self.arbiter;
        let requests = &self.requests;
        let notifications = &self.notification_manager;

        self.terminal
            .draw(|frame| {
                let size = frame.area();
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([
                        Constraint::Length(3),
                        Constraint::Min(0),
                        Constraint::Length(1),
                    ])
                    .split(size);

                render_top_bar(frame, chunks[0], &focus, active_tab, &theme);

                match screen {
                    Some(ActiveScreen::Browse(browse)) => {
                        render_browse(frame, chunks[1], browse, &focus, &theme);
                    }
                    Some(ActiveScreen::Person(person)) => {
                        render_person(frame, chunks[1], person, &focus, &theme);
                    }
                    None => {}
                }

                render_hint_bar(frame, chunks[2], &focus, &theme);

                if let (Some(id), Some(machine)) = (arbiter.top_id(), arbiter.top_machine()) {
                    render_modal(frame, size, id, machine, requests, now, &theme);
                }

                notifications.render(frame, size, &theme);
            })
            .map_err(|e| ReelError::Terminal(e.to_string()))?;
        Ok(())
    }
}

fn render_top_bar(
    frame: &mut Frame,
    area: Rect,
    focus: &FocusTarget,
    active_tab: TopBarItem,
    theme: &Theme,
) {
    let focused_item = match focus {
        FocusTarget::TopBar(item) => Some(*item),
        _ => None,
    };

    let mut spans = vec![Span::raw(" ")];
    for (item, label) in TOP_BAR_TABS {
        let style = theme.top_bar_style(focused_item == Some(item), active_tab == item);
        spans.push(Span::styled(format!("  {}  ", label), style));
        spans.push(Span::raw(" "));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border_style(focused_item.is_some()));
    let bar = Paragraph::new(Line::from(spans)).block(block);
    frame.render_widget(bar, area);
}

fn render_hint_bar(frame: &mut Frame, area: Rect, focus: &FocusTarget, theme: &Theme) {
    let hint = match focus {
        FocusTarget::TopBar(_) => "←/→ switch tab · Enter open · ↓ into screen",
        FocusTarget::Screen { .. } => "arrows navigate · Enter select · Esc back",
        FocusTarget::Modal { .. } => "arrows navigate · Enter confirm · Esc dismiss",
    };
    let line = Paragraph::new(hint).style(theme.title_style(false));
    frame.render_widget(line, area);
}

// ---- browse screen ----

fn render_browse(
    frame: &mut Frame,
    area: Rect,
    screen: &BrowseScreen,
    focus: &FocusTarget,
    theme: &Theme,
) {
    let local = match focus {
        FocusTarget::Screen { key, local } if *key == screen.key => Some(local),
        _ => None,
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    render_browse_controls(frame, chunks[0], screen, local, theme);
    render_grid(frame, chunks[1], screen, local, theme);
}

fn render_browse_controls(
    frame: &mut Frame,
    area: Rect,
    screen: &BrowseScreen,
    local: Option<&ScreenLocalFocus>,
    theme: &Theme,
) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(50),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
        ])
        .split(area);

    let search_focused = matches!(local, Some(ScreenLocalFocus::Search));
    let query = if screen.query().is_empty() && !screen.is_capturing_search() {
        "Search...".to_string()
    } else if screen.is_capturing_search() {
        format!("{}\u{258f}", screen.query())
    } else {
        screen.query().to_string()
    };
    let search = Paragraph::new(query).block(
        Block::default()
            .borders(Borders::ALL)
            .title(Span::styled("Search", theme.title_style(search_focused)))
            .border_style(theme.border_style(search_focused)),
    );
    frame.render_widget(search, chunks[0]);

    let sort_focused = matches!(local, Some(ScreenLocalFocus::Sort));
    let sort = Paragraph::new(screen.sort().label()).block(
        Block::default()
            .borders(Borders::ALL)
            .title(Span::styled("Sort", theme.title_style(sort_focused)))
            .border_style(theme.border_style(sort_focused)),
    );
    frame.render_widget(sort, chunks[1]);

    let filter_focused = matches!(local, Some(ScreenLocalFocus::Filters));
    let filters = Paragraph::new(screen.filters().label()).block(
        Block::default()
            .borders(Borders::ALL)
            .title(Span::styled("Filters", theme.title_style(filter_focused)))
            .border_style(theme.border_style(filter_focused)),
    );
    frame.render_widget(filters, chunks[2]);
}

fn render_grid(
    frame: &mut Frame,
    area: Rect,
    screen: &BrowseScreen,
    local: Option<&ScreenLocalFocus>,
    theme: &Theme,
) {
    let items = screen.visible();
    let columns = screen.columns().max(1);

    if items.is_empty() {
        let placeholder = if screen.list.is_loading() {
            "Loading..."
        } else {
            "No titles match"
        };
        let empty = Paragraph::new(placeholder)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(empty, area);
        return;
    }

    let selected = match local {
        Some(ScreenLocalFocus::Grid(sel)) => Some(*sel),
        _ => None,
    };

    let visible_rows = (area.height / CELL_HEIGHT).max(1) as usize;
    let total_rows = items.len().div_ceil(columns);

    // The screen's tracked scroll is the window baseline; nudge it only if
    // the selection would otherwise fall outside (e.g. a resize this frame).
    let mut first_row = screen.scroll_index.min(total_rows.saturating_sub(1));
    if let Some(sel) = selected {
        if sel.row < first_row {
            first_row = sel.row;
        } else if sel.row + 1 > first_row + visible_rows {
            first_row = sel.row + 1 - visible_rows;
        }
    }
    let last_row = (first_row + visible_rows).min(total_rows);

    let cell_width = area.width / columns as u16;
    for row in first_row..last_row {
        let y = area.y + ((row - first_row) as u16) * CELL_HEIGHT;
        for col in 0..columns {
            let index = row * columns + col;
            let Some(item) = items.get(index) else {
                break;
            };
            let cell = Rect::new(area.x + (col as u16) * cell_width, y, cell_width, CELL_HEIGHT);
            let is_selected = selected.is_some_and(|s| s.row == row && s.col == col);
            let style = theme.grid_cell_style(is_selected);
            let body = Paragraph::new(vec![Line::from(format!(
                "{} ({})",
                item.title, item.year
            ))])
            .style(style)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(theme.border_style(is_selected)),
            );
            frame.render_widget(body, cell);
        }
    }
}

// ---- person screen ----

fn render_person(
    frame: &mut Frame,
    area: Rect,
    screen: &PersonScreen,
    focus: &FocusTarget,
    theme: &Theme,
) {
    let local = match focus {
        FocusTarget::Screen { key, local } if *key == screen.key => Some(local),
        _ => None,
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(4),
            Constraint::Length(4),
            Constraint::Length(4),
        ])
        .split(area);

    let top_focused = matches!(local, Some(ScreenLocalFocus::Top));
    let header = Paragraph::new(Line::from(vec![
        Span::styled(screen.person.name.clone(), theme.title_style(true)),
        Span::raw("   "),
        Span::styled("[ Request ]", theme.modal_button_style(top_focused)),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(theme.border_style(top_focused)),
    );
    frame.render_widget(header, chunks[0]);

    let read_more_focused = matches!(local, Some(ScreenLocalFocus::ReadMore));
    let bio = if screen.bio_expanded {
        screen.person.bio.clone()
    } else {
        let mut short: String = screen.person.bio.chars().take(120).collect();
        if screen.person.bio.chars().count() > 120 {
            short.push_str("\u{2026}");
        }
        short
    };
    let read_more_label = if screen.bio_expanded {
        " Show less "
    } else {
        " Read more "
    };
    let bio_widget = Paragraph::new(vec![
        Line::from(bio),
        Line::from(Span::styled(
            read_more_label,
            theme.modal_button_style(read_more_focused),
        )),
    ])
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(Span::styled("Biography", theme.title_style(read_more_focused)))
            .border_style(theme.border_style(read_more_focused)),
    );
    frame.render_widget(bio_widget, chunks[1]);

    let known_for_index = match local {
        Some(ScreenLocalFocus::KnownFor(i)) => Some(*i),
        _ => None,
    };
    render_credit_strip(
        frame,
        chunks[2],
        "Known For",
        &screen.person.known_for,
        known_for_index,
        theme,
    );

    let crew_index = match local {
        Some(ScreenLocalFocus::Crew(i)) => Some(*i),
        _ => None,
    };
    render_credit_strip(
        frame,
        chunks[3],
        "Crew",
        &screen.person.crew_credits,
        crew_index,
        theme,
    );
}

fn render_credit_strip(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    items: &[crate::data::MediaItem],
    focused: Option<usize>,
    theme: &Theme,
) {
    let mut spans = Vec::new();
    for (i, item) in items.iter().enumerate() {
        let style = theme.grid_cell_style(focused == Some(i));
        spans.push(Span::styled(format!(" {} ", item.title), style));
        spans.push(Span::raw(" "));
    }
    let strip = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .title(Span::styled(title.to_string(), theme.title_style(focused.is_some())))
            .border_style(theme.border_style(focused.is_some())),
    );
    frame.render_widget(strip, area);
}

// ---- modals ----

fn render_modal(
    frame: &mut Frame,
    screen: Rect,
    id: ModalId,
    machine: &ModalMachine,
    requests: &[RequestEntry],
    now: Instant,
    theme: &Theme,
) {
    let title = match id {
        ModalId::RequestForm => "New Request",
        ModalId::IssueReport => "Report Issue",
        ModalId::RequestManager => "Requests",
    };
    let height = match machine {
        ModalMachine::Form(form) => form.options().len() as u16 + 8,
        ModalMachine::List(list) => list.len() as u16 + 6,
    };
    let area = centered_rect(48, height, screen);

    frame.render_widget(Clear, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(format!(" {} ", title), theme.title_style(true)))
        .border_style(Style::default().fg(theme.modal.border.to_color()))
        .style(Style::default().bg(theme.modal.background.to_color()));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    match machine {
        ModalMachine::Form(form) => render_form(frame, inner, form, theme),
        ModalMachine::List(list) => render_request_list(frame, inner, list, requests, now, theme),
    }
}

fn render_form(frame: &mut Frame, area: Rect, form: &LinearForm, theme: &Theme) {
    let mut lines = Vec::new();

    // The leading row is "no option", cursor -1.
    let cursor = match form.focus {
        ModalLocalFocus::OptionList(i) => Some(i),
        _ => None,
    };
    lines.push(Line::from(Span::styled(
        if form.selected_option().is_none() { "(\u{2713}) None" } else { "( ) None" }.to_string(),
        theme.modal_item_style(cursor == Some(-1)),
    )));
    for (i, option) in form.options().iter().enumerate() {
        let mark = if form.selected_option() == Some(i) { "(\u{2713})" } else { "( )" };
        lines.push(Line::from(Span::styled(
            format!("{} {}", mark, option),
            theme.modal_item_style(cursor == Some(i as i32)),
        )));
    }

    lines.push(Line::from(""));
    let text_focused = form.focus == ModalLocalFocus::TextField;
    let note = if form.is_capturing_text() {
        format!("Note: {}\u{258f}", form.text())
    } else if form.text().is_empty() {
        "Note: (press Enter to type)".to_string()
    } else {
        format!("Note: {}", form.text())
    };
    lines.push(Line::from(Span::styled(
        note,
        theme.modal_item_style(text_focused),
    )));

    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled(
            " Cancel ",
            theme.modal_button_style(form.focus == ModalLocalFocus::CancelButton),
        ),
        Span::raw("  "),
        Span::styled(
            " Submit ",
            theme.modal_button_style(form.focus == ModalLocalFocus::SubmitButton),
        ),
    ]));

    if let Some(message) = form.validation() {
        lines.push(Line::from(Span::styled(
            message.to_string(),
            Style::default().fg(theme.modal.validation_fg.to_color()),
        )));
    }

    frame.render_widget(Paragraph::new(lines), area);
}

fn render_request_list(
    frame: &mut Frame,
    area: Rect,
    list: &ListActions,
    requests: &[RequestEntry],
    now: Instant,
    theme: &Theme,
) {
    let mut lines = Vec::new();

    if requests.is_empty() {
        lines.push(Line::from(Span::styled(
            "No requests yet".to_string(),
            theme.modal_item_style(false),
        )));
    }
    for (i, entry) in requests.iter().enumerate() {
        let focused = list.focus == ModalLocalFocus::List(i);
        let quality = entry.quality.as_deref().unwrap_or("any");
        let mut label = format!(
            "{} \u{00b7} {} \u{00b7} {}",
            entry.title,
            quality,
            entry.created_at.format("%b %d %H:%M"),
        );
        if list.pending_confirm() == Some(i) {
            let remaining = list
                .confirm_remaining(now)
                .map(|d| d.as_secs() + 1)
                .unwrap_or(0);
            label = format!("{}  press Enter to delete ({}s)", label, remaining);
            lines.push(Line::from(Span::styled(
                label,
                Style::default().fg(theme.modal.danger_fg.to_color()),
            )));
        } else {
            lines.push(Line::from(Span::styled(label, theme.modal_item_style(focused))));
        }
    }

    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled(
            " Close ",
            theme.modal_button_style(list.focus == ModalLocalFocus::CancelButton),
        ),
        Span::raw("  "),
        Span::styled(
            " Report issue ",
            theme.modal_button_style(list.focus == ModalLocalFocus::NewItemButton),
        ),
    ]));

    frame.render_widget(Paragraph::new(lines), area);
}

fn centered_rect(width: u16, height: u16, screen: Rect) -> Rect {
    let width = width.min(screen.width);
    let height = height.min(screen.height);
    let x = screen.x + (screen.width - width) / 2;
    let y = screen.y + (screen.height - height) / 2;
    Rect::new(x, y, width, height)
}
