//! Terminal options menu.

pub mod settings_menu;

pub use settings_menu::{value_text, SettingsMenu};

use crate::binder::{ControlKind, SettingsCategory};
use crate::settings::SettingsContainer;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Tabs},
    Frame,
};

pub fn draw_settings_menu(frame: &mut Frame, menu: &SettingsMenu, settings: &SettingsContainer) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Tabs
            Constraint::Min(0),    // Rows
            Constraint::Length(1), // Status
            Constraint::Length(1), // Help
        ])
        .split(frame.size());

    draw_tabs(frame, chunks[0], menu);
    match menu.category() {
        SettingsCategory::Keybinds => draw_keybinds(frame, chunks[1], menu),
        _ => draw_fields(frame, chunks[1], menu, settings),
    }

    if let Some(message) = &menu.message {
        let status = Paragraph::new(Line::from(Span::styled(
            format!(" {}", message),
            Style::default().fg(Color::Yellow),
        )));
        frame.render_widget(status, chunks[2]);
    }

    let help = Paragraph::new(help_text(menu))
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    frame.render_widget(help, chunks[3]);
}

fn draw_tabs(frame: &mut Frame, area: Rect, menu: &SettingsMenu) {
    let titles: Vec<Line> = SettingsCategory::ALL
        .iter()
        .map(|c| Line::from(c.name()))
        .collect();
    let tabs = Tabs::new(titles)
        .block(Block::default().borders(Borders::ALL).title(" Settings "))
        .select(menu.tab)
        .style(Style::default().fg(Color::White))
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );
    frame.render_widget(tabs, area);
}

fn row_style(selected: bool) -> Style {
    if selected {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    }
}

fn draw_fields(frame: &mut Frame, area: Rect, menu: &SettingsMenu, settings: &SettingsContainer) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", menu.category().name()));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let items: Vec<ListItem> = menu
        .field_bindings()
        .iter()
        .enumerate()
        .map(|(i, binding)| {
            let selected = i == menu.selected;
            let prefix = if selected { "> " } else { "  " };
            let value = value_text(binding, settings);
            let shown = match binding.control {
                ControlKind::Dropdown | ControlKind::Slider => format!("< {} >", value),
                ControlKind::Toggle => format!("[{}]", value),
                ControlKind::TextField => value,
            };
            ListItem::new(Line::from(vec![
                Span::styled(format!("{}{:<24}", prefix, binding.name()), row_style(selected)),
                Span::styled(shown, Style::default().fg(Color::Cyan)),
            ]))
        })
        .collect();

    frame.render_widget(List::new(items), inner);
}

fn draw_keybinds(frame: &mut Frame, area: Rect, menu: &SettingsMenu) {
    let panel = menu.panel();
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", panel.header()));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let items: Vec<ListItem> = panel
        .rows()
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let selected = i == menu.selected;
            let prefix = if selected { "> " } else { "  " };
            let label = if row.label == row.action {
                row.action.clone()
            } else {
                format!("{} {}", row.action, row.label)
            };
            ListItem::new(Line::from(vec![
                Span::styled(format!("{}{:<24}", prefix, label), row_style(selected)),
                Span::styled(
                    format!("[{}]", row.button_text),
                    Style::default().fg(Color::Cyan),
                ),
            ]))
        })
        .collect();

    frame.render_widget(List::new(items), inner);
}

fn help_text(menu: &SettingsMenu) -> &'static str {
    if menu.is_capturing() {
        "Press the new key or mouse button  [Esc] Cancel"
    } else if menu.category() == SettingsCategory::Keybinds {
        "[Tab] Category  [Enter] Rebind  [Del] Default  [R] Reset all  [G] Scheme  [Q] Quit"
    } else {
        "[Tab] Category  [Up/Down] Select  [Left/Right] Change  [Q] Quit"
    }
}
