//! Render orchestration for the character builder TUI

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use charsheet_core::rules::qualifies_for;
use charsheet_core::{current_spending_sum, Ability, Character, CharacterClass, Skill};

use crate::app::App;
use crate::ui::layout::{centered_rect_fixed, AppLayout};

/// Which panel is focused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FocusedPanel {
    #[default]
    Attributes,
    Skills,
}

/// Overlay types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Overlay {
    Help,
    /// A refused change; closes on any key.
    Notice(String),
}

/// Main render function
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let layout = AppLayout::calculate(area);

    render_title_bar(frame, app, layout.title_area);

    match app.character() {
        Some(character) => {
            render_attributes(frame, app, character, layout.attributes_area);
            render_classes(frame, app, character, layout.classes_area);
            render_skills(frame, app, character, layout.skills_area);
        }
        None => {
            let empty = Paragraph::new("No characters. Press n to add one.")
                .style(app.theme.system_style())
                .block(Block::default().borders(Borders::ALL));
            let content = Rect {
                height: layout.attributes_area.height + layout.classes_area.height,
                width: area.width,
                ..layout.attributes_area
            };
            frame.render_widget(empty, content);
        }
    }

    render_last_check(frame, app, layout.check_area);
    render_status_bar(frame, app, layout.status_bar);
    render_hotkey_bar(frame, app, layout.hotkey_bar);

    if let Some(overlay) = app.overlay() {
        render_overlay(frame, app, overlay, area);
    }
}

/// Render the title bar with the character tabs
fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![Span::styled(
        " Character Builder ",
        Style::default().add_modifier(Modifier::BOLD),
    )];
    for index in 0..app.store.len() {
        let label = format!(" {} ", index + 1);
        let style = if index == app.selected {
            app.theme.title_style(true).add_modifier(Modifier::REVERSED)
        } else {
            app.theme.title_style(false)
        };
        spans.push(Span::styled(label, style));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_attributes(frame: &mut Frame, app: &App, character: &Character, area: Rect) {
    let focused = app.focused_panel == FocusedPanel::Attributes;
    let attributes = &character.attributes;

    let lines: Vec<Line> = Ability::all()
        .iter()
        .enumerate()
        .map(|(row, ability)| {
            let style = app.theme.row_style(row == app.attribute_cursor, focused);
            Line::from(Span::styled(
                format!(
                    " {:<13} {:>3}  (Modifier: {:+})",
                    ability.name(),
                    attributes.get(*ability),
                    attributes.modifier(*ability)
                ),
                style,
            ))
        })
        .collect();

    let title = format!(
        " Attributes {}/{} ",
        attributes.total(),
        app.engine.config().attribute_sum_max
    );
    let block = Block::default()
        .title(Span::styled(title, app.theme.title_style(focused)))
        .borders(Borders::ALL)
        .border_style(app.theme.border_style(focused));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_classes(frame: &mut Frame, app: &App, character: &Character, area: Rect) {
    let mut lines: Vec<Line> = CharacterClass::all()
        .iter()
        .map(|class| {
            let qualified = qualifies_for(&character.attributes, *class);
            let requirements: Vec<String> = class
                .requirements()
                .iter()
                .filter(|(_, min)| *min > 9)
                .map(|(ability, min)| format!("{} {min}", ability.abbreviation()))
                .collect();
            Line::from(vec![
                Span::styled(
                    format!(" {} {:<10}", if qualified { "*" } else { " " }, class.name()),
                    app.theme.class_style(qualified),
                ),
                Span::styled(requirements.join(", "), app.theme.system_style()),
            ])
        })
        .collect();

    let selected = if character.selected_classes.is_empty() {
        "none".to_string()
    } else {
        character.selected_class_label()
    };
    lines.push(Line::from(""));
    lines.push(Line::from(format!(" Selected: {selected}")));

    let block = Block::default()
        .title(" Classes ")
        .borders(Borders::ALL)
        .border_style(app.theme.border_style(false));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_skills(frame: &mut Frame, app: &App, character: &Character, area: Rect) {
    let focused = app.focused_panel == FocusedPanel::Skills;
    let spent = current_spending_sum(character);
    let available = app.engine.max_available_points(character);

    let lines: Vec<Line> = Skill::all()
        .iter()
        .enumerate()
        .map(|(row, skill)| {
            let entry = character.skill(*skill);
            let style = app.theme.row_style(row == app.skill_cursor, focused);
            Line::from(Span::styled(
                format!(
                    " {:<16} {:>2}  (Modifier: {} {:+})  total {:+}",
                    skill.name(),
                    entry.points,
                    skill.ability().abbreviation(),
                    entry.modifier,
                    entry.total()
                ),
                style,
            ))
        })
        .collect();

    let title = Line::from(vec![
        Span::styled(" Skills ", app.theme.title_style(focused)),
        Span::styled(
            format!("{spent}/{available} points "),
            Style::default().fg(app.theme.budget_color(spent, available)),
        ),
    ]);
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(app.theme.border_style(focused));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Render the last skill check
fn render_last_check(frame: &mut Frame, app: &App, area: Rect) {
    let line = match &app.last_check {
        Some(result) => Line::from(Span::styled(
            result.to_string(),
            app.theme.roll_result_style(
                result.roll.is_natural_20(),
                result.roll.is_natural_1(),
                result.success,
            ),
        )),
        None => Line::from(Span::styled("No checks rolled yet", app.theme.system_style())),
    };

    let title = format!(
        " Check: {} vs DC {} ({}) ",
        app.selected_skill(),
        app.dc,
        app.advantage.label()
    );
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(app.theme.border_style(false));

    frame.render_widget(Paragraph::new(line).block(block), area);
}

/// Render the status bar; a residual rules violation takes priority
fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let warning = app
        .character()
        .and_then(|c| app.engine.violations(c).into_iter().next());

    let line = match (warning, app.status_message()) {
        (Some(violation), _) => Line::from(Span::styled(
            format!(" warning: {violation}"),
            Style::default().fg(app.theme.over_budget),
        )),
        (None, Some(message)) => Line::from(format!(" {message}")),
        (None, None) => Line::from(Span::styled(
            format!(" {} character(s)", app.store.len()),
            app.theme.system_style(),
        )),
    };
    frame.render_widget(Paragraph::new(line), area);
}

/// Render the hotkey bar
fn render_hotkey_bar(frame: &mut Frame, app: &App, area: Rect) {
    let hotkeys = [
        ("Tab", "panel"),
        ("j/k", "move"),
        ("+/-", "change"),
        ("[/]", "character"),
        ("n/x", "add/remove"),
        ("c/p", "check/party"),
        ("d/D", "DC"),
        ("a", "advantage"),
        ("?", "help"),
        ("q", "quit"),
    ];

    let mut spans = Vec::new();
    for (key, action) in hotkeys {
        spans.push(Span::styled(
            format!(" {key}"),
            Style::default()
                .fg(app.theme.border_focused)
                .add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::styled(format!(" {action} "), app.theme.system_style()));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Render overlay
fn render_overlay(frame: &mut Frame, app: &App, overlay: &Overlay, area: Rect) {
    match overlay {
        Overlay::Help => render_help_overlay(frame, app, area),
        Overlay::Notice(message) => render_notice_overlay(frame, app, message, area),
    }
}

fn render_notice_overlay(frame: &mut Frame, app: &App, message: &str, area: Rect) {
    let popup_area = centered_rect_fixed(50, 7, area);

    // Clear the background
    frame.render_widget(Clear, popup_area);

    let text = vec![
        Line::from(""),
        Line::from(message.to_string()),
        Line::from(""),
        Line::from(Span::styled(
            "Press any key to continue",
            Style::default().add_modifier(Modifier::DIM),
        )),
    ];

    let block = Block::default()
        .title(" Notice ")
        .borders(Borders::ALL)
        .border_style(app.theme.border_style(true));

    let paragraph = Paragraph::new(text)
        .block(block)
        .wrap(Wrap { trim: true });

    frame.render_widget(paragraph, popup_area);
}

/// Render help overlay
fn render_help_overlay(frame: &mut Frame, app: &App, area: Rect) {
    let popup_area = centered_rect_fixed(52, 22, area);

    // Clear the background
    frame.render_widget(Clear, popup_area);

    let heading = Style::default().add_modifier(Modifier::UNDERLINED);
    let help_text = vec![
        Line::from(Span::styled(
            " Character Builder - Help ",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled("Navigation:", heading)),
        Line::from("  Tab            Switch attributes/skills"),
        Line::from("  j/k or ↑/↓     Move the cursor"),
        Line::from("  [ / ]          Previous/next character"),
        Line::from(""),
        Line::from(Span::styled("Building:", heading)),
        Line::from("  + or l or →    Raise attribute / spend point"),
        Line::from("  - or h or ←    Lower attribute / refund point"),
        Line::from("  n              Add a character"),
        Line::from("  x              Remove the character"),
        Line::from(""),
        Line::from(Span::styled("Skill checks:", heading)),
        Line::from("  c              Roll the skill under the cursor"),
        Line::from("  p              Roll for the best in the party"),
        Line::from("  d / D          Lower/raise the DC"),
        Line::from("  a              Cycle advantage"),
        Line::from(""),
        Line::from(Span::styled(
            "Press Esc or q to close",
            Style::default().add_modifier(Modifier::DIM),
        )),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(app.theme.border_style(true));

    let paragraph = Paragraph::new(help_text)
        .block(block)
        .wrap(Wrap { trim: false });

    frame.render_widget(paragraph, popup_area);
}
