//! Color theme and styling for the character builder TUI

use ratatui::style::{Color, Modifier, Style};

/// UI color theme
#[derive(Debug, Clone)]
pub struct GameTheme {
    // Base colors
    pub foreground: Color,
    pub border: Color,
    pub border_focused: Color,
    pub cursor: Color,

    // Budget colors
    pub budget_open: Color,
    pub budget_full: Color,
    pub over_budget: Color,

    // Roll result colors
    pub crit_success: Color,
    pub success: Color,
    pub failure: Color,
    pub crit_failure: Color,

    // Class list
    pub qualified: Color,
    pub system_text: Color,
}

impl Default for GameTheme {
    fn default() -> Self {
        Self {
            foreground: Color::White,
            border: Color::DarkGray,
            border_focused: Color::Cyan,
            cursor: Color::Yellow,

            budget_open: Color::Green,
            budget_full: Color::Yellow,
            over_budget: Color::Red,

            crit_success: Color::Yellow,
            success: Color::Green,
            failure: Color::DarkGray,
            crit_failure: Color::Red,

            qualified: Color::LightGreen,
            system_text: Color::DarkGray,
        }
    }
}

impl GameTheme {
    pub fn text_style(&self) -> Style {
        Style::default().fg(self.foreground)
    }

    /// Get style for system messages
    pub fn system_style(&self) -> Style {
        Style::default()
            .fg(self.system_text)
            .add_modifier(Modifier::DIM)
    }

    /// Style for a list row, highlighted when under the cursor of a focused panel
    pub fn row_style(&self, is_cursor: bool, focused: bool) -> Style {
        match (is_cursor, focused) {
            (true, true) => Style::default()
                .fg(self.cursor)
                .add_modifier(Modifier::BOLD | Modifier::REVERSED),
            (true, false) => Style::default().fg(self.cursor),
            _ => self.text_style(),
        }
    }

    /// Budget color from points spent against points available
    pub fn budget_color(&self, spent: u32, available: u32) -> Color {
        if spent > available {
            self.over_budget
        } else if spent == available {
            self.budget_full
        } else {
            self.budget_open
        }
    }

    pub fn class_style(&self, qualified: bool) -> Style {
        if qualified {
            Style::default()
                .fg(self.qualified)
                .add_modifier(Modifier::BOLD)
        } else {
            self.system_style()
        }
    }

    /// Get style for dice roll result
    pub fn roll_result_style(&self, is_crit: bool, is_fumble: bool, success: bool) -> Style {
        if is_crit {
            Style::default()
                .fg(self.crit_success)
                .add_modifier(Modifier::BOLD)
        } else if is_fumble {
            Style::default()
                .fg(self.crit_failure)
                .add_modifier(Modifier::BOLD)
        } else if success {
            Style::default().fg(self.success)
        } else {
            Style::default().fg(self.failure)
        }
    }

    /// Get border style
    pub fn border_style(&self, focused: bool) -> Style {
        Style::default().fg(if focused {
            self.border_focused
        } else {
            self.border
        })
    }

    /// Get title style
    pub fn title_style(&self, focused: bool) -> Style {
        let style = Style::default().fg(if focused {
            self.border_focused
        } else {
            self.foreground
        });

        if focused {
            style.add_modifier(Modifier::BOLD)
        } else {
            style
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_budget_color() {
        let theme = GameTheme::default();
        assert_eq!(theme.budget_color(3, 10), theme.budget_open);
        assert_eq!(theme.budget_color(10, 10), theme.budget_full);
        assert_eq!(theme.budget_color(11, 10), theme.over_budget);
    }
}
