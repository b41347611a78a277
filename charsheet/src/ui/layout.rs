//! Layout calculations for the character builder TUI

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Calculate the main layout areas
pub struct AppLayout {
    pub title_area: Rect,
    pub attributes_area: Rect,
    pub classes_area: Rect,
    pub skills_area: Rect,
    pub check_area: Rect,
    pub status_bar: Rect,
    pub hotkey_bar: Rect,
}

impl AppLayout {
    /// Calculate layout based on terminal size
    pub fn calculate(area: Rect) -> Self {
        // Main vertical split
        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Title bar
                Constraint::Min(12),   // Main content
                Constraint::Length(3), // Last skill check
                Constraint::Length(1), // Status bar
                Constraint::Length(1), // Hotkey bar
            ])
            .split(area);

        // Content area: attributes and classes on the left, skills on the right
        let content_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(main_chunks[1]);

        let left_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(10), Constraint::Min(5)])
            .split(content_chunks[0]);

        Self {
            title_area: main_chunks[0],
            attributes_area: left_chunks[0],
            classes_area: left_chunks[1],
            skills_area: content_chunks[1],
            check_area: main_chunks[2],
            status_bar: main_chunks[3],
            hotkey_bar: main_chunks[4],
        }
    }
}

/// Calculate fixed-size centered popup
pub fn centered_rect_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;

    Rect::new(x, y, width.min(area.width), height.min(area.height))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_popup_fits_small_terminal() {
        let area = Rect::new(0, 0, 20, 5);
        let popup = centered_rect_fixed(60, 9, area);
        assert_eq!(popup, Rect::new(0, 0, 20, 5));
    }

    #[test]
    fn test_popup_is_centered() {
        let area = Rect::new(0, 0, 100, 40);
        let popup = centered_rect_fixed(60, 10, area);
        assert_eq!(popup, Rect::new(20, 15, 60, 10));
    }
}
