use ratatui::layout::{Constraint, Direction, Layout as RatLayout, Rect};

pub struct Layout {
    pub inner_area: Rect, // Area inside the outer border
    pub tabs_area: Rect,
    pub sidebar_area: Rect,
    pub main_area: Rect,
    pub status_area: Rect,
}

impl Layout {
    /// Minimum inner size: the report form needs its six fields stacked
    /// (about 26 rows); narrower than 60 columns the details grid is unreadable
    pub const MIN_WIDTH: u16 = 60;
    pub const MIN_HEIGHT: u16 = 28;

    /// Sidebar never drops below this many columns while expanded
    const SIDEBAR_MIN_WIDTH: u16 = 22;

    pub fn calculate(size: Rect, sidebar_width_percent: u16, sidebar_collapsed: bool) -> Self {
        let width = size.width.max(Self::MIN_WIDTH + 2);
        let height = size.height.max(Self::MIN_HEIGHT + 2);
        let size = Rect::new(size.x, size.y, width, height);

        let inner_area = Rect::new(
            size.x + 1,
            size.y + 1,
            size.width.saturating_sub(2),
            size.height.saturating_sub(2),
        );

        // Between the minimum and 40%, always leaving the main pane 40 columns
        let sidebar_width = if sidebar_collapsed {
            0
        } else {
            let requested = (inner_area.width * sidebar_width_percent) / 100;
            let max_width = (inner_area.width * 40) / 100;
            requested
                .max(Self::SIDEBAR_MIN_WIDTH)
                .min(max_width)
                .min(inner_area.width.saturating_sub(40))
        };

        let vertical = RatLayout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Tabs
                Constraint::Min(1),    // Content (sidebar + main)
                Constraint::Length(1), // Status
            ])
            .split(inner_area);

        let horizontal = RatLayout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(sidebar_width), Constraint::Min(1)])
            .split(vertical[1]);

        Self {
            inner_area,
            tabs_area: vertical[0],
            sidebar_area: horizontal[0],
            main_area: horizontal[1],
            status_area: vertical[2],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapsed_sidebar_gives_main_full_width() {
        let layout = Layout::calculate(Rect::new(0, 0, 120, 40), 20, true);
        assert_eq!(layout.sidebar_area.width, 0);
        assert_eq!(layout.main_area.width, 118);
        assert_eq!(layout.status_area.y, 38);
    }

    #[test]
    fn test_sidebar_width_bounds() {
        let layout = Layout::calculate(Rect::new(0, 0, 120, 40), 20, false);
        assert_eq!(layout.sidebar_area.width, 23);

        let narrow = Layout::calculate(Rect::new(0, 0, 62, 40), 35, false);
        assert_eq!(narrow.sidebar_area.width, 20);
        assert_eq!(narrow.main_area.width, 40);
    }
}
