//! Layout helpers shared by the views.

use ratatui::layout::{Constraint, Flex, Layout, Rect};

/// Centres a rectangle in `r` sized as a percentage of it, clamped between
/// `min` and `max` (never exceeding `r` itself).
pub fn centered_min_max(percent_x: u16, percent_y: u16, min: Rect, max: Rect, r: Rect) -> Rect {
    let width = (r.width as u32 * percent_x as u32 / 100) as u16;
    let height = (r.height as u32 * percent_y as u32 / 100) as u16;
    let width = width.clamp(min.width, max.width.max(min.width)).min(r.width);
    let height = height.clamp(min.height, max.height.max(min.height)).min(r.height);

    let [row] = Layout::vertical([Constraint::Length(height)]).flex(Flex::Center).areas(r);
    let [area] = Layout::horizontal([Constraint::Length(width)]).flex(Flex::Center).areas(row);
    area
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centered_min_max_respects_bounds() {
        let min = Rect::new(0, 0, 80, 15);
        let max = Rect::new(0, 0, 160, 40);

        let small = centered_min_max(75, 95, min, max, Rect::new(0, 0, 90, 20));
        assert_eq!((small.width, small.height), (80, 19));

        let large = centered_min_max(75, 95, min, max, Rect::new(0, 0, 300, 100));
        assert_eq!((large.width, large.height), (160, 40));
        assert_eq!(large.x, 70);

        let tiny = centered_min_max(75, 95, min, max, Rect::new(0, 0, 40, 10));
        assert_eq!((tiny.width, tiny.height), (40, 10));
    }
}
