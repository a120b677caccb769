use ratatui::layout::{Constraint, Flex, Layout, Rect};

pub struct MainAreas {
    pub header: Rect,
    pub filters: Rect,
    pub table: Rect,
    pub status: Rect,
}

pub fn main_areas(area: Rect) -> MainAreas {
    let [header, filters, table, status] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Min(3),
        Constraint::Length(2),
    ])
    .areas(area);
    MainAreas {
        header,
        filters,
        table,
        status,
    }
}

/// A rectangle of `percent_x` by `percent_y` centered in `area`.
pub fn centered(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let [row] = Layout::vertical([Constraint::Percentage(percent_y)])
        .flex(Flex::Center)
        .areas(area);
    let [cell] = Layout::horizontal([Constraint::Percentage(percent_x)])
        .flex(Flex::Center)
        .areas(row);
    cell
}
