use chrono::{DateTime, Local, NaiveDateTime};
use dashboard_core::{
    AppViewModel, BannerKind, CreateFormView, DetailView, FormField, JobRowView, JobStatus,
    Priority, RunAction, StatusBanner,
};
use ratatui::layout::{Alignment, Constraint, Rect};
use ratatui::style::{Color, Modifier, Style, Stylize};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Cell, Clear, Paragraph, Row, Table, TableState, Wrap};
use ratatui::Frame;

use super::constants::*;
use super::layout::{centered, main_areas};

pub fn render(frame: &mut Frame, view: &AppViewModel, table: &mut TableState) {
    let areas = main_areas(frame.area());

    frame.render_widget(
        Paragraph::new(TITLE).style(Style::new().fg(ACCENT).add_modifier(Modifier::BOLD)),
        areas.header,
    );
    frame.render_widget(filters_line(view), areas.filters);
    render_jobs(frame, view, table, areas.table);
    render_status(frame, view, areas.status);

    if let Some(detail) = &view.detail {
        render_detail(frame, detail);
    }
    if let Some(form) = &view.create_form {
        render_form(frame, form);
    }
}

fn filters_line(view: &AppViewModel) -> Line<'static> {
    let status = view.status_filter.map_or("All", JobStatus::label);
    let priority = view.priority_filter.map_or("All", Priority::as_str);
    Line::from(vec![
        Span::raw("Status: "),
        Span::styled(format!("[{status}]"), Style::new().fg(ACCENT)),
        Span::raw("  Priority: "),
        Span::styled(format!("[{priority}]"), Style::new().fg(ACCENT)),
        Span::raw("  "),
        Span::styled(format!("Jobs ({})", view.job_count), Style::new().bold()),
    ])
}

fn render_jobs(frame: &mut Frame, view: &AppViewModel, table: &mut TableState, area: Rect) {
    let block = Block::bordered().title(" Jobs ");

    if view.loading || view.jobs.is_empty() {
        let lines = if view.loading {
            vec![Line::from(LOADING)]
        } else {
            vec![
                Line::from(EMPTY_LIST).bold(),
                Line::from(EMPTY_LIST_HINT).fg(MUTED),
            ]
        };
        frame.render_widget(
            Paragraph::new(lines).alignment(Alignment::Center).block(block),
            area,
        );
        return;
    }

    let header = Row::new(["ID", "Task Name", "Priority", "Status", "Created", ""])
        .style(Style::new().add_modifier(Modifier::BOLD | Modifier::UNDERLINED));
    let rows = view.jobs.iter().map(job_row);
    let widths = [
        Constraint::Length(COL_ID),
        Constraint::Min(12),
        Constraint::Length(COL_PRIORITY),
        Constraint::Length(COL_STATUS),
        Constraint::Length(COL_CREATED),
        Constraint::Length(COL_ACTION),
    ];
    let widget = Table::new(rows, widths)
        .header(header)
        .block(block)
        .row_highlight_style(Style::new().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    frame.render_stateful_widget(widget, area, table);
}

fn job_row(row: &JobRowView) -> Row<'static> {
    let action = match row.run_action {
        RunAction::Hidden => Cell::from(""),
        RunAction::Available => Cell::from("[r] Run").fg(ACCENT),
        RunAction::InFlight => Cell::from("Running").fg(MUTED),
    };
    Row::new(vec![
        Cell::from(format!("#{}", row.job_id)),
        Cell::from(row.task_name.clone()),
        Cell::from(row.priority.as_str()).fg(priority_color(row.priority)),
        Cell::from(row.status.label()).fg(status_color(row.status)),
        Cell::from(format_timestamp(&row.created_at)),
        action,
    ])
}

fn render_status(frame: &mut Frame, view: &AppViewModel, area: Rect) {
    let banner = match &view.banner {
        Some(banner) => {
            let color = match banner.kind {
                BannerKind::Info => INFO,
                BannerKind::Error => ERROR,
            };
            Line::from(vec![
                Span::styled(banner.text.clone(), Style::new().fg(color)),
                Span::styled("  (Esc to dismiss)", Style::new().fg(MUTED)),
            ])
        }
        None => Line::default(),
    };
    let help = if view.create_form.is_some() {
        FORM_HELP
    } else if view.detail.is_some() {
        DETAIL_HELP
    } else {
        LIST_HELP
    };
    frame.render_widget(
        Paragraph::new(vec![banner, Line::from(help).fg(MUTED)]),
        area,
    );
}

fn render_detail(frame: &mut Frame, detail: &DetailView) {
    let (width, height) = DETAIL_POPUP;
    let area = centered(frame.area(), width, height);

    let mut lines = vec![
        field_line("ID", format!("#{}", detail.job_id)),
        field_line("Task Name", detail.task_name.clone()),
        Line::from(vec![
            Span::styled("Status: ", Style::new().bold()),
            Span::styled(detail.status.label(), Style::new().fg(status_color(detail.status))),
        ]),
        Line::from(vec![
            Span::styled("Priority: ", Style::new().bold()),
            Span::styled(
                detail.priority.as_str(),
                Style::new().fg(priority_color(detail.priority)),
            ),
        ]),
        field_line("Created", format_timestamp(&detail.created_at)),
        field_line("Updated", format_timestamp(&detail.updated_at)),
    ];
    if let Some(completed_at) = &detail.completed_at {
        lines.push(field_line("Completed", format_timestamp(completed_at)));
    }
    lines.push(Line::default());
    lines.push(Line::from("Payload:").bold());
    lines.extend(
        detail
            .payload_pretty
            .lines()
            .map(|line| Line::from(line.to_string()).fg(MUTED)),
    );
    if let Some(banner) = detail.banner {
        lines.push(Line::default());
        lines.push(Line::from(banner.text()).fg(status_banner_color(banner)));
    }

    let block = Block::bordered()
        .title(format!(" Job #{} ", detail.job_id))
        .border_style(Style::new().fg(ACCENT));
    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(lines).wrap(Wrap { trim: false }).block(block),
        area,
    );
}

fn render_form(frame: &mut Frame, form: &CreateFormView) {
    let (width, height) = FORM_POPUP;
    let area = centered(frame.area(), width, height);

    let mut lines = vec![
        Line::from(vec![
            focus_marker(form, FormField::TaskName),
            Span::styled("Task name: ", Style::new().bold()),
            Span::raw(form.task_name.clone()),
        ]),
        Line::from(vec![
            focus_marker(form, FormField::Priority),
            Span::styled("Priority: ", Style::new().bold()),
            Span::styled(
                format!("< {} >", form.priority),
                Style::new().fg(priority_color(form.priority)),
            ),
        ]),
        Line::from(vec![
            focus_marker(form, FormField::Payload),
            Span::styled("Payload (JSON):", Style::new().bold()),
        ]),
    ];
    lines.extend(
        form.payload
            .split('\n')
            .map(|line| Line::from(format!("  {line}"))),
    );
    lines.push(Line::default());
    if let Some(error) = &form.error {
        lines.push(Line::from(error.clone()).fg(ERROR));
    }
    if form.submitting {
        lines.push(Line::from("Creating...").fg(MUTED));
    }

    let block = Block::bordered()
        .title(" Create New Job ")
        .border_style(Style::new().fg(ACCENT));
    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(lines).wrap(Wrap { trim: false }).block(block),
        area,
    );
}

fn focus_marker(form: &CreateFormView, field: FormField) -> Span<'static> {
    if form.focus == field {
        Span::styled("▶ ", Style::new().fg(ACCENT))
    } else {
        Span::raw("  ")
    }
}

fn field_line(label: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{label}: "), Style::new().bold()),
        Span::raw(value),
    ])
}

fn status_color(status: JobStatus) -> Color {
    match status {
        JobStatus::Pending => Color::Yellow,
        JobStatus::Running => Color::Blue,
        JobStatus::Completed => Color::Green,
        JobStatus::Failed => Color::Red,
    }
}

fn priority_color(priority: Priority) -> Color {
    match priority {
        Priority::Low => Color::Green,
        Priority::Medium => Color::Yellow,
        Priority::High => Color::Red,
    }
}

fn status_banner_color(banner: StatusBanner) -> Color {
    match banner {
        StatusBanner::Completed => Color::Green,
        StatusBanner::Running => Color::Blue,
        StatusBanner::Failed => Color::Red,
    }
}

/// Service timestamps in local time. Offset-less values are shown as sent;
/// anything unparseable is passed through untouched.
pub fn format_timestamp(raw: &str) -> String {
    const DISPLAY: &str = "%Y-%m-%d %H:%M:%S";
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return parsed.with_timezone(&Local).format(DISPLAY).to_string();
    }
    match NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        Ok(naive) => naive.format(DISPLAY).to_string(),
        Err(_) => raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dashboard_core::{BannerView, Job};
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;
    use serde_json::json;

    fn buffer_text(view: &AppViewModel) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        let mut table = TableState::default();
        terminal
            .draw(|frame| render(frame, view, &mut table))
            .unwrap();
        let buffer = terminal.backend().buffer();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn offsetless_and_garbage_timestamps() {
        assert_eq!(
            format_timestamp("2024-05-01T10:00:00.123456"),
            "2024-05-01 10:00:00"
        );
        assert_eq!(format_timestamp("yesterday"), "yesterday");
    }

    #[test]
    fn rfc3339_timestamps_are_reformatted() {
        let shown = format_timestamp("2024-05-01T10:00:00Z");
        assert_eq!(shown.len(), "2024-05-01 10:00:00".len());
        assert!(!shown.contains('T'));
    }

    #[test]
    fn empty_list_shows_hint() {
        let text = buffer_text(&AppViewModel::default());
        assert!(text.contains(EMPTY_LIST));
        assert!(text.contains(EMPTY_LIST_HINT));
        assert!(text.contains("Jobs (0)"));
    }

    #[test]
    fn loading_hides_rows() {
        let view = AppViewModel {
            loading: true,
            ..AppViewModel::default()
        };
        let text = buffer_text(&view);
        assert!(text.contains(LOADING));
        assert!(!text.contains(EMPTY_LIST));
    }

    #[test]
    fn detail_popup_shows_status_banner() {
        let job = Job {
            id: 7,
            task_name: "send-report".to_string(),
            payload: json!({"to": "ops"}),
            priority: Priority::High,
            status: JobStatus::Failed,
            created_at: "2024-05-01T10:00:00Z".to_string(),
            updated_at: "2024-05-01T10:05:00Z".to_string(),
            completed_at: None,
        };
        let view = AppViewModel {
            detail: Some(DetailView::from_job(&job)),
            banner: Some(BannerView {
                kind: BannerKind::Error,
                text: "Failed to run job #7: boom".to_string(),
            }),
            ..AppViewModel::default()
        };
        let text = buffer_text(&view);
        assert!(text.contains("Job #7"));
        assert!(text.contains("send-report"));
        assert!(text.contains(StatusBanner::Failed.text()));
        assert!(!text.contains("Completed:"));
        assert!(text.contains("Failed to run job #7: boom"));
    }
}
