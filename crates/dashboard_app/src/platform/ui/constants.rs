use std::time::Duration;

use ratatui::style::Color;

/// How long the event loop waits for input before draining client events.
pub const TICK_RATE: Duration = Duration::from_millis(75);

pub const TITLE: &str = " Job Scheduler Dashboard ";

pub const LIST_HELP: &str =
    "↑/↓ select  Enter details  r run  n new  s status  p priority  R refresh  q quit";
pub const DETAIL_HELP: &str = "Esc close";
pub const FORM_HELP: &str = "Tab next field  ←/→ priority  Ctrl+S create  Esc cancel";

pub const EMPTY_LIST: &str = "No jobs found";
pub const EMPTY_LIST_HINT: &str = "Press n to create a new job";
pub const LOADING: &str = "Loading jobs...";

pub const COL_ID: u16 = 6;
pub const COL_PRIORITY: u16 = 8;
pub const COL_STATUS: u16 = 10;
pub const COL_CREATED: u16 = 19;
pub const COL_ACTION: u16 = 10;

/// Popup size as a percentage of the terminal.
pub const DETAIL_POPUP: (u16, u16) = (70, 70);
pub const FORM_POPUP: (u16, u16) = (60, 60);

pub const ACCENT: Color = Color::Cyan;
pub const INFO: Color = Color::Green;
pub const ERROR: Color = Color::Red;
pub const MUTED: Color = Color::DarkGray;
