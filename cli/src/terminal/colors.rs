use colored::Color;

pub const PRIMARY: Color = Color::BrightGreen;
pub const ACCENT: Color = Color::BrightCyan;
pub const SEPARATOR: Color = Color::BrightBlack;
pub const TEXT_DEFAULT: Color = Color::White;
pub const CREATED: Color = Color::Green;
pub const UPDATED: Color = Color::Cyan;
pub const SKIPPED: Color = Color::BrightBlack;
pub const FAILED: Color = Color::Red;
