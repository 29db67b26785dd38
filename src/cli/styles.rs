// (c) 2024 Ross Younger
//! Terminal styles for help text and diagnostics.
//! Print styled text with anstream's macros so it degrades on dumb terminals.

use anstyle::{AnsiColor, Color, Style};
use clap::builder::styling::Styles;

pub(crate) const ERROR: Style = Style::new().bold().fg_color(Some(Color::Ansi(AnsiColor::Red)));
pub(crate) const WARNING: Style = Style::new()
    .bold()
    .fg_color(Some(Color::Ansi(AnsiColor::Yellow)));

const HEADING: Style = Style::new()
    .underline()
    .fg_color(Some(Color::Ansi(AnsiColor::Yellow)));
const PLACEHOLDER: Style = Style::new().fg_color(Some(Color::Ansi(AnsiColor::Cyan)));

pub(crate) const CLAP_STYLES: Styles = Styles::styled()
    .usage(HEADING)
    .header(HEADING)
    .literal(Style::new().bold())
    .placeholder(PLACEHOLDER)
    .error(ERROR)
    .invalid(WARNING)
    .valid(PLACEHOLDER.bold());
