use launchpad_theme::{ThemeMode, create_theme};

use crate::cli::{OutputFormat, ThemeArgs};
use crate::client::CliResult;
use crate::output::render_theme;

pub(crate) fn handle_theme_show(args: &ThemeArgs, format: OutputFormat) -> CliResult<()> {
    render_theme(&create_theme(ThemeMode::parse(&args.mode)), format)
}

pub(crate) fn handle_theme_css(args: &ThemeArgs) -> CliResult<()> {
    println!("{}", create_theme(ThemeMode::parse(&args.mode)).css_root_block());
    Ok(())
}
