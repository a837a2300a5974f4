use clap::builder::{styling::AnsiColor, Styles};
use clap::Parser;

const ABOUT: &str = "Offline weather dashboard TUI";

const LONG_ABOUT: &str = "
Full-screen dashboard showing current conditions, derived metrics, and a
five-day forecast for a city, backed by a built-in offline dataset.

Cities with data: San Francisco, New York, London. Lookups are
case-insensitive; type a city in the search bar and press enter.
";

const STYLES: Styles = Styles::styled()
    .header(AnsiColor::Yellow.on_default())
    .usage(AnsiColor::Green.on_default())
    .literal(AnsiColor::Green.on_default())
    .placeholder(AnsiColor::Green.on_default());

#[derive(Parser, Debug)]
#[command(version, styles=STYLES, about=ABOUT, long_about = LONG_ABOUT)]
pub struct Args {
    #[arg(help = "City to show at startup (e.g. \"london\"); defaults to San Francisco")]
    pub city: Option<String>,
}
