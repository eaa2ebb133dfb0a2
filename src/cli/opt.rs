//! Command line options
use std::path::PathBuf;

use clap::Parser;
use idcard::units::DEFAULT_DPI;

#[derive(Parser, Debug)]
/// Render an identity card (ID-1 / CR80) from a JSON card file to PNG
pub struct Options {
    /// The card configuration
    #[clap(default_value = "card_config.json")]
    pub config: PathBuf,

    /// Where to store the preview image
    #[clap(long, short = 'o', default_value = "card_preview.png")]
    pub out: PathBuf,

    /// Output resolution in dots per inch
    #[clap(long, default_value_t = DEFAULT_DPI)]
    pub dpi: f32,

    /// Draw text as bars instead of using system fonts.
    ///
    /// Useful to check the layout on a machine without the configured fonts.
    #[clap(long)]
    pub draft: bool,

    /// Additional font files to use (may be repeated)
    #[clap(long = "font", short = 'f')]
    pub fonts: Vec<PathBuf>,
}
