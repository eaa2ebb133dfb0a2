//! # Command line interface
use std::path::Path;

use color_eyre::eyre::{self, WrapErr};
use env_logger::Env;
use idcard::{
    card::CardSpec,
    compose::{render_card, RenderOptions, RenderedCard},
    typeset::{DraftTypesetter, SystemFonts},
};
use log::{info, LevelFilter};

pub mod opt;
pub mod print;
pub mod report;

use opt::Options;
use report::LogReporter;

/// Set up CLI
pub fn init<T: clap::Parser>() -> color_eyre::Result<T> {
    color_eyre::install()?;
    env_logger::Builder::new()
        .filter_level(LevelFilter::Info)
        .format_timestamp(None)
        .parse_env(Env::new().filter("IDCARD_TOOL_LOG"))
        .init();
    let args = T::parse();
    Ok(args)
}

fn render(card: &CardSpec, opt: &Options) -> eyre::Result<RenderedCard> {
    let options = RenderOptions::with_dpi(opt.dpi);
    let mut reporter = LogReporter;
    if opt.draft {
        let rendered = render_card(card, &mut DraftTypesetter, &mut reporter, &options)?;
        return Ok(rendered);
    }

    let mut fonts = SystemFonts::new();
    for path in &opt.fonts {
        fonts
            .load_font_file(path)
            .wrap_err_with(|| format!("Failed to load font file `{}`", path.display()))?;
    }
    if fonts.is_empty() {
        eyre::bail!("No fonts found on this system, use `--font` to add one or `--draft`");
    }
    let rendered = render_card(card, &mut fonts, &mut reporter, &options)?;
    Ok(rendered)
}

/// Load the card, render it and write the preview
pub fn run(opt: &Options) -> eyre::Result<()> {
    let card = CardSpec::load(&opt.config).wrap_err_with(|| {
        format!(
            "Failed to load card configuration `{}`",
            opt.config.display()
        )
    })?;
    info!("Loaded card configuration from `{}`", opt.config.display());

    let rendered = render(&card, opt).wrap_err("Failed to render card")?;
    save(&rendered, &opt.out)?;
    info!("Saved card preview as `{}`", opt.out.display());

    print::print_card(card.printer(), &opt.out);
    Ok(())
}

fn save(rendered: &RenderedCard, out: &Path) -> eyre::Result<()> {
    rendered
        .save_png(out)
        .wrap_err_with(|| format!("Failed to save card preview `{}`", out.display()))
}
