#![warn(missing_docs)]
//! # CR80 identity cards
//!
//! This crate lays out and renders a single identity card in the ID-1 format
//! (85.60 × 53.98 mm, also known as CR80) into a bitmap.
//!
//! The card has a fixed set of regions: a photo box in the top left corner,
//! a logo box in the top right corner, an ID and a name line stacked below
//! the photo and a word-wrapped block of additional text anchored to the
//! bottom margin. All physical measurements are converted to pixels at a
//! single resolution, which is also the resolution used to size fonts.
//!
//! ```no_run
//! use idcard::{
//!     card::{CardConfig, CardSpec},
//!     compose::{render_card, RenderOptions},
//!     typeset::SystemFonts,
//! };
//!
//! let config = CardConfig::load("card_config.json").unwrap();
//! let card = CardSpec::try_from(config).unwrap();
//! let mut fonts = SystemFonts::new();
//! let rendered = render_card(&card, &mut fonts, &mut (), &RenderOptions::default()).unwrap();
//! rendered.save_png("card_preview.png").unwrap();
//! ```

pub mod canvas;
pub mod card;
pub mod compose;
pub mod error;
pub mod fit;
pub mod font;
pub mod geom;
pub mod stack;
pub mod typeset;
pub mod units;

pub use error::RenderError;
