//! # Card configuration
//!
//! The card is described by a JSON document with four sections:
//!
//! ```json
//! {
//!   "FontSettings": {
//!     "BadgeFontName": "Arial", "BadgeFontSizePoints": 10, "BadgeFontStyle": "Bold",
//!     "NameFontName": "Arial", "NameFontSizePoints": 9, "NameFontStyle": "Regular",
//!     "BottomFontName": "Arial", "BottomFontSizePoints": 6, "BottomFontStyle": "Italic"
//!   },
//!   "CardData": {
//!     "EmployeeId": "ID 0042", "FullName": "Jane Doe",
//!     "AdditionalText": "Valid until 12/2030", "CardMarginMm": 3
//!   },
//!   "Images": {
//!     "PhotoPath": "photo.jpg", "PhotoWidthCm": 2.5, "PhotoHeightCm": 3.2,
//!     "LogoPath": "logo.png", "LogoWidthCm": 2.0, "LogoHeightCm": 1.0
//!   },
//!   "PrinterSettings": {
//!     "EnablePhysicalPrinting": false, "IpAddress": "192.168.1.50", "Port": 9100
//!   }
//! }
//! ```
//!
//! Keys are case sensitive and unknown keys are ignored. Missing strings
//! are treated as empty (or as the default font family), missing numbers
//! as zero. Image paths are used as given, i.e. relative paths are
//! relative to the working directory.
//!
//! [`CardConfig`] is the raw document, [`CardSpec`] the validated card.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use thiserror::Error;

use crate::{
    font::{CardFonts, FontRole, FontSpec, FontStyle},
    units::PhysicalLength,
};

/// The family used when a font name is not configured
pub const DEFAULT_FAMILY: &str = "Arial";

/// Failure to load the card configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file does not exist
    #[error("configuration file {} not found", .0.display())]
    Missing(PathBuf),
    /// The configuration file could not be read
    #[error("failed to read {}", path.display())]
    Read {
        /// The file
        path: PathBuf,
        /// The underlying error
        #[source]
        source: io::Error,
    },
    /// The document is not valid JSON or does not match the schema
    #[error("malformed configuration at line {line}, column {column}")]
    Malformed {
        /// 1-based line of the error
        line: usize,
        /// 1-based column of the error
        column: usize,
        /// The parser error
        #[source]
        source: serde_json::Error,
    },
    /// A required section is absent or `null`
    #[error("configuration is incomplete: missing section {0:?}")]
    MissingSection(&'static str),
    /// A font size is zero, negative or not a number
    #[error("invalid font size {size} for the {role} font")]
    FontSize {
        /// Which font
        role: FontRole,
        /// The configured size in points
        size: f32,
    },
    /// A margin or image size is not a finite number
    #[error("invalid value {value} for {field}")]
    Dimension {
        /// The configuration key
        field: &'static str,
        /// The configured value
        value: f32,
    },
}

impl From<serde_json::Error> for ConfigError {
    fn from(source: serde_json::Error) -> Self {
        Self::Malformed {
            line: source.line(),
            column: source.column(),
            source,
        }
    }
}

/// The `FontSettings` section
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
#[allow(missing_docs)]
pub struct FontSettings {
    pub badge_font_name: Option<String>,
    pub badge_font_size_points: f32,
    pub badge_font_style: Option<String>,
    pub name_font_name: Option<String>,
    pub name_font_size_points: f32,
    pub name_font_style: Option<String>,
    pub bottom_font_name: Option<String>,
    pub bottom_font_size_points: f32,
    pub bottom_font_style: Option<String>,
}

/// The `CardData` section
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct CardData {
    /// Printed below the photo
    pub employee_id: Option<String>,
    /// Printed below the ID
    pub full_name: Option<String>,
    /// Printed at the bottom of the card, wrapped
    pub additional_text: Option<String>,
    /// The margin on all four sides
    pub card_margin_mm: f32,
}

/// The `Images` section
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
#[allow(missing_docs)]
pub struct Images {
    pub photo_path: Option<PathBuf>,
    pub photo_width_cm: f32,
    pub photo_height_cm: f32,
    pub logo_path: Option<PathBuf>,
    pub logo_width_cm: f32,
    pub logo_height_cm: f32,
}

/// The `PrinterSettings` section
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct PrinterSettings {
    /// Whether the card should be sent to a card printer
    pub enable_physical_printing: bool,
    /// Address of the printer
    pub ip_address: Option<String>,
    /// Port of the printer
    pub port: u16,
}

/// The raw configuration document
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
#[allow(missing_docs)]
pub struct CardConfig {
    pub font_settings: Option<FontSettings>,
    pub card_data: Option<CardData>,
    pub images: Option<Images>,
    pub printer_settings: Option<PrinterSettings>,
}

impl CardConfig {
    /// Parse a configuration document
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Read and parse a configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => ConfigError::Missing(path.to_owned()),
            _ => ConfigError::Read {
                path: path.to_owned(),
                source,
            },
        })?;
        Self::from_json(&text)
    }
}

/// An image slot as configured
#[derive(Debug, Clone, PartialEq)]
pub struct ImageSlot {
    /// The image file, if any
    pub path: Option<PathBuf>,
    /// Width of the box
    pub width: PhysicalLength,
    /// Height of the box
    pub height: PhysicalLength,
}

/// A validated card
#[derive(Debug, Clone, PartialEq)]
pub struct CardSpec {
    fonts: CardFonts,
    styles: [(FontRole, Option<String>); 3],
    employee_id: String,
    full_name: String,
    additional_text: String,
    margin: PhysicalLength,
    photo: ImageSlot,
    logo: ImageSlot,
    printer: PrinterSettings,
}

fn font_spec(
    role: FontRole,
    name: Option<String>,
    size: f32,
    style: Option<&str>,
) -> Result<FontSpec, ConfigError> {
    if !(size > 0.0) || !size.is_finite() {
        return Err(ConfigError::FontSize { role, size });
    }
    let family = name
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_FAMILY.to_owned());
    Ok(FontSpec::new(family, size, FontStyle::parse(style)))
}

fn dimension(field: &'static str, value: f32) -> Result<f32, ConfigError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ConfigError::Dimension { field, value })
    }
}

impl TryFrom<CardConfig> for CardSpec {
    type Error = ConfigError;

    fn try_from(config: CardConfig) -> Result<Self, Self::Error> {
        let fs = config
            .font_settings
            .ok_or(ConfigError::MissingSection("FontSettings"))?;
        let data = config
            .card_data
            .ok_or(ConfigError::MissingSection("CardData"))?;
        let images = config
            .images
            .ok_or(ConfigError::MissingSection("Images"))?;
        let printer = config
            .printer_settings
            .ok_or(ConfigError::MissingSection("PrinterSettings"))?;

        let fonts = CardFonts {
            badge: font_spec(
                FontRole::Badge,
                fs.badge_font_name,
                fs.badge_font_size_points,
                fs.badge_font_style.as_deref(),
            )?,
            name: font_spec(
                FontRole::Name,
                fs.name_font_name,
                fs.name_font_size_points,
                fs.name_font_style.as_deref(),
            )?,
            bottom: font_spec(
                FontRole::Bottom,
                fs.bottom_font_name,
                fs.bottom_font_size_points,
                fs.bottom_font_style.as_deref(),
            )?,
        };

        Ok(Self {
            fonts,
            styles: [
                (FontRole::Badge, fs.badge_font_style),
                (FontRole::Name, fs.name_font_style),
                (FontRole::Bottom, fs.bottom_font_style),
            ],
            employee_id: data.employee_id.unwrap_or_default(),
            full_name: data.full_name.unwrap_or_default(),
            additional_text: data.additional_text.unwrap_or_default(),
            margin: PhysicalLength::mm(dimension("CardMarginMm", data.card_margin_mm)?.max(0.0)),
            photo: ImageSlot {
                path: images.photo_path,
                width: PhysicalLength::cm(dimension("PhotoWidthCm", images.photo_width_cm)?),
                height: PhysicalLength::cm(dimension("PhotoHeightCm", images.photo_height_cm)?),
            },
            logo: ImageSlot {
                path: images.logo_path,
                width: PhysicalLength::cm(dimension("LogoWidthCm", images.logo_width_cm)?),
                height: PhysicalLength::cm(dimension("LogoHeightCm", images.logo_height_cm)?),
            },
            printer,
        })
    }
}

impl CardSpec {
    /// Load and validate a configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        CardConfig::load(path)?.try_into()
    }

    /// The resolved fonts
    pub fn fonts(&self) -> &CardFonts {
        &self.fonts
    }

    /// Style strings that were set but not understood
    ///
    /// These roles use the regular style.
    pub fn unrecognized_styles(&self) -> impl Iterator<Item = (FontRole, &str)> + '_ {
        self.styles.iter().filter_map(|(role, style)| {
            let style = style.as_deref()?;
            let unknown = !style.trim().is_empty() && FontStyle::try_parse(style).is_none();
            unknown.then_some((*role, style))
        })
    }

    /// The text for a role
    pub fn text(&self, role: FontRole) -> &str {
        match role {
            FontRole::Badge => &self.employee_id,
            FontRole::Name => &self.full_name,
            FontRole::Bottom => &self.additional_text,
        }
    }

    /// The margin on all four sides of the card
    pub fn margin(&self) -> PhysicalLength {
        self.margin
    }

    /// The photo slot
    pub fn photo(&self) -> &ImageSlot {
        &self.photo
    }

    /// The logo slot
    pub fn logo(&self) -> &ImageSlot {
        &self.logo
    }

    /// The printer settings
    pub fn printer(&self) -> &PrinterSettings {
        &self.printer
    }
}
