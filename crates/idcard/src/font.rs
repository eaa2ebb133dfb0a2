//! # Font descriptions
//!
//! A font is requested by family name, size in points and a set of style
//! flags. Style names follow the usual conventions of desktop font
//! dialogs (`Regular`, `Bold`, `Italic`, `Underline`, `Strikeout`) and
//! may be combined as a comma separated list.

use std::fmt;

use bitflags::bitflags;

bitflags! {
    /// Style flags of a font
    #[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
    pub struct FontStyle: u8 {
        /// Heavy weight
        const BOLD = 0b0001;
        /// Slanted
        const ITALIC = 0b0010;
        /// Line below the baseline
        const UNDERLINE = 0b0100;
        /// Line through the middle
        const STRIKEOUT = 0b1000;
    }
}

impl FontStyle {
    /// No styling
    pub const REGULAR: Self = Self::empty();

    fn from_style_name(name: &str) -> Option<Self> {
        match name {
            "Regular" => Some(Self::REGULAR),
            "Bold" => Some(Self::BOLD),
            "Italic" => Some(Self::ITALIC),
            "Underline" => Some(Self::UNDERLINE),
            "Strikeout" => Some(Self::STRIKEOUT),
            _ => None,
        }
    }

    /// Parse a style string
    ///
    /// Accepts a single style name, a comma separated list of names or the
    /// decimal value of the flags. Names are case sensitive.
    ///
    /// ```
    /// use idcard::font::FontStyle;
    /// assert_eq!(FontStyle::try_parse("Bold"), Some(FontStyle::BOLD));
    /// assert_eq!(FontStyle::try_parse("Bold, Italic"), Some(FontStyle::BOLD | FontStyle::ITALIC));
    /// assert_eq!(FontStyle::try_parse("3"), Some(FontStyle::BOLD | FontStyle::ITALIC));
    /// assert_eq!(FontStyle::try_parse("Heavy"), None);
    /// ```
    pub fn try_parse(input: &str) -> Option<Self> {
        let input = input.trim();
        if input.is_empty() {
            return None;
        }
        if input.bytes().all(|b| b.is_ascii_digit()) {
            return input.parse::<u8>().ok().map(Self::from_bits_truncate);
        }
        input
            .split(',')
            .map(|name| Self::from_style_name(name.trim()))
            .try_fold(Self::REGULAR, |acc, style| Some(acc | style?))
    }

    /// Parse an optional style string, falling back to [`FontStyle::REGULAR`]
    ///
    /// This never fails.
    pub fn parse(input: Option<&str>) -> Self {
        input.and_then(Self::try_parse).unwrap_or_default()
    }

    /// Whether a bold weight is requested
    pub fn is_bold(self) -> bool {
        self.contains(Self::BOLD)
    }

    /// Whether an italic face is requested
    pub fn is_italic(self) -> bool {
        self.contains(Self::ITALIC)
    }
}

impl fmt::Display for FontStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("Regular");
        }
        let names = [
            (Self::BOLD, "Bold"),
            (Self::ITALIC, "Italic"),
            (Self::UNDERLINE, "Underline"),
            (Self::STRIKEOUT, "Strikeout"),
        ];
        let mut first = true;
        for (flag, name) in names {
            if self.contains(flag) {
                if !first {
                    f.write_str(", ")?;
                }
                f.write_str(name)?;
                first = false;
            }
        }
        Ok(())
    }
}

/// The text roles on a card
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum FontRole {
    /// The employee ID below the photo
    Badge,
    /// The full name below the ID
    Name,
    /// The additional text at the bottom
    Bottom,
}

impl fmt::Display for FontRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Badge => f.write_str("badge"),
            Self::Name => f.write_str("name"),
            Self::Bottom => f.write_str("bottom"),
        }
    }
}

/// A fully resolved font request
#[derive(Debug, Clone, PartialEq)]
pub struct FontSpec {
    /// The font family name, e.g. `Arial`
    pub family: String,
    /// The em size in points
    pub size_pt: f32,
    /// Style flags
    pub style: FontStyle,
}

impl FontSpec {
    /// Create a new font request
    pub fn new(family: impl Into<String>, size_pt: f32, style: FontStyle) -> Self {
        Self {
            family: family.into(),
            size_pt,
            style,
        }
    }

    /// The font used for placeholder labels (Arial, 8pt)
    pub fn label() -> Self {
        Self::new("Arial", 8.0, FontStyle::REGULAR)
    }

    /// The em size in pixels at `dpi`
    pub fn size_px(&self, dpi: f32) -> f32 {
        crate::units::pixels(self.size_pt, crate::units::Unit::Point, dpi)
    }
}

impl fmt::Display for FontSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}pt ({})", self.family, self.size_pt, self.style)
    }
}

/// The fonts of the three text roles of a card
#[derive(Debug, Clone, PartialEq)]
pub struct CardFonts {
    /// Employee ID
    pub badge: FontSpec,
    /// Full name
    pub name: FontSpec,
    /// Additional text
    pub bottom: FontSpec,
}

#[cfg(test)]
mod tests {
    use super::{FontSpec, FontStyle};

    #[test]
    fn test_parse_names() {
        assert_eq!(FontStyle::try_parse("Regular"), Some(FontStyle::REGULAR));
        assert_eq!(FontStyle::try_parse(" Italic "), Some(FontStyle::ITALIC));
        assert_eq!(
            FontStyle::try_parse("Bold,Underline, Strikeout"),
            Some(FontStyle::BOLD | FontStyle::UNDERLINE | FontStyle::STRIKEOUT)
        );
    }

    #[test]
    fn test_style_names_are_not_flag_names() {
        // flag names are upper case, style names are not
        assert_eq!(FontStyle::from_name("BOLD"), Some(FontStyle::BOLD));
        assert_eq!(FontStyle::try_parse("BOLD"), None);
        assert_eq!(FontStyle::from_name("Regular"), None);
        assert_eq!(FontStyle::try_parse("Strikeout"), Some(FontStyle::STRIKEOUT));
    }

    #[test]
    fn test_parse_is_case_sensitive() {
        assert_eq!(FontStyle::try_parse("bold"), None);
        assert_eq!(FontStyle::parse(Some("bold")), FontStyle::REGULAR);
    }

    #[test]
    fn test_parse_falls_back_to_regular() {
        assert_eq!(FontStyle::parse(None), FontStyle::REGULAR);
        assert_eq!(FontStyle::parse(Some("")), FontStyle::REGULAR);
        assert_eq!(FontStyle::parse(Some("Bold, Heavy")), FontStyle::REGULAR);
        assert_eq!(FontStyle::parse(Some("Bold,")), FontStyle::REGULAR);
        assert_eq!(FontStyle::parse(Some("999")), FontStyle::REGULAR);
    }

    #[test]
    fn test_numeric_styles() {
        assert_eq!(FontStyle::parse(Some("0")), FontStyle::REGULAR);
        assert_eq!(
            FontStyle::parse(Some("12")),
            FontStyle::UNDERLINE | FontStyle::STRIKEOUT
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(FontStyle::REGULAR.to_string(), "Regular");
        assert_eq!((FontStyle::BOLD | FontStyle::ITALIC).to_string(), "Bold, Italic");
        let spec = FontSpec::new("Arial", 10.0, FontStyle::BOLD);
        assert_eq!(spec.to_string(), "Arial 10pt (Bold)");
        assert_eq!(FontSpec::label().size_px(72.0), 8.0);
    }
}
