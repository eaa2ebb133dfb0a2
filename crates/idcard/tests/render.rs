use std::path::Path;

use idcard::{
    canvas::{BLACK, LIGHT_GRAY, WHITE},
    card::{CardConfig, CardSpec},
    compose::{render_card, RenderEvent, RenderOptions, RenderedCard, Reporter, Slot},
    font::FontRole,
    stack::{BADGE_GAP, NAME_GAP},
    typeset::{DraftTypesetter, SystemFonts, Typesetter},
    RenderError,
};
use image::{ImageFormat, Rgba, RgbaImage};
use serde_json::{json, Value};

#[derive(Default)]
struct Events {
    assets: Vec<Slot>,
    styles: Vec<(FontRole, String)>,
}

impl Reporter for Events {
    fn report(&mut self, event: RenderEvent<'_>) {
        match event {
            RenderEvent::AssetUnavailable { slot, .. } => self.assets.push(slot),
            RenderEvent::StyleUnrecognized { role, style } => {
                self.styles.push((role, style.to_owned()))
            }
        }
    }
}

fn config(photo: &str, logo: &str, text: &str) -> Value {
    json!({
        "FontSettings": {
            "BadgeFontName": "Arial", "BadgeFontSizePoints": 10, "BadgeFontStyle": "Bold",
            "NameFontName": "Arial", "NameFontSizePoints": 9, "NameFontStyle": "Heavy",
            "BottomFontName": "Arial", "BottomFontSizePoints": 6, "BottomFontStyle": "Regular"
        },
        "CardData": {
            "EmployeeId": "ID 0042", "FullName": "Jane Doe",
            "AdditionalText": text, "CardMarginMm": 3
        },
        "Images": {
            "PhotoPath": photo, "PhotoWidthCm": 2.5, "PhotoHeightCm": 3.2,
            "LogoPath": logo, "LogoWidthCm": 2, "LogoHeightCm": 1
        },
        "PrinterSettings": { "EnablePhysicalPrinting": false, "IpAddress": "", "Port": 0 }
    })
}

fn card_from(config: &Value) -> CardSpec {
    let config = CardConfig::from_json(&config.to_string()).unwrap();
    CardSpec::try_from(config).unwrap()
}

fn card(photo: &str, logo: &str, text: &str) -> CardSpec {
    card_from(&config(photo, logo, text))
}

fn render(card: &CardSpec, events: &mut Events) -> RenderedCard {
    render_card(card, &mut DraftTypesetter, events, &RenderOptions::default()).unwrap()
}

fn write_png(path: &Path, w: u32, h: u32, color: Rgba<u8>) {
    RgbaImage::from_pixel(w, h, color)
        .save_with_format(path, ImageFormat::Png)
        .unwrap();
}

fn pixel(card: &RenderedCard, x: u32, y: u32) -> Rgba<u8> {
    card.canvas.pixel(x, y).unwrap()
}

#[test]
fn placeholders_for_missing_images() {
    let mut events = Events::default();
    let card = card("", "does/not/exist.png", "Valid until 12/2030");
    let rendered = render(&card, &mut events);

    assert_eq!((rendered.canvas.width(), rendered.canvas.height()), (1011, 638));
    assert_eq!(events.assets, [Slot::Photo, Slot::Logo]);
    assert_eq!(events.styles, [(FontRole::Name, "Heavy".to_owned())]);

    let photo = rendered.report.slot(Slot::Photo);
    assert!(photo.placeholder);
    // 3mm margin at 300 dpi
    assert!((photo.region.x - 35.433).abs() < 0.01);
    assert!((photo.region.y - 35.433).abs() < 0.01);
    assert!(rendered.report.logo.placeholder);

    // gray fill from the margin on, without an outline
    assert_eq!(pixel(&rendered, 35, 35), LIGHT_GRAY);
    assert_eq!(pixel(&rendered, 34, 34), WHITE);
    assert_eq!(pixel(&rendered, 330, 100), LIGHT_GRAY);
    assert_eq!(pixel(&rendered, 331, 100), WHITE);
    // the centered label
    assert_eq!(pixel(&rendered, 124, 224), BLACK);

    // the logo box ends at the right margin
    let logo = rendered.report.logo.region;
    assert!((logo.right() - (1011.0 - 35.433)).abs() < 0.01);
    assert_eq!(pixel(&rendered, 975, 40), LIGHT_GRAY);
    assert_eq!(pixel(&rendered, 976, 40), WHITE);
}

#[test]
fn placeholders_are_deterministic() {
    let card = card("", "", "Valid until 12/2030");
    let a = render(&card, &mut Events::default());
    let b = render(&card, &mut Events::default());
    assert_eq!(a.canvas.encode_png().unwrap(), b.canvas.encode_png().unwrap());
}

#[test]
fn photo_is_outlined_logo_is_not() {
    let dir = tempfile::tempdir().unwrap();
    let photo_path = dir.path().join("photo.png");
    let logo_path = dir.path().join("logo.png");
    let red = Rgba([255, 0, 0, 255]);
    let blue = Rgba([0, 0, 255, 255]);
    write_png(&photo_path, 30, 40, red);
    write_png(&logo_path, 40, 10, blue);

    let mut events = Events::default();
    let card = card(
        photo_path.to_str().unwrap(),
        logo_path.to_str().unwrap(),
        "",
    );
    let rendered = render(&card, &mut events);
    assert!(events.assets.is_empty());

    // 3:4 in a 2.5 x 3.2 cm box is limited by the height and centered
    let photo = rendered.report.photo;
    assert!(!photo.placeholder);
    assert!((photo.region.h - 377.953).abs() < 0.01);
    assert!((photo.region.x - 41.339).abs() < 0.01);
    assert_eq!(pixel(&rendered, 41, 200), BLACK);
    assert_eq!(pixel(&rendered, 38, 200), WHITE);
    let inside = pixel(&rendered, 150, 200);
    assert!(inside[0] > 250 && inside[1] < 5);

    // 4:1 in a 2 x 1 cm box is limited by the width and centered
    let logo = rendered.report.logo;
    assert!(!logo.placeholder);
    assert!((logo.region.w - 236.220).abs() < 0.01);
    assert!((logo.region.h - 59.055).abs() < 0.01);
    let top = logo.region.to_pixel_rect();
    let edge = pixel(&rendered, top.x as u32, (top.y + 10) as u32);
    assert!(edge[2] > 250 && edge[0] < 5, "logo edge is {:?}", edge);
    assert_eq!(pixel(&rendered, top.x as u32, (top.y - 1) as u32), WHITE);
}

#[test]
fn bottom_text_grows_upwards() {
    let short = render(&card("", "", "Valid until 12/2030"), &mut Events::default());
    let long_text = "Property of ACME Corporation. If found, please return to the front desk. ".repeat(4);
    let long = render(&card("", "", &long_text), &mut Events::default());

    let margin = 35.433;
    for rendered in [&short, &long] {
        let bottom = &rendered.report.text.bottom;
        assert!((bottom.region.bottom() - (638.0 - margin)).abs() < 0.01);
        assert!((bottom.region.x - margin).abs() < 0.01);
    }
    let short_h = short.report.text.bottom.wrapped_height.unwrap();
    let long_h = long.report.text.bottom.wrapped_height.unwrap();
    assert!(long_h > 2.0 * short_h);

    // the name line does not move
    assert_eq!(
        short.report.text.name.region,
        long.report.text.name.region
    );
}

#[test]
fn save_and_reload() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("card_preview.png");
    let rendered = render(&card("", "", "x"), &mut Events::default());
    rendered.save_png(&out).unwrap();
    let decoded = image::open(&out).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (1011, 638));
}

#[test]
fn huge_logo_box_is_clipped() {
    let mut config = config("", "", "Valid until 12/2030");
    config["Images"]["LogoWidthCm"] = json!(1e30);
    let mut events = Events::default();
    let rendered = render(&card_from(&config), &mut events);

    assert_eq!(events.assets, [Slot::Photo, Slot::Logo]);
    assert!(rendered.report.logo.placeholder);
    // nothing of the logo lands where it usually is
    assert_eq!(pixel(&rendered, 900, 40), WHITE);
    assert_eq!(pixel(&rendered, 35, 35), LIGHT_GRAY);
}

#[test]
fn oversized_photo_is_cropped() {
    let dir = tempfile::tempdir().unwrap();
    let photo_path = dir.path().join("photo.png");
    let red = Rgba([255, 0, 0, 255]);
    write_png(&photo_path, 40, 40, red);

    // a 10 m photo box covers the card
    let mut config = config(photo_path.to_str().unwrap(), "", "");
    config["Images"]["PhotoWidthCm"] = json!(1000);
    config["Images"]["PhotoHeightCm"] = json!(1000);
    let rendered = render(&card_from(&config), &mut Events::default());

    assert!(!rendered.report.photo.placeholder);
    let inside = pixel(&rendered, 500, 300);
    assert!(inside[0] > 250 && inside[1] < 5, "photo is {:?}", inside);
    // the left edge of the outline is the only one on the card
    assert_eq!(pixel(&rendered, 35, 300), BLACK);
}

#[test]
fn slot_policy_is_configurable() {
    let dir = tempfile::tempdir().unwrap();
    let photo_path = dir.path().join("photo.png");
    write_png(&photo_path, 30, 40, Rgba([255, 0, 0, 255]));
    let card = card(photo_path.to_str().unwrap(), "", "");

    let mut options = RenderOptions::default();
    options.photo.border = false;
    options.logo.border = true;
    let rendered = render_card(&card, &mut DraftTypesetter, &mut (), &options).unwrap();
    assert_ne!(pixel(&rendered, 41, 200), BLACK);
    assert!(rendered.report.logo.placeholder);
}

#[test]
fn system_fonts_layout() {
    let mut fonts = SystemFonts::new();
    if fonts.is_empty() {
        eprintln!("No system fonts installed, skipping");
        return;
    }
    let long_text = "Property of ACME Corporation. If found, please return to the front desk. ".repeat(4);
    let options = RenderOptions::default();
    let margin = 35.433;

    for text in ["", "Valid until 12/2030", long_text.as_str()] {
        let card = card("", "", text);
        let rendered = render_card(&card, &mut fonts, &mut (), &options).unwrap();
        let stack = &rendered.report.text;

        let line = fonts.line_height(&card.fonts().bottom, options.dpi).unwrap();
        let height = stack.bottom.wrapped_height.unwrap();
        let lines = height / line;
        assert!((lines - lines.round()).abs() < 1e-3, "{} lines", lines);
        assert!((stack.bottom.region.bottom() - (638.0 - margin)).abs() < 0.01);

        // the name is placed by the badge line, not by its own font
        let badge_line = fonts.line_height(&card.fonts().badge, options.dpi).unwrap();
        let photo = rendered.report.photo.region;
        let name_y = photo.bottom()
            + BADGE_GAP.to_pixels(options.dpi)
            + badge_line
            + NAME_GAP.to_pixels(options.dpi);
        assert!((stack.name.region.y - name_y).abs() < 0.01);

        // the placeholder label has ink inside the gray box
        let r = photo.to_pixel_rect();
        let label = (r.y as u32..r.bottom() as u32)
            .flat_map(|y| (r.x as u32..r.right() as u32).map(move |x| (x, y)))
            .any(|(x, y)| pixel(&rendered, x, y)[0] < 100);
        assert!(label, "no label in the photo placeholder");
    }
}

#[test]
fn bad_resolution_is_fatal() {
    let card = card("", "", "");
    let options = RenderOptions::with_dpi(0.0);
    let result = render_card(&card, &mut DraftTypesetter, &mut (), &options);
    assert!(matches!(result, Err(RenderError::Canvas { .. })));
}
