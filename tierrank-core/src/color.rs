/// Tier color contrast helpers.
///
/// Tier labels are drawn on user-chosen background colors; the text color
/// flips between black and white based on WCAG 2.0 relative luminance.

/// Perceived luminance of an sRGB color, 0.0 (black) to 1.0 (white).
/// Formula from WCAG 2.0.
fn relative_luminance(rgb: [u8; 3]) -> f64 {
    let channel = |v: u8| {
        let v = v as f64 / 255.0;
        if v <= 0.03928 {
            v / 12.92
        } else {
            ((v + 0.055) / 1.055).powf(2.4)
        }
    };
    0.2126 * channel(rgb[0]) + 0.7152 * channel(rgb[1]) + 0.0722 * channel(rgb[2])
}

/// Whether a color reads as "dark" (luminance below 0.5).
pub fn is_color_dark(rgb: [u8; 3]) -> bool {
    relative_luminance(rgb) < 0.5
}

/// Parse a `#rrggbb` hex color. Returns `None` for anything else.
pub fn parse_hex(hex: &str) -> Option<[u8; 3]> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some([r, g, b])
}

/// Black or white, whichever contrasts with the given background.
/// Unparseable colors get black text.
pub fn contrast_text_color(background_hex: &str) -> &'static str {
    match parse_hex(background_hex) {
        Some(rgb) if is_color_dark(rgb) => "#FFFFFF",
        _ => "#000000",
    }
}
