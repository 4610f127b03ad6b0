//! Small color helpers shared by the processing stages.

/// Fallback used when a light leak color string fails to parse.
pub const LEAK_FALLBACK_RGB: [u8; 3] = [255, 128, 0];

/// Parses a 6-hex-digit RGB string, optionally prefixed with `#`.
pub fn parse_hex(s: &str) -> Option<[u8; 3]> {
    let hex = s.strip_prefix('#').unwrap_or(s);
    if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let v = u32::from_str_radix(hex, 16).ok()?;
    Some([(v >> 16) as u8, (v >> 8) as u8, v as u8])
}

/// Like [`parse_hex`], but malformed input resolves to the fixed fallback.
pub fn parse_hex_or_fallback(s: &str) -> [u8; 3] {
    parse_hex(s).unwrap_or(LEAK_FALLBACK_RGB)
}

/// Formats an RGB triple as `#RRGGBB`.
pub fn to_hex(rgb: [u8; 3]) -> String {
    format!("#{:02X}{:02X}{:02X}", rgb[0], rgb[1], rgb[2])
}

/// Rec. 709 relative luminance of normalized channels.
pub fn luma(r: f32, g: f32, b: f32) -> f32 {
    0.2126 * r + 0.7152 * g + 0.0722 * b
}
