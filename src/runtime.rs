// Copyright (c) 2026 rezky_nightky

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorMode {
    Mono,
    Color16,
    Color256,
    TrueColor,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum GlyphSet {
    /// ASCII when `LANG` is not UTF-8, unicode otherwise.
    #[value(name = "auto")]
    Auto,
    #[value(name = "ascii")]
    Ascii,
    #[value(name = "unicode")]
    Unicode,
}

const ASCII_GLYPHS: [char; 3] = ['.', '+', '*'];
const UNICODE_GLYPHS: [char; 3] = ['·', '•', '❄'];

impl GlyphSet {
    pub fn resolve(self, default_to_ascii: bool) -> GlyphSet {
        match self {
            GlyphSet::Auto if default_to_ascii => GlyphSet::Ascii,
            GlyphSet::Auto => GlyphSet::Unicode,
            other => other,
        }
    }

    /// Glyph for a flake of `radius` pixels; bigger flakes get heavier marks.
    pub fn glyph(self, radius: f32) -> char {
        let table = match self {
            GlyphSet::Ascii => &ASCII_GLYPHS,
            GlyphSet::Auto | GlyphSet::Unicode => &UNICODE_GLYPHS,
        };
        let idx = if radius < 2.0 {
            0
        } else if radius < 3.0 {
            1
        } else {
            2
        };
        table[idx]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auto_falls_back_to_ascii_outside_utf8() {
        assert_eq!(GlyphSet::Auto.resolve(true), GlyphSet::Ascii);
        assert_eq!(GlyphSet::Auto.resolve(false), GlyphSet::Unicode);
        assert_eq!(GlyphSet::Unicode.resolve(true), GlyphSet::Unicode);
    }

    #[test]
    fn glyph_grows_with_radius() {
        assert_eq!(GlyphSet::Ascii.glyph(1.2), '.');
        assert_eq!(GlyphSet::Ascii.glyph(2.5), '+');
        assert_eq!(GlyphSet::Ascii.glyph(3.9), '*');
        assert_eq!(GlyphSet::Unicode.glyph(3.0), '❄');
    }
}
