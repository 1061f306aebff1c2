//! Static font-metric tables for the two PDF base fonts the exporter draws with.
//!
//! Character widths are in em units (relative to font size), taken from the
//! Adobe core font AFM files. Bold faces are approximated by scaling the
//! regular width, which slightly overestimates and so never overflows a line.
//! All tables cover ASCII 0x20..=0x7E (95 printable characters).
//! Index = (char as usize) - 32.

use printpdf::BuiltinFont;

// ────────────────────────────────────────────────────────────────────────────
// Font family enum
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontFamily {
    /// Helvetica. Templates without a serif marker.
    Sans,
    /// Times. Templates whose root carries `font-serif`.
    Serif,
}

impl FontFamily {
    pub fn builtin(self, bold: bool) -> BuiltinFont {
        match (self, bold) {
            (FontFamily::Sans, false) => BuiltinFont::Helvetica,
            (FontFamily::Sans, true) => BuiltinFont::HelveticaBold,
            (FontFamily::Serif, false) => BuiltinFont::TimesRoman,
            (FontFamily::Serif, true) => BuiltinFont::TimesBold,
        }
    }

    pub fn metrics(self) -> &'static FontMetricTable {
        match self {
            FontFamily::Sans => &HELVETICA_TABLE,
            FontFamily::Serif => &TIMES_TABLE,
        }
    }
}

/// Width multiplier applied to the regular table for bold runs.
pub const BOLD_WIDTH_FACTOR: f32 = 1.06;

/// Characters WinAnsiEncoding places in 0x80..=0x9F.
const WIN_ANSI_EXTRAS: [char; 27] = [
    '€', '‚', 'ƒ', '„', '…', '†', '‡', 'ˆ', '‰', 'Š', '‹', 'Œ', 'Ž', '‘', '’', '“', '”', '•', '–',
    '—', '˜', '™', 'š', '›', 'œ', 'ž', 'Ÿ',
];

/// Whether the base fonts can draw `c`. They only carry WinAnsiEncoding, so
/// anything else would be dropped from the content stream.
pub fn is_encodable(c: char) -> bool {
    matches!(c, ' '..='~' | '\u{a0}'..='\u{ff}') || WIN_ANSI_EXTRAS.contains(&c)
}

// ────────────────────────────────────────────────────────────────────────────
// Font metric table
// ────────────────────────────────────────────────────────────────────────────

/// Width array slot layout:
/// ```text
/// [0]=sp  [1]=!   [2]="   [3]=#   [4]=$   [5]=%   [6]=&   [7]='
/// [8]=(   [9]=)   [10]=*  [11]=+  [12]=,  [13]=-  [14]=.  [15]=/
/// [16..25]=0-9
/// [26]=:  [27]=;  [28]=<  [29]==  [30]=>  [31]=?  [32]=@
/// [33..58]=A-Z
/// [59]=[  [60]=\  [61]=]  [62]=^  [63]=_  [64]=`
/// [65..90]=a-z
/// [91]={  [92]=|  [93]=}  [94]=~
/// ```
pub struct FontMetricTable {
    widths: [f32; 95],
    /// Fallback width for non-ASCII characters.
    pub average_char_width: f32,
    pub space_width: f32,
}

impl FontMetricTable {
    /// Measures a string in em units. Non-ASCII characters fall back to
    /// `average_char_width`.
    pub fn measure_str(&self, s: &str) -> f32 {
        s.chars().map(|c| self.char_width(c)).sum()
    }

    pub fn char_width(&self, c: char) -> f32 {
        let code = c as usize;
        if (32..=126).contains(&code) {
            self.widths[code - 32]
        } else {
            self.average_char_width
        }
    }

    /// Width of `s` in pixels at `size_px`.
    pub fn measure_px(&self, s: &str, size_px: f32, bold: bool) -> f32 {
        let factor = if bold { BOLD_WIDTH_FACTOR } else { 1.0 };
        self.measure_str(s) * size_px * factor
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Static width tables  (95 ASCII printable characters each)
// ────────────────────────────────────────────────────────────────────────────

static HELVETICA_TABLE: FontMetricTable = FontMetricTable {
    #[rustfmt::skip]
    widths: [
        // sp     !      "      #      $      %      &      '      (      )      *      +      ,      -      .      /
        0.278, 0.278, 0.355, 0.556, 0.556, 0.889, 0.667, 0.191, 0.333, 0.333, 0.389, 0.584, 0.278, 0.333, 0.278, 0.278,
        // 0      1      2      3      4      5      6      7      8      9
        0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556,
        // :      ;      <      =      >      ?      @
        0.278, 0.278, 0.584, 0.584, 0.584, 0.556, 1.015,
        // A      B      C      D      E      F      G      H      I      J      K      L      M
        0.667, 0.667, 0.722, 0.722, 0.667, 0.611, 0.778, 0.722, 0.278, 0.500, 0.667, 0.556, 0.833,
        // N      O      P      Q      R      S      T      U      V      W      X      Y      Z
        0.722, 0.778, 0.667, 0.778, 0.722, 0.667, 0.611, 0.722, 0.667, 0.944, 0.667, 0.667, 0.611,
        // [      \      ]      ^      _      `
        0.278, 0.278, 0.278, 0.469, 0.556, 0.333,
        // a      b      c      d      e      f      g      h      i      j      k      l      m
        0.556, 0.556, 0.500, 0.556, 0.556, 0.278, 0.556, 0.556, 0.222, 0.222, 0.500, 0.222, 0.833,
        // n      o      p      q      r      s      t      u      v      w      x      y      z
        0.556, 0.556, 0.556, 0.556, 0.333, 0.500, 0.278, 0.556, 0.500, 0.722, 0.500, 0.500, 0.500,
        // {      |      }      ~
        0.334, 0.260, 0.334, 0.584,
    ],
    average_char_width: 0.556,
    space_width: 0.278,
};

static TIMES_TABLE: FontMetricTable = FontMetricTable {
    #[rustfmt::skip]
    widths: [
        // sp     !      "      #      $      %      &      '      (      )      *      +      ,      -      .      /
        0.250, 0.333, 0.408, 0.500, 0.500, 0.833, 0.778, 0.180, 0.333, 0.333, 0.500, 0.564, 0.250, 0.333, 0.250, 0.278,
        // 0      1      2      3      4      5      6      7      8      9
        0.500, 0.500, 0.500, 0.500, 0.500, 0.500, 0.500, 0.500, 0.500, 0.500,
        // :      ;      <      =      >      ?      @
        0.278, 0.278, 0.564, 0.564, 0.564, 0.444, 0.921,
        // A      B      C      D      E      F      G      H      I      J      K      L      M
        0.722, 0.667, 0.667, 0.722, 0.611, 0.556, 0.722, 0.722, 0.333, 0.389, 0.722, 0.611, 0.889,
        // N      O      P      Q      R      S      T      U      V      W      X      Y      Z
        0.722, 0.722, 0.556, 0.722, 0.667, 0.556, 0.611, 0.722, 0.722, 0.944, 0.722, 0.722, 0.611,
        // [      \      ]      ^      _      `
        0.333, 0.278, 0.333, 0.469, 0.500, 0.333,
        // a      b      c      d      e      f      g      h      i      j      k      l      m
        0.444, 0.500, 0.444, 0.500, 0.444, 0.333, 0.500, 0.500, 0.278, 0.278, 0.500, 0.278, 0.778,
        // n      o      p      q      r      s      t      u      v      w      x      y      z
        0.500, 0.500, 0.500, 0.500, 0.333, 0.389, 0.278, 0.500, 0.500, 0.722, 0.500, 0.500, 0.444,
        // {      |      }      ~
        0.480, 0.200, 0.480, 0.541,
    ],
    average_char_width: 0.500,
    space_width: 0.250,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_space_matches_table() {
        for family in [FontFamily::Sans, FontFamily::Serif] {
            let t = family.metrics();
            assert_eq!(t.measure_str(" "), t.space_width);
        }
    }

    #[test]
    fn test_known_widths() {
        let helv = FontFamily::Sans.metrics();
        assert!((helv.measure_str("W") - 0.944).abs() < 1e-6);
        assert!((helv.measure_str("il") - 0.444).abs() < 1e-6);
        let times = FontFamily::Serif.metrics();
        assert!((times.measure_str("m") - 0.778).abs() < 1e-6);
    }

    #[test]
    fn test_non_ascii_uses_average() {
        let t = FontFamily::Sans.metrics();
        assert_eq!(t.measure_str("é"), t.average_char_width);
    }

    #[test]
    fn test_bold_is_wider() {
        let t = FontFamily::Serif.metrics();
        assert!(t.measure_px("Resume", 14.0, true) > t.measure_px("Resume", 14.0, false));
    }

    #[test]
    fn test_win_ansi_coverage() {
        for c in "José Müller, Zürich — “Senior” Engineer · €5 • Œuvre".chars() {
            assert!(is_encodable(c), "{c:?} should be encodable");
        }
        for c in ['北', 'Д', 'λ', '→', '\u{7f}', '\n'] {
            assert!(!is_encodable(c), "{c:?} should not be encodable");
        }
    }

    #[test]
    fn test_builtin_font_selection() {
        assert!(matches!(FontFamily::Sans.builtin(true), BuiltinFont::HelveticaBold));
        assert!(matches!(FontFamily::Serif.builtin(false), BuiltinFont::TimesRoman));
    }
}
