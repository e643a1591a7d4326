use std::collections::HashMap;

use crate::fonts::char_to_winansi;

/// Line height as a multiple of the font size, the 1.4 leading of the on-screen sheet.
pub const LINE_HEIGHT_FACTOR: f32 = 1.4;
/// Font sizes are in points and so is the page: no conversion.
pub const PT_TO_PAGE_UNIT: f32 = 1.0;

pub fn line_height(font_size: f32) -> f32 {
    font_size * LINE_HEIGHT_FACTOR * PT_TO_PAGE_UNIT
}

/// Glyph advance widths for one font face, used to measure and wrap text.
#[derive(Clone, Debug)]
pub struct TextMetrics {
    /// WinAnsi widths for bytes 32..=255, in 1000-units.
    pub(crate) widths_1000: Vec<f32>,
    /// Per-char widths for embedded fonts, covering every char the document uses.
    pub(crate) char_widths_1000: Option<HashMap<char, f32>>,
    pub(crate) ascender_ratio: Option<f32>,
}

impl TextMetrics {
    /// Built-in Helvetica metrics.
    pub fn helvetica() -> Self {
        Self {
            widths_1000: helvetica_widths(false),
            char_widths_1000: None,
            ascender_ratio: None,
        }
    }

    /// Built-in Helvetica-Bold metrics.
    pub fn helvetica_bold() -> Self {
        Self {
            widths_1000: helvetica_widths(true),
            char_widths_1000: None,
            ascender_ratio: None,
        }
    }

    pub(crate) fn char_width_1000(&self, ch: char) -> f32 {
        if let Some(ref map) = self.char_widths_1000 {
            if let Some(&w) = map.get(&ch) {
                return w;
            }
        }
        let byte = char_to_winansi(ch);
        if byte >= 32 {
            self.widths_1000[(byte - 32) as usize]
        } else {
            0.0
        }
    }

    pub fn text_width(&self, text: &str, font_size: f32) -> f32 {
        text.chars()
            .map(|ch| self.char_width_1000(ch) * font_size / 1000.0)
            .sum()
    }

    pub fn space_width(&self, font_size: f32) -> f32 {
        self.char_width_1000(' ') * font_size / 1000.0
    }

    /// Distance from the top of a line box to its baseline.
    pub fn ascent(&self, font_size: f32) -> f32 {
        font_size * self.ascender_ratio.unwrap_or(0.75)
    }

    /// Wrap `text` into lines no wider than `max_width`.
    ///
    /// Breaks on whitespace; every `\n` is a hard break and an empty paragraph
    /// yields an empty line. Runs of whitespace inside a paragraph collapse to one
    /// space. A single word wider than the line is split between characters.
    pub fn wrap(&self, text: &str, max_width: f32, font_size: f32) -> Vec<String> {
        let space_w = self.space_width(font_size);
        let mut lines = Vec::new();

        for paragraph in text.split('\n') {
            let mut line = String::new();
            let mut line_w = 0.0f32;

            for word in paragraph.split_whitespace() {
                let word_w = self.text_width(word, font_size);

                if word_w > max_width {
                    if !line.is_empty() {
                        lines.push(std::mem::take(&mut line));
                    }
                    let mut pieces = self.split_word(word, max_width, font_size);
                    let (last, last_w) = pieces.pop().unwrap_or_default();
                    lines.extend(pieces.into_iter().map(|(p, _)| p));
                    line = last;
                    line_w = last_w;
                    continue;
                }

                if line.is_empty() {
                    line.push_str(word);
                    line_w = word_w;
                } else if line_w + space_w + word_w <= max_width {
                    line.push(' ');
                    line.push_str(word);
                    line_w += space_w + word_w;
                } else {
                    lines.push(std::mem::replace(&mut line, word.to_string()));
                    line_w = word_w;
                }
            }
            lines.push(line);
        }
        lines
    }

    fn split_word(&self, word: &str, max_width: f32, font_size: f32) -> Vec<(String, f32)> {
        let mut pieces = Vec::new();
        let mut piece = String::new();
        let mut piece_w = 0.0f32;
        for ch in word.chars() {
            let w = self.char_width_1000(ch) * font_size / 1000.0;
            if !piece.is_empty() && piece_w + w > max_width {
                pieces.push((std::mem::take(&mut piece), piece_w));
                piece_w = 0.0;
            }
            piece.push(ch);
            piece_w += w;
        }
        if !piece.is_empty() {
            pieces.push((piece, piece_w));
        }
        pieces
    }
}

/// Helvetica advance widths (AFM, 1000 units/em) for WinAnsi bytes 32..=255.
/// Codes WinAnsi leaves undefined are 0.
#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 224] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, 0,
    556, 0, 222, 556, 333, 1000, 556, 556, 333, 1000, 667, 333, 1000, 0, 611, 0,
    0, 222, 222, 333, 333, 350, 556, 1000, 333, 1000, 500, 333, 944, 0, 500, 667,
    278, 333, 556, 556, 556, 556, 260, 556, 333, 737, 370, 556, 584, 333, 737, 333,
    400, 584, 333, 333, 333, 556, 537, 278, 333, 333, 365, 556, 834, 834, 834, 611,
    667, 667, 667, 667, 667, 667, 1000, 722, 667, 667, 667, 667, 278, 278, 278, 278,
    722, 722, 778, 778, 778, 778, 778, 584, 778, 722, 722, 722, 722, 667, 667, 611,
    556, 556, 556, 556, 556, 556, 889, 500, 556, 556, 556, 556, 278, 278, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 584, 611, 556, 556, 556, 556, 500, 556, 500,
];

/// Helvetica-Bold counterpart of [`HELVETICA_WIDTHS`].
#[rustfmt::skip]
const HELVETICA_BOLD_WIDTHS: [u16; 224] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584, 0,
    556, 0, 278, 556, 500, 1000, 556, 556, 333, 1000, 667, 333, 1000, 0, 611, 0,
    0, 278, 278, 500, 500, 350, 556, 1000, 333, 1000, 556, 333, 944, 0, 500, 667,
    278, 333, 556, 556, 556, 556, 280, 556, 333, 737, 370, 556, 584, 333, 737, 333,
    400, 584, 333, 333, 333, 611, 556, 278, 333, 333, 365, 556, 834, 834, 834, 611,
    722, 722, 722, 722, 722, 722, 1000, 722, 667, 667, 667, 667, 278, 278, 278, 278,
    722, 722, 778, 778, 778, 778, 778, 584, 778, 722, 722, 722, 722, 667, 667, 611,
    556, 556, 556, 556, 556, 556, 889, 556, 556, 556, 556, 556, 278, 278, 278, 278,
    611, 611, 611, 611, 611, 611, 611, 584, 611, 611, 611, 611, 611, 556, 611, 556,
];

fn helvetica_widths(bold: bool) -> Vec<f32> {
    let table = if bold { &HELVETICA_BOLD_WIDTHS } else { &HELVETICA_WIDTHS };
    table.iter().map(|&w| f32::from(w)).collect()
}

fn is_rtl_char(c: char) -> bool {
    matches!(c as u32, 0x0590..=0x08FF | 0xFB1D..=0xFDFF | 0xFE70..=0xFEFF)
}

fn is_strong_ltr(c: char) -> bool {
    c.is_alphanumeric() && !is_rtl_char(c)
}

fn mirror(c: char) -> char {
    match c {
        '(' => ')',
        ')' => '(',
        '[' => ']',
        ']' => '[',
        '<' => '>',
        '>' => '<',
        '«' => '»',
        '»' => '«',
        _ => c,
    }
}

/// Reorder a logical right-to-left line for left-to-right glyph emission.
/// Lines without right-to-left script are returned unchanged; embedded
/// left-to-right runs (words, numbers) keep their own order.
pub(crate) fn visual_order(line: &str) -> String {
    if !line.chars().any(is_rtl_char) {
        return line.to_string();
    }
    let chars: Vec<char> = line.chars().collect();
    let mut units: Vec<String> = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        if is_strong_ltr(chars[i]) {
            let mut last_strong = i;
            let mut j = i;
            while j < chars.len() && !is_rtl_char(chars[j]) {
                if is_strong_ltr(chars[j]) {
                    last_strong = j;
                }
                j += 1;
            }
            units.push(chars[i..=last_strong].iter().collect());
            i = last_strong + 1;
        } else {
            units.push(mirror(chars[i]).to_string());
            i += 1;
        }
    }
    units.reverse();
    units.concat()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ltr_lines_are_untouched() {
        assert_eq!(visual_order("Équipe 1 (IA)"), "Équipe 1 (IA)");
    }

    #[test]
    fn rtl_runs_reverse_but_numbers_do_not() {
        // "فريق 12" reads right-to-left; the number stays "12".
        let out = visual_order("فريق 12");
        assert_eq!(out, "12 قيرف");
    }

    #[test]
    fn helvetica_widths_match_afm() {
        let m = TextMetrics::helvetica();
        for (text, width) in [("W", 944.0), ("O", 778.0), ("@", 1015.0), ("%", 889.0), ("i", 222.0), ("é", 556.0), ("—", 1000.0)] {
            assert_eq!(m.text_width(text, 1000.0), width, "{text}");
        }
        let b = TextMetrics::helvetica_bold();
        for (text, width) in [("W", 944.0), ("@", 975.0), ("A", 722.0), ("i", 278.0), ("É", 667.0)] {
            assert_eq!(b.text_width(text, 1000.0), width, "{text}");
        }
        assert_eq!(HELVETICA_WIDTHS.len(), 255 - 32 + 1);
    }

    #[test]
    fn capitals_wrap_at_their_real_width() {
        let m = TextMetrics::helvetica();
        let text = "WOW WOWOW WOW WOWOW WOW WOWOW WOW WOWOW";
        let lines = m.wrap(text, 200.0, 10.0);
        for line in &lines {
            // W 944 + O 778 per 1000 units
            let afm: f32 = line
                .chars()
                .map(|c| match c {
                    'W' => 9.44,
                    'O' => 7.78,
                    _ => 2.78,
                })
                .sum();
            assert!(afm <= 200.0 + 1e-3, "'{line}' renders {afm}pt");
            assert!((m.text_width(line, 10.0) - afm).abs() < 1e-3);
        }
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn overlong_word_is_split() {
        let m = TextMetrics::helvetica();
        let lines = m.wrap("abcdefghijklmnopqrstuvwxyz", 30.0, 10.0);
        assert!(lines.len() > 1);
        assert_eq!(lines.concat(), "abcdefghijklmnopqrstuvwxyz");
        for l in &lines {
            assert!(m.text_width(l, 10.0) <= 30.0 + 1e-3);
        }
    }
}
