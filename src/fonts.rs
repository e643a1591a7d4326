//! Font faces for a sheet: the built-in Helvetica pair, or one system family
//! embedded as subset Type0 fonts in its regular and bold weights.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use memmap2::Mmap;
use pdf_writer::types::{CidFontType, FontFlags, SystemInfo, UnicodeCmap};
use pdf_writer::{Name, Pdf, Rect, Ref, Str};
use ttf_parser::Face;

use crate::pdf::metrics::TextMetrics;

/// Environment variable listing extra font directories, searched before the system ones.
const FONT_DIRS_ENV: &str = "LABSHEET_FONTS";

/// Families tried in order for right-to-left sheets when none is configured.
const UNICODE_FAMILIES: &[&str] = &[
    "Noto Naskh Arabic",
    "Noto Sans Arabic",
    "Amiri",
    "DejaVu Sans",
    "Arial",
    "FreeSerif",
];

/// A font as the layout code sees it: resource name, metrics and glyph encoding.
#[derive(Clone)]
pub(crate) struct FontEntry {
    pub(crate) pdf_name: String,
    pub(crate) metrics: TextMetrics,
    /// Present for embedded CID fonts; `None` means WinAnsi-encoded Type1.
    pub(crate) char_to_gid: Option<HashMap<char, u16>>,
}

impl FontEntry {
    pub(crate) fn builtin(pdf_name: &str, bold: bool) -> Self {
        Self {
            pdf_name: pdf_name.to_string(),
            metrics: if bold {
                TextMetrics::helvetica_bold()
            } else {
                TextMetrics::helvetica()
            },
            char_to_gid: None,
        }
    }

    /// Bytes for a `Tj` string in this font's encoding.
    pub(crate) fn encode(&self, text: &str) -> Vec<u8> {
        match &self.char_to_gid {
            Some(map) => encode_as_gids(text, map),
            None => to_winansi_bytes(text),
        }
    }
}

/// The two faces every sheet uses.
pub(crate) struct FontSet {
    pub(crate) regular: FontEntry,
    pub(crate) bold: FontEntry,
}

impl FontSet {
    pub(crate) fn builtin() -> Self {
        Self {
            regular: FontEntry::builtin("F1", false),
            bold: FontEntry::builtin("F2", true),
        }
    }

    pub(crate) fn get(&self, bold: bool) -> &FontEntry {
        if bold { &self.bold } else { &self.regular }
    }
}

/// Where one face lives on disk.
#[derive(Clone, Debug, PartialEq, Eq)]
struct FaceLocation {
    path: PathBuf,
    /// Face index inside a collection file.
    index: u32,
}

/// Upright faces found on disk, keyed by lowercase family name and weight.
#[derive(Default)]
struct FontIndex {
    faces: HashMap<(String, bool), FaceLocation>,
}

static SYSTEM_FONTS: OnceLock<FontIndex> = OnceLock::new();

impl FontIndex {
    /// The process-wide index, scanned on first use.
    fn system() -> &'static FontIndex {
        SYSTEM_FONTS.get_or_init(|| FontIndex::scan(&search_dirs()))
    }

    /// Walk `roots` in order. A family found under an earlier root wins.
    fn scan(roots: &[PathBuf]) -> Self {
        let t0 = std::time::Instant::now();
        let mut index = FontIndex::default();
        let mut files = 0u32;
        let mut seen: HashSet<PathBuf> = HashSet::new();

        for root in roots {
            let mut pending = vec![root.clone()];
            while let Some(dir) = pending.pop() {
                if !seen.insert(dir.clone()) {
                    continue;
                }
                let Ok(entries) = std::fs::read_dir(&dir) else {
                    continue;
                };
                for path in entries.flatten().map(|e| e.path()) {
                    if path.is_dir() {
                        pending.push(path);
                    } else if has_font_extension(&path) {
                        files += 1;
                        index.add_file(&path);
                    }
                }
            }
        }

        log::info!(
            "Font scan: {:.1}ms, {files} files → {} faces",
            t0.elapsed().as_secs_f64() * 1000.0,
            index.faces.len(),
        );
        index
    }

    fn add_file(&mut self, path: &Path) {
        let Ok(file) = std::fs::File::open(path) else {
            return;
        };
        // SAFETY: the file is opened read-only and only read while mapped.
        let Ok(data) = (unsafe { Mmap::map(&file) }) else {
            return;
        };
        let count = ttf_parser::fonts_in_collection(&data).unwrap_or(1);
        for index in 0..count {
            let Ok(face) = Face::parse(&data, index) else {
                continue;
            };
            if face.is_italic() {
                continue;
            }
            if let Some(family) = family_name(&face) {
                self.faces
                    .entry((family.to_lowercase(), face.is_bold()))
                    .or_insert_with(|| FaceLocation {
                        path: path.to_path_buf(),
                        index,
                    });
            }
        }
    }

    /// The face for `family` in the requested weight; bold falls back to regular.
    fn locate(&self, family: &str, bold: bool) -> Option<&FaceLocation> {
        let key = family.trim().to_lowercase();
        let exact = self.faces.get(&(key.clone(), bold));
        if bold {
            exact.or_else(|| self.faces.get(&(key, false)))
        } else {
            exact
        }
    }

    /// Family to embed: the configured one, else for right-to-left sheets the
    /// first installed Unicode family. `None` keeps the built-in Helvetica.
    fn choose_family(&self, configured: Option<&str>, rtl: bool) -> Option<String> {
        if let Some(family) = configured {
            return Some(family.to_string());
        }
        if !rtl {
            return None;
        }
        let found = UNICODE_FAMILIES
            .iter()
            .find(|family| self.locate(family, false).is_some());
        match found {
            Some(family) => {
                log::info!("No font family configured; using {family} for right-to-left text");
                Some(family.to_string())
            }
            None => {
                log::warn!(
                    "No Unicode font family installed; right-to-left text cannot be shown. \
                     Install one of {UNICODE_FAMILIES:?} or set {FONT_DIRS_ENV}"
                );
                None
            }
        }
    }
}

fn family_name(face: &Face) -> Option<String> {
    face.names()
        .into_iter()
        .filter(|name| name.name_id == ttf_parser::name_id::FAMILY && name.is_unicode())
        .find_map(|name| name.to_string())
}

fn search_dirs() -> Vec<PathBuf> {
    let sep = if cfg!(windows) { ';' } else { ':' };
    let mut dirs: Vec<PathBuf> = std::env::var(FONT_DIRS_ENV)
        .map(|val| {
            val.split(sep)
                .map(str::trim)
                .filter(|part| !part.is_empty())
                .map(PathBuf::from)
                .collect()
        })
        .unwrap_or_default();
    let home = std::env::var("HOME").ok().map(PathBuf::from);

    #[cfg(target_os = "macos")]
    {
        dirs.extend([
            "/Library/Fonts".into(),
            "/System/Library/Fonts".into(),
            "/System/Library/Fonts/Supplemental".into(),
        ]);
        dirs.extend(home.map(|h| h.join("Library/Fonts")));
    }

    #[cfg(target_os = "linux")]
    {
        dirs.extend(["/usr/share/fonts".into(), "/usr/local/share/fonts".into()]);
        dirs.extend(home.map(|h| h.join(".local/share/fonts")));
    }

    #[cfg(target_os = "windows")]
    {
        let _ = home;
        let windir = std::env::var("WINDIR").unwrap_or_else(|_| "C:\\Windows".to_string());
        dirs.push(PathBuf::from(windir).join("Fonts"));
    }

    dirs
}

fn has_font_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| ["ttf", "otf", "ttc"].iter().any(|x| e.eq_ignore_ascii_case(x)))
}

/// WinAnsi bytes 0x80..=0x9F that do not coincide with Latin-1.
const WINANSI_SPECIALS: [(u8, char); 27] = [
    (0x80, '€'),
    (0x82, '‚'),
    (0x83, 'ƒ'),
    (0x84, '„'),
    (0x85, '…'),
    (0x86, '†'),
    (0x87, '‡'),
    (0x88, 'ˆ'),
    (0x89, '‰'),
    (0x8A, 'Š'),
    (0x8B, '‹'),
    (0x8C, 'Œ'),
    (0x8E, 'Ž'),
    (0x91, '‘'),
    (0x92, '’'),
    (0x93, '“'),
    (0x94, '”'),
    (0x95, '•'),
    (0x96, '–'),
    (0x97, '—'),
    (0x98, '˜'),
    (0x99, '™'),
    (0x9A, 'š'),
    (0x9B, '›'),
    (0x9C, 'œ'),
    (0x9E, 'ž'),
    (0x9F, 'Ÿ'),
];

fn winansi_char(byte: u8) -> char {
    WINANSI_SPECIALS
        .iter()
        .find(|&&(b, _)| b == byte)
        .map_or(byte as char, |&(_, c)| c)
}

/// WinAnsi byte for `c`, or 0 when the encoding has no such character.
pub(crate) fn char_to_winansi(c: char) -> u8 {
    match c as u32 {
        0x20..=0x7E | 0xA0..=0xFF => c as u8,
        _ => WINANSI_SPECIALS
            .iter()
            .find(|&&(_, ch)| ch == c)
            .map_or(0, |&(b, _)| b),
    }
}

/// UTF-8 to WinAnsi bytes; unmappable chars are dropped.
pub(crate) fn to_winansi_bytes(s: &str) -> Vec<u8> {
    s.chars()
        .map(char_to_winansi)
        .filter(|&b| b != 0)
        .collect()
}

/// Big-endian 2-byte glyph IDs for Identity-H CIDFont content streams.
pub(crate) fn encode_as_gids(text: &str, char_to_gid: &HashMap<char, u16>) -> Vec<u8> {
    text.chars()
        .flat_map(|ch| char_to_gid.get(&ch).copied().unwrap_or(0).to_be_bytes())
        .collect()
}

/// Glyphs of one face that the sheet needs, renumbered for the subset.
struct GlyphPlan {
    remapper: subsetter::GlyphRemapper,
    char_to_gid: HashMap<char, u16>,
    char_widths: HashMap<char, f32>,
    missing: usize,
}

impl GlyphPlan {
    fn build(face: &Face, used_chars: &HashSet<char>) -> Self {
        let scale = 1000.0 / f32::from(face.units_per_em());
        let mut plan = GlyphPlan {
            remapper: subsetter::GlyphRemapper::new(),
            char_to_gid: HashMap::new(),
            char_widths: HashMap::new(),
            missing: 0,
        };
        for &ch in used_chars {
            match face.glyph_index(ch) {
                Some(gid) => {
                    let new_gid = plan.remapper.remap(gid.0);
                    let advance = face.glyph_hor_advance(gid).unwrap_or(0);
                    plan.char_to_gid.insert(ch, new_gid);
                    plan.char_widths.insert(ch, f32::from(advance) * scale);
                }
                None if !ch.is_control() => plan.missing += 1,
                None => {}
            }
        }
        plan
    }

    /// `(new gid, width)` pairs in gid order for the CIDFont `/W` array.
    fn widths_by_gid(&self) -> Vec<(u16, f32)> {
        let mut widths: Vec<(u16, f32)> = self
            .char_to_gid
            .iter()
            .map(|(ch, &gid)| (gid, self.char_widths.get(ch).copied().unwrap_or(0.0)))
            .collect();
        widths.sort_by_key(|&(gid, _)| gid);
        widths.dedup_by_key(|(gid, _)| *gid);
        widths
    }
}

fn identity_system_info() -> SystemInfo<'static> {
    SystemInfo {
        registry: Str(b"Adobe"),
        ordering: Str(b"Identity"),
        supplement: 0,
    }
}

/// Embed one face as a Type0 font subset to `used_chars` under `font_ref`.
fn embed_face(
    pdf: &mut Pdf,
    font_ref: Ref,
    family: &str,
    data: &[u8],
    face_index: u32,
    used_chars: &HashSet<char>,
    alloc: &mut impl FnMut() -> Ref,
) -> Option<FontEntry> {
    let face = Face::parse(data, face_index).ok()?;
    let scale = 1000.0 / f32::from(face.units_per_em());
    let plan = GlyphPlan::build(&face, used_chars);
    if plan.missing > 0 {
        log::warn!("{family}: {} characters have no glyph and render as .notdef", plan.missing);
    }

    let subset = subsetter::subset(data, face_index, &plan.remapper).unwrap_or_else(|e| {
        log::warn!("Subsetting {family} failed ({e}); embedding the whole face");
        data.to_vec()
    });
    let subset_len = i32::try_from(subset.len()).ok()?;
    let base_font = family.replace(' ', "");

    let file_ref = alloc();
    pdf.stream(file_ref, &subset).pair(Name(b"Length1"), subset_len);

    let bb = face.global_bounding_box();
    let descriptor_ref = alloc();
    pdf.font_descriptor(descriptor_ref)
        .name(Name(base_font.as_bytes()))
        .flags(FontFlags::NON_SYMBOLIC)
        .bbox(Rect::new(
            f32::from(bb.x_min) * scale,
            f32::from(bb.y_min) * scale,
            f32::from(bb.x_max) * scale,
            f32::from(bb.y_max) * scale,
        ))
        .italic_angle(0.0)
        .ascent(f32::from(face.ascender()) * scale)
        .descent(f32::from(face.descender()) * scale)
        .cap_height(face.capital_height().map_or(700.0, |h| f32::from(h) * scale))
        .stem_v(80.0)
        .font_file2(file_ref);

    let cid_ref = alloc();
    {
        let mut cid = pdf.cid_font(cid_ref);
        cid.subtype(CidFontType::Type2)
            .base_font(Name(base_font.as_bytes()))
            .system_info(identity_system_info())
            .font_descriptor(descriptor_ref)
            .default_width(0.0)
            .cid_to_gid_map_predefined(Name(b"Identity"));
        let widths = plan.widths_by_gid();
        if !widths.is_empty() {
            let mut w = cid.widths();
            for (gid, width) in widths {
                w.consecutive(gid, [width]);
            }
        }
    }

    let cmap_name = format!("{base_font}-UTF16");
    let mut cmap = UnicodeCmap::new(Name(cmap_name.as_bytes()), identity_system_info());
    for (&ch, &gid) in &plan.char_to_gid {
        cmap.pair(gid, ch);
    }
    let to_unicode_ref = alloc();
    pdf.stream(to_unicode_ref, cmap.finish().as_slice());

    pdf.type0_font(font_ref)
        .base_font(Name(base_font.as_bytes()))
        .encoding_predefined(Name(b"Identity-H"))
        .descendant_font(cid_ref)
        .to_unicode(to_unicode_ref);

    // WinAnsi widths back the per-char map for text outside `used_chars`.
    let winansi_widths = (32u8..=255)
        .map(|byte| {
            face.glyph_index(winansi_char(byte))
                .and_then(|gid| face.glyph_hor_advance(gid))
                .map_or(0.0, |adv| f32::from(adv) * scale)
        })
        .collect();
    Some(FontEntry {
        pdf_name: String::new(),
        metrics: TextMetrics {
            widths_1000: winansi_widths,
            char_widths_1000: Some(plan.char_widths),
            ascender_ratio: Some(f32::from(face.ascender()) * scale / 1000.0),
        },
        char_to_gid: Some(plan.char_to_gid),
    })
}

/// Faces registered in a document plus the page resources naming them.
pub(crate) struct RegisteredFonts {
    pub(crate) set: FontSet,
    pub(crate) resources: Vec<(String, Ref)>,
}

/// Register the regular and bold faces for one sheet.
///
/// The configured family wins. Without one, right-to-left sheets look for an
/// installed Unicode family and left-to-right sheets use the built-in Helvetica.
/// A family that cannot be found or embedded also falls back to Helvetica. When
/// the bold weight resolves to the regular face, both share one font object.
pub(crate) fn register_fonts(
    pdf: &mut Pdf,
    configured: Option<&str>,
    rtl: bool,
    used_chars: &HashSet<char>,
    alloc: &mut impl FnMut() -> Ref,
) -> RegisteredFonts {
    let t0 = std::time::Instant::now();
    let index = if configured.is_some() || rtl {
        Some(FontIndex::system())
    } else {
        None
    };
    let family = index.and_then(|index| index.choose_family(configured, rtl));

    let mut resources: Vec<(String, Ref)> = Vec::new();
    let mut embedded: Vec<(FaceLocation, FontEntry)> = Vec::new();
    let mut faces: Vec<FontEntry> = Vec::with_capacity(2);

    for (bold, pdf_name) in [(false, "F1"), (true, "F2")] {
        let location = match (index, family.as_deref()) {
            (Some(index), Some(family)) => {
                let found = index.locate(family, bold).cloned();
                if found.is_none() {
                    log::warn!("Font not found: {family} bold={bold}; using Helvetica");
                }
                found
            }
            _ => None,
        };

        if let Some(location) = &location
            && let Some((_, shared)) = embedded.iter().find(|(loc, _)| loc == location)
        {
            faces.push(shared.clone());
            continue;
        }

        let font_ref = alloc();
        let entry = location.as_ref().zip(family.as_deref()).and_then(|(loc, family)| {
            let data = std::fs::read(&loc.path)
                .map_err(|e| log::warn!("Cannot read {}: {e}", loc.path.display()))
                .ok()?;
            embed_face(pdf, font_ref, family, &data, loc.index, used_chars, alloc)
        });
        let entry = match entry {
            Some(mut entry) => {
                entry.pdf_name = pdf_name.to_string();
                if let Some(location) = location {
                    embedded.push((location, entry.clone()));
                }
                entry
            }
            None => builtin_face(pdf, font_ref, pdf_name, bold, used_chars),
        };
        resources.push((pdf_name.to_string(), font_ref));
        faces.push(entry);
    }

    let bold = faces.pop().unwrap_or_else(|| FontEntry::builtin("F2", true));
    let regular = faces.pop().unwrap_or_else(|| FontEntry::builtin("F1", false));
    log::debug!(
        "register_fonts: {} ({} font objects) → {:.1}ms",
        family.as_deref().unwrap_or("Helvetica"),
        resources.len(),
        t0.elapsed().as_secs_f64() * 1000.0,
    );
    RegisteredFonts {
        set: FontSet { regular, bold },
        resources,
    }
}

fn builtin_face(
    pdf: &mut Pdf,
    font_ref: Ref,
    pdf_name: &str,
    bold: bool,
    used_chars: &HashSet<char>,
) -> FontEntry {
    let base: &[u8] = if bold { b"Helvetica-Bold" } else { b"Helvetica" };
    pdf.type1_font(font_ref)
        .base_font(Name(base))
        .encoding_predefined(Name(b"WinAnsiEncoding"));
    let unencodable = used_chars
        .iter()
        .filter(|&&c| !c.is_control() && char_to_winansi(c) == 0)
        .count();
    if unencodable > 0 {
        log::warn!(
            "{unencodable} characters cannot be shown with the built-in font; \
             configure a Unicode font family to render them"
        );
    }
    FontEntry::builtin(pdf_name, bold)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture_index() -> FontIndex {
        FontIndex::scan(&[Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/fonts")])
    }

    #[test]
    fn winansi_round_trips_specials_and_drops_the_rest() {
        assert_eq!(char_to_winansi('€'), 0x80);
        assert_eq!(winansi_char(0x80), '€');
        assert_eq!(char_to_winansi('é'), 0xE9);
        assert_eq!(winansi_char(0xE9), 'é');
        assert_eq!(to_winansi_bytes("aمb"), b"ab".to_vec());
    }

    #[test]
    fn bold_lookup_falls_back_to_regular() {
        let index = fixture_index();
        let regular = index.locate("DejaVu Sans", false).expect("fixture font indexed");
        assert_eq!(index.locate("  dejavu sans ", true), Some(regular));
        assert!(index.locate("No Such Family", false).is_none());
    }

    #[test]
    fn rtl_sheets_pick_an_installed_unicode_family() {
        let index = fixture_index();
        assert_eq!(index.choose_family(None, true).as_deref(), Some("DejaVu Sans"));
        assert_eq!(index.choose_family(None, false), None);
        assert_eq!(index.choose_family(Some("Amiri"), false).as_deref(), Some("Amiri"));
        assert_eq!(FontIndex::default().choose_family(None, true), None);
    }

    #[test]
    fn embedded_face_maps_arabic_to_glyphs() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/fonts/DejaVuSans.ttf");
        let data = std::fs::read(path).unwrap();
        let used: HashSet<char> = "مخبر ab".chars().collect();
        let mut pdf = Pdf::new();
        let mut next = 2;
        let mut alloc = || {
            next += 1;
            Ref::new(next)
        };
        let entry = embed_face(&mut pdf, Ref::new(1), "DejaVu Sans", &data, 0, &used, &mut alloc)
            .expect("embeds");
        let gids = entry.char_to_gid.as_ref().unwrap();
        assert!(gids.contains_key(&'م'));
        assert_eq!(entry.encode("م").len(), 2);
        assert!(entry.metrics.text_width("مخبر", 10.0) > 0.0);
    }
}
