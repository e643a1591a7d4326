/// Colors and labels used to skin an exported sheet for one faculty.
#[derive(Debug, PartialEq, Eq)]
pub struct FacultyTheme {
    pub primary: [u8; 3],
    pub light: [u8; 3],
    pub text: [u8; 3],
    pub full_name: &'static str,
    /// Short code shown in the page badge.
    pub badge: &'static str,
}

static FACULTY_THEMES: [FacultyTheme; 10] = [
    FacultyTheme {
        primary: [0x0D, 0x94, 0x88],
        light: [0xCC, 0xFB, 0xF1],
        text: [0x11, 0x5E, 0x59],
        full_name: "Faculté des Sciences de la Nature et de la Vie",
        badge: "FSNV",
    },
    FacultyTheme {
        primary: [0xEA, 0x58, 0x0C],
        light: [0xFF, 0xED, 0xD5],
        text: [0x9A, 0x34, 0x12],
        full_name: "Faculté des Sciences et Technologies",
        badge: "FST",
    },
    FacultyTheme {
        primary: [0x25, 0x63, 0xEB],
        light: [0xDB, 0xEA, 0xFE],
        text: [0x1D, 0x4E, 0xD8],
        full_name: "Faculté de Médecine",
        badge: "FMED",
    },
    FacultyTheme {
        primary: [0xCA, 0x8A, 0x04],
        light: [0xFE, 0xF3, 0xC7],
        text: [0x92, 0x40, 0x0E],
        full_name: "Institut d'Éducation Physique et Sportive",
        badge: "IESP",
    },
    FacultyTheme {
        primary: [0x5B, 0x21, 0xB6],
        light: [0xED, 0xE9, 0xFE],
        text: [0x4C, 0x1D, 0x95],
        full_name: "Faculté des Sciences Économiques, Commerciales et des Sciences de Gestion",
        badge: "FSESCSG",
    },
    FacultyTheme {
        primary: [0x0F, 0x17, 0x2A],
        light: [0xE2, 0xE8, 0xF0],
        text: [0x1F, 0x29, 0x37],
        full_name: "Faculté des Sciences Sociales",
        badge: "FSS",
    },
    FacultyTheme {
        primary: [0xBE, 0x12, 0x3C],
        light: [0xFF, 0xE4, 0xE6],
        text: [0x9F, 0x12, 0x39],
        full_name: "Faculté de Littérature Arabe et des Arts",
        badge: "FLAA",
    },
    FacultyTheme {
        primary: [0x93, 0x33, 0xEA],
        light: [0xF3, 0xE8, 0xFF],
        text: [0x7E, 0x22, 0xCE],
        full_name: "Faculté de Droit et de Science Politique",
        badge: "FDSP",
    },
    FacultyTheme {
        primary: [0x16, 0xA3, 0x4A],
        light: [0xDC, 0xFC, 0xE7],
        text: [0x16, 0x65, 0x34],
        full_name: "Faculté des Langues Étrangères",
        badge: "FLE",
    },
    FacultyTheme {
        primary: [0xDC, 0x26, 0x26],
        light: [0xFE, 0xE2, 0xE2],
        text: [0x99, 0x1B, 0x1B],
        full_name: "Faculté des Sciences Exactes et Informatique",
        badge: "FSEI",
    },
];

/// Legacy faculty codes still found in older records.
const FACULTY_ALIASES: &[(&str, &str)] = &[("MEDECINE", "FMED")];

const DEFAULT_BADGE: &str = "FSEI";

/// Canonical faculty code for `faculty`, resolving legacy aliases. Unknown codes pass through.
pub fn canonical_faculty(faculty: &str) -> String {
    let code = faculty.trim().to_ascii_uppercase();
    FACULTY_ALIASES
        .iter()
        .find(|(alias, _)| *alias == code)
        .map(|(_, canonical)| canonical.to_string())
        .unwrap_or(code)
}

/// Resolve the theme for a faculty code. Unrecognized codes get the default theme.
pub fn resolve_theme(faculty: &str) -> &'static FacultyTheme {
    let code = canonical_faculty(faculty);
    FACULTY_THEMES
        .iter()
        .find(|t| t.badge == code)
        .unwrap_or_else(default_theme)
}

pub fn default_theme() -> &'static FacultyTheme {
    FACULTY_THEMES
        .iter()
        .find(|t| t.badge == DEFAULT_BADGE)
        .unwrap_or(&FACULTY_THEMES[0])
}

/// All known themes, in table order.
pub fn themes() -> &'static [FacultyTheme] {
    &FACULTY_THEMES
}
