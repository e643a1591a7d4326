use labsheet_pdf::{canonical_faculty, default_theme, resolve_theme, themes};

#[test]
fn legacy_alias_resolves_to_canonical_theme() {
    let legacy = resolve_theme("MEDECINE");
    let canonical = resolve_theme("FMED");
    assert!(std::ptr::eq(legacy, canonical));
    assert_eq!(legacy.badge, "FMED");
    assert_eq!(canonical_faculty(" medecine "), "FMED");
}

#[test]
fn lookup_ignores_case_and_padding() {
    assert_eq!(resolve_theme("  fst ").badge, "FST");
    assert_eq!(resolve_theme("Fsnv").badge, "FSNV");
}

#[test]
fn unknown_codes_fall_back_to_default() {
    for code in ["", "XYZ", "faculté inconnue"] {
        assert!(std::ptr::eq(resolve_theme(code), default_theme()), "{code}");
    }
}

#[test]
fn every_theme_is_complete_and_distinct() {
    let all = themes();
    assert_eq!(all.len(), 10);
    for (i, t) in all.iter().enumerate() {
        assert!(!t.full_name.is_empty());
        assert!(!t.badge.is_empty());
        assert_ne!(t.primary, t.light, "{}", t.badge);
        assert!(std::ptr::eq(resolve_theme(t.badge), t));
        assert!(all[i + 1..].iter().all(|o| o.badge != t.badge));
    }
}
