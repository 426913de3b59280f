//! Best-effort language identification.

use newswire_core::UNKNOWN_LANGUAGE;

/// ISO 639-3 → ISO 639-1 for the languages the detector knows that have a
/// two-letter code.
const ISO_639_1: &[(&str, &str)] = &[
    ("afr", "af"),
    ("aka", "ak"),
    ("amh", "am"),
    ("ara", "ar"),
    ("aze", "az"),
    ("bel", "be"),
    ("ben", "bn"),
    ("bul", "bg"),
    ("cat", "ca"),
    ("ces", "cs"),
    ("cmn", "zh"),
    ("dan", "da"),
    ("deu", "de"),
    ("ell", "el"),
    ("eng", "en"),
    ("epo", "eo"),
    ("est", "et"),
    ("fin", "fi"),
    ("fra", "fr"),
    ("guj", "gu"),
    ("heb", "he"),
    ("hin", "hi"),
    ("hrv", "hr"),
    ("hun", "hu"),
    ("hye", "hy"),
    ("ind", "id"),
    ("ita", "it"),
    ("jav", "jv"),
    ("jpn", "ja"),
    ("kan", "kn"),
    ("kat", "ka"),
    ("khm", "km"),
    ("kor", "ko"),
    ("lat", "la"),
    ("lav", "lv"),
    ("lit", "lt"),
    ("mal", "ml"),
    ("mar", "mr"),
    ("mkd", "mk"),
    ("mya", "my"),
    ("nep", "ne"),
    ("nld", "nl"),
    ("nob", "nb"),
    ("ori", "or"),
    ("pan", "pa"),
    ("pes", "fa"),
    ("pol", "pl"),
    ("por", "pt"),
    ("ron", "ro"),
    ("rus", "ru"),
    ("sin", "si"),
    ("slk", "sk"),
    ("slv", "sl"),
    ("sna", "sn"),
    ("spa", "es"),
    ("srp", "sr"),
    ("swe", "sv"),
    ("tam", "ta"),
    ("tel", "te"),
    ("tgl", "tl"),
    ("tha", "th"),
    ("tuk", "tk"),
    ("tur", "tr"),
    ("ukr", "uk"),
    ("urd", "ur"),
    ("uzb", "uz"),
    ("vie", "vi"),
    ("yid", "yi"),
    ("zul", "zu"),
];

/// Detect the language of `text`.
///
/// Returns an ISO 639-1 code when one exists, the detector's ISO 639-3 code
/// otherwise, and [`UNKNOWN_LANGUAGE`] for empty input, when nothing is
/// detected, or when the detector does not consider its guess reliable.
/// Never fails.
#[must_use]
pub fn detect_language(text: &str) -> String {
    if text.trim().is_empty() {
        return UNKNOWN_LANGUAGE.to_string();
    }
    match whatlang::detect(text) {
        Some(info) => accept_guess(info.lang(), info.is_reliable()),
        None => UNKNOWN_LANGUAGE.to_string(),
    }
}

fn accept_guess(lang: whatlang::Lang, reliable: bool) -> String {
    if !reliable {
        return UNKNOWN_LANGUAGE.to_string();
    }
    let code = lang.code();
    ISO_639_1
        .iter()
        .find(|(three, _)| *three == code)
        .map_or(code, |(_, two)| *two)
        .to_string()
}
