//! Language label to Judge0 language id lookup.

pub(crate) const PYTHON_ID: i32 = 71;
pub(crate) const JAVASCRIPT_ID: i32 = 63;
pub(crate) const C_ID: i32 = 50;
pub(crate) const CPP_ID: i32 = 54;
pub(crate) const JAVA_ID: i32 = 62;

/// Label recorded when the caller names no language.
pub(crate) const DEFAULT_LABEL: &str = "python";

const ALIASES: &[(&str, i32)] = &[
    ("python", PYTHON_ID),
    ("python3", PYTHON_ID),
    ("py", PYTHON_ID),
    ("javascript", JAVASCRIPT_ID),
    ("node", JAVASCRIPT_ID),
    ("nodejs", JAVASCRIPT_ID),
    ("js", JAVASCRIPT_ID),
    ("c", C_ID),
    ("cpp", CPP_ID),
    ("c++", CPP_ID),
    ("java", JAVA_ID),
    ("typescript", 74),
    ("ts", 74),
    ("go", 60),
    ("golang", 60),
    ("rust", 73),
    ("csharp", 51),
    ("c#", 51),
];

/// Canonical labels advertised to clients, one per language.
const CANONICAL: &[&str] =
    &["python", "javascript", "c", "cpp", "java", "typescript", "go", "rust", "csharp"];

/// Maps a case-insensitive language label to the judge's language id.
/// Unknown or missing labels fall back to Python.
pub(crate) fn language_id(label: Option<&str>) -> i32 {
    let Some(label) = label else {
        return PYTHON_ID;
    };
    let normalized = label.trim().to_ascii_lowercase();

    ALIASES
        .iter()
        .find(|(alias, _)| *alias == normalized)
        .map(|(_, id)| *id)
        .unwrap_or(PYTHON_ID)
}

/// Languages whose scaffold must be reordered around student code.
pub(crate) fn is_structurally_ordered(label: Option<&str>) -> bool {
    matches!(language_id(label), C_ID | CPP_ID)
}

pub(crate) fn supported_languages() -> Vec<(&'static str, i32)> {
    CANONICAL.iter().map(|label| (*label, language_id(Some(label)))).collect()
}
