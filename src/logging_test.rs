use super::*;

#[test]
fn known_levels_parse_case_insensitively() {
    assert_eq!(parse_level("warn"), Some(LevelFilter::WARN));
    assert_eq!(parse_level("DEBUG"), Some(LevelFilter::DEBUG));
    assert_eq!(parse_level(" trace "), Some(LevelFilter::TRACE));
}

#[test]
fn unknown_level_is_rejected() {
    assert_eq!(parse_level("verbose"), None);
    assert_eq!(parse_level(""), None);
}

#[test]
fn fallback_is_info() {
    assert_eq!(parse_level("verbose").unwrap_or(FALLBACK_LEVEL), LevelFilter::INFO);
}
