use std::error::Error as _;

use regex_utf16::{
    CompileErrorCode, Encoding, Error, ErrorKind, Regex, RegexBuilder,
    RegexOptions,
};

fn compile_err(pattern: &str) -> Error {
    Regex::new(&utf16!(pattern)).unwrap_err()
}

#[test]
fn compile_error_format() {
    let err = compile_err("a(b");
    let compile = err.compile_error().unwrap();
    assert_eq!(CompileErrorCode::MissingParen, compile.code());
    assert_eq!("a(b", compile.pattern());
    let msg = err.to_string();
    assert!(msg.starts_with("Missing parenthesis: '"), "{msg}");
    assert!(msg.ends_with("' in pattern 'a(b'."), "{msg}");
    assert!(err.source().is_some());
}

#[test]
fn compile_error_codes() {
    let code = |p: &str| compile_err(p).compile_error().unwrap().code();
    assert_eq!(CompileErrorCode::MissingParen, code("a)"));
    assert_eq!(CompileErrorCode::MissingBracket, code("[a"));
    assert_eq!(CompileErrorCode::BadCharRange, code("[z-a]"));
    assert_eq!(CompileErrorCode::RepeatArgument, code("*"));
    assert_eq!(CompileErrorCode::RepeatSize, code("a{2,1}"));
    assert_eq!(CompileErrorCode::TrailingBackslash, code("\\"));
    assert_eq!(CompileErrorCode::BadEscape, code(r"\q"));
    assert_eq!(CompileErrorCode::BadCharClass, code(r"\p{Nope}"));
    assert_eq!(CompileErrorCode::BadPerlOp, code(r"(a)\1"));
    assert_eq!(CompileErrorCode::BadNamedCapture, code(r"(?P<n>a)(?P<n>b)"));
}

#[test]
fn pattern_too_large() {
    let err = RegexBuilder::new(&utf16!(r"\w{100}"))
        .memory_budget(100)
        .build()
        .unwrap_err();
    assert_eq!(
        r"Pattern too large: '\w{100}' in pattern '\w{100}'.",
        err.to_string(),
    );
}

#[test]
fn single_byte_fragments_are_decoded() {
    let compile_latin1 = |p: &str| {
        Regex::with_options(&utf16!(p), RegexOptions::LATIN1).unwrap_err()
    };
    assert_eq!(
        "Invalid character class range: '\u{E9}-a' in pattern '[\u{E9}-a]'.",
        compile_latin1("[\u{E9}-a]").to_string(),
    );
    assert_eq!(
        "Invalid escape sequence: '\\\u{E9}' in pattern 'a\\\u{E9}'.",
        compile_latin1("a\\\u{E9}").to_string(),
    );
}

#[test]
fn range_errors() {
    let re = Regex::new(&utf16!("a")).unwrap();
    let hay = utf16!("abc");
    let err = re.find_in(&hay, 4, 0).unwrap_err();
    assert_eq!(
        "start index cannot be greater than input length \
         (argument 'startIndex')",
        err.to_string(),
    );
    let err = re.find_in(&hay, 0, 4).unwrap_err();
    assert_eq!(
        "length cannot be greater than input length (argument 'length')",
        err.to_string(),
    );
    let err = re.find_in(&hay, 2, 2).unwrap_err();
    assert_eq!(
        &ErrorKind::Range {
            argument: "startIndex, length",
            message: "start index and length combined cannot be greater \
                      than input length",
        },
        err.kind(),
    );
    assert!(err.source().is_none());
}

#[test]
fn validation_runs_before_encoding() {
    // The haystack cannot be encoded as ASCII, but the window is checked
    // first.
    let re = Regex::with_options(&utf16!("a"), RegexOptions::ASCII).unwrap();
    let err = re.find_in(&utf16!("\u{E9}"), 2, 0).unwrap_err();
    assert!(matches!(
        err.kind(),
        ErrorKind::Range { argument: "startIndex", .. }
    ));
}

#[test]
fn invalid_start_index() {
    let re = Regex::new(&utf16!("a")).unwrap();
    let err = re.find_at(&utf16!("\u{1F600}a"), 1).unwrap_err();
    assert_eq!(
        "start index 1 cannot bisect a UTF-16 surrogate pair",
        err.to_string(),
    );
}

#[test]
fn encoding_error() {
    let re = Regex::with_options(&utf16!("a"), RegexOptions::ASCII).unwrap();
    let err = re.is_match(&utf16!("\u{E9}")).unwrap_err();
    assert_eq!(
        &ErrorKind::Encoding { argument: "input", encoding: Encoding::Ascii },
        err.kind(),
    );
    assert_eq!(
        "argument 'input' was out of the range of valid ASCII values",
        err.to_string(),
    );
}

#[test]
fn unknown_option_bits() {
    let opts = RegexOptions::from_bits_retain(1 << 30);
    let err = Regex::with_options(&utf16!("a"), opts).unwrap_err();
    assert!(matches!(
        err.kind(),
        ErrorKind::Range { argument: "options", .. }
    ));
}
