use crate::codec::Encoding;

/// An error that occurred while building a regex or running a search.
///
/// Every input validation error is reported before any buffer is allocated
/// or the matching engine is called. That is, a search that returns an error
/// has no side effects.
///
/// The specific kind of error can be inspected with [`Error::kind`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Error {
    kind: ErrorKind,
}

/// The kind of an [`Error`].
///
/// This enum may grow additional variants, so matching on it requires a
/// wildcard arm.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    /// An index, length or option value was outside of its valid range.
    Range {
        /// The name of the offending argument, e.g., `startIndex`.
        argument: &'static str,
        /// A description of the constraint that was violated.
        message: &'static str,
    },
    /// The start index of a search points at the low (second) code unit of a
    /// UTF-16 surrogate pair.
    InvalidStartIndex {
        /// The start index that was given.
        index: usize,
    },
    /// Some text contained a code unit that cannot be represented in the
    /// single byte encoding selected by the regex options.
    Encoding {
        /// The name of the offending argument: `pattern`, `input` or `name`.
        argument: &'static str,
        /// The encoding that the text could not be represented in.
        encoding: Encoding,
    },
    /// The matching engine rejected the pattern.
    Compile(CompileError),
}

impl Error {
    /// Returns the kind of this error.
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// If this error was produced while compiling a pattern, then this
    /// returns the underlying compile error.
    pub fn compile_error(&self) -> Option<&CompileError> {
        match self.kind {
            ErrorKind::Compile(ref err) => Some(err),
            _ => None,
        }
    }

    pub(crate) fn range(
        argument: &'static str,
        message: &'static str,
    ) -> Error {
        Error { kind: ErrorKind::Range { argument, message } }
    }

    pub(crate) fn invalid_start_index(index: usize) -> Error {
        Error { kind: ErrorKind::InvalidStartIndex { index } }
    }

    pub(crate) fn encoding(argument: &'static str, encoding: Encoding) -> Error {
        Error { kind: ErrorKind::Encoding { argument, encoding } }
    }

    pub(crate) fn compile(err: CompileError) -> Error {
        Error { kind: ErrorKind::Compile(err) }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self.kind {
            ErrorKind::Compile(ref err) => Some(err),
            _ => None,
        }
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        match self.kind {
            ErrorKind::Range { argument, message } => {
                write!(f, "{} (argument '{}')", message, argument)
            }
            ErrorKind::InvalidStartIndex { index } => write!(
                f,
                "start index {} cannot bisect a UTF-16 surrogate pair",
                index,
            ),
            ErrorKind::Encoding { argument, encoding } => write!(
                f,
                "argument '{}' was out of the range of valid {} values",
                argument, encoding,
            ),
            ErrorKind::Compile(ref err) => err.fmt(f),
        }
    }
}

/// An error reported by the matching engine when a pattern fails to compile.
///
/// This carries a classification of the failure, the fragment of the pattern
/// that caused it and the pattern itself. Its `Display` impl combines all
/// three, e.g., `Missing parenthesis: 'a(b' in pattern 'a(b'.`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CompileError {
    code: CompileErrorCode,
    fragment: String,
    pattern: String,
}

impl CompileError {
    pub(crate) fn new(code: CompileErrorCode, fragment: String) -> CompileError {
        CompileError { code, fragment, pattern: String::new() }
    }

    /// Attach the pattern as the caller wrote it. The engine only ever sees
    /// the encoded form.
    pub(crate) fn with_pattern(self, pattern: String) -> CompileError {
        CompileError { pattern, ..self }
    }

    /// The engine's classification of this error.
    pub fn code(&self) -> CompileErrorCode {
        self.code
    }

    /// The part of the pattern that the engine rejected. This may be empty,
    /// for example, when the compiled pattern exceeds its memory budget.
    pub fn fragment(&self) -> &str {
        &self.fragment
    }

    /// The pattern that failed to compile.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }
}

impl std::error::Error for CompileError {}

impl core::fmt::Display for CompileError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "{}: '{}' in pattern '{}'.",
            self.code.description(),
            self.fragment,
            self.pattern,
        )
    }
}

/// A classification of pattern compile errors.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum CompileErrorCode {
    /// An unexpected error inside the engine.
    Internal,
    /// An escape sequence was invalid or unrecognized.
    BadEscape,
    /// A character class was invalid.
    BadCharClass,
    /// A character class range was invalid, e.g., `[z-a]`.
    BadCharRange,
    /// A character class was never closed.
    MissingBracket,
    /// A group was never closed, or was closed without being opened.
    MissingParen,
    /// The pattern ended with a lone backslash.
    TrailingBackslash,
    /// A repetition operator had nothing to repeat.
    RepeatArgument,
    /// A counted repetition was invalid, e.g., `a{2,1}`.
    RepeatSize,
    /// Repetition operators were combined in an unsupported way.
    RepeatOp,
    /// A Perl-style operator (flags, look-around, backreferences) was
    /// invalid or unsupported.
    BadPerlOp,
    /// The pattern was not valid UTF-8 or referenced a codepoint that the
    /// selected encoding does not support.
    BadUtf8,
    /// A named capture group was invalid or its name was duplicated.
    BadNamedCapture,
    /// The compiled pattern exceeded its memory budget or nesting limit.
    PatternTooLarge,
}

impl CompileErrorCode {
    /// A short human readable description of this error class.
    pub fn description(&self) -> &'static str {
        use self::CompileErrorCode::*;

        match *self {
            Internal => "An unknown internal error has occurred",
            BadEscape => "Invalid escape sequence",
            BadCharClass => "Invalid character class",
            BadCharRange => "Invalid character class range",
            MissingBracket => "Missing bracket",
            MissingParen => "Missing parenthesis",
            TrailingBackslash => {
                "Missing escape sequence (trailing backslash)"
            }
            RepeatArgument => {
                "Invalid repetition operator (nothing to repeat)"
            }
            RepeatSize => "Invalid repetition argument",
            RepeatOp => {
                "Invalid repetition operator \
                 (repetition operators cannot be combined)"
            }
            BadPerlOp => "Invalid Perl operator",
            BadUtf8 => "Invalid UTF-8 sequence",
            BadNamedCapture => "Invalid named capture group",
            PatternTooLarge => "Pattern too large",
        }
    }
}
