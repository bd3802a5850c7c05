#[derive(Debug, Eq, PartialEq)]
pub enum SeparatorError {
    Unknown(String),
}

impl std::error::Error for SeparatorError {}

impl std::fmt::Display for SeparatorError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            SeparatorError::Unknown(value) => {
                write!(f, "unknown line separator: '{}'", value.escape_debug())?;
                write!(f, " (expected one of: crlf, lf, cr)")
            }
        }
    }
}
