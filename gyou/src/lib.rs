use errors::SeparatorError;
use std::{fmt, str::FromStr};
pub mod errors;

const CR: u8 = b'\r';
const LF: u8 = b'\n';

/// A line separator, represented by its literal byte sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Separator {
    /// `"\r\n"` (Windows)
    Crlf,
    /// `"\n"` (Unix)
    Lf,
    /// `"\r"` (classic Mac OS)
    Cr,
}
impl Separator {
    pub const ALL: [Separator; 3] = [Separator::Crlf, Separator::Lf, Separator::Cr];

    pub fn as_bytes(&self) -> &'static [u8] {
        match self {
            Self::Crlf => b"\r\n",
            Self::Lf => b"\n",
            Self::Cr => b"\r",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Crlf => "CRLF",
            Self::Lf => "LF",
            Self::Cr => "CR",
        }
    }

    /// Returns the separator whose literal byte sequence is exactly `bytes`.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        Self::ALL.into_iter().find(|sep| sep.as_bytes() == bytes)
    }
}
impl fmt::Display for Separator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
impl FromStr for Separator {
    type Err = SeparatorError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if let Some(sep) = Self::from_bytes(value.as_bytes()) {
            return Ok(sep);
        }

        match value.trim().to_ascii_lowercase().as_str() {
            "crlf" | "windows" | "dos" | "\\r\\n" => Ok(Self::Crlf),
            "lf" | "unix" | "\\n" => Ok(Self::Lf),
            "cr" | "mac" | "\\r" => Ok(Self::Cr),
            _ => Err(SeparatorError::Unknown(value.to_string())),
        }
    }
}

/// Returns the separator of the first line ending found in `content`, or `None` when
/// `content` has no line endings at all.
///
/// A `\r` immediately followed by `\n` counts as [`Separator::Crlf`]; a `\r` anywhere else
/// (including as the very last byte) counts as [`Separator::Cr`].
///
/// # Example
/// ```
/// use gyou::{detect, Separator};
///
/// assert_eq!(detect(b"one\r\ntwo\nthree"), Some(Separator::Crlf));
/// assert_eq!(detect(b"no line endings"), None);
/// ```
pub fn detect(content: &[u8]) -> Option<Separator> {
    let index = content.iter().position(|&b| b == CR || b == LF)?;

    match (content[index], content.get(index + 1)) {
        (CR, Some(&LF)) => Some(Separator::Crlf),
        (CR, _) => Some(Separator::Cr),
        _ => Some(Separator::Lf),
    }
}

/// Rewrites every CRLF, lone LF and lone CR in `content` as `target`.
///
/// All other bytes are copied through untouched and in order.
///
/// # Example
/// ```
/// use gyou::{convert, Separator};
///
/// assert_eq!(convert(b"a\r\nb\nc\rd", Separator::Lf), b"a\nb\nc\nd");
/// ```
pub fn convert(content: &[u8], target: Separator) -> Vec<u8> {
    let replacement = target.as_bytes();
    let mut output = Vec::with_capacity(content.len() + content.len() / 16);
    let mut bytes = content.iter().copied().peekable();

    while let Some(byte) = bytes.next() {
        match byte {
            CR => {
                // a CRLF pair is a single line ending
                bytes.next_if_eq(&LF);
                output.extend_from_slice(replacement);
            }
            LF => output.extend_from_slice(replacement),
            other => output.push(other),
        }
    }

    output
}

/// Per-separator line ending counts of some content.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Census {
    pub crlf: usize,
    pub lf: usize,
    pub cr: usize,
}
impl Census {
    pub fn total(&self) -> usize {
        self.crlf + self.lf + self.cr
    }

    pub fn count(&self, separator: Separator) -> usize {
        match separator {
            Separator::Crlf => self.crlf,
            Separator::Lf => self.lf,
            Separator::Cr => self.cr,
        }
    }

    /// `true` when more than one kind of separator is present.
    pub fn is_mixed(&self) -> bool {
        [self.crlf, self.lf, self.cr]
            .iter()
            .filter(|&&count| count > 0)
            .count()
            > 1
    }

    /// The most frequent separator. Ties go to CRLF, then LF, then CR.
    pub fn dominant(&self) -> Option<Separator> {
        let mut best: Option<Separator> = None;

        for separator in Separator::ALL {
            let count = self.count(separator);
            if count == 0 {
                continue;
            }
            match best {
                Some(current) if self.count(current) >= count => {}
                _ => best = Some(separator),
            }
        }

        best
    }
}

/// Counts every line ending in `content`, using the same rules as [`detect`].
pub fn census(content: &[u8]) -> Census {
    let mut census = Census::default();
    let mut bytes = content.iter().copied().peekable();

    while let Some(byte) = bytes.next() {
        match byte {
            CR => {
                if bytes.next_if_eq(&LF).is_some() {
                    census.crlf += 1;
                } else {
                    census.cr += 1;
                }
            }
            LF => census.lf += 1,
            _ => {}
        }
    }

    census
}
