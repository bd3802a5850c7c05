use std::{
    collections::HashSet,
    fs::File,
    io::{self, Read},
    path::Path,
};

/// Extensions that are always treated as binary content.
pub const BINARY_EXTENSIONS: &[&str] = &[
    "7z", "a", "avi", "bin", "bmp", "bz2", "class", "dll", "dylib", "ear", "eot", "exe", "flac",
    "gif", "gz", "ico", "jar", "jpeg", "jpg", "lib", "mov", "mp3", "mp4", "o", "obj", "ogg", "otf",
    "pdf", "png", "pyc", "rar", "so", "tar", "tgz", "tif", "tiff", "ttf", "war", "wasm", "wav",
    "webm", "webp", "woff", "woff2", "xz", "zip", "zst",
];

/// How many leading bytes are inspected when sniffing content.
pub const SNIFF_LEN: u64 = 8000;

/// Decides whether a file holds binary content, first by extension and then, when enabled,
/// by looking for a NUL byte near the start of the file.
#[derive(Debug, Clone)]
pub struct BinaryClassifier {
    extensions: HashSet<String>,
    sniff_content: bool,
}
impl BinaryClassifier {
    pub fn new<S: AsRef<str>>(extra_extensions: &[S], sniff_content: bool) -> Self {
        let extensions = BINARY_EXTENSIONS
            .iter()
            .map(|ext| ext.to_string())
            .chain(
                extra_extensions
                    .iter()
                    .map(|ext| ext.as_ref().trim_start_matches('.').to_ascii_lowercase()),
            )
            .collect();

        Self {
            extensions,
            sniff_content,
        }
    }

    pub fn is_binary(&self, path: &Path) -> bool {
        if self.has_binary_extension(path) {
            return true;
        }

        if !self.sniff_content {
            return false;
        }

        match sniff(path) {
            Ok(found_nul) => found_nul,
            Err(error) => {
                log::debug!("unable to sniff {}: {}", path.display(), error);
                false
            }
        }
    }

    fn has_binary_extension(&self, path: &Path) -> bool {
        path.extension()
            .map(|ext| {
                self.extensions
                    .contains(&ext.to_string_lossy().to_ascii_lowercase())
            })
            .unwrap_or(false)
    }
}
impl Default for BinaryClassifier {
    fn default() -> Self {
        Self::new::<&str>(&[], true)
    }
}

fn sniff(path: &Path) -> io::Result<bool> {
    let mut head = Vec::with_capacity(SNIFF_LEN as usize);

    File::open(path)?.take(SNIFF_LEN).read_to_end(&mut head)?;

    Ok(head.contains(&0))
}
