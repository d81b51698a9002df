/// Repairs attachment filenames whose UTF-8 bytes were decoded as Latin-1
///
/// Browsers sometimes submit a filename like `ä¸­æ–‡.pdf` for `中文.pdf`. The
/// repair takes the low byte of every UTF-16 unit, decodes the result as UTF-8
/// and keeps it only when one of two heuristics fires:
///
/// 1. the repaired name contains CJK ideographs (U+3400..=U+9FFF) and the
///    original does not;
/// 2. the original contains one of the known Latin-1 artifact characters.
///
/// This is deliberately approximate. A genuine `é` in a filename trips rule 2.
use crate::constants::DEFAULT_FILENAME_ARTIFACT_CHARS;

#[derive(Debug, Clone)]
pub struct FilenameNormalizer {
    artifacts: Vec<char>,
}

impl Default for FilenameNormalizer {
    fn default() -> Self {
        Self::new(DEFAULT_FILENAME_ARTIFACT_CHARS)
    }
}

impl FilenameNormalizer {
    pub fn new(artifacts: &str) -> Self {
        Self {
            artifacts: artifacts.chars().collect(),
        }
    }

    pub fn normalize(&self, name: &str) -> String {
        if name.is_empty() {
            return String::new();
        }

        let repaired = reinterpret_as_utf8(name);
        let gained_cjk = contains_cjk(&repaired) && !contains_cjk(name);
        let has_artifacts = name.chars().any(|c| self.artifacts.contains(&c));

        if gained_cjk || has_artifacts {
            tracing::debug!(original = %name, repaired = %repaired, "Repaired mis-decoded filename");
            repaired
        } else {
            name.to_string()
        }
    }
}

fn reinterpret_as_utf8(name: &str) -> String {
    let bytes: Vec<u8> = name.encode_utf16().map(|unit| (unit & 0xFF) as u8).collect();
    String::from_utf8_lossy(&bytes).into_owned()
}

fn contains_cjk(text: &str) -> bool {
    text.chars().any(|c| ('\u{3400}'..='\u{9FFF}').contains(&c))
}
