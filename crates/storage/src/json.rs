//! One JSON file per user under a progress directory.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use quiz_core::model::{UserProgress, Username};
use tokio::fs;
use tracing::debug;

use crate::document;
use crate::repository::{ProgressRepository, StorageError};

/// Stores each user's progress in `<dir>/<stem>.json`.
///
/// Uppercase letters are escaped in the stem, so `Alice` and `alice` get
/// separate files even on case-insensitive file systems.
#[derive(Debug, Clone)]
pub struct JsonFileRepository {
    dir: PathBuf,
}

impl JsonFileRepository {
    /// Use `dir` for progress files, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Io` if the directory cannot be created.
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .await
            .map_err(|e| StorageError::Io(format!("{}: {e}", dir.display())))?;
        Ok(Self { dir })
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Location of a user's progress file.
    #[must_use]
    pub fn path_for(&self, username: &Username) -> PathBuf {
        self.dir.join(format!("{}.json", file_stem(username)))
    }
}

/// File-system safe stem for a username.
///
/// Lowercase letters, digits, `-`, `_`, spaces and non-leading dots are kept
/// as-is so plain lowercase names map to `<name>.json`. Anything else,
/// uppercase letters included, is percent-encoded.
fn file_stem(username: &Username) -> String {
    let mut stem = String::with_capacity(username.as_str().len());
    for (pos, ch) in username.as_str().chars().enumerate() {
        let keep = (ch.is_alphanumeric() && !ch.is_uppercase())
            || matches!(ch, '-' | '_' | ' ')
            || (ch == '.' && pos > 0);
        if keep {
            stem.push(ch);
        } else {
            let mut buf = [0_u8; 4];
            for byte in ch.encode_utf8(&mut buf).bytes() {
                stem.push_str(&format!("%{byte:02X}"));
            }
        }
    }
    stem
}

fn io_error(path: &Path, err: &std::io::Error) -> StorageError {
    StorageError::Io(format!("{}: {err}", path.display()))
}

#[async_trait]
impl ProgressRepository for JsonFileRepository {
    async fn load_progress(
        &self,
        username: &Username,
    ) -> Result<Option<UserProgress>, StorageError> {
        let path = self.path_for(username);
        let raw = match fs::read_to_string(&path).await {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(io_error(&path, &err)),
        };
        let progress = document::decode(&raw)?;
        Ok(Some(progress))
    }

    async fn save_progress(
        &self,
        username: &Username,
        progress: &UserProgress,
    ) -> Result<(), StorageError> {
        let path = self.path_for(username);
        let raw = document::encode(progress)?;

        // Write a sibling temp file, then rename over the target.
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, raw.as_bytes())
            .await
            .map_err(|e| io_error(&tmp, &e))?;
        fs::rename(&tmp, &path)
            .await
            .map_err(|e| io_error(&path, &e))?;

        debug!(target: "storage", path = %path.display(), "progress file written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(name: &str) -> Username {
        Username::new(name).unwrap()
    }

    #[test]
    fn plain_names_map_to_plain_files() {
        assert_eq!(file_stem(&user("alice")), "alice");
        assert_eq!(file_stem(&user("мария иванова")), "мария иванова");
        assert_eq!(file_stem(&user("j.doe")), "j.doe");
        assert_eq!(file_stem(&user("bob42")), "bob42");
    }

    #[test]
    fn uppercase_letters_are_escaped() {
        assert_eq!(file_stem(&user("Alice")), "%41lice");
        assert_eq!(file_stem(&user("Мария")), "%D0%9Cария");
    }

    #[test]
    fn reserved_characters_are_escaped() {
        assert_eq!(file_stem(&user("../etc/passwd")), "%2E.%2Fetc%2Fpasswd");
        assert_eq!(file_stem(&user("a\\b:c")), "a%5Cb%3Ac");
        assert_eq!(file_stem(&user("100%")), "100%25");
    }

    #[test]
    fn distinct_names_get_distinct_stems() {
        assert_ne!(file_stem(&user("a/b")), file_stem(&user("a%2Fb")));
    }

    #[test]
    fn names_differing_only_in_case_get_distinct_stems() {
        let upper = file_stem(&user("Alice"));
        let lower = file_stem(&user("alice"));
        assert_ne!(upper, lower);
        assert_ne!(upper.to_lowercase(), lower.to_lowercase());
    }
}
