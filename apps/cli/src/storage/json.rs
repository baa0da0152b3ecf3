//! One pretty-printed JSON file per deck, named `<deck id>.json`.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use vocab_core::{Deck, DeckRepository};

use super::error::StorageError;

type Result<T> = std::result::Result<T, StorageError>;

#[derive(Debug, Clone)]
pub struct JsonDeckRepository {
    dir: PathBuf,
}

impl JsonDeckRepository {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, deck_id: &str) -> Result<PathBuf> {
        let valid = !deck_id.is_empty()
            && deck_id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(StorageError::InvalidId(deck_id.to_string()));
        }
        Ok(self.dir.join(format!("{deck_id}.json")))
    }
}

impl DeckRepository for JsonDeckRepository {
    type Error = StorageError;

    fn list_ids(&self) -> Result<Vec<String>> {
        let read_dir = match fs::read_dir(&self.dir) {
            Ok(read_dir) => read_dir,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(vec![]),
            Err(e) => return Err(e.into()),
        };

        let mut ids = Vec::new();
        for item in read_dir {
            let path = item?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                ids.push(stem.to_string());
            }
        }
        ids.sort();
        Ok(ids)
    }

    fn load(&self, deck_id: &str) -> Result<Option<Deck>> {
        let path = self.path_for(deck_id)?;
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let deck = serde_json::from_str(&content).map_err(|source| StorageError::InvalidDeck {
            path: path.display().to_string(),
            source,
        })?;
        Ok(Some(deck))
    }

    fn save(&self, deck: &Deck) -> Result<()> {
        let path = self.path_for(&deck.id)?;
        fs::create_dir_all(&self.dir)?;

        // Write then rename so a crash never leaves a truncated deck.
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_string_pretty(deck)?)?;
        fs::rename(&tmp, &path)?;

        tracing::debug!(deck = %deck.id, path = %path.display(), "saved deck");
        Ok(())
    }
}
