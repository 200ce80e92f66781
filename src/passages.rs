use include_dir::{include_dir, Dir};
use rand::seq::SliceRandom;
use serde::Deserialize;

static PASSAGE_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/passages");

/// A named set of target texts bundled with the binary
#[derive(Deserialize, Clone, Debug)]
pub struct PassageSet {
    pub name: String,
    pub passages: Vec<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum PassageError {
    #[error("unknown passage set '{0}'")]
    Unknown(String),

    #[error("passage set '{name}' is malformed: {source}")]
    Malformed {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("passage set '{0}' is empty")]
    Empty(String),
}

impl PassageSet {
    pub fn load(name: &str) -> Result<Self, PassageError> {
        let contents = PASSAGE_DIR
            .get_file(format!("{name}.json"))
            .and_then(|f| f.contents_utf8())
            .ok_or_else(|| PassageError::Unknown(name.to_string()))?;

        let set: PassageSet =
            serde_json::from_str(contents).map_err(|source| PassageError::Malformed {
                name: name.to_string(),
                source,
            })?;
        if set.passages.is_empty() {
            return Err(PassageError::Empty(name.to_string()));
        }
        Ok(set)
    }

    pub fn random(&self) -> &str {
        self.passages
            .choose(&mut rand::thread_rng())
            .map(String::as_str)
            .unwrap_or_default()
    }
}

/// Names of the bundled sets, sorted
pub fn available() -> Vec<String> {
    let mut names: Vec<String> = PASSAGE_DIR
        .files()
        .filter_map(|f| f.path().file_stem())
        .filter_map(|s| s.to_str())
        .map(str::to_string)
        .collect();
    names.sort();
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_load_english() {
        let set = PassageSet::load("english").unwrap();
        assert_eq!(set.name, "english");
        assert!(!set.passages.is_empty());
    }

    #[test]
    fn test_random_comes_from_set() {
        let set = PassageSet::load("pangrams").unwrap();
        for _ in 0..10 {
            let p = set.random();
            assert!(set.passages.iter().any(|x| x == p));
        }
    }

    #[test]
    fn test_unknown_set() {
        assert_matches!(PassageSet::load("klingon"), Err(PassageError::Unknown(_)));
    }

    #[test]
    fn test_available_lists_bundled_sets() {
        let names = available();
        assert!(names.contains(&"english".to_string()));
        assert!(names.contains(&"pangrams".to_string()));
    }
}
