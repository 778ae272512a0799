use crate::error::{Error, Result};
use include_dir::{include_dir, Dir};
use itertools::Itertools;
use rand::Rng;
use serde::Deserialize;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

static LANG_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/lang");

pub const DEFAULT_LANGUAGE: &str = "english";

/// Word list as it is stored in the embedded language files
#[derive(Deserialize, Clone, Debug)]
struct LanguageFile {
    name: String,
    #[allow(dead_code)]
    size: u32,
    words: Vec<String>,
}

/// Pool of candidate words a passage is sampled from.
///
/// A corpus always holds at least one word; every constructor rejects an
/// empty list with [`Error::EmptyCorpus`].
#[derive(Debug, Clone, PartialEq)]
pub struct WordCorpus {
    name: String,
    words: Vec<String>,
}

impl WordCorpus {
    pub fn from_words<I, S>(name: impl Into<String>, words: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words: Vec<String> = words
            .into_iter()
            .map(|w| w.as_ref().trim().to_string())
            .filter(|w| !w.is_empty())
            .collect();

        if words.is_empty() {
            return Err(Error::EmptyCorpus);
        }

        Ok(Self {
            name: name.into(),
            words,
        })
    }

    /// Reads one word per line.
    pub fn from_reader<R: Read>(name: impl Into<String>, reader: R) -> Result<Self> {
        let name = name.into();
        let lines = BufReader::new(reader)
            .lines()
            .collect::<std::io::Result<Vec<String>>>()
            .map_err(|e| Error::unavailable(name.clone(), e))?;

        Self::from_words(name, lines)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let origin = path.display().to_string();
        let file = File::open(path).map_err(|e| Error::unavailable(origin.clone(), e))?;

        Self::from_reader(origin, file)
    }

    /// Loads a word list compiled into the binary, e.g. `"english"`.
    pub fn embedded(language: &str) -> Result<Self> {
        let file_name = format!("{language}.json");
        let file = LANG_DIR
            .get_file(&file_name)
            .ok_or_else(|| Error::unavailable(language, "no embedded word list by that name"))?;

        let contents = file
            .contents_utf8()
            .ok_or_else(|| Error::unavailable(language, "word list is not valid utf-8"))?;

        let lang: LanguageFile =
            serde_json::from_str(contents).map_err(|e| Error::unavailable(language, e))?;

        Self::from_words(lang.name, lang.words)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.iter().any(|w| w == word)
    }

    /// Draws `n` words uniformly with replacement and joins them with single spaces.
    pub fn sample<R: Rng>(&self, n: usize, rng: &mut R) -> String {
        (0..n)
            .map(|_| self.words[rng.gen_range(0..self.words.len())].as_str())
            .join(" ")
    }
}
