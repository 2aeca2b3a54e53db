use std::collections::HashMap;

use include_dir::{include_dir, Dir};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::Deserialize;
use thiserror::Error;

use crate::session::Mode;

static SNIPPET_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/content/snippets");

/// Minimum length (in characters) of the text handed to a timed test
pub const LONG_BLOCK_MIN_CHARS: usize = 2000;

/// Supplies the text a session is typed against
pub trait ContentSource {
    /// A single, non-empty snippet for untimed tests
    fn snippet(&mut self, mode: Mode) -> String;
    /// Random snippets joined until at least [`LONG_BLOCK_MIN_CHARS`] long
    fn long_block(&mut self, mode: Mode) -> String;
}

#[derive(Error, Debug)]
pub enum ContentError {
    #[error("snippet file not found: {0}")]
    Missing(String),

    #[error("snippet file {0} is not valid utf-8")]
    Encoding(String),

    #[error("unable to deserialize snippet file {file}: {source}")]
    Parse {
        file: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("snippet pool for {0} is empty")]
    Empty(Mode),
}

#[derive(Deserialize, Clone, Debug)]
struct SnippetPool {
    mode: Mode,
    snippets: Vec<String>,
}

/// Snippet pools bundled into the binary, one JSON file per mode
#[derive(Debug)]
pub struct SnippetLibrary {
    pools: HashMap<Mode, Vec<String>>,
    rng: StdRng,
}

impl SnippetLibrary {
    pub fn load() -> Result<Self, ContentError> {
        Self::load_with_rng(StdRng::from_entropy())
    }

    /// Deterministic selection for tests
    pub fn with_seed(seed: u64) -> Result<Self, ContentError> {
        Self::load_with_rng(StdRng::seed_from_u64(seed))
    }

    fn load_with_rng(rng: StdRng) -> Result<Self, ContentError> {
        let mut pools = HashMap::new();
        for mode in Mode::ALL {
            let pool = read_pool(&format!("{mode}.json"))?;
            if pool.snippets.iter().all(|s| s.is_empty()) {
                return Err(ContentError::Empty(mode));
            }
            pools.insert(pool.mode, pool.snippets);
        }
        Ok(Self { pools, rng })
    }

    pub fn pool(&self, mode: Mode) -> &[String] {
        self.pools.get(&mode).map(Vec::as_slice).unwrap_or_default()
    }

    fn pick(&mut self, mode: Mode) -> String {
        let pool = self.pools.get(&mode).map(Vec::as_slice).unwrap_or_default();
        pool.choose(&mut self.rng).cloned().unwrap_or_default()
    }
}

impl ContentSource for SnippetLibrary {
    fn snippet(&mut self, mode: Mode) -> String {
        self.pick(mode)
    }

    fn long_block(&mut self, mode: Mode) -> String {
        let separator = mode.separator();
        let mut block = String::new();
        let mut len = 0;

        while len < LONG_BLOCK_MIN_CHARS {
            let snippet = self.pick(mode);
            if snippet.is_empty() {
                break;
            }
            if !block.is_empty() {
                block.push_str(separator);
                len += separator.chars().count();
            }
            len += snippet.chars().count();
            block.push_str(&snippet);
        }

        block
    }
}

/// The same text for every request, used to drive sessions headlessly
#[derive(Debug, Clone)]
pub struct FixedContent {
    snippet: String,
    long_block: String,
}

impl FixedContent {
    pub fn new(snippet: impl Into<String>) -> Self {
        let snippet = snippet.into();
        Self {
            long_block: snippet.clone(),
            snippet,
        }
    }

    pub fn with_long_block(mut self, block: impl Into<String>) -> Self {
        self.long_block = block.into();
        self
    }
}

impl ContentSource for FixedContent {
    fn snippet(&mut self, _mode: Mode) -> String {
        self.snippet.clone()
    }

    fn long_block(&mut self, _mode: Mode) -> String {
        self.long_block.clone()
    }
}

fn read_pool(file_name: &str) -> Result<SnippetPool, ContentError> {
    let file = SNIPPET_DIR
        .get_file(file_name)
        .ok_or_else(|| ContentError::Missing(file_name.to_string()))?;

    let contents = file
        .contents_utf8()
        .ok_or_else(|| ContentError::Encoding(file_name.to_string()))?;

    serde_json::from_str(contents).map_err(|source| ContentError::Parse {
        file: file_name.to_string(),
        source,
    })
}
