use crate::assessment::{
    ConfigurationError, InlineCheck, MockExamConfig, QuestionBank, QuestionRecord,
};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};
use tracing::{info, warn};

const EMBEDDED: &[(&str, &str)] = &[
    (
        "cdm-regulations.json",
        include_str!("data/cdm-regulations.json"),
    ),
    (
        "coshh-awareness.json",
        include_str!("data/coshh-awareness.json"),
    ),
    ("cscs-card.json", include_str!("data/cscs-card.json")),
    (
        "scaffolding-awareness.json",
        include_str!("data/scaffolding-awareness.json"),
    ),
];

static STANDARD: OnceLock<ContentLibrary> = OnceLock::new();

/// On-disk shape of one course's question content.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankDocument {
    pub key: String,
    pub title: String,
    pub exam: MockExamConfig,
    #[serde(default)]
    pub inline_checks: Vec<QuestionRecord>,
    pub questions: Vec<QuestionRecord>,
}

#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("failed to read content from {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("content {name} is not valid JSON: {source}")]
    Parse {
        name: String,
        source: serde_json::Error,
    },
    #[error("content {name} failed validation: {source}")]
    Invalid {
        name: String,
        source: ConfigurationError,
    },
    #[error("question bank key {0} is defined more than once")]
    DuplicateKey(String),
    #[error("no question banks found in {0}")]
    Empty(PathBuf),
}

/// A course's validated bank, exam settings, and inline checks.
#[derive(Debug, Clone)]
pub struct LibraryEntry {
    pub key: String,
    pub title: String,
    pub exam: MockExamConfig,
    pub bank: Arc<QuestionBank>,
    inline_checks: Vec<Arc<QuestionBank>>,
}

impl LibraryEntry {
    fn from_document(name: &str, document: BankDocument) -> Result<Self, ContentError> {
        let invalid = |source| ContentError::Invalid {
            name: name.to_string(),
            source,
        };

        let bank = QuestionBank::new(document.questions).map_err(invalid)?;
        document.exam.validate(&bank).map_err(invalid)?;

        let inline_checks = document
            .inline_checks
            .into_iter()
            .map(|record| QuestionBank::new(vec![record]).map(Arc::new))
            .collect::<Result<Vec<_>, _>>()
            .map_err(invalid)?;

        Ok(Self {
            key: document.key,
            title: document.title,
            exam: document.exam,
            bank: Arc::new(bank),
            inline_checks,
        })
    }

    pub fn inline_check_count(&self) -> usize {
        self.inline_checks.len()
    }

    /// Fresh, unanswered inline check `index` (zero-based) for this course.
    pub fn inline_check(&self, index: usize) -> Option<InlineCheck> {
        self.inline_checks
            .get(index)
            .cloned()
            .map(InlineCheck::from_bank)
    }
}

/// Immutable catalogue of course banks, validated when loaded.
#[derive(Debug, Clone)]
pub struct ContentLibrary {
    entries: Vec<LibraryEntry>,
}

impl ContentLibrary {
    /// The course banks compiled into the crate, parsed once per process.
    pub fn standard() -> Result<Self, ContentError> {
        if let Some(library) = STANDARD.get() {
            return Ok(library.clone());
        }

        let library = Self::from_documents(EMBEDDED.iter().copied())?;
        Ok(STANDARD.get_or_init(|| library).clone())
    }

    /// Loads every `*.json` bank in `dir`, in file-name order.
    pub fn from_dir<P: AsRef<Path>>(dir: P) -> Result<Self, ContentError> {
        let dir = dir.as_ref();
        let io_error = |source| ContentError::Io {
            path: dir.to_path_buf(),
            source,
        };

        let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)
            .map_err(io_error)?
            .map(|entry| entry.map(|entry| entry.path()))
            .collect::<Result<Vec<_>, _>>()
            .map_err(io_error)?
            .into_iter()
            .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
            .collect();
        paths.sort();

        if paths.is_empty() {
            return Err(ContentError::Empty(dir.to_path_buf()));
        }

        let mut sources = Vec::with_capacity(paths.len());
        for path in paths {
            let text = std::fs::read_to_string(&path).map_err(|source| ContentError::Io {
                path: path.clone(),
                source,
            })?;
            sources.push((path.display().to_string(), text));
        }

        Self::from_documents(
            sources
                .iter()
                .map(|(name, text)| (name.as_str(), text.as_str())),
        )
    }

    /// Parses and validates `(name, json)` pairs; `name` only labels errors.
    pub fn from_documents<'a, I>(sources: I) -> Result<Self, ContentError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut entries: Vec<LibraryEntry> = Vec::new();

        for (name, text) in sources {
            let document: BankDocument =
                serde_json::from_str(text).map_err(|source| ContentError::Parse {
                    name: name.to_string(),
                    source,
                })?;

            if entries.iter().any(|entry| entry.key == document.key) {
                return Err(ContentError::DuplicateKey(document.key));
            }

            let entry = LibraryEntry::from_document(name, document).map_err(|err| {
                warn!(content = name, error = %err, "rejected question bank");
                err
            })?;
            entries.push(entry);
        }

        info!(banks = entries.len(), "content library loaded");
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[LibraryEntry] {
        &self.entries
    }

    pub fn get(&self, key: &str) -> Option<&LibraryEntry> {
        self.entries.iter().find(|entry| entry.key == key)
    }

    pub fn keys(&self) -> Vec<&str> {
        self.entries.iter().map(|entry| entry.key.as_str()).collect()
    }
}
