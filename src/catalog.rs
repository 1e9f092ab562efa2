use include_dir::{include_dir, Dir};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::progress::Progress;

static CATALOG_DIR: Dir = include_dir!("assets/catalog");

const DEMO_CATALOG: &str = "demo.json";

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("embedded catalog {0} not found")]
    MissingEmbedded(String),

    #[error("failed to read catalog {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("duplicate lesson id {0}")]
    DuplicateLesson(String),

    #[error("duplicate specialization id {0}")]
    DuplicateSpecialization(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum_macros::Display)]
#[serde(rename_all = "lowercase")]
pub enum MaterialKind {
    Reading,
    Exercise,
    Quiz,
    Reference,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub id: String,
    pub kind: MaterialKind,
    pub title: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub estimated_minutes: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lesson {
    pub id: String,
    pub title: String,
    pub description: String,
    pub video_url: String,
    pub thumbnail_url: String,
    pub duration_secs: u32,
    pub module_id: String,
    pub order: u32,
    /// As shipped in the catalog. The progress tracker is the source of truth
    /// for completion during a session.
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub materials: Vec<Material>,
}

impl Lesson {
    /// Number shown on the module badge: the suffix of `module-N`, or the
    /// whole id when it has no dash.
    pub fn module_number(&self) -> &str {
        self.module_id
            .split_once('-')
            .map(|(_, n)| n)
            .unwrap_or(&self.module_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Specialization {
    pub id: String,
    pub title: String,
    pub description: String,
    pub color: String,
    pub icon: String,
    #[serde(default)]
    pub modules: Vec<String>,
    pub total_lessons: u32,
    pub completed_lessons: u32,
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    lessons: Vec<Lesson>,
    specializations: Vec<Specialization>,
    #[serde(default)]
    progress: Option<Progress>,
}

/// Read-only lesson and specialization content, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Catalog {
    lessons: Vec<Lesson>,
    specializations: Vec<Specialization>,
    seed: Option<Progress>,
}

impl Catalog {
    pub fn new(lessons: Vec<Lesson>, specializations: Vec<Specialization>) -> Self {
        Self {
            lessons,
            specializations,
            seed: None,
        }
    }

    /// The catalog bundled with the binary
    pub fn demo() -> Result<Self, CatalogError> {
        let file = CATALOG_DIR
            .get_file(DEMO_CATALOG)
            .ok_or_else(|| CatalogError::MissingEmbedded(DEMO_CATALOG.to_string()))?;
        Self::from_slice(file.contents())
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|source| CatalogError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_slice(&bytes)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_json::from_slice(bytes)?;

        let mut seen = HashSet::new();
        for lesson in &file.lessons {
            if !seen.insert(lesson.id.as_str()) {
                return Err(CatalogError::DuplicateLesson(lesson.id.clone()));
            }
        }

        seen.clear();
        for item in &file.specializations {
            if !seen.insert(item.id.as_str()) {
                return Err(CatalogError::DuplicateSpecialization(item.id.clone()));
            }
        }

        Ok(Self {
            lessons: file.lessons,
            specializations: file.specializations,
            seed: file.progress,
        })
    }

    pub fn lessons(&self) -> &[Lesson] {
        &self.lessons
    }

    pub fn specializations(&self) -> &[Specialization] {
        &self.specializations
    }

    pub fn lesson(&self, id: &str) -> Option<&Lesson> {
        self.lessons.iter().find(|l| l.id == id)
    }

    pub fn specialization(&self, id: &str) -> Option<&Specialization> {
        self.specializations.iter().find(|s| s.id == id)
    }

    /// Progress snapshot a fresh viewer session starts from
    pub fn seed_progress(&self) -> Progress {
        self.seed.clone().unwrap_or_default().deduplicated()
    }
}
