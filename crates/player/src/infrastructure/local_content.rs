//! Offline content: chapter files read straight from a directory.
//!
//! Same layout the engine serves from (`chapter_{id}.json`, `glossary.json`),
//! so a checkout of the content directory is enough to play without a server.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use chronoquest_domain::{chapter_order, Chapter, ChapterId, ChapterSummary, Glossary};

use crate::ports::outbound::{ClientError, ContentSource};

pub struct LocalContentSource {
    dir: PathBuf,
}

impl LocalContentSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    async fn read(&self, file: &str) -> Result<Option<String>, ClientError> {
        let path = self.dir.join(file);
        match tokio::fs::read_to_string(&path).await {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ClientError::io(path.display(), e)),
        }
    }
}

#[async_trait]
impl ContentSource for LocalContentSource {
    async fn list_chapters(&self) -> Result<Vec<ChapterSummary>, ClientError> {
        let mut entries = tokio::fs::read_dir(&self.dir)
            .await
            .map_err(|e| ClientError::io(self.dir.display(), e))?;

        let mut summaries = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| ClientError::io(self.dir.display(), e))?
        {
            let name = entry.file_name().to_string_lossy().into_owned();
            if !(name.starts_with("chapter_") && name.ends_with(".json")) {
                continue;
            }
            let Some(raw) = self.read(&name).await? else {
                continue;
            };
            match Chapter::from_json(&raw) {
                Ok(chapter) => summaries.push(chapter.summary()),
                Err(e) => tracing::warn!(file = %name, error = %e, "Skipping chapter file"),
            }
        }
        summaries.sort_by(|a, b| chapter_order(&a.id, &b.id));
        Ok(summaries)
    }

    async fn chapter(&self, id: &ChapterId) -> Result<serde_json::Value, ClientError> {
        let file = format!("chapter_{}.json", id);
        let raw = self
            .read(&file)
            .await?
            .ok_or_else(|| ClientError::NotFound(format!("chapter {}", id)))?;
        serde_json::from_str(&raw).map_err(|e| ClientError::io(self.dir.join(&file).display(), e))
    }

    async fn glossary(&self) -> Result<Glossary, ClientError> {
        match self.read("glossary.json").await? {
            Some(raw) => serde_json::from_str(&raw)
                .map_err(|e| ClientError::io(self.dir.join("glossary.json").display(), e)),
            None => Ok(Glossary::default()),
        }
    }
}
