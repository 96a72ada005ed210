//! Chapter content stored as JSON files in a directory.
//!
//! Layout: `chapter_{id}.json` per chapter plus one `glossary.json`.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use chronoquest_domain::{chapter_order, ChapterId, ChapterSummary, Glossary};

use crate::infrastructure::ports::{ContentError, ContentRepo};

const GLOSSARY_FILE: &str = "glossary.json";

pub fn chapter_file_name(id: &ChapterId) -> String {
    format!("chapter_{}.json", id)
}

fn is_chapter_file(name: &str) -> bool {
    name.starts_with("chapter_") && name.ends_with(".json")
}

/// File-system content repository.
pub struct FsContentRepo {
    dir: PathBuf,
}

impl FsContentRepo {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    async fn chapter_files(&self) -> Result<Vec<PathBuf>, ContentError> {
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(ContentError::io(self.dir.display(), e)),
        };

        let mut files = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| ContentError::io(self.dir.display(), e))?
        {
            if entry.file_name().to_str().is_some_and(is_chapter_file) {
                files.push(entry.path());
            }
        }
        files.sort();
        Ok(files)
    }

    async fn read_json(path: &Path) -> Result<serde_json::Value, ContentError> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| ContentError::io(path.display(), e))?;
        serde_json::from_str(&raw).map_err(|e| ContentError::parse(path.display(), e))
    }

    /// Every readable chapter document. Unreadable files are skipped with a
    /// warning so one bad file does not take the listing down.
    async fn documents(&self) -> Result<Vec<serde_json::Value>, ContentError> {
        let mut documents = Vec::new();
        for path in self.chapter_files().await? {
            match Self::read_json(&path).await {
                Ok(doc) => documents.push(doc),
                Err(e) => tracing::warn!(error = %e, "Skipping chapter file"),
            }
        }
        Ok(documents)
    }
}

fn document_id(doc: &serde_json::Value) -> Option<ChapterId> {
    doc.get("id")
        .and_then(|id| serde_json::from_value(id.clone()).ok())
}

#[async_trait]
impl ContentRepo for FsContentRepo {
    async fn list_chapters(&self) -> Result<Vec<ChapterSummary>, ContentError> {
        let mut summaries: Vec<ChapterSummary> = self
            .documents()
            .await?
            .into_iter()
            .filter_map(|doc| match serde_json::from_value::<ChapterSummary>(doc) {
                Ok(summary) => Some(summary),
                Err(e) => {
                    tracing::warn!(error = %e, "Chapter file has no usable summary");
                    None
                }
            })
            .collect();
        summaries.sort_by(|a, b| chapter_order(&a.id, &b.id));
        Ok(summaries)
    }

    async fn get_chapter(&self, id: &ChapterId) -> Result<Option<serde_json::Value>, ContentError> {
        Ok(self
            .documents()
            .await?
            .into_iter()
            .find(|doc| document_id(doc).as_ref() == Some(id)))
    }

    async fn glossary(&self) -> Result<Glossary, ContentError> {
        let path = self.dir.join(GLOSSARY_FILE);
        match tokio::fs::try_exists(&path).await {
            Ok(true) => {}
            Ok(false) => return Ok(Glossary::default()),
            Err(e) => return Err(ContentError::io(path.display(), e)),
        }
        let doc = Self::read_json(&path).await?;
        serde_json::from_value(doc).map_err(|e| ContentError::parse(path.display(), e))
    }

    async fn save_chapter(
        &self,
        id: &ChapterId,
        document: &serde_json::Value,
    ) -> Result<String, ContentError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| ContentError::io(self.dir.display(), e))?;

        let path = self.dir.join(chapter_file_name(id));
        let pretty = serde_json::to_string_pretty(document)
            .map_err(|e| ContentError::parse(path.display(), e))?;
        tokio::fs::write(&path, pretty)
            .await
            .map_err(|e| ContentError::io(path.display(), e))?;

        tracing::info!(chapter_id = %id, path = %path.display(), "Chapter saved");
        Ok(path.display().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn write(dir: &Path, name: &str, body: &str) {
        std::fs::write(dir.join(name), body).expect("write fixture");
    }

    #[tokio::test]
    async fn lists_chapters_in_numeric_order_and_skips_junk() {
        let dir = tempfile::tempdir().expect("tempdir");
        write(dir.path(), "chapter_10.json", r#"{"id": 10, "title": "Rome"}"#);
        write(dir.path(), "chapter_2.json", r#"{"id": 2, "title": "Edo"}"#);
        write(dir.path(), "chapter_x.json", "{not json");
        write(dir.path(), "notes.json", r#"{"id": 1}"#);

        let repo = FsContentRepo::new(dir.path());
        let ids: Vec<String> = repo
            .list_chapters()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.id.into_string())
            .collect();
        assert_eq!(ids, vec!["2", "10"]);
    }

    #[tokio::test]
    async fn get_chapter_matches_numeric_and_string_ids() {
        let dir = tempfile::tempdir().expect("tempdir");
        write(dir.path(), "chapter_3.json", r#"{"id": 3, "title": "Andes", "extra": true}"#);
        write(dir.path(), "chapter_b.json", r#"{"id": "bonus", "title": "Bonus"}"#);

        let repo = FsContentRepo::new(dir.path());
        let doc = repo.get_chapter(&ChapterId::new("3")).await.unwrap().unwrap();
        assert_eq!(doc["extra"], true);
        assert!(repo.get_chapter(&ChapterId::new("bonus")).await.unwrap().is_some());
        assert!(repo.get_chapter(&ChapterId::new("9")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn missing_directory_lists_nothing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let repo = FsContentRepo::new(dir.path().join("absent"));
        assert!(repo.list_chapters().await.unwrap().is_empty());
        assert!(repo.glossary().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn save_writes_pretty_json_that_reads_back() {
        let dir = tempfile::tempdir().expect("tempdir");
        let repo = FsContentRepo::new(dir.path().join("data"));
        let doc = json!({"id": 5, "title": "Beringia"});

        let path = repo.save_chapter(&ChapterId::new("5"), &doc).await.unwrap();
        assert!(path.ends_with("chapter_5.json"));
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("\n  \"id\": 5"));
        assert_eq!(repo.get_chapter(&ChapterId::new("5")).await.unwrap(), Some(doc));
    }

    #[tokio::test]
    async fn glossary_loads_from_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        write(
            dir.path(),
            "glossary.json",
            r#"{"koku": {"definition": "A measure of rice"}}"#,
        );
        let repo = FsContentRepo::new(dir.path());
        let glossary = repo.glossary().await.unwrap();
        assert_eq!(glossary.definition("koku"), Some("A measure of rice"));
    }
}
