use std::path::{Path, PathBuf};

use anyhow::Context;
use chronoquest_domain::{Chapter, Glossary};

fn main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    match args.next().as_deref() {
        Some("validate-content") => {
            let dir = args.next().map(PathBuf::from).unwrap_or_else(|| "data".into());
            validate_content(&dir)
        }
        Some(cmd) => anyhow::bail!("Unknown xtask command: {cmd}"),
        None => anyhow::bail!(
            "Usage: cargo xtask <command>\n\nCommands:\n  validate-content [dir]"
        ),
    }
}

/// Parse every `chapter_*.json` and the glossary under `dir` and report
/// content issues. Dangling scene references fail the run; other issues are
/// printed as warnings.
fn validate_content(dir: &Path) -> anyhow::Result<()> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)
        .with_context(|| format!("reading {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| is_chapter_file(path))
        .collect();
    files.sort();

    if files.is_empty() {
        anyhow::bail!("no chapter_*.json files in {}", dir.display());
    }

    let mut failures = 0usize;
    for path in &files {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let chapter = match Chapter::from_json(&text) {
            Ok(chapter) => chapter,
            Err(e) => {
                println!("FAIL {}: {}", path.display(), e);
                failures += 1;
                continue;
            }
        };

        let issues = chapter.content_issues();
        let fatal = issues.iter().filter(|i| i.is_dangling_reference()).count();
        for issue in &issues {
            let level = if issue.is_dangling_reference() { "error" } else { "warn" };
            println!("  {level}: {issue}");
        }
        if fatal > 0 {
            failures += 1;
            println!("FAIL {} ({} scenes)", path.display(), chapter.scenes.len());
        } else {
            println!("ok   {} ({} scenes)", path.display(), chapter.scenes.len());
        }
    }

    let glossary_path = dir.join("glossary.json");
    if glossary_path.exists() {
        let text = std::fs::read_to_string(&glossary_path)
            .with_context(|| format!("reading {}", glossary_path.display()))?;
        match serde_json::from_str::<Glossary>(&text) {
            Ok(glossary) => println!("ok   {} ({} terms)", glossary_path.display(), glossary.len()),
            Err(e) => {
                println!("FAIL {}: {}", glossary_path.display(), e);
                failures += 1;
            }
        }
    }

    if failures > 0 {
        anyhow::bail!("{failures} content file(s) failed validation");
    }
    Ok(())
}

fn is_chapter_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with("chapter_") && n.ends_with(".json"))
}
