pub mod check;
pub mod eval;
pub mod init;
pub mod render;

pub use check::{check, CheckArgs};
pub use eval::{eval, EvalArgs};
pub use init::{init, InitArgs};
pub use render::{render, RenderArgs};

use anyhow::Result;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const DATA_SUFFIX: &str = ".data.json";

/// Template files under `path`: every `.json` file that is not a
/// `.data.json` companion. A file path is returned as is.
pub fn find_templates(path: &Path) -> Result<Vec<PathBuf>> {
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }

    let mut files = Vec::new();

    for entry in WalkDir::new(path)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        let name = path.file_name().and_then(|s| s.to_str()).unwrap_or_default();
        if name.ends_with(".json") && !name.ends_with(DATA_SUFFIX) && path.is_file() {
            files.push(path.to_path_buf());
        }
    }

    Ok(files)
}

/// `<name>.data.json` for a template `<name>.json`
pub fn data_file_name(template: &Path) -> Option<String> {
    let stem = template.file_stem()?.to_str()?;
    Some(format!("{}{}", stem, DATA_SUFFIX))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_find_templates_skips_data_files() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("nested")).unwrap();
        fs::write(root.join("page.json"), "\"1\"").unwrap();
        fs::write(root.join("page.data.json"), "{}").unwrap();
        fs::write(root.join("nested/list.json"), "[]").unwrap();
        fs::write(root.join("notes.txt"), "").unwrap();

        let files = find_templates(root).unwrap();
        let names: Vec<String> = files
            .iter()
            .map(|file| file.strip_prefix(root).unwrap().display().to_string())
            .collect();
        assert_eq!(names, vec!["nested/list.json", "page.json"]);
    }

    #[test]
    fn test_data_file_name() {
        assert_eq!(
            data_file_name(Path::new("src/page.json")),
            Some("page.data.json".to_string())
        );
    }
}
