//! Output artifact naming and persistence.

use chrono::Local;
use proofread_core::AppResult;
use std::path::{Path, PathBuf};

/// Local-time stamp used in artifact names, e.g. `03.14.2025_09.26.53`.
pub fn timestamp() -> String {
    Local::now().format("%m.%d.%Y_%H.%M.%S").to_string()
}

fn file_stem(source: &Path) -> String {
    source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string())
}

/// `results_{stem}_{stamp}.txt`, in `save_dir` or the current directory.
pub fn report_path(source: &Path, save_dir: Option<&Path>, stamp: &str) -> PathBuf {
    let dir = save_dir.unwrap_or_else(|| Path::new("."));
    dir.join(format!("results_{}_{}.txt", file_stem(source), stamp))
}

/// `{stem}_corrected_{stamp}.{ext}`, in `save_dir` or next to the source.
pub fn corrected_path(source: &Path, save_dir: Option<&Path>, stamp: &str) -> PathBuf {
    let dir = match save_dir {
        Some(dir) => dir.to_path_buf(),
        None => source
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(".")),
    };

    let name = match source.extension() {
        Some(ext) => format!("{}_corrected_{}.{}", file_stem(source), stamp, ext.to_string_lossy()),
        None => format!("{}_corrected_{}", file_stem(source), stamp),
    };
    dir.join(name)
}

/// Create the parent directory of `path` if it is missing.
pub fn ensure_parent(path: &Path) -> AppResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
            tracing::debug!("Created output directory {:?}", parent);
        }
    }
    Ok(())
}

/// Write a report next to the configured save location and return its path.
pub fn save_report(source: &Path, save_dir: Option<&Path>, report: &str) -> AppResult<PathBuf> {
    let path = report_path(source, save_dir, &timestamp());
    ensure_parent(&path)?;
    std::fs::write(&path, report)?;
    tracing::info!("Saved report to {:?}", path);
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_timestamp_shape() {
        let stamp = timestamp();
        assert_eq!(stamp.len(), "03.14.2025_09.26.53".len());
        assert_eq!(stamp.matches('.').count(), 4);
        assert_eq!(&stamp[10..11], "_");
    }

    #[test]
    fn test_report_path() {
        let path = report_path(Path::new("/books/novel.docx"), None, "01.02.2025_03.04.05");
        assert_eq!(path, PathBuf::from("./results_novel_01.02.2025_03.04.05.txt"));

        let path = report_path(
            Path::new("novel.docx"),
            Some(Path::new("/tmp/out")),
            "01.02.2025_03.04.05",
        );
        assert_eq!(path, PathBuf::from("/tmp/out/results_novel_01.02.2025_03.04.05.txt"));
    }

    #[test]
    fn test_corrected_path() {
        let path = corrected_path(Path::new("/books/novel.docx"), None, "S");
        assert_eq!(path, PathBuf::from("/books/novel_corrected_S.docx"));

        let path = corrected_path(Path::new("/books/notes.txt"), Some(Path::new("/out")), "S");
        assert_eq!(path, PathBuf::from("/out/notes_corrected_S.txt"));
    }

    #[test]
    fn test_save_report_creates_directory() {
        let temp_dir = TempDir::new().unwrap();
        let save_dir = temp_dir.path().join("reports/nested");

        let path = save_report(Path::new("chapter.docx"), Some(&save_dir), "All clear").unwrap();

        assert!(path.starts_with(&save_dir));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "All clear");
    }
}
