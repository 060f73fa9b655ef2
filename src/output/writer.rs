// ==========================================
// NAF 事故统计系统 - JSON 输出
// ==========================================

use crate::output::document::AggregateDocument;
use std::path::Path;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum OutputError {
    #[error("输出写入失败 ({path}): {message}")]
    Io { path: String, message: String },

    #[error("输出序列化失败: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// 写入格式化 JSON（自动创建上级目录），返回字节数
pub fn write_document(path: &Path, document: &AggregateDocument) -> Result<u64, OutputError> {
    let io_error = |e: std::io::Error| OutputError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_error)?;
    }

    let json = serde_json::to_string_pretty(document)?;
    std::fs::write(path, json.as_bytes()).map_err(io_error)?;

    let size = json.len() as u64;
    info!(
        category = %document.meta.category,
        path = %path.display(),
        size_kb = size / 1024,
        "输出文件已写入"
    );
    Ok(size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SourceInfo;
    use crate::domain::types::Category;
    use crate::engine::aggregator::HierarchicalAggregator;
    use chrono::NaiveDate;

    #[test]
    fn test_write_document_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("at-data.json");
        let tree = HierarchicalAggregator::default()
            .build(Category::OccupationalAccident, &[])
            .unwrap();
        let document = AggregateDocument::from_tree(
            &tree,
            &SourceInfo {
                description: "s".to_string(),
                url: "u".to_string(),
            },
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        );

        let size = write_document(&path, &document).unwrap();
        assert!(size > 0);

        let raw = std::fs::read_to_string(&path).unwrap();
        let parsed: AggregateDocument = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed, document);
    }
}
