// ==========================================
// NAF 事故统计系统 - 文档来源 Trait
// ==========================================
// 职责: 列出可用文档编码 / 读取单份文档的页面文本与表格
// 红线: 只负责读取，不做解析；文本提取由外部工具完成并落盘为 JSON
// ==========================================

use crate::domain::document::ExtractedDocument;
use crate::importer::error::{ImportError, ImportResult};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// 转储文件名: NAF_<细码>.json
pub const DUMP_PREFIX: &str = "NAF_";
pub const DUMP_EXTENSION: &str = "json";

// ==========================================
// DocumentSource Trait
// ==========================================
// 实现者: JsonDumpSource（目录转储）、MemoryDocumentSource（测试/内嵌）
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// 列出全部文档编码（升序）
    async fn list_codes(&self) -> ImportResult<Vec<String>>;

    /// 读取单份文档
    ///
    /// # 错误
    /// - SourceUnavailable: 文档不存在或无法读取
    /// - DocumentDecodeError: 内容不是合法的提取结果
    async fn load(&self, code: &str) -> ImportResult<ExtractedDocument>;
}

// ==========================================
// JsonDumpSource - 目录转储
// ==========================================
pub struct JsonDumpSource {
    dir: PathBuf,
}

impl JsonDumpSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn dump_path(&self, code: &str) -> PathBuf {
        self.dir
            .join(format!("{}{}.{}", DUMP_PREFIX, code, DUMP_EXTENSION))
    }
}

fn code_from_file_name(name: &str) -> Option<&str> {
    let code = name
        .strip_prefix(DUMP_PREFIX)?
        .strip_suffix(DUMP_EXTENSION)?
        .strip_suffix('.')?;
    (!code.is_empty()).then_some(code)
}

#[async_trait]
impl DocumentSource for JsonDumpSource {
    async fn list_codes(&self) -> ImportResult<Vec<String>> {
        let mut entries = tokio::fs::read_dir(&self.dir)
            .await
            .map_err(|e| ImportError::SourceUnavailable {
                location: self.dir.display().to_string(),
                message: e.to_string(),
            })?;

        let mut codes = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name();
            if let Some(code) = name.to_str().and_then(code_from_file_name) {
                codes.push(code.to_string());
            }
        }
        codes.sort();

        debug!(dir = %self.dir.display(), documents = codes.len(), "文档转储目录扫描完成");
        Ok(codes)
    }

    async fn load(&self, code: &str) -> ImportResult<ExtractedDocument> {
        let path = self.dump_path(code);
        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|e| ImportError::SourceUnavailable {
                location: path.display().to_string(),
                message: e.to_string(),
            })?;

        let mut document: ExtractedDocument =
            serde_json::from_slice(&bytes).map_err(|e| ImportError::DocumentDecodeError {
                code: code.to_string(),
                message: e.to_string(),
            })?;
        if document.code.is_empty() {
            document.code = code.to_string();
        }
        Ok(document)
    }
}

// ==========================================
// MemoryDocumentSource - 内存文档
// ==========================================
#[derive(Default)]
pub struct MemoryDocumentSource {
    documents: BTreeMap<String, ExtractedDocument>,
}

impl MemoryDocumentSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, code: impl Into<String>, document: ExtractedDocument) {
        self.documents.insert(code.into(), document);
    }
}

#[async_trait]
impl DocumentSource for MemoryDocumentSource {
    async fn list_codes(&self) -> ImportResult<Vec<String>> {
        Ok(self.documents.keys().cloned().collect())
    }

    async fn load(&self, code: &str) -> ImportResult<ExtractedDocument> {
        self.documents
            .get(code)
            .cloned()
            .ok_or_else(|| ImportError::SourceUnavailable {
                location: format!("memory:{}", code),
                message: "文档不存在".to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::document::ExtractedPage;

    #[test]
    fn test_code_from_file_name() {
        assert_eq!(code_from_file_name("NAF_4711D.json"), Some("4711D"));
        assert_eq!(code_from_file_name("NAF_.json"), None);
        assert_eq!(code_from_file_name("4711D.json"), None);
        assert_eq!(code_from_file_name("NAF_4711D.pdf"), None);
    }

    #[tokio::test]
    async fn test_json_dump_source_lists_and_loads() {
        let dir = tempfile::tempdir().unwrap();
        let document = ExtractedDocument {
            code: String::new(),
            pages: vec![ExtractedPage {
                text: "page".to_string(),
                ..Default::default()
            }],
        };
        std::fs::write(
            dir.path().join("NAF_4711D.json"),
            serde_json::to_vec(&document).unwrap(),
        )
        .unwrap();
        std::fs::write(dir.path().join("NAF_0111Z.json"), b"{not json").unwrap();
        std::fs::write(dir.path().join("readme.txt"), b"ignored").unwrap();

        let source = JsonDumpSource::new(dir.path());
        assert_eq!(source.list_codes().await.unwrap(), vec!["0111Z", "4711D"]);

        let loaded = source.load("4711D").await.unwrap();
        assert_eq!(loaded.code, "4711D");
        assert_eq!(loaded.pages.len(), 1);

        assert!(matches!(
            source.load("0111Z").await,
            Err(ImportError::DocumentDecodeError { .. })
        ));
        assert!(matches!(
            source.load("9999Z").await,
            Err(ImportError::SourceUnavailable { .. })
        ));
    }

    #[tokio::test]
    async fn test_missing_dump_dir_is_source_unavailable() {
        let source = JsonDumpSource::new("/nonexistent/dumps");
        assert!(matches!(
            source.list_codes().await,
            Err(ImportError::SourceUnavailable { .. })
        ));
    }
}
