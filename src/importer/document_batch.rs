// ==========================================
// NAF 事故统计系统 - 文档批处理
// ==========================================
// 流程: 列出编码 → 并发读取+解析（信号量限流）→ 按位置收集 → 折叠为映射
// 红线: 单文档失败只记录，不中断批次
// ==========================================

use crate::domain::document::{
    DocumentFailure, DocumentFailureReason, DocumentOutcome, DocumentRecord,
};
use crate::importer::document_builder::DocumentRecordBuilder;
use crate::importer::document_source::DocumentSource;
use crate::importer::error::{ImportError, ImportResult};
use futures::future::join_all;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{info, instrument, warn};
use uuid::Uuid;

/// 批次结果: 成功记录按编码索引，失败逐条保留
#[derive(Debug, Default)]
pub struct BatchReport {
    pub records: BTreeMap<String, DocumentRecord>,
    pub failures: Vec<DocumentFailure>,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.records.len() + self.failures.len()
    }
}

// ==========================================
// DocumentBatch
// ==========================================
pub struct DocumentBatch {
    source: Arc<dyn DocumentSource>,
    builder: DocumentRecordBuilder,
    concurrency: usize,
}

impl DocumentBatch {
    pub fn new(source: Arc<dyn DocumentSource>, concurrency: usize) -> Self {
        Self {
            source,
            builder: DocumentRecordBuilder::new(),
            concurrency: concurrency.max(1),
        }
    }

    /// 处理来源中的全部文档
    pub async fn run(&self) -> ImportResult<BatchReport> {
        let codes = self.source.list_codes().await?;
        Ok(self.run_codes(&codes).await)
    }

    /// 处理指定编码
    #[instrument(skip(self, codes), fields(documents = codes.len(), concurrency = self.concurrency))]
    pub async fn run_codes(&self, codes: &[String]) -> BatchReport {
        let batch_id = Uuid::new_v4();
        info!(batch_id = %batch_id, documents = codes.len(), "开始解析文档批次");

        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let tasks = codes
            .iter()
            .map(|code| self.process_one(code.clone(), Arc::clone(&semaphore)));

        // join_all 按输入位置返回，编码互不重复，折叠时无需加锁
        let outcomes: Vec<DocumentOutcome> = join_all(tasks).await;

        let mut report = BatchReport::default();
        for outcome in outcomes {
            match outcome {
                DocumentOutcome::Parsed(record) => {
                    report.records.insert(record.code.clone(), *record);
                }
                DocumentOutcome::Failed(failure) => {
                    warn!(
                        batch_id = %batch_id,
                        code = %failure.code,
                        reason = %failure.reason,
                        "文档解析失败"
                    );
                    report.failures.push(failure);
                }
            }
        }

        info!(
            batch_id = %batch_id,
            parsed = report.records.len(),
            failed = report.failures.len(),
            "文档批次完成"
        );
        report
    }

    async fn process_one(&self, code: String, semaphore: Arc<Semaphore>) -> DocumentOutcome {
        let _permit = match semaphore.acquire_owned().await {
            Ok(permit) => permit,
            Err(e) => return failed(code, DocumentFailureReason::Unreadable { message: e.to_string() }),
        };

        let mut document = match self.source.load(&code).await {
            Ok(document) => document,
            Err(e) => return failed(code, load_failure_reason(e)),
        };
        document.code = code.clone();

        let builder = self.builder;
        match tokio::task::spawn_blocking(move || builder.build(&document)).await {
            Ok(outcome) => outcome,
            Err(e) => failed(
                code,
                DocumentFailureReason::Malformed {
                    message: format!("解析任务异常终止: {}", e),
                },
            ),
        }
    }
}

fn failed(code: String, reason: DocumentFailureReason) -> DocumentOutcome {
    DocumentOutcome::Failed(DocumentFailure { code, reason })
}

fn load_failure_reason(err: ImportError) -> DocumentFailureReason {
    match err {
        ImportError::DocumentDecodeError { message, .. } => {
            DocumentFailureReason::Malformed { message }
        }
        other => DocumentFailureReason::Unreadable {
            message: other.to_string(),
        },
    }
}
