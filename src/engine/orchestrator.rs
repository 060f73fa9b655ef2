// ==========================================
// NAF 事故统计系统 - 全量刷新编排器
// ==========================================
// 流程:
// 1. 导入 AT / MP 源表 → 叶子记录
// 2. 分层聚合 → AT 树 / MP 树
// 3. （可选）文档批处理 → 属性叠加 → 五年趋势 → 通勤树
// 4. 校验摘要 → 写出 JSON
// 红线: 每次运行全量重算，无增量路径
// ==========================================

use crate::config::{ConfigError, PipelineConfig};
use crate::domain::aggregate::AggregateTree;
use crate::domain::document::{DocumentFailure, DocumentRecord};
use crate::domain::record::LeafRecord;
use crate::domain::types::{Category, Level};
use crate::engine::aggregator::{AggregationError, HierarchicalAggregator};
use crate::engine::commuting::CommutingTreeBuilder;
use crate::engine::merge::CrossSourceMerge;
use crate::engine::trend::TrendBuilder;
use crate::importer::{DocumentBatch, DocumentSource, ImportError, JsonDumpSource, WorkbookImporter};
use crate::output::{write_document, AggregateDocument, OutputError};
use chrono::{Local, NaiveDate};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, instrument, warn};

// ==========================================
// PipelineError
// ==========================================
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),

    #[error("导入失败: {0}")]
    Import(#[from] ImportError),

    #[error("聚合失败: {0}")]
    Aggregation(#[from] AggregationError),

    #[error("输出失败: {0}")]
    Output(#[from] OutputError),

    #[error("后台任务异常: {0}")]
    Task(#[from] tokio::task::JoinError),
}

// ==========================================
// RefreshOutput - 一次刷新的全部结果
// ==========================================
#[derive(Debug, Clone)]
pub struct RefreshOutput {
    pub accident: AggregateTree,
    pub disease: AggregateTree,
    pub commuting: Option<AggregateTree>,
    pub document_failures: Vec<DocumentFailure>,
}

impl RefreshOutput {
    pub fn trees(&self) -> impl Iterator<Item = &AggregateTree> {
        [Some(&self.accident), Some(&self.disease), self.commuting.as_ref()]
            .into_iter()
            .flatten()
    }
}

// ==========================================
// RefreshOrchestrator
// ==========================================
pub struct RefreshOrchestrator {
    config: PipelineConfig,
    aggregator: HierarchicalAggregator,
    merge: CrossSourceMerge,
}

impl RefreshOrchestrator {
    pub fn new(config: PipelineConfig) -> Self {
        let aggregator = HierarchicalAggregator::new(config.hierarchy_keys());
        Self {
            config,
            aggregator,
            merge: CrossSourceMerge::new(),
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// 由叶子记录与文档记录组装三棵树（纯计算，无 I/O）
    ///
    /// 文档为空时只构建 AT / MP 树
    pub fn assemble(
        &self,
        accident_leaves: &[LeafRecord],
        disease_leaves: &[LeafRecord],
        documents: &BTreeMap<String, DocumentRecord>,
    ) -> Result<(AggregateTree, AggregateTree, Option<AggregateTree>), AggregationError> {
        let mut accident = self
            .aggregator
            .build(Category::OccupationalAccident, accident_leaves)?;
        let mut disease = self
            .aggregator
            .build(Category::OccupationalDisease, disease_leaves)?;

        if documents.is_empty() {
            return Ok((accident, disease, None));
        }

        self.merge.overlay_accident(&mut accident, documents);
        self.merge.overlay_disease(&mut disease, documents);

        // 两份趋势都以叠加前的 AT 计数为口径
        let trend_builder = TrendBuilder::new(&accident, self.aggregator);
        let accident_trend = trend_builder.build(Category::OccupationalAccident, documents)?;
        let disease_trend = trend_builder.build(Category::OccupationalDisease, documents)?;
        self.merge.overlay_trend(&mut accident, &accident_trend);
        self.merge.overlay_trend(&mut disease, &disease_trend);

        // 通勤树依赖 AT 细码的年度雇员数
        let commuting = CommutingTreeBuilder::new(&accident, self.aggregator).build(documents)?;
        Ok((accident, disease, commuting))
    }

    /// 执行全量刷新（不写文件）
    #[instrument(skip(self, documents))]
    pub async fn refresh(
        &self,
        documents: Option<Arc<dyn DocumentSource>>,
    ) -> Result<RefreshOutput, PipelineError> {
        let importer = Arc::new(WorkbookImporter::new(self.config.header_row));

        let accident_path = self.config.accident_workbook.clone();
        let accident_importer = Arc::clone(&importer);
        let accident_task =
            tokio::task::spawn_blocking(move || accident_importer.import_accidents(accident_path));

        let disease_path = self.config.disease_workbook.clone();
        let disease_importer = Arc::clone(&importer);
        let disease_task =
            tokio::task::spawn_blocking(move || disease_importer.import_diseases(disease_path));

        let accident_leaves = accident_task.await??;
        let disease_leaves = disease_task.await??;

        let (records, document_failures) = match documents {
            Some(source) => {
                let report = DocumentBatch::new(source, self.config.document_concurrency)
                    .run()
                    .await?;
                (report.records, report.failures)
            }
            None => {
                info!("未配置文档目录，跳过人口统计 / 趋势 / 通勤");
                (BTreeMap::new(), Vec::new())
            }
        };

        let (accident, disease, commuting) =
            self.assemble(&accident_leaves, &disease_leaves, &records)?;

        let output = RefreshOutput {
            accident,
            disease,
            commuting,
            document_failures,
        };
        for tree in output.trees() {
            log_validation_summary(tree, &self.config.spot_check_code);
        }
        Ok(output)
    }

    /// 全量刷新并写出各险种 JSON，返回写出的路径
    pub async fn run(&self) -> Result<Vec<PathBuf>, PipelineError> {
        let source: Option<Arc<dyn DocumentSource>> = self
            .config
            .document_dir
            .as_ref()
            .map(|dir| Arc::new(JsonDumpSource::new(dir)) as Arc<dyn DocumentSource>);

        let output = self.refresh(source).await?;
        if !output.document_failures.is_empty() {
            warn!(
                failures = output.document_failures.len(),
                "部分文档解析失败，可按编码手工重试"
            );
        }
        self.write_outputs(&output, Local::now().date_naive())
    }

    pub fn write_outputs(
        &self,
        output: &RefreshOutput,
        generated_on: NaiveDate,
    ) -> Result<Vec<PathBuf>, PipelineError> {
        let mut written = Vec::new();
        for tree in output.trees() {
            let source = self.config.sources.for_category(tree.category);
            let document = AggregateDocument::from_tree(tree, source, generated_on);
            let path = self.config.output_path(tree.category);
            write_document(&path, &document)?;
            written.push(path);
        }
        Ok(written)
    }
}

// ==========================================
// 校验摘要
// ==========================================

/// 输出各级节点数、全国比率与抽查编码
pub fn log_validation_summary(tree: &AggregateTree, spot_code: &str) {
    info!(
        category = %tree.category,
        naf5 = tree.fine.len(),
        naf4 = tree.mid.len(),
        naf2 = tree.coarse.len(),
        index_entries = tree.index().len(),
        national_frequency = tree.national.rates.frequency_index,
        national_severity = ?tree.national.rates.severity_rate,
        "校验摘要"
    );

    match tree.node(Level::Fine, spot_code) {
        Some(node) => info!(
            category = %tree.category,
            code = spot_code,
            label = %node.label,
            workforce = node.counts.workforce,
            events = node.counts.event_count(tree.category),
            frequency = node.rates.frequency_index,
            new_disabilities = node.counts.new_disabilities,
            "抽查编码"
        ),
        None => warn!(category = %tree.category, code = spot_code, "抽查编码不在细码层级"),
    }
}
