// ==========================================
// 全量刷新端到端测试
// ==========================================
// 测试目标: 源表 CSV + 文档导出 → 三棵树 → JSON 输出
// ==========================================

mod test_helpers;

use chrono::NaiveDate;
use naf_risk_stats::config::PipelineConfig;
use naf_risk_stats::domain::{Category, DocumentFailureReason, ExtractedDocument};
use naf_risk_stats::engine::RefreshOrchestrator;
use naf_risk_stats::importer::{DocumentSource, JsonDumpSource};
use naf_risk_stats::logging;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;
use test_helpers::{full_document, page, write_at_csv, write_dump, write_mp_csv, AtRow, MpRow};

fn at_row<'a>(code: &'a str, workforce: u64, events: u64, hours: u64) -> AtRow<'a> {
    AtRow {
        committee: "D",
        code,
        label: "Activité",
        coarse_code: "",
        coarse_label: "",
        workforce,
        hours,
        establishments: 5,
        lost_time_events: events,
        lost_days: events * 50,
        manual_handling: events / 2,
    }
}

fn mp_row<'a>(code: &'a str, workforce: u64, first_settlements: u64) -> MpRow<'a> {
    MpRow {
        committee: "D",
        code,
        label: "Activité",
        coarse_code: "",
        table_title: "Affections périarticulaires",
        workforce,
        hours: workforce * 1_500,
        first_settlements,
        tms_flag: true,
    }
}

/// 构造工作区: 两张源表 + 文档目录（2 份可用、1 份页数不足、1 份无法解码）
fn setup_workspace(root: &Path) -> PipelineConfig {
    let accident_workbook = root.join("at.csv");
    let disease_workbook = root.join("mp.csv");
    write_at_csv(
        &accident_workbook,
        &[
            at_row("4711D", 1_000, 40, 1_500_000),
            at_row("4711F", 500, 10, 700_000),
            at_row("1013A", 600, 30, 900_000),
        ],
    )
    .unwrap();
    write_mp_csv(
        &disease_workbook,
        &[mp_row("1013A", 600, 5), mp_row("4711D", 1_000, 1)],
    )
    .unwrap();

    let document_dir = root.join("dumps");
    std::fs::create_dir_all(&document_dir).unwrap();
    write_dump(
        &document_dir,
        &full_document("4711D", [45, 52, 38, 41, 47], [900, 950, 980, 1_000, 1_000]),
    )
    .unwrap();
    write_dump(
        &document_dir,
        &full_document("1013A", [10, 12, 14, 16, 18], [600, 600, 600, 600, 600]),
    )
    .unwrap();
    write_dump(
        &document_dir,
        &ExtractedDocument {
            code: "9999Z".to_string(),
            pages: vec![page("Accidents du travail 3")],
        },
    )
    .unwrap();
    std::fs::write(document_dir.join("NAF_8888Z.json"), "{ pas du json").unwrap();

    PipelineConfig {
        accident_workbook,
        disease_workbook,
        document_dir: Some(document_dir),
        output_dir: root.join("out"),
        header_row: 1,
        document_concurrency: 2,
        spot_check_code: "4711D".to_string(),
        ..Default::default()
    }
}

fn document_source(config: &PipelineConfig) -> Option<Arc<dyn DocumentSource>> {
    config
        .document_dir
        .as_ref()
        .map(|dir| Arc::new(JsonDumpSource::new(dir)) as Arc<dyn DocumentSource>)
}

#[tokio::test]
async fn test_full_refresh_builds_three_trees() {
    logging::init_test();
    let dir = TempDir::new().unwrap();
    let config = setup_workspace(dir.path());
    let orchestrator = RefreshOrchestrator::new(config.clone());

    let output = orchestrator.refresh(document_source(&config)).await.unwrap();

    // ===== 文档失败按编码报告，不中断刷新 =====
    assert_eq!(output.document_failures.len(), 2);
    let failed: Vec<&str> = output
        .document_failures
        .iter()
        .map(|f| f.code.as_str())
        .collect();
    assert!(failed.contains(&"9999Z"));
    assert!(failed.contains(&"8888Z"));
    assert!(output.document_failures.iter().any(|f| matches!(
        f.reason,
        DocumentFailureReason::UnexpectedPageCount { .. }
    )));

    // ===== AT 树 =====
    let at = &output.accident;
    assert_eq!(at.fine.len(), 3);
    assert_eq!(at.mid["4711"].rates.frequency_index, 33.3);
    assert_eq!(at.national.rates.frequency_index, 38.1);

    let demographics = at.fine["4711D"].demographics.as_ref().unwrap();
    assert_eq!(demographics.sex["masculin"], 30);
    assert!(at.fine["4711F"].demographics.is_none());
    let national_demographics = at.national.demographics.as_ref().unwrap();
    assert_eq!(national_demographics.sex["masculin"], 60);
    assert_eq!(at.national.commuting.map(|c| c.count), Some(16));
    assert_eq!(at.mid["4711"].commuting.map(|c| c.count), Some(8));

    assert_eq!(at.trend_years, vec![2019, 2020, 2021, 2022, 2023]);
    let yearly = at.fine["4711D"].yearly.as_ref().unwrap();
    assert_eq!(yearly[&2019].events, 45);
    assert_eq!(yearly[&2019].workforce, 900);
    assert_eq!(yearly[&2019].frequency_index, 50.0);
    assert!(at.fine["4711F"].yearly.is_none());
    let national_2023 = at.national.yearly.as_ref().unwrap()[&2023];
    assert_eq!(national_2023.events, 65);
    assert_eq!(national_2023.workforce, 1_600);
    assert_eq!(national_2023.frequency_index, 40.6);

    // ===== MP 树 =====
    let mp = &output.disease;
    assert_eq!(mp.fine["1013A"].counts.first_settlements, 5);
    assert_eq!(mp.fine["1013A"].cause_shares["TMS"], 100.0);
    assert_eq!(
        mp.fine["1013A"].demographics.as_ref().unwrap().sex.len(),
        2
    );
    assert_eq!(mp.trend_years.len(), 5);

    // ===== 通勤树 =====
    let trajet = output.commuting.as_ref().unwrap();
    assert_eq!(trajet.category, Category::Commuting);
    assert_eq!(trajet.fine.len(), 2);
    let node = &trajet.fine["4711D"];
    assert_eq!(node.counts.first_settlements, 8);
    assert_eq!(node.counts.workforce, 1_000);
    assert_eq!(node.rates.frequency_index, 8.0);
    assert_eq!(node.rates.severity_rate, None);
    assert_eq!(trajet.trend_years.len(), 5);
}

#[tokio::test]
async fn test_refresh_without_documents_skips_commuting() {
    let dir = TempDir::new().unwrap();
    let mut config = setup_workspace(dir.path());
    config.document_dir = None;
    let orchestrator = RefreshOrchestrator::new(config);

    let output = orchestrator.refresh(None).await.unwrap();
    assert!(output.commuting.is_none());
    assert!(output.document_failures.is_empty());
    assert!(output.accident.trend_years.is_empty());
    assert!(output.accident.national.demographics.is_none());
    assert_eq!(output.trees().count(), 2);
}

#[tokio::test]
async fn test_write_outputs_produces_json_documents() {
    let dir = TempDir::new().unwrap();
    let config = setup_workspace(dir.path());
    let orchestrator = RefreshOrchestrator::new(config.clone());
    let output = orchestrator.refresh(document_source(&config)).await.unwrap();

    let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
    let written = orchestrator.write_outputs(&output, date).unwrap();
    assert_eq!(written.len(), 3);
    for category in Category::ALL {
        assert!(written.contains(&config.output_path(category)));
    }

    let raw = std::fs::read_to_string(config.output_path(Category::OccupationalAccident)).unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(json["meta"]["generated_on"], "2024-06-01");
    assert_eq!(json["meta"]["years"].as_array().unwrap().len(), 5);
    assert_eq!(json["meta"]["national"]["counts"]["workforce"], 2_100);
    assert_eq!(json["by_naf5"]["4711D"]["counts"]["lost_time_events"], 40);
    assert_eq!(json["by_naf4"]["4711"]["children"].as_array().unwrap().len(), 2);
    assert!(json["by_naf2"]["47"].is_object());
    assert_eq!(json["naf_index"].as_array().unwrap().len(), 3 + 2 + 2);
}

#[tokio::test]
async fn test_run_writes_all_categories() {
    let dir = TempDir::new().unwrap();
    let config = setup_workspace(dir.path());
    let written = RefreshOrchestrator::new(config).run().await.unwrap();
    assert_eq!(written.len(), 3);
    assert!(written.iter().all(|path| path.exists()));
}

#[tokio::test]
async fn test_missing_workbook_fails_refresh() {
    let dir = TempDir::new().unwrap();
    let mut config = setup_workspace(dir.path());
    config.accident_workbook = dir.path().join("absent.csv");
    let result = RefreshOrchestrator::new(config).refresh(None).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_short_document_code_does_not_abort_refresh() {
    let dir = TempDir::new().unwrap();
    let config = setup_workspace(dir.path());
    let document_dir = config.document_dir.clone().unwrap();
    write_dump(
        &document_dir,
        &full_document("01", [7, 7, 7, 7, 7], [100, 100, 100, 100, 100]),
    )
    .unwrap();
    write_dump(
        &document_dir,
        &full_document("5610A", [3, 3, 3, 3, 3], [50, 50, 50, 50, 50]),
    )
    .unwrap();

    let orchestrator = RefreshOrchestrator::new(config.clone());
    let output = orchestrator.refresh(document_source(&config)).await.unwrap();

    // 层级外编码不进入 AT 树，也不影响其余文档的趋势
    let at = &output.accident;
    assert!(!at.fine.contains_key("01"));
    assert!(!at.fine.contains_key("5610A"));
    assert_eq!(at.fine["4711D"].yearly.as_ref().unwrap()[&2023].events, 47);
    assert_eq!(at.national.commuting.map(|c| c.count), Some(16));

    let trajet = output.commuting.as_ref().unwrap();
    assert_eq!(trajet.fine.len(), 2);
    assert!(!trajet.fine.contains_key("5610A"));
}
