// Small dev utility: parse every NAF_<code>.json text dump in a directory and
// print a summary plus one sample record.
//
// Usage:
//   cargo run --bin parse_documents -- <dump_dir> [sample_code]

use naf_risk_stats::importer::{DocumentBatch, JsonDumpSource};
use naf_risk_stats::logging;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();

    let mut args = std::env::args().skip(1);
    let dump_dir = args.next().ok_or("usage: parse_documents <dump_dir> [sample_code]")?;
    let sample_code = args
        .next()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    let source = Arc::new(JsonDumpSource::new(&dump_dir));
    let report = DocumentBatch::new(source, 8).run().await?;

    let with_yearly = |pick: fn(&naf_risk_stats::DocumentRecord) -> bool| {
        report.records.values().filter(|r| pick(r)).count()
    };
    println!("documents={}", report.total());
    println!("parsed={}", report.records.len());
    println!("failed={}", report.failures.len());
    println!("at_yearly={}", with_yearly(|r| r.accident_yearly.is_some()));
    println!("trajet_yearly={}", with_yearly(|r| r.commuting_yearly.is_some()));
    println!("mp_yearly={}", with_yearly(|r| r.disease_yearly.is_some()));
    println!("demographics={}", with_yearly(|r| r.accident_demographics.is_some()));
    for failure in &report.failures {
        println!("failure {}: {}", failure.code, failure.reason);
    }

    let sample = match sample_code {
        Some(code) => report.records.get(&code),
        None => report.records.values().next(),
    };
    if let Some(record) = sample {
        println!("{}", serde_json::to_string_pretty(record)?);
    }
    Ok(())
}
