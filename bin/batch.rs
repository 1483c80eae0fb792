//! Batch - 并行执行多次模拟运行
//!
//! 每次运行在 tokio 的阻塞线程池中执行（计算密集），
//! 结果按运行序号返回，并附带 ULID 运行标识与开始时间。

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use pragma_simulation::{run_once, RunReport, SimulationConfig};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;
use ulid::Ulid;

/// 带运行标识的报告
#[derive(Debug, Clone, Serialize)]
pub struct TaggedReport {
    pub run_id: Ulid,
    pub started_at: DateTime<Utc>,
    #[serde(flatten)]
    pub report: RunReport,
}

/// 批次汇总
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BatchSummary {
    pub runs: usize,
    pub mean_success_rate: f64,
    pub mean_asymmetry: f64,
    pub mean_turns: f64,
}

/// 执行 `config.runs` 次运行
pub async fn run_batch(config: SimulationConfig) -> Result<Vec<TaggedReport>> {
    config.validate()?;
    info!("Starting batch of {} runs (seed {:#x})", config.runs, config.seed);

    let config = Arc::new(config);
    let handles: Vec<_> = (0..config.runs)
        .map(|run| {
            let config = Arc::clone(&config);
            tokio::task::spawn_blocking(move || {
                let run_id = Ulid::new();
                let started_at = Utc::now();
                run_once(&config, run).map(|report| TaggedReport {
                    run_id,
                    started_at,
                    report,
                })
            })
        })
        .collect();

    let mut reports = Vec::with_capacity(handles.len());
    for handle in handles {
        let report = handle.await.context("Simulation task failed")??;
        reports.push(report);
    }
    Ok(reports)
}

pub fn summarize(reports: &[TaggedReport]) -> BatchSummary {
    let runs = reports.len();
    let mean = |f: fn(&TaggedReport) -> f64| {
        if runs == 0 {
            0.0
        } else {
            reports.iter().map(f).sum::<f64>() / runs as f64
        }
    };

    BatchSummary {
        runs,
        mean_success_rate: mean(|r| r.report.summary.success_rate),
        mean_asymmetry: mean(|r| r.report.summary.asymmetry),
        mean_turns: mean(|r| r.report.summary.turns as f64),
    }
}
