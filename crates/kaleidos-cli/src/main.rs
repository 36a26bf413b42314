//! 전략 성과 리포트 CLI.
//!
//! # 사용 예시
//!
//! ```bash
//! # SPY 대비 통계 리포트 (HTML)
//! kaleidos stats --values runs/momentum.csv --benchmark SPY --data-dir data
//!
//! # 지표 비교표만 출력
//! kaleidos stats --values runs/momentum.csv --benchmark SPY --output plot
//!
//! # 매매 마커가 표시된 수익률 차트
//! kaleidos figure --series momentum=runs/momentum.csv \
//!     --trades momentum=runs/momentum_trades.csv --title "Momentum Run"
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use kaleidos_core::{init_logging, LogConfig, ReportConfig};
use std::path::PathBuf;
use tracing::{error, info};

use kaleidos_cli::commands::figure::{parse_named_path, run_figure, FigureCliConfig};
use kaleidos_cli::commands::stats::{print_output, run_stats, StatsCliConfig};

#[derive(Parser)]
#[command(name = "kaleidos")]
#[command(about = "Strategy report CLI - 통계 리포트 및 수익률 차트 생성", long_about = None)]
#[command(version)]
struct Cli {
    /// 설정 파일
    #[arg(short, long, global = true, default_value = "config/default.toml")]
    config: PathBuf,

    /// 리포트 출력 루트 (설정 파일의 output_root 대체)
    #[arg(long, global = true)]
    output_root: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 가치 이력과 벤치마크로 통계 리포트 생성
    Stats {
        /// 가치 이력 CSV 파일
        #[arg(long)]
        values: PathBuf,

        /// 가치 이력 값 컬럼
        #[arg(long, default_value = "value")]
        value_column: String,

        /// 벤치마크 심볼 (예: SPY)
        #[arg(short, long, required_unless_present = "benchmark_file")]
        benchmark: Option<String>,

        /// 벤치마크 CSV 파일 (timestamp, close)
        #[arg(long, conflicts_with = "benchmark")]
        benchmark_file: Option<PathBuf>,

        /// 심볼 데이터 디렉토리 (<SYMBOL>.csv)
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,

        /// 전략 이름 (기본: 가치 이력 파일 이름)
        #[arg(short, long)]
        name: Option<String>,

        /// 리포트 제목 (기본: 전략 이름)
        #[arg(short, long)]
        title: Option<String>,

        /// 벤치마크 제목 (기본: 심볼)
        #[arg(long)]
        benchmark_title: Option<String>,

        /// 출력 모드 (html, plot)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// 매매 마커가 표시된 수익률 차트 생성
    Figure {
        /// 가치 이력 (name=path, 반복 가능)
        #[arg(short, long, required = true, value_parser = parse_named_path)]
        series: Vec<(String, PathBuf)>,

        /// 매매 기록 (name=path, 반복 가능)
        #[arg(long, value_parser = parse_named_path)]
        trades: Vec<(String, PathBuf)>,

        /// 가치 이력 값 컬럼
        #[arg(long, default_value = "value")]
        value_column: String,

        /// 차트 제목
        #[arg(short, long)]
        title: String,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let mut config = ReportConfig::load(&cli.config)
        .with_context(|| format!("설정 로드 실패: {}", cli.config.display()))?;
    if let Some(root) = cli.output_root {
        config.output_root = root;
    }

    init_logging(LogConfig::from_settings(&config.logging))?;

    match cli.command {
        Commands::Stats {
            values,
            value_column,
            benchmark,
            benchmark_file,
            data_dir,
            name,
            title,
            benchmark_title,
            output,
        } => {
            let stats_config = StatsCliConfig {
                values,
                value_column,
                benchmark,
                benchmark_file,
                data_dir,
                name,
                title,
                benchmark_title,
                output,
            };

            match run_stats(stats_config, &config) {
                Ok(output) => print_output(&output),
                Err(e) => {
                    error!("Statistics report failed: {:#}", e);
                    return Err(e);
                }
            }
        }

        Commands::Figure {
            series,
            trades,
            value_column,
            title,
        } => {
            let figure_config = FigureCliConfig {
                series,
                trades,
                value_column,
                title,
            };

            match run_figure(figure_config, &config) {
                Ok(path) => {
                    info!("Figure saved");
                    println!("\n차트 저장 완료");
                    println!("저장 위치: {}", path.display());
                }
                Err(e) => {
                    error!("Figure failed: {:#}", e);
                    return Err(e);
                }
            }
        }
    }

    Ok(())
}
