use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use axum_prometheus::PrometheusMetricLayer;
use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use enroll_ai::config::AppConfig;
use enroll_ai::error::AppError;
use enroll_ai::telemetry;
use enroll_ai::workflows::enrollment::placement::intake::profile_from_submission;
use enroll_ai::workflows::enrollment::placement::{
    placement_router, InMemoryPlacementRepository, LogAlertPublisher, PlacementEngine,
    PlacementService, PlacementSubmission, ProgramDefinition, ProgramRecommendation,
    PROGRAM_CATALOG,
};
use enroll_ai::workflows::masterlist::{placement_report, MasterlistImporter, PlacementReport};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::io::Cursor;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
struct AppState {
    readiness: Arc<AtomicBool>,
    metrics: PrometheusHandle,
}

#[derive(Parser, Debug)]
#[command(
    name = "School Placement Orchestrator",
    about = "Run the enrollment placement service or batch placement reports from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Batch placement tooling over registrar masterlist exports
    Masterlist {
        #[command(subcommand)]
        command: MasterlistCommand,
    },
}

#[derive(Args, Debug, Default)]
struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    port: Option<u16>,
}

#[derive(Subcommand, Debug)]
enum MasterlistCommand {
    /// Rank every student in a masterlist CSV and print per-program tallies
    Report(MasterlistReportArgs),
}

#[derive(Args, Debug)]
struct MasterlistReportArgs {
    /// Masterlist CSV export to rank
    #[arg(long)]
    masterlist_csv: PathBuf,
    /// Report date (defaults to today)
    #[arg(long, value_parser = parse_date)]
    today: Option<NaiveDate>,
    /// Include the per-student breakdown in the output
    #[arg(long)]
    list_students: bool,
}

#[derive(Debug, Deserialize)]
struct MasterlistReportRequest {
    masterlist_csv: String,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    today: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
struct RecommendationResponse {
    lrn: String,
    overall_average: f32,
    rule: &'static str,
    recommendations: Vec<ProgramRecommendation>,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run_cli().await {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

async fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => run_server(args).await,
        Command::Masterlist {
            command: MasterlistCommand::Report(args),
        } => run_masterlist_report(args),
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

fn deserialize_optional_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    opt.map(|value| parse_date(&value).map_err(serde::de::Error::custom))
        .transpose()
}

async fn run_server(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let state = AppState {
        readiness: readiness_flag.clone(),
        metrics: prometheus_handle,
    };

    let repository = Arc::new(InMemoryPlacementRepository::default());
    let alerts = Arc::new(LogAlertPublisher);
    let service = Arc::new(PlacementService::new(repository, alerts));

    let app: Router = placement_router(service)
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/enrollment/programs", get(catalog_endpoint))
        .route(
            "/api/v1/enrollment/recommendations",
            post(recommendation_endpoint),
        )
        .route(
            "/api/v1/enrollment/masterlist/report",
            post(masterlist_report_endpoint),
        )
        .layer(prometheus_layer)
        .layer(Extension(state));

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "placement orchestrator ready");

    axum::serve(listener, app).await?;
    Ok(())
}

fn run_masterlist_report(args: MasterlistReportArgs) -> Result<(), AppError> {
    let MasterlistReportArgs {
        masterlist_csv,
        today,
        list_students,
    } = args;

    let submissions = MasterlistImporter::from_path(masterlist_csv)?;
    let today = today.unwrap_or_else(|| Local::now().date_naive());
    let report = placement_report(submissions, today);
    render_placement_report(&report, list_students);

    Ok(())
}

async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

async fn catalog_endpoint() -> Json<&'static [ProgramDefinition]> {
    Json(&PROGRAM_CATALOG[..])
}

/// Stateless ranking for callers that keep their own records: normalize the
/// submission, rank it, and return the ordered program list.
async fn recommendation_endpoint(
    Json(submission): Json<PlacementSubmission>,
) -> Json<RecommendationResponse> {
    let profile = profile_from_submission(submission);
    let outcome = PlacementEngine::new().evaluate(&profile);

    Json(RecommendationResponse {
        lrn: profile.lrn,
        overall_average: profile.academic.overall_average,
        rule: outcome.rule.label(),
        recommendations: outcome.recommendations,
    })
}

async fn masterlist_report_endpoint(
    Json(payload): Json<MasterlistReportRequest>,
) -> Result<Json<PlacementReport>, AppError> {
    let MasterlistReportRequest {
        masterlist_csv,
        today,
    } = payload;

    let reader = Cursor::new(masterlist_csv.into_bytes());
    let submissions = MasterlistImporter::from_reader(reader)?;
    let today = today.unwrap_or_else(|| Local::now().date_naive());

    Ok(Json(placement_report(submissions, today)))
}

fn render_placement_report(report: &PlacementReport, list_students: bool) {
    println!("Placement report ({})", report.generated_on);
    println!("Students ranked: {}", report.total_students);

    println!("\nTop recommendations by program");
    for tally in &report.program_tallies {
        println!(
            "- {} ({}): {}",
            tally.program, tally.name, tally.top_recommendations
        );
    }

    if list_students {
        println!("\nPer-student placements");
        for entry in &report.entries {
            println!(
                "- {} -> {} ({}% match, {})",
                entry.lrn, entry.program, entry.score, entry.rule
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use enroll_ai::workflows::enrollment::placement::{AcademicAnswers, Program};

    fn elite_submission() -> PlacementSubmission {
        PlacementSubmission {
            lrn: "123456789012".to_string(),
            academic: AcademicAnswers {
                mathematics: 95.0,
                araling_panlipunan: 95.0,
                english: 95.0,
                edukasyon_sa_pagpapakatao: 95.0,
                science: 95.0,
                edukasyon_pangkabuhayan: 95.0,
                filipino: 95.0,
                mapeh: 95.0,
                dost_exam_result: Some("passed".to_string()),
            },
            ..PlacementSubmission::default()
        }
    }

    #[tokio::test]
    async fn recommendation_endpoint_ranks_submissions() {
        let Json(body) = recommendation_endpoint(Json(elite_submission())).await;

        assert_eq!(body.overall_average, 95.0);
        assert_eq!(body.recommendations[0].program, Program::Ste);
        assert_eq!(body.recommendations[0].score, 99);
        assert!(body
            .recommendations
            .windows(2)
            .all(|pair| pair[0].score >= pair[1].score));
    }

    #[tokio::test]
    async fn masterlist_report_endpoint_tallies_programs() {
        let csv = "\
LRN,Mathematics,Araling Panlipunan,English,Edukasyon sa Pagpapakatao,Science,Edukasyon sa Pangkabuhayan,Filipino,MAPEH,DOST Exam,Working Student
100000000001,95,95,95,95,95,95,95,95,passed,No
100000000002,70,70,70,70,70,70,70,70,not_taken,Yes
";
        let request = MasterlistReportRequest {
            masterlist_csv: csv.to_string(),
            today: None,
        };

        let Json(report) = masterlist_report_endpoint(Json(request))
            .await
            .expect("report builds");

        assert_eq!(report.total_students, 2);
        let ste = report
            .program_tallies
            .iter()
            .find(|tally| tally.program == Program::Ste)
            .expect("STE tally present");
        assert_eq!(ste.top_recommendations, 1);
        let ohsp = report
            .program_tallies
            .iter()
            .find(|tally| tally.program == Program::Ohsp)
            .expect("OHSP tally present");
        assert_eq!(ohsp.top_recommendations, 1);
    }
}
