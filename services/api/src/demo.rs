use crate::infra::{InMemoryResponseStore, InMemorySessionRepository, LoggingAlertPublisher};
use chrono::{Local, NaiveDateTime, NaiveTime};
use clap::Args;
use std::sync::Arc;
use stress_check::error::AppError;
use stress_check::workflows::analytics::AnalyticsSummary;
use stress_check::workflows::assessment::{AssessmentService, ResultView, SessionView};

const NEVER: &str = "কখনই না";
const SOMETIMES: &str = "মাঝে মাঝে";
const VERY_OFTEN: &str = "ঘন ঘন";

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Greeting time of day as HH:MM (defaults to now)
    #[arg(long, value_parser = parse_time)]
    pub(crate) at: Option<NaiveTime>,
    /// Print each session transcript
    #[arg(long)]
    pub(crate) transcripts: bool,
}

struct Scenario {
    name: &'static str,
    answers: [&'static str; 10],
}

fn scenarios() -> Vec<Scenario> {
    vec![
        Scenario {
            name: "lowest stress",
            answers: [
                NEVER, NEVER, NEVER, NEVER, NEVER, NEVER, VERY_OFTEN, VERY_OFTEN, VERY_OFTEN,
                VERY_OFTEN,
            ],
        },
        Scenario {
            name: "always sometimes",
            answers: [SOMETIMES; 10],
        },
        Scenario {
            name: "highest stress",
            answers: [
                VERY_OFTEN, VERY_OFTEN, VERY_OFTEN, VERY_OFTEN, VERY_OFTEN, VERY_OFTEN, NEVER,
                NEVER, NEVER, NEVER,
            ],
        },
    ]
}

fn parse_time(raw: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(raw.trim(), "%H:%M")
        .map_err(|err| format!("failed to parse '{raw}' as HH:MM ({err})"))
}

type DemoService =
    AssessmentService<InMemoryResponseStore, InMemorySessionRepository, LoggingAlertPublisher>;

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let service = AssessmentService::new(
        Arc::new(InMemoryResponseStore::default()),
        Arc::new(InMemorySessionRepository::default()),
        Arc::new(LoggingAlertPublisher::default()),
    );
    let now = match args.at {
        Some(time) => Local::now().date_naive().and_time(time),
        None => Local::now().naive_local(),
    };

    println!("Stress assessment demo");
    for (name, view) in play(&service, now)? {
        if args.transcripts {
            println!("\nTranscript ({name})");
            for entry in &view.transcript {
                println!("- {:?}: {}", entry.speaker, entry.text);
            }
        }
        if let Some(result) = &view.result {
            render_result(name, result);
        }
    }

    let summary = AnalyticsSummary::from_records(&service.responses()?);
    println!(
        "\nStored {} responses, average score {:.1}",
        summary.total_participants,
        summary.average_score.unwrap_or_default()
    );
    Ok(())
}

fn play(
    service: &DemoService,
    now: NaiveDateTime,
) -> Result<Vec<(&'static str, SessionView)>, AppError> {
    let mut finished = Vec::new();
    for scenario in scenarios() {
        let mut view = service.start(now)?;
        let id = view.session_id.clone();
        for label in scenario.answers {
            view = service.answer(&id, label)?;
        }
        finished.push((scenario.name, view));
    }
    Ok(finished)
}

fn render_result(name: &str, result: &ResultView) {
    println!(
        "- {name}: total {} (distress {}, coping {}) => {} [{}]",
        result.score, result.score_distress, result.score_coping, result.level, result.headline
    );
}
