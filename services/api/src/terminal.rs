use crate::infra::{InMemorySessionRepository, LoggingAlertPublisher};
use chrono::Local;
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use stress_check::config::AppConfig;
use stress_check::error::AppError;
use stress_check::telemetry;
use stress_check::workflows::assessment::{
    AlertPublisher, AssessmentError, AssessmentService, AssessmentServiceError, CsvResponseStore,
    ResponseStore, SessionRepository, SessionView, Speaker,
};

pub(crate) fn run_terminal_assessment() -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let store = Arc::new(CsvResponseStore::open(&config.storage.responses_path)?);
    let service = AssessmentService::new(
        store,
        Arc::new(InMemorySessionRepository::default()),
        Arc::new(LoggingAlertPublisher::default()),
    );

    let stdin = io::stdin();
    let stdout = io::stdout();
    drive(&service, stdin.lock(), stdout.lock())?;
    Ok(())
}

/// Walk one respondent through the questionnaire over line-oriented IO.
pub(crate) fn drive<S, R, A, I, O>(
    service: &AssessmentService<S, R, A>,
    mut input: I,
    mut output: O,
) -> Result<SessionView, AppError>
where
    S: ResponseStore + 'static,
    R: SessionRepository + 'static,
    A: AlertPublisher + 'static,
    I: BufRead,
    O: Write,
{
    let mut view = service.start(Local::now().naive_local())?;
    let id = view.session_id.clone();
    let mut printed = 0;
    let mut line = String::new();

    loop {
        for entry in &view.transcript[printed..] {
            if entry.speaker == Speaker::System {
                writeln!(output, "{}", entry.text)?;
            }
        }
        printed = view.transcript.len();

        let Some(question) = view.question.clone() else {
            break;
        };
        if let Some(banner) = view.banner {
            writeln!(output, "\n{banner}")?;
        }
        writeln!(
            output,
            "\n[{}/{}] {}",
            view.step + 1,
            view.total_questions,
            question.prompt
        )?;
        for (number, label) in question.options.iter().enumerate() {
            writeln!(output, "  {} => {}", number + 1, label)?;
        }

        line.clear();
        if input.read_line(&mut line)? == 0 {
            return Err(AppError::Io(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input ended before the assessment was complete",
            )));
        }
        let answer = resolve_answer(line.trim(), &question.options);

        match service.answer(&id, answer) {
            Ok(next) => view = next,
            Err(AssessmentServiceError::Assessment(AssessmentError::InvalidOptionSelected {
                ..
            })) => {
                writeln!(output, "উত্তর হিসেবে 1-5 অথবা একটি অপশন লিখুন।")?;
            }
            Err(err) => return Err(err.into()),
        }
    }

    if let Some(result) = &view.result {
        writeln!(output, "\nBRAC IED SUMMARY")?;
        writeln!(output, "{} ({})", result.score, result.headline)?;
        writeln!(output, "{}", result.description)?;
    }
    Ok(view)
}

/// Accept either the option number shown on screen or the label itself.
fn resolve_answer<'a>(raw: &'a str, options: &[&'static str]) -> &'a str {
    raw.parse::<usize>()
        .ok()
        .and_then(|number| number.checked_sub(1))
        .and_then(|index| options.get(index).copied())
        .unwrap_or(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::InMemoryResponseStore;
    use std::io::Cursor;
    use stress_check::workflows::assessment::StressLevel;

    fn service() -> AssessmentService<InMemoryResponseStore, InMemorySessionRepository, LoggingAlertPublisher>
    {
        AssessmentService::new(
            Arc::new(InMemoryResponseStore::default()),
            Arc::new(InMemorySessionRepository::default()),
            Arc::new(LoggingAlertPublisher::default()),
        )
    }

    #[test]
    fn numbered_answers_complete_the_assessment() {
        let service = service();
        let input = Cursor::new("3\n".repeat(10));
        let mut output = Vec::new();

        let view = drive(&service, input, &mut output).expect("assessment completes");

        let result = view.result.expect("result");
        assert_eq!(result.score, 30);
        assert_eq!(result.level, StressLevel::High);
        assert_eq!(service.responses().expect("list").len(), 1);
        let text = String::from_utf8(output).expect("utf8");
        assert!(text.contains("[10/10]"));
        assert!(text.contains("HIGH STRESS"));
    }

    #[test]
    fn invalid_input_reprompts_the_same_question() {
        let service = service();
        let mut script = String::from("9\nhello\n");
        script.push_str(&"কখনই না\n".repeat(10));
        let mut output = Vec::new();

        let view = drive(&service, Cursor::new(script), &mut output).expect("completes");

        assert_eq!(view.result.expect("result").score, 26);
        let text = String::from_utf8(output).expect("utf8");
        assert_eq!(text.matches("[1/10]").count(), 3);
    }

    #[test]
    fn truncated_input_is_an_error() {
        let service = service();
        let result = drive(&service, Cursor::new("1\n1\n"), Vec::<u8>::new());
        assert!(matches!(result, Err(AppError::Io(_))));
        assert!(service.responses().expect("list").is_empty());
    }
}
