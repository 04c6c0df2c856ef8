use anyhow::{Context, Result};
use chrono::Utc;
use comfy_table::Table;
use tracing::{debug, info, info_span, warn};

use survey_core::{CompiledSurvey, DocumentStore, InMemoryStore};
use survey_model::{Configuration, Limits};
use survey_validate::{FieldTypeRegistry, validate_configuration};

use survey_cli::input::{read_json, read_submissions};
use survey_cli::output::write_results;
use survey_cli::window::check_window;

use crate::cli::{CheckConfigArgs, CheckSubmissionArgs, ResultsArgs};
use crate::summary::{
    apply_table_style, header_cell, print_configuration, print_configuration_errors, print_results,
    print_submission_error,
};

/// Outcome of a check command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Accepted,
    Rejected,
}

pub fn run_field_types() -> Result<()> {
    let registry = FieldTypeRegistry::new();
    let mut table = Table::new();
    table.set_header(vec![header_cell("Type"), header_cell("Description")]);
    apply_table_style(&mut table);
    for kind in registry.kinds() {
        table.add_row(vec![kind.as_str(), kind.description()]);
    }
    println!("{table}");
    Ok(())
}

pub fn run_check_config(args: &CheckConfigArgs) -> Result<Verdict> {
    let _span = info_span!("check_config", path = %args.config.display()).entered();
    let candidate = read_json(&args.config)?;
    match validate_configuration(&candidate) {
        Ok(configuration) => {
            print_configuration(&configuration);
            Ok(Verdict::Accepted)
        }
        Err(err) => {
            print_configuration_errors(&err);
            Ok(Verdict::Rejected)
        }
    }
}

pub fn run_check_submission(args: &CheckSubmissionArgs) -> Result<Verdict> {
    let survey = load_survey(&args.config)?;
    let _span = info_span!("check_submission", survey = survey.name()).entered();
    let submission = read_json(&args.submission)?;

    if !args.ignore_window {
        let now = args.at.unwrap_or_else(Utc::now);
        let status = check_window(survey.configuration(), now);
        if !status.is_open() {
            println!("Submission rejected: {status}");
            return Ok(Verdict::Rejected);
        }
    }

    match survey.validator().validate(&submission) {
        Ok(()) => {
            println!("Submission accepted.");
            if let Some(address) = survey.validator().verification_address(&submission) {
                println!("Verification required for: {address}");
            }
            Ok(Verdict::Accepted)
        }
        Err(err) => {
            print_submission_error(&err);
            Ok(Verdict::Rejected)
        }
    }
}

pub fn run_results(args: &ResultsArgs) -> Result<()> {
    let survey = load_survey(&args.config)?;
    let _span = info_span!("results", survey = survey.name()).entered();
    let submissions = read_submissions(&args.submissions)?;
    debug!(submissions = submissions.len(), "loaded submissions");

    let store = InMemoryStore::new();
    let mut rejected = 0usize;
    for (index, submission) in submissions.iter().enumerate() {
        if let Err(err) = survey.submit(&store, submission) {
            rejected += 1;
            warn!(index, code = err.code(), "skipping invalid submission: {err}");
        }
    }
    let stored = store.count(survey.name()).context("count stored submissions")?;
    info!(stored, rejected, "submissions loaded");

    let results = survey.recompute(&store).context("aggregate submissions")?;
    if let Some(path) = &args.output {
        write_results(&results, path)?;
    }
    if args.json {
        let text = serde_json::to_string_pretty(&results).context("serialize results")?;
        println!("{text}");
    } else {
        print_results(survey.configuration(), &results, rejected);
    }
    Ok(())
}

fn load_survey(path: &std::path::Path) -> Result<CompiledSurvey> {
    let candidate = read_json(path)?;
    let configuration: Configuration = match validate_configuration(&candidate) {
        Ok(configuration) => configuration,
        Err(err) => {
            print_configuration_errors(&err);
            return Err(err).with_context(|| format!("invalid configuration {}", path.display()));
        }
    };
    Ok(CompiledSurvey::from_configuration(
        configuration,
        Limits::default(),
    ))
}
