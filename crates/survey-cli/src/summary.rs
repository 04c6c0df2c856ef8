use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use survey_model::{Configuration, FieldAggregate, FieldSpec, Results};
use survey_validate::{ConfigError, InvalidConfigurationError, SubmissionError};

pub fn print_configuration(configuration: &Configuration) {
    println!("Survey: {} ({})", configuration.survey_name(), configuration.title());
    println!(
        "Window: {} .. {}{}",
        timestamp_label(configuration.start()),
        timestamp_label(configuration.end()),
        if configuration.is_draft() { " [draft]" } else { "" }
    );
    println!("Fingerprint: {}", configuration.fingerprint());

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Id"),
        header_cell("Type"),
        header_cell("Title"),
        header_cell("Constraints"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    for spec in configuration.fields() {
        table.add_row(vec![
            Cell::new(spec.identifier()),
            kind_cell(spec),
            Cell::new(spec.title()),
            Cell::new(constraints(spec)),
        ]);
    }
    println!("{table}");
}

pub fn print_configuration_errors(err: &InvalidConfigurationError) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Location"),
        header_cell("Code"),
        header_cell("Message"),
    ]);
    apply_table_style(&mut table);
    for error in err.errors() {
        table.add_row(vec![
            Cell::new(error.location()),
            Cell::new(detail_code(error)).fg(Color::Red),
            Cell::new(error.to_string()),
        ]);
    }
    println!("Configuration rejected ({} issue(s)):", err.errors().len());
    println!("{table}");
}

pub fn print_submission_error(err: &SubmissionError) {
    match err {
        SubmissionError::NotAnObject { .. } | SubmissionError::ShapeMismatch(_) => {
            println!("Submission rejected: {err}");
        }
        SubmissionError::InvalidFields(invalid) => {
            let mut table = Table::new();
            table.set_header(vec![
                header_cell("Field"),
                header_cell("Code"),
                header_cell("Message"),
            ]);
            apply_table_style(&mut table);
            align_column(&mut table, 0, CellAlignment::Right);
            for error in invalid.errors() {
                table.add_row(vec![
                    Cell::new(error.identifier),
                    Cell::new(error.error.code()).fg(Color::Red),
                    Cell::new(error.error.to_string()),
                ]);
            }
            println!("Submission rejected ({} field error(s)):", invalid.errors().len());
            println!("{table}");
        }
    }
}

pub fn print_results(configuration: &Configuration, results: &Results, rejected: usize) {
    println!(
        "Survey: {}  submissions: {}  rejected: {}",
        configuration.survey_name(),
        results.count,
        rejected
    );
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Id"),
        header_cell("Title"),
        header_cell("Answer"),
        header_cell("Count"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    for (identifier, aggregate) in &results.data {
        let title = configuration
            .field(*identifier)
            .map(FieldSpec::title)
            .unwrap_or_default();
        match aggregate {
            FieldAggregate::Sum(sum) => {
                table.add_row(vec![
                    Cell::new(identifier),
                    Cell::new(title),
                    Cell::new("checked"),
                    count_cell(*sum),
                ]);
            }
            FieldAggregate::Counts(counts) => {
                for (position, (option, count)) in counts.iter().enumerate() {
                    let (id_cell, title_cell) = if position == 0 {
                        (Cell::new(identifier), Cell::new(title))
                    } else {
                        (dim_cell(""), dim_cell(""))
                    };
                    table.add_row(vec![id_cell, title_cell, Cell::new(option), count_cell(count)]);
                }
            }
            FieldAggregate::Unaggregated => {
                table.add_row(vec![
                    Cell::new(identifier),
                    Cell::new(title),
                    dim_cell("not aggregated"),
                    dim_cell("-"),
                ]);
            }
        }
    }
    println!("{table}");
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

/// Innermost code: the field rule for field errors, the header rule otherwise.
fn detail_code(error: &ConfigError) -> &'static str {
    match error {
        ConfigError::Field { error, .. } => error.code(),
        other => other.code(),
    }
}

fn constraints(spec: &FieldSpec) -> String {
    match spec {
        FieldSpec::Email(field) => {
            let mut parts = vec![format!("regex {}", field.regex)];
            if field.verify {
                parts.push("verified".to_string());
            }
            parts.join(", ")
        }
        FieldSpec::Option(field) => {
            if field.required {
                "must be checked".to_string()
            } else {
                "-".to_string()
            }
        }
        FieldSpec::Radio(field) => field.options.join(" | "),
        FieldSpec::Selection(field) => format!(
            "{} ({}..={})",
            field.options.join(" | "),
            field.min_select,
            field.max_select
        ),
        FieldSpec::Text(field) => format!("{}..={} chars", field.min_chars, field.max_chars),
    }
}

fn timestamp_label(value: Option<chrono::DateTime<chrono::Utc>>) -> String {
    value.map_or_else(|| "-".to_string(), |time| time.to_rfc3339())
}

fn kind_cell(spec: &FieldSpec) -> Cell {
    Cell::new(spec.kind()).fg(Color::Blue)
}

pub fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn count_cell(count: u64) -> Cell {
    if count > 0 {
        Cell::new(count).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
