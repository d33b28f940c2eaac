//! Line-oriented terminal front-end: renders snapshots and turns typed lines into commands.

use std::io::{self, BufRead, Write};

use geo_core::model::{CategoryId, CategorySelection, FeatureId, Geometry};
use services::{LearningOverview, QuizCommand, SessionSnapshot, ValidationReport};

/// What the player typed at the quiz prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizInput {
    Command(QuizCommand),
    Quit,
}

/// Map a typed line onto a quiz command.
///
/// A number picks from the candidate list (1-based), `:reset`, `:menu` and
/// `:quit` are control words, a blank line submits no choice and anything else
/// is taken as a feature name.
#[must_use]
pub fn parse_quiz_input(line: &str, candidates: &[FeatureId]) -> QuizInput {
    let trimmed = line.trim();
    match trimmed {
        ":quit" | ":q" => return QuizInput::Quit,
        ":reset" => return QuizInput::Command(QuizCommand::Reset),
        ":menu" => return QuizInput::Command(QuizCommand::ReturnToMenu),
        "" => return QuizInput::Command(QuizCommand::SubmitGuess(None)),
        _ => {}
    }

    let picked = trimmed
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|index| candidates.get(index).cloned());
    let guess = picked.unwrap_or_else(|| FeatureId::new(trimmed));
    QuizInput::Command(QuizCommand::SubmitGuess(Some(guess)))
}

/// Resolve a menu answer: a 1-based index into `options` or a literal name.
#[must_use]
pub fn parse_menu_choice(line: &str, options: &[CategorySelection]) -> Option<CategorySelection> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Some(choice) = trimmed
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|index| options.get(index))
    {
        return Some(choice.clone());
    }
    trimmed.parse().ok()
}

pub fn describe_geometry(geometry: &Geometry) -> String {
    let anchor = geometry.label_anchor();
    match geometry {
        Geometry::Point(_) => format!("point at {:.2}, {:.2}", anchor.lat, anchor.lon),
        Geometry::Line(points) => format!(
            "line of {} points around {:.2}, {:.2}",
            points.len(),
            anchor.lat,
            anchor.lon
        ),
        Geometry::Polygon(points) => format!(
            "area with {} corners around {:.2}, {:.2}",
            points.len(),
            anchor.lat,
            anchor.lon
        ),
    }
}

fn join_or(items: &[FeatureId], empty: &str) -> String {
    if items.is_empty() {
        return empty.to_owned();
    }
    items
        .iter()
        .map(FeatureId::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn render_snapshot(out: &mut impl Write, snapshot: &SessionSnapshot) -> io::Result<()> {
    writeln!(out)?;
    if !snapshot.notice.is_none() {
        writeln!(out, "» {}", snapshot.notice)?;
    }
    if let Some(category) = &snapshot.category {
        writeln!(out, "Category: {category}")?;
    }
    writeln!(
        out,
        "Correct: {}  Wrong: {}  Time: {}",
        snapshot.correct_count, snapshot.wrong_count, snapshot.elapsed_label
    )?;
    writeln!(out, "Remaining: {}", join_or(&snapshot.remaining_list, "none"))?;
    writeln!(out, "Done: {}", join_or(&snapshot.done_list, "none yet"))?;

    if let Some(highlight) = &snapshot.highlight {
        writeln!(out, "Highlighted: {}", describe_geometry(highlight))?;
        writeln!(out, "Which feature is highlighted?")?;
        for (i, candidate) in snapshot.candidate_list.iter().enumerate() {
            writeln!(out, "  {:>2}) {candidate}", i + 1)?;
        }
    }
    Ok(())
}

pub fn render_menu(out: &mut impl Write, options: &[CategorySelection]) -> io::Result<()> {
    writeln!(out, "Choose a category:")?;
    for (i, option) in options.iter().enumerate() {
        writeln!(out, "  {:>2}) {option}", i + 1)?;
    }
    Ok(())
}

pub fn render_learning(out: &mut impl Write, overview: &LearningOverview) -> io::Result<()> {
    writeln!(out, "Learning: {}", overview.category)?;
    for feature in &overview.features {
        writeln!(
            out,
            "  {:<28} {}",
            feature.feature.as_str(),
            describe_geometry(&feature.geometry)
        )?;
    }
    writeln!(out, "{}", overview.list_label())
}

pub fn render_categories(out: &mut impl Write, categories: &[CategoryId]) -> io::Result<()> {
    for category in categories {
        writeln!(out, "{category}")?;
    }
    Ok(())
}

pub fn render_report(out: &mut impl Write, report: &ValidationReport) -> io::Result<()> {
    if report.findings.is_empty() {
        return writeln!(out, "catalog ok");
    }
    for finding in &report.findings {
        writeln!(out, "{}: {finding}", finding.severity())?;
    }
    writeln!(
        out,
        "{} error(s), {} warning(s)",
        report.errors().count(),
        report.warnings().count()
    )
}

/// Print `prompt` and read one line; `None` on end of input.
pub fn prompt_line(input: &mut impl BufRead, out: &mut impl Write, prompt: &str) -> io::Result<Option<String>> {
    write!(out, "{prompt}")?;
    out.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line))
}
