//! Output formatting for CLI display.

use std::fmt::Write;

use pathway::curriculum::CourseReport;
use pathway::engine::{ConfidenceTier, NextTopic, Reason};
use pathway::model::{Attempt, Course, Question};
use pathway::progress::{ProgressReport, TopicProgress};
use pathway::quiz::{RoadmapAction, RoadmapStep};

/// Summary of a validated course, with one line per warning.
pub(super) fn format_report(course: &Course, report: &CourseReport) -> String {
    let mut out = format!(
        "{} ({}): {} module(s), {} topic(s), {} question(s)",
        course.title, report.course_id, report.modules, report.topics, report.questions
    );
    for warning in &report.warnings {
        let _ = write!(out, "\nwarning: {warning}");
    }
    out
}

/// The next topic, with why it was picked.
pub(super) fn format_next(next: &NextTopic<'_>) -> String {
    let mut out = format!("{}  {}", next.topic.id, next.topic.title);
    match &next.reason {
        Reason::Eligible => {}
        Reason::Prerequisite { of } => {
            let _ = write!(out, "  (prerequisite of {of})");
        }
        Reason::Fallback => out.push_str("  (no eligible topic; first unmastered)"),
    }
    if next.remedial {
        out.push_str("  [remedial]");
    }
    out
}

/// One line per topic, preceded by the completion summary and followed by
/// the topics whose confidence sits below the reinforce threshold.
pub(super) fn format_progress(report: &ProgressReport<'_>) -> String {
    let mut out = format!(
        "{}: {}/{} topics mastered ({}%)",
        report.course_id, report.mastered_topics, report.total_topics, report.percent
    );
    for topic in &report.topics {
        let _ = write!(out, "\n{}", format_topic_row(topic));
    }
    let practice: Vec<&str> = report
        .needs_practice()
        .map(|t| t.topic_id.as_str())
        .collect();
    if !practice.is_empty() {
        let _ = write!(out, "\npractice: {}", practice.join(", "));
    }
    if let Some(next) = &report.next {
        let _ = write!(out, "\nnext: {}", format_next(next));
    }
    out
}

fn format_topic_row(topic: &TopicProgress) -> String {
    let mark = match topic.mastered {
        Some(true) => "x",
        Some(false) => "~",
        None => " ",
    };
    let confidence = topic
        .confidence
        .map_or_else(|| "-".to_string(), |c| format!("{c:.2}"));
    let tier = topic.tier.map_or("", tier_label);
    let trend = topic
        .trend
        .iter()
        .map(|c| format!("{c:.2}"))
        .collect::<Vec<_>>()
        .join(" ");

    format!(
        "[{mark}] {:<20} {confidence:>5} {tier:<9} attempts {}  {trend}",
        topic.topic_id, topic.attempts
    )
    .trim_end()
    .to_string()
}

fn tier_label(tier: ConfidenceTier) -> &'static str {
    match tier {
        ConfidenceTier::Advance => "advance",
        ConfidenceTier::OnTrack => "on track",
        ConfidenceTier::Reinforce => "reinforce",
        ConfidenceTier::Backtrack => "backtrack",
    }
}

/// A numbered question with lettered options. The answer is not shown.
pub(super) fn format_question(number: usize, question: &Question) -> String {
    let mut out = format!("{number}. [{}] {}", question.id, question.question);
    for (letter, option) in ('a'..='z').zip(&question.options) {
        let _ = write!(out, "\n   {letter}) {option}");
    }
    out
}

pub(super) fn format_roadmap_step(step: &RoadmapStep) -> String {
    let action = match step.action {
        RoadmapAction::FastTrack => "fast-track",
        RoadmapAction::DeepDive => "deep-dive",
        RoadmapAction::Reinforce => "reinforce",
        RoadmapAction::Standard => "standard",
    };
    if step.reason.is_empty() {
        format!("{:<20} {action}", step.topic_id)
    } else {
        format!("{:<20} {action:<10} {}", step.topic_id, step.reason)
    }
}

pub(super) fn format_attempt(attempt: &Attempt) -> String {
    format!(
        "{}  {}  score {:.2}  confidence {:.2}",
        attempt.timestamp, attempt.topic_id, attempt.score, attempt.confidence
    )
}
