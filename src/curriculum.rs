//! Course files: parsing and graph integrity checks.
//!
//! Courses arrive as JSON (the shape the authoring pipeline emits) or TOML.
//! Validation runs once at load time so the selection policy can assume a
//! well-formed graph:
//!
//! - duplicate topic ids and prerequisite cycles are errors;
//! - dangling prerequisite ids are warnings, since selection skips them.

use std::{
    borrow::Cow,
    collections::{HashMap, HashSet},
    fmt, fs,
    path::{Path, PathBuf},
};

use tracing::{info, warn};

use crate::model::{Course, Topic};

/// Errors that can occur while loading or validating a course.
#[derive(Debug, thiserror::Error)]
pub enum CurriculumError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid course JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("invalid course TOML in {path}: {source}")]
    Toml {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("unsupported course file {0}: expected .json or .toml")]
    UnsupportedFormat(PathBuf),

    #[error("course {0} has no topics")]
    Empty(String),

    #[error("duplicate topic id: {0}")]
    DuplicateTopic(String),

    #[error("prerequisite cycle: {}", .0.join(" -> "))]
    Cycle(Vec<String>),
}

pub type Result<T> = core::result::Result<T, CurriculumError>;

/// Something odd about a course that does not stop it from being used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CourseWarning {
    /// A prerequisite id that names no topic in the course.
    DanglingPrerequisite { topic: String, prerequisite: String },

    /// A question whose correct index points past its options.
    AnswerOutOfRange {
        question: String,
        correct_index: usize,
        options: usize,
    },
}

impl fmt::Display for CourseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DanglingPrerequisite {
                topic,
                prerequisite,
            } => write!(f, "topic {topic} requires unknown topic {prerequisite}"),
            Self::AnswerOutOfRange {
                question,
                correct_index,
                options,
            } => write!(
                f,
                "question {question} marks option {correct_index} correct but has {options} options"
            ),
        }
    }
}

/// Summary of a validated course.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseReport {
    pub course_id: String,
    pub modules: usize,
    pub topics: usize,
    pub questions: usize,
    pub warnings: Vec<CourseWarning>,
}

/// Parses a course file without validating it.
pub fn read(path: &Path) -> Result<Course> {
    let io_err = |source| CurriculumError::Io {
        path: path.to_path_buf(),
        source,
    };

    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => {
            let contents = fs::read_to_string(path).map_err(io_err)?;
            serde_json::from_str(&contents).map_err(|source| CurriculumError::Json {
                path: path.to_path_buf(),
                source,
            })
        }
        Some("toml") => {
            let contents = fs::read_to_string(path).map_err(io_err)?;
            toml::from_str(&contents).map_err(|source| CurriculumError::Toml {
                path: path.to_path_buf(),
                source,
            })
        }
        _ => Err(CurriculumError::UnsupportedFormat(path.to_path_buf())),
    }
}

/// Parses and validates a course file. Warnings are logged.
pub fn load(path: &Path) -> Result<Course> {
    let course = read(path)?;
    let report = validate(&course)?;
    for warning in &report.warnings {
        warn!(course = %course.id, "{warning}");
    }
    info!(
        course = %course.id,
        topics = report.topics,
        path = %path.display(),
        "loaded course"
    );
    Ok(course)
}

/// Checks graph integrity and collects warnings.
pub fn validate(course: &Course) -> Result<CourseReport> {
    let topics = course.topics();
    if topics.is_empty() {
        return Err(CurriculumError::Empty(course.id.clone()));
    }

    let mut seen = HashSet::new();
    for topic in &topics {
        if !seen.insert(topic.id.as_str()) {
            return Err(CurriculumError::DuplicateTopic(topic.id.clone()));
        }
    }

    if let Some(cycle) = find_cycle(&topics) {
        return Err(CurriculumError::Cycle(cycle));
    }

    let mut warnings: Vec<CourseWarning> = topics
        .iter()
        .flat_map(|t| {
            t.prerequisites
                .iter()
                .filter(|p| !seen.contains(p.as_str()))
                .map(|p| CourseWarning::DanglingPrerequisite {
                    topic: t.id.clone(),
                    prerequisite: p.clone(),
                })
        })
        .collect();

    warnings.extend(
        course
            .questions()
            .filter(|q| q.correct_index >= q.options.len())
            .map(|q| CourseWarning::AnswerOutOfRange {
                question: q.id.clone(),
                correct_index: q.correct_index,
                options: q.options.len(),
            }),
    );

    Ok(CourseReport {
        course_id: course.id.clone(),
        modules: course.modules.len(),
        topics: topics.len(),
        questions: course.questions().count(),
        warnings,
    })
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    OnPath,
    Done,
}

/// Finds one prerequisite cycle, returned as the ids along it with the
/// first id repeated at the end. Dangling ids are ignored.
///
/// Depth-first with an explicit stack, so chain length is bounded by memory
/// rather than the call stack.
fn find_cycle(topics: &[Cow<'_, Topic>]) -> Option<Vec<String>> {
    let index: HashMap<&str, usize> = topics
        .iter()
        .enumerate()
        .map(|(i, t)| (t.id.as_str(), i))
        .collect();
    let mut marks = vec![Mark::Unvisited; topics.len()];

    for start in 0..topics.len() {
        if marks[start] != Mark::Unvisited {
            continue;
        }

        // The current path: each node with the next prerequisite to follow.
        let mut path: Vec<(usize, usize)> = vec![(start, 0)];
        marks[start] = Mark::OnPath;

        while let Some(frame) = path.last_mut() {
            let (node, cursor) = *frame;
            let Some(prerequisite) = topics[node].prerequisites.get(cursor) else {
                marks[node] = Mark::Done;
                path.pop();
                continue;
            };
            frame.1 += 1;

            let Some(&next) = index.get(prerequisite.as_str()) else {
                continue;
            };
            match marks[next] {
                Mark::OnPath => {
                    let from = path.iter().position(|&(n, _)| n == next).unwrap_or_default();
                    let mut cycle: Vec<String> =
                        path[from..].iter().map(|&(n, _)| topics[n].id.clone()).collect();
                    cycle.push(topics[next].id.clone());
                    return Some(cycle);
                }
                Mark::Unvisited => {
                    marks[next] = Mark::OnPath;
                    path.push((next, 0));
                }
                Mark::Done => {}
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    use tempfile::TempDir;

    use crate::model::{Difficulty, Module, Question};

    fn topic(id: &str, prerequisites: &[&str]) -> Topic {
        Topic {
            id: id.into(),
            title: id.into(),
            description: String::new(),
            content: String::new(),
            prerequisites: prerequisites.iter().map(|p| (*p).to_string()).collect(),
            estimated_time: 10,
        }
    }

    fn course(topics: Vec<Topic>) -> Course {
        Course {
            id: "c1".into(),
            title: "Course".into(),
            description: String::new(),
            modules: vec![Module {
                id: "m1".into(),
                title: "Module".into(),
                topics,
                mcqs: vec![],
                theory: None,
            }],
        }
    }

    #[test]
    fn accepts_a_dag() {
        let report = validate(&course(vec![
            topic("a", &[]),
            topic("b", &["a"]),
            topic("c", &["a", "b"]),
        ]))
        .unwrap();

        assert_eq!(report.topics, 3);
        assert_eq!(report.modules, 1);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn rejects_empty_course() {
        let mut empty = course(vec![]);
        empty.modules.clear();
        assert!(matches!(validate(&empty), Err(CurriculumError::Empty(_))));
    }

    #[test]
    fn rejects_duplicate_ids() {
        let err = validate(&course(vec![topic("a", &[]), topic("a", &[])])).unwrap_err();
        assert!(matches!(err, CurriculumError::DuplicateTopic(id) if id == "a"));
    }

    #[test]
    fn reports_cycle_path() {
        let err = validate(&course(vec![
            topic("a", &["c"]),
            topic("b", &["a"]),
            topic("c", &["b"]),
        ]))
        .unwrap_err();

        assert_eq!(err.to_string(), "prerequisite cycle: a -> c -> b -> a");
    }

    #[test]
    fn validates_long_prerequisite_chain() {
        // Each topic requires the next, so the search runs the full depth.
        const LEN: usize = 200_000;
        let ids: Vec<String> = (0..LEN).map(|i| format!("t{i}")).collect();
        let topics = (0..LEN)
            .map(|i| Topic {
                id: ids[i].clone(),
                title: ids[i].clone(),
                description: String::new(),
                content: String::new(),
                prerequisites: ids.get(i + 1).cloned().into_iter().collect(),
                estimated_time: 10,
            })
            .collect();

        let report = validate(&course(topics)).unwrap();
        assert_eq!(report.topics, LEN);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn self_dependency_is_a_cycle() {
        let err = validate(&course(vec![topic("a", &["a"])])).unwrap_err();
        assert!(matches!(err, CurriculumError::Cycle(path) if path == ["a", "a"]));
    }

    #[test]
    fn dangling_prerequisite_is_a_warning() {
        let report = validate(&course(vec![topic("a", &["ghost"])])).unwrap();
        assert_eq!(
            report.warnings,
            [CourseWarning::DanglingPrerequisite {
                topic: "a".into(),
                prerequisite: "ghost".into(),
            }]
        );
    }

    #[test]
    fn flags_out_of_range_answers() {
        let mut c = course(vec![topic("a", &[])]);
        c.modules[0].mcqs.push(Question {
            id: "q1".into(),
            question: "?".into(),
            options: vec!["x".into(), "y".into()],
            correct_index: 2,
            difficulty: Difficulty::Basic,
            explanation: String::new(),
            topic_id: None,
        });

        let report = validate(&c).unwrap();
        assert_eq!(report.questions, 1);
        assert_eq!(
            report.warnings[0].to_string(),
            "question q1 marks option 2 correct but has 2 options"
        );
    }

    #[test]
    fn loads_json_and_toml_files() {
        let dir = TempDir::new().unwrap();

        let json_path = dir.path().join("course.json");
        fs::write(
            &json_path,
            r#"{"id": "j", "title": "J", "modules": [{"id": "m", "title": "M",
                "topics": [{"id": "a", "title": "A"}]}]}"#,
        )
        .unwrap();
        assert_eq!(load(&json_path).unwrap().id, "j");

        let toml_path = dir.path().join("course.toml");
        fs::write(
            &toml_path,
            r#"
id = "t"
title = "T"

[[modules]]
id = "m"
title = "M"

[[modules.topics]]
id = "a"
title = "A"

[[modules.topics]]
id = "b"
title = "B"
prerequisites = ["a"]
"#,
        )
        .unwrap();
        let course = load(&toml_path).unwrap();
        assert_eq!(course.modules[0].topics[1].prerequisites, ["a"]);
    }

    #[test]
    fn rejects_unknown_extension() {
        let err = read(Path::new("course.yaml")).unwrap_err();
        assert!(matches!(err, CurriculumError::UnsupportedFormat(_)));
    }
}
