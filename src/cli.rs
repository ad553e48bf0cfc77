//! CLI interface for Pathway.
//!
//! Each subcommand is non-interactive: a course file and a student in,
//! plain text or JSON out. Learning states persist in the configured
//! database between invocations.
//!
//! The acting student comes from `--student`, `PATHWAY_STUDENT`, or the
//! config's `default-student`, in that order.

mod format;

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use jiff::Timestamp;
use rand::{SeedableRng, rngs::StdRng};
use serde::Serialize;

use pathway::config::Config;
use pathway::curriculum;
use pathway::engine::Engine;
use pathway::identity::resolve_student;
use pathway::model::{ConfidenceRating, Course, Question, StudentLearningState};
use pathway::progress::ProgressReport;
use pathway::quiz::{self, DiagnosticTag, Response};
use pathway::storage::{Storage, Stored};

use format::{
    format_attempt, format_next, format_progress, format_question, format_report,
    format_roadmap_step,
};

/// Pathway: adaptive progression through a course.
#[derive(Debug, Parser)]
#[command(name = "pathway", after_long_help = WORKFLOW_HELP)]
pub struct Cli {
    /// Student to act as. Falls back to `PATHWAY_STUDENT`, then the config.
    #[arg(long, global = true)]
    student: Option<String>,

    /// Database file. Falls back to the config, then `~/.pathway/pathway.sqlite`.
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

const WORKFLOW_HELP: &str = r#"Workflow: working through a course
  1. pathway check owasp.json
  2. pathway --student ada next --course owasp.json
     -> prints the topic to study (e.g. bac-1)
  3. pathway --student ada attempt --course owasp.json bac-1 --score 0.9 --rating 5
  4. pathway --student ada progress --course owasp.json

Quizzes:
  pathway pretest --course owasp.json --answers pretest.json
  pathway quiz --course owasp.json bac --answers pretest.json --limit 10
  pathway --student ada submit --course owasp.json bac-1 --answers answers.json

Answer files hold a JSON array of
  {"questionId": "q1", "selected": 0, "rating": 4}"#;

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Validate a course file and summarise it.
    ///
    /// Fails on an empty course, duplicate topic ids, or a prerequisite
    /// cycle. Dangling prerequisites and bad answer indices are warnings.
    Check {
        /// Course file (`.json` or `.toml`).
        course: PathBuf,
    },

    /// Print the topic the student should attempt next.
    Next {
        #[command(flatten)]
        course: CourseArg,

        /// Print JSON (`null` once the course is complete).
        #[arg(long)]
        json: bool,
    },

    /// Record a scored attempt and print the next topic.
    Attempt {
        #[command(flatten)]
        course: CourseArg,

        /// Topic the attempt was on.
        topic: String,

        /// Fraction of questions answered correctly, 0 to 1.
        #[arg(long, value_parser = parse_unit)]
        score: f64,

        #[command(flatten)]
        confidence: ConfidenceArg,
    },

    /// Print mastery, confidence, and trend for every topic.
    Progress {
        #[command(flatten)]
        course: CourseArg,

        /// Print JSON.
        #[arg(long)]
        json: bool,
    },

    /// Print the student's attempt log for a course, oldest first.
    History {
        #[command(flatten)]
        course: CourseArg,
    },

    /// Score quiz answers for a topic and record them as an attempt.
    ///
    /// Score is the fraction correct; confidence is the mean of the
    /// answers' ratings. Answers to unknown questions are skipped.
    Submit {
        #[command(flatten)]
        course: CourseArg,

        /// Topic the quiz was on.
        topic: String,

        /// JSON answer file.
        #[arg(long)]
        answers: PathBuf,
    },

    /// Classify pre-test answers and print the study roadmap.
    Pretest {
        #[command(flatten)]
        course: CourseArg,

        /// JSON answer file.
        #[arg(long)]
        answers: PathBuf,

        /// Print JSON.
        #[arg(long)]
        json: bool,
    },

    /// Draft a question set from a module's pool.
    ///
    /// Pre-test answers, if given, shift the difficulty mix: harder when
    /// mastery outweighs misconceptions, easier when misconceptions remain.
    Quiz {
        #[command(flatten)]
        course: CourseArg,

        /// Module id (or `module-<n>` for a module without one).
        module: String,

        /// Maximum number of questions.
        #[arg(long, default_value_t = 10)]
        limit: usize,

        /// Pre-test answer file used to pick the difficulty mix.
        #[arg(long)]
        answers: Option<PathBuf>,

        /// Seed for a reproducible draft.
        #[arg(long)]
        seed: Option<u64>,

        /// Print JSON.
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Args)]
pub struct CourseArg {
    /// Course file (`.json` or `.toml`).
    #[arg(long = "course")]
    path: PathBuf,
}

/// Self-reported confidence, on either scale.
#[derive(Debug, Args)]
#[group(required = true, multiple = false)]
pub struct ConfidenceArg {
    /// Confidence on the 0 to 1 scale.
    #[arg(long, value_parser = parse_unit)]
    confidence: Option<f64>,

    /// Confidence as a 1 to 5 rating.
    #[arg(long, value_parser = parse_rating)]
    rating: Option<ConfidenceRating>,
}

impl ConfidenceArg {
    fn to_unit(&self) -> f64 {
        match self.rating {
            Some(rating) => rating.to_unit(),
            None => self.confidence.unwrap_or_default(),
        }
    }
}

fn parse_unit(s: &str) -> Result<f64, String> {
    let value: f64 = s.parse().map_err(|e| format!("{s}: {e}"))?;
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(format!("{value} is not between 0 and 1"))
    }
}

fn parse_rating(s: &str) -> Result<ConfidenceRating, String> {
    let value: u8 = s.parse().map_err(|e| format!("{s}: {e}"))?;
    ConfidenceRating::new(value).map_err(|e| e.to_string())
}

/// Run the CLI, returning an error message on failure.
pub fn run(config: &Config) -> Result<(), String> {
    let cli = Cli::parse();
    let engine = config.engine();

    match &cli.command {
        Command::Check { course } => cmd_check(course),
        Command::Next { course, json } => {
            let session = Session::open(&cli, config, &course.path)?;
            cmd_next(&engine, &session, *json)
        }
        Command::Attempt {
            course,
            topic,
            score,
            confidence,
        } => {
            let session = Session::open(&cli, config, &course.path)?;
            cmd_attempt(&engine, &session, topic, *score, confidence.to_unit())
        }
        Command::Progress { course, json } => {
            let session = Session::open(&cli, config, &course.path)?;
            cmd_progress(&engine, &session, *json)
        }
        Command::History { course } => {
            let session = Session::open(&cli, config, &course.path)?;
            cmd_history(&session)
        }
        Command::Submit {
            course,
            topic,
            answers,
        } => {
            let session = Session::open(&cli, config, &course.path)?;
            cmd_submit(&engine, &session, topic, answers)
        }
        Command::Pretest {
            course,
            answers,
            json,
        } => cmd_pretest(&course.path, answers, *json),
        Command::Quiz {
            course,
            module,
            limit,
            answers,
            seed,
            json,
        } => cmd_quiz(
            &course.path,
            module,
            *limit,
            answers.as_deref(),
            *seed,
            *json,
        ),
    }
}

/// Everything a per-student command needs: who, which course, and where
/// their state lives.
struct Session {
    student: String,
    course: Course,
    storage: Storage,
}

impl Session {
    fn open(cli: &Cli, config: &Config, course: &Path) -> Result<Self, String> {
        let student = resolve_student(cli.student.as_deref(), config)?;
        let course = curriculum::load(course).map_err(|e| e.to_string())?;
        let storage = open_storage(cli.db.as_deref(), config)?;
        Ok(Self {
            student,
            course,
            storage,
        })
    }

    /// The stored state, if the student has attempted anything in the course.
    fn stored(&self) -> Result<Option<Stored>, String> {
        self.storage
            .find_state(&self.student, &self.course.id)
            .map_err(|e| format!("failed to load learning state: {e}"))
    }

    /// The stored state, or a fresh one for a student who hasn't started.
    fn state(&self) -> Result<StudentLearningState, String> {
        Ok(match self.stored()? {
            Some(stored) => stored.state,
            None => StudentLearningState::new(&self.student, &self.course.id, Timestamp::now()),
        })
    }
}

/// Opens the database at `--db`, else the configured path, else the default.
fn open_storage(explicit: Option<&Path>, config: &Config) -> Result<Storage, String> {
    let path = explicit
        .map(Path::to_path_buf)
        .or_else(|| config.database.clone())
        .or_else(Storage::default_path)
        .ok_or("could not determine home directory")?;

    Storage::open(&path).map_err(|e| format!("failed to open {}: {e}", path.display()))
}

/// Reads a JSON array of quiz answers.
fn read_answers(path: &Path) -> Result<Vec<Response>, String> {
    let contents =
        fs::read_to_string(path).map_err(|e| format!("failed to read {}: {e}", path.display()))?;
    serde_json::from_str(&contents)
        .map_err(|e| format!("invalid answers in {}: {e}", path.display()))
}

fn question_pool(course: &Course) -> Vec<Question> {
    course.questions().cloned().collect()
}

fn print_json(value: &impl Serialize) -> Result<(), String> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| format!("failed to serialize output: {e}"))?;
    println!("{json}");
    Ok(())
}

fn cmd_check(path: &Path) -> Result<(), String> {
    let course = curriculum::read(path).map_err(|e| e.to_string())?;
    let report = curriculum::validate(&course).map_err(|e| e.to_string())?;

    println!("{}", format_report(&course, &report));
    Ok(())
}

fn cmd_next(engine: &Engine, session: &Session, json: bool) -> Result<(), String> {
    let state = session.state()?;
    let next = engine.select_next_topic(&state, &session.course);

    if json {
        return print_json(&next);
    }
    match next {
        Some(next) => println!("{}", format_next(&next)),
        None => println!("Course complete: every topic mastered"),
    }
    Ok(())
}

fn cmd_attempt(
    engine: &Engine,
    session: &Session,
    topic_id: &str,
    score: f64,
    confidence: f64,
) -> Result<(), String> {
    if session.course.topic(topic_id).is_none() {
        return Err(format!(
            "unknown topic {topic_id} in course {}",
            session.course.id
        ));
    }

    let stored = session.stored()?;
    let state = match &stored {
        Some(stored) => stored.state.clone(),
        None => StudentLearningState::new(&session.student, &session.course.id, Timestamp::now()),
    };

    let now = Timestamp::now();
    let mut state = engine.record_attempt(&state, topic_id, confidence, score, now);
    state.last_active = now;

    let saved = match stored {
        Some(stored) => session.storage.save_state(&state, stored.revision),
        None => session.storage.create_state(&state),
    };
    saved.map_err(|e| format!("failed to save learning state: {e}"))?;

    let mastered = state.is_mastered(topic_id);
    eprintln!(
        "Recorded {topic_id}: score {score:.2}, confidence {confidence:.2} ({})",
        if mastered { "mastered" } else { "not mastered" }
    );

    match engine.select_next_topic(&state, &session.course) {
        Some(next) => println!("{}", format_next(&next)),
        None => println!("Course complete: every topic mastered"),
    }
    Ok(())
}

fn cmd_progress(engine: &Engine, session: &Session, json: bool) -> Result<(), String> {
    let state = session.state()?;
    let report = ProgressReport::build(engine, &state, &session.course);

    if json {
        return print_json(&report);
    }
    println!("{}", format_progress(&report));
    Ok(())
}

fn cmd_history(session: &Session) -> Result<(), String> {
    let attempts = session
        .storage
        .load_attempts(&session.student, &session.course.id)
        .map_err(|e| format!("failed to load attempts: {e}"))?;

    if attempts.is_empty() {
        println!("No attempts");
        return Ok(());
    }

    for attempt in &attempts {
        println!("{}", format_attempt(attempt));
    }
    Ok(())
}

fn cmd_submit(
    engine: &Engine,
    session: &Session,
    topic_id: &str,
    answers: &Path,
) -> Result<(), String> {
    let responses = read_answers(answers)?;
    let outcome = quiz::score(&question_pool(&session.course), &responses)
        .ok_or("no answer matched a question in the course")?;

    eprintln!("Scored {} answer(s)", outcome.answered);
    cmd_attempt(engine, session, topic_id, outcome.score, outcome.confidence)
}

fn cmd_pretest(course: &Path, answers: &Path, json: bool) -> Result<(), String> {
    let course = curriculum::load(course).map_err(|e| e.to_string())?;
    let responses = read_answers(answers)?;
    let diagnoses = quiz::diagnose(&question_pool(&course), &responses);
    let steps = quiz::roadmap(&diagnoses);

    if json {
        return print_json(&steps);
    }
    if steps.is_empty() {
        println!("No answer matched a question in the course");
        return Ok(());
    }
    for step in &steps {
        println!("{}", format_roadmap_step(step));
    }
    Ok(())
}

fn cmd_quiz(
    course: &Path,
    module: &str,
    limit: usize,
    answers: Option<&Path>,
    seed: Option<u64>,
    json: bool,
) -> Result<(), String> {
    let course = curriculum::load(course).map_err(|e| e.to_string())?;
    let Some(pool) = course
        .modules
        .iter()
        .enumerate()
        .find(|(i, m)| m.topic_id(*i) == module)
        .map(|(_, m)| &m.mcqs)
    else {
        return Err(format!("unknown module {module} in course {}", course.id));
    };

    let tags: Vec<DiagnosticTag> = match answers {
        Some(path) => quiz::diagnose(&question_pool(&course), &read_answers(path)?)
            .into_iter()
            .map(|d| d.tag)
            .collect(),
        None => Vec::new(),
    };

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let questions = quiz::draft(pool, &tags, limit, &mut rng);

    if json {
        return print_json(&questions);
    }
    if questions.is_empty() {
        println!("No questions in module {module}");
        return Ok(());
    }
    for (i, question) in questions.iter().enumerate() {
        println!("{}", format_question(i + 1, question));
    }
    Ok(())
}
