//! Course graph types: topics grouped into modules.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use super::question::Question;

/// Estimated minutes assigned to a module presented as a single topic.
const SYNTHETIC_TOPIC_MINUTES: u32 = 45;

/// Characters of module theory kept as the synthetic topic's description.
const SYNTHETIC_DESCRIPTION_CHARS: usize = 200;

/// An atomic unit of content.
///
/// Prerequisites are declared topic-to-topic by id, independent of which
/// module either topic lives in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Topic {
    pub id: String,

    pub title: String,

    #[serde(default)]
    pub description: String,

    /// Markdown or HTML body.
    #[serde(default)]
    pub content: String,

    /// Topic ids that must be mastered first, in declared order.
    #[serde(default)]
    pub prerequisites: Vec<String>,

    /// Estimated time to work through the topic, in minutes.
    #[serde(default)]
    pub estimated_time: u32,
}

/// A named group of topics plus its assessment pool.
///
/// A module is a namespace, not a prerequisite boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Module {
    #[serde(default)]
    pub id: String,

    pub title: String,

    #[serde(default)]
    pub topics: Vec<Topic>,

    #[serde(default)]
    pub mcqs: Vec<Question>,

    /// Module-level theory body.
    ///
    /// Generated courses carry theory per module and no topics.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theory: Option<String>,
}

/// An ordered collection of modules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: String,

    pub title: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub modules: Vec<Module>,
}

impl Course {
    /// Flattens the course into its topic sequence: module order, then
    /// in-module order.
    ///
    /// When no module declares any topic, each module stands in as one
    /// topic that depends on the module before it.
    #[must_use]
    pub fn topics(&self) -> Vec<Cow<'_, Topic>> {
        if self.modules.iter().any(|m| !m.topics.is_empty()) {
            return self
                .modules
                .iter()
                .flat_map(|m| m.topics.iter().map(Cow::Borrowed))
                .collect();
        }

        let mut previous: Option<String> = None;
        self.modules
            .iter()
            .enumerate()
            .map(|(index, module)| {
                let topic = module.as_topic(index, previous.take());
                previous = Some(topic.id.clone());
                Cow::Owned(topic)
            })
            .collect()
    }

    /// Looks up a topic by id in the flattened sequence.
    ///
    /// The first match in flattened order wins.
    #[must_use]
    pub fn topic(&self, id: &str) -> Option<Cow<'_, Topic>> {
        self.topics().into_iter().find(|t| t.id == id)
    }

    /// Every question across all modules, in module order.
    pub fn questions(&self) -> impl Iterator<Item = &Question> {
        self.modules.iter().flat_map(|m| m.mcqs.iter())
    }
}

impl Module {
    /// Identifier used when the module is presented as a topic.
    #[must_use]
    pub fn topic_id(&self, index: usize) -> String {
        if self.id.is_empty() {
            format!("module-{index}")
        } else {
            self.id.clone()
        }
    }

    fn as_topic(&self, index: usize, previous: Option<String>) -> Topic {
        let theory = self.theory.clone().unwrap_or_default();
        Topic {
            id: self.topic_id(index),
            title: self.title.clone(),
            description: theory.chars().take(SYNTHETIC_DESCRIPTION_CHARS).collect(),
            content: theory,
            prerequisites: previous.into_iter().collect(),
            estimated_time: SYNTHETIC_TOPIC_MINUTES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn topic(id: &str, prerequisites: &[&str]) -> Topic {
        Topic {
            id: id.into(),
            title: id.to_uppercase(),
            description: String::new(),
            content: String::new(),
            prerequisites: prerequisites.iter().map(|p| (*p).to_string()).collect(),
            estimated_time: 10,
        }
    }

    fn module(id: &str, topics: Vec<Topic>) -> Module {
        Module {
            id: id.into(),
            title: format!("Module {id}"),
            topics,
            mcqs: vec![],
            theory: None,
        }
    }

    #[test]
    fn flattens_in_module_then_topic_order() {
        let course = Course {
            id: "c".into(),
            title: "Course".into(),
            description: String::new(),
            modules: vec![
                module("m1", vec![topic("a", &[]), topic("b", &["a"])]),
                module("m2", vec![]),
                module("m3", vec![topic("c", &[])]),
            ],
        };

        let ids: Vec<_> = course.topics().iter().map(|t| t.id.clone()).collect();
        assert_eq!(ids, ["a", "b", "c"]);
    }

    #[test]
    fn modules_without_topics_become_a_chain() {
        let mut first = module("intro", vec![]);
        first.theory = Some("x".repeat(300));
        let course = Course {
            id: "c".into(),
            title: "Generated".into(),
            description: String::new(),
            modules: vec![first, module("", vec![]), module("wrap-up", vec![])],
        };

        let topics = course.topics();
        assert_eq!(topics.len(), 3);

        assert_eq!(topics[0].id, "intro");
        assert!(topics[0].prerequisites.is_empty());
        assert_eq!(topics[0].description.len(), 200);
        assert_eq!(topics[0].content.len(), 300);
        assert_eq!(topics[0].estimated_time, 45);

        assert_eq!(topics[1].id, "module-1");
        assert_eq!(topics[1].prerequisites, ["intro"]);

        assert_eq!(topics[2].prerequisites, ["module-1"]);
    }

    #[test]
    fn topic_lookup_prefers_first_match() {
        let mut duplicate = topic("a", &[]);
        duplicate.title = "Second".into();
        let course = Course {
            id: "c".into(),
            title: "Course".into(),
            description: String::new(),
            modules: vec![module("m1", vec![topic("a", &[]), duplicate])],
        };

        assert_eq!(course.topic("a").unwrap().title, "A");
        assert!(course.topic("missing").is_none());
    }

    #[test]
    fn parses_camel_case_course_json() {
        let json = r#"{
            "id": "owasp-top-10",
            "title": "OWASP Top 10",
            "modules": [{
                "id": "m1",
                "title": "Broken Access Control",
                "topics": [
                    {"id": "bac-1", "title": "Intro", "prerequisites": [], "estimatedTime": 15},
                    {"id": "bac-2", "title": "IDOR", "prerequisites": ["bac-1"], "estimatedTime": 20}
                ],
                "mcqs": [{
                    "id": "mcq-1",
                    "question": "What causes IDOR?",
                    "options": ["Encryption", "Missing authorization"],
                    "correctIndex": 1,
                    "difficulty": "basic",
                    "explanation": "Authorization is missing."
                }]
            }]
        }"#;

        let course: Course = serde_json::from_str(json).unwrap();
        assert_eq!(course.modules[0].topics[1].prerequisites, ["bac-1"]);
        assert_eq!(course.modules[0].topics[1].estimated_time, 20);
        assert_eq!(course.questions().count(), 1);
    }
}
