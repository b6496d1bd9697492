use std::collections::HashSet;

use serde::Serialize;

use crate::model::ids::QuestionId;

/// Ordered set of question ids chosen for a session.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionSelection {
    question_ids: Vec<QuestionId>,
    total_questions: usize,
}

impl QuestionSelection {
    /// Builds a selection, keeping the first occurrence of any repeated id.
    #[must_use]
    pub fn new(ids: impl IntoIterator<Item = QuestionId>) -> Self {
        let mut seen = HashSet::new();
        let question_ids: Vec<QuestionId> = ids
            .into_iter()
            .filter(|id| seen.insert(id.clone()))
            .collect();
        let total_questions = question_ids.len();
        Self {
            question_ids,
            total_questions,
        }
    }

    #[must_use]
    pub fn question_ids(&self) -> &[QuestionId] {
        &self.question_ids
    }

    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.total_questions
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.question_ids.is_empty()
    }

    #[must_use]
    pub fn into_ids(self) -> Vec<QuestionId> {
        self.question_ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicates_collapse_and_total_tracks_len() {
        let selection = QuestionSelection::new(
            ["q2", "q1", "q2", "q3"].into_iter().map(QuestionId::new),
        );
        let ids: Vec<_> = selection.question_ids().iter().map(QuestionId::as_str).collect();
        assert_eq!(ids, vec!["q2", "q1", "q3"]);
        assert_eq!(selection.total_questions(), 3);
    }

    #[test]
    fn serializes_camel_case() {
        let selection = QuestionSelection::new([QuestionId::new("q1")]);
        let value = serde_json::to_value(&selection).unwrap();
        assert_eq!(value["questionIds"][0], "q1");
        assert_eq!(value["totalQuestions"], 1);
    }
}
