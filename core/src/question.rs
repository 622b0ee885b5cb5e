use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::{GameError, Result};

/// One prompt/answer pair from the question bank.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    #[serde(rename = "question")]
    pub prompt: String,
    pub answer: String,
}

/// Question bank keyed first by category, then by lesson.
///
/// The document is fetched and parsed once at quiz start and never mutated
/// during play.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionBank {
    categories: BTreeMap<String, BTreeMap<String, Vec<Question>>>,
}

impl QuestionBank {
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|err| GameError::LoadFailure(err.to_string()))
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.categories.keys().map(String::as_str)
    }

    pub fn lessons(&self, category: &str) -> impl Iterator<Item = &str> {
        self.categories
            .get(category)
            .into_iter()
            .flat_map(|lessons| lessons.keys().map(String::as_str))
    }

    /// The question list for one category/lesson path.
    pub fn select(&self, category: &str, lesson: &str) -> Result<&[Question]> {
        let questions = self
            .categories
            .get(category)
            .and_then(|lessons| lessons.get(lesson))
            .ok_or(GameError::InvalidSelection)?;

        if questions.is_empty() {
            return Err(GameError::InvalidSelection);
        }

        Ok(questions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BANK: &str = r#"{
        "animals": {
            "pets": [
                {"question": "A small feline", "answer": "cat"},
                {"question": "Man's best friend", "answer": "dog"}
            ],
            "wild": []
        }
    }"#;

    #[test]
    fn select_returns_the_lesson_questions() {
        let bank = QuestionBank::from_json(BANK).unwrap();

        let questions = bank.select("animals", "pets").unwrap();

        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].prompt, "A small feline");
        assert_eq!(questions[0].answer, "cat");
    }

    #[test]
    fn missing_or_empty_paths_are_invalid_selections() {
        let bank = QuestionBank::from_json(BANK).unwrap();

        assert_eq!(
            bank.select("animals", "wild"),
            Err(GameError::InvalidSelection)
        );
        assert_eq!(
            bank.select("animals", "birds"),
            Err(GameError::InvalidSelection)
        );
        assert_eq!(
            bank.select("plants", "pets"),
            Err(GameError::InvalidSelection)
        );
    }

    #[test]
    fn malformed_document_is_a_load_failure() {
        assert!(matches!(
            QuestionBank::from_json("not json"),
            Err(GameError::LoadFailure(_))
        ));
    }

    #[test]
    fn category_and_lesson_listings_are_sorted() {
        let bank = QuestionBank::from_json(BANK).unwrap();

        assert_eq!(bank.categories().collect::<Vec<_>>(), ["animals"]);
        assert_eq!(bank.lessons("animals").collect::<Vec<_>>(), ["pets", "wild"]);
        assert_eq!(bank.lessons("plants").count(), 0);
    }
}
