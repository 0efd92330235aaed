use std::collections::BTreeSet;

use thiserror::Error;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question prompt cannot be empty")]
    EmptyPrompt,

    #[error("question answer cannot be empty")]
    EmptyAnswer,
}

//
// ─── NORMALIZATION ─────────────────────────────────────────────────────────────
//

/// Canonical form used for every answer comparison: trimmed and lower-cased.
///
/// No punctuation or whitespace folding happens inside the text.
#[must_use]
pub fn normalize_answer(raw: &str) -> String {
    raw.trim().to_lowercase()
}

//
// ─── QUESTION RECORD ───────────────────────────────────────────────────────────
//

/// A single question with its canonical answer and accepted variants.
///
/// `accepted` always contains the normalized canonical answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionRecord {
    prompt: String,
    display_answer: String,
    accepted: BTreeSet<String>,
}

impl QuestionRecord {
    /// Build a question from its prompt, canonical answer and optional synonyms.
    ///
    /// Blank alternates are ignored.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if the prompt or canonical answer is blank.
    pub fn new<I, S>(
        prompt: impl Into<String>,
        display_answer: impl Into<String>,
        alternates: I,
    ) -> Result<Self, QuestionError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let prompt = prompt.into().trim().to_string();
        if prompt.is_empty() {
            return Err(QuestionError::EmptyPrompt);
        }
        let display_answer = display_answer.into().trim().to_string();
        if display_answer.is_empty() {
            return Err(QuestionError::EmptyAnswer);
        }

        let mut accepted = BTreeSet::new();
        accepted.insert(normalize_answer(&display_answer));
        accepted.extend(
            alternates
                .into_iter()
                .map(|alt| normalize_answer(alt.as_ref()))
                .filter(|alt| !alt.is_empty()),
        );

        Ok(Self {
            prompt,
            display_answer,
            accepted,
        })
    }

    /// Same as [`QuestionRecord::new`] but takes the comma-separated alternates
    /// cell used by question sources.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if the prompt or canonical answer is blank.
    pub fn with_alternates_list(
        prompt: impl Into<String>,
        display_answer: impl Into<String>,
        alternates: Option<&str>,
    ) -> Result<Self, QuestionError> {
        let alternates = alternates.map(|cell| cell.split(',')).into_iter().flatten();
        Self::new(prompt, display_answer, alternates)
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Answer shown to the user after a wrong submission.
    #[must_use]
    pub fn display_answer(&self) -> &str {
        &self.display_answer
    }

    #[must_use]
    pub fn accepted_answers(&self) -> &BTreeSet<String> {
        &self.accepted
    }

    /// Exact membership test after normalizing `user_text`.
    #[must_use]
    pub fn accepts(&self, user_text: &str) -> bool {
        self.accepted.contains(&normalize_answer(user_text))
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_answer_is_always_accepted() {
        let q = QuestionRecord::new("Best picture 1998?", "Titanic", Vec::<&str>::new()).unwrap();
        assert!(q.accepted_answers().contains("titanic"));
        assert_eq!(q.display_answer(), "Titanic");
    }

    #[test]
    fn matching_ignores_case_and_padding() {
        let q = QuestionRecord::new("Best picture 1998?", "Titanic", Vec::<&str>::new()).unwrap();
        assert!(q.accepts("Titanic"));
        assert!(q.accepts(" Titanic "));
        assert!(q.accepts("TITANIC"));
        assert!(!q.accepts("Titanic!"));
        assert!(!q.accepts("titan"));
    }

    #[test]
    fn alternates_are_split_and_normalized() {
        let q = QuestionRecord::with_alternates_list(
            "Director of Alien?",
            "Ridley Scott",
            Some(" Scott ,  , R. Scott"),
        )
        .unwrap();

        let accepted: Vec<_> = q.accepted_answers().iter().cloned().collect();
        assert_eq!(accepted, vec!["r. scott", "ridley scott", "scott"]);
        assert!(q.accepts("scott"));
    }

    #[test]
    fn missing_alternates_cell_is_fine() {
        let q = QuestionRecord::with_alternates_list("Q", "A", None).unwrap();
        assert_eq!(q.accepted_answers().len(), 1);
    }

    #[test]
    fn non_ascii_answers_are_lowercased() {
        let q = QuestionRecord::new("Режиссёр «Сталкера»?", "Тарковский", ["Андрей Тарковский"])
            .unwrap();
        assert!(q.accepts("ТАРКОВСКИЙ"));
        assert!(q.accepts("андрей тарковский"));
    }

    #[test]
    fn blank_fields_are_rejected() {
        let err = QuestionRecord::new("  ", "A", Vec::<&str>::new()).unwrap_err();
        assert_eq!(err, QuestionError::EmptyPrompt);
        let err = QuestionRecord::new("Q", " ", Vec::<&str>::new()).unwrap_err();
        assert_eq!(err, QuestionError::EmptyAnswer);
    }
}
