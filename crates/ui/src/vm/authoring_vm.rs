use gaps_core::model::{Question, QuestionId};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptionLineVm {
    pub letter: char,
    pub text: String,
    pub correct: bool,
    pub class: &'static str,
}

/// One saved question in the authoring list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuestionItemVm {
    pub id: QuestionId,
    pub heading: String,
    pub concept: String,
    pub options: Vec<OptionLineVm>,
}

#[must_use]
pub fn map_question_items(questions: &[Question]) -> Vec<QuestionItemVm> {
    questions
        .iter()
        .enumerate()
        .map(|(position, question)| QuestionItemVm {
            id: question.id(),
            heading: format!("Q{}. {}", position + 1, question.text()),
            concept: question.concept().to_string(),
            options: question
                .options()
                .iter()
                .zip('A'..='Z')
                .enumerate()
                .map(|(index, (text, letter))| {
                    let correct = question.is_correct(index);
                    OptionLineVm {
                        letter,
                        text: text.clone(),
                        correct,
                        class: if correct { "option-correct" } else { "option" },
                    }
                })
                .collect(),
        })
        .collect()
}

#[must_use]
pub fn question_count_label(count: usize) -> String {
    match count {
        0 => "No questions yet. Add your first question above.".to_string(),
        1 => "1 question".to_string(),
        n => format!("{n} questions"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gaps_core::model::QuestionDraft;

    #[test]
    fn items_letter_options_and_mark_answer() {
        let question = QuestionDraft {
            text: "Half of 8?".into(),
            concept: "Fractions".into(),
            options: vec!["2".into(), "4".into()],
            correct_answer: Some(1),
        }
        .validate(QuestionId::new(5))
        .unwrap();
        let items = map_question_items(&[question]);
        assert_eq!(items[0].heading, "Q1. Half of 8?");
        assert_eq!(items[0].options[1].letter, 'B');
        assert!(items[0].options[1].correct);
        assert!(!items[0].options[0].correct);
        assert_eq!(question_count_label(2), "2 questions");
    }
}
