use crate::quiz::{find_question, parse_answer_index, questions, AnswerSet};

/// Strict completeness gate run before a score is trusted for payment.
///
/// True iff every catalog question has exactly one answer, no unknown ids are
/// present, and each answer is a valid option index for its question.
pub fn validate_answers(answers: &AnswerSet) -> bool {
    check_answers(answers).is_ok()
}

/// Same rules as [`validate_answers`], but returns every problem found
/// (not just the first) so callers can explain a rejection.
pub fn check_answers(answers: &AnswerSet) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    for question in questions() {
        match answers.get(question.id) {
            None => errors.push(format!("{}: missing answer", question.id)),
            Some(value) => match parse_answer_index(value) {
                None => errors.push(format!(
                    "{}: '{}' does not start with a non-negative integer",
                    question.id, value
                )),
                Some(idx) if idx >= question.options.len() => errors.push(format!(
                    "{}: option {} out of range (0-{})",
                    question.id,
                    idx,
                    question.options.len() - 1
                )),
                Some(_) => {}
            },
        }
    }

    let mut unknown: Vec<&String> = answers
        .keys()
        .filter(|id| find_question(id).is_none())
        .collect();
    unknown.sort();
    for id in unknown {
        errors.push(format!("{}: unknown question id", id));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_answers() -> AnswerSet {
        questions()
            .iter()
            .map(|q| (q.id.to_string(), "0".to_string()))
            .collect()
    }

    #[test]
    fn test_complete_answers_valid() {
        assert!(validate_answers(&complete_answers()));
    }

    #[test]
    fn test_last_option_is_valid() {
        let answers: AnswerSet = questions()
            .iter()
            .map(|q| (q.id.to_string(), (q.options.len() - 1).to_string()))
            .collect();
        assert!(validate_answers(&answers));
    }

    #[test]
    fn test_empty_answers_invalid() {
        assert!(!validate_answers(&AnswerSet::new()));
    }

    #[test]
    fn test_missing_answer_invalid() {
        let mut answers = complete_answers();
        answers.remove("q25");
        let errors = check_answers(&answers).unwrap_err();
        assert_eq!(errors, vec!["q25: missing answer".to_string()]);
    }

    #[test]
    fn test_non_numeric_invalid() {
        let mut answers = complete_answers();
        answers.insert("q3".to_string(), "Eating".to_string());
        assert!(!validate_answers(&answers));
    }

    #[test]
    fn test_negative_invalid() {
        let mut answers = complete_answers();
        answers.insert("q3".to_string(), "-1".to_string());
        assert!(!validate_answers(&answers));
    }

    #[test]
    fn test_trailing_text_after_digits_valid() {
        let correct = find_question("q1").unwrap().correct_answer;
        for value in [
            format!("{}abc", correct),
            format!("{}.0", correct),
            format!("{}e3", correct),
        ] {
            let mut answers = complete_answers();
            answers.insert("q1".to_string(), value.clone());
            assert!(validate_answers(&answers), "{}", value);
        }

        let mut answers = complete_answers();
        answers.insert("q1".to_string(), "-0".to_string());
        assert!(validate_answers(&answers));
    }

    #[test]
    fn test_index_equal_to_option_count_invalid() {
        let mut answers = complete_answers();
        answers.insert("q1".to_string(), "4".to_string());
        let errors = check_answers(&answers).unwrap_err();
        assert!(errors[0].contains("out of range"));
    }

    #[test]
    fn test_unknown_id_invalid() {
        let mut answers = complete_answers();
        answers.insert("q26".to_string(), "0".to_string());
        let errors = check_answers(&answers).unwrap_err();
        assert_eq!(errors, vec!["q26: unknown question id".to_string()]);
    }

    #[test]
    fn test_collects_all_errors() {
        let mut answers = complete_answers();
        answers.remove("q1");
        answers.insert("q2".to_string(), "x".to_string());
        answers.insert("extra".to_string(), "0".to_string());
        let errors = check_answers(&answers).unwrap_err();
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn test_does_not_mutate_input() {
        let answers = complete_answers();
        let before = answers.clone();
        validate_answers(&answers);
        assert_eq!(answers, before);
    }
}
