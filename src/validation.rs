use crate::models::Answer;

/// answers_are_valid
///
/// A question's answer set is acceptable when it has at least two options and
/// exactly one of them is marked correct. Pure check, no I/O; callers turn a
/// `false` into a 400.
pub fn answers_are_valid(answers: &[Answer]) -> bool {
    answers.len() >= 2 && answers.iter().filter(|a| a.is_correct).count() == 1
}
