//! Table compiler: deterministic merge of the three question sets.

use crate::models::{InterviewTable, Question, QuestionSet, QuestionType};

/// Merges the question sets into one table: general, then role, then résumé.
///
/// Every question is tagged with the category it came from. Nothing is
/// deduplicated, rescored or reordered.
pub fn compile(
    general: &QuestionSet,
    role: &QuestionSet,
    resume: &QuestionSet,
    mismatch_note: &str,
    role_title: &str,
) -> InterviewTable {
    let mut questions =
        Vec::with_capacity(general.questions.len() + role.questions.len() + resume.questions.len());
    questions.extend(tagged(general, QuestionType::General));
    questions.extend(tagged(role, QuestionType::Role));
    questions.extend(tagged(resume, QuestionType::Resume));

    InterviewTable {
        role: role_title.to_string(),
        note: mismatch_note.to_string(),
        questions,
    }
}

fn tagged(set: &QuestionSet, question_type: QuestionType) -> impl Iterator<Item = Question> + '_ {
    set.questions.iter().map(move |q| Question {
        question_type: Some(question_type),
        ..q.clone()
    })
}
