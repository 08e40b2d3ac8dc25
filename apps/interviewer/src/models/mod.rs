pub mod interview;

pub use interview::{
    InterviewTable, MismatchNote, Question, QuestionSet, QuestionType, ResumeProfile,
};
