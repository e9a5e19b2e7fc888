pub mod answers;
pub mod catalog;

pub use answers::{load_answer_set, parse_answer_index, parse_answer_set, AnswerSet};
pub use catalog::{find_question, questions, Category, Question, QUESTIONS};
