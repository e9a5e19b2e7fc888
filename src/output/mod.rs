pub mod formatter;

pub use formatter::{
    format_question_list, format_result_metadata, format_score_result, format_validation_errors,
    should_use_colors,
};
