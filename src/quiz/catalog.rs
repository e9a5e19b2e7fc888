use serde::Serialize;

/// Cognitive area a question exercises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Verbal,
    Logical,
    Spatial,
    Numerical,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Verbal => "verbal",
            Category::Logical => "logical",
            Category::Spatial => "spatial",
            Category::Numerical => "numerical",
        }
    }
}

/// A single multiple-choice question.
///
/// `correct_answer` is a 0-based index into `options`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: &'static str,
    pub text: &'static str,
    pub options: &'static [&'static str],
    pub correct_answer: usize,
    pub category: Category,
}

/// The fixed 25-question catalog, in presentation order.
pub static QUESTIONS: [Question; 25] = [
    Question {
        id: "q1",
        text: "Which word does NOT belong with the others?",
        options: &["Apple", "Carrot", "Orange", "Banana"],
        correct_answer: 1,
        category: Category::Verbal,
    },
    Question {
        id: "q2",
        text: "What comes next in the sequence: 2, 4, 8, 16, ?",
        options: &["24", "32", "20", "28"],
        correct_answer: 1,
        category: Category::Numerical,
    },
    Question {
        id: "q3",
        text: "Book is to Reading as Fork is to:",
        options: &["Drawing", "Writing", "Stirring", "Eating"],
        correct_answer: 3,
        category: Category::Verbal,
    },
    Question {
        id: "q4",
        text: "Which figure completes the pattern? [Square, Circle, Triangle, Square, Circle, ?]",
        options: &["Square", "Circle", "Triangle", "Rectangle"],
        correct_answer: 2,
        category: Category::Spatial,
    },
    Question {
        id: "q5",
        text: "If all Bloops are Razzies and all Razzies are Lazzies, are all Bloops definitely Lazzies?",
        options: &["Yes", "No", "Maybe", "Not enough information"],
        correct_answer: 0,
        category: Category::Logical,
    },
    Question {
        id: "q6",
        text: "What is 15% of 200?",
        options: &["25", "30", "35", "40"],
        correct_answer: 1,
        category: Category::Numerical,
    },
    Question {
        id: "q7",
        text: "Which word is the opposite of ABUNDANCE?",
        options: &["Scarcity", "Plenty", "Excess", "Wealth"],
        correct_answer: 0,
        category: Category::Verbal,
    },
    Question {
        id: "q8",
        text: "What number should replace the question mark: 3, 9, 27, 81, ?",
        options: &["162", "243", "324", "405"],
        correct_answer: 1,
        category: Category::Numerical,
    },
    Question {
        id: "q9",
        text: "Mary is taller than Sue. Sue is taller than Jane. Who is the shortest?",
        options: &["Mary", "Sue", "Jane", "Cannot determine"],
        correct_answer: 2,
        category: Category::Logical,
    },
    Question {
        id: "q10",
        text: "Which shape can be folded to make a cube?",
        options: &[
            "Six squares in a cross pattern",
            "Five squares in a row",
            "Four triangles",
            "Six triangles",
        ],
        correct_answer: 0,
        category: Category::Spatial,
    },
    Question {
        id: "q11",
        text: "RELIABLE is to DEPENDABLE as HOSTILE is to:",
        options: &["Friendly", "Aggressive", "Neutral", "Kind"],
        correct_answer: 1,
        category: Category::Verbal,
    },
    Question {
        id: "q12",
        text: "What is the next number in the series: 1, 1, 2, 3, 5, 8, ?",
        options: &["11", "13", "15", "10"],
        correct_answer: 1,
        category: Category::Numerical,
    },
    Question {
        id: "q13",
        text: "If the day before yesterday was Thursday, what day will it be tomorrow?",
        options: &["Sunday", "Monday", "Saturday", "Tuesday"],
        correct_answer: 0,
        category: Category::Logical,
    },
    Question {
        id: "q14",
        text: "Which word is most similar to CANDID?",
        options: &["Deceptive", "Frank", "Mysterious", "Reserved"],
        correct_answer: 1,
        category: Category::Verbal,
    },
    Question {
        id: "q15",
        text: "A clock shows 3:15. What is the angle between the hour and minute hands?",
        options: &["0 degrees", "7.5 degrees", "30 degrees", "45 degrees"],
        correct_answer: 1,
        category: Category::Spatial,
    },
    Question {
        id: "q16",
        text: "Complete the analogy: Eye is to Seeing as Ear is to:",
        options: &["Listening", "Hearing", "Speaking", "Touching"],
        correct_answer: 1,
        category: Category::Verbal,
    },
    Question {
        id: "q17",
        text: "What comes next: J, F, M, A, M, ?",
        options: &["J", "N", "S", "D"],
        correct_answer: 0,
        category: Category::Logical,
    },
    Question {
        id: "q18",
        text: "If 5 machines make 5 widgets in 5 minutes, how long does it take 100 machines to make 100 widgets?",
        options: &["5 minutes", "20 minutes", "100 minutes", "500 minutes"],
        correct_answer: 0,
        category: Category::Numerical,
    },
    Question {
        id: "q19",
        text: "Which shape is the odd one out?",
        options: &["Square", "Rectangle", "Circle", "Rhombus"],
        correct_answer: 2,
        category: Category::Spatial,
    },
    Question {
        id: "q20",
        text: "METICULOUS most nearly means:",
        options: &["Careless", "Detailed", "Quick", "Large"],
        correct_answer: 1,
        category: Category::Verbal,
    },
    Question {
        id: "q21",
        text: "What number comes next: 100, 50, 25, 12.5, ?",
        options: &["6.25", "6", "5", "10"],
        correct_answer: 0,
        category: Category::Numerical,
    },
    Question {
        id: "q22",
        text: "All roses are flowers. Some flowers fade quickly. Therefore:",
        options: &[
            "All roses fade quickly",
            "Some roses may fade quickly",
            "No roses fade quickly",
            "All flowers are roses",
        ],
        correct_answer: 1,
        category: Category::Logical,
    },
    Question {
        id: "q23",
        text: "Which two words are most similar in meaning?",
        options: &["Happy and Sad", "Big and Large", "Fast and Slow", "Hot and Cold"],
        correct_answer: 1,
        category: Category::Verbal,
    },
    Question {
        id: "q24",
        text: "How many squares are in a 3x3 grid?",
        options: &["9", "10", "13", "14"],
        correct_answer: 3,
        category: Category::Spatial,
    },
    Question {
        id: "q25",
        text: "What is 2/5 expressed as a percentage?",
        options: &["20%", "25%", "40%", "50%"],
        correct_answer: 2,
        category: Category::Numerical,
    },
];

/// The catalog as an ordered, read-only slice.
pub fn questions() -> &'static [Question] {
    &QUESTIONS
}

/// Look up a question by its stable id.
pub fn find_question(id: &str) -> Option<&'static Question> {
    QUESTIONS.iter().find(|q| q.id == id)
}
