use rand::Rng;

use crate::spec::{LoadOptions, Question, Quiz};

/// In-place Fisher-Yates shuffle.
pub fn shuffle<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.random_range(0..=i);
        items.swap(i, j);
    }
}

/// Applies the shuffles requested by `options` to `quiz`.
///
/// Correct answers are stored by value, so reordering options never changes
/// which option is right. Flashcards keep their options untouched.
pub fn apply_shuffles<R: Rng + ?Sized>(quiz: &mut Quiz, options: &LoadOptions, rng: &mut R) {
    if options.shuffle_questions {
        shuffle(&mut quiz.questions, rng);
    }
    if options.shuffle_options {
        for question in &mut quiz.questions {
            if let Question::MultipleChoice(question) = question {
                shuffle(&mut question.options, rng);
            }
        }
    }
}
