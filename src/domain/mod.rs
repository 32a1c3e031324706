pub mod attempt;
pub mod course;
pub mod quiz;

pub use attempt::{Enrollment, ExerciseSubmission, Notification, NotificationKind, QuizAttempt, ReviewStatus};
pub use course::{Course, Exercise, ExerciseKind, Lesson, validate_exercises};
pub use quiz::{
  AnswerKey, Question, QuestionKind, Quiz, RedactedQuestion, RedactedQuiz, SubmittedAnswer,
  ValidationIssue, validate_quiz,
};
