pub mod iv_curve;
pub mod queries;
pub mod seeded_random;
pub mod soiling_model;
