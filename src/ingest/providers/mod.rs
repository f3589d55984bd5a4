pub mod seismic_portal;
pub mod tmd_bulletin;
