// Domain layer - pure dashboard models and presentation shaping
pub mod dashboard;
pub mod format;
pub mod notice;
pub mod overview;
pub mod query;
pub mod table;
pub mod visualization;
