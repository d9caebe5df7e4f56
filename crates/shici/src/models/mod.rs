pub mod point;
pub mod poem;
pub mod result;

pub use point::{PointPayload, VectorPoint};
pub use poem::{PoemAnalysis, PoemRecord, SkipReason, ANALYSIS_FIELDS};
pub use result::QueryResult;
