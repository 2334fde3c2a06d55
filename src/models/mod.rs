mod category;
mod interest;
mod snapshot;
mod summary;
mod user;

pub use category::{Category, CategoryResponse};
pub use interest::{Interest, InterestResponse};
pub use snapshot::{
    price_f64, NewSnapshot, Snapshot, SnapshotResponse, SubmitSnapshotRequest,
    UpdateSnapshotRequest,
};
pub use summary::{Summary, SummaryResponse, UpsertSummaryRequest};
pub use user::{LoginRequest, LoginResponse, RegisterRequest, User, UserResponse};
