//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod activity_repo;
pub mod check_in_repo;
pub mod comment_repo;
pub mod day_repo;
pub mod invite_repo;
pub mod member_repo;
pub mod place_repo;
pub mod review_repo;
pub mod trip_repo;
pub mod user_repo;

pub use activity_repo::ActivityRepo;
pub use check_in_repo::CheckInRepo;
pub use comment_repo::CommentRepo;
pub use day_repo::DayRepo;
pub use invite_repo::InviteRepo;
pub use member_repo::MemberRepo;
pub use place_repo::PlaceRepo;
pub use review_repo::ReviewRepo;
pub use trip_repo::TripRepo;
pub use user_repo::UserRepo;
