//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument. Admin lists use keyset
//! pagination over `(timestamp, id)` via [`PageCursor`](ong_core::pagination::PageCursor).

pub mod admin_user_repo;
pub mod album_repo;
pub mod contact_repo;
pub mod form_repo;
pub mod payment_gate_repo;
pub mod photo_repo;
pub mod project_repo;
pub mod site_config_repo;
pub mod submission_repo;

pub use admin_user_repo::AdminUserRepo;
pub use album_repo::AlbumRepo;
pub use contact_repo::ContactRepo;
pub use form_repo::FormRepo;
pub use payment_gate_repo::PaymentGateRepo;
pub use photo_repo::PhotoRepo;
pub use project_repo::ProjectRepo;
pub use site_config_repo::SiteConfigRepo;
pub use submission_repo::SubmissionRepo;
