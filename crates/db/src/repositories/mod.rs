//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument.

pub mod campaign_repo;
pub mod contact_repo;
pub mod page_repo;

pub use campaign_repo::CampaignRepo;
pub use contact_repo::ContactRepo;
pub use page_repo::PageRepo;
