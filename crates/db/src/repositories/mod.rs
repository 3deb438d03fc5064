pub mod campaign_repo;
pub mod result_repo;

pub use campaign_repo::CampaignRepo;
pub use result_repo::ResultRepo;
