//! Repository layer: one zero-sized struct per aggregate, each method taking
//! the pool explicitly.

pub mod card_repo;
pub mod mapping_repo;
pub mod search_repo;
pub mod talk_repo;
pub mod theme_repo;
pub mod validation_repo;

pub use card_repo::CardRepo;
pub use mapping_repo::MappingRepo;
pub use search_repo::SearchRepo;
pub use talk_repo::TalkRepo;
pub use theme_repo::ThemeRepo;
pub use validation_repo::ValidationRepo;
