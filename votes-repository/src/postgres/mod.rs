mod votable_item_repository;

pub use votable_item_repository::PostgresVotableItemRepository;
