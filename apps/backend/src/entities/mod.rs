pub mod game_disputes;
pub mod game_moves;
pub mod games;
pub mod player_reputation;

pub use game_disputes::Entity as GameDisputes;
pub use game_disputes::Model as GameDispute;
pub use game_moves::Entity as GameMoves;
pub use game_moves::Model as GameMove;
pub use games::Entity as Games;
pub use games::Model as Game;
pub use player_reputation::Entity as PlayerReputations;
pub use player_reputation::Model as PlayerReputation;
