pub mod caller_id;
pub mod game_id;
pub mod validated_json;

pub use caller_id::CallerId;
pub use game_id::GameId;
pub use validated_json::ValidatedJson;
