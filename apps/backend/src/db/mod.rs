pub mod game_locks;
pub mod txn;

pub use game_locks::GameLocks;
pub use txn::{with_txn, TxnFuture};
