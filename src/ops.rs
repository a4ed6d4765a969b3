pub mod filter;
pub mod finalize;
pub mod map;
pub mod merge_all;
pub mod take;
