//! localStorage-backed persistence: the key-value adapter and the three
//! records kept in it (daily counter, covers, activity log).

pub mod activity;
pub mod covers;
pub mod daily;
pub mod kv;
