pub mod cache;
pub mod clock;
pub mod config;
pub mod espn;
pub mod fallback;
pub mod http_client;
pub mod provider;
pub mod state;
pub mod stats;
pub mod store;
pub mod team;
pub mod win_prob;
