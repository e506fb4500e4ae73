pub mod analysis;
pub mod compare;
pub mod config;
pub mod dataset;
pub mod extract;
pub mod handler;
pub mod html;
pub mod http_client;
pub mod logging;
pub mod lookup;
pub mod pipeline;
pub mod scrape;
pub mod source;
pub mod store;
pub mod win_prob;
