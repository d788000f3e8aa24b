pub mod reddit;
pub mod social;
pub mod web_search;
