pub mod config;
pub mod credentials;
pub mod error;
pub mod filter;
pub mod glob;
pub mod node;
pub mod routes;
pub mod types;
pub mod upload;

#[cfg(test)]
mod test_support;
