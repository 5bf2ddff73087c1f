pub mod migrate;
pub mod scopes;
