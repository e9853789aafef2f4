// Neo4j module - connection, schema setup and the benchmark adapter
pub mod backend;
pub mod connection;
pub mod indexer;
pub mod queries;

pub use backend::Neo4jBackend;
pub use connection::connect;
pub use indexer::{create_constraints, verify_indexes};
