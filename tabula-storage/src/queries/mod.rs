//! SQL building blocks used by the sync engine.

pub mod maintenance;
pub mod mapping_ops;
pub mod statement_exec;
pub mod table_ops;
