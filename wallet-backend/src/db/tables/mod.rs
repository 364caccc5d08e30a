//! Table-group modules - extend Database with domain-specific methods
//!
//! Each module adds `impl Database` blocks with methods for one table group.

mod connections; // connections
mod identifiers; // identifiers (read-side of the identifier lifecycle)
mod notes; // connection_notes
