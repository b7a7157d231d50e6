// Adapters layer: concrete implementations of the domain ports for external
// systems (CSV files on disk, HTTP-backed responders).

pub mod csv;
pub mod http;
