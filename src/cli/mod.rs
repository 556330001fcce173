pub mod collect;
pub mod enrich;
pub mod pipeline;
pub mod probe;
