pub mod dashmap_store;
