pub mod tree_store;

pub use tree_store::TreeStore;
