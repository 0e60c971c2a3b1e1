//! In-process session store.

mod store;

pub use store::SessionStore;
