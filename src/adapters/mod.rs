// Adapters layer: concrete implementations for external systems (storage,
// order persistence, draft cache).

pub mod draft;
pub mod order_log;
pub mod storage;
