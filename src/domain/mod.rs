// Domain layer: core models and ports (interfaces). No dependencies beyond
// std/serde so the batching logic stays testable in isolation.

pub mod model;
pub mod ports;
