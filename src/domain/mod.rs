// Domain layer: core models and ports. Adapters and the analysis core depend on
// this, never the reverse.

pub mod model;
pub mod ports;
