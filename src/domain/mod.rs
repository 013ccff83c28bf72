// Domain layer: core models and ports (interfaces). Adapters live under core/ and config/.

pub mod model;
pub mod ports;
