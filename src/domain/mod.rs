// Domain layer: core models and ports (interfaces). No I/O beyond what the port defaults do.

pub mod model;
pub mod ports;
