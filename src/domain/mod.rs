// Domain layer: core models and ports (interfaces). No transport or framework code.

pub mod model;
pub mod ports;
