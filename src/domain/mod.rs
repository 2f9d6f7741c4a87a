// Domain layer: product types and the command port.

pub mod model;
pub mod ports;
