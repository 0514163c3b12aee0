// Domain layer: Cloud Controller resource shapes and the port the resolver talks to.

pub mod model;
pub mod ports;
