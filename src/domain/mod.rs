// Domain layer: cell grid, holdings and snapshot models plus the ports the engine talks through.

pub mod model;
pub mod ports;
