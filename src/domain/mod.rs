// Domain layer: race records, the laid-out chart model and the ports the pipeline talks through.

pub mod model;
pub mod ports;
