// Domain layer: the Person records, the persistence model they map onto, and the ports
// that concrete stores and config sources implement.

pub mod entity;
pub mod model;
pub mod ports;
