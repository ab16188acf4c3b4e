// Domain layer: alarm models, CloudFormation template types and ports (interfaces).

pub mod model;
pub mod ports;
pub mod template;
