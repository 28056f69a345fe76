pub mod drift;
pub mod replay;
pub mod synth;
