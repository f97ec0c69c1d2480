mod bfv;

pub use bfv::BFVEncoder;
