mod bfv;

pub use bfv::BFVEvaluator;
