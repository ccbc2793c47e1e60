pub mod soiling;
