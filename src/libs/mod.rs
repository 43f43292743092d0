pub mod cluster;
pub mod coverage;
pub mod detect;
pub mod disjoint_set;
pub mod io;
pub mod overlap;
pub mod seq;
