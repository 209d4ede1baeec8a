//! Convert a VNR shared-dictionary XML export into the YAGT dictionary
//! JSON format. The pipeline is strictly linear: load, map, save.

pub mod convert;
pub mod mapper;
pub mod progress;
pub mod vnr;
pub mod yagt;
