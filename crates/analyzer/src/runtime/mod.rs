//! Runtime module: process lifecycle, boot then batch run.

pub mod boot;
pub mod run;
