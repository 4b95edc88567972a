pub mod riksbank;

pub use riksbank::RiksbankProvider;
