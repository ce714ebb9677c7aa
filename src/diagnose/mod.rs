pub mod driver;
pub mod pipeline;

#[cfg(test)]
pub(crate) mod fake;

pub use driver::diagnose_all;
pub use pipeline::DiagnoseOptions;
