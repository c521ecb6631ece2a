//! Presentation Layer - Host shim
//!
//! Entry points called by the authentication framework (or the `linkgate`
//! helper binary on its behalf).

pub mod host;
