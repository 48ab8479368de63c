//! Wire protocol and domain vocabulary shared by the client core and the
//! desktop shell.

pub mod domain;
pub mod protocol;
