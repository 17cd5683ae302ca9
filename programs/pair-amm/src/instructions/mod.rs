pub mod deposit;
pub mod query;
pub mod swap;
pub mod token_cpi;
pub mod withdraw;

pub use deposit::*;
pub use query::*;
pub use swap::*;
pub use withdraw::*;
