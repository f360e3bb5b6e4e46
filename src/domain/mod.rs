mod entry;
mod ledger;
mod money;
mod password;
mod user;

pub use entry::*;
pub use ledger::*;
pub use money::*;
pub use password::*;
pub use user::*;
