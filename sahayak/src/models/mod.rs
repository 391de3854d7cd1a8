mod alert;
mod crop;
mod report;
mod user;
mod weather;

pub use alert::*;
pub use crop::*;
pub use report::*;
pub use user::*;
pub use weather::*;
