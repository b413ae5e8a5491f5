mod answer;
mod follow;
mod question;
mod session;
mod user;

pub use answer::*;
pub use common::database::Ulid;
pub use follow::*;
pub use question::*;
pub use session::*;
pub use user::*;
