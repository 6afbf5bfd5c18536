pub mod plan;
pub mod subscription;
pub mod transaction;
pub mod user;

pub use plan::Plan;
pub use subscription::Subscription;
pub use transaction::Transaction;
pub use user::User;
