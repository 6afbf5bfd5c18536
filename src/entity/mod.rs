pub mod payment_gateway;
pub mod plan;
pub mod referral;
pub mod subscription;
pub mod transaction;
pub mod user;

pub use payment_gateway::PaymentGatewayType;
pub use plan::PlanAvailability;
pub use subscription::{PlanType, SubscriptionStatus};
pub use transaction::TransactionStatus;
pub use user::{Locale, UserRole};
