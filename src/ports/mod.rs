//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Persistence Ports
//!
//! - `UserRepository` - Accounts, roles and bans
//! - `ContentRepository` - Blogs and resources
//! - `EntitlementReader` - Purchase / subscription lookups for access checks
//! - `PaymentRepository` - Payments and atomic entitlement grants
//! - `SubscriptionRepository`, `PlanRepository` - Recurring access
//! - `CommentRepository`, `BookmarkRepository` - Engagement
//!
//! ## External Service Ports
//!
//! - `SessionValidator` - Bearer token validation
//! - `PaymentGateway` - Order creation at the payment provider
//! - `EmailSender` - Transactional email
//! - `ObjectStorage` - Uploaded media

mod content_repository;
mod email_sender;
mod engagement_repository;
mod entitlement_reader;
mod object_storage;
mod payment_gateway;
mod payment_repository;
mod session_validator;
mod subscription_repository;
mod user_repository;

pub use content_repository::{ContentQuery, ContentRepository, Page, MAX_PER_PAGE};
pub use email_sender::{EmailError, EmailMessage, EmailSender};
pub use engagement_repository::{BookmarkRepository, CommentRepository};
pub use entitlement_reader::EntitlementReader;
pub use object_storage::{ObjectStorage, StorageError};
pub use payment_gateway::{CreateOrderRequest, GatewayOrder, PaymentGateway, PaymentGatewayError};
pub use payment_repository::{Completion, GatewayConfirmation, Grant, PaymentRepository};
pub use session_validator::SessionValidator;
pub use subscription_repository::{PlanRepository, SubscriptionRepository};
pub use user_repository::UserRepository;
