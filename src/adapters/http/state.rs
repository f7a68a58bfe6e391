//! Shared application state.
//!
//! Cloned for each request. Holds the ports as trait objects and builds
//! application handlers on demand.

use std::sync::Arc;

use sqlx::PgPool;

use crate::adapters::memory::InMemoryStore;
use crate::adapters::postgres::{
    PostgresBookmarkRepository, PostgresCommentRepository, PostgresContentRepository,
    PostgresEntitlementReader, PostgresPaymentRepository, PostgresPlanRepository,
    PostgresSubscriptionRepository, PostgresUserRepository,
};
use crate::application::handlers::account::ModerateUserHandler;
use crate::application::handlers::commerce::{
    CancelSubscriptionHandler, CreateOrderHandler, CreatePlanHandler, CreateSubscriptionOrderHandler,
    DeactivatePlanHandler, GetSubscriptionHandler, ListPaymentsHandler, ListPlansHandler,
    ReportPaymentFailureHandler, VerifyPaymentHandler,
};
use crate::application::handlers::content::{
    CreateContentHandler, DeleteContentHandler, GetContentHandler, ListContentHandler,
    UpdateContentHandler,
};
use crate::application::handlers::engagement::{
    CreateCommentHandler, DeleteCommentHandler, ListBookmarksHandler, ListCommentsHandler,
    ToggleBookmarkHandler,
};
use crate::application::handlers::media::{DeleteMediaHandler, UploadMediaHandler};
use crate::domain::commerce::PaymentSignatureVerifier;
use crate::ports::{
    BookmarkRepository, CommentRepository, ContentRepository, EmailSender, EntitlementReader,
    ObjectStorage, PaymentGateway, PaymentRepository, PlanRepository, SessionValidator,
    SubscriptionRepository, UserRepository,
};

/// Persistence ports, backed either by Postgres or by the in-memory store.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub content: Arc<dyn ContentRepository>,
    pub entitlements: Arc<dyn EntitlementReader>,
    pub payments: Arc<dyn PaymentRepository>,
    pub subscriptions: Arc<dyn SubscriptionRepository>,
    pub plans: Arc<dyn PlanRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub bookmarks: Arc<dyn BookmarkRepository>,
}

impl Repositories {
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            users: Arc::new(PostgresUserRepository::new(pool.clone())),
            content: Arc::new(PostgresContentRepository::new(pool.clone())),
            entitlements: Arc::new(PostgresEntitlementReader::new(pool.clone())),
            payments: Arc::new(PostgresPaymentRepository::new(pool.clone())),
            subscriptions: Arc::new(PostgresSubscriptionRepository::new(pool.clone())),
            plans: Arc::new(PostgresPlanRepository::new(pool.clone())),
            comments: Arc::new(PostgresCommentRepository::new(pool.clone())),
            bookmarks: Arc::new(PostgresBookmarkRepository::new(pool)),
        }
    }

    /// Every port shares the same store.
    pub fn in_memory(store: &InMemoryStore) -> Self {
        Self {
            users: Arc::new(store.clone()),
            content: Arc::new(store.clone()),
            entitlements: Arc::new(store.clone()),
            payments: Arc::new(store.clone()),
            subscriptions: Arc::new(store.clone()),
            plans: Arc::new(store.clone()),
            comments: Arc::new(store.clone()),
            bookmarks: Arc::new(store.clone()),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub repos: Repositories,
    pub gateway: Arc<dyn PaymentGateway>,
    pub email: Arc<dyn EmailSender>,
    pub storage: Arc<dyn ObjectStorage>,
    pub sessions: Arc<dyn SessionValidator>,
    /// `None` when the gateway secret is not configured.
    pub signature_verifier: Option<PaymentSignatureVerifier>,
    /// ISO 4217 code for new orders.
    pub currency: String,
}

impl AppState {
    // Content

    pub fn get_content_handler(&self) -> GetContentHandler {
        GetContentHandler::new(self.repos.content.clone(), self.repos.entitlements.clone())
    }

    pub fn list_content_handler(&self) -> ListContentHandler {
        ListContentHandler::new(self.repos.content.clone())
    }

    pub fn create_content_handler(&self) -> CreateContentHandler {
        CreateContentHandler::new(self.repos.content.clone())
    }

    pub fn update_content_handler(&self) -> UpdateContentHandler {
        UpdateContentHandler::new(self.repos.content.clone(), self.storage.clone())
    }

    pub fn delete_content_handler(&self) -> DeleteContentHandler {
        DeleteContentHandler::new(self.repos.content.clone(), self.storage.clone())
    }

    // Commerce

    pub fn create_order_handler(&self) -> CreateOrderHandler {
        CreateOrderHandler::new(
            self.repos.content.clone(),
            self.repos.entitlements.clone(),
            self.repos.payments.clone(),
            self.gateway.clone(),
            self.currency.clone(),
        )
    }

    pub fn create_subscription_order_handler(&self) -> CreateSubscriptionOrderHandler {
        CreateSubscriptionOrderHandler::new(
            self.repos.plans.clone(),
            self.repos.subscriptions.clone(),
            self.repos.payments.clone(),
            self.gateway.clone(),
            self.currency.clone(),
        )
    }

    pub fn verify_payment_handler(&self) -> VerifyPaymentHandler {
        VerifyPaymentHandler::new(
            self.repos.payments.clone(),
            self.repos.plans.clone(),
            self.email.clone(),
            self.signature_verifier.clone(),
        )
    }

    pub fn report_payment_failure_handler(&self) -> ReportPaymentFailureHandler {
        ReportPaymentFailureHandler::new(self.repos.payments.clone())
    }

    pub fn get_subscription_handler(&self) -> GetSubscriptionHandler {
        GetSubscriptionHandler::new(self.repos.subscriptions.clone(), self.repos.plans.clone())
    }

    pub fn cancel_subscription_handler(&self) -> CancelSubscriptionHandler {
        CancelSubscriptionHandler::new(self.repos.subscriptions.clone())
    }

    pub fn list_plans_handler(&self) -> ListPlansHandler {
        ListPlansHandler::new(self.repos.plans.clone())
    }

    pub fn create_plan_handler(&self) -> CreatePlanHandler {
        CreatePlanHandler::new(self.repos.plans.clone())
    }

    pub fn deactivate_plan_handler(&self) -> DeactivatePlanHandler {
        DeactivatePlanHandler::new(self.repos.plans.clone())
    }

    pub fn list_payments_handler(&self) -> ListPaymentsHandler {
        ListPaymentsHandler::new(self.repos.payments.clone())
    }

    // Engagement

    pub fn list_comments_handler(&self) -> ListCommentsHandler {
        ListCommentsHandler::new(
            self.repos.content.clone(),
            self.repos.comments.clone(),
            self.repos.users.clone(),
        )
    }

    pub fn create_comment_handler(&self) -> CreateCommentHandler {
        CreateCommentHandler::new(self.repos.content.clone(), self.repos.comments.clone())
    }

    pub fn delete_comment_handler(&self) -> DeleteCommentHandler {
        DeleteCommentHandler::new(self.repos.comments.clone())
    }

    pub fn toggle_bookmark_handler(&self) -> ToggleBookmarkHandler {
        ToggleBookmarkHandler::new(self.repos.content.clone(), self.repos.bookmarks.clone())
    }

    pub fn list_bookmarks_handler(&self) -> ListBookmarksHandler {
        ListBookmarksHandler::new(self.repos.content.clone(), self.repos.bookmarks.clone())
    }

    // Admin

    pub fn upload_media_handler(&self) -> UploadMediaHandler {
        UploadMediaHandler::new(self.storage.clone())
    }

    pub fn delete_media_handler(&self) -> DeleteMediaHandler {
        DeleteMediaHandler::new(self.storage.clone())
    }

    pub fn moderate_user_handler(&self) -> ModerateUserHandler {
        ModerateUserHandler::new(self.repos.users.clone())
    }
}
