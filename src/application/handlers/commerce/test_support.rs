//! Shared fixture for commerce handler tests.

use crate::adapters::memory::InMemoryStore;
use crate::adapters::razorpay::MockPaymentGateway;
use crate::domain::account::User;
use crate::domain::commerce::{Payment, PaymentPurpose, PaymentSignatureVerifier, Purchase, SubscriptionPlan};
use crate::domain::content::{AccessType, ContentDraft, ContentItem, ContentKind};
use crate::domain::foundation::{AuthenticatedUser, PaymentId, Role};
use crate::ports::{ContentRepository, GatewayConfirmation, Grant, PaymentRepository, PlanRepository, UserRepository};
use secrecy::SecretString;

pub const GATEWAY_SECRET: &str = "rzp_test_secret_for_handlers";

pub struct Fixture {
    pub store: InMemoryStore,
    pub gateway: MockPaymentGateway,
    pub buyer: AuthenticatedUser,
}

impl Fixture {
    pub async fn new() -> Self {
        let store = InMemoryStore::new();
        let user = User::new("buyer@example.com", Some("Buyer".to_string()), Role::User);
        store.save(&user).await.unwrap();
        Self {
            store,
            gateway: MockPaymentGateway::new(),
            buyer: user.to_authenticated(),
        }
    }

    pub fn verifier(&self) -> PaymentSignatureVerifier {
        PaymentSignatureVerifier::new(SecretString::new(GATEWAY_SECRET.to_string()))
    }

    pub async fn add_item(&self, access_type: AccessType, price: Option<i64>) -> ContentItem {
        let item = ContentItem::create(
            ContentKind::Blog,
            ContentDraft {
                title: format!("Item {}", uuid::Uuid::new_v4().simple()),
                body: "body".to_string(),
                access_type: Some(access_type),
                price,
                published: true,
                ..Default::default()
            },
            self.buyer.id,
        )
        .unwrap();
        ContentRepository::insert(&self.store, &item).await.unwrap();
        item
    }

    pub async fn add_plan(&self, price: i64, duration_days: i64) -> SubscriptionPlan {
        let plan = SubscriptionPlan::create("Monthly", price, duration_days).unwrap();
        PlanRepository::insert(&self.store, &plan).await.unwrap();
        plan
    }

    pub async fn payment(&self, id: &PaymentId) -> Payment {
        PaymentRepository::find_by_id(&self.store, id).await.unwrap().unwrap()
    }

    pub async fn all_payments(&self) -> Vec<Payment> {
        PaymentRepository::list(&self.store, None, 100).await.unwrap()
    }

    pub async fn grant_purchase(&self, user: &AuthenticatedUser, item: &ContentItem) {
        let payment = Payment::pending(
            PaymentId::new(),
            user.id,
            100,
            "INR",
            "order_seed",
            PaymentPurpose::content(item.kind, item.id),
        );
        PaymentRepository::insert(&self.store, &payment).await.unwrap();
        self.store
            .complete(
                &payment.id,
                GatewayConfirmation {
                    gateway_payment_id: "pay_seed".to_string(),
                    signature: "seed".to_string(),
                },
                Grant::Purchase(Purchase::new(user.id, item.kind, item.id, payment.id)),
            )
            .await
            .unwrap();
    }
}
