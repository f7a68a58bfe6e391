//! PostgreSQL adapter tests against a live database.
//!
//! Run with a scratch database:
//!
//! ```text
//! FOLIO_TEST_DATABASE_URL=postgres://localhost/folio_test cargo test -- --ignored
//! ```
//!
//! Every test creates its own users, so the suite can share one database.

use sqlx::PgPool;

use folio::adapters::postgres::{
    run_migrations, PostgresEntitlementReader, PostgresPaymentRepository, PostgresPlanRepository,
    PostgresSubscriptionRepository, PostgresUserRepository,
};
use folio::domain::account::User;
use folio::domain::commerce::{Payment, PaymentPurpose, PaymentStatus, Purchase, Subscription, SubscriptionPlan};
use folio::domain::content::ContentKind;
use folio::domain::foundation::{ContentId, PaymentId, Role, Timestamp};
use folio::ports::{
    Completion, EntitlementReader, GatewayConfirmation, Grant, PaymentRepository, PlanRepository,
    SubscriptionRepository, UserRepository,
};

// =============================================================================
// Test Infrastructure
// =============================================================================

async fn pool() -> PgPool {
    let url = std::env::var("FOLIO_TEST_DATABASE_URL").expect("FOLIO_TEST_DATABASE_URL must be set");
    let pool = PgPool::connect(&url).await.unwrap();
    run_migrations(&pool).await.unwrap();
    pool
}

async fn new_user(pool: &PgPool) -> User {
    let user = User::new(
        format!("{}@folio.test", uuid::Uuid::new_v4().simple()),
        None,
        Role::User,
    );
    PostgresUserRepository::new(pool.clone()).save(&user).await.unwrap();
    user
}

fn confirmation(gateway_payment_id: &str) -> GatewayConfirmation {
    GatewayConfirmation {
        gateway_payment_id: gateway_payment_id.to_string(),
        signature: "sig".to_string(),
    }
}

async fn active_count(pool: &PgPool, user: &User) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM subscriptions WHERE user_id = $1 AND status = 'ACTIVE'")
        .bind(user.id.as_uuid())
        .fetch_one(pool)
        .await
        .unwrap()
}

/// Writes a pending subscription checkout for `user` and returns its pieces.
async fn subscription_checkout(
    payments: &PostgresPaymentRepository,
    user: &User,
    plan: &SubscriptionPlan,
) -> (Payment, Subscription) {
    let subscription = Subscription::pending(user.id, plan.id, plan.duration_days);
    let payment = Payment::pending(
        PaymentId::new(),
        user.id,
        plan.price * 100,
        "INR",
        format!("order_{}", uuid::Uuid::new_v4().simple()),
        PaymentPurpose::Subscription {
            plan_id: plan.id,
            subscription_id: subscription.id,
        },
    );
    payments
        .insert_subscription_checkout(&payment, &subscription)
        .await
        .unwrap();
    (payment, subscription)
}

fn activation(subscription: &Subscription, days: i64) -> Grant {
    let now = Timestamp::now();
    Grant::ActivateSubscription {
        subscription_id: subscription.id,
        start_date: now,
        end_date: now.add_days(days),
    }
}

// =============================================================================
// Payment completion
// =============================================================================

#[tokio::test]
#[ignore = "Requires a PostgreSQL database (FOLIO_TEST_DATABASE_URL)"]
async fn completing_twice_grants_purchase_once() {
    let pool = pool().await;
    let payments = PostgresPaymentRepository::new(pool.clone());
    let user = new_user(&pool).await;
    let item_id = ContentId::new();

    let payment = Payment::pending(
        PaymentId::new(),
        user.id,
        9_900,
        "INR",
        "order_pg_purchase",
        PaymentPurpose::content(ContentKind::Blog, item_id),
    );
    payments.insert(&payment).await.unwrap();

    let grant = Grant::Purchase(Purchase::new(user.id, ContentKind::Blog, item_id, payment.id));
    let first = payments.complete(&payment.id, confirmation("pay_1"), grant.clone()).await.unwrap();
    let second = payments.complete(&payment.id, confirmation("pay_1"), grant).await.unwrap();

    assert_eq!(first, Completion::Completed);
    assert_eq!(second, Completion::AlreadyCompleted);

    let purchases: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM purchases WHERE user_id = $1")
        .bind(user.id.as_uuid())
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(purchases, 1);
    assert!(PostgresEntitlementReader::new(pool.clone())
        .has_purchase(&user.id, ContentKind::Blog, &item_id)
        .await
        .unwrap());

    let stored = payments.find_by_id(&payment.id).await.unwrap().unwrap();
    assert_eq!(stored.status, PaymentStatus::Success);
    assert_eq!(stored.gateway_payment_id.as_deref(), Some("pay_1"));
}

#[tokio::test]
#[ignore = "Requires a PostgreSQL database (FOLIO_TEST_DATABASE_URL)"]
async fn existing_purchase_counts_as_granted() {
    let pool = pool().await;
    let payments = PostgresPaymentRepository::new(pool.clone());
    let user = new_user(&pool).await;
    let item_id = ContentId::new();

    for order in ["order_pg_a", "order_pg_b"] {
        let payment = Payment::pending(
            PaymentId::new(),
            user.id,
            9_900,
            "INR",
            order,
            PaymentPurpose::content(ContentKind::Resource, item_id),
        );
        payments.insert(&payment).await.unwrap();
        let grant = Grant::Purchase(Purchase::new(user.id, ContentKind::Resource, item_id, payment.id));
        let outcome = payments.complete(&payment.id, confirmation(order), grant).await.unwrap();
        assert_eq!(outcome, Completion::Completed);
    }

    let purchases: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM purchases WHERE user_id = $1")
        .bind(user.id.as_uuid())
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(purchases, 1);
}

#[tokio::test]
#[ignore = "Requires a PostgreSQL database (FOLIO_TEST_DATABASE_URL)"]
async fn failed_payment_is_not_completed() {
    let pool = pool().await;
    let payments = PostgresPaymentRepository::new(pool.clone());
    let user = new_user(&pool).await;
    let item_id = ContentId::new();

    let payment = Payment::pending(
        PaymentId::new(),
        user.id,
        9_900,
        "INR",
        "order_pg_failed",
        PaymentPurpose::content(ContentKind::Blog, item_id),
    );
    payments.insert(&payment).await.unwrap();
    assert!(payments.mark_failed(&payment.id).await.unwrap());
    assert!(!payments.mark_failed(&payment.id).await.unwrap());

    let grant = Grant::Purchase(Purchase::new(user.id, ContentKind::Blog, item_id, payment.id));
    let outcome = payments.complete(&payment.id, confirmation("pay_1"), grant).await.unwrap();
    assert_eq!(outcome, Completion::AlreadyCompleted);
    assert!(!PostgresEntitlementReader::new(pool.clone())
        .has_purchase(&user.id, ContentKind::Blog, &item_id)
        .await
        .unwrap());
}

// =============================================================================
// Subscriptions
// =============================================================================

#[tokio::test]
#[ignore = "Requires a PostgreSQL database (FOLIO_TEST_DATABASE_URL)"]
async fn subscription_checkout_writes_both_rows() {
    let pool = pool().await;
    let payments = PostgresPaymentRepository::new(pool.clone());
    let subscriptions = PostgresSubscriptionRepository::new(pool.clone());
    let plan = SubscriptionPlan::create("Monthly", 199, 30).unwrap();
    PostgresPlanRepository::new(pool.clone()).insert(&plan).await.unwrap();
    let user = new_user(&pool).await;

    let (payment, subscription) = subscription_checkout(&payments, &user, &plan).await;

    assert!(payments.find_by_id(&payment.id).await.unwrap().is_some());
    let stored = subscriptions.find_by_id(&subscription.id).await.unwrap().unwrap();
    assert_eq!(stored.user_id, user.id);
}

#[tokio::test]
#[ignore = "Requires a PostgreSQL database (FOLIO_TEST_DATABASE_URL)"]
async fn second_activation_supersedes_the_first() {
    let pool = pool().await;
    let payments = PostgresPaymentRepository::new(pool.clone());
    let subscriptions = PostgresSubscriptionRepository::new(pool.clone());
    let plan = SubscriptionPlan::create("Monthly", 199, 30).unwrap();
    PostgresPlanRepository::new(pool.clone()).insert(&plan).await.unwrap();
    let user = new_user(&pool).await;

    let (first_payment, first) = subscription_checkout(&payments, &user, &plan).await;
    let (second_payment, second) = subscription_checkout(&payments, &user, &plan).await;

    payments
        .complete(&first_payment.id, confirmation("pay_a"), activation(&first, 30))
        .await
        .unwrap();
    payments
        .complete(&second_payment.id, confirmation("pay_b"), activation(&second, 30))
        .await
        .unwrap();

    assert_eq!(active_count(&pool, &user).await, 1);
    let replaced = subscriptions.find_by_id(&first.id).await.unwrap().unwrap();
    assert!(!replaced.is_entitled(Timestamp::now()));

    let current = subscriptions
        .find_active_for_user(&user.id, Timestamp::now())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(current.id, second.id);
    // Unused time from the first subscription is carried over
    assert!(current.end_date.is_after(&Timestamp::now().add_days(59)));
}

#[tokio::test]
#[ignore = "Requires a PostgreSQL database (FOLIO_TEST_DATABASE_URL)"]
async fn concurrent_activations_leave_one_active() {
    let pool = pool().await;
    let payments = PostgresPaymentRepository::new(pool.clone());
    let plan = SubscriptionPlan::create("Monthly", 199, 30).unwrap();
    PostgresPlanRepository::new(pool.clone()).insert(&plan).await.unwrap();
    let user = new_user(&pool).await;

    let (first_payment, first) = subscription_checkout(&payments, &user, &plan).await;
    let (second_payment, second) = subscription_checkout(&payments, &user, &plan).await;

    let (a, b) = tokio::join!(
        payments.complete(&first_payment.id, confirmation("pay_a"), activation(&first, 30)),
        payments.complete(&second_payment.id, confirmation("pay_b"), activation(&second, 30)),
    );

    assert_eq!(a.unwrap(), Completion::Completed);
    assert_eq!(b.unwrap(), Completion::Completed);
    assert_eq!(active_count(&pool, &user).await, 1);
}
