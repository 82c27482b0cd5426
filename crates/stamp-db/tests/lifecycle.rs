//! End-to-end audit stamping through the storage layer.
//!
//! - Fresh entity: all four fields set from one identity and one instant
//! - Dirty save: modifier and modification time move, creation stays
//! - Scheduled task run as daemon: saves succeed and credit the daemon
//! - Interleaved transactions keep their own identities
//! - Config-driven open with a file database

use std::sync::Arc;

use chrono::{TimeDelta, TimeZone, Utc};
use pretty_assertions::assert_eq;
use rstest::rstest;
use stamp_config::StampConfig;
use stamp_core::entities::{ConceptNumeric, User};
use stamp_core::{
    ActingContext, ActingIdentity, Auditable, AuditableInterceptor, Clock, Daemon, ManualClock,
    ScheduledTask, UserRef,
};
use stamp_db::StampDb;
use stamp_db::service::{SaveOutcome, StampService};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn service() -> (StampService, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2026, 4, 1, 12, 0, 0).unwrap(),
    ));
    let db = StampDb::open_local(":memory:").await.unwrap();
    (
        StampService::from_db(db, AuditableInterceptor::new(clock.clone())),
        clock,
    )
}

fn admin() -> ActingContext {
    ActingContext::authenticated(UserRef::new("1").with_username("admin"))
}

fn clerk() -> ActingContext {
    ActingContext::authenticated(UserRef::new("2").with_username("clerk"))
}

async fn saved_weight(svc: &StampService) -> ConceptNumeric {
    let mut weight = ConceptNumeric::new("WEIGHT (KG)");
    weight.hi_absolute = Some(250.0);
    weight.low_absolute = Some(0.0);
    weight.units = Some("kg".into());
    svc.save_concept_numeric(&admin(), &mut weight).await.unwrap();
    weight
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

#[tokio::test]
async fn saving_new_user_credits_authenticated_user() {
    let (svc, _clock) = service().await;
    let mut user = User::new("user");

    let outcome = svc.save_user(&admin(), &mut user).await.unwrap();

    assert_eq!(outcome, SaveOutcome::Inserted);
    assert_eq!(user.creator(), Some(admin().identity()));
    assert!(user.date_created().is_some());
}

#[tokio::test]
async fn fresh_entity_gets_one_identity_and_one_instant() {
    let (svc, clock) = service().await;
    let mut user = User::new("fresh");
    assert_eq!(user.audit, stamp_core::AuditFields::unset());

    svc.save_user(&admin(), &mut user).await.unwrap();
    let stored = svc.get_user(user.id.as_deref().unwrap()).await.unwrap();

    assert!(stored.audit.is_fully_stamped());
    assert_eq!(stored.creator(), stored.changed_by());
    assert_eq!(stored.date_created(), stored.date_changed());
    assert_eq!(stored.date_created(), Some(clock.now()));
}

#[tokio::test]
async fn historical_date_created_is_mirrored() {
    let (svc, _clock) = service().await;
    let historical = Utc.with_ymd_and_hms(1999, 12, 26, 0, 0, 0).unwrap();
    let mut user = User::new("migrated");
    user.set_date_created(Some(historical));

    svc.save_user(&admin(), &mut user).await.unwrap();
    let stored = svc.get_user(user.id.as_deref().unwrap()).await.unwrap();

    assert_eq!(stored.date_created(), Some(historical));
    assert_eq!(stored.date_changed(), Some(historical));
}

// ---------------------------------------------------------------------------
// Dirty flush
// ---------------------------------------------------------------------------

#[tokio::test]
async fn saving_changed_user_moves_date_changed() {
    let (svc, clock) = service().await;
    let mut user = User::new("asdf-before");
    svc.save_user(&admin(), &mut user).await.unwrap();
    let before = user.date_changed();

    clock.advance(TimeDelta::seconds(3));
    user.username = Some("asdf".into());
    let outcome = svc.save_user(&clerk(), &mut user).await.unwrap();

    assert_eq!(outcome, SaveOutcome::Updated);
    let stored = svc.get_user(user.id.as_deref().unwrap()).await.unwrap();
    assert_ne!(stored.date_changed(), before);
    assert_eq!(stored.changed_by(), Some(clerk().identity()));
    assert_eq!(stored.creator(), Some(admin().identity()));
}

#[rstest]
#[case::clerk(clerk())]
#[case::daemon(Daemon::context())]
#[tokio::test]
async fn dirty_save_credits_flushing_identity(#[case] ctx: ActingContext) {
    let (svc, clock) = service().await;
    let mut weight = saved_weight(&svc).await;
    let created = weight.audit.clone();

    clock.advance(TimeDelta::hours(1));
    weight.units = Some("kilograms".into());
    svc.save_concept_numeric(&ctx, &mut weight).await.unwrap();

    assert_eq!(weight.changed_by(), Some(ctx.identity()));
    assert_eq!(weight.date_changed(), Some(clock.now()));
    assert_eq!(weight.audit.creator, created.creator);
    assert_eq!(weight.audit.date_created, created.date_created);
}

/// Raises the upper bound of a stored concept, the way a nightly job would.
struct RaiseWeightLimit<'a> {
    svc: &'a StampService,
    concept_id: String,
}

#[async_trait::async_trait(?Send)]
impl ScheduledTask for RaiseWeightLimit<'_> {
    fn name(&self) -> &str {
        "raise-weight-limit"
    }

    async fn execute(&self, ctx: &ActingContext) -> anyhow::Result<()> {
        let mut concept = self.svc.get_concept_numeric(&self.concept_id).await?;
        concept.hi_absolute = Some(75.0);
        let outcome = self.svc.save_concept_numeric(ctx, &mut concept).await?;
        anyhow::ensure!(outcome == SaveOutcome::Updated, "concept was not flushed");
        Ok(())
    }
}

#[tokio::test]
async fn daemon_task_can_modify_concept() {
    let (svc, clock) = service().await;
    let weight = saved_weight(&svc).await;
    let before = weight.date_changed();

    clock.advance(TimeDelta::minutes(10));
    let task = RaiseWeightLimit {
        svc: &svc,
        concept_id: weight.id.clone().unwrap(),
    };
    Daemon::execute_scheduled_task(&task).await.unwrap();

    let stored = svc
        .get_concept_numeric(weight.id.as_deref().unwrap())
        .await
        .unwrap();
    assert_eq!(stored.hi_absolute, Some(75.0));
    assert_eq!(stored.changed_by(), Some(&ActingIdentity::Daemon));
    assert_eq!(stored.creator(), Some(admin().identity()));
    assert_ne!(stored.date_changed(), before);
}

#[tokio::test]
async fn interleaved_transactions_keep_their_identities() {
    let (svc, _clock) = service().await;
    let mut a = User::new("alpha");
    let mut b = User::new("bravo");
    let admin_ctx = admin();
    let daemon_ctx = Daemon::context();

    let (ra, rb) = tokio::join!(
        svc.save_user(&admin_ctx, &mut a),
        svc.save_user(&daemon_ctx, &mut b),
    );
    ra.unwrap();
    rb.unwrap();

    let a = svc.get_user(a.id.as_deref().unwrap()).await.unwrap();
    let b = svc.get_user(b.id.as_deref().unwrap()).await.unwrap();
    assert_eq!(a.creator(), Some(admin_ctx.identity()));
    assert_eq!(b.creator(), Some(&ActingIdentity::Daemon));
}

// ---------------------------------------------------------------------------
// Config-driven open
// ---------------------------------------------------------------------------

#[tokio::test]
async fn open_from_config_persists_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = StampConfig::default();
    config.database.path = dir.path().join("stamp.db").to_string_lossy().into_owned();
    config.stamping.mirror_date_created = false;

    let historical = Utc.with_ymd_and_hms(1999, 12, 26, 0, 0, 0).unwrap();
    let id = {
        let svc = StampService::open(&config).await.unwrap();
        assert!(!svc.interceptor().policy().mirror_date_created);

        let mut user = User::new("on-disk");
        user.set_date_created(Some(historical));
        svc.save_user(&admin(), &mut user).await.unwrap();
        user.id.unwrap()
    };

    let svc = StampService::open(&config).await.unwrap();
    let stored = svc.get_user(&id).await.unwrap();
    assert_eq!(stored.creator(), Some(admin().identity()));
    assert_eq!(stored.system_id, "on-disk");
    assert_eq!(stored.date_created(), Some(historical));
    assert_ne!(stored.date_changed(), Some(historical));
}
