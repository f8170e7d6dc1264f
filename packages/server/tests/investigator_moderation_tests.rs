//! Investigator moderation lifecycle tests
//!
//! Covers the approve/delete cascades end to end against a real Postgres:
//! exactly-once approval, the release of assigned requests on deletion,
//! pairing-record cleanup, and the archived-identity rewrite.

mod common;

use common::*;
use server_core::common::Role;
use server_core::domains::moderation::{actions, ModerationError};
use server_core::domains::requests::actions as request_actions;

#[tokio::test]
async fn approve_pending_investigator_succeeds() {
    let harness = TestHarness::new().await.unwrap();
    let admin = create_admin(&harness.db_pool).await.unwrap();
    let (_, profile) = create_investigator(&harness.db_pool, "pending").await.unwrap();

    let approved = actions::approve_investigator(
        admin.id,
        Role::Admin,
        profile.id,
        Some("ok".to_string()),
        &harness.deps,
    )
    .await
    .unwrap();

    assert_eq!(approved.status, "approved");
    assert_eq!(approved.review_note.as_deref(), Some("ok"));
    assert!(approved.reviewed_at.is_some());
    assert_eq!(approved.reviewed_by_id, Some(admin.id.into_uuid()));
}

#[tokio::test]
async fn approve_twice_fails_already_approved_without_restamping() {
    let harness = TestHarness::new().await.unwrap();
    let admin = create_admin(&harness.db_pool).await.unwrap();
    let (_, profile) = create_investigator(&harness.db_pool, "pending").await.unwrap();

    let first = actions::approve_investigator(
        admin.id,
        Role::Admin,
        profile.id,
        Some("ok".to_string()),
        &harness.deps,
    )
    .await
    .unwrap();

    let err = actions::approve_investigator(admin.id, Role::Admin, profile.id, None, &harness.deps)
        .await
        .unwrap_err();
    assert!(matches!(err, ModerationError::AlreadyApproved));

    // Still approved, and the original review stamp was not re-applied
    let after = fetch_investigator_any(&harness.db_pool, profile.id).await.unwrap();
    assert_eq!(after.status, "approved");
    assert_eq!(after.reviewed_at, first.reviewed_at);
    assert_eq!(after.review_note.as_deref(), Some("ok"));
}

#[tokio::test]
async fn approve_unknown_investigator_fails_not_found() {
    let harness = TestHarness::new().await.unwrap();
    let admin = create_admin(&harness.db_pool).await.unwrap();

    let err = actions::approve_investigator(
        admin.id,
        Role::Admin,
        server_core::common::InvestigatorId::new(),
        None,
        &harness.deps,
    )
    .await
    .unwrap_err();

    assert!(matches!(err, ModerationError::NotFound(_)));
}

#[tokio::test]
async fn approve_rejected_investigator_is_invalid_transition() {
    let harness = TestHarness::new().await.unwrap();
    let admin = create_admin(&harness.db_pool).await.unwrap();
    let (_, profile) = create_investigator(&harness.db_pool, "rejected").await.unwrap();

    let err = actions::approve_investigator(admin.id, Role::Admin, profile.id, None, &harness.deps)
        .await
        .unwrap_err();

    assert!(matches!(err, ModerationError::InvalidTransition(_)));
}

#[tokio::test]
async fn delete_investigator_releases_assigned_requests_only() {
    let harness = TestHarness::new().await.unwrap();
    let admin = create_admin(&harness.db_pool).await.unwrap();
    let (user, profile) = create_investigator(&harness.db_pool, "approved").await.unwrap();
    let (customer, _) = create_customer(&harness.db_pool).await.unwrap();

    // One request assigned to the profile, one still matching without it
    let assigned = create_request(&harness.db_pool, customer.id, "Find my lost cat")
        .await
        .unwrap();
    assign_request_fixture(&harness.db_pool, assigned.id, profile.id)
        .await
        .unwrap();
    let unassigned = create_request(&harness.db_pool, customer.id, "Background check")
        .await
        .unwrap();

    let result = actions::delete_investigator(admin.id, Role::Admin, profile.id, &harness.deps)
        .await
        .unwrap();

    assert_eq!(result.released_request_ids, vec![assigned.id.into_uuid()]);

    // Assigned request went back to matching with the reference cleared
    let released = fetch_request(&harness.db_pool, assigned.id).await.unwrap();
    assert_eq!(released.status, "matching");
    assert_eq!(released.investigator_id, None);

    // The untouched request is unchanged
    let other = fetch_request(&harness.db_pool, unassigned.id).await.unwrap();
    assert_eq!(other.status, "matching");
    assert_eq!(other.investigator_id, None);

    // No pairing records survive the cascade
    let matches = count_matches_for_investigator(&harness.db_pool, profile.id)
        .await
        .unwrap();
    assert_eq!(matches, 0);

    // No requests remain assigned to the profile
    let still_assigned = server_core::domains::requests::models::InvestigationRequest::find_assigned_to(
        profile.id.into_uuid(),
        &harness.db_pool,
    )
    .await
    .unwrap();
    assert!(still_assigned.is_empty());

    // Profile was rejected and archived together with its owning user
    let archived = fetch_investigator_any(&harness.db_pool, profile.id).await.unwrap();
    assert_eq!(archived.status, "rejected");
    assert!(archived.deleted_at.is_some());

    // The live lookup no longer sees the profile
    let lookup = server_core::domains::investigators::models::InvestigatorProfile::find_by_id(
        profile.id,
        &harness.db_pool,
    )
    .await
    .unwrap();
    assert!(lookup.is_none());

    let archived_user = fetch_user_any(&harness.db_pool, user.id).await.unwrap();
    assert!(archived_user.deleted_at.is_some());
    assert_ne!(archived_user.email, user.email);
    assert!(archived_user.email.contains("#deleted-"));
}

#[tokio::test]
async fn delete_investigator_twice_fails_not_found() {
    let harness = TestHarness::new().await.unwrap();
    let admin = create_admin(&harness.db_pool).await.unwrap();
    let (_, profile) = create_investigator(&harness.db_pool, "approved").await.unwrap();

    actions::delete_investigator(admin.id, Role::Admin, profile.id, &harness.deps)
        .await
        .unwrap();

    let err = actions::delete_investigator(admin.id, Role::Admin, profile.id, &harness.deps)
        .await
        .unwrap_err();
    assert!(matches!(err, ModerationError::NotFound(_)));
}

#[tokio::test]
async fn delete_already_rejected_profile_is_allowed() {
    let harness = TestHarness::new().await.unwrap();
    let admin = create_admin(&harness.db_pool).await.unwrap();
    let (_, profile) = create_investigator(&harness.db_pool, "rejected").await.unwrap();

    let result =
        actions::delete_investigator(admin.id, Role::Admin, profile.id, &harness.deps).await;
    assert!(result.is_ok());

    let archived = fetch_investigator_any(&harness.db_pool, profile.id).await.unwrap();
    assert_eq!(archived.status, "rejected");
    assert!(archived.deleted_at.is_some());
}

#[tokio::test]
async fn deleted_investigator_cannot_be_approved() {
    let harness = TestHarness::new().await.unwrap();
    let admin = create_admin(&harness.db_pool).await.unwrap();
    let (_, profile) = create_investigator(&harness.db_pool, "pending").await.unwrap();

    actions::delete_investigator(admin.id, Role::Admin, profile.id, &harness.deps)
        .await
        .unwrap();

    let err = actions::approve_investigator(admin.id, Role::Admin, profile.id, None, &harness.deps)
        .await
        .unwrap_err();
    assert!(matches!(err, ModerationError::NotFound(_)));
}

#[tokio::test]
async fn non_admin_cannot_moderate_investigators() {
    let harness = TestHarness::new().await.unwrap();
    let (customer, _) = create_customer(&harness.db_pool).await.unwrap();
    let (_, profile) = create_investigator(&harness.db_pool, "pending").await.unwrap();

    let err = actions::approve_investigator(
        customer.id,
        Role::Customer,
        profile.id,
        None,
        &harness.deps,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ModerationError::Forbidden(_)));

    let err = actions::delete_investigator(customer.id, Role::Customer, profile.id, &harness.deps)
        .await
        .unwrap_err();
    assert!(matches!(err, ModerationError::Forbidden(_)));

    // The profile was not touched
    let untouched = fetch_investigator_any(&harness.db_pool, profile.id).await.unwrap();
    assert_eq!(untouched.status, "pending");
    assert!(untouched.deleted_at.is_none());
}

#[tokio::test]
async fn deleting_investigator_mid_flight_releases_later_assignment() {
    // Assign, then delete: the delete cascade must undo the assignment it
    // can see, leaving no dangling reference.
    let harness = TestHarness::new().await.unwrap();
    let admin = create_admin(&harness.db_pool).await.unwrap();
    let (_, profile) = create_investigator(&harness.db_pool, "approved").await.unwrap();
    let (customer, _) = create_customer(&harness.db_pool).await.unwrap();
    let request = create_request(&harness.db_pool, customer.id, "Locate a debtor")
        .await
        .unwrap();

    request_actions::assign_request(admin.id, Role::Admin, request.id, profile.id, &harness.deps)
        .await
        .unwrap();

    actions::delete_investigator(admin.id, Role::Admin, profile.id, &harness.deps)
        .await
        .unwrap();

    let released = fetch_request(&harness.db_pool, request.id).await.unwrap();
    assert_eq!(released.status, "matching");
    assert_eq!(released.investigator_id, None);
    assert_eq!(
        count_matches_for_investigator(&harness.db_pool, profile.id)
            .await
            .unwrap(),
        0
    );
}
