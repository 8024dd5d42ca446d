use elidune_portal::{
    error::PortalError,
    feedback::ToastPhase,
    models::{ItemId, Membership, NotificationKind},
    services::wishlist::{ToggleOutcome, WishlistService},
};
use std::sync::{Arc, Mutex};

use crate::support::{card, portal, Call, ScriptedGateway};

#[tokio::test]
async fn test_add_is_visible_before_server_confirms() {
    let x = ItemId(10);
    let gateway = ScriptedGateway::held().with_saved(&[ItemId(1), ItemId(2), ItemId(3)]);
    let state = portal(gateway.clone()).await;
    assert_eq!(state.session.wishlist_count().read(), 3);

    let wishlist = state.services.wishlist.clone();
    let task = tokio::spawn(async move { wishlist.toggle(x, Membership::NotSaved, Some(card(0))).await });

    let (call, responder) = gateway.next_call().await;
    assert_eq!(call, Call::Add(x));
    // Optimistic write happened before the request went out
    assert_eq!(state.session.wishlist_count().read(), 4);
    assert!(state.session.wishlist().membership(x).is_saved());
    assert!(state.session.wishlist().is_busy(x));

    responder.send(Ok(())).unwrap();
    let outcome = task.await.unwrap().unwrap();

    let particle = match outcome {
        ToggleOutcome::Committed { particle, .. } => particle,
        other => panic!("expected a committed toggle, got {:?}", other),
    };
    assert!(particle.is_some());
    assert_eq!(state.feedback.active_particles(), 1);

    state.feedback.advance_by(650);
    assert_eq!(state.feedback.active_particles(), 0);
    assert_eq!(state.session.wishlist_count().read(), 4);
    assert!(state.session.wishlist().membership(x).is_saved());
}

#[tokio::test]
async fn test_failed_remove_reverts_and_shows_error() {
    let y = ItemId(20);
    let gateway =
        ScriptedGateway::held().with_saved(&[y, ItemId(1), ItemId(2), ItemId(3), ItemId(4)]);
    let state = portal(gateway.clone()).await;
    assert_eq!(state.session.wishlist_count().read(), 5);

    let wishlist = state.services.wishlist.clone();
    let task = tokio::spawn(async move { wishlist.toggle(y, Membership::Saved, Some(card(1))).await });

    let (call, responder) = gateway.next_call().await;
    assert_eq!(call, Call::Remove(y));
    assert_eq!(state.session.wishlist_count().read(), 4);
    assert!(!state.session.wishlist().membership(y).is_saved());

    responder
        .send(Err(PortalError::Rejected {
            status: 500,
            message: "Wishlist unavailable".to_string(),
        }))
        .unwrap();
    let outcome = task.await.unwrap().unwrap();

    assert!(matches!(outcome, ToggleOutcome::RolledBack { .. }));
    assert_eq!(state.session.wishlist_count().read(), 5);
    assert!(state.session.wishlist().membership(y).is_saved());
    assert_eq!(state.feedback.active_particles(), 0);

    state.feedback.advance_by(900);
    let toast = state.feedback.toast();
    assert_eq!(toast.phase, ToastPhase::Expanded);
    let notification = toast.notification.unwrap();
    assert_eq!(notification.kind, NotificationKind::Error);
    assert_eq!(notification.detail.as_deref(), Some("Wishlist unavailable"));
}

#[tokio::test]
async fn test_counter_matches_saved_items_after_successful_toggles() {
    let gateway = ScriptedGateway::instant();
    let state = portal(gateway).await;
    let wishlist = &state.services.wishlist;

    let sequence = [1, 2, 3, 2, 4, 1, 5, 2, 3, 3];
    for id in sequence {
        let outcome = wishlist.toggle_item(ItemId(id), Some(card(0))).await.unwrap();
        assert!(matches!(outcome, ToggleOutcome::Committed { .. }));
        assert_eq!(
            state.session.wishlist_count().read() as usize,
            state.session.wishlist().saved_count()
        );
    }
    assert_eq!(
        state.session.wishlist().saved_items(),
        vec![ItemId(2), ItemId(4), ItemId(5)]
    );
}

#[tokio::test]
async fn test_failed_toggles_restore_exact_state() {
    let gateway = ScriptedGateway::instant().with_saved(&[ItemId(1), ItemId(2)]);
    gateway.fail_for(ItemId(1));
    gateway.fail_for(ItemId(9));
    let state = portal(gateway).await;
    let wishlist = &state.services.wishlist;

    for id in [ItemId(1), ItemId(9)] {
        let before = (
            state.session.wishlist_count().read(),
            state.session.wishlist().membership(id),
        );
        let outcome = wishlist.toggle_item(id, None).await.unwrap();
        assert!(matches!(outcome, ToggleOutcome::RolledBack { .. }));
        let after = (
            state.session.wishlist_count().read(),
            state.session.wishlist().membership(id),
        );
        assert_eq!(before, after);
    }
}

#[tokio::test]
async fn test_same_item_toggle_is_refused_while_in_flight() {
    let item = ItemId(3);
    let gateway = ScriptedGateway::held();
    let state = portal(gateway.clone()).await;

    let wishlist = state.services.wishlist.clone();
    let task = tokio::spawn(async move { wishlist.toggle(item, Membership::NotSaved, None).await });
    let (_, responder) = gateway.next_call().await;

    let err = state
        .services
        .wishlist
        .toggle(item, Membership::Saved, None)
        .await
        .unwrap_err();
    assert!(matches!(err, PortalError::Busy(id) if id == item));
    assert_eq!(state.session.wishlist_count().read(), 1);

    responder.send(Ok(())).unwrap();
    task.await.unwrap().unwrap();
    assert!(!state.session.wishlist().is_busy(item));
    assert_eq!(state.session.wishlist_count().read(), 1);
}

#[tokio::test]
async fn test_concurrent_toggles_settle_independently() {
    let gateway = ScriptedGateway::held();
    let state = portal(gateway.clone()).await;

    let landed = Arc::new(Mutex::new(Vec::new()));
    let recorder = landed.clone();
    let wishlist: WishlistService = state
        .services
        .wishlist
        .clone()
        .on_particle_landed(move |id| recorder.lock().unwrap().push(id));

    let first = {
        let wishlist = wishlist.clone();
        tokio::spawn(async move { wishlist.toggle(ItemId(1), Membership::NotSaved, Some(card(0))).await })
    };
    let (_, first_responder) = gateway.next_call().await;
    let second = {
        let wishlist = wishlist.clone();
        tokio::spawn(async move { wishlist.toggle(ItemId(2), Membership::NotSaved, Some(card(1))).await })
    };
    let (_, second_responder) = gateway.next_call().await;
    let third = {
        let wishlist = wishlist.clone();
        tokio::spawn(async move { wishlist.toggle(ItemId(3), Membership::NotSaved, Some(card(2))).await })
    };
    let (_, third_responder) = gateway.next_call().await;
    assert_eq!(state.session.wishlist_count().read(), 3);

    // Answer out of order; the middle one fails
    third_responder.send(Ok(())).unwrap();
    third.await.unwrap().unwrap();
    state.feedback.advance_by(100);
    second_responder
        .send(Err(PortalError::Network("timeout".to_string())))
        .unwrap();
    second.await.unwrap().unwrap();
    first_responder.send(Ok(())).unwrap();
    first.await.unwrap().unwrap();

    assert_eq!(state.session.wishlist_count().read(), 2);
    assert_eq!(state.session.wishlist().saved_items(), vec![ItemId(1), ItemId(3)]);
    assert_eq!(state.feedback.active_particles(), 2);

    state.feedback.advance_by(550);
    assert_eq!(landed.lock().unwrap().len(), 1);
    state.feedback.advance_by(100);
    assert_eq!(landed.lock().unwrap().len(), 2);
    state.feedback.advance_by(5_000);
    assert_eq!(landed.lock().unwrap().len(), 2);
}
