use chrono::{Duration, Utc};
use elidune_portal::{
    models::ItemId,
    navigation::{
        HistoryDecision, LinkClick, LinkDecision, NavigationCommand, PendingNavigation,
        PromptChoice, UnloadDecision,
    },
    services::reading_request::SubmitOutcome,
};
use reqwest::Url;

use crate::support::{card, portal, ScriptedGateway};

#[tokio::test]
async fn test_stay_keeps_selection_and_view() {
    let state = portal(ScriptedGateway::instant()).await;
    let requests = &state.services.reading_requests;
    requests.select(ItemId(1), Some(card(0).as_ref()));
    requests.select(ItemId(2), Some(card(1).as_ref()));
    assert_eq!(state.session.selection().counter().read(), 2);

    let mut guard = state.navigation_guard("/reading-request").unwrap();
    assert_eq!(guard.on_link_click(&LinkClick::primary("/catalog")), LinkDecision::Blocked);
    assert!(matches!(guard.pending(), Some(PendingNavigation::Link(_))));

    assert_eq!(guard.resolve(PromptChoice::Stay), None);
    assert_eq!(guard.current().path(), "/reading-request");
    assert_eq!(state.session.selection().items(), vec![ItemId(1), ItemId(2)]);
    assert_eq!(guard.on_before_unload(), UnloadDecision::NativePrompt);
}

#[tokio::test]
async fn test_leave_anyway_from_history_then_navigate_freely() {
    let state = portal(ScriptedGateway::instant()).await;
    state.services.reading_requests.select(ItemId(4), None);

    let mut guard = state.navigation_guard("/reading-request").unwrap();
    let back = Url::parse("https://portal.example.org/catalog?q=dune").unwrap();

    let HistoryDecision::Reassert(reasserted) = guard.on_history_pop(back.clone()) else {
        panic!("armed guard must neutralize the traversal");
    };
    assert_eq!(reasserted.path(), "/reading-request");

    let command = guard.resolve(PromptChoice::LeaveAnyway);
    assert_eq!(command, Some(NavigationCommand::Traverse(back.clone())));
    assert_eq!(state.session.selection().counter().read(), 0);

    assert_eq!(guard.on_history_pop(back.clone()), HistoryDecision::PassThrough);
    assert_eq!(guard.current(), &back);
    assert_eq!(guard.on_link_click(&LinkClick::primary("/loans")), LinkDecision::PassThrough);
    assert_eq!(guard.on_before_unload(), UnloadDecision::PassThrough);
}

#[tokio::test]
async fn test_submission_disarms_guard() {
    let gateway = ScriptedGateway::instant();
    let state = portal(gateway.clone()).await;
    let requests = &state.services.reading_requests;
    requests.select(ItemId(8), None);
    requests.select(ItemId(3), None);

    let mut guard = state.navigation_guard("/reading-request").unwrap();
    assert!(guard.is_armed());

    let visit = Utc::now().date_naive() + Duration::days(2);
    let outcome = requests
        .submit(visit, Some("Reading room B".to_string()))
        .await
        .unwrap();

    assert!(matches!(outcome, SubmitOutcome::Submitted(_)));
    assert!(!guard.is_armed());
    assert_eq!(guard.on_link_click(&LinkClick::primary("/")), LinkDecision::PassThrough);

    let sent = gateway.requests();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].items, vec![ItemId(8), ItemId(3)]);
    assert_eq!(sent[0].note.as_deref(), Some("Reading room B"));
}

#[tokio::test]
async fn test_external_links_are_never_guarded() {
    let state = portal(ScriptedGateway::instant()).await;
    state.services.reading_requests.select(ItemId(1), None);

    let mut guard = state.navigation_guard("/reading-request").unwrap();
    assert_eq!(
        guard.on_link_click(&LinkClick::primary("https://www.openlibrary.org/")),
        LinkDecision::PassThrough
    );
    assert!(guard.pending().is_none());
}
