mod common;

use common::{config_of, router_with, simple};
use serde_json::{json, Value};
use tabroute_core::{
    BindingEntry, InMemoryHost, MatchKind, MatchMode, MemoryStateStore, Request, Response,
    RoutingOptions, TabGroupColor, TabRouter, WindowHost, WindowKind,
};

type Router = TabRouter<MemoryStateStore, InMemoryHost>;

fn call(router: &mut Router, request: Value) -> Value {
    let reply = router.handle_json(&request.to_string());
    serde_json::from_str(&reply).unwrap()
}

fn seeded_host() -> (InMemoryHost, i64, i64) {
    let mut host = InMemoryHost::new();
    let work = host.add_window(WindowKind::Normal);
    let other = host.add_window(WindowKind::Normal);
    host.open_tab(work, "https://jira.example", "Board").unwrap();
    host.open_tab(other, "https://news.example", "News").unwrap();
    host.open_tab(other, "https://jira.example/7", "Ticket 7").unwrap();
    (host, work, other)
}

#[test]
fn get_and_save_config_round_trip_over_json() {
    let mut router = router_with(InMemoryHost::new(), config_of(vec![]), RoutingOptions::default());

    let saved = call(
        &mut router,
        json!({
            "action": "saveConfig",
            "config": {"enabled": true, "groups": [{"name": "work", "patterns": ["jira"], "priority": 5}]}
        }),
    );
    assert_eq!(saved["type"], "config");
    assert_eq!(saved["data"]["groups"][0]["priority"], 0);

    let fetched = call(&mut router, json!({"action": "getConfig"}));
    assert_eq!(fetched["data"]["groups"][0]["name"], "work");
    assert_eq!(fetched["data"]["groups"][0]["mode"], "simple");
}

#[test]
fn bind_then_sort_over_requests() {
    let (host, work, other) = seeded_host();
    let mut router = router_with(
        host,
        config_of(vec![simple("work", &["jira"], 0)]),
        RoutingOptions::default(),
    );

    let bound = router.handle(Request::BindWindow {
        window_id: work,
        group: "work".to_string(),
    });
    assert_eq!(bound, Response::Ok);

    let sorted = call(&mut router, json!({"action": "sortAll"}));
    assert_eq!(sorted["type"], "sortReport");
    assert_eq!(sorted["data"]["moved"], 1);
    assert_eq!(sorted["data"]["errors"], json!([]));

    let windows = router.handle(Request::ListWindows);
    let Response::Windows(rows) = windows else {
        panic!("expected window rows, got {windows:?}");
    };
    let work_row = rows.iter().find(|row| row.id == work).unwrap();
    assert_eq!(work_row.tab_count, 2);
    assert_eq!(work_row.group.as_deref(), Some("work"));
    let other_row = rows.iter().find(|row| row.id == other).unwrap();
    assert_eq!(other_row.group, None);
}

#[test]
fn save_bindings_accepts_entry_list() {
    let (host, work, other) = seeded_host();
    let mut router = router_with(host, config_of(vec![]), RoutingOptions::default());

    let reply = call(
        &mut router,
        json!({
            "action": "saveBindings",
            "entries": [{"windowId": work, "group": "a"}, {"windowId": other, "group": "b"}]
        }),
    );
    assert_eq!(reply["type"], "ok");

    let response = router.handle(Request::GetBindings);
    let Response::Bindings(bindings) = response else {
        panic!("expected bindings, got {response:?}");
    };
    assert_eq!(bindings.get(&work).map(String::as_str), Some("a"));
    assert_eq!(bindings.get(&other).map(String::as_str), Some("b"));

    let entry: BindingEntry = serde_json::from_value(json!({"windowId": 3, "group": "c"})).unwrap();
    assert_eq!(entry.window_id, 3);
}

#[test]
fn active_window_reports_bound_group() {
    let (mut host, work, _) = seeded_host();
    host.focus_window(work).unwrap();
    let mut router = router_with(
        host,
        config_of(vec![simple("work", &["jira"], 0)]),
        RoutingOptions::default(),
    );
    router.bind_window(work, "work").unwrap();

    let reply = call(&mut router, json!({"action": "getActiveWindow"}));
    assert_eq!(reply["type"], "activeWindow");
    assert_eq!(reply["data"]["windowId"], work);
    assert_eq!(reply["data"]["group"], "work");
}

#[test]
fn preview_lists_matching_tabs_without_moving() {
    let (host, _, other) = seeded_host();
    let mut router = router_with(host, config_of(vec![]), RoutingOptions::default());

    let response = router.handle(Request::PreviewPatterns {
        patterns: vec!["ticket \\d+".to_string()],
        mode: MatchMode::Regex,
    });
    let Response::Preview(hits) = response else {
        panic!("expected preview, got {response:?}");
    };
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].window_id, other);
    assert_eq!(hits[0].kind, MatchKind::Title);
    assert_eq!(router.host().windows().unwrap()[1].tabs.len(), 2);
}

#[test]
fn flash_and_label_window() {
    let (host, work, _) = seeded_host();
    let mut router = router_with(
        host,
        config_of(vec![simple("work", &["jira"], 0)]),
        RoutingOptions::default(),
    );
    router.bind_window(work, "work").unwrap();

    assert_eq!(router.handle(Request::FlashWindow { window_id: work }), Response::Ok);
    assert_eq!(router.host().attention_requests(), &[work]);
    assert_eq!(router.host().focused_window().unwrap(), Some(work));

    let response = router.handle(Request::LabelWindow {
        window_id: work,
        title: None,
    });
    let Response::Label(label) = response else {
        panic!("expected label, got {response:?}");
    };
    assert_eq!(label.title, "work");
    assert_eq!(label.color, TabGroupColor::Grey);
}

#[test]
fn labeling_unbound_window_without_title_fails() {
    let (host, _, other) = seeded_host();
    let mut router = router_with(host, config_of(vec![]), RoutingOptions::default());

    let response = router.handle(Request::LabelWindow {
        window_id: other,
        title: None,
    });
    assert!(matches!(response, Response::Error { .. }));
}

#[test]
fn tab_events_are_routed_over_json() {
    let (host, work, other) = seeded_host();
    let mut router = router_with(
        host,
        config_of(vec![simple("work", &["jira"], 0)]),
        RoutingOptions::default(),
    );
    router.bind_window(work, "work").unwrap();
    let tab = router.host().windows().unwrap()[1].tabs[1].clone();
    assert_eq!(tab.window_id, other);

    let reply = call(
        &mut router,
        json!({
            "action": "tabNavigated",
            "tab": {"id": tab.id, "windowId": other, "url": tab.url, "title": tab.title}
        }),
    );
    assert_eq!(reply["type"], "route");
    assert_eq!(reply["data"]["outcome"], "moved");
    assert_eq!(reply["data"]["windowId"], work);

    let reply = call(&mut router, json!({"action": "windowRemoved", "windowId": work}));
    assert_eq!(reply["type"], "ok");
    assert!(router.bindings().unwrap().is_empty());
}

#[test]
fn malformed_requests_become_error_responses() {
    let mut router = router_with(InMemoryHost::new(), config_of(vec![]), RoutingOptions::default());

    let reply = call(&mut router, json!({"action": "launchRockets"}));
    assert_eq!(reply["type"], "error");
    assert!(reply["data"]["message"]
        .as_str()
        .unwrap()
        .starts_with("invalid request"));

    let reply = call(&mut router, json!({"action": "deleteGroup", "name": "ghost"}));
    assert_eq!(reply["type"], "error");
    assert!(reply["data"]["message"]
        .as_str()
        .unwrap()
        .starts_with("deleteGroup failed"));
}
