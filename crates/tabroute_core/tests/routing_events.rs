mod common;

use common::{config_of, router_with, simple, window_of, FlakyHost};
use tabroute_core::{
    Config, Group, InMemoryHost, MatchMode, MatchPolicy, RouteOutcome, RoutingOptions, Tab,
    WindowHost, WindowKind,
};

fn current(host: &impl WindowHost, tab_id: i64) -> Tab {
    host.tab(tab_id).unwrap().expect("tab should exist")
}

fn two_groups() -> Config {
    config_of(vec![simple("work", &["jira"], 0), simple("mail", &["mail"], 1)])
}

#[test]
fn navigation_moves_tab_into_bound_window() {
    let mut host = InMemoryHost::new();
    let work = host.add_window(WindowKind::Normal);
    let other = host.add_window(WindowKind::Normal);
    host.open_tab(work, "https://jira.example", "Board").unwrap();
    host.open_tab(other, "https://news.example", "News").unwrap();
    let tab = host.open_tab(other, "about:blank", "New Tab").unwrap();

    let mut router = router_with(host, two_groups(), RoutingOptions::default());
    router.bind_window(work, "work").unwrap();

    router
        .host_mut()
        .navigate(tab, "https://jira.example/1", "Ticket")
        .unwrap();
    let snapshot = current(router.host(), tab);
    let outcome = router.on_tab_navigated(&snapshot).unwrap();

    assert_eq!(
        outcome,
        RouteOutcome::Moved {
            group: "work".to_string(),
            window_id: work
        }
    );
    assert_eq!(window_of(router.host(), tab), Some(work));
    assert_eq!(router.host().focused_window().unwrap(), Some(work));
}

#[test]
fn tab_already_home_is_left_alone() {
    let mut host = InMemoryHost::new();
    let work = host.add_window(WindowKind::Normal);
    let tab = host.open_tab(work, "https://jira.example", "Board").unwrap();

    let mut router = router_with(host, two_groups(), RoutingOptions::default());
    router.bind_window(work, "work").unwrap();

    let snapshot = current(router.host(), tab);
    assert_eq!(
        router.on_tab_created(&snapshot).unwrap(),
        RouteOutcome::AlreadyHome { window_id: work }
    );
}

#[test]
fn internal_urls_and_disabled_config_are_ignored() {
    let mut host = InMemoryHost::new();
    let window = host.add_window(WindowKind::Normal);
    let internal = host.open_tab(window, "chrome://newtab", "jira").unwrap();
    let normal = host.open_tab(window, "https://jira.example", "Board").unwrap();

    let mut router = router_with(host, two_groups(), RoutingOptions::default());
    let snapshot = current(router.host(), internal);
    assert_eq!(router.on_tab_created(&snapshot).unwrap(), RouteOutcome::Ignored);

    let mut disabled = two_groups();
    disabled.enabled = false;
    router.save_config(disabled).unwrap();
    let snapshot = current(router.host(), normal);
    assert_eq!(router.on_tab_navigated(&snapshot).unwrap(), RouteOutcome::Ignored);
    assert_eq!(window_of(router.host(), normal), Some(window));
}

#[test]
fn unbound_group_creates_and_binds_window() {
    let mut host = InMemoryHost::new();
    let window = host.add_window(WindowKind::Normal);
    host.open_tab(window, "https://news.example", "News").unwrap();
    let tab = host.open_tab(window, "https://mail.example", "Inbox").unwrap();

    let mut router = router_with(host, two_groups(), RoutingOptions::default());
    let snapshot = current(router.host(), tab);
    let outcome = router.on_tab_navigated(&snapshot).unwrap();

    let RouteOutcome::CreatedWindow { group, window_id } = outcome else {
        panic!("expected a created window, got {outcome:?}");
    };
    assert_eq!(group, "mail");
    assert_ne!(window_id, window);
    assert_eq!(window_of(router.host(), tab), Some(window_id));
    assert_eq!(router.bindings().unwrap().get(&window_id).map(String::as_str), Some("mail"));
}

#[test]
fn unbound_group_stays_put_when_creation_is_off() {
    let mut host = InMemoryHost::new();
    let window = host.add_window(WindowKind::Normal);
    let tab = host.open_tab(window, "https://mail.example", "Inbox").unwrap();

    let options = RoutingOptions {
        create_window_on_unbound_match: false,
        ..RoutingOptions::default()
    };
    let mut router = router_with(host, two_groups(), options);
    let snapshot = current(router.host(), tab);

    assert_eq!(
        router.on_tab_navigated(&snapshot).unwrap(),
        RouteOutcome::LeftInPlace {
            group: "mail".to_string()
        }
    );
    assert_eq!(router.host().windows().unwrap().len(), 1);
}

#[test]
fn unmatched_tab_goes_to_catch_all_window() {
    let mut host = InMemoryHost::new();
    let catch_all = host.add_window(WindowKind::Normal);
    let other = host.add_window(WindowKind::Normal);
    host.open_tab(catch_all, "https://misc.example", "Misc").unwrap();
    host.open_tab(other, "https://jira.example", "Board").unwrap();
    let tab = host.open_tab(other, "https://news.example", "News").unwrap();

    let mut config = two_groups();
    config.catch_all_window_id = Some(catch_all);
    let mut router = router_with(host, config, RoutingOptions::default());

    let snapshot = current(router.host(), tab);
    assert_eq!(
        router.on_tab_navigated(&snapshot).unwrap(),
        RouteOutcome::MovedToCatchAll {
            window_id: catch_all
        }
    );
    assert_eq!(window_of(router.host(), tab), Some(catch_all));
}

#[test]
fn missing_catch_all_window_leaves_tab() {
    let mut host = InMemoryHost::new();
    let window = host.add_window(WindowKind::Normal);
    let tab = host.open_tab(window, "https://news.example", "News").unwrap();

    let mut config = two_groups();
    config.catch_all_window_id = Some(4242);
    let mut router = router_with(host, config, RoutingOptions::default());

    let snapshot = current(router.host(), tab);
    assert_eq!(
        router.on_tab_navigated(&snapshot).unwrap(),
        RouteOutcome::CatchAllMissing { window_id: 4242 }
    );
    assert_eq!(window_of(router.host(), tab), Some(window));
}

#[test]
fn unmatched_tab_without_catch_all_is_no_match() {
    let mut host = InMemoryHost::new();
    let window = host.add_window(WindowKind::Normal);
    let tab = host.open_tab(window, "https://news.example", "News").unwrap();

    let mut router = router_with(host, two_groups(), RoutingOptions::default());
    let snapshot = current(router.host(), tab);
    assert_eq!(router.on_tab_navigated(&snapshot).unwrap(), RouteOutcome::NoMatch);
}

#[test]
fn failed_move_is_reported_as_outcome() {
    let mut inner = InMemoryHost::new();
    let work = inner.add_window(WindowKind::Normal);
    let other = inner.add_window(WindowKind::Normal);
    inner.open_tab(work, "https://jira.example", "Board").unwrap();
    let tab = inner.open_tab(other, "https://jira.example/9", "Ticket").unwrap();
    let host = FlakyHost::new(inner, &[tab]);

    let mut router = router_with(host, two_groups(), RoutingOptions::default());
    router.bind_window(work, "work").unwrap();

    let snapshot = current(router.host(), tab);
    let outcome = router.on_tab_navigated(&snapshot).unwrap();
    assert!(matches!(
        outcome,
        RouteOutcome::MoveFailed { window_id, .. } if window_id == work
    ));
    assert_eq!(window_of(router.host(), tab), Some(other));
}

#[test]
fn title_match_beats_url_match_by_default() {
    let mut host = InMemoryHost::new();
    let work = host.add_window(WindowKind::Normal);
    let mail = host.add_window(WindowKind::Normal);
    let other = host.add_window(WindowKind::Normal);
    host.open_tab(work, "https://jira.example", "Board").unwrap();
    host.open_tab(mail, "https://mail.example", "Inbox").unwrap();
    host.open_tab(other, "https://news.example", "News").unwrap();
    // URL says work, title says mail.
    let tab = host
        .open_tab(other, "https://jira.example/share", "mail digest")
        .unwrap();

    let mut router = router_with(host.clone(), two_groups(), RoutingOptions::default());
    router.bind_window(work, "work").unwrap();
    router.bind_window(mail, "mail").unwrap();
    let snapshot = current(router.host(), tab);
    assert_eq!(
        router.on_tab_navigated(&snapshot).unwrap(),
        RouteOutcome::Moved {
            group: "mail".to_string(),
            window_id: mail
        }
    );

    let options = RoutingOptions {
        policy: MatchPolicy::PriorityOrder,
        ..RoutingOptions::default()
    };
    let mut router = router_with(host, two_groups(), options);
    router.bind_window(work, "work").unwrap();
    router.bind_window(mail, "mail").unwrap();
    let snapshot = current(router.host(), tab);
    assert_eq!(
        router.on_tab_navigated(&snapshot).unwrap(),
        RouteOutcome::Moved {
            group: "work".to_string(),
            window_id: work
        }
    );
}

#[test]
fn stale_binding_is_healed_before_routing() {
    let mut host = InMemoryHost::new();
    let window = host.add_window(WindowKind::Normal);
    host.open_tab(window, "https://news.example", "News").unwrap();
    let tab = host.open_tab(window, "https://jira.example", "Board").unwrap();

    let mut router = router_with(host, two_groups(), RoutingOptions::default());
    router.bind_window(777, "work").unwrap();

    let snapshot = current(router.host(), tab);
    let outcome = router.on_tab_navigated(&snapshot).unwrap();

    assert!(matches!(outcome, RouteOutcome::CreatedWindow { .. }));
    assert!(!router.bindings().unwrap().contains_key(&777));
}

#[test]
fn window_removal_drops_binding() {
    let mut host = InMemoryHost::new();
    let work = host.add_window(WindowKind::Normal);
    host.open_tab(work, "https://jira.example", "Board").unwrap();

    let mut router = router_with(host, two_groups(), RoutingOptions::default());
    router.bind_window(work, "work").unwrap();
    router.host_mut().close_window(work).unwrap();

    assert_eq!(router.on_window_removed(work).unwrap().as_deref(), Some("work"));
    assert!(router.bindings().unwrap().is_empty());
    assert_eq!(router.on_window_removed(work).unwrap(), None);
}

#[test]
fn unmatched_tab_already_in_catch_all_stays() {
    let mut host = InMemoryHost::new();
    let catch_all = host.add_window(WindowKind::Normal);
    host.open_tab(catch_all, "https://misc.example", "Misc").unwrap();
    let tab = host.open_tab(catch_all, "https://news.example", "News").unwrap();

    let mut config = two_groups();
    config.catch_all_window_id = Some(catch_all);
    let mut router = router_with(host, config, RoutingOptions::default());

    let snapshot = current(router.host(), tab);
    assert_eq!(
        router.on_tab_navigated(&snapshot).unwrap(),
        RouteOutcome::AlreadyHome {
            window_id: catch_all
        }
    );
    let window = &router.host().windows().unwrap()[0];
    assert_eq!(window.tabs.last().map(|tab| tab.id), Some(tab));
}

#[test]
fn invalid_regex_pattern_does_not_block_routing() {
    let mut host = InMemoryHost::new();
    let home = host.add_window(WindowKind::Normal);
    let other = host.add_window(WindowKind::Normal);
    host.open_tab(home, "https://foo.example", "Foo").unwrap();
    host.open_tab(other, "https://news.example", "News").unwrap();
    let tab = host.open_tab(other, "https://foo.example/2", "Second").unwrap();

    let config = config_of(vec![Group::new("foo", &["(((", "foo"], 0, MatchMode::Regex)]);
    let mut router = router_with(host, config, RoutingOptions::default());
    router.bind_window(home, "foo").unwrap();

    let snapshot = current(router.host(), tab);
    assert_eq!(
        router.on_tab_navigated(&snapshot).unwrap(),
        RouteOutcome::Moved {
            group: "foo".to_string(),
            window_id: home
        }
    );
}
