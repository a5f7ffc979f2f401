use rstest::rstest;
use tabshell::ipc_handler::{parse_chrome_message, parse_surface_message, ChromeIntent, MAX_MESSAGE_SIZE};
use tabshell::surface::{ManualNavigationKind, SurfaceEventKind, SurfaceId};
use tabshell::types::errors::IpcError;
use tabshell::types::message::NavigationAction;
use tabshell::types::tab::TabId;

// === Chrome messages ===

#[rstest]
#[case(r#"{"cmd":"ready"}"#, ChromeIntent::Ready)]
#[case(r#"{"cmd":"new_tab"}"#, ChromeIntent::NewTab { url: None })]
#[case(r#"{"cmd":"new_tab","url":"a.test"}"#, ChromeIntent::NewTab { url: Some("a.test".into()) })]
#[case(r#"{"cmd":"switch_tab","id":3}"#, ChromeIntent::SwitchTab(TabId(3)))]
#[case(r#"{"cmd":"close_tab","id":0}"#, ChromeIntent::CloseTab(TabId(0)))]
#[case(r#"{"cmd":"navigate","action":"back"}"#, ChromeIntent::Navigate(NavigationAction::Back))]
#[case(r#"{"cmd":"navigate","action":"forward"}"#, ChromeIntent::Navigate(NavigationAction::Forward))]
#[case(r#"{"cmd":"navigate","action":"reload"}"#, ChromeIntent::Navigate(NavigationAction::Reload))]
#[case(r#"{"cmd":"navigate","action":"home"}"#, ChromeIntent::Navigate(NavigationAction::Home))]
#[case(r#"{"cmd":"navigate_to","url":"example.com"}"#, ChromeIntent::NavigateTo("example.com".into()))]
#[case(r#"{"cmd":"open_devtools"}"#, ChromeIntent::OpenDevTools)]
#[case(r#"{"cmd":"minimize"}"#, ChromeIntent::Minimize)]
#[case(r#"{"cmd":"toggle_maximize"}"#, ChromeIntent::ToggleMaximize)]
#[case(r#"{"cmd":"close_window"}"#, ChromeIntent::CloseWindow)]
#[case(r#"{"cmd":"drag_window"}"#, ChromeIntent::DragWindow)]
#[case(r#"{"cmd":"open_in_browser"}"#, ChromeIntent::OpenInBrowser(None))]
#[case(r#"{"cmd":"update_clicked"}"#, ChromeIntent::UpdateClicked)]
#[case(r#"{"cmd":"check_update"}"#, ChromeIntent::CheckForUpdate)]
#[case(r#"{"cmd":"cancel_download"}"#, ChromeIntent::CancelDownload)]
fn test_chrome_commands(#[case] body: &str, #[case] expected: ChromeIntent) {
    assert_eq!(parse_chrome_message(body).unwrap(), expected);
}

#[test]
fn test_chrome_metrics_are_rounded() {
    let intent =
        parse_chrome_message(r#"{"cmd":"chrome_metrics","toolbarHeight":44.4,"tabBarHeight":35.6}"#).unwrap();
    assert_eq!(intent, ChromeIntent::ChromeMetrics { toolbar_height: 44, tab_bar_height: 36 });
}

#[test]
fn test_favicon_reports_carry_tab_and_url() {
    let intent =
        parse_chrome_message(r#"{"cmd":"favicon_loaded","id":2,"url":"https://a.test/i.png"}"#).unwrap();
    assert_eq!(
        intent,
        ChromeIntent::FaviconLoaded { tab_id: TabId(2), url: "https://a.test/i.png".into() }
    );
    let intent =
        parse_chrome_message(r#"{"cmd":"favicon_failed","id":2,"url":"https://a.test/i.png"}"#).unwrap();
    assert!(matches!(intent, ChromeIntent::FaviconFailed { tab_id: TabId(2), .. }));
}

#[rstest]
#[case("not json")]
#[case(r#"{"nocmd":true}"#)]
#[case(r#"{"cmd":"switch_tab"}"#)]
#[case(r#"{"cmd":"switch_tab","id":"3"}"#)]
#[case(r#"{"cmd":"navigate","action":"sideways"}"#)]
#[case(r#"{"cmd":"navigate_to"}"#)]
#[case(r#"{"cmd":"chrome_metrics","toolbarHeight":-4,"tabBarHeight":36}"#)]
fn test_malformed_chrome_messages(#[case] body: &str) {
    assert!(matches!(parse_chrome_message(body), Err(IpcError::Malformed(_))));
}

#[test]
fn test_unknown_chrome_command() {
    match parse_chrome_message(r#"{"cmd":"launch_rockets"}"#) {
        Err(IpcError::UnknownCommand(cmd)) => assert_eq!(cmd, "launch_rockets"),
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn test_oversized_message_is_rejected() {
    let body = format!(r#"{{"cmd":"navigate_to","url":"{}"}}"#, "a".repeat(MAX_MESSAGE_SIZE));
    assert!(matches!(parse_chrome_message(&body), Err(IpcError::Malformed(_))));
}

// === Surface bridge messages ===

#[rstest]
#[case("push", ManualNavigationKind::Push)]
#[case("replace", ManualNavigationKind::Replace)]
#[case("pop", ManualNavigationKind::Pop)]
fn test_manual_navigation_kinds(#[case] kind: &str, #[case] expected: ManualNavigationKind) {
    let body = format!(r#"{{"type":"manual_navigation","url":"https://a.test/p","kind":"{}"}}"#, kind);
    let event = parse_surface_message(SurfaceId(1), &body).unwrap();
    assert_eq!(
        event.kind,
        SurfaceEventKind::ManualNavigation { url: "https://a.test/p".into(), kind: expected }
    );
}

#[test]
fn test_manual_navigation_defaults_to_push() {
    let event =
        parse_surface_message(SurfaceId(1), r#"{"type":"manual_navigation","url":"https://a.test/"}"#).unwrap();
    assert!(matches!(
        event.kind,
        SurfaceEventKind::ManualNavigation { kind: ManualNavigationKind::Push, .. }
    ));
}

#[test]
fn test_payload_tab_id_is_ignored() {
    let event = parse_surface_message(
        SurfaceId(5),
        r#"{"type":"manual_navigation","url":"https://a.test/","tabId":0,"surface":9}"#,
    )
    .unwrap();
    assert_eq!(event.surface, SurfaceId(5));
}

#[test]
fn test_favicon_candidates_keep_strings_only() {
    let event = parse_surface_message(
        SurfaceId(2),
        r#"{"type":"favicon","candidates":["https://a.test/a.ico",7,null,"https://a.test/b.png"]}"#,
    )
    .unwrap();
    assert_eq!(
        event.kind,
        SurfaceEventKind::FaviconChanged {
            candidates: vec!["https://a.test/a.ico".into(), "https://a.test/b.png".into()]
        }
    );

    let event = parse_surface_message(SurfaceId(2), r#"{"type":"favicon"}"#).unwrap();
    assert_eq!(event.kind, SurfaceEventKind::FaviconChanged { candidates: vec![] });
}

#[rstest]
#[case(r#"{"type":"manual_navigation"}"#)]
#[case(r#"{"type":"manual_navigation","url":"https://a.test/","kind":"jump"}"#)]
#[case(r#"{"url":"https://a.test/"}"#)]
#[case("[]")]
fn test_malformed_surface_messages(#[case] body: &str) {
    assert!(matches!(parse_surface_message(SurfaceId(1), body), Err(IpcError::Malformed(_))));
}

#[test]
fn test_unknown_surface_message_type() {
    assert!(matches!(
        parse_surface_message(SurfaceId(1), r#"{"type":"open_window"}"#),
        Err(IpcError::UnknownCommand(_))
    ));
}
