use rstest::rstest;
use tabshell::services::update_coordinator::{
    build_download_url, is_newer_version, parse_release_feed, select_artifact, UpdateCoordinator,
};
use tabshell::types::config::UpdateSettings;
use tabshell::types::errors::UpdateError;
use tabshell::types::message::UiEvent;
use tabshell::types::update::{ArtifactDescriptor, DownloadOutcome, Platform, ReleaseFeed, UpdateStatus};
use tempfile::TempDir;
use tokio::sync::watch;

fn artifact(name: &str) -> ArtifactDescriptor {
    ArtifactDescriptor {
        name: name.to_string(),
        url: format!("https://dl.test/{}", name),
    }
}

fn feed(version: &str, names: &[&str]) -> ReleaseFeed {
    ReleaseFeed {
        version: version.to_string(),
        artifacts: names.iter().map(|n| artifact(n)).collect(),
    }
}

fn settings() -> UpdateSettings {
    UpdateSettings {
        owner: "acme".into(),
        repo: "tabshell".into(),
        ..UpdateSettings::default()
    }
}

#[test]
fn test_parse_github_release() {
    let feed = parse_release_feed(
        r#"{"tag_name":"v1.4.0","name":"1.4","assets":[
            {"name":"TabShell-1.4.0.dmg","browser_download_url":"https://dl.test/TabShell-1.4.0.dmg","size":10}
        ]}"#,
    )
    .unwrap();
    assert_eq!(feed.version, "1.4.0");
    assert_eq!(feed.artifacts, vec![artifact("TabShell-1.4.0.dmg")]);
}

#[test]
fn test_parse_release_without_assets() {
    let feed = parse_release_feed(r#"{"tag_name":"2.0.0"}"#).unwrap();
    assert!(feed.artifacts.is_empty());
}

#[rstest]
#[case("not json")]
#[case(r#"{"assets":[]}"#)]
#[case(r#"{"tag_name":"v"}"#)]
fn test_parse_rejects_bad_feeds(#[case] body: &str) {
    assert!(matches!(parse_release_feed(body), Err(UpdateError::Parse(_))));
}

#[rstest]
#[case("1.0.0", "1.0.1", true)]
#[case("1.0.0", "v2.0", true)]
#[case("1.10.0", "1.9.9", false)]
#[case("1.2.0", "1.2.0", false)]
#[case("0.1.0", "0.1.0-beta", false)]
fn test_version_comparison(#[case] current: &str, #[case] latest: &str, #[case] newer: bool) {
    assert_eq!(is_newer_version(current, latest), newer);
}

#[rstest]
#[case(Platform::MacOs, &["a.zip", "a.dmg", "a.exe"], Some("a.dmg"))]
#[case(Platform::MacOs, &["a.ZIP", "a.exe"], Some("a.ZIP"))]
#[case(Platform::Windows, &["a.msi", "a.exe"], Some("a.exe"))]
#[case(Platform::Windows, &["a.msi", "a.dmg"], Some("a.msi"))]
#[case(Platform::Windows, &["a.dmg", "a.AppImage"], None)]
fn test_select_artifact(
    #[case] platform: Platform,
    #[case] names: &[&str],
    #[case] expected: Option<&str>,
) {
    let artifacts: Vec<_> = names.iter().map(|n| artifact(n)).collect();
    let selected = select_artifact(&platform, &artifacts).unwrap();
    assert_eq!(selected.map(|a| a.name.as_str()), expected);
}

#[rstest]
#[case(Platform::Linux)]
#[case(Platform::Other("freebsd".into()))]
fn test_select_artifact_unsupported_platform(#[case] platform: Platform) {
    let artifacts = vec![artifact("a.dmg")];
    assert!(matches!(
        select_artifact(&platform, &artifacts),
        Err(UpdateError::UnsupportedPlatform(_))
    ));
}

#[test]
fn test_select_artifact_falls_back_to_url_when_name_empty() {
    let artifacts = vec![ArtifactDescriptor {
        name: String::new(),
        url: "https://dl.test/TabShell.exe".into(),
    }];
    let selected = select_artifact(&Platform::Windows, &artifacts).unwrap();
    assert!(selected.is_some());
}

#[test]
fn test_build_download_url() {
    assert_eq!(
        build_download_url("acme", "tabshell", "1.2.0", &artifact("a.dmg")),
        "https://dl.test/a.dmg"
    );
    let relative = ArtifactDescriptor {
        name: "TabShell.dmg".into(),
        url: "TabShell.dmg".into(),
    };
    assert_eq!(
        build_download_url("acme", "tabshell", "v1.2.0", &relative),
        "https://github.com/acme/tabshell/releases/download/v1.2.0/TabShell.dmg"
    );
}

#[test]
fn test_evaluate_offers_matching_artifact() {
    let coordinator = UpdateCoordinator::with_platform(settings(), Platform::Windows, "1.0.0");
    let status = coordinator.evaluate(&feed("1.1.0", &["TabShell.dmg", "TabShell.exe"]));
    assert_eq!(
        status,
        UpdateStatus::Available {
            version: "1.1.0".into(),
            download_url: "https://dl.test/TabShell.exe".into(),
        }
    );
    assert_eq!(
        status.into_event(),
        UiEvent::UpdateAvailable {
            version: "1.1.0".into(),
            download_url: "https://dl.test/TabShell.exe".into(),
        }
    );
}

#[test]
fn test_evaluate_without_match_is_not_available() {
    let coordinator = UpdateCoordinator::with_platform(settings(), Platform::MacOs, "1.0.0");
    let status = coordinator.evaluate(&feed("1.1.0", &["TabShell.exe", "TabShell.AppImage"]));
    assert_eq!(status, UpdateStatus::NotAvailable);
    assert_eq!(status.into_event(), UiEvent::UpdateNotAvailable);
}

#[test]
fn test_evaluate_same_version_is_not_available() {
    let coordinator = UpdateCoordinator::with_platform(settings(), Platform::MacOs, "1.1.0");
    assert_eq!(coordinator.evaluate(&feed("1.1.0", &["TabShell.dmg"])), UpdateStatus::NotAvailable);
}

#[test]
fn test_evaluate_on_unsupported_platform_is_not_available() {
    let coordinator = UpdateCoordinator::with_platform(settings(), Platform::Linux, "0.1.0");
    assert_eq!(coordinator.evaluate(&feed("9.0.0", &["TabShell.dmg"])), UpdateStatus::NotAvailable);
}

#[test]
fn test_feed_url_and_interval() {
    let mut s = settings();
    s.api_base = "https://ghe.test/api/".into();
    s.check_interval_secs = 0;
    let coordinator = UpdateCoordinator::with_platform(s, Platform::MacOs, "1.0.0");
    assert_eq!(coordinator.feed_url(), "https://ghe.test/api/repos/acme/tabshell/releases/latest");
    assert_eq!(coordinator.check_interval().as_secs(), 1);
    assert!(!coordinator.auto_download());
}

#[tokio::test]
async fn test_unconfigured_check_is_not_available() {
    let coordinator =
        UpdateCoordinator::with_platform(UpdateSettings::default(), Platform::MacOs, "1.0.0");
    assert_eq!(coordinator.check().await, UpdateStatus::NotAvailable);
}

#[tokio::test]
async fn test_download_canceled_before_start() {
    let dir = TempDir::new().unwrap();
    let coordinator = UpdateCoordinator::with_platform(settings(), Platform::MacOs, "1.0.0");
    let (tx, rx) = watch::channel(false);
    tx.send(true).unwrap();

    let outcome = coordinator
        .download_to("http://127.0.0.1:9/TabShell.dmg", dir.path(), rx)
        .await;
    assert_eq!(outcome, DownloadOutcome::Canceled);
    assert!(!dir.path().join("TabShell.dmg").exists());
}

#[tokio::test]
async fn test_download_failure_leaves_no_file() {
    let dir = TempDir::new().unwrap();
    let coordinator = UpdateCoordinator::with_platform(settings(), Platform::MacOs, "1.0.0");
    let (_tx, rx) = watch::channel(false);

    // Port 9 (discard) is not listening on loopback, so the connect is refused.
    let outcome = coordinator
        .download_to("http://127.0.0.1:9/TabShell.dmg", dir.path(), rx)
        .await;
    assert!(matches!(outcome, DownloadOutcome::Failed { .. }));
    assert!(!outcome.is_success());
    assert!(!dir.path().join("TabShell.dmg").exists());
}

#[tokio::test]
async fn test_download_failure_keeps_existing_installer() {
    let dir = TempDir::new().unwrap();
    let existing = dir.path().join("TabShell.dmg");
    std::fs::write(&existing, b"previous installer").unwrap();
    let coordinator = UpdateCoordinator::with_platform(settings(), Platform::MacOs, "1.0.0");
    let (_tx, rx) = watch::channel(false);

    let outcome = coordinator
        .download_to("http://127.0.0.1:9/TabShell.dmg", dir.path(), rx)
        .await;
    assert!(matches!(outcome, DownloadOutcome::Failed { .. }));
    assert_eq!(std::fs::read(&existing).unwrap(), b"previous installer");
    assert!(!dir.path().join("TabShell.dmg.part").exists());
}
