use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        BoothError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        BoothError::composition("x")
            .to_string()
            .contains("composition error:")
    );
    assert!(
        BoothError::camera("x")
            .to_string()
            .contains("camera unavailable:")
    );
    assert!(
        BoothError::ImageLoadFailed {
            index: 3,
            reason: "bad".to_string()
        }
        .to_string()
        .contains("frame 3")
    );
}

#[test]
fn only_export_failures_reach_the_user() {
    assert!(BoothError::camera("denied").user_message().is_none());
    assert!(BoothError::grab_skipped("x").user_message().is_none());
    assert!(BoothError::FontLoadFailed("x".into()).user_message().is_none());
    assert!(BoothError::CaptureInProgress.user_message().is_none());

    let security = BoothError::Security("x".into()).user_message().unwrap();
    let compose = BoothError::composition("x").user_message().unwrap();
    let download = BoothError::DownloadFailed("x".into()).user_message().unwrap();
    let print = BoothError::PrintFailed("x".into()).user_message().unwrap();
    assert!(security.contains("security"));
    assert!(compose.contains("collage"));
    assert_eq!(download, "Download failed. Please try again.");
    assert_eq!(print, "Print failed. Please try again.");
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = BoothError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
