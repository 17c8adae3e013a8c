//! Controller timing tests
//!
//! Drive the gallery and form controllers directly with millisecond
//! cadences: auto-advance wrapping, the load-timeout safeguard, the
//! index-keyed stale-load rule, and the success-only status reset.

use atelier_common::catalog::Category;
use atelier_web::contact::{FormController, FormTiming, SubmitStatus};
use atelier_web::gallery::{GalleryController, GalleryTiming};
use std::time::Duration;

fn fast_gallery_timing() -> GalleryTiming {
    GalleryTiming {
        auto_advance: Duration::from_millis(40),
        load_timeout: Duration::from_millis(25),
        load_clear_delay: Duration::from_millis(5),
    }
}

fn fast_form_timing() -> FormTiming {
    FormTiming {
        success_reset: Duration::from_millis(40),
    }
}

// =============================================================================
// Gallery Controller
// =============================================================================

#[tokio::test]
async fn test_load_timeout_safeguard_clears_loading() {
    let controller =
        GalleryController::new(Some(Category::Landscape), fast_gallery_timing()).await;
    assert!(controller.snapshot().await.is_loading);

    // No image ever reports in; the safeguard must bring the overlay down
    tokio::time::sleep(Duration::from_millis(60)).await;
    assert!(!controller.snapshot().await.is_loading);
}

#[tokio::test]
async fn test_auto_advance_waits_for_loading_then_cycles() {
    let controller =
        GalleryController::new(Some(Category::Landscape), fast_gallery_timing()).await;

    // While loading, no advance happens even after several periods
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(controller.snapshot().await.selected_index, 0);

    // Image 0 loads; loading clears; the timer starts advancing
    controller.image_loaded(0).await;
    tokio::time::sleep(Duration::from_millis(100)).await;
    let view = controller.snapshot().await;
    assert!(view.selected_index > 0, "expected advance, got {view:?}");
}

#[tokio::test]
async fn test_auto_advance_wraps_from_last_to_first() {
    let controller =
        GalleryController::new(Some(Category::Landscape), fast_gallery_timing()).await;
    controller.image_loaded(0).await;
    tokio::time::sleep(Duration::from_millis(10)).await;

    // Jump to the last of 5 projects, let its image load, then wait
    // for one advance period: the selection must wrap to 0
    controller.select(4).await.unwrap();
    controller.image_loaded(4).await;
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert_eq!(controller.snapshot().await.selected_index, 4);

    tokio::time::sleep(Duration::from_millis(60)).await;
    let view = controller.snapshot().await;
    assert_ne!(view.selected_index, 4, "expected wrap past the end");
}

#[tokio::test]
async fn test_stale_load_report_does_not_clear_new_selection() {
    let timing = GalleryTiming {
        auto_advance: Duration::from_secs(60),
        load_timeout: Duration::from_secs(60),
        load_clear_delay: Duration::from_millis(5),
    };
    let controller = GalleryController::new(Some(Category::Landscape), timing).await;

    // Move to index 1 while 0 is still loading, then index 0's image
    // finally reports in: the new selection must stay loading
    controller.select(1).await.unwrap();
    controller.image_loaded(0).await;
    tokio::time::sleep(Duration::from_millis(30)).await;
    let view = controller.snapshot().await;
    assert_eq!(view.selected_index, 1);
    assert!(view.is_loading);
    assert_eq!(view.loaded, vec![0]);

    // The load report for the selection itself clears it
    controller.image_loaded(1).await;
    tokio::time::sleep(Duration::from_millis(30)).await;
    assert!(!controller.snapshot().await.is_loading);
}

#[tokio::test]
async fn test_selection_pauses_auto_advance() {
    let controller =
        GalleryController::new(Some(Category::Landscape), fast_gallery_timing()).await;
    controller.image_loaded(0).await;
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert!(controller.snapshot().await.auto_advance);

    // A manual selection puts the loading overlay back up, which
    // cancels the advance timer until the new image reports in
    controller.select(2).await.unwrap();
    let view = controller.snapshot().await;
    assert!(view.is_loading);
    assert!(!view.auto_advance);
}

#[tokio::test]
async fn test_events_follow_transitions() {
    let controller =
        GalleryController::new(Some(Category::Landscape), fast_gallery_timing()).await;
    let mut rx = controller.subscribe();

    controller.select(2).await.unwrap();
    let event = rx.recv().await.unwrap();
    assert_eq!(event.name(), "SelectionChanged");

    controller.image_loaded(2).await;
    let event = rx.recv().await.unwrap();
    assert_eq!(event.name(), "ImageLoaded");
}

// =============================================================================
// Form Controller
// =============================================================================

fn valid_submission() -> atelier_common::validation::ContactSubmission {
    atelier_common::validation::ContactSubmission {
        email: "a@b.co".to_string(),
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        message: "A message long enough.".to_string(),
    }
}

#[tokio::test]
async fn test_success_indicator_resets_after_window() {
    let controller = FormController::new(None, fast_form_timing());

    let view = controller.submit(&valid_submission()).await;
    assert_eq!(view.status, SubmitStatus::Success);

    // Visible immediately after, gone once the window elapses
    tokio::time::sleep(Duration::from_millis(100)).await;
    let view = controller.snapshot().await;
    assert_eq!(view.status, SubmitStatus::Idle);
}

#[tokio::test]
async fn test_field_errors_do_not_reach_submitting() {
    let controller = FormController::new(None, fast_form_timing());
    let mut submission = valid_submission();
    submission.message = "short".to_string();

    let view = controller.submit(&submission).await;
    assert_eq!(view.status, SubmitStatus::Idle);
    assert_eq!(
        view.field_errors["message"],
        "Message must be at least 10 characters"
    );
}

#[tokio::test]
async fn test_server_side_rejection_is_error_state_and_persists() {
    let controller = FormController::new(None, fast_form_timing());

    // Passes client validation after trimming, but the server boundary
    // checks the raw value and rejects the padded address
    let mut submission = valid_submission();
    submission.email = " a@b.co".to_string();

    let view = controller.submit(&submission).await;
    assert_eq!(view.status, SubmitStatus::Error);
    assert_eq!(view.error_message.as_deref(), Some("Invalid email address"));

    // Unlike success, error has no timed reset
    tokio::time::sleep(Duration::from_millis(100)).await;
    let view = controller.snapshot().await;
    assert_eq!(view.status, SubmitStatus::Error);

    // The next attempt clears it
    let view = controller.submit(&valid_submission()).await;
    assert_eq!(view.status, SubmitStatus::Success);
    assert!(view.error_message.is_none());
}
