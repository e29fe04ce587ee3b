//! Service-layer tests for saved timetables and settings.

mod support;

use support::{entry, weekday_settings};
use timetable_rust::db::repositories::{FileRepository, LocalRepository};
use timetable_rust::db::repository::RepositoryError;
use timetable_rust::db::services::{self, NewTimetable};
use timetable_rust::models::{Directory, ScheduleSettings, TimetableId};

fn new_timetable(title: &str, entries: Vec<timetable_rust::models::Entry>) -> NewTimetable {
    NewTimetable {
        title: title.to_string(),
        description: None,
        entries,
        settings: weekday_settings(),
    }
}

#[tokio::test]
async fn test_create_and_get_round_trip() {
    let repo = LocalRepository::new();
    let entries = vec![
        entry("Math", "Dr. A", "Monday", "9:00AM-10:00AM"),
        entry("Physics", "Dr. B", "Monday", "12:15PM-1:15PM"),
    ];
    let created = services::create_timetable(&repo, new_timetable("CS Y1", entries.clone()))
        .await
        .unwrap();
    let id = created.id.unwrap();

    let fetched = services::get_timetable(&repo, id).await.unwrap();
    assert_eq!(fetched.entries, entries);
    assert_eq!(fetched.description, "Generated Timetable");
    assert_eq!(fetched.settings, weekday_settings());
}

#[tokio::test]
async fn test_sunday_entry_fails_validation() {
    let repo = LocalRepository::new();
    let entries = vec![entry("Math", "Dr. A", "Sunday", "9:00AM-10:00AM")];

    let err = services::create_timetable(&repo, new_timetable("Weekend", entries))
        .await
        .unwrap_err();

    assert!(matches!(err, RepositoryError::ValidationError { .. }));
    assert!(err.context().details.as_deref().unwrap().contains("Sunday"));
    assert_eq!(repo.timetable_count(), 0);
}

#[tokio::test]
async fn test_unknown_slot_label_fails_validation() {
    let repo = LocalRepository::new();
    let entries = vec![entry("Math", "Dr. A", "Monday", "11:00PM-midnight")];
    let err = services::create_timetable(&repo, new_timetable("Late", entries))
        .await
        .unwrap_err();
    assert!(matches!(err, RepositoryError::ValidationError { .. }));
}

#[tokio::test]
async fn test_unusable_settings_are_configuration_error() {
    let repo = LocalRepository::new();
    let mut request = new_timetable("Broken", vec![]);
    request.settings = ScheduleSettings::new("9am", 60, 5, 0, 0);
    let err = services::create_timetable(&repo, request).await.unwrap_err();
    assert!(matches!(err, RepositoryError::ConfigurationError { .. }));
}

#[tokio::test]
async fn test_repeated_or_unknown_working_days_are_configuration_error() {
    let repo = LocalRepository::new();

    let mut request = new_timetable("Twice", vec![]);
    request.settings = weekday_settings().with_working_days(["Monday", "Monday"]);
    let err = services::create_timetable(&repo, request).await.unwrap_err();
    assert!(matches!(err, RepositoryError::ConfigurationError { .. }));

    let mut request = new_timetable("Funday", vec![]);
    request.settings = weekday_settings().with_working_days(["Monday", "Funday"]);
    let err = services::create_timetable(&repo, request).await.unwrap_err();
    assert!(matches!(err, RepositoryError::ConfigurationError { .. }));

    let mut request = new_timetable("Late break", vec![]);
    request.settings = ScheduleSettings::new("09:00", 60, 5, 5, 15);
    let err = services::create_timetable(&repo, request).await.unwrap_err();
    assert!(matches!(err, RepositoryError::ConfigurationError { .. }));

    assert_eq!(repo.timetable_count(), 0);
}

#[tokio::test]
async fn test_blank_title_rejected() {
    let repo = LocalRepository::new();
    let err = services::create_timetable(&repo, new_timetable("  ", vec![]))
        .await
        .unwrap_err();
    assert!(matches!(err, RepositoryError::ValidationError { .. }));
}

#[tokio::test]
async fn test_list_newest_first() {
    let repo = LocalRepository::new();
    for title in ["first", "second", "third"] {
        services::create_timetable(&repo, new_timetable(title, vec![]))
            .await
            .unwrap();
    }
    let titles: Vec<String> = services::list_timetables(&repo)
        .await
        .unwrap()
        .into_iter()
        .map(|t| t.title)
        .collect();
    assert_eq!(titles, vec!["third", "second", "first"]);
}

#[tokio::test]
async fn test_delete_is_idempotent() {
    let repo = LocalRepository::new();
    let created = services::create_timetable(&repo, new_timetable("gone", vec![]))
        .await
        .unwrap();
    let id = created.id.unwrap();

    services::delete_timetable(&repo, id).await.unwrap();
    services::delete_timetable(&repo, id).await.unwrap();
    services::delete_timetable(&repo, TimetableId::new(404)).await.unwrap();

    let err = services::get_timetable(&repo, id).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_replace_entries_validates_against_stored_settings() {
    let repo = LocalRepository::new();
    let created = services::create_timetable(
        &repo,
        new_timetable("E0", vec![entry("Math", "Dr. A", "Monday", "9:00AM-10:00AM")]),
    )
    .await
    .unwrap();
    let id = created.id.unwrap();

    // Institution settings change after the timetable was saved.
    services::save_settings(&repo, ScheduleSettings::new("08:00", 45, 4, 0, 0))
        .await
        .unwrap();

    let replacement = vec![entry("Art", "Dr. C", "Friday", "1:15PM-2:15PM")];
    let updated = services::replace_timetable_entries(&repo, id, replacement.clone())
        .await
        .unwrap();
    assert_eq!(updated.entries, replacement);

    let bad = vec![entry("Art", "Dr. C", "Friday", "8:00AM-8:45AM")];
    let err = services::replace_timetable_entries(&repo, id, bad)
        .await
        .unwrap_err();
    assert!(matches!(err, RepositoryError::ValidationError { .. }));
    assert_eq!(
        services::get_timetable(&repo, id).await.unwrap().entries,
        replacement
    );
}

#[tokio::test]
async fn test_replace_entries_of_missing_timetable_is_not_found() {
    let repo = LocalRepository::new();
    let err = services::replace_timetable_entries(&repo, TimetableId::new(9), vec![])
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_render_uses_stored_settings_not_current() {
    let repo = LocalRepository::new();
    let created = services::create_timetable(
        &repo,
        new_timetable("Stored grid", vec![entry("Math", "Dr. A", "Tuesday", "12:15PM-1:15PM")]),
    )
    .await
    .unwrap();

    services::save_settings(&repo, ScheduleSettings::new("07:30", 30, 2, 0, 0))
        .await
        .unwrap();

    let grid = services::render_timetable(&repo, created.id.unwrap())
        .await
        .unwrap();
    assert_eq!(grid.slots.len(), 5);
    assert_eq!(grid.cell("Tuesday", "12:15PM-1:15PM").unwrap().subject, "Math");
    assert!(grid.orphans.is_empty());
}

#[tokio::test]
async fn test_render_active_before_generation_is_empty_grid() {
    let repo = LocalRepository::new();
    let grid = services::render_active(&repo).await.unwrap();
    assert_eq!(grid.days.len(), 5);
    assert_eq!(grid.slots.len(), ScheduleSettings::default().slots_per_day as usize);
    assert!(grid.is_clean());
}

#[tokio::test]
async fn test_render_lists_unknown_directory_names() {
    let repo = LocalRepository::new();
    repo.set_directory(Directory {
        faculty: ["Dr. A".to_string()].into_iter().collect(),
        rooms: Default::default(),
    });
    let created = services::create_timetable(
        &repo,
        new_timetable("Dir", vec![entry("Math", "Dr. Z", "Monday", "9:00AM-10:00AM")]),
    )
    .await
    .unwrap();

    let grid = services::render_timetable(&repo, created.id.unwrap())
        .await
        .unwrap();
    assert_eq!(grid.unknown_faculty, vec!["Dr. Z".to_string()]);
}

#[tokio::test]
async fn test_settings_save_validate_and_reset() {
    let repo = LocalRepository::new();

    let sunday_twice = ScheduleSettings::default().with_working_days(["Sunday", "Sunday"]);
    let err = services::save_settings(&repo, sunday_twice).await.unwrap_err();
    assert!(matches!(err, RepositoryError::ConfigurationError { .. }));

    let custom = ScheduleSettings::new("00:00", 30, 2, 0, 0);
    services::save_settings(&repo, custom.clone()).await.unwrap();
    assert_eq!(
        services::current_slots(&repo).await.unwrap(),
        vec!["12:00AM-12:30AM", "12:30AM-1:00AM"]
    );

    let defaults = services::reset_settings(&repo).await.unwrap();
    assert_eq!(defaults, ScheduleSettings::default());
    assert_eq!(services::get_settings(&repo).await.unwrap(), defaults);
}

#[tokio::test]
async fn test_file_backend_keeps_service_semantics() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("timetables.json");
    let id = {
        let repo = FileRepository::open(&path, ScheduleSettings::default()).unwrap();
        let created = services::create_timetable(
            &repo,
            new_timetable("On disk", vec![entry("Math", "Dr. A", "Monday", "9:00AM-10:00AM")]),
        )
        .await
        .unwrap();
        created.id.unwrap()
    };

    let repo = FileRepository::open(&path, ScheduleSettings::default()).unwrap();
    let grid = services::render_timetable(&repo, id).await.unwrap();
    assert_eq!(grid.cell("Monday", "9:00AM-10:00AM").unwrap().faculty, "Dr. A");

    services::delete_timetable(&repo, id).await.unwrap();
    let reopened = FileRepository::open(&path, ScheduleSettings::default()).unwrap();
    assert!(services::list_timetables(&reopened).await.unwrap().is_empty());
}
