use anyhow::Result;
use tempfile::tempdir;

use week_in_music::domain::{Event, WeekData};
use week_in_music::storage::{FileStore, WeekStore};

fn sample_week() -> WeekData {
    let mut week = WeekData::default();
    week.days.thursday.push(Event {
        city: "Portland".into(),
        venue: "Bluebird Bar".into(),
        venue_url: "https://bluebird.example".into(),
        artist: "The Rivets".into(),
        time: "19:00".into(),
        date: "2026-08-06".into(),
    });
    week
}

#[tokio::test]
async fn test_file_store_round_trip() -> Result<()> {
    let temp_dir = tempdir()?;
    let path = temp_dir.path().join("week.json");
    let store = FileStore::new(&path);

    let week = sample_week();
    store.save(&week).await?;
    let loaded = store.load().await?;
    assert_eq!(loaded, week);

    // Pretty-printed UTF-8 with canonical day keys
    let text = std::fs::read_to_string(&path)?;
    assert!(text.contains("\"Thursday\""));
    assert!(text.contains("\n  "));
    assert!(text.ends_with('\n'));
    Ok(())
}

#[tokio::test]
async fn test_save_creates_parent_directory() -> Result<()> {
    let temp_dir = tempdir()?;
    let path = temp_dir.path().join("nested").join("data").join("week.json");
    let store = FileStore::new(&path);

    store.save(&sample_week()).await?;
    assert!(path.exists());
    Ok(())
}

#[tokio::test]
async fn test_missing_file_errors_on_load_but_defaults_on_load_or_default() -> Result<()> {
    let temp_dir = tempdir()?;
    let store = FileStore::new(temp_dir.path().join("absent.json"));

    assert!(store.load().await.is_err());

    let week = store.load_or_default().await?;
    assert_eq!(week, WeekData::default());
    assert_eq!(week.days.iter().count(), 7);
    Ok(())
}
