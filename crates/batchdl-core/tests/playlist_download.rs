//! Integration test: a playlist downloaded over HTTP from a local server.

mod common;

use std::time::Duration;

use batchdl_core::control::CancelFlag;
use batchdl_core::download::{HttpFetcher, TrackStatus, TransferOptions};
use batchdl_core::playlist::{build_jobs, run_playlist, Playlist, RunSettings, Track};
use batchdl_core::progress::{NullProgress, ProgressUpdate};
use batchdl_core::retry::RetryPolicy;
use batchdl_core::scheduler::{BatchError, BatchPhase};
use common::http_server::{self, Route};
use tempfile::tempdir;

fn fast_retry() -> RetryPolicy {
    RetryPolicy {
        max_attempts: 3,
        base_delay: Duration::from_millis(5),
        max_delay: Duration::from_millis(20),
    }
}

fn playlist(urls: &[String]) -> Playlist {
    Playlist {
        id: 1,
        title: "Test Mix".to_string(),
        author: "tester".to_string(),
        track_count: None,
        tracks: urls
            .iter()
            .enumerate()
            .map(|(i, url)| Track {
                id: 1000 + i as u64,
                title: format!("Song {}", i + 1),
                url: url.clone(),
                artist: None,
            })
            .collect(),
    }
}

#[test]
fn playlist_downloads_all_tracks() {
    let bodies: Vec<Vec<u8>> = (0..6u8).map(|i| vec![i; 1024 * (i as usize + 1)]).collect();
    let server = http_server::start(
        bodies
            .iter()
            .enumerate()
            .map(|(i, b)| (format!("t{}.mp3", i), Route::ok(b.clone())))
            .collect(),
    );
    let urls: Vec<String> = (0..6).map(|i| server.url(&format!("t{}.mp3", i))).collect();
    let playlist = playlist(&urls);

    let dir = tempdir().unwrap();
    let cancel = CancelFlag::new();
    let fetcher = HttpFetcher::new(dir.path())
        .retry_policy(fast_retry())
        .cancel_flag(cancel.clone());
    let settings = RunSettings {
        threads: 3,
        strict: false,
        offset: 1,
    };
    let mut last = None;
    let mut sink = |u: &ProgressUpdate| last = Some(*u);
    let result = run_playlist(&playlist, &settings, &fetcher, &mut sink, cancel).unwrap();

    assert_eq!(result.succeeded, 6);
    assert_eq!(result.failed, 0);
    assert_eq!(last.map(|u| (u.completed, u.total)), Some((6, 6)));
    for (i, body) in bodies.iter().enumerate() {
        let name = format!("{:02}_-_Song_{}.mp3", i + 1, i + 1);
        let content = std::fs::read(dir.path().join(&name)).unwrap();
        assert_eq!(&content, body, "content of {}", name);
        assert!(!dir.path().join(format!("{}.part", name)).exists());
    }
}

#[test]
fn failed_track_is_counted_and_cleaned_up() {
    let server = http_server::start(vec![
        ("a.mp3", Route::ok(b"aaaa".to_vec())),
        ("gone.mp3", Route::status(404)),
        ("c.mp3", Route::ok(b"cccc".to_vec())),
    ]);
    let urls = vec![server.url("a.mp3"), server.url("gone.mp3"), server.url("c.mp3")];
    let dir = tempdir().unwrap();
    let fetcher = HttpFetcher::new(dir.path()).retry_policy(fast_retry());
    let settings = RunSettings {
        threads: 2,
        ..RunSettings::default()
    };
    let result = run_playlist(
        &playlist(&urls),
        &settings,
        &fetcher,
        &mut NullProgress,
        CancelFlag::new(),
    )
    .unwrap();

    assert_eq!(result.succeeded, 2);
    assert_eq!(result.failed, 1);
    let failure = &result.errors[0];
    assert_eq!(failure.index, 1);
    assert_eq!(failure.error.job_id, "02 Song 2 (1001)");
    assert!(failure.error.message.contains("HTTP 404"), "{}", failure.error.message);
    assert_eq!(server.hits("gone.mp3"), 1, "client errors are not retried");
    assert!(!dir.path().join("02_-_Song_2.mp3").exists());
    assert!(!dir.path().join("02_-_Song_2.mp3.part").exists());
}

#[test]
fn throttled_track_is_retried_inside_fetch() {
    let server = http_server::start(vec![("busy.mp3", Route::ok(b"done".to_vec()).after(&[503]))]);
    let dir = tempdir().unwrap();
    let fetcher = HttpFetcher::new(dir.path()).retry_policy(fast_retry());
    let result = run_playlist(
        &playlist(&[server.url("busy.mp3")]),
        &RunSettings::default(),
        &fetcher,
        &mut NullProgress,
        CancelFlag::new(),
    )
    .unwrap();
    assert_eq!(result.succeeded, 1);
    assert_eq!(server.hits("busy.mp3"), 2);
    assert_eq!(std::fs::read(dir.path().join("01_-_Song_1.mp3")).unwrap(), b"done");
}

#[test]
fn strict_playlist_aborts_and_propagates() {
    let server = http_server::start(vec![
        ("1.mp3", Route::ok(b"1".to_vec())),
        ("2.mp3", Route::ok(b"2".to_vec())),
        ("3.mp3", Route::status(404)),
        ("4.mp3", Route::ok(b"4".to_vec())),
        ("5.mp3", Route::ok(b"5".to_vec())),
    ]);
    let urls: Vec<String> = (1..=5).map(|i| server.url(&format!("{}.mp3", i))).collect();
    let dir = tempdir().unwrap();
    let cancel = CancelFlag::new();
    let fetcher = HttpFetcher::new(dir.path())
        .retry_policy(fast_retry())
        .cancel_flag(cancel.clone());
    let settings = RunSettings {
        threads: 1,
        strict: true,
        offset: 1,
    };
    let err = run_playlist(&playlist(&urls), &settings, &fetcher, &mut NullProgress, cancel)
        .unwrap_err();

    match &err {
        BatchError::FailFast { index, error, result } => {
            assert_eq!(*index, 2);
            assert_eq!(error.job_id, "03 Song 3 (1002)");
            assert_eq!(result.succeeded, 2);
            assert_eq!(result.failed, 1);
            assert_eq!(result.phase, BatchPhase::FailedFast);
        }
        other => panic!("expected FailFast, got {:?}", other),
    }
    assert_eq!(server.hits("4.mp3"), 0);
    assert_eq!(server.hits("5.mp3"), 0);
}

#[test]
fn strict_abort_lets_running_track_finish() {
    let server = http_server::start(vec![
        (
            "big.mp3",
            Route::ok(vec![7u8; 64 * 1024]).delayed(Duration::from_millis(400)),
        ),
        ("bad.mp3", Route::status(404)),
    ]);
    let urls = vec![server.url("big.mp3"), server.url("bad.mp3")];
    let dir = tempdir().unwrap();
    let batch = CancelFlag::new();
    let fetcher = HttpFetcher::new(dir.path())
        .retry_policy(fast_retry())
        .cancel_flag(CancelFlag::new());
    let settings = RunSettings {
        threads: 2,
        strict: true,
        offset: 1,
    };
    let err = run_playlist(&playlist(&urls), &settings, &fetcher, &mut NullProgress, batch.clone())
        .unwrap_err();

    assert!(batch.is_cancelled());
    match &err {
        BatchError::FailFast { index, result, .. } => {
            assert_eq!(*index, 1);
            assert_eq!(result.succeeded, 1, "in-flight track still counted");
            assert_eq!(result.failed, 1);
            assert_eq!(result.errors.len(), 1);
        }
        other => panic!("expected FailFast, got {:?}", other),
    }
    let big = std::fs::read(dir.path().join("01_-_Song_1.mp3")).unwrap();
    assert_eq!(big.len(), 64 * 1024);
}

#[test]
fn existing_track_is_skipped_unless_overwrite() {
    let server = http_server::start(vec![("x.mp3", Route::ok(b"fresh".to_vec()))]);
    let dir = tempdir().unwrap();
    let existing = dir.path().join("01_-_Song_1.mp3");
    std::fs::write(&existing, b"old").unwrap();
    let list = playlist(&[server.url("x.mp3")]);

    let fetcher = HttpFetcher::new(dir.path());
    run_playlist(&list, &RunSettings::default(), &fetcher, &mut NullProgress, CancelFlag::new())
        .unwrap();
    assert_eq!(std::fs::read(&existing).unwrap(), b"old");
    assert_eq!(server.hits("x.mp3"), 0);

    let fetcher = HttpFetcher::new(dir.path()).overwrite(true);
    run_playlist(&list, &RunSettings::default(), &fetcher, &mut NullProgress, CancelFlag::new())
        .unwrap();
    assert_eq!(std::fs::read(&existing).unwrap(), b"fresh");
}

#[test]
fn download_reports_track_status() {
    let server = http_server::start(vec![("s.opus", Route::ok(b"opus-data".to_vec()))]);
    let dir = tempdir().unwrap();
    let fetcher = HttpFetcher::new(dir.path()).transfer_options(TransferOptions {
        connect_timeout: Duration::from_secs(5),
        timeout: Duration::from_secs(30),
        ..TransferOptions::default()
    });
    let jobs = build_jobs(&playlist(&[server.url("s.opus")]), 7);
    let job = &jobs[0].payload;

    let expected = dir.path().join("07_-_Song_1.opus");
    assert_eq!(fetcher.track_path(job), expected);
    assert_eq!(
        fetcher.download(job).unwrap(),
        TrackStatus::Downloaded {
            path: expected.clone(),
            bytes: 9
        }
    );
    assert_eq!(
        fetcher.download(job).unwrap(),
        TrackStatus::Skipped { path: expected }
    );
}
