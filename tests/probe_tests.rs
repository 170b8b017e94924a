// Probe tests: measure records on success, writes nothing on failure or timeout

mod common;

use common::{at, temp_store};
use speedlog::Error;
use speedlog::Result;
use speedlog::models::Sample;
use speedlog::probe::{CommandProbe, Probe, run_probe};
use speedlog::window::Window;
use std::time::Duration;

struct FixedProbe(Sample);

impl Probe for FixedProbe {
    async fn measure(&self) -> Result<Sample> {
        Ok(self.0.clone())
    }
}

struct FailingProbe;

impl Probe for FailingProbe {
    async fn measure(&self) -> Result<Sample> {
        Err(Error::ProbeFailure("no route to speedtest server".into()))
    }
}

struct SlowProbe(Duration);

impl Probe for SlowProbe {
    async fn measure(&self) -> Result<Sample> {
        tokio::time::sleep(self.0).await;
        Ok(Sample::now(Some(1.0), Some(1.0), Some(1.0)))
    }
}

const TIMEOUT: Duration = Duration::from_secs(5);

#[tokio::test]
async fn measure_records_probe_sample() {
    let (_dir, store) = temp_store();
    let expected = Sample::new(at(0), Some(11.5), Some(94.25), None);

    let got = store
        .measure(&FixedProbe(expected.clone()), TIMEOUT)
        .await
        .unwrap();
    assert_eq!(got, expected);
    assert_eq!(
        store.query(&Window::unbounded()).await.unwrap(),
        vec![expected]
    );
}

#[tokio::test]
async fn measure_failure_writes_nothing() {
    let (_dir, store) = temp_store();
    let err = store.measure(&FailingProbe, TIMEOUT).await.unwrap_err();
    assert!(matches!(err, Error::ProbeFailure(_)));
    assert_eq!(store.count().await.unwrap(), 0);
}

#[tokio::test]
async fn measure_timeout_writes_nothing() {
    let (_dir, store) = temp_store();
    let timeout = Duration::from_millis(50);
    let err = store
        .measure(&SlowProbe(Duration::from_secs(30)), timeout)
        .await
        .unwrap_err();
    match err {
        Error::ProbeTimeout(d) => assert_eq!(d, timeout),
        other => panic!("expected ProbeTimeout, got {other:?}"),
    }
    assert_eq!(store.count().await.unwrap(), 0);
}

#[tokio::test]
async fn run_probe_within_timeout_returns_sample() {
    let s = run_probe(&SlowProbe(Duration::from_millis(10)), TIMEOUT)
        .await
        .unwrap();
    assert_eq!(s.upload, Some(1.0));
}

#[cfg(unix)]
fn sh(script: &str) -> CommandProbe {
    CommandProbe::new(&["sh".to_string(), "-c".to_string(), script.to_string()]).unwrap()
}

#[cfg(unix)]
#[tokio::test]
async fn command_probe_parses_json_report() {
    let probe = sh(r#"echo '{"download": 50000000, "upload": 10000000, "ping": 8.5}'"#);
    let s = run_probe(&probe, TIMEOUT).await.unwrap();
    assert_eq!(s.download, Some(50.0));
    assert_eq!(s.upload, Some(10.0));
    assert_eq!(s.ping, Some(8.5));
}

#[cfg(unix)]
#[tokio::test]
async fn command_probe_nonzero_exit_is_failure() {
    let probe = sh("echo 'cannot reach server' >&2; exit 3");
    let err = run_probe(&probe, TIMEOUT).await.unwrap_err();
    match err {
        Error::ProbeFailure(msg) => assert!(msg.contains("cannot reach server"), "{msg}"),
        other => panic!("expected ProbeFailure, got {other:?}"),
    }
}

#[cfg(unix)]
#[tokio::test]
async fn command_probe_slow_command_times_out() {
    let probe = sh("sleep 30");
    let err = run_probe(&probe, Duration::from_millis(100))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::ProbeTimeout(_)));
}

#[tokio::test]
async fn command_probe_missing_program_is_failure() {
    let probe = CommandProbe::new(&["speedlog-no-such-program".to_string()]).unwrap();
    let err = run_probe(&probe, TIMEOUT).await.unwrap_err();
    assert!(matches!(err, Error::ProbeFailure(_)));
}
