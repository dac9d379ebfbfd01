//! Convergence wait integration tests
//!
//! Time is paused, so one-second poll ticks advance instantly.

#[allow(dead_code)]
mod common;

use common::{dump_json, DetailsBuilder, Reply, TestEnv};
use mdsctl::cancel::CancelToken;
use mdsctl::error::MdsError;
use std::time::Duration;
use tokio::time::Instant;

const TICK: Duration = Duration::from_secs(1);

fn details(max_mds: i64, up: usize) -> Reply {
    Reply::json(DetailsBuilder::new("myfs").max_mds(max_mds).active_ranks(up).json())
}

#[tokio::test(start_paused = true)]
async fn test_scale_and_wait() {
    let env = TestEnv::reef();
    // Old target still in place, then max_mds adopted with one daemon missing,
    // then settled.
    env.gateway
        .on(&["fs", "get", "myfs"], details(1, 2))
        .on(&["fs", "get", "myfs"], details(2, 1))
        .on(&["fs", "get", "myfs"], details(2, 2));

    env.manager.set_num_mds_ranks("myfs", 2).await.unwrap();
    env.manager
        .wait_for_active_ranks("myfs", 2, false, TICK * 10)
        .await
        .unwrap();

    assert_eq!(env.gateway.calls_with_prefix("fs get").len(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_wait_rejects_stale_up_count() {
    let env = TestEnv::reef();
    // Two daemons up, but max_mds still says three.
    env.gateway.on(&["fs", "get", "myfs"], details(3, 2));

    let err = env
        .manager
        .wait_for_active_ranks("myfs", 2, false, TICK * 3)
        .await
        .unwrap_err();

    assert!(matches!(err, MdsError::Timeout(_)));
    assert_eq!(env.gateway.calls_with_prefix("fs get").len(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_wait_allow_more() {
    let env = TestEnv::reef();
    env.gateway.on(&["fs", "get", "myfs"], details(1, 3));

    env.manager
        .wait_for_active_ranks("myfs", 1, true, TICK * 3)
        .await
        .unwrap();

    let err = env
        .manager
        .wait_for_active_ranks("myfs", 1, false, TICK * 3)
        .await
        .unwrap_err();
    assert!(matches!(err, MdsError::Timeout(ref c) if c.contains("to become 1")));
}

#[tokio::test(start_paused = true)]
async fn test_wait_tolerates_fetch_errors() {
    let env = TestEnv::reef();
    env.gateway
        .on(&["fs", "get", "myfs"], Reply::Fail(libc::EIO))
        .on(&["fs", "get", "myfs"], Reply::json("garbage"))
        .on(&["fs", "get", "myfs"], details(1, 1));

    env.manager
        .wait_for_active_ranks("myfs", 1, false, TICK * 5)
        .await
        .unwrap();

    assert_eq!(env.gateway.calls_with_prefix("fs get").len(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_wait_uses_configured_default_deadline() {
    let env = TestEnv::reef();
    env.gateway.on(&["fs", "get", "myfs"], details(0, 0));

    let err = env
        .manager
        .wait_for_active_ranks_default("myfs", 1, false)
        .await
        .unwrap_err();

    assert!(matches!(err, MdsError::Timeout(_)));
    // 5s deadline at 1s interval.
    assert_eq!(env.gateway.calls_with_prefix("fs get").len(), 5);
}

#[tokio::test(start_paused = true)]
async fn test_wait_with_hung_fetch_honors_deadline() {
    let env = TestEnv::reef();
    env.gateway
        .on(&["fs", "get", "myfs"], details(1, 2))
        .on(&["fs", "get", "myfs"], Reply::Hang);

    let start = Instant::now();
    let err = env
        .manager
        .wait_for_active_ranks("myfs", 1, false, TICK * 3)
        .await
        .unwrap_err();

    assert!(matches!(err, MdsError::Timeout(_)));
    assert!(start.elapsed() <= TICK * 3);
    assert_eq!(env.gateway.calls_with_prefix("fs get").len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_wait_for_no_standbys_hung_dump() {
    let env = TestEnv::reef();
    env.gateway.on(&["fs", "dump"], Reply::Hang);

    let start = Instant::now();
    let err = env.manager.wait_for_no_standbys_default("myfs").await.unwrap_err();

    assert!(matches!(err, MdsError::Timeout(_)));
    assert_eq!(start.elapsed(), TICK * 5);
}

#[tokio::test(start_paused = true)]
async fn test_wait_for_no_standbys() {
    let env = TestEnv::reef();
    env.gateway
        .on(&["fs", "dump"], Reply::json(dump_json(&["myfs-a", "otherfs-a"])))
        .on(&["fs", "dump"], Reply::json(dump_json(&["otherfs-a", "myfs-legacy"])));

    env.manager
        .wait_for_no_standbys("myfs", TICK, TICK * 5)
        .await
        .unwrap();

    assert_eq!(env.gateway.calls_with_prefix("fs dump").len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_wait_for_no_standbys_timeout() {
    let env = TestEnv::reef();
    env.gateway.on(&["fs", "dump"], Reply::json(dump_json(&["myfs-b"])));

    let err = env.manager.wait_for_no_standbys_default("myfs").await.unwrap_err();

    assert!(matches!(err, MdsError::Timeout(ref c) if c.contains("no standbys")));
    assert_eq!(env.gateway.calls_with_prefix("fs dump").len(), 5);
}

#[tokio::test(start_paused = true)]
async fn test_cancelled_wait() {
    let cancel = CancelToken::new();
    let mut env = TestEnv::reef();
    env.manager = env.manager.with_cancel_token(cancel.clone());
    env.gateway.on(&["fs", "get", "myfs"], details(0, 0));

    let canceller = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(1500)).await;
        cancel.cancel();
    });

    let err = env
        .manager
        .wait_for_active_ranks("myfs", 2, false, TICK * 60)
        .await
        .unwrap_err();
    canceller.await.unwrap();

    assert!(matches!(err, MdsError::Cancelled(_)));
    assert_eq!(env.gateway.calls_with_prefix("fs get").len(), 2);
}
