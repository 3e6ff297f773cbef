#![allow(dead_code)]

pub mod results_server;

use std::future::Future;
use std::time::Duration;

use tokio::time::{sleep, timeout};

pub const SUBMISSION_RUNNING: &str = r#"{"message":{"submission":{"file":"/a/b/sol.py","status":"running","created":5,"grade":null}}}"#;

pub fn test_result_frame(id: i64, status: &str, stdout: &str) -> String {
    format!(
        r#"{{"message":{{"test_results":[{{"id":{id},"status":"{status}","running":false,"time":0.3,"stdout":"{stdout}","exercise_test":{{"name":"t{id}","stdout":"ok"}}}}]}}}}"#
    )
}

/// Polls `condition` until it holds, panicking after a few seconds.
pub async fn wait_until(mut condition: impl FnMut() -> bool) {
    timeout(Duration::from_secs(5), async {
        while !condition() {
            sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("Condition not met in time");
}

pub async fn within<T>(future: impl Future<Output = T>) -> T {
    timeout(Duration::from_secs(5), future)
        .await
        .expect("Operation timed out")
}
