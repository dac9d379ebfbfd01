// Simulated admin interface for integration tests
// Scripted command responses and an in-memory pool catalog

use async_trait::async_trait;
use mdsctl::command::CommandGateway;
use mdsctl::error::{MdsError, Result};
use mdsctl::mds::PoolId;
use mdsctl::pool::PoolCatalog;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

/// Scripted outcome of a command
#[derive(Debug, Clone)]
pub enum Reply {
    Ok(Vec<u8>),
    Fail(i32),
    /// Never answers, like an admin command stuck on an unreachable monitor.
    Hang,
}

impl Reply {
    pub fn json(body: impl Into<Vec<u8>>) -> Self {
        Reply::Ok(body.into())
    }
}

struct Rule {
    prefix: Vec<String>,
    replies: VecDeque<Reply>,
}

/// Gateway answering commands from a script.
///
/// A rule matches every command starting with its prefix; the first matching
/// rule wins. Queued replies are consumed in order and the last one repeats.
/// Unmatched commands succeed with an empty body.
#[derive(Default)]
pub struct FakeGateway {
    rules: Mutex<Vec<Rule>>,
    calls: Mutex<Vec<Vec<String>>>,
}

impl FakeGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `reply` for commands starting with `prefix`.
    pub fn on(&self, prefix: &[&str], reply: Reply) -> &Self {
        let prefix: Vec<String> = prefix.iter().map(|s| s.to_string()).collect();
        let mut rules = self.rules.lock().unwrap();
        match rules.iter_mut().find(|r| r.prefix == prefix) {
            Some(rule) => rule.replies.push_back(reply),
            None => rules.push(Rule {
                prefix,
                replies: VecDeque::from([reply]),
            }),
        }
        self
    }

    /// Every command issued so far, joined with spaces.
    pub fn calls(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|c| c.join(" "))
            .collect()
    }

    /// Issued commands starting with `prefix`.
    pub fn calls_with_prefix(&self, prefix: &str) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| c.starts_with(prefix))
            .collect()
    }

    async fn reply(&self, args: &[String]) -> Result<Vec<u8>> {
        self.calls.lock().unwrap().push(args.to_vec());

        let reply = {
            let mut rules = self.rules.lock().unwrap();
            let rule = rules
                .iter_mut()
                .find(|r| args.len() >= r.prefix.len() && args[..r.prefix.len()] == r.prefix[..]);

            match rule {
                Some(rule) if rule.replies.len() > 1 => rule.replies.pop_front().unwrap(),
                Some(rule) => rule.replies.front().cloned().unwrap(),
                None => Reply::Ok(Vec::new()),
            }
        };

        match reply {
            Reply::Ok(body) => Ok(body),
            Reply::Fail(code) => Err(MdsError::CommandFailed {
                command: args.join(" "),
                code,
                stderr: format!("simulated failure {}", code),
            }),
            Reply::Hang => std::future::pending().await,
        }
    }
}

#[async_trait]
impl CommandGateway for FakeGateway {
    async fn run(&self, args: &[String]) -> Result<Vec<u8>> {
        self.reply(args).await
    }

    async fn run_with_timeout(&self, args: &[String], _timeout: Duration) -> Result<Vec<u8>> {
        self.reply(args).await
    }
}

/// In-memory pool catalog recording deletions.
#[derive(Default)]
pub struct FakePoolCatalog {
    names: HashMap<PoolId, String>,
    failing: HashSet<String>,
    deleted: Mutex<Vec<String>>,
}

impl FakePoolCatalog {
    pub fn new(pools: &[(PoolId, &str)]) -> Self {
        Self {
            names: pools.iter().map(|(id, name)| (*id, name.to_string())).collect(),
            ..Default::default()
        }
    }

    /// Make deletion of `name` fail.
    pub fn failing(mut self, name: &str) -> Self {
        self.failing.insert(name.to_string());
        self
    }

    /// Names passed to `delete_pool`, in call order.
    pub fn deleted(&self) -> Vec<String> {
        self.deleted.lock().unwrap().clone()
    }
}

#[async_trait]
impl PoolCatalog for FakePoolCatalog {
    async fn pool_names_by_id(&self) -> Result<HashMap<PoolId, String>> {
        Ok(self.names.clone())
    }

    async fn delete_pool(&self, name: &str) -> Result<()> {
        self.deleted.lock().unwrap().push(name.to_string());
        if self.failing.contains(name) {
            return Err(MdsError::CommandFailed {
                command: format!("osd pool delete {}", name),
                code: libc::EBUSY,
                stderr: format!("pool {} busy", name),
            });
        }
        Ok(())
    }
}
