//! Scripted [`CommandRunner`] for unit tests

use std::cell::RefCell;
use std::time::Duration;

use super::{CommandRunner, Invocation, ProcessError, ProcessOutput};

#[derive(Debug, Clone)]
pub(crate) enum Reply {
    Exit {
        code: i32,
        stdout: String,
        stderr: String,
    },
    Timeout,
    SpawnError,
}

impl Reply {
    pub(crate) fn ok(stdout: &str) -> Self {
        Reply::Exit {
            code: 0,
            stdout: stdout.to_string(),
            stderr: String::new(),
        }
    }

    pub(crate) fn fail(stderr: &str) -> Self {
        Reply::Exit {
            code: 1,
            stdout: String::new(),
            stderr: stderr.to_string(),
        }
    }
}

struct Rule {
    prefix: Vec<String>,
    reply: Reply,
    remaining: Option<usize>,
}

/// Answers invocations from a list of argument-prefix rules.
///
/// Rules are tried in insertion order; unmatched invocations succeed with
/// empty output.
#[derive(Default)]
pub(crate) struct ScriptedRunner {
    rules: RefCell<Vec<Rule>>,
    calls: RefCell<Vec<Invocation>>,
}

impl ScriptedRunner {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn on(self, prefix: &[&str], reply: Reply) -> Self {
        self.push(prefix, reply, None)
    }

    pub(crate) fn on_once(self, prefix: &[&str], reply: Reply) -> Self {
        self.push(prefix, reply, Some(1))
    }

    fn push(self, prefix: &[&str], reply: Reply, remaining: Option<usize>) -> Self {
        self.rules.borrow_mut().push(Rule {
            prefix: prefix.iter().map(|s| s.to_string()).collect(),
            reply,
            remaining,
        });
        self
    }

    pub(crate) fn calls(&self) -> Vec<Invocation> {
        self.calls.borrow().clone()
    }

    pub(crate) fn count(&self, prefix: &[&str]) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|inv| starts_with(inv, prefix))
            .count()
    }
}

fn starts_with(invocation: &Invocation, prefix: &[&str]) -> bool {
    invocation.args.len() >= prefix.len()
        && invocation.args.iter().zip(prefix).all(|(a, p)| a == p)
}

impl CommandRunner for ScriptedRunner {
    fn run(&self, invocation: &Invocation) -> Result<ProcessOutput, ProcessError> {
        self.calls.borrow_mut().push(invocation.clone());

        let reply = {
            let mut rules = self.rules.borrow_mut();
            let rule = rules.iter_mut().find(|rule| {
                rule.remaining != Some(0)
                    && starts_with(
                        invocation,
                        &rule.prefix.iter().map(String::as_str).collect::<Vec<_>>(),
                    )
            });
            match rule {
                Some(rule) => {
                    if let Some(n) = rule.remaining.as_mut() {
                        *n -= 1;
                    }
                    rule.reply.clone()
                }
                None => Reply::ok(""),
            }
        };

        let command = invocation.command_line();
        match reply {
            Reply::Exit {
                code,
                stdout,
                stderr,
            } => Ok(ProcessOutput::new(
                command,
                code == 0,
                stdout,
                stderr,
                Some(code),
                Duration::from_millis(1),
                false,
            )),
            Reply::Timeout => Ok(ProcessOutput::new(
                command,
                false,
                "",
                "[Process killed after 1s timeout]",
                None,
                invocation.timeout,
                true,
            )),
            Reply::SpawnError => Err(ProcessError::Spawn {
                command,
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such program"),
            }),
        }
    }
}
