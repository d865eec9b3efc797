//! Test doubles for the pipeline's external collaborators

use gencheck::assistant::{AssistantError, ChatMessage, CorrelationAssistant};
use gencheck::process::{CommandRunner, Invocation, ProcessError, ProcessOutput};
use std::cell::RefCell;
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// How a scripted command ends
#[derive(Debug, Clone)]
pub enum Scripted {
    Exit {
        code: i32,
        stdout: String,
        stderr: String,
    },
    Timeout,
    Missing,
}

impl Scripted {
    pub fn ok(stdout: &str) -> Self {
        Scripted::Exit {
            code: 0,
            stdout: stdout.to_string(),
            stderr: String::new(),
        }
    }

    pub fn fail(stdout: &str) -> Self {
        Scripted::Exit {
            code: 1,
            stdout: stdout.to_string(),
            stderr: String::new(),
        }
    }
}

struct Rule {
    prefix: Vec<String>,
    reply: Scripted,
    uses: Option<usize>,
}

/// Answers invocations by argument prefix, first matching rule wins.
///
/// Anything unscripted succeeds with no output, which is what the
/// toolchain does for most scaffolding commands.
#[derive(Default)]
pub struct FakeRunner {
    rules: RefCell<Vec<Rule>>,
    calls: RefCell<Vec<Invocation>>,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(self, prefix: &[&str], reply: Scripted) -> Self {
        self.rule(prefix, reply, None)
    }

    /// Reply this way for the first matching call only
    pub fn once(self, prefix: &[&str], reply: Scripted) -> Self {
        self.rule(prefix, reply, Some(1))
    }

    fn rule(self, prefix: &[&str], reply: Scripted, uses: Option<usize>) -> Self {
        self.rules.borrow_mut().push(Rule {
            prefix: prefix.iter().map(|p| p.to_string()).collect(),
            reply,
            uses,
        });
        self
    }

    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.borrow().clone()
    }

    pub fn count(&self, prefix: &[&str]) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|c| has_prefix(&c.args, prefix))
            .count()
    }

    /// The analysis-tool call that generated ground-truth tests
    pub fn generation_call(&self) -> Option<Invocation> {
        self.calls()
            .into_iter()
            .find(|c| c.program == ANALYZER && !c.args.first().is_some_and(|a| a.starts_with("--")))
    }
}

/// Program name the fixtures configure for the analysis tool
pub const ANALYZER: &str = "analyzer";

fn has_prefix<S: AsRef<str>>(args: &[String], prefix: &[S]) -> bool {
    args.len() >= prefix.len() && args.iter().zip(prefix).all(|(a, p)| a == p.as_ref())
}

impl CommandRunner for FakeRunner {
    fn run(&self, invocation: &Invocation) -> Result<ProcessOutput, ProcessError> {
        self.calls.borrow_mut().push(invocation.clone());

        let reply = self
            .rules
            .borrow_mut()
            .iter_mut()
            .find(|r| r.uses != Some(0) && has_prefix(&invocation.args, &r.prefix))
            .map(|r| {
                if let Some(n) = r.uses.as_mut() {
                    *n -= 1;
                }
                r.reply.clone()
            })
            .unwrap_or_else(|| Scripted::ok(""));

        let command = invocation.command_line();
        match reply {
            Scripted::Exit {
                code,
                stdout,
                stderr,
            } => Ok(ProcessOutput::new(
                command,
                code == 0,
                stdout,
                stderr,
                Some(code),
                Duration::from_millis(5),
                false,
            )),
            Scripted::Timeout => Ok(ProcessOutput::new(
                command,
                false,
                "",
                "",
                None,
                invocation.timeout,
                true,
            )),
            Scripted::Missing => Err(ProcessError::Spawn {
                command,
                source: io::Error::new(io::ErrorKind::NotFound, "program not found"),
            }),
        }
    }
}

/// Correlation assistant with a fixed reply that counts its requests
pub struct FakeAssistant {
    reply: String,
    requests: AtomicUsize,
}

impl FakeAssistant {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            requests: AtomicUsize::new(0),
        }
    }

    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

impl CorrelationAssistant for FakeAssistant {
    fn complete(&self, messages: &[ChatMessage]) -> Result<String, AssistantError> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        assert!(!messages.is_empty());
        Ok(self.reply.clone())
    }
}
