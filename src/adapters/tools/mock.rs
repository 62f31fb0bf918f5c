//! Scripted tool runner for testing.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::domain::ports::{ToolError, ToolInvocation, ToolOutput, ToolRunner};

type Matcher = Box<dyn Fn(&ToolInvocation) -> bool + Send + Sync>;

struct Rule {
    matcher: Matcher,
    responses: VecDeque<Result<ToolOutput, ToolError>>,
    sticky: Option<Result<ToolOutput, ToolError>>,
}

/// Tool runner that answers invocations from scripted rules.
///
/// Rules are checked in registration order; the first matching rule with a
/// response wins. Unmatched invocations get the default response. Every
/// invocation is recorded for later assertions.
pub struct MockToolRunner {
    rules: Mutex<Vec<Rule>>,
    default_response: Result<ToolOutput, ToolError>,
    calls: Arc<Mutex<Vec<ToolInvocation>>>,
}

impl Default for MockToolRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl MockToolRunner {
    /// Runner whose default response is a clean, empty success.
    pub fn new() -> Self {
        Self::with_default(Ok(ToolOutput::ok("")))
    }

    /// Runner with a custom default response.
    pub fn with_default(response: Result<ToolOutput, ToolError>) -> Self {
        Self {
            rules: Mutex::new(Vec::new()),
            default_response: response,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Always answer matching invocations with `response`.
    #[must_use]
    pub fn on<F>(self, matcher: F, response: Result<ToolOutput, ToolError>) -> Self
    where
        F: Fn(&ToolInvocation) -> bool + Send + Sync + 'static,
    {
        self.push_rule(Rule {
            matcher: Box::new(matcher),
            responses: VecDeque::new(),
            sticky: Some(response),
        });
        self
    }

    /// Answer successive matching invocations with `responses`, in order.
    #[must_use]
    pub fn on_sequence<F>(self, matcher: F, responses: Vec<Result<ToolOutput, ToolError>>) -> Self
    where
        F: Fn(&ToolInvocation) -> bool + Send + Sync + 'static,
    {
        self.push_rule(Rule {
            matcher: Box::new(matcher),
            responses: responses.into(),
            sticky: None,
        });
        self
    }

    /// Answer invocations whose program is `program`.
    #[must_use]
    pub fn on_program(self, program: &str, response: Result<ToolOutput, ToolError>) -> Self {
        let program = program.to_string();
        self.on(move |inv| inv.program == program, response)
    }

    /// Answer invocations whose command line contains `needle`.
    #[must_use]
    pub fn on_args_containing(self, needle: &str, response: Result<ToolOutput, ToolError>) -> Self {
        let needle = needle.to_string();
        self.on(move |inv| inv.command_line().contains(&needle), response)
    }

    /// Recorded invocations, in call order.
    pub fn calls(&self) -> Vec<ToolInvocation> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    fn push_rule(&self, rule: Rule) {
        if let Ok(mut rules) = self.rules.lock() {
            rules.push(rule);
        }
    }
}

#[async_trait]
impl ToolRunner for MockToolRunner {
    async fn run(&self, invocation: &ToolInvocation) -> Result<ToolOutput, ToolError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(invocation.clone());
        }

        if let Ok(mut rules) = self.rules.lock() {
            for rule in rules.iter_mut().filter(|r| (r.matcher)(invocation)) {
                if let Some(next) = rule.responses.pop_front() {
                    return next;
                }
                if let Some(ref sticky) = rule.sticky {
                    return sticky.clone();
                }
            }
        }

        self.default_response.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::time::Duration;

    fn inv(program: &str, args: &[&str]) -> ToolInvocation {
        ToolInvocation {
            program: program.to_string(),
            args: args.iter().map(|a| (*a).to_string()).collect(),
            cwd: PathBuf::from("."),
            timeout: Duration::from_secs(1),
        }
    }

    #[tokio::test]
    async fn test_rules_and_default() {
        let runner = MockToolRunner::new()
            .on_program("tsc", Ok(ToolOutput::failed(2, "error TS1")))
            .on_sequence(
                |i| i.program == "npm",
                vec![Err(ToolError::Timeout(1)), Ok(ToolOutput::ok("warning"))],
            );

        assert!(!runner.run(&inv("tsc", &[])).await.unwrap().success);
        assert_eq!(runner.run(&inv("npm", &[])).await, Err(ToolError::Timeout(1)));
        assert_eq!(runner.run(&inv("npm", &[])).await.unwrap().combined, "warning");
        // Sequence exhausted -> default
        assert_eq!(runner.run(&inv("npm", &[])).await.unwrap().combined, "");
        assert_eq!(runner.calls().len(), 4);
    }
}
