//! Which replica errors are replayed on the leader.

use regex::Regex;

use crate::backend::{self, ErrorKind};
use crate::config::{Error, NoReplay};

/// Compiled `no_replay` rule.
#[derive(Debug, Clone)]
struct Rule {
    class: Option<String>,
    kinds: Vec<ErrorKind>,
    messages: Vec<Regex>,
}

impl Rule {
    fn new(config: &NoReplay) -> Result<Self, Error> {
        let messages = config
            .messages
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|err| Error::Regex(pattern.clone(), err))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            class: config.class.clone(),
            kinds: config.kinds.clone(),
            messages,
        })
    }

    fn matches(&self, err: &backend::Error) -> bool {
        if let Some(ref class) = self.class {
            if *class != err.class {
                return false;
            }
        }

        if self.kinds.is_empty() && self.messages.is_empty() {
            return true;
        }

        self.kinds.contains(&err.kind) || self.messages.iter().any(|re| re.is_match(&err.message))
    }
}

/// Replica errors that surface to the caller instead of being replayed on the leader.
#[derive(Debug, Clone, Default)]
pub struct ReplayPolicy {
    rules: Vec<Rule>,
}

impl ReplayPolicy {
    /// Compile `no_replay` rules.
    pub fn new(rules: &[NoReplay]) -> Result<Self, Error> {
        Ok(Self {
            rules: rules.iter().map(Rule::new).collect::<Result<_, _>>()?,
        })
    }

    /// The error must not be replayed on the leader.
    pub fn forbids(&self, err: &backend::Error) -> bool {
        self.rules.iter().any(|rule| rule.matches(err))
    }

    /// Replay everything.
    pub fn replay_all() -> Self {
        Self::default()
    }

    /// Surface timeouts, replay everything else.
    pub fn timeouts() -> Self {
        Self {
            rules: vec![Rule {
                class: None,
                kinds: vec![ErrorKind::Timeout],
                messages: vec![],
            }],
        }
    }
}
