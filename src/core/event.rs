//! Event dispatcher.
//!
//! Listeners are registered against a trigger pattern where `*` matches any
//! run of characters and `?` matches one. Patterns match as a prefix of the
//! event name. Listeners run in ascending priority; the first action that
//! returns a value stops the chain.

use crate::core::registry::Registry;
use crate::utils::error::{CartError, Result};
use regex::Regex;
use serde_json::Value;

type ActionFn = fn(&Registry, &str, &Value) -> Result<Option<Value>>;

const ACTIONS: &[(&str, ActionFn)] = &[("event/debug", debug_action), ("event/log", log_action)];

fn debug_action(_registry: &Registry, event: &str, args: &Value) -> Result<Option<Value>> {
    tracing::debug!("🔔 {} {}", event, args);
    Ok(None)
}

fn log_action(registry: &Registry, event: &str, args: &Value) -> Result<Option<Value>> {
    registry.log()?.write(format_args!("event {} {}", event, args))?;
    Ok(None)
}

/// A route into the compiled action table.
#[derive(Clone)]
pub struct Action {
    route: String,
    handler: ActionFn,
}

impl std::fmt::Debug for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Action").field("route", &self.route).finish()
    }
}

impl Action {
    pub fn new(route: &str) -> Result<Self> {
        let route: String = route
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '/'))
            .collect();
        let handler = ACTIONS
            .iter()
            .find(|(name, _)| *name == route)
            .map(|(_, handler)| *handler)
            .ok_or_else(|| CartError::UnknownActionError {
                route: route.clone(),
            })?;
        Ok(Self { route, handler })
    }

    pub fn route(&self) -> &str {
        &self.route
    }

    pub fn execute(&self, registry: &Registry, event: &str, args: &Value) -> Result<Option<Value>> {
        (self.handler)(registry, event, args)
    }
}

#[derive(Debug, Clone)]
struct Listener {
    trigger: String,
    pattern: Regex,
    action: Action,
    priority: i64,
}

#[derive(Debug, Clone, Default)]
pub struct EventDispatcher {
    listeners: Vec<Listener>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, trigger: &str, action: Action, priority: i64) -> Result<()> {
        let pattern = Regex::new(&format!(
            "^{}",
            regex::escape(trigger)
                .replace(r"\*", ".*")
                .replace(r"\?", ".")
        ))?;

        self.listeners.push(Listener {
            trigger: trigger.to_string(),
            pattern,
            action,
            priority,
        });
        // stable sort，同優先權保持註冊順序
        self.listeners.sort_by_key(|l| l.priority);
        Ok(())
    }

    pub fn unregister(&mut self, trigger: &str, route: &str) {
        self.listeners
            .retain(|l| !(l.trigger == trigger && l.action.route() == route));
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Routes that would run for `event`, in execution order.
    pub fn matching(&self, event: &str) -> Vec<&str> {
        self.listeners
            .iter()
            .filter(|l| l.pattern.is_match(event))
            .map(|l| l.action.route())
            .collect()
    }

    pub fn trigger(&self, registry: &Registry, event: &str, args: &Value) -> Result<Option<Value>> {
        for listener in self.listeners.iter().filter(|l| l.pattern.is_match(event)) {
            if let Some(output) = listener.action.execute(registry, event, args)? {
                return Ok(Some(output));
            }
        }
        Ok(None)
    }
}
