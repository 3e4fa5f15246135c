//! Ready-made resources for tests and local experiments.
//!
//! All fixtures live in the `default/default` tenant.

use chrono::Utc;

use crate::{Actor, CheckConfig, CheckResult, Entity, Event, Rule, User};

pub const DEFAULT_ORGANIZATION: &str = "default";
pub const DEFAULT_ENVIRONMENT: &str = "default";

pub fn fixture_entity(name: &str) -> Entity {
    Entity {
        name: name.to_string(),
        organization: DEFAULT_ORGANIZATION.to_string(),
        environment: DEFAULT_ENVIRONMENT.to_string(),
        class: "host".to_string(),
        subscriptions: vec!["linux".to_string()],
        last_seen: Some(Utc::now()),
    }
}

pub fn fixture_check_config(name: &str) -> CheckConfig {
    CheckConfig {
        name: name.to_string(),
        organization: DEFAULT_ORGANIZATION.to_string(),
        environment: DEFAULT_ENVIRONMENT.to_string(),
        command: "true".to_string(),
        interval: 60,
        subscriptions: vec!["linux".to_string()],
        publish: true,
    }
}

pub fn fixture_check_result(name: &str) -> CheckResult {
    CheckResult {
        name: name.to_string(),
        command: "true".to_string(),
        status: 0,
        output: String::new(),
        executed: Utc::now(),
        duration: 0.01,
    }
}

pub fn fixture_event(entity_name: &str, check_name: &str) -> Event {
    Event {
        timestamp: Utc::now(),
        entity: fixture_entity(entity_name),
        check: fixture_check_result(check_name),
    }
}

pub fn fixture_user(username: &str) -> User {
    User {
        username: username.to_string(),
        roles: vec!["default".to_string()],
        disabled: false,
    }
}

/// Actor allowed to do everything everywhere.
pub fn fixture_actor_admin(name: &str) -> Actor {
    Actor::new(name, vec![Rule::superuser()])
}
