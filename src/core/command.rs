//! # Command Line DSL
//!
//! What a line typed after `:` means.
//!
//! ```text
//! sg                       → navigate via alias (ec2/security-groups)
//! ec2                      → navigate to the service's default resource type
//! ec2/volumes vol-123      → navigate straight to a resource's detail
//! /web  |  filter web      → set the current list filter
//! diff i-1 i-2             → diff two resources from the current list
//! region us-east-1,eu-west-1
//! profile prod
//! home | help | activity | back | quit
//! ```
//!
//! Aliases are resolved here; whether a (service, resource type) is actually
//! registered is decided when the navigation target is built.

use thiserror::Error;

use crate::core::config::split_list;
use crate::core::selection::{SelectionChange, SelectionKind};
use crate::registry::Registry;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Navigate {
        service: String,
        resource_type: Option<String>,
        id: Option<String>,
    },
    Filter(String),
    Diff(String, String),
    Select(SelectionChange),
    Home,
    Help,
    Log,
    Back,
    Quit,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("empty command")]
    Empty,
    #[error("{command} needs {expected}")]
    MissingArgument {
        command: &'static str,
        expected: &'static str,
    },
    #[error("unexpected arguments after {0}")]
    TrailingArguments(String),
}

pub fn parse(line: &str, registry: &Registry) -> Result<Command, CommandError> {
    let line = line.trim();
    if line.is_empty() {
        return Err(CommandError::Empty);
    }

    if let Some(filter) = line.strip_prefix('/') {
        return Ok(Command::Filter(filter.trim().to_string()));
    }

    let mut words = line.split_whitespace();
    let head = words.next().ok_or(CommandError::Empty)?;
    let rest: Vec<&str> = words.collect();

    match head {
        "home" | "h" => no_args(head, &rest, Command::Home),
        "help" | "?" => no_args(head, &rest, Command::Help),
        "activity" | "log" => no_args(head, &rest, Command::Log),
        "back" => no_args(head, &rest, Command::Back),
        "quit" | "q" | "q!" => no_args(head, &rest, Command::Quit),
        "filter" => Ok(Command::Filter(rest.join(" "))),
        "diff" => match rest.as_slice() {
            [a, b] => Ok(Command::Diff(a.to_string(), b.to_string())),
            [_, _, ..] => Err(CommandError::TrailingArguments("diff".to_string())),
            _ => Err(CommandError::MissingArgument {
                command: "diff",
                expected: "two resource ids",
            }),
        },
        "region" | "regions" => selection(SelectionKind::Regions, "region", &rest),
        "profile" | "profiles" => selection(SelectionKind::Profiles, "profile", &rest),
        target => navigate(target, &rest, registry),
    }
}

fn no_args(head: &str, rest: &[&str], command: Command) -> Result<Command, CommandError> {
    if rest.is_empty() {
        Ok(command)
    } else {
        Err(CommandError::TrailingArguments(head.to_string()))
    }
}

fn selection(
    kind: SelectionKind,
    command: &'static str,
    rest: &[&str],
) -> Result<Command, CommandError> {
    let values = split_list(&rest.join(","));
    if values.is_empty() {
        return Err(CommandError::MissingArgument {
            command,
            expected: "at least one value",
        });
    }
    Ok(Command::Select(SelectionChange { kind, values }))
}

fn navigate(target: &str, rest: &[&str], registry: &Registry) -> Result<Command, CommandError> {
    let id = match rest {
        [] => None,
        [id] => Some(id.to_string()),
        _ => return Err(CommandError::TrailingArguments(target.to_string())),
    };

    if let Some((service, resource_type)) = registry.resolve_alias(target) {
        return Ok(Command::Navigate {
            service,
            resource_type,
            id,
        });
    }

    let (service, resource_type) = match target.split_once('/') {
        Some((service, resource_type)) => {
            // The service half may itself be an alias ("compute/instances").
            let service = registry
                .resolve_alias(service)
                .map(|(s, _)| s)
                .unwrap_or_else(|| service.to_string());
            (service, Some(resource_type.to_string()).filter(|t| !t.is_empty()))
        }
        None => (target.to_string(), None),
    };

    Ok(Command::Navigate {
        service,
        resource_type,
        id,
    })
}
