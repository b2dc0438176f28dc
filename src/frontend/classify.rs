//! Structural classification of interfaces.
//!
//! An interface is a *pure observer* when it has at least one method, every method returns `void`, and every
//! parameter is `in`. Such interfaces can only ever be pushed to, so they never get a server half.
//!
//! A pure observer that some other interface takes as a parameter (a handle) is *absorbed* by that owner: its
//! methods become notifications on the owner's client and it produces no output of its own.

use std::collections::HashMap;

use serde::Serialize;

use crate::frontend::ast::Direction;
use crate::frontend::model::{ResolvedInterface, ResolvedUnit};

/// What gets generated for an interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InterfaceRole {
    /// Client plus service trait and server.
    Service,
    /// Pure observer nobody references: a listen-only client.
    PureObserver,
    /// Pure observer merged into the clients of its owners.
    AbsorbedObserver,
}

impl std::fmt::Display for InterfaceRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            InterfaceRole::Service => "service",
            InterfaceRole::PureObserver => "observer",
            InterfaceRole::AbsorbedObserver => "absorbed observer",
        })
    }
}

/// The shared pure-observer predicate.
pub fn is_pure_observer(iface: &ResolvedInterface) -> bool {
    !iface.methods.is_empty()
        && iface.methods.iter().all(|m| {
            m.returns_void() && m.params.iter().all(|p| p.direction == Direction::In)
        })
}

/// Roles and observer relationships for every interface in a unit.
#[derive(Debug, Clone, Default)]
pub struct Classification {
    roles: HashMap<String, InterfaceRole>,
    observers: HashMap<String, Vec<String>>,
    owners: HashMap<String, Vec<String>>,
    /// Interface names in source order.
    order: Vec<String>,
}

impl Classification {
    pub fn role(&self, iface: &str) -> Option<InterfaceRole> {
        self.roles.get(iface).copied()
    }

    /// Pure observers referenced by `iface`, in first-discovery order.
    pub fn observers_of(&self, iface: &str) -> &[String] {
        self.observers.get(iface).map(Vec::as_slice).unwrap_or_default()
    }

    /// Interfaces that absorb the observer `iface`, in source order.
    pub fn owners_of(&self, iface: &str) -> &[String] {
        self.owners.get(iface).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn is_absorbed(&self, iface: &str) -> bool {
        self.role(iface) == Some(InterfaceRole::AbsorbedObserver)
    }

    pub fn has_server(&self, iface: &str) -> bool {
        self.role(iface) == Some(InterfaceRole::Service)
    }

    /// Absorbed observers, in source order.
    pub fn absorbed(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str).filter(|name| self.is_absorbed(name))
    }

    /// Interfaces that produce output, in source order.
    pub fn emitted(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str).filter(|name| !self.is_absorbed(name))
    }
}

/// Classify every interface of `unit`.
pub fn classify(unit: &ResolvedUnit) -> Classification {
    let pure: HashMap<&str, bool> = unit
        .interfaces
        .iter()
        .map(|i| (i.name.as_str(), is_pure_observer(i)))
        .collect();

    let mut classification = Classification::default();
    for iface in &unit.interfaces {
        classification.order.push(iface.name.clone());

        let mut found: Vec<String> = Vec::new();
        let handles = iface
            .methods
            .iter()
            .flat_map(|m| m.params.iter())
            .filter_map(|p| p.ty.handle_target());
        for target in handles {
            let observed = target != iface.name && pure.get(target).copied().unwrap_or(false);
            if observed && !found.iter().any(|f| f == target) {
                found.push(target.to_string());
            }
        }
        for observer in &found {
            classification
                .owners
                .entry(observer.clone())
                .or_default()
                .push(iface.name.clone());
        }
        classification.observers.insert(iface.name.clone(), found);
    }

    for iface in &unit.interfaces {
        let role = if !pure[iface.name.as_str()] {
            InterfaceRole::Service
        } else if classification.owners.contains_key(&iface.name) {
            InterfaceRole::AbsorbedObserver
        } else {
            InterfaceRole::PureObserver
        };
        classification.roles.insert(iface.name.clone(), role);
    }

    classification
}
