// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Propgate Contributors

//! In-memory record store.
//!
//! Stand-in for the platform's relational layer (out of scope here): holds
//! the users, properties and contracts the handlers resolve ownership facts
//! from. Resource scopes are resolved per request and never cached.

use std::collections::HashMap;

use crate::auth::rbac::ContractScope;
use crate::auth::Role;
use crate::models::{Contract, Property, UserRecord};

#[derive(Default)]
pub struct InMemoryStore {
    users: HashMap<String, UserRecord>,
    properties: HashMap<String, Property>,
    contracts: HashMap<String, Contract>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_user(&mut self, user: UserRecord) {
        self.users.insert(user.id.clone(), user);
    }

    pub fn insert_property(&mut self, property: Property) {
        self.properties.insert(property.id.clone(), property);
    }

    pub fn insert_contract(&mut self, contract: Contract) {
        self.contracts.insert(contract.id.clone(), contract);
    }

    pub fn user_by_email(&self, email: &str) -> Option<UserRecord> {
        self.users.values().find(|u| u.email == email).cloned()
    }

    pub fn property(&self, property_id: &str) -> Option<Property> {
        self.properties.get(property_id).cloned()
    }

    pub fn contract(&self, contract_id: &str) -> Option<Contract> {
        self.contracts.get(contract_id).cloned()
    }

    /// Properties visible to one identity: admins see everything, managers
    /// their own portfolio, tenants the properties they rent.
    pub fn properties_visible_to(&self, subject_id: &str, role: Role) -> Vec<Property> {
        match role {
            Role::Admin => self.properties.values().cloned().collect(),
            Role::Manager => self
                .properties
                .values()
                .filter(|p| p.manager_id == subject_id)
                .cloned()
                .collect(),
            Role::Tenant => self
                .contracts
                .values()
                .filter(|c| c.tenant_id == subject_id)
                .filter_map(|c| self.properties.get(&c.property_id))
                .cloned()
                .collect(),
        }
    }

    /// Resolve the ownership facts for a contract: its tenant and the
    /// manager of its property.
    pub fn contract_scope(&self, contract_id: &str) -> Option<ContractScope> {
        let contract = self.contracts.get(contract_id)?;
        let property = self.properties.get(&contract.property_id)?;
        Some(ContractScope {
            tenant_id: contract.tenant_id.clone(),
            property_manager_id: property.manager_id.clone(),
        })
    }

    pub fn rename_property(&mut self, property_id: &str, name: impl Into<String>) -> Option<Property> {
        let property = self.properties.get_mut(property_id)?;
        property.name = name.into();
        Some(property.clone())
    }

    /// Destructive bootstrap: drop everything and load the demo data set.
    /// Production runs require the explicit opt-in flag (checked by the
    /// seed endpoint, not here).
    pub fn seed(&mut self) {
        self.users.clear();
        self.properties.clear();
        self.contracts.clear();

        for (id, email, role) in [
            ("A1", "admin@propgate.example", Role::Admin),
            ("M1", "manager.one@propgate.example", Role::Manager),
            ("M2", "manager.two@propgate.example", Role::Manager),
            ("T1", "tenant.one@propgate.example", Role::Tenant),
            ("T2", "tenant.two@propgate.example", Role::Tenant),
        ] {
            self.insert_user(UserRecord {
                id: id.to_string(),
                email: email.to_string(),
                role,
            });
        }

        for (id, name, address, manager_id) in [
            ("prop_1", "Rue Verte 12", "12 Rue Verte, Lyon", "M1"),
            ("prop_2", "Hafenblick 3", "Hafenstrasse 3, Hamburg", "M2"),
        ] {
            self.insert_property(Property {
                id: id.to_string(),
                name: name.to_string(),
                address: address.to_string(),
                manager_id: manager_id.to_string(),
            });
        }

        for (id, property_id, tenant_id) in [
            ("contract_1", "prop_1", "T1"),
            ("contract_2", "prop_2", "T2"),
        ] {
            self.insert_contract(Contract {
                id: id.to_string(),
                property_id: property_id.to_string(),
                tenant_id: tenant_id.to_string(),
            });
        }
    }
}
