// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Propgate Contributors

//! Record-level authorization predicates.
//!
//! Pure, deterministic, no I/O. These are the single source of truth for
//! record-scope decisions; handlers call them instead of reimplementing the
//! logic inline.

use super::claims::IdentityAssertion;
use super::roles::Role;

/// Ownership facts about a contract needed for authorization.
///
/// Resolved from storage per request; never cached beyond one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractScope {
    /// The tenant party to the contract.
    pub tenant_id: String,
    /// The manager of the property the contract is for.
    pub property_manager_id: String,
}

/// Can this identity manage (edit, reassign, delete) a property?
///
/// Admins always can; managers only manage their own properties.
pub fn can_manage_property(identity: &IdentityAssertion, resource_manager_id: &str) -> bool {
    match identity.role {
        Role::Admin => true,
        Role::Manager => identity.subject_id == resource_manager_id,
        Role::Tenant => false,
    }
}

/// Can this identity access a contract's scope (view it, its documents,
/// its payment history)?
///
/// Admins always can; the property's manager can; the contract's own tenant
/// can. Any other combination is denied, including a tenant reading another
/// tenant's contract.
pub fn can_access_contract_scope(identity: &IdentityAssertion, contract: &ContractScope) -> bool {
    match identity.role {
        Role::Admin => true,
        Role::Manager => identity.subject_id == contract.property_manager_id,
        Role::Tenant => identity.subject_id == contract.tenant_id,
    }
}

/// Does the (possibly absent) identity hold one of the allowed roles?
///
/// Absent identity is always denied.
pub fn has_any_role(identity: Option<&IdentityAssertion>, allowed: &[Role]) -> bool {
    match identity {
        Some(identity) => allowed.contains(&identity.role),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(id: &str, role: Role) -> IdentityAssertion {
        IdentityAssertion::new(id, format!("{id}@example.com"), role)
    }

    #[test]
    fn admin_manages_any_property() {
        assert!(can_manage_property(&identity("A1", Role::Admin), "M2"));
    }

    #[test]
    fn manager_manages_only_own_property() {
        assert!(can_manage_property(&identity("M1", Role::Manager), "M1"));
        assert!(!can_manage_property(&identity("M1", Role::Manager), "M2"));
    }

    #[test]
    fn tenant_never_manages_property() {
        assert!(!can_manage_property(&identity("T1", Role::Tenant), "T1"));
    }

    #[test]
    fn contract_scope_for_admin_and_manager() {
        let scope = ContractScope {
            tenant_id: "T1".into(),
            property_manager_id: "M1".into(),
        };
        assert!(can_access_contract_scope(&identity("A1", Role::Admin), &scope));
        assert!(can_access_contract_scope(&identity("M1", Role::Manager), &scope));
        assert!(!can_access_contract_scope(&identity("M2", Role::Manager), &scope));
    }

    /// A tenant can only ever see a contract whose tenant id equals their own
    /// subject id. Exercised across a grid of tenants and contracts.
    #[test]
    fn tenant_cannot_access_other_tenants_contracts() {
        let tenants = ["T1", "T2", "T3", "T4"];
        for subject in tenants {
            let caller = identity(subject, Role::Tenant);
            for contract_tenant in tenants {
                for manager in ["M1", "M2", subject] {
                    let scope = ContractScope {
                        tenant_id: contract_tenant.into(),
                        property_manager_id: manager.into(),
                    };
                    assert_eq!(
                        can_access_contract_scope(&caller, &scope),
                        subject == contract_tenant,
                        "caller {subject} contract tenant {contract_tenant} manager {manager}"
                    );
                }
            }
        }
    }

    #[test]
    fn has_any_role_denies_absent_identity() {
        assert!(!has_any_role(None, &[Role::Admin, Role::Manager, Role::Tenant]));
    }

    #[test]
    fn has_any_role_checks_membership() {
        let manager = identity("M1", Role::Manager);
        assert!(has_any_role(Some(&manager), &[Role::Admin, Role::Manager]));
        assert!(!has_any_role(Some(&manager), &[Role::Admin]));
        assert!(!has_any_role(Some(&manager), &[]));
    }
}
