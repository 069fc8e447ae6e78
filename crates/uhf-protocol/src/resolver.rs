//! Name to driver-code lookup tables.
//!
//! Every lookup is total: unknown names fall back to a fixed default instead
//! of failing, matching what handheld apps send in practice.
//!
//! | Input | Fallback |
//! |---|---|
//! | region name | `USA` (NA) |
//! | lock object name | `EPC` (bank 1) |
//! | lock action name | `LOCK` for the resolved object |
//!
//! Names are matched case-insensitively.

use uhf_core::{LockAction, LockObject, RegionCode};
use uhf_hardware::{LockKind, LockObjectCode, LockTypeCode, RegionConf};

/// Parse a region name, falling back to USA.
#[must_use]
pub fn parse_region(name: &str) -> RegionCode {
    RegionCode::SETTABLE
        .into_iter()
        .find(|region| region.as_str().eq_ignore_ascii_case(name.trim()))
        .unwrap_or(RegionCode::Usa)
}

/// Module region for a settable region. `Unknown` maps to NA.
#[must_use]
pub fn region_conf(region: RegionCode) -> RegionConf {
    match region {
        RegionCode::Usa | RegionCode::Unknown => RegionConf::Na,
        RegionCode::Eu => RegionConf::Eu,
        RegionCode::Chn => RegionConf::Prc,
        RegionCode::Korea => RegionConf::Kr,
    }
}

/// Caller-facing name of a module region; regions without one are
/// `Unknown`.
#[must_use]
pub fn region_code(conf: RegionConf) -> RegionCode {
    match conf {
        RegionConf::Na => RegionCode::Usa,
        RegionConf::Eu => RegionCode::Eu,
        RegionConf::Prc => RegionCode::Chn,
        RegionConf::Kr => RegionCode::Korea,
        _ => RegionCode::Unknown,
    }
}

/// Resolve a region name straight to the module region.
#[must_use]
pub fn resolve_region(name: &str) -> RegionConf {
    region_conf(parse_region(name))
}

/// Parse a lock object name, falling back to EPC.
#[must_use]
pub fn parse_lock_object(name: &str) -> LockObject {
    LockObject::ALL
        .into_iter()
        .find(|object| object.as_str().eq_ignore_ascii_case(name.trim()))
        .unwrap_or(LockObject::Epc)
}

/// Parse a lock action name, falling back to LOCK.
#[must_use]
pub fn parse_lock_action(name: &str) -> LockAction {
    LockAction::ALL
        .into_iter()
        .find(|action| action.as_str().eq_ignore_ascii_case(name.trim()))
        .unwrap_or(LockAction::Lock)
}

#[must_use]
pub fn lock_object_code(object: LockObject) -> LockObjectCode {
    match object {
        LockObject::Epc => LockObjectCode::Bank1,
        LockObject::Tid => LockObjectCode::Bank2,
        LockObject::User => LockObjectCode::Bank3,
        LockObject::AccessPassword => LockObjectCode::AccessPassword,
        LockObject::KillPassword => LockObjectCode::KillPassword,
    }
}

/// Lock type for an object and action.
#[must_use]
pub fn lock_type_code(object: LockObject, action: LockAction) -> LockTypeCode {
    let kind = match action {
        LockAction::Lock => LockKind::Lock,
        LockAction::Unlock => LockKind::Unlock,
        LockAction::PermaLock => LockKind::PermaLock,
    };
    LockTypeCode::new(lock_object_code(object), kind)
}

/// Resolve lock object and action names to driver codes.
///
/// ```
/// use uhf_protocol::resolver::resolve_lock;
/// use uhf_hardware::{LockKind, LockObjectCode};
///
/// let (object, lock_type) = resolve_lock("tid", "sideways");
/// assert_eq!(object, LockObjectCode::Bank2);
/// assert_eq!(lock_type.kind(), LockKind::Lock);
/// ```
#[must_use]
pub fn resolve_lock(object: &str, action: &str) -> (LockObjectCode, LockTypeCode) {
    let object = parse_lock_object(object);
    let action = parse_lock_action(action);
    (lock_object_code(object), lock_type_code(object, action))
}

/// Every (object, action) pair with its lock type, for enumeration.
pub fn lock_table() -> impl Iterator<Item = (LockObject, LockAction, LockTypeCode)> {
    LockObject::ALL.into_iter().flat_map(|object| {
        LockAction::ALL
            .into_iter()
            .map(move |action| (object, action, lock_type_code(object, action)))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("USA", RegionConf::Na)]
    #[case("usa", RegionConf::Na)]
    #[case("EU", RegionConf::Eu)]
    #[case("CHN", RegionConf::Prc)]
    #[case("Korea", RegionConf::Kr)]
    #[case("", RegionConf::Na)]
    #[case("JAPAN", RegionConf::Na)]
    fn test_resolve_region(#[case] name: &str, #[case] expected: RegionConf) {
        assert_eq!(resolve_region(name), expected);
    }

    #[rstest]
    #[case(RegionConf::Na, RegionCode::Usa)]
    #[case(RegionConf::Eu, RegionCode::Eu)]
    #[case(RegionConf::Prc, RegionCode::Chn)]
    #[case(RegionConf::Kr, RegionCode::Korea)]
    #[case(RegionConf::Jp, RegionCode::Unknown)]
    #[case(RegionConf::Other(0x42), RegionCode::Unknown)]
    fn test_region_code(#[case] conf: RegionConf, #[case] expected: RegionCode) {
        assert_eq!(region_code(conf), expected);
    }

    #[test]
    fn test_settable_regions_round_trip() {
        for region in RegionCode::SETTABLE {
            assert_eq!(region_code(region_conf(region)), region);
        }
    }

    #[rstest]
    #[case("EPC", LockObjectCode::Bank1)]
    #[case("tid", LockObjectCode::Bank2)]
    #[case("USER", LockObjectCode::Bank3)]
    #[case("ACCESS_PASSWORD", LockObjectCode::AccessPassword)]
    #[case("kill_password", LockObjectCode::KillPassword)]
    #[case("RESERVED", LockObjectCode::Bank1)]
    fn test_resolve_lock_object(#[case] name: &str, #[case] expected: LockObjectCode) {
        assert_eq!(resolve_lock(name, "LOCK").0, expected);
    }

    #[rstest]
    #[case("LOCK", LockKind::Lock)]
    #[case("unlock", LockKind::Unlock)]
    #[case("PERMA_LOCK", LockKind::PermaLock)]
    #[case("PERMANENT", LockKind::Lock)]
    #[case("", LockKind::Lock)]
    fn test_resolve_lock_action(#[case] name: &str, #[case] expected: LockKind) {
        assert_eq!(resolve_lock("USER", name).1.kind(), expected);
    }

    #[test]
    fn test_lock_type_targets_resolved_object() {
        for (object, _action, lock_type) in lock_table() {
            assert_eq!(lock_type.object(), lock_object_code(object));
        }
    }
}
