//! Small naming helpers shared by the resolver and the step describer.

use bpflow_core::types::simple_name_from_path;

/// Engine event names and their short display form.
const EVENT_NAMES: [(&str, &str); 7] = [
    ("ReceiveBeginPlay", "BeginPlay"),
    ("ReceiveTick", "Tick"),
    ("ReceiveAnyDamage", "AnyDamage"),
    ("ReceiveEndPlay", "EndPlay"),
    ("ReceiveDestroyed", "Destroyed"),
    ("OnTakeAnyDamage", "TakeAnyDamage"),
    ("ReceiveDrawHUD", "DrawHUD"),
];

/// Display name of an event: well-known engine events lose their
/// `Receive` prefix, everything else is shown as stored.
pub fn event_display_name(raw: &str) -> String {
    let raw = raw.trim();
    EVENT_NAMES
        .iter()
        .find(|(from, _)| *from == raw)
        .map(|(_, to)| to.to_string())
        .unwrap_or_else(|| raw.to_string())
}

/// True when a call receiver is the trace's own implicit context and should
/// not be shown: empty, `self`, a class default object or a function library.
pub fn is_implicit_target(text: &str) -> bool {
    let text = text.trim();
    text.is_empty()
        || text.eq_ignore_ascii_case("self")
        || text.starts_with("Default__")
        || text.ends_with("Library")
}

/// Simple class name of an owner path, `Default__` and `_C` removed.
pub fn owner_name(path: &str) -> String {
    simple_name_from_path(path)
}

/// Asset part of a class or object path: everything before the first `.`
/// after the last `/`.
pub fn asset_of_path(path: &str) -> &str {
    let path = path.trim();
    let start = path.rfind('/').map_or(0, |i| i + 1);
    match path[start..].find('.') {
        Some(dot) => &path[..start + dot],
        None => path,
    }
}

/// Macro or graph name from a `Asset:Graph` style location.
pub fn item_of_location(location: &str) -> &str {
    location
        .rsplit_once(':')
        .map(|(_, item)| item)
        .unwrap_or(location)
        .trim()
}

/// Member access for a split-struct output pin: `Location_X` on variable
/// `Location` becomes `Location.X`. Any other pin name is the variable itself.
pub fn member_path(variable: &str, pin_name: &str) -> String {
    match pin_name.strip_prefix(variable).and_then(|rest| rest.strip_prefix('_')) {
        Some(member) if !member.is_empty() => format!("{variable}.{member}"),
        _ => variable.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_events_are_shortened() {
        assert_eq!(event_display_name("ReceiveBeginPlay"), "BeginPlay");
        assert_eq!(event_display_name("OnTakeAnyDamage"), "TakeAnyDamage");
        assert_eq!(event_display_name("OnJump"), "OnJump");
    }

    #[test]
    fn implicit_targets() {
        assert!(is_implicit_target(""));
        assert!(is_implicit_target("self"));
        assert!(is_implicit_target("Default__KismetSystemLibrary"));
        assert!(is_implicit_target("KismetMathLibrary"));
        assert!(!is_implicit_target("Player"));
    }

    #[test]
    fn path_helpers() {
        assert_eq!(asset_of_path("/Game/BP_Hero.BP_Hero_C"), "/Game/BP_Hero");
        assert_eq!(asset_of_path("/Game/v1.2/BP.BP_C"), "/Game/v1.2/BP");
        assert_eq!(asset_of_path("/Game/BP_Hero"), "/Game/BP_Hero");
        assert_eq!(item_of_location("/Engine/StandardMacros:ForEachLoop"), "ForEachLoop");
        assert_eq!(owner_name("/Game/BP_Hero.BP_Hero_C"), "BP_Hero");
        assert_eq!(member_path("Location", "Location_X"), "Location.X");
        assert_eq!(member_path("Speed", "Speed"), "Speed");
        assert_eq!(member_path("Max_Speed", "Max_Speed"), "Max_Speed");
    }
}
