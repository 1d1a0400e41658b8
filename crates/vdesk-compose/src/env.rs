//! The `environment` section of a compose service.
//!
//! Compose accepts either a mapping (`KEY: value`) or a list of
//! `KEY=VALUE` strings; both are read and updated in place.

use serde_yaml::{Mapping, Value};

const ENVIRONMENT: &str = "environment";

/// Sets `key` in the service environment, keeping whichever form the
/// template uses. A missing or malformed section becomes a mapping.
pub fn set_env(service: &mut Mapping, key: &str, value: &str) {
    match service.get_mut(ENVIRONMENT) {
        Some(Value::Sequence(list)) => set_env_key_in_list(list, key, value),
        Some(Value::Mapping(map)) => {
            let _ = map.insert(Value::from(key), Value::from(value));
        }
        _ => {
            let mut map = Mapping::new();
            let _ = map.insert(Value::from(key), Value::from(value));
            let _ = service.insert(Value::from(ENVIRONMENT), Value::Mapping(map));
        }
    }
}

/// Reads `key` from the service environment.
#[must_use]
pub fn get_env(service: &Mapping, key: &str) -> Option<String> {
    match service.get(ENVIRONMENT)? {
        Value::Mapping(map) => map.get(key).and_then(scalar_to_string),
        Value::Sequence(list) => list.iter().filter_map(Value::as_str).find_map(|item| {
            let (k, v) = item.split_once('=')?;
            (k == key).then(|| v.to_string())
        }),
        _ => None,
    }
}

/// Updates the first `KEY=...` entry of `list`, or appends one.
///
/// Non-string entries are left untouched.
pub fn set_env_key_in_list(list: &mut Vec<Value>, key: &str, value: &str) {
    let entry = Value::from(format!("{key}={value}"));
    let existing = list.iter_mut().find(|item| {
        item.as_str()
            .is_some_and(|s| s.split('=').next() == Some(key))
    });
    match existing {
        Some(slot) => *slot = entry,
        None => list.push(entry),
    }
}

/// Renders a YAML scalar as a string; collections and null yield `None`.
#[must_use]
pub fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(yaml: &str) -> Mapping {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn list_entry_is_replaced() {
        let mut list = vec![Value::from("A=1"), Value::from("ROOTPASSWORD=old")];
        set_env_key_in_list(&mut list, "ROOTPASSWORD", "new");
        assert_eq!(list, vec![Value::from("A=1"), Value::from("ROOTPASSWORD=new")]);
    }

    #[test]
    fn list_entry_is_appended() {
        let mut list = vec![Value::from("A=1")];
        set_env_key_in_list(&mut list, "SWAP_SIZE", "8g");
        assert_eq!(list, vec![Value::from("A=1"), Value::from("SWAP_SIZE=8g")]);
    }

    #[test]
    fn list_prefix_keys_do_not_match() {
        let mut list = vec![Value::from("ROOTPASSWORD_HINT=x")];
        set_env_key_in_list(&mut list, "ROOTPASSWORD", "pw");
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn set_env_keeps_list_form() {
        let mut svc = service("environment:\n  - TZ=UTC\n");
        set_env(&mut svc, "ROOTPASSWORD", "pw");
        assert!(svc.get("environment").unwrap().is_sequence());
        assert_eq!(get_env(&svc, "ROOTPASSWORD").as_deref(), Some("pw"));
        assert_eq!(get_env(&svc, "TZ").as_deref(), Some("UTC"));
    }

    #[test]
    fn set_env_keeps_mapping_form() {
        let mut svc = service("environment:\n  TZ: UTC\n");
        set_env(&mut svc, "SWAP_SIZE", "4g");
        assert!(svc.get("environment").unwrap().is_mapping());
        assert_eq!(get_env(&svc, "SWAP_SIZE").as_deref(), Some("4g"));
    }

    #[test]
    fn set_env_creates_mapping_when_missing() {
        let mut svc = service("image: ubuntu\n");
        set_env(&mut svc, "ROOTPASSWORD", "pw");
        set_env(&mut svc, "SWAP_SIZE", "2g");
        let env = svc.get("environment").unwrap().as_mapping().unwrap();
        assert_eq!(env.len(), 2);
    }

    #[test]
    fn get_env_reads_numbers() {
        let svc = service("environment:\n  SWAP_SIZE: 8\n");
        assert_eq!(get_env(&svc, "SWAP_SIZE").as_deref(), Some("8"));
    }

    #[test]
    fn get_env_value_may_contain_equals() {
        let svc = service("environment:\n  - ROOTPASSWORD=a=b\n");
        assert_eq!(get_env(&svc, "ROOTPASSWORD").as_deref(), Some("a=b"));
    }
}
