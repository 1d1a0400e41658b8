//! Edits to the `my_ws` service and reading container details back.

use serde_yaml::{Mapping, Value};
use vdesk_common::constants::{
    DEFAULT_CONTAINER_PORT, ENV_ROOT_PASSWORD, ENV_SWAP_SIZE, SERVICE_NAME,
};
use vdesk_common::types::{ContainerInfo, CreateRequest, ModifyRequest};

use crate::document::ComposeFile;
use crate::env::{get_env, scalar_to_string, set_env};

/// Returns the child mapping under `key`, replacing anything that is not a
/// mapping with an empty one.
fn child_mapping<'a>(parent: &'a mut Mapping, key: &str) -> &'a mut Mapping {
    let slot = parent
        .entry(Value::from(key))
        .or_insert_with(|| Value::Mapping(Mapping::new()));
    as_mapping_slot(slot)
}

/// Views `slot` as a mapping, first replacing a non-mapping value with an
/// empty one.
fn as_mapping_slot(slot: &mut Value) -> &mut Mapping {
    match slot {
        Value::Mapping(map) => map,
        other => {
            *other = Value::Mapping(Mapping::new());
            as_mapping_slot(other)
        }
    }
}

fn child<'a>(parent: &'a Mapping, key: &str) -> Option<&'a Mapping> {
    parent.get(key).and_then(Value::as_mapping)
}

/// The `services.my_ws` mapping, created if absent.
pub fn service_mut(file: &mut ComposeFile) -> &mut Mapping {
    let services = child_mapping(file.root_mut(), "services");
    child_mapping(services, SERVICE_NAME)
}

/// The `services.my_ws` mapping, if present.
#[must_use]
pub fn service(file: &ComposeFile) -> Option<&Mapping> {
    child(file.root(), "services").and_then(|s| child(s, SERVICE_NAME))
}

/// Container-side port of the service's first port mapping.
///
/// Accepts the short `HOST:CONTAINER[/proto]` form and the long form with a
/// `target`, `container` or `to` key.
#[must_use]
pub fn container_port(service: &Mapping) -> Option<String> {
    let first = service.get("ports")?.as_sequence()?.first()?;
    match first {
        Value::String(short) => {
            let (_, right) = short.split_once(':')?;
            let port = right.split('/').next().unwrap_or_default();
            (!port.is_empty()).then(|| port.to_string())
        }
        Value::Mapping(long) => ["target", "container", "to"]
            .iter()
            .filter_map(|k| long.get(*k))
            .find_map(scalar_to_string)
            .filter(|p| !p.is_empty()),
        _ => None,
    }
}

fn gpu_devices(gpus: &[u32]) -> Value {
    let mut device = Mapping::new();
    let _ = device.insert("driver".into(), "nvidia".into());
    let _ = device.insert(
        "device_ids".into(),
        Value::Sequence(gpus.iter().map(|g| Value::from(g.to_string())).collect()),
    );
    let _ = device.insert(
        "capabilities".into(),
        Value::Sequence(vec![Value::from("gpu")]),
    );
    Value::Sequence(vec![Value::Mapping(device)])
}

/// Applies a create request to a freshly copied template.
pub fn apply_create(
    file: &mut ComposeFile,
    request: &CreateRequest,
    host_port: u16,
    root_password: &str,
) {
    let svc = service_mut(file);
    let _ = svc.insert("image".into(), request.image.as_str().into());

    let target = container_port(svc).unwrap_or_else(|| DEFAULT_CONTAINER_PORT.to_string());
    let _ = svc.insert(
        "ports".into(),
        Value::Sequence(vec![Value::from(format!("{host_port}:{target}"))]),
    );

    if let Some(shm) = request.shm_size.as_deref().filter(|s| !s.is_empty()) {
        let _ = svc.insert("shm_size".into(), shm.into());
    }

    let resources = child_mapping(child_mapping(svc, "deploy"), "resources");
    let limits = child_mapping(resources, "limits");
    let _ = limits.insert("memory".into(), request.memory.as_str().into());
    let _ = limits.insert("cpus".into(), request.cpus.to_string().into());
    if !request.gpus.is_empty() {
        let _ = child_mapping(resources, "reservations")
            .insert("devices".into(), gpu_devices(&request.gpus));
    }

    set_env(svc, ENV_ROOT_PASSWORD, root_password);
    if let Some(swap) = request.swap.as_deref().filter(|s| !s.is_empty()) {
        set_env(svc, ENV_SWAP_SIZE, swap);
    }
}

/// Applies a modify request to an existing container's document.
pub fn apply_modify(file: &mut ComposeFile, request: &ModifyRequest) {
    let svc = service_mut(file);

    {
        let resources = child_mapping(child_mapping(svc, "deploy"), "resources");
        if let Some(memory) = request.memory.as_deref().filter(|m| !m.is_empty()) {
            let _ = child_mapping(resources, "limits").insert("memory".into(), memory.into());
        }
        match request.gpus.as_deref() {
            Some([]) => {
                if let Some(Value::Mapping(reservations)) = resources.get_mut("reservations") {
                    let _ = reservations.remove("devices");
                }
            }
            Some(gpus) => {
                let _ = child_mapping(resources, "reservations")
                    .insert("devices".into(), gpu_devices(gpus));
            }
            None => {}
        }
    }

    match request.shm_size.as_deref() {
        Some("") => {
            let _ = svc.remove("shm_size");
        }
        Some(shm) => {
            let _ = svc.insert("shm_size".into(), shm.into());
        }
        None => {}
    }

    if let Some(password) = request.root_password.as_deref() {
        set_env(svc, ENV_ROOT_PASSWORD, password);
    }
    if let Some(swap) = request.swap.as_deref() {
        set_env(svc, ENV_SWAP_SIZE, swap);
    }
}

/// Reads container details from a compose document.
///
/// Missing or malformed sections leave the corresponding field empty;
/// `name` and `state` are left for the caller to fill in.
#[must_use]
pub fn parse_info(file: &ComposeFile) -> ContainerInfo {
    let mut info = ContainerInfo {
        comment: file.comment().map(str::to_string),
        ..ContainerInfo::default()
    };
    let Some(svc) = service(file) else {
        return info;
    };

    info.image = svc.get("image").and_then(scalar_to_string);
    info.port = svc
        .get("ports")
        .and_then(Value::as_sequence)
        .and_then(|ports| ports.first())
        .and_then(scalar_to_string)
        .and_then(|p| p.split(':').next().and_then(|h| h.trim().parse().ok()));
    info.shm_size = svc.get("shm_size").and_then(scalar_to_string);

    let resources = child(svc, "deploy").and_then(|d| child(d, "resources"));
    if let Some(limits) = resources.and_then(|r| child(r, "limits")) {
        info.memory = limits.get("memory").and_then(scalar_to_string);
        info.cpus = limits.get("cpus").and_then(scalar_to_string);
    }
    info.gpus = resources
        .and_then(|r| child(r, "reservations"))
        .and_then(|r| r.get("devices"))
        .and_then(Value::as_sequence)
        .and_then(|devices| devices.first())
        .and_then(|device| device.get("device_ids"))
        .and_then(Value::as_sequence)
        .map(|ids| ids.iter().filter_map(scalar_to_string).collect());

    info.root_password = get_env(svc, ENV_ROOT_PASSWORD);
    info.swap = get_env(svc, ENV_SWAP_SIZE);
    info
}
