//! Integration tests for the resource registry.
//!
//! These tests verify the kind table, envelope decoding for every kind,
//! tolerance of malformed collection elements and the embedded error shape.

use digitalocean_api::rest::registry::{self, Decoded, Plurality, ResourceKind};
use digitalocean_api::rest::resources::{ActionRecord, ActionStatus, Droplet, Entity, SshKey};
use digitalocean_api::ResourceError;
use serde_json::{json, Value};

/// Returns one valid element for the kind.
fn sample_element(kind: ResourceKind) -> Value {
    match kind {
        ResourceKind::Region | ResourceKind::Regions => {
            json!({"slug": "nyc3", "name": "New York 3", "available": true})
        }
        ResourceKind::Droplet | ResourceKind::Droplets => {
            json!({"id": 3164444, "name": "example.com", "status": "active"})
        }
        ResourceKind::Image | ResourceKind::Images => {
            json!({"id": 7555620, "slug": "ubuntu-24-04-x64", "public": true})
        }
        ResourceKind::Size | ResourceKind::Sizes => {
            json!({"slug": "s-1vcpu-1gb", "memory": 1024, "vcpus": 1})
        }
        ResourceKind::Key | ResourceKind::Keys => {
            json!({"id": 512189, "name": "laptop", "fingerprint": "3b:16"})
        }
        ResourceKind::Action | ResourceKind::Actions | ResourceKind::DropletActions => {
            json!({"id": 36804636, "status": "completed", "type": "create"})
        }
    }
}

// ============================================================================
// Kind Table
// ============================================================================

#[test]
fn test_every_kind_has_a_table_entry() {
    let entries: Vec<_> = registry::entries().collect();
    assert_eq!(entries.len(), ResourceKind::ALL.len());

    for kind in ResourceKind::ALL {
        let spec = kind.spec();
        assert_eq!(spec.kind, kind);
        assert!(!spec.template.is_empty());
        assert!(!spec.envelope_key.is_empty());
        assert_eq!(registry::resolve(kind), spec.template);
    }
}

#[test]
fn test_singular_templates_take_an_identifier() {
    for kind in ResourceKind::ALL {
        if kind.plurality() == Plurality::Single {
            assert!(
                kind.template().contains("{id}"),
                "{kind} template should contain an identifier placeholder"
            );
        }
    }
}

#[test]
fn test_known_templates_and_envelopes() {
    assert_eq!(ResourceKind::Droplets.template(), "droplets");
    assert_eq!(ResourceKind::Droplet.envelope_key(), "droplet");
    assert_eq!(ResourceKind::Keys.template(), "account/keys");
    assert_eq!(ResourceKind::Key.envelope_key(), "ssh_key");
    assert_eq!(ResourceKind::DropletActions.template(), "droplets/{id}/actions");
    assert_eq!(ResourceKind::DropletActions.envelope_key(), "actions");
    assert!(ResourceKind::DropletActions.is_collection());
}

// ============================================================================
// Decoding
// ============================================================================

#[test]
fn test_every_singular_kind_decodes_its_envelope() {
    for kind in ResourceKind::ALL {
        if kind.is_collection() {
            continue;
        }
        let body = json!({ kind.envelope_key(): sample_element(kind) });
        let decoded = registry::deserialize(kind, &body).unwrap();
        assert!(
            matches!(decoded, Decoded::Single(_)),
            "{kind} should decode to a single entity"
        );
    }
}

#[test]
fn test_collections_skip_malformed_elements() {
    for kind in ResourceKind::ALL {
        if !kind.is_collection() {
            continue;
        }
        let body = json!({
            kind.envelope_key(): [sample_element(kind), {"unexpected": true}, sample_element(kind)]
        });

        let entities = registry::deserialize(kind, &body).unwrap().into_vec();
        assert_eq!(entities.len(), 2, "{kind} should keep the two valid elements");
    }
}

#[test]
fn test_collection_preserves_order() {
    let body = json!({
        "ssh_keys": [
            {"id": 1, "name": "first"},
            {"id": 2, "name": "second"},
            {"id": 3, "name": "third"}
        ]
    });

    let names: Vec<String> = registry::deserialize(ResourceKind::Keys, &body)
        .unwrap()
        .into_vec()
        .into_iter()
        .map(|e| SshKey::try_from(e).unwrap().name)
        .collect();

    assert_eq!(names, vec!["first", "second", "third"]);
}

#[test]
fn test_malformed_singular_payload_fails() {
    let body = json!({"droplet": {"name": "missing-id"}});
    let result = registry::deserialize(ResourceKind::Droplet, &body);

    assert!(matches!(
        result,
        Err(ResourceError::Parse {
            kind: ResourceKind::Droplet,
            ..
        })
    ));
}

#[test]
fn test_missing_envelope_key_fails() {
    let body = json!({"regions": []});
    let result = registry::deserialize(ResourceKind::Sizes, &body);
    assert!(matches!(result, Err(ResourceError::Parse { .. })));
}

#[test]
fn test_embedded_error_becomes_provider_error() {
    let body = json!({"id": "unprocessable_entity", "message": "X"});

    for kind in [ResourceKind::Droplet, ResourceKind::Droplets] {
        match registry::deserialize(kind, &body) {
            Err(ResourceError::Provider(error)) => {
                assert_eq!(error.message, "X");
                assert_eq!(error.to_string(), "X");
            }
            other => panic!("expected provider error for {kind}, got {other:?}"),
        }
    }
}

#[test]
fn test_decoded_entities_convert_to_typed_resources() {
    let body = json!({"action": {"id": 7, "status": "in-progress", "type": "reboot"}});
    let entity = registry::deserialize(ResourceKind::Action, &body)
        .unwrap()
        .into_single()
        .unwrap();

    assert!(matches!(entity, Entity::Action(_)));
    let record = ActionRecord::try_from(entity).unwrap();
    assert_eq!(record.status, ActionStatus::InProgress);
    assert!(record.is_pending());

    let body = json!({"droplet": sample_element(ResourceKind::Droplet)});
    let entity = registry::deserialize(ResourceKind::Droplet, &body)
        .unwrap()
        .into_single()
        .unwrap();
    assert!(ActionRecord::try_from(entity.clone()).is_err());
    assert_eq!(Droplet::try_from(entity).unwrap().id, 3_164_444);
}
