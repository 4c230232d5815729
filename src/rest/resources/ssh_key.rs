//! SSH key resource.

use serde::{Deserialize, Serialize};

/// A public SSH key registered on the account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SshKey {
    /// The unique identifier of the key.
    pub id: u64,

    /// Key fingerprint; usable in place of `id` in request paths.
    #[serde(default)]
    pub fingerprint: String,

    /// The public key material.
    #[serde(default)]
    pub public_key: String,

    /// Display name.
    #[serde(default)]
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ssh_key_deserialization() {
        let key: SshKey = serde_json::from_value(json!({
            "id": 512189,
            "fingerprint": "3b:16:bf:e4:8b:00:8b:b8:59:8c:a9:d3:f0:19:45:fa",
            "public_key": "ssh-rsa AAAA... example",
            "name": "My SSH Public Key"
        }))
        .unwrap();

        assert_eq!(key.id, 512_189);
        assert_eq!(key.name, "My SSH Public Key");
    }
}
