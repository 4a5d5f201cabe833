#![forbid(unsafe_code)]

//! Versioned serialized form of a single item.
//!
//! The envelope carries the attribute map, the group partition, the child
//! order and the resolved URL:
//!
//! ```text
//! {"version": 1, "items": {...}, "groupPartition": [[path, ...], ...],
//!  "childrenOrder": {alias: path, ...}, "url": "..." | null}
//! ```
//!
//! Relatives are stored as paths, not inlined, so one envelope does not
//! round-trip a whole tree: decoding yields an item whose child paths must
//! be resolved against a store holding the other items.
//!
//! Decoding rejects any envelope whose `version` is absent or differs from
//! [`VERSION`]. Stale cached data is never migrated or partially applied.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::attributes::{AttributeMap, Attributes};
use crate::error::{MenuError, MenuResult};
use crate::item::Item;

/// Current serialized format version.
pub const VERSION: u32 = 1;

/// The serialized envelope of an [`Item`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SerializedItem {
    pub version: u32,
    /// Attribute map including defaults.
    pub items: AttributeMap,
    pub group_partition: Vec<Vec<String>>,
    pub children_order: IndexMap<String, String>,
    pub url: Option<String>,
}

impl SerializedItem {
    /// Capture `item` at the current version.
    #[must_use]
    pub fn pack(item: &Item) -> Self {
        Self {
            version: VERSION,
            items: item.to_map(true),
            group_partition: item.group_partition().to_vec(),
            children_order: item.children_order().clone(),
            url: item.url().map(str::to_owned),
        }
    }

    /// Rebuild the item, rejecting a version mismatch.
    pub fn unpack(self) -> MenuResult<Item> {
        if self.version != VERSION {
            return Err(MenuError::format(format!(
                "version {} does not match {VERSION}",
                self.version
            )));
        }
        Ok(Item::from_parts(
            Attributes::from_map(&self.items),
            self.children_order,
            self.group_partition,
            self.url,
        ))
    }
}

impl Item {
    /// Encode as JSON text.
    pub fn encode(&self) -> MenuResult<String> {
        Ok(serde_json::to_string(&SerializedItem::pack(self))?)
    }

    /// Decode JSON text produced by [`Item::encode`].
    pub fn decode(data: &str) -> MenuResult<Item> {
        let result = decode_envelope(data).and_then(SerializedItem::unpack);

        #[cfg(feature = "tracing")]
        if let Err(e) = &result {
            tracing::warn!(error = %e, "rejected serialized menu item");
        }

        result
    }
}

fn decode_envelope(data: &str) -> MenuResult<SerializedItem> {
    let value: Value = serde_json::from_str(data)?;
    match value.get("version") {
        None | Some(Value::Null) => return Err(MenuError::format("missing version tag")),
        Some(version) if version.as_u64() != Some(u64::from(VERSION)) => {
            return Err(MenuError::format(format!(
                "version {version} does not match {VERSION}"
            )));
        }
        Some(_) => {}
    }
    serde_json::from_value(value).map_err(|e| MenuError::format(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ordering::GroupSpec;
    use serde_json::json;

    fn grouped_item() -> Item {
        let mut parent = Item::new("main/about");
        parent.set("columns", json!([50, 50])).set("vendor", json!({"x": 1}));
        for alias in ["team", "history", "contact"] {
            let mut child = Item::new(&format!("main/about/{alias}"));
            parent.add_child(&mut child);
        }
        let _ = parent.group_children(&[GroupSpec::aliases(["team"]), GroupSpec::aliases(["history"])]);
        parent.set_url(Some("/main/about".into()));
        parent
    }

    #[test]
    fn encode_decode_preserves_item() {
        let item = grouped_item();
        let encoded = item.encode().unwrap();
        let decoded = Item::decode(&encoded).unwrap();
        assert_eq!(decoded, item);
        assert_eq!(decoded.url(), Some("/main/about"));
        assert_eq!(decoded.group_partition().len(), 2);
    }

    #[test]
    fn envelope_field_names() {
        let encoded: Value = serde_json::from_str(&grouped_item().encode().unwrap()).unwrap();
        assert_eq!(encoded["version"], json!(VERSION));
        assert_eq!(encoded["childrenOrder"]["team"], json!("main/about/team"));
        assert_eq!(
            encoded["groupPartition"],
            json!([["main/about/team", "main/about/contact"], ["main/about/history"]])
        );
        assert_eq!(encoded["items"]["layout"], json!("list"));
    }

    #[test]
    fn version_zero_is_rejected() {
        let mut envelope: Value = serde_json::from_str(&grouped_item().encode().unwrap()).unwrap();
        envelope["version"] = json!(0);
        let err = Item::decode(&envelope.to_string()).unwrap_err();
        assert!(matches!(err, MenuError::Format { .. }));
        assert!(err.to_string().starts_with("serialized data is not valid"));
    }

    #[test]
    fn missing_version_is_rejected() {
        let err = Item::decode(r#"{"items": {}, "groupPartition": [], "childrenOrder": {}, "url": null}"#)
            .unwrap_err();
        assert!(matches!(err, MenuError::Format { reason } if reason.contains("missing")));
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(matches!(Item::decode("not json"), Err(MenuError::Json(_))));
        let err = Item::decode(r#"{"version": 1, "items": []}"#).unwrap_err();
        assert!(err.is_format());
    }

    #[test]
    fn unpack_checks_version() {
        let mut packed = SerializedItem::pack(&Item::new("main"));
        packed.version = 2;
        assert!(packed.unpack().is_err());
    }
}
