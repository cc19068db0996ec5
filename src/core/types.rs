use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of one index (core) as addressed in a request path.
///
/// An empty id means "no tenant specified"; callers decide whether that is an
/// error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TenantId(String);

impl TenantId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TenantId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for TenantId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl AsRef<str> for TenantId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Snapshot of the cluster shard layout as reported by the ping endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShardTopology {
    pub shard_count: u32,
    pub replicas_per_shard: u32,
    #[serde(default)]
    pub hosts: Vec<String>,
}

impl ShardTopology {
    pub fn new(shard_count: u32, replicas_per_shard: u32, hosts: Vec<String>) -> Self {
        Self {
            shard_count,
            replicas_per_shard,
            hosts,
        }
    }

    /// Renders the `/ping` response document.
    pub fn to_xml(&self) -> String {
        let mut out = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        out.push_str("<result>");
        out.push_str(&format!("<numshard>{}</numshard>", self.shard_count));
        out.push_str(&format!(
            "<numpershard>{}</numpershard>",
            self.replicas_per_shard
        ));
        for host in &self.hosts {
            out.push_str("<host>");
            out.push_str(&escape_xml(host));
            out.push_str("</host>");
        }
        out.push_str("</result>");
        out
    }
}

pub fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn topology_xml_matches_wire_format() {
        let topology = ShardTopology::new(3, 2, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(
            topology.to_xml(),
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
             <result><numshard>3</numshard><numpershard>2</numpershard>\
             <host>a</host><host>b</host></result>"
        );
    }

    #[test]
    fn topology_xml_without_hosts() {
        let xml = ShardTopology::new(0, 0, vec![]).to_xml();
        assert!(xml.ends_with("<result><numshard>0</numshard><numpershard>0</numpershard></result>"));
    }

    #[test]
    fn host_names_are_escaped() {
        let xml = ShardTopology::new(1, 1, vec!["a&b<c>".to_string()]).to_xml();
        assert!(xml.contains("<host>a&amp;b&lt;c&gt;</host>"));
    }

    #[test]
    fn topology_deserializes_without_hosts() {
        let topology: ShardTopology =
            serde_json::from_str(r#"{"shard_count": 4, "replicas_per_shard": 1}"#).unwrap();
        assert_eq!(topology.shard_count, 4);
        assert!(topology.hosts.is_empty());
    }
}
