use std::fmt;

use sha2::{Digest, Sha256};

/// Display value used when an optional reference points at a missing object.
pub const OPTIONAL_NOT_FOUND: &str = "(optional, not found)";
/// Display value for a `valueFrom` without any selector we understand.
pub const UNKNOWN_SOURCE: &str = "(unknown source)";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkloadKind {
    Deployment,
    StatefulSet,
}

impl WorkloadKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkloadKind::Deployment => "Deployment",
            WorkloadKind::StatefulSet => "StatefulSet",
        }
    }

    /// Short badge shown next to the workload name in the Apps pane.
    pub fn badge(&self) -> &'static str {
        match self {
            WorkloadKind::Deployment => "[dep]",
            WorkloadKind::StatefulSet => "[sts]",
        }
    }
}

impl fmt::Display for WorkloadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A Deployment or StatefulSet whose pod template gets resolved.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Workload {
    pub name: String,
    pub namespace: String,
    pub kind: WorkloadKind,
}

impl Workload {
    pub fn new(name: impl Into<String>, namespace: impl Into<String>, kind: WorkloadKind) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            kind,
        }
    }

    /// Same workload name and kind, looked up in another namespace.
    pub fn in_namespace(&self, namespace: impl Into<String>) -> Self {
        Self {
            name: self.name.clone(),
            namespace: namespace.into(),
            kind: self.kind,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    Inline,
    ConfigMap,
    Secret,
    SealedSecret,
    FieldRef,
    ResourceRef,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Inline => "Inline",
            SourceKind::ConfigMap => "ConfigMap",
            SourceKind::Secret => "Secret",
            SourceKind::SealedSecret => "SealedSecret",
            SourceKind::FieldRef => "FieldRef",
            SourceKind::ResourceRef => "ResourceRef",
        }
    }

    pub fn is_secret(&self) -> bool {
        matches!(self, SourceKind::Secret | SourceKind::SealedSecret)
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw secret bytes. `Debug` never prints the content.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct SecretBytes(Vec<u8>);

impl SecretBytes {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn expose(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for SecretBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretBytes(<{} bytes redacted>)", self.0.len())
    }
}

/// First four bytes of the SHA-256 digest, as 8 lowercase hex characters.
pub fn hash_prefix(value: &[u8]) -> String {
    let digest = Sha256::digest(value);
    hex::encode(&digest[..4])
}

/// One resolved environment variable of a workload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvVarRecord {
    pub name: String,
    pub display_value: String,
    pub raw_bytes: Option<SecretBytes>,
    pub source_kind: SourceKind,
    pub source_name: Option<String>,
    pub sealed: bool,
    pub value_length: usize,
    pub hash_prefix: String,
}

impl EnvVarRecord {
    /// Record for a non-secret source; the display value is the value itself.
    pub fn plain(
        name: impl Into<String>,
        kind: SourceKind,
        source_name: Option<String>,
        value: impl Into<String>,
    ) -> Self {
        let display_value = value.into();
        Self {
            name: name.into(),
            value_length: display_value.len(),
            display_value,
            raw_bytes: None,
            source_kind: kind,
            source_name,
            sealed: false,
            hash_prefix: String::new(),
        }
    }

    /// Record for a Secret key. Only the hash prefix ever reaches the display value.
    pub fn secret(
        name: impl Into<String>,
        source_name: impl Into<String>,
        raw: Vec<u8>,
        sealed: bool,
    ) -> Self {
        let hash = hash_prefix(&raw);
        let kind = if sealed {
            SourceKind::SealedSecret
        } else {
            SourceKind::Secret
        };
        Self {
            name: name.into(),
            display_value: format!("HASH: {hash}"),
            value_length: raw.len(),
            raw_bytes: Some(SecretBytes::new(raw)),
            source_kind: kind,
            source_name: Some(source_name.into()),
            sealed,
            hash_prefix: hash,
        }
    }

    /// Placeholder for an optional reference whose object does not exist.
    pub fn optional_missing(
        name: impl Into<String>,
        kind: SourceKind,
        source_name: impl Into<String>,
    ) -> Self {
        Self::plain(name, kind, Some(source_name.into()), OPTIONAL_NOT_FOUND)
    }

    pub fn is_secret(&self) -> bool {
        self.source_kind.is_secret()
    }

    /// Row annotation for secret-backed records: ` len=N` plus ` sealed`.
    pub fn annotation(&self) -> String {
        if !self.is_secret() {
            return String::new();
        }
        let mut notes = format!(" len={}", self.value_length);
        if self.sealed {
            notes.push_str(" sealed");
        }
        notes
    }

    /// Short description of where the value comes from, e.g. `cm/app-config`.
    pub fn source_label(&self) -> String {
        let name = self.source_name.as_deref().unwrap_or_default();
        match self.source_kind {
            SourceKind::ConfigMap => format!("cm/{name}"),
            SourceKind::Secret | SourceKind::SealedSecret => format!("sec/{name}"),
            SourceKind::Inline => "(inline)".to_string(),
            SourceKind::FieldRef => "(fieldRef)".to_string(),
            SourceKind::ResourceRef => "(resourceRef)".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_prefix_is_eight_lowercase_hex() {
        // sha256("hunter2") = f52fbd32b2b3b86ff88ef6c490628285f482af15ddcb29541f94bcf526a3f6c7
        assert_eq!(hash_prefix(b"hunter2"), "f52fbd32");
        assert_eq!(hash_prefix(b""), "e3b0c442");
    }

    #[test]
    fn test_secret_record_never_displays_raw() {
        let rec = EnvVarRecord::secret("PWD", "sec1", b"hunter2".to_vec(), false);
        assert_eq!(rec.display_value, "HASH: f52fbd32");
        assert!(!rec.display_value.contains("hunter2"));
        assert_eq!(rec.value_length, 7);
        assert_eq!(rec.source_kind, SourceKind::Secret);
        assert_eq!(rec.annotation(), " len=7");
    }

    #[test]
    fn test_sealed_annotation() {
        let rec = EnvVarRecord::secret("TOKEN", "sec1", b"abc".to_vec(), true);
        assert_eq!(rec.source_kind, SourceKind::SealedSecret);
        assert_eq!(rec.annotation(), " len=3 sealed");
    }

    #[test]
    fn test_debug_redacts_secret_bytes() {
        let rec = EnvVarRecord::secret("PWD", "sec1", b"hunter2".to_vec(), false);
        let dbg = format!("{rec:?}");
        assert!(!dbg.contains("hunter2"));
        assert!(dbg.contains("redacted"));
    }

    #[test]
    fn test_plain_value_length_and_labels() {
        let rec = EnvVarRecord::plain("FOO", SourceKind::ConfigMap, Some("cm1".into()), "bar");
        assert_eq!(rec.value_length, 3);
        assert_eq!(rec.annotation(), "");
        assert_eq!(rec.source_label(), "cm/cm1");

        let missing = EnvVarRecord::optional_missing("X", SourceKind::Secret, "gone");
        assert_eq!(missing.display_value, OPTIONAL_NOT_FOUND);
        assert!(missing.raw_bytes.is_none());
        assert_eq!(missing.value_length, OPTIONAL_NOT_FOUND.len());
    }
}
