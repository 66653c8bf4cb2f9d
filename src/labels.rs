use serde::Deserialize;

/// Localized label strings, looked up by key.
///
/// Every field is optional so a config file only needs to carry the
/// translations it changes.
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Labels {
    pub name: Option<String>,
    pub size: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub modified: Option<String>,
    pub directory: Option<String>,
    pub file: Option<String>,
    pub parent: Option<String>,
}

impl Labels {
    /// Text for `key`, falling back to the built-in English label.
    ///
    /// Unknown keys are returned as-is.
    pub fn get<'a>(&'a self, key: &'a str) -> &'a str {
        let (value, default) = match key {
            "name" => (&self.name, "Name"),
            "size" => (&self.size, "Size"),
            "type" => (&self.kind, "Type"),
            "modified" => (&self.modified, "Modified"),
            "directory" => (&self.directory, "Directory"),
            "file" => (&self.file, "File"),
            "parent" => (&self.parent, "Parent"),
            _ => return key,
        };
        value.as_deref().unwrap_or(default)
    }

    /// `other`'s values win over `self`'s.
    pub fn merge(self, other: &Labels) -> Labels {
        Labels {
            name: other.name.clone().or(self.name),
            size: other.size.clone().or(self.size),
            kind: other.kind.clone().or(self.kind),
            modified: other.modified.clone().or(self.modified),
            directory: other.directory.clone().or(self.directory),
            file: other.file.clone().or(self.file),
            parent: other.parent.clone().or(self.parent),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_english() {
        let labels = Labels::default();
        assert_eq!(labels.get("name"), "Name");
        assert_eq!(labels.get("type"), "Type");
        assert_eq!(labels.get("directory"), "Directory");
        assert_eq!(labels.get("file"), "File");
    }

    #[test]
    fn unknown_key_echoes() {
        assert_eq!(Labels::default().get("owner"), "owner");
    }

    #[test]
    fn toml_overrides_single_keys() {
        let labels: Labels = toml::from_str("name = \"Nom\"\ntype = \"Genre\"").expect("parse");
        assert_eq!(labels.get("name"), "Nom");
        assert_eq!(labels.get("type"), "Genre");
        assert_eq!(labels.get("size"), "Size");
    }

    #[test]
    fn merge_keeps_base_when_unset() {
        let base = Labels {
            size: Some("Taille".into()),
            ..Default::default()
        };
        let over = Labels {
            name: Some("Nom".into()),
            ..Default::default()
        };
        let merged = base.merge(&over);
        assert_eq!(merged.get("name"), "Nom");
        assert_eq!(merged.get("size"), "Taille");
    }
}
