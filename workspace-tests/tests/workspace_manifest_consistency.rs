use proptest::prelude::*;
use std::fs;
use std::path::Path;

/// Workspace manifest checks
///
/// Every member inherits its version and edition from the workspace, every
/// dependency the workspace pins is inherited with `workspace = true`, and
/// each declared target has its entry point on disk.
#[cfg(test)]
mod manifest_tests {
    use super::*;

    const MEMBERS: [&str; 3] = ["tabby-engine", "tabby-cli", "workspace-tests"];

    fn load_manifest(path: &str) -> toml::Table {
        let content = fs::read_to_string(path)
            .unwrap_or_else(|e| panic!("Failed to read {}: {}", path, e));
        content
            .parse::<toml::Table>()
            .unwrap_or_else(|e| panic!("Failed to parse {}: {}", path, e))
    }

    fn workspace_manifest() -> toml::Table {
        load_manifest("../Cargo.toml")
    }

    fn member_manifest(member: &str) -> toml::Table {
        load_manifest(&format!("../{}/Cargo.toml", member))
    }

    fn workspace_dependency_names() -> Vec<String> {
        workspace_manifest()["workspace"]["dependencies"]
            .as_table()
            .expect("workspace.dependencies table")
            .keys()
            .cloned()
            .collect()
    }

    /// `(name, inherits_from_workspace)` for every dependency section
    fn member_dependencies(manifest: &toml::Table) -> Vec<(String, bool)> {
        ["dependencies", "dev-dependencies", "build-dependencies"]
            .iter()
            .filter_map(|section| manifest.get(*section).and_then(|v| v.as_table()))
            .flat_map(|table| table.iter())
            .map(|(name, entry)| {
                let inherits = entry
                    .get("workspace")
                    .and_then(|v| v.as_bool())
                    .unwrap_or(false);
                (name.clone(), inherits)
            })
            .collect()
    }

    #[test]
    fn test_workspace_members_match() {
        let manifest = workspace_manifest();
        let members: Vec<&str> = manifest["workspace"]["members"]
            .as_array()
            .expect("workspace.members array")
            .iter()
            .filter_map(|v| v.as_str())
            .collect();

        assert_eq!(members, MEMBERS.to_vec());
        for member in MEMBERS {
            assert!(
                Path::new(&format!("../{}/Cargo.toml", member)).exists(),
                "member {} has no manifest",
                member
            );
        }
    }

    #[test]
    fn test_members_inherit_package_metadata() {
        for member in MEMBERS {
            let manifest = member_manifest(member);
            let package = manifest["package"].as_table().expect("package table");

            for key in ["version", "edition"] {
                let inherits = package
                    .get(key)
                    .and_then(|v| v.get("workspace"))
                    .and_then(|v| v.as_bool())
                    .unwrap_or(false);
                assert!(inherits, "{} does not inherit {} from the workspace", member, key);
            }
        }
    }

    #[test]
    fn test_binary_and_library_entry_points_exist() {
        let manifest = member_manifest("tabby-cli");

        let lib_path = manifest["lib"]["path"].as_str().expect("lib path");
        assert!(Path::new("../tabby-cli").join(lib_path).exists());

        let bins = manifest["bin"].as_array().expect("bin targets");
        assert_eq!(bins.len(), 1);
        assert_eq!(bins[0]["name"].as_str(), Some("tabby"));
        let bin_path = bins[0]["path"].as_str().expect("bin path");
        assert!(Path::new("../tabby-cli").join(bin_path).exists());

        assert!(Path::new("../tabby-engine/src/lib.rs").exists());
        assert!(!Path::new("../tabby-engine/src/main.rs").exists());
    }

    #[test]
    fn test_no_dependency_is_declared_twice() {
        for member in MEMBERS {
            let manifest = member_manifest(member);
            let section = |name: &str| -> Vec<String> {
                manifest
                    .get(name)
                    .and_then(|v| v.as_table())
                    .map(|table| table.keys().cloned().collect())
                    .unwrap_or_default()
            };

            let runtime = section("dependencies");
            for name in section("dev-dependencies") {
                assert!(
                    !runtime.contains(&name),
                    "{} lists '{}' in both [dependencies] and [dev-dependencies]",
                    member,
                    name
                );
            }
        }
    }

    proptest! {
        #[test]
        fn test_pinned_dependencies_are_inherited(
            member in prop::sample::select(MEMBERS.to_vec())
        ) {
            let pinned = workspace_dependency_names();
            let manifest = member_manifest(member);

            for (name, inherits) in member_dependencies(&manifest) {
                if pinned.contains(&name) {
                    prop_assert!(
                        inherits,
                        "Crate '{}' uses dependency '{}' but does not inherit from workspace (missing 'workspace = true')",
                        member,
                        name
                    );
                }
            }
        }
    }

    #[test]
    fn test_dependency_parsing() {
        let good: toml::Table = r#"
[package]
name = "test-crate"

[dependencies]
tokio = { workspace = true }
local = { path = "../local" }

[dev-dependencies]
serde = "1.0"
"#
        .parse()
        .unwrap();

        let deps = member_dependencies(&good);
        assert!(deps.contains(&("tokio".to_string(), true)));
        assert!(deps.contains(&("local".to_string(), false)));
        assert!(deps.contains(&("serde".to_string(), false)));
    }
}
