//! Fixtures shared by the unit tests: in-memory zip archives and manifests.

use sha2::{Digest, Sha256};
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

/// Build a zip archive in memory. Entry names ending in `/` become directories.
pub fn zip_bytes(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();
    for (name, content) in entries {
        if name.ends_with('/') {
            writer.add_directory(*name, options).unwrap();
        } else {
            writer.start_file(*name, options).unwrap();
            writer.write_all(content).unwrap();
        }
    }
    writer.finish().unwrap().into_inner()
}

pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

pub fn manifest(name: &str, deps: &[&str], link: &str, sha256: &str) -> String {
    let deps = deps
        .iter()
        .map(|d| format!("{:?}", d))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "Name = {name:?}\n\
         Description = \"The {name} mod\"\n\
         Repository = \"https://github.com/example/{name}\"\n\
         Dependencies = [{deps}]\n\
         Integrations = []\n\
         Link = {link:?}\n\
         SHA256 = {sha256:?}\n"
    )
}

/// A modlinks archive laid out as `modlinks-main/{mods,base}/<name>.toml`.
pub fn modlinks_archive(mods: &[(&str, String)], bases: &[(&str, String)]) -> Vec<u8> {
    let mut entries: Vec<(String, Vec<u8>)> = vec![
        ("modlinks-main/".to_string(), Vec::new()),
        ("modlinks-main/README.md".to_string(), b"# modlinks".to_vec()),
    ];
    for (name, toml) in mods {
        entries.push((
            format!("modlinks-main/mods/{}.toml", name),
            toml.clone().into_bytes(),
        ));
    }
    for (name, toml) in bases {
        entries.push((
            format!("modlinks-main/base/{}.toml", name),
            toml.clone().into_bytes(),
        ));
    }
    let borrowed: Vec<(&str, &[u8])> = entries
        .iter()
        .map(|(n, c)| (n.as_str(), c.as_slice()))
        .collect();
    zip_bytes(&borrowed)
}

/// A repository whose mods depend on each other as given; links are never fetched.
pub fn graph_repository(graph: &[(&str, &[&str])]) -> crate::Repository {
    let mods: Vec<(&str, String)> = graph
        .iter()
        .map(|(name, deps)| {
            (
                *name,
                manifest(
                    name,
                    deps,
                    &format!("https://example.invalid/{}.dll", name),
                    &"00".repeat(32),
                ),
            )
        })
        .collect();
    crate::Repository::from_archive(modlinks_archive(&mods, &[])).unwrap()
}

pub fn mod_record(name: &str, link: &str, sha256: &str) -> crate::Mod {
    crate::Mod {
        name: name.to_string(),
        description: format!("The {} mod", name),
        repository: String::new(),
        dependencies: Vec::new(),
        integrations: Vec::new(),
        link: link.to_string(),
        sha256: sha256.to_string(),
    }
}
