//! Test utilities shared by the Raven integration tests.
//!
//! Builds mod archives and modlinks snapshots in memory and lays out a fake
//! game installation in a temporary directory.

#![allow(dead_code)]

use raven::Settings;
use sha2::{Digest, Sha256};
use std::fs;
use std::io::{Cursor, Write};
use std::path::PathBuf;
use tempfile::TempDir;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

/// Build a zip archive in memory; names ending in `/` are directories
pub fn zip_bytes(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();
    for (name, content) in entries {
        if name.ends_with('/') {
            writer
                .add_directory(*name, options)
                .expect("Failed to add directory");
        } else {
            writer.start_file(*name, options).expect("Failed to start file");
            writer.write_all(content).expect("Failed to write entry");
        }
    }
    writer
        .finish()
        .expect("Failed to finish archive")
        .into_inner()
}

pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

/// One modlinks entry: a manifest record plus the artifact served at its link
pub struct ModSpec {
    pub name: String,
    pub dependencies: Vec<String>,
    pub file_name: String,
    pub body: Vec<u8>,
    pub base: bool,
}

impl ModSpec {
    pub fn plugin(name: &str, dependencies: &[&str], file_name: &str, body: Vec<u8>) -> Self {
        Self {
            name: name.to_string(),
            dependencies: dependencies.iter().map(|d| d.to_string()).collect(),
            file_name: file_name.to_string(),
            body,
            base: false,
        }
    }

    pub fn base(name: &str, file_name: &str, body: Vec<u8>) -> Self {
        Self {
            base: true,
            ..Self::plugin(name, &[], file_name, body)
        }
    }

    fn record(&self, server_url: &str) -> String {
        let deps = self
            .dependencies
            .iter()
            .map(|d| format!("{:?}", d))
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "Name = {:?}\n\
             Description = \"{} for Death's Door\"\n\
             Repository = \"https://github.com/dd-modding/{}\"\n\
             Dependencies = [{}]\n\
             Link = \"{}/files/{}\"\n\
             SHA256 = {:?}\n",
            self.name,
            self.name,
            self.name,
            deps,
            server_url,
            self.file_name,
            sha256_hex(&self.body),
        )
    }
}

/// A mockito server serving a modlinks snapshot and every artifact it links to
pub struct ModServer {
    pub server: mockito::ServerGuard,
    mocks: Vec<mockito::Mock>,
}

impl ModServer {
    pub fn start(specs: &[ModSpec]) -> Self {
        let mut server = mockito::Server::new();
        let url = server.url();

        let mut entries: Vec<(String, Vec<u8>)> = vec![("modlinks-main/".to_string(), Vec::new())];
        let mut mocks = Vec::new();
        for spec in specs {
            let section = if spec.base { "base" } else { "mods" };
            entries.push((
                format!("modlinks-main/{}/{}.toml", section, spec.name),
                spec.record(&url).into_bytes(),
            ));
            mocks.push(
                server
                    .mock("GET", format!("/files/{}", spec.file_name).as_str())
                    .with_body(&spec.body)
                    .create(),
            );
        }
        let borrowed: Vec<(&str, &[u8])> = entries
            .iter()
            .map(|(n, c)| (n.as_str(), c.as_slice()))
            .collect();
        mocks.push(
            server
                .mock("GET", "/modlinks.zip")
                .with_body(zip_bytes(&borrowed))
                .create(),
        );

        Self { server, mocks }
    }

    pub fn modlinks_url(&self) -> String {
        format!("{}/modlinks.zip", self.server.url())
    }
}

/// An isolated game installation and cache
pub struct TestGame {
    pub temp_dir: TempDir,
    pub game_dir: PathBuf,
    pub cache_root: PathBuf,
}

impl TestGame {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let game_dir = temp_dir.path().join("Death's Door");
        fs::create_dir_all(&game_dir).expect("Failed to create game directory");
        fs::write(game_dir.join("DeathsDoor.exe"), b"MZ").expect("Failed to write exe");
        let cache_root = temp_dir.path().join("cache");

        Self {
            temp_dir,
            game_dir,
            cache_root,
        }
    }

    pub fn plugins_dir(&self) -> PathBuf {
        self.game_dir.join("BepInEx").join("plugins")
    }

    pub fn config_dir(&self) -> PathBuf {
        self.temp_dir.path().join("config")
    }

    pub fn settings(&self) -> Settings {
        Settings {
            game_location: self.game_dir.to_string_lossy().to_string(),
            ..Default::default()
        }
    }
}

/// The BepInEx loader as a zip, including the plugin directory
pub fn loader_zip() -> Vec<u8> {
    zip_bytes(&[
        ("BepInEx/", b""),
        ("BepInEx/core/", b""),
        ("BepInEx/core/BepInEx.dll", b"MZ loader"),
        ("BepInEx/plugins/", b""),
        ("doorstop_config.ini", b"[UnityDoorstop]\nenabled=true\n"),
        ("winhttp.dll", b"MZ proxy"),
    ])
}
