//! End-to-end runs of the `syncmap` binary against a fake local Maven
//! repository. No network: every artifact is staged as a sources jar on
//! disk, and failure tests point the remote at an unroutable address.

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;

const OLD_WIDGET_CLIENT: &str = r#"
package com.acme;

public final class WidgetAsyncClient {
    public Mono<Widget> get(String id) { return null; }
    public Mono<Void> delete(String id) { return null; }
}
"#;

const OLD_TABLE_CLIENT: &str = r#"
package com.acme;

public final class TableAsyncClient {
    public Mono<Void> drop(String name) { return null; }
}
"#;

const NEW_WIDGET_CLIENT: &str = r#"
package com.acme;

public final class WidgetClient {
    public Widget get(String id) { return null; }
    public Widget get(String id, Options options) { return null; }
}
"#;

struct Fixture {
    _dir: tempfile::TempDir,
    repo: PathBuf,
    mappings: PathBuf,
    cache: PathBuf,
    config: PathBuf,
}

impl Fixture {
    fn new(config: &str) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let repo = dir.path().join("m2/repository");
        let mappings = dir.path().join("mappings");
        let cache = dir.path().join("cache");
        let config_path = dir.path().join("config.json");
        fs::create_dir_all(&repo).unwrap();
        fs::write(&config_path, config).unwrap();
        Self {
            _dir: dir,
            repo,
            mappings,
            cache,
            config: config_path,
        }
    }

    fn stage_sources_jar(&self, coordinates: &str, files: &[(&str, &str)]) {
        let mut parts = coordinates.split(':');
        let group = parts.next().unwrap();
        let artifact = parts.next().unwrap();
        let version = parts.next().unwrap();

        let dir = self
            .repo
            .join(group.replace('.', "/"))
            .join(artifact)
            .join(version);
        fs::create_dir_all(&dir).unwrap();
        let jar = dir.join(format!("{artifact}-{version}-sources.jar"));

        let mut writer = zip::ZipWriter::new(fs::File::create(jar).unwrap());
        let options = zip::write::SimpleFileOptions::default();
        for (name, body) in files {
            writer.start_file(*name, options).unwrap();
            writer.write_all(body.as_bytes()).unwrap();
        }
        writer.finish().unwrap();
    }

    fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("syncmap").unwrap();
        cmd.arg("--config")
            .arg(&self.config)
            .arg("--mappings")
            .arg(&self.mappings)
            .arg("--maven-repo")
            .arg(&self.repo)
            .arg("--cache-dir")
            .arg(&self.cache);
        cmd
    }

    fn mapping_json(&self, file_name: &str) -> serde_json::Value {
        let text = fs::read_to_string(self.mappings.join(file_name)).unwrap();
        serde_json::from_str(&text).unwrap()
    }
}

fn widgets_config() -> &'static str {
    r#"[{
        "oldLibrary": "com.acme:widgets:1.0.0",
        "newLibrary": "com.acme:widgets:2.0.0"
    }]"#
}

#[test]
fn maps_async_clients_against_the_new_library() {
    let fixture = Fixture::new(widgets_config());
    fixture.stage_sources_jar(
        "com.acme:widgets:1.0.0",
        &[
            ("com/acme/WidgetAsyncClient.java", OLD_WIDGET_CLIENT),
            ("com/acme/TableAsyncClient.java", OLD_TABLE_CLIENT),
        ],
    );
    fixture.stage_sources_jar(
        "com.acme:widgets:2.0.0",
        &[("com/acme/WidgetClient.java", NEW_WIDGET_CLIENT)],
    );

    fixture
        .command()
        .assert()
        .success()
        .stdout(predicate::str::contains("com.acme.TableAsyncClient"));

    let json = fixture.mapping_json("com.acme_widgets_1.0.0.json");
    assert_eq!(json["oldLibrary"], "com.acme:widgets:1.0.0");

    let widget = &json["clients"]["com.acme.WidgetAsyncClient"]["methods"];
    // Only the structurally equal overload matches.
    assert_eq!(widget["get"]["matches"], serde_json::json!(["get(String id)"]));
    assert_eq!(widget["delete"]["matches"], serde_json::json!([]));

    // TableClient does not exist in the new library: every method unmapped.
    let table = &json["clients"]["com.acme.TableAsyncClient"]["methods"];
    assert_eq!(table["drop"]["matches"], serde_json::json!([]));
}

#[test]
fn extraction_only_mode_reports_all_clients_missing() {
    let fixture = Fixture::new(r#"[{ "oldLibrary": "com.acme:widgets:1.0.0" }]"#);
    fixture.stage_sources_jar(
        "com.acme:widgets:1.0.0",
        &[("com/acme/WidgetAsyncClient.java", OLD_WIDGET_CLIENT)],
    );

    fixture
        .command()
        .assert()
        .success()
        .stdout(predicate::str::contains("com.acme.WidgetAsyncClient"));

    let json = fixture.mapping_json("com.acme_widgets_1.0.0.json");
    let methods = &json["clients"]["com.acme.WidgetAsyncClient"]["methods"];
    assert_eq!(methods["get"]["matches"], serde_json::json!([]));
}

#[test]
fn reruns_preserve_hand_curated_matches() {
    let fixture = Fixture::new(widgets_config());
    fixture.stage_sources_jar(
        "com.acme:widgets:1.0.0",
        &[("com/acme/WidgetAsyncClient.java", OLD_WIDGET_CLIENT)],
    );
    fixture.stage_sources_jar(
        "com.acme:widgets:2.0.0",
        &[("com/acme/WidgetClient.java", NEW_WIDGET_CLIENT)],
    );

    fs::create_dir_all(&fixture.mappings).unwrap();
    fs::write(
        fixture.mappings.join("com.acme_widgets_1.0.0.json"),
        r#"{
            "oldLibrary": "com.acme:widgets:1.0.0",
            "clients": {
                "com.acme.WidgetAsyncClient": {
                    "methods": {
                        "get": {
                            "parameters": [ { "type": "String", "name": "id" } ],
                            "matches": [ "get(String id, Region r)" ]
                        }
                    }
                }
            }
        }"#,
    )
    .unwrap();

    fixture.command().assert().success();

    let json = fixture.mapping_json("com.acme_widgets_1.0.0.json");
    let get = &json["clients"]["com.acme.WidgetAsyncClient"]["methods"]["get"];
    // Curated entry first, recomputed match unioned in, no duplicates.
    assert_eq!(
        get["matches"],
        serde_json::json!(["get(String id, Region r)", "get(String id)"])
    );
}

#[test]
fn artifact_failure_leaves_the_existing_mapping_untouched() {
    let fixture = Fixture::new(r#"[{ "oldLibrary": "com.acme:ghost:9.9.9" }]"#);

    fs::create_dir_all(&fixture.mappings).unwrap();
    let mapping_path = fixture.mappings.join("com.acme_ghost_9.9.9.json");
    let original = r#"{ "oldLibrary": "com.acme:ghost:9.9.9", "clients": {} }"#;
    fs::write(&mapping_path, original).unwrap();

    // Nothing staged locally, and the remote is unroutable.
    fixture
        .command()
        .arg("--repository-url")
        .arg("http://127.0.0.1:9/maven2")
        .assert()
        .code(1);

    assert_eq!(fs::read_to_string(&mapping_path).unwrap(), original);
}

#[test]
fn malformed_existing_mapping_fails_the_pair() {
    let fixture = Fixture::new(widgets_config());
    fixture.stage_sources_jar(
        "com.acme:widgets:1.0.0",
        &[("com/acme/WidgetAsyncClient.java", OLD_WIDGET_CLIENT)],
    );
    fixture.stage_sources_jar(
        "com.acme:widgets:2.0.0",
        &[("com/acme/WidgetClient.java", NEW_WIDGET_CLIENT)],
    );

    fs::create_dir_all(&fixture.mappings).unwrap();
    let mapping_path = fixture.mappings.join("com.acme_widgets_1.0.0.json");
    fs::write(&mapping_path, "{ corrupt").unwrap();

    fixture.command().assert().code(1);
    assert_eq!(fs::read_to_string(&mapping_path).unwrap(), "{ corrupt");
}

#[test]
fn client_mapping_overrides_take_precedence() {
    let fixture = Fixture::new(
        r#"[{
            "oldLibrary": "com.acme:widgets:1.0.0",
            "newLibrary": "com.acme:widgets:2.0.0",
            "clientMappings": {
                "com.acme.WidgetAsyncClient": "com.acme.LegacyWidgetClient"
            }
        }]"#,
    );
    fixture.stage_sources_jar(
        "com.acme:widgets:1.0.0",
        &[("com/acme/WidgetAsyncClient.java", OLD_WIDGET_CLIENT)],
    );
    // The convention target exists, but the override points elsewhere.
    fixture.stage_sources_jar(
        "com.acme:widgets:2.0.0",
        &[("com/acme/WidgetClient.java", NEW_WIDGET_CLIENT)],
    );

    fixture
        .command()
        .assert()
        .success()
        .stdout(predicate::str::contains("com.acme.WidgetAsyncClient"));

    let json = fixture.mapping_json("com.acme_widgets_1.0.0.json");
    let methods = &json["clients"]["com.acme.WidgetAsyncClient"]["methods"];
    assert_eq!(methods["get"]["matches"], serde_json::json!([]));
}
